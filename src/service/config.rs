use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::routing::ListRoutes;

use super::BoxError;

pub const DEFAULT_INBOUND_BODY_MAX_BYTES: usize = 1024 * 1024;
pub const DEFAULT_BASE_URL: &str = "https://3.basecampapi.com";

/// Everything the bridge reads from the environment, resolved once at
/// startup.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub host: String,
    pub port: u16,
    /// Basecamp account id, the first URL segment of every API call
    pub account_id: String,
    /// Bearer token for the Basecamp API
    pub access_token: String,
    /// Project cards land in when no project name resolves
    pub default_project_id: u64,
    /// List cards land on when no route is mapped
    pub default_list_id: u64,
    /// Basecamp requires an identifying User-Agent on every call
    pub user_agent: String,
    pub base_url: String,
    /// Directory cache refresh policy; None caches for the process lifetime
    pub directory_ttl: Option<Duration>,
    /// Project display name -> card-table list id
    pub list_routes: ListRoutes,
    pub inbound_body_max_bytes: usize,
}

impl BridgeConfig {
    pub fn from_env() -> Result<Self, BoxError> {
        let host = env::var("BRIDGE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let account_id = require_env("BASECAMP_ACCOUNT_ID")?;
        let access_token = require_env("BASECAMP_ACCESS_TOKEN")?;
        let default_project_id = require_env("BASECAMP_PROJECT_ID")?
            .parse::<u64>()
            .map_err(|_| "BASECAMP_PROJECT_ID must be a numeric project id".to_string())?;
        let default_list_id = require_env("BASECAMP_LIST_ID")?
            .parse::<u64>()
            .map_err(|_| "BASECAMP_LIST_ID must be a numeric list id".to_string())?;

        let user_agent =
            env::var("USER_AGENT").unwrap_or_else(|_| "basecamp_bridge".to_string());
        let base_url =
            env::var("BASECAMP_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let directory_ttl = env::var("DIRECTORY_TTL_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs);

        let list_routes = match env::var("LIST_ROUTES_PATH") {
            Ok(path) if !path.trim().is_empty() => {
                ListRoutes::with_overrides(&PathBuf::from(path))?
            }
            _ => ListRoutes::builtin(),
        };

        let inbound_body_max_bytes = env::var("BRIDGE_MAX_BODY_BYTES")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_INBOUND_BODY_MAX_BYTES);

        Ok(Self {
            host,
            port,
            account_id,
            access_token,
            default_project_id,
            default_list_id,
            user_agent,
            base_url,
            directory_ttl,
            list_routes,
            inbound_body_max_bytes,
        })
    }
}

fn require_env(name: &str) -> Result<String, BoxError> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| format!("{name} must be set").into())
}
