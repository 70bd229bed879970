use std::sync::Arc;

use crate::basecamp::BasecampClient;
use crate::directory::DirectoryCache;

use super::config::BridgeConfig;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BridgeConfig>,
    pub basecamp: Arc<BasecampClient>,
    pub directory: Arc<DirectoryCache>,
}

impl AppState {
    pub fn new(config: BridgeConfig) -> Self {
        let basecamp = BasecampClient::new(
            config.base_url.clone(),
            config.account_id.clone(),
            config.access_token.clone(),
            config.user_agent.clone(),
            config.default_project_id,
        );
        let directory = DirectoryCache::new(basecamp.clone(), config.directory_ttl);
        Self {
            config: Arc::new(config),
            basecamp: Arc::new(basecamp),
            directory: Arc::new(directory),
        }
    }
}
