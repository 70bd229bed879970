use std::net::{IpAddr, SocketAddr};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use super::config::BridgeConfig;
use super::handlers;
use super::state::AppState;
use super::BoxError;

pub fn router(state: AppState) -> Router {
    let max_body_bytes = state.config.inbound_body_max_bytes;
    Router::new()
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        .route("/google-chat-webhook", post(handlers::handle_chat_webhook))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
}

pub async fn run_server(
    config: BridgeConfig,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), BoxError> {
    let host: IpAddr = config
        .host
        .parse()
        .map_err(|_| format!("invalid host: {}", config.host))?;
    let addr = SocketAddr::new(host, config.port);

    let state = AppState::new(config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("basecamp bridge listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
