pub mod config;
pub mod handlers;
pub mod server;
pub mod state;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
