// NormoBot - Telegram webhook bot reviewing technical specifications with an LLM

pub mod bot;
pub mod config;
pub mod documents;
pub mod llm;
pub mod models;
pub mod prompt;
pub mod routes;
pub mod telegram;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use bot::Dispatcher;
pub use config::Config;
pub use models::AppState;
pub use types::{Envelope, TransportResponse};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
