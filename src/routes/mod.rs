//! HTTP surface
//!
//! - `POST /` - function-runtime invocation: the request is the envelope, the
//!   response is the `{statusCode, body}` object
//! - `POST /webhook` - Telegram webhook: the request body is the raw update
//! - `GET /api/health` - liveness

pub mod health;
pub mod webhook;

use axum::Router;
use crate::models::AppState;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(webhook::router(state.clone()))
        .merge(health::router(state))
        .layer(TraceLayer::new_for_http())
}
