use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use crate::models::AppState;
use crate::types::{Envelope, TransportResponse};
use tracing::{info, warn};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(invoke))
        .route("/webhook", post(webhook))
        .with_state(state)
}

/// Anything that is not a JSON object becomes an empty envelope, which the
/// dispatcher reports as a missing body.
fn parse_envelope(bytes: &[u8]) -> Envelope {
    match serde_json::from_slice(bytes) {
        Ok(value) => Envelope::from_json(value),
        Err(e) => {
            warn!(error = %e, "Envelope is not valid JSON");
            Envelope::default()
        }
    }
}

async fn invoke(State(state): State<AppState>, body: Bytes) -> Json<TransportResponse> {
    info!(size = body.len(), "Function invocation received");
    let envelope = parse_envelope(&body);
    Json(state.dispatcher.dispatch(&envelope).await)
}

async fn webhook(State(state): State<AppState>, body: Bytes) -> (StatusCode, String) {
    info!(size = body.len(), "Webhook update received");
    let response = state
        .dispatcher
        .dispatch(&Envelope::from_body_bytes(body.to_vec()))
        .await;

    let status = StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, response.body)
}
