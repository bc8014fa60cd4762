//! Admin HTTP handlers
//!
//! Thin handlers that delegate to `AdminControlSurface`. Request bodies for
//! register and settings are parsed here so malformed JSON is reported as
//! an invalid descriptor or invalid settings rather than a generic
//! extractor rejection.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bookstore_core::{Error, RelaySettings, ServiceDescriptor};
use serde_json::Value;
use std::collections::HashMap;

use super::{AppResult, AppState};

/// Admin routes plus the inbound `/receive-message` endpoint
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/register", post(register_service))
        .route("/api/admin/settings", post(update_settings))
        .route("/api/admin/services", get(list_services))
        .route("/api/admin/message", post(send_message))
        .route("/receive-message", post(receive_message))
}

/// Register or replace a downstream service
pub async fn register_service(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<ServiceDescriptor>> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| Error::InvalidDescriptor(format!("malformed JSON: {e}")))?;
    let descriptor = ServiceDescriptor::from_value(value)?;

    let stored = state.control.register_service(descriptor)?;
    Ok(Json(stored))
}

/// Apply a settings update to the relay
pub async fn update_settings(State(state): State<AppState>, body: Bytes) -> AppResult<StatusCode> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| Error::InvalidSettings(format!("malformed JSON: {e}")))?;
    let settings = RelaySettings::from_value(value)?;

    state.control.update_settings(&settings);
    Ok(StatusCode::OK)
}

/// Current registry snapshot, name -> descriptor
pub async fn list_services(State(state): State<AppState>) -> Json<HashMap<String, ServiceDescriptor>> {
    Json(state.control.list_services())
}

/// Send a raw message through the bulk channel and fan it out
///
/// Succeeds whatever happens to individual fan-out targets.
pub async fn send_message(State(state): State<AppState>, message: String) -> AppResult<StatusCode> {
    state.control.send_message(&message).await?;
    Ok(StatusCode::OK)
}

/// Acknowledge a message pushed by another control surface
pub async fn receive_message(State(state): State<AppState>, message: String) -> StatusCode {
    state.control.receive_message(&message);
    StatusCode::OK
}
