//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::domain::{Role, SessionCode};
use crate::error::RelayError;

/// Join parameters carried on the upgrade request's query string.
#[derive(Debug, Deserialize)]
pub struct JoinParams {
    /// Session code; normalized before use.
    #[serde(default)]
    pub code: Option<String>,
    /// `host` or `viewer`; anything else joins as a viewer.
    #[serde(default)]
    pub role: Option<String>,
}

/// `GET /ws?code=<code>&role=<host|viewer>`: Upgrade to a relay connection.
///
/// # Errors
///
/// Returns [`RelayError::MissingSessionCode`] (400) without upgrading when
/// the code is missing or normalizes to nothing.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<JoinParams>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, RelayError> {
    let code = params
        .code
        .as_deref()
        .and_then(SessionCode::parse)
        .ok_or(RelayError::MissingSessionCode)?;
    let role = Role::parse(params.role.as_deref());
    let relay = Arc::clone(&state.relay);
    let buffer = state.config.outbound_buffer;

    Ok(ws.on_upgrade(move |socket| run_connection(socket, relay, code, role, buffer)))
}
