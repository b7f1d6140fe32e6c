//! Session inspection handlers: list and get live rooms.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{PaginationParams, SessionListResponse, SessionSummaryDto};
use crate::app_state::AppState;
use crate::domain::SessionCode;
use crate::error::{ErrorResponse, RelayError};

/// `GET /sessions`: List live sessions with pagination.
///
/// # Errors
///
/// Never fails; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/sessions",
    tag = "Sessions",
    summary = "List live sessions",
    description = "Returns a paginated list of rooms currently held in memory, sorted by code.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated session list", body = SessionListResponse),
    )
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, RelayError> {
    let registry = state.relay.registry();
    let (codes, pagination) = params.paginate(registry.codes().await);

    let mut data = Vec::with_capacity(codes.len());
    for code in codes {
        // The room may have been evicted since the codes were listed.
        if let Some(room) = registry.get(&code).await {
            data.push(SessionSummaryDto::from(&*room.lock().await));
        }
    }

    Ok(Json(SessionListResponse { data, pagination }))
}

/// `GET /sessions/{code}`: Get a live session.
///
/// # Errors
///
/// Returns [`RelayError::MissingSessionCode`] if the code normalizes to
/// nothing, or [`RelayError::SessionNotFound`] if no room exists for it.
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{code}",
    tag = "Sessions",
    summary = "Get session details",
    description = "Returns membership and the last known presentation for one session. Codes are matched case-insensitively.",
    params(
        ("code" = String, Path, description = "Session code"),
    ),
    responses(
        (status = 200, description = "Session details", body = SessionSummaryDto),
        (status = 400, description = "Empty session code", body = ErrorResponse),
        (status = 404, description = "No live session with this code", body = ErrorResponse),
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<impl IntoResponse, RelayError> {
    let code = SessionCode::parse(&raw).ok_or(RelayError::MissingSessionCode)?;
    let room = state
        .relay
        .registry()
        .get(&code)
        .await
        .ok_or_else(|| RelayError::SessionNotFound(code.to_string()))?;
    let summary = SessionSummaryDto::from(&*room.lock().await);
    Ok(Json(summary))
}

/// Session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list_sessions))
        .route("/sessions/{code}", get(get_session))
}
