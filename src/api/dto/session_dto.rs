//! Session inspection DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{RoomState, SessionCode, SessionRoom};

/// Deck as reported by the session endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeckDto {
    /// Deck URL.
    pub url: String,
    /// Display name.
    pub display_name: String,
}

/// Presentation snapshot as reported by the session endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresentationDto {
    /// Current deck, `null` before any upload.
    pub deck: Option<DeckDto>,
    /// Current page.
    pub page: u32,
    /// Current page count.
    pub page_count: u32,
    /// Current transcript text.
    pub transcript_text: String,
}

/// Summary of a live session for `GET /api/v1/sessions/{code}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummaryDto {
    /// Normalized session code.
    #[schema(value_type = String)]
    pub code: SessionCode,
    /// Derived room state.
    #[schema(value_type = String, example = "live")]
    pub state: RoomState,
    /// Whether a host is attached.
    pub host_connected: bool,
    /// Number of attached viewers.
    pub viewer_count: usize,
    /// Last known presentation.
    pub presentation: PresentationDto,
    /// Room creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last membership or presentation change.
    pub last_activity_at: DateTime<Utc>,
}

impl From<&SessionRoom> for SessionSummaryDto {
    fn from(room: &SessionRoom) -> Self {
        let presentation = room.presentation();
        Self {
            code: room.code().clone(),
            state: room.state(),
            host_connected: room.has_host(),
            viewer_count: room.viewer_count(),
            presentation: PresentationDto {
                deck: presentation.deck().map(|d| DeckDto {
                    url: d.url.clone(),
                    display_name: d.display_name.clone(),
                }),
                page: presentation.page(),
                page_count: presentation.page_count(),
                transcript_text: presentation.transcript_text().to_string(),
            },
            created_at: room.created_at(),
            last_activity_at: room.last_activity_at(),
        }
    }
}

/// Response body for `GET /api/v1/sessions`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionListResponse {
    /// Sessions on this page.
    pub data: Vec<SessionSummaryDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
