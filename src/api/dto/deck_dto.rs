//! Deck upload DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::service::PublishedDeck;

/// Query parameters for `POST /upload`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Session code the deck belongs to.
    #[serde(default)]
    pub code: Option<String>,
    /// Declared page count.
    #[serde(default, rename = "pageCount")]
    pub page_count: Option<String>,
    /// Older spelling of `pageCount`, used when `pageCount` is absent or
    /// unusable.
    #[serde(default, rename = "numPages")]
    pub num_pages: Option<String>,
}

/// Multipart body for `POST /upload` (documentation only).
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// The deck file. The part may also be named `file`.
    #[schema(value_type = String, format = Binary)]
    pub pdf: Vec<u8>,
    /// Declared page count, if not given on the query string.
    #[schema(value_type = Option<u32>, rename = "pageCount")]
    pub page_count: Option<String>,
}

/// Response body for a successful upload.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeckUploadResponse {
    /// URL the deck is served from.
    pub url: String,
    /// Name shown to viewers.
    pub display_name: String,
    /// Room page count after the upload (`0` if unknown).
    pub page_count: u32,
}

impl From<PublishedDeck> for DeckUploadResponse {
    fn from(deck: PublishedDeck) -> Self {
        Self {
            url: deck.url,
            display_name: deck.display_name,
            page_count: deck.page_count,
        }
    }
}
