//! Events the relay sends to connected clients.
//!
//! Every room mutation ends with one of these being fanned out. The wire
//! shape is a JSON object tagged by `"type"` with camelCase fields.

use serde::Serialize;

/// Deck description as carried inside a `sync` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSnapshot {
    /// Server-reachable URL of the deck file.
    pub url: String,
    /// Human-readable name, usually the uploaded file name.
    pub display_name: String,
    /// Number of pages, `0` if unknown.
    pub page_count: u32,
}

/// Outbound event, serialized once per broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RelayEvent {
    /// Full snapshot sent once to a viewer right after it attaches.
    #[serde(rename_all = "camelCase")]
    Sync {
        /// Current deck, `null` before any deck was set.
        deck: Option<DeckSnapshot>,
        /// Current page (1-based).
        page: u32,
        /// Current page count.
        page_count: u32,
        /// Current transcript text.
        transcript_text: String,
    },

    /// The host replaced the deck.
    #[serde(rename_all = "camelCase")]
    DeckChange {
        /// Deck URL.
        url: String,
        /// Deck display name.
        display_name: String,
        /// Page count after the change.
        page_count: u32,
    },

    /// The host moved to another page.
    #[serde(rename_all = "camelCase")]
    PageChange {
        /// Current page.
        page: u32,
        /// Current page count.
        page_count: u32,
    },

    /// The host replaced the transcript text.
    TranscriptChange {
        /// Full transcript text.
        text: String,
    },

    /// Sent to the host whenever its audience changes.
    #[serde(rename_all = "camelCase")]
    Presence {
        /// Number of attached viewers.
        viewer_count: usize,
    },
}

impl RelayEvent {
    /// Returns the wire `type` tag.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::Sync { .. } => "sync",
            Self::DeckChange { .. } => "deck-change",
            Self::PageChange { .. } => "page-change",
            Self::TranscriptChange { .. } => "transcript-change",
            Self::Presence { .. } => "presence",
        }
    }
}
