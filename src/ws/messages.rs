//! Inbound WebSocket frames and their conversion into host updates.
//!
//! Outbound frames are [`crate::domain::RelayEvent`]s; this module only
//! covers what clients send.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::HostUpdate;
use crate::domain::presentation::positive_count;

/// Frame sent by a client, tagged by `"type"`.
///
/// The older `pdf` / `slide` / `transcript` tags are accepted as aliases.
/// The older `name` / `numPages` field names are separate fields, so a frame
/// carrying both spellings still parses; the current name wins when both
/// hold a usable value. Numeric fields are taken as raw JSON so that numeric
/// strings are accepted and bad values only reject the field, not the whole
/// frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InboundFrame {
    /// Replace the deck.
    #[serde(alias = "pdf", rename_all = "camelCase")]
    DeckChange {
        /// Deck URL.
        #[serde(default)]
        url: Option<String>,
        /// Display name.
        #[serde(default)]
        display_name: Option<String>,
        /// Older spelling of `displayName`.
        #[serde(default)]
        name: Option<String>,
        /// Page count.
        #[serde(default)]
        page_count: Option<Value>,
        /// Older spelling of `pageCount`.
        #[serde(default)]
        num_pages: Option<Value>,
    },
    /// Move to another page.
    #[serde(alias = "slide", rename_all = "camelCase")]
    PageChange {
        /// Page number.
        #[serde(default)]
        page: Option<Value>,
        /// Page count.
        #[serde(default)]
        page_count: Option<Value>,
        /// Older spelling of `pageCount`.
        #[serde(default)]
        num_pages: Option<Value>,
    },
    /// Replace the transcript.
    #[serde(alias = "transcript")]
    TranscriptChange {
        /// Full transcript text.
        #[serde(default)]
        text: Option<Value>,
    },
}

impl InboundFrame {
    /// Parses a text frame. Returns `None` for anything that is not a
    /// well-formed frame of a known type.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// Converts the frame into a domain update, coercing numeric fields.
    #[must_use]
    pub fn into_update(self) -> HostUpdate {
        match self {
            Self::DeckChange {
                url,
                display_name,
                name,
                page_count,
                num_pages,
            } => HostUpdate::DeckChange {
                url,
                display_name: display_name
                    .filter(|n| !n.trim().is_empty())
                    .or(name),
                page_count: first_count(page_count.as_ref(), num_pages.as_ref()),
            },
            Self::PageChange {
                page,
                page_count,
                num_pages,
            } => HostUpdate::PageChange {
                page: page.as_ref().and_then(coerce_count),
                page_count: first_count(page_count.as_ref(), num_pages.as_ref()),
            },
            Self::TranscriptChange { text } => HostUpdate::TranscriptChange {
                text: text.as_ref().map(coerce_text).unwrap_or_default(),
            },
        }
    }
}

/// Takes the first of two spellings that holds a usable count.
fn first_count(current: Option<&Value>, legacy: Option<&Value>) -> Option<u32> {
    current.and_then(coerce_count).or_else(|| legacy.and_then(coerce_count))
}

/// Accepts JSON numbers and numeric strings.
fn coerce_count(value: &Value) -> Option<u32> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    positive_count(number)
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
