//! Last known presentation state of a room and the host updates that
//! mutate it.

use serde::Serialize;

use super::relay_event::{DeckSnapshot, RelayEvent};

/// Coerces a numeric value into a page number or page count.
///
/// Non-finite, non-positive, and sub-1 values are rejected; fractional
/// values are truncated; values beyond `u32::MAX` saturate.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn positive_count(value: f64) -> Option<u32> {
    if !value.is_finite() || value < 1.0 {
        return None;
    }
    // `as` saturates at u32::MAX.
    Some(value.trunc() as u32)
}

/// A mutation requested by the host (or by artifact ingress on its behalf).
///
/// Numeric fields are already coerced; `None` means "absent or rejected,
/// keep the previous value".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostUpdate {
    /// Replace the deck.
    DeckChange {
        /// New deck URL.
        url: Option<String>,
        /// New display name.
        display_name: Option<String>,
        /// New page count.
        page_count: Option<u32>,
    },
    /// Move to another page.
    PageChange {
        /// New page.
        page: Option<u32>,
        /// New page count.
        page_count: Option<u32>,
    },
    /// Replace the transcript.
    TranscriptChange {
        /// Full transcript text.
        text: String,
    },
}

/// Currently loaded deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    /// Server-reachable URL of the deck file.
    pub url: String,
    /// Human-readable name.
    pub display_name: String,
}

/// Presentation snapshot used to catch up late joiners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    deck: Option<Deck>,
    page: u32,
    page_count: u32,
    transcript_text: String,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            deck: None,
            page: 1,
            page_count: 0,
            transcript_text: String::new(),
        }
    }
}

impl Presentation {
    /// Returns the current deck, if any.
    #[must_use]
    pub const fn deck(&self) -> Option<&Deck> {
        self.deck.as_ref()
    }

    /// Returns the current page (1-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the current page count (`0` if unknown).
    #[must_use]
    pub const fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Returns the current transcript text.
    #[must_use]
    pub fn transcript_text(&self) -> &str {
        &self.transcript_text
    }

    /// Applies an update and returns the event to broadcast to viewers.
    ///
    /// Returns `None` if the update cannot take effect (a deck change with
    /// no URL while no deck is loaded).
    pub fn apply(&mut self, update: HostUpdate) -> Option<RelayEvent> {
        match update {
            HostUpdate::DeckChange {
                url,
                display_name,
                page_count,
            } => {
                let url = non_empty(url).or_else(|| self.deck.as_ref().map(|d| d.url.clone()))?;
                let display_name = non_empty(display_name)
                    .or_else(|| self.deck.as_ref().map(|d| d.display_name.clone()))
                    .unwrap_or_default();
                if let Some(count) = page_count {
                    self.page_count = count;
                }
                self.deck = Some(Deck { url, display_name });
                self.clamp_page();
                self.deck_event()
            }
            HostUpdate::PageChange { page, page_count } => {
                if let Some(count) = page_count {
                    self.page_count = count;
                }
                if let Some(page) = page {
                    self.page = page;
                }
                self.clamp_page();
                Some(self.page_event())
            }
            HostUpdate::TranscriptChange { text } => {
                self.transcript_text = text;
                Some(RelayEvent::TranscriptChange {
                    text: self.transcript_text.clone(),
                })
            }
        }
    }

    /// Builds the `sync` event carrying the full snapshot.
    #[must_use]
    pub fn sync_event(&self) -> RelayEvent {
        RelayEvent::Sync {
            deck: self.deck.as_ref().map(|d| DeckSnapshot {
                url: d.url.clone(),
                display_name: d.display_name.clone(),
                page_count: self.page_count,
            }),
            page: self.page,
            page_count: self.page_count,
            transcript_text: self.transcript_text.clone(),
        }
    }

    /// Builds a `deck-change` event for the current deck, if one is set.
    #[must_use]
    pub fn deck_event(&self) -> Option<RelayEvent> {
        self.deck.as_ref().map(|d| RelayEvent::DeckChange {
            url: d.url.clone(),
            display_name: d.display_name.clone(),
            page_count: self.page_count,
        })
    }

    /// Builds a `page-change` event restating the current page.
    #[must_use]
    pub const fn page_event(&self) -> RelayEvent {
        RelayEvent::PageChange {
            page: self.page,
            page_count: self.page_count,
        }
    }

    // A page count of 0 means "unknown" and does not bound the page.
    fn clamp_page(&mut self) {
        if self.deck.is_some() && self.page_count > 0 && self.page > self.page_count {
            self.page = self.page_count;
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn deck(url: &str, name: &str, pages: Option<u32>) -> HostUpdate {
        HostUpdate::DeckChange {
            url: Some(url.to_string()),
            display_name: Some(name.to_string()),
            page_count: pages,
        }
    }

    #[test]
    fn defaults_before_any_deck() {
        let p = Presentation::default();
        assert!(p.deck().is_none());
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_count(), 0);
        assert_eq!(p.transcript_text(), "");
    }

    #[test]
    fn positive_count_rejects_bad_values() {
        assert_eq!(positive_count(f64::NAN), None);
        assert_eq!(positive_count(f64::INFINITY), None);
        assert_eq!(positive_count(0.0), None);
        assert_eq!(positive_count(-3.0), None);
        assert_eq!(positive_count(0.5), None);
        assert_eq!(positive_count(4.9), Some(4));
        assert_eq!(positive_count(12.0), Some(12));
        assert_eq!(positive_count(1e20), Some(u32::MAX));
    }

    #[test]
    fn deck_change_sets_deck_and_count() {
        let mut p = Presentation::default();
        let event = p.apply(deck("http://x/files/a.pdf", "a.pdf", Some(10)));
        assert_eq!(
            event,
            Some(RelayEvent::DeckChange {
                url: "http://x/files/a.pdf".to_string(),
                display_name: "a.pdf".to_string(),
                page_count: 10,
            })
        );
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_count(), 10);
    }

    #[test]
    fn deck_change_without_url_and_no_deck_is_ignored() {
        let mut p = Presentation::default();
        let event = p.apply(HostUpdate::DeckChange {
            url: None,
            display_name: Some("x.pdf".to_string()),
            page_count: Some(3),
        });
        assert!(event.is_none());
        assert_eq!(p, Presentation::default());
    }

    #[test]
    fn deck_change_keeps_previous_fields_when_absent() {
        let mut p = Presentation::default();
        let _ = p.apply(deck("http://x/a.pdf", "a.pdf", Some(8)));
        let _ = p.apply(HostUpdate::DeckChange {
            url: None,
            display_name: Some("renamed.pdf".to_string()),
            page_count: None,
        });
        let Some(d) = p.deck() else {
            panic!("deck expected");
        };
        assert_eq!(d.url, "http://x/a.pdf");
        assert_eq!(d.display_name, "renamed.pdf");
        assert_eq!(p.page_count(), 8);
    }

    #[test]
    fn smaller_deck_clamps_page() {
        let mut p = Presentation::default();
        let _ = p.apply(deck("http://x/a.pdf", "a.pdf", Some(20)));
        let _ = p.apply(HostUpdate::PageChange {
            page: Some(15),
            page_count: None,
        });
        let _ = p.apply(deck("http://x/b.pdf", "b.pdf", Some(4)));
        assert_eq!(p.page(), 4);
    }

    #[test]
    fn page_change_updates_page_and_count() {
        let mut p = Presentation::default();
        let event = p.apply(HostUpdate::PageChange {
            page: Some(5),
            page_count: Some(12),
        });
        assert_eq!(
            event,
            Some(RelayEvent::PageChange {
                page: 5,
                page_count: 12
            })
        );
    }

    #[test]
    fn rejected_page_keeps_previous_value() {
        let mut p = Presentation::default();
        let _ = p.apply(HostUpdate::PageChange {
            page: Some(3),
            page_count: Some(9),
        });
        let event = p.apply(HostUpdate::PageChange {
            page: None,
            page_count: None,
        });
        assert_eq!(
            event,
            Some(RelayEvent::PageChange {
                page: 3,
                page_count: 9
            })
        );
    }

    #[test]
    fn page_is_clamped_once_deck_is_set() {
        let mut p = Presentation::default();
        let _ = p.apply(deck("http://x/a.pdf", "a.pdf", Some(10)));
        let _ = p.apply(HostUpdate::PageChange {
            page: Some(11),
            page_count: None,
        });
        assert_eq!(p.page(), 10);
    }

    #[test]
    fn transcript_replaces_text() {
        let mut p = Presentation::default();
        let _ = p.apply(HostUpdate::TranscriptChange {
            text: "hello".to_string(),
        });
        let _ = p.apply(HostUpdate::TranscriptChange {
            text: "hello world".to_string(),
        });
        assert_eq!(p.transcript_text(), "hello world");
    }

    #[test]
    fn sync_reflects_latest_state() {
        let mut p = Presentation::default();
        let _ = p.apply(deck("http://x/a.pdf", "a.pdf", Some(10)));
        let _ = p.apply(HostUpdate::PageChange {
            page: Some(4),
            page_count: None,
        });
        let _ = p.apply(HostUpdate::TranscriptChange {
            text: "intro".to_string(),
        });
        assert_eq!(
            p.sync_event(),
            RelayEvent::Sync {
                deck: Some(DeckSnapshot {
                    url: "http://x/a.pdf".to_string(),
                    display_name: "a.pdf".to_string(),
                    page_count: 10,
                }),
                page: 4,
                page_count: 10,
                transcript_text: "intro".to_string(),
            }
        );
    }
}
