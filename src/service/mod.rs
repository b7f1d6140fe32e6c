//! Service layer: relay orchestration.
//!
//! [`RelayService`] attaches and detaches connections through the
//! [`crate::domain::SessionRegistry`], forwards host updates to rooms, and
//! publishes uploaded decks once they are stored.

pub mod relay_service;

pub use relay_service::{Attachment, PublishedDeck, RelayService};
