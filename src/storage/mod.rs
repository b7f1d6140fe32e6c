//! Storage layer: durable home for uploaded slide decks.
//!
//! Decks are written to a local directory and served back verbatim under
//! `/files`. Nothing else is persisted; room state is memory-only.

pub mod deck_store;

pub use deck_store::{DeckStore, StoredDeck};
