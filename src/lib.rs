//! # slidecast-relay
//!
//! WebSocket session relay for live presentations.
//!
//! One presenter ("host") per session code pushes slide deck, page, and
//! transcript updates; any number of viewers joining with the same code
//! receive them in real time. Late joiners are caught up with a snapshot
//! of the last known state.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP upload)
//!     │
//!     ├── WS Gateway (ws/)
//!     ├── REST Handlers (api/)
//!     │
//!     ├── RelayService (service/)
//!     │
//!     ├── SessionRegistry ─► SessionRoom ─► fan-out (domain/)
//!     │
//!     └── DeckStore (storage/) ─► /files
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod service;
pub mod storage;
pub mod ws;
