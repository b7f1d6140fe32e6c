//! WebSocket layer: the connection gateway.
//!
//! The endpoint at `/ws?code=<code>&role=<host|viewer>` attaches each
//! connection to its session room. Hosts push presentation updates;
//! viewers only receive.

pub mod connection;
pub mod handler;
pub mod messages;
