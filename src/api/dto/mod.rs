//! Data Transfer Objects for REST request/response serialization.
//!
//! Field names on the wire are camelCase, matching the WebSocket frames.

pub mod common_dto;
pub mod deck_dto;
pub mod session_dto;

pub use common_dto::*;
pub use deck_dto::*;
pub use session_dto::*;
