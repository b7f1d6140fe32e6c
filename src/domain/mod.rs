//! Domain layer: session identity, rooms, presentation state, and fan-out.
//!
//! This module contains the relay's in-memory model: normalized session
//! codes, connection handles, the per-code [`SessionRoom`] state machine,
//! the [`SessionRegistry`] that owns all rooms, and the broadcaster that
//! delivers [`RelayEvent`]s to a room's audience.

pub mod connection;
pub mod fanout;
pub mod presentation;
pub mod relay_event;
pub mod session_code;
pub mod session_registry;
pub mod session_room;

pub use connection::{ConnectionEnds, ConnectionHandle, ConnectionId, Role};
pub use fanout::Audience;
pub use presentation::{HostUpdate, Presentation};
pub use relay_event::RelayEvent;
pub use session_code::SessionCode;
pub use session_registry::{SessionRegistry, SharedRoom};
pub use session_room::{RoomState, SessionRoom};
