//! Connection identity, role, and the outbound handle a room holds.
//!
//! The gateway owns the transport. A room only keeps a [`ConnectionHandle`]:
//! a bounded sender into the connection's write loop plus a close signal.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Notify, mpsc};

/// Unique identifier for a single real-time connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Creates a new random `ConnectionId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role a connection joined with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The single authoritative presenter of a session.
    Host,
    /// A read-only audience member.
    Viewer,
}

impl Role {
    /// Parses a role parameter. Anything that is not `host` (or the older
    /// `teacher` spelling) is treated as a viewer.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
            Some("host" | "teacher") => Self::Host,
            _ => Self::Viewer,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => f.write_str("host"),
            Self::Viewer => f.write_str("viewer"),
        }
    }
}

/// A pre-serialized outbound frame, shared between all recipients.
pub type Frame = Arc<str>;

/// Room-side handle to a live connection.
///
/// Cloning is cheap; all clones refer to the same underlying connection.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: mpsc::Sender<Frame>,
    close: Arc<Notify>,
}

/// Transport-side ends of a [`ConnectionHandle`], owned by the write loop.
#[derive(Debug)]
pub struct ConnectionEnds {
    /// Frames queued for the socket.
    pub frames: mpsc::Receiver<Frame>,
    /// Fired when the room force-closes the connection.
    pub close: Arc<Notify>,
}

impl ConnectionHandle {
    /// Creates a handle with a write buffer of `buffer` frames, returning
    /// the ends the transport loop drains.
    #[must_use]
    pub fn channel(buffer: usize) -> (Self, ConnectionEnds) {
        let (sender, frames) = mpsc::channel(buffer.max(1));
        let close = Arc::new(Notify::new());
        let handle = Self {
            id: ConnectionId::new(),
            sender,
            close: Arc::clone(&close),
        };
        (handle, ConnectionEnds { frames, close })
    }

    /// Returns the connection identifier.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns `true` if the connection is open and its write buffer has
    /// room for another frame.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.sender.is_closed() && self.sender.capacity() > 0
    }

    /// Hands a frame to the connection without waiting. Returns `false` if
    /// the connection is gone or its buffer is full; the frame is dropped.
    pub fn deliver(&self, frame: &Frame) -> bool {
        self.sender.try_send(Arc::clone(frame)).is_ok()
    }

    /// Asks the transport loop to close the connection.
    pub fn close(&self) {
        self.close.notify_one();
    }
}
