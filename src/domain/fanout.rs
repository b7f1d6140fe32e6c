//! Fan-out broadcaster.
//!
//! Serializes an event once and hands the frame to every target connection
//! that is ready to take it. Delivery is send-or-skip: nothing is queued
//! beyond a connection's own write buffer and nothing is retried.

use std::sync::Arc;

use super::connection::{ConnectionHandle, Frame};
use super::relay_event::RelayEvent;
use super::session_room::SessionRoom;

/// Who receives a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Every attached viewer.
    AllViewers,
    /// The current host, if any.
    HostOnly,
}

/// Serializes an event into a shareable frame.
///
/// Returns `None` if serialization fails, which for [`RelayEvent`] would be
/// a bug; the caller then simply sends nothing.
#[must_use]
pub fn encode(event: &RelayEvent) -> Option<Frame> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Arc::from(json)),
        Err(e) => {
            tracing::error!(error = %e, event_type = event.event_type_str(), "failed to encode event");
            None
        }
    }
}

/// Delivers `event` to `audience` in `room`.
///
/// Returns the number of connections that accepted the frame. Connections
/// that are closed or whose buffer is full are skipped silently.
pub fn broadcast(room: &SessionRoom, audience: Audience, event: &RelayEvent) -> usize {
    match audience {
        Audience::AllViewers => deliver_all(room.viewer_handles(), event),
        Audience::HostOnly => deliver_all(room.host_handle(), event),
    }
}

/// Delivers `event` to a single connection.
pub fn send_to(target: &ConnectionHandle, event: &RelayEvent) -> bool {
    deliver_all(std::iter::once(target), event) == 1
}

fn deliver_all<'a>(
    targets: impl IntoIterator<Item = &'a ConnectionHandle>,
    event: &RelayEvent,
) -> usize {
    let mut targets = targets.into_iter().peekable();
    if targets.peek().is_none() {
        return 0;
    }
    let Some(frame) = encode(event) else {
        return 0;
    };
    let mut delivered = 0;
    for target in targets {
        if !target.is_ready() {
            tracing::debug!(connection_id = %target.id(), "skipping connection not ready");
            continue;
        }
        if target.deliver(&frame) {
            delivered += 1;
        }
    }
    delivered
}
