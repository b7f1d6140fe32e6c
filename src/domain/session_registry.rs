//! Concurrent room storage keyed by session code.
//!
//! [`SessionRegistry`] holds every live [`SessionRoom`] in a map guarded by
//! a [`tokio::sync::Mutex`]; each room sits behind its own mutex so host
//! updates on different rooms never contend.
//!
//! # Lock order
//!
//! Always registry first, then room. Operations that can create or evict a
//! room ([`attach`](SessionRegistry::attach), [`detach`](SessionRegistry::detach),
//! [`with_room`](SessionRegistry::with_room)) hold the registry lock for
//! their whole duration, so a room can never be evicted between lookup and
//! attach.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::connection::{ConnectionHandle, ConnectionId, Role};
use super::session_room::SessionRoom;
use super::SessionCode;

/// A room shared between the registry and the connections attached to it.
pub type SharedRoom = Arc<Mutex<SessionRoom>>;

/// Process-wide map from session code to room.
///
/// Created once at startup and injected where needed; tests build their
/// own independent instances.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    rooms: Mutex<HashMap<SessionCode, SharedRoom>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the room for `code` without creating it.
    pub async fn get(&self, code: &SessionCode) -> Option<SharedRoom> {
        self.rooms.lock().await.get(code).cloned()
    }

    /// Attaches a connection to the room for `code`, creating the room if
    /// needed.
    ///
    /// Returns the room and, for hosts, the identifier of any host that was
    /// evicted in the process.
    pub async fn attach(
        &self,
        code: &SessionCode,
        role: Role,
        handle: ConnectionHandle,
    ) -> (SharedRoom, Option<ConnectionId>) {
        let mut rooms = self.rooms.lock().await;
        let room = Self::entry(&mut rooms, code);
        let evicted = {
            let mut guard = room.lock().await;
            match role {
                Role::Host => guard.attach_host(handle),
                Role::Viewer => {
                    guard.attach_viewer(handle);
                    None
                }
            }
        };
        (room, evicted)
    }

    /// Detaches a connection and evicts the room if it is now empty.
    ///
    /// Returns `true` if the room was removed from the registry.
    pub async fn detach(&self, code: &SessionCode, role: Role, id: ConnectionId) -> bool {
        let mut rooms = self.rooms.lock().await;
        let Some(room) = rooms.get(code).cloned() else {
            return false;
        };
        let empty = {
            let mut guard = room.lock().await;
            let detached = match role {
                Role::Host => guard.detach_host(id),
                Role::Viewer => guard.detach_viewer(id),
            };
            if !detached {
                tracing::debug!(%code, %role, connection_id = %id, "stale detach ignored");
            }
            guard.is_empty()
        };
        if empty {
            rooms.remove(code);
        }
        empty
    }

    /// Evicts the least recently active member-less rooms until at most
    /// `keep` of them remain.
    ///
    /// Rooms created by an upload have no member whose detach would evict
    /// them, so they are bounded here instead. Returns the number of rooms
    /// removed.
    pub async fn trim_idle(&self, keep: usize) -> usize {
        let mut rooms = self.rooms.lock().await;
        let mut idle = Vec::new();
        for (code, room) in rooms.iter() {
            let guard = room.lock().await;
            if guard.is_empty() {
                idle.push((guard.last_activity_at(), code.clone()));
            }
        }
        if idle.len() <= keep {
            return 0;
        }
        idle.sort();
        let excess = idle.len() - keep;
        for (_, code) in idle.into_iter().take(excess) {
            rooms.remove(&code);
            tracing::debug!(%code, "idle room evicted");
        }
        excess
    }

    /// Runs `f` on the room for `code` (created if needed) while the
    /// registry lock is held.
    pub async fn with_room<R>(
        &self,
        code: &SessionCode,
        f: impl FnOnce(&mut SessionRoom) -> R,
    ) -> R {
        let mut rooms = self.rooms.lock().await;
        let room = Self::entry(&mut rooms, code);
        let mut guard = room.lock().await;
        f(&mut *guard)
    }

    /// Returns all active session codes, sorted.
    pub async fn codes(&self) -> Vec<SessionCode> {
        let mut codes: Vec<SessionCode> = self.rooms.lock().await.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Returns the number of rooms in the registry.
    pub async fn len(&self) -> usize {
        self.rooms.lock().await.len()
    }

    /// Returns `true` if the registry contains no rooms.
    pub async fn is_empty(&self) -> bool {
        self.rooms.lock().await.is_empty()
    }

    fn entry(rooms: &mut HashMap<SessionCode, SharedRoom>, code: &SessionCode) -> SharedRoom {
        let room = rooms.entry(code.clone()).or_insert_with(|| {
            tracing::debug!(%code, "room created");
            Arc::new(Mutex::new(SessionRoom::new(code.clone())))
        });
        Arc::clone(room)
    }
}
