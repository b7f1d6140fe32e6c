//! Per-code room: host slot, viewer set, and presentation state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::connection::{ConnectionHandle, ConnectionId};
use super::fanout::{self, Audience};
use super::presentation::{HostUpdate, Presentation};
use super::relay_event::RelayEvent;
use super::SessionCode;

/// Derived room state, computed from the host slot and viewer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomState {
    /// No host and no viewers; eligible for eviction.
    Empty,
    /// Host present, no viewers.
    IdleHosted,
    /// Host present with at least one viewer.
    Live,
    /// Viewers present but the host is gone.
    Orphaned,
}

/// State for one session code.
///
/// Mutation methods perform their own fan-out through [`fanout`], so a
/// caller holding the room lock sees each transition and its broadcasts as
/// one atomic step.
#[derive(Debug)]
pub struct SessionRoom {
    code: SessionCode,
    host: Option<ConnectionHandle>,
    viewers: HashMap<ConnectionId, ConnectionHandle>,
    presentation: Presentation,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl SessionRoom {
    /// Creates an empty room for `code`.
    #[must_use]
    pub fn new(code: SessionCode) -> Self {
        let now = Utc::now();
        Self {
            code,
            host: None,
            viewers: HashMap::new(),
            presentation: Presentation::default(),
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Returns the room's session code.
    #[must_use]
    pub const fn code(&self) -> &SessionCode {
        &self.code
    }

    /// Returns the derived room state.
    #[must_use]
    pub fn state(&self) -> RoomState {
        match (self.host.is_some(), self.viewers.is_empty()) {
            (false, true) => RoomState::Empty,
            (true, true) => RoomState::IdleHosted,
            (true, false) => RoomState::Live,
            (false, false) => RoomState::Orphaned,
        }
    }

    /// Returns `true` when neither a host nor any viewer is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state() == RoomState::Empty
    }

    /// Returns `true` if a host is attached.
    #[must_use]
    pub const fn has_host(&self) -> bool {
        self.host.is_some()
    }

    /// Returns the identifier of the current host, if any.
    #[must_use]
    pub fn host_id(&self) -> Option<ConnectionId> {
        self.host.as_ref().map(ConnectionHandle::id)
    }

    /// Returns `true` if `id` is attached as a viewer.
    #[must_use]
    pub fn has_viewer(&self, id: ConnectionId) -> bool {
        self.viewers.contains_key(&id)
    }

    /// Returns the number of attached viewers.
    #[must_use]
    pub fn viewer_count(&self) -> usize {
        self.viewers.len()
    }

    /// Returns the last known presentation.
    #[must_use]
    pub const fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Returns when the room was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the room last changed.
    #[must_use]
    pub const fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }

    pub(crate) fn host_handle(&self) -> Option<&ConnectionHandle> {
        self.host.as_ref()
    }

    pub(crate) fn viewer_handles(&self) -> impl Iterator<Item = &ConnectionHandle> {
        self.viewers.values()
    }

    /// Installs `handle` as the host, force-closing any previous host.
    ///
    /// Returns the evicted host's identifier, if there was one.
    pub fn attach_host(&mut self, handle: ConnectionHandle) -> Option<ConnectionId> {
        let evicted = self.host.replace(handle).map(|previous| {
            previous.close();
            previous.id()
        });
        self.touch();
        self.notify_presence();
        evicted
    }

    /// Adds a viewer, sends it a `sync` snapshot, and updates the host's
    /// presence count.
    pub fn attach_viewer(&mut self, handle: ConnectionHandle) {
        let _ = fanout::send_to(&handle, &self.presentation.sync_event());
        self.viewers.insert(handle.id(), handle);
        self.touch();
        self.notify_presence();
    }

    /// Clears the host slot if `id` is still the current host.
    ///
    /// Returns `false` for a stale detach from an already replaced host.
    pub fn detach_host(&mut self, id: ConnectionId) -> bool {
        if self.host_id() != Some(id) {
            return false;
        }
        self.host = None;
        self.touch();
        true
    }

    /// Removes a viewer and updates the host's presence count.
    pub fn detach_viewer(&mut self, id: ConnectionId) -> bool {
        if self.viewers.remove(&id).is_none() {
            return false;
        }
        self.touch();
        self.notify_presence();
        true
    }

    /// Applies an update sent by connection `from`.
    ///
    /// Ignored unless `from` is the current host. Returns the number of
    /// viewers the resulting event was delivered to, or `None` if nothing
    /// was applied.
    pub fn apply_host_update(&mut self, from: ConnectionId, update: HostUpdate) -> Option<usize> {
        if self.host_id() != Some(from) {
            return None;
        }
        self.apply_update(update)
    }

    /// Applies an uploaded deck as if the host had sent it, then restates
    /// the current page so viewers land on the active slide of the new deck.
    pub fn apply_deck_upload(
        &mut self,
        url: String,
        display_name: String,
        page_count: Option<u32>,
    ) -> Option<usize> {
        let delivered = self.apply_update(HostUpdate::DeckChange {
            url: Some(url),
            display_name: Some(display_name),
            page_count,
        })?;
        let _ = self.apply_update(HostUpdate::PageChange {
            page: None,
            page_count: None,
        });
        Some(delivered)
    }

    fn apply_update(&mut self, update: HostUpdate) -> Option<usize> {
        let event = self.presentation.apply(update)?;
        self.touch();
        Some(fanout::broadcast(self, Audience::AllViewers, &event))
    }

    fn notify_presence(&self) {
        let event = RelayEvent::Presence {
            viewer_count: self.viewers.len(),
        };
        let _ = fanout::broadcast(self, Audience::HostOnly, &event);
    }

    fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }
}
