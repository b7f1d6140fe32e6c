//! Relay service: joins, leaves, host updates, and deck ingress.

use std::sync::Arc;

use crate::domain::{
    ConnectionHandle, ConnectionId, HostUpdate, Role, SessionCode, SessionRegistry, SharedRoom,
};
use crate::error::RelayError;
use crate::storage::DeckStore;

/// A connection's membership in a room, held by the gateway for the
/// lifetime of the connection.
#[derive(Debug, Clone)]
pub struct Attachment {
    code: SessionCode,
    role: Role,
    connection_id: ConnectionId,
    room: SharedRoom,
}

impl Attachment {
    /// Role the connection joined with.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Identifier of the attached connection.
    #[must_use]
    pub const fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }
}

/// Result of a successful deck upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedDeck {
    /// URL the deck is served from.
    pub url: String,
    /// Name shown to viewers.
    pub display_name: String,
    /// Room page count after the upload.
    pub page_count: u32,
}

/// Orchestration layer for the relay.
///
/// Owns the [`SessionRegistry`] and the [`DeckStore`]. Room mutations
/// (and the broadcasts they trigger) run under the room lock; storage I/O
/// runs with no lock held.
#[derive(Debug)]
pub struct RelayService {
    registry: Arc<SessionRegistry>,
    store: DeckStore,
    max_idle_rooms: usize,
}

/// Member-less rooms kept by default before uploads start evicting them.
pub const DEFAULT_MAX_IDLE_ROOMS: usize = 256;

impl RelayService {
    /// Creates a new `RelayService`.
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>, store: DeckStore) -> Self {
        Self {
            registry,
            store,
            max_idle_rooms: DEFAULT_MAX_IDLE_ROOMS,
        }
    }

    /// Sets how many rooms without members uploads may leave behind.
    #[must_use]
    pub const fn with_max_idle_rooms(mut self, max_idle_rooms: usize) -> Self {
        self.max_idle_rooms = max_idle_rooms;
        self
    }

    /// Returns a reference to the inner [`SessionRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Attaches a connection to its room.
    ///
    /// Hosts evict any previous host; viewers receive a `sync` snapshot.
    pub async fn join(
        &self,
        code: SessionCode,
        role: Role,
        handle: ConnectionHandle,
    ) -> Attachment {
        let connection_id = handle.id();
        let (room, evicted) = self.registry.attach(&code, role, handle).await;
        if let Some(previous) = evicted {
            tracing::info!(%code, evicted = %previous, %connection_id, "host replaced");
        }
        tracing::info!(%code, %role, %connection_id, "connection attached");
        Attachment {
            code,
            role,
            connection_id,
            room,
        }
    }

    /// Detaches a connection, evicting the room if it became empty.
    ///
    /// Returns `true` if the room was removed.
    pub async fn leave(&self, attachment: &Attachment) -> bool {
        let Attachment {
            code,
            role,
            connection_id,
            ..
        } = attachment;
        let evicted = self.registry.detach(code, *role, *connection_id).await;
        tracing::info!(%code, %role, %connection_id, room_closed = evicted, "connection detached");
        evicted
    }

    /// Applies a host update arriving on `attachment`'s connection.
    ///
    /// Viewer connections and replaced hosts are ignored. Returns the
    /// number of viewers reached, or `None` if nothing was applied.
    pub async fn apply_update(
        &self,
        attachment: &Attachment,
        update: HostUpdate,
    ) -> Option<usize> {
        if attachment.role != Role::Host {
            tracing::debug!(
                code = %attachment.code,
                connection_id = %attachment.connection_id,
                "viewer update ignored"
            );
            return None;
        }
        let mut room = attachment.room.lock().await;
        let delivered = room.apply_host_update(attachment.connection_id, update);
        match delivered {
            Some(viewers) => {
                tracing::debug!(code = %attachment.code, viewers, "host update broadcast");
            }
            None => {
                tracing::debug!(
                    code = %attachment.code,
                    connection_id = %attachment.connection_id,
                    "host update ignored"
                );
            }
        }
        delivered
    }

    /// Stores an uploaded deck and publishes it to the room for `code`.
    ///
    /// The room is only touched after the file is durably written.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] if the file cannot be written; the
    /// room is left unchanged in that case.
    pub async fn publish_deck(
        &self,
        code: &SessionCode,
        file_name: &str,
        bytes: &[u8],
        page_count: Option<u32>,
    ) -> Result<PublishedDeck, RelayError> {
        let stored = self.store.save(file_name, bytes).await?;
        let display_name = if file_name.trim().is_empty() {
            stored.file_name.clone()
        } else {
            file_name.to_string()
        };

        let (delivered, page_count, idle) = self
            .registry
            .with_room(code, |room| {
                let delivered =
                    room.apply_deck_upload(stored.url.clone(), display_name.clone(), page_count);
                (delivered, room.presentation().page_count(), room.is_empty())
            })
            .await;
        if idle {
            let evicted = self.registry.trim_idle(self.max_idle_rooms).await;
            if evicted > 0 {
                tracing::info!(evicted, "idle rooms evicted after upload");
            }
        }

        tracing::info!(
            %code,
            path = %stored.path.display(),
            size = bytes.len(),
            page_count,
            viewers = delivered.unwrap_or(0),
            "deck published"
        );

        Ok(PublishedDeck {
            url: stored.url,
            display_name,
            page_count,
        })
    }
}
