//! WebSocket connection loop.
//!
//! Attaches the connection to its room, then multiplexes three sources
//! until the connection ends: frames from the client, frames the room
//! queued for the client, and the room's force-close signal.

use std::sync::Arc;

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::messages::InboundFrame;
use crate::domain::{ConnectionHandle, Role, SessionCode};
use crate::service::{Attachment, RelayService};

/// Close code sent to a host replaced by a newer host connection.
pub const CLOSE_REPLACED: u16 = 4000;

/// Runs the read/write loop for a single WebSocket connection.
///
/// The connection is always detached from its room on exit, whatever the
/// reason the loop ended.
pub async fn run_connection(
    socket: WebSocket,
    relay: Arc<RelayService>,
    code: SessionCode,
    role: Role,
    buffer: usize,
) {
    let (handle, mut ends) = ConnectionHandle::channel(buffer);
    let attachment = relay.join(code, role, handle).await;
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            biased;

            // Replaced by a newer host
            () = ends.close.notified() => {
                let close = CloseFrame {
                    code: CLOSE_REPLACED,
                    reason: "replaced by a newer host connection".into(),
                };
                let _ = ws_tx.send(Message::Close(Some(close))).await;
                break;
            }
            // Frame queued by the room
            frame = ends.frames.recv() => {
                let Some(frame) = frame else { break };
                if ws_tx.send(Message::text(&*frame)).await.is_err() {
                    break;
                }
            }
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_text(&relay, &attachment, text.as_str()).await;
                    }
                    Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                        Ok(text) => handle_text(&relay, &attachment, text).await,
                        Err(_) => tracing::debug!(
                            connection_id = %attachment.connection_id(),
                            "dropping non-utf8 frame"
                        ),
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(
                            connection_id = %attachment.connection_id(),
                            error = %e,
                            "ws read failed"
                        );
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    relay.leave(&attachment).await;
    tracing::debug!(connection_id = %attachment.connection_id(), "ws connection closed");
}

/// Parses a client frame and forwards it as a host update. Malformed frames
/// and frames from viewers are dropped without a reply.
async fn handle_text(relay: &RelayService, attachment: &Attachment, text: &str) {
    if attachment.role() != Role::Host {
        tracing::debug!(connection_id = %attachment.connection_id(), "dropping viewer frame");
        return;
    }
    let Some(frame) = InboundFrame::parse(text) else {
        tracing::debug!(connection_id = %attachment.connection_id(), "dropping malformed frame");
        return;
    };
    let _ = relay.apply_update(attachment, frame.into_update()).await;
}
