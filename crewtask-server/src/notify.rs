//! Notification fan-out.
//!
//! Maps one [`Notification`] to a push on every live connection bound to
//! its target. Delivery is best-effort, at-most-once: no connection means
//! the event is dropped, a failed send is logged and dropped, and nothing
//! here ever blocks or fails the originating request. Per-connection
//! ordering follows the unbounded channel: events sent within one
//! lifecycle-engine call arrive in emission order.

use std::sync::Arc;

use axum::extract::ws::Message;

use crewtask_proto::event::{self, Notification, ServerEvent};
use crewtask_proto::user::Role;

use crate::registry::ConnectionRegistry;

/// Delivers events to live connections through the registry.
///
/// Cheap to clone; injected into the engine and services as a collaborator
/// rather than reached through global state.
#[derive(Clone)]
pub struct Notifier {
    registry: Arc<ConnectionRegistry>,
}

impl Notifier {
    /// Creates a notifier over a connection registry.
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Pushes one event to every live connection of its target user.
    pub async fn deliver(&self, note: &Notification) {
        let text = match event::encode(&note.event) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode push event");
                return;
            }
        };
        let senders = self.registry.senders_for_user(&note.target).await;
        if senders.is_empty() {
            tracing::debug!(
                user_id = %note.target,
                event = note.event.name(),
                "no live connection, event dropped"
            );
            return;
        }
        for sender in senders {
            if sender.send(Message::Text(text.clone().into())).is_err() {
                tracing::debug!(
                    user_id = %note.target,
                    event = note.event.name(),
                    "connection closing, event dropped"
                );
            }
        }
    }

    /// Pushes a batch in order. Per-target ordering within the batch is
    /// preserved on each connection.
    pub async fn deliver_all(&self, batch: &[Notification]) {
        for note in batch {
            self.deliver(note).await;
        }
    }

    /// Pushes one event to every live connection bound to a role.
    pub async fn broadcast_role(&self, role: Role, event: &ServerEvent) {
        let text = match event::encode(event) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode broadcast event");
                return;
            }
        };
        for sender in self.registry.senders_for_role(role).await {
            if sender.send(Message::Text(text.clone().into())).is_err() {
                tracing::debug!(event = event.name(), "connection closing, broadcast copy dropped");
            }
        }
    }
}
