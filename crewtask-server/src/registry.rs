//! Connection registry for the real-time channel.
//!
//! Binds each live WebSocket connection to its authenticated identity and
//! places it into two addressable groups: per-user (direct notification
//! targeting) and per-role (broadcasts such as admin alerts). Bindings are
//! ephemeral, released immediately on disconnect, never persisted. One
//! user may hold several simultaneous connections; each receives its own
//! copy of every delivery.

use std::collections::{HashMap, HashSet};

use axum::extract::ws::Message;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crewtask_proto::user::{Role, UserId};

/// Identifier for one live connection binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One connection's identity and outbound channel.
struct Binding {
    user_id: UserId,
    role: Role,
    sender: mpsc::UnboundedSender<Message>,
}

/// All group state behind one lock so bind/release stay consistent.
#[derive(Default)]
struct Groups {
    bindings: HashMap<ConnectionId, Binding>,
    by_user: HashMap<UserId, HashSet<ConnectionId>>,
    by_role: HashMap<Role, HashSet<ConnectionId>>,
}

/// Thread-safe registry of live, authenticated connections.
pub struct ConnectionRegistry {
    groups: RwLock<Groups>,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            groups: RwLock::new(Groups::default()),
        }
    }

    /// Binds a connection to an identity, returning its id.
    pub async fn bind(
        &self,
        user_id: UserId,
        role: Role,
        sender: mpsc::UnboundedSender<Message>,
    ) -> ConnectionId {
        let conn_id = ConnectionId::new();
        let mut groups = self.groups.write().await;
        groups.by_user.entry(user_id.clone()).or_default().insert(conn_id);
        groups.by_role.entry(role).or_default().insert(conn_id);
        groups.bindings.insert(
            conn_id,
            Binding {
                user_id,
                role,
                sender,
            },
        );
        conn_id
    }

    /// Releases a binding and its group memberships.
    ///
    /// Returns `false` if the connection was not bound.
    pub async fn release(&self, conn_id: ConnectionId) -> bool {
        let mut groups = self.groups.write().await;
        let Some(binding) = groups.bindings.remove(&conn_id) else {
            return false;
        };
        if let Some(set) = groups.by_user.get_mut(&binding.user_id) {
            set.remove(&conn_id);
            if set.is_empty() {
                groups.by_user.remove(&binding.user_id);
            }
        }
        if let Some(set) = groups.by_role.get_mut(&binding.role) {
            set.remove(&conn_id);
            if set.is_empty() {
                groups.by_role.remove(&binding.role);
            }
        }
        true
    }

    /// Senders for every live connection bound to a user.
    pub async fn senders_for_user(&self, user_id: &UserId) -> Vec<mpsc::UnboundedSender<Message>> {
        let groups = self.groups.read().await;
        groups.by_user.get(user_id).map_or_else(Vec::new, |set| {
            set.iter()
                .filter_map(|id| groups.bindings.get(id))
                .map(|b| b.sender.clone())
                .collect()
        })
    }

    /// Senders for every live connection bound to a role.
    pub async fn senders_for_role(&self, role: Role) -> Vec<mpsc::UnboundedSender<Message>> {
        let groups = self.groups.read().await;
        groups.by_role.get(&role).map_or_else(Vec::new, |set| {
            set.iter()
                .filter_map(|id| groups.bindings.get(id))
                .map(|b| b.sender.clone())
                .collect()
        })
    }

    /// Number of live connections for one user.
    pub async fn user_connection_count(&self, user_id: &UserId) -> usize {
        let groups = self.groups.read().await;
        groups.by_user.get(user_id).map_or(0, HashSet::len)
    }

    /// Total number of live connections.
    pub async fn connection_count(&self) -> usize {
        let groups = self.groups.read().await;
        groups.bindings.len()
    }
}
