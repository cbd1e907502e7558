//! In-memory user directory.
//!
//! Stands in for the identity provider's user database: the lifecycle
//! engine resolves assignee ids against it (assignment requires an active
//! user) and denormalizes task responses from it. Administered over
//! `GET /users` / `PUT /users`.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crewtask_proto::user::{Role, User, UserId, UserSummary};

/// Thread-safe directory of known users.
pub struct UserDirectory {
    users: RwLock<HashMap<UserId, User>>,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts or replaces a user record.
    pub async fn upsert(&self, user: User) {
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user);
    }

    /// Returns the user record for an id, if known.
    pub async fn get(&self, id: &UserId) -> Option<User> {
        let users = self.users.read().await;
        users.get(id).cloned()
    }

    /// Returns `true` if the id names a known user, active or not.
    pub async fn contains(&self, id: &UserId) -> bool {
        let users = self.users.read().await;
        users.contains_key(id)
    }

    /// All known users, sorted by name for stable listings.
    pub async fn all(&self) -> Vec<User> {
        let users = self.users.read().await;
        let mut list: Vec<User> = users.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.as_str().cmp(b.id.as_str())));
        list
    }

    /// Denormalized summary for one id.
    ///
    /// Unknown ids fall back to a bare summary (name = id) so responses
    /// stay renderable when a creator has left the directory.
    pub async fn summary_of(&self, id: &UserId) -> UserSummary {
        let users = self.users.read().await;
        users.get(id).map_or_else(
            || UserSummary {
                id: id.clone(),
                name: id.to_string(),
                role: Role::User,
            },
            User::summary,
        )
    }

    /// Denormalized summaries for a list of ids, in input order.
    pub async fn summaries(&self, ids: &[UserId]) -> Vec<UserSummary> {
        let users = self.users.read().await;
        ids.iter()
            .map(|id| {
                users.get(id).map_or_else(
                    || UserSummary {
                        id: id.clone(),
                        name: id.to_string(),
                        role: Role::User,
                    },
                    User::summary,
                )
            })
            .collect()
    }

    /// Resolves every id to an active user, in input order.
    ///
    /// # Errors
    ///
    /// Returns the first id that is unknown or inactive.
    pub async fn resolve_active(&self, ids: &[UserId]) -> Result<Vec<UserSummary>, UserId> {
        let users = self.users.read().await;
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            match users.get(id) {
                Some(user) if user.active => resolved.push(user.summary()),
                _ => return Err(id.clone()),
            }
        }
        Ok(resolved)
    }
}
