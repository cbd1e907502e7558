//! Team records for the CrewTask API.
//!
//! Teams are simple ownership-free records: a name, a description, and a
//! member list. They carry no authorization weight of their own.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::UserId;

/// Unique identifier for a team (UUID v7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(Uuid);

impl TeamId {
    /// Creates a new time-ordered team identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TeamId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TeamId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A team as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Unique identifier.
    pub id: TeamId,
    /// Non-empty name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Member user ids. Must resolve to known directory users.
    pub members: Vec<UserId>,
    /// Creation time (milliseconds since epoch, server-set).
    pub created_at: u64,
}

/// Request body for `POST /teams` and `PUT /teams/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDraft {
    /// Name (required, non-empty).
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Member user ids.
    #[serde(default)]
    pub members: Vec<UserId>,
}
