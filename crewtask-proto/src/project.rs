//! Project records for the CrewTask API.
//!
//! Projects are simple ownership-free records, optionally linked to a team.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::team::TeamId;

/// Unique identifier for a project (UUID v7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Creates a new time-ordered project identifier.
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

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProjectId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Lifecycle state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    /// In progress.
    Active,
    /// Paused.
    OnHold,
    /// Finished.
    Completed,
}

/// A project as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier.
    pub id: ProjectId,
    /// Non-empty name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Owning team, when linked. Must reference an existing team.
    pub team_id: Option<TeamId>,
    /// Lifecycle state.
    pub status: ProjectStatus,
    /// Creation time (milliseconds since epoch, server-set).
    pub created_at: u64,
}

/// Request body for `POST /projects` and `PUT /projects/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    /// Name (required, non-empty).
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Owning team, when linked.
    pub team_id: Option<TeamId>,
    /// Lifecycle state; defaults to `active` when omitted.
    pub status: Option<ProjectStatus>,
}
