//! User identity types for the CrewTask API.
//!
//! User records live in the identity provider's directory; the API only
//! carries the subset needed for authorization decisions and for
//! denormalized task responses.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a user, issued by the identity provider.
///
/// Compared by value only: the server never interprets its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a user id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role attached to every authenticated identity.
///
/// A closed enum: requests carrying any other role string are rejected at
/// token verification, not defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to every resource and mutation.
    Admin,
    /// Access scoped to the user's own tasks, leaves, and memberships.
    User,
}

impl Role {
    /// Returns `true` for [`Role::Admin`].
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

/// A user as known to the directory.
///
/// Only active users may be the target of a task assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity-provider id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Authorization role.
    pub role: Role,
    /// Whether the user may be assigned work.
    pub active: bool,
}

impl User {
    /// Returns the denormalized shape embedded in task responses.
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// Denormalized user shape embedded in task responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Identity-provider id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Authorization role.
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert!(role.is_admin());
    }

    #[test]
    fn unknown_role_rejected() {
        let result: Result<Role, _> = serde_json::from_str("\"superuser\"");
        assert!(result.is_err());
    }

    #[test]
    fn user_ids_compare_by_value() {
        assert_eq!(UserId::from("u1"), UserId::new("u1".to_string()));
        assert_ne!(UserId::from("u1"), UserId::from("u2"));
    }

    #[test]
    fn summary_copies_identity_fields() {
        let user = User {
            id: UserId::from("u1"),
            name: "Alice".to_owned(),
            role: Role::User,
            active: true,
        };
        let summary = user.summary();
        assert_eq!(summary.id, user.id);
        assert_eq!(summary.name, "Alice");
        assert_eq!(summary.role, Role::User);
    }
}
