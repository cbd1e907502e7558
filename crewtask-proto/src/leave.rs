//! Leave request model for the CrewTask API.
//!
//! Leave requests are simple records: a user asks for a date range, an
//! admin approves or rejects it. Date math stays at day granularity over
//! millisecond timestamps.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::UserId;

/// Milliseconds in one day, used for inclusive day counts.
const DAY_MILLIS: u64 = 24 * 60 * 60 * 1000;

/// Unique identifier for a leave request (UUID v7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaveId(Uuid);

impl LeaveId {
    /// Creates a new time-ordered leave identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `LeaveId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LeaveId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LeaveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for LeaveId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Review state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    /// Awaiting admin review.
    Pending,
    /// Approved by an admin.
    Approved,
    /// Rejected by an admin.
    Rejected,
}

/// Category of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveKind {
    /// Planned vacation.
    Vacation,
    /// Sick leave.
    Sick,
    /// Personal leave.
    Personal,
    /// Unpaid leave.
    Unpaid,
}

/// A leave request as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    /// Unique identifier.
    pub id: LeaveId,
    /// The requesting user.
    pub user_id: UserId,
    /// Category.
    pub kind: LeaveKind,
    /// First day of leave (milliseconds since epoch, `<= end_date`).
    pub start_date: u64,
    /// Last day of leave (milliseconds since epoch).
    pub end_date: u64,
    /// Non-empty justification.
    pub reason: String,
    /// Review state; created as [`LeaveStatus::Pending`].
    pub status: LeaveStatus,
    /// Admin who reviewed the request, once reviewed.
    pub reviewed_by: Option<UserId>,
    /// Creation time (milliseconds since epoch, server-set).
    pub created_at: u64,
}

impl LeaveRequest {
    /// Number of days requested, inclusive of both endpoints.
    #[must_use]
    pub const fn days(&self) -> u64 {
        self.end_date.saturating_sub(self.start_date) / DAY_MILLIS + 1
    }
}

/// Request body for `POST /leaves`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveDraft {
    /// Category.
    pub kind: LeaveKind,
    /// First day of leave.
    pub start_date: u64,
    /// Last day of leave.
    pub end_date: u64,
    /// Justification (required, non-empty).
    #[serde(default)]
    pub reason: String,
}

/// Request body for `PUT /leaves/{id}/status`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LeaveReview {
    /// The verdict: approved or rejected.
    pub status: LeaveStatus,
}

/// Aggregate leave counts for `GET /leaves/stats`, scoped to the
/// requester's visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveStats {
    /// Visible requests in total.
    pub total: u64,
    /// Requests awaiting review.
    pub pending: u64,
    /// Approved requests.
    pub approved: u64,
    /// Rejected requests.
    pub rejected: u64,
    /// Total days across approved requests.
    pub days_approved: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_leave(start: u64, end: u64) -> LeaveRequest {
        LeaveRequest {
            id: LeaveId::new(),
            user_id: UserId::from("u1"),
            kind: LeaveKind::Vacation,
            start_date: start,
            end_date: end,
            reason: "summer break".to_owned(),
            status: LeaveStatus::Pending,
            reviewed_by: None,
            created_at: 1_000,
        }
    }

    #[test]
    fn day_count_is_inclusive() {
        assert_eq!(make_leave(0, 0).days(), 1);
        assert_eq!(make_leave(0, DAY_MILLIS).days(), 2);
        assert_eq!(make_leave(0, 6 * DAY_MILLIS).days(), 7);
    }

    #[test]
    fn partial_day_ranges_round_down() {
        assert_eq!(make_leave(0, DAY_MILLIS - 1).days(), 1);
        assert_eq!(make_leave(0, DAY_MILLIS + 1).days(), 2);
    }

    #[test]
    fn status_serde_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&LeaveStatus::Pending).unwrap(),
            "\"pending\""
        );
        let status: LeaveStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(status, LeaveStatus::Rejected);
    }

    #[test]
    fn leave_json_uses_camel_case_keys() {
        let value = serde_json::to_value(make_leave(0, 0)).unwrap();
        assert!(value.get("userId").is_some());
        assert!(value.get("startDate").is_some());
        assert!(value.get("reviewedBy").is_some());
    }
}
