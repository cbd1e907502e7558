//! Server-push events for the CrewTask real-time channel.
//!
//! Defines the [`ServerEvent`] envelope that is JSON-encoded and sent over
//! WebSocket text frames, and the [`Notification`] pairing of an event with
//! its target user. Notifications are ephemeral: produced while handling one
//! mutation, delivered best-effort, never stored.

use serde::{Deserialize, Serialize};

use crate::leave::LeaveRequest;
use crate::task::{TaskId, TaskView};
use crate::user::UserId;

/// Deletion marker payload: the only thing a deleted task leaves behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRef {
    /// Id of the deleted task.
    pub task_id: TaskId,
}

/// An event pushed to connected clients.
///
/// Serialized as `{"event": "<name>", "payload": <body>}`. Task events carry
/// the full post-mutation task (or a [`TaskRef`] for deletions); leave
/// events carry the full request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A task was created. Sent to the creator.
    TaskCreated(TaskView),
    /// The recipient was added to a task's assignee set.
    TaskAssigned(TaskView),
    /// A task the recipient is involved with was mutated.
    TaskUpdated(TaskView),
    /// A task the recipient was involved with was deleted.
    TaskDeleted(TaskRef),
    /// A leave request was filed. Sent to the admin role group.
    LeaveRequested(LeaveRequest),
    /// The recipient's leave request was approved or rejected.
    LeaveReviewed(LeaveRequest),
}

impl ServerEvent {
    /// Returns the wire name of this event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TaskCreated(_) => "taskCreated",
            Self::TaskAssigned(_) => "taskAssigned",
            Self::TaskUpdated(_) => "taskUpdated",
            Self::TaskDeleted(_) => "taskDeleted",
            Self::LeaveRequested(_) => "leaveRequested",
            Self::LeaveReviewed(_) => "leaveReviewed",
        }
    }
}

/// A single delivery: one event addressed to one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// The user whose live connections should receive the event.
    pub target: UserId,
    /// The event to deliver.
    pub event: ServerEvent,
}

impl Notification {
    /// Creates a notification for the given target.
    #[must_use]
    pub const fn new(target: UserId, event: ServerEvent) -> Self {
        Self { target, event }
    }
}

/// Encodes a [`ServerEvent`] as a JSON text frame.
///
/// # Errors
///
/// Returns an error string if serialization fails.
pub fn encode(event: &ServerEvent) -> Result<String, String> {
    serde_json::to_string(event).map_err(|e| format!("event encode error: {e}"))
}

/// Decodes a [`ServerEvent`] from a JSON text frame.
///
/// # Errors
///
/// Returns an error string if deserialization fails.
pub fn decode(text: &str) -> Result<ServerEvent, String> {
    serde_json::from_str(text).map_err(|e| format!("event decode error: {e}"))
}
