//! Task model for the CrewTask API.
//!
//! A task carries a flat status machine; every transition between any two
//! statuses is legal, because movement is governed by authorization rather
//! than sequencing. Storage keeps assignee and creator ids; responses embed
//! denormalized [`UserSummary`] values via [`TaskView`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::{UserId, UserSummary};

/// Unique identifier for a task, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
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

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not started.
    #[serde(rename = "todo")]
    Todo,
    /// Actively being worked on.
    #[serde(rename = "in-progress")]
    InProgress,
    /// Awaiting review.
    #[serde(rename = "review")]
    Review,
    /// Completed.
    #[serde(rename = "done")]
    Done,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Todo => write!(f, "todo"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Review => write!(f, "review"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Priority of a task. Defaults to [`Priority::Medium`] at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority (the creation default).
    Medium,
    /// High priority.
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// A task as persisted in the task store.
///
/// Invariants: `assigned_to` is non-empty at creation and every id in it
/// referenced an active user at assignment time; `assigned_by` is immutable
/// after creation; timestamps are server-set milliseconds since the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Current status.
    pub status: TaskStatus,
    /// Current priority.
    pub priority: Priority,
    /// Ids of the currently assigned users.
    pub assigned_to: Vec<UserId>,
    /// Id of the creator. Immutable after creation.
    pub assigned_by: UserId,
    /// Optional due date (milliseconds since epoch).
    pub due_date: Option<u64>,
    /// Creation time (milliseconds since epoch, server-set).
    pub created_at: u64,
    /// Last mutation time (milliseconds since epoch, server-set).
    pub updated_at: u64,
}

impl Task {
    /// Returns `true` if the task is past its due date and not done.
    #[must_use]
    pub fn is_overdue(&self, now: u64) -> bool {
        self.status != TaskStatus::Done && self.due_date.is_some_and(|due| due < now)
    }
}

/// A task response with assignee and creator identities resolved.
///
/// Denormalized for responses only; storage keeps ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    /// Unique task identifier.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Current status.
    pub status: TaskStatus,
    /// Current priority.
    pub priority: Priority,
    /// Resolved assignee identities.
    pub assigned_to: Vec<UserSummary>,
    /// Resolved creator identity.
    pub assigned_by: UserSummary,
    /// Optional due date (milliseconds since epoch).
    pub due_date: Option<u64>,
    /// Creation time.
    pub created_at: u64,
    /// Last mutation time.
    pub updated_at: u64,
}

/// Request body for `POST /tasks`.
///
/// Missing string fields deserialize to empty and are rejected during
/// validation, so a malformed body surfaces as a 400 rather than a
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Title (required, non-empty).
    #[serde(default)]
    pub title: String,
    /// Description (required, non-empty).
    #[serde(default)]
    pub description: String,
    /// Initial status; defaults to `todo` when omitted.
    pub status: Option<TaskStatus>,
    /// Initial priority; defaults to `medium` when omitted.
    pub priority: Option<Priority>,
    /// Ids of the users to assign (required, non-empty, all active).
    #[serde(default)]
    pub assigned_to: Vec<UserId>,
    /// Optional due date (milliseconds since epoch).
    pub due_date: Option<u64>,
}

/// A patchable task field, used to evaluate write permission against the
/// exact set of fields present in an update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    /// `title`
    Title,
    /// `description`
    Description,
    /// `status`
    Status,
    /// `priority`
    Priority,
    /// `assignedTo`
    AssignedTo,
    /// `dueDate`
    DueDate,
}

/// Request body for `PUT /tasks/{id}`.
///
/// Partial-update semantics: absent fields are untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New status.
    pub status: Option<TaskStatus>,
    /// New priority.
    pub priority: Option<Priority>,
    /// Replacement assignee set.
    pub assigned_to: Option<Vec<UserId>>,
    /// New due date (milliseconds since epoch).
    pub due_date: Option<u64>,
}

impl TaskPatch {
    /// Returns the exact set of fields present in this patch.
    #[must_use]
    pub fn fields(&self) -> Vec<TaskField> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push(TaskField::Title);
        }
        if self.description.is_some() {
            fields.push(TaskField::Description);
        }
        if self.status.is_some() {
            fields.push(TaskField::Status);
        }
        if self.priority.is_some() {
            fields.push(TaskField::Priority);
        }
        if self.assigned_to.is_some() {
            fields.push(TaskField::AssignedTo);
        }
        if self.due_date.is_some() {
            fields.push(TaskField::DueDate);
        }
        fields
    }

    /// Returns `true` when no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}

/// Aggregate task counts for `GET /tasks/stats`, scoped to the requester's
/// visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    /// Visible tasks in total.
    pub total: u64,
    /// Tasks with status `todo`.
    pub todo: u64,
    /// Tasks with status `in-progress`.
    pub in_progress: u64,
    /// Tasks with status `review`.
    pub review: u64,
    /// Tasks with status `done`.
    pub done: u64,
    /// Tasks not done whose due date is in the past.
    pub overdue: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_display_is_uuid() {
        let id = TaskId::new();
        let display = id.to_string();
        assert_eq!(display.len(), 36);
        assert!(display.contains('-'));
    }

    #[test]
    fn task_id_parses_its_own_display() {
        let id = TaskId::new();
        let parsed: TaskId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn malformed_task_id_rejected() {
        let result: Result<TaskId, _> = "not-a-uuid".parse();
        assert!(result.is_err());
    }

    #[test]
    fn status_serde_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let status: TaskStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(status, TaskStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&TaskStatus::Todo).unwrap(),
            "\"todo\""
        );
    }

    #[test]
    fn unknown_status_rejected() {
        let result: Result<TaskStatus, _> = serde_json::from_str("\"archived\"");
        assert!(result.is_err());
    }

    fn make_task() -> Task {
        Task {
            id: TaskId::new(),
            title: "Ship".to_owned(),
            description: "v1".to_owned(),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            assigned_to: vec![UserId::from("u1")],
            assigned_by: UserId::from("admin-1"),
            due_date: None,
            created_at: 1_000,
            updated_at: 1_000,
        }
    }

    #[test]
    fn overdue_requires_past_due_date_and_open_status() {
        let mut task = make_task();
        assert!(!task.is_overdue(5_000));

        task.due_date = Some(4_000);
        assert!(task.is_overdue(5_000));
        assert!(!task.is_overdue(3_000));

        task.status = TaskStatus::Done;
        assert!(!task.is_overdue(5_000));
    }

    #[test]
    fn patch_reports_exact_field_set() {
        let patch = TaskPatch {
            status: Some(TaskStatus::Done),
            ..TaskPatch::default()
        };
        assert_eq!(patch.fields(), vec![TaskField::Status]);

        let patch = TaskPatch {
            status: Some(TaskStatus::Done),
            priority: Some(Priority::High),
            ..TaskPatch::default()
        };
        assert_eq!(
            patch.fields(),
            vec![TaskField::Status, TaskField::Priority]
        );

        assert!(TaskPatch::default().is_empty());
    }

    #[test]
    fn patch_deserializes_partial_body() {
        let patch: TaskPatch = serde_json::from_str(r#"{"status":"done"}"#).unwrap();
        assert_eq!(patch.status, Some(TaskStatus::Done));
        assert!(patch.title.is_none());
        assert_eq!(patch.fields(), vec![TaskField::Status]);
    }

    #[test]
    fn draft_tolerates_missing_strings() {
        let draft: TaskDraft = serde_json::from_str(r#"{"assignedTo":["u1"]}"#).unwrap();
        assert!(draft.title.is_empty());
        assert!(draft.description.is_empty());
        assert_eq!(draft.assigned_to, vec![UserId::from("u1")]);
    }

    #[test]
    fn task_json_uses_camel_case_keys() {
        let task = make_task();
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("assignedTo").is_some());
        assert!(value.get("assignedBy").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("assigned_to").is_none());
    }
}
