//! In-memory task store.
//!
//! Stands in for a document store behind a narrow find/insert/update/remove
//! API. Mutation is explicit read-modify-write: callers load a snapshot,
//! decide, then submit a [`TaskChange`] delta; the store applies the delta
//! atomically under its write lock. There is no version check, so concurrent
//! updates of the same task resolve last-write-wins, matching the store's
//! native semantics.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crewtask_proto::task::{Priority, Task, TaskId, TaskStatus};
use crewtask_proto::user::UserId;

/// A field-level delta computed by the lifecycle engine.
///
/// `None` fields are untouched; `updated_at` is always applied.
#[derive(Debug, Clone, Default)]
pub struct TaskChange {
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
    /// New due date.
    pub due_date: Option<u64>,
    /// New mutation timestamp.
    pub updated_at: u64,
}

/// Thread-safe in-memory task store.
pub struct TaskStore {
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
        }
    }

    /// Persists a new task.
    pub async fn insert(&self, task: Task) {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task);
    }

    /// Returns a snapshot of the task with the given id.
    pub async fn find(&self, id: &TaskId) -> Option<Task> {
        let tasks = self.tasks.read().await;
        tasks.get(id).cloned()
    }

    /// Applies a delta to the stored record, returning the updated snapshot.
    ///
    /// Returns `None` if the task no longer exists (e.g. concurrently
    /// deleted); the caller surfaces that as not-found.
    pub async fn update(&self, id: &TaskId, change: TaskChange) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(id)?;
        if let Some(title) = change.title {
            task.title = title;
        }
        if let Some(description) = change.description {
            task.description = description;
        }
        if let Some(status) = change.status {
            task.status = status;
        }
        if let Some(priority) = change.priority {
            task.priority = priority;
        }
        if let Some(assigned_to) = change.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(due_date) = change.due_date {
            task.due_date = Some(due_date);
        }
        task.updated_at = change.updated_at;
        Some(task.clone())
    }

    /// Deletes the task, returning the final snapshot if it existed.
    pub async fn remove(&self, id: &TaskId) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        tasks.remove(id)
    }

    /// Every stored task, in no particular order.
    pub async fn all(&self) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        tasks.values().cloned().collect()
    }

    /// Tasks where the user is an assignee or the creator.
    pub async fn visible_to(&self, user_id: &UserId) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        tasks
            .values()
            .filter(|t| t.assigned_to.contains(user_id) || &t.assigned_by == user_id)
            .cloned()
            .collect()
    }

    /// Number of stored tasks.
    pub async fn len(&self) -> usize {
        let tasks = self.tasks.read().await;
        tasks.len()
    }

    /// Returns `true` when no tasks are stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(title: &str, assigned_to: &[&str], assigned_by: &str) -> Task {
        Task {
            id: TaskId::new(),
            title: title.to_owned(),
            description: "desc".to_owned(),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            assigned_to: assigned_to.iter().map(|s| UserId::from(*s)).collect(),
            assigned_by: UserId::from(assigned_by),
            due_date: None,
            created_at: 1_000,
            updated_at: 1_000,
        }
    }

    #[tokio::test]
    async fn insert_and_find_round_trip() {
        let store = TaskStore::new();
        let task = make_task("Ship", &["u1"], "admin");
        let id = task.id;
        store.insert(task.clone()).await;
        assert_eq!(store.find(&id).await, Some(task));
    }

    #[tokio::test]
    async fn find_unknown_returns_none() {
        let store = TaskStore::new();
        assert!(store.find(&TaskId::new()).await.is_none());
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let store = TaskStore::new();
        let task = make_task("Ship", &["u1"], "admin");
        let id = task.id;
        store.insert(task).await;

        let updated = store
            .update(
                &id,
                TaskChange {
                    status: Some(TaskStatus::Done),
                    updated_at: 2_000,
                    ..TaskChange::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.title, "Ship"); // untouched
        assert_eq!(updated.assigned_to, vec![UserId::from("u1")]);
        assert_eq!(updated.updated_at, 2_000);
        assert_eq!(updated.created_at, 1_000);
    }

    #[tokio::test]
    async fn update_replaces_assignee_set() {
        let store = TaskStore::new();
        let task = make_task("Ship", &["a", "b"], "admin");
        let id = task.id;
        store.insert(task).await;

        let updated = store
            .update(
                &id,
                TaskChange {
                    assigned_to: Some(vec![UserId::from("b"), UserId::from("c")]),
                    updated_at: 2_000,
                    ..TaskChange::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(
            updated.assigned_to,
            vec![UserId::from("b"), UserId::from("c")]
        );
    }

    #[tokio::test]
    async fn update_after_remove_returns_none() {
        let store = TaskStore::new();
        let task = make_task("Ship", &["u1"], "admin");
        let id = task.id;
        store.insert(task).await;
        store.remove(&id).await;

        let result = store
            .update(
                &id,
                TaskChange {
                    status: Some(TaskStatus::Done),
                    updated_at: 2_000,
                    ..TaskChange::default()
                },
            )
            .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn remove_returns_final_snapshot() {
        let store = TaskStore::new();
        let task = make_task("Ship", &["u1"], "admin");
        let id = task.id;
        store.insert(task.clone()).await;

        assert_eq!(store.remove(&id).await, Some(task));
        assert!(store.remove(&id).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn visible_to_matches_assignee_or_creator() {
        let store = TaskStore::new();
        store.insert(make_task("a", &["u1"], "admin")).await;
        store.insert(make_task("b", &["u2"], "u1")).await;
        store.insert(make_task("c", &["u3"], "admin")).await;

        let visible = store.visible_to(&UserId::from("u1")).await;
        let titles: Vec<&str> = visible.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(visible.len(), 2);
        assert!(titles.contains(&"a")); // assignee
        assert!(titles.contains(&"b")); // creator

        assert!(store.visible_to(&UserId::from("u9")).await.is_empty());
    }
}
