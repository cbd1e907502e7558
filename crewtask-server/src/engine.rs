//! Task lifecycle engine.
//!
//! Every mutation follows the same sequence: load a snapshot, authorize
//! against the exact requested field set, validate referenced users, submit
//! a delta to the store, then hand the computed notification batch to the
//! injected [`Notifier`]. The engine decides *who* hears about a mutation;
//! delivery mechanics live in the fan-out. Concurrent mutations of the same
//! task resolve last-write-wins; the store applies each delta atomically
//! but the decide-then-write sequence is deliberately unfenced.

use std::sync::Arc;

use crewtask_proto::event::{Notification, ServerEvent, TaskRef};
use crewtask_proto::task::{
    Priority, Task, TaskDraft, TaskId, TaskPatch, TaskStats, TaskStatus, TaskView,
};
use crewtask_proto::user::UserId;

use crate::auth::AuthUser;
use crate::clock;
use crate::directory::UserDirectory;
use crate::error::ApiError;
use crate::notify::Notifier;
use crate::policy;
use crate::store::{TaskChange, TaskStore};

/// Validates and applies task mutations, and computes who must hear about
/// each one.
pub struct TaskEngine {
    store: Arc<TaskStore>,
    directory: Arc<UserDirectory>,
    notifier: Notifier,
}

impl TaskEngine {
    /// Creates an engine over its collaborators.
    #[must_use]
    pub fn new(store: Arc<TaskStore>, directory: Arc<UserDirectory>, notifier: Notifier) -> Self {
        Self {
            store,
            directory,
            notifier,
        }
    }

    /// Creates a task on behalf of `creator`.
    ///
    /// Defaults status to `todo` and priority to `medium` when unset.
    /// Emits `taskAssigned` to every assignee and `taskCreated` to the
    /// creator; a self-assigned creator receives both.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when the title or description is
    /// empty, the assignee list is empty, or any assignee is not an active
    /// directory user. Nothing is persisted on failure.
    pub async fn create(&self, creator: &AuthUser, draft: TaskDraft) -> Result<TaskView, ApiError> {
        if draft.title.trim().is_empty() {
            return Err(ApiError::validation("title is required"));
        }
        if draft.description.trim().is_empty() {
            return Err(ApiError::validation("description is required"));
        }
        let assignees = dedup_ids(draft.assigned_to);
        if assignees.is_empty() {
            return Err(ApiError::validation("assignedTo must name at least one user"));
        }
        self.directory
            .resolve_active(&assignees)
            .await
            .map_err(|id| ApiError::validation(format!("assignee {id} is not an active user")))?;

        let now = clock::now_millis();
        let task = Task {
            id: TaskId::new(),
            title: draft.title,
            description: draft.description,
            status: draft.status.unwrap_or(TaskStatus::Todo),
            priority: draft.priority.unwrap_or(Priority::Medium),
            assigned_to: assignees.clone(),
            assigned_by: creator.id.clone(),
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        };
        self.store.insert(task.clone()).await;
        tracing::info!(task_id = %task.id, user_id = %creator.id, "task created");

        let view = self.view(task).await;
        let mut batch: Vec<Notification> = assignees
            .into_iter()
            .map(|id| Notification::new(id, ServerEvent::TaskAssigned(view.clone())))
            .collect();
        batch.push(Notification::new(
            creator.id.clone(),
            ServerEvent::TaskCreated(view.clone()),
        ));
        self.notifier.deliver_all(&batch).await;
        Ok(view)
    }

    /// Returns one task. A pure read with no side effects.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the id does not resolve and
    /// [`ApiError::Forbidden`] unless the requester may read the task.
    pub async fn get(&self, requester: &AuthUser, id: TaskId) -> Result<TaskView, ApiError> {
        let task = self
            .store
            .find(&id)
            .await
            .ok_or_else(|| ApiError::not_found("task not found"))?;
        if !policy::can_read(requester, &task) {
            return Err(ApiError::forbidden("not allowed to view this task"));
        }
        Ok(self.view(task).await)
    }

    /// Applies a partial update.
    ///
    /// Write permission is evaluated against the exact set of fields
    /// present in the patch. Emits `taskUpdated` to every pre-update
    /// assignee, the creator, and (for admin requesters) the requester;
    /// newly added assignees receive `taskAssigned` instead of joining the
    /// updated group.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] for an empty patch or an assignee that is
    /// not active; [`ApiError::NotFound`] when the task is absent, including
    /// when it vanishes between authorize and apply; [`ApiError::Forbidden`]
    /// per [`policy::can_write`].
    pub async fn update(
        &self,
        requester: &AuthUser,
        id: TaskId,
        patch: TaskPatch,
    ) -> Result<TaskView, ApiError> {
        let fields = patch.fields();
        if fields.is_empty() {
            return Err(ApiError::validation("no fields to update"));
        }
        let current = self
            .store
            .find(&id)
            .await
            .ok_or_else(|| ApiError::not_found("task not found"))?;
        if !policy::can_write(requester, &current, &fields) {
            return Err(ApiError::forbidden("not allowed to edit this task"));
        }

        let new_assignees = match patch.assigned_to {
            Some(ids) => {
                let ids = dedup_ids(ids);
                self.directory.resolve_active(&ids).await.map_err(|id| {
                    ApiError::validation(format!("assignee {id} is not an active user"))
                })?;
                Some(ids)
            }
            None => None,
        };

        let pre_set = current.assigned_to.clone();
        let change = TaskChange {
            title: patch.title,
            description: patch.description,
            status: patch.status,
            priority: patch.priority,
            assigned_to: new_assignees,
            due_date: patch.due_date,
            updated_at: clock::now_millis(),
        };
        // A concurrent delete between find and update surfaces here.
        let updated = self
            .store
            .update(&id, change)
            .await
            .ok_or_else(|| ApiError::not_found("task not found"))?;
        tracing::info!(task_id = %id, user_id = %requester.id, "task updated");

        let view = self.view(updated.clone()).await;
        let mut updated_targets = pre_set.clone();
        push_unique(&mut updated_targets, updated.assigned_by.clone());
        if requester.is_admin() {
            push_unique(&mut updated_targets, requester.id.clone());
        }
        let mut batch: Vec<Notification> = updated_targets
            .into_iter()
            .map(|id| Notification::new(id, ServerEvent::TaskUpdated(view.clone())))
            .collect();
        for added in updated.assigned_to.iter().filter(|id| !pre_set.contains(id)) {
            batch.push(Notification::new(
                added.clone(),
                ServerEvent::TaskAssigned(view.clone()),
            ));
        }
        self.notifier.deliver_all(&batch).await;
        Ok(view)
    }

    /// Deletes a task.
    ///
    /// Emits `taskDeleted` with a `{taskId}` marker to every pre-deletion
    /// assignee, the creator, and (for admin requesters) the requester.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] when absent (including a concurrent delete);
    /// [`ApiError::Forbidden`] unless the requester is admin or creator.
    pub async fn delete(&self, requester: &AuthUser, id: TaskId) -> Result<TaskId, ApiError> {
        let task = self
            .store
            .find(&id)
            .await
            .ok_or_else(|| ApiError::not_found("task not found"))?;
        if !policy::can_delete(requester, &task) {
            return Err(ApiError::forbidden("not allowed to delete this task"));
        }
        let removed = self
            .store
            .remove(&id)
            .await
            .ok_or_else(|| ApiError::not_found("task not found"))?;
        tracing::info!(task_id = %id, user_id = %requester.id, "task deleted");

        let mut targets = removed.assigned_to;
        push_unique(&mut targets, removed.assigned_by);
        if requester.is_admin() {
            push_unique(&mut targets, requester.id.clone());
        }
        let batch: Vec<Notification> = targets
            .into_iter()
            .map(|target| {
                Notification::new(target, ServerEvent::TaskDeleted(TaskRef { task_id: id }))
            })
            .collect();
        self.notifier.deliver_all(&batch).await;
        Ok(id)
    }

    /// Tasks visible to the requester, most recently created first.
    ///
    /// Admins see everything; everyone else sees tasks they are assigned
    /// to or created.
    pub async fn list_for(&self, requester: &AuthUser) -> Vec<TaskView> {
        let mut tasks = self.scoped(requester).await;
        tasks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        let mut views = Vec::with_capacity(tasks.len());
        for task in tasks {
            views.push(self.view(task).await);
        }
        views
    }

    /// Per-status counts plus overdue, over the same scope as
    /// [`Self::list_for`].
    pub async fn stats(&self, requester: &AuthUser) -> TaskStats {
        let tasks = self.scoped(requester).await;
        let now = clock::now_millis();
        let mut stats = TaskStats::default();
        for task in &tasks {
            stats.total += 1;
            match task.status {
                TaskStatus::Todo => stats.todo += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Review => stats.review += 1,
                TaskStatus::Done => stats.done += 1,
            }
            if task.is_overdue(now) {
                stats.overdue += 1;
            }
        }
        stats
    }

    async fn scoped(&self, requester: &AuthUser) -> Vec<Task> {
        if requester.is_admin() {
            self.store.all().await
        } else {
            self.store.visible_to(&requester.id).await
        }
    }

    /// Denormalizes a stored task for responses and push payloads.
    async fn view(&self, task: Task) -> TaskView {
        let assigned_to = self.directory.summaries(&task.assigned_to).await;
        let assigned_by = self.directory.summary_of(&task.assigned_by).await;
        TaskView {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            assigned_to,
            assigned_by,
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Removes duplicate ids, keeping first occurrence order.
fn dedup_ids(ids: Vec<UserId>) -> Vec<UserId> {
    let mut out: Vec<UserId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

fn push_unique(targets: &mut Vec<UserId>, id: UserId) {
    if !targets.contains(&id) {
        targets.push(id);
    }
}
