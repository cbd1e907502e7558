//! Authorization policy for tasks.
//!
//! Pure decision functions over `(identity, task)`; no IO, no state. The
//! grants combine by OR: admin gets everything, the creator gets full write
//! and delete, a mere assignee gets read plus a status-only write. Being
//! both creator and assignee never narrows a grant.

use crewtask_proto::task::{Task, TaskField};

use crate::auth::AuthUser;

/// May `user` read `task`?
///
/// True iff the user is an admin, is in the assignee set, or is the creator.
#[must_use]
pub fn can_read(user: &AuthUser, task: &Task) -> bool {
    user.is_admin() || task.assigned_to.contains(&user.id) || task.assigned_by == user.id
}

/// May `user` apply an update touching exactly `fields` to `task`?
///
/// Admins and the creator may edit any field set. An assignee may edit a
/// patch whose field set is exactly `{status}` and nothing more.
#[must_use]
pub fn can_write(user: &AuthUser, task: &Task, fields: &[TaskField]) -> bool {
    if user.is_admin() || task.assigned_by == user.id {
        return true;
    }
    task.assigned_to.contains(&user.id) && matches!(fields, [TaskField::Status])
}

/// May `user` delete `task`? Admin or creator only; the assignee
/// status-write grant does not extend to delete.
#[must_use]
pub fn can_delete(user: &AuthUser, task: &Task) -> bool {
    user.is_admin() || task.assigned_by == user.id
}
