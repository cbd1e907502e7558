//! Property-based tests for the task authorization policy.
//!
//! Uses proptest to verify:
//! 1. `can_read` is exactly the admin-or-assignee-or-creator disjunction.
//! 2. A non-admin, non-creator assignee may write iff the patch touches
//!    exactly the status field.
//! 3. Admins hold every grant regardless of task shape.
//! 4. Any write grant implies the read grant.

use proptest::prelude::*;

use crewtask_proto::task::{Priority, Task, TaskField, TaskId, TaskStatus};
use crewtask_proto::user::{Role, UserId};
use crewtask_server::auth::AuthUser;
use crewtask_server::policy;
use uuid::Uuid;

/// Small id pool so membership collisions actually happen.
fn arb_user_id() -> impl Strategy<Value = UserId> {
    (0u8..6).prop_map(|n| UserId::from(format!("u{n}")))
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Admin), Just(Role::User)]
}

fn arb_field() -> impl Strategy<Value = TaskField> {
    prop_oneof![
        Just(TaskField::Title),
        Just(TaskField::Description),
        Just(TaskField::Status),
        Just(TaskField::Priority),
        Just(TaskField::AssignedTo),
        Just(TaskField::DueDate),
    ]
}

fn arb_task() -> impl Strategy<Value = Task> {
    (
        any::<u128>(),
        prop::collection::vec(arb_user_id(), 0..4),
        arb_user_id(),
    )
        .prop_map(|(raw_id, assigned_to, assigned_by)| Task {
            id: TaskId::from_uuid(Uuid::from_u128(raw_id)),
            title: "t".to_owned(),
            description: "d".to_owned(),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            assigned_to,
            assigned_by,
            due_date: None,
            created_at: 0,
            updated_at: 0,
        })
}

fn arb_auth_user() -> impl Strategy<Value = AuthUser> {
    (arb_user_id(), arb_role()).prop_map(|(id, role)| AuthUser { id, role })
}

proptest! {
    /// Read access is exactly the three-way disjunction.
    #[test]
    fn read_is_admin_or_assignee_or_creator(
        user in arb_auth_user(),
        task in arb_task(),
    ) {
        let expected = user.is_admin()
            || task.assigned_to.contains(&user.id)
            || task.assigned_by == user.id;
        prop_assert_eq!(policy::can_read(&user, &task), expected);
    }

    /// A plain assignee's write grant is status-only, for any field set.
    #[test]
    fn plain_assignee_write_is_status_only(
        id in arb_user_id(),
        mut task in arb_task(),
        fields in prop::collection::vec(arb_field(), 0..6),
    ) {
        // Force the identity into exactly the assignee position.
        if !task.assigned_to.contains(&id) {
            task.assigned_to.push(id.clone());
        }
        prop_assume!(task.assigned_by != id);
        let user = AuthUser { id, role: Role::User };

        let expected = matches!(fields.as_slice(), [TaskField::Status]);
        prop_assert_eq!(policy::can_write(&user, &task, &fields), expected);
    }

    /// Admins hold every grant on every task.
    #[test]
    fn admin_holds_every_grant(
        id in arb_user_id(),
        task in arb_task(),
        fields in prop::collection::vec(arb_field(), 0..6),
    ) {
        let user = AuthUser { id, role: Role::Admin };
        prop_assert!(policy::can_read(&user, &task));
        prop_assert!(policy::can_write(&user, &task, &fields));
        prop_assert!(policy::can_delete(&user, &task));
    }

    /// Whoever may write (or delete) may also read.
    #[test]
    fn write_and_delete_imply_read(
        user in arb_auth_user(),
        task in arb_task(),
        fields in prop::collection::vec(arb_field(), 0..6),
    ) {
        if policy::can_write(&user, &task, &fields) || policy::can_delete(&user, &task) {
            prop_assert!(policy::can_read(&user, &task));
        }
    }
}
