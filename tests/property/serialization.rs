//! Property-based serialization round-trip tests for the push-event wire
//! format.
//!
//! Uses proptest to verify:
//! 1. Any valid `ServerEvent` survives encode → decode round-trip.
//! 2. Random text never causes a panic in `decode` (returns `Err` or a
//!    valid event, gracefully).
//! 3. Status/priority strings on the wire stay within the closed sets.

// Test-specific lint overrides: property tests use unwrap freely.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use crewtask_proto::event::{self, ServerEvent, TaskRef};
use crewtask_proto::leave::{LeaveId, LeaveKind, LeaveRequest, LeaveStatus};
use crewtask_proto::task::{Priority, TaskId, TaskStatus, TaskView};
use crewtask_proto::user::{Role, UserId, UserSummary};
use uuid::Uuid;

// --- Strategies for protocol types ---

/// Strategy for generating arbitrary `TaskId` values.
fn arb_task_id() -> impl Strategy<Value = TaskId> {
    any::<u128>().prop_map(|n| TaskId::from_uuid(Uuid::from_u128(n)))
}

/// Strategy for generating arbitrary `UserId` values.
fn arb_user_id() -> impl Strategy<Value = UserId> {
    "[a-z0-9-]{1,24}".prop_map(UserId::new)
}

/// Strategy for generating arbitrary roles.
fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Admin), Just(Role::User)]
}

/// Strategy for generating arbitrary task statuses.
fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Todo),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Review),
        Just(TaskStatus::Done),
    ]
}

/// Strategy for generating arbitrary priorities.
fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
    ]
}

/// Strategy for generating arbitrary user summaries.
fn arb_summary() -> impl Strategy<Value = UserSummary> {
    (arb_user_id(), "[^\x00]{0,32}", arb_role()).prop_map(|(id, name, role)| UserSummary {
        id,
        name,
        role,
    })
}

/// Strategy for generating arbitrary task views.
fn arb_task_view() -> impl Strategy<Value = TaskView> {
    (
        arb_task_id(),
        "[^\x00]{1,64}",
        "[^\x00]{0,128}",
        arb_status(),
        arb_priority(),
        prop::collection::vec(arb_summary(), 0..4),
        arb_summary(),
        prop::option::of(any::<u64>()),
        any::<u64>(),
        any::<u64>(),
    )
        .prop_map(
            |(
                id,
                title,
                description,
                status,
                priority,
                assigned_to,
                assigned_by,
                due_date,
                created_at,
                updated_at,
            )| TaskView {
                id,
                title,
                description,
                status,
                priority,
                assigned_to,
                assigned_by,
                due_date,
                created_at,
                updated_at,
            },
        )
}

/// Strategy for generating arbitrary leave requests.
fn arb_leave() -> impl Strategy<Value = LeaveRequest> {
    (
        any::<u128>(),
        arb_user_id(),
        prop_oneof![
            Just(LeaveKind::Vacation),
            Just(LeaveKind::Sick),
            Just(LeaveKind::Personal),
            Just(LeaveKind::Unpaid),
        ],
        any::<u64>(),
        any::<u64>(),
        "[^\x00]{1,64}",
        prop_oneof![
            Just(LeaveStatus::Pending),
            Just(LeaveStatus::Approved),
            Just(LeaveStatus::Rejected),
        ],
        prop::option::of(arb_user_id()),
        any::<u64>(),
    )
        .prop_map(
            |(raw_id, user_id, kind, a, b, reason, status, reviewed_by, created_at)| {
                LeaveRequest {
                    id: LeaveId::from_uuid(Uuid::from_u128(raw_id)),
                    user_id,
                    kind,
                    start_date: a.min(b),
                    end_date: a.max(b),
                    reason,
                    status,
                    reviewed_by,
                    created_at,
                }
            },
        )
}

/// Strategy for generating arbitrary server events.
fn arb_event() -> impl Strategy<Value = ServerEvent> {
    prop_oneof![
        arb_task_view().prop_map(ServerEvent::TaskCreated),
        arb_task_view().prop_map(ServerEvent::TaskAssigned),
        arb_task_view().prop_map(ServerEvent::TaskUpdated),
        arb_task_id().prop_map(|task_id| ServerEvent::TaskDeleted(TaskRef { task_id })),
        arb_leave().prop_map(ServerEvent::LeaveRequested),
        arb_leave().prop_map(ServerEvent::LeaveReviewed),
    ]
}

proptest! {
    #[test]
    fn event_round_trip(event in arb_event()) {
        let text = event::encode(&event).unwrap();
        let decoded = event::decode(&text).unwrap();
        prop_assert_eq!(decoded, event);
    }

    #[test]
    fn decode_never_panics(text in "\\PC*") {
        let _ = event::decode(&text);
    }

    #[test]
    fn wire_tag_matches_event_name(event in arb_event()) {
        let text = event::encode(&event).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(value["event"].as_str(), Some(event.name()));
    }

    #[test]
    fn status_wire_strings_stay_closed(status in arb_status()) {
        let text = serde_json::to_string(&status).unwrap();
        prop_assert!(matches!(
            text.as_str(),
            "\"todo\"" | "\"in-progress\"" | "\"review\"" | "\"done\""
        ));
    }
}
