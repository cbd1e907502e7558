//! Leave request workflow: submit, list, review, aggregate.
//!
//! A user files a request; every connected admin is notified; an admin
//! approves or rejects it exactly once; the requester is notified of the
//! verdict. Visibility mirrors tasks: admins see every request, everyone
//! else sees only their own.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crewtask_proto::event::{Notification, ServerEvent};
use crewtask_proto::leave::{
    LeaveDraft, LeaveId, LeaveRequest, LeaveReview, LeaveStats, LeaveStatus,
};
use crewtask_proto::user::Role;

use crate::auth::AuthUser;
use crate::clock;
use crate::error::ApiError;
use crate::notify::Notifier;

/// Leave request store and workflow rules.
pub struct LeaveService {
    requests: RwLock<HashMap<LeaveId, LeaveRequest>>,
    notifier: Notifier,
}

impl LeaveService {
    /// Creates an empty service.
    #[must_use]
    pub fn new(notifier: Notifier) -> Self {
        Self {
            requests: RwLock::new(HashMap::new()),
            notifier,
        }
    }

    /// Files a leave request on behalf of `requester`.
    ///
    /// The request starts pending and every connected admin hears a
    /// `leaveRequested` event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when the reason is empty or the
    /// range is inverted (`endDate < startDate`).
    pub async fn submit(
        &self,
        requester: &AuthUser,
        draft: LeaveDraft,
    ) -> Result<LeaveRequest, ApiError> {
        if draft.reason.trim().is_empty() {
            return Err(ApiError::validation("reason is required"));
        }
        if draft.end_date < draft.start_date {
            return Err(ApiError::validation("endDate must not precede startDate"));
        }
        let request = LeaveRequest {
            id: LeaveId::new(),
            user_id: requester.id.clone(),
            kind: draft.kind,
            start_date: draft.start_date,
            end_date: draft.end_date,
            reason: draft.reason,
            status: LeaveStatus::Pending,
            reviewed_by: None,
            created_at: clock::now_millis(),
        };
        {
            let mut requests = self.requests.write().await;
            requests.insert(request.id, request.clone());
        }
        tracing::info!(leave_id = %request.id, user_id = %requester.id, "leave request filed");
        self.notifier
            .broadcast_role(Role::Admin, &ServerEvent::LeaveRequested(request.clone()))
            .await;
        Ok(request)
    }

    /// Leave requests visible to the requester, most recently filed first.
    pub async fn list_for(&self, requester: &AuthUser) -> Vec<LeaveRequest> {
        let mut visible = self.scoped(requester).await;
        visible.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        visible
    }

    /// Records an admin verdict on a pending request.
    ///
    /// A request is reviewed at most once; the verdict cannot be `pending`.
    /// The requester hears a `leaveReviewed` event with the final record.
    ///
    /// # Errors
    ///
    /// [`ApiError::Forbidden`] for non-admin reviewers,
    /// [`ApiError::NotFound`] for an unknown id, and
    /// [`ApiError::Validation`] for a `pending` verdict or a request that
    /// was already reviewed.
    pub async fn review(
        &self,
        reviewer: &AuthUser,
        id: LeaveId,
        review: LeaveReview,
    ) -> Result<LeaveRequest, ApiError> {
        reviewer.require_admin()?;
        if review.status == LeaveStatus::Pending {
            return Err(ApiError::validation("verdict must be approved or rejected"));
        }
        let reviewed = {
            let mut requests = self.requests.write().await;
            let request = requests
                .get_mut(&id)
                .ok_or_else(|| ApiError::not_found("leave request not found"))?;
            if request.status != LeaveStatus::Pending {
                return Err(ApiError::validation("leave request already reviewed"));
            }
            request.status = review.status;
            request.reviewed_by = Some(reviewer.id.clone());
            request.clone()
        };
        tracing::info!(
            leave_id = %id,
            user_id = %reviewer.id,
            verdict = ?reviewed.status,
            "leave request reviewed"
        );
        self.notifier
            .deliver(&Notification::new(
                reviewed.user_id.clone(),
                ServerEvent::LeaveReviewed(reviewed.clone()),
            ))
            .await;
        Ok(reviewed)
    }

    /// Aggregate counts over the requester's visible requests.
    pub async fn stats_for(&self, requester: &AuthUser) -> LeaveStats {
        let visible = self.scoped(requester).await;
        let mut stats = LeaveStats::default();
        for request in &visible {
            stats.total += 1;
            match request.status {
                LeaveStatus::Pending => stats.pending += 1,
                LeaveStatus::Approved => {
                    stats.approved += 1;
                    stats.days_approved += request.days();
                }
                LeaveStatus::Rejected => stats.rejected += 1,
            }
        }
        stats
    }

    async fn scoped(&self, requester: &AuthUser) -> Vec<LeaveRequest> {
        let requests = self.requests.read().await;
        requests
            .values()
            .filter(|r| requester.is_admin() || r.user_id == requester.id)
            .cloned()
            .collect()
    }
}
