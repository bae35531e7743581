//! Vote reconciliation use-case.
//!
//! # Invariants
//! - Voting requires a signed-in session.
//! - The store applies the decision atomically; the service never adjusts
//!   counters itself. Callers re-fetch to see new totals.

use crate::model::session::Session;
use crate::model::vote::{VoteDirection, VoteOutcome, VoteTarget};
use crate::repo::vote_repo::VoteRepository;
use crate::service::{require_user, ServiceError, ServiceResult};
use log::{info, warn};
use std::time::Instant;

/// Applies vote toggles for the signed-in user.
pub struct VoteReconciler<V: VoteRepository> {
    repo: V,
}

impl<V: VoteRepository> VoteReconciler<V> {
    pub fn new(repo: V) -> Self {
        Self { repo }
    }

    /// Inserts, flips or removes the caller's vote on `target`.
    ///
    /// # Errors
    /// - [`ServiceError::Unauthorized`] for anonymous sessions.
    /// - [`ServiceError::QuestionNotFound`] / [`ServiceError::AnswerNotFound`]
    ///   when the target does not exist.
    /// - [`ServiceError::StoreUnavailable`] when the store call fails; no
    ///   partial mutation is committed in that case.
    pub fn reconcile(
        &self,
        session: &Session,
        target: VoteTarget,
        direction: VoteDirection,
    ) -> ServiceResult<VoteOutcome> {
        let user_id = require_user(session)?;
        let started_at = Instant::now();

        match self.repo.reconcile_vote(user_id, target, direction) {
            Ok(outcome) => {
                info!(
                    "event=vote_reconcile module=service status=ok target_kind={} outcome={} duration_ms={}",
                    target.kind_label(),
                    outcome,
                    started_at.elapsed().as_millis()
                );
                Ok(outcome)
            }
            Err(err) => {
                let err = ServiceError::from(err);
                warn!(
                    "event=vote_reconcile module=service status=error target_kind={} duration_ms={} error={}",
                    target.kind_label(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Current direction of the caller's vote; `None` when anonymous or unvoted.
    pub fn current_vote(
        &self,
        session: &Session,
        target: VoteTarget,
    ) -> ServiceResult<Option<VoteDirection>> {
        let Some(user_id) = session.user_id() else {
            return Ok(None);
        };
        Ok(self
            .repo
            .find_vote(user_id, target)?
            .map(|vote| vote.direction))
    }
}
