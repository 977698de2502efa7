//! Upward propagation of closure decisions.
//!
//! The core never closes anything and never walks more than one level. The
//! contract for a caller that has just closed issue `X` is:
//!
//! 1. call [`ContainmentGraph::parent_epics`] for `X`;
//! 2. call [`EligibilityEvaluator::is_eligible`] for each parent;
//! 3. decide (outside this crate) whether to close each eligible parent;
//! 4. for every parent it did close, start again at step 1 with that parent.
//!
//! [`EligibilityEvaluator::closure_candidates`] performs steps 1 and 2 for
//! one level. Each read is its own snapshot: a sibling closed concurrently by
//! another caller may not be visible yet, so callers that must not miss an
//! auto-close should re-check after their own write, or reconcile with a
//! periodic [`EligibilityEvaluator::list_eligible_epics`] scan.
//!
//! ```rust,ignore
//! let mut pending = vec![closed_id];
//! while let Some(id) = pending.pop() {
//!     for parent in evaluator.closure_candidates(&ctx, &id).await? {
//!         if tracker.close(&parent.id).await? {
//!             pending.push(parent.id);
//!         }
//!     }
//! }
//! ```
//!
//! [`ContainmentGraph::parent_epics`]: super::ContainmentGraph::parent_epics

use super::evaluator::EligibilityEvaluator;
use crate::context::ReadContext;
use crate::domain::{Issue, IssueId};
use crate::error::Result;

impl EligibilityEvaluator {
    /// Direct parent epics of `closed_issue` that are still open and now
    /// eligible for closure, in parent-epic order.
    ///
    /// Parents that are already closed are skipped without being checked.
    ///
    /// # Errors
    ///
    /// The first failing read aborts the call; no partial list is returned.
    pub async fn closure_candidates(
        &self,
        ctx: &ReadContext,
        closed_issue: &IssueId,
    ) -> Result<Vec<Issue>> {
        let parents = self.graph().parent_epics(ctx, closed_issue).await?;

        let mut candidates = Vec::new();
        for parent in parents {
            if parent.status.is_closed() {
                tracing::trace!(epic_id = %parent.id, "Skipping closed parent epic");
                continue;
            }
            if self.is_eligible(ctx, &parent.id).await? {
                candidates.push(parent);
            }
        }

        tracing::debug!(
            issue_id = %closed_issue,
            candidates = candidates.len(),
            "Found parent epics ready to close"
        );
        Ok(candidates)
    }
}
