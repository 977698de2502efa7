//! Closure eligibility for epics.

use std::sync::Arc;

use super::graph::ContainmentGraph;
use super::queries::{self, OPEN_EPICS_WITH_COUNTS};
use crate::context::ReadContext;
use crate::domain::{EpicStatus, IssueId};
use crate::error::Result;
use crate::storage::ReadExecutor;
use crate::storage::rows::{ISSUE_COLUMN_COUNT, RowDecoder, decode_issue};

/// Decides which epics may be closed.
///
/// An epic is eligible when it has at least one direct child and every
/// direct child is closed. The bulk listing and the single-epic check share
/// one aggregation, so for an open epic they always agree when run against
/// the same snapshot.
#[derive(Clone)]
pub struct EligibilityEvaluator {
    executor: Arc<dyn ReadExecutor>,
    graph: ContainmentGraph,
}

impl std::fmt::Debug for EligibilityEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EligibilityEvaluator")
            .field("executor", &"<dyn ReadExecutor>")
            .field("graph", &self.graph)
            .finish()
    }
}

impl EligibilityEvaluator {
    /// Create an evaluator over the given store.
    pub fn new(executor: Arc<dyn ReadExecutor>) -> Self {
        let graph = ContainmentGraph::new(Arc::clone(&executor));
        Self { executor, graph }
    }

    /// The containment graph this evaluator reads through.
    #[must_use]
    pub fn graph(&self) -> &ContainmentGraph {
        &self.graph
    }

    /// Every open epic annotated with its child counts and eligibility.
    ///
    /// Ordered by priority, then creation time. Epics without children are
    /// included (never eligible); closed epics are not.
    ///
    /// # Errors
    ///
    /// - `Error::StoreUnavailable`, `Error::Cancelled`, `Error::DeadlineExceeded`
    ///   if the read does not complete
    /// - `Error::MalformedRow` if any row cannot be decoded; no partial list
    ///   is returned
    pub async fn list_eligible_epics(&self, ctx: &ReadContext) -> Result<Vec<EpicStatus>> {
        let rows = ctx
            .run(self.executor.query(OPEN_EPICS_WITH_COUNTS.as_str(), &[]))
            .await?;

        let statuses = rows
            .iter()
            .enumerate()
            .map(|(position, row)| {
                let decoder = RowDecoder::new(row, position);
                let epic = decode_issue(&decoder)?;
                let counts = queries::decode_counts(&decoder, ISSUE_COLUMN_COUNT)?;
                Ok(EpicStatus::new(epic, counts))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            open_epics = statuses.len(),
            eligible = statuses.iter().filter(|s| s.eligible_for_close()).count(),
            "Evaluated open epics"
        );
        Ok(statuses)
    }

    /// Whether `epic_id` currently meets the closure rule.
    ///
    /// Answers from child state alone: the epic record is not fetched, so a
    /// closed or unknown epic gets an answer too (`false` for unknown IDs,
    /// since they have no children).
    ///
    /// # Errors
    ///
    /// Same as [`ContainmentGraph::child_counts`].
    pub async fn is_eligible(&self, ctx: &ReadContext, epic_id: &IssueId) -> Result<bool> {
        let counts = self.graph.child_counts(ctx, epic_id).await?;
        Ok(counts.eligible_for_close())
    }
}
