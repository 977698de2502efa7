//! Containment edges between issues.

use std::sync::Arc;

use super::queries::{self, PARENT_EPICS, SINGLE_EPIC_COUNTS};
use crate::context::ReadContext;
use crate::domain::{ChildCounts, Issue, IssueId};
use crate::error::{Error, Result};
use crate::storage::ReadExecutor;
use crate::storage::rows::{RowDecoder, decode_issue};

/// Read access to `parent-child` edges.
///
/// The child is the dependency source and the epic is the dependency target.
/// Other edge types are ignored.
#[derive(Clone)]
pub struct ContainmentGraph {
    executor: Arc<dyn ReadExecutor>,
}

impl std::fmt::Debug for ContainmentGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainmentGraph")
            .field("executor", &"<dyn ReadExecutor>")
            .finish()
    }
}

impl ContainmentGraph {
    /// Create a graph reader over the given store.
    pub fn new(executor: Arc<dyn ReadExecutor>) -> Self {
        Self { executor }
    }

    /// Count the direct children of `epic_id`, and how many are closed.
    ///
    /// An unknown epic, or one without children, yields zero counts rather
    /// than an error. Grandchildren are not counted.
    ///
    /// # Errors
    ///
    /// - `Error::StoreUnavailable`, `Error::Cancelled`, `Error::DeadlineExceeded`
    ///   if the read does not complete
    /// - `Error::MalformedRow` if the counts cannot be decoded
    pub async fn child_counts(&self, ctx: &ReadContext, epic_id: &IssueId) -> Result<ChildCounts> {
        let rows = ctx
            .run(
                self.executor
                    .query(SINGLE_EPIC_COUNTS.as_str(), &[epic_id.as_str()]),
            )
            .await?;

        let counts = match rows.as_slice() {
            [] => ChildCounts::EMPTY,
            [row] => queries::decode_counts(&RowDecoder::new(row, 0), 0)?,
            _ => {
                return Err(Error::MalformedRow {
                    row: 1,
                    column: "total_children",
                    reason: format!("expected one aggregate row, got {}", rows.len()),
                });
            }
        };

        tracing::debug!(
            epic_id = %epic_id,
            total = counts.total(),
            closed = counts.closed(),
            "Counted epic children"
        );
        Ok(counts)
    }

    /// Direct parent epics of `issue_id`, by ascending priority.
    ///
    /// Parents are returned whatever their own status; filtering closed
    /// parents is left to the caller. Only issues of type epic qualify.
    ///
    /// # Errors
    ///
    /// - `Error::StoreUnavailable`, `Error::Cancelled`, `Error::DeadlineExceeded`
    ///   if the read does not complete
    /// - `Error::MalformedRow` if any parent row cannot be decoded (no
    ///   partial list is returned)
    pub async fn parent_epics(&self, ctx: &ReadContext, issue_id: &IssueId) -> Result<Vec<Issue>> {
        let rows = ctx
            .run(self.executor.query(PARENT_EPICS.as_str(), &[issue_id.as_str()]))
            .await?;

        let parents = rows
            .iter()
            .enumerate()
            .map(|(position, row)| decode_issue(&RowDecoder::new(row, position)))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(issue_id = %issue_id, parents = parents.len(), "Resolved parent epics");
        Ok(parents)
    }
}
