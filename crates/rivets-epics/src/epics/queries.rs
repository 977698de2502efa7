//! SQL for containment reads.
//!
//! Child counting exists once, in [`child_stats_cte`]. The bulk listing and
//! the single-epic check both select from the `epic_stats` it defines and
//! only differ in which epics they include, so the two paths cannot drift.

use std::sync::LazyLock;

use crate::domain::{ChildCounts, DependencyType, IssueStatus, IssueType};
use crate::error::{Error, Result};
use crate::storage::rows::{ISSUE_COLUMNS, RowDecoder};

/// Which epics the child aggregation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EpicScope {
    /// Every epic that is the target of a parent-child edge.
    AllEpics,
    /// Only the epic bound to `?1`.
    Single,
}

/// Common table expressions `epic_children` and `epic_stats`.
///
/// `epic_stats` has one row per epic with at least one existing child:
/// `(epic_id, total_children, closed_children)`. Children are counted once
/// even if duplicated edges exist, and only direct children are counted.
fn child_stats_cte(scope: EpicScope) -> String {
    let scope_filter = match scope {
        EpicScope::AllEpics => "",
        EpicScope::Single => "\n              AND d.depends_on_id = ?1",
    };
    format!(
        "epic_children AS (
            SELECT DISTINCT
                d.depends_on_id AS epic_id,
                c.id AS child_id,
                c.status AS child_status
            FROM dependencies d
            JOIN issues c ON c.id = d.issue_id
            WHERE d.type = '{parent_child}'{scope_filter}
        ),
        epic_stats AS (
            SELECT
                epic_id,
                COUNT(*) AS total_children,
                SUM(CASE WHEN child_status = '{closed}' THEN 1 ELSE 0 END) AS closed_children
            FROM epic_children
            GROUP BY epic_id
        )",
        parent_child = DependencyType::ParentChild.as_str(),
        closed = IssueStatus::Closed.as_str(),
    )
}

/// Open epics with their child counts appended after the issue columns.
pub(crate) static OPEN_EPICS_WITH_COUNTS: LazyLock<String> = LazyLock::new(|| {
    format!(
        "WITH {cte}
        SELECT
            {ISSUE_COLUMNS},
            COALESCE(s.total_children, 0) AS total_children,
            COALESCE(s.closed_children, 0) AS closed_children
        FROM issues i
        LEFT JOIN epic_stats s ON s.epic_id = i.id
        WHERE i.issue_type = '{epic}'
          AND i.status != '{closed}'
        ORDER BY i.priority ASC, i.created_at ASC",
        cte = child_stats_cte(EpicScope::AllEpics),
        epic = IssueType::Epic.as_str(),
        closed = IssueStatus::Closed.as_str(),
    )
});

/// Child counts for the epic bound to `?1`. Always yields exactly one row.
pub(crate) static SINGLE_EPIC_COUNTS: LazyLock<String> = LazyLock::new(|| {
    format!(
        "WITH {cte}
        SELECT
            COALESCE(MAX(s.total_children), 0) AS total_children,
            COALESCE(MAX(s.closed_children), 0) AS closed_children
        FROM epic_stats s",
        cte = child_stats_cte(EpicScope::Single),
    )
});

/// Epics that the issue bound to `?1` is a direct child of.
pub(crate) static PARENT_EPICS: LazyLock<String> = LazyLock::new(|| {
    format!(
        "SELECT DISTINCT {ISSUE_COLUMNS}
        FROM issues i
        JOIN dependencies d ON i.id = d.depends_on_id
        WHERE d.issue_id = ?1
          AND d.type = '{parent_child}'
          AND i.issue_type = '{epic}'
        ORDER BY i.priority ASC",
        parent_child = DependencyType::ParentChild.as_str(),
        epic = IssueType::Epic.as_str(),
    )
});

/// Decode `(total_children, closed_children)` starting at column `offset`.
pub(crate) fn decode_counts(decoder: &RowDecoder<'_>, offset: usize) -> Result<ChildCounts> {
    let total = decoder.count(offset, "total_children")?;
    let closed = decoder.count(offset + 1, "closed_children")?;
    ChildCounts::new(total, closed).ok_or_else(|| Error::MalformedRow {
        row: decoder.position(),
        column: "closed_children",
        reason: format!("{closed} closed children exceeds {total} total"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Row, Value};

    #[test]
    fn test_single_scope_binds_epic_id() {
        let single = child_stats_cte(EpicScope::Single);
        let all = child_stats_cte(EpicScope::AllEpics);
        assert!(single.contains("d.depends_on_id = ?1"));
        assert!(!all.contains("?1"));
    }

    #[test]
    fn test_both_paths_share_aggregation() {
        let shared = "SUM(CASE WHEN child_status = 'closed' THEN 1 ELSE 0 END)";
        assert!(OPEN_EPICS_WITH_COUNTS.contains(shared));
        assert!(SINGLE_EPIC_COUNTS.contains(shared));
        assert!(OPEN_EPICS_WITH_COUNTS.contains("d.type = 'parent-child'"));
        assert!(SINGLE_EPIC_COUNTS.contains("d.type = 'parent-child'"));
    }

    #[test]
    fn test_open_epics_ordering() {
        assert!(OPEN_EPICS_WITH_COUNTS.contains("ORDER BY i.priority ASC, i.created_at ASC"));
        assert!(OPEN_EPICS_WITH_COUNTS.contains("i.status != 'closed'"));
    }

    #[test]
    fn test_decode_counts_rejects_inconsistent_counts() {
        let row = Row::new(vec![Value::Integer(1), Value::Integer(2)]);
        let err = decode_counts(&RowDecoder::new(&row, 0), 0).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedRow {
                column: "closed_children",
                ..
            }
        ));
    }

    #[test]
    fn test_decode_counts_at_offset() {
        let row = Row::new(vec![
            Value::from("ignored"),
            Value::Integer(3),
            Value::Integer(1),
        ]);
        let counts = decode_counts(&RowDecoder::new(&row, 0), 1).unwrap();
        assert_eq!(counts, ChildCounts::new(3, 1).unwrap());
    }
}
