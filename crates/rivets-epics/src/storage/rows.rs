//! Row decoding for issue reads.
//!
//! Converts positional [`Row`]s into domain types. Every decoding failure is
//! reported as `Error::MalformedRow` naming the row and column.

use chrono::{DateTime, NaiveDateTime, Utc};

use super::{Row, Value};
use crate::domain::{Issue, IssueId, IssueStatus, IssueType};
use crate::error::{Error, Result};

/// SQL column list for the `issues` relation, qualified with alias `i`.
///
/// Use with [`decode_issue`] for consistent column ordering.
pub(crate) const ISSUE_COLUMNS: &str = "i.id, i.title, i.description, i.design, \
     i.acceptance_criteria, i.notes, i.status, i.priority, i.issue_type, i.assignee, \
     i.estimated_minutes, i.created_at, i.updated_at, i.closed_at, i.external_ref";

/// Number of columns in [`ISSUE_COLUMNS`].
pub(crate) const ISSUE_COLUMN_COUNT: usize = 15;

/// Typed accessor over one row.
pub(crate) struct RowDecoder<'r> {
    row: &'r Row,
    position: usize,
}

impl<'r> RowDecoder<'r> {
    /// Decode `row`, which sits at `position` in its result set.
    pub(crate) fn new(row: &'r Row, position: usize) -> Self {
        Self { row, position }
    }

    /// Position of the row in its result set.
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    fn malformed(&self, column: &'static str, reason: impl Into<String>) -> Error {
        Error::MalformedRow {
            row: self.position,
            column,
            reason: reason.into(),
        }
    }

    fn value(&self, index: usize, column: &'static str) -> Result<&'r Value> {
        self.row.get(index).ok_or_else(|| {
            self.malformed(
                column,
                format!("missing column {index} (row has {})", self.row.len()),
            )
        })
    }

    /// Non-null text.
    pub(crate) fn text(&self, index: usize, column: &'static str) -> Result<String> {
        self.optional_text(index, column)?
            .ok_or_else(|| self.malformed(column, "unexpected NULL"))
    }

    /// Nullable text.
    pub(crate) fn optional_text(&self, index: usize, column: &'static str) -> Result<Option<String>> {
        match self.value(index, column)? {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.clone())),
            other => Err(self.malformed(
                column,
                format!("expected text, found {}", other.type_name()),
            )),
        }
    }

    /// Non-null integer.
    pub(crate) fn integer(&self, index: usize, column: &'static str) -> Result<i64> {
        self.optional_integer(index, column)?
            .ok_or_else(|| self.malformed(column, "unexpected NULL"))
    }

    /// Nullable integer.
    pub(crate) fn optional_integer(&self, index: usize, column: &'static str) -> Result<Option<i64>> {
        match self.value(index, column)? {
            Value::Null => Ok(None),
            Value::Integer(n) => Ok(Some(*n)),
            other => Err(self.malformed(
                column,
                format!("expected integer, found {}", other.type_name()),
            )),
        }
    }

    /// Non-negative count.
    pub(crate) fn count(&self, index: usize, column: &'static str) -> Result<u32> {
        let n = self.integer(index, column)?;
        u32::try_from(n).map_err(|_| self.malformed(column, format!("invalid count {n}")))
    }

    /// Non-null `i32`.
    pub(crate) fn int32(&self, index: usize, column: &'static str) -> Result<i32> {
        let n = self.integer(index, column)?;
        i32::try_from(n).map_err(|_| self.malformed(column, format!("{n} is out of range")))
    }

    /// Nullable `i32`.
    pub(crate) fn optional_int32(&self, index: usize, column: &'static str) -> Result<Option<i32>> {
        self.optional_integer(index, column)?
            .map(|n| {
                i32::try_from(n).map_err(|_| self.malformed(column, format!("{n} is out of range")))
            })
            .transpose()
    }

    /// Non-null timestamp.
    pub(crate) fn timestamp(&self, index: usize, column: &'static str) -> Result<DateTime<Utc>> {
        self.optional_timestamp(index, column)?
            .ok_or_else(|| self.malformed(column, "unexpected NULL"))
    }

    /// Nullable timestamp.
    pub(crate) fn optional_timestamp(
        &self,
        index: usize,
        column: &'static str,
    ) -> Result<Option<DateTime<Utc>>> {
        self.optional_text(index, column)?
            .map(|text| {
                parse_timestamp(&text).ok_or_else(|| {
                    self.malformed(column, format!("unrecognized timestamp '{text}'"))
                })
            })
            .transpose()
    }

    /// Non-null text parsed with `FromStr`.
    pub(crate) fn parsed<T>(&self, index: usize, column: &'static str) -> Result<T>
    where
        T: std::str::FromStr<Err = String>,
    {
        let text = self.text(index, column)?;
        text.parse().map_err(|reason| self.malformed(column, reason))
    }
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]±HH:MM`, and naive
/// `YYYY-MM-DD HH:MM:SS[.f]` (read as UTC).
pub(crate) fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Decode the first [`ISSUE_COLUMN_COUNT`] columns of a row as an issue.
///
/// Only `assignee` is nullable by design; `NULL` and empty strings both
/// become `None`. Any status text is accepted; only `issue_type` is
/// checked against the known values.
pub(crate) fn decode_issue(decoder: &RowDecoder<'_>) -> Result<Issue> {
    let assignee = decoder
        .optional_text(9, "assignee")?
        .filter(|a| !a.is_empty());

    Ok(Issue {
        id: IssueId::new(decoder.text(0, "id")?),
        title: decoder.text(1, "title")?,
        description: decoder.text(2, "description")?,
        design: decoder.text(3, "design")?,
        acceptance_criteria: decoder.text(4, "acceptance_criteria")?,
        notes: decoder.text(5, "notes")?,
        status: IssueStatus::from(decoder.text(6, "status")?),
        priority: decoder.int32(7, "priority")?,
        issue_type: decoder.parsed::<IssueType>(8, "issue_type")?,
        assignee,
        estimated_minutes: decoder.optional_int32(10, "estimated_minutes")?,
        created_at: decoder.timestamp(11, "created_at")?,
        updated_at: decoder.timestamp(12, "updated_at")?,
        closed_at: decoder.optional_timestamp(13, "closed_at")?,
        external_ref: decoder.optional_text(14, "external_ref")?,
    })
}
