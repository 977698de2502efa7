//! Domain types for epic closure eligibility.
//!
//! Issues and dependency edges are owned by the external issue store; this
//! crate only reads them. [`ChildCounts`] and [`EpicStatus`] are read-time
//! projections that are recomputed on every query and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for an issue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(pub String);

impl IssueId {
    /// Create a new issue ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IssueId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for IssueId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An issue as read from the `issues` relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier for the issue
    pub id: IssueId,

    /// Issue title
    pub title: String,

    /// Issue description
    pub description: String,

    /// Design notes
    pub design: String,

    /// Acceptance criteria
    pub acceptance_criteria: String,

    /// Additional notes
    pub notes: String,

    /// Current status
    pub status: IssueStatus,

    /// Priority level (lower sorts first)
    pub priority: i32,

    /// Issue type
    pub issue_type: IssueType,

    /// Assignee. `NULL` and empty values in the store both read as `None`.
    pub assignee: Option<String>,

    /// Estimated effort in minutes
    pub estimated_minutes: Option<i32>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Closed timestamp
    pub closed_at: Option<DateTime<Utc>>,

    /// External reference (e.g., GitHub issue number)
    pub external_ref: Option<String>,
}

impl Issue {
    /// Whether this issue is an epic.
    #[must_use]
    pub fn is_epic(&self) -> bool {
        self.issue_type == IssueType::Epic
    }
}

/// Status of an issue
///
/// Stores may carry statuses beyond the known ones; those are kept verbatim
/// as [`IssueStatus::Other`] and count as not closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IssueStatus {
    /// Issue is open and ready to work on
    Open,

    /// Issue is currently being worked on
    InProgress,

    /// Issue is blocked by dependencies
    Blocked,

    /// Issue has been completed
    Closed,

    /// Any other stored status
    Other(String),
}

impl IssueStatus {
    /// The value stored in the `status` column.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Closed => "closed",
            Self::Other(status) => status,
        }
    }

    /// Whether the status counts as closed for eligibility purposes.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for IssueStatus {
    fn from(s: &str) -> Self {
        match s {
            "open" => Self::Open,
            "in_progress" => Self::InProgress,
            "blocked" => Self::Blocked,
            "closed" => Self::Closed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for IssueStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<IssueStatus> for String {
    fn from(status: IssueStatus) -> Self {
        match status {
            IssueStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

/// Type of issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    /// Bug fix
    Bug,

    /// New feature
    Feature,

    /// General task
    Task,

    /// Epic (parent issue)
    Epic,

    /// Maintenance/chore
    Chore,
}

impl IssueType {
    /// The value stored in the `issue_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::Task => "task",
            Self::Epic => "epic",
            Self::Chore => "chore",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bug" => Ok(Self::Bug),
            "feature" => Ok(Self::Feature),
            "task" => Ok(Self::Task),
            "epic" => Ok(Self::Epic),
            "chore" => Ok(Self::Chore),
            unknown => Err(format!("unknown issue type '{unknown}'")),
        }
    }
}

/// Type of dependency relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyType {
    /// Hard blocker - prevents work
    Blocks,

    /// Soft link - informational
    Related,

    /// Hierarchical - epic to task. The child is the dependency source and
    /// the epic is the dependency target.
    ParentChild,

    /// Found during work
    DiscoveredFrom,
}

impl DependencyType {
    /// The value stored in the `dependencies.type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blocks => "blocks",
            Self::Related => "related",
            Self::ParentChild => "parent-child",
            Self::DiscoveredFrom => "discovered-from",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direct child counts for one epic.
///
/// `closed` never exceeds `total`; the only way to build a value is through
/// [`ChildCounts::new`], which enforces that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChildCounts {
    #[serde(rename = "total_children")]
    total: u32,
    #[serde(rename = "closed_children")]
    closed: u32,
}

impl ChildCounts {
    /// Counts for an epic without children.
    pub const EMPTY: Self = Self {
        total: 0,
        closed: 0,
    };

    /// Build counts, returning `None` if `closed > total`.
    #[must_use]
    pub const fn new(total: u32, closed: u32) -> Option<Self> {
        if closed > total {
            None
        } else {
            Some(Self { total, closed })
        }
    }

    /// Number of distinct direct children.
    #[must_use]
    pub const fn total(self) -> u32 {
        self.total
    }

    /// Number of direct children whose status is closed.
    #[must_use]
    pub const fn closed(self) -> u32 {
        self.closed
    }

    /// The closure rule: at least one child, and every child closed.
    ///
    /// A childless epic is never eligible, whatever its own status.
    #[must_use]
    pub const fn eligible_for_close(self) -> bool {
        self.total > 0 && self.closed == self.total
    }
}

impl fmt::Display for ChildCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.closed, self.total)
    }
}

/// An open epic annotated with its child completion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpicStatus {
    /// The epic itself
    pub epic: Issue,

    #[serde(flatten)]
    counts: ChildCounts,

    eligible_for_close: bool,
}

impl EpicStatus {
    /// Annotate an epic with its child counts.
    #[must_use]
    pub fn new(epic: Issue, counts: ChildCounts) -> Self {
        Self {
            epic,
            counts,
            eligible_for_close: counts.eligible_for_close(),
        }
    }

    /// The underlying child counts.
    #[must_use]
    pub fn counts(&self) -> ChildCounts {
        self.counts
    }

    /// Number of distinct direct children.
    #[must_use]
    pub fn total_children(&self) -> u32 {
        self.counts.total()
    }

    /// Number of closed direct children.
    #[must_use]
    pub fn closed_children(&self) -> u32 {
        self.counts.closed()
    }

    /// Whether every child is closed and there is at least one child.
    #[must_use]
    pub fn eligible_for_close(&self) -> bool {
        self.eligible_for_close
    }
}
