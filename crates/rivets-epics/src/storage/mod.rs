//! Read access to the external issue store.
//!
//! The eligibility core never owns a connection. It is handed a
//! [`ReadExecutor`], a capability that executes one read statement and
//! returns its rows, so the same queries run against a SQLite file, an
//! in-memory SQLite database, or a scripted mock.
//!
//! - **SQLite**: [`sqlite::SqliteExecutor`] over `rusqlite`
//! - **Mock**: [`MockExecutor`] (tests and the `test-util` feature)
//!
//! # Test Utilities
//!
//! Enable the `test-util` feature to use [`MockExecutor`] from downstream
//! tests:
//!
//! ```toml
//! [dev-dependencies]
//! rivets-epics = { version = "...", features = ["test-util"] }
//! ```

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

pub(crate) mod rows;
pub mod sqlite;

/// A dynamically typed value read from the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL`
    Null,
    /// Signed integer
    Integer(i64),
    /// Floating point number
    Real(f64),
    /// UTF-8 text
    Text(String),
    /// Raw bytes
    Blob(Vec<u8>),
}

impl Value {
    /// Name of the value's type, for error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// One result row, in the column order of the statement that produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Build a row from its column values.
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Value at a column position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// Executes one read statement against the issue store.
///
/// Implementations must be `Send + Sync` so a single executor can be shared
/// across tasks behind an `Arc`.
///
/// # Contract
///
/// - `sql` is a single SELECT statement; `params` bind to `?1`, `?2`, ...
/// - The whole result set is returned, or an error. Never a prefix of it.
/// - A single call observes one consistent snapshot of the store.
/// - Failures to reach or query the store are reported as
///   `Error::StoreUnavailable`.
#[async_trait]
pub trait ReadExecutor: Send + Sync {
    /// Run `sql` with positional text parameters and collect every row.
    async fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<Row>>;
}

// ========== Test Utilities ==========

/// Scripted [`ReadExecutor`] for tests.
///
/// Returns the same canned outcome for every query and records each SQL
/// statement it was asked to run.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug)]
pub struct MockExecutor {
    outcome: MockOutcome,
    seen: std::sync::Mutex<Vec<(String, Vec<String>)>>,
}

#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone)]
enum MockOutcome {
    Rows(Vec<Row>),
    Fail(String),
    Hang,
}

#[cfg(any(test, feature = "test-util"))]
impl MockExecutor {
    /// Answer every query with `rows`.
    #[must_use]
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self::from_outcome(MockOutcome::Rows(rows))
    }

    /// Fail every query with `Error::StoreUnavailable`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::from_outcome(MockOutcome::Fail(message.into()))
    }

    /// Never complete; useful for exercising cancellation and deadlines.
    #[must_use]
    pub fn hanging() -> Self {
        Self::from_outcome(MockOutcome::Hang)
    }

    fn from_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            seen: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Statements and parameters received so far.
    ///
    /// # Panics
    ///
    /// Panics if a previous query panicked while recording.
    #[must_use]
    pub fn queries(&self) -> Vec<(String, Vec<String>)> {
        self.seen.lock().expect("mock executor lock poisoned").clone()
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl ReadExecutor for MockExecutor {
    async fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<Row>> {
        self.seen
            .lock()
            .expect("mock executor lock poisoned")
            .push((
                sql.to_string(),
                params.iter().map(ToString::to_string).collect(),
            ));

        match &self.outcome {
            MockOutcome::Rows(rows) => Ok(rows.clone()),
            MockOutcome::Fail(message) => Err(crate::error::Error::StoreUnavailable {
                message: message.clone(),
                source: None,
            }),
            MockOutcome::Hang => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_trait_object_usage() {
        let executor: Arc<dyn ReadExecutor> = Arc::new(MockExecutor::with_rows(vec![Row::new(
            vec![Value::Integer(1), Value::Null],
        )]));

        let rows = executor.query("SELECT 1, NULL", &[]).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(0), Some(&Value::Integer(1)));
        assert_eq!(rows[0].get(1), Some(&Value::Null));
        assert_eq!(rows[0].get(2), None);
    }

    #[tokio::test]
    async fn test_mock_records_queries() {
        let mock = MockExecutor::with_rows(vec![]);
        mock.query("SELECT ?1", &["proj-1"]).await.unwrap();

        let seen = mock.queries();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "SELECT ?1");
        assert_eq!(seen[0].1, vec!["proj-1".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_failure_is_store_unavailable() {
        let mock = MockExecutor::failing("connection reset");
        let err = mock.query("SELECT 1", &[]).await.unwrap_err();
        assert!(matches!(err, Error::StoreUnavailable { .. }));
        assert_eq!(err.to_string(), "Store unavailable: connection reset");
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::Integer(3).to_string(), "3");
        assert_eq!(Value::Blob(vec![1, 2]).type_name(), "blob");
    }
}
