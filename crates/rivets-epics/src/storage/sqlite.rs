//! `SQLite` implementation of [`ReadExecutor`].
//!
//! `rusqlite` is synchronous, so each read runs on tokio's blocking pool
//! while holding the connection lock. If the caller abandons the read
//! (cancellation or deadline), the blocking half still runs to completion
//! and its rows are dropped.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use super::{ReadExecutor, Row, Value};
use crate::error::{Error, Result};

/// How long a read waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Executes reads over a single `SQLite` connection.
///
/// The connection is wrapped in a `Mutex` so one executor can be shared
/// across tasks; reads are serialized.
pub struct SqliteExecutor {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for SqliteExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteExecutor")
            .field("path", &self.path)
            .field("conn", &"<rusqlite::Connection>")
            .finish()
    }
}

impl SqliteExecutor {
    /// Open an existing database file read-only.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreUnavailable` if the file cannot be opened.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| Error::store(format!("cannot open {}", path.display()), e))?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        tracing::debug!(path = %path.display(), "Opened issue database read-only");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an already open connection (for example an in-memory database).
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        }
    }

    /// Shared handle to the underlying connection.
    ///
    /// Useful for callers that also mutate the same database, such as test
    /// fixtures seeding issues between reads.
    #[must_use]
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    /// Path of the database file, if the executor was opened from one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[async_trait]
impl ReadExecutor for SqliteExecutor {
    async fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<Row>> {
        let conn = Arc::clone(&self.conn);
        let sql = sql.to_string();
        let params: Vec<String> = params.iter().map(ToString::to_string).collect();

        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|e| Error::StoreUnavailable {
                message: format!(
                    "database connection mutex poisoned (a thread panicked while holding the lock): {e}"
                ),
                source: None,
            })?;
            collect_rows(&guard, &sql, &params).map_err(Error::from)
        })
        .await
        .map_err(|e| Error::store("read task failed", e))?
    }
}

/// Run one statement and materialize every row before returning.
fn collect_rows(conn: &Connection, sql: &str, params: &[String]) -> rusqlite::Result<Vec<Row>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let column_count = stmt.column_count();
    let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;

    let mut collected = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(column_count);
        for index in 0..column_count {
            values.push(to_value(row.get_ref(index)?));
        }
        collected.push(Row::new(values));
    }
    Ok(collected)
}

/// Convert a borrowed `SQLite` value.
///
/// Text that is not valid UTF-8 comes back as a blob so that decoding
/// reports it as a type mismatch instead of silently mangling it.
fn to_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Integer(n),
        ValueRef::Real(x) => Value::Real(x),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Value::Text(text.to_string()),
            Err(_) => Value::Blob(bytes.to_vec()),
        },
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}
