//! Common test utilities shared across integration tests.
//!
//! `Tracker` owns a `SQLite` database laid out like a rivets issue database
//! and offers the writes the epics crate never performs itself: creating
//! issues, linking them, and closing them.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};

use rivets_epics::domain::IssueId;
use rivets_epics::epics::EligibilityEvaluator;
use rivets_epics::storage::sqlite::SqliteExecutor;
use rusqlite::{Connection, params};

/// Issue and dependency tables as the tracker stores them.
///
/// `dependencies` has no primary key so duplicate edges can be exercised.
pub const SCHEMA: &str = "
    CREATE TABLE issues (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        design TEXT NOT NULL DEFAULT '',
        acceptance_criteria TEXT NOT NULL DEFAULT '',
        notes TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT 'open',
        priority INTEGER NOT NULL DEFAULT 2,
        issue_type TEXT NOT NULL DEFAULT 'task',
        assignee TEXT,
        estimated_minutes INTEGER,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        closed_at DATETIME,
        external_ref TEXT
    );

    CREATE TABLE dependencies (
        issue_id TEXT NOT NULL,
        depends_on_id TEXT NOT NULL,
        type TEXT NOT NULL DEFAULT 'blocks',
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        created_by TEXT NOT NULL DEFAULT 'test-user'
    );
";

/// A seeded issue database plus an evaluator reading from it.
pub struct Tracker {
    conn: Arc<Mutex<Connection>>,
    evaluator: EligibilityEvaluator,
    created: u32,
}

impl Tracker {
    /// Fresh in-memory database.
    pub fn in_memory() -> Self {
        let conn = Connection::open_in_memory().expect("Failed to open in-memory database");
        Self::from_connection(conn)
    }

    /// Fresh database file at `path`, left on disk for other readers.
    pub fn at_path(path: &Path) -> Self {
        let conn = Connection::open(path).expect("Failed to create database file");
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Self {
        conn.execute_batch(SCHEMA).expect("Failed to create schema");
        let executor = SqliteExecutor::from_connection(conn);
        let conn = executor.connection();
        Self {
            conn,
            evaluator: EligibilityEvaluator::new(Arc::new(executor)),
            created: 0,
        }
    }

    /// Evaluator sharing this tracker's connection.
    pub fn evaluator(&self) -> &EligibilityEvaluator {
        &self.evaluator
    }

    /// Run arbitrary SQL against the database.
    pub fn execute(&self, sql: &str) {
        self.conn
            .lock()
            .unwrap()
            .execute_batch(sql)
            .unwrap_or_else(|e| panic!("SQL failed: {e}\n{sql}"));
    }

    /// Insert an issue. Creation times increase with each call.
    pub fn create(&mut self, id: &str, issue_type: &str, priority: i32) -> IssueId {
        self.created += 1;
        let created_at = format!(
            "2025-01-01T00:{:02}:{:02}Z",
            self.created / 60,
            self.created % 60
        );
        self.conn
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO issues (id, title, description, status, priority, issue_type, \
                 created_at, updated_at) VALUES (?1, ?2, ?3, 'open', ?4, ?5, ?6, ?6)",
                params![
                    id,
                    format!("{issue_type} {id}"),
                    "Created by test fixture",
                    priority,
                    issue_type,
                    created_at
                ],
            )
            .expect("Failed to insert issue");
        IssueId::new(id)
    }

    /// Epic at priority 1.
    pub fn epic(&mut self, id: &str) -> IssueId {
        self.create(id, "epic", 1)
    }

    /// Task at priority 2.
    pub fn task(&mut self, id: &str) -> IssueId {
        self.create(id, "task", 2)
    }

    /// Record `child` as a direct child of `parent`.
    pub fn add_child(&self, child: &IssueId, parent: &IssueId) {
        self.add_dependency(child, parent, "parent-child");
    }

    /// Add an edge of any type from `issue` to `depends_on`.
    pub fn add_dependency(&self, issue: &IssueId, depends_on: &IssueId, dep_type: &str) {
        self.conn
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO dependencies (issue_id, depends_on_id, type) VALUES (?1, ?2, ?3)",
                params![issue.as_str(), depends_on.as_str(), dep_type],
            )
            .expect("Failed to insert dependency");
    }

    /// Mark an issue closed.
    pub fn close(&self, id: &IssueId) {
        self.set_status(id, "closed");
    }

    /// Change an issue's status.
    pub fn set_status(&self, id: &IssueId, status: &str) {
        let closed_at = (status == "closed").then_some("2025-02-01T00:00:00Z");
        let changed = self
            .conn
            .lock()
            .unwrap()
            .execute(
                "UPDATE issues SET status = ?2, closed_at = ?3 WHERE id = ?1",
                params![id.as_str(), status, closed_at],
            )
            .expect("Failed to update status");
        assert_eq!(changed, 1, "no issue {id}");
    }
}

/// Path of the compiled `rivets-epics` binary.
pub fn rivets_epics_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_rivets-epics"))
}

/// Run the binary in `dir` with colors off and a clean environment for the
/// variables it reads.
pub fn run_rivets_epics_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(rivets_epics_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RIVETS_EPICS_DB")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute rivets-epics binary")
}
