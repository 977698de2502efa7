//! Application context for CLI command execution.
//!
//! `App` resolves the issue database from the workspace configuration and
//! command-line overrides, opens it read-only, and hands out evaluators and
//! per-command read contexts.

use crate::config::{DATABASE_ENV_VAR, EpicsConfig, Workspace, find_rivets_root};
use crate::context::ReadContext;
use crate::epics::EligibilityEvaluator;
use crate::error::Result;
use crate::storage::sqlite::SqliteExecutor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Command-line overrides applied on top of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Database path from `--db`.
    pub database: Option<PathBuf>,
    /// Per-query deadline from `--timeout-ms`.
    pub timeout: Option<Duration>,
}

/// Application context for CLI operations.
pub struct App {
    evaluator: EligibilityEvaluator,
    database: PathBuf,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("database", &self.database)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Create an App instance from the given working directory.
    ///
    /// Precedence for the database path is `--db`, then
    /// `RIVETS_EPICS_DB`, then `.rivets/epics.yaml`, then the default.
    /// A workspace is only required when `--db` is not given.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No rivets repository is found and `--db` was not given
    /// - Configuration cannot be loaded
    /// - The database cannot be opened
    pub async fn from_directory(working_dir: &Path, overrides: Overrides) -> Result<Self> {
        let env_database = std::env::var(DATABASE_ENV_VAR).ok();
        let (database, config) = resolve(working_dir, &overrides, env_database).await?;

        let executor = SqliteExecutor::open_read_only(&database)?;

        Ok(Self {
            evaluator: EligibilityEvaluator::new(Arc::new(executor)),
            database,
            timeout: overrides.timeout.or_else(|| config.query_timeout()),
        })
    }

    /// The evaluator bound to the opened database.
    pub fn evaluator(&self) -> &EligibilityEvaluator {
        &self.evaluator
    }

    /// Path of the opened database.
    pub fn database(&self) -> &Path {
        &self.database
    }

    /// Effective per-query deadline.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// A fresh read context carrying the effective deadline.
    pub fn context(&self) -> ReadContext {
        let ctx = ReadContext::background();
        match self.timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

async fn resolve(
    working_dir: &Path,
    overrides: &Overrides,
    env_database: Option<String>,
) -> Result<(PathBuf, EpicsConfig)> {
    if let Some(database) = &overrides.database {
        // An explicit path works outside a repository, but still picks up the
        // configured timeout when there is one.
        let config = match find_rivets_root(working_dir) {
            Some(_) => Workspace::discover(working_dir).await?.config().clone(),
            None => EpicsConfig::default(),
        };
        return Ok((working_dir.join(database), config));
    }

    let mut workspace = Workspace::discover(working_dir).await?;
    workspace.config_mut().apply_database_override(env_database);
    let database = workspace.database_path();
    Ok((database, workspace.config().clone()))
}
