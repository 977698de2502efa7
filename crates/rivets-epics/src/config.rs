//! Configuration for the epics CLI.
//!
//! Settings live in `.rivets/epics.yaml` at the repository root. A missing
//! file means defaults; a present but invalid file is an error.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Name of the rivets directory
pub const RIVETS_DIR_NAME: &str = ".rivets";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "epics.yaml";

/// Default database path, relative to the repository root
pub const DEFAULT_DATABASE: &str = ".rivets/issues.db";

/// Environment variable overriding the database path
pub const DATABASE_ENV_VAR: &str = "RIVETS_EPICS_DB";

/// Maximum directory depth to traverse when searching for rivets root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE)
}

/// Contents of `.rivets/epics.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct EpicsConfig {
    /// Path to the issue database. Relative paths resolve against the
    /// repository root.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Default deadline for each query, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_timeout_ms: Option<u64>,
}

impl Default for EpicsConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            query_timeout_ms: None,
        }
    }
}

impl EpicsConfig {
    /// Load configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file is absent.
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        match fs::try_exists(path).await {
            Ok(true) => Self::load(path).await,
            Ok(false) => {
                tracing::debug!(path = %path.display(), "No epics config, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.database.as_os_str().is_empty() {
            return Err(Error::Config("database path cannot be empty".to_string()));
        }
        if self.query_timeout_ms == Some(0) {
            return Err(Error::Config(
                "query-timeout-ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply the value of [`DATABASE_ENV_VAR`], if set.
    ///
    /// Empty values are ignored with a warning.
    pub fn apply_database_override(&mut self, value: Option<String>) {
        match value {
            Some(v) if v.trim().is_empty() => {
                tracing::warn!(
                    env_var = DATABASE_ENV_VAR,
                    "Empty value, keeping configured database"
                );
            }
            Some(v) => self.database = PathBuf::from(v),
            None => {}
        }
    }

    /// Default per-query deadline.
    #[must_use]
    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_ms.map(Duration::from_millis)
    }
}

/// A located rivets repository and its epics configuration.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: EpicsConfig,
}

impl Workspace {
    /// Find the repository containing `working_dir` and load its config.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no `.rivets/` directory is found, or if
    /// the config file exists but cannot be parsed.
    pub async fn discover(working_dir: &Path) -> Result<Self> {
        let root = find_rivets_root(working_dir).ok_or_else(|| {
            Error::Config(format!(
                "No {RIVETS_DIR_NAME} directory found in {} or parent directories",
                working_dir.display()
            ))
        })?;

        let config_path = root.join(RIVETS_DIR_NAME).join(CONFIG_FILE_NAME);
        let config = EpicsConfig::load_or_default(&config_path).await?;

        Ok(Self { root, config })
    }

    /// Directory containing `.rivets/`.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &EpicsConfig {
        &self.config
    }

    /// Mutable access, for command-line and environment overrides.
    pub fn config_mut(&mut self) -> &mut EpicsConfig {
        &mut self.config
    }

    /// Absolute path of the issue database.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        if self.config.database.is_absolute() {
            self.config.database.clone()
        } else {
            self.root.join(&self.config.database)
        }
    }
}

/// Find the rivets root directory by searching up the directory tree.
///
/// Returns the directory containing `.rivets/`, or `None` if no rivets
/// repository is found within [`MAX_TRAVERSAL_DEPTH`] levels.
pub fn find_rivets_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(RIVETS_DIR_NAME).is_dir() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
