//! Error types for epic eligibility queries.
//!
//! Every query is all-or-nothing: the first failure aborts the call and no
//! partial result is returned. No retry happens here; callers own that policy.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Boxed error from the underlying store driver.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for epic eligibility operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The store could not execute the read.
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        /// What was being attempted when the store failed.
        message: String,
        /// The driver error, if there is one.
        #[source]
        source: Option<BoxError>,
    },

    /// The caller cancelled the read.
    #[error("Query cancelled")]
    Cancelled,

    /// The read did not finish before the caller's deadline.
    #[error("Query deadline exceeded after {timeout:?}")]
    DeadlineExceeded {
        /// Time budget the call was given.
        timeout: Duration,
    },

    /// A returned row could not be decoded into the expected shape.
    #[error("Malformed row {row}, column '{column}': {reason}")]
    MalformedRow {
        /// Zero-based position of the row in the result set.
        row: usize,
        /// Column name.
        column: &'static str,
        /// What was wrong with the value.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build a [`Error::StoreUnavailable`] wrapping a driver error.
    pub fn store(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Whether the read failed because the store could not serve it.
    ///
    /// Cancellation and deadline expiry belong to this class.
    #[must_use]
    pub fn is_store_unavailable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable { .. } | Self::Cancelled | Self::DeadlineExceeded { .. }
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::store("sqlite read failed", err)
    }
}

/// A specialized Result type for epic eligibility operations.
pub type Result<T> = std::result::Result<T, Error>;
