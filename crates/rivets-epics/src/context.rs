//! Cancellation and deadline handling for store reads.
//!
//! Every query takes a [`ReadContext`]. A context that is cancelled or past
//! its deadline fails the call with [`Error::Cancelled`] or
//! [`Error::DeadlineExceeded`]; a read that is abandoned mid-flight never
//! produces a result.

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation signal and optional deadline for one or more reads.
///
/// Cloning a context shares its cancellation token.
#[derive(Debug, Clone)]
pub struct ReadContext {
    cancel: CancellationToken,
    deadline: Option<Deadline>,
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    budget: Duration,
}

impl ReadContext {
    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    /// A context driven by an existing cancellation token.
    #[must_use]
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// Set a deadline `timeout` from now.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Deadline {
            at: Instant::now() + timeout,
            budget: timeout,
        });
        self
    }

    /// The token that cancels reads made with this context.
    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancel every read made with this context (and its clones).
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Fail fast if the context is already cancelled or expired.
    pub fn check(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline.at
        {
            return Err(Error::DeadlineExceeded {
                timeout: deadline.budget,
            });
        }
        Ok(())
    }

    /// Drive `read` to completion unless the context fires first.
    ///
    /// The future is dropped as soon as cancellation or the deadline wins,
    /// so a half-built result can never escape.
    pub async fn run<T, F>(&self, read: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    () = self.cancel.cancelled() => Err(Error::Cancelled),
                    () = tokio::time::sleep_until(deadline.at) => Err(Error::DeadlineExceeded {
                        timeout: deadline.budget,
                    }),
                    result = read => result,
                }
            }
            None => {
                tokio::select! {
                    biased;
                    () = self.cancel.cancelled() => Err(Error::Cancelled),
                    result = read => result,
                }
            }
        }
    }
}

impl Default for ReadContext {
    fn default() -> Self {
        Self::background()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_context_runs_read() {
        let ctx = ReadContext::background();
        let value = ctx.run(async { Ok(42) }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_cancelled_before_read() {
        let ctx = ReadContext::background();
        ctx.cancel();

        let result = ctx.run(async { Ok(()) }).await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancelled_while_pending() {
        let ctx = ReadContext::background();
        let token = ctx.cancellation_token().clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let result: Result<()> = ctx.run(std::future::pending()).await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn test_deadline_elapses_while_pending() {
        let ctx = ReadContext::background().with_timeout(Duration::from_millis(10));

        let result: Result<()> = ctx.run(std::future::pending()).await;
        match result {
            Err(Error::DeadlineExceeded { timeout }) => {
                assert_eq!(timeout, Duration::from_millis(10));
            }
            other => panic!("expected DeadlineExceeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_timeout_fails_fast() {
        let ctx = ReadContext::background().with_timeout(Duration::ZERO);
        assert!(matches!(ctx.check(), Err(Error::DeadlineExceeded { .. })));
    }

    #[tokio::test]
    async fn test_clone_shares_cancellation() {
        let ctx = ReadContext::background();
        let clone = ctx.clone();
        ctx.cancel();
        assert!(matches!(clone.check(), Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn test_read_error_passes_through() {
        let ctx = ReadContext::background().with_timeout(Duration::from_secs(5));
        let result: Result<()> = ctx.run(async { Err(Error::Cancelled) }).await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
