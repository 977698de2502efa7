//! Rivets epics CLI binary.

use anyhow::Result;
use rivets_epics::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the rivets-epics CLI.
///
/// Uses tokio's `current_thread` runtime; blocking database reads still run
/// on the blocking pool.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so `--json` output on stdout stays parseable.
    // Example: RUST_LOG=rivets_epics=debug rivets-epics status
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rivets_epics=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting rivets-epics CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("rivets-epics CLI completed successfully");
    Ok(())
}
