//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `status`: Open epics with child progress and closure eligibility
//! - `parents`: Direct parent epics of an issue
//! - `check`: Whether one epic is eligible for closure
//! - `candidates`: Parent epics that became closable after an issue closed
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--db`: Issue database path, overriding configuration
//! - `--timeout-ms`: Per-query deadline, overriding configuration
//!
//! # Example
//!
//! ```bash
//! rivets-epics status --eligible-only
//! rivets-epics --json parents proj-abc
//! rivets-epics --db ./issues.db check proj-epic
//! ```

mod args;
mod execute;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub use args::{CandidatesArgs, CheckArgs, ParentsArgs, StatusArgs};
pub use validators::validate_issue_id;

/// Rivets epics - closure eligibility for epics in a rivets issue database
///
/// Reads the issue database read-only. Nothing is ever closed by this tool;
/// it reports which epics have every child closed.
#[derive(Parser, Debug)]
#[command(name = "rivets-epics")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the issue database (overrides `.rivets/epics.yaml` and `RIVETS_EPICS_DB`)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Deadline for each query, in milliseconds
    #[arg(long, global = true, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show open epics and their completion status
    ///
    /// Lists every epic that is not closed, ordered by priority and age,
    /// with the number of closed children and whether it can be closed.
    Status(StatusArgs),

    /// Show the epics an issue belongs to
    ///
    /// Lists the direct parent epics of an issue, ordered by priority.
    Parents(ParentsArgs),

    /// Check whether an epic is eligible for closure
    ///
    /// An epic is eligible when it has at least one child and every child is
    /// closed. The epic's own status is not considered.
    Check(CheckArgs),

    /// Show epics that can be closed after closing an issue
    ///
    /// Lists the open parent epics of the issue whose children are now all
    /// closed. Only one level is reported; re-run for each epic you close.
    Candidates(CandidatesArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Overrides collected from the global flags.
    fn overrides(&self) -> crate::app::Overrides {
        crate::app::Overrides {
            database: self.db.clone(),
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let Some(command) = &self.command else {
            println!("Rivets epic closure eligibility");
            println!("Use --help for more information");
            return Ok(());
        };

        let app = App::from_directory(&std::env::current_dir()?, self.overrides()).await?;

        match command {
            Commands::Status(args) => execute::execute_status(&app, args, output_mode).await,
            Commands::Parents(args) => execute::execute_parents(&app, args, output_mode).await,
            Commands::Check(args) => execute::execute_check(&app, args, output_mode).await,
            Commands::Candidates(args) => {
                execute::execute_candidates(&app, args, output_mode).await
            }
        }
    }
}
