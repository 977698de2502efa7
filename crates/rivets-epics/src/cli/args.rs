//! CLI argument structs for all commands.

use clap::Parser;

use super::validators::validate_issue_id;

/// Arguments for the `status` command
#[derive(Parser, Debug, Clone)]
pub struct StatusArgs {
    /// Only show epics that are eligible for closure
    #[arg(long)]
    pub eligible_only: bool,
}

/// Arguments for the `parents` command
#[derive(Parser, Debug, Clone)]
pub struct ParentsArgs {
    /// Issue ID to look up
    #[arg(value_parser = validate_issue_id)]
    pub issue_id: String,
}

/// Arguments for the `check` command
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Epic ID to check
    #[arg(value_parser = validate_issue_id)]
    pub epic_id: String,
}

/// Arguments for the `candidates` command
#[derive(Parser, Debug, Clone)]
pub struct CandidatesArgs {
    /// ID of the issue that was just closed
    #[arg(value_parser = validate_issue_id)]
    pub issue_id: String,
}
