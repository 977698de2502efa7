//! Command execution logic.
//!
//! Each command builds one read context from the app, so the deadline covers
//! every read the command makes. For `candidates` that is the parent lookup
//! plus one eligibility check per open parent.

use anyhow::{Context, Result};

use super::args::{CandidatesArgs, CheckArgs, ParentsArgs, StatusArgs};
use crate::app::App;
use crate::domain::IssueId;
use crate::output::{self, OutputMode};

/// Execute the status command
pub async fn execute_status(app: &App, args: &StatusArgs, output_mode: OutputMode) -> Result<()> {
    let mut statuses = app
        .evaluator()
        .list_eligible_epics(&app.context())
        .await
        .context("Failed to list open epics")?;

    if args.eligible_only {
        statuses.retain(|status| status.eligible_for_close());
    }

    tracing::debug!(
        epics = statuses.len(),
        eligible_only = args.eligible_only,
        "Listed epic status"
    );

    output::print_epic_statuses(&statuses, output_mode)?;
    Ok(())
}

/// Execute the parents command
pub async fn execute_parents(
    app: &App,
    args: &ParentsArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let issue_id = IssueId::new(&args.issue_id);
    let parents = app
        .evaluator()
        .graph()
        .parent_epics(&app.context(), &issue_id)
        .await
        .with_context(|| format!("Failed to look up parent epics of {issue_id}"))?;

    output::print_epics("Parent epics of", &issue_id, &parents, output_mode)?;
    Ok(())
}

/// Execute the check command
pub async fn execute_check(app: &App, args: &CheckArgs, output_mode: OutputMode) -> Result<()> {
    let epic_id = IssueId::new(&args.epic_id);
    let eligible = app
        .evaluator()
        .is_eligible(&app.context(), &epic_id)
        .await
        .with_context(|| format!("Failed to check epic {epic_id}"))?;

    output::print_eligibility(&epic_id, eligible, output_mode)?;
    Ok(())
}

/// Execute the candidates command
pub async fn execute_candidates(
    app: &App,
    args: &CandidatesArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let issue_id = IssueId::new(&args.issue_id);
    let candidates = app
        .evaluator()
        .closure_candidates(&app.context(), &issue_id)
        .await
        .with_context(|| format!("Failed to find closure candidates for {issue_id}"))?;

    output::print_epics(
        "Epics eligible for closure after",
        &issue_id,
        &candidates,
        output_mode,
    )?;
    Ok(())
}
