//! Output formatting for CLI commands.
//!
//! Every command prints either human-readable text or JSON. Text goes
//! through writer-generic helpers so it can be tested without a terminal.

pub mod color;

use crate::domain::{EpicStatus, Issue, IssueId};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

use color::{bold, colorize_id, colorize_priority, colorize_status, dimmed, progress_icon};

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(use_ascii: bool, use_colors: bool) -> Self {
        Self {
            use_ascii,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `RIVETS_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `RIVETS_COLOR`: Set to "0" or "false" to disable colors (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        let use_ascii = match env::var("RIVETS_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "RIVETS_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        // Respect NO_COLOR standard (https://no-color.org/)
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("RIVETS_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Single-epic verdict, as printed by `check`.
#[derive(Debug, Serialize)]
struct EligibilityVerdict<'a> {
    epic_id: &'a IssueId,
    eligible_for_close: bool,
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print open epics with their completion status
pub fn print_epic_statuses(statuses: &[EpicStatus], mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => write_epic_statuses(&mut handle, statuses, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, &statuses),
    }
}

/// Print a list of epics related to `issue_id` under `heading`
pub fn print_epics(
    heading: &str,
    issue_id: &IssueId,
    epics: &[Issue],
    mode: OutputMode,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => {
            write_epics(&mut handle, heading, issue_id, epics, &OutputConfig::from_env())
        }
        OutputMode::Json => write_json(&mut handle, &epics),
    }
}

/// Print whether a single epic is eligible for closure
pub fn print_eligibility(epic_id: &IssueId, eligible: bool, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => {
            write_eligibility(&mut handle, epic_id, eligible, &OutputConfig::from_env())
        }
        OutputMode::Json => write_json(
            &mut handle,
            &EligibilityVerdict {
                epic_id,
                eligible_for_close: eligible,
            },
        ),
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

fn write_epic_statuses<W: Write>(
    w: &mut W,
    statuses: &[EpicStatus],
    config: &OutputConfig,
) -> io::Result<()> {
    if statuses.is_empty() {
        writeln!(w, "No open epics.")?;
        return Ok(());
    }

    for status in statuses {
        let epic = &status.epic;
        let total = status.total_children();
        let closed = status.closed_children();
        let eligible = status.eligible_for_close();

        writeln!(
            w,
            "{} {} {} {}",
            progress_icon(total, closed, eligible, config),
            colorize_id(epic.id.as_str(), config),
            colorize_priority(epic.priority, config),
            epic.title
        )?;

        let progress = if total == 0 {
            "no children".to_string()
        } else {
            format!("{closed}/{total} children closed")
        };
        writeln!(w, "  {} {}", dimmed("Progress:", config), progress)?;

        if eligible {
            writeln!(w, "  {}", color::success("Eligible for closure", config))?;
        }
    }

    let eligible = statuses.iter().filter(|s| s.eligible_for_close()).count();
    writeln!(w)?;
    writeln!(
        w,
        "{} open epic(s), {} eligible for closure",
        statuses.len(),
        eligible
    )
}

fn write_epics<W: Write>(
    w: &mut W,
    heading: &str,
    issue_id: &IssueId,
    epics: &[Issue],
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {}",
        bold(heading, config),
        colorize_id(issue_id.as_str(), config)
    )?;

    if epics.is_empty() {
        writeln!(w, "  (none)")?;
        return Ok(());
    }

    for epic in epics {
        writeln!(
            w,
            "  {} {} [{}] {}",
            colorize_id(epic.id.as_str(), config),
            colorize_priority(epic.priority, config),
            colorize_status(&epic.status, config),
            epic.title
        )?;
    }
    Ok(())
}

fn write_eligibility<W: Write>(
    w: &mut W,
    epic_id: &IssueId,
    eligible: bool,
    config: &OutputConfig,
) -> io::Result<()> {
    let id = colorize_id(epic_id.as_str(), config);
    if eligible {
        writeln!(w, "{id} {}", color::success("is eligible for closure", config))
    } else {
        writeln!(
            w,
            "{id} {}",
            color::warning("is not eligible for closure", config)
        )
    }
}
