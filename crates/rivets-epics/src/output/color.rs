//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success/Done:  green   (closed status, eligible epics)
//!   - Warning/Active: yellow (in_progress, P1 priority, partial progress)
//!   - Error/Blocked: red     (blocked status, P0 priority)
//!   - Info/Reference: cyan   (issue IDs)
//!   - Muted:         dimmed  (field labels, childless epics)

use crate::domain::IssueStatus;
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply color to status text based on issue status.
pub(crate) fn colorize_status(status: &IssueStatus, config: &OutputConfig) -> String {
    let text = status.to_string();
    if !config.use_colors {
        return text;
    }
    match status {
        IssueStatus::Open => text.white().to_string(),
        IssueStatus::InProgress => text.yellow().to_string(),
        IssueStatus::Blocked => text.red().to_string(),
        IssueStatus::Closed => text.green().to_string(),
        IssueStatus::Other(_) => text.dimmed().to_string(),
    }
}

/// Apply color to priority text based on priority level.
pub(crate) fn colorize_priority(priority: i32, config: &OutputConfig) -> String {
    let text = format!("P{priority}");
    if !config.use_colors {
        return text;
    }
    match priority {
        i32::MIN..=0 => text.red().bold().to_string(),
        1 => text.yellow().to_string(),
        2 => text.blue().to_string(),
        _ => text.dimmed().to_string(),
    }
}

/// Apply color to issue ID.
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return id.to_string();
    }
    id.cyan().to_string()
}

/// Apply dimmed style to text.
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text.
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Progress icon for an epic: done, in progress, or not yet decomposed.
pub(crate) fn progress_icon(
    total: u32,
    closed: u32,
    eligible: bool,
    config: &OutputConfig,
) -> String {
    let icon = match (eligible, total, config.use_ascii) {
        (true, _, false) => "✓",
        (true, _, true) => "[x]",
        (false, 0, false) => "·",
        (false, 0, true) => "[.]",
        (false, _, false) => "○",
        (false, _, true) => "[ ]",
    };
    if !config.use_colors {
        return icon.to_string();
    }
    if eligible {
        icon.green().to_string()
    } else if total == 0 {
        icon.dimmed().to_string()
    } else if closed > 0 {
        icon.yellow().to_string()
    } else {
        icon.white().to_string()
    }
}
