//! Text formatting functions for `ams`.
//!
//! Provides terminal formatting for issue output:
//! - Status icons (○ ◐ ✓) and colored status labels
//! - Issue line formatting with aligned IDs
//! - Width-aware title truncation

use ams_lib::{Issue, IssueId, Status};
use chrono::{DateTime, Utc};
use crossterm::style::{Color, Stylize, style};
use crossterm::tty::IsTty;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Status icon characters.
pub mod icons {
    /// Open issue - available to work (hollow circle).
    pub const OPEN: &str = "○";
    /// In progress - active work (half-filled).
    pub const IN_PROGRESS: &str = "◐";
    /// Done - completed (checkmark).
    pub const DONE: &str = "✓";
}

/// Width of the longest status label (`in-progress`).
const STATUS_WIDTH: usize = 11;

/// Return the icon character for a status.
#[must_use]
pub const fn format_status_icon(status: Status) -> &'static str {
    match status {
        Status::Open => icons::OPEN,
        Status::InProgress => icons::IN_PROGRESS,
        Status::Done => icons::DONE,
    }
}

const fn status_color(status: Status) -> Color {
    match status {
        Status::Open => Color::Cyan,
        Status::InProgress => Color::Yellow,
        Status::Done => Color::Green,
    }
}

/// Status label padded to a fixed width, optionally colored.
#[must_use]
pub fn format_status(status: Status, color: bool) -> String {
    let label = format!("{:<STATUS_WIDTH$}", status.as_str());
    if color {
        style(label).with(status_color(status)).to_string()
    } else {
        label
    }
}

/// `#1, #4` style list of IDs.
#[must_use]
pub fn format_blockers(ids: &[IssueId]) -> String {
    ids.iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Digits needed to right-align every ID in `issues`.
#[must_use]
pub fn id_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .map(|issue| issue.id.to_string().len())
        .max()
        .unwrap_or(1)
}

/// Human-readable UTC time, minute precision.
#[must_use]
pub fn format_time(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Columns of the attached terminal, if stdout is one.
#[must_use]
pub fn terminal_width() -> Option<usize> {
    if !std::io::stdout().is_tty() {
        return None;
    }
    crossterm::terminal::size()
        .ok()
        .map(|(cols, _)| usize::from(cols))
}

/// Truncate `text` to at most `max` display columns, marking the cut with `…`.
#[must_use]
pub fn fit_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Format a single-line issue summary.
///
/// Format: `{icon} #{id} {status} {title}  (blocked by #a, #b)`
#[must_use]
pub fn format_issue_line(issue: &Issue, id_width: usize, color: bool, max_width: Option<usize>) -> String {
    let prefix = format!(
        "{} #{:<id_width$} ",
        format_status_icon(issue.status),
        issue.id,
    );
    let suffix = if issue.blocked_by.is_empty() {
        String::new()
    } else {
        format!("  (blocked by {})", format_blockers(&issue.blocked_by))
    };

    let title = max_width.map_or_else(
        || issue.title.clone(),
        |max| {
            let fixed = prefix.width() + STATUS_WIDTH + 1 + suffix.width();
            fit_to_width(&issue.title, max.saturating_sub(fixed).max(10))
        },
    );

    format!(
        "{prefix}{} {title}{suffix}",
        format_status(issue.status, color)
    )
}
