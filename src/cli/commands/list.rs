//! List command implementation.

use ams_lib::{ListFilters, SortKey, Tracker};

use crate::cli::ListArgs;
use crate::error::Result;
use crate::format::{format_issue_line, id_width, terminal_width};
use crate::output::OutputContext;

/// Execute the list command.
///
/// `default_sort` comes from the config file and applies when `--sort` is
/// not given.
///
/// # Errors
///
/// Returns an error if the issue log cannot be loaded.
pub fn execute(
    args: &ListArgs,
    default_sort: Option<SortKey>,
    tracker: &Tracker,
    ctx: &OutputContext,
) -> Result<()> {
    let filters = build_filters(args, default_sort);
    let issues = tracker.list(&filters)?;

    if ctx.is_json() {
        return ctx.json(&issues);
    }

    if issues.is_empty() {
        println!("No issues found.");
        return Ok(());
    }

    let width = id_width(&issues);
    let max_width = terminal_width();
    for issue in &issues {
        println!("{}", format_issue_line(issue, width, ctx.color(), max_width));
    }
    println!("\n{} issue(s)", issues.len());
    Ok(())
}

/// Convert CLI args to query filters.
fn build_filters(args: &ListArgs, default_sort: Option<SortKey>) -> ListFilters {
    ListFilters {
        status: args.status,
        sort: args.sort.or(default_sort),
        reverse: args.reverse,
        limit: args.limit,
    }
}
