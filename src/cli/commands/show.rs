//! Show command implementation.

use ams_lib::{IssueId, Tracker};

use crate::error::Result;
use crate::format::{format_blockers, format_issue_line, format_status, format_time};
use crate::output::OutputContext;

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the issue does not exist or the log cannot be loaded.
pub fn execute(id: IssueId, tracker: &Tracker, ctx: &OutputContext) -> Result<()> {
    let details = tracker.show(id)?;

    if ctx.is_json() {
        return ctx.json(&details);
    }

    let issue = &details.issue;
    println!("#{} {}", issue.id, issue.title);
    println!("Status:     {}", format_status(issue.status, ctx.color()).trim_end());
    println!("Created:    {}", format_time(&issue.created_at));
    println!("Updated:    {}", format_time(&issue.updated_at));
    if !issue.blocked_by.is_empty() {
        println!("Blocked by: {}", format_blockers(&issue.blocked_by));
    }
    if let Some(description) = &issue.description {
        println!("\n{description}");
    }

    if !details.blocking.is_empty() {
        println!("\nBlocks:");
        for dependent in &details.blocking {
            println!("  {}", format_issue_line(dependent, 1, ctx.color(), None));
        }
    }
    Ok(())
}
