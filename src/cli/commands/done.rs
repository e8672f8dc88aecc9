use ams_lib::{IssueId, Tracker};

use crate::error::Result;
use crate::format::format_issue_line;
use crate::output::OutputContext;

/// Execute the done command.
///
/// # Errors
///
/// Returns an error if the issue does not exist or the store cannot be
/// written.
pub fn execute(id: IssueId, tracker: &Tracker, ctx: &OutputContext) -> Result<()> {
    let completion = tracker.done(id)?;

    if ctx.is_json() {
        return ctx.json(&completion);
    }

    println!("Completed #{}: {}", completion.issue.id, completion.issue.title);
    if !completion.unblocked.is_empty() {
        println!("\nNow ready:");
        for issue in &completion.unblocked {
            println!("  {}", format_issue_line(issue, 1, ctx.color(), None));
        }
    }
    Ok(())
}
