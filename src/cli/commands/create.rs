use ams_lib::{NewIssue, Tracker};

use crate::cli::CreateArgs;
use crate::error::Result;
use crate::format::{format_blockers, format_issue_line};
use crate::output::OutputContext;

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if validation fails or the store cannot be written.
pub fn execute(args: &CreateArgs, tracker: &Tracker, ctx: &OutputContext) -> Result<()> {
    let new = NewIssue {
        title: args.title.clone(),
        description: args.description.clone(),
        blocked_by: args.blocked_by.clone(),
    };
    let issue = tracker.create(&new)?;

    if ctx.is_json() {
        return ctx.json(&issue);
    }

    println!("Created #{}: {}", issue.id, issue.title);
    println!("  {}", format_issue_line(&issue, 1, ctx.color(), None));
    if let Some(description) = &issue.description {
        println!("  Description: {description}");
    }
    if !issue.blocked_by.is_empty() {
        println!("  Blocked by: {}", format_blockers(&issue.blocked_by));
    }
    Ok(())
}
