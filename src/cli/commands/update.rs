use ams_lib::{IssueUpdate, Tracker};

use crate::cli::UpdateArgs;
use crate::error::Result;
use crate::format::format_issue_line;
use crate::output::OutputContext;

/// Execute the update command.
///
/// # Errors
///
/// Returns an error if no fields were given, a referenced ID is unknown, the
/// issue would block itself, or the store cannot be written.
pub fn execute(args: &UpdateArgs, tracker: &Tracker, ctx: &OutputContext) -> Result<()> {
    let update = build_update(args);
    let issue = tracker.update(args.id, &update)?;

    if ctx.is_json() {
        return ctx.json(&issue);
    }

    println!("Updated #{}", issue.id);
    println!("  {}", format_issue_line(&issue, 1, ctx.color(), None));
    Ok(())
}

fn build_update(args: &UpdateArgs) -> IssueUpdate {
    let description = if args.clear_description {
        Some(None)
    } else {
        args.description.clone().map(Some)
    };
    IssueUpdate {
        status: args.status,
        description,
        add_blockers: args.add_blocker.clone(),
        remove_blockers: args.remove_blocker.clone(),
    }
}
