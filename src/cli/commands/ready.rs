use ams_lib::Tracker;

use crate::error::Result;
use crate::format::{format_issue_line, id_width, terminal_width};
use crate::output::OutputContext;

/// Execute the ready command.
///
/// # Errors
///
/// Returns an error if the issue log cannot be loaded.
pub fn execute(tracker: &Tracker, ctx: &OutputContext) -> Result<()> {
    let ready = tracker.ready()?;

    if ctx.is_json() {
        return ctx.json(&ready);
    }

    if ready.is_empty() {
        println!("No ready issues.");
        return Ok(());
    }

    println!("Ready to work ({}):", ready.len());
    let width = id_width(&ready);
    let max_width = terminal_width();
    for issue in &ready {
        println!("  {}", format_issue_line(issue, width, ctx.color(), max_width));
    }
    Ok(())
}
