//! Version command implementation.

use ams_lib::meta::FORMAT_VERSION;

use crate::error::Result;
use crate::format::VersionOutput;
use crate::output::OutputContext;

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(ctx: &OutputContext) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build = if cfg!(debug_assertions) {
        "dev"
    } else {
        "release"
    };

    if ctx.is_json() {
        return ctx.json(&VersionOutput {
            version,
            build,
            store_format: FORMAT_VERSION,
        });
    }

    println!("ams {version} ({build}, store format {FORMAT_VERSION})");
    Ok(())
}
