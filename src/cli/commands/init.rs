use ams_lib::IssueStore;
use serde_json::json;
use std::fs;

use crate::config::{CONFIG_FILE, CONFIG_TEMPLATE};
use crate::error::Result;
use crate::output::OutputContext;

/// Execute the init command.
///
/// Safe to run on an existing store: only missing files are created.
///
/// # Errors
///
/// Returns an error if the directory or files cannot be created.
pub fn execute(store: &IssueStore, ctx: &OutputContext) -> Result<()> {
    let existed = store.is_initialized();
    store.init()?;

    // Write config.yaml template
    let config_path = store.root().join(CONFIG_FILE);
    if !config_path.exists() {
        fs::write(&config_path, CONFIG_TEMPLATE)?;
    }

    if ctx.is_json() {
        ctx.json(&json!({
            "root": store.root().display().to_string(),
            "already_initialized": existed,
        }))?;
    } else if existed {
        println!("Store already initialized in {}", store.root().display());
    } else {
        println!("Initialized ams store in {}", store.root().display());
    }
    Ok(())
}
