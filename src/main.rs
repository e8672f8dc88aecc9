//! `ams` - Agent Memory System
//!
//! Local issue tracker with blocked-by links, stored as JSONL under `.ams/`.
//! No daemon, no network, no background processes.

use ams::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
