//! `ams` - Agent Memory System
//!
//! This crate provides the `ams` CLI on top of [`ams_lib`], which owns
//! storage, validation and the ready-work queries.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Store root and output settings (flags, env, `config.yaml`)
//! - [`format`] - Text rendering and JSON report types
//! - [`logging`] - tracing subscriber setup
//! - [`output`] - Output mode shared by all commands

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
pub mod output;

pub use ams_lib::error;
pub use ams_lib::{AmsError, Result};

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
