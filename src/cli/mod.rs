//! Command-line interface for `ams`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;

use ams_lib::{IssueId, SortKey, Status, Tracker};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use crossterm::tty::IsTty;

use crate::config::{self, CliOverrides};
use crate::logging;
use crate::output::{OutputContext, OutputMode};

/// ams - Agent Memory System.
#[derive(Parser, Debug)]
#[command(name = "ams")]
#[command(
    author,
    version,
    about = "Agent Memory System - simple issue tracking for AI agents",
    long_about = None,
    after_help = "Data lives in ./.ams (issues.jsonl + meta.json) unless --dir or AMS_DIR says otherwise."
)]
pub struct Cli {
    /// Store root directory (default: ./.ams)
    #[arg(long, global = true, env = "AMS_DIR", value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true, env = "AMS_JSON")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose logging (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the store (done automatically on first use)
    Init,

    /// Create a new issue
    Create(CreateArgs),

    /// List issues
    List(ListArgs),

    /// Show an issue and what it blocks
    Show(ShowArgs),

    /// Update status, description or blockers of an issue
    Update(UpdateArgs),

    /// Mark an issue done and report what it unblocked
    #[command(alias = "close")]
    Done(DoneArgs),

    /// List ready (open and unblocked) issues
    Ready,

    /// Check the store for corruption and dangling references
    Doctor,

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Issue title
    pub title: String,

    /// Issue description
    #[arg(short, long)]
    pub description: Option<String>,

    /// ID of an issue that blocks this one (repeatable, or comma-separated)
    #[arg(short = 'b', long = "blocked-by", value_name = "ID", value_delimiter = ',')]
    pub blocked_by: Vec<IssueId>,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only issues with this status (open, in-progress, done)
    #[arg(short, long)]
    pub status: Option<Status>,

    /// Sort by id, created, updated, title or status (default: file order)
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Reverse the order
    #[arg(short, long)]
    pub reverse: bool,

    /// Show at most N issues
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Issue ID
    pub id: IssueId,
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Issue ID
    pub id: IssueId,

    /// New status (open, in-progress, done)
    #[arg(short, long)]
    pub status: Option<Status>,

    /// New description
    #[arg(short, long, conflicts_with = "clear_description")]
    pub description: Option<String>,

    /// Remove the description
    #[arg(long)]
    pub clear_description: bool,

    /// Add a blocker (repeatable, or comma-separated)
    #[arg(long, value_name = "ID", value_delimiter = ',')]
    pub add_blocker: Vec<IssueId>,

    /// Remove a blocker (repeatable, or comma-separated)
    #[arg(long, value_name = "ID", value_delimiter = ',')]
    pub remove_blocker: Vec<IssueId>,
}

#[derive(Args, Debug)]
pub struct DoneArgs {
    /// Issue ID
    pub id: IssueId,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: Shell,
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Logging comes first so config resolution can be traced.
    logging::init_logging(cli.verbose, cli.quiet, config::env_flag(logging::LOG_JSON_ENV))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let overrides = CliOverrides {
        dir: cli.dir.clone(),
        json: cli.json,
        no_color: cli.no_color,
    };
    let config = config::load(&overrides)?;

    let mode = if config.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };
    let color = config.color && std::io::stdout().is_tty();
    let ctx = OutputContext::new(mode, color);
    let tracker = Tracker::open(config.store.clone());

    match cli.command {
        Some(Commands::Init) => commands::init::execute(tracker.store(), &ctx)?,
        Some(Commands::Create(args)) => commands::create::execute(&args, &tracker, &ctx)?,
        Some(Commands::List(args)) => {
            commands::list::execute(&args, config.default_sort, &tracker, &ctx)?;
        }
        Some(Commands::Show(args)) => commands::show::execute(args.id, &tracker, &ctx)?,
        Some(Commands::Update(args)) => commands::update::execute(&args, &tracker, &ctx)?,
        Some(Commands::Done(args)) => commands::done::execute(args.id, &tracker, &ctx)?,
        Some(Commands::Ready) => commands::ready::execute(&tracker, &ctx)?,
        Some(Commands::Doctor) => commands::doctor::execute(&tracker, &ctx)?,
        Some(Commands::Version) => commands::version::execute(&ctx)?,
        Some(Commands::Completions(args)) => commands::completions::execute(args.shell),
        None => println!("ams - Agent Memory System. Use --help for usage."),
    }

    Ok(())
}

impl Commands {
    /// Command name as typed on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Create(_) => "create",
            Self::List(_) => "list",
            Self::Show(_) => "show",
            Self::Update(_) => "update",
            Self::Done(_) => "done",
            Self::Ready => "ready",
            Self::Doctor => "doctor",
            Self::Version => "version",
            Self::Completions(_) => "completions",
        }
    }
}
