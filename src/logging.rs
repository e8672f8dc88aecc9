//! tracing subscriber setup.
//!
//! Logs go to stderr so stdout stays clean for command output. The filter
//! comes from `AMS_LOG` when set, otherwise from the verbosity flags.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "AMS_LOG";
/// Environment variable switching the formatter to JSON lines.
pub const LOG_JSON_ENV: &str = "AMS_LOG_JSON";

/// Default filter directive for a verbosity level.
#[must_use]
pub const fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init_logging(verbose: u8, quiet: bool, json: bool) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose, quiet)));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    }
}
