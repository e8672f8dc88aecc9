//! Output mode shared by every command.

use serde::Serialize;

use crate::error::Result;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text.
    Text,
    /// One pretty-printed JSON document per command.
    Json,
}

/// Output settings resolved once per invocation.
#[derive(Debug, Clone, Copy)]
pub struct OutputContext {
    mode: OutputMode,
    color: bool,
}

impl OutputContext {
    #[must_use]
    pub const fn new(mode: OutputMode, color: bool) -> Self {
        Self { mode, color }
    }

    #[must_use]
    pub const fn mode(&self) -> OutputMode {
        self.mode
    }

    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.mode, OutputMode::Json)
    }

    /// Whether ANSI styling should be applied. Always false in JSON mode.
    #[must_use]
    pub const fn color(&self) -> bool {
        self.color && !self.is_json()
    }

    /// Print `value` as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `Json` if serialization fails.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

impl Default for OutputContext {
    fn default() -> Self {
        Self::new(OutputMode::Text, false)
    }
}
