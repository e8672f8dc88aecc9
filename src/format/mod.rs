//! Output formatting for `ams`.
//!
//! Text rendering lives in [`text`]; JSON report types that are not already
//! provided by `ams_lib` live in [`output`].

mod output;
mod text;

pub use output::{CheckResult, CheckStatus, DoctorReport, VersionOutput};
pub use text::{
    fit_to_width, format_blockers, format_issue_line, format_status, format_status_icon,
    format_time, id_width, terminal_width,
};
