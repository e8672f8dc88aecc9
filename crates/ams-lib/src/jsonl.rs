//! JSONL file I/O for the issue log.
//!
//! Each non-blank line is one complete issue record.

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{AmsError, Result};
use crate::model::Issue;

/// Load every issue from a JSONL file, in file order.
///
/// A missing file reads as an empty log. The first bad line aborts the
/// whole load; no partial result is returned.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, `JsonlParse` for a line that is
/// not UTF-8 JSON, or `InvalidRecord` for a line that is not a valid issue.
pub fn load(path: &Path) -> Result<Vec<Issue>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "issue log missing, treating as empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(AmsError::Io(e)),
    };
    let mut reader = BufReader::new(file);

    let mut issues = Vec::new();
    let mut buf = Vec::new();
    let mut line_num = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_num += 1;

        let line = std::str::from_utf8(&buf).map_err(|e| AmsError::JsonlParse {
            line: line_num,
            reason: format!("invalid UTF-8: {e}"),
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record: serde_json::Value =
            serde_json::from_str(trimmed).map_err(|e| AmsError::JsonlParse {
                line: line_num,
                reason: e.to_string(),
            })?;
        let issue = Issue::from_record(record).map_err(|e| AmsError::InvalidRecord {
            line: line_num,
            reason: match e {
                AmsError::Format(reason) => reason,
                other => other.to_string(),
            },
        })?;
        issues.push(issue);
    }

    debug!(path = %path.display(), count = issues.len(), "loaded issue log");
    Ok(issues)
}

/// Rewrite the whole log from `issues`.
///
/// Writes to a sibling temp file and renames it over the log.
///
/// # Errors
///
/// Returns `Io` or `Json` if the file cannot be written.
pub fn save(path: &Path, issues: &[Issue]) -> Result<()> {
    let tmp_path = path.with_extension("jsonl.tmp");
    let file = fs::File::create(&tmp_path)?;
    let mut writer = BufWriter::new(file);

    for issue in issues {
        let json = serde_json::to_string(issue)?;
        writeln!(writer, "{json}")?;
    }

    writer.flush()?;
    drop(writer);

    fs::rename(&tmp_path, path)?;
    debug!(path = %path.display(), count = issues.len(), "rewrote issue log");

    Ok(())
}
