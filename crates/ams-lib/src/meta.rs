//! Store metadata: the ID counter and the format version stamp.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{AmsError, Result};
use crate::model::IssueId;

/// Format version written into fresh stores.
pub const FORMAT_VERSION: &str = "1.0";

/// Contents of `meta.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMeta {
    /// Next ID to hand out.
    pub next_id: IssueId,
    /// Format tag of the store.
    pub version: String,
}

impl Default for StoreMeta {
    fn default() -> Self {
        Self {
            next_id: 1,
            version: FORMAT_VERSION.to_string(),
        }
    }
}

/// Read the metadata file.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read and `Meta` if it is not a valid
/// metadata record. IDs start at 1, so a zero counter is invalid.
pub fn read(path: &Path) -> Result<StoreMeta> {
    let raw = fs::read_to_string(path)?;
    let meta: StoreMeta = serde_json::from_str(&raw).map_err(|e| AmsError::Meta {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if meta.next_id == 0 {
        return Err(AmsError::Meta {
            path: path.to_path_buf(),
            reason: "next_id must be at least 1".to_string(),
        });
    }
    Ok(meta)
}

/// Rewrite the metadata file wholesale.
///
/// # Errors
///
/// Returns `Io` or `Json` on failure.
pub fn write(path: &Path, meta: &StoreMeta) -> Result<()> {
    let mut body = serde_json::to_string_pretty(meta)?;
    body.push('\n');
    fs::write(path, body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.json");
        let meta = StoreMeta {
            next_id: 42,
            ..StoreMeta::default()
        };
        write(&path, &meta).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"next_id\": 42"));
        assert_eq!(read(&path).unwrap(), meta);
    }

    #[test]
    fn test_corrupted_meta() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.json");
        fs::write(&path, "{\"next_id\": ").unwrap();
        let err = read(&path).unwrap_err();
        assert!(matches!(err, AmsError::Meta { .. }));
        assert!(err.to_string().contains("meta.json"));
    }

    #[test]
    fn test_zero_counter_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.json");
        fs::write(&path, "{\"next_id\": 0, \"version\": \"1.0\"}").unwrap();
        let err = read(&path).unwrap_err();
        assert!(matches!(err, AmsError::Meta { .. }));
        assert!(err.to_string().contains("next_id"));
    }

    #[test]
    fn test_missing_counter_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.json");
        fs::write(&path, "{\"version\": \"1.0\"}").unwrap();
        assert!(read(&path).unwrap_err().is_storage());
    }
}
