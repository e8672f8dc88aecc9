//! Error types for `ams-lib`.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::IssueId;

/// Primary error type for ams-lib operations.
#[derive(Error, Debug)]
pub enum AmsError {
    // === Issue Errors ===
    /// Issue with the specified ID was not found.
    #[error("Issue not found: #{id}")]
    IssueNotFound { id: IssueId },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// One or more referenced blockers do not exist.
    #[error("Cannot block by non-existent issue(s): {ids:?}")]
    BlockerNotFound { ids: Vec<IssueId> },

    /// An issue listed itself as a blocker.
    #[error("Issue #{id} cannot block itself")]
    SelfBlocking { id: IssueId },

    /// An update carried no fields.
    #[error("Nothing to update: no fields supplied")]
    NothingToUpdate,

    /// Invalid status value.
    #[error("Invalid status: {status} (expected open, in-progress or done)")]
    InvalidStatus { status: String },

    // === Format Errors ===
    /// A line of the issue log is not valid JSON.
    #[error("Corrupted issue log at line {line}: {reason}")]
    JsonlParse { line: usize, reason: String },

    /// A line of the issue log is valid JSON but not a valid issue.
    #[error("Invalid issue data at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    /// A record could not be converted to an issue.
    #[error("Invalid issue record: {0}")]
    Format(String),

    /// The metadata file is unreadable or malformed.
    #[error("Corrupted metadata file {}: {reason}", .path.display())]
    Meta { path: PathBuf, reason: String },

    // === Configuration Errors ===
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === Storage Errors ===
    /// Generic storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of an [`AmsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected input; nothing was written.
    Validation,
    /// Persisted data could not be read or written.
    Storage,
    /// A lookup by ID found nothing.
    NotFound,
}

impl AmsError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::IssueNotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. }
            | Self::BlockerNotFound { .. }
            | Self::SelfBlocking { .. }
            | Self::NothingToUpdate
            | Self::InvalidStatus { .. }
            | Self::Config(_) => ErrorKind::Validation,
            Self::JsonlParse { .. }
            | Self::InvalidRecord { .. }
            | Self::Format(_)
            | Self::Meta { .. }
            | Self::Storage(_)
            | Self::Io(_)
            | Self::Json(_) => ErrorKind::Storage,
        }
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation)
    }

    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self.kind(), ErrorKind::Storage)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound)
    }
}

/// Result type using `AmsError`.
pub type Result<T> = std::result::Result<T, AmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            AmsError::IssueNotFound { id: 3 }.kind(),
            ErrorKind::NotFound
        );
        assert!(AmsError::SelfBlocking { id: 1 }.is_validation());
        assert!(AmsError::NothingToUpdate.is_validation());
        assert!(
            AmsError::JsonlParse {
                line: 2,
                reason: "eof".into()
            }
            .is_storage()
        );
        let io = std::io::Error::other("disk gone");
        assert!(AmsError::from(io).is_storage());
    }

    #[test]
    fn test_messages_carry_context() {
        let err = AmsError::JsonlParse {
            line: 7,
            reason: "expected value".into(),
        };
        assert!(err.to_string().contains("line 7"));

        let err = AmsError::BlockerNotFound { ids: vec![4, 9] };
        assert_eq!(
            err.to_string(),
            "Cannot block by non-existent issue(s): [4, 9]"
        );
    }
}
