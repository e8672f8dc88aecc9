//! Core data types for ams-lib.
//!
//! An [`Issue`] serializes to one flat JSON object per line of the issue log.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{AmsError, Result};

/// Issue identifier, allocated sequentially from 1.
pub type IssueId = u64;

/// Issue lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Done,
}

impl Status {
    /// Every status, in workflow order.
    pub const ALL: [Self; 3] = [Self::Open, Self::InProgress, Self::Done];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = AmsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "in-progress" | "in_progress" | "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(AmsError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// Format a timestamp the way it is persisted: RFC 3339 with an explicit
/// `+00:00` offset and only as many fractional digits as needed.
#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Parse a persisted timestamp, normalising any offset to UTC.
///
/// # Errors
///
/// Returns the chrono parse error if `raw` is not RFC 3339.
pub fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw.trim()).map(|at| at.with_timezone(&Utc))
}

mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
    }
}

/// The primary issue entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    /// Unique sequential ID.
    pub id: IssueId,

    /// Title (non-empty).
    pub title: String,

    /// Free-form description. Persisted as `null` when absent.
    #[serde(default)]
    pub description: Option<String>,

    /// Workflow status.
    pub status: Status,

    /// Creation timestamp.
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,

    /// IDs of the issues that must be done before this one is ready.
    #[serde(default)]
    pub blocked_by: Vec<IssueId>,
}

impl Issue {
    /// Build a fresh open issue stamped with the current time.
    ///
    /// Repeated blocker IDs are collapsed, keeping the first occurrence.
    #[must_use]
    pub fn create(
        id: IssueId,
        title: impl Into<String>,
        description: Option<String>,
        blocked_by: Vec<IssueId>,
    ) -> Self {
        let now = Utc::now();
        let mut issue = Self {
            id,
            title: title.into(),
            description,
            status: Status::Open,
            created_at: now,
            updated_at: now,
            blocked_by: Vec::with_capacity(blocked_by.len()),
        };
        for blocker in blocked_by {
            issue.add_blocker(blocker);
        }
        issue
    }

    /// Check the issue against the set of IDs currently in the store.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty title, `BlockerNotFound` listing every
    /// unknown blocker, or `SelfBlocking` if the issue blocks itself.
    pub fn validate(&self, existing_ids: &HashSet<IssueId>) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AmsError::validation("title", "cannot be empty"));
        }

        let mut missing: Vec<IssueId> = self
            .blocked_by
            .iter()
            .copied()
            .filter(|id| !existing_ids.contains(id))
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            missing.dedup();
            return Err(AmsError::BlockerNotFound { ids: missing });
        }

        if self.is_blocked_by(self.id) {
            return Err(AmsError::SelfBlocking { id: self.id });
        }

        Ok(())
    }

    /// Serialize to the flat record stored in the issue log.
    ///
    /// # Errors
    ///
    /// Returns `Json` if serialization fails.
    pub fn to_record(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuild an issue from a stored record.
    ///
    /// # Errors
    ///
    /// Returns `Format` when a required key is missing, a value has the wrong
    /// type, a timestamp does not parse or the status tag is unknown.
    pub fn from_record(record: serde_json::Value) -> Result<Self> {
        serde_json::from_value(record).map_err(|e| AmsError::Format(e.to_string()))
    }

    #[must_use]
    pub fn is_blocked_by(&self, id: IssueId) -> bool {
        self.blocked_by.contains(&id)
    }

    /// Append a blocker unless it is already listed.
    pub fn add_blocker(&mut self, id: IssueId) -> bool {
        if self.is_blocked_by(id) {
            return false;
        }
        self.blocked_by.push(id);
        true
    }

    /// Remove a blocker; returns false if it was not listed.
    pub fn remove_blocker(&mut self, id: IssueId) -> bool {
        let before = self.blocked_by.len();
        self.blocked_by.retain(|b| *b != id);
        self.blocked_by.len() != before
    }

    /// Refresh `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
