use serde::Serialize;

/// Outcome of one doctor check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warn,
    Error,
}

impl CheckStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// A single named doctor check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Full doctor report.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub ok: bool,
    pub root: String,
    pub checks: Vec<CheckResult>,
}

impl DoctorReport {
    #[must_use]
    pub fn new(root: String, checks: Vec<CheckResult>) -> Self {
        let ok = !checks
            .iter()
            .any(|check| matches!(check.status, CheckStatus::Error));
        Self { ok, root, checks }
    }
}

/// `ams version --json` payload.
#[derive(Debug, Clone, Serialize)]
pub struct VersionOutput<'a> {
    pub version: &'a str,
    pub build: &'a str,
    pub store_format: &'a str,
}
