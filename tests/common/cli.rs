use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use assert_cmd::Command;
use tempfile::TempDir;

/// A temporary working directory; the store lives in `<root>/.ams`.
pub struct AmsWorkspace {
    pub temp_dir: TempDir,
}

impl AmsWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn store_dir(&self) -> PathBuf {
        self.root().join(".ams")
    }

    pub fn issues_path(&self) -> PathBuf {
        self.store_dir().join("issues.jsonl")
    }

    pub fn meta_path(&self) -> PathBuf {
        self.store_dir().join("meta.json")
    }
}

impl Default for AmsWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Captured result of one `ams` invocation.
#[derive(Debug)]
pub struct AmsOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl AmsOutput {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", self.stdout))
    }
}

/// Run `ams` inside `workspace` with a clean environment.
///
/// `label` only shows up in failure messages.
pub fn run_ams<I, S>(workspace: &AmsWorkspace, args: I, label: &str) -> AmsOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ams"));
    cmd.current_dir(workspace.root())
        .args(args)
        .env_remove("AMS_DIR")
        .env_remove("AMS_JSON")
        .env_remove("AMS_LOG")
        .env_remove("AMS_LOG_JSON")
        .env("NO_COLOR", "1");

    let output = cmd
        .output()
        .unwrap_or_else(|e| panic!("{label}: failed to run ams: {e}"));
    AmsOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// Like [`run_ams`] but asserts success.
pub fn run_ams_ok<I, S>(workspace: &AmsWorkspace, args: I, label: &str) -> AmsOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = run_ams(workspace, args, label);
    assert!(
        output.status.success(),
        "{label} failed:\nstdout: {}\nstderr: {}",
        output.stdout,
        output.stderr
    );
    output
}
