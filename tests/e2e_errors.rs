mod common;
use assert_cmd::Command;
use common::cli::{AmsWorkspace, run_ams, run_ams_ok};
use predicates::prelude::*;

#[test]
fn test_missing_blocker_rejected_without_spending_id() {
    let workspace = AmsWorkspace::new();
    let failed = run_ams(&workspace, ["create", "Orphan", "-b", "42"], "create_bad");
    assert!(!failed.status.success());
    assert!(failed.stderr.contains("42"), "stderr: {}", failed.stderr);

    let created = run_ams_ok(&workspace, ["--json", "create", "Real"], "create_ok").json();
    assert_eq!(created["id"], 1);
}

#[test]
fn test_self_block_rejected() {
    let workspace = AmsWorkspace::new();
    run_ams_ok(&workspace, ["create", "Loop"], "create");
    let failed = run_ams(&workspace, ["update", "1", "--add-blocker", "1"], "self_block");
    assert!(!failed.status.success());
    assert!(failed.stderr.contains("itself"), "stderr: {}", failed.stderr);
}

#[test]
fn test_empty_update_rejected() {
    let workspace = AmsWorkspace::new();
    run_ams_ok(&workspace, ["create", "Idle"], "create");
    let failed = run_ams(&workspace, ["update", "1"], "update_nothing");
    assert!(!failed.status.success());
    assert!(failed.stderr.starts_with("Error:"), "stderr: {}", failed.stderr);
}

#[test]
fn test_unknown_issue() {
    let workspace = AmsWorkspace::new();
    for args in [["show", "7"], ["done", "7"]] {
        let failed = run_ams(&workspace, args, "unknown");
        assert_eq!(failed.status.code(), Some(1));
        assert!(failed.stderr.contains("#7") || failed.stderr.contains('7'));
    }
}

#[test]
fn test_empty_title_rejected() {
    let workspace = AmsWorkspace::new();
    let failed = run_ams(&workspace, ["create", "   "], "create_blank");
    assert!(!failed.status.success());
    assert!(failed.stderr.contains("title"), "stderr: {}", failed.stderr);
}

#[test]
fn test_corrupted_line_reports_line_number() {
    let workspace = AmsWorkspace::new();
    run_ams_ok(&workspace, ["create", "Good"], "create");

    let path = workspace.issues_path();
    let mut raw = std::fs::read_to_string(&path).unwrap();
    raw.push_str("{\"id\": 2, \"title\": \n");
    std::fs::write(&path, raw).unwrap();

    let failed = run_ams(&workspace, ["list"], "list_corrupt");
    assert!(!failed.status.success());
    assert!(failed.stderr.contains("line 2"), "stderr: {}", failed.stderr);

    let doctor = run_ams(&workspace, ["doctor"], "doctor_corrupt");
    assert_eq!(doctor.status.code(), Some(1));
    assert!(doctor.stdout.contains("ERROR issues"), "stdout: {}", doctor.stdout);
}

#[test]
fn test_invalid_status_value() {
    let workspace = AmsWorkspace::new();
    run_ams_ok(&workspace, ["create", "A"], "create");
    let failed = run_ams(&workspace, ["update", "1", "-s", "closed"], "bad_status");
    assert!(!failed.status.success());
}

#[test]
fn test_bad_config_file_is_reported() {
    let workspace = AmsWorkspace::new();
    run_ams_ok(&workspace, ["init"], "init");
    std::fs::write(workspace.store_dir().join("config.yaml"), "sort: priority\n").unwrap();
    let failed = run_ams(&workspace, ["list"], "list_bad_config");
    assert!(!failed.status.success());
    assert!(failed.stderr.contains("sort"), "stderr: {}", failed.stderr);
}

#[test]
fn test_error_goes_to_stderr_only() {
    let workspace = AmsWorkspace::new();
    Command::new(env!("CARGO_BIN_EXE_ams"))
        .current_dir(workspace.root())
        .env_remove("AMS_DIR")
        .env_remove("AMS_JSON")
        .env_remove("AMS_LOG")
        .args(["show", "3"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("Error: Issue not found: #3"));
}

#[test]
fn test_invalid_utf8_line_reports_line_number() {
    let workspace = AmsWorkspace::new();
    run_ams_ok(&workspace, ["create", "Good"], "create");

    let path = workspace.issues_path();
    let mut raw = std::fs::read(&path).unwrap();
    raw.extend_from_slice(b"{\"id\": 2, \"title\": \"\xff\xfe\"}\n");
    std::fs::write(&path, raw).unwrap();

    let failed = run_ams(&workspace, ["ready"], "ready_bad_utf8");
    assert_eq!(failed.status.code(), Some(1));
    assert!(failed.stderr.contains("line 2"), "stderr: {}", failed.stderr);
}
