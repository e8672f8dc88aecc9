//! Doctor command implementation.

use ams_lib::{IntegrityProblem, Tracker};
use serde_json::json;

use crate::error::Result;
use crate::format::{CheckResult, CheckStatus, DoctorReport};
use crate::output::OutputContext;

fn push_check(
    checks: &mut Vec<CheckResult>,
    name: &str,
    status: CheckStatus,
    message: Option<String>,
    details: Option<serde_json::Value>,
) {
    checks.push(CheckResult {
        name: name.to_string(),
        status,
        message,
        details,
    });
}

fn print_report(report: &DoctorReport, ctx: &OutputContext) -> Result<()> {
    if ctx.is_json() {
        return ctx.json(report);
    }

    println!("ams doctor ({})", report.root);
    for check in &report.checks {
        let label = check.status.label();
        if let Some(message) = &check.message {
            println!("{label} {}: {}", check.name, message);
        } else {
            println!("{label} {}", check.name);
        }
    }
    Ok(())
}

/// Run all checks without touching the store.
fn collect_checks(tracker: &Tracker) -> Vec<CheckResult> {
    let store = tracker.store();
    let mut checks = Vec::new();

    if !store.is_initialized() {
        push_check(
            &mut checks,
            "store",
            CheckStatus::Error,
            Some("not initialized (run `ams init`)".to_string()),
            None,
        );
        return checks;
    }
    push_check(&mut checks, "store", CheckStatus::Ok, None, None);

    match store.read_meta() {
        Ok(meta) => push_check(
            &mut checks,
            "meta",
            CheckStatus::Ok,
            Some(format!("next_id {}, format {}", meta.next_id, meta.version)),
            None,
        ),
        Err(e) => push_check(&mut checks, "meta", CheckStatus::Error, Some(e.to_string()), None),
    }

    let issues = match store.load_all() {
        Ok(issues) => issues,
        Err(e) => {
            push_check(&mut checks, "issues", CheckStatus::Error, Some(e.to_string()), None);
            return checks;
        }
    };
    push_check(
        &mut checks,
        "issues",
        CheckStatus::Ok,
        Some(format!("{} issue(s) loaded", issues.len())),
        None,
    );

    match tracker.check() {
        Ok(problems) if problems.is_empty() => {
            push_check(&mut checks, "integrity", CheckStatus::Ok, None, None);
        }
        Ok(problems) => {
            let status = integrity_status(&problems);
            let message = problems
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            push_check(
                &mut checks,
                "integrity",
                status,
                Some(message),
                Some(json!({ "problems": problems })),
            );
        }
        Err(e) => push_check(
            &mut checks,
            "integrity",
            CheckStatus::Error,
            Some(e.to_string()),
            None,
        ),
    }

    checks
}

/// A stale counter or duplicate line can hand out a taken ID; the rest only
/// keeps issues from ever becoming ready.
fn integrity_status(problems: &[IntegrityProblem]) -> CheckStatus {
    let severe = problems.iter().any(|problem| {
        matches!(
            problem,
            IntegrityProblem::DuplicateId { .. } | IntegrityProblem::StaleCounter { .. }
        )
    });
    if severe {
        CheckStatus::Error
    } else {
        CheckStatus::Warn
    }
}

/// Execute the doctor command.
///
/// Exits with status 1 when any check reports an error.
///
/// # Errors
///
/// Returns an error if the report cannot be printed.
pub fn execute(tracker: &Tracker, ctx: &OutputContext) -> Result<()> {
    let checks = collect_checks(tracker);
    let report = DoctorReport::new(tracker.store().root().display().to_string(), checks);
    print_report(&report, ctx)?;

    if !report.ok {
        std::process::exit(1);
    }

    Ok(())
}
