//! Query and derivation over loaded issues.
//!
//! Everything here is pure: callers load issues from the store and pass the
//! slice in. Results keep the load order unless a sort is requested.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::AmsError;
use crate::model::{Issue, IssueId, Status};

/// Fields to update on an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueUpdate {
    pub status: Option<Status>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub add_blockers: Vec<IssueId>,
    pub remove_blockers: Vec<IssueId>,
}

impl IssueUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.description.is_none()
            && self.add_blockers.is_empty()
            && self.remove_blockers.is_empty()
    }
}

/// Sort key for listing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Created,
    Updated,
    Title,
    Status,
}

impl FromStr for SortKey {
    type Err = AmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "created" | "created_at" => Ok(Self::Created),
            "updated" | "updated_at" => Ok(Self::Updated),
            "title" => Ok(Self::Title),
            "status" => Ok(Self::Status),
            other => Err(AmsError::validation(
                "sort",
                format!("unknown sort key '{other}' (expected id, created, updated, title or status)"),
            )),
        }
    }
}

/// Filter options for listing issues.
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    pub status: Option<Status>,
    /// Sort field; `None` keeps load order.
    pub sort: Option<SortKey>,
    /// Reverse the final order.
    pub reverse: bool,
    pub limit: Option<usize>,
}

/// Filter, sort and truncate `issues` according to `filters`.
#[must_use]
pub fn list_issues<'a>(issues: &'a [Issue], filters: &ListFilters) -> Vec<&'a Issue> {
    let mut results: Vec<&Issue> = issues
        .iter()
        .filter(|issue| filters.status.is_none_or(|status| issue.status == status))
        .collect();

    // Stable sorts: ties keep load order.
    match filters.sort {
        Some(SortKey::Id) => results.sort_by_key(|i| i.id),
        Some(SortKey::Created) => results.sort_by_key(|i| i.created_at),
        Some(SortKey::Updated) => results.sort_by_key(|i| i.updated_at),
        Some(SortKey::Title) => results.sort_by_key(|i| i.title.to_lowercase()),
        Some(SortKey::Status) => results.sort_by_key(|i| status_rank(i.status)),
        None => {}
    }

    if filters.reverse {
        results.reverse();
    }

    if let Some(limit) = filters.limit {
        results.truncate(limit);
    }

    results
}

const fn status_rank(status: Status) -> u8 {
    match status {
        Status::InProgress => 0,
        Status::Open => 1,
        Status::Done => 2,
    }
}

/// Issues whose `blocked_by` lists `target`.
#[must_use]
pub fn reverse_blockers(issues: &[Issue], target: IssueId) -> Vec<&Issue> {
    issues
        .iter()
        .filter(|issue| issue.is_blocked_by(target))
        .collect()
}

fn status_index(issues: &[Issue]) -> HashMap<IssueId, Status> {
    issues.iter().map(|issue| (issue.id, issue.status)).collect()
}

fn ready_in(issue: &Issue, statuses: &HashMap<IssueId, Status>) -> bool {
    issue.status == Status::Open
        && issue
            .blocked_by
            .iter()
            .all(|blocker| statuses.get(blocker).is_some_and(Status::is_done))
}

/// Whether `issue` is open with every blocker done. A blocker missing from
/// `issues` is never satisfied.
#[must_use]
pub fn is_ready(issue: &Issue, issues: &[Issue]) -> bool {
    ready_in(issue, &status_index(issues))
}

/// All ready issues.
#[must_use]
pub fn ready_work(issues: &[Issue]) -> Vec<&Issue> {
    let statuses = status_index(issues);
    issues
        .iter()
        .filter(|issue| ready_in(issue, &statuses))
        .collect()
}

/// Which of `previously_blocked` are ready in `issues_after`.
///
/// Issues are matched by ID, so the returned references reflect the
/// after-change state.
#[must_use]
pub fn newly_ready<'a>(previously_blocked: &[Issue], issues_after: &'a [Issue]) -> Vec<&'a Issue> {
    let statuses = status_index(issues_after);
    previously_blocked
        .iter()
        .filter_map(|before| issues_after.iter().find(|after| after.id == before.id))
        .filter(|issue| ready_in(issue, &statuses))
        .collect()
}
