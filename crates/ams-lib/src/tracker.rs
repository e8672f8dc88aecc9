//! Command-level operations composed from the store and the query layer.
//!
//! Each operation validates every referenced ID before anything is written
//! and returns a structured result; rendering is left to the caller.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{AmsError, Result};
use crate::model::{Issue, IssueId, Status};
use crate::query::{self, IssueUpdate, ListFilters};
use crate::store::{IssueStore, StoreConfig};

/// Input for [`Tracker::create`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewIssue {
    pub title: String,
    pub description: Option<String>,
    pub blocked_by: Vec<IssueId>,
}

impl NewIssue {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// An issue together with the issues it blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueDetails {
    #[serde(flatten)]
    pub issue: Issue,
    /// Issues listing this one in their `blocked_by`.
    pub blocking: Vec<Issue>,
}

/// Outcome of completing an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub issue: Issue,
    /// Dependents that became ready because of this completion.
    pub unblocked: Vec<Issue>,
}

/// A consistency problem found by [`Tracker::check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityProblem {
    /// An issue lists a blocker that is not in the log.
    DanglingBlocker { id: IssueId, blocker: IssueId },
    /// An issue lists itself as a blocker.
    SelfBlocking { id: IssueId },
    /// The same ID appears on more than one line.
    DuplicateId { id: IssueId, count: usize },
    /// The counter would hand out an ID that is already taken.
    StaleCounter { next_id: IssueId, max_id: IssueId },
}

impl std::fmt::Display for IntegrityProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingBlocker { id, blocker } => {
                write!(f, "#{id} is blocked by missing issue #{blocker}")
            }
            Self::SelfBlocking { id } => write!(f, "#{id} blocks itself"),
            Self::DuplicateId { id, count } => write!(f, "#{id} appears {count} times"),
            Self::StaleCounter { next_id, max_id } => {
                write!(f, "next_id is {next_id} but the highest stored id is {max_id}")
            }
        }
    }
}

/// Issue tracker over a single store.
#[derive(Debug, Clone)]
pub struct Tracker {
    store: IssueStore,
}

impl Tracker {
    #[must_use]
    pub const fn new(store: IssueStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn open(config: StoreConfig) -> Self {
        Self::new(IssueStore::new(config))
    }

    #[must_use]
    pub const fn store(&self) -> &IssueStore {
        &self.store
    }

    /// Create a new open issue.
    ///
    /// Blockers are checked before an ID is allocated. Once allocated, the ID
    /// is spent even if the save fails.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty title, `BlockerNotFound` for unknown
    /// blockers, or a storage error.
    pub fn create(&self, new: &NewIssue) -> Result<Issue> {
        if new.title.trim().is_empty() {
            return Err(AmsError::validation("title", "cannot be empty"));
        }

        let existing_ids = self.store.get_all_ids()?;
        check_blockers_exist(&new.blocked_by, &existing_ids)?;

        let id = self.store.allocate_next_id()?;
        let issue = Issue::create(
            id,
            new.title.clone(),
            new.description.clone(),
            new.blocked_by.clone(),
        );
        issue.validate(&existing_ids)?;
        self.store.save_issue(&issue)?;

        info!(id, title = %issue.title, "created issue");
        Ok(issue)
    }

    /// List issues matching `filters`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the log cannot be loaded.
    pub fn list(&self, filters: &ListFilters) -> Result<Vec<Issue>> {
        let issues = self.store.load_all()?;
        Ok(query::list_issues(&issues, filters)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Look up one issue and the issues it blocks.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the ID is unknown, or a storage error.
    pub fn show(&self, id: IssueId) -> Result<IssueDetails> {
        let issues = self.store.load_all()?;
        let issue = find(&issues, id)?.clone();
        let blocking = query::reverse_blockers(&issues, id)
            .into_iter()
            .cloned()
            .collect();
        Ok(IssueDetails { issue, blocking })
    }

    /// Apply `update` to an issue.
    ///
    /// Removing a blocker that is not listed is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `NothingToUpdate` for an empty update, `IssueNotFound`,
    /// `BlockerNotFound` or `SelfBlocking` for bad blockers, or a storage
    /// error.
    pub fn update(&self, id: IssueId, update: &IssueUpdate) -> Result<Issue> {
        if update.is_empty() {
            return Err(AmsError::NothingToUpdate);
        }

        let issues = self.store.load_all()?;
        let mut issue = find(&issues, id)?.clone();
        let existing_ids: HashSet<IssueId> = issues.iter().map(|i| i.id).collect();
        // Blockers already on the issue stay accepted even if dangling; only
        // newly added ones must exist.
        let known_ids: HashSet<IssueId> = existing_ids
            .iter()
            .chain(issue.blocked_by.iter())
            .copied()
            .collect();

        if update.add_blockers.contains(&id) {
            return Err(AmsError::SelfBlocking { id });
        }
        check_blockers_exist(&update.add_blockers, &existing_ids)?;

        if let Some(status) = update.status {
            debug!(id, from = %issue.status, to = %status, "status change");
            issue.status = status;
        }
        if let Some(description) = &update.description {
            issue.description.clone_from(description);
        }
        for blocker in &update.add_blockers {
            issue.add_blocker(*blocker);
        }
        for blocker in &update.remove_blockers {
            if !issue.remove_blocker(*blocker) {
                debug!(id, blocker, "blocker not listed, nothing to remove");
            }
        }

        issue.touch();
        issue.validate(&known_ids)?;
        self.store.save_issue(&issue)?;

        info!(id, "updated issue");
        Ok(issue)
    }

    /// Mark an issue done and report which dependents it unblocked.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the ID is unknown, or a storage error.
    pub fn done(&self, id: IssueId) -> Result<Completion> {
        let mut issues = self.store.load_all()?;
        let index = issues
            .iter()
            .position(|issue| issue.id == id)
            .ok_or(AmsError::IssueNotFound { id })?;

        if issues[index].status.is_done() {
            debug!(id, "issue already done");
            return Ok(Completion {
                issue: issues.swap_remove(index),
                unblocked: Vec::new(),
            });
        }

        let previously_blocked: Vec<Issue> = query::reverse_blockers(&issues, id)
            .into_iter()
            .filter(|dependent| !query::is_ready(dependent, &issues))
            .cloned()
            .collect();

        let issue = &mut issues[index];
        issue.status = Status::Done;
        issue.touch();
        let issue = issue.clone();
        self.store.save_issue(&issue)?;

        let unblocked: Vec<Issue> = query::newly_ready(&previously_blocked, &issues)
            .into_iter()
            .cloned()
            .collect();

        info!(id, unblocked = unblocked.len(), "completed issue");
        Ok(Completion { issue, unblocked })
    }

    /// All ready issues, in load order.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the log cannot be loaded.
    pub fn ready(&self) -> Result<Vec<Issue>> {
        let issues = self.store.load_all()?;
        Ok(query::ready_work(&issues).into_iter().cloned().collect())
    }

    /// Scan the store for consistency problems without changing anything.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the log or metadata cannot be read.
    pub fn check(&self) -> Result<Vec<IntegrityProblem>> {
        let issues = self.store.load_all()?;
        let meta = self.store.read_meta()?;
        let mut problems = Vec::new();

        let mut counts: HashMap<IssueId, usize> = HashMap::new();
        for issue in &issues {
            *counts.entry(issue.id).or_insert(0) += 1;
        }

        let mut reported = HashSet::new();
        for issue in &issues {
            let count = counts[&issue.id];
            if count > 1 && reported.insert(issue.id) {
                problems.push(IntegrityProblem::DuplicateId {
                    id: issue.id,
                    count,
                });
            }
            for blocker in &issue.blocked_by {
                if *blocker == issue.id {
                    problems.push(IntegrityProblem::SelfBlocking { id: issue.id });
                } else if !counts.contains_key(blocker) {
                    problems.push(IntegrityProblem::DanglingBlocker {
                        id: issue.id,
                        blocker: *blocker,
                    });
                }
            }
        }

        if let Some(max_id) = issues.iter().map(|issue| issue.id).max() {
            if meta.next_id <= max_id {
                problems.push(IntegrityProblem::StaleCounter {
                    next_id: meta.next_id,
                    max_id,
                });
            }
        }

        for problem in &problems {
            warn!(%problem, "integrity problem");
        }
        Ok(problems)
    }
}

fn find(issues: &[Issue], id: IssueId) -> Result<&Issue> {
    issues
        .iter()
        .find(|issue| issue.id == id)
        .ok_or(AmsError::IssueNotFound { id })
}

fn check_blockers_exist(blockers: &[IssueId], existing_ids: &HashSet<IssueId>) -> Result<()> {
    let mut missing: Vec<IssueId> = blockers
        .iter()
        .copied()
        .filter(|id| !existing_ids.contains(id))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    missing.sort_unstable();
    missing.dedup();
    Err(AmsError::BlockerNotFound { ids: missing })
}
