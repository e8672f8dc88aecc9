//! File-backed issue store.
//!
//! Layout under the store root:
//!
//! - `meta.json`: ID counter and format version
//! - `issues.jsonl`: one issue per line
//!
//! Every operation opens, uses and closes its files within the call. There is
//! no locking: a store root is meant to be used by one process at a time, and
//! concurrent saves are last-writer-wins.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{AmsError, Result};
use crate::jsonl;
use crate::meta::{self, StoreMeta};
use crate::model::{Issue, IssueId};

/// Conventional name of the store root directory.
pub const DEFAULT_DIR_NAME: &str = ".ams";
/// File name of the issue log.
pub const ISSUES_FILE: &str = "issues.jsonl";
/// File name of the metadata record.
pub const META_FILE: &str = "meta.json";

/// Where a store keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// The store root directory itself (e.g. `./.ams`).
    pub root: PathBuf,
}

impl StoreConfig {
    /// Use `root` directly as the store root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use the conventional `.ams` directory inside `base`.
    #[must_use]
    pub fn in_dir(base: impl AsRef<Path>) -> Self {
        Self::new(base.as_ref().join(DEFAULT_DIR_NAME))
    }
}

/// Issue store rooted at an explicit directory.
#[derive(Debug, Clone)]
pub struct IssueStore {
    root: PathBuf,
    issues_path: PathBuf,
    meta_path: PathBuf,
}

impl IssueStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create a handle for the store at `config.root`. Touches nothing on disk.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        let root = config.root;
        Self {
            issues_path: root.join(ISSUES_FILE),
            meta_path: root.join(META_FILE),
            root,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn issues_path(&self) -> &Path {
        &self.issues_path
    }

    #[must_use]
    pub fn meta_path(&self) -> &Path {
        &self.meta_path
    }

    /// Whether both store files are present.
    ///
    /// An existing but empty root directory does not count.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.meta_path.is_file() && self.issues_path.is_file()
    }

    /// Create the root, an empty issue log and a fresh counter for whatever
    /// is missing. Existing files are left alone.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the directory or files cannot be created.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;

        if !self.issues_path.exists() {
            fs::File::create(&self.issues_path)?;
        }

        if !self.meta_path.exists() {
            meta::write(&self.meta_path, &StoreMeta::default())?;
        }

        info!(root = %self.root.display(), "initialized store");
        Ok(())
    }

    /// Initialize on first use.
    ///
    /// # Errors
    ///
    /// Returns `Io` if initialization is needed and fails.
    pub fn ensure_initialized(&self) -> Result<()> {
        if !self.is_initialized() {
            self.init()?;
        }
        Ok(())
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Read `meta.json`.
    ///
    /// # Errors
    ///
    /// Returns `Meta` if the file is corrupted, or `Io` if it cannot be read.
    pub fn read_meta(&self) -> Result<StoreMeta> {
        self.ensure_initialized()?;
        meta::read(&self.meta_path)
    }

    /// Rewrite `meta.json`.
    ///
    /// # Errors
    ///
    /// Returns `Io` or `Json` on write failure.
    pub fn write_meta(&self, meta: &StoreMeta) -> Result<()> {
        self.ensure_initialized()?;
        meta::write(&self.meta_path, meta)
    }

    /// Hand out the next ID and persist the advanced counter.
    ///
    /// The counter moves forward even if the caller never saves an issue
    /// under the returned ID.
    ///
    /// # Errors
    ///
    /// Returns `Meta` if the counter cannot be read or is exhausted, or `Io`
    /// on write failure.
    pub fn allocate_next_id(&self) -> Result<IssueId> {
        let mut meta = self.read_meta()?;
        let id = meta.next_id;
        meta.next_id = id.checked_add(1).ok_or_else(|| AmsError::Meta {
            path: self.meta_path.clone(),
            reason: "ID counter exhausted".to_string(),
        })?;
        self.write_meta(&meta)?;
        debug!(id, "allocated issue id");
        Ok(id)
    }

    // ========================================================================
    // Issues
    // ========================================================================

    /// Load every issue in log order.
    ///
    /// # Errors
    ///
    /// Returns `JsonlParse` or `InvalidRecord` (with the offending line) if any
    /// line is bad, or `Io` on read failure.
    pub fn load_all(&self) -> Result<Vec<Issue>> {
        self.ensure_initialized()?;
        jsonl::load(&self.issues_path)
    }

    /// Insert or replace `issue` (matched by ID) and rewrite the whole log.
    ///
    /// # Errors
    ///
    /// Returns any error from loading the current log or writing the new one.
    pub fn save_issue(&self, issue: &Issue) -> Result<()> {
        let mut issues = self.load_all()?;

        if let Some(existing) = issues.iter_mut().find(|i| i.id == issue.id) {
            existing.clone_from(issue);
            debug!(id = issue.id, "replacing issue");
        } else {
            issues.push(issue.clone());
            debug!(id = issue.id, "appending issue");
        }

        jsonl::save(&self.issues_path, &issues)
    }

    /// Find an issue by ID. Absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns any error from loading the log.
    pub fn get_by_id(&self, id: IssueId) -> Result<Option<Issue>> {
        Ok(self.load_all()?.into_iter().find(|issue| issue.id == id))
    }

    /// All IDs currently in the log.
    ///
    /// # Errors
    ///
    /// Returns any error from loading the log.
    pub fn get_all_ids(&self) -> Result<HashSet<IssueId>> {
        Ok(self.load_all()?.iter().map(|issue| issue.id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;

    fn temp_store() -> (tempfile::TempDir, IssueStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = IssueStore::new(StoreConfig::in_dir(dir.path()));
        (dir, store)
    }

    #[test]
    fn test_ensure_initialized_creates_layout() {
        let (_dir, store) = temp_store();
        assert!(!store.is_initialized());

        store.ensure_initialized().unwrap();
        assert!(store.root().ends_with(DEFAULT_DIR_NAME));
        assert!(store.issues_path().exists());
        assert_eq!(fs::read_to_string(store.issues_path()).unwrap(), "");
        assert_eq!(store.read_meta().unwrap(), StoreMeta::default());
    }

    #[test]
    fn test_ensure_initialized_is_idempotent() {
        let (_dir, store) = temp_store();
        store.ensure_initialized().unwrap();
        assert_eq!(store.allocate_next_id().unwrap(), 1);

        store.ensure_initialized().unwrap();
        store.init().unwrap();
        assert_eq!(store.read_meta().unwrap().next_id, 2);
    }

    #[test]
    fn test_init_restores_missing_pieces() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.root()).unwrap();
        assert!(!store.is_initialized());
        assert!(!store.meta_path().exists());

        store.init().unwrap();
        assert!(store.is_initialized());
        assert!(store.meta_path().exists());
        assert!(store.issues_path().exists());
    }

    #[test]
    fn test_existing_empty_root_initializes_on_first_use() {
        let dir = tempfile::tempdir().unwrap();
        let store = IssueStore::new(StoreConfig::new(dir.path()));
        assert!(store.root().exists());
        assert!(!store.is_initialized());

        assert_eq!(store.allocate_next_id().unwrap(), 1);
        assert!(store.issues_path().is_file());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_missing_log_recreated_alongside_meta() {
        let (_dir, store) = temp_store();
        store.allocate_next_id().unwrap();
        fs::remove_file(store.issues_path()).unwrap();

        assert!(store.load_all().unwrap().is_empty());
        assert!(store.issues_path().is_file());
        assert_eq!(store.read_meta().unwrap().next_id, 2);
    }

    #[test]
    fn test_exhausted_counter_is_error() {
        let (_dir, store) = temp_store();
        store
            .write_meta(&StoreMeta {
                next_id: IssueId::MAX,
                ..StoreMeta::default()
            })
            .unwrap();

        let err = store.allocate_next_id().unwrap_err();
        assert!(matches!(err, AmsError::Meta { .. }));
        assert_eq!(store.read_meta().unwrap().next_id, IssueId::MAX);
    }

    #[test]
    fn test_allocate_ids_monotonic() {
        let (_dir, store) = temp_store();
        let ids: Vec<IssueId> = (0..5).map(|_| store.allocate_next_id().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(store.read_meta().unwrap().next_id, 6);
    }

    #[test]
    fn test_save_appends_then_updates() {
        let (_dir, store) = temp_store();
        let mut first = Issue::create(1, "First", None, vec![]);
        store.save_issue(&first).unwrap();
        store
            .save_issue(&Issue::create(2, "Second", None, vec![1]))
            .unwrap();

        first.status = Status::Done;
        first.touch();
        store.save_issue(&first).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], first);
        assert_eq!(loaded[1].title, "Second");
    }

    #[test]
    fn test_save_same_issue_twice_no_duplicates() {
        let (_dir, store) = temp_store();
        let issue = Issue::create(1, "Once", None, vec![]);
        store.save_issue(&issue).unwrap();
        let after_first = store.load_all().unwrap();

        store.save_issue(&issue).unwrap();
        assert_eq!(store.load_all().unwrap(), after_first);
    }

    #[test]
    fn test_get_by_id_and_ids() {
        let (_dir, store) = temp_store();
        store.save_issue(&Issue::create(1, "A", None, vec![])).unwrap();
        store.save_issue(&Issue::create(3, "C", None, vec![])).unwrap();

        assert_eq!(store.get_by_id(3).unwrap().unwrap().title, "C");
        assert!(store.get_by_id(2).unwrap().is_none());
        assert_eq!(store.get_all_ids().unwrap(), HashSet::from([1, 3]));
    }

    #[test]
    fn test_load_all_fails_on_corrupted_line() {
        let (_dir, store) = temp_store();
        store.save_issue(&Issue::create(1, "A", None, vec![])).unwrap();
        let mut raw = fs::read_to_string(store.issues_path()).unwrap();
        raw.push_str("not json at all\n");
        fs::write(store.issues_path(), raw).unwrap();

        let err = store.load_all().unwrap_err();
        assert!(matches!(err, AmsError::JsonlParse { line: 2, .. }));
        assert!(err.is_storage());

        // Saves refuse to run over a corrupted log.
        assert!(
            store
                .save_issue(&Issue::create(2, "B", None, vec![]))
                .is_err()
        );
    }

    #[test]
    fn test_corrupted_meta_is_storage_error() {
        let (_dir, store) = temp_store();
        store.ensure_initialized().unwrap();
        fs::write(store.meta_path(), "garbage").unwrap();
        assert!(store.allocate_next_id().unwrap_err().is_storage());
    }
}
