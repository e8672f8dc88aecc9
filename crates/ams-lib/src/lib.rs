//! `ams-lib`: core of the ams issue tracker.
//!
//! Issues live in a line-oriented JSON log next to a small metadata file
//! holding the ID counter. Everything here is synchronous and meant for a
//! single process at a time.
//!
//! # Quick Start
//!
//! ```no_run
//! use ams_lib::{IssueUpdate, NewIssue, Status, StoreConfig, Tracker};
//!
//! let tracker = Tracker::open(StoreConfig::in_dir("."));
//!
//! // Create
//! let a = tracker.create(&NewIssue::titled("Write parser")).unwrap();
//! let b = tracker
//!     .create(&NewIssue { blocked_by: vec![a.id], ..NewIssue::titled("Ship it") })
//!     .unwrap();
//!
//! // Update
//! tracker
//!     .update(a.id, &IssueUpdate { status: Some(Status::InProgress), ..Default::default() })
//!     .unwrap();
//!
//! // Complete and see what unblocked
//! let completion = tracker.done(a.id).unwrap();
//! assert_eq!(completion.unblocked[0].id, b.id);
//! ```

pub mod error;
pub mod jsonl;
pub mod meta;
pub mod model;
pub mod query;
pub mod store;
pub mod tracker;

pub use error::{AmsError, ErrorKind, Result};
pub use meta::StoreMeta;
pub use model::{Issue, IssueId, Status};
pub use query::{IssueUpdate, ListFilters, SortKey};
pub use store::{IssueStore, StoreConfig};
pub use tracker::{Completion, IntegrityProblem, IssueDetails, NewIssue, Tracker};
