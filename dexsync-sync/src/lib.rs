//! # dexsync-sync
//!
//! Collaborators and orchestration for one reconciliation run.
//!
//! Call [`pipeline::run`] with a [`pipeline::Connector`]; it fetches the
//! published snapshot and projects the database concurrently, diffs them
//! positionally, and commits the database collection when they differ.

pub mod diff;
pub mod error;
pub mod github;
pub mod http;
pub mod pipeline;
pub mod pocketbase;
pub mod projector;
pub mod publisher;
pub mod snapshot;

pub use diff::{find_differences, reconcile, Difference};
pub use error::SyncError;
pub use github::{CommitInfo, FileHost, FileUpdate, GithubContents};
pub use pipeline::{run, Connector, HttpConnector, RunOptions, RunOutcome, RunReport};
pub use pocketbase::{PocketBase, RecordSource};
pub use snapshot::{parse_snapshot, RawSnapshot, SnapshotSource};
