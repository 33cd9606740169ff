//! Reconciliation run: the single entrypoint used by the CLI.
//!
//! settings → authenticate → (snapshot ∥ projection) → reconcile → publish.
//! Any failure ends the run; later steps never start.

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{error, info};
use ureq::Agent;

use dexsync_core::{ConfigError, Entry, PublishedEntry, Settings};

use crate::diff::{self, Difference};
use crate::github::{CommitInfo, FileHost, GithubContents};
use crate::pocketbase::{PocketBase, RecordSource};
use crate::snapshot::{RawSnapshot, SnapshotSource};
use crate::{http, projector, publisher, SyncError};

/// Builds the collaborators of a run from its settings.
pub trait Connector {
    type Records: RecordSource + Sync;
    type Snapshot: SnapshotSource + Sync;
    type Host: FileHost;

    /// Authenticated database handle.
    fn connect_records(&self, settings: &Settings) -> Result<Self::Records, SyncError>;

    fn snapshot(&self, settings: &Settings) -> Self::Snapshot;

    fn host(&self, settings: &Settings) -> Self::Host;
}

/// Production connector: PocketBase, raw.githubusercontent.com and the
/// GitHub contents API over one shared agent.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    agent: Agent,
}

impl HttpConnector {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self::new(http::agent())
    }
}

impl Connector for HttpConnector {
    type Records = PocketBase;
    type Snapshot = RawSnapshot;
    type Host = GithubContents;

    fn connect_records(&self, settings: &Settings) -> Result<PocketBase, SyncError> {
        PocketBase::authenticate(
            self.agent.clone(),
            &settings.pocketbase_url,
            &settings.admin_email,
            &settings.admin_password,
        )
    }

    fn snapshot(&self, settings: &Settings) -> RawSnapshot {
        RawSnapshot::new(self.agent.clone(), settings.target.raw_url())
    }

    fn host(&self, settings: &Settings) -> GithubContents {
        GithubContents::new(
            self.agent.clone(),
            settings.github_token.clone(),
            settings.target.clone(),
        )
    }
}

/// Options for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Reconcile but never publish.
    pub dry_run: bool,
}

/// Terminal state of a run.
#[derive(Debug)]
pub enum RunOutcome {
    /// Both sides match.
    NoChanges,
    /// Differences found; dry run, so nothing was written.
    WouldPublish { differences: Vec<Difference> },
    /// Differences found and committed.
    Published {
        differences: Vec<Difference>,
        commit: CommitInfo,
    },
    /// A step failed; nothing after it ran.
    Failed(SyncError),
}

impl RunOutcome {
    pub fn differences(&self) -> &[Difference] {
        match self {
            RunOutcome::WouldPublish { differences } | RunOutcome::Published { differences, .. } => {
                differences
            }
            RunOutcome::NoChanges | RunOutcome::Failed(_) => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RunOutcome::Failed(_))
    }
}

/// Summary of one run.
#[derive(Debug)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u128,
    pub outcome: RunOutcome,
}

/// Run one reconciliation.
///
/// Never returns an error: failures are logged and reported as
/// [`RunOutcome::Failed`]. `load_settings` runs before any collaborator is
/// built, so a configuration error makes no network call.
pub fn run<C, F>(load_settings: F, connector: &C, options: RunOptions) -> RunReport
where
    C: Connector,
    F: FnOnce() -> Result<Settings, ConfigError>,
{
    let started_at = Utc::now();
    let clock = Instant::now();

    let outcome = match execute(load_settings, connector, options) {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(error = %err, "sync run failed");
            RunOutcome::Failed(err)
        }
    };

    RunReport {
        started_at,
        duration_ms: clock.elapsed().as_millis(),
        outcome,
    }
}

fn execute<C, F>(load_settings: F, connector: &C, options: RunOptions) -> Result<RunOutcome, SyncError>
where
    C: Connector,
    F: FnOnce() -> Result<Settings, ConfigError>,
{
    let settings = load_settings()?;
    info!(target_file = %settings.target, dry_run = options.dry_run, "starting sync run");

    let records = connector.connect_records(&settings)?;
    let snapshot = connector.snapshot(&settings);

    let (mut git, mut db) = read_both(&snapshot, &records, &settings.collection)?;
    info!(published = git.len(), database = db.len(), "read both collections");

    let differences = diff::reconcile(&mut db, &mut git);
    if differences.is_empty() {
        info!("no changes");
        return Ok(RunOutcome::NoChanges);
    }
    info!(updates = differences.len(), "collections differ");

    if options.dry_run {
        return Ok(RunOutcome::WouldPublish { differences });
    }

    let host = connector.host(&settings);
    let commit = publisher::publish(&host, &db, &differences)?;
    Ok(RunOutcome::Published {
        differences,
        commit,
    })
}

/// Fetch the snapshot and project the database on scoped threads and join.
fn read_both<S, R>(
    snapshot: &S,
    records: &R,
    collection: &str,
) -> Result<(Vec<PublishedEntry>, Vec<Entry>), SyncError>
where
    S: SnapshotSource + Sync,
    R: RecordSource + Sync,
{
    std::thread::scope(|scope| {
        let fetch = scope.spawn(|| snapshot.fetch_snapshot());
        let project = scope.spawn(|| projector::project_all(records, collection));

        let (git, db) = (fetch.join(), project.join());
        let git = git.map_err(|_| SyncError::WorkerPanicked("snapshot fetch"))??;
        let db = db.map_err(|_| SyncError::WorkerPanicked("database projection"))??;
        Ok((git, db))
    })
}
