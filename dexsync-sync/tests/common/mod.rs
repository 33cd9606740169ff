//! In-memory collaborators for pipeline tests.
//!
//! Every collaborator call is appended to a shared [`CallLog`] so tests can
//! assert which steps ran.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dexsync_core::{DexRecord, Entry, PublishedEntry, Settings};
use dexsync_sync::{
    parse_snapshot, projector, CommitInfo, Connector, FileHost, FileUpdate, RecordSource,
    SnapshotSource, SyncError,
};

pub type CallLog = Arc<Mutex<Vec<&'static str>>>;

pub fn record(dex: i64) -> DexRecord {
    DexRecord {
        national_dex: dex,
        generation: Some(1 + dex / 152),
        en: Some(format!("Species {dex}")),
        de: Some(format!("Art {dex}")),
        es: Some(format!("Especie {dex}")),
        fr: Some(format!("Espèce {dex}")),
        it: Some(format!("Specie {dex}")),
        ja_hrkt: Some(format!("しゅ {dex}")),
        zh_hans: Some(format!("物种 {dex}")),
    }
}

pub fn records(range: std::ops::RangeInclusive<i64>) -> Vec<DexRecord> {
    range.map(record).collect()
}

pub fn entries(range: std::ops::RangeInclusive<i64>) -> Vec<Entry> {
    range.map(|n| projector::project(&record(n))).collect()
}

pub fn settings() -> Settings {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("POCKETBASE_URL", "https://pb.invalid"),
        ("ADMIN_EMAIL", "admin@example.com"),
        ("ADMIN_PASSWORD", "pw"),
        ("GITHUB_PAT", "ghp_test"),
    ]);
    Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string())).expect("settings")
}

#[derive(Default)]
pub struct FakeConnector {
    pub db: Vec<DexRecord>,
    /// Body of the published file, parsed on every fetch.
    pub git_body: String,
    pub auth_fails: bool,
    pub stale: bool,
    pub calls: CallLog,
    pub updates: Arc<Mutex<Vec<FileUpdate>>>,
}

impl FakeConnector {
    pub fn new(db: Vec<DexRecord>, git: Vec<Entry>) -> Self {
        Self::with_published_body(db, serde_json::to_string(&git).expect("serialize"))
    }

    pub fn with_published_body(db: Vec<DexRecord>, body: impl Into<String>) -> Self {
        Self {
            db,
            git_body: body.into(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<FileUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

pub struct FakeRecords {
    rows: Vec<DexRecord>,
    calls: CallLog,
}

impl RecordSource for FakeRecords {
    fn list_records(&self, _collection: &str, _sort: &str) -> Result<Vec<DexRecord>, SyncError> {
        self.calls.lock().unwrap().push("list_records");
        Ok(self.rows.clone())
    }
}

pub struct FakeSnapshot {
    body: String,
    calls: CallLog,
}

impl SnapshotSource for FakeSnapshot {
    fn fetch_snapshot(&self) -> Result<Vec<PublishedEntry>, SyncError> {
        self.calls.lock().unwrap().push("fetch_snapshot");
        Ok(parse_snapshot(&self.body)?)
    }
}

pub struct FakeHost {
    stale: bool,
    calls: CallLog,
    updates: Arc<Mutex<Vec<FileUpdate>>>,
}

impl FileHost for FakeHost {
    fn file_revision(&self) -> Result<String, SyncError> {
        self.calls.lock().unwrap().push("file_revision");
        Ok("blob-sha".to_string())
    }

    fn replace_file(&self, update: &FileUpdate) -> Result<CommitInfo, SyncError> {
        self.calls.lock().unwrap().push("replace_file");
        if self.stale {
            return Err(SyncError::Conflict {
                path: "pokemonNames.json".to_string(),
            });
        }
        self.updates.lock().unwrap().push(update.clone());
        Ok(CommitInfo {
            sha: "commit-sha".to_string(),
            html_url: None,
        })
    }
}

impl Connector for FakeConnector {
    type Records = FakeRecords;
    type Snapshot = FakeSnapshot;
    type Host = FakeHost;

    fn connect_records(&self, settings: &Settings) -> Result<FakeRecords, SyncError> {
        self.calls.lock().unwrap().push("connect_records");
        if self.auth_fails {
            return Err(SyncError::Auth {
                endpoint: settings.pocketbase_url.clone(),
                reason: "HTTP 400: Failed to authenticate.".to_string(),
            });
        }
        Ok(FakeRecords {
            rows: self.db.clone(),
            calls: self.calls.clone(),
        })
    }

    fn snapshot(&self, _settings: &Settings) -> FakeSnapshot {
        FakeSnapshot {
            body: self.git_body.clone(),
            calls: self.calls.clone(),
        }
    }

    fn host(&self, _settings: &Settings) -> FakeHost {
        FakeHost {
            stale: self.stale,
            calls: self.calls.clone(),
            updates: self.updates.clone(),
        }
    }
}
