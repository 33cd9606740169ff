//! Published snapshot fetcher.
//!
//! Reads the file through its raw-content URL, which needs no token. The
//! body must be JSON. A JSON body that is not an array is accepted as an
//! empty snapshot so that the run republishes the whole collection; inside
//! an array, each element is decoded on its own.

use tracing::{debug, warn};
use ureq::Agent;

use dexsync_core::PublishedEntry;

use crate::error::{decode_err, http_err, SyncError};

/// Source of the last-published collection.
pub trait SnapshotSource {
    fn fetch_snapshot(&self) -> Result<Vec<PublishedEntry>, SyncError>;
}

/// Fetches the published file over plain HTTP GET.
#[derive(Debug, Clone)]
pub struct RawSnapshot {
    agent: Agent,
    url: String,
}

impl RawSnapshot {
    pub fn new(agent: Agent, url: impl Into<String>) -> Self {
        Self {
            agent,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SnapshotSource for RawSnapshot {
    fn fetch_snapshot(&self) -> Result<Vec<PublishedEntry>, SyncError> {
        debug!(url = %self.url, "fetching published snapshot");
        let body = self
            .agent
            .get(&self.url)
            .call()
            .map_err(|e| http_err(&self.url, e))?
            .into_string()
            .map_err(|e| decode_err(&self.url, e))?;
        parse_snapshot(&body).map_err(|e| decode_err(&self.url, e.into()))
    }
}

/// Parse a published file body.
///
/// Fails only when the body is not JSON at all. Elements that do not decode
/// as entries are kept as [`PublishedEntry::Malformed`] in their place.
pub fn parse_snapshot(body: &str) -> Result<Vec<PublishedEntry>, serde_json::Error> {
    let serde_json::Value::Array(items) = serde_json::from_str::<serde_json::Value>(body)? else {
        warn!("published snapshot is not a JSON array; treating it as empty");
        return Ok(Vec::new());
    };

    let entries: Vec<_> = items.iter().map(PublishedEntry::from_value).collect();
    let malformed = entries.iter().filter(|e| e.is_malformed()).count();
    if malformed > 0 {
        warn!(malformed, total = entries.len(), "published snapshot has undecodable entries");
    }
    Ok(entries)
}
