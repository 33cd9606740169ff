//! PocketBase client: admin authentication and full-collection listing.
//!
//! Listing follows the full-list behaviour of the official SDK: request
//! fixed-size pages until a short page comes back.

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use ureq::Agent;

use dexsync_core::DexRecord;

use crate::error::{decode_err, http_err, SyncError};

/// Page size used when listing records.
pub const PAGE_SIZE: usize = 500;

/// Read access to the database of record.
pub trait RecordSource {
    /// Every record of `collection`, ordered by `sort`.
    fn list_records(&self, collection: &str, sort: &str) -> Result<Vec<DexRecord>, SyncError>;
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
}

/// One page of a records listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage<T> {
    pub page: u32,
    /// `-1` when the server does not report it; paging then ends on a short page.
    #[serde(default = "unknown_total")]
    pub total_pages: i64,
    pub items: Vec<T>,
}

fn unknown_total() -> i64 {
    -1
}

/// An authenticated PocketBase handle.
#[derive(Clone)]
pub struct PocketBase {
    agent: Agent,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for PocketBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PocketBase")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl PocketBase {
    /// Exchange admin credentials for a token.
    ///
    /// A 4xx answer is reported as [`SyncError::Auth`]; anything else that
    /// fails keeps its transport or status error.
    pub fn authenticate(
        agent: Agent,
        base_url: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, SyncError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let endpoint = format!("{base_url}/api/admins/auth-with-password");

        let response = match agent
            .post(&endpoint)
            .send_json(json!({ "identity": email, "password": password }))
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) if (400..500).contains(&status) => {
                return Err(SyncError::Auth {
                    endpoint,
                    reason: format!("HTTP {status}: {}", response.into_string().unwrap_or_default()),
                });
            }
            Err(err) => return Err(http_err(endpoint, err)),
        };

        let auth: AuthResponse = response
            .into_json()
            .map_err(|e| decode_err(&endpoint, e))?;
        info!(url = %base_url, "authenticated with database");

        Ok(Self {
            agent,
            base_url,
            token: auth.token,
        })
    }

    fn records_endpoint(&self, collection: &str) -> String {
        format!("{}/api/collections/{collection}/records", self.base_url)
    }

    fn fetch_page(
        &self,
        collection: &str,
        sort: &str,
        page: u32,
    ) -> Result<RecordPage<DexRecord>, SyncError> {
        let endpoint = self.records_endpoint(collection);
        let per_page = PAGE_SIZE.to_string();
        let page_param = page.to_string();
        self.agent
            .get(&endpoint)
            .set("Authorization", &self.token)
            .query("page", &page_param)
            .query("perPage", &per_page)
            .query("sort", sort)
            .call()
            .map_err(|e| http_err(&endpoint, e))?
            .into_json()
            .map_err(|e| decode_err(&endpoint, e))
    }
}

impl RecordSource for PocketBase {
    fn list_records(&self, collection: &str, sort: &str) -> Result<Vec<DexRecord>, SyncError> {
        collect_pages(PAGE_SIZE, |page| self.fetch_page(collection, sort, page))
    }
}

/// Drain a paginated listing starting at page 1.
///
/// Stops on a short page, or once the reported page count is reached.
pub fn collect_pages<T, F>(page_size: usize, mut fetch: F) -> Result<Vec<T>, SyncError>
where
    F: FnMut(u32) -> Result<RecordPage<T>, SyncError>,
{
    let mut all = Vec::new();
    let mut page = 1;
    loop {
        let batch = fetch(page)?;
        let received = batch.items.len();
        debug!(page = batch.page, received, "fetched record page");
        all.extend(batch.items);

        let last_reported = batch.total_pages >= 0 && i64::from(page) >= batch.total_pages;
        if received < page_size || last_reported {
            return Ok(all);
        }
        page += 1;
    }
}
