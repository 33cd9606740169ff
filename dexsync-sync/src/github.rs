//! GitHub contents API: read a file's blob sha, replace the file in one commit.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ureq::Agent;

use dexsync_core::RepoTarget;

use crate::error::{decode_err, http_err, SyncError};

pub const API_BASE: &str = "https://api.github.com";
const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// New content for the hosted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    pub message: String,
    /// Base64 of the full file body.
    pub content: String,
    /// Blob sha the update is conditional on.
    pub sha: String,
}

/// The commit created by an update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Write access to the hosted file.
pub trait FileHost {
    /// Current revision pointer (blob sha) of the file.
    fn file_revision(&self) -> Result<String, SyncError>;

    /// Replace the file in a single commit. Fails with
    /// [`SyncError::Conflict`] if `update.sha` is no longer current.
    fn replace_file(&self, update: &FileUpdate) -> Result<CommitInfo, SyncError>;
}

#[derive(Debug, Deserialize)]
struct ContentMetadata {
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutContents<'a> {
    message: &'a str,
    content: &'a str,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    commit: CommitInfo,
}

/// Contents API client for one file on one branch.
#[derive(Clone)]
pub struct GithubContents {
    agent: Agent,
    api_base: String,
    token: String,
    target: RepoTarget,
}

impl std::fmt::Debug for GithubContents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubContents")
            .field("api_base", &self.api_base)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl GithubContents {
    pub fn new(agent: Agent, token: impl Into<String>, target: RepoTarget) -> Self {
        Self {
            agent,
            api_base: API_BASE.to_string(),
            token: token.into(),
            target,
        }
    }

    /// Point at another API host (GitHub Enterprise).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, self.target.owner, self.target.repo, self.target.path
        )
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("Accept", ACCEPT)
            .set("X-GitHub-Api-Version", API_VERSION)
            .set("Authorization", &format!("Bearer {}", self.token))
    }
}

impl FileHost for GithubContents {
    fn file_revision(&self) -> Result<String, SyncError> {
        let url = self.contents_url();
        let meta: ContentMetadata = self
            .request("GET", &url)
            .query("ref", &self.target.branch)
            .call()
            .map_err(|e| http_err(&url, e))?
            .into_json()
            .map_err(|e| decode_err(&url, e))?;
        debug!(sha = %meta.sha, "read file revision");
        Ok(meta.sha)
    }

    fn replace_file(&self, update: &FileUpdate) -> Result<CommitInfo, SyncError> {
        let url = self.contents_url();
        let body = PutContents {
            message: &update.message,
            content: &update.content,
            sha: &update.sha,
            branch: &self.target.branch,
        };
        let response = match self.request("PUT", &url).send_json(&body) {
            Ok(response) => response,
            Err(ureq::Error::Status(409, _)) => {
                return Err(SyncError::Conflict {
                    path: self.target.to_string(),
                });
            }
            Err(err) => return Err(http_err(&url, err)),
        };
        let created: PutContentsResponse = response
            .into_json()
            .map_err(|e| decode_err(&url, e))?;
        Ok(created.commit)
    }
}
