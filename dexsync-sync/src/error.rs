//! Error types for dexsync-sync.

use thiserror::Error;

use dexsync_core::ConfigError;

/// All errors that can arise during a reconciliation run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Settings were incomplete; raised before any network call.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The database rejected the admin credentials.
    #[error("database authentication failed at {endpoint}: {reason}")]
    Auth { endpoint: String, reason: String },

    /// Transport failure (DNS, TLS, connection reset, timeout).
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// Non-success HTTP status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body could not be read or decoded.
    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (publication payload).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The hosted file moved on between reading its revision and writing.
    #[error("stale revision for {path}; the file changed since it was read")]
    Conflict { path: String },

    /// A concurrent read panicked before the join point.
    #[error("{0} worker panicked")]
    WorkerPanicked(&'static str),
}

/// Map a ureq call error onto [`SyncError`], reading the body of error responses.
pub(crate) fn http_err(endpoint: impl Into<String>, err: ureq::Error) -> SyncError {
    let endpoint = endpoint.into();
    match err {
        ureq::Error::Status(status, response) => SyncError::Status {
            endpoint,
            status,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => SyncError::Http {
            endpoint,
            source: Box::new(transport),
        },
    }
}

/// Convenience constructor for [`SyncError::Decode`].
pub(crate) fn decode_err(endpoint: impl Into<String>, source: std::io::Error) -> SyncError {
    SyncError::Decode {
        endpoint: endpoint.into(),
        source,
    }
}
