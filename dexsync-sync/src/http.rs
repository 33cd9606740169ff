//! Shared HTTP agent.
//!
//! One agent is built per run and cloned into each collaborator; clones
//! share the connection pool.

use std::time::Duration;

use ureq::{Agent, AgentBuilder};

/// Read and write timeout applied to every request.
pub const TIMEOUT: Duration = Duration::from_secs(30);

pub const USER_AGENT: &str = concat!("dexsync/", env!("CARGO_PKG_VERSION"));

/// Create the agent used for database, raw-content and GitHub API calls.
pub fn agent() -> Agent {
    AgentBuilder::new()
        .timeout_read(TIMEOUT)
        .timeout_write(TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
}
