//! dexsync — keep the published species-name file in step with the database.
//!
//! # Usage
//!
//! ```text
//! dexsync                       one sync run (same as `dexsync sync`)
//! dexsync sync [--dry-run] [--json]
//! dexsync diff
//! ```
//!
//! Settings come from the environment: `POCKETBASE_URL`, `ADMIN_EMAIL`,
//! `ADMIN_PASSWORD`, `GITHUB_PAT`, plus optional `DEXSYNC_*` overrides.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "dexsync",
    version,
    about = "Sync the published species-name list with the database of record",
    long_about = None,
    args_conflicts_with_subcommands = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    sync: SyncArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile and commit the database collection if it differs.
    Sync(SyncArgs),

    /// Show what a sync would change, without committing.
    Diff(DiffArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Sync(cli.sync)) {
        Commands::Sync(args) => args.run(),
        Commands::Diff(args) => args.run(),
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `info` filter.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
