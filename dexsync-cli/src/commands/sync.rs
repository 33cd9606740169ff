//! `dexsync sync` — one reconciliation run.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use dexsync_core::Settings;
use dexsync_sync::{pipeline, Difference, HttpConnector, RunOptions, RunOutcome, RunReport};

/// Arguments for `dexsync sync` (also accepted with no subcommand).
#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Reconcile and report, but never commit.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit a machine-readable run report.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let report = pipeline::run(
            Settings::from_env,
            &HttpConnector::default(),
            RunOptions {
                dry_run: self.dry_run,
            },
        );

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&ReportJson::from(&report))
                    .context("failed to serialize run report")?
            );
        } else {
            print_summary(&report.outcome);
        }

        match report.outcome {
            RunOutcome::Failed(err) => Err(anyhow::Error::new(err).context("sync run failed")),
            _ => Ok(()),
        }
    }
}

#[derive(Serialize)]
struct ReportJson {
    started_at: String,
    duration_ms: u128,
    outcome: &'static str,
    updates: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<&RunReport> for ReportJson {
    fn from(report: &RunReport) -> Self {
        let (commit, error) = match &report.outcome {
            RunOutcome::Published { commit, .. } => (Some(commit.sha.clone()), None),
            RunOutcome::Failed(err) => (None, Some(err.to_string())),
            RunOutcome::NoChanges | RunOutcome::WouldPublish { .. } => (None, None),
        };
        Self {
            started_at: report.started_at.to_rfc3339(),
            duration_ms: report.duration_ms,
            outcome: outcome_key(&report.outcome),
            updates: positions(report.outcome.differences()),
            commit,
            error,
        }
    }
}

fn outcome_key(outcome: &RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::NoChanges => "no_changes",
        RunOutcome::WouldPublish { .. } => "would_publish",
        RunOutcome::Published { .. } => "published",
        RunOutcome::Failed(_) => "failed",
    }
}

fn positions(differences: &[Difference]) -> Vec<usize> {
    differences.iter().map(|d| d.position).collect()
}

fn print_summary(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::NoChanges => println!("✓ no changes"),
        RunOutcome::WouldPublish { differences } => {
            println!("[dry-run] {} updates pending", differences.len());
            for diff in differences {
                println!("  ~  Pokemon {}", diff.position);
            }
        }
        RunOutcome::Published {
            differences,
            commit,
        } => {
            println!("✓ {} updates synced ({})", differences.len(), commit.sha);
            for diff in differences {
                println!("  ✎  Pokemon {}", diff.position);
            }
        }
        RunOutcome::Failed(_) => {}
    }
}
