//! `dexsync diff` — unified diff of what a sync would commit.

use anyhow::Result;
use clap::Args;
use similar::TextDiff;

use dexsync_core::Settings;
use dexsync_sync::{pipeline, Difference, HttpConnector, RunOptions, RunOutcome};

/// Arguments for `dexsync diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let report = pipeline::run(
            Settings::from_env,
            &HttpConnector::default(),
            RunOptions { dry_run: true },
        );

        match report.outcome {
            RunOutcome::Failed(err) => {
                return Err(anyhow::Error::new(err).context("diff failed"));
            }
            RunOutcome::NoChanges => {
                println!("No differences.");
                return Ok(());
            }
            RunOutcome::WouldPublish { differences } | RunOutcome::Published { differences, .. } => {
                for diff in &differences {
                    let unified = render_difference(diff);
                    print!("{unified}");
                    if !unified.ends_with('\n') {
                        println!();
                    }
                }
            }
        }

        Ok(())
    }
}

/// Unified diff from the published names (`a/`) to the database names (`b/`).
pub fn render_difference(diff: &Difference) -> String {
    let old = pretty(diff.git.as_deref());
    let new = pretty(diff.db.as_deref());
    let old_header = format!("a/pokemon/{}", diff.position);
    let new_header = format!("b/pokemon/{}", diff.position);
    TextDiff::from_lines(&old, &new)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string()
}

/// One name object per line so the diff points at the changed language.
fn pretty(names: Option<&str>) -> String {
    let Some(raw) = names else {
        return String::new();
    };
    serde_json::from_str::<serde_json::Value>(raw)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .map(|text| text + "\n")
        .unwrap_or_else(|_| format!("{raw}\n"))
}
