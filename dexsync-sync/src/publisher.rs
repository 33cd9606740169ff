//! Publisher: replace the hosted file with the database collection.
//!
//! ## `publish` — 4-step protocol
//!
//! 1. Serialize the sorted database collection (compact, published key order).
//! 2. Base64-encode it for the contents API.
//! 3. Read the file's current revision sha.
//! 4. Submit one commit conditional on that sha.
//!
//! A stale sha fails the run; nothing is retried or re-read.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::info;

use dexsync_core::Entry;

use crate::diff::Difference;
use crate::github::{CommitInfo, FileHost, FileUpdate};
use crate::SyncError;

/// `Auto: N updates synced` followed by one `Pokemon <position>` line per difference.
pub fn commit_message(differences: &[Difference]) -> String {
    let mut message = format!("Auto: {} updates synced", differences.len());
    for diff in differences {
        message.push_str(&format!("\nPokemon {}", diff.position));
    }
    message
}

/// Canonical file body for `entries`.
pub fn render_payload(entries: &[Entry]) -> Result<String, SyncError> {
    Ok(serde_json::to_string(entries)?)
}

/// Base64 of [`render_payload`], as the contents API expects.
pub fn encode_payload(entries: &[Entry]) -> Result<String, SyncError> {
    Ok(STANDARD.encode(render_payload(entries)?))
}

/// Commit `db` over the hosted file. Call only with a non-empty `differences`.
pub fn publish<H>(host: &H, db: &[Entry], differences: &[Difference]) -> Result<CommitInfo, SyncError>
where
    H: FileHost + ?Sized,
{
    let content = encode_payload(db)?;
    let sha = host.file_revision()?;
    let update = FileUpdate {
        message: commit_message(differences),
        content,
        sha,
    };
    let commit = host.replace_file(&update)?;
    info!(
        commit = %commit.sha,
        updates = differences.len(),
        entries = db.len(),
        "published corrected file"
    );
    Ok(commit)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use dexsync_core::{Language, Names};

    use super::*;

    fn diff_at(position: usize) -> Difference {
        Difference {
            position,
            db: Some("[]".into()),
            git: None,
        }
    }

    #[derive(Default)]
    struct RecordingHost {
        updates: RefCell<Vec<FileUpdate>>,
        stale: bool,
    }

    impl FileHost for RecordingHost {
        fn file_revision(&self) -> Result<String, SyncError> {
            Ok("blob-1".into())
        }

        fn replace_file(&self, update: &FileUpdate) -> Result<CommitInfo, SyncError> {
            if self.stale {
                return Err(SyncError::Conflict {
                    path: "pokemonNames.json".into(),
                });
            }
            self.updates.borrow_mut().push(update.clone());
            Ok(CommitInfo {
                sha: "commit-1".into(),
                html_url: None,
            })
        }
    }

    #[test]
    fn message_counts_and_lists_positions() {
        let message = commit_message(&[diff_at(3), diff_at(7), diff_at(12)]);
        assert!(message.contains("3 updates synced"));
        for line in ["Pokemon 3", "Pokemon 7", "Pokemon 12"] {
            assert!(message.lines().any(|l| l == line), "missing '{line}'");
        }
        assert_eq!(message.lines().count(), 4);
    }

    #[test]
    fn payload_is_compact_json_in_base64() {
        let entries = vec![Entry {
            id: 1,
            generation: Some(1),
            names: Names::from_fn(|lang| (lang == Language::En).then(|| "Bulbasaur".to_string())),
        }];
        let decoded = STANDARD.decode(encode_payload(&entries).unwrap()).unwrap();
        assert_eq!(
            String::from_utf8(decoded).unwrap(),
            render_payload(&entries).unwrap()
        );
        assert!(render_payload(&entries)
            .unwrap()
            .starts_with(r#"[{"id":1,"generation":1,"names":[{"en":"Bulbasaur"},{"de":null}"#));
    }

    #[test]
    fn publish_commits_once_against_read_revision() {
        let host = RecordingHost::default();
        let commit = publish(&host, &[], &[diff_at(1)]).expect("publish");
        assert_eq!(commit.sha, "commit-1");

        let updates = host.updates.borrow();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].sha, "blob-1");
        assert_eq!(updates[0].content, STANDARD.encode("[]"));
    }

    #[test]
    fn stale_revision_is_not_retried() {
        let host = RecordingHost {
            stale: true,
            ..RecordingHost::default()
        };
        let err = publish(&host, &[], &[diff_at(1)]).unwrap_err();
        assert!(matches!(err, SyncError::Conflict { .. }));
        assert!(host.updates.borrow().is_empty());
    }
}
