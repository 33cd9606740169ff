//! Positional reconciliation of the database and published collections.
//!
//! Both sides are sorted by dex number and then compared index by index.
//! There is no alignment: one inserted entry shifts every later position
//! and each shifted position counts as a difference. Commit messages and
//! the reported update count rely on this.

use tracing::debug;

use dexsync_core::{sort_by_dex, DexSlot};

/// One positional mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    /// 1-based position in the sorted collections.
    pub position: usize,
    /// Names of the database entry as compact JSON; `None` past its end.
    pub db: Option<String>,
    /// Names of the published entry as compact JSON; `None` past its end or
    /// when the published element has no names field.
    pub git: Option<String>,
}

/// Sort both collections in place, then diff them.
pub fn reconcile<D, G>(db: &mut [D], git: &mut [G]) -> Vec<Difference>
where
    D: DexSlot,
    G: DexSlot,
{
    sort_by_dex(db);
    sort_by_dex(git);
    find_differences(db, git)
}

/// Compare two already-sorted collections position by position.
///
/// A position differs when the ids differ, the serialized name lists differ
/// (order included), or only one side has an entry there.
pub fn find_differences<D, G>(db: &[D], git: &[G]) -> Vec<Difference>
where
    D: DexSlot,
    G: DexSlot,
{
    let scanned = db.len().max(git.len());
    debug!(scanned, "highest position compared");

    (0..scanned)
        .filter_map(|i| {
            let (d, g) = (db.get(i), git.get(i));
            let same_id = d.map(DexSlot::dex_id) == g.map(DexSlot::dex_id);
            let db_names = d.and_then(DexSlot::names_json);
            let git_names = g.and_then(DexSlot::names_json);
            (!(same_id && db_names == git_names)).then(|| Difference {
                position: i + 1,
                db: db_names,
                git: git_names,
            })
        })
        .collect()
}
