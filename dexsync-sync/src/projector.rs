//! Database rows → published entries.

use tracing::info;

use dexsync_core::{DexRecord, Entry, Names};

use crate::pocketbase::RecordSource;
use crate::SyncError;

/// Field the listing is ordered by.
pub const SORT_FIELD: &str = "national_dex";

/// Reshape one row. Language columns are read in published order, so
/// `ja_hrkt` lands under `ja-hrkt` and `zh_hans` under `zh-hans`.
pub fn project(record: &DexRecord) -> Entry {
    Entry {
        id: record.national_dex,
        generation: record.generation,
        names: Names::from_fn(|lang| record.column(lang).map(str::to_owned)),
    }
}

/// List every row of `collection` and project it. Order follows the query;
/// callers sort before comparing.
pub fn project_all<S>(source: &S, collection: &str) -> Result<Vec<Entry>, SyncError>
where
    S: RecordSource + ?Sized,
{
    let records = source.list_records(collection, SORT_FIELD)?;
    info!(collection, rows = records.len(), "projected database rows");
    Ok(records.iter().map(project).collect())
}
