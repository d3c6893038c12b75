//! CSV export of entries and history buckets.

use crate::{Bucket, Entry, EntryLog, Result};
use std::path::Path;

/// A row in the entries CSV
#[derive(Debug, serde::Serialize)]
struct EntryRow {
    id: String,
    timestamp: Option<String>,
    note: Option<String>,
}

impl From<&Entry> for EntryRow {
    fn from(entry: &Entry) -> Self {
        EntryRow {
            id: entry.id.to_string(),
            timestamp: entry.timestamp.map(|t| t.to_rfc3339()),
            note: entry.note.clone(),
        }
    }
}

/// A row in the buckets CSV
#[derive(Debug, serde::Serialize)]
struct BucketRow {
    start: String,
    count: usize,
}

impl From<&Bucket> for BucketRow {
    fn from(bucket: &Bucket) -> Self {
        BucketRow {
            start: bucket.start.to_rfc3339(),
            count: bucket.count,
        }
    }
}

/// Write every entry to `path`, newest first
///
/// Returns the number of rows written.
pub fn export_entries(log: &EntryLog, path: &Path) -> Result<usize> {
    write_rows(path, log.entries().iter().map(EntryRow::from))
}

/// Write buckets to `path` in the order given
pub fn export_buckets(buckets: &[Bucket], path: &Path) -> Result<usize> {
    write_rows(path, buckets.iter().map(BucketRow::from))
}

fn write_rows<R, I>(path: &Path, rows: I) -> Result<usize>
where
    R: serde::Serialize,
    I: IntoIterator<Item = R>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush()?;

    tracing::info!("Exported {} rows to {:?}", count, path);
    Ok(count)
}
