//! JSONL entry store.
//!
//! Entries live in a JSON Lines file. Every operation holds a lock on a
//! sidecar `<file>.lock`: appends, deletes and rewrites take it exclusively,
//! loads take it shared. Rewrites go through a temp file in the same
//! directory and an atomic rename, so the lock has to live on a file that is
//! never replaced.

use crate::{Entry, EntryLog, Error, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// File name of the entry log inside the data directory
pub const ENTRIES_FILE: &str = "entries.jsonl";

/// Appended to the log path to name its lock file
pub const LOCK_SUFFIX: &str = ".lock";

/// Sink for newly recorded entries
pub trait EntrySink {
    fn append(&mut self, entry: &Entry) -> Result<()>;
}

/// JSONL-backed entry store with file locking
#[derive(Clone, Debug)]
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    /// Create a store for the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the standard location inside a data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(ENTRIES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the sidecar lock file
    pub fn lock_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(LOCK_SUFFIX);
        PathBuf::from(path)
    }

    /// Load every entry, newest first
    pub fn load(&self) -> Result<EntryLog> {
        if !self.path.exists() {
            return Ok(EntryLog::new(Vec::new()));
        }

        let lock = self.lock(false)?;
        let entries = read_entries(&self.path)?;
        lock.unlock()?;
        Ok(EntryLog::new(entries))
    }

    /// Remove the entry with the given id
    ///
    /// Returns `false` when no entry matched.
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let lock = self.lock(true)?;

        let entries = read_entries(&self.path)?;
        let before = entries.len();
        let kept: Vec<Entry> = entries.into_iter().filter(|e| e.id != id).collect();

        if kept.len() == before {
            lock.unlock()?;
            tracing::debug!("No entry {} to delete", id);
            return Ok(false);
        }

        self.rewrite(&kept)?;
        lock.unlock()?;
        tracing::info!("Deleted entry {}", id);
        Ok(true)
    }

    /// Atomically replace the file contents with `entries`
    pub fn replace_all(&self, entries: &[Entry]) -> Result<()> {
        let lock = self.lock(true)?;
        self.rewrite(entries)?;
        lock.unlock()?;
        Ok(())
    }

    /// Open the sidecar lock file and lock it
    ///
    /// The lock is also released when the returned handle is dropped, so an
    /// early `?` return never leaves the store locked.
    fn lock(&self, exclusive: bool) -> Result<File> {
        self.ensure_parent_dir()?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;

        if exclusive {
            file.lock_exclusive()?;
        } else {
            file.lock_shared()?;
        }
        Ok(file)
    }

    /// Caller must hold the exclusive lock
    fn rewrite(&self, entries: &[Entry]) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Store(format!("{:?} has no parent directory", self.path)))?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            for entry in entries {
                serde_json::to_writer(&mut writer, entry)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Rewrote {} entries to {:?}", entries.len(), self.path);
        Ok(())
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl EntrySink for JsonlStore {
    fn append(&mut self, entry: &Entry) -> Result<()> {
        let lock = self.lock(true)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        lock.unlock()?;

        tracing::debug!("Appended entry {} to {:?}", entry.id, self.path);
        Ok(())
    }
}

/// Read all entries from a JSONL file in file order
///
/// A missing file is an empty log. Lines that fail to parse are skipped with
/// a warning. The caller holds the store lock.
fn read_entries(path: &Path) -> Result<Vec<Entry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    let reader = BufReader::new(&file);
    let mut entries = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Entry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Skipping malformed entry at line {}: {}", line_num + 1, e);
            }
        }
    }

    tracing::debug!("Read {} entries from {:?}", entries.len(), path);
    Ok(entries)
}
