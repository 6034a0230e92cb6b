//! Snapshot persistence for the record store.
//!
//! The store always hands over its full collection; backends only need to
//! read and replace one snapshot.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::record::RunRecord;

/// Loads and saves the complete ordered record collection.
pub trait SnapshotBackend {
    fn load(&self) -> Result<Vec<RunRecord>>;
    fn save(&mut self, records: &[RunRecord]) -> Result<()>;
}

/// Stores the collection as one pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotBackend for JsonFileBackend {
    fn load(&self) -> Result<Vec<RunRecord>> {
        read_json_snapshot(&self.path)
    }

    fn save(&mut self, records: &[RunRecord]) -> Result<()> {
        write_json_snapshot(&self.path, records)
    }
}

/// Reads a JSON array snapshot.
///
/// A missing or blank file is an empty snapshot. A file that doesn't parse
/// is an error, so the next save can't overwrite data we failed to read.
pub fn read_json_snapshot<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)
        .context(format!("Failed to read snapshot: {}", path.display()))?;

    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&contents)
        .context(format!("Failed to parse snapshot: {}", path.display()))
}

/// Writes `items` as a pretty JSON array to a temporary file next to `path`
/// and renames it into place, so a crash mid-write leaves the previous
/// snapshot intact.
pub fn write_json_snapshot<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)
        .context(format!("Failed to create snapshot directory: {}", dir.display()))?;

    let json = serde_json::to_string_pretty(items).context("Failed to serialize snapshot")?;

    let mut temp = NamedTempFile::new_in(dir).context("Failed to create temporary snapshot")?;
    temp.write_all(json.as_bytes())
        .context("Failed to write snapshot")?;
    temp.persist(path)
        .context(format!("Failed to replace snapshot: {}", path.display()))?;

    Ok(())
}

/// Keeps the snapshot in memory. Useful for tests and callers that persist
/// elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    snapshot: Vec<RunRecord>,
    saves: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots written so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl SnapshotBackend for MemoryBackend {
    fn load(&self) -> Result<Vec<RunRecord>> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, records: &[RunRecord]) -> Result<()> {
        self.snapshot = records.to_vec();
        self.saves += 1;
        Ok(())
    }
}
