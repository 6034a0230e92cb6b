//! Local history of accepted run records.
//!
//! The store keeps records in insertion order and rewrites the whole
//! snapshot through its backend on every mutation. Mutations take `&mut self`;
//! share a store between threads through [`SharedRecordStore`].

pub mod backend;

pub use backend::{
    read_json_snapshot, write_json_snapshot, JsonFileBackend, MemoryBackend, SnapshotBackend,
};

use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::record::{is_duplicate, RunRecord};

/// Result of offering a record to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended and persisted
    Added,
    /// An equivalent run is already stored
    Duplicate,
    /// The record has a parsing error
    Invalid,
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added)
    }
}

impl std::fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddOutcome::Added => write!(f, "added"),
            AddOutcome::Duplicate => write!(f, "not added (duplicate)"),
            AddOutcome::Invalid => write!(f, "not added (parsing error)"),
        }
    }
}

/// Ordered collection of run records backed by a snapshot.
#[derive(Debug)]
pub struct RecordStore<B: SnapshotBackend> {
    records: Vec<RunRecord>,
    backend: B,
}

impl<B: SnapshotBackend> RecordStore<B> {
    /// Opens the store with whatever snapshot the backend currently holds.
    pub fn open(backend: B) -> Result<Self> {
        let records = backend.load()?;
        crate::log(&format!("Record store opened with {} runs", records.len()));
        Ok(Self { records, backend })
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&RunRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Appends `record` unless it has a parsing error or duplicates a stored run.
    ///
    /// Rejections leave the store and its snapshot untouched. If persisting
    /// fails the record is not added and the error is returned.
    pub fn add(&mut self, record: RunRecord) -> Result<AddOutcome> {
        if record.has_parsing_error {
            return Ok(AddOutcome::Invalid);
        }
        if self.is_duplicate(&record) {
            return Ok(AddOutcome::Duplicate);
        }

        let mut next = self.records.clone();
        next.push(record);
        self.commit(next)?;

        Ok(AddOutcome::Added)
    }

    /// Removes every entry exactly equal to `record` and persists.
    ///
    /// Returns the number of entries removed.
    pub fn remove(&mut self, record: &RunRecord) -> Result<usize> {
        let next: Vec<RunRecord> = self
            .records
            .iter()
            .filter(|stored| *stored != record)
            .cloned()
            .collect();
        let removed = self.records.len() - next.len();

        self.commit(next)?;
        Ok(removed)
    }

    /// Removes the entry at `index`, along with any exact copies of it.
    pub fn remove_at(&mut self, index: usize) -> Result<Option<RunRecord>> {
        let Some(record) = self.records.get(index).cloned() else {
            return Ok(None);
        };
        self.remove(&record)?;
        Ok(Some(record))
    }

    /// True if an entry equal to `record` in every field is stored.
    pub fn contains_exact(&self, record: &RunRecord) -> bool {
        self.records.iter().any(|stored| stored == record)
    }

    /// True if any stored entry is a duplicate of `record`.
    pub fn is_duplicate(&self, record: &RunRecord) -> bool {
        self.records.iter().any(|stored| is_duplicate(stored, record))
    }

    /// Persists `next` and only then makes it the current collection.
    fn commit(&mut self, next: Vec<RunRecord>) -> Result<()> {
        self.backend.save(&next)?;
        crate::log(&format!("Record store saved ({} runs)", next.len()));
        self.records = next;
        Ok(())
    }
}

/// Thread-safe handle that funnels all mutations through one lock.
///
/// Each call holds the lock for the whole read-modify-persist cycle, and the
/// guard is released on every return path.
#[derive(Debug)]
pub struct SharedRecordStore<B: SnapshotBackend> {
    inner: Arc<Mutex<RecordStore<B>>>,
}

impl<B: SnapshotBackend> Clone for SharedRecordStore<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: SnapshotBackend> SharedRecordStore<B> {
    pub fn new(store: RecordStore<B>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, RecordStore<B>>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("Record store lock poisoned"))
    }

    pub fn add(&self, record: RunRecord) -> Result<AddOutcome> {
        self.lock()?.add(record)
    }

    pub fn remove(&self, record: &RunRecord) -> Result<usize> {
        self.lock()?.remove(record)
    }

    pub fn contains_exact(&self, record: &RunRecord) -> Result<bool> {
        Ok(self.lock()?.contains_exact(record))
    }

    pub fn is_duplicate(&self, record: &RunRecord) -> Result<bool> {
        Ok(self.lock()?.is_duplicate(record))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Copy of the current collection.
    pub fn snapshot(&self) -> Result<Vec<RunRecord>> {
        Ok(self.lock()?.records().to_vec())
    }
}
