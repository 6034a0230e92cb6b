//! Archive of every ingested screenshot.
//!
//! Unlike the record store, the archive keeps entries that were rejected as
//! duplicates or parsing failures, together with their OCR text, so a run
//! can be corrected and re-submitted later.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::ingest::worker::StoredScreenshot;
use crate::store::{read_json_snapshot, write_json_snapshot};

/// JSON file holding the ordered list of ingested screenshots.
#[derive(Debug, Clone)]
pub struct ScreenshotArchive {
    path: PathBuf,
}

impl ScreenshotArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<StoredScreenshot>> {
        read_json_snapshot(&self.path)
    }

    /// Appends `entries` after the archived ones and rewrites the file.
    ///
    /// Returns the archive size after the append.
    pub fn append(&self, entries: &[StoredScreenshot]) -> Result<usize> {
        let mut archived = self.load()?;
        if entries.is_empty() {
            return Ok(archived.len());
        }

        archived.extend_from_slice(entries);
        write_json_snapshot(&self.path, &archived)?;

        crate::log(&format!(
            "Archived {} screenshots ({} total)",
            entries.len(),
            archived.len()
        ));
        Ok(archived.len())
    }
}
