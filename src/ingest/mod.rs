//! Batch ingestion of OCR text into the record store.
//!
//! This module provides:
//! - A work queue carrying recognized text from any number of readers
//! - A single-writer worker that builds records and applies store mutations
//! - An archive of every ingested screenshot, stored or not

pub mod archive;
pub mod queue;
pub mod worker;

pub use archive::ScreenshotArchive;
pub use queue::{create_ingest_queue, IngestItem};
pub use worker::{process_item, run_ingest_worker, StoredScreenshot};
