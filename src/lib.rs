//! Tower Stats
//!
//! Reads "Battle Report" screenshots of The Tower after OCR, validates the
//! recognized stats into run records, and keeps a local history of runs
//! that rejects malformed and duplicate entries.

pub mod analysis;
pub mod config;
pub mod ingest;
pub mod ocr;
pub mod paths;
pub mod record;
pub mod store;

pub use ocr::{read_report, FieldLimits, HalfSplitPairer, LinePairer, RawPair, StatField};
pub use record::RunRecord;
pub use store::{AddOutcome, JsonFileBackend, RecordStore, SharedRecordStore};

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;

/// Logs a message to both stderr and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    eprint!("{}", line);
    let log_path = paths::get_logs_dir().join("tower_stats.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}
