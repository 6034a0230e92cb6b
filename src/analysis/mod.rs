//! Statistics and export for stored runs.
//!
//! This module provides:
//! - Statistics calculation (mean, median, std_dev, quartiles) over
//!   duration and efficiency columns
//! - CSV export of every stored run
//! - JSON export of statistics

pub mod export;
pub mod statistics;

pub use statistics::{DataSetStats, StatColumn};

use anyhow::{anyhow, Result};
use std::path::PathBuf;

use crate::record::RunRecord;

/// Runs the full analysis pipeline: calculate stats, export CSV, export JSON.
///
/// Returns (csv_path, json_path).
pub fn generate_analysis(
    records: &[RunRecord],
    csv_path: PathBuf,
    json_path: PathBuf,
) -> Result<(PathBuf, PathBuf)> {
    if records.is_empty() {
        return Err(anyhow!("No runs in the record store"));
    }

    crate::log(&format!("Analyzing {} stored runs", records.len()));

    let stats = DataSetStats::from_records(records);

    export::export_records_csv(records, &csv_path)?;
    crate::log(&format!("Runs CSV saved: {}", csv_path.display()));

    export::export_to_json(&stats, &json_path)?;
    crate::log(&format!("Statistics JSON saved: {}", json_path.display()));

    Ok((csv_path, json_path))
}
