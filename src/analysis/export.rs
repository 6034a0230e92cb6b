//! JSON and CSV export of stored runs.

use super::statistics::DataSetStats;
use crate::record::RunRecord;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// CSV header row, one column per stored field.
const CSV_HEADER: &str = "photo_date,game_time,real_time,duration_seconds,tier,wave,killed_by,\
coins_earned,cash_earned,interest_earned,gem_blocks_tapped,cells_earned,reroll_shards_earned,\
coins_value,cells_value,shards_value,coin_efficiency,cell_efficiency,shard_efficiency";

/// Export statistics to a JSON file.
///
/// The output is pretty-printed for human readability.
pub fn export_to_json(stats: &DataSetStats, output_path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(stats).context("Failed to serialize statistics to JSON")?;

    let mut file = File::create(output_path)
        .context(format!("Failed to create JSON file: {}", output_path.display()))?;

    file.write_all(json.as_bytes())
        .context("Failed to write JSON data")?;

    Ok(())
}

/// Writes every record as one CSV row, replacing any existing file.
pub fn export_records_csv(records: &[RunRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create CSV file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", CSV_HEADER).context("Failed to write CSV header")?;

    for record in records {
        let photo_date = record
            .photo_date
            .map(|d| d.to_rfc3339())
            .unwrap_or_default();

        let line = [
            photo_date,
            csv_field(&record.game_time),
            csv_field(&record.real_time),
            record.duration_seconds.to_string(),
            csv_field(&record.tier),
            csv_field(&record.wave),
            csv_field(&record.killed_by),
            csv_field(&record.coins_earned),
            csv_field(&record.cash_earned),
            csv_field(&record.interest_earned),
            csv_field(&record.gem_blocks_tapped),
            csv_field(&record.cells_earned),
            csv_field(&record.reroll_shards_earned),
            record.coins_value.to_string(),
            record.cells_value.to_string(),
            record.shards_value.to_string(),
            format!("{:.4}", record.coin_efficiency),
            format!("{:.4}", record.cell_efficiency),
            format!("{:.4}", record.shard_efficiency),
        ]
        .join(",");

        writeln!(writer, "{}", line).context("Failed to write CSV row")?;
    }

    writer.flush().context("Failed to flush CSV file")?;
    Ok(())
}

/// Quotes a value if it contains a separator, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
