//! Statistics over stored runs.
//!
//! Calculates mean, median, min, max, standard deviation, and quartiles
//! for run duration and the three efficiency columns.

use serde::Serialize;

use crate::record::RunRecord;

/// A numeric column derived from each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatColumn {
    DurationSeconds,
    CoinEfficiency,
    CellEfficiency,
    ShardEfficiency,
}

impl StatColumn {
    pub const ALL: [StatColumn; 4] = [
        StatColumn::DurationSeconds,
        StatColumn::CoinEfficiency,
        StatColumn::CellEfficiency,
        StatColumn::ShardEfficiency,
    ];

    pub fn value(&self, record: &RunRecord) -> f64 {
        match self {
            StatColumn::DurationSeconds => record.duration_seconds,
            StatColumn::CoinEfficiency => record.coin_efficiency,
            StatColumn::CellEfficiency => record.cell_efficiency,
            StatColumn::ShardEfficiency => record.shard_efficiency,
        }
    }
}

/// Statistics for one column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnStats {
    pub column: StatColumn,
    /// Number of values
    pub count: usize,
    /// Arithmetic mean (average)
    pub mean: f64,
    /// Median (middle value)
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Standard deviation (population)
    pub std_dev: f64,
    /// First quartile (25th percentile)
    pub quartile_1: f64,
    /// Third quartile (75th percentile)
    pub quartile_3: f64,
}

/// Statistics for the whole store.
#[derive(Debug, Clone, Serialize)]
pub struct DataSetStats {
    /// Total number of runs
    pub total_runs: usize,
    pub columns: Vec<ColumnStats>,
}

impl DataSetStats {
    /// Calculate statistics for every column over `records`.
    pub fn from_records(records: &[RunRecord]) -> Self {
        let columns = StatColumn::ALL
            .into_iter()
            .map(|column| {
                let values: Vec<f64> = records.iter().map(|r| column.value(r)).collect();
                calculate_column_stats(&values, column)
            })
            .collect();

        DataSetStats {
            total_runs: records.len(),
            columns,
        }
    }

    pub fn column(&self, column: StatColumn) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.column == column)
    }
}

/// Calculate statistics for a single column of values.
fn calculate_column_stats(values: &[f64], column: StatColumn) -> ColumnStats {
    if values.is_empty() {
        return ColumnStats {
            column,
            count: 0,
            mean: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
            std_dev: 0.0,
            quartile_1: 0.0,
            quartile_3: 0.0,
        };
    }

    let count = values.len();

    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = values.iter().sum::<f64>() / count as f64;

    let variance: f64 = values
        .iter()
        .map(|&v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;

    ColumnStats {
        column,
        count,
        mean,
        median: calculate_percentile(&sorted, 50.0),
        min: sorted[0],
        max: sorted[count - 1],
        std_dev: variance.sqrt(),
        quartile_1: calculate_percentile(&sorted, 25.0),
        quartile_3: calculate_percentile(&sorted, 75.0),
    }
}

/// Calculate percentile using linear interpolation.
fn calculate_percentile(sorted: &[f64], percentile: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }

    let index = (percentile / 100.0) * (n - 1) as f64;
    let lower_idx = index.floor() as usize;
    let upper_idx = index.ceil() as usize;

    let lower = sorted[lower_idx];
    let upper = sorted[upper_idx];
    lower + (upper - lower) * index.fract()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::RawPair;

    fn record(real_time: &str, coins: &str) -> RunRecord {
        RunRecord::build(
            &[
                RawPair::new("Real Time", real_time),
                RawPair::new("Coins Earned", coins),
            ],
            None,
        )
    }

    #[test]
    fn test_mean_and_median() {
        let stats = calculate_column_stats(&[1.0, 2.0, 3.0, 4.0, 5.0], StatColumn::CoinEfficiency);
        assert!((stats.mean - 3.0).abs() < 0.001);
        assert!((stats.median - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_median_even() {
        let stats = calculate_column_stats(&[4.0, 1.0, 3.0, 2.0], StatColumn::CoinEfficiency);
        assert!((stats.median - 2.5).abs() < 0.001);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn test_std_dev_and_quartiles() {
        let stats = calculate_column_stats(&[1.0, 2.0, 3.0, 4.0, 5.0], StatColumn::CoinEfficiency);
        assert!((stats.std_dev - 1.414).abs() < 0.01);
        assert!((stats.quartile_1 - 2.0).abs() < 0.001);
        assert!((stats.quartile_3 - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_empty_values() {
        let stats = calculate_column_stats(&[], StatColumn::CellEfficiency);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, 0.0);
    }

    #[test]
    fn test_from_records() {
        let records = vec![
            record("0h 10m 0s", "12.5k"),
            record("0h 20m 0s", "12.5k"),
        ];
        let stats = DataSetStats::from_records(&records);

        assert_eq!(stats.total_runs, 2);
        assert_eq!(stats.columns.len(), 4);

        let duration = stats.column(StatColumn::DurationSeconds).unwrap();
        assert!((duration.mean - 900.0).abs() < 0.001);

        let coins = stats.column(StatColumn::CoinEfficiency).unwrap();
        // 12500/600 and 12500/1200
        assert!((coins.max - 20.8333).abs() < 0.001);
        assert!((coins.min - 10.4166).abs() < 0.001);
    }
}
