//! Presentation and manual-edit helpers for run records.

use chrono::{DateTime, Utc};

use super::RunRecord;
use crate::ocr::{RawPair, StatField};

impl RunRecord {
    /// The eleven stats as `(label, value)` rows in report order.
    ///
    /// These rows are also the starting point for manual correction: edit
    /// the values and pass them to [`RunRecord::from_edit_pairs`].
    pub fn display_pairs(&self) -> Vec<RawPair> {
        StatField::ALL
            .into_iter()
            .map(|field| RawPair::new(field.display_label(), self.field(field)))
            .collect()
    }

    /// Display rows plus capture date, duration and efficiencies.
    pub fn detail_rows(&self) -> Vec<RawPair> {
        let mut rows = Vec::with_capacity(16);

        if let Some(date) = self.photo_date {
            rows.push(RawPair::new("Photo Date", format_photo_date(date)));
        }

        for field in StatField::ALL {
            rows.push(RawPair::new(field.display_label(), self.field(field)));

            match field {
                StatField::RealTime => rows.push(RawPair::new(
                    "Duration",
                    format!("{}s", format_floor_integer(self.duration_seconds)),
                )),
                StatField::CoinsEarned => rows.push(RawPair::new(
                    "Coin Efficiency",
                    format_floor_integer(self.coin_efficiency),
                )),
                StatField::CellsEarned => rows.push(RawPair::new(
                    "Cell Efficiency",
                    format_floor_hundredths(self.cell_efficiency),
                )),
                StatField::RerollShardsEarned => rows.push(RawPair::new(
                    "Shard Efficiency",
                    format_floor_hundredths(self.shard_efficiency),
                )),
                _ => {}
            }
        }

        rows
    }

    /// One-line summary for list views, e.g. "Tier 11 - Wave 4512".
    pub fn summary(&self) -> String {
        format!("Tier {} - Wave {}", self.tier, self.wave)
    }

    /// Rebuilds a record from user-corrected pairs.
    pub fn from_edit_pairs(pairs: &[RawPair], photo_date: Option<DateTime<Utc>>) -> Self {
        Self::build(pairs, photo_date)
    }
}

/// Renders edited pairs back into OCR-style text, one label line followed
/// by its value line.
///
/// The result is meant for display and archiving; it is not in the stacked
/// two-column layout that `HalfSplitPairer` expects.
pub fn edit_text(pairs: &[RawPair]) -> String {
    pairs
        .iter()
        .map(|pair| format!("{}\n{}", pair.label, pair.value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_photo_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Inserts `,` between groups of three digits.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn format_floor_integer(value: f64) -> String {
    group_thousands(value.max(0.0).floor() as u64)
}

fn format_floor_hundredths(value: f64) -> String {
    // Nudge before flooring so 0.29 * 100 (28.999...) stays 29
    let cents = (value.max(0.0) * 100.0 + 1e-9).floor() as u64;
    format!("{}.{:02}", group_thousands(cents / 100), cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> RunRecord {
        let pairs = vec![
            RawPair::new("Game Time", "1d 2h 3m 4s"),
            RawPair::new("Real Time", "3h 20m 0s"),
            RawPair::new("Tier", "11"),
            RawPair::new("Wave", "4512"),
            RawPair::new("Killed By", "Scatter"),
            RawPair::new("Coins Earned", "1.24B"),
            RawPair::new("Cash Earned", "$58.2M"),
            RawPair::new("Interest Earned", "$3.10M"),
            RawPair::new("Gem Blocks Tapped", "7"),
            RawPair::new("Cells Earned", "12.5K"),
            RawPair::new("Reroll Shards Earned", "1.2K"),
        ];
        RunRecord::build(&pairs, None)
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_floor_formatting() {
        assert_eq!(format_floor_integer(103_333.99), "103,333");
        assert_eq!(format_floor_hundredths(1.041_666), "1.04");
        assert_eq!(format_floor_hundredths(0.29), "0.29");
        assert_eq!(format_floor_hundredths(0.0), "0.00");
    }

    #[test]
    fn test_display_pairs_in_report_order() {
        let pairs = record().display_pairs();
        assert_eq!(pairs.len(), 11);
        assert_eq!(pairs[0], RawPair::new("Game Time", "1d 2h 3m 4s"));
        assert_eq!(pairs[4], RawPair::new("Killed By", "Scatter"));
        assert_eq!(pairs[10], RawPair::new("Reroll Shards Earned", "1.2K"));
    }

    #[test]
    fn test_display_pairs_rebuild_same_record() {
        let original = record();
        let rebuilt = RunRecord::from_edit_pairs(&original.display_pairs(), original.photo_date);
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_manual_correction_clears_error() {
        let mut broken = record().display_pairs();
        broken[3].value = "45I2".to_string();
        let record = RunRecord::from_edit_pairs(&broken, None);
        assert!(record.has_parsing_error);

        let mut fixed = record.display_pairs();
        fixed[3].value = "4512".to_string();
        let record = RunRecord::from_edit_pairs(&fixed, None);
        assert!(!record.has_parsing_error);
        assert_eq!(record.wave, "4512");
    }

    #[test]
    fn test_detail_rows() {
        let mut record = record();
        record.photo_date = Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap());

        let rows = record.detail_rows();
        let value = |label: &str| {
            rows.iter()
                .find(|row| row.label == label)
                .map(|row| row.value.clone())
                .unwrap()
        };

        assert_eq!(rows.len(), 16);
        assert_eq!(rows[0].label, "Photo Date");
        assert_eq!(value("Photo Date"), "2025-03-01 12:30 UTC");
        assert_eq!(value("Duration"), "12,000s");
        assert_eq!(value("Coin Efficiency"), "103,333");
        assert_eq!(value("Cell Efficiency"), "1.04");
        assert_eq!(value("Shard Efficiency"), "0.10");
    }

    #[test]
    fn test_summary() {
        assert_eq!(record().summary(), "Tier 11 - Wave 4512");
    }

    #[test]
    fn test_edit_text() {
        let pairs = vec![RawPair::new("Tier", "7"), RawPair::new("Wave", "150")];
        assert_eq!(edit_text(&pairs), "Tier\n7\nWave\n150");
    }
}
