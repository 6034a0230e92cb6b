//! Builds a `RunRecord` from OCR label/value pairs.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::RunRecord;
use crate::ocr::units::{efficiency, parse_abbreviated_number, time_to_seconds};
use crate::ocr::{FieldLimits, RawPair, StatField};

impl RunRecord {
    /// Builds a record using the default tier/wave limits.
    pub fn build(pairs: &[RawPair], photo_date: Option<DateTime<Utc>>) -> Self {
        Self::build_with_limits(pairs, photo_date, &FieldLimits::default())
    }

    /// Builds a record from OCR pairs.
    ///
    /// Labels are matched case-insensitively; when a label appears more than
    /// once the first occurrence wins. Every field is validated independently,
    /// so a bad value only blanks that field and sets `has_parsing_error`.
    pub fn build_with_limits(
        pairs: &[RawPair],
        photo_date: Option<DateTime<Utc>>,
        limits: &FieldLimits,
    ) -> Self {
        let mut by_label: HashMap<String, &str> = HashMap::with_capacity(pairs.len());
        for pair in pairs {
            by_label
                .entry(pair.label.trim().to_lowercase())
                .or_insert(pair.value.as_str());
        }

        let mut has_parsing_error = false;
        let mut take = |field: StatField| -> String {
            let raw = by_label.get(field.label()).copied().unwrap_or("");
            field.validate(raw, limits).unwrap_or_else(|| {
                has_parsing_error = true;
                String::new()
            })
        };

        let game_time = take(StatField::GameTime);
        let real_time = take(StatField::RealTime);
        let tier = take(StatField::Tier);
        let wave = take(StatField::Wave);
        let killed_by = take(StatField::KilledBy);
        let coins_earned = take(StatField::CoinsEarned);
        let cash_earned = take(StatField::CashEarned);
        let interest_earned = take(StatField::InterestEarned);
        let gem_blocks_tapped = take(StatField::GemBlocksTapped);
        let cells_earned = take(StatField::CellsEarned);
        let reroll_shards_earned = take(StatField::RerollShardsEarned);

        let duration_seconds = time_to_seconds(&real_time);
        let coins_value = parse_abbreviated_number(&coins_earned);
        let cells_value = parse_abbreviated_number(&cells_earned);
        let shards_value = parse_abbreviated_number(&reroll_shards_earned);

        RunRecord {
            game_time,
            real_time,
            duration_seconds,
            tier,
            wave,
            killed_by,
            coins_earned,
            cash_earned,
            interest_earned,
            gem_blocks_tapped,
            cells_earned,
            reroll_shards_earned,
            coins_value,
            cells_value,
            shards_value,
            coin_efficiency: efficiency(coins_value, duration_seconds),
            cell_efficiency: efficiency(cells_value, duration_seconds),
            shard_efficiency: efficiency(shards_value, duration_seconds),
            has_parsing_error,
            photo_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::IntRange;

    fn full_pairs() -> Vec<RawPair> {
        vec![
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
        ]
    }

    #[test]
    fn test_build_partial_record() {
        let pairs = vec![
            RawPair::new("Tier", "7"),
            RawPair::new("Wave", "150"),
            RawPair::new("Killed By", "Boss"),
            RawPair::new("Coins Earned", "12.5k"),
            RawPair::new("Real Time", "0h 10m 0s"),
        ];

        let record = RunRecord::build(&pairs, None);

        assert_eq!(record.tier, "7");
        assert_eq!(record.wave, "150");
        assert!(record.has_parsing_error);
        assert_eq!(record.duration_seconds, 600.0);
        assert_eq!(record.coins_value, 12_500.0);
        assert!((record.coin_efficiency - 20.83).abs() < 0.01);
        assert_eq!(
            record.invalid_fields(),
            vec![
                StatField::GameTime,
                StatField::CashEarned,
                StatField::InterestEarned,
                StatField::GemBlocksTapped,
                StatField::CellsEarned,
                StatField::RerollShardsEarned,
            ]
        );
    }

    #[test]
    fn test_build_full_record() {
        let record = RunRecord::build(&full_pairs(), None);

        assert!(!record.has_parsing_error);
        assert!(record.invalid_fields().is_empty());
        assert_eq!(record.duration_seconds, 12_000.0);
        assert_eq!(record.cells_value, 12_500.0);
        assert_eq!(record.shards_value, 1_200.0);
        assert!((record.cell_efficiency - 12_500.0 / 12_000.0).abs() < 1e-9);
        assert!((record.shard_efficiency - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_labels_case_insensitive_first_wins() {
        let mut pairs = vec![
            RawPair::new("  TIER ", "5"),
            RawPair::new("tier", "9"),
        ];
        pairs.extend(full_pairs());

        let record = RunRecord::build(&pairs, None);
        assert_eq!(record.tier, "5");
    }

    #[test]
    fn test_invalid_real_time_zeroes_derived_values() {
        let mut pairs = full_pairs();
        pairs[1] = RawPair::new("Real Time", "garbled");

        let record = RunRecord::build(&pairs, None);
        assert!(record.has_parsing_error);
        assert_eq!(record.real_time, "");
        assert_eq!(record.duration_seconds, 0.0);
        assert!((record.coins_value - 1.24e9).abs() < 1e-3);
        assert_eq!(record.coin_efficiency, 0.0);
        assert_eq!(record.cell_efficiency, 0.0);
    }

    #[test]
    fn test_oversized_real_time_is_invalid() {
        let mut pairs = full_pairs();
        pairs[1] = RawPair::new("Real Time", "99999999999999999999h 10m 0s");

        let record = RunRecord::build(&pairs, None);
        assert!(record.has_parsing_error);
        assert_eq!(record.real_time, "");
        assert_eq!(record.duration_seconds, 0.0);
        assert_eq!(record.coin_efficiency, 0.0);
        assert_eq!(record.invalid_fields(), vec![StatField::RealTime]);
    }

    #[test]
    fn test_invalid_amount_has_zero_value() {
        let mut pairs = full_pairs();
        pairs[5] = RawPair::new("Coins Earned", "1.24");

        let record = RunRecord::build(&pairs, None);
        assert_eq!(record.coins_earned, "");
        assert_eq!(record.coins_value, 0.0);
        assert_eq!(record.coin_efficiency, 0.0);
        assert_eq!(record.invalid_fields(), vec![StatField::CoinsEarned]);
    }

    #[test]
    fn test_values_match_stored_strings() {
        let record = RunRecord::build(&full_pairs(), None);
        assert_eq!(record.coins_value, parse_abbreviated_number(&record.coins_earned));
        assert_eq!(record.cells_value, parse_abbreviated_number(&record.cells_earned));
        assert_eq!(
            record.shards_value,
            parse_abbreviated_number(&record.reroll_shards_earned)
        );
    }

    #[test]
    fn test_custom_limits() {
        let limits = FieldLimits {
            tier: IntRange::new(1, 10),
            ..FieldLimits::default()
        };
        let record = RunRecord::build_with_limits(&full_pairs(), None, &limits);
        assert_eq!(record.tier, "");
        assert!(record.has_parsing_error);
    }

    #[test]
    fn test_empty_pairs() {
        let record = RunRecord::build(&[], None);
        assert!(record.has_parsing_error);
        assert_eq!(record.invalid_fields().len(), 11);
        assert_eq!(record.duration_seconds, 0.0);
        assert_eq!(record.photo_date, None);
    }
}
