//! Validated run records built from Battle Report screenshots.
//!
//! This module provides:
//! - The `RunRecord` type persisted by the record store
//! - Construction from OCR pairs, with derived values and efficiencies
//! - The coarse duplicate predicate used to reject re-submissions
//! - Display and edit helpers for presenting a record

pub mod builder;
pub mod display;
pub mod duplicate;

pub use display::edit_text;
pub use duplicate::is_duplicate;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ocr::StatField;

/// Stats of one game run, as read from a single screenshot.
///
/// String fields hold the validated display form and are empty when the
/// OCR value failed its grammar. The `*_value` and `*_efficiency` numbers are
/// always derived from the stored strings at construction time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub game_time: String,
    pub real_time: String,
    /// Real time in seconds, 0 when `real_time` is invalid
    pub duration_seconds: f64,
    pub tier: String,
    pub wave: String,
    pub killed_by: String,
    pub coins_earned: String,
    pub cash_earned: String,
    pub interest_earned: String,
    pub gem_blocks_tapped: String,
    pub cells_earned: String,
    pub reroll_shards_earned: String,
    pub coins_value: f64,
    pub cells_value: f64,
    pub shards_value: f64,
    pub coin_efficiency: f64,
    pub cell_efficiency: f64,
    pub shard_efficiency: f64,
    /// Set when any stat failed validation; such records are never stored
    pub has_parsing_error: bool,
    /// Capture time of the screenshot, when known
    #[serde(default)]
    pub photo_date: Option<DateTime<Utc>>,
}

impl RunRecord {
    /// Returns the validated string stored for `field`.
    pub fn field(&self, field: StatField) -> &str {
        match field {
            StatField::GameTime => &self.game_time,
            StatField::RealTime => &self.real_time,
            StatField::Tier => &self.tier,
            StatField::Wave => &self.wave,
            StatField::KilledBy => &self.killed_by,
            StatField::CoinsEarned => &self.coins_earned,
            StatField::CashEarned => &self.cash_earned,
            StatField::InterestEarned => &self.interest_earned,
            StatField::GemBlocksTapped => &self.gem_blocks_tapped,
            StatField::CellsEarned => &self.cells_earned,
            StatField::RerollShardsEarned => &self.reroll_shards_earned,
        }
    }

    /// Fields that failed validation and need manual correction.
    ///
    /// A validated value is never empty, so an empty field means it was rejected.
    pub fn invalid_fields(&self) -> Vec<StatField> {
        StatField::ALL
            .into_iter()
            .filter(|&field| self.field(field).is_empty())
            .collect()
    }
}
