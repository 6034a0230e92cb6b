//! Per-field grammars for Battle Report values.
//!
//! Every validator trims its input and returns the normalized value, or
//! `None` when the value doesn't fit the field's grammar. Validators are
//! stable: feeding a normalized value back in returns it unchanged.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Time played: optional days, then hours, minutes and 1-3 digits of seconds.
/// The trailing `s` is optional because OCR frequently drops it. Days, hours
/// and minutes are capped at six digits so every accepted time converts to
/// seconds without overflow.
pub const TIME_PATTERN: &str =
    r"(?i)^(?:([0-9]{1,6})d\s*)?([0-9]{1,6})h\s*([0-9]{1,6})m\s*([0-9]{1,3})s?$";

/// Amount with a single trailing unit letter, e.g. `12.5k` or `$1.2B`.
const AMOUNT_PATTERN: &str = r"^\$?[0-9]+(\.[0-9]+)?[A-Za-z]$";

const DIGITS_PATTERN: &str = r"^[0-9]+$";

pub(super) static TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TIME_PATTERN).expect("time pattern compiles"));

static AMOUNT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(AMOUNT_PATTERN).expect("amount pattern compiles"));

static DIGITS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DIGITS_PATTERN).expect("digits pattern compiles"));

/// Inclusive integer range accepted by a numeric field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: u64,
    pub max: u64,
}

impl IntRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Accepted ranges for the integer fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLimits {
    pub tier: IntRange,
    pub wave: IntRange,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            tier: IntRange::new(1, 20),
            wave: IntRange::new(1, 20_000),
        }
    }
}

/// Whether an amount must carry a leading `$`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DollarPrefix {
    /// Cash and interest are always shown with `$`.
    Required,
    /// Coins, cells and shards have no `$`, but one is accepted if OCR adds it.
    Tolerated,
}

/// The eleven stats shown on a Battle Report, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatField {
    GameTime,
    RealTime,
    Tier,
    Wave,
    KilledBy,
    CoinsEarned,
    CashEarned,
    InterestEarned,
    GemBlocksTapped,
    CellsEarned,
    RerollShardsEarned,
}

impl StatField {
    pub const ALL: [StatField; 11] = [
        StatField::GameTime,
        StatField::RealTime,
        StatField::Tier,
        StatField::Wave,
        StatField::KilledBy,
        StatField::CoinsEarned,
        StatField::CashEarned,
        StatField::InterestEarned,
        StatField::GemBlocksTapped,
        StatField::CellsEarned,
        StatField::RerollShardsEarned,
    ];

    /// Lower-case label used to look the field up in OCR pairs.
    pub fn label(&self) -> &'static str {
        match self {
            StatField::GameTime => "game time",
            StatField::RealTime => "real time",
            StatField::Tier => "tier",
            StatField::Wave => "wave",
            StatField::KilledBy => "killed by",
            StatField::CoinsEarned => "coins earned",
            StatField::CashEarned => "cash earned",
            StatField::InterestEarned => "interest earned",
            StatField::GemBlocksTapped => "gem blocks tapped",
            StatField::CellsEarned => "cells earned",
            StatField::RerollShardsEarned => "reroll shards earned",
        }
    }

    /// Label as printed on the Battle Report.
    pub fn display_label(&self) -> &'static str {
        match self {
            StatField::GameTime => "Game Time",
            StatField::RealTime => "Real Time",
            StatField::Tier => "Tier",
            StatField::Wave => "Wave",
            StatField::KilledBy => "Killed By",
            StatField::CoinsEarned => "Coins Earned",
            StatField::CashEarned => "Cash Earned",
            StatField::InterestEarned => "Interest Earned",
            StatField::GemBlocksTapped => "Gem Blocks Tapped",
            StatField::CellsEarned => "Cells Earned",
            StatField::RerollShardsEarned => "Reroll Shards Earned",
        }
    }

    /// Runs the field's grammar over a raw OCR value.
    pub fn validate(&self, raw: &str, limits: &FieldLimits) -> Option<String> {
        match self {
            StatField::GameTime | StatField::RealTime => normalize_time(raw),
            StatField::Tier => validate_int_range(raw, limits.tier),
            StatField::Wave => validate_int_range(raw, limits.wave),
            StatField::KilledBy => validate_killed_by(raw),
            StatField::CashEarned | StatField::InterestEarned => {
                validate_amount(raw, DollarPrefix::Required)
            }
            StatField::CoinsEarned | StatField::CellsEarned | StatField::RerollShardsEarned => {
                validate_amount(raw, DollarPrefix::Tolerated)
            }
            StatField::GemBlocksTapped => validate_digits(raw),
        }
    }
}

impl std::fmt::Display for StatField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_label())
    }
}

/// Normalizes a time string to `"[Dd ]Hh Mm Ss"`.
///
/// Three-digit seconds ending in `5` are cut to their first two digits: the
/// report font's trailing `s` is regularly read as an extra `5` ("42s" → "425").
pub fn normalize_time(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let caps = TIME_REGEX.captures(trimmed)?;

    let hours = caps.get(2)?.as_str();
    let minutes = caps.get(3)?.as_str();
    let mut seconds = caps.get(4)?.as_str();

    if seconds.len() == 3 && seconds.ends_with('5') {
        seconds = &seconds[..2];
    }

    let normalized = match caps.get(1) {
        Some(days) => format!("{}d {}h {}m {}s", days.as_str(), hours, minutes, seconds),
        None => format!("{}h {}m {}s", hours, minutes, seconds),
    };

    Some(normalized)
}

/// Accepts a plain integer inside `range` and returns its canonical form.
pub fn validate_int_range(raw: &str, range: IntRange) -> Option<String> {
    let trimmed = raw.trim();
    if !DIGITS_REGEX.is_match(trimmed) {
        return None;
    }

    let value = trimmed.parse::<u64>().ok()?;
    range.contains(value).then(|| value.to_string())
}

/// Accepts the name of the enemy that ended the run.
///
/// Anything containing a digit or a period is a misplaced numeric value.
pub fn validate_killed_by(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().any(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    Some(trimmed.to_string())
}

/// Accepts an abbreviated amount such as `12.5k` or `$3.4M`.
pub fn validate_amount(raw: &str, dollar: DollarPrefix) -> Option<String> {
    let trimmed = raw.trim();
    if !AMOUNT_REGEX.is_match(trimmed) {
        return None;
    }
    if dollar == DollarPrefix::Required && !trimmed.starts_with('$') {
        return None;
    }
    Some(trimmed.to_string())
}

/// Accepts a digits-only count.
pub fn validate_digits(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    DIGITS_REGEX.is_match(trimmed).then(|| trimmed.to_string())
}
