//! Unit normalization for Battle Report values.
//!
//! Converts normalized time strings to seconds and expands abbreviated
//! amounts ("12.5k", "$1.2b") into plain numbers.

use regex::Regex;
use std::sync::LazyLock;

use super::fields::TIME_REGEX;

/// Numeric prefix of an abbreviated amount, once `$` and the unit letter are removed.
const AMOUNT_PREFIX_PATTERN: &str = r"^[0-9]+(\.[0-9]+)?$";

static AMOUNT_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(AMOUNT_PREFIX_PATTERN).expect("amount prefix pattern compiles"));

/// Returns the power of ten denoted by an abbreviation letter.
fn unit_exponent(unit: char) -> Option<i32> {
    match unit {
        'k' => Some(3),
        'm' => Some(6),
        'b' => Some(9),
        't' => Some(12),
        'q' => Some(15),
        _ => None,
    }
}

/// Converts a time string ("1d 2h 3m 4s", "0h 10m 0s") into total seconds.
///
/// Returns 0 for anything that doesn't match the time grammar, including
/// the empty string stored for an invalid field.
pub fn time_to_seconds(time: &str) -> f64 {
    let Some(caps) = TIME_REGEX.captures(time.trim()) else {
        return 0.0;
    };

    let part = |idx: usize| -> u64 {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    let total = part(1)
        .saturating_mul(86_400)
        .saturating_add(part(2).saturating_mul(3_600))
        .saturating_add(part(3).saturating_mul(60))
        .saturating_add(part(4));

    total as f64
}

/// Expands an abbreviated amount into its numeric value.
///
/// A single leading `$` is ignored and the trailing letter is read case-insensitively
/// as k/m/b/t/q (10^3 .. 10^15). Missing or unknown unit letters yield 0.
pub fn parse_abbreviated_number(text: &str) -> f64 {
    let trimmed = text.trim();
    let lowered = trimmed.strip_prefix('$').unwrap_or(trimmed).to_lowercase();

    let Some(unit) = lowered.chars().last() else {
        return 0.0;
    };
    let Some(exponent) = unit_exponent(unit) else {
        return 0.0;
    };

    let prefix = &lowered[..lowered.len() - unit.len_utf8()];
    if !AMOUNT_PREFIX_REGEX.is_match(prefix) {
        return 0.0;
    }

    // Parsing "<prefix>e<exp>" keeps the decimal exact, so "1.2b" lands on 1_200_000_000.
    format!("{}e{}", prefix, exponent)
        .parse::<f64>()
        .unwrap_or(0.0)
}

/// Resource earned per second of real time; 0 when the duration is unknown.
pub fn efficiency(value: f64, duration_seconds: f64) -> f64 {
    if duration_seconds > 0.0 {
        value / duration_seconds
    } else {
        0.0
    }
}
