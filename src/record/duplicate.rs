//! Coarse equality used to reject the same run being stored twice.

use super::RunRecord;

/// Returns true if `a` and `b` describe the same run.
///
/// Compares capture date, wave, tier, duration, coins and reroll shards only;
/// killed-by, cash, interest, gem blocks and cells may differ.
pub fn is_duplicate(a: &RunRecord, b: &RunRecord) -> bool {
    a.photo_date == b.photo_date
        && a.wave == b.wave
        && a.tier == b.tier
        && a.duration_seconds == b.duration_seconds
        && a.coins_earned == b.coins_earned
        && a.reroll_shards_earned == b.reroll_shards_earned
}
