pub mod fields;
pub mod pairer;
pub mod units;

pub use fields::{FieldLimits, IntRange, StatField};
pub use pairer::{HalfSplitPairer, LinePairer, RawPair};
pub use units::{efficiency, parse_abbreviated_number, time_to_seconds};

use chrono::{DateTime, Utc};

use crate::record::RunRecord;

/// High-level function: OCR text → run record.
///
/// Pairs the recognized lines with `pairer`, then validates every stat
/// against `limits`. Never fails; check `has_parsing_error` on the result.
pub fn read_report(
    text: &str,
    photo_date: Option<DateTime<Utc>>,
    pairer: &dyn LinePairer,
    limits: &FieldLimits,
) -> RunRecord {
    let pairs = pairer.pair(text);
    RunRecord::build_with_limits(&pairs, photo_date, limits)
}
