//! Decimal separator detection

use super::record::FilingLine;
use crate::money::DecimalSeparator;

/// Record types whose field 4 holds a representative amount
const AMOUNT_RECORDS: [&str; 4] = ["N630", "N670", "M300", "M350"];

/// Sniff the decimal separator from the first conclusive amount field.
///
/// A value containing `,` means comma; a digit-dot-digit sequence means dot.
/// Inconclusive values are skipped, and comma is assumed when nothing decides.
pub fn detect_decimal_separator<'a, I>(lines: I) -> DecimalSeparator
where
    I: IntoIterator<Item = &'a FilingLine>,
{
    for line in lines {
        if !line.field(0).is_some_and(str::is_empty) {
            continue;
        }
        let is_amount_record = line.record_type().is_some_and(|t| AMOUNT_RECORDS.contains(&t));
        if !is_amount_record {
            continue;
        }

        let candidate = line.field(4).unwrap_or("");
        if candidate.contains(',') {
            return DecimalSeparator::Comma;
        }
        if has_digit_dot_digit(candidate) {
            return DecimalSeparator::Dot;
        }
    }
    DecimalSeparator::Comma
}

fn has_digit_dot_digit(value: &str) -> bool {
    value
        .as_bytes()
        .windows(3)
        .any(|w| w[0].is_ascii_digit() && w[1] == b'.' && w[2].is_ascii_digit())
}
