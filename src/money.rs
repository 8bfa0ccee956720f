//! Cent rounding and filing-number formatting

/// Round to cents, with exact halves going toward positive infinity.
///
/// Applied after every arithmetic step of the benefit computation so results
/// reproduce step-by-step.
pub fn round2(value: f64) -> f64 {
    ((value + f64::EPSILON) * 100.0 + 0.5).floor() / 100.0
}

/// Decimal separator used by the numeric fields of one filing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecimalSeparator {
    #[default]
    Comma,
    Dot,
}

/// Format an amount with exactly two decimals; non-finite values become zero.
///
/// Values lying exactly on a half cent round away from zero. Anything else
/// rounds to the nearest cent of its exact binary value, so `1.005` (stored
/// just below the half) gives `1.00`.
pub fn format_amount(value: f64, separator: DecimalSeparator) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let text = format!("{:.2}", resolve_half_cent(value));
    match separator {
        DecimalSeparator::Dot => text,
        DecimalSeparator::Comma => text.replace('.', ","),
    }
}

/// Replace an exact half-cent value with the cent above it in magnitude
fn resolve_half_cent(value: f64) -> f64 {
    let mills = (value * 1000.0).round();
    let exact = value.mul_add(1000.0, -mills) == 0.0;
    if !exact || mills.abs() % 10.0 != 5.0 {
        return value;
    }
    let cents = (mills.abs() + 5.0) / 10.0;
    value.signum() * cents / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(100_000.0 * 0.006), 600.0);
        assert_eq!(round2(1.005), 1.01);
        assert_eq!(round2(2.344), 2.34);
        assert_eq!(round2(-2.344), -2.34);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(5000.0, DecimalSeparator::Comma), "5000,00");
        assert_eq!(format_amount(750.5, DecimalSeparator::Dot), "750.50");
        assert_eq!(format_amount(f64::NAN, DecimalSeparator::Comma), "0,00");
        assert_eq!(format_amount(f64::INFINITY, DecimalSeparator::Dot), "0.00");
    }

    #[test]
    fn test_format_amount_half_cents_round_up() {
        assert_eq!(format_amount(0.125, DecimalSeparator::Comma), "0,13");
        assert_eq!(format_amount(0.625, DecimalSeparator::Dot), "0.63");
        assert_eq!(format_amount(1000.125, DecimalSeparator::Dot), "1000.13");
        assert_eq!(format_amount(-0.125, DecimalSeparator::Dot), "-0.13");
        // Stored below the half, so not a tie
        assert_eq!(format_amount(1.005, DecimalSeparator::Comma), "1,00");
        assert_eq!(format_amount(2.675, DecimalSeparator::Dot), "2.67");
        assert_eq!(format_amount(0.375, DecimalSeparator::Dot), "0.38");
    }
}
