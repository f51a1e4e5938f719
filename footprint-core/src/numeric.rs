//! Coercion of free-text form values into non-negative quantities.

/// Fractional digits kept when sanitizing typed input.
pub const MAX_FRACTION_DIGITS: usize = 2;

/// Strips everything except digits and the first decimal point, and truncates the
/// fraction to [`MAX_FRACTION_DIGITS`] digits.
///
/// `"12.3.45"` becomes `"12.34"` and `"-4 km"` becomes `"4"`.
pub fn sanitize_numeric(text: &str) -> String {
    let kept: String = text.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    let mut parts = kept.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    match parts.next() {
        None => whole.to_string(),
        Some(rest) => {
            let fraction: String = rest
                .chars()
                .filter(|c| *c != '.')
                .take(MAX_FRACTION_DIGITS)
                .collect();
            format!("{}.{}", whole, fraction)
        }
    }
}

/// Parses a form value. Text with no digits yields `0.0`; this never fails.
///
/// Digit strings too long for an `f64` saturate at `f64::MAX` so validation still
/// sees them as out of range.
pub fn parse_amount(text: &str) -> f64 {
    clamp_quantity(sanitize_numeric(text).parse::<f64>().unwrap_or(0.0))
}

/// Negative quantities and NaN count as zero. Positive infinity saturates at
/// `f64::MAX`.
pub fn clamp_quantity(value: f64) -> f64 {
    if value.is_nan() || value <= 0.0 {
        0.0
    } else {
        value.min(f64::MAX)
    }
}

/// Rounds half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
