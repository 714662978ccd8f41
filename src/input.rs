//! Coercion of raw form text into numbers.
//!
//! Form fields never reject input: anything that does not parse into a
//! sensible value falls back to a default supplied by the caller.

/// Parse a currency amount. Negative, non-finite or unparsable input
/// yields `fallback`. A leading `$` and thousands separators are accepted.
pub fn parse_amount(input: &str, fallback: f64) -> f64 {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => fallback,
    }
}

/// Parse a confidence in `[0, 1]`. Out-of-range values are clamped,
/// unparsable input yields `fallback`.
pub fn parse_confidence(input: &str, fallback: f32) -> f32 {
    match input.trim().parse::<f32>() {
        Ok(value) if value.is_finite() => value.clamp(0.0, 1.0),
        _ => fallback,
    }
}

/// Parse a line-item quantity. Anything below 1 or unparsable yields 1.
pub fn parse_quantity(input: &str) -> u32 {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|q| *q >= 1)
        .unwrap_or(1)
}
