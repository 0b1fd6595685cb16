//! Numeric helpers shared by every calculator

/// Number of compounding/payment periods in a year
pub const MONTHS_PER_YEAR: u32 = 12;

/// Clamp a monetary input to a finite, non-negative value.
///
/// Negative and NaN values become 0; infinities become 0 as well since
/// no calculator can produce a meaningful schedule from them.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Clamp a percentage input into `[0, max]`
pub fn sanitize_percent(value: f64, max: f64) -> f64 {
    sanitize_amount(value).min(max)
}

/// Convert an annual percentage rate (e.g. 6.5) into a monthly periodic rate
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    sanitize_amount(annual_rate_percent) / 100.0 / MONTHS_PER_YEAR as f64
}

/// Round to the nearest cent, half away from zero
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
