use crate::model::Violation;
use serde_json::Value;

pub fn violation(
    code: &str,
    path: &str,
    message: String,
    expected: Value,
    actual: Value,
) -> Violation {
    Violation {
        code: code.to_string(),
        path: path.to_string(),
        message,
        expected,
        actual,
    }
}

/// A measured quantity is usable only when finite and non-negative; anything else is unknown.
pub fn measured(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

/// `value > max`, except a non-finite or NaN ceiling is never satisfied.
pub fn exceeds(value: f64, max: f64) -> bool {
    !(max.is_finite() && value <= max)
}

/// `value < min`, except a non-finite or NaN floor is never satisfied.
pub fn falls_short(value: f64, min: f64) -> bool {
    !(min.is_finite() && value >= min)
}

/// Render a quantity for messages, trimming float noise from derived values.
pub fn fmt_quantity(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded}")
    }
}
