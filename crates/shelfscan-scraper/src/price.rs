//! Best-effort price extraction from loosely-typed upstream values.
//!
//! Nothing here fails: unparsable input is reported as `None` and callers
//! apply their own defaults.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// First run of digits with an optional decimal point and fraction.
static PRICE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.?[0-9]*").expect("valid price token regex"));

/// Extracts the first positive number from free-form text such as
/// `"Save $12.50"` or `"Was $1,299"`.
///
/// Thousands separators are stripped before scanning. Returns `None` for
/// absent or empty text, text without digits, and zero values.
#[must_use]
pub fn extract_price(text: Option<&str>) -> Option<f64> {
    first_number(text?).map(|(value, _)| value)
}

/// Like [`extract_price`], but only when the first number is written as a
/// percentage (`"20% off"`, `"Save 25 %"`).
#[must_use]
pub fn extract_percent(text: Option<&str>) -> Option<f64> {
    first_number(text?).and_then(|(value, is_percent)| is_percent.then_some(value))
}

/// First positive number in `text` and whether a `%` sign follows it.
fn first_number(text: &str) -> Option<(f64, bool)> {
    let cleaned = text.replace(',', "");
    let token = PRICE_TOKEN.find(&cleaned)?;
    let value = token
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)?;
    let is_percent = cleaned[token.end()..].trim_start().starts_with('%');
    Some((value, is_percent))
}

/// Interprets a JSON scalar as a number: JSON numbers directly, strings after
/// trimming surrounding whitespace. Non-finite results are rejected.
#[must_use]
pub fn parse_number_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}
