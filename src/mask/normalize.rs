//! Digit normalization and display formatting for stored phone values.
//!
//! `strip_non_digits` is the submit-time rewrite: whatever a masked field
//! shows on screen, the wire value is digits only. `format_display` is the
//! reverse direction, used when rendering a stored number back to a reader.

use regex::Regex;
use std::sync::LazyLock;

static NON_DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D+").unwrap());

/// Strip every non-digit character: `+7 (999) 123-45-67` → `79991234567`.
pub fn strip_non_digits(value: &str) -> String {
    NON_DIGIT_RE.replace_all(value, "").into_owned()
}

/// Render a stored phone value for display.
///
/// Exactly 11 digits format as `+D (DDD) DDD-DD-DD`. Anything else is
/// returned unchanged; empty input yields the empty string.
pub fn format_display(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let digits = strip_non_digits(value);
    if digits.len() != 11 {
        return value.to_string();
    }

    format!(
        "+{} ({}) {}-{}-{}",
        &digits[0..1],
        &digits[1..4],
        &digits[4..7],
        &digits[7..9],
        &digits[9..11]
    )
}
