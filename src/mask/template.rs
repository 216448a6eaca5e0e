//! Fixed-template input mask.
//!
//! A template is a literal string in which `0` marks a digit slot:
//! `+7 (000) 000-00-00`. Applying a digit sequence fills slots left to
//! right, emitting interleaved literals, and stops after the last typed
//! digit — the same live-typing behavior a masked input shows on screen.

use crate::error::BindError;
use std::fmt;
use std::sync::LazyLock;

/// The stock Russian phone template.
pub const RUSSIAN_PHONE_TEMPLATE: &str = "+7 (000) 000-00-00";

static RUSSIAN_PHONE: LazyLock<MaskTemplate> =
    LazyLock::new(|| MaskTemplate::parse(RUSSIAN_PHONE_TEMPLATE).unwrap());

/// One element of a compiled template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Digit,
    Literal(char),
}

/// A compiled mask template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskTemplate {
    raw: String,
    slots: Vec<Slot>,
    capacity: usize,
}

impl MaskTemplate {
    /// Compile a template string. `0` is a digit slot, everything else a
    /// literal. Rejects templates without any digit slot.
    pub fn parse(raw: &str) -> Result<Self, BindError> {
        let slots: Vec<Slot> = raw
            .chars()
            .map(|c| if c == '0' { Slot::Digit } else { Slot::Literal(c) })
            .collect();
        let capacity = slots.iter().filter(|s| matches!(s, Slot::Digit)).count();
        if capacity == 0 {
            return Err(BindError::EmptyTemplate(raw.to_string()));
        }
        Ok(Self {
            raw: raw.to_string(),
            slots,
            capacity,
        })
    }

    /// The fixed Russian phone template.
    pub fn russian_phone() -> Self {
        RUSSIAN_PHONE.clone()
    }

    /// The template source string.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Number of digit slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Format a value through the template, live-typing style.
    ///
    /// Input is aligned against the template: a literal slot consumes a
    /// matching input character, a digit slot consumes the next digit.
    /// Literal digits already present in a formatted value (the `7` in
    /// `+7`) are therefore consumed as literals, so re-applying the
    /// template to its own output is a no-op. Literals are emitted only up
    /// to the last filled slot; digits beyond the template capacity are
    /// dropped.
    pub fn apply(&self, value: &str) -> String {
        let chars: Vec<char> = value.chars().collect();
        let mut out = String::with_capacity(self.raw.len());
        let mut pending = String::new();
        let mut i = 0;

        for slot in &self.slots {
            match slot {
                Slot::Literal(c) => {
                    if chars.get(i) == Some(c) {
                        i += 1;
                    }
                    pending.push(*c);
                }
                Slot::Digit => {
                    while i < chars.len() && !chars[i].is_ascii_digit() {
                        i += 1;
                    }
                    match chars.get(i) {
                        Some(d) => {
                            out.push_str(&pending);
                            pending.clear();
                            out.push(*d);
                            i += 1;
                        }
                        None => break,
                    }
                }
            }
        }
        out
    }

    /// Whether a value fills every digit slot.
    pub fn is_complete(&self, value: &str) -> bool {
        value.chars().filter(char::is_ascii_digit).count() >= self.capacity
    }
}

impl fmt::Display for MaskTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_counts_digit_slots() {
        let tpl = MaskTemplate::parse(RUSSIAN_PHONE_TEMPLATE).unwrap();
        assert_eq!(tpl.capacity(), 10);
        assert_eq!(tpl.raw(), RUSSIAN_PHONE_TEMPLATE);
    }

    #[test]
    fn test_parse_rejects_literal_only_template() {
        assert!(MaskTemplate::parse("+7 ( ) --").is_err());
    }

    #[test]
    fn test_apply_empty_input() {
        let tpl = MaskTemplate::russian_phone();
        assert_eq!(tpl.apply(""), "");
    }

    #[test]
    fn test_apply_partial_input_holds_trailing_literals() {
        let tpl = MaskTemplate::russian_phone();
        assert_eq!(tpl.apply("9"), "+7 (9");
        assert_eq!(tpl.apply("999"), "+7 (999");
        assert_eq!(tpl.apply("9991"), "+7 (999) 1");
        assert_eq!(tpl.apply("99912345"), "+7 (999) 123-45");
    }

    #[test]
    fn test_apply_full_input() {
        let tpl = MaskTemplate::russian_phone();
        assert_eq!(tpl.apply("9991234567"), "+7 (999) 123-45-67");
    }

    #[test]
    fn test_apply_drops_excess_digits() {
        let tpl = MaskTemplate::russian_phone();
        assert_eq!(tpl.apply("999123456789"), "+7 (999) 123-45-67");
    }

    #[test]
    fn test_apply_is_stable_on_formatted_value() {
        let tpl = MaskTemplate::russian_phone();
        let once = tpl.apply("9991234567");
        assert_eq!(tpl.apply(&once), once);
    }

    #[test]
    fn test_apply_consumes_country_code_as_literal() {
        let tpl = MaskTemplate::russian_phone();
        assert_eq!(tpl.apply("79991234567"), "+7 (999) 123-45-67");
    }

    #[test]
    fn test_apply_continues_partial_formatted_value() {
        let tpl = MaskTemplate::russian_phone();
        assert_eq!(tpl.apply("+7 (9991234567"), "+7 (999) 123-45-67");
    }

    #[test]
    fn test_is_complete() {
        let tpl = MaskTemplate::russian_phone();
        assert!(tpl.is_complete("+7 (999) 123-45-67"));
        assert!(!tpl.is_complete("+7 (999) 123"));
    }
}
