//! `maskbind format` / `maskbind strip` — one-shot phone value transforms.

use crate::mask;

pub fn run_format(value: &str) {
    let formatted = mask::format_display(value);
    if formatted.is_empty() {
        println!("—");
    } else {
        println!("{formatted}");
    }
}

pub fn run_strip(value: &str) {
    println!("{}", mask::strip_non_digits(value));
}
