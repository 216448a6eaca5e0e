//! Mask engine — fixed-template formatting and digit normalization.

pub mod normalize;
pub mod template;

pub use normalize::{format_display, strip_non_digits};
pub use template::MaskTemplate;
