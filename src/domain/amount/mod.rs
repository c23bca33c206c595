//! Amount domain - raw/decimal token unit conversion and display formatting

mod display;
mod units;

pub use display::{format_for_display, DisplayPolicy};
pub use units::{parse_raw_amount, to_decimal, to_raw, u256_to_decimal};
