//! Conversion of fiat amounts into the reference token.

mod convert_errors;
mod converter;
mod number_format;

pub use convert_errors::ConversionError;
pub use converter::{fiat_to_reference, render_value, ConvertedAmount};
pub use number_format::{format_grouped, group_thousands, round_half_away, shorten_large_number};
