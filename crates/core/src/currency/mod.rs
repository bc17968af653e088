//! Currency module - built-in currencies, pattern fragments and the amount grammar.

mod currency_model;
mod currency_registry;
pub mod grammar;
mod notation;

pub use currency_model::{CurrencyInfo, CurrencySpec};
pub use currency_registry::{build_spec, find_currency, BUILTIN_CURRENCIES};
pub use grammar::{
    bears_reference_suffix, contains_decimals, find_scaled_amount, is_amount, is_isolated_amount,
    is_number, Magnitude, AMOUNT_PATTERN, MAGNITUDE_PATTERN,
};
pub use notation::expand_notation;
