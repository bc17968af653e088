//! Fiat to reference-token conversion.

use std::fmt;

use log::debug;
use rust_decimal::Decimal;

use super::number_format::{format_grouped, shorten_large_number};
use super::ConversionError;
use crate::constants::{MAX_DECIMALS, REFERENCE_SUFFIX};
use crate::context::{ConversionContext, MinValuePolicy};
use crate::detect::{literal_decimals, parse_amount};

/// A formatted reference-token amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedAmount {
    /// Formatted number, e.g. `5,880.00`, `5.88k` or `<0.01`.
    pub value: String,
    pub suffix: &'static str,
}

impl ConvertedAmount {
    fn new(value: String) -> Self {
        Self {
            value,
            suffix: REFERENCE_SUFFIX,
        }
    }

    /// True when the value is a `<min` / `>-min` bound instead of a number.
    pub fn is_clamped(&self) -> bool {
        self.value.starts_with('<') || self.value.starts_with('>')
    }
}

impl fmt::Display for ConvertedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.suffix)
    }
}

/// Renders a reference-token value at `decimals` precision.
pub fn render_value(
    value: Decimal,
    decimals: u32,
    shorten: bool,
    policy: MinValuePolicy,
) -> String {
    let min_to_show = Decimal::new(1, decimals);
    if policy == MinValuePolicy::Clamp && !value.is_zero() && value.abs() < min_to_show {
        let bound = if value.is_sign_negative() { ">-" } else { "<" };
        format!("{}{}", bound, min_to_show)
    } else if shorten {
        shorten_large_number(value, decimals)
    } else {
        format_grouped(value, decimals)
    }
}

/// Converts `amount` quoted in `code` into the reference token.
///
/// The precision is the number of fraction digits written in `amount`, or the
/// context precision when it has none. Nonzero results too small to show at
/// that precision render as `<0.01` / `>-0.01` under the clamp policy.
pub fn fiat_to_reference(
    amount: &str,
    code: &str,
    shorten: bool,
    ctx: &ConversionContext,
) -> Result<ConvertedAmount, ConversionError> {
    let decimals = match literal_decimals(amount).min(MAX_DECIMALS) {
        0 => ctx.decimals,
        n => n,
    };
    let value = parse_amount(amount)?;

    let rate = ctx.rate_for(code);
    if rate.is_zero() || rate.is_sign_negative() {
        return Err(ConversionError::MissingRate(code.to_string()));
    }
    let converted = value
        .checked_div(rate)
        .ok_or_else(|| ConversionError::Overflow(amount.to_string()))?;

    let formatted = render_value(converted, decimals, shorten, ctx.min_value_policy);

    let result = ConvertedAmount::new(formatted);
    debug!("Converted {} {} to {}", amount, code, result);
    Ok(result)
}
