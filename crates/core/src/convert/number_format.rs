//! Fixed-precision number rendering with `en-US` grouping.

use rust_decimal::{Decimal, RoundingStrategy};

const SHORT_UNITS: [&str; 3] = ["k", "m", "b"];

/// Rounds half away from zero and pads to exactly `decimals` fraction digits.
pub fn round_half_away(value: Decimal, decimals: u32) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        // drop the sign of a negative zero
        rounded = Decimal::ZERO;
    }
    rounded.rescale(decimals);
    rounded
}

/// Inserts a comma every three digits of an integer digit string.
pub fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Formats `value` with grouped thousands and exactly `decimals` fraction digits.
///
/// `format_grouped(dec!(5880), 2)` is `"5,880.00"`.
pub fn format_grouped(value: Decimal, decimals: u32) -> String {
    let rendered = round_half_away(value, decimals).to_string();
    let (sign, body) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    match body.split_once('.') {
        Some((int, frac)) => format!("{}{}.{}", sign, group_thousands(int), frac),
        None => format!("{}{}", sign, group_thousands(body)),
    }
}

/// Shortens to thousands, millions or billions with a k/m/b suffix.
///
/// Values below one thousand in magnitude are formatted in full.
pub fn shorten_large_number(value: Decimal, decimals: u32) -> String {
    for (i, unit) in SHORT_UNITS.iter().enumerate().rev() {
        let divisor = Decimal::from(1000u64.pow(i as u32 + 1));
        if value >= divisor || value <= -divisor {
            return format!("{}{}", format_grouped(value / divisor, decimals), unit);
        }
    }
    format_grouped(value, decimals)
}
