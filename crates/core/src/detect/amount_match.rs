//! Recognized amount model.

use std::ops::Range;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::convert::ConversionError;
use crate::currency::Magnitude;

/// One amount recognized in a segment, together with its currency marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountMatch {
    /// Byte range of `raw` in the segment text.
    pub span: Range<usize>,
    /// Exact substring replaced on conversion (amount, marker and magnitude).
    pub raw: String,
    /// The amount literal as written, grouping commas included.
    pub amount: String,
    /// Parsed amount before the magnitude is applied.
    pub value: Decimal,
    pub magnitude: Magnitude,
    /// Number of fraction digits written in the literal.
    pub decimals: u32,
}

impl AmountMatch {
    pub fn new(
        span: Range<usize>,
        raw: &str,
        amount: &str,
        magnitude: Magnitude,
    ) -> Result<Self, ConversionError> {
        let value = parse_amount(amount)?;
        Ok(Self {
            span,
            raw: raw.to_string(),
            amount: amount.to_string(),
            value,
            magnitude,
            decimals: literal_decimals(amount),
        })
    }

    /// Amount with the magnitude multiplier applied.
    pub fn scaled_value(&self) -> Result<Decimal, ConversionError> {
        self.magnitude
            .scale(self.value)
            .ok_or_else(|| ConversionError::Overflow(self.raw.clone()))
    }

    pub fn has_magnitude(&self) -> bool {
        self.magnitude != Magnitude::Unit
    }
}

/// Parses an amount literal, dropping grouping commas.
pub fn parse_amount(literal: &str) -> Result<Decimal, ConversionError> {
    let cleaned = literal.trim().replace(',', "");
    Decimal::from_str(&cleaned)
        .map_err(|_| ConversionError::UnparsableAmount(literal.to_string()))
}

/// Fraction digits written in an amount literal (0 when integral).
pub fn literal_decimals(literal: &str) -> u32 {
    literal
        .trim()
        .split_once('.')
        .map(|(_, fraction)| fraction.chars().take_while(|c| c.is_ascii_digit()).count() as u32)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount_strips_grouping() {
        assert_eq!(parse_amount("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_amount("-7").unwrap(), dec!(-7));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(parse_amount("12a").is_err());
        assert!(parse_amount("99999999999999999999999999999999999").is_err());
    }

    #[test]
    fn test_literal_decimals() {
        assert_eq!(literal_decimals("1,234.56"), 2);
        assert_eq!(literal_decimals("6"), 0);
        assert_eq!(literal_decimals("0.125"), 3);
    }

    #[test]
    fn test_scaled_value() {
        let m = AmountMatch::new(0..6, "$2.94k", "2.94", Magnitude::Thousand).unwrap();
        assert_eq!(m.scaled_value().unwrap(), dec!(2940));
        assert!(m.has_magnitude());
        assert_eq!(m.decimals, 2);
    }

    #[test]
    fn test_scaled_value_out_of_range() {
        let m = AmountMatch::new(
            0..28,
            "$70000000000000000000000000b",
            "70000000000000000000000000",
            Magnitude::Billion,
        )
        .unwrap();
        assert!(matches!(m.scaled_value(), Err(ConversionError::Overflow(_))));
    }
}
