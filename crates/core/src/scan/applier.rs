//! In-segment rewriting of matched amounts.

use log::debug;

use crate::context::ConversionContext;
use crate::convert::{fiat_to_reference, ConversionError};
use crate::detect::{AmountMatch, CurrencyMatchers, MatchKind};

/// Rewrites every amount `kind` matches in `text`.
///
/// Returns the new text, or `None` when nothing could be converted. Amounts
/// that fail to convert stay as written.
pub fn apply_matches(
    text: &str,
    matchers: &CurrencyMatchers,
    kind: MatchKind,
    ctx: &ConversionContext,
) -> Option<String> {
    let found = matchers.find_amounts(text, &kind.patterns());
    let mut rewritten = text.to_string();
    let mut replaced = 0;

    // right to left so earlier spans stay valid
    for amount in found.iter().rev() {
        let converted = conversion_input(amount, ctx).and_then(|(literal, shorten)| {
            fiat_to_reference(&literal, matchers.code(), shorten, ctx)
        });
        match converted {
            Ok(converted) => {
                rewritten.replace_range(amount.span.clone(), &converted.to_string());
                replaced += 1;
            }
            Err(e) => debug!("Leaving '{}' unconverted: {}", amount.raw, e),
        }
    }

    (replaced > 0).then_some(rewritten)
}

/// Amounts with a magnitude letter are converted at full value.
fn conversion_input(
    amount: &AmountMatch,
    ctx: &ConversionContext,
) -> Result<(String, bool), ConversionError> {
    if amount.has_magnitude() {
        let scaled = amount.scaled_value()?;
        Ok((scaled.normalize().to_string(), ctx.shorten_notation))
    } else {
        Ok((amount.amount.clone(), false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Preferences;
    use crate::currency::build_spec;
    use crate::detect::{classify, PatternId};

    fn ctx(base: &str, shorten: bool) -> ConversionContext {
        let prefs = Preferences {
            base_rate: base.to_string(),
            shorten_notation: shorten,
            ..Preferences::default()
        };
        ConversionContext::from_preferences(&prefs).unwrap()
    }

    fn apply(text: &str, base: &str, shorten: bool) -> Option<String> {
        let usd = CurrencyMatchers::compile(build_spec("usd")).unwrap();
        let kind = classify(text, &usd);
        apply_matches(text, &usd, kind, &ctx(base, shorten))
    }

    #[test]
    fn test_joined_amount() {
        assert_eq!(
            apply("Price: $1,234.56", "2", false).as_deref(),
            Some("Price: 617.28 RAI")
        );
    }

    #[test]
    fn test_joined_notation() {
        assert_eq!(apply("$2.94k", "0.5", false).as_deref(), Some("5,880.00 RAI"));
        assert_eq!(apply("$2.94k", "0.5", true).as_deref(), Some("5.88k RAI"));
    }

    #[test]
    fn test_every_occurrence_is_rewritten() {
        assert_eq!(
            apply("$5 or $10", "1", false).as_deref(),
            Some("5.00 RAI or 10.00 RAI")
        );
    }

    #[test]
    fn test_spaced_forms() {
        assert_eq!(apply("5.55 $", "1", false).as_deref(), Some("5.55 RAI"));
        assert_eq!(apply("USD 66", "2", false).as_deref(), Some("33.00 RAI"));
        assert_eq!(apply("3 m USD", "1", false).as_deref(), Some("3,000,000.00 RAI"));
    }

    #[test]
    fn test_magnitude_overflow_leaves_amount_alone() {
        assert_eq!(apply("Debt: $70000000000000000000000000b", "1", false), None);
        assert_eq!(
            apply("$70000000000000000000000000b or $5", "1", false).as_deref(),
            Some("$70000000000000000000000000b or 5.00 RAI")
        );
    }

    #[test]
    fn test_no_match_yields_none() {
        let usd = CurrencyMatchers::compile(build_spec("usd")).unwrap();
        let ctx = ctx("1", false);
        assert_eq!(apply_matches("hello", &usd, MatchKind::NoMatch, &ctx), None);
        assert_eq!(
            apply_matches(
                "617.28 RAI",
                &usd,
                MatchKind::AmountThenCurrency {
                    pattern: PatternId::AmountMarker
                },
                &ctx
            ),
            None
        );
    }
}
