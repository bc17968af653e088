//! Pairs an isolated currency marker with a neighbouring amount.

use std::ops::Range;

use log::debug;

use super::tiers::{Side, Tier, TIERS};
use crate::constants::REFERENCE_SUFFIX;
use crate::context::ConversionContext;
use crate::convert::{fiat_to_reference, ConversionError, ConvertedAmount};
use crate::currency::{
    contains_decimals, expand_notation, find_scaled_amount, is_amount, is_number, Magnitude,
};
use crate::detect::{parse_amount, CurrencyMatchers};
use crate::document::{NodeId, TextMutation, TreeNavigation};

/// Amount found for a marker, possibly split over two segments.
#[derive(Debug)]
struct Found {
    side: Side,
    /// Segment holding the eligible amount.
    candidate: NodeId,
    /// Candidate text with magnitude words already abbreviated.
    text: String,
    /// Byte range of the amount and its magnitude letter inside `text`.
    span: Range<usize>,
    magnitude: Magnitude,
    /// The other half of a split number: fraction on the right, integer on the left.
    partner: Option<NodeId>,
    literal: String,
}

/// Finds the amount belonging to `marker` and rewrites both sides.
///
/// Right-hand tiers are searched only when `search_both_sides` is set. Returns
/// false, leaving every segment untouched, when no tier yields a candidate or
/// the candidate cannot be converted.
pub fn resolve<T>(
    tree: &mut T,
    marker: NodeId,
    matchers: &CurrencyMatchers,
    search_both_sides: bool,
    ctx: &ConversionContext,
) -> bool
where
    T: TreeNavigation + TextMutation,
{
    let view: &T = tree;
    let found = match TIERS
        .iter()
        .filter(|tier| search_both_sides || tier.side == Side::Left)
        .find_map(|tier| locate(view, marker, tier))
    {
        Some(found) => found,
        None => return false,
    };

    let converted = conversion_input(&found, ctx).and_then(|(literal, shorten)| {
        fiat_to_reference(&literal, matchers.code(), shorten, ctx)
    });
    let converted = match converted {
        Ok(converted) => converted,
        Err(e) => {
            debug!("Marker {} left as is: {}", marker, e);
            return false;
        }
    };

    match found.side {
        Side::Right => write_right(tree, marker, &found, &converted),
        Side::Left => write_left(tree, marker, matchers, search_both_sides, &found, &converted),
    }
    true
}

fn locate<T: TreeNavigation>(tree: &T, marker: NodeId, tier: &Tier) -> Option<Found> {
    let anchor = tier.anchor_of(tree, marker)?;
    let candidate = tier.candidate_of(tree, anchor)?;
    let raw = tree.text(candidate)?;
    if !is_amount(raw) {
        return None;
    }
    let text = expand_notation(raw).into_owned();
    let (span, literal, magnitude) = find_scaled_amount(&text)?;
    let literal = literal.to_string();
    let pairable = tier.can_pair() && magnitude == Magnitude::Unit && !contains_decimals(&text);
    let mut found = Found {
        side: tier.side,
        candidate,
        text,
        span,
        magnitude,
        partner: None,
        literal,
    };

    if !pairable {
        return Some(found);
    }

    let partner = tier
        .side
        .step(tree, anchor)
        .and_then(|next| tree.first_child(next))
        .filter(|id| {
            tree.text(*id)
                .map(|value| is_number(value, tier.side == Side::Left))
                .unwrap_or(false)
        });
    let partner_text = match partner.and_then(|id| tree.text(id)) {
        Some(value) => value.trim(),
        None => return Some(found),
    };

    let joined = match tier.side {
        Side::Right if is_digits(partner_text) && !found.literal.contains('.') => {
            Some(format!("{}.{}", found.literal, partner_text))
        }
        Side::Left if is_digits(&found.literal) && !partner_text.contains('.') => {
            Some(format!("{}.{}", partner_text, found.literal))
        }
        _ => None,
    };
    if let Some(literal) = joined {
        found.literal = literal;
        found.partner = partner;
    }
    Some(found)
}

/// Literal handed to the converter; scaled amounts follow the shortening preference.
fn conversion_input(
    found: &Found,
    ctx: &ConversionContext,
) -> Result<(String, bool), ConversionError> {
    if found.magnitude == Magnitude::Unit {
        return Ok((found.literal.clone(), false));
    }
    let scaled = found
        .magnitude
        .scale(parse_amount(&found.literal)?)
        .ok_or_else(|| ConversionError::Overflow(found.literal.clone()))?;
    Ok((scaled.normalize().to_string(), ctx.shorten_notation))
}

fn write_right<T>(tree: &mut T, marker: NodeId, found: &Found, converted: &ConvertedAmount)
where
    T: TreeNavigation + TextMutation,
{
    rewrite_candidate(tree, found, &converted.to_string());
    if let Some(fraction) = found.partner {
        tree.set_text(fraction, "");
    }
    tree.set_text(marker, "");
}

fn write_left<T>(
    tree: &mut T,
    marker: NodeId,
    matchers: &CurrencyMatchers,
    short_marker: bool,
    found: &Found,
    converted: &ConvertedAmount,
) where
    T: TreeNavigation + TextMutation,
{
    match found.partner {
        Some(integer) => {
            let (int_part, frac_part) = match converted.value.split_once('.') {
                Some((int_part, frac_part)) if !converted.is_clamped() => (int_part, frac_part),
                _ => (converted.value.as_str(), ""),
            };
            tree.set_text(integer, int_part);
            rewrite_candidate(tree, found, frac_part);
        }
        None => rewrite_candidate(tree, found, &converted.value),
    }

    if let Some(text) = tree.text(marker).map(str::to_string) {
        let spans = if short_marker {
            matchers.marker_spans(&text)
        } else {
            matchers.long_name_spans(&text)
        };
        tree.set_text(marker, &replace_spans(&text, &spans, REFERENCE_SUFFIX));
    }
}

fn rewrite_candidate<T: TextMutation>(tree: &mut T, found: &Found, with: &str) {
    let span = std::slice::from_ref(&found.span);
    tree.set_text(found.candidate, &replace_spans(&found.text, span, with));
}

/// Replaces non-overlapping, ordered `spans` of `text` with `with`.
pub(crate) fn replace_spans(text: &str, spans: &[Range<usize>], with: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for span in spans {
        if span.start < last || span.end > text.len() {
            continue;
        }
        out.push_str(&text[last..span.start]);
        out.push_str(with);
        last = span.end;
    }
    out.push_str(&text[last..]);
    out
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Preferences;
    use crate::currency::build_spec;
    use crate::document::SegmentTree;

    fn ctx(base: &str) -> ConversionContext {
        let prefs = Preferences {
            base_rate: base.to_string(),
            ..Preferences::default()
        };
        ConversionContext::from_preferences(&prefs).unwrap()
    }

    fn usd() -> CurrencyMatchers {
        CurrencyMatchers::compile(build_spec("usd")).unwrap()
    }

    fn text(tree: &SegmentTree, id: NodeId) -> &str {
        tree.text(id).unwrap()
    }

    #[test]
    fn test_parent_sibling_text_on_the_right() {
        // <span>$</span> 5.55
        let mut tree = SegmentTree::new("p");
        let span = tree.add_element(tree.root(), "span").unwrap();
        let marker = tree.add_text(span, "$").unwrap();
        let amount = tree.add_text(tree.root(), " 5.55").unwrap();

        assert!(resolve(&mut tree, marker, &usd(), true, &ctx("1")));
        assert_eq!(text(&tree, marker), "");
        assert_eq!(text(&tree, amount), " 5.55 RAI");
    }

    #[test]
    fn test_split_integer_and_fraction_on_the_right() {
        // <span>$</span><b>6</b><b>66</b>
        let mut tree = SegmentTree::new("div");
        let span = tree.add_element(tree.root(), "span").unwrap();
        let marker = tree.add_text(span, "$").unwrap();
        let b1 = tree.add_element(tree.root(), "b").unwrap();
        let int_part = tree.add_text(b1, "6").unwrap();
        let b2 = tree.add_element(tree.root(), "b").unwrap();
        let frac_part = tree.add_text(b2, "66").unwrap();

        assert!(resolve(&mut tree, marker, &usd(), true, &ctx("1")));
        assert_eq!(text(&tree, int_part), "6.66 RAI");
        assert_eq!(text(&tree, frac_part), "");
        assert_eq!(text(&tree, marker), "");
    }

    #[test]
    fn test_decimal_candidate_converts_alone() {
        let mut tree = SegmentTree::new("div");
        let span = tree.add_element(tree.root(), "span").unwrap();
        let marker = tree.add_text(span, "USD").unwrap();
        let b1 = tree.add_element(tree.root(), "b").unwrap();
        let amount = tree.add_text(b1, "4.00").unwrap();
        let b2 = tree.add_element(tree.root(), "b").unwrap();
        let other = tree.add_text(b2, "99").unwrap();

        assert!(resolve(&mut tree, marker, &usd(), true, &ctx("2")));
        assert_eq!(text(&tree, amount), "2.00 RAI");
        assert_eq!(text(&tree, other), "99");
    }

    #[test]
    fn test_own_sibling_first_child() {
        // <p>$<b>10</b></p>
        let mut tree = SegmentTree::new("p");
        let marker = tree.add_text(tree.root(), "$").unwrap();
        let b = tree.add_element(tree.root(), "b").unwrap();
        let amount = tree.add_text(b, "10").unwrap();

        assert!(resolve(&mut tree, marker, &usd(), true, &ctx("4")));
        assert_eq!(text(&tree, amount), "2.50 RAI");
        assert_eq!(text(&tree, marker), "");
    }

    #[test]
    fn test_left_side_rewrites_marker_to_suffix() {
        // 7.77 <span>Dollars</span>
        let mut tree = SegmentTree::new("p");
        let amount = tree.add_text(tree.root(), "7.77 ").unwrap();
        let span = tree.add_element(tree.root(), "span").unwrap();
        let marker = tree.add_text(span, "Dollars").unwrap();

        assert!(resolve(&mut tree, marker, &usd(), false, &ctx("1")));
        assert_eq!(text(&tree, amount), "7.77 ");
        assert_eq!(text(&tree, marker), " RAI");
    }

    #[test]
    fn test_split_integer_and_fraction_on_the_left() {
        // <b>1,234</b><b>50</b><span>$</span>
        let mut tree = SegmentTree::new("div");
        let b1 = tree.add_element(tree.root(), "b").unwrap();
        let int_part = tree.add_text(b1, "1,234").unwrap();
        let b2 = tree.add_element(tree.root(), "b").unwrap();
        let frac_part = tree.add_text(b2, "50").unwrap();
        let span = tree.add_element(tree.root(), "span").unwrap();
        let marker = tree.add_text(span, "$").unwrap();

        assert!(resolve(&mut tree, marker, &usd(), true, &ctx("0.5")));
        assert_eq!(text(&tree, int_part), "2,469");
        assert_eq!(text(&tree, frac_part), "00");
        assert_eq!(text(&tree, marker), " RAI");
    }

    #[test]
    fn test_own_previous_sibling_first_child() {
        // <p><b>10</b>USD</p>
        let mut tree = SegmentTree::new("p");
        let b = tree.add_element(tree.root(), "b").unwrap();
        let amount = tree.add_text(b, "10").unwrap();
        let marker = tree.add_text(tree.root(), "USD").unwrap();

        assert!(resolve(&mut tree, marker, &usd(), true, &ctx("2")));
        assert_eq!(text(&tree, amount), "5.00");
        assert_eq!(text(&tree, marker), " RAI");
    }

    #[test]
    fn test_own_previous_sibling_split_amount() {
        // <div><b>1,234</b><b>50</b>dollars</div>
        let mut tree = SegmentTree::new("div");
        let b1 = tree.add_element(tree.root(), "b").unwrap();
        let int_part = tree.add_text(b1, "1,234").unwrap();
        let b2 = tree.add_element(tree.root(), "b").unwrap();
        let frac_part = tree.add_text(b2, "50").unwrap();
        let marker = tree.add_text(tree.root(), "dollars").unwrap();

        assert!(resolve(&mut tree, marker, &usd(), false, &ctx("2")));
        assert_eq!(text(&tree, int_part), "617");
        assert_eq!(text(&tree, frac_part), "25");
        assert_eq!(text(&tree, marker), " RAI");
    }

    #[test]
    fn test_magnitude_word_in_the_neighbour() {
        // <body><span>$</span> 3 million</body>
        let mut tree = SegmentTree::new("body");
        let span = tree.add_element(tree.root(), "span").unwrap();
        let marker = tree.add_text(span, "$").unwrap();
        let amount = tree.add_text(tree.root(), " 3 million").unwrap();

        assert!(resolve(&mut tree, marker, &usd(), true, &ctx("1")));
        assert_eq!(text(&tree, marker), "");
        assert_eq!(text(&tree, amount), " 3,000,000.00 RAI");
    }

    #[test]
    fn test_magnitude_letter_on_the_left() {
        // <p><b>2.5k</b><span>USD</span></p>
        let mut tree = SegmentTree::new("p");
        let b = tree.add_element(tree.root(), "b").unwrap();
        let amount = tree.add_text(b, "2.5k").unwrap();
        let span = tree.add_element(tree.root(), "span").unwrap();
        let marker = tree.add_text(span, "USD").unwrap();

        assert!(resolve(&mut tree, marker, &usd(), true, &ctx("2")));
        assert_eq!(text(&tree, amount), "1,250.00");
        assert_eq!(text(&tree, marker), " RAI");
    }

    #[test]
    fn test_out_of_range_magnitude_leaves_marker() {
        let mut tree = SegmentTree::new("body");
        let span = tree.add_element(tree.root(), "span").unwrap();
        let marker = tree.add_text(span, "$").unwrap();
        let amount = tree
            .add_text(tree.root(), " 70000000000000000000000000 billion")
            .unwrap();

        assert!(!resolve(&mut tree, marker, &usd(), true, &ctx("1")));
        assert_eq!(text(&tree, marker), "$");
        assert_eq!(text(&tree, amount), " 70000000000000000000000000 billion");
    }

    #[test]
    fn test_long_name_never_searches_right() {
        let mut tree = SegmentTree::new("p");
        let span = tree.add_element(tree.root(), "span").unwrap();
        let marker = tree.add_text(span, "dollars").unwrap();
        let amount = tree.add_text(tree.root(), "5").unwrap();

        assert!(!resolve(&mut tree, marker, &usd(), false, &ctx("1")));
        assert_eq!(text(&tree, marker), "dollars");
        assert_eq!(text(&tree, amount), "5");
    }

    #[test]
    fn test_converted_neighbours_are_not_eligible() {
        let mut tree = SegmentTree::new("p");
        let span = tree.add_element(tree.root(), "span").unwrap();
        let marker = tree.add_text(span, "$").unwrap();
        tree.add_text(tree.root(), "5.00 RAI").unwrap();

        assert!(!resolve(&mut tree, marker, &usd(), true, &ctx("1")));
        assert_eq!(text(&tree, marker), "$");
    }

    #[test]
    fn test_replace_spans() {
        assert_eq!(replace_spans("a $ b $", &[2..3, 6..7], " RAI"), "a  RAI b  RAI");
        assert_eq!(replace_spans("abc", &[], "x"), "abc");
    }
}
