//! Rescaling of already converted values after a base rate change.

use lazy_static::lazy_static;
use log::debug;
use regex::{Captures, Regex};
use rust_decimal::Decimal;

use crate::constants::AVOIDED_TAGS;
use crate::context::ConversionContext;
use crate::convert::render_value;
use crate::detect::parse_amount;
use crate::document::{NodeId, SegmentTree, TextMutation, TreeNavigation};

lazy_static! {
    /// A rendered `<number> RAI`. Clamped (`<0.01`) and shortened (`5.88k`)
    /// values carry no exact number and never match.
    static ref CONVERTED_RE: Regex = Regex::new(
        r"(?P<lead>^|[^0-9.,<>\-])(?P<value>-?[0-9]+(?:,[0-9]{3})*(?:\.[0-9]+)?) RAI\b"
    )
    .expect("Invalid converted value regex");
}

/// Multiplies every converted value at or below `root` by `old_base / new_base`.
///
/// Returns the number of segments rewritten.
pub fn rescale_converted(
    tree: &mut SegmentTree,
    root: NodeId,
    old_base: Decimal,
    new_base: Decimal,
    ctx: &ConversionContext,
) -> usize {
    if new_base.is_zero() || old_base == new_base {
        return 0;
    }
    let ratio = match old_base.checked_div(new_base) {
        Some(ratio) => ratio,
        None => return 0,
    };

    let mut rewritten = 0;
    for segment in tree.text_segments(root) {
        let avoided = tree
            .parent(segment)
            .and_then(|parent| tree.tag(parent))
            .map(|tag| AVOIDED_TAGS.contains(&tag))
            .unwrap_or(false);
        if avoided {
            continue;
        }
        let text = match tree.text(segment) {
            Some(text) if CONVERTED_RE.is_match(text) => text.to_string(),
            _ => continue,
        };

        let updated = CONVERTED_RE.replace_all(&text, |caps: &Captures| {
            let value = &caps["value"];
            match parse_amount(value)
                .ok()
                .and_then(|v| v.checked_mul(ratio))
            {
                Some(scaled) => format!(
                    "{}{} RAI",
                    &caps["lead"],
                    render_value(scaled, ctx.decimals, false, ctx.min_value_policy)
                ),
                None => caps[0].to_string(),
            }
        });
        if tree.set_text(segment, &updated) {
            rewritten += 1;
        }
    }
    debug!(
        "Rescaled {} segments by {} / {}",
        rewritten, old_base, new_base
    );
    rewritten
}
