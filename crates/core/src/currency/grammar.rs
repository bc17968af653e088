//! Shared amount grammar.
//!
//! Every currency pattern is assembled from these pieces. The edge classes
//! stand in for look-around: a match must not touch a letter, a digit or `$`.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::REFERENCE_TOKEN;

/// Numeric amount: optional minus, digits in groups of three, optional fraction.
pub const AMOUNT_PATTERN: &str = r"-?[0-9]+(?:,[0-9]{3})*(?:\.[0-9]+)?";

/// Magnitude letter that may follow an amount.
pub const MAGNITUDE_PATTERN: &str = "[kmb]";

/// Start of text or a character that may precede a currency marker.
pub(crate) const LEAD_MARKER: &str = r"(?:^|[^a-zA-Z0-9$])";

/// Start of text or a character that may precede an amount.
pub(crate) const LEAD_AMOUNT: &str = r"(?:^|[^a-zA-Z0-9$.,])";

/// End of text or a character that may follow a currency marker.
pub(crate) const TRAIL_MARKER: &str = r"(?:[^a-zA-Z0-9$]|$)";

/// End of text or a character that may follow an amount without extending it.
pub(crate) const TRAIL_AMOUNT: &str = r"(?:[^a-zA-Z0-9$.,]|[.,](?:[^0-9]|$)|$)";

/// Punctuation that may follow a magnitude letter.
const MAGNITUDE_FOLLOWERS: &str = ".,;:!?)]}\"'/-\u{2013}";

lazy_static! {
    /// First amount anywhere in a string.
    pub static ref AMOUNT_RE: Regex =
        Regex::new(AMOUNT_PATTERN).expect("Invalid amount regex");

    /// An amount and the magnitude letter that may follow it.
    static ref SCALED_AMOUNT_RE: Regex = Regex::new(&format!(
        r"(?i)(?P<amount>{})(?:\s*(?P<magnitude>{})\b)?",
        AMOUNT_PATTERN, MAGNITUDE_PATTERN
    ))
    .expect("Invalid scaled amount regex");

    /// A string that is nothing but an amount.
    static ref ISOLATED_AMOUNT_RE: Regex =
        Regex::new(&format!("^{}$", AMOUNT_PATTERN)).expect("Invalid amount regex");

    /// A string that is nothing but a number, commas already removed.
    static ref BARE_NUMBER_RE: Regex =
        Regex::new(r"^-?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$").expect("Invalid number regex");
}

/// Magnitude multiplier attached to an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Magnitude {
    #[default]
    Unit,
    Thousand,
    Million,
    Billion,
}

impl Magnitude {
    /// Parses a magnitude letter, ignoring case.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter.to_ascii_lowercase().as_str() {
            "k" => Some(Magnitude::Thousand),
            "m" => Some(Magnitude::Million),
            "b" => Some(Magnitude::Billion),
            _ => None,
        }
    }

    pub fn multiplier(&self) -> Decimal {
        match self {
            Magnitude::Unit => Decimal::ONE,
            Magnitude::Thousand => Decimal::from(1_000),
            Magnitude::Million => Decimal::from(1_000_000),
            Magnitude::Billion => Decimal::from(1_000_000_000),
        }
    }

    /// `value` times the multiplier, or `None` when that leaves the decimal range.
    pub fn scale(&self, value: Decimal) -> Option<Decimal> {
        value.checked_mul(self.multiplier())
    }
}

/// True when `value` contains an amount that has not been converted yet.
pub fn is_amount(value: &str) -> bool {
    AMOUNT_RE.is_match(value) && !bears_reference_suffix(value)
}

/// First amount in `value` together with its magnitude.
///
/// The returned range covers the amount and, when it closes the amount, the
/// magnitude letter.
pub fn find_scaled_amount(value: &str) -> Option<(Range<usize>, &str, Magnitude)> {
    let caps = SCALED_AMOUNT_RE.captures(value)?;
    let amount = caps.name("amount")?;
    let scaled = caps
        .name("magnitude")
        .filter(|letter| closes_magnitude(&value[letter.end()..]))
        .and_then(|letter| Some((letter.end(), Magnitude::from_letter(letter.as_str())?)));
    Some(match scaled {
        Some((end, magnitude)) => (amount.start()..end, amount.as_str(), magnitude),
        None => (amount.range(), amount.as_str(), Magnitude::Unit),
    })
}

/// True when the trimmed value is exactly one amount.
pub fn is_isolated_amount(value: &str) -> bool {
    ISOLATED_AMOUNT_RE.is_match(value.trim())
}

/// True when the trimmed value parses as a plain number.
pub fn is_number(value: &str, allow_commas: bool) -> bool {
    let trimmed = value.trim();
    if allow_commas {
        BARE_NUMBER_RE.is_match(&trimmed.replace(',', ""))
    } else {
        BARE_NUMBER_RE.is_match(trimmed)
    }
}

/// True when the amount literal has exactly one decimal point.
pub fn contains_decimals(value: &str) -> bool {
    value.split('.').count() == 2
}

/// True when the text already ends with the reference token.
pub fn bears_reference_suffix(value: &str) -> bool {
    value.trim_end().ends_with(REFERENCE_TOKEN) && is_token_start(value.trim_end(), REFERENCE_TOKEN)
}

/// True when `rest`, the text after a magnitude letter, lets the letter stand
/// as a magnitude: "5 m." and "5 m-10 m" do, "5 M&A" does not.
pub(crate) fn closes_magnitude(rest: &str) -> bool {
    match rest.chars().next() {
        None => true,
        Some(c) => c.is_whitespace() || MAGNITUDE_FOLLOWERS.contains(c),
    }
}

/// True when the reference token follows `end`, separated only by whitespace.
pub fn followed_by_reference(text: &str, end: usize) -> bool {
    let rest = match text.get(end..) {
        Some(rest) => rest.trim_start(),
        None => return false,
    };
    match rest.strip_prefix(REFERENCE_TOKEN) {
        Some(after) => !after.starts_with(|c: char| c.is_alphanumeric()),
        None => false,
    }
}

/// The token at the end of `text` starts a word (e.g. "5 RAI", not "BRAI").
fn is_token_start(text: &str, token: &str) -> bool {
    let head = &text[..text.len() - token.len()];
    !head.ends_with(|c: char| c.is_alphanumeric())
}
