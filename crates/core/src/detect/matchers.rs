//! Compiled per-currency matchers.
//!
//! Pattern strings are assembled from a [`CurrencySpec`] and compiled once.
//! The `regex` crate has no look-around, so each pattern consumes one edge
//! character on either side and names the interesting part `m`; callers only
//! ever look at `m`.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use log::debug;
use regex::{Captures, Regex};

use super::amount_match::AmountMatch;
use crate::currency::grammar::{
    closes_magnitude, followed_by_reference, LEAD_AMOUNT, LEAD_MARKER, TRAIL_AMOUNT,
    TRAIL_MARKER,
};
use crate::currency::{build_spec, CurrencySpec, Magnitude, AMOUNT_PATTERN, MAGNITUDE_PATTERN};

/// Identifies one amount-bearing pattern of a currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternId {
    /// `$5`, `$2.94k`
    JoinedMarkerFirst,
    /// `5USD`, `2.94k€`
    JoinedAmountFirst,
    /// `111.11 k $`
    AmountMagnitudeMarker,
    /// `$ 111.11 k`
    MarkerAmountMagnitude,
    /// `5.55 $`
    AmountMarker,
    /// `USD 66`
    MarkerAmount,
    /// `7.77 Dollars`
    AmountLongName,
}

/// Compiled regexes for one currency.
pub struct CurrencyMatchers {
    spec: CurrencySpec,
    joined_marker_first: Regex,
    joined_amount_first: Regex,
    amount_magnitude_marker: Regex,
    marker_amount_magnitude: Regex,
    amount_marker: Regex,
    marker_amount: Regex,
    amount_long_name: Regex,
    marker: Regex,
    isolated_marker: Regex,
    long_name: Regex,
    isolated_long_name: Regex,
}

impl CurrencyMatchers {
    /// Compiles every pattern of `spec`.
    pub fn compile(spec: CurrencySpec) -> Result<Self, regex::Error> {
        let short = spec.short_pattern.as_str();
        let long = spec.long_pattern.as_str();
        let amount = AMOUNT_PATTERN;
        let magnitude = MAGNITUDE_PATTERN;

        let joined_marker_first = compile(&format!(
            r"{LEAD_MARKER}(?P<m>{short}(?P<amount>{amount})(?:\s*(?P<magnitude>{magnitude})\b)?){TRAIL_AMOUNT}"
        ))?;
        let joined_amount_first = compile(&format!(
            r"{LEAD_AMOUNT}(?P<m>(?P<amount>{amount})(?P<magnitude>{magnitude})?{short}){TRAIL_MARKER}"
        ))?;
        let amount_magnitude_marker = compile(&format!(
            r"{LEAD_AMOUNT}(?P<m>(?P<amount>{amount})\s*(?P<magnitude>{magnitude})\s+{short}){TRAIL_MARKER}"
        ))?;
        let marker_amount_magnitude = compile(&format!(
            r"{LEAD_MARKER}(?P<m>{short}\s+(?P<amount>{amount})\s*(?P<magnitude>{magnitude})){TRAIL_MARKER}"
        ))?;
        let amount_marker = compile(&format!(
            r"{LEAD_AMOUNT}(?P<m>(?P<amount>{amount})\s+{short}){TRAIL_MARKER}"
        ))?;
        let marker_amount = compile(&format!(
            r"{LEAD_MARKER}(?P<m>{short}\s+(?P<amount>{amount})){TRAIL_AMOUNT}"
        ))?;
        let amount_long_name = compile(&format!(
            r"{LEAD_AMOUNT}(?P<m>(?P<amount>{amount})\s+{long})\b"
        ))?;
        let marker = compile(&format!(r"{LEAD_MARKER}(?P<m>{short}){TRAIL_MARKER}"))?;
        let isolated_marker = compile(&format!(r"^{short}$"))?;
        let long_name = compile(&format!(r"(?:^|\s)(?P<m>{long})\b"))?;
        let isolated_long_name = compile(&format!(r"^{long}$"))?;

        Ok(Self {
            spec,
            joined_marker_first,
            joined_amount_first,
            amount_magnitude_marker,
            marker_amount_magnitude,
            amount_marker,
            marker_amount,
            amount_long_name,
            marker,
            isolated_marker,
            long_name,
            isolated_long_name,
        })
    }

    pub fn spec(&self) -> &CurrencySpec {
        &self.spec
    }

    pub fn code(&self) -> &str {
        &self.spec.code
    }

    fn regex_for(&self, pattern: PatternId) -> &Regex {
        match pattern {
            PatternId::JoinedMarkerFirst => &self.joined_marker_first,
            PatternId::JoinedAmountFirst => &self.joined_amount_first,
            PatternId::AmountMagnitudeMarker => &self.amount_magnitude_marker,
            PatternId::MarkerAmountMagnitude => &self.marker_amount_magnitude,
            PatternId::AmountMarker => &self.amount_marker,
            PatternId::MarkerAmount => &self.marker_amount,
            PatternId::AmountLongName => &self.amount_long_name,
        }
    }

    /// All amounts matched by `patterns`, in text order, without overlaps.
    ///
    /// Matches whose amount is already followed by the reference token are
    /// dropped, as are literals that do not parse as a number.
    pub fn find_amounts(&self, text: &str, patterns: &[PatternId]) -> Vec<AmountMatch> {
        let mut found: Vec<AmountMatch> = patterns
            .iter()
            .flat_map(|pattern| scan_bounded(self.regex_for(*pattern), text))
            .filter_map(|caps| amount_from_captures(text, &caps))
            .collect();

        found.sort_by_key(|m| (m.span.start, std::cmp::Reverse(m.span.end)));

        let mut result: Vec<AmountMatch> = Vec::with_capacity(found.len());
        for candidate in found {
            let overlaps = result
                .last()
                .map(|prev| candidate.span.start < prev.span.end)
                .unwrap_or(false);
            if !overlaps {
                result.push(candidate);
            }
        }
        result
    }

    /// True when `pattern` matches at least one convertible amount.
    pub fn has_amount(&self, text: &str, pattern: PatternId) -> bool {
        !self.find_amounts(text, &[pattern]).is_empty()
    }

    /// True when a short marker (code, dotted code or symbol) stands in the text.
    pub fn has_marker(&self, text: &str) -> bool {
        self.marker.is_match(text)
    }

    /// True when the trimmed text is exactly a short marker.
    pub fn is_isolated_marker(&self, text: &str) -> bool {
        self.isolated_marker.is_match(text.trim())
    }

    /// True when the long currency name stands in the text.
    pub fn has_long_name(&self, text: &str) -> bool {
        self.long_name.is_match(text)
    }

    /// True when the trimmed text is exactly the long currency name.
    pub fn is_isolated_long_name(&self, text: &str) -> bool {
        self.isolated_long_name.is_match(text.trim())
    }

    /// Byte ranges of every short marker in `text`.
    pub fn marker_spans(&self, text: &str) -> Vec<Range<usize>> {
        scan_bounded(&self.marker, text)
            .iter()
            .filter_map(|caps| caps.name("m").map(|m| m.range()))
            .collect()
    }

    /// Byte ranges of every long currency name in `text`.
    pub fn long_name_spans(&self, text: &str) -> Vec<Range<usize>> {
        scan_bounded(&self.long_name, text)
            .iter()
            .filter_map(|caps| caps.name("m").map(|m| m.range()))
            .collect()
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?i){}", pattern))
}

/// Runs `re` repeatedly, restarting right after each `m` group so the edge
/// character consumed behind one match can lead the next one.
fn scan_bounded<'t>(re: &Regex, text: &'t str) -> Vec<Captures<'t>> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos <= text.len() {
        let caps = match re.captures_at(text, pos) {
            Some(caps) => caps,
            None => break,
        };
        let next = match caps.name("m") {
            Some(m) if m.end() > pos => m.end(),
            _ => break,
        };
        out.push(caps);
        pos = next;
    }
    out
}

fn amount_from_captures(text: &str, caps: &Captures) -> Option<AmountMatch> {
    let whole = caps.name("m")?;
    let amount = caps.name("amount")?;
    if followed_by_reference(text, amount.end()) {
        return None;
    }

    let mut span = whole.range();
    let mut magnitude = Magnitude::Unit;
    if let Some(letter) = caps.name("magnitude") {
        if letter.end() < whole.end() || closes_magnitude(&text[letter.end()..]) {
            magnitude = Magnitude::from_letter(letter.as_str()).unwrap_or_default();
        } else if letter.start() > amount.end() {
            // a spaced letter opening a word ("$5 M&A") is not a magnitude
            span = whole.start()..amount.end();
        } else {
            return None;
        }
    }

    let raw = &text[span.clone()];
    match AmountMatch::new(span, raw, amount.as_str(), magnitude) {
        Ok(found) => Some(found),
        Err(e) => {
            debug!("Skipping match '{}': {}", raw, e);
            None
        }
    }
}

/// Compiled matchers for each supported currency, keyed by code.
///
/// Built when a context is published and shared read-only by every scan.
#[derive(Clone, Default)]
pub struct MatcherCache {
    order: Vec<String>,
    by_code: HashMap<String, Arc<CurrencyMatchers>>,
}

impl MatcherCache {
    /// Compiles matchers for `codes`, keeping their order. Duplicate codes are
    /// compiled once; a code whose patterns fail to compile is skipped.
    pub fn build<S: AsRef<str>>(codes: &[S]) -> Self {
        let mut cache = Self::default();
        for code in codes {
            cache.insert(code.as_ref());
        }
        cache
    }

    fn insert(&mut self, code: &str) {
        let spec = build_spec(code);
        if self.by_code.contains_key(&spec.code) {
            return;
        }
        let key = spec.code.clone();
        match CurrencyMatchers::compile(spec) {
            Ok(matchers) => {
                self.order.push(key.clone());
                self.by_code.insert(key, Arc::new(matchers));
            }
            Err(e) => log::error!("Failed to compile patterns for '{}': {}", key, e),
        }
    }

    pub fn get(&self, code: &str) -> Option<&Arc<CurrencyMatchers>> {
        self.by_code.get(&code.trim().to_lowercase())
    }

    /// Matchers in configured currency order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CurrencyMatchers>> {
        self.order.iter().filter_map(|code| self.by_code.get(code))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
