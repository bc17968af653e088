//! Segment classification.
//!
//! Rules are evaluated in a fixed order: joined notation, spaced short form
//! (magnitude-bearing variants first), isolated short marker, long name.

use super::matchers::{CurrencyMatchers, PatternId};
use crate::currency::grammar::is_isolated_amount;

/// How a segment relates to one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Marker and amount touch: `$5`, `11.1USD`, `$2.94k`.
    Joined,
    /// `5.55 $`, `111.11 k $`, `7.77 Dollars`.
    AmountThenCurrency { pattern: PatternId },
    /// `USD 66`, `$ 111.11 k`.
    CurrencyThenAmount { pattern: PatternId },
    /// The segment is only a marker; the amount lives in a neighbour.
    IsolatedCurrency { search_both_sides: bool },
    /// The segment is only an amount.
    IsolatedAmount,
    NoMatch,
}

impl MatchKind {
    /// Patterns whose matches get rewritten for this classification.
    pub fn patterns(&self) -> Vec<PatternId> {
        match self {
            MatchKind::Joined => vec![PatternId::JoinedMarkerFirst, PatternId::JoinedAmountFirst],
            MatchKind::AmountThenCurrency { pattern } | MatchKind::CurrencyThenAmount { pattern } => {
                vec![*pattern]
            }
            _ => Vec::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        !matches!(self, MatchKind::NoMatch)
    }
}

/// Classifies `text` against one currency.
pub fn classify(text: &str, matchers: &CurrencyMatchers) -> MatchKind {
    if matchers.has_amount(text, PatternId::JoinedMarkerFirst)
        || matchers.has_amount(text, PatternId::JoinedAmountFirst)
    {
        return MatchKind::Joined;
    }

    if matchers.has_marker(text) {
        if matchers.has_amount(text, PatternId::AmountMagnitudeMarker) {
            return MatchKind::AmountThenCurrency {
                pattern: PatternId::AmountMagnitudeMarker,
            };
        }
        if matchers.has_amount(text, PatternId::MarkerAmountMagnitude) {
            return MatchKind::CurrencyThenAmount {
                pattern: PatternId::MarkerAmountMagnitude,
            };
        }
        if matchers.has_amount(text, PatternId::AmountMarker) {
            return MatchKind::AmountThenCurrency {
                pattern: PatternId::AmountMarker,
            };
        }
        if matchers.has_amount(text, PatternId::MarkerAmount) {
            return MatchKind::CurrencyThenAmount {
                pattern: PatternId::MarkerAmount,
            };
        }
        if matchers.is_isolated_marker(text) {
            return MatchKind::IsolatedCurrency {
                search_both_sides: true,
            };
        }
    }

    if matchers.has_long_name(text) {
        if matchers.has_amount(text, PatternId::AmountLongName) {
            return MatchKind::AmountThenCurrency {
                pattern: PatternId::AmountLongName,
            };
        }
        if matchers.is_isolated_long_name(text) {
            return MatchKind::IsolatedCurrency {
                search_both_sides: false,
            };
        }
    }

    if is_isolated_amount(text) {
        return MatchKind::IsolatedAmount;
    }

    MatchKind::NoMatch
}
