//! Amount detection - compiled matchers and segment classification.

mod amount_detector;
mod amount_match;
mod matchers;

pub use amount_detector::{classify, MatchKind};
pub use amount_match::{literal_decimals, parse_amount, AmountMatch};
pub use matchers::{CurrencyMatchers, MatcherCache, PatternId};
