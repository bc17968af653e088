//! Currency spec value objects.

use serde::{Deserialize, Serialize};

/// Static description of a built-in fiat currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    /// Lowercase ISO code (e.g. "usd").
    pub code: &'static str,
    /// Display symbol (e.g. "$").
    pub symbol: &'static str,
    /// Singular display name (e.g. "Dollar").
    pub name: &'static str,
}

/// Everything needed to recognize one currency in page text.
///
/// Built once per supported currency by [`build_spec`](super::build_spec) and never
/// mutated afterwards. `code` keeps the requested code even when the patterns
/// fell back to the dollar set, so the rate lookup still uses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySpec {
    pub code: String,
    pub symbol: String,
    pub name: String,
    /// Regex fragment for code, dotted code and symbol spellings.
    pub short_pattern: String,
    /// Regex fragment for the optionally prefixed, optionally plural name.
    pub long_pattern: String,
    /// True when the code was not recognized and dollar patterns are used.
    pub is_fallback: bool,
}
