//! Built-in currency table and pattern fragment construction.

use log::warn;

use super::currency_model::{CurrencyInfo, CurrencySpec};
use crate::constants::DEFAULT_CURRENCY;

/// Currencies the engine knows how to recognize.
pub const BUILTIN_CURRENCIES: [CurrencyInfo; 7] = [
    CurrencyInfo {
        code: "usd",
        symbol: "$",
        name: "Dollar",
    },
    CurrencyInfo {
        code: "eur",
        symbol: "€",
        name: "Euro",
    },
    CurrencyInfo {
        code: "cny",
        symbol: "元",
        name: "Yuan",
    },
    CurrencyInfo {
        code: "jpy",
        symbol: "¥",
        name: "Yen",
    },
    CurrencyInfo {
        code: "gbp",
        symbol: "£",
        name: "Pound",
    },
    CurrencyInfo {
        code: "krw",
        symbol: "₩",
        name: "Won",
    },
    CurrencyInfo {
        code: "inr",
        symbol: "₹",
        name: "Rupee",
    },
];

/// Looks up a built-in currency by code, ignoring case.
pub fn find_currency(code: &str) -> Option<&'static CurrencyInfo> {
    let code = code.trim();
    BUILTIN_CURRENCIES
        .iter()
        .find(|info| info.code.eq_ignore_ascii_case(code))
}

fn dollar() -> &'static CurrencyInfo {
    &BUILTIN_CURRENCIES[0]
}

/// Builds the spec for a currency code.
///
/// Unknown or empty codes degrade to the dollar patterns instead of failing.
pub fn build_spec(code: &str) -> CurrencySpec {
    let requested = code.trim().to_lowercase();
    let (info, is_fallback) = match find_currency(&requested) {
        Some(info) => (info, false),
        None => {
            warn!(
                "Unknown currency code '{}', using {} patterns",
                code, DEFAULT_CURRENCY
            );
            (dollar(), true)
        }
    };

    let spec_code = if requested.is_empty() {
        info.code.to_string()
    } else {
        requested
    };

    CurrencySpec {
        code: spec_code,
        symbol: info.symbol.to_string(),
        name: info.name.to_string(),
        short_pattern: short_pattern(info),
        long_pattern: long_pattern(info),
        is_fallback,
    }
}

/// Dotted spelling of an ISO code: "usd" -> "U.S.D.".
fn dotted(code: &str) -> String {
    code.to_uppercase().chars().flat_map(|c| [c, '.']).collect()
}

/// `(CODE|C\.O\.D\.|CO\s?SYM|C\.O\.\s?SYM|SYM)`
fn short_pattern(info: &CurrencyInfo) -> String {
    let upper = info.code.to_uppercase();
    let two_letters: String = upper.chars().take(2).collect();
    let dotted_full = dotted(info.code);
    let dotted_two: String = dotted_full.chars().take(4).collect();
    let symbol = regex::escape(info.symbol);

    format!(
        r"({}|{}|{}\s?{}|{}\s?{}|{})",
        regex::escape(&upper),
        regex::escape(&dotted_full),
        regex::escape(&two_letters),
        symbol,
        regex::escape(&dotted_two),
        symbol,
        symbol
    )
}

/// `((C\.?O\.?\s*)?Name[s]?)`
fn long_pattern(info: &CurrencyInfo) -> String {
    let mut letters = info.code.chars().map(|c| c.to_ascii_uppercase());
    let first = letters.next().unwrap_or('U');
    let second = letters.next().unwrap_or('S');
    format!(
        r"(({}\.?{}\.?\s*)?{}[s]?)",
        first,
        second,
        regex::escape(info.name)
    )
}
