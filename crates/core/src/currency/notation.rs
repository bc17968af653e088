//! Magnitude word normalization.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::grammar::AMOUNT_PATTERN;

lazy_static! {
    static ref MAGNITUDE_WORD_RE: Regex = Regex::new(&format!(
        r"(?i)(?P<amount>{})(?P<space>\s*)(?P<word>kilo|million|billion)\b",
        AMOUNT_PATTERN
    ))
    .expect("Invalid magnitude word regex");
}

/// Rewrites `<amount> kilo|million|billion` to the k/m/b letter form.
///
/// Only the word following an amount is replaced; whitespace is kept, so
/// `"3 million USD"` becomes `"3 m USD"`. Text without a magnitude word is
/// returned borrowed.
pub fn expand_notation(text: &str) -> Cow<'_, str> {
    MAGNITUDE_WORD_RE.replace_all(text, |caps: &Captures| {
        let letter = match caps["word"].to_ascii_lowercase().as_str() {
            "kilo" => "k",
            "million" => "m",
            _ => "b",
        };
        format!("{}{}{}", &caps["amount"], &caps["space"], letter)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_million_is_abbreviated() {
        assert_eq!(expand_notation("3 million USD"), "3 m USD");
    }

    #[test]
    fn test_case_insensitive_words() {
        assert_eq!(expand_notation("$1.5 Billion"), "$1.5 b");
        assert_eq!(expand_notation("20KILO €"), "20k €");
    }

    #[test]
    fn test_words_without_amount_are_left_alone() {
        let text = "a million thanks";
        assert!(matches!(expand_notation(text), Cow::Borrowed(_)));
    }

    #[test]
    fn test_longer_words_are_not_truncated() {
        assert_eq!(expand_notation("5 kilometers"), "5 kilometers");
    }

    #[test]
    fn test_idempotent_on_abbreviated_text() {
        let once = expand_notation("2 billion dollars").into_owned();
        assert_eq!(once, "2 b dollars");
        assert_eq!(expand_notation(&once), once);
    }
}
