//! Price oracle payload handling.
//!
//! The fetcher hands over the raw body of a simple-price response,
//! `{"rai": {"usd": 3.01, "eur": 2.76}}`; everything else happens here.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde_json::Value;

use super::context_model::{parse_rate, Preferences};
use crate::constants::DEFAULT_CURRENCY;
use crate::errors::{Error, Result};

/// Extracts the `code -> rate` table quoted for `token` from an oracle body.
///
/// Codes are lowercased. Entries that are not positive numbers are skipped.
pub fn parse_oracle_payload(body: &str, token: &str) -> Result<BTreeMap<String, String>> {
    let payload: Value = serde_json::from_str(body)?;
    let quotes = payload
        .get(token.to_lowercase())
        .and_then(Value::as_object)
        .ok_or_else(|| {
            Error::InvalidOraclePayload(format!("no quote object for token '{}'", token))
        })?;

    let mut rates = BTreeMap::new();
    for (code, quote) in quotes {
        let raw = match quote {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            other => {
                warn!("Skipping non-numeric quote for '{}': {}", code, other);
                continue;
            }
        };
        if parse_rate(&raw).is_none() {
            warn!("Skipping unusable quote for '{}': {}", code, raw);
            continue;
        }
        rates.insert(code.to_lowercase(), raw);
    }

    if rates.is_empty() {
        return Err(Error::InvalidOraclePayload(format!(
            "no usable quotes for token '{}'",
            token
        )));
    }
    Ok(rates)
}

/// Replaces the rate table of `prefs`; the dollar quote becomes the base rate.
pub fn apply_oracle_rates(prefs: &mut Preferences, rates: BTreeMap<String, String>) {
    if let Some(base) = rates.get(DEFAULT_CURRENCY) {
        debug!("Base rate {} -> {}", prefs.base_rate, base);
        prefs.base_rate = base.clone();
    }
    prefs.rates = rates;
}
