//! Preferences pushed by the host and the conversion context built from them.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{
    DEFAULT_DECIMALS, DEFAULT_REFRESH_INTERVAL_SECS, MAX_DECIMALS, MAX_REFRESH_INTERVAL_SECS,
    MIN_DECIMALS, MIN_REFRESH_INTERVAL_SECS,
};
use crate::currency::BUILTIN_CURRENCIES;
use crate::errors::{Error, Result};

/// User preferences as published by the preferences collaborator.
///
/// Rates are "fiat units per one RAI" and travel as numeric strings; plain
/// JSON numbers are accepted too.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_decimals")]
    pub decimals: i64,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: i64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub base_rate: String,
    #[serde(default, deserialize_with = "rate_map")]
    pub rates: BTreeMap<String, String>,
    #[serde(default = "default_currencies")]
    pub supported_currencies: Vec<String>,
    /// Render magnitude-suffixed amounts shortened (`5.88k`) instead of in full.
    #[serde(default)]
    pub shorten_notation: bool,
    /// Show `<0.01` instead of `0.00` for tiny nonzero values.
    #[serde(default = "default_true")]
    pub clamp_min_value: bool,
}

fn default_decimals() -> i64 {
    DEFAULT_DECIMALS as i64
}

fn default_refresh_interval() -> i64 {
    DEFAULT_REFRESH_INTERVAL_SECS as i64
}

fn default_currencies() -> Vec<String> {
    BUILTIN_CURRENCIES
        .iter()
        .map(|info| info.code.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            enabled: false,
            decimals: default_decimals(),
            refresh_interval_seconds: default_refresh_interval(),
            base_rate: "1".to_string(),
            rates: BTreeMap::new(),
            supported_currencies: default_currencies(),
            shorten_notation: false,
            clamp_min_value: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(StringOrNumber::into_string)
}

fn rate_map<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, StringOrNumber>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(code, rate)| (code, rate.into_string()))
        .collect())
}

/// How converted values below the display precision are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinValuePolicy {
    /// `<0.01` / `>-0.01`
    #[default]
    Clamp,
    /// Plain rounding, possibly `0.00`.
    Round,
}

/// Read-only snapshot the engine converts with.
///
/// Rebuilt from scratch whenever new preferences are published; scans only
/// ever borrow it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionContext {
    pub enabled: bool,
    pub decimals: u32,
    pub refresh_interval_secs: u64,
    pub base_rate: Decimal,
    pub rates: HashMap<String, Decimal>,
    pub supported_currencies: Vec<String>,
    pub shorten_notation: bool,
    pub min_value_policy: MinValuePolicy,
}

impl ConversionContext {
    /// Validates and normalizes preferences.
    ///
    /// Out-of-range integers are clamped and unusable per-currency rates are
    /// dropped (they fall back to the base rate). An unusable base rate is an
    /// error.
    pub fn from_preferences(prefs: &Preferences) -> Result<Self> {
        let decimals = clamp_logged(
            "decimals",
            prefs.decimals,
            MIN_DECIMALS as i64,
            MAX_DECIMALS as i64,
        ) as u32;
        let refresh_interval_secs = clamp_logged(
            "refreshIntervalSeconds",
            prefs.refresh_interval_seconds,
            MIN_REFRESH_INTERVAL_SECS as i64,
            MAX_REFRESH_INTERVAL_SECS as i64,
        ) as u64;

        let base_rate = parse_rate(&prefs.base_rate).ok_or_else(|| {
            Error::InvalidConfigValue(format!(
                "baseRate '{}' is not a positive number",
                prefs.base_rate
            ))
        })?;

        let mut rates = HashMap::new();
        for (code, raw) in &prefs.rates {
            match parse_rate(raw) {
                Some(rate) => {
                    rates.insert(code.trim().to_lowercase(), rate);
                }
                None => warn!(
                    "Ignoring rate '{}' for '{}', falling back to base rate",
                    raw, code
                ),
            }
        }

        let supported_currencies = prefs
            .supported_currencies
            .iter()
            .map(|code| code.trim().to_lowercase())
            .collect();

        Ok(Self {
            enabled: prefs.enabled,
            decimals,
            refresh_interval_secs,
            base_rate,
            rates,
            supported_currencies,
            shorten_notation: prefs.shorten_notation,
            min_value_policy: if prefs.clamp_min_value {
                MinValuePolicy::Clamp
            } else {
                MinValuePolicy::Round
            },
        })
    }

    /// Rate for `code`, or the base rate when none is configured.
    pub fn rate_for(&self, code: &str) -> Decimal {
        self.rates
            .get(&code.trim().to_lowercase())
            .copied()
            .unwrap_or(self.base_rate)
    }
}

/// Parses a positive rate from a numeric string.
pub fn parse_rate(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .filter(|rate| rate.is_sign_positive() && !rate.is_zero())
}

fn clamp_logged(name: &str, value: i64, min: i64, max: i64) -> i64 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!("{} = {} is out of range, using {}", name, value, clamped);
    }
    clamped
}
