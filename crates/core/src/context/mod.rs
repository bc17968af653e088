//! Conversion context - preferences, validated snapshot and rate payloads.

mod context_model;
mod oracle;

pub use context_model::{parse_rate, ConversionContext, MinValuePolicy, Preferences};
pub use oracle::{apply_oracle_rates, parse_oracle_payload};
