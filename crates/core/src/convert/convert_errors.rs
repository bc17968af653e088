use thiserror::Error;

/// Reasons a single amount could not be converted.
///
/// These never leave a scan: the applier logs them and leaves the text as is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Unparsable amount: {0}")]
    UnparsableAmount(String),

    #[error("No usable rate for currency: {0}")]
    MissingRate(String),

    #[error("Arithmetic overflow converting {0}")]
    Overflow(String),
}
