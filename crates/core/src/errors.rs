//! Core error types for the RAI lens engine.
//!
//! Scanning never surfaces errors to its caller: conversion failures are
//! absorbed where they happen and leave the segment untouched. Errors are
//! returned only at the edges, when preferences or documents are loaded.

use thiserror::Error;

use crate::convert::ConversionError;
use crate::document::DocumentError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Invalid oracle payload: {0}")]
    InvalidOraclePayload(String),

    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Failed to parse JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}
