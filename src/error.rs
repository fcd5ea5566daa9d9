//! Error types for Pipecraft.
//!
//! Errors cover the model, configuration, and serialization surface only.
//! Invalid canvas gestures (self-loops, duplicate edges, deleting `start`)
//! are not errors: the store silently leaves state unchanged and reports an
//! outcome value instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all Pipecraft operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum PipecraftError {
    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// Data conversion errors (JSON, TOML).
    #[error("{0}")]
    Convert(String),

    /// Pipeline document errors.
    #[error("{0}")]
    Pipeline(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),
}

impl From<PipecraftError> for String {
    fn from(val: PipecraftError) -> Self {
        val.to_string()
    }
}

impl From<std::io::Error> for PipecraftError {
    fn from(error: std::io::Error) -> Self {
        PipecraftError::IoError(error.to_string())
    }
}

impl From<serde_json::Error> for PipecraftError {
    fn from(error: serde_json::Error) -> Self {
        PipecraftError::Convert(error.to_string())
    }
}

impl From<toml::de::Error> for PipecraftError {
    fn from(error: toml::de::Error) -> Self {
        PipecraftError::Config(error.to_string())
    }
}
