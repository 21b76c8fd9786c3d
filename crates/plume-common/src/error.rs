//! Error types for plume

use thiserror::Error;

/// Result type alias for plume operations
pub type Result<T> = std::result::Result<T, PlumeError>;

/// Main error type for plume
#[derive(Error, Debug)]
pub enum PlumeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid {field} value: '{value}'")]
    InvalidEnumValue { field: &'static str, value: String },

    #[error("{field} must be within [{min}, {max}], got {value}")]
    RangeViolation {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
