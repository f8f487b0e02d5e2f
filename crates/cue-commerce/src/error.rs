//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart operations.
#[derive(Error, Debug, PartialEq)]
pub enum CommerceError {
    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Price is malformed or negative.
    #[error("Invalid price: {0:?}")]
    InvalidPrice(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Cache error.
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl From<cue_cache::CacheError> for CommerceError {
    fn from(e: cue_cache::CacheError) -> Self {
        CommerceError::CacheError(e.to_string())
    }
}
