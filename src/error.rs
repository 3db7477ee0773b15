//! Error types for the rotorcrypt library.

use thiserror::Error;

/// Errors produced by the rotorcrypt library.
///
/// Every variant except [`ArithmeticOverflowFallback`](Self::ArithmeticOverflowFallback)
/// aborts the current transform; no partial output is ever returned
/// alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotorCryptError {
    /// The transform was configured in a way that cannot run
    /// (empty pipeline, zero loop count, misplaced state carry, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Input was malformed for the stage that consumed it.
    #[error("Decode error: {0}")]
    Decode(String),
    /// The digest provider could not produce a hash.
    #[error("Digest unavailable: {0}")]
    DigestUnavailable(String),
    /// The `super` equation fell back to the `simple` equation.
    ///
    /// Never returned as an `Err`; only its message is logged.
    #[error("High-precision arithmetic unavailable, falling back to the simple equation")]
    ArithmeticOverflowFallback,
}

impl RotorCryptError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        RotorCryptError::Configuration(msg.into())
    }

    pub(crate) fn decode(msg: impl Into<String>) -> Self {
        RotorCryptError::Decode(msg.into())
    }
}
