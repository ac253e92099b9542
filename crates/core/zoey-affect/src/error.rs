//! Error types for the affective regulation core
//!
//! The per-turn regulation path never fails: unknown channels are created
//! lazily, out-of-range feedback is clamped and empty histories read as
//! neutral. These errors only surface from the ambient layers around it
//! (name parsing, environment configuration, snapshots).

use thiserror::Error;

/// Main error type for regulator operations
#[derive(Debug, Error)]
pub enum AffectError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A profile, style or tone name that does not map to a known variant
    #[error("Unknown {kind} '{value}'. Expected one of: {expected}")]
    UnknownName {
        /// What was being parsed (profile, coping style, tone)
        kind: &'static str,
        /// The rejected input
        value: String,
        /// Accepted spellings
        expected: &'static str,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenient Result type using AffectError
pub type Result<T> = std::result::Result<T, AffectError>;

impl AffectError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        AffectError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AffectError::Validation(msg.into())
    }

    /// Create an unknown-name error
    pub fn unknown_name(kind: &'static str, value: impl Into<String>, expected: &'static str) -> Self {
        AffectError::UnknownName {
            kind,
            value: value.into(),
            expected,
        }
    }
}
