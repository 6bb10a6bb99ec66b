//! Error types for data handling in verdant-types.

use thiserror::Error;

/// Errors that can occur when interpreting sensor payload data.
///
/// This error type is transport-agnostic and does not include HTTP or
/// network errors (those belong in verdant-core).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A required field was missing from a payload element.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A field held a value outside its valid range.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Result type alias using verdant-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
