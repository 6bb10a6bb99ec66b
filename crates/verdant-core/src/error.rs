//! Error types for verdant-core.
//!
//! Every failure mode of a fetch cycle maps onto one [`FetchError`] variant:
//!
//! | Variant | Meaning | Working set |
//! |---------|---------|-------------|
//! | [`FetchError::Transport`] | Connectivity, DNS, or timeout | untouched |
//! | [`FetchError::Status`] | Non-2xx HTTP response | untouched |
//! | [`FetchError::Decode`] | Body (or nested `body` field) is not valid JSON | untouched |
//! | [`FetchError::InvalidUrl`] | Endpoint misconfiguration, raised at construction | n/a |
//!
//! Cycle failures never propagate past the poller: they are captured into its
//! last-error state and cleared by the next successful cycle. A structurally
//! valid but data-empty payload is not an error at all.

use thiserror::Error;

/// Errors that can occur when fetching or decoding a telemetry payload.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The remote call could not complete (connectivity, DNS, timeout).
    #[error("transport error: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-2xx status.
    #[error("server returned HTTP {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The response body, or the nested `body` field, is not valid JSON.
    #[error("invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured endpoint URL is not usable.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FetchError {
    /// Wrap a transport-level [`reqwest::Error`].
    pub fn transport(source: reqwest::Error) -> Self {
        Self::Transport { source }
    }

    /// Create a protocol failure carrying the HTTP status code.
    pub fn status(status: u16) -> Self {
        Self::Status { status }
    }
}

/// Result type alias using verdant-core's [`FetchError`] type.
pub type Result<T> = std::result::Result<T, FetchError>;
