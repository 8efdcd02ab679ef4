//! `TmdbError` - failures surfaced by the fetch wrapper, client, and service.

use std::time::Duration;

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, TmdbError>;

/// Errors returned by the TMDB client layers.
///
/// `Clone` so that callers coalesced onto one in-flight request all receive
/// the same error value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum TmdbError {
    /// The TMDB credential is unset, empty, or a known placeholder.
    #[error("TMDB API credential is missing or is a placeholder value")]
    MissingCredential,

    /// The connectivity provider reports that no request can be made.
    #[error("no network connection")]
    Offline,

    /// The request did not complete within the tiered timeout.
    #[error("request timed out after {timeout:?}")]
    Timeout {
        /// Timeout that was applied to the request.
        timeout: Duration,
    },

    /// TMDB answered with a non-success status.
    #[error("TMDB API error (HTTP {status}): {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Upstream `status_message` or raw body.
        message: String,
    },

    /// Caller input was rejected before any network activity.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body was not the expected JSON shape.
    #[error("failed to decode JSON response: {0}")]
    Decode(String),

    /// Client construction failed.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl TmdbError {
    /// Returns `true` when re-issuing the same call later may succeed.
    ///
    /// Nothing in this crate retries automatically; this only tells the
    /// caller whether to offer a manual retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Offline | Self::Timeout { .. } | Self::Transport(_) => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            Self::MissingCredential | Self::InvalidInput(_) | Self::Decode(_) | Self::Config(_) => {
                false
            }
        }
    }
}

impl From<reqwest::Error> for TmdbError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Transport(format!("failed to connect: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TmdbError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
