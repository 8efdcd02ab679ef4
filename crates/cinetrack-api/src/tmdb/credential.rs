//! TMDB credential handling.

use std::fmt;

use crate::network::RequestOptions;

/// Environment variable holding a v3 API key.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Environment variable holding a v4 read-access token.
pub const API_TOKEN_ENV: &str = "TMDB_API_TOKEN";

/// Values shipped in sample `.env` files that TMDB will always reject.
const PLACEHOLDERS: [&str; 7] = [
    "your_api_key_here",
    "your_tmdb_api_key",
    "your-tmdb-api-key",
    "<your-api-key>",
    "changeme",
    "placeholder",
    "xxx",
];

/// Returns `true` for empty values and known placeholders.
#[must_use]
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || PLACEHOLDERS
            .iter()
            .any(|placeholder| trimmed.eq_ignore_ascii_case(placeholder))
}

/// A usable TMDB credential.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// v3 API key, sent as the `api_key` query parameter.
    ApiKey(String),
    /// v4 read-access token, sent as `Authorization: Bearer`.
    BearerToken(String),
}

impl Credential {
    /// Wraps an API key; `None` if it is empty or a placeholder.
    #[must_use]
    pub fn api_key(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        (!is_placeholder(&value)).then(|| Self::ApiKey(String::from(value.trim())))
    }

    /// Wraps a bearer token; `None` if it is empty or a placeholder.
    #[must_use]
    pub fn bearer_token(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        (!is_placeholder(&value)).then(|| Self::BearerToken(String::from(value.trim())))
    }

    /// Reads `TMDB_API_KEY`, falling back to `TMDB_API_TOKEN`.
    ///
    /// Returns `None` when neither holds a usable value.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Credential::from_env`] with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        lookup(API_KEY_ENV)
            .and_then(Self::api_key)
            .or_else(|| lookup(API_TOKEN_ENV).and_then(Self::bearer_token))
    }

    /// Attaches the credential to a request.
    #[must_use]
    pub fn apply(&self, options: RequestOptions) -> RequestOptions {
        match self {
            Self::ApiKey(key) => options.query("api_key", key.as_str()),
            Self::BearerToken(token) => options.bearer_token(token.as_str()),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::BearerToken(_) => f.write_str("BearerToken(<redacted>)"),
        }
    }
}
