//! `NetworkFetcher` - connectivity-gated, timeout-bounded GET requests.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::instrument;
use url::Url;

use super::connectivity::{ConnectivityProvider, NetworkType};
use crate::error::{Result, TmdbError};

/// Timeout for `slow-2g` and `2g` connections.
const POOR_CONNECTION_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for `3g` connections.
const MEDIUM_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for everything else (wifi, 4g, unknown).
const FAST_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Three-tier request timeout keyed by connection class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    /// Applied to `slow-2g` and `2g`.
    pub poor: Duration,
    /// Applied to `3g`.
    pub medium: Duration,
    /// Applied to every other connection class.
    pub fast: Duration,
}

impl TimeoutPolicy {
    /// Returns the timeout for a connection class.
    #[must_use]
    pub const fn for_network(&self, network_type: NetworkType) -> Duration {
        match network_type {
            NetworkType::Slow2g | NetworkType::Cellular2g => self.poor,
            NetworkType::Cellular3g => self.medium,
            NetworkType::Cellular4g
            | NetworkType::Wifi
            | NetworkType::Ethernet
            | NetworkType::None
            | NetworkType::Unknown => self.fast,
        }
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            poor: POOR_CONNECTION_TIMEOUT,
            medium: MEDIUM_CONNECTION_TIMEOUT,
            fast: FAST_CONNECTION_TIMEOUT,
        }
    }
}

/// Per-request options for [`NetworkFetcher::get`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query parameters appended to the URL.
    pub query: Vec<(String, String)>,
    /// Bearer token sent in the `Authorization` header.
    pub bearer_token: Option<String>,
}

impl RequestOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

/// Response status and body, read within the request timeout.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Full response body.
    pub body: String,
}

/// HTTP GET wrapper that checks connectivity first and enforces a tiered timeout.
///
/// No retries happen here.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct NetworkFetcher {
    /// HTTP client.
    http_client: Client,
    /// Connectivity source consulted before every request.
    connectivity: Arc<dyn ConnectivityProvider>,
    /// Timeout tiers.
    policy: TimeoutPolicy,
}

impl NetworkFetcher {
    /// Creates a fetcher.
    #[must_use]
    pub fn new(
        http_client: Client,
        connectivity: Arc<dyn ConnectivityProvider>,
        policy: TimeoutPolicy,
    ) -> Self {
        Self {
            http_client,
            connectivity,
            policy,
        }
    }

    /// Timeout tiers in use.
    #[must_use]
    pub const fn policy(&self) -> &TimeoutPolicy {
        &self.policy
    }

    /// Current connectivity snapshot.
    #[must_use]
    pub fn connectivity(&self) -> super::NetworkStatus {
        self.connectivity.status()
    }

    /// Sends a GET request and reads the body.
    ///
    /// Sending and reading the body share one timeout; when it elapses the
    /// in-flight future is dropped, which aborts the request.
    ///
    /// # Errors
    ///
    /// - [`TmdbError::Offline`] when the connectivity provider forbids requests.
    /// - [`TmdbError::Timeout`] when the tiered timeout elapses.
    /// - [`TmdbError::Transport`] when the request cannot be built or sent.
    #[instrument(skip_all)]
    pub async fn get(&self, url: Url, options: &RequestOptions) -> Result<FetchedResponse> {
        let status = self.connectivity.status();
        if !status.can_make_request {
            tracing::warn!(path = url.path(), "no network connection, request skipped");
            return Err(TmdbError::Offline);
        }

        let timeout = self.policy.for_network(status.network_type);

        let mut builder = self.http_client.get(url).query(&options.query);
        if let Some(ref token) = options.bearer_token {
            builder = builder.bearer_auth(token);
        }
        let request = builder.build()?;

        // Query may carry the API key; log the path only.
        tracing::debug!(
            path = request.url().path(),
            network_type = %status.network_type,
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "TMDB API request"
        );

        let exchange = async {
            let response = self.http_client.execute(request).await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, TmdbError>(FetchedResponse { status, body })
        };

        if let Ok(result) = tokio::time::timeout(timeout, exchange).await {
            result
        } else {
            tracing::warn!(
                network_type = %status.network_type,
                timeout = ?timeout,
                "TMDB API request timed out"
            );
            Err(TmdbError::Timeout { timeout })
        }
    }
}
