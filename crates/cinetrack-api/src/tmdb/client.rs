//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::credential::Credential;
use super::types::{
    DiscoverParams, MediaKind, SearchParams, TmdbCombinedCredits, TmdbCredits,
    TmdbErrorResponse, TmdbMovieDetails, TmdbMovieResult, TmdbMultiResult, TmdbPage,
    TmdbPersonDetails, TmdbReview, TmdbTvDetails, TmdbTvResult, TmdbTvSeason, TmdbVideos,
};
use crate::error::{Result, TmdbError};
use crate::network::{
    ConnectivityProvider, NetworkFetcher, RequestOptions, StaticConnectivity, TimeoutPolicy,
};

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default response language.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// TMDB API client.
///
/// One request per call, no retries and no caching.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// Connectivity-aware HTTP fetcher.
    fetcher: NetworkFetcher,
    /// Base URL for API requests.
    base_url: Url,
    /// Credential; `None` fails every request with `MissingCredential`.
    credential: Option<Credential>,
    /// Response language (`language` query parameter).
    language: String,
}

/// Builder for `TmdbClient`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    credential: Option<Credential>,
    user_agent: Option<String>,
    language: Option<String>,
    connectivity: Option<Arc<dyn ConnectivityProvider>>,
    timeouts: Option<TimeoutPolicy>,
}

impl TmdbClientBuilder {
    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the credential. `None` is accepted; requests then fail.
    #[must_use]
    pub fn credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    /// Sets a v3 API key. Placeholder values are discarded.
    #[must_use]
    pub fn api_key(self, key: impl Into<String>) -> Self {
        self.credential(Credential::api_key(key))
    }

    /// Sets a v4 bearer token. Placeholder values are discarded.
    #[must_use]
    pub fn bearer_token(self, token: impl Into<String>) -> Self {
        self.credential(Credential::bearer_token(token))
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (default: `en-US`).
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the connectivity source (default: always online, unknown type).
    #[must_use]
    pub fn connectivity(mut self, connectivity: Arc<dyn ConnectivityProvider>) -> Self {
        self.connectivity = Some(connectivity);
        self
    }

    /// Sets the timeout tiers (default: 15s / 10s / 5s).
    #[must_use]
    pub const fn timeouts(mut self, policy: TimeoutPolicy) -> Self {
        self.timeouts = Some(policy);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let user_agent = self
            .user_agent
            .ok_or_else(|| TmdbError::Config(String::from("user_agent is required")))?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| TmdbError::Config(format!("invalid default base URL: {e}")))?,
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .map_err(|e| TmdbError::Config(format!("failed to build HTTP client: {e}")))?;

        let connectivity = self
            .connectivity
            .unwrap_or_else(|| Arc::new(StaticConnectivity::default()));

        if self.credential.is_none() {
            tracing::warn!("no usable TMDB credential configured; requests will fail");
        }

        Ok(TmdbClient {
            fetcher: NetworkFetcher::new(
                http_client,
                connectivity,
                self.timeouts.unwrap_or_default(),
            ),
            base_url,
            credential: self.credential,
            language: self
                .language
                .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::default()
    }

    /// Returns `true` if a usable credential is configured.
    #[must_use]
    pub const fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Underlying fetcher (connectivity and timeout tiers).
    #[must_use]
    pub const fn fetcher(&self) -> &NetworkFetcher {
        &self.fetcher
    }

    /// Sends a GET request with credentials and decodes the JSON body.
    #[instrument(skip_all)]
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let Some(credential) = &self.credential else {
            tracing::error!(path, "TMDB credential missing or placeholder");
            return Err(TmdbError::MissingCredential);
        };

        let url = self
            .base_url
            .join(path)
            .map_err(|e| TmdbError::Config(format!("failed to join URL path {path}: {e}")))?;

        let options = query
            .iter()
            .fold(RequestOptions::new(), |options, (key, value)| {
                options.query(*key, value.as_str())
            });
        let options = credential.apply(options);

        let response = self.fetcher.get(url, &options).await?;

        if !response.status.is_success() {
            let message = serde_json::from_str::<TmdbErrorResponse>(&response.body).map_or_else(
                |_| response.body.clone(),
                |error_response| error_response.status_message,
            );
            tracing::error!(
                status = response.status.as_u16(),
                path,
                message = %message,
                "TMDB API error"
            );
            return Err(TmdbError::Http {
                status: response.status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            tracing::error!(path, error = %e, "failed to decode TMDB response");
            TmdbError::Decode(format!("{path}: {e}"))
        })
    }

    /// `language` query parameter.
    fn language_param(&self) -> (&'static str, String) {
        ("language", self.language.clone())
    }

    /// Shared query for the search endpoints.
    fn search_query(&self, params: &SearchParams) -> Vec<(&'static str, String)> {
        vec![
            ("query", params.query.clone()),
            self.language_param(),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ]
    }

    /// Shared query for the discover endpoints.
    fn discover_query(&self, params: &DiscoverParams) -> Vec<(&'static str, String)> {
        vec![
            ("with_genres", params.genre_id.to_string()),
            ("sort_by", params.sort_by.clone()),
            self.language_param(),
            ("page", params.page.to_string()),
        ]
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn search_movie(&self, params: &SearchParams) -> Result<TmdbPage<TmdbMovieResult>> {
        self.get_json("search/movie", &self.search_query(params))
            .await
    }

    #[instrument(skip_all)]
    async fn search_tv(&self, params: &SearchParams) -> Result<TmdbPage<TmdbTvResult>> {
        self.get_json("search/tv", &self.search_query(params)).await
    }

    #[instrument(skip_all)]
    async fn search_multi(&self, params: &SearchParams) -> Result<TmdbPage<TmdbMultiResult>> {
        self.get_json("search/multi", &self.search_query(params))
            .await
    }

    #[instrument(skip_all)]
    async fn popular_movies(&self, page: u32) -> Result<TmdbPage<TmdbMovieResult>> {
        let query = [self.language_param(), ("page", page.to_string())];
        self.get_json("movie/popular", &query).await
    }

    #[instrument(skip_all)]
    async fn popular_tv(&self, page: u32) -> Result<TmdbPage<TmdbTvResult>> {
        let query = [self.language_param(), ("page", page.to_string())];
        self.get_json("tv/popular", &query).await
    }

    #[instrument(skip_all)]
    async fn discover_movie(&self, params: &DiscoverParams) -> Result<TmdbPage<TmdbMovieResult>> {
        self.get_json("discover/movie", &self.discover_query(params))
            .await
    }

    #[instrument(skip_all)]
    async fn discover_tv(&self, params: &DiscoverParams) -> Result<TmdbPage<TmdbTvResult>> {
        self.get_json("discover/tv", &self.discover_query(params))
            .await
    }

    #[instrument(skip_all)]
    async fn movie_details(&self, movie_id: u64) -> Result<TmdbMovieDetails> {
        let path = format!("movie/{movie_id}");
        self.get_json(&path, &[self.language_param()]).await
    }

    #[instrument(skip_all)]
    async fn tv_details(&self, series_id: u64) -> Result<TmdbTvDetails> {
        let path = format!("tv/{series_id}");
        self.get_json(&path, &[self.language_param()]).await
    }

    #[instrument(skip_all)]
    async fn tv_season(&self, series_id: u64, season_number: u32) -> Result<TmdbTvSeason> {
        let path = format!("tv/{series_id}/season/{season_number}");
        self.get_json(&path, &[self.language_param()]).await
    }

    #[instrument(skip_all)]
    async fn person_details(&self, person_id: u64) -> Result<TmdbPersonDetails> {
        let path = format!("person/{person_id}");
        self.get_json(&path, &[self.language_param()]).await
    }

    #[instrument(skip_all)]
    async fn person_combined_credits(&self, person_id: u64) -> Result<TmdbCombinedCredits> {
        let path = format!("person/{person_id}/combined_credits");
        self.get_json(&path, &[self.language_param()]).await
    }

    #[instrument(skip_all)]
    async fn credits(&self, kind: MediaKind, id: u64) -> Result<TmdbCredits> {
        let path = format!("{kind}/{id}/credits");
        self.get_json(&path, &[self.language_param()]).await
    }

    #[instrument(skip_all)]
    async fn videos(&self, kind: MediaKind, id: u64) -> Result<TmdbVideos> {
        // Trailers are usually only tagged in English; no language filter.
        let path = format!("{kind}/{id}/videos");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn similar_movies(&self, movie_id: u64, page: u32) -> Result<TmdbPage<TmdbMovieResult>> {
        let path = format!("movie/{movie_id}/similar");
        let query = [self.language_param(), ("page", page.to_string())];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all)]
    async fn reviews(&self, kind: MediaKind, id: u64, page: u32) -> Result<TmdbPage<TmdbReview>> {
        let path = format!("{kind}/{id}/reviews");
        self.get_json(&path, &[("page", page.to_string())]).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::time::Duration;

    use super::*;
    use crate::network::NetworkType;

    fn client_for(mock_server: &wiremock::MockServer) -> TmdbClient {
        let base_url = format!("{}/3/", mock_server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = TmdbClient::builder().api_key("test-key").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_without_credential_succeeds() {
        // Arrange & Act
        let client = TmdbClient::builder()
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert!(!client.has_credential());
    }

    #[test]
    fn test_builder_discards_placeholder_key() {
        // Arrange & Act
        let client = TmdbClient::builder()
            .api_key("your_api_key_here")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert!(!client.has_credential());
    }

    #[test]
    fn test_builder_with_custom_base_url() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/3/").unwrap();

        // Act
        let client = TmdbClient::builder()
            .base_url(custom_url.clone())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url, custom_url);
        assert_eq!(client.language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_parse_movie_details_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_details_550.json");

        // Act
        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.id, 550);
        assert_eq!(details.title, "Fight Club");
        assert_eq!(details.runtime, Some(139));
        assert!(!details.genres.is_empty());
    }

    #[test]
    fn test_parse_tv_details_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/tv_details_1399.json");

        // Act
        let details: TmdbTvDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.id, 1399);
        assert_eq!(details.name, "Game of Thrones");
        assert!(!details.seasons.is_empty());
        assert_eq!(details.number_of_seasons, Some(8));
    }

    #[test]
    fn test_parse_tv_season_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/tv_season_1399_1.json");

        // Act
        let season: TmdbTvSeason = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(season.season_number, 1);
        assert!(!season.episodes.is_empty());
        let first_ep = &season.episodes[0];
        assert_eq!(first_ep.episode_number, 1);
        assert_eq!(first_ep.season_number, 1);
    }

    #[test]
    fn test_parse_search_multi_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/search_multi_mixed.json");

        // Act
        let page: TmdbPage<TmdbMultiResult> = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(page.results.len(), 5);
        assert!(matches!(page.results[0], TmdbMultiResult::Movie(_)));
        assert!(matches!(page.results[1], TmdbMultiResult::Tv(_)));
        assert!(matches!(page.results[2], TmdbMultiResult::Person(_)));
        assert!(matches!(page.results[4], TmdbMultiResult::Unknown));
    }

    #[test]
    fn test_parse_combined_credits_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/person_combined_credits_500.json");

        // Act
        let credits: TmdbCombinedCredits = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(credits.id, 500);
        assert!(credits.cast.iter().any(|c| c.media_type == "movie"));
        assert!(credits.cast.iter().any(|c| c.media_type == "tv"));
    }

    #[test]
    fn test_parse_search_empty_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/search_empty.json");

        // Act
        let page: TmdbPage<TmdbMovieResult> = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(page.total_results, 0);
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: TmdbErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(error.status_message.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_movie_details_via_http_sends_api_key_and_language() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_details_550.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/550"))
            .and(wiremock::matchers::query_param("api_key", "test-key"))
            .and(wiremock::matchers::query_param("language", "en-US"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let details = client.movie_details(550).await.unwrap();

        // Assert
        assert_eq!(details.title, "Fight Club");
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/tv"))
            .and(wiremock::matchers::header(
                "Authorization",
                "Bearer my-secret-token",
            ))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/3/", mock_server.uri());
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .bearer_token("my-secret-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Act & Assert (mock expect(1) verifies Authorization header)
        client.search_tv(&SearchParams::new("test")).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_request() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/3/", mock_server.uri());
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("your_api_key_here")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Act
        let result = client.movie_details(550).await;

        // Assert
        assert_eq!(result.unwrap_err(), TmdbError::MissingCredential);
    }

    #[tokio::test]
    async fn test_offline_makes_no_request() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/3/", mock_server.uri());
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .connectivity(Arc::new(StaticConnectivity::offline()))
            .build()
            .unwrap();

        // Act
        let result = client.tv_details(1399).await;

        // Assert
        assert_eq!(result.unwrap_err(), TmdbError::Offline);
    }

    #[tokio::test]
    async fn test_http_error_returns_status_message() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(401).set_body_string(error_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.search_movie(&SearchParams::new("test")).await;

        // Assert
        let err = result.unwrap_err();
        assert!(matches!(err, TmdbError::Http { status: 401, .. }));
        assert!(err.to_string().contains("TMDB API error"));
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_http_429_is_not_retried() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":25,"status_message":"Your request count is over the allowed limit.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(429).set_body_string(error_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.popular_movies(1).await;

        // Assert
        let err = result.unwrap_err();
        assert!(matches!(err, TmdbError::Http { status: 429, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_kept() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.person_details(500).await;

        // Assert
        assert_eq!(
            result.unwrap_err(),
            TmdbError::Http {
                status: 502,
                message: String::from("Bad Gateway"),
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_body_returns_decode_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("{\"id\":"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.movie_details(550).await;

        // Assert
        assert!(matches!(result.unwrap_err(), TmdbError::Decode(_)));
    }

    #[tokio::test]
    async fn test_discover_sends_genre_and_page() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/discover_movie_28_page_2.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/discover/movie"))
            .and(wiremock::matchers::query_param("with_genres", "28"))
            .and(wiremock::matchers::query_param("page", "2"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let page = client
            .discover_movie(&DiscoverParams::new(28).page(2))
            .await
            .unwrap();

        // Assert
        assert_eq!(page.page, 2);
        assert!(!page.results.is_empty());
    }

    #[tokio::test]
    async fn test_reviews_and_videos_paths() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let reviews = include_str!("../../../../fixtures/tmdb/movie_reviews_550.json");
        let videos = include_str!("../../../../fixtures/tmdb/movie_videos_550.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/tv/1399/reviews"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(reviews))
            .expect(1)
            .mount(&mock_server)
            .await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/550/videos"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(videos))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let review_page = client.reviews(MediaKind::Tv, 1399, 1).await.unwrap();
        let video_list = client.videos(MediaKind::Movie, 550).await.unwrap();

        // Assert
        assert!(!review_page.results.is_empty());
        assert!(video_list.results.iter().any(|v| v.video_type == "Trailer"));
    }

    #[tokio::test]
    async fn test_slow_response_times_out_on_fast_network() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_details_550.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string(json_body)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/3/", mock_server.uri());
        let policy = TimeoutPolicy {
            poor: Duration::from_millis(1500),
            medium: Duration::from_millis(1000),
            fast: Duration::from_millis(100),
        };
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .connectivity(Arc::new(StaticConnectivity::new(true, NetworkType::Wifi)))
            .timeouts(policy)
            .build()
            .unwrap();

        // Act
        let result = client.movie_details(550).await;

        // Assert
        assert_eq!(
            result.unwrap_err(),
            TmdbError::Timeout {
                timeout: Duration::from_millis(100)
            }
        );
    }
}
