//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use super::types::{
    DiscoverParams, MediaKind, SearchParams, TmdbCombinedCredits, TmdbCredits, TmdbMovieDetails,
    TmdbMovieResult, TmdbMultiResult, TmdbPage, TmdbPersonDetails, TmdbReview, TmdbTvDetails,
    TmdbTvResult, TmdbTvSeason, TmdbVideos,
};
use crate::error::Result;

/// Raw TMDB v3 endpoints.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
///
/// Every method performs exactly one upstream request; caching lives in
/// [`TmdbService`](super::service::TmdbService).
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// `search/movie`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn search_movie(&self, params: &SearchParams) -> Result<TmdbPage<TmdbMovieResult>>;

    /// `search/tv`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn search_tv(&self, params: &SearchParams) -> Result<TmdbPage<TmdbTvResult>>;

    /// `search/multi`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn search_multi(&self, params: &SearchParams) -> Result<TmdbPage<TmdbMultiResult>>;

    /// `movie/popular`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn popular_movies(&self, page: u32) -> Result<TmdbPage<TmdbMovieResult>>;

    /// `tv/popular`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn popular_tv(&self, page: u32) -> Result<TmdbPage<TmdbTvResult>>;

    /// `discover/movie` filtered by genre.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn discover_movie(&self, params: &DiscoverParams) -> Result<TmdbPage<TmdbMovieResult>>;

    /// `discover/tv` filtered by genre.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn discover_tv(&self, params: &DiscoverParams) -> Result<TmdbPage<TmdbTvResult>>;

    /// `movie/{movie_id}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn movie_details(&self, movie_id: u64) -> Result<TmdbMovieDetails>;

    /// `tv/{series_id}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn tv_details(&self, series_id: u64) -> Result<TmdbTvDetails>;

    /// `tv/{series_id}/season/{season_number}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn tv_season(&self, series_id: u64, season_number: u32) -> Result<TmdbTvSeason>;

    /// `person/{person_id}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn person_details(&self, person_id: u64) -> Result<TmdbPersonDetails>;

    /// `person/{person_id}/combined_credits`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn person_combined_credits(&self, person_id: u64) -> Result<TmdbCombinedCredits>;

    /// `movie/{id}/credits` or `tv/{id}/credits`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn credits(&self, kind: MediaKind, id: u64) -> Result<TmdbCredits>;

    /// `movie/{id}/videos` or `tv/{id}/videos`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn videos(&self, kind: MediaKind, id: u64) -> Result<TmdbVideos>;

    /// `movie/{movie_id}/similar`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn similar_movies(&self, movie_id: u64, page: u32) -> Result<TmdbPage<TmdbMovieResult>>;

    /// `movie/{id}/reviews` or `tv/{id}/reviews`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn reviews(&self, kind: MediaKind, id: u64, page: u32) -> Result<TmdbPage<TmdbReview>>;
}
