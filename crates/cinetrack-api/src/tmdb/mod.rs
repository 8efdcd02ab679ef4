//! TMDB API client module.
//!
//! The raw client issues one request per endpoint through the network-aware
//! fetcher; `TmdbService` layers the TTL cache and request coalescing on top
//! and hands out narrowed DTOs.

mod api;
mod client;
mod credential;
mod dto;
mod images;
mod service;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE, TmdbClient, TmdbClientBuilder};
pub use credential::{API_KEY_ENV, API_TOKEN_ENV, Credential, is_placeholder};
pub use dto::{
    ActorCredit, ActorCredits, ActorDetails, ActorWithCredits, CastList, CastMember, Episode,
    Genre, MovieDetails, MovieSummary, MultiSearchResults, Page, PersonSummary, Review,
    SeasonDetails, SeasonSummary, SeriesDetails, SeriesSummary,
};
pub use images::{IMAGE_BASE_URL, poster_size, poster_url};
#[allow(clippy::module_name_repetitions)]
pub use service::{Cacheable, Resource, TmdbService};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    DiscoverParams, MediaKind, SearchParams, TmdbAuthorDetails, TmdbCastMember,
    TmdbCombinedCredit, TmdbCombinedCredits, TmdbCredits, TmdbEpisode, TmdbErrorResponse,
    TmdbGenre, TmdbMovieDetails, TmdbMovieResult, TmdbMultiResult, TmdbPage, TmdbPersonDetails,
    TmdbPersonResult, TmdbReview, TmdbSeasonSummary, TmdbTvDetails, TmdbTvResult, TmdbTvSeason,
    TmdbVideo, TmdbVideos,
};
