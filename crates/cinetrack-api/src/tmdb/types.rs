//! TMDB API response types and request parameters.
//!
//! These mirror the upstream JSON closely; the narrowed shapes handed to
//! callers live in `dto`.

use std::fmt;

use serde::Deserialize;

/// Movie or TV; selects the upstream path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// `movie/...`
    Movie,
    /// `tv/...`
    Tv,
}

impl MediaKind {
    /// Upstream path segment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Pagination ---

/// Paginated response envelope shared by search, discover, popular, similar and reviews.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    /// Current page number.
    pub page: u32,
    /// Page items.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

// --- List items ---

/// A movie entry in search, discover, popular, or similar listings.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieResult {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    pub original_language: Option<String>,
    /// Release date (YYYY-MM-DD, may be empty).
    pub release_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Popularity score.
    pub popularity: Option<f64>,
    /// Vote average.
    pub vote_average: Option<f64>,
    /// Vote count.
    pub vote_count: Option<u32>,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

/// A TV series entry in search, discover, or popular listings.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvResult {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    pub original_name: Option<String>,
    /// Original language (ISO 639-1).
    pub original_language: Option<String>,
    /// Origin countries (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Vec<String>,
    /// First air date.
    pub first_air_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Popularity score.
    pub popularity: Option<f64>,
    /// Vote average.
    pub vote_average: Option<f64>,
    /// Vote count.
    pub vote_count: Option<u32>,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

/// A person entry in `search/multi`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPersonResult {
    /// TMDB person ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Main department (e.g. "Acting").
    pub known_for_department: Option<String>,
    /// Profile image path.
    pub profile_path: Option<String>,
    /// Popularity score.
    pub popularity: Option<f64>,
}

/// A `search/multi` item, discriminated by `media_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum TmdbMultiResult {
    /// `media_type: "movie"`.
    Movie(TmdbMovieResult),
    /// `media_type: "tv"`.
    Tv(TmdbTvResult),
    /// `media_type: "person"`.
    Person(TmdbPersonResult),
    /// Any other media type.
    #[serde(other)]
    Unknown,
}

// --- Details ---

/// Genre entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Response from `movie/{movie_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    pub original_title: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Tagline.
    pub tagline: Option<String>,
    /// Release date.
    pub release_date: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Status (e.g. "Released").
    pub status: Option<String>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Vote average.
    pub vote_average: Option<f64>,
    /// Vote count.
    pub vote_count: Option<u32>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// IMDb ID.
    pub imdb_id: Option<String>,
    /// Homepage URL.
    pub homepage: Option<String>,
}

/// Response from `tv/{series_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvDetails {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    pub original_name: Option<String>,
    /// Origin countries (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Vec<String>,
    /// First air date.
    pub first_air_date: Option<String>,
    /// Last air date.
    pub last_air_date: Option<String>,
    /// Total number of episodes.
    pub number_of_episodes: Option<u32>,
    /// Total number of seasons.
    pub number_of_seasons: Option<u32>,
    /// Typical episode runtimes in minutes.
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    /// Season summaries.
    #[serde(default)]
    pub seasons: Vec<TmdbSeasonSummary>,
    /// Status (e.g. "Returning Series", "Ended").
    pub status: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Vote average.
    pub vote_average: Option<f64>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Whether the show is still in production.
    pub in_production: Option<bool>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

/// Season summary within TV details.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSeasonSummary {
    /// TMDB season ID.
    pub id: u64,
    /// Season number (0 = specials).
    pub season_number: u32,
    /// Number of episodes in this season.
    pub episode_count: Option<u32>,
    /// Air date of this season.
    pub air_date: Option<String>,
    /// Season name.
    pub name: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
}

/// Response from `tv/{series_id}/season/{season_number}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvSeason {
    /// TMDB season ID.
    pub id: u64,
    /// Season number.
    pub season_number: u32,
    /// Season name.
    pub name: Option<String>,
    /// Season overview.
    pub overview: Option<String>,
    /// Air date.
    pub air_date: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Episodes in this season.
    #[serde(default)]
    pub episodes: Vec<TmdbEpisode>,
}

/// A single episode within a season.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbEpisode {
    /// TMDB episode ID.
    pub id: u64,
    /// Episode number within the season.
    pub episode_number: u32,
    /// Season number.
    pub season_number: u32,
    /// Episode name.
    pub name: Option<String>,
    /// Episode overview.
    pub overview: Option<String>,
    /// Air date.
    pub air_date: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Vote average.
    pub vote_average: Option<f64>,
    /// Still image path.
    pub still_path: Option<String>,
}

/// Response from `person/{person_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPersonDetails {
    /// TMDB person ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Biography.
    pub biography: Option<String>,
    /// Birthday (YYYY-MM-DD).
    pub birthday: Option<String>,
    /// Day of death (YYYY-MM-DD).
    pub deathday: Option<String>,
    /// Place of birth.
    pub place_of_birth: Option<String>,
    /// Profile image path.
    pub profile_path: Option<String>,
    /// Main department.
    pub known_for_department: Option<String>,
    /// Alternative names.
    #[serde(default)]
    pub also_known_as: Vec<String>,
}

// --- Credits ---

/// Response from `movie/{id}/credits` and `tv/{id}/credits`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCredits {
    /// Movie or series ID.
    pub id: u64,
    /// Cast, in billing order.
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
}

/// A cast entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastMember {
    /// TMDB person ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Character played.
    pub character: Option<String>,
    /// Billing order.
    pub order: Option<u32>,
    /// Profile image path.
    pub profile_path: Option<String>,
}

/// Response from `person/{person_id}/combined_credits`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCombinedCredits {
    /// TMDB person ID.
    pub id: u64,
    /// Acting credits across movies and TV.
    #[serde(default)]
    pub cast: Vec<TmdbCombinedCredit>,
}

/// An acting credit from `combined_credits`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCombinedCredit {
    /// Movie or series ID.
    pub id: u64,
    /// `"movie"` or `"tv"`.
    pub media_type: String,
    /// Movie title.
    pub title: Option<String>,
    /// Series name.
    pub name: Option<String>,
    /// Character played.
    pub character: Option<String>,
    /// Movie release date.
    pub release_date: Option<String>,
    /// Series first air date.
    pub first_air_date: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Vote average.
    pub vote_average: Option<f64>,
    /// Episodes appeared in (TV only).
    pub episode_count: Option<u32>,
}

// --- Videos ---

/// Response from `movie/{id}/videos` and `tv/{id}/videos`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideos {
    /// Movie or series ID.
    pub id: u64,
    /// Videos.
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

/// A video entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    /// Site-specific key (YouTube video ID).
    pub key: String,
    /// Hosting site (e.g. "YouTube").
    pub site: String,
    /// Video type (e.g. "Trailer", "Teaser").
    #[serde(rename = "type")]
    pub video_type: String,
    /// Video name.
    pub name: Option<String>,
    /// Whether the video is official.
    pub official: Option<bool>,
}

// --- Reviews ---

/// A review entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbReview {
    /// Review ID.
    pub id: String,
    /// Author display name.
    pub author: String,
    /// Review body.
    pub content: String,
    /// Creation timestamp (RFC 3339).
    pub created_at: Option<String>,
    /// Review URL.
    pub url: Option<String>,
    /// Author details.
    pub author_details: Option<TmdbAuthorDetails>,
}

/// Author details attached to a review.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbAuthorDetails {
    /// Username.
    pub username: Option<String>,
    /// Rating given (0-10).
    pub rating: Option<f64>,
    /// Avatar image path.
    pub avatar_path: Option<String>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}

// --- Request Parameters ---

/// Parameters for `search/movie`, `search/tv`, and `search/multi`.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Search query (required).
    pub query: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            include_adult: false,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// Parameters for `discover/movie` and `discover/tv`.
#[derive(Debug, Clone)]
pub struct DiscoverParams {
    /// Genre filter (`with_genres`).
    pub genre_id: u32,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Sort order (default: "popularity.desc").
    pub sort_by: String,
}

impl DiscoverParams {
    /// Creates discover params for one genre.
    #[must_use]
    pub fn new(genre_id: u32) -> Self {
        Self {
            genre_id,
            page: 1,
            sort_by: String::from("popularity.desc"),
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}
