//! Narrowed shapes returned by [`TmdbService`](super::service::TmdbService).
//!
//! Each type is a projection of a raw upstream response. Missing optional
//! upstream fields stay `None`; nothing is invented.

use std::sync::Arc;

use super::types::{
    MediaKind, TmdbCastMember, TmdbCombinedCredit, TmdbCombinedCredits, TmdbCredits, TmdbEpisode,
    TmdbGenre, TmdbMovieDetails, TmdbMovieResult, TmdbMultiResult, TmdbPage, TmdbPersonDetails,
    TmdbPersonResult, TmdbReview, TmdbSeasonSummary, TmdbTvDetails, TmdbTvResult, TmdbTvSeason,
};

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page.
    pub results: Vec<T>,
    /// 1-based page number.
    pub page: u32,
    /// Total number of pages as reported upstream; equals `page` for an
    /// empty result set.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

impl<T> Page<T> {
    /// Returns `true` if another page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

impl<T, R> From<TmdbPage<R>> for Page<T>
where
    T: From<R>,
{
    fn from(raw: TmdbPage<R>) -> Self {
        // TMDB reports total_pages = 0 for an empty result set.
        let total_pages = if raw.total_pages == 0 && raw.results.is_empty() {
            raw.page
        } else {
            raw.total_pages
        };
        Self {
            results: raw.results.into_iter().map(T::from).collect(),
            page: raw.page,
            total_pages,
            total_results: raw.total_results,
        }
    }
}

/// Genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

impl From<TmdbGenre> for Genre {
    fn from(raw: TmdbGenre) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
        }
    }
}

/// Movie list item.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Overview text.
    pub overview: Option<String>,
    /// Release date (YYYY-MM-DD).
    pub release_date: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Vote average.
    pub vote_average: Option<f64>,
    /// Genre IDs.
    pub genre_ids: Vec<u32>,
}

impl From<TmdbMovieResult> for MovieSummary {
    fn from(raw: TmdbMovieResult) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            overview: raw.overview,
            release_date: non_empty(raw.release_date),
            poster_path: raw.poster_path,
            backdrop_path: raw.backdrop_path,
            vote_average: raw.vote_average,
            genre_ids: raw.genre_ids,
        }
    }
}

/// Series list item.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    /// TMDB series ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Overview text.
    pub overview: Option<String>,
    /// First air date.
    pub first_air_date: Option<String>,
    /// Origin countries.
    pub origin_country: Vec<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Vote average.
    pub vote_average: Option<f64>,
    /// Genre IDs.
    pub genre_ids: Vec<u32>,
}

impl From<TmdbTvResult> for SeriesSummary {
    fn from(raw: TmdbTvResult) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            overview: raw.overview,
            first_air_date: non_empty(raw.first_air_date),
            origin_country: raw.origin_country,
            poster_path: raw.poster_path,
            backdrop_path: raw.backdrop_path,
            vote_average: raw.vote_average,
            genre_ids: raw.genre_ids,
        }
    }
}

/// Person list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonSummary {
    /// TMDB person ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Main department.
    pub known_for_department: Option<String>,
    /// Profile image path.
    pub profile_path: Option<String>,
}

impl From<TmdbPersonResult> for PersonSummary {
    fn from(raw: TmdbPersonResult) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            known_for_department: raw.known_for_department,
            profile_path: raw.profile_path,
        }
    }
}

/// `search/multi` results split by media type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiSearchResults {
    /// Movie hits.
    pub movies: Vec<MovieSummary>,
    /// Series hits.
    pub series: Vec<SeriesSummary>,
    /// Person hits.
    pub people: Vec<PersonSummary>,
}

impl MultiSearchResults {
    /// Total number of partitioned hits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.movies
            .len()
            .saturating_add(self.series.len())
            .saturating_add(self.people.len())
    }

    /// Returns `true` if nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<TmdbMultiResult> for MultiSearchResults {
    fn from_iter<I: IntoIterator<Item = TmdbMultiResult>>(iter: I) -> Self {
        let mut partitioned = Self::default();
        for item in iter {
            match item {
                TmdbMultiResult::Movie(movie) => partitioned.movies.push(movie.into()),
                TmdbMultiResult::Tv(tv) => partitioned.series.push(tv.into()),
                TmdbMultiResult::Person(person) => partitioned.people.push(person.into()),
                TmdbMultiResult::Unknown => {
                    tracing::debug!("skipping search/multi item with unknown media_type");
                }
            }
        }
        partitioned
    }
}

/// Movie details.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Original title.
    pub original_title: Option<String>,
    /// Tagline.
    pub tagline: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Release date.
    pub release_date: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Release status.
    pub status: Option<String>,
    /// Genres.
    pub genres: Vec<Genre>,
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

impl From<TmdbMovieDetails> for MovieDetails {
    fn from(raw: TmdbMovieDetails) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            original_title: raw.original_title,
            tagline: non_empty(raw.tagline),
            overview: raw.overview,
            release_date: non_empty(raw.release_date),
            runtime: raw.runtime,
            status: raw.status,
            genres: raw.genres.into_iter().map(Genre::from).collect(),
            vote_average: raw.vote_average,
            vote_count: raw.vote_count,
            poster_path: raw.poster_path,
            backdrop_path: raw.backdrop_path,
            imdb_id: raw.imdb_id,
            homepage: non_empty(raw.homepage),
        }
    }
}

/// Season entry inside [`SeriesDetails`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonSummary {
    /// Season number (0 = specials).
    pub season_number: u32,
    /// Season name.
    pub name: Option<String>,
    /// Episode count.
    pub episode_count: Option<u32>,
    /// Air date.
    pub air_date: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
}

impl From<TmdbSeasonSummary> for SeasonSummary {
    fn from(raw: TmdbSeasonSummary) -> Self {
        Self {
            season_number: raw.season_number,
            name: raw.name,
            episode_count: raw.episode_count,
            air_date: raw.air_date,
            poster_path: raw.poster_path,
        }
    }
}

/// Series details.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDetails {
    /// TMDB series ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Original name.
    pub original_name: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// First air date.
    pub first_air_date: Option<String>,
    /// Last air date.
    pub last_air_date: Option<String>,
    /// Status (e.g. "Ended").
    pub status: Option<String>,
    /// Still in production.
    pub in_production: Option<bool>,
    /// Number of seasons.
    pub number_of_seasons: Option<u32>,
    /// Number of episodes.
    pub number_of_episodes: Option<u32>,
    /// Typical episode runtimes in minutes.
    pub episode_run_time: Vec<u32>,
    /// Genres.
    pub genres: Vec<Genre>,
    /// Seasons.
    pub seasons: Vec<SeasonSummary>,
    /// Vote average.
    pub vote_average: Option<f64>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

impl From<TmdbTvDetails> for SeriesDetails {
    fn from(raw: TmdbTvDetails) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            original_name: raw.original_name,
            overview: raw.overview,
            first_air_date: non_empty(raw.first_air_date),
            last_air_date: non_empty(raw.last_air_date),
            status: raw.status,
            in_production: raw.in_production,
            number_of_seasons: raw.number_of_seasons,
            number_of_episodes: raw.number_of_episodes,
            episode_run_time: raw.episode_run_time,
            genres: raw.genres.into_iter().map(Genre::from).collect(),
            seasons: raw.seasons.into_iter().map(SeasonSummary::from).collect(),
            vote_average: raw.vote_average,
            poster_path: raw.poster_path,
            backdrop_path: raw.backdrop_path,
        }
    }
}

/// Episode.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    /// TMDB episode ID.
    pub id: u64,
    /// Season number.
    pub season_number: u32,
    /// Episode number within the season.
    pub episode_number: u32,
    /// Episode name.
    pub name: Option<String>,
    /// Overview text.
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

impl From<TmdbEpisode> for Episode {
    fn from(raw: TmdbEpisode) -> Self {
        Self {
            id: raw.id,
            season_number: raw.season_number,
            episode_number: raw.episode_number,
            name: raw.name,
            overview: raw.overview,
            air_date: raw.air_date,
            runtime: raw.runtime,
            vote_average: raw.vote_average,
            still_path: raw.still_path,
        }
    }
}

/// Season details with episodes.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonDetails {
    /// TMDB season ID.
    pub id: u64,
    /// Season number.
    pub season_number: u32,
    /// Season name.
    pub name: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Air date.
    pub air_date: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Episodes in airing order.
    pub episodes: Vec<Episode>,
}

impl From<TmdbTvSeason> for SeasonDetails {
    fn from(raw: TmdbTvSeason) -> Self {
        Self {
            id: raw.id,
            season_number: raw.season_number,
            name: raw.name,
            overview: raw.overview,
            air_date: raw.air_date,
            poster_path: raw.poster_path,
            episodes: raw.episodes.into_iter().map(Episode::from).collect(),
        }
    }
}

/// Person details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorDetails {
    /// TMDB person ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Biography.
    pub biography: Option<String>,
    /// Birthday.
    pub birthday: Option<String>,
    /// Day of death.
    pub deathday: Option<String>,
    /// Place of birth.
    pub place_of_birth: Option<String>,
    /// Main department.
    pub known_for_department: Option<String>,
    /// Profile image path.
    pub profile_path: Option<String>,
    /// Alternative names.
    pub also_known_as: Vec<String>,
}

impl From<TmdbPersonDetails> for ActorDetails {
    fn from(raw: TmdbPersonDetails) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            biography: non_empty(raw.biography),
            birthday: raw.birthday,
            deathday: raw.deathday,
            place_of_birth: raw.place_of_birth,
            known_for_department: raw.known_for_department,
            profile_path: raw.profile_path,
            also_known_as: raw.also_known_as,
        }
    }
}

/// One acting credit of a person.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorCredit {
    /// Movie or series ID.
    pub id: u64,
    /// Movie or series.
    pub kind: MediaKind,
    /// Movie title or series name.
    pub title: Option<String>,
    /// Character played.
    pub character: Option<String>,
    /// Release date or first air date.
    pub date: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Vote average.
    pub vote_average: Option<f64>,
    /// Episodes appeared in (series only).
    pub episode_count: Option<u32>,
}

impl ActorCredit {
    /// Projects one `combined_credits` entry; `None` for unknown media types.
    fn from_raw(raw: TmdbCombinedCredit) -> Option<Self> {
        let (kind, title, date) = match raw.media_type.as_str() {
            "movie" => (MediaKind::Movie, raw.title, raw.release_date),
            "tv" => (MediaKind::Tv, raw.name, raw.first_air_date),
            other => {
                tracing::debug!(media_type = other, id = raw.id, "skipping credit");
                return None;
            }
        };
        Some(Self {
            id: raw.id,
            kind,
            title: non_empty(title),
            character: non_empty(raw.character),
            date: non_empty(date),
            poster_path: raw.poster_path,
            vote_average: raw.vote_average,
            episode_count: raw.episode_count,
        })
    }
}

/// A person's acting credits across movies and series.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorCredits {
    /// TMDB person ID.
    pub person_id: u64,
    /// Credits, most recent first; undated credits last.
    pub cast: Vec<ActorCredit>,
}

impl From<TmdbCombinedCredits> for ActorCredits {
    fn from(raw: TmdbCombinedCredits) -> Self {
        let mut cast: Vec<ActorCredit> = raw
            .cast
            .into_iter()
            .filter_map(ActorCredit::from_raw)
            .collect();
        // ISO dates compare correctly as strings; None sorts first, so reverse puts it last.
        cast.sort_by(|a, b| b.date.cmp(&a.date));
        Self {
            person_id: raw.id,
            cast,
        }
    }
}

/// Person details together with their credits.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorWithCredits {
    /// Details.
    pub details: Arc<ActorDetails>,
    /// Credits.
    pub credits: Arc<ActorCredits>,
}

/// Cast entry of a movie or series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastMember {
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

impl From<TmdbCastMember> for CastMember {
    fn from(raw: TmdbCastMember) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            character: non_empty(raw.character),
            order: raw.order,
            profile_path: raw.profile_path,
        }
    }
}

/// Cast of a movie or series, in billing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastList {
    /// Movie or series ID.
    pub id: u64,
    /// Cast members.
    pub cast: Vec<CastMember>,
}

impl From<TmdbCredits> for CastList {
    fn from(raw: TmdbCredits) -> Self {
        let mut cast: Vec<CastMember> = raw.cast.into_iter().map(CastMember::from).collect();
        cast.sort_by_key(|member| member.order.unwrap_or(u32::MAX));
        Self { id: raw.id, cast }
    }
}

/// User review.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    /// Review ID.
    pub id: String,
    /// Author display name.
    pub author: String,
    /// Review body.
    pub content: String,
    /// Rating given (0-10).
    pub rating: Option<f64>,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Review URL.
    pub url: Option<String>,
}

impl From<TmdbReview> for Review {
    fn from(raw: TmdbReview) -> Self {
        Self {
            id: raw.id,
            author: raw.author,
            content: raw.content,
            rating: raw.author_details.and_then(|details| details.rating),
            created_at: raw.created_at,
            url: raw.url,
        }
    }
}

/// Maps `Some("")` to `None`.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
