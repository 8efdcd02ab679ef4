//! `TmdbService` - read-through, TTL-memoized access to TMDB resources.
#![allow(clippy::future_not_send)]

use std::future::Future;
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::instrument;

use super::api::LocalTmdbApi;
use super::dto::{
    ActorCredits, ActorDetails, ActorWithCredits, CastList, MovieDetails, MovieSummary,
    MultiSearchResults, Page, Review, SeasonDetails, SeriesDetails, SeriesSummary,
};
use super::types::{DiscoverParams, MediaKind, SearchParams, TmdbVideo};
use crate::cache::{
    CacheConfig, CacheKey, CacheStats, Category, InFlight, SystemClock, TtlCache, normalize_query,
};
use crate::error::{Result, TmdbError};

/// Number of `popular` pages fetched and concatenated.
const POPULAR_PAGES: u32 = 5;

/// Highest page TMDB serves.
const MAX_PAGE: u32 = 500;

/// Conversion between a DTO and its [`Resource`] variant.
pub trait Cacheable: Sized {
    /// Wraps a value for storage.
    fn into_resource(value: Arc<Self>) -> Resource;

    /// Unwraps a stored value; `None` if the variant does not match.
    fn from_resource(resource: &Resource) -> Option<Arc<Self>>;
}

macro_rules! cacheable_resources {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// Any value the service stores in its cache.
        #[derive(Debug, Clone)]
        pub enum Resource {
            $(
                #[doc = concat!("`", stringify!($ty), "`.")]
                $variant(Arc<$ty>),
            )+
        }

        $(
            impl Cacheable for $ty {
                fn into_resource(value: Arc<Self>) -> Resource {
                    Resource::$variant(value)
                }

                fn from_resource(resource: &Resource) -> Option<Arc<Self>> {
                    match resource {
                        Resource::$variant(value) => Some(Arc::clone(value)),
                        _ => None,
                    }
                }
            }
        )+
    };
}

cacheable_resources! {
    Movie(MovieDetails),
    Series(SeriesDetails),
    Season(SeasonDetails),
    Actor(ActorDetails),
    ActorCredits(ActorCredits),
    Cast(CastList),
    MoviePage(Page<MovieSummary>),
    SeriesPage(Page<SeriesSummary>),
    ReviewPage(Page<Review>),
    MultiSearch(MultiSearchResults),
}

/// Cached TMDB access, one method per logical resource.
///
/// Cacheable calls go through the same path: validate input, build the key,
/// return a live cache entry if there is one, otherwise fetch (coalesced with
/// any identical pending call), project, store, and return.
#[derive(Debug)]
pub struct TmdbService<A> {
    api: A,
    cache: Arc<TtlCache<Resource>>,
    inflight: InFlight<Resource>,
}

impl<A> TmdbService<A> {
    /// Creates a service over an existing cache.
    #[must_use]
    pub fn new(api: A, cache: Arc<TtlCache<Resource>>) -> Self {
        Self {
            api,
            cache,
            inflight: InFlight::new(),
        }
    }

    /// Creates a service with a fresh cache on the system clock.
    #[must_use]
    pub fn with_config(api: A, config: CacheConfig) -> Self {
        Self::new(api, Arc::new(TtlCache::new(config, Arc::new(SystemClock))))
    }

    /// Underlying API.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Shared cache handle (e.g. for [`spawn_sweeper`](crate::cache::spawn_sweeper)).
    #[must_use]
    pub const fn cache(&self) -> &Arc<TtlCache<Resource>> {
        &self.cache
    }

    /// Cache diagnostics.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drops every cached entry.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl<A: LocalTmdbApi + Sync> TmdbService<A> {
    /// Movie details. Cached under `movie`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive id; otherwise any fetch error.
    #[instrument(skip_all, fields(movie_id = id))]
    pub async fn movie_details(&self, id: i64) -> Result<Arc<MovieDetails>> {
        let id = positive_id(id, "movie")?;
        let key = CacheKey::new(Category::Movie, [id]);
        self.read_through(key, || async {
            self.api.movie_details(id).await.map(MovieDetails::from)
        })
        .await
    }

    /// Series details. Cached under `series`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive id; otherwise any fetch error.
    #[instrument(skip_all, fields(series_id = id))]
    pub async fn series_details(&self, id: i64) -> Result<Arc<SeriesDetails>> {
        let id = positive_id(id, "series")?;
        let key = CacheKey::new(Category::Series, [id]);
        self.read_through(key, || async {
            self.api.tv_details(id).await.map(SeriesDetails::from)
        })
        .await
    }

    /// One season with its episodes. Cached under `season`.
    ///
    /// Season `0` holds specials and is accepted.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive series id; otherwise any fetch error.
    #[instrument(skip_all, fields(series_id = series_id, season = season_number))]
    pub async fn season_details(
        &self,
        series_id: i64,
        season_number: u32,
    ) -> Result<Arc<SeasonDetails>> {
        let series_id = positive_id(series_id, "series")?;
        let key = CacheKey::new(
            Category::Season,
            [series_id.to_string(), season_number.to_string()],
        );
        self.read_through(key, || async {
            self.api
                .tv_season(series_id, season_number)
                .await
                .map(SeasonDetails::from)
        })
        .await
    }

    /// Person details. Cached under `person`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive id; otherwise any fetch error.
    #[instrument(skip_all, fields(person_id = id))]
    pub async fn actor_details(&self, id: i64) -> Result<Arc<ActorDetails>> {
        let id = positive_id(id, "person")?;
        let key = CacheKey::new(Category::Person, [id]);
        self.read_through(key, || async {
            self.api.person_details(id).await.map(ActorDetails::from)
        })
        .await
    }

    /// Acting credits across movies and series. Cached under `credits`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive id; otherwise any fetch error.
    #[instrument(skip_all, fields(person_id = id))]
    pub async fn actor_credits(&self, id: i64) -> Result<Arc<ActorCredits>> {
        let id = positive_id(id, "person")?;
        let key = CacheKey::new(Category::Credits, ["person".to_owned(), id.to_string()]);
        self.read_through(key, || async {
            self.api
                .person_combined_credits(id)
                .await
                .map(ActorCredits::from)
        })
        .await
    }

    /// Details and credits, fetched concurrently through their own caches.
    ///
    /// # Errors
    ///
    /// The first error of either call.
    #[instrument(skip_all, fields(person_id = id))]
    pub async fn actor_with_credits(&self, id: i64) -> Result<ActorWithCredits> {
        let (details, credits) = tokio::try_join!(self.actor_details(id), self.actor_credits(id))?;
        Ok(ActorWithCredits { details, credits })
    }

    /// Cast of a movie or series. Cached under `credits`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive id; otherwise any fetch error.
    #[instrument(skip_all, fields(kind = %kind, id = id))]
    pub async fn cast(&self, kind: MediaKind, id: i64) -> Result<Arc<CastList>> {
        let id = positive_id(id, kind.as_str())?;
        let key = CacheKey::new(Category::Credits, [kind.as_str().to_owned(), id.to_string()]);
        self.read_through(key, || async {
            self.api.credits(kind, id).await.map(CastList::from)
        })
        .await
    }

    /// Cast of a movie.
    ///
    /// # Errors
    ///
    /// See [`TmdbService::cast`].
    pub async fn movie_cast(&self, id: i64) -> Result<Arc<CastList>> {
        self.cast(MediaKind::Movie, id).await
    }

    /// Cast of a series.
    ///
    /// # Errors
    ///
    /// See [`TmdbService::cast`].
    pub async fn series_cast(&self, id: i64) -> Result<Arc<CastList>> {
        self.cast(MediaKind::Tv, id).await
    }

    /// Movie search. Cached under `search` by normalized query and page.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a page outside 1-500; otherwise any fetch error.
    #[instrument(skip_all, fields(page = page))]
    pub async fn search_movies(&self, query: &str, page: u32) -> Result<Arc<Page<MovieSummary>>> {
        let page = valid_page(page)?;
        let parts = ["movie".to_owned(), normalize_query(query)];
        let key = CacheKey::paged(Category::Search, parts, page);
        let params = SearchParams::new(query.trim()).page(page);
        self.read_through(key, || async {
            self.api.search_movie(&params).await.map(Page::from)
        })
        .await
    }

    /// Series search. Cached under `search` by normalized query and page.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a page outside 1-500; otherwise any fetch error.
    #[instrument(skip_all, fields(page = page))]
    pub async fn search_series(&self, query: &str, page: u32) -> Result<Arc<Page<SeriesSummary>>> {
        let page = valid_page(page)?;
        let parts = ["tv".to_owned(), normalize_query(query)];
        let key = CacheKey::paged(Category::Search, parts, page);
        let params = SearchParams::new(query.trim()).page(page);
        self.read_through(key, || async {
            self.api.search_tv(&params).await.map(Page::from)
        })
        .await
    }

    /// Multi search, partitioned into movies, series and people.
    /// Cached under `search`.
    ///
    /// # Errors
    ///
    /// Any fetch error.
    #[instrument(skip_all)]
    pub async fn search_all(&self, query: &str) -> Result<Arc<MultiSearchResults>> {
        let parts = ["multi".to_owned(), normalize_query(query)];
        let key = CacheKey::paged(Category::Search, parts, 1);
        let params = SearchParams::new(query.trim());
        self.read_through(key, || async {
            let page = self.api.search_multi(&params).await?;
            Ok::<_, TmdbError>(page.results.into_iter().collect::<MultiSearchResults>())
        })
        .await
    }

    /// Movies in a genre. Cached under `discover` by genre and page.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for genre `0` or a page outside 1-500; otherwise any
    /// fetch error.
    #[instrument(skip_all, fields(genre_id = genre_id, page = page))]
    pub async fn discover_movies(
        &self,
        genre_id: u32,
        page: u32,
    ) -> Result<Arc<Page<MovieSummary>>> {
        let (genre_id, page) = (valid_genre(genre_id)?, valid_page(page)?);
        let parts = ["movie".to_owned(), genre_id.to_string()];
        let key = CacheKey::paged(Category::Discover, parts, page);
        let params = DiscoverParams::new(genre_id).page(page);
        self.read_through(key, || async {
            self.api.discover_movie(&params).await.map(Page::from)
        })
        .await
    }

    /// Series in a genre. Cached under `discover` by genre and page.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for genre `0` or a page outside 1-500; otherwise any
    /// fetch error.
    #[instrument(skip_all, fields(genre_id = genre_id, page = page))]
    pub async fn discover_series(
        &self,
        genre_id: u32,
        page: u32,
    ) -> Result<Arc<Page<SeriesSummary>>> {
        let (genre_id, page) = (valid_genre(genre_id)?, valid_page(page)?);
        let parts = ["tv".to_owned(), genre_id.to_string()];
        let key = CacheKey::paged(Category::Discover, parts, page);
        let params = DiscoverParams::new(genre_id).page(page);
        self.read_through(key, || async {
            self.api.discover_tv(&params).await.map(Page::from)
        })
        .await
    }

    /// User reviews. Cached under `reviews` by kind, id and page.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive id or a page outside 1-500;
    /// otherwise any fetch error.
    #[instrument(skip_all, fields(kind = %kind, id = id, page = page))]
    pub async fn reviews(&self, kind: MediaKind, id: i64, page: u32) -> Result<Arc<Page<Review>>> {
        let (id, page) = (positive_id(id, kind.as_str())?, valid_page(page)?);
        let parts = [kind.as_str().to_owned(), id.to_string()];
        let key = CacheKey::paged(Category::Reviews, parts, page);
        self.read_through(key, || async {
            self.api.reviews(kind, id, page).await.map(Page::from)
        })
        .await
    }

    /// Popular movies, pages 1-5 fetched concurrently and concatenated.
    /// Never cached.
    ///
    /// # Errors
    ///
    /// The first page error.
    #[instrument(skip_all)]
    pub async fn popular_movies(&self) -> Result<Vec<MovieSummary>> {
        let pages = try_join_all((1..=POPULAR_PAGES).map(|page| self.api.popular_movies(page)))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to fetch popular movies"))?;
        Ok(pages
            .into_iter()
            .flat_map(|page| page.results)
            .map(MovieSummary::from)
            .collect())
    }

    /// Popular series, pages 1-5 fetched concurrently and concatenated.
    /// Never cached.
    ///
    /// # Errors
    ///
    /// The first page error.
    #[instrument(skip_all)]
    pub async fn popular_series(&self) -> Result<Vec<SeriesSummary>> {
        let pages = try_join_all((1..=POPULAR_PAGES).map(|page| self.api.popular_tv(page)))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to fetch popular series"))?;
        Ok(pages
            .into_iter()
            .flat_map(|page| page.results)
            .map(SeriesSummary::from)
            .collect())
    }

    /// YouTube key of the first trailer, if any. Never fails.
    #[instrument(skip_all, fields(kind = %kind, id = id))]
    pub async fn trailer_key(&self, kind: MediaKind, id: i64) -> Option<String> {
        let result = match positive_id(id, kind.as_str()) {
            Ok(id) => self.api.videos(kind, id).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(videos) => first_trailer(videos.results),
            Err(e) => {
                tracing::warn!(error = %e, "trailer lookup failed");
                None
            }
        }
    }

    /// Movies similar to the given one (first page). Never fails.
    #[instrument(skip_all, fields(movie_id = id))]
    pub async fn similar_movies(&self, id: i64) -> Vec<MovieSummary> {
        let result = match positive_id(id, "movie") {
            Ok(id) => self.api.similar_movies(id, 1).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(page) => page.results.into_iter().map(MovieSummary::from).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "similar movies lookup failed");
                Vec::new()
            }
        }
    }

    /// Returns the cached value for `key`, or fetches, stores and returns it.
    async fn read_through<T, F, Fut>(&self, key: CacheKey, fetch: F) -> Result<Arc<T>>
    where
        T: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self
            .cache
            .get(&key)
            .and_then(|resource| T::from_resource(&resource))
        {
            return Ok(value);
        }

        let resource = self
            .inflight
            .run(&key, || async {
                let value = fetch().await.inspect_err(|e| {
                    tracing::error!(key = %key, error = %e, "TMDB request failed");
                })?;
                let resource = T::into_resource(Arc::new(value));
                self.cache.insert(key.clone(), resource.clone());
                Ok::<Resource, TmdbError>(resource)
            })
            .await?;

        T::from_resource(&resource).ok_or_else(|| {
            TmdbError::Decode(format!("cache entry {key} holds a different resource"))
        })
    }
}

/// Rejects ids below 1.
fn positive_id(id: i64, what: &str) -> Result<u64> {
    u64::try_from(id)
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            tracing::warn!(id, what, "rejected non-positive id");
            TmdbError::InvalidInput(format!("{what} id must be a positive integer, got {id}"))
        })
}

/// Rejects pages outside 1-500.
fn valid_page(page: u32) -> Result<u32> {
    if (1..=MAX_PAGE).contains(&page) {
        Ok(page)
    } else {
        Err(TmdbError::InvalidInput(format!(
            "page must be between 1 and {MAX_PAGE}, got {page}"
        )))
    }
}

/// Rejects genre `0`.
fn valid_genre(genre_id: u32) -> Result<u32> {
    if genre_id == 0 {
        Err(TmdbError::InvalidInput(String::from(
            "genre id must be a positive integer, got 0",
        )))
    } else {
        Ok(genre_id)
    }
}

/// Key of the first YouTube trailer.
fn first_trailer(videos: Vec<TmdbVideo>) -> Option<String> {
    videos
        .into_iter()
        .find(|video| video.site == "YouTube" && video.video_type == "Trailer")
        .map(|video| video.key)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use serde::de::DeserializeOwned;

    use super::*;
    use crate::cache::{Clock, ManualClock};
    use crate::tmdb::types::{
        TmdbCombinedCredits, TmdbCredits, TmdbMovieDetails, TmdbMovieResult, TmdbMultiResult,
        TmdbPage, TmdbPersonDetails, TmdbReview, TmdbTvDetails, TmdbTvResult, TmdbTvSeason,
        TmdbVideos,
    };

    fn fixture<T: DeserializeOwned>(json: &str) -> T {
        serde_json::from_str(json).unwrap()
    }

    // --- Mock API ---

    #[derive(Debug, Default)]
    struct MockTmdbApi {
        movie_calls: AtomicU32,
        tv_calls: AtomicU32,
        season_calls: AtomicU32,
        person_calls: AtomicU32,
        credits_calls: AtomicU32,
        search_calls: AtomicU32,
        discover_calls: AtomicU32,
        popular_calls: AtomicU32,
        reviews_calls: AtomicU32,
        videos_calls: AtomicU32,
        similar_calls: AtomicU32,
        delay: Duration,
        fail_with: Mutex<Option<TmdbError>>,
    }

    impl MockTmdbApi {
        fn with_delay(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::default()
            }
        }

        fn failing(error: TmdbError) -> Self {
            Self {
                fail_with: Mutex::new(Some(error)),
                ..Self::default()
            }
        }

        async fn record(&self, counter: &AtomicU32) -> Result<()> {
            counter.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.fail_with.lock().unwrap().clone().map_or(Ok(()), Err)
        }

        fn calls(counter: &AtomicU32) -> u32 {
            counter.load(Ordering::SeqCst)
        }
    }

    fn popular_page<T: DeserializeOwned>(page: u32, name_field: &str) -> TmdbPage<T> {
        fixture(&format!(
            r#"{{"page":{page},"results":[{{"id":{page},"{name_field}":"Popular {page}"}}],"total_pages":500,"total_results":10000}}"#
        ))
    }

    impl LocalTmdbApi for MockTmdbApi {
        async fn search_movie(&self, _params: &SearchParams) -> Result<TmdbPage<TmdbMovieResult>> {
            self.record(&self.search_calls).await?;
            Ok(fixture(include_str!(
                "../../../../fixtures/tmdb/search_movie_fight_club.json"
            )))
        }

        async fn search_tv(&self, _params: &SearchParams) -> Result<TmdbPage<TmdbTvResult>> {
            self.record(&self.search_calls).await?;
            Ok(fixture(include_str!(
                "../../../../fixtures/tmdb/search_empty.json"
            )))
        }

        async fn search_multi(&self, _params: &SearchParams) -> Result<TmdbPage<TmdbMultiResult>> {
            self.record(&self.search_calls).await?;
            Ok(fixture(include_str!(
                "../../../../fixtures/tmdb/search_multi_mixed.json"
            )))
        }

        async fn popular_movies(&self, page: u32) -> Result<TmdbPage<TmdbMovieResult>> {
            self.record(&self.popular_calls).await?;
            Ok(popular_page(page, "title"))
        }

        async fn popular_tv(&self, page: u32) -> Result<TmdbPage<TmdbTvResult>> {
            self.record(&self.popular_calls).await?;
            Ok(popular_page(page, "name"))
        }

        async fn discover_movie(
            &self,
            params: &DiscoverParams,
        ) -> Result<TmdbPage<TmdbMovieResult>> {
            self.record(&self.discover_calls).await?;
            Ok(match params.page {
                2 => fixture(include_str!(
                    "../../../../fixtures/tmdb/discover_movie_28_page_2.json"
                )),
                _ => fixture(include_str!(
                    "../../../../fixtures/tmdb/discover_movie_28_page_3.json"
                )),
            })
        }

        async fn discover_tv(&self, _params: &DiscoverParams) -> Result<TmdbPage<TmdbTvResult>> {
            self.record(&self.discover_calls).await?;
            Ok(fixture(include_str!(
                "../../../../fixtures/tmdb/search_empty.json"
            )))
        }

        async fn movie_details(&self, _movie_id: u64) -> Result<TmdbMovieDetails> {
            self.record(&self.movie_calls).await?;
            Ok(fixture(include_str!(
                "../../../../fixtures/tmdb/movie_details_550.json"
            )))
        }

        async fn tv_details(&self, _series_id: u64) -> Result<TmdbTvDetails> {
            self.record(&self.tv_calls).await?;
            Ok(fixture(include_str!(
                "../../../../fixtures/tmdb/tv_details_1399.json"
            )))
        }

        async fn tv_season(&self, _series_id: u64, _season_number: u32) -> Result<TmdbTvSeason> {
            self.record(&self.season_calls).await?;
            Ok(fixture(include_str!(
                "../../../../fixtures/tmdb/tv_season_1399_1.json"
            )))
        }

        async fn person_details(&self, _person_id: u64) -> Result<TmdbPersonDetails> {
            self.record(&self.person_calls).await?;
            Ok(fixture(include_str!(
                "../../../../fixtures/tmdb/person_details_500.json"
            )))
        }

        async fn person_combined_credits(&self, _person_id: u64) -> Result<TmdbCombinedCredits> {
            self.record(&self.credits_calls).await?;
            Ok(fixture(include_str!(
                "../../../../fixtures/tmdb/person_combined_credits_500.json"
            )))
        }

        async fn credits(&self, _kind: MediaKind, _id: u64) -> Result<TmdbCredits> {
            self.record(&self.credits_calls).await?;
            Ok(fixture(include_str!(
                "../../../../fixtures/tmdb/movie_credits_550.json"
            )))
        }

        async fn videos(&self, _kind: MediaKind, _id: u64) -> Result<TmdbVideos> {
            self.record(&self.videos_calls).await?;
            Ok(fixture(include_str!(
                "../../../../fixtures/tmdb/movie_videos_550.json"
            )))
        }

        async fn similar_movies(
            &self,
            _movie_id: u64,
            _page: u32,
        ) -> Result<TmdbPage<TmdbMovieResult>> {
            self.record(&self.similar_calls).await?;
            Ok(fixture(include_str!(
                "../../../../fixtures/tmdb/movie_similar_550.json"
            )))
        }

        async fn reviews(
            &self,
            _kind: MediaKind,
            _id: u64,
            _page: u32,
        ) -> Result<TmdbPage<TmdbReview>> {
            self.record(&self.reviews_calls).await?;
            Ok(fixture(include_str!(
                "../../../../fixtures/tmdb/movie_reviews_550.json"
            )))
        }
    }

    fn service_with_clock(api: MockTmdbApi) -> (TmdbService<MockTmdbApi>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let cache = Arc::new(TtlCache::new(CacheConfig::default(), dyn_clock));
        (TmdbService::new(api, cache), clock)
    }

    // --- Read-through ---

    #[tokio::test]
    async fn test_cache_hit_avoids_second_request() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::default());

        // Act
        let first = service.movie_details(550).await.unwrap();
        let second = service.movie_details(550).await.unwrap();

        // Assert
        assert_eq!(first.title, "Fight Club");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(MockTmdbApi::calls(&service.api().movie_calls), 1);
        let stats = service.cache_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.live_keys, vec![String::from("movie:550")]);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched_once() {
        // Arrange
        let (service, clock) = service_with_clock(MockTmdbApi::default());
        service.series_details(1399).await.unwrap();

        // Act
        clock.advance(Duration::from_secs(16 * 60));
        let refreshed = service.series_details(1399).await.unwrap();
        service.series_details(1399).await.unwrap();

        // Assert
        assert_eq!(refreshed.name, "Game of Thrones");
        assert_eq!(MockTmdbApi::calls(&service.api().tv_calls), 2);
    }

    #[tokio::test]
    async fn test_non_positive_ids_are_rejected_before_fetch() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::default());

        // Act
        let zero = service.movie_details(0).await;
        let negative = service.actor_details(-5).await;
        let season = service.season_details(-5, 1).await;
        let cast = service.series_cast(0).await;
        let reviews = service.reviews(MediaKind::Movie, -5, 1).await;

        // Assert
        assert!(matches!(zero.unwrap_err(), TmdbError::InvalidInput(_)));
        assert!(matches!(negative.unwrap_err(), TmdbError::InvalidInput(_)));
        assert!(matches!(season.unwrap_err(), TmdbError::InvalidInput(_)));
        assert!(matches!(cast.unwrap_err(), TmdbError::InvalidInput(_)));
        assert!(matches!(reviews.unwrap_err(), TmdbError::InvalidInput(_)));
        let api = service.api();
        assert_eq!(MockTmdbApi::calls(&api.movie_calls), 0);
        assert_eq!(MockTmdbApi::calls(&api.person_calls), 0);
        assert_eq!(MockTmdbApi::calls(&api.season_calls), 0);
        assert_eq!(MockTmdbApi::calls(&api.credits_calls), 0);
        assert_eq!(MockTmdbApi::calls(&api.reviews_calls), 0);
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_page_and_genre_are_rejected() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::default());

        // Act
        let page_zero = service.discover_movies(28, 0).await;
        let page_high = service.search_movies("fight club", 501).await;
        let genre_zero = service.discover_series(0, 1).await;

        // Assert
        assert!(matches!(page_zero.unwrap_err(), TmdbError::InvalidInput(_)));
        assert!(matches!(page_high.unwrap_err(), TmdbError::InvalidInput(_)));
        assert!(matches!(genre_zero.unwrap_err(), TmdbError::InvalidInput(_)));
        assert_eq!(MockTmdbApi::calls(&service.api().discover_calls), 0);
        assert_eq!(MockTmdbApi::calls(&service.api().search_calls), 0);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::failing(TmdbError::Offline));

        // Act
        let failed = service.movie_details(550).await;
        *service.api().fail_with.lock().unwrap() = None;
        let recovered = service.movie_details(550).await;

        // Assert
        assert_eq!(failed.unwrap_err(), TmdbError::Offline);
        assert_eq!(recovered.unwrap().id, 550);
        assert_eq!(MockTmdbApi::calls(&service.api().movie_calls), 2);
    }

    #[tokio::test]
    async fn test_discover_pages_coexist() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::default());

        // Act
        let page2 = service.discover_movies(28, 2).await.unwrap();
        let page3 = service.discover_movies(28, 3).await.unwrap();
        let page2_again = service.discover_movies(28, 2).await.unwrap();
        let page3_again = service.discover_movies(28, 3).await.unwrap();

        // Assert
        assert_eq!(page2.page, 2);
        assert_eq!(page3.page, 3);
        assert_ne!(page2.results[0].id, page3.results[0].id);
        assert!(Arc::ptr_eq(&page2, &page2_again));
        assert!(Arc::ptr_eq(&page3, &page3_again));
        assert_eq!(MockTmdbApi::calls(&service.api().discover_calls), 2);
        let stats = service.cache_stats();
        assert!(stats.live_keys.contains(&String::from("discover:movie:28:page:2")));
        assert!(stats.live_keys.contains(&String::from("discover:movie:28:page:3")));
    }

    #[tokio::test]
    async fn test_search_all_partitions_every_known_item() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::default());
        let raw: TmdbPage<TmdbMultiResult> = fixture(include_str!(
            "../../../../fixtures/tmdb/search_multi_mixed.json"
        ));
        let known = raw
            .results
            .iter()
            .filter(|item| !matches!(item, TmdbMultiResult::Unknown))
            .count();

        // Act
        let results = service.search_all("Fight Club").await.unwrap();

        // Assert
        assert_eq!(results.len(), known);
        assert_eq!(results.movies.len(), 2);
        assert_eq!(results.series.len(), 1);
        assert_eq!(results.people.len(), 1);
    }

    #[tokio::test]
    async fn test_search_key_uses_normalized_query() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::default());

        // Act
        let first = service.search_movies("Fight Club", 1).await.unwrap();
        let second = service.search_movies("  fight club ", 1).await.unwrap();

        // Assert
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(MockTmdbApi::calls(&service.api().search_calls), 1);
        assert_eq!(
            service.cache_stats().live_keys,
            vec![String::from("search:movie:fight+club:page:1")]
        );
    }

    #[tokio::test]
    async fn test_actor_500_end_to_end() {
        // Arrange
        let (service, clock) = service_with_clock(MockTmdbApi::default());

        // Act
        let first = service.actor_details(500).await.unwrap();
        clock.advance(Duration::from_secs(10 * 60));
        let second = service.actor_details(500).await.unwrap();
        clock.advance(Duration::from_secs(6 * 60));
        let third = service.actor_details(500).await.unwrap();

        // Assert
        assert_eq!(first.name, "Tom Cruise");
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&second, &third));
        assert_eq!(third.id, 500);
        assert_eq!(MockTmdbApi::calls(&service.api().person_calls), 2);
    }

    #[tokio::test]
    async fn test_credits_expire_before_details() {
        // Arrange
        let (service, clock) = service_with_clock(MockTmdbApi::default());
        service.movie_details(550).await.unwrap();
        service.movie_cast(550).await.unwrap();

        // Act
        clock.advance(Duration::from_secs(6 * 60));
        service.movie_details(550).await.unwrap();
        let cast = service.movie_cast(550).await.unwrap();

        // Assert
        assert_eq!(cast.cast[0].name, "Edward Norton");
        assert_eq!(MockTmdbApi::calls(&service.api().movie_calls), 1);
        assert_eq!(MockTmdbApi::calls(&service.api().credits_calls), 2);
    }

    #[tokio::test]
    async fn test_movie_and_series_cast_keys_differ() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::default());

        // Act
        service.movie_cast(550).await.unwrap();
        service.series_cast(550).await.unwrap();

        // Assert
        assert_eq!(MockTmdbApi::calls(&service.api().credits_calls), 2);
        assert_eq!(
            service.cache_stats().live_keys,
            vec![
                String::from("credits:movie:550"),
                String::from("credits:tv:550"),
            ]
        );
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_request() {
        // Arrange
        let (service, _clock) =
            service_with_clock(MockTmdbApi::with_delay(Duration::from_millis(20)));

        // Act
        let (a, b, c) = tokio::join!(
            service.movie_details(550),
            service.movie_details(550),
            service.movie_details(550),
        );

        // Assert
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&b, &c));
        assert_eq!(MockTmdbApi::calls(&service.api().movie_calls), 1);
    }

    #[tokio::test]
    async fn test_actor_with_credits_uses_both_caches() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::default());

        // Act
        let first = service.actor_with_credits(500).await.unwrap();
        let second = service.actor_with_credits(500).await.unwrap();

        // Assert
        assert_eq!(first.details.name, "Tom Cruise");
        assert_eq!(first.credits.person_id, 500);
        assert!(Arc::ptr_eq(&first.details, &second.details));
        assert!(Arc::ptr_eq(&first.credits, &second.credits));
        assert_eq!(MockTmdbApi::calls(&service.api().person_calls), 1);
        assert_eq!(MockTmdbApi::calls(&service.api().credits_calls), 1);
    }

    #[tokio::test]
    async fn test_season_and_reviews_are_cached() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::default());

        // Act
        let season = service.season_details(1399, 1).await.unwrap();
        service.season_details(1399, 1).await.unwrap();
        let reviews = service.reviews(MediaKind::Movie, 550, 1).await.unwrap();
        service.reviews(MediaKind::Movie, 550, 1).await.unwrap();

        // Assert
        assert_eq!(season.episodes[0].episode_number, 1);
        assert!(!reviews.results.is_empty());
        assert_eq!(MockTmdbApi::calls(&service.api().season_calls), 1);
        assert_eq!(MockTmdbApi::calls(&service.api().reviews_calls), 1);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::default());
        service.movie_details(550).await.unwrap();

        // Act
        service.clear_cache();
        service.movie_details(550).await.unwrap();

        // Assert
        assert_eq!(MockTmdbApi::calls(&service.api().movie_calls), 2);
    }

    // --- Uncached calls ---

    #[tokio::test]
    async fn test_popular_movies_concatenates_five_pages() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::default());

        // Act
        let movies = service.popular_movies().await.unwrap();
        service.popular_movies().await.unwrap();

        // Assert
        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(MockTmdbApi::calls(&service.api().popular_calls), 10);
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_popular_series_propagates_error() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::failing(TmdbError::Timeout {
            timeout: Duration::from_secs(5),
        }));

        // Act
        let result = service.popular_series().await;

        // Assert
        assert!(matches!(result.unwrap_err(), TmdbError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_trailer_key_picks_youtube_trailer() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::default());

        // Act
        let key = service.trailer_key(MediaKind::Movie, 550).await;

        // Assert
        assert_eq!(key.as_deref(), Some("qtRKdVHc-cE"));
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_best_effort_calls_swallow_errors() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::failing(TmdbError::Http {
            status: 500,
            message: String::from("boom"),
        }));

        // Act
        let trailer = service.trailer_key(MediaKind::Tv, 1399).await;
        let similar = service.similar_movies(550).await;
        let invalid = service.similar_movies(-5).await;

        // Assert
        assert!(trailer.is_none());
        assert!(similar.is_empty());
        assert!(invalid.is_empty());
        assert_eq!(MockTmdbApi::calls(&service.api().similar_calls), 1);
    }

    #[tokio::test]
    async fn test_similar_movies_returns_first_page() {
        // Arrange
        let (service, _clock) = service_with_clock(MockTmdbApi::default());

        // Act
        let similar = service.similar_movies(550).await;

        // Assert
        assert!(!similar.is_empty());
        assert!(similar.iter().all(|m| m.id != 550));
    }

    #[test]
    fn test_first_trailer_skips_teasers_and_other_sites() {
        // Arrange
        let videos: TmdbVideos = fixture(
            r#"{"id":1,"results":[
                {"key":"tease","site":"YouTube","type":"Teaser"},
                {"key":"vimeo","site":"Vimeo","type":"Trailer"},
                {"key":"yes","site":"YouTube","type":"Trailer"}
            ]}"#,
        );

        // Act & Assert
        assert_eq!(first_trailer(videos.results).as_deref(), Some("yes"));
    }

    // --- Over HTTP ---

    mod http {
        use super::*;
        use crate::tmdb::client::TmdbClient;

        fn http_service(
            mock_server: &wiremock::MockServer,
            api_key: &str,
        ) -> (TmdbService<TmdbClient>, Arc<ManualClock>) {
            let base_url = format!("{}/3/", mock_server.uri());
            let client = TmdbClient::builder()
                .base_url(base_url.parse().unwrap())
                .api_key(api_key)
                .user_agent("test/0.0.0")
                .build()
                .unwrap();
            let clock = Arc::new(ManualClock::new());
            let dyn_clock: Arc<dyn Clock> = clock.clone();
            let cache = Arc::new(TtlCache::new(CacheConfig::default(), dyn_clock));
            (TmdbService::new(client, cache), clock)
        }

        #[tokio::test]
        async fn test_actor_500_over_http() {
            // Arrange
            let mock_server = wiremock::MockServer::start().await;
            let json_body = include_str!("../../../../fixtures/tmdb/person_details_500.json");

            wiremock::Mock::given(wiremock::matchers::method("GET"))
                .and(wiremock::matchers::path("/3/person/500"))
                .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
                .expect(2)
                .mount(&mock_server)
                .await;

            let (service, clock) = http_service(&mock_server, "test-key");

            // Act
            let first = service.actor_details(500).await.unwrap();
            let second = service.actor_details(500).await.unwrap();
            clock.advance(Duration::from_secs(16 * 60));
            let third = service.actor_details(500).await.unwrap();

            // Assert (mock expect(2) verifies exactly one refetch)
            assert!(Arc::ptr_eq(&first, &second));
            assert_eq!(third.name, "Tom Cruise");
        }

        #[tokio::test]
        async fn test_missing_credential_over_http() {
            // Arrange
            let mock_server = wiremock::MockServer::start().await;

            wiremock::Mock::given(wiremock::matchers::method("GET"))
                .respond_with(wiremock::ResponseTemplate::new(200))
                .expect(0)
                .mount(&mock_server)
                .await;

            let (service, _clock) = http_service(&mock_server, "YOUR_TMDB_API_KEY");

            // Act
            let result = service.movie_details(550).await;

            // Assert
            assert_eq!(result.unwrap_err(), TmdbError::MissingCredential);
            assert!(service.cache().is_empty());
        }

        #[tokio::test]
        async fn test_http_error_propagates_and_is_not_cached() {
            // Arrange
            let mock_server = wiremock::MockServer::start().await;
            let error_body = r#"{"status_code":34,"status_message":"The resource you requested could not be found.","success":false}"#;

            wiremock::Mock::given(wiremock::matchers::method("GET"))
                .and(wiremock::matchers::path("/3/movie/999999"))
                .respond_with(wiremock::ResponseTemplate::new(404).set_body_string(error_body))
                .expect(2)
                .mount(&mock_server)
                .await;

            let (service, _clock) = http_service(&mock_server, "test-key");

            // Act
            let first = service.movie_details(999_999).await;
            let second = service.movie_details(999_999).await;

            // Assert
            for result in [first, second] {
                let err = result.unwrap_err();
                assert!(matches!(err, TmdbError::Http { status: 404, .. }));
                assert!(err.to_string().contains("could not be found"));
            }
        }
    }
}
