//! cinetrack - TMDB browsing CLI backed by a TTL read-through cache.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use cinetrack_api::cache::{CacheStats, spawn_sweeper};
use cinetrack_api::network::{
    ConnectivityProvider, DataQuality, NetworkType, StaticConnectivity,
};
use cinetrack_api::tmdb::{
    ActorCredits, ActorDetails, CastList, Credential, MediaKind, MovieDetails, MovieSummary,
    MultiSearchResults, Page, Review, SeasonDetails, SeriesDetails, SeriesSummary, TmdbClient,
    TmdbService, poster_url,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};

/// User-Agent sent to TMDB.
const USER_AGENT: &str = concat!("cinetrack/", env!("CARGO_PKG_VERSION"));

/// Longest review excerpt printed per review, in characters.
const REVIEW_EXCERPT_CHARS: usize = 200;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Treat the network as unavailable (cached data only).
    #[arg(long, global = true)]
    offline: bool,

    /// Connection class: slow-2g, 2g, 3g, 4g, wifi, ethernet.
    #[arg(long, global = true)]
    network_type: Option<String>,

    /// Print cache statistics after the command.
    #[arg(long, global = true)]
    stats: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Movie or series selector.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    /// Feature film.
    Movie,
    /// TV series.
    Series,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => Self::Movie,
            KindArg::Series => Self::Tv,
        }
    }
}

/// Search scope.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum SearchScope {
    /// Movies, series, and people in one request.
    #[default]
    All,
    /// Movies only.
    Movie,
    /// Series only.
    Series,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show movie details.
    Movie {
        /// TMDB movie ID.
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// Show series details.
    Series {
        /// TMDB series ID.
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// List the episodes of one season.
    Season {
        /// TMDB series ID.
        #[arg(allow_negative_numbers = true)]
        id: i64,
        /// Season number (0 for specials).
        season: u32,
    },
    /// Show an actor profile.
    Actor {
        /// TMDB person ID.
        #[arg(allow_negative_numbers = true)]
        id: i64,
        /// Also list the actor's movie and series credits.
        #[arg(long)]
        credits: bool,
    },
    /// List the cast of a movie or series.
    Cast {
        /// Movie or series.
        #[arg(value_enum)]
        kind: KindArg,
        /// TMDB ID.
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// Search by title or name.
    Search {
        /// Search text.
        query: String,
        /// What to search.
        #[arg(long, value_enum, default_value_t = SearchScope::All)]
        kind: SearchScope,
        /// Result page (movie and series scopes).
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Browse a genre.
    Discover {
        /// Movie or series.
        #[arg(value_enum)]
        kind: KindArg,
        /// TMDB genre ID.
        genre: u32,
        /// Result page.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List popular titles (first pages combined).
    Popular {
        /// Movie or series.
        #[arg(value_enum)]
        kind: KindArg,
    },
    /// Show user reviews.
    Reviews {
        /// Movie or series.
        #[arg(value_enum)]
        kind: KindArg,
        /// TMDB ID.
        #[arg(allow_negative_numbers = true)]
        id: i64,
        /// Result page.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Print the YouTube trailer link.
    Trailer {
        /// Movie or series.
        #[arg(value_enum)]
        kind: KindArg,
        /// TMDB ID.
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// List movies similar to one movie.
    Similar {
        /// TMDB movie ID.
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
}

/// Builds the connectivity provider from CLI flags, falling back to config.
fn resolve_connectivity(cli: &Cli, config: &AppConfig) -> StaticConnectivity {
    let online = config.network.online && !cli.offline;
    let network_type = cli
        .network_type
        .as_deref()
        .map_or_else(|| config.network.network_type(), NetworkType::from_label);
    StaticConnectivity::new(online, network_type)
}

/// Builds the TMDB client and wraps it in the caching service.
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the HTTP client fails to build.
fn build_service(
    config: &AppConfig,
    connectivity: Arc<dyn ConnectivityProvider>,
) -> Result<TmdbService<TmdbClient>> {
    let mut builder = TmdbClient::builder()
        .user_agent(USER_AGENT)
        .credential(Credential::from_env())
        .connectivity(connectivity)
        .timeouts(config.network.timeout_policy());
    if let Some(language) = config.tmdb.language.as_deref() {
        builder = builder.language(language);
    }
    if let Some(url) = config.tmdb.base_url()? {
        builder = builder.base_url(url);
    }
    let client = builder.build().context("failed to build TMDB client")?;

    Ok(TmdbService::with_config(
        client,
        config.cache.to_cache_config(),
    ))
}

/// Dispatches one subcommand.
///
/// # Errors
///
/// Returns an error if the underlying lookup fails.
async fn run(
    command: &Commands,
    service: &TmdbService<TmdbClient>,
    quality: DataQuality,
) -> Result<()> {
    match *command {
        Commands::Movie { id } => run_movie(service, id, quality).await,
        Commands::Series { id } => run_series(service, id, quality).await,
        Commands::Season { id, season } => run_season(service, id, season).await,
        Commands::Actor { id, credits } => run_actor(service, id, credits, quality).await,
        Commands::Cast { kind, id } => run_cast(service, kind.into(), id).await,
        Commands::Search {
            ref query,
            kind,
            page,
        } => run_search(service, query, kind, page).await,
        Commands::Discover { kind, genre, page } => {
            run_discover(service, kind.into(), genre, page).await
        }
        Commands::Popular { kind } => run_popular(service, kind.into()).await,
        Commands::Reviews { kind, id, page } => run_reviews(service, kind.into(), id, page).await,
        Commands::Trailer { kind, id } => {
            run_trailer(service, kind.into(), id).await;
            Ok(())
        }
        Commands::Similar { id } => {
            run_similar(service, id).await;
            Ok(())
        }
    }
}

/// Runs the `movie` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup fails.
#[instrument(skip_all)]
async fn run_movie(
    service: &TmdbService<TmdbClient>,
    id: i64,
    quality: DataQuality,
) -> Result<()> {
    let movie = service
        .movie_details(id)
        .await
        .with_context(|| format!("failed to fetch movie {id}"))?;
    print_movie(&movie, quality);
    Ok(())
}

/// Runs the `series` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup fails.
#[instrument(skip_all)]
async fn run_series(
    service: &TmdbService<TmdbClient>,
    id: i64,
    quality: DataQuality,
) -> Result<()> {
    let series = service
        .series_details(id)
        .await
        .with_context(|| format!("failed to fetch series {id}"))?;
    print_series(&series, quality);
    Ok(())
}

/// Runs the `season` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup fails.
#[instrument(skip_all)]
async fn run_season(service: &TmdbService<TmdbClient>, id: i64, season: u32) -> Result<()> {
    let details = service
        .season_details(id, season)
        .await
        .with_context(|| format!("failed to fetch season {season} of series {id}"))?;
    print_season(&details);
    Ok(())
}

/// Runs the `actor` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup fails.
#[instrument(skip_all)]
async fn run_actor(
    service: &TmdbService<TmdbClient>,
    id: i64,
    with_credits: bool,
    quality: DataQuality,
) -> Result<()> {
    if with_credits {
        let actor = service
            .actor_with_credits(id)
            .await
            .with_context(|| format!("failed to fetch actor {id} with credits"))?;
        print_actor(&actor.details, quality);
        print_actor_credits(&actor.credits);
    } else {
        let details = service
            .actor_details(id)
            .await
            .with_context(|| format!("failed to fetch actor {id}"))?;
        print_actor(&details, quality);
    }
    Ok(())
}

/// Runs the `cast` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup fails.
#[instrument(skip_all)]
async fn run_cast(service: &TmdbService<TmdbClient>, kind: MediaKind, id: i64) -> Result<()> {
    let cast = service
        .cast(kind, id)
        .await
        .with_context(|| format!("failed to fetch cast of {kind} {id}"))?;
    print_cast(&cast);
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the search fails.
#[instrument(skip_all)]
async fn run_search(
    service: &TmdbService<TmdbClient>,
    query: &str,
    scope: SearchScope,
    page: u32,
) -> Result<()> {
    match scope {
        SearchScope::All => {
            let results = service
                .search_all(query)
                .await
                .with_context(|| format!("search for {query:?} failed"))?;
            print_multi_search(&results);
        }
        SearchScope::Movie => {
            let results = service
                .search_movies(query, page)
                .await
                .with_context(|| format!("movie search for {query:?} failed"))?;
            print_movie_page(&results);
        }
        SearchScope::Series => {
            let results = service
                .search_series(query, page)
                .await
                .with_context(|| format!("series search for {query:?} failed"))?;
            print_series_page(&results);
        }
    }
    Ok(())
}

/// Runs the `discover` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup fails.
#[instrument(skip_all)]
async fn run_discover(
    service: &TmdbService<TmdbClient>,
    kind: MediaKind,
    genre: u32,
    page: u32,
) -> Result<()> {
    match kind {
        MediaKind::Movie => {
            let results = service
                .discover_movies(genre, page)
                .await
                .with_context(|| format!("failed to discover movies in genre {genre}"))?;
            print_movie_page(&results);
        }
        MediaKind::Tv => {
            let results = service
                .discover_series(genre, page)
                .await
                .with_context(|| format!("failed to discover series in genre {genre}"))?;
            print_series_page(&results);
        }
    }
    Ok(())
}

/// Runs the `popular` subcommand.
///
/// # Errors
///
/// Returns an error if any page request fails.
#[instrument(skip_all)]
async fn run_popular(service: &TmdbService<TmdbClient>, kind: MediaKind) -> Result<()> {
    match kind {
        MediaKind::Movie => {
            let movies = service
                .popular_movies()
                .await
                .context("failed to fetch popular movies")?;
            tracing::info!("Popular movies: {}", movies.len());
            movies.iter().for_each(print_movie_row);
        }
        MediaKind::Tv => {
            let series = service
                .popular_series()
                .await
                .context("failed to fetch popular series")?;
            tracing::info!("Popular series: {}", series.len());
            series.iter().for_each(print_series_row);
        }
    }
    Ok(())
}

/// Runs the `reviews` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup fails.
#[instrument(skip_all)]
async fn run_reviews(
    service: &TmdbService<TmdbClient>,
    kind: MediaKind,
    id: i64,
    page: u32,
) -> Result<()> {
    let reviews = service
        .reviews(kind, id, page)
        .await
        .with_context(|| format!("failed to fetch reviews of {kind} {id}"))?;
    print_reviews(&reviews);
    Ok(())
}

/// Runs the `trailer` subcommand. Lookup failures print "no trailer".
#[instrument(skip_all)]
async fn run_trailer(service: &TmdbService<TmdbClient>, kind: MediaKind, id: i64) {
    match service.trailer_key(kind, id).await {
        Some(key) => tracing::info!("Trailer: https://www.youtube.com/watch?v={key}"),
        None => tracing::info!("No trailer found for {kind} {id}"),
    }
}

/// Runs the `similar` subcommand. Lookup failures print an empty list.
#[instrument(skip_all)]
async fn run_similar(service: &TmdbService<TmdbClient>, id: i64) {
    let movies = service.similar_movies(id).await;
    tracing::info!("Similar movies: {}", movies.len());
    movies.iter().for_each(print_movie_row);
}

/// Formats an optional string field.
fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Formats an optional rating.
fn rating(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("-"), |v| format!("{v:.1}"))
}

/// Logs movie details.
fn print_movie(movie: &MovieDetails, quality: DataQuality) {
    tracing::info!("ID: {}", movie.id);
    tracing::info!("Title: {}", movie.title);
    tracing::info!("Original Title: {}", or_dash(movie.original_title.as_deref()));
    tracing::info!("Tagline: {}", or_dash(movie.tagline.as_deref()));
    tracing::info!("Release Date: {}", or_dash(movie.release_date.as_deref()));
    tracing::info!(
        "Runtime: {}",
        movie
            .runtime
            .map_or_else(|| String::from("-"), |m| format!("{m} min"))
    );
    tracing::info!("Status: {}", or_dash(movie.status.as_deref()));
    tracing::info!("Rating: {}", rating(movie.vote_average));
    let genres: Vec<&str> = movie.genres.iter().map(|g| g.name.as_str()).collect();
    tracing::info!("Genres: {}", genres.join(", "));
    tracing::info!("IMDb: {}", or_dash(movie.imdb_id.as_deref()));
    tracing::info!(
        "Poster: {}",
        or_dash(poster_url(movie.poster_path.as_deref(), quality).as_deref())
    );
    tracing::info!("Overview: {}", or_dash(movie.overview.as_deref()));
}

/// Logs series details with its season list.
fn print_series(series: &SeriesDetails, quality: DataQuality) {
    tracing::info!("ID: {}", series.id);
    tracing::info!("Name: {}", series.name);
    tracing::info!("Original Name: {}", or_dash(series.original_name.as_deref()));
    tracing::info!(
        "First Air Date: {}",
        or_dash(series.first_air_date.as_deref())
    );
    tracing::info!("Status: {}", or_dash(series.status.as_deref()));
    tracing::info!(
        "Seasons: {}",
        series
            .number_of_seasons
            .map_or_else(|| String::from("-"), |n| n.to_string())
    );
    tracing::info!(
        "Episodes: {}",
        series
            .number_of_episodes
            .map_or_else(|| String::from("-"), |n| n.to_string())
    );
    tracing::info!("Rating: {}", rating(series.vote_average));
    let genres: Vec<&str> = series.genres.iter().map(|g| g.name.as_str()).collect();
    tracing::info!("Genres: {}", genres.join(", "));
    tracing::info!(
        "Poster: {}",
        or_dash(poster_url(series.poster_path.as_deref(), quality).as_deref())
    );
    tracing::info!("Overview: {}", or_dash(series.overview.as_deref()));
    tracing::info!("Season\tEpisodes\tAirDate\t\tName");
    for season in &series.seasons {
        tracing::info!(
            "{}\t{}\t\t{}\t{}",
            season.season_number,
            season
                .episode_count
                .map_or_else(|| String::from("-"), |n| n.to_string()),
            or_dash(season.air_date.as_deref()),
            or_dash(season.name.as_deref()),
        );
    }
}

/// Logs the episodes of a season.
fn print_season(season: &SeasonDetails) {
    tracing::info!(
        "Season {}: {}",
        season.season_number,
        or_dash(season.name.as_deref())
    );
    tracing::info!("Air Date: {}", or_dash(season.air_date.as_deref()));
    tracing::info!("Episodes: {}", season.episodes.len());
    tracing::info!("Ep\tAirDate\t\tRuntime\tName");
    for episode in &season.episodes {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            episode.episode_number,
            or_dash(episode.air_date.as_deref()),
            episode
                .runtime
                .map_or_else(|| String::from("-"), |m| format!("{m}m")),
            or_dash(episode.name.as_deref()),
        );
    }
}

/// Logs an actor profile.
fn print_actor(actor: &ActorDetails, quality: DataQuality) {
    tracing::info!("ID: {}", actor.id);
    tracing::info!("Name: {}", actor.name);
    tracing::info!(
        "Known For: {}",
        or_dash(actor.known_for_department.as_deref())
    );
    tracing::info!("Birthday: {}", or_dash(actor.birthday.as_deref()));
    if let Some(deathday) = actor.deathday.as_deref() {
        tracing::info!("Deathday: {deathday}");
    }
    tracing::info!(
        "Place of Birth: {}",
        or_dash(actor.place_of_birth.as_deref())
    );
    tracing::info!(
        "Profile: {}",
        or_dash(poster_url(actor.profile_path.as_deref(), quality).as_deref())
    );
    tracing::info!("Biography: {}", or_dash(actor.biography.as_deref()));
}

/// Logs an actor's credits, newest first.
fn print_actor_credits(credits: &ActorCredits) {
    tracing::info!("Credits: {}", credits.cast.len());
    tracing::info!("Kind\tID\tDate\t\tTitle\t\t\tCharacter");
    for credit in &credits.cast {
        tracing::info!(
            "{}\t{}\t{}\t{}\t\t{}",
            credit.kind,
            credit.id,
            or_dash(credit.date.as_deref()),
            or_dash(credit.title.as_deref()),
            or_dash(credit.character.as_deref()),
        );
    }
}

/// Logs a cast list in billing order.
fn print_cast(cast: &CastList) {
    tracing::info!("Cast: {}", cast.cast.len());
    tracing::info!("Order\tID\tName\t\t\tCharacter");
    for member in &cast.cast {
        tracing::info!(
            "{}\t{}\t{}\t\t{}",
            member
                .order
                .map_or_else(|| String::from("-"), |o| o.to_string()),
            member.id,
            member.name,
            or_dash(member.character.as_deref()),
        );
    }
}

/// Logs one movie summary row.
fn print_movie_row(movie: &MovieSummary) {
    tracing::info!(
        "{}\t{}\t{}\t{}",
        movie.id,
        or_dash(movie.release_date.as_deref()),
        rating(movie.vote_average),
        movie.title,
    );
}

/// Logs one series summary row.
fn print_series_row(series: &SeriesSummary) {
    tracing::info!(
        "{}\t{}\t{}\t{}",
        series.id,
        or_dash(series.first_air_date.as_deref()),
        rating(series.vote_average),
        series.name,
    );
}

/// Logs a page of movies.
fn print_movie_page(page: &Page<MovieSummary>) {
    tracing::info!(
        "Page {}/{} ({} results)",
        page.page,
        page.total_pages,
        page.total_results
    );
    tracing::info!("ID\tDate\t\tRating\tTitle");
    page.results.iter().for_each(print_movie_row);
}

/// Logs a page of series.
fn print_series_page(page: &Page<SeriesSummary>) {
    tracing::info!(
        "Page {}/{} ({} results)",
        page.page,
        page.total_pages,
        page.total_results
    );
    tracing::info!("ID\tFirstAir\tRating\tName");
    page.results.iter().for_each(print_series_row);
}

/// Logs partitioned multi-search results.
fn print_multi_search(results: &MultiSearchResults) {
    tracing::info!("Total results: {}", results.len());
    tracing::info!("Movies: {}", results.movies.len());
    results.movies.iter().for_each(print_movie_row);
    tracing::info!("Series: {}", results.series.len());
    results.series.iter().for_each(print_series_row);
    tracing::info!("People: {}", results.people.len());
    for person in &results.people {
        tracing::info!(
            "{}\t{}\t{}",
            person.id,
            or_dash(person.known_for_department.as_deref()),
            person.name,
        );
    }
}

/// Logs a page of reviews with truncated bodies.
fn print_reviews(page: &Page<Review>) {
    tracing::info!(
        "Page {}/{} ({} reviews)",
        page.page,
        page.total_pages,
        page.total_results
    );
    for review in &page.results {
        let excerpt: String = review.content.chars().take(REVIEW_EXCERPT_CHARS).collect();
        tracing::info!(
            "[{}] {} ({}): {}",
            rating(review.rating),
            review.author,
            or_dash(review.created_at.as_deref()),
            excerpt,
        );
    }
}

/// Logs cache counters and live keys.
fn print_stats(stats: &CacheStats) {
    tracing::info!(
        "Cache: {} entries, {} hits, {} misses, {} evictions",
        stats.entries,
        stats.hits,
        stats.misses,
        stats.evictions
    );
    for key in &stats.live_keys {
        tracing::info!("  {key}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.dir.as_ref())?;
    let config = AppConfig::load(&config_path)?;

    let connectivity = resolve_connectivity(&cli, &config);
    let quality = connectivity.status().network_type.data_quality();
    let service = build_service(&config, Arc::new(connectivity))?;
    let sweeper = spawn_sweeper(service.cache(), config.cache.sweep_interval());

    let result = run(&cli.command, &service, quality).await;
    if cli.stats {
        print_stats(&service.cache_stats());
    }
    sweeper.abort();
    result
}
