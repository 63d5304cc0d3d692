use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use genre_ranker::{
    config::Config,
    db::{open_store, open_store_or_memory, ExpiringCache},
    error::AppError,
    models::{Genre, RatingSession},
    services::{
        aggregation::{aggregate, top_genres},
        providers::TmdbProvider,
        CatalogAdapter, RecommendationResolver, SavedMovies,
    },
};

/// Genre Ranker - group genre ratings in, movie recommendations out
#[derive(Parser)]
#[command(name = "genre-ranker")]
#[command(
    about = "Aggregates a group's genre ratings and recommends movies",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies for a ballot of genre ratings
    Recommend {
        /// JSON ballot: {"scale": 5, "voters": [{"id": "...", "ratings": {"War": 5}}]}
        #[arg(long)]
        ballot: PathBuf,
    },

    /// Rank a saved-for-later list by how well it matches a ballot
    Select {
        #[arg(long)]
        ballot: PathBuf,

        /// JSON array of saved movies, each with its category
        #[arg(long)]
        saved: PathBuf,
    },

    /// Search the movie catalog by title
    Search {
        query: String,

        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Show catalog details for one movie
    Details { id: u64 },

    /// List the genres voters can rate
    Genres,

    /// Inspect or clear the recommendation cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Entry count, size and oldest entry
    Stats,

    /// Remove cached entries
    Clear {
        /// Only remove entries past their TTL
        #[arg(long)]
        expired_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries command output only
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("genre_ranker=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Recommend { ballot } => handle_recommend(&config, &ballot).await?,
        Commands::Select { ballot, saved } => handle_select(&ballot, &saved).await?,
        Commands::Search { query, page } => handle_search(&config, &query, page).await?,
        Commands::Details { id } => handle_details(&config, id).await?,
        Commands::Genres => handle_genres()?,
        Commands::Cache { command } => handle_cache(&config, command).await?,
    }

    Ok(())
}

async fn handle_recommend(config: &Config, ballot: &Path) -> Result<()> {
    let session = read_ballot(ballot).await?;
    let cache = ExpiringCache::new(open_store_or_memory(config).await);
    let catalog = build_catalog(config, &cache).await?;

    let scores = aggregate(&session);
    let top: Vec<&str> = top_genres(&scores, session.scale)
        .iter()
        .map(|(genre, _)| genre.name())
        .collect();
    tracing::info!(voters = session.voter_count(), top_genres = ?top, "Ballot aggregated");

    let resolver = RecommendationResolver::new(catalog, cache, config.catalog_timeout());
    print_json(&resolver.resolve_scores(&scores).await)
}

async fn handle_select(ballot: &Path, saved: &Path) -> Result<()> {
    let session = read_ballot(ballot).await?;
    let saved: SavedMovies = read_json(saved).await?;

    let ranked = saved.ranked_selection(&aggregate(&session), session.scale);
    print_json(&ranked)
}

async fn handle_search(config: &Config, query: &str, page: u32) -> Result<()> {
    let cache = build_cache(config).await?;
    let catalog = require_catalog(build_catalog(config, &cache).await?)?;

    print_json(&catalog.search_movies(query, page).await?)
}

async fn handle_details(config: &Config, id: u64) -> Result<()> {
    let cache = build_cache(config).await?;
    let catalog = require_catalog(build_catalog(config, &cache).await?)?;

    print_json(&catalog.movie_details(id).await?)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenreListing {
    name: &'static str,
    description: &'static str,
    catalog_ids: &'static [u32],
}

fn handle_genres() -> Result<()> {
    let listing: Vec<GenreListing> = Genre::ALL
        .iter()
        .map(|genre| GenreListing {
            name: genre.name(),
            description: genre.description(),
            catalog_ids: genre.catalog_ids(),
        })
        .collect();

    print_json(&listing)
}

async fn handle_cache(config: &Config, command: CacheCommand) -> Result<()> {
    let cache = build_cache(config).await?;

    match command {
        CacheCommand::Stats => print_json(&cache.stats().await?),
        CacheCommand::Clear { expired_only } => {
            let removed = if expired_only {
                cache.clear_expired().await?
            } else {
                cache.clear_all().await?
            };
            tracing::info!(removed, expired_only, "Cache cleared");
            print_json(&serde_json::json!({ "removed": removed }))
        }
    }
}

async fn build_cache(config: &Config) -> Result<ExpiringCache> {
    Ok(ExpiringCache::new(open_store(config).await?))
}

/// The catalog adapter, or `None` when no API key is configured
async fn build_catalog(
    config: &Config,
    cache: &ExpiringCache,
) -> Result<Option<Arc<CatalogAdapter>>> {
    let Some(api_key) = config.api_key() else {
        tracing::warn!("TMDB API key not configured, catalog disabled");
        return Ok(None);
    };

    let provider = TmdbProvider::new(
        api_key.to_string(),
        config.tmdb_api_url.clone(),
        config.tmdb_language.clone(),
        config.tmdb_region.clone(),
        config.catalog_timeout(),
    )?;

    let adapter = CatalogAdapter::new(
        Arc::new(provider),
        cache.clone(),
        config.tmdb_image_url.clone(),
    )
    .await;

    Ok(Some(Arc::new(adapter)))
}

fn require_catalog(catalog: Option<Arc<CatalogAdapter>>) -> Result<Arc<CatalogAdapter>> {
    catalog.ok_or_else(|| {
        AppError::ConfigurationMissing("TMDB_API_KEY is not set".to_string()).into()
    })
}

async fn read_ballot(path: &Path) -> Result<RatingSession> {
    let session: RatingSession = read_json(path).await?;
    tracing::debug!(
        path = %path.display(),
        voters = session.voter_count(),
        scale = session.scale.max(),
        "Loaded ballot"
    );
    Ok(session)
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
