use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    cached,
    db::{CacheKey, ExpiringCache},
    error::{AppError, AppResult},
    models::{
        category_name, CategoryMovies, DiscoverParams, Movie, SortBy, TmdbMovie,
        TmdbMovieDetails,
    },
    services::providers::CatalogProvider,
};

/// Genre-combination queries only surface well-established movies
pub const COMBINATION_MIN_RATING: f64 = 7.0;
pub const COMBINATION_MIN_VOTE_COUNT: u64 = 1000;

/// Movies returned per category unless the caller asks otherwise
pub const DEFAULT_LIMIT: usize = 10;

const DETAILS_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const SEARCH_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

const UNKNOWN_GENRE: &str = "Unknown";
const NO_DESCRIPTION: &str = "No description available.";
const POSTER_SIZE: &str = "w500";

/// A raw catalog record that carries genre information in some form
///
/// List endpoints only send genre ids; detail endpoints send full genre
/// objects plus extra fields. Normalization works against either.
pub trait CatalogRecord {
    fn movie(&self) -> &TmdbMovie;

    /// Display names for this record's genres, resolving ids through `directory`
    fn genre_names(&self, directory: &HashMap<u32, String>) -> Vec<String>;

    fn runtime(&self) -> Option<u32> {
        None
    }

    fn imdb_id(&self) -> Option<&str> {
        None
    }
}

impl CatalogRecord for TmdbMovie {
    fn movie(&self) -> &TmdbMovie {
        self
    }

    fn genre_names(&self, directory: &HashMap<u32, String>) -> Vec<String> {
        self.genre_ids
            .iter()
            .map(|id| {
                directory
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_GENRE.to_string())
            })
            .collect()
    }
}

impl CatalogRecord for TmdbMovieDetails {
    fn movie(&self) -> &TmdbMovie {
        &self.movie
    }

    fn genre_names(&self, directory: &HashMap<u32, String>) -> Vec<String> {
        if self.genres.is_empty() {
            return self.movie.genre_names(directory);
        }
        self.genres.iter().map(|g| g.name.clone()).collect()
    }

    fn runtime(&self) -> Option<u32> {
        self.runtime
    }

    fn imdb_id(&self) -> Option<&str> {
        self.imdb_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Talks to the movie catalog and hands back normalized `Movie` values
pub struct CatalogAdapter {
    provider: Arc<dyn CatalogProvider>,
    cache: ExpiringCache,
    image_base_url: String,
    /// Catalog genre id → name, fetched once at construction
    genre_names: HashMap<u32, String>,
}

impl CatalogAdapter {
    /// Creates an adapter and loads the catalog's genre list
    ///
    /// A failed genre load is not fatal: movies are still returned, with
    /// unresolvable genres labelled "Unknown".
    pub async fn new(
        provider: Arc<dyn CatalogProvider>,
        cache: ExpiringCache,
        image_base_url: String,
    ) -> Self {
        let genre_names = match provider.genre_list().await {
            Ok(genres) => genres.into_iter().map(|g| (g.id, g.name)).collect(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    provider = provider.name(),
                    "Failed to load catalog genres"
                );
                HashMap::new()
            }
        };

        tracing::info!(
            genres = genre_names.len(),
            provider = provider.name(),
            "Catalog adapter ready"
        );

        Self {
            provider,
            cache,
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
            genre_names,
        }
    }

    pub fn genre_name(&self, id: u32) -> Option<&str> {
        self.genre_names.get(&id).map(String::as_str)
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Converts a catalog record into the internal movie representation
    pub fn normalize<R: CatalogRecord>(&self, record: &R) -> Movie {
        let movie = record.movie();

        let year = movie
            .release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .and_then(|year| year.parse().ok())
            .unwrap_or(0);

        let description = movie
            .overview
            .as_deref()
            .filter(|overview| !overview.trim().is_empty())
            .unwrap_or(NO_DESCRIPTION)
            .to_string();

        let poster_url = movie
            .poster_path
            .as_deref()
            .map(|path| format!("{}/{}{}", self.image_base_url, POSTER_SIZE, path));

        Movie {
            title: movie.title.clone(),
            year,
            rating_value: movie.vote_average,
            description,
            poster_url,
            external_id: Some(movie.id),
            runtime_minutes: record.runtime(),
            genres: Some(record.genre_names(&self.genre_names)),
            vote_count: Some(movie.vote_count),
            popularity: Some(movie.popularity),
            imdb_id: record.imdb_id().map(str::to_string),
            metascore: None,
        }
    }

    /// Runs a discovery query, caching the normalized result
    pub async fn discover_movies(&self, params: &DiscoverParams) -> AppResult<Vec<Movie>> {
        cached!(
            self.cache,
            CacheKey::discover(params),
            self.cache.default_ttl(),
            async move {
                let records = self.provider.discover(params).await?;
                let movies: Vec<Movie> = records.iter().map(|r| self.normalize(r)).collect();
                Ok::<_, AppError>(movies)
            }
        )
    }

    pub async fn movie_details(&self, movie_id: u64) -> AppResult<Movie> {
        cached!(
            self.cache,
            CacheKey::Details(movie_id),
            DETAILS_CACHE_TTL,
            async move {
                let details = self.provider.movie_details(movie_id).await?;
                Ok::<_, AppError>(self.normalize(&details))
            }
        )
    }

    pub async fn search_movies(&self, query: &str, page: u32) -> AppResult<Vec<Movie>> {
        cached!(
            self.cache,
            CacheKey::search(query, page),
            SEARCH_CACHE_TTL,
            async move {
                let records = self.provider.search(query, page).await?;

                tracing::info!(
                    query = %query,
                    results = records.len(),
                    provider = self.provider.name(),
                    "Movie search completed"
                );

                let movies: Vec<Movie> = records.iter().map(|r| self.normalize(r)).collect();
                Ok::<_, AppError>(movies)
            }
        )
    }

    /// Highest-rated movies for a genre combination
    ///
    /// The upstream filter matches any of the ids, so when `require_all` is set
    /// for more than one id the results are narrowed here to movies carrying
    /// every id. Filtering happens before truncation to `limit`, so such queries
    /// may return fewer movies. Zero matches is a normal result.
    pub async fn movies_by_genre_combination(
        &self,
        genre_ids: &[u32],
        require_all: bool,
        limit: usize,
    ) -> AppResult<CategoryMovies> {
        let category = category_name(genre_ids);

        let mut params = DiscoverParams::for_genres(genre_ids.to_vec());
        params.min_rating = Some(COMBINATION_MIN_RATING);
        params.min_vote_count = Some(COMBINATION_MIN_VOTE_COUNT);
        params.sort_by = Some(SortBy::VoteAverageDesc);

        let records = self.provider.discover(&params).await?;
        let fetched = records.len();

        let movies: Vec<Movie> = records
            .iter()
            .filter(|record| {
                !(require_all && genre_ids.len() > 1)
                    || genre_ids.iter().all(|id| record.genre_ids.contains(id))
            })
            .take(limit)
            .map(|record| self.normalize(record))
            .collect();

        tracing::info!(
            category = %category,
            require_all,
            fetched,
            returned = movies.len(),
            provider = self.provider.name(),
            "Genre combination fetched"
        );

        Ok(CategoryMovies { category, movies })
    }
}
