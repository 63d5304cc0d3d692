/// Movie catalog provider abstraction
///
/// A provider speaks one upstream catalog's wire format and returns its raw
/// records. Normalization into `Movie` happens in `CatalogAdapter`, so a
/// provider can be swapped (or faked in tests) without touching that logic.
use crate::{
    error::AppResult,
    models::{DiscoverParams, TmdbGenre, TmdbMovie, TmdbMovieDetails},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// The catalog's full genre id → name list
    async fn genre_list(&self) -> AppResult<Vec<TmdbGenre>>;

    /// Discovery query filtered by genre ids ("any of" semantics upstream)
    async fn discover(&self, params: &DiscoverParams) -> AppResult<Vec<TmdbMovie>>;

    /// Full record for a single movie
    async fn movie_details(&self, movie_id: u64) -> AppResult<TmdbMovieDetails>;

    /// Free-text title search
    async fn search(&self, query: &str, page: u32) -> AppResult<Vec<TmdbMovie>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
