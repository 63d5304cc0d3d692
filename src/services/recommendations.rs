use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinSet;

use crate::{
    cached,
    db::{CacheKey, ExpiringCache},
    error::{AppError, AppResult},
    models::{catalog_ids_for, CategoryMovies, GenreScores, RatingSession, RecommendationMap},
    services::{
        aggregation::aggregate,
        catalog::{CatalogAdapter, DEFAULT_LIMIT},
        fallback::fallback_recommendations,
        planner::plan,
    },
};

pub const CATALOG_UNAVAILABLE_NOTICE: &str =
    "Failed to fetch movie recommendations. Using cached/default recommendations.";
pub const CATALOG_NOT_CONFIGURED_NOTICE: &str =
    "Movie catalog is not configured. Showing curated recommendations.";
pub const NO_CATALOG_MATCHES_NOTICE: &str =
    "No catalog movies matched your top genres. Showing curated recommendations.";

/// What the group gets to look at after rating genres
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub recommendations: RecommendationMap,
    /// Set when live results could not be used and the curated table was shown
    pub notice: Option<String>,
}

impl Recommendations {
    fn fallback(scores: &GenreScores, notice: &str) -> Self {
        Self {
            recommendations: fallback_recommendations(scores),
            notice: Some(notice.to_string()),
        }
    }
}

/// Turns a rating session into movie recommendations
///
/// Flow:
/// 1. Aggregate ratings into per-genre scores
/// 2. Plan up to six genre-combination queries
/// 3. Run the queries in parallel, each read-through cached
/// 4. Merge non-empty results in plan order
///
/// If the catalog is missing or any query fails, the whole batch is dropped
/// and the curated fallback table is returned with a notice. The same table
/// stands in when the catalog answers but nothing matched. Resolving never
/// fails outright.
#[derive(Clone)]
pub struct RecommendationResolver {
    catalog: Option<Arc<CatalogAdapter>>,
    cache: ExpiringCache,
    call_timeout: Duration,
    movies_per_category: usize,
}

impl RecommendationResolver {
    pub fn new(
        catalog: Option<Arc<CatalogAdapter>>,
        cache: ExpiringCache,
        call_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            cache,
            call_timeout,
            movies_per_category: DEFAULT_LIMIT,
        }
    }

    pub fn with_movies_per_category(mut self, movies_per_category: usize) -> Self {
        self.movies_per_category = movies_per_category;
        self
    }

    pub async fn resolve(&self, session: &RatingSession) -> Recommendations {
        self.resolve_scores(&aggregate(session)).await
    }

    pub async fn resolve_scores(&self, scores: &GenreScores) -> Recommendations {
        let Some(catalog) = &self.catalog else {
            let reason = AppError::ConfigurationMissing("TMDB_API_KEY".to_string());
            tracing::warn!(error = %reason, "Using fallback recommendations");
            return Recommendations::fallback(scores, CATALOG_NOT_CONFIGURED_NOTICE);
        };

        match self.fetch_live(catalog, scores).await {
            Ok(recommendations) if recommendations.is_empty() => {
                let fallback = fallback_recommendations(scores);
                if fallback.is_empty() {
                    return Recommendations {
                        recommendations,
                        notice: None,
                    };
                }
                tracing::info!(
                    categories = fallback.len(),
                    "No live matches, using fallback recommendations"
                );
                Recommendations {
                    recommendations: fallback,
                    notice: Some(NO_CATALOG_MATCHES_NOTICE.to_string()),
                }
            }
            Ok(recommendations) => {
                tracing::info!(
                    categories = recommendations.len(),
                    provider = catalog.provider_name(),
                    "Resolved live recommendations"
                );
                Recommendations {
                    recommendations,
                    notice: None,
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    catalog_failure = e.is_catalog_failure(),
                    "Catalog batch failed, using fallback recommendations"
                );
                Recommendations::fallback(scores, CATALOG_UNAVAILABLE_NOTICE)
            }
        }
    }

    async fn fetch_live(
        &self,
        catalog: &Arc<CatalogAdapter>,
        scores: &GenreScores,
    ) -> AppResult<RecommendationMap> {
        let queries = plan(scores);
        let mut tasks = JoinSet::new();

        for (index, query) in queries.iter().enumerate() {
            let genre_ids = catalog_ids_for(&query.genres);
            if genre_ids.is_empty() {
                tracing::debug!(genres = ?query.genres, "No catalog genres for query, skipping");
                continue;
            }

            let catalog = Arc::clone(catalog);
            let cache = self.cache.clone();
            let require_all = query.require_all;
            let limit = self.movies_per_category;
            let timeout = self.call_timeout;

            tasks.spawn(async move {
                let result =
                    fetch_combination(&catalog, &cache, &genre_ids, require_all, limit, timeout)
                        .await;
                (index, result)
            });
        }

        let mut found: Vec<Option<CategoryMovies>> = vec![None; queries.len()];

        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined.map_err(|e| AppError::Internal(e.to_string()))?;
            match result {
                Ok(category) => found[index] = Some(category),
                Err(e) => {
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        Ok(found
            .into_iter()
            .flatten()
            .filter(|category| !category.movies.is_empty())
            .collect())
    }
}

/// One genre-combination lookup, served from cache when fresh
async fn fetch_combination(
    catalog: &CatalogAdapter,
    cache: &ExpiringCache,
    genre_ids: &[u32],
    require_all: bool,
    limit: usize,
    timeout: Duration,
) -> AppResult<CategoryMovies> {
    cached!(
        cache,
        CacheKey::genre_combination(genre_ids, require_all),
        cache.default_ttl(),
        async {
            let lookup = catalog.movies_by_genre_combination(genre_ids, require_all, limit);
            match tokio::time::timeout(timeout, lookup).await {
                Ok(result) => result,
                Err(_) => Err(AppError::CatalogTimeout(timeout)),
            }
        }
    )
}
