/// TMDB (The Movie Database) provider
///
/// All requests carry the API key and language as query parameters.
///
/// API Flow:
/// 1. Genres: /genre/movie/list → id/name pairs, loaded once per adapter
/// 2. Discovery: /discover/movie → movies filtered by genre, rating and votes
/// 3. Details: /movie/{id} → full record with genre objects, runtime, IMDB id
/// 4. Search: /search/movie → movies matching a title query
use crate::{
    error::{AppError, AppResult},
    models::{
        DiscoverParams, TmdbDiscoverResponse, TmdbGenre, TmdbGenresResponse, TmdbMovie,
        TmdbMovieDetails,
    },
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    region: Option<String>,
}

impl TmdbProvider {
    /// Creates a provider whose requests each give up after `timeout`
    pub fn new(
        api_key: String,
        api_url: String,
        language: String,
        region: Option<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            region,
        })
    }

    /// Issues a GET against `path` and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let mut request = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params);

        if let Some(region) = &self.region {
            request = request.query(&[("region", region.as_str())]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Catalog(format!(
                "TMDB API returned status {} for {}: {}",
                status, path, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize TMDB response"
            );
            AppError::Catalog(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn genre_list(&self) -> AppResult<Vec<TmdbGenre>> {
        let response: TmdbGenresResponse = self.get_json("/genre/movie/list", &[]).await?;
        Ok(response.genres)
    }

    async fn discover(&self, params: &DiscoverParams) -> AppResult<Vec<TmdbMovie>> {
        let response: TmdbDiscoverResponse = self
            .get_json("/discover/movie", &params.query_pairs())
            .await?;

        tracing::debug!(
            genres = ?params.genres,
            results = response.results.len(),
            total_results = response.total_results,
            provider = "tmdb",
            "Discover query completed"
        );

        Ok(response.results)
    }

    async fn movie_details(&self, movie_id: u64) -> AppResult<TmdbMovieDetails> {
        self.get_json(&format!("/movie/{}", movie_id), &[]).await
    }

    async fn search(&self, query: &str, page: u32) -> AppResult<Vec<TmdbMovie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput("Search query cannot be empty".to_string()));
        }

        let response: TmdbDiscoverResponse = self
            .get_json(
                "/search/movie",
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;

        Ok(response.results)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_provider(server: &MockServer) -> TmdbProvider {
        TmdbProvider::new(
            "test_key".to_string(),
            server.uri(),
            "en-US".to_string(),
            None,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_genre_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/genre/movie/list"))
            .and(query_param("api_key", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "genres": [{"id": 28, "name": "Action"}, {"id": 10752, "name": "War"}]
            })))
            .mount(&server)
            .await;

        let provider = create_test_provider(&server);

        let genres = provider.genre_list().await.unwrap();
        assert_eq!(genres.len(), 2);
        assert_eq!(genres[1].name, "War");
    }

    #[tokio::test]
    async fn test_discover_sends_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/discover/movie"))
            .and(query_param("with_genres", "10752,18"))
            .and(query_param("vote_average.gte", "7"))
            .and(query_param("vote_count.gte", "1000"))
            .and(query_param("sort_by", "vote_average.desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [{
                    "id": 857,
                    "title": "Saving Private Ryan",
                    "overview": "Normandy, 1944.",
                    "release_date": "1998-07-24",
                    "poster_path": null,
                    "vote_average": 8.2,
                    "vote_count": 16000,
                    "popularity": 70.1,
                    "genre_ids": [18, 36, 10752]
                }],
                "total_pages": 1,
                "total_results": 1
            })))
            .mount(&server)
            .await;

        let mut params = DiscoverParams::for_genres(vec![10752, 18]);
        params.min_vote_count = Some(1000);

        let provider = create_test_provider(&server);

        let movies = provider.discover(&params).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Saving Private Ryan");
    }

    #[tokio::test]
    async fn test_error_status_is_catalog_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/1"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let provider = create_test_provider(&server);

        let err = provider.movie_details(1).await.unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));
        assert!(err.is_catalog_failure());
    }

    #[tokio::test]
    async fn test_malformed_body_is_catalog_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/genre/movie/list"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let provider = create_test_provider(&server);

        let err = provider.genre_list().await.unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));
    }

    #[tokio::test]
    async fn test_empty_search_is_rejected() {
        let server = MockServer::start().await;
        let provider = create_test_provider(&server);
        let err = provider.search("  ", 1).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
