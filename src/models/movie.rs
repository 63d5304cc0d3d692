use serde::{Deserialize, Serialize};

/// A movie as presented to voters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub title: String,
    /// Release year, 0 when the catalog does not know it
    pub year: i32,
    /// Catalog's average user rating, 0-10
    pub rating_value: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    /// Only known for hand-curated fallback entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metascore: Option<u8>,
}

/// Movies found for one genre combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMovies {
    pub category: String,
    pub movies: Vec<Movie>,
}

/// Category label → movies, kept in insertion order
///
/// Serializes as a JSON object whose keys appear in that order. Inserting an
/// existing label replaces its movies without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationMap {
    entries: Vec<CategoryMovies>,
}

impl RecommendationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: String, movies: Vec<Movie>) {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.category == category)
        {
            Some(entry) => entry.movies = movies,
            None => self.entries.push(CategoryMovies { category, movies }),
        }
    }

    pub fn get(&self, category: &str) -> Option<&[Movie]> {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.movies.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.category.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryMovies> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CategoryMovies> for RecommendationMap {
    fn from_iter<I: IntoIterator<Item = CategoryMovies>>(iter: I) -> Self {
        let mut map = Self::new();
        for entry in iter {
            map.insert(entry.category, entry.movies);
        }
        map
    }
}

impl Serialize for RecommendationMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.category, &entry.movies)?;
        }
        map.end()
    }
}

/// A movie a group put aside under the category it was recommended in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub category: String,
}

impl SavedMovie {
    /// Identity used for de-duplication
    ///
    /// Two different movies sharing a title inside one category collide.
    pub fn key(&self) -> String {
        saved_movie_key(&self.category, &self.movie.title)
    }
}

pub fn saved_movie_key(category: &str, title: &str) -> String {
    format!("{}-{}", category, title)
}

// ============================================================================
// TMDB API Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmdbGenre {
    pub id: u32,
    pub name: String,
}

/// Response from `/genre/movie/list`
#[derive(Debug, Deserialize)]
pub struct TmdbGenresResponse {
    pub genres: Vec<TmdbGenre>,
}

/// Movie record as returned by discover and search endpoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

/// Movie record as returned by `/movie/{id}`, with full genre objects
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(flatten)]
    pub movie: TmdbMovie,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub imdb_id: Option<String>,
}

/// Response from `/discover/movie` and `/search/movie`
#[derive(Debug, Deserialize)]
pub struct TmdbDiscoverResponse {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<TmdbMovie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortBy {
    #[serde(rename = "popularity.desc")]
    PopularityDesc,
    #[serde(rename = "vote_average.desc")]
    VoteAverageDesc,
    #[serde(rename = "release_date.desc")]
    ReleaseDateDesc,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::PopularityDesc => "popularity.desc",
            SortBy::VoteAverageDesc => "vote_average.desc",
            SortBy::ReleaseDateDesc => "release_date.desc",
        }
    }
}

/// Filters for a discover query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoverParams {
    pub genres: Vec<u32>,
    pub min_rating: Option<f64>,
    pub min_vote_count: Option<u64>,
    pub release_year_from: Option<i32>,
    pub release_year_to: Option<i32>,
    pub sort_by: Option<SortBy>,
    pub page: Option<u32>,
}

impl DiscoverParams {
    pub const DEFAULT_MIN_RATING: f64 = 7.0;
    pub const DEFAULT_MIN_VOTE_COUNT: u64 = 500;

    pub fn for_genres(genres: Vec<u32>) -> Self {
        Self {
            genres,
            min_rating: None,
            min_vote_count: None,
            release_year_from: None,
            release_year_to: None,
            sort_by: None,
            page: None,
        }
    }

    /// Query string pairs, with defaults applied and unset filters dropped
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let with_genres = self
            .genres
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let mut pairs = vec![
            ("with_genres", with_genres),
            (
                "vote_average.gte",
                self.min_rating
                    .unwrap_or(Self::DEFAULT_MIN_RATING)
                    .to_string(),
            ),
            (
                "vote_count.gte",
                self.min_vote_count
                    .unwrap_or(Self::DEFAULT_MIN_VOTE_COUNT)
                    .to_string(),
            ),
            (
                "sort_by",
                self.sort_by
                    .unwrap_or(SortBy::VoteAverageDesc)
                    .as_str()
                    .to_string(),
            ),
            ("page", self.page.unwrap_or(1).to_string()),
        ];

        if let Some(from) = self.release_year_from {
            pairs.push(("primary_release_date.gte", format!("{}-01-01", from)));
        }
        if let Some(to) = self.release_year_to {
            pairs.push(("primary_release_date.lte", format!("{}-12-31", to)));
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmdb_movie_deserialization() {
        let json = r#"{
            "id": 857,
            "title": "Saving Private Ryan",
            "original_title": "Saving Private Ryan",
            "overview": "As U.S. troops storm the beaches of Normandy...",
            "release_date": "1998-07-24",
            "poster_path": "/uqx37cS8cpHg8U35f9U5IBlrCV3.jpg",
            "vote_average": 8.2,
            "vote_count": 16000,
            "popularity": 74.5,
            "genre_ids": [18, 36, 10752],
            "adult": false
        }"#;

        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 857);
        assert_eq!(movie.genre_ids, vec![18, 36, 10752]);
        assert_eq!(movie.release_date.as_deref(), Some("1998-07-24"));
    }

    #[test]
    fn test_tmdb_details_deserialization() {
        let json = r#"{
            "id": 424,
            "title": "Schindler's List",
            "overview": null,
            "release_date": "1993-12-15",
            "poster_path": null,
            "vote_average": 8.6,
            "vote_count": 15000,
            "popularity": 60.0,
            "genres": [{"id": 18, "name": "Drama"}, {"id": 36, "name": "History"}],
            "runtime": 195,
            "imdb_id": "tt0108052"
        }"#;

        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.movie.id, 424);
        assert!(details.movie.genre_ids.is_empty());
        assert_eq!(details.genres.len(), 2);
        assert_eq!(details.runtime, Some(195));
        assert_eq!(details.imdb_id.as_deref(), Some("tt0108052"));
    }

    #[test]
    fn test_discover_query_pairs_apply_defaults() {
        let params = DiscoverParams::for_genres(vec![10752, 18]);
        let pairs = params.query_pairs();

        assert!(pairs.contains(&("with_genres", "10752,18".to_string())));
        assert!(pairs.contains(&("vote_average.gte", "7".to_string())));
        assert!(pairs.contains(&("vote_count.gte", "500".to_string())));
        assert!(pairs.contains(&("sort_by", "vote_average.desc".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k.starts_with("primary_")));
    }

    #[test]
    fn test_discover_query_pairs_year_window() {
        let mut params = DiscoverParams::for_genres(vec![28]);
        params.release_year_from = Some(1990);
        params.release_year_to = Some(1999);

        let pairs = params.query_pairs();
        assert!(pairs.contains(&("primary_release_date.gte", "1990-01-01".to_string())));
        assert!(pairs.contains(&("primary_release_date.lte", "1999-12-31".to_string())));
    }

    fn movie(title: &str) -> Movie {
        Movie {
            title: title.to_string(),
            year: 2017,
            rating_value: 7.8,
            description: String::new(),
            poster_url: None,
            external_id: None,
            runtime_minutes: None,
            genres: None,
            vote_count: None,
            popularity: None,
            imdb_id: None,
            metascore: None,
        }
    }

    #[test]
    fn test_saved_movie_key() {
        let saved = SavedMovie {
            movie: movie("Dunkirk"),
            category: "War/Drama".to_string(),
        };
        assert_eq!(saved.key(), "War/Drama-Dunkirk");
    }

    #[test]
    fn test_recommendation_map_replaces_in_place() {
        let mut map = RecommendationMap::new();
        map.insert("War/Drama".to_string(), vec![movie("1917")]);
        map.insert("Comedy".to_string(), vec![movie("Groundhog Day")]);
        map.insert("War/Drama".to_string(), vec![movie("Dunkirk")]);

        assert_eq!(map.len(), 2);
        assert_eq!(
            map.categories().collect::<Vec<_>>(),
            vec!["War/Drama", "Comedy"]
        );
        assert_eq!(map.get("War/Drama").unwrap()[0].title, "Dunkirk");
        assert!(map.get("Horror").is_none());
    }

    #[test]
    fn test_recommendation_map_serializes_in_order() {
        let map: RecommendationMap = vec![
            CategoryMovies {
                category: "Western".to_string(),
                movies: vec![movie("Unforgiven")],
            },
            CategoryMovies {
                category: "Action".to_string(),
                movies: vec![],
            },
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&map).unwrap();
        assert!(json.starts_with("{\"Western\":[{\"title\":\"Unforgiven\""));
        assert!(json.ends_with("\"Action\":[]}"));
    }
}
