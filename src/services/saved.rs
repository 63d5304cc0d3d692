/// The group's "save for later" list and the final ranked selection
use serde::{Deserialize, Serialize};

use crate::models::{saved_movie_key, Genre, GenreScores, Movie, RatingScale, SavedMovie};

/// A saved movie with how well its category matches the group's tastes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedMovie {
    #[serde(flatten)]
    pub saved: SavedMovie,
    /// 0-10, where 10 means every genre in the category got a perfect average
    pub match_score: f64,
}

/// Saved movies in the order they were saved, unique by `SavedMovie::key`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedMovies {
    movies: Vec<SavedMovie>,
}

impl SavedMovies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves the movie, or unsaves it if it is already saved
    ///
    /// Returns whether the movie is saved afterwards.
    pub fn toggle(&mut self, category: &str, movie: Movie) -> bool {
        let key = saved_movie_key(category, &movie.title);

        if let Some(index) = self.movies.iter().position(|saved| saved.key() == key) {
            self.movies.remove(index);
            false
        } else {
            self.movies.push(SavedMovie {
                movie,
                category: category.to_string(),
            });
            true
        }
    }

    pub fn is_saved(&self, category: &str, title: &str) -> bool {
        let key = saved_movie_key(category, title);
        self.movies.iter().any(|saved| saved.key() == key)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SavedMovie> {
        self.movies.iter()
    }

    pub fn clear(&mut self) {
        self.movies.clear();
    }

    /// Saved movies ordered by match score, best first
    ///
    /// Equal scores keep the order the movies were saved in.
    pub fn ranked_selection(&self, scores: &GenreScores, scale: RatingScale) -> Vec<RankedMovie> {
        let mut ranked: Vec<RankedMovie> = self
            .movies
            .iter()
            .map(|saved| RankedMovie {
                match_score: category_match_score(&saved.category, scores, scale),
                saved: saved.clone(),
            })
            .collect();

        ranked.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        ranked
    }
}

/// Mean average of the genres named in `category`, rescaled to 0-10
///
/// Names are split on `/` and `,`. Names that are not genres (such as
/// "Historical War") count as 0.
pub fn category_match_score(category: &str, scores: &GenreScores, scale: RatingScale) -> f64 {
    let averages: Vec<f64> = category
        .split(['/', ','])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| Genre::from_name(name).map_or(0.0, |genre| scores.average(genre)))
        .collect();

    if averages.is_empty() {
        return 0.0;
    }

    let mean = averages.iter().sum::<f64>() / averages.len() as f64;
    mean / f64::from(scale.max()) * 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RatingSession;
    use crate::services::aggregation::aggregate;

    fn movie(title: &str) -> Movie {
        Movie {
            title: title.to_string(),
            year: 2000,
            rating_value: 8.0,
            description: "A movie.".to_string(),
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

    fn scores() -> GenreScores {
        let mut session = RatingSession::new(RatingScale::Five);
        session.add_voter("alex");
        session.rate("alex", Genre::War, 5).unwrap();
        session.rate("alex", Genre::Drama, 3).unwrap();
        session.rate("alex", Genre::Comedy, 4).unwrap();
        aggregate(&session)
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut saved = SavedMovies::new();

        assert!(saved.toggle("War/Drama", movie("1917")));
        assert!(saved.is_saved("War/Drama", "1917"));
        assert_eq!(saved.len(), 1);

        assert!(!saved.toggle("War/Drama", movie("1917")));
        assert!(!saved.is_saved("War/Drama", "1917"));
        assert!(saved.is_empty());
    }

    #[test]
    fn test_same_title_in_other_category_is_distinct() {
        let mut saved = SavedMovies::new();
        saved.toggle("War/Drama", movie("Dunkirk"));
        saved.toggle("War", movie("Dunkirk"));

        assert_eq!(saved.len(), 2);
        assert!(!saved.is_saved("Drama", "Dunkirk"));
    }

    #[test]
    fn test_category_match_score() {
        let scores = scores();
        let score = |category: &str| category_match_score(category, &scores, RatingScale::Five);

        // (5 + 3) / 2 = 4 on a 5 scale
        assert_eq!(score("War/Drama"), 8.0);
        assert_eq!(score("Comedy"), 8.0);
        // "Historical War" is not a genre; (0 + 3) / 2
        assert_eq!(score("Historical War/Drama"), 3.0);
        assert_eq!(score("War, Drama"), 8.0);
        assert_eq!(score(""), 0.0);
    }

    #[test]
    fn test_ranked_selection_orders_by_match() {
        let mut saved = SavedMovies::new();
        saved.toggle("Drama", movie("Parasite"));
        saved.toggle("War", movie("Das Boot"));
        saved.toggle("War/Drama", movie("1917"));
        saved.toggle("Comedy", movie("Groundhog Day"));

        let ranked = saved.ranked_selection(&scores(), RatingScale::Five);
        let titles: Vec<&str> = ranked
            .iter()
            .map(|r| r.saved.movie.title.as_str())
            .collect();

        assert_eq!(
            titles,
            vec!["Das Boot", "1917", "Groundhog Day", "Parasite"]
        );
        assert_eq!(ranked[0].match_score, 10.0);
        assert_eq!(ranked[3].match_score, 6.0);
    }
}
