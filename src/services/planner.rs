/// Turns aggregated genre scores into the catalog queries worth issuing
///
/// The rules are a fixed heuristic: a handful of genre pairings known to
/// produce good lists, followed by the group's strongest single genres.
use serde::{Deserialize, Serialize};

use crate::models::{Genre, GenreScores};

/// Never issue more catalog queries than this per resolution pass
pub const MAX_QUERIES: usize = 6;

/// Single-genre queries are drawn from at most this many top genres
pub const MAX_SINGLE_GENRES: usize = 5;

/// Minimum average for most pairings and for single-genre queries
pub const GENRE_THRESHOLD: f64 = 3.0;

/// Crime/Drama is a crowded pairing and needs a stronger signal
pub const CRIME_DRAMA_THRESHOLD: f64 = 3.5;

/// One genre-combination lookup against the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreCombinationQuery {
    /// Genres in the order they should be named in the category label
    pub genres: Vec<Genre>,
    /// Movies must carry every genre rather than any one of them
    pub require_all: bool,
    pub min_score: f64,
}

impl GenreCombinationQuery {
    fn new(genres: Vec<Genre>, require_all: bool, min_score: f64) -> Self {
        Self {
            genres,
            require_all,
            min_score,
        }
    }

    pub fn contains(&self, genre: Genre) -> bool {
        self.genres.contains(&genre)
    }
}

/// Builds the ordered query list, highest value first, capped at `MAX_QUERIES`
pub fn plan(scores: &GenreScores) -> Vec<GenreCombinationQuery> {
    let at_least = |genre: Genre, threshold: f64| scores.average(genre) >= threshold;
    let mut queries = Vec::new();

    if at_least(Genre::War, GENRE_THRESHOLD) && at_least(Genre::Drama, GENRE_THRESHOLD) {
        queries.push(GenreCombinationQuery::new(
            vec![Genre::War, Genre::Drama],
            true,
            GENRE_THRESHOLD,
        ));
    }

    if at_least(Genre::History, GENRE_THRESHOLD) {
        if at_least(Genre::War, GENRE_THRESHOLD) {
            queries.push(GenreCombinationQuery::new(
                vec![Genre::History, Genre::War],
                false,
                GENRE_THRESHOLD,
            ));
        }
        if at_least(Genre::Drama, GENRE_THRESHOLD) {
            queries.push(GenreCombinationQuery::new(
                vec![Genre::History, Genre::Drama],
                false,
                GENRE_THRESHOLD,
            ));
        }
    }

    if at_least(Genre::Crime, CRIME_DRAMA_THRESHOLD)
        && at_least(Genre::Drama, CRIME_DRAMA_THRESHOLD)
    {
        queries.push(GenreCombinationQuery::new(
            vec![Genre::Crime, Genre::Drama],
            false,
            CRIME_DRAMA_THRESHOLD,
        ));
    }

    if at_least(Genre::SciFi, GENRE_THRESHOLD) {
        if at_least(Genre::Action, GENRE_THRESHOLD) {
            queries.push(GenreCombinationQuery::new(
                vec![Genre::SciFi, Genre::Action],
                false,
                GENRE_THRESHOLD,
            ));
        }
        if at_least(Genre::Thriller, GENRE_THRESHOLD) {
            queries.push(GenreCombinationQuery::new(
                vec![Genre::SciFi, Genre::Thriller],
                false,
                GENRE_THRESHOLD,
            ));
        }
    }

    let strongest: Vec<(Genre, f64)> = scores
        .ranked()
        .into_iter()
        .filter(|(_, score)| score.average >= GENRE_THRESHOLD)
        .take(MAX_SINGLE_GENRES)
        .map(|(genre, score)| (genre, score.average))
        .collect();

    for (genre, average) in strongest {
        if !queries.iter().any(|query| query.contains(genre)) {
            queries.push(GenreCombinationQuery::new(vec![genre], false, average));
        }
    }

    queries.truncate(MAX_QUERIES);
    queries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RatingScale, RatingSession};
    use crate::services::aggregation::aggregate;

    fn scores_for(ratings: &[(Genre, u8)]) -> GenreScores {
        let mut session = RatingSession::new(RatingScale::Five);
        session.add_voter("alex");
        for (genre, value) in ratings {
            session.rate("alex", *genre, *value).unwrap();
        }
        aggregate(&session)
    }

    #[test]
    fn test_war_drama_only() {
        let queries = plan(&scores_for(&[(Genre::War, 4), (Genre::Drama, 4)]));

        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].genres, vec![Genre::War, Genre::Drama]);
        assert!(queries[0].require_all);
    }

    #[test]
    fn test_history_pairings_are_any_of() {
        let scores = scores_for(&[(Genre::History, 4), (Genre::War, 3), (Genre::Drama, 3)]);
        let queries = plan(&scores);

        let genres: Vec<Vec<Genre>> = queries.iter().map(|q| q.genres.clone()).collect();
        assert_eq!(
            genres,
            vec![
                vec![Genre::War, Genre::Drama],
                vec![Genre::History, Genre::War],
                vec![Genre::History, Genre::Drama],
            ]
        );
        assert!(!queries[1].require_all);
        assert!(!queries[2].require_all);
    }

    #[test]
    fn test_crime_drama_needs_higher_threshold() {
        let queries = plan(&scores_for(&[(Genre::Crime, 3), (Genre::Drama, 5)]));
        let crime_drama = vec![Genre::Crime, Genre::Drama];
        assert!(queries.iter().all(|q| q.genres != crime_drama));

        let queries = plan(&scores_for(&[(Genre::Crime, 4), (Genre::Drama, 4)]));
        assert_eq!(queries[0].genres, vec![Genre::Crime, Genre::Drama]);
        assert_eq!(queries[0].min_score, CRIME_DRAMA_THRESHOLD);
    }

    #[test]
    fn test_sci_fi_pairings() {
        let scores = scores_for(&[(Genre::SciFi, 5), (Genre::Action, 3), (Genre::Thriller, 3)]);
        let queries = plan(&scores);

        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].genres, vec![Genre::SciFi, Genre::Action]);
        assert_eq!(queries[1].genres, vec![Genre::SciFi, Genre::Thriller]);
    }

    #[test]
    fn test_single_genres_fill_in_by_score() {
        let queries = plan(&scores_for(&[
            (Genre::Comedy, 3),
            (Genre::Horror, 5),
            (Genre::Romance, 4),
            (Genre::Western, 2),
        ]));

        let genres: Vec<Vec<Genre>> = queries.iter().map(|q| q.genres.clone()).collect();
        assert_eq!(
            genres,
            vec![
                vec![Genre::Horror],
                vec![Genre::Romance],
                vec![Genre::Comedy],
            ]
        );
        assert_eq!(queries[0].min_score, 5.0);
        assert!(queries.iter().all(|q| !q.require_all));
    }

    #[test]
    fn test_single_genres_skip_those_already_paired() {
        let scores = scores_for(&[(Genre::War, 5), (Genre::Drama, 5), (Genre::Comedy, 4)]);
        let queries = plan(&scores);

        let genres: Vec<Vec<Genre>> = queries.iter().map(|q| q.genres.clone()).collect();
        assert_eq!(
            genres,
            vec![vec![Genre::War, Genre::Drama], vec![Genre::Comedy]]
        );
    }

    #[test]
    fn test_plan_is_capped() {
        let everything: Vec<(Genre, u8)> = Genre::ALL.iter().map(|g| (*g, 5)).collect();
        let queries = plan(&scores_for(&everything));
        assert_eq!(queries.len(), MAX_QUERIES);
    }

    #[test]
    fn test_nothing_rated_plans_nothing() {
        assert!(plan(&scores_for(&[])).is_empty());
    }
}
