/// Combines per-voter genre ratings into one score per genre
///
/// Aggregation is a pure function of the session and holds no state. It is
/// re-run whenever a rating changes.
use std::collections::BTreeMap;

use crate::models::{AggregatedGenreScore, Genre, GenreScores, RatingScale, RatingSession};

/// At most this many genres are reported as "top"
pub const MAX_TOP_GENRES: usize = 7;

/// A top genre must average at least this fraction of the scale
pub const TOP_GENRE_THRESHOLD_RATIO: f64 = 0.7;

/// Aggregates every genre across all voters in the session
///
/// Unrated genres count as 0 and ratings above the scale are clamped. With no
/// voters every average is 0.
pub fn aggregate(session: &RatingSession) -> GenreScores {
    let max = session.scale.max();
    let voter_count = session.voter_count();

    let scores = Genre::ALL
        .into_iter()
        .map(|genre| {
            let scores: Vec<u8> = session
                .voters
                .iter()
                .map(|voter| voter.rating(genre).min(max))
                .collect();
            let total: u32 = scores.iter().map(|s| u32::from(*s)).sum();
            let average = if voter_count > 0 {
                f64::from(total) / voter_count as f64
            } else {
                0.0
            };

            (
                genre,
                AggregatedGenreScore {
                    scores,
                    total,
                    average,
                },
            )
        })
        .collect::<BTreeMap<_, _>>();

    GenreScores(scores)
}

/// The genres the group agrees on most
///
/// Sorted by average (ties keep genre declaration order), capped at
/// `MAX_TOP_GENRES`, then filtered to averages of at least 70% of the scale.
pub fn top_genres(scores: &GenreScores, scale: RatingScale) -> Vec<(Genre, AggregatedGenreScore)> {
    let threshold = f64::from(scale.max()) * TOP_GENRE_THRESHOLD_RATIO;

    scores
        .ranked()
        .into_iter()
        .take(MAX_TOP_GENRES)
        .filter(|(_, score)| score.average >= threshold)
        .map(|(genre, score)| (genre, score.clone()))
        .collect()
}
