use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};

use super::Genre;

/// Size of the star scale, chosen once per session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RatingScale {
    #[default]
    Five,
    Seven,
    Ten,
}

impl RatingScale {
    pub fn max(&self) -> u8 {
        match self {
            RatingScale::Five => 5,
            RatingScale::Seven => 7,
            RatingScale::Ten => 10,
        }
    }
}

impl TryFrom<u8> for RatingScale {
    type Error = AppError;

    fn try_from(value: u8) -> AppResult<Self> {
        match value {
            5 => Ok(RatingScale::Five),
            7 => Ok(RatingScale::Seven),
            10 => Ok(RatingScale::Ten),
            other => Err(AppError::InvalidInput(format!(
                "Unsupported rating scale {}; expected 5, 7 or 10",
                other
            ))),
        }
    }
}

impl From<RatingScale> for u8 {
    fn from(scale: RatingScale) -> Self {
        scale.max()
    }
}

/// One participant and the genre ratings they have given so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voter {
    pub id: String,
    /// Unrated genres are simply absent and count as 0
    #[serde(default)]
    pub ratings: BTreeMap<Genre, u8>,
}

impl Voter {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ratings: BTreeMap::new(),
        }
    }

    pub fn rating(&self, genre: Genre) -> u8 {
        self.ratings.get(&genre).copied().unwrap_or(0)
    }
}

/// Ratings collected from an ordered list of voters on a shared scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSession {
    #[serde(default)]
    pub scale: RatingScale,
    #[serde(default)]
    pub voters: Vec<Voter>,
}

impl RatingSession {
    pub fn new(scale: RatingScale) -> Self {
        Self {
            scale,
            voters: Vec::new(),
        }
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    /// Adds a voter if one with this id is not already present
    pub fn add_voter(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.voters.iter().any(|v| v.id == id) {
            self.voters.push(Voter::new(id));
        }
    }

    /// Records a rating, clamped to the session scale
    pub fn rate(&mut self, voter_id: &str, genre: Genre, value: u8) -> AppResult<()> {
        let max = self.scale.max();
        let voter = self
            .voters
            .iter_mut()
            .find(|v| v.id == voter_id)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown voter: {}", voter_id)))?;

        voter.ratings.insert(genre, value.min(max));
        Ok(())
    }

    /// Switches the scale. Existing ratings are meaningless on a new scale and are dropped.
    pub fn change_scale(&mut self, scale: RatingScale) {
        self.scale = scale;
        self.reset();
    }

    /// Clears every voter's ratings but keeps the voters
    pub fn reset(&mut self) {
        for voter in &mut self.voters {
            voter.ratings.clear();
        }
    }
}

/// Combined view of one genre across all voters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedGenreScore {
    /// Per-voter scores, index-aligned with the session's voter list
    pub scores: Vec<u8>,
    pub total: u32,
    pub average: f64,
}

/// Aggregated scores for every known genre, iterated in genre declaration order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenreScores(pub BTreeMap<Genre, AggregatedGenreScore>);

impl GenreScores {
    pub fn get(&self, genre: Genre) -> Option<&AggregatedGenreScore> {
        self.0.get(&genre)
    }

    /// Average for a genre; genres nobody could rate count as 0
    pub fn average(&self, genre: Genre) -> f64 {
        self.get(genre).map(|s| s.average).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Genre, &AggregatedGenreScore)> {
        self.0.iter().map(|(genre, score)| (*genre, score))
    }

    /// Genres sorted by average, highest first
    ///
    /// The sort is stable, so equal averages keep genre declaration order.
    pub fn ranked(&self) -> Vec<(Genre, &AggregatedGenreScore)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.average.total_cmp(&a.1.average));
        ranked
    }
}
