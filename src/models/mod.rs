mod genre;
mod movie;
mod ratings;

pub use genre::{catalog_genre_name, catalog_ids, catalog_ids_for, category_name, Genre};
pub use movie::{
    saved_movie_key, CategoryMovies, DiscoverParams, Movie, RecommendationMap, SavedMovie, SortBy,
    TmdbDiscoverResponse, TmdbGenre, TmdbGenresResponse, TmdbMovie, TmdbMovieDetails,
};
pub use ratings::{AggregatedGenreScore, GenreScores, RatingScale, RatingSession, Voter};
