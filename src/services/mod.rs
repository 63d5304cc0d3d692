pub mod aggregation;
pub mod catalog;
pub mod fallback;
pub mod planner;
pub mod providers;
pub mod recommendations;
pub mod saved;

pub use catalog::CatalogAdapter;
pub use recommendations::{RecommendationResolver, Recommendations};
pub use saved::SavedMovies;
