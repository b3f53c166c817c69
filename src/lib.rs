pub mod catalog;
pub mod config;
pub mod models;
pub mod normalize;
pub mod recommend;
pub mod salary;
pub mod stop_words;
pub mod tfidf;

pub use models::{JobPosting, RecommendationResult, ScoredPosting, UserQuery};
pub use recommend::{RecommendConfig, recommend, recommend_with};
