pub mod models;

pub use models::{GameRecord, Outcome, RatingEntry, RatingTable};
