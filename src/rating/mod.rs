pub mod elo;
pub mod types;
pub mod windows;

pub use elo::{active_players, expected_score, rate_batch, rate_player};
pub use types::{PlayerUpdate, Rating};
