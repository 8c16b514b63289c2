pub type Rating = i32;

/// Engine output for one active player in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerUpdate {
    pub name: String,
    pub rating: Rating,
    /// Number of the player's games in the batch. The full-history
    /// orchestrator folds this into the running `games_played` count.
    pub games: i32,
}
