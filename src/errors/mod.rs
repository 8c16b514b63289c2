//! Failures that abort a rating run.
//!
//! A run either replaces the whole ledger or writes nothing; these errors
//! surface before any output is produced.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RatingError {
    /// A results row that cannot be rated: unparseable timestamp, missing
    /// player name, or a player reporting a game against themselves.
    #[error("invalid result row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    /// The orchestrator claimed this player already has a rating, but the
    /// prior table has no entry for them.
    #[error("no prior rating found for player '{name}'")]
    UnratedPlayer { name: String },
}
