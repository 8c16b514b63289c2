//! The two storage collaborators the rating core talks to.
//!
//! The spreadsheet itself stays outside this crate; these traits are the
//! seam, and the CSV store is the concrete stand-in for its worksheets.

pub mod csv_store;

pub use csv_store::{CsvRatingFeed, CsvResultsFeed};

use anyhow::Result;

use crate::domain::{GameRecord, RatingEntry, RatingTable};

/// Source of reported game results.
pub trait ResultsFeed {
    /// Every reported game, parsed and validated, in feed order.
    fn load(&self) -> Result<Vec<GameRecord>>;
}

/// Store holding the current rating ledger.
pub trait RatingFeed {
    /// The prior rating snapshot; empty on first run.
    fn load(&self) -> Result<RatingTable>;

    /// Replaces the whole ledger with `standings`, preserving their order.
    fn replace(&self, standings: &[RatingEntry]) -> Result<()>;
}
