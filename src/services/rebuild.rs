use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use log::info;

use crate::config::AppConfig;
use crate::domain::{GameRecord, RatingEntry, RatingTable};
use crate::feeds::{RatingFeed, ResultsFeed};
use crate::rating::{self, windows, PlayerUpdate};

use super::RunOutcome;

/// Replays the entire results history from an empty ledger, one calendar
/// week at a time, rebuilding ratings and game counts from scratch.
///
/// Meant for reconstructing the ledger (say, after a schema change), not
/// for routine operation; the update service handles that.
pub struct RebuildService<R, S> {
    config: AppConfig,
    results: R,
    ratings: S,
}

impl<R: ResultsFeed, S: RatingFeed> RebuildService<R, S> {
    pub fn new(config: AppConfig, results: R, ratings: S) -> Self {
        Self {
            config,
            results,
            ratings,
        }
    }

    pub fn run(&self) -> Result<RunOutcome> {
        info!("=== Starting Full-History Rebuild ===\n");

        // Step 1: Load the complete results history
        let records = self.results.load()?;
        if records.is_empty() {
            info!("Results feed is empty; nothing to rebuild");
            return Ok(RunOutcome::NoNewResults);
        }
        info!("  → {} games on record\n", records.len());

        // Step 2: Replay week by week, oldest first
        let now = Utc::now().naive_utc();
        let table = self.replay_weeks(records, now)?;

        // Step 3: Replace the ledger, best rating first
        let players = table.len();
        self.ratings.replace(&table.standings())?;
        info!("  → Rebuilt ratings for {players} players\n");

        info!("=== Rebuild Complete ===");
        Ok(RunOutcome::Updated { players })
    }

    fn replay_weeks(&self, records: Vec<GameRecord>, stamp: NaiveDateTime) -> Result<RatingTable> {
        let mut table = RatingTable::new();

        for ((year, week), batch) in windows::partition_by_week(records) {
            // The running table is this week's frozen prior; results fold
            // in only after the whole week is rated.
            let updates = rating::rate_batch(&batch, &table, &self.config.elo)?;
            info!(
                "  Week {year}-W{week:02}: {} games, {} active players",
                batch.len(),
                updates.len()
            );
            fold_week(&mut table, updates, stamp);
        }

        Ok(table)
    }
}

fn fold_week(table: &mut RatingTable, updates: Vec<PlayerUpdate>, stamp: NaiveDateTime) {
    for update in updates {
        let played_before = table
            .get(&update.name)
            .and_then(|entry| entry.games_played)
            .unwrap_or(0);

        table.insert(RatingEntry {
            name: update.name,
            rating: update.rating,
            games_played: Some(played_before + update.games),
            last_update: stamp,
        });
    }
}
