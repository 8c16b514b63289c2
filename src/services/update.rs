use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use log::info;

use crate::config::AppConfig;
use crate::domain::{GameRecord, RatingEntry, RatingTable};
use crate::feeds::{RatingFeed, ResultsFeed};
use crate::rating::{self, PlayerUpdate};

use super::RunOutcome;

/// Rates everything reported since the last recorded update, once.
///
/// Players without a game in the batch keep their ledger rows untouched;
/// everyone else is rated against the prior table as one frozen snapshot.
pub struct UpdateService<R, S> {
    config: AppConfig,
    results: R,
    ratings: S,
}

impl<R: ResultsFeed, S: RatingFeed> UpdateService<R, S> {
    pub fn new(config: AppConfig, results: R, ratings: S) -> Self {
        Self {
            config,
            results,
            ratings,
        }
    }

    pub fn run(&self) -> Result<RunOutcome> {
        info!("=== Starting Rating Update ===\n");

        // Step 1: Load the prior ledger and find the watermark
        let prior = self.ratings.load()?;
        let watermark = prior.watermark().unwrap_or_else(watermark_floor);
        info!("  → {} rated players, watermark {}\n", prior.len(), watermark);

        // Step 2: Collect results reported after the watermark
        let batch = self.load_new_results(watermark)?;
        if batch.is_empty() {
            info!("No results reported after {watermark}; ledger left untouched");
            return Ok(RunOutcome::NoNewResults);
        }
        info!("  → {} new games\n", batch.len());

        // Step 3: Rate the active players against the frozen prior table
        let updates = rating::rate_batch(&batch, &prior, &self.config.elo)?;

        // Step 4: Fold into a fresh table, carrying inactive players as-is
        let now = Utc::now().naive_utc();
        let table = fold_updates(&prior, updates, now);

        // Step 5: Replace the ledger, best rating first
        let players = table.len();
        self.ratings.replace(&table.standings())?;

        info!("=== Update Complete ===");
        Ok(RunOutcome::Updated { players })
    }

    fn load_new_results(&self, watermark: NaiveDateTime) -> Result<Vec<GameRecord>> {
        let all = self.results.load()?;
        Ok(all
            .into_iter()
            .filter(|game| game.timestamp > watermark)
            .collect())
    }
}

/// Watermark for a ledger with no entries yet: far enough back that the
/// first run picks up the whole results history.
fn watermark_floor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn fold_updates(
    prior: &RatingTable,
    updates: Vec<PlayerUpdate>,
    stamp: NaiveDateTime,
) -> RatingTable {
    let mut table = RatingTable::new();

    // Inactive players first, untouched; active players overwrite their
    // own rows below.
    for entry in prior.entries() {
        table.insert(entry.clone());
    }

    for update in updates {
        let games_played = prior
            .get(&update.name)
            .and_then(|entry| entry.games_played)
            .map(|games| games + update.games);

        table.insert(RatingEntry {
            name: update.name,
            rating: update.rating,
            games_played,
            last_update: stamp,
        });
    }

    table
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::NaiveDate;

    use crate::domain::Outcome;

    use super::*;

    struct StaticResults(Vec<GameRecord>);

    impl ResultsFeed for StaticResults {
        fn load(&self) -> Result<Vec<GameRecord>> {
            Ok(self.0.clone())
        }
    }

    #[derive(Clone, Default)]
    struct MemoryLedger {
        rows: Rc<RefCell<Vec<RatingEntry>>>,
    }

    impl RatingFeed for MemoryLedger {
        fn load(&self) -> Result<RatingTable> {
            Ok(RatingTable::from_entries(self.rows.borrow().clone()))
        }

        fn replace(&self, standings: &[RatingEntry]) -> Result<()> {
            *self.rows.borrow_mut() = standings.to_vec();
            Ok(())
        }
    }

    fn ts(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn game(timestamp: NaiveDateTime, reporter: &str, opponent: &str, outcome: Outcome) -> GameRecord {
        GameRecord {
            timestamp,
            reporter: reporter.to_string(),
            opponent: opponent.to_string(),
            outcome,
        }
    }

    fn service(
        results: Vec<GameRecord>,
        ledger: &MemoryLedger,
    ) -> UpdateService<StaticResults, MemoryLedger> {
        UpdateService::new(AppConfig::new(), StaticResults(results), ledger.clone())
    }

    #[test]
    fn first_run_rates_the_whole_history() {
        let ledger = MemoryLedger::default();
        let svc = service(
            vec![game(ts(2024, 3, 2), "Alice", "Bob", Outcome::Win)],
            &ledger,
        );

        let outcome = svc.run().unwrap();

        assert_eq!(outcome, RunOutcome::Updated { players: 2 });
        let rows = ledger.rows.borrow();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Alice");
        assert_eq!(rows[0].rating, 1016);
        assert_eq!(rows[1].name, "Bob");
        assert_eq!(rows[1].rating, 984);
        // Both stamped with the same run timestamp
        assert_eq!(rows[0].last_update, rows[1].last_update);
    }

    #[test]
    fn second_run_without_new_results_is_a_noop() {
        let ledger = MemoryLedger::default();
        let results = vec![game(ts(2024, 3, 2), "Alice", "Bob", Outcome::Win)];

        service(results.clone(), &ledger).run().unwrap();
        let before = ledger.rows.borrow().clone();

        let outcome = service(results, &ledger).run().unwrap();

        assert_eq!(outcome, RunOutcome::NoNewResults);
        assert_eq!(*ledger.rows.borrow(), before);
    }

    #[test]
    fn inactive_players_carry_forward_untouched() {
        let carol = RatingEntry {
            name: "Carol".to_string(),
            rating: 1210,
            games_played: Some(17),
            last_update: ts(2024, 2, 1),
        };
        let ledger = MemoryLedger::default();
        ledger.replace(&[carol.clone()]).unwrap();

        let svc = service(
            vec![game(ts(2024, 3, 2), "Alice", "Bob", Outcome::Win)],
            &ledger,
        );
        svc.run().unwrap();

        let rows = ledger.rows.borrow();
        let kept = rows.iter().find(|row| row.name == "Carol").unwrap();
        assert_eq!(kept, &carol);
    }

    #[test]
    fn only_results_after_the_watermark_count() {
        let ledger = MemoryLedger::default();
        ledger
            .replace(&[
                RatingEntry {
                    name: "Alice".to_string(),
                    rating: 1000,
                    games_played: None,
                    last_update: ts(2024, 2, 15),
                },
                RatingEntry {
                    name: "Bob".to_string(),
                    rating: 1000,
                    games_played: None,
                    last_update: ts(2024, 2, 15),
                },
            ])
            .unwrap();

        let svc = service(
            vec![
                // Already processed before the 2024-02-15 stamp
                game(ts(2024, 2, 10), "Bob", "Alice", Outcome::Win),
                game(ts(2024, 3, 2), "Alice", "Bob", Outcome::Win),
            ],
            &ledger,
        );
        svc.run().unwrap();

        let rows = ledger.rows.borrow();
        let alice = rows.iter().find(|row| row.name == "Alice").unwrap();
        let bob = rows.iter().find(|row| row.name == "Bob").unwrap();
        assert_eq!(alice.rating, 1016);
        assert_eq!(bob.rating, 984);
    }

    #[test]
    fn tracked_game_counts_accumulate() {
        let ledger = MemoryLedger::default();
        ledger
            .replace(&[RatingEntry {
                name: "Alice".to_string(),
                rating: 1016,
                games_played: Some(10),
                last_update: ts(2024, 2, 15),
            }])
            .unwrap();

        let svc = service(
            vec![game(ts(2024, 3, 2), "Alice", "Bob", Outcome::Win)],
            &ledger,
        );
        svc.run().unwrap();

        let rows = ledger.rows.borrow();
        let alice = rows.iter().find(|row| row.name == "Alice").unwrap();
        let bob = rows.iter().find(|row| row.name == "Bob").unwrap();
        assert_eq!(alice.games_played, Some(11));
        // Bob has never been through a rebuild, so no count is invented
        assert_eq!(bob.games_played, None);
    }

    #[test]
    fn standings_are_written_best_first() {
        let ledger = MemoryLedger::default();
        let svc = service(
            vec![
                game(ts(2024, 3, 2), "Alice", "Bob", Outcome::Win),
                game(ts(2024, 3, 3), "Carol", "Dave", Outcome::Loss),
            ],
            &ledger,
        );
        svc.run().unwrap();

        let ratings: Vec<i32> = ledger.rows.borrow().iter().map(|row| row.rating).collect();
        let mut sorted = ratings.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(ratings, sorted);
    }
}
