use anyhow::Result;
use colored::Colorize;

use crate::domain::RatingEntry;
use crate::feeds::RatingFeed;

/// Prints the stored ledger as ranked standings.
///
/// Presentation only: the ledger itself is produced by the update and
/// rebuild services, and reading it never changes it.
pub struct LeaderboardService<S> {
    ratings: S,
}

impl<S: RatingFeed> LeaderboardService<S> {
    pub fn new(ratings: S) -> Self {
        Self { ratings }
    }

    pub fn run(&self) -> Result<()> {
        let table = self.ratings.load()?;
        if table.is_empty() {
            println!("No rated players yet");
            return Ok(());
        }

        print_header();
        for (idx, entry) in table.standings().iter().enumerate() {
            print_row(idx + 1, entry);
        }

        Ok(())
    }
}

fn print_header() {
    let header = format!("{:>4}  {:<24} {:>5}  {:>5}", "#", "Player", "Elo", "Games");
    println!("{}", header.bold());
}

fn print_row(rank: usize, entry: &RatingEntry) {
    let games = entry
        .games_played
        .map_or_else(|| "-".to_string(), |games| games.to_string());
    let line = format!(
        "{:>4}  {:<24} {:>5}  {:>5}",
        rank, entry.name, entry.rating, games
    );

    if rank == 1 {
        println!("{}", line.yellow().bold());
    } else {
        println!("{line}");
    }
}
