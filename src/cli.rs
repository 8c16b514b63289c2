use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "chessead elo ranking backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Rate results reported since the last update
    Update {
        /// Results feed CSV (optional, defaults to results.csv)
        #[arg(long, default_value = "results.csv")]
        results: PathBuf,
        /// Ratings ledger CSV (optional, defaults to ratings.csv)
        #[arg(long, default_value = "ratings.csv")]
        ratings: PathBuf,
    },
    /// Rebuild the ledger from the full results history, week by week
    Rebuild {
        /// Results feed CSV (optional, defaults to results.csv)
        #[arg(long, default_value = "results.csv")]
        results: PathBuf,
        /// Ratings ledger CSV (optional, defaults to ratings.csv)
        #[arg(long, default_value = "ratings.csv")]
        ratings: PathBuf,
    },
    /// Print the current standings
    Leaderboard {
        /// Ratings ledger CSV (optional, defaults to ratings.csv)
        #[arg(long, default_value = "ratings.csv")]
        ratings: PathBuf,
    },
}
