pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod feeds;
pub mod rating;
pub mod services;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::feeds::{CsvRatingFeed, CsvResultsFeed};
use crate::services::{LeaderboardService, RebuildService, RunOutcome, UpdateService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_update(results: &Path, ratings: &Path) -> Result<()> {
    let config = AppConfig::new();
    let service = UpdateService::new(
        config,
        CsvResultsFeed::new(results),
        CsvRatingFeed::new(ratings),
    );
    report_outcome(&service.run()?);
    Ok(())
}

pub fn handle_rebuild(results: &Path, ratings: &Path) -> Result<()> {
    let config = AppConfig::new();
    let service = RebuildService::new(
        config,
        CsvResultsFeed::new(results),
        CsvRatingFeed::new(ratings),
    );
    report_outcome(&service.run()?);
    Ok(())
}

pub fn handle_leaderboard(ratings: &Path) -> Result<()> {
    let service = LeaderboardService::new(CsvRatingFeed::new(ratings));
    service.run()
}

fn report_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Updated { players } => info!("Ledger now covers {players} players"),
        RunOutcome::NoNewResults => info!("No new results; nothing written"),
    }
}
