use anyhow::Result;

use chessead_elo_ranking::cli::Command;
use chessead_elo_ranking::{handle_leaderboard, handle_rebuild, handle_update, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Update { results, ratings } => handle_update(results, ratings),
        Command::Rebuild { results, ratings } => handle_rebuild(results, ratings),
        Command::Leaderboard { ratings } => handle_leaderboard(ratings),
    }
}
