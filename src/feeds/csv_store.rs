use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::info;
use serde::{Deserialize, Serialize};

use crate::domain::{GameRecord, Outcome, RatingEntry, RatingTable};
use crate::errors::RatingError;

use super::{RatingFeed, ResultsFeed};

/// Stamp format used for the `Last update` column, matching what the
/// shared sheet has always carried.
const LEDGER_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Results worksheet row: `Timestamp, You, Opponent, Result`.
#[derive(Debug, Deserialize)]
struct ResultRow {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "You")]
    reporter: String,
    #[serde(rename = "Opponent")]
    opponent: String,
    #[serde(rename = "Result")]
    result: String,
}

/// Ledger worksheet row: `Name, Elo, Games played, Last update`. The
/// games column may be empty for players without a tracked count.
#[derive(Debug, Serialize, Deserialize)]
struct RatingRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Elo")]
    rating: i32,
    #[serde(rename = "Games played", default)]
    games_played: Option<i32>,
    #[serde(rename = "Last update")]
    last_update: String,
}

pub struct CsvResultsFeed {
    path: PathBuf,
}

impl CsvResultsFeed {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ResultsFeed for CsvResultsFeed {
    fn load(&self) -> Result<Vec<GameRecord>> {
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open results feed: {}", self.path.display()))?;

        let mut records = Vec::new();
        for (idx, row) in reader.deserialize::<ResultRow>().enumerate() {
            let row_num = idx + 1;
            let row = row.with_context(|| format!("Failed to read results row {row_num}"))?;
            records.push(parse_result_row(row_num, row)?);
        }

        info!("Loaded {} results from {}", records.len(), self.path.display());
        Ok(records)
    }
}

pub struct CsvRatingFeed {
    path: PathBuf,
}

impl CsvRatingFeed {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RatingFeed for CsvRatingFeed {
    fn load(&self) -> Result<RatingTable> {
        // Missing ledger file is the bootstrap state, not an error
        if !self.path.exists() {
            return Ok(RatingTable::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open rating feed: {}", self.path.display()))?;

        let mut entries = Vec::new();
        for (idx, row) in reader.deserialize::<RatingRow>().enumerate() {
            let row_num = idx + 1;
            let row = row.with_context(|| format!("Failed to read rating row {row_num}"))?;
            entries.push(parse_rating_row(row_num, row)?);
        }

        Ok(RatingTable::from_entries(entries))
    }

    fn replace(&self, standings: &[RatingEntry]) -> Result<()> {
        // Write next to the target and swap, so a failed run never leaves
        // a half-written ledger behind.
        let tmp_path = PathBuf::from(format!("{}.tmp", self.path.display()));

        let mut writer = csv::Writer::from_path(&tmp_path)
            .with_context(|| format!("Failed to create {}", tmp_path.display()))?;

        for entry in standings {
            writer
                .serialize(RatingRow::from_entry(entry))
                .with_context(|| format!("Failed to write rating row for '{}'", entry.name))?;
        }
        writer.flush().context("Failed to flush rating feed")?;
        drop(writer);

        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to swap ledger into {}", self.path.display()))?;

        info!("Wrote {} players to {}", standings.len(), self.path.display());
        Ok(())
    }
}

impl RatingRow {
    fn from_entry(entry: &RatingEntry) -> Self {
        Self {
            name: entry.name.clone(),
            rating: entry.rating,
            games_played: entry.games_played,
            last_update: entry.last_update.format(LEDGER_STAMP_FORMAT).to_string(),
        }
    }
}

fn parse_result_row(row_num: usize, row: ResultRow) -> Result<GameRecord> {
    let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| RatingError::InvalidRecord {
        row: row_num,
        reason: format!("unparseable timestamp '{}'", row.timestamp),
    })?;

    let reporter = row.reporter.trim();
    let opponent = row.opponent.trim();

    if reporter.is_empty() || opponent.is_empty() {
        return Err(RatingError::InvalidRecord {
            row: row_num,
            reason: "missing player name".to_string(),
        }
        .into());
    }
    if reporter == opponent {
        return Err(RatingError::InvalidRecord {
            row: row_num,
            reason: format!("'{reporter}' reported a game against themselves"),
        }
        .into());
    }

    Ok(GameRecord {
        timestamp,
        reporter: reporter.to_string(),
        opponent: opponent.to_string(),
        outcome: Outcome::from_report(row.result.trim()),
    })
}

fn parse_rating_row(row_num: usize, row: RatingRow) -> Result<RatingEntry> {
    let last_update = parse_timestamp(&row.last_update).ok_or_else(|| RatingError::InvalidRecord {
        row: row_num,
        reason: format!("unparseable update stamp '{}'", row.last_update),
    })?;

    let name = row.name.trim();
    if name.is_empty() {
        return Err(RatingError::InvalidRecord {
            row: row_num,
            reason: "missing player name".to_string(),
        }
        .into());
    }

    Ok(RatingEntry {
        name: name.to_string(),
        rating: row.rating,
        games_played: row.games_played,
        last_update,
    })
}

/// Timestamps as the sheet produces them: form responses use the US short
/// format, exports and our own output use ISO-like stamps.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%m/%d/%Y %H:%M:%S") {
        return Some(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(ts);
    }

    None
}
