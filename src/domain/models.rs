use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One reported game. The outcome is stored from the reporting player's
/// perspective; the opponent's implied score is the inverse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub timestamp: NaiveDateTime,
    pub reporter: String,
    pub opponent: String,
    pub outcome: Outcome,
}

impl GameRecord {
    pub fn involves(&self, player: &str) -> bool {
        self.reporter == player || self.opponent == player
    }

    /// The other side of the game, seen from `player`.
    pub fn other_party(&self, player: &str) -> &str {
        if self.reporter == player {
            &self.opponent
        } else {
            &self.reporter
        }
    }

    /// Score for `player`. A game entered by the opponent carries the
    /// reporter's result, so the score is inverted for the other side.
    pub fn score_for(&self, player: &str) -> f64 {
        if self.reporter == player {
            self.outcome.score()
        } else {
            1.0 - self.outcome.score()
        }
    }
}

/// Game outcome as reported. Anything other than an exact "Win" or
/// "Loss" counts as a draw, matching how the results form is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    pub fn from_report(raw: &str) -> Self {
        match raw {
            "Win" => Outcome::Win,
            "Loss" => Outcome::Loss,
            _ => Outcome::Draw,
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Loss => 0.0,
            Outcome::Draw => 0.5,
        }
    }
}

/// A player's current standing in the ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub name: String,
    pub rating: i32,
    /// Running game count; tracked by full-history rebuilds, absent for
    /// players only ever seen by incremental updates.
    pub games_played: Option<i32>,
    pub last_update: NaiveDateTime,
}

/// Current ratings keyed by player name. A batch reads one table as its
/// frozen prior snapshot and builds a fresh one; a table is never
/// mutated while it is being read.
#[derive(Debug, Clone, Default)]
pub struct RatingTable {
    entries: HashMap<String, RatingEntry>,
}

impl RatingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<RatingEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.name.clone(), entry))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&RatingEntry> {
        self.entries.get(name)
    }

    /// Inserts or overwrites the entry under its name.
    pub fn insert(&mut self, entry: RatingEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    /// Rating for `name`, or `fallback` for a player not in the table.
    pub fn rating_or(&self, name: &str, fallback: i32) -> i32 {
        self.entries.get(name).map_or(fallback, |entry| entry.rating)
    }

    /// The boundary between already-processed and new results: the most
    /// recent update stamp in the table. `None` for an empty table.
    pub fn watermark(&self) -> Option<NaiveDateTime> {
        self.entries.values().map(|entry| entry.last_update).max()
    }

    pub fn entries(&self) -> impl Iterator<Item = &RatingEntry> {
        self.entries.values()
    }

    /// All entries, best rating first. Ties fall back to name order so
    /// repeated runs produce the same row order.
    pub fn standings(&self) -> Vec<RatingEntry> {
        let mut rows: Vec<RatingEntry> = self.entries.values().cloned().collect();
        rows.sort_by(|a, b| b.rating.cmp(&a.rating).then_with(|| a.name.cmp(&b.name)));
        rows
    }
}
