use log::info;

use crate::config::EloSettings;
use crate::domain::{GameRecord, RatingTable};
use crate::errors::RatingError;

use super::types::{PlayerUpdate, Rating};

/// Probability of `own` scoring against `other` under the logistic Elo
/// curve (400-point scale).
pub fn expected_score(own: Rating, other: Rating) -> f64 {
    1.0 / (1.0 + 10f64.powf(f64::from(other - own) / 400.0))
}

/// Rates every player appearing in `batch` against the same frozen
/// `prior` snapshot.
///
/// All opponent ratings are resolved from `prior` and each player's games
/// are folded into a single adjustment, so the iteration order of the
/// batch cannot affect any player's result.
pub fn rate_batch(
    batch: &[GameRecord],
    prior: &RatingTable,
    settings: &EloSettings,
) -> Result<Vec<PlayerUpdate>, RatingError> {
    let players = active_players(batch);
    info!(
        "Rating {} players over {} new games",
        players.len(),
        batch.len()
    );

    players
        .into_iter()
        .map(|name| {
            let is_new = !prior.contains(&name);
            rate_player(&name, batch, prior, is_new, settings)
        })
        .collect()
}

/// Distinct names appearing in the batch, reporter column first, in
/// first-seen order.
pub fn active_players(batch: &[GameRecord]) -> Vec<String> {
    let mut players: Vec<String> = Vec::new();

    let names = batch
        .iter()
        .map(|game| game.reporter.as_str())
        .chain(batch.iter().map(|game| game.opponent.as_str()));

    for name in names {
        if !players.iter().any(|known| known == name) {
            players.push(name.to_string());
        }
    }

    players
}

/// New rating for one player from their games in the batch.
///
/// A new player starts from the configured starting rating; an existing
/// player must be present in `prior`. Opponents missing from `prior`
/// count at the starting rating without being added to the table.
pub fn rate_player(
    player: &str,
    batch: &[GameRecord],
    prior: &RatingTable,
    is_new: bool,
    settings: &EloSettings,
) -> Result<PlayerUpdate, RatingError> {
    let current = current_rating(player, prior, is_new, settings)?;

    let mut actual = 0.0;
    let mut expected = 0.0;
    let mut games = 0;

    for game in batch.iter().filter(|game| game.involves(player)) {
        let other = prior.rating_or(game.other_party(player), settings.starting_rating);
        actual += game.score_for(player);
        expected += expected_score(current, other);
        games += 1;
    }

    // f64::round: ties round away from zero
    let rating = (f64::from(current) + settings.k_factor * (actual - expected)).round() as Rating;

    Ok(PlayerUpdate {
        name: player.to_string(),
        rating,
        games,
    })
}

fn current_rating(
    player: &str,
    prior: &RatingTable,
    is_new: bool,
    settings: &EloSettings,
) -> Result<Rating, RatingError> {
    if is_new {
        return Ok(settings.starting_rating);
    }

    prior
        .get(player)
        .map(|entry| entry.rating)
        .ok_or_else(|| RatingError::UnratedPlayer {
            name: player.to_string(),
        })
}
