//! Final scoring and ranking.
//!
//! Score = terraform rating + milestone points + board points (one per
//! greenery, one per greenery adjacent to each owned city) + card victory
//! points. Ranking is by total, then MegaCredits, then seat.

use serde::{Deserialize, Serialize};

use crate::cards::Catalog;
use crate::core::{GameConfig, GameState, PlayerId};

/// One player's score breakdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub seat: PlayerId,
    pub name: String,
    pub terraform_rating: i32,
    pub milestone_points: i32,
    pub tile_points: i32,
    pub card_points: i32,
    pub total: i32,
    /// Tie-breaker.
    pub megacredits: i32,
}

/// Score one player.
#[must_use]
pub fn score(state: &GameState, catalog: &Catalog, config: &GameConfig, seat: PlayerId) -> ScoreLine {
    let player = state.player(seat);
    let milestone_points = player.milestones.len() as i32 * config.milestone_points;
    let tile_points = state.board.tile_points(seat);
    let card_points = player
        .played
        .iter()
        .filter_map(|name| catalog.card(name))
        .map(|card| card.victory_points)
        .sum();

    ScoreLine {
        seat,
        name: player.name.clone(),
        terraform_rating: player.terraform_rating,
        milestone_points,
        tile_points,
        card_points,
        total: player.terraform_rating + milestone_points + tile_points + card_points,
        megacredits: player.megacredits(),
    }
}

/// Score every player, best first.
#[must_use]
pub fn score_all(state: &GameState, catalog: &Catalog, config: &GameConfig) -> Vec<ScoreLine> {
    let mut lines: Vec<_> = state
        .session
        .players
        .player_ids()
        .map(|seat| score(state, catalog, config, seat))
        .collect();
    lines.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then(b.megacredits.cmp(&a.megacredits))
            .then(a.seat.cmp(&b.seat))
    });
    lines
}
