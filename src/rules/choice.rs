//! Choice requests: the boundary to whatever collects a player's decision.
//!
//! When the pipeline waits on a player (a tile target, a research purchase,
//! a card sale), it describes the decision as a [`ChoiceRequest`] with the
//! legal candidates. The caller turns the request into a [`ChoiceResponder`]
//! and answers it exactly once; the answer comes back as the `Move` to
//! submit.

use super::phase::Phase;
use crate::board::{Coord, PlacementValidator, TileType};
use crate::core::{ActionType, GameConfig, GameState, Move, PendingKind};
use crate::error::Rejection;

/// An outstanding decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChoiceRequest {
    /// Pick a target for a pending tile.
    Tile {
        player: String,
        tile: TileType,
        candidates: Vec<Coord>,
    },
    /// Pick which offered research cards to buy.
    BuyCards {
        player: String,
        offered: Vec<String>,
        cost_each: i32,
    },
    /// Pick which hand cards to sell.
    SellCards {
        player: String,
        hand: Vec<String>,
        value_each: i32,
    },
}

impl ChoiceRequest {
    /// The decision `player` owes in `state`, if any.
    ///
    /// A pending move blocks everyone but its actor. Without one, research
    /// purchases are owed by every player who has not bought yet.
    #[must_use]
    pub fn outstanding(state: &GameState, config: &GameConfig, player: &str) -> Option<Self> {
        if let Some(pending) = &state.session.pending {
            if pending.trigger.actor != player {
                return None;
            }
            let request = match &pending.kind {
                PendingKind::Placement { tile, .. } => ChoiceRequest::Tile {
                    player: player.to_string(),
                    tile: *tile,
                    candidates: PlacementValidator::valid_targets(&state.board, pending.actor, *tile),
                },
                PendingKind::CardSale => ChoiceRequest::SellCards {
                    player: player.to_string(),
                    hand: state.player(pending.actor).hand.clone(),
                    value_each: config.card_sell_value,
                },
            };
            return Some(request);
        }

        if state.phase() != Phase::Research {
            return None;
        }
        let seat = state.player_by_name(player)?;
        let p = state.player(seat);
        if p.research_done {
            return None;
        }
        Some(ChoiceRequest::BuyCards {
            player: player.to_string(),
            offered: p.offered_cards.clone(),
            cost_each: config.card_buy_cost,
        })
    }

    /// Player who must answer.
    #[must_use]
    pub fn player(&self) -> &str {
        match self {
            ChoiceRequest::Tile { player, .. }
            | ChoiceRequest::BuyCards { player, .. }
            | ChoiceRequest::SellCards { player, .. } => player,
        }
    }

    /// Whether the request can be abandoned with `CancelPending`.
    #[must_use]
    pub fn cancellable(&self) -> bool {
        !matches!(self, ChoiceRequest::BuyCards { .. })
    }

    /// Hand the request to a responder.
    #[must_use]
    pub fn responder(self) -> ChoiceResponder {
        ChoiceResponder { request: self }
    }
}

/// A player's answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Choice {
    Tile(Coord),
    Cards(Vec<String>),
    Cancel,
}

/// One-shot answer handle. `respond` consumes it.
///
/// ```
/// use terraform_engine::board::{Coord, TileType};
/// use terraform_engine::core::ActionType;
/// use terraform_engine::rules::{Choice, ChoiceRequest};
///
/// let request = ChoiceRequest::Tile {
///     player: "Ada".to_string(),
///     tile: TileType::City,
///     candidates: vec![Coord::new(4, 4)],
/// };
/// let mv = request.responder().respond(Choice::Tile(Coord::new(4, 4))).unwrap();
/// assert_eq!(mv.action, ActionType::PlaceTile);
/// ```
#[derive(Debug)]
pub struct ChoiceResponder {
    request: ChoiceRequest,
}

impl ChoiceResponder {
    #[must_use]
    pub fn request(&self) -> &ChoiceRequest {
        &self.request
    }

    /// Turn the answer into the move that completes the request.
    ///
    /// Only the shape of the answer is checked here. Legality (a valid
    /// target, affordable cards) is the pipeline's job.
    pub fn respond(self, choice: Choice) -> Result<Move, Rejection> {
        match (self.request, choice) {
            (ChoiceRequest::Tile { player, tile, .. }, Choice::Tile(coord)) => {
                Ok(Move::place_tile(player, tile, coord.row, coord.col))
            }
            (ChoiceRequest::BuyCards { player, .. }, Choice::Cards(cards)) => {
                Ok(Move::buy_cards(player, &cards))
            }
            (ChoiceRequest::SellCards { player, .. }, Choice::Cards(cards)) => {
                Ok(Move::sell_cards(player, &cards))
            }
            (request, Choice::Cancel) if request.cancellable() => Ok(Move::cancel(request.player())),
            (ChoiceRequest::Tile { .. }, _) => {
                Err(Rejection::WrongCompletion(ActionType::PlaceTile))
            }
            (ChoiceRequest::BuyCards { .. }, _) => {
                Err(Rejection::WrongCompletion(ActionType::BuyCards))
            }
            (ChoiceRequest::SellCards { .. }, _) => {
                Err(Rejection::WrongCompletion(ActionType::SellCards))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale() -> ChoiceRequest {
        ChoiceRequest::SellCards {
            player: "Ada".to_string(),
            hand: vec!["Mine".to_string(), "Comet".to_string()],
            value_each: 1,
        }
    }

    #[test]
    fn test_sale_answer() {
        let mv = sale()
            .responder()
            .respond(Choice::Cards(vec!["Mine".to_string()]))
            .unwrap();

        assert_eq!(mv.action, ActionType::SellCards);
        assert_eq!(mv.card_list().unwrap(), vec!["Mine".to_string()]);
    }

    #[test]
    fn test_cancel() {
        let mv = sale().responder().respond(Choice::Cancel).unwrap();
        assert_eq!(mv.action, ActionType::CancelPending);
        assert_eq!(mv.actor, "Ada");
    }

    #[test]
    fn test_research_cannot_be_cancelled() {
        let request = ChoiceRequest::BuyCards {
            player: "Ada".to_string(),
            offered: vec![],
            cost_each: 3,
        };
        assert_eq!(
            request.responder().respond(Choice::Cancel),
            Err(Rejection::WrongCompletion(ActionType::BuyCards))
        );
    }

    #[test]
    fn test_shape_mismatch() {
        assert_eq!(
            sale().responder().respond(Choice::Tile(Coord::new(0, 0))),
            Err(Rejection::WrongCompletion(ActionType::SellCards))
        );
    }
}
