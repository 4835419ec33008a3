//! Moves: the unit of player intent and of the move log.
//!
//! A `Move` names its actor, an `ActionType` (the "verb"), a free-form
//! payload (card name, project id, milestone name, or a JSON card list) and,
//! for tile placement, the target coordinate. Moves are immutable once
//! logged; replay feeds the same values back through the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::TileType;
use crate::error::Rejection;

/// Every kind of move the pipeline understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    /// Pick one of the offered corporations. Payload: corporation name.
    ChooseCorporation,
    /// Buy a subset of the research offer. Payload: JSON card list.
    BuyCards,
    /// Play a card from hand. Payload: card name.
    PlayCard,
    /// Use a standard project. Payload: project id.
    UseStandardProject,
    /// Claim a milestone. Payload: milestone name.
    ClaimMilestone,
    /// Spend heat to raise temperature.
    ConvertHeat,
    /// Spend plants for a greenery (suspends for a tile).
    ConvertPlants,
    /// End participation for this generation (or final greenery).
    PassTurn,
    /// Complete a pending placement. Carries coordinates.
    PlaceTile,
    /// Complete a pending card sale. Payload: JSON card list.
    SellCards,
    /// Abandon the pending move.
    CancelPending,
    /// System move recording dealt cards. Payload: JSON deal record.
    DealCards,
}

impl ActionType {
    /// True for moves only the engine produces.
    #[must_use]
    pub const fn is_system(self) -> bool {
        matches!(self, ActionType::DealCards)
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Target of a PlaceTile move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePlacement {
    pub row: usize,
    pub col: usize,
    pub tile: TileType,
}

/// A move record.
///
/// ```
/// use terraform_engine::core::{ActionType, Move};
///
/// let play = Move::play_card("Ada", "Comet");
/// assert_eq!(play.action, ActionType::PlayCard);
/// assert_eq!(play.payload, "Comet");
/// assert!(play.placement.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Name of the acting player (the recipient, for system moves).
    pub actor: String,

    pub action: ActionType,

    pub payload: String,

    /// Target coordinate and tile, PlaceTile only.
    pub placement: Option<TilePlacement>,

    pub timestamp: DateTime<Utc>,
}

impl Move {
    /// Create a move stamped with the current time.
    #[must_use]
    pub fn new(actor: impl Into<String>, action: ActionType, payload: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            action,
            payload: payload.into(),
            placement: None,
            timestamp: Utc::now(),
        }
    }

    /// Replace the timestamp (builder pattern).
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    // === Constructors ===

    #[must_use]
    pub fn choose_corporation(actor: impl Into<String>, corporation: &str) -> Self {
        Self::new(actor, ActionType::ChooseCorporation, corporation)
    }

    #[must_use]
    pub fn buy_cards(actor: impl Into<String>, cards: &[String]) -> Self {
        Self::new(actor, ActionType::BuyCards, encode_card_list(cards))
    }

    #[must_use]
    pub fn play_card(actor: impl Into<String>, card: &str) -> Self {
        Self::new(actor, ActionType::PlayCard, card)
    }

    #[must_use]
    pub fn standard_project(actor: impl Into<String>, project: &str) -> Self {
        Self::new(actor, ActionType::UseStandardProject, project)
    }

    #[must_use]
    pub fn claim_milestone(actor: impl Into<String>, milestone: &str) -> Self {
        Self::new(actor, ActionType::ClaimMilestone, milestone)
    }

    #[must_use]
    pub fn convert_heat(actor: impl Into<String>) -> Self {
        Self::new(actor, ActionType::ConvertHeat, "")
    }

    #[must_use]
    pub fn convert_plants(actor: impl Into<String>) -> Self {
        Self::new(actor, ActionType::ConvertPlants, "")
    }

    #[must_use]
    pub fn pass(actor: impl Into<String>) -> Self {
        Self::new(actor, ActionType::PassTurn, "")
    }

    /// Complete a pending placement at (row, col).
    #[must_use]
    pub fn place_tile(actor: impl Into<String>, tile: TileType, row: usize, col: usize) -> Self {
        let mut mv = Self::new(actor, ActionType::PlaceTile, "");
        mv.placement = Some(TilePlacement { row, col, tile });
        mv
    }

    #[must_use]
    pub fn sell_cards(actor: impl Into<String>, cards: &[String]) -> Self {
        Self::new(actor, ActionType::SellCards, encode_card_list(cards))
    }

    #[must_use]
    pub fn cancel(actor: impl Into<String>) -> Self {
        Self::new(actor, ActionType::CancelPending, "")
    }

    /// Decode a JSON card-list payload.
    pub fn card_list(&self) -> Result<Vec<String>, Rejection> {
        serde_json::from_str(&self.payload)
            .map_err(|e| Rejection::MalformedPayload(format!("{}: {e}", self.action)))
    }
}

/// Encode a card list as a move payload.
#[must_use]
pub fn encode_card_list(cards: &[String]) -> String {
    // A Vec<String> always serializes.
    serde_json::to_string(cards).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_tile_carries_coordinates() {
        let mv = Move::place_tile("Ada", TileType::City, 3, 4);

        assert_eq!(mv.action, ActionType::PlaceTile);
        assert_eq!(
            mv.placement,
            Some(TilePlacement {
                row: 3,
                col: 4,
                tile: TileType::City
            })
        );
    }

    #[test]
    fn test_card_list_payload() {
        let cards = vec!["Comet".to_string(), "Mine, Deep".to_string()];
        let mv = Move::buy_cards("Ada", &cards);

        assert_eq!(mv.card_list().unwrap(), cards);
    }

    #[test]
    fn test_malformed_card_list() {
        let mv = Move::new("Ada", ActionType::SellCards, "Comet");
        assert!(matches!(mv.card_list(), Err(Rejection::MalformedPayload(_))));
    }

    #[test]
    fn test_action_classes() {
        assert!(ActionType::DealCards.is_system());
        assert!(!ActionType::PlayCard.is_system());
    }

    #[test]
    fn test_move_serialization() {
        let mv = Move::place_tile("Ada", TileType::Ocean, 0, 3);
        let json = serde_json::to_string(&mv).unwrap();
        let back: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(mv, back);
    }
}
