//! Session state: everything a snapshot carries.
//!
//! ## GameSession
//!
//! Turn bookkeeping, players, decks, RNG position and the pending move.
//!
//! ## GameState
//!
//! The session plus the board. This is the unit the action pipeline clones
//! before executing a move, the unit a host broadcasts, and the unit saved
//! to disk. Decks and the pass set use `im` persistent collections so those
//! clones share structure.
//!
//! Only card, corporation, milestone and project *names* appear here; the
//! catalog is never serialized.

use im::{OrdSet, Vector};
use serde::{Deserialize, Serialize};

use super::action::Move;
use super::config::GameConfig;
use super::player::{Player, PlayerId, PlayerMap};
use super::rng::{GameRng, GameRngState};
use crate::board::{Board, Coord, TileType};
use crate::cards::Catalog;
use crate::error::{Error, Result};
use crate::rules::{Phase, ScoreLine};

/// What a pending placement came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementSource {
    Card(String),
    StandardProject(String),
    PlantConversion,
}

/// The follow-up a suspended move waits for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingKind {
    /// A tile target (completed by PlaceTile).
    Placement {
        tile: TileType,
        source: PlacementSource,
    },
    /// A list of cards to sell (completed by SellCards).
    CardSale,
}

/// A validated move suspended on a follow-up choice.
///
/// Nothing of the trigger has been applied or logged yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMove {
    pub trigger: Move,
    pub actor: PlayerId,
    pub kind: PendingKind,
}

/// Turn order, players, decks and suspended choices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub players: PlayerMap<Player>,

    pub phase: Phase,

    /// Generation number, starting at 1.
    pub generation: u32,

    /// Seat whose turn it is (ACTIONS and FINAL_GREENERY).
    pub current_player: PlayerId,

    /// Seat that opens the current generation.
    pub first_player: PlayerId,

    /// Actions used in the current turn: 0, 1 or 2.
    pub actions_taken: u8,

    /// Seats that passed this generation.
    pub passed: OrdSet<PlayerId>,

    /// Draw pile (front is the top).
    pub deck: Vector<String>,

    pub discard: Vector<String>,

    pub corporation_deck: Vector<String>,

    pub rng: GameRngState,

    pub pending: Option<PendingMove>,

    /// Filled on entering GAME_OVER.
    pub final_scores: Option<Vec<ScoreLine>>,
}

/// Full, serializable game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub session: GameSession,
    pub board: Board,
}

impl GameState {
    /// Seat players and shuffle both decks.
    ///
    /// Nothing is dealt yet; the pipeline's `start` deals corporations.
    pub fn new(config: &GameConfig, catalog: &Catalog, names: &[&str]) -> Result<Self> {
        config.validate()?;
        if names.len() < config.min_players || names.len() > config.max_players {
            return Err(Error::Config(format!(
                "{} players requested, table seats {}..={}",
                names.len(),
                config.min_players,
                config.max_players
            )));
        }
        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(Error::Config("player names must not be empty".to_string()));
            }
            if names[..i].contains(name) {
                return Err(Error::Config(format!("duplicate player name '{name}'")));
            }
        }

        let players = PlayerMap::new(names.len(), |seat| {
            Player::new(names[seat.index()], seat, config.starting_terraform_rating)
        });

        let mut rng = GameRng::new(config.seed);
        let mut deck = catalog.card_names().to_vec();
        rng.shuffle(&mut deck);
        let mut corporations = catalog.corporation_names().to_vec();
        rng.shuffle(&mut corporations);

        let first = PlayerId::new(0);
        let session = GameSession {
            players,
            phase: Phase::CorpSelection,
            generation: 1,
            current_player: first,
            first_player: first,
            actions_taken: 0,
            passed: OrdSet::new(),
            deck: deck.into_iter().collect(),
            discard: Vector::new(),
            corporation_deck: corporations.into_iter().collect(),
            rng: rng.state(),
            pending: None,
            final_scores: None,
        };

        Ok(Self {
            session,
            board: Board::new(config),
        })
    }

    // === Players ===

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.session.players.player_count()
    }

    #[must_use]
    pub fn player(&self, seat: PlayerId) -> &Player {
        &self.session.players[seat]
    }

    pub fn player_mut(&mut self, seat: PlayerId) -> &mut Player {
        &mut self.session.players[seat]
    }

    /// Resolve a player name to a seat.
    #[must_use]
    pub fn player_by_name(&self, name: &str) -> Option<PlayerId> {
        self.session
            .players
            .iter()
            .find(|(_, p)| p.name == name)
            .map(|(seat, _)| seat)
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Name of the seat holding the turn.
    #[must_use]
    pub fn current_player_name(&self) -> &str {
        &self.player(self.session.current_player).name
    }

    // === Terraforming ===

    /// Raise temperature one step on `seat`'s behalf; +1 TR if it moved.
    pub fn raise_temperature_for(&mut self, seat: PlayerId) -> bool {
        let raised = self.board.raise_temperature();
        if raised {
            self.player_mut(seat).terraform_rating += 1;
        }
        raised
    }

    /// Raise oxygen one step on `seat`'s behalf; +1 TR if it moved.
    pub fn raise_oxygen_for(&mut self, seat: PlayerId) -> bool {
        let raised = self.board.raise_oxygen();
        if raised {
            self.player_mut(seat).terraform_rating += 1;
        }
        raised
    }

    /// Put a validated tile and apply its side effects.
    ///
    /// Oceans give +1 TR when they advance the ocean count. Greeneries raise
    /// oxygen (with its TR). Tile scores are refreshed for every player,
    /// since a greenery can score for a neighbor's city.
    pub fn place_tile_for(&mut self, seat: PlayerId, coord: Coord, tile: TileType) {
        let ocean_added = self.board.put_tile(coord, tile, seat);
        match tile {
            TileType::Ocean if ocean_added => self.player_mut(seat).terraform_rating += 1,
            TileType::Greenery => {
                self.raise_oxygen_for(seat);
            }
            _ => {}
        }
        self.refresh_tile_scores();
    }

    /// Recompute every player's cached board points.
    pub fn refresh_tile_scores(&mut self) {
        for seat in self.session.players.player_ids() {
            let points = self.board.tile_points(seat);
            self.player_mut(seat).tile_score = points;
        }
    }

    // === Snapshots ===

    /// Encode the whole state.
    pub fn to_blob(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| Error::StateCorruption(e.to_string()))
    }

    /// Decode a state produced by [`to_blob`](Self::to_blob).
    pub fn from_blob(blob: &[u8]) -> Result<Self> {
        bincode::deserialize(blob).map_err(|e| Error::StateCorruption(e.to_string()))
    }
}
