//! Core engine types: players, resources, moves, state, RNG, configuration.
//!
//! Everything here is plain data that the rules operate on. `GameState` is
//! the single serializable unit; the rest are its parts.

pub mod action;
pub mod config;
pub mod player;
pub mod resource;
pub mod rng;
pub mod state;

pub use action::{encode_card_list, ActionType, Move, TilePlacement};
pub use config::{FirstPlayerPolicy, GameConfig};
pub use player::{Player, PlayerId, PlayerMap};
pub use resource::{Resource, ResourceMap};
pub use rng::{GameRng, GameRngState};
pub use state::{GameSession, GameState, PendingKind, PendingMove, PlacementSource};
