//! # terraform-engine
//!
//! Rules engine for a hex-board terraforming card game, run either by one
//! local process or by several networked participants around one
//! authoritative host.
//!
//! ## Design Principles
//!
//! 1. **One Mutator**: Only the authoritative side (solo or host) applies
//!    moves. Mirrors propose moves and swap in the snapshots they receive.
//!
//! 2. **Content Is Data**: Cards, corporations, milestones and standard
//!    projects are JSON records. Their effects and requirements name
//!    functions in registries, resolved when the catalog loads.
//!
//! 3. **Replayable**: Every accepted move is logged, card draws included,
//!    so a log replays to the identical state and ranking.
//!
//! ## Architecture
//!
//! - **Scratch-and-commit**: Each move runs against a clone of the state.
//!   A rejection drops the clone; nothing partial is ever visible.
//!
//! - **Persistent Data Structures**: Decks, the passed set and the move log
//!   use `im`, so snapshot clones for broadcast, replay and saving are cheap.
//!
//! ## Modules
//!
//! - `core`: players, resources, moves, configuration, RNG, game state
//! - `board`: hex layout, tiles, global parameters, placement rules
//! - `cards`: cards, corporations, milestones, standard projects, catalog
//! - `effects`: effect/requirement descriptors and their interpreter
//! - `rules`: phases, the action pipeline, dealing, choices, scoring
//! - `history`: the move log and replay
//! - `net`: roles, wire frames, transports, host and mirror sessions
//! - `persist`: save stores and the background save worker
//!
//! ## Example
//!
//! ```
//! use terraform_engine::{ActionPipeline, Catalog, GameConfig, GameState, Phase, SessionContext};
//!
//! let config = GameConfig::default().with_seed(7);
//! let catalog = Catalog::builtin().unwrap();
//! let state = GameState::new(&config, &catalog, &["Ada", "Brook"]).unwrap();
//!
//! let mut pipeline = ActionPipeline::new(SessionContext::solo(config, catalog).unwrap(), state);
//! pipeline.start().unwrap();
//!
//! assert_eq!(pipeline.state().phase(), Phase::CorpSelection);
//! assert_eq!(pipeline.log().len(), 2);
//! ```

pub mod board;
pub mod cards;
pub mod core;
pub mod effects;
pub mod error;
pub mod history;
pub mod net;
pub mod persist;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    ActionType, FirstPlayerPolicy, GameConfig, GameState, Move, Player, PlayerId, Resource,
};

pub use crate::board::{Board, Coord, PlacementValidator, TileType};

pub use crate::cards::{Card, Catalog, Corporation, Milestone, StandardProject, Tag};

pub use crate::effects::{EffectDescriptor, EffectEngine, RequirementDescriptor};

pub use crate::error::{Error, NetError, Rejection, Result};

pub use crate::history::{MoveLog, Replay, ReplayEngine};

pub use crate::net::{
    ChannelTransport, HostSession, MirrorEvent, MirrorSession, Role, SessionContext, Transport,
    WireMessage,
};

pub use crate::persist::{FileStore, MemoryStore, SaveStore, SaveWorker, SavedGame};

pub use crate::rules::{
    score_all, ActionPipeline, Choice, ChoiceRequest, Outcome, Phase, PhaseController, ScoreLine,
};
