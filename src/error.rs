//! Error types.
//!
//! Three layers, matching how failures are handled:
//!
//! - [`Rejection`]: a move failed validation. Recovered locally, nothing is
//!   mutated, and only the acting participant hears about it.
//! - [`NetError`]: a transport-level failure for one peer.
//! - [`Error`]: everything that aborts an operation (bad catalog content,
//!   corrupt saves or logs, I/O).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::TileType;
use crate::core::{ActionType, Resource};
use crate::rules::Phase;

/// A move that failed validation.
///
/// Produced before any state is touched; the session is unchanged.
/// Serializable so the host can send it back to the acting peer.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Rejection {
    /// The move is not legal in the current phase.
    #[error("{action} is not allowed during {phase}")]
    WrongPhase { action: ActionType, phase: Phase },

    /// Actor name does not match any seated player.
    #[error("unknown player '{0}'")]
    UnknownPlayer(String),

    /// Someone else holds the turn.
    #[error("it is {current}'s turn, not {actor}'s")]
    NotYourTurn { actor: String, current: String },

    /// The actor already passed this generation.
    #[error("{0} has already passed")]
    AlreadyPassed(String),

    #[error("card '{0}' is not in hand")]
    CardNotInHand(String),

    #[error("unknown card '{0}'")]
    UnknownCard(String),

    #[error("unknown corporation '{0}'")]
    UnknownCorporation(String),

    #[error("corporation '{0}' was not offered")]
    CorporationNotOffered(String),

    #[error("{0} has already chosen a corporation")]
    CorporationAlreadyChosen(String),

    #[error("unknown standard project '{0}'")]
    UnknownProject(String),

    #[error("unknown milestone '{0}'")]
    UnknownMilestone(String),

    #[error("milestone '{0}' is already claimed")]
    MilestoneClaimed(String),

    #[error("all {0} milestones have been claimed")]
    MilestoneCapReached(usize),

    #[error("milestone '{0}' has not been reached")]
    MilestoneNotReached(String),

    /// Not enough MegaCredits.
    #[error("need {needed} MC, have {available}")]
    InsufficientFunds { needed: i32, available: i32 },

    /// Not enough of a non-currency resource.
    #[error("need {needed} {resource}, have {available}")]
    InsufficientResource {
        resource: Resource,
        needed: i32,
        available: i32,
    },

    #[error("requirements of '{0}' are not met")]
    RequirementsNotMet(String),

    /// The chosen coordinate fails the placement rules.
    #[error("cannot place {tile} at ({row}, {col})")]
    InvalidPlacement { tile: TileType, row: usize, col: usize },

    /// No coordinate on the board accepts this tile for this player.
    #[error("no legal space for {0}")]
    NoValidPlacement(TileType),

    /// A suspended move must be completed or cancelled first.
    #[error("a choice is pending for {0}")]
    ChoicePending(String),

    #[error("there is no pending choice to complete")]
    NoPendingChoice,

    /// The completing move does not match the pending choice.
    #[error("pending choice cannot be completed with {0}")]
    WrongCompletion(ActionType),

    #[error("{0} has already completed research")]
    ResearchDone(String),

    #[error("card '{0}' was not offered")]
    CardNotOffered(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Tile and milestone mutations are only applied by the authoritative role.
    #[error("{0} can only be applied by the authoritative participant")]
    NotAuthoritative(ActionType),

    /// System moves are generated by the engine, never submitted.
    #[error("{0} cannot be submitted by a participant")]
    SystemMove(ActionType),

    #[error("placement coordinates are missing")]
    MissingPlacement,

    /// A peer proposed a move for a player it is not bound to.
    #[error("peer bound to {bound} cannot act for {actor}")]
    ActorMismatch { actor: String, bound: String },

    /// A peer proposed a move before joining.
    #[error("peer has not joined as a player")]
    NotJoined,
}

/// Transport failure affecting one peer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NetError {
    /// The peer's channel is closed.
    #[error("peer {0} disconnected")]
    Disconnected(u32),

    /// The host side of the channel is gone.
    #[error("host unreachable")]
    HostUnreachable,

    /// A frame could not be decoded.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("move rejected: {0}")]
    Rejected(#[from] Rejection),

    /// Catalog content names an effect/requirement/metric that has no
    /// registered implementation.
    #[error("unknown {kind} descriptor '{name}' in '{owner}'")]
    UnknownDescriptor {
        kind: &'static str,
        name: String,
        owner: String,
    },

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("network failure: {0}")]
    Network(#[from] NetError),

    /// Saved or logged data could not be decoded or does not replay.
    #[error("corrupt state: {0}")]
    StateCorruption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
