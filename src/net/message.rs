//! Wire frames exchanged between host and mirrors.
//!
//! ## Flow
//!
//! ```text
//! mirror                         host
//!   |-- Join { player } --------->|
//!   |<-------------- Snapshot ----|  (or JoinRefused)
//!   |-- Propose(Move) ----------->|
//!   |<-------------- Snapshot ----|  to every peer, on success
//!   |<-------------- Rejected ----|  to the proposer only, on failure
//! ```
//!
//! Frames are `bincode`-encoded. A snapshot carries the whole `GameState`
//! as one opaque blob, so it is delivered entirely or not at all.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, Move};
use crate::error::{NetError, Rejection, Result};

/// One frame on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireMessage {
    /// Mirror asks to act for a seated player.
    Join { player: String },
    /// Host refused the join.
    JoinRefused { player: String, reason: String },
    /// Mirror proposes a move.
    Propose(Move),
    /// Full encoded `GameState`.
    Snapshot(Vec<u8>),
    /// The proposer's move failed validation.
    Rejected { actor: String, reason: Rejection },
}

impl WireMessage {
    /// Snapshot frame for `state`.
    pub fn snapshot(state: &GameState) -> Result<Self> {
        Ok(WireMessage::Snapshot(state.to_blob()?))
    }

    pub fn encode(&self) -> std::result::Result<Vec<u8>, NetError> {
        bincode::serialize(self).map_err(|e| NetError::MalformedFrame(e.to_string()))
    }

    pub fn decode(frame: &[u8]) -> std::result::Result<Self, NetError> {
        bincode::deserialize(frame).map_err(|e| NetError::MalformedFrame(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_survives_the_wire() {
        let msg = WireMessage::Rejected {
            actor: "Ada".to_string(),
            reason: Rejection::InsufficientFunds {
                needed: 25,
                available: 4,
            },
        };
        let frame = msg.encode().unwrap();
        assert_eq!(WireMessage::decode(&frame).unwrap(), msg);
    }

    #[test]
    fn test_garbage_frame() {
        assert!(matches!(
            WireMessage::decode(&[0xff, 0xff, 0xff, 0xff, 0x01]),
            Err(NetError::MalformedFrame(_))
        ));
    }
}
