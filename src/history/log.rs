//! The append-only move log.
//!
//! Backed by an `im::Vector`, so cloning a log (for a snapshot, a replay or
//! a save worker) shares structure instead of copying every move. Serializes
//! as a plain JSON array of moves.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::Move;
use crate::error::{Error, Result};

/// Ordered record of every accepted move.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveLog {
    moves: Vector<Move>,
}

impl MoveLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one move. Entries are never edited or removed.
    pub fn append(&mut self, mv: Move) {
        self.moves.push_back(mv);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Move> {
        self.moves.get(index)
    }

    #[must_use]
    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Move> + ExactSizeIterator {
        self.moves.iter()
    }

    /// Encode as a JSON array.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::StateCorruption(e.to_string()))
    }

    /// Decode a JSON array of moves.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::StateCorruption(e.to_string()))
    }
}

impl FromIterator<Move> for MoveLog {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}
