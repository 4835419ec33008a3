//! Save stores.
//!
//! A save is two artifacts: the encoded `GameState` blob and the move
//! history as a JSON array. [`FileStore`] keeps them at two well-known
//! paths; [`MemoryStore`] keeps them in memory.
//!
//! Each artifact is written whole, but the pair is not written atomically.
//! The snapshot file therefore carries the length of the history it was
//! taken with, and a load whose history disagrees is refused. A crash
//! between the two writes leaves a detectable mismatch rather than a
//! state that silently disagrees with its log.
//!
//! Loading never touches live state. A caller that gets
//! `Error::StateCorruption` back still holds whatever it had before.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::GameState;
use crate::error::{Error, Result};
use crate::history::MoveLog;
use crate::net::SessionContext;
use crate::rules::ActionPipeline;

/// Default snapshot file name.
pub const SAVE_FILE: &str = "savegame.bin";

/// Default history file name.
pub const HISTORY_FILE: &str = "move_history.json";

/// A state together with the log that produced it.
#[derive(Clone, Debug)]
pub struct SavedGame {
    pub state: GameState,
    pub log: MoveLog,
}

impl SavedGame {
    #[must_use]
    pub fn new(state: GameState, log: MoveLog) -> Self {
        Self { state, log }
    }

    /// Capture a running pipeline.
    #[must_use]
    pub fn of(pipeline: &ActionPipeline) -> Self {
        Self::new(pipeline.state().clone(), pipeline.log().clone())
    }

    /// Continue playing from this save.
    #[must_use]
    pub fn resume(self, context: SessionContext) -> ActionPipeline {
        ActionPipeline::resume(context, self.state, self.log)
    }

    fn encode(&self) -> Result<(Vec<u8>, String)> {
        let stamped = StampedSnapshot {
            moves: self.log.len() as u64,
            state: self.state.to_blob()?,
        };
        let blob = bincode::serialize(&stamped).map_err(|e| Error::StateCorruption(e.to_string()))?;
        Ok((blob, self.log.to_json()?))
    }

    fn decode(blob: &[u8], history: &str) -> Result<Self> {
        let stamped: StampedSnapshot =
            bincode::deserialize(blob).map_err(|e| Error::StateCorruption(e.to_string()))?;
        let log = MoveLog::from_json(history)?;
        if stamped.moves != log.len() as u64 {
            warn!(snapshot = stamped.moves, history = log.len(), "save halves disagree");
            return Err(Error::StateCorruption(format!(
                "snapshot was taken after {} moves but the history holds {}",
                stamped.moves,
                log.len()
            )));
        }
        Ok(Self::new(GameState::from_blob(&stamped.state)?, log))
    }
}

/// On-disk snapshot: the state blob plus the history length it matches.
#[derive(Serialize, Deserialize)]
struct StampedSnapshot {
    moves: u64,
    state: Vec<u8>,
}

/// Where saves go.
pub trait SaveStore: Send {
    /// Replace the stored save.
    fn save(&mut self, game: &SavedGame) -> Result<()>;

    /// The stored save, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<SavedGame>>;
}

/// Files in one directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    state_path: PathBuf,
    history_path: PathBuf,
}

impl FileStore {
    /// Store using the default file names inside `dir`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            state_path: dir.as_ref().join(SAVE_FILE),
            history_path: dir.as_ref().join(HISTORY_FILE),
        }
    }

    /// Override both file paths (builder pattern).
    #[must_use]
    pub fn with_paths(mut self, state: impl Into<PathBuf>, history: impl Into<PathBuf>) -> Self {
        self.state_path = state.into();
        self.history_path = history.into();
        self
    }

    #[must_use]
    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    #[must_use]
    pub fn history_path(&self) -> &Path {
        &self.history_path
    }
}

/// Write through a temporary sibling so readers never see half a file.
fn write_whole(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

impl SaveStore for FileStore {
    fn save(&mut self, game: &SavedGame) -> Result<()> {
        let (blob, history) = game.encode()?;
        write_whole(&self.state_path, &blob)?;
        write_whole(&self.history_path, history.as_bytes())?;
        debug!(path = %self.state_path.display(), moves = game.log.len(), "game saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<SavedGame>> {
        match (self.state_path.exists(), self.history_path.exists()) {
            (false, false) => return Ok(None),
            (true, true) => {}
            _ => {
                return Err(Error::StateCorruption(
                    "save is missing its snapshot or its history".to_string(),
                ))
            }
        }
        let blob = fs::read(&self.state_path)?;
        let history = fs::read_to_string(&self.history_path)
            .map_err(|e| Error::StateCorruption(format!("{}: {e}", self.history_path.display())))?;
        SavedGame::decode(&blob, &history).map(Some)
    }
}

/// In-memory store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    blob: Option<Vec<u8>>,
    history: Option<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw artifacts directly, bypassing encoding.
    #[must_use]
    pub fn with_raw(blob: Vec<u8>, history: impl Into<String>) -> Self {
        Self {
            blob: Some(blob),
            history: Some(history.into()),
        }
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, game: &SavedGame) -> Result<()> {
        let (blob, history) = game.encode()?;
        self.blob = Some(blob);
        self.history = Some(history);
        Ok(())
    }

    fn load(&self) -> Result<Option<SavedGame>> {
        match (&self.blob, &self.history) {
            (Some(blob), Some(history)) => SavedGame::decode(blob, history).map(Some),
            _ => Ok(None),
        }
    }
}
