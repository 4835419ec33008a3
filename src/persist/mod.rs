//! Saving and loading games.

pub mod store;
pub mod worker;

pub use store::{FileStore, MemoryStore, SaveStore, SavedGame, HISTORY_FILE, SAVE_FILE};
pub use worker::{SaveReport, SaveWorker};
