//! Move history: the append-only log and deterministic replay.

pub mod log;
pub mod replay;

pub use log::MoveLog;
pub use replay::{Replay, ReplayEngine};
