//! Game rules: phases, the action pipeline, dealing, choices and scoring.
//!
//! [`ActionPipeline`] is the entry point. It validates each submitted move,
//! applies it to a scratch copy of the state, and drives the
//! [`PhaseController`] state machine. Card draws go through a
//! [`CardDealer`], which records every deal as a `DealCards` move so the log
//! replays exactly.

pub mod choice;
pub mod dealer;
pub mod phase;
pub mod pipeline;
pub mod scoring;

pub use choice::{Choice, ChoiceRequest, ChoiceResponder};
pub use dealer::{CardDealer, DealKind, Dealt, DrawMode};
pub use phase::{Phase, PhaseController, ACTIONS_PER_TURN};
pub use pipeline::{ActionPipeline, Outcome};
pub use scoring::{score, score_all, ScoreLine};
