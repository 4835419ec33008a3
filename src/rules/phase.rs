//! The phase and turn state machine.
//!
//! ```text
//! CORP_SELECTION -> RESEARCH -> ACTIONS -> PRODUCTION -+-> RESEARCH (next generation)
//!                                                      +-> FINAL_GREENERY -> GAME_OVER
//! ```
//!
//! ## Turn order
//!
//! ACTIONS starts at the generation's first player. A player takes at most
//! two actions per turn; the second one passes them automatically. Passing
//! hands the turn to the next seat that has not passed, cyclically. When
//! everyone has passed, production runs exactly once and the next phase
//! begins.
//!
//! FINAL_GREENERY reuses the same order with no action cap.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dealer::{CardDealer, DealKind};
use super::scoring;
use crate::cards::Catalog;
use crate::core::{ActionType, FirstPlayerPolicy, GameConfig, GameState, PlayerId, Resource};
use crate::error::Rejection;

/// Actions per turn before the automatic pass.
pub const ACTIONS_PER_TURN: u8 = 2;

/// Game phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    CorpSelection,
    Research,
    Actions,
    Production,
    FinalGreenery,
    GameOver,
}

impl Phase {
    /// Whether a move type may be submitted in this phase.
    ///
    /// Completions (PlaceTile, SellCards, CancelPending) are checked against
    /// the pending move instead and are accepted wherever one can exist.
    #[must_use]
    pub fn allows(self, action: ActionType) -> bool {
        use ActionType::*;
        match action {
            ChooseCorporation => self == Phase::CorpSelection,
            BuyCards => self == Phase::Research,
            PlayCard | UseStandardProject | ClaimMilestone | ConvertHeat => self == Phase::Actions,
            ConvertPlants | PassTurn | PlaceTile | SellCards | CancelPending => {
                matches!(self, Phase::Actions | Phase::FinalGreenery)
            }
            DealCards => true,
        }
    }

    /// Phases with a current player.
    #[must_use]
    pub fn is_turn_based(self) -> bool {
        matches!(self, Phase::Actions | Phase::FinalGreenery)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::CorpSelection => "CORP_SELECTION",
            Phase::Research => "RESEARCH",
            Phase::Actions => "ACTIONS",
            Phase::Production => "PRODUCTION",
            Phase::FinalGreenery => "FINAL_GREENERY",
            Phase::GameOver => "GAME_OVER",
        };
        f.write_str(name)
    }
}

/// Drives phase transitions and turn order.
///
/// Holds read-only references to the configuration and catalog; all state
/// lives in the `GameState` passed to each call.
pub struct PhaseController<'a> {
    config: &'a GameConfig,
    catalog: &'a Catalog,
}

impl<'a> PhaseController<'a> {
    #[must_use]
    pub fn new(config: &'a GameConfig, catalog: &'a Catalog) -> Self {
        Self { config, catalog }
    }

    // === Checks ===

    /// Reject a move type that the current phase does not accept.
    pub fn check_phase(state: &GameState, action: ActionType) -> Result<(), Rejection> {
        let phase = state.phase();
        if phase.allows(action) {
            Ok(())
        } else {
            Err(Rejection::WrongPhase { action, phase })
        }
    }

    /// Reject a turn-based move from anyone but the current, unpassed player.
    pub fn check_turn(state: &GameState, seat: PlayerId) -> Result<(), Rejection> {
        let session = &state.session;
        if session.passed.contains(&seat) {
            return Err(Rejection::AlreadyPassed(state.player(seat).name.clone()));
        }
        if session.current_player != seat {
            return Err(Rejection::NotYourTurn {
                actor: state.player(seat).name.clone(),
                current: state.current_player_name().to_string(),
            });
        }
        Ok(())
    }

    // === Transitions ===

    /// Deal corporations to every seat. Called once at game start.
    pub fn deal_corporations(&self, state: &mut GameState, dealer: &mut CardDealer) {
        for seat in state.session.players.player_ids().collect::<Vec<_>>() {
            let offered = dealer.deal(state, seat, DealKind::Corporations, self.config.corporations_dealt);
            state.player_mut(seat).offered_corporations = offered;
        }
    }

    /// After a corporation is chosen: start research once everyone has one.
    pub fn after_corporation(&self, state: &mut GameState, dealer: &mut CardDealer) {
        if state.session.players.values().all(|p| p.corporation.is_some()) {
            self.enter_research(state, dealer);
        }
    }

    /// After a research purchase: start actions once everyone has bought.
    pub fn after_research(&self, state: &mut GameState) {
        if state.session.players.values().all(|p| p.research_done) {
            self.enter_turns(state, Phase::Actions);
        }
    }

    /// Count one action for `seat`; the last allowed action passes them.
    pub fn record_action(&self, state: &mut GameState, seat: PlayerId, dealer: &mut CardDealer) {
        if state.phase() != Phase::Actions {
            return;
        }
        state.session.actions_taken += 1;
        if state.session.actions_taken >= ACTIONS_PER_TURN {
            debug!(player = %state.player(seat).name, "action limit reached, passing");
            self.pass(state, seat, dealer);
        }
    }

    /// Mark `seat` as passed and hand the turn on, or close the phase.
    pub fn pass(&self, state: &mut GameState, seat: PlayerId, dealer: &mut CardDealer) {
        let session = &mut state.session;
        session.passed.insert(seat);
        session.actions_taken = 0;

        let count = session.players.player_count();
        if session.passed.len() >= count {
            let phase = session.phase;
            match phase {
                Phase::Actions => self.run_production(state, dealer),
                Phase::FinalGreenery => self.finish(state),
                _ => {}
            }
            return;
        }

        let mut next = seat.next(count);
        while session.passed.contains(&next) {
            next = next.next(count);
        }
        session.current_player = next;
    }

    fn enter_research(&self, state: &mut GameState, dealer: &mut CardDealer) {
        self.set_phase(state, Phase::Research);
        let count = if state.session.generation == 1 {
            self.config.initial_research_cards
        } else {
            self.config.research_cards
        };
        for seat in state.session.players.player_ids().collect::<Vec<_>>() {
            let offered = dealer.deal(state, seat, DealKind::Research, count);
            let player = state.player_mut(seat);
            player.offered_cards = offered;
            player.research_done = false;
        }
    }

    /// Start a turn-based phase at the first player.
    fn enter_turns(&self, state: &mut GameState, phase: Phase) {
        self.set_phase(state, phase);
        let session = &mut state.session;
        session.passed.clear();
        session.actions_taken = 0;
        session.current_player = session.first_player;
    }

    /// Apply production once, then open the next phase.
    fn run_production(&self, state: &mut GameState, dealer: &mut CardDealer) {
        self.set_phase(state, Phase::Production);
        for (_, player) in state.session.players.iter_mut() {
            let energy = player.resources[Resource::Energy];
            player.resources[Resource::Heat] += energy;
            player.resources[Resource::Energy] = 0;
            let production = player.production;
            player.resources.add_all(&production);
            player.resources[Resource::MegaCredits] += player.terraform_rating;
        }

        if state.board.is_final_generation() {
            self.enter_turns(state, Phase::FinalGreenery);
            return;
        }

        let session = &mut state.session;
        session.generation += 1;
        if self.config.first_player_policy == FirstPlayerPolicy::Rotate {
            session.first_player = session.first_player.next(session.players.player_count());
        }
        self.enter_research(state, dealer);
    }

    fn finish(&self, state: &mut GameState) {
        self.set_phase(state, Phase::GameOver);
        state.session.final_scores = Some(scoring::score_all(state, self.catalog, self.config));
    }

    fn set_phase(&self, state: &mut GameState, phase: Phase) {
        debug!(from = %state.session.phase, to = %phase, generation = state.session.generation, "phase transition");
        state.session.phase = phase;
    }
}
