//! The action pipeline: the one place moves are validated and applied.
//!
//! ## Validation order
//!
//! 1. system moves and unknown actors are refused
//! 2. role (tile and milestone mutations need the authoritative side)
//! 3. pending move (only its completion or cancellation is accepted)
//! 4. phase, then turn
//! 5. affordability, with corporation discounts
//! 6. card requirements
//! 7. placement targets
//!
//! ## Atomicity
//!
//! Every move runs against a scratch clone of the state. A rejection drops
//! the clone, so a rejected move never leaves a trace; success swaps the
//! clone in and appends to the log. Claiming a milestone checks and spends
//! inside the same scratch run.
//!
//! ## Two-step moves
//!
//! A tile-placing card, a tile project, a plant conversion and the sell
//! patents project are validated, then parked as the session's pending move.
//! Nothing is spent or logged yet. The completing PlaceTile or SellCards
//! applies both halves and logs them as consecutive entries. CancelPending
//! drops the parked move and logs nothing.

use tracing::{debug, warn};

use super::choice::ChoiceRequest;
use super::dealer::{CardDealer, DrawMode};
use super::phase::{Phase, PhaseController};
use crate::board::{Coord, PlacementValidator, TileType};
use crate::cards::{Card, Catalog, StandardProject};
use crate::core::{
    ActionType, GameConfig, GameState, Move, PendingKind, PendingMove, PlacementSource, Player,
    PlayerId, Resource,
};
use crate::effects::{EffectContext, EffectEngine};
use crate::error::{Error, Rejection, Result};
use crate::history::MoveLog;
use crate::net::SessionContext;

/// Result of an accepted move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Applied and logged.
    Applied,
    /// Parked until the player answers the request.
    Suspended(ChoiceRequest),
    /// The pending move was dropped.
    Cancelled,
}

/// A validated move, executed but not yet committed.
struct Step {
    state: GameState,
    outcome: Outcome,
    dealer: CardDealer,
    /// Pending trigger completed by this move, logged ahead of it.
    trigger: Option<Move>,
}

/// Validates and applies moves against the authoritative state.
pub struct ActionPipeline {
    context: SessionContext,
    state: GameState,
    log: MoveLog,
}

impl ActionPipeline {
    /// Wrap a freshly created state.
    #[must_use]
    pub fn new(context: SessionContext, state: GameState) -> Self {
        Self {
            context,
            state,
            log: MoveLog::new(),
        }
    }

    /// Resume from a saved state and its history.
    #[must_use]
    pub fn resume(context: SessionContext, state: GameState, log: MoveLog) -> Self {
        Self {
            context,
            state,
            log,
        }
    }

    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    /// Give up the state and log.
    #[must_use]
    pub fn into_parts(self) -> (GameState, MoveLog) {
        (self.state, self.log)
    }

    fn config(&self) -> &GameConfig {
        &self.context.config
    }

    fn catalog(&self) -> &Catalog {
        &self.context.catalog
    }

    fn engine(&self) -> &EffectEngine {
        &self.context.engine
    }

    fn phases(&self) -> PhaseController<'_> {
        PhaseController::new(self.config(), self.catalog())
    }

    // === Entry points ===

    /// Deal starting corporations. Call once on a new game.
    pub fn start(&mut self) -> std::result::Result<(), Rejection> {
        let (state, dealer) = self.run_start(DrawMode::Live)?;
        self.commit_deals(state, dealer);
        debug!(players = self.state.player_count(), "game started");
        Ok(())
    }

    /// Validate and apply one move.
    pub fn submit(&mut self, mv: Move) -> std::result::Result<Outcome, Rejection> {
        match self.run(&mv, DrawMode::Live) {
            Ok(step) => {
                debug!(actor = %mv.actor, action = %mv.action, "move accepted");
                let outcome = step.outcome.clone();
                self.commit(mv, step);
                Ok(outcome)
            }
            Err(rejection) => {
                warn!(actor = %mv.actor, action = %mv.action, %rejection, "move rejected");
                Err(rejection)
            }
        }
    }

    /// Replay the game start with recorded deals.
    pub(crate) fn replay_start(&mut self, deals: Vec<Move>) -> Result<()> {
        let (state, dealer) = self
            .run_start(DrawMode::Scripted(deals.into()))
            .map_err(|r| Error::StateCorruption(format!("game start does not replay: {r}")))?;
        check_script(&dealer)?;
        self.commit_deals(state, dealer);
        Ok(())
    }

    /// Replay one logged move with the deals recorded after it.
    pub(crate) fn replay_submit(&mut self, mv: Move, deals: Vec<Move>) -> Result<Outcome> {
        let step = self.run(&mv, DrawMode::Scripted(deals.into())).map_err(|r| {
            Error::StateCorruption(format!("logged {} by {} does not replay: {r}", mv.action, mv.actor))
        })?;
        check_script(&step.dealer)?;
        let outcome = step.outcome.clone();
        self.commit(mv, step);
        Ok(outcome)
    }

    /// The decision `player` owes right now, if any.
    #[must_use]
    pub fn choice_for(&self, player: &str) -> Option<ChoiceRequest> {
        ChoiceRequest::outstanding(&self.state, self.config(), player)
    }

    /// The parked move's request, if a move is parked.
    #[must_use]
    pub fn pending_request(&self) -> Option<ChoiceRequest> {
        let pending = self.state.session.pending.as_ref()?;
        self.choice_for(&pending.trigger.actor)
    }

    // === Execution ===

    fn run_start(&self, mode: DrawMode) -> std::result::Result<(GameState, CardDealer), Rejection> {
        let phase = self.state.phase();
        let dealt = self
            .state
            .session
            .players
            .values()
            .any(|p| p.corporation.is_some() || !p.offered_corporations.is_empty());
        if phase != Phase::CorpSelection || dealt {
            return Err(Rejection::WrongPhase {
                action: ActionType::DealCards,
                phase,
            });
        }

        let mut scratch = self.state.clone();
        let mut dealer = CardDealer::new(mode);
        self.phases().deal_corporations(&mut scratch, &mut dealer);
        Ok((scratch, dealer))
    }

    fn run(&self, mv: &Move, mode: DrawMode) -> std::result::Result<Step, Rejection> {
        if mv.action.is_system() {
            return Err(Rejection::SystemMove(mv.action));
        }
        let seat = self
            .state
            .player_by_name(&mv.actor)
            .ok_or_else(|| Rejection::UnknownPlayer(mv.actor.clone()))?;
        if matches!(mv.action, ActionType::PlaceTile | ActionType::ClaimMilestone)
            && !self.context.role.is_authoritative()
        {
            return Err(Rejection::NotAuthoritative(mv.action));
        }

        let completes = matches!(
            mv.action,
            ActionType::PlaceTile | ActionType::SellCards | ActionType::CancelPending
        );
        let trigger = match &self.state.session.pending {
            Some(pending) if !completes => {
                return Err(Rejection::ChoicePending(pending.trigger.actor.clone()));
            }
            Some(pending) => {
                if pending.actor != seat {
                    return Err(Rejection::NotYourTurn {
                        actor: mv.actor.clone(),
                        current: pending.trigger.actor.clone(),
                    });
                }
                Some(pending.trigger.clone())
            }
            None if completes => return Err(Rejection::NoPendingChoice),
            None => None,
        };
        PhaseController::check_phase(&self.state, mv.action)?;

        let mut state = self.state.clone();
        let mut dealer = CardDealer::new(mode);
        let outcome = self.apply(&mut state, seat, mv, &mut dealer)?;

        let trigger = match outcome {
            Outcome::Applied => trigger,
            Outcome::Suspended(_) | Outcome::Cancelled => None,
        };
        Ok(Step {
            state,
            outcome,
            dealer,
            trigger,
        })
    }

    fn apply(
        &self,
        state: &mut GameState,
        seat: PlayerId,
        mv: &Move,
        dealer: &mut CardDealer,
    ) -> std::result::Result<Outcome, Rejection> {
        match mv.action {
            ActionType::ChooseCorporation => self.choose_corporation(state, seat, &mv.payload, dealer),
            ActionType::BuyCards => self.buy_cards(state, seat, mv),
            ActionType::PlayCard => self.play_card(state, seat, mv, dealer),
            ActionType::UseStandardProject => self.use_project(state, seat, mv, dealer),
            ActionType::ClaimMilestone => self.claim_milestone(state, seat, &mv.payload, dealer),
            ActionType::ConvertHeat => self.convert_heat(state, seat, dealer),
            ActionType::ConvertPlants => self.convert_plants(state, seat, mv),
            ActionType::PassTurn => {
                PhaseController::check_turn(state, seat)?;
                self.phases().pass(state, seat, dealer);
                Ok(Outcome::Applied)
            }
            ActionType::PlaceTile => self.place_tile(state, seat, mv, dealer),
            ActionType::SellCards => self.sell_cards(state, seat, mv, dealer),
            ActionType::CancelPending => {
                state.session.pending = None;
                Ok(Outcome::Cancelled)
            }
            ActionType::DealCards => Err(Rejection::SystemMove(mv.action)),
        }
    }

    fn commit(&mut self, mv: Move, mut step: Step) {
        self.state = step.state;
        if step.outcome == Outcome::Applied {
            if let Some(trigger) = step.trigger.take() {
                self.log.append(trigger);
            }
            self.log.append(mv);
        }
        for deal in step.dealer.take_dealt() {
            self.log.append(deal);
        }
    }

    fn commit_deals(&mut self, state: GameState, mut dealer: CardDealer) {
        self.state = state;
        for deal in dealer.take_dealt() {
            self.log.append(deal);
        }
    }

    // === Setup moves ===

    fn choose_corporation(
        &self,
        state: &mut GameState,
        seat: PlayerId,
        name: &str,
        dealer: &mut CardDealer,
    ) -> std::result::Result<Outcome, Rejection> {
        let player = state.player(seat);
        if player.corporation.is_some() {
            return Err(Rejection::CorporationAlreadyChosen(player.name.clone()));
        }
        let corporation = self
            .catalog()
            .corporation(name)
            .ok_or_else(|| Rejection::UnknownCorporation(name.to_string()))?;
        if !player.offered_corporations.iter().any(|c| c == name) {
            return Err(Rejection::CorporationNotOffered(name.to_string()));
        }

        let player = state.player_mut(seat);
        player.corporation = Some(corporation.name.clone());
        player.resources.add_all(&corporation.opening_resources());
        player.production.add_all(&corporation.opening_production());
        player.offered_corporations.clear();

        self.phases().after_corporation(state, dealer);
        Ok(Outcome::Applied)
    }

    fn buy_cards(
        &self,
        state: &mut GameState,
        seat: PlayerId,
        mv: &Move,
    ) -> std::result::Result<Outcome, Rejection> {
        let player = state.player(seat);
        if player.research_done {
            return Err(Rejection::ResearchDone(player.name.clone()));
        }
        let cards = mv.card_list()?;
        let mut rest = player.offered_cards.clone();
        for card in &cards {
            match rest.iter().position(|c| c == card) {
                Some(i) => {
                    rest.remove(i);
                }
                None => return Err(Rejection::CardNotOffered(card.clone())),
            }
        }
        let cost = cards.len() as i32 * self.config().card_buy_cost;
        afford(player, cost)?;

        let player = state.player_mut(seat);
        player.resources[Resource::MegaCredits] -= cost;
        player.hand.extend(cards);
        player.offered_cards.clear();
        player.research_done = true;
        state.session.discard.extend(rest);

        self.phases().after_research(state);
        Ok(Outcome::Applied)
    }

    // === Actions ===

    fn play_card(
        &self,
        state: &mut GameState,
        seat: PlayerId,
        mv: &Move,
        dealer: &mut CardDealer,
    ) -> std::result::Result<Outcome, Rejection> {
        PhaseController::check_turn(state, seat)?;
        let player = state.player(seat);
        if !player.holds(&mv.payload) {
            return Err(Rejection::CardNotInHand(mv.payload.clone()));
        }
        let card = self
            .catalog()
            .card(&mv.payload)
            .ok_or_else(|| Rejection::UnknownCard(mv.payload.clone()))?;
        afford(player, self.card_cost(player, card))?;
        if !self
            .engine()
            .requirements_met(&card.requirements, player, &state.board)
        {
            return Err(Rejection::RequirementsNotMet(card.name.clone()));
        }

        if let Some(tile) = card.tile_to_place {
            return self.park_placement(state, seat, mv, tile, PlacementSource::Card(card.name.clone()));
        }
        self.resolve_card(state, seat, card, dealer);
        self.phases().record_action(state, seat, dealer);
        Ok(Outcome::Applied)
    }

    fn use_project(
        &self,
        state: &mut GameState,
        seat: PlayerId,
        mv: &Move,
        dealer: &mut CardDealer,
    ) -> std::result::Result<Outcome, Rejection> {
        PhaseController::check_turn(state, seat)?;
        let project = self
            .catalog()
            .project(&mv.payload)
            .ok_or_else(|| Rejection::UnknownProject(mv.payload.clone()))?;
        afford(state.player(seat), self.project_cost(state.player(seat), project))?;

        if project.sells_cards {
            return Ok(self.park(state, seat, mv, PendingKind::CardSale));
        }
        if let Some(tile) = project.tile {
            return self.park_placement(
                state,
                seat,
                mv,
                tile,
                PlacementSource::StandardProject(project.id.clone()),
            );
        }
        self.resolve_project(state, seat, project, dealer);
        self.phases().record_action(state, seat, dealer);
        Ok(Outcome::Applied)
    }

    fn claim_milestone(
        &self,
        state: &mut GameState,
        seat: PlayerId,
        name: &str,
        dealer: &mut CardDealer,
    ) -> std::result::Result<Outcome, Rejection> {
        PhaseController::check_turn(state, seat)?;
        let milestone = self
            .catalog()
            .milestone(name)
            .ok_or_else(|| Rejection::UnknownMilestone(name.to_string()))?;
        if state.board.is_claimed(name) {
            return Err(Rejection::MilestoneClaimed(name.to_string()));
        }
        if state.board.milestones().len() >= crate::board::MILESTONE_CAP {
            return Err(Rejection::MilestoneCapReached(crate::board::MILESTONE_CAP));
        }
        let player = state.player(seat);
        if !self.engine().milestone_reached(milestone, player, &state.board) {
            return Err(Rejection::MilestoneNotReached(name.to_string()));
        }
        let cost = self.config().milestone_cost;
        afford(player, cost)?;

        if !state.board.record_claim(name, seat) {
            return Err(Rejection::MilestoneClaimed(name.to_string()));
        }
        let player = state.player_mut(seat);
        player.resources[Resource::MegaCredits] -= cost;
        player.milestones.push(milestone.name.clone());

        self.phases().record_action(state, seat, dealer);
        Ok(Outcome::Applied)
    }

    fn convert_heat(
        &self,
        state: &mut GameState,
        seat: PlayerId,
        dealer: &mut CardDealer,
    ) -> std::result::Result<Outcome, Rejection> {
        PhaseController::check_turn(state, seat)?;
        let needed = self.config().heat_per_temperature;
        spend_check(state.player(seat), Resource::Heat, needed)?;

        state.player_mut(seat).resources[Resource::Heat] -= needed;
        state.raise_temperature_for(seat);
        self.phases().record_action(state, seat, dealer);
        Ok(Outcome::Applied)
    }

    fn convert_plants(
        &self,
        state: &mut GameState,
        seat: PlayerId,
        mv: &Move,
    ) -> std::result::Result<Outcome, Rejection> {
        PhaseController::check_turn(state, seat)?;
        spend_check(state.player(seat), Resource::Plants, self.config().plants_per_greenery)?;
        self.park_placement(state, seat, mv, TileType::Greenery, PlacementSource::PlantConversion)
    }

    // === Completions ===

    fn place_tile(
        &self,
        state: &mut GameState,
        seat: PlayerId,
        mv: &Move,
        dealer: &mut CardDealer,
    ) -> std::result::Result<Outcome, Rejection> {
        let Some(PendingMove {
            kind: PendingKind::Placement { tile, source },
            ..
        }) = state.session.pending.clone()
        else {
            return Err(Rejection::WrongCompletion(ActionType::PlaceTile));
        };
        let target = mv.placement.ok_or(Rejection::MissingPlacement)?;
        if target.tile != tile {
            return Err(Rejection::InvalidPlacement {
                tile: target.tile,
                row: target.row,
                col: target.col,
            });
        }
        let coord = Coord::new(target.row, target.col);
        PlacementValidator::check(&state.board, seat, tile, coord)?;

        state.session.pending = None;
        match source {
            PlacementSource::Card(name) => {
                let card = self
                    .catalog()
                    .card(&name)
                    .ok_or(Rejection::UnknownCard(name))?;
                state.place_tile_for(seat, coord, tile);
                self.resolve_card(state, seat, card, dealer);
            }
            PlacementSource::StandardProject(id) => {
                let project = self
                    .catalog()
                    .project(&id)
                    .ok_or(Rejection::UnknownProject(id))?;
                state.place_tile_for(seat, coord, tile);
                self.resolve_project(state, seat, project, dealer);
            }
            PlacementSource::PlantConversion => {
                state.player_mut(seat).resources[Resource::Plants] -= self.config().plants_per_greenery;
                state.place_tile_for(seat, coord, tile);
            }
        }

        self.phases().record_action(state, seat, dealer);
        Ok(Outcome::Applied)
    }

    fn sell_cards(
        &self,
        state: &mut GameState,
        seat: PlayerId,
        mv: &Move,
        dealer: &mut CardDealer,
    ) -> std::result::Result<Outcome, Rejection> {
        let Some(PendingMove {
            kind: PendingKind::CardSale,
            trigger,
            ..
        }) = state.session.pending.clone()
        else {
            return Err(Rejection::WrongCompletion(ActionType::SellCards));
        };
        let cards = mv.card_list()?;
        if cards.is_empty() {
            return Err(Rejection::MalformedPayload("no cards selected for sale".to_string()));
        }
        let mut hand = state.player(seat).hand.clone();
        for card in &cards {
            match hand.iter().position(|c| c == card) {
                Some(i) => {
                    hand.remove(i);
                }
                None => return Err(Rejection::CardNotInHand(card.clone())),
            }
        }
        let project = self
            .catalog()
            .project(&trigger.payload)
            .ok_or_else(|| Rejection::UnknownProject(trigger.payload.clone()))?;
        let cost = self.project_cost(state.player(seat), project);
        afford(state.player(seat), cost)?;

        state.session.pending = None;
        let income = cards.len() as i32 * self.config().card_sell_value;
        let player = state.player_mut(seat);
        player.hand = hand;
        player.resources[Resource::MegaCredits] += income - cost;
        state.session.discard.extend(cards);

        self.phases().record_action(state, seat, dealer);
        Ok(Outcome::Applied)
    }

    // === Helpers ===

    fn park(&self, state: &mut GameState, seat: PlayerId, mv: &Move, kind: PendingKind) -> Outcome {
        state.session.pending = Some(PendingMove {
            trigger: mv.clone(),
            actor: seat,
            kind,
        });
        match ChoiceRequest::outstanding(state, self.config(), &mv.actor) {
            Some(request) => Outcome::Suspended(request),
            None => Outcome::Applied,
        }
    }

    fn park_placement(
        &self,
        state: &mut GameState,
        seat: PlayerId,
        mv: &Move,
        tile: TileType,
        source: PlacementSource,
    ) -> std::result::Result<Outcome, Rejection> {
        if !PlacementValidator::any_valid(&state.board, seat, tile) {
            return Err(Rejection::NoValidPlacement(tile));
        }
        Ok(self.park(state, seat, mv, PendingKind::Placement { tile, source }))
    }

    /// Pay for a card, resolve its effects and move it to the played pile.
    fn resolve_card(&self, state: &mut GameState, seat: PlayerId, card: &Card, dealer: &mut CardDealer) {
        let cost = self.card_cost(state.player(seat), card);
        let player = state.player_mut(seat);
        player.resources[Resource::MegaCredits] -= cost;
        player.remove_from_hand(&card.name);

        let mut ctx = EffectContext::new(state, seat, &card.tags, &mut *dealer);
        self.engine().apply(&card.effects, &mut ctx);

        state.player_mut(seat).record_played(&card.name, &card.tags);
    }

    fn resolve_project(
        &self,
        state: &mut GameState,
        seat: PlayerId,
        project: &StandardProject,
        dealer: &mut CardDealer,
    ) {
        let cost = self.project_cost(state.player(seat), project);
        state.player_mut(seat).resources[Resource::MegaCredits] -= cost;

        let mut ctx = EffectContext::new(state, seat, &[], &mut *dealer);
        self.engine().apply(&project.effects, &mut ctx);
    }

    fn card_cost(&self, player: &Player, card: &Card) -> i32 {
        let discount = self.corporation_of(player).map_or(0, |c| c.card_discount(card));
        (card.cost - discount).max(0)
    }

    fn project_cost(&self, player: &Player, project: &StandardProject) -> i32 {
        let discount = self
            .corporation_of(player)
            .map_or(0, |c| c.project_discount(&project.id));
        (project.cost - discount).max(0)
    }

    fn corporation_of(&self, player: &Player) -> Option<&crate::cards::Corporation> {
        player
            .corporation
            .as_deref()
            .and_then(|name| self.catalog().corporation(name))
    }
}

fn afford(player: &Player, cost: i32) -> std::result::Result<(), Rejection> {
    let available = player.megacredits();
    if available < cost {
        return Err(Rejection::InsufficientFunds {
            needed: cost,
            available,
        });
    }
    Ok(())
}

fn spend_check(player: &Player, resource: Resource, needed: i32) -> std::result::Result<(), Rejection> {
    let available = player.resources[resource];
    if available < needed {
        return Err(Rejection::InsufficientResource {
            resource,
            needed,
            available,
        });
    }
    Ok(())
}

fn check_script(dealer: &CardDealer) -> Result<()> {
    if let Some(fault) = dealer.fault() {
        return Err(Error::StateCorruption(fault.to_string()));
    }
    if dealer.unused_script() > 0 {
        return Err(Error::StateCorruption(format!(
            "{} recorded deals were never drawn",
            dealer.unused_script()
        )));
    }
    Ok(())
}
