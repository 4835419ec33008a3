//! Shared setup for integration tests.

#![allow(dead_code)]

use terraform_engine::core::Resource;
use terraform_engine::history::MoveLog;
use terraform_engine::rules::{ActionPipeline, Choice, ChoiceRequest, Outcome, Phase};
use terraform_engine::{Catalog, GameConfig, GameState, Move, PlayerId, Role, SessionContext};

pub const ADA: PlayerId = PlayerId::new(0);
pub const BROOK: PlayerId = PlayerId::new(1);

pub fn config(seed: u64) -> GameConfig {
    GameConfig::default().with_seed(seed)
}

pub fn context(seed: u64) -> SessionContext {
    SessionContext::solo(config(seed), Catalog::builtin().unwrap()).unwrap()
}

pub fn initial_state(context: &SessionContext, names: &[&str]) -> GameState {
    GameState::new(&context.config, &context.catalog, names).unwrap()
}

/// A started game: corporations dealt.
pub fn started(context: SessionContext, names: &[&str]) -> ActionPipeline {
    let state = initial_state(&context, names);
    let mut pipeline = ActionPipeline::new(context, state);
    pipeline.start().unwrap();
    pipeline
}

/// Everyone takes their first offered corporation and buys nothing.
pub fn into_actions(pipeline: &mut ActionPipeline) {
    let names = player_names(pipeline.state());
    for name in &names {
        let seat = pipeline.state().player_by_name(name).unwrap();
        let corp = pipeline.state().player(seat).offered_corporations[0].clone();
        pipeline.submit(Move::choose_corporation(name.as_str(), &corp)).unwrap();
    }
    for name in &names {
        pipeline.submit(Move::buy_cards(name.as_str(), &[])).unwrap();
    }
    assert_eq!(pipeline.state().phase(), Phase::Actions);
}

/// Two-player game in ACTIONS, Ada to move.
pub fn actions_game() -> ActionPipeline {
    let mut pipeline = started(context(11), &["Ada", "Brook"]);
    into_actions(&mut pipeline);
    pipeline
}

/// Edit the state of a running pipeline.
pub fn edit(pipeline: ActionPipeline, f: impl FnOnce(&mut GameState)) -> ActionPipeline {
    let context = pipeline.context().clone();
    let (mut state, log) = pipeline.into_parts();
    f(&mut state);
    ActionPipeline::resume(context, state, log)
}

/// Same game under another role.
pub fn as_role(pipeline: ActionPipeline, role: Role) -> ActionPipeline {
    let context = pipeline.context().as_role(role);
    let (state, log) = pipeline.into_parts();
    ActionPipeline::resume(context, state, log)
}

/// Give a player a hand, MC and a corporation without discounts.
pub fn prepare(state: &mut GameState, seat: PlayerId, mc: i32, hand: &[&str]) {
    let player = state.player_mut(seat);
    player.corporation = Some("Credicor".to_string());
    player.resources[Resource::MegaCredits] = mc;
    player.hand = hand.iter().map(|c| c.to_string()).collect();
}

pub fn player_names(state: &GameState) -> Vec<String> {
    state.session.players.values().map(|p| p.name.clone()).collect()
}

pub fn empty_log() -> MoveLog {
    MoveLog::new()
}

/// Answer a request the simplest legal way.
pub fn answer(request: ChoiceRequest) -> Move {
    let choice = match &request {
        ChoiceRequest::Tile { candidates, .. } => Choice::Tile(candidates[0]),
        ChoiceRequest::BuyCards { offered, .. } => Choice::Cards(offered.iter().take(2).cloned().collect()),
        ChoiceRequest::SellCards { hand, .. } => Choice::Cards(hand.iter().take(1).cloned().collect()),
    };
    request.responder().respond(choice).unwrap()
}

/// Play a deterministic game for up to `max_moves` submissions.
///
/// Research buys up to two affordable cards. On a turn, the current player
/// plays the first card that is accepted (placing any tile on the first
/// candidate), otherwise raises temperature with spare heat, otherwise
/// passes.
pub fn autoplay(pipeline: &mut ActionPipeline, max_moves: usize) {
    let mut submitted = 0;
    while submitted < max_moves && pipeline.state().phase() != Phase::GameOver {
        submitted += 1;
        let state = pipeline.state();

        if state.phase() == Phase::Research {
            let name = player_names(state)
                .into_iter()
                .find(|n| pipeline.choice_for(n).is_some())
                .unwrap();
            let seat = state.player_by_name(&name).unwrap();
            let player = state.player(seat);
            let affordable = (player.resources[Resource::MegaCredits] / 3).clamp(0, 2) as usize;
            let cards: Vec<String> = player.offered_cards.iter().take(affordable).cloned().collect();
            pipeline.submit(Move::buy_cards(name.as_str(), &cards)).unwrap();
            continue;
        }

        let name = state.current_player_name().to_string();
        let seat = state.session.current_player;
        let hand = state.player(seat).hand.clone();
        let heat = state.player(seat).resources[Resource::Heat];

        let mut acted = false;
        if state.phase() == Phase::Actions {
            for card in &hand {
                match pipeline.submit(Move::play_card(name.as_str(), card)) {
                    Ok(Outcome::Suspended(request)) => {
                        pipeline.submit(answer(request)).unwrap();
                        acted = true;
                        break;
                    }
                    Ok(_) => {
                        acted = true;
                        break;
                    }
                    Err(_) => {}
                }
            }
            if !acted && heat >= 8 {
                acted = pipeline.submit(Move::convert_heat(name.as_str())).is_ok();
            }
        }
        if !acted {
            pipeline.submit(Move::pass(name.as_str())).unwrap();
        }
    }
}
