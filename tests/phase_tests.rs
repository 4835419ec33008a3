//! Phase and turn state machine, driven through the pipeline.

mod common;

use common::{actions_game, context, edit, into_actions, started, ADA, BROOK};
use terraform_engine::board::{Coord, TileType};
use terraform_engine::core::{ActionType, Resource};
use terraform_engine::rules::{DealKind, Dealt, Phase};
use terraform_engine::{
    ActionPipeline, Catalog, FirstPlayerPolicy, GameConfig, GameState, Move, PlayerId, Rejection,
    SessionContext,
};

#[test]
fn test_start_deals_corporations() {
    let pipeline = started(context(5), &["Ada", "Brook", "Cyd"]);
    let state = pipeline.state();

    assert_eq!(state.phase(), Phase::CorpSelection);
    for player in state.session.players.values() {
        assert_eq!(player.offered_corporations.len(), 2);
    }
    assert_eq!(pipeline.log().len(), 3);
    let first = Dealt::from_move(pipeline.log().get(0).unwrap()).unwrap();
    assert_eq!(first.kind, DealKind::Corporations);
}

#[test]
fn test_start_only_once() {
    let mut pipeline = started(context(5), &["Ada", "Brook"]);
    assert!(matches!(pipeline.start(), Err(Rejection::WrongPhase { .. })));
}

#[test]
fn test_corporation_choice() {
    let mut pipeline = started(context(5), &["Ada", "Brook"]);
    let offered = pipeline.state().player(ADA).offered_corporations.clone();
    let other = pipeline.state().player(BROOK).offered_corporations[0].clone();

    assert_eq!(
        pipeline.submit(Move::choose_corporation("Ada", "Nobody Inc")),
        Err(Rejection::UnknownCorporation("Nobody Inc".to_string()))
    );
    assert_eq!(
        pipeline.submit(Move::choose_corporation("Ada", &other)),
        Err(Rejection::CorporationNotOffered(other.clone()))
    );

    pipeline.submit(Move::choose_corporation("Ada", &offered[0])).unwrap();
    let corp = pipeline.context().catalog.corporation(&offered[0]).unwrap().clone();
    let ada = pipeline.state().player(ADA);
    assert_eq!(ada.corporation.as_deref(), Some(offered[0].as_str()));
    assert_eq!(ada.megacredits(), corp.opening_resources()[Resource::MegaCredits]);
    assert_eq!(ada.production, corp.opening_production());
    assert!(ada.offered_corporations.is_empty());
    assert_eq!(pipeline.state().phase(), Phase::CorpSelection);

    assert_eq!(
        pipeline.submit(Move::choose_corporation("Ada", &offered[1])),
        Err(Rejection::CorporationAlreadyChosen("Ada".to_string()))
    );
}

#[test]
fn test_research_then_actions() {
    let mut pipeline = started(context(5), &["Ada", "Brook"]);
    for name in ["Ada", "Brook"] {
        let seat = pipeline.state().player_by_name(name).unwrap();
        let corp = pipeline.state().player(seat).offered_corporations[0].clone();
        pipeline.submit(Move::choose_corporation(name, &corp)).unwrap();
    }

    let state = pipeline.state();
    assert_eq!(state.phase(), Phase::Research);
    assert_eq!(state.player(ADA).offered_cards.len(), 10);
    assert!(pipeline.choice_for("Ada").is_some());

    let mc = state.player(ADA).megacredits();
    let offered = state.player(ADA).offered_cards.clone();
    let bought = vec![offered[0].clone(), offered[1].clone()];

    assert_eq!(
        pipeline.submit(Move::buy_cards("Ada", &["Not A Card".to_string()])),
        Err(Rejection::CardNotOffered("Not A Card".to_string()))
    );
    pipeline.submit(Move::buy_cards("Ada", &bought)).unwrap();

    let state = pipeline.state();
    assert_eq!(state.player(ADA).hand, bought);
    assert_eq!(state.player(ADA).megacredits(), mc - 6);
    assert_eq!(state.session.discard.len(), 8);
    assert_eq!(state.phase(), Phase::Research);
    assert!(pipeline.choice_for("Ada").is_none());
    assert_eq!(
        pipeline.submit(Move::buy_cards("Ada", &[])),
        Err(Rejection::ResearchDone("Ada".to_string()))
    );

    pipeline.submit(Move::buy_cards("Brook", &[])).unwrap();
    let state = pipeline.state();
    assert_eq!(state.phase(), Phase::Actions);
    assert_eq!(state.session.current_player, ADA);
    assert_eq!(state.session.actions_taken, 0);
}

#[test]
fn test_production_runs_once_per_generation() {
    let mut pipeline = edit(actions_game(), |s| {
        for seat in [ADA, BROOK] {
            let player = s.player_mut(seat);
            player.resources = Default::default();
            player.production = Default::default();
        }
        let ada = s.player_mut(ADA);
        ada.resources[Resource::Energy] = 3;
        ada.production[Resource::Energy] = 2;
        ada.production[Resource::Heat] = 1;
        ada.production[Resource::MegaCredits] = 4;
    });

    pipeline.submit(Move::pass("Ada")).unwrap();
    assert_eq!(pipeline.state().phase(), Phase::Actions);
    assert_eq!(pipeline.state().session.current_player, BROOK);
    pipeline.submit(Move::pass("Brook")).unwrap();

    let state = pipeline.state();
    let ada = state.player(ADA);
    // Energy became heat before production was added.
    assert_eq!(ada.resources[Resource::Heat], 3 + 1);
    assert_eq!(ada.resources[Resource::Energy], 2);
    assert_eq!(ada.megacredits(), 4 + 20);
    assert_eq!(state.player(BROOK).megacredits(), 20);

    assert_eq!(state.session.generation, 2);
    assert_eq!(state.phase(), Phase::Research);
    assert_eq!(state.player(ADA).offered_cards.len(), 4);
    assert!(!state.player(ADA).research_done);
}

#[test]
fn test_generation_deals_are_logged() {
    let mut pipeline = actions_game();
    pipeline.submit(Move::pass("Ada")).unwrap();
    let before = pipeline.log().len();
    pipeline.submit(Move::pass("Brook")).unwrap();

    let log = pipeline.log();
    assert_eq!(log.len(), before + 3);
    assert_eq!(log.get(before).unwrap().action, ActionType::PassTurn);
    for i in 1..3 {
        let deal = Dealt::from_move(log.get(before + i).unwrap()).unwrap();
        assert_eq!(deal.kind, DealKind::Research);
        assert_eq!(deal.cards.len(), 4);
    }
}

#[test]
fn test_fixed_first_player() {
    let mut pipeline = actions_game();
    pipeline.submit(Move::pass("Ada")).unwrap();
    pipeline.submit(Move::pass("Brook")).unwrap();
    pipeline.submit(Move::buy_cards("Brook", &[])).unwrap();
    pipeline.submit(Move::buy_cards("Ada", &[])).unwrap();

    assert_eq!(pipeline.state().session.current_player, ADA);
}

#[test]
fn test_rotating_first_player() {
    let config = GameConfig::default()
        .with_seed(5)
        .with_first_player_policy(FirstPlayerPolicy::Rotate);
    let context = SessionContext::solo(config, Catalog::builtin().unwrap()).unwrap();
    let mut pipeline = started(context, &["Ada", "Brook", "Cyd"]);
    into_actions(&mut pipeline);

    for name in ["Ada", "Brook", "Cyd"] {
        pipeline.submit(Move::pass(name)).unwrap();
    }
    for name in ["Ada", "Brook", "Cyd"] {
        pipeline.submit(Move::buy_cards(name, &[])).unwrap();
    }

    assert_eq!(pipeline.state().session.first_player, PlayerId::new(1));
    assert_eq!(pipeline.state().session.current_player, PlayerId::new(1));
}

#[test]
fn test_pass_skips_passed_players() {
    let mut pipeline = started(context(5), &["Ada", "Brook", "Cyd"]);
    into_actions(&mut pipeline);

    pipeline.submit(Move::pass("Ada")).unwrap();
    pipeline.submit(Move::pass("Brook")).unwrap();
    assert_eq!(pipeline.state().session.current_player, PlayerId::new(2));
    assert!(matches!(
        pipeline.submit(Move::pass("Ada")),
        Err(Rejection::AlreadyPassed(_))
    ));
}

/// A game whose global parameters are all at maximum.
fn final_generation_game() -> ActionPipeline {
    edit(actions_game(), |s| {
        while s.board.raise_temperature() {}
        while s.board.raise_oxygen() {}
        let oceans: Vec<Coord> = s.board.ocean_coords().collect();
        for coord in oceans {
            s.place_tile_for(BROOK, coord, TileType::Ocean);
        }
        assert!(s.board.is_final_generation());
    })
}

#[test]
fn test_final_greenery_then_game_over() {
    let mut pipeline = final_generation_game();
    pipeline.submit(Move::pass("Ada")).unwrap();
    pipeline.submit(Move::pass("Brook")).unwrap();
    assert_eq!(pipeline.state().phase(), Phase::FinalGreenery);
    assert_eq!(pipeline.state().session.current_player, ADA);

    let plants = pipeline.state().player(ADA).resources[Resource::Plants];
    let mut pipeline = edit(pipeline, |s| {
        s.player_mut(ADA).resources[Resource::Plants] = plants.max(8);
    });

    assert!(matches!(
        pipeline.submit(Move::convert_heat("Ada")),
        Err(Rejection::WrongPhase { .. })
    ));

    let request = match pipeline.submit(Move::convert_plants("Ada")).unwrap() {
        terraform_engine::Outcome::Suspended(request) => request,
        other => panic!("expected a tile request, got {other:?}"),
    };
    pipeline.submit(common::answer(request)).unwrap();
    assert_eq!(pipeline.state().board.count_owned(ADA, TileType::Greenery), 1);
    // No action cap in the final round.
    assert_eq!(pipeline.state().session.current_player, ADA);

    pipeline.submit(Move::pass("Ada")).unwrap();
    pipeline.submit(Move::pass("Brook")).unwrap();

    let state = pipeline.state();
    assert_eq!(state.phase(), Phase::GameOver);
    let scores = state.session.final_scores.as_ref().unwrap();
    assert_eq!(scores.len(), 2);
    assert!(scores[0].total >= scores[1].total);
}

#[test]
fn test_no_moves_after_game_over() {
    let mut pipeline = final_generation_game();
    for name in ["Ada", "Brook", "Ada", "Brook"] {
        pipeline.submit(Move::pass(name)).unwrap();
    }
    assert_eq!(pipeline.state().phase(), Phase::GameOver);
    assert!(matches!(
        pipeline.submit(Move::pass("Ada")),
        Err(Rejection::WrongPhase { .. })
    ));
}

#[test]
fn test_state_snapshot_survives_blob() {
    let pipeline = actions_game();
    let blob = pipeline.state().to_blob().unwrap();
    assert_eq!(&GameState::from_blob(&blob).unwrap(), pipeline.state());
}
