//! Replaying recorded games.

mod common;

use common::{autoplay, context, initial_state};
use terraform_engine::core::ActionType;
use terraform_engine::{ActionPipeline, Error, GameState, Move, MoveLog, ReplayEngine, SessionContext};

/// A seeded game played for `moves` submissions, with its starting snapshot.
fn played(seed: u64, names: &[&str], moves: usize) -> (SessionContext, GameState, ActionPipeline) {
    let context = context(seed);
    let initial = initial_state(&context, names);
    let mut pipeline = ActionPipeline::new(context.clone(), initial.clone());
    pipeline.start().unwrap();
    autoplay(&mut pipeline, moves);
    (context, initial, pipeline)
}

fn rebuild(log: &MoveLog, mut f: impl FnMut(usize, Move) -> Option<Move>) -> MoveLog {
    log.iter()
        .cloned()
        .enumerate()
        .filter_map(|(i, mv)| f(i, mv))
        .collect()
}

#[test]
fn test_replay_reproduces_game() {
    let (context, initial, live) = played(3, &["Ada", "Brook"], 150);
    assert!(live.log().len() > 20);

    let replay = ReplayEngine::new(context).replay(initial, live.log()).unwrap();
    assert_eq!(&replay.state, live.state());
    assert_eq!(&replay.log, live.log());
}

#[test]
fn test_replay_ranking_is_stable() {
    let (context, initial, live) = played(8, &["Ada", "Brook", "Cyd"], 200);
    let engine = ReplayEngine::new(context);

    let first = engine.replay(initial.clone(), live.log()).unwrap();
    let second = engine.replay(initial, live.log()).unwrap();
    assert_eq!(first.ranking, second.ranking);
    assert_eq!(first.ranking.len(), 3);
    assert!(first.ranking.windows(2).all(|w| w[0].total >= w[1].total));
}

#[test]
fn test_replay_from_json() {
    let (context, initial, live) = played(4, &["Ada", "Brook"], 80);
    let json = live.log().to_json().unwrap();
    let log = MoveLog::from_json(&json).unwrap();

    let replay = ReplayEngine::new(context).replay(initial, &log).unwrap();
    assert_eq!(&replay.state, live.state());
}

#[test]
fn test_replay_until_stops_between_moves() {
    let (context, initial, live) = played(6, &["Ada", "Brook"], 120);
    let half = live.log().len() / 2;

    let partial = ReplayEngine::new(context)
        .replay_until(initial, live.log(), half)
        .unwrap();
    let replayed = partial.log();
    assert!(replayed.len() <= half);
    for (i, mv) in replayed.iter().enumerate() {
        assert_eq!(Some(mv), live.log().get(i));
    }
    // The next live entry starts a new unit.
    let next = live.log().get(replayed.len()).unwrap();
    assert_ne!(next.action, ActionType::DealCards);
}

#[test]
fn test_empty_log_replays_to_initial() {
    let context = context(2);
    let initial = initial_state(&context, &["Ada", "Brook"]);
    let replay = ReplayEngine::new(context)
        .replay(initial.clone(), &MoveLog::new())
        .unwrap();
    assert_eq!(replay.state, initial);
    assert!(replay.log.is_empty());
}

#[test]
fn test_missing_deal_is_corruption() {
    let (context, initial, live) = played(3, &["Ada", "Brook"], 60);
    // Drop the last deal, one the game recorded after start.
    let last_deal = live
        .log()
        .iter()
        .rposition(|m| m.action == ActionType::DealCards)
        .unwrap();
    let log = rebuild(live.log(), |i, mv| (i != last_deal).then_some(mv));

    assert!(matches!(
        ReplayEngine::new(context).replay(initial, &log),
        Err(Error::StateCorruption(_))
    ));
}

#[test]
fn test_misaddressed_deal_is_corruption() {
    let (context, initial, live) = played(3, &["Ada", "Brook"], 60);
    let log = rebuild(live.log(), |i, mut mv| {
        if i == 0 {
            mv.actor = if mv.actor == "Ada" { "Brook" } else { "Ada" }.to_string();
        }
        Some(mv)
    });

    assert!(matches!(
        ReplayEngine::new(context).replay(initial, &log),
        Err(Error::StateCorruption(_))
    ));
}

#[test]
fn test_illegal_entry_is_corruption() {
    let (context, initial, live) = played(3, &["Ada", "Brook"], 60);
    let mut log = live.log().clone();
    log.append(Move::play_card("Ada", "Not A Card"));

    assert!(matches!(
        ReplayEngine::new(context).replay(initial, &log),
        Err(Error::StateCorruption(_))
    ));
}
