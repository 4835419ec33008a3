//! Host and mirror sessions over in-process channels.

mod common;

use terraform_engine::net::{PeerId, Transport};
use terraform_engine::rules::Phase;
use terraform_engine::{
    ActionPipeline, ChannelTransport, Error, HostSession, MirrorEvent, MirrorSession, Move,
    Rejection, Role, SessionContext, WireMessage,
};

struct Table {
    host: HostSession,
    brook: MirrorSession,
    cyd: MirrorSession,
}

fn host_context() -> SessionContext {
    common::context(21).as_role(Role::Host).with_local_player("Ada")
}

fn mirror(host: &mut HostSession, name: &str) -> MirrorSession {
    let id = PeerId(host.connected_peers().count() as u32 + 1);
    let (host_end, mirror_end) = ChannelTransport::pair(id);
    assert_eq!(host.connect(Box::new(host_end)), id);
    let context = host_context().as_role(Role::Client).with_local_player(name);
    MirrorSession::new(context, Box::new(mirror_end)).unwrap()
}

fn table() -> Table {
    let context = host_context();
    let state = common::initial_state(&context, &["Ada", "Brook", "Cyd"]);
    let mut host = HostSession::new(ActionPipeline::new(context, state)).unwrap();
    let mut brook = mirror(&mut host, "Brook");
    let mut cyd = mirror(&mut host, "Cyd");

    brook.join().unwrap();
    cyd.join().unwrap();
    assert_eq!(host.poll(), 2);
    assert_eq!(brook.poll().unwrap(), vec![MirrorEvent::Updated]);
    assert_eq!(cyd.poll().unwrap(), vec![MirrorEvent::Updated]);

    host.start().unwrap();
    brook.poll().unwrap();
    cyd.poll().unwrap();
    Table { host, brook, cyd }
}

#[test]
fn test_join_binds_players() {
    let table = table();
    assert_eq!(table.host.bound_player(PeerId(1)), Some("Brook"));
    assert_eq!(table.host.bound_player(PeerId(2)), Some("Cyd"));
    assert_eq!(table.brook.state(), Some(table.host.state()));
    assert_eq!(table.brook.state().unwrap().phase(), Phase::CorpSelection);
}

#[test]
fn test_proposal_updates_every_mirror() {
    let mut t = table();
    let corp = t.brook.state().unwrap().player(common::BROOK).offered_corporations[0].clone();

    t.brook.propose(Move::choose_corporation("Brook", &corp)).unwrap();
    assert_eq!(t.host.poll(), 1);

    assert_eq!(t.brook.poll().unwrap(), vec![MirrorEvent::Updated]);
    assert_eq!(t.cyd.poll().unwrap(), vec![MirrorEvent::Updated]);
    let host_state = t.host.state();
    assert_eq!(t.brook.state(), Some(host_state));
    assert_eq!(t.cyd.state(), Some(host_state));
    assert_eq!(
        host_state.player(common::BROOK).corporation.as_deref(),
        Some(corp.as_str())
    );
}

#[test]
fn test_rejection_goes_to_proposer_only() {
    let mut t = table();
    let snapshots = t.brook.snapshots();

    t.cyd.propose(Move::pass("Cyd")).unwrap();
    t.host.poll();

    assert!(matches!(
        t.cyd.poll().unwrap().as_slice(),
        [MirrorEvent::Rejected(Rejection::WrongPhase { .. })]
    ));
    assert!(t.brook.poll().unwrap().is_empty());
    assert_eq!(t.brook.snapshots(), snapshots);
}

#[test]
fn test_cannot_act_for_another_player() {
    let mut t = table();
    let before = t.host.state().clone();
    let corp = t.cyd.state().unwrap().player(common::BROOK).offered_corporations[0].clone();

    t.cyd.propose(Move::choose_corporation("Brook", &corp)).unwrap();
    t.host.poll();

    assert_eq!(
        t.cyd.poll().unwrap(),
        vec![MirrorEvent::Rejected(Rejection::ActorMismatch {
            actor: "Brook".to_string(),
            bound: "Cyd".to_string()
        })]
    );
    assert_eq!(t.host.state(), &before);
}

#[test]
fn test_join_refusals() {
    let mut t = table();
    let mut extra = mirror(&mut t.host, "Brook");
    let mut stranger = mirror(&mut t.host, "Zed");
    let mut host_seat = mirror(&mut t.host, "Ada");

    extra.join().unwrap();
    stranger.join().unwrap();
    host_seat.join().unwrap();
    t.host.poll();

    assert!(matches!(extra.poll().unwrap().as_slice(), [MirrorEvent::JoinRefused(_)]));
    assert!(matches!(stranger.poll().unwrap().as_slice(), [MirrorEvent::JoinRefused(_)]));
    assert!(matches!(host_seat.poll().unwrap().as_slice(), [MirrorEvent::JoinRefused(_)]));
}

#[test]
fn test_propose_before_join() {
    let mut t = table();
    let mut late = mirror(&mut t.host, "Ada");
    late.propose(Move::pass("Ada")).unwrap();
    t.host.poll();

    assert_eq!(
        late.poll().unwrap(),
        vec![MirrorEvent::Rejected(Rejection::NotJoined)]
    );
}

#[test]
fn test_lost_peer_does_not_stop_host() {
    let mut t = table();
    drop(t.cyd);

    let corp = t.host.state().player(common::ADA).offered_corporations[0].clone();
    t.host.submit_local(Move::choose_corporation("Ada", &corp)).unwrap();

    assert_eq!(t.host.connected_peers().collect::<Vec<_>>(), vec![PeerId(1)]);
    assert_eq!(t.brook.poll().unwrap(), vec![MirrorEvent::Updated]);
    assert_eq!(t.brook.state(), Some(t.host.state()));
}

#[test]
fn test_lost_player_cannot_rejoin() {
    let mut t = table();
    drop(t.cyd);
    t.host.broadcast();
    assert_eq!(t.host.connected_peers().count(), 1);

    let (host_end, mirror_end) = ChannelTransport::pair(PeerId(3));
    assert_eq!(t.host.connect(Box::new(host_end)), PeerId(3));
    let context = host_context().as_role(Role::Client).with_local_player("Cyd");
    let mut again = MirrorSession::new(context, Box::new(mirror_end)).unwrap();
    again.join().unwrap();
    t.host.poll();
    assert!(matches!(again.poll().unwrap().as_slice(), [MirrorEvent::JoinRefused(_)]));
}

#[test]
fn test_host_gone() {
    let mut t = table();
    drop(t.host);
    assert!(matches!(
        t.brook.propose(Move::pass("Brook")),
        Err(Error::Network(_))
    ));
    assert!(matches!(t.cyd.poll(), Err(Error::Network(_))));
}

#[test]
fn test_frames_before_host_loss_are_reported() {
    let (host_end, mirror_end) = ChannelTransport::pair(PeerId(1));
    let context = host_context().as_role(Role::Client).with_local_player("Brook");
    let mut mirror = MirrorSession::new(context, Box::new(mirror_end)).unwrap();

    let state = common::initial_state(&host_context(), &["Ada", "Brook"]);
    let reason = Rejection::AlreadyPassed("Brook".to_string());
    host_end
        .send(WireMessage::snapshot(&state).unwrap().encode().unwrap())
        .unwrap();
    host_end
        .send(
            WireMessage::Rejected {
                actor: "Brook".to_string(),
                reason: reason.clone(),
            }
            .encode()
            .unwrap(),
        )
        .unwrap();
    drop(host_end);

    assert_eq!(
        mirror.poll().unwrap(),
        vec![MirrorEvent::Updated, MirrorEvent::Rejected(reason)]
    );
    assert_eq!(mirror.state(), Some(&state));
    assert!(matches!(mirror.poll(), Err(Error::Network(_))));
}

#[test]
fn test_garbage_frames_are_dropped() {
    let context = host_context();
    let state = common::initial_state(&context, &["Ada", "Brook"]);
    let mut host = HostSession::new(ActionPipeline::new(context, state)).unwrap();
    let (host_end, mirror_end) = ChannelTransport::pair(PeerId(1));
    host.connect(Box::new(host_end));
    let before = host.state().clone();

    mirror_end.send(vec![0xde, 0xad]).unwrap();
    assert_eq!(host.poll(), 1);
    assert_eq!(host.state(), &before);
    assert_eq!(host.connected_peers().count(), 1);
}

#[test]
fn test_corrupt_snapshot_keeps_last_state() {
    let (host_end, mirror_end) = ChannelTransport::pair(PeerId(1));
    let context = host_context().as_role(Role::Client).with_local_player("Brook");
    let mut mirror = MirrorSession::new(context, Box::new(mirror_end)).unwrap();

    let state = common::initial_state(&host_context(), &["Ada", "Brook"]);
    host_end
        .send(WireMessage::snapshot(&state).unwrap().encode().unwrap())
        .unwrap();
    host_end
        .send(WireMessage::Snapshot(vec![9, 9, 9]).encode().unwrap())
        .unwrap();

    assert_eq!(mirror.poll().unwrap(), vec![MirrorEvent::Updated]);
    assert_eq!(mirror.state(), Some(&state));
    assert_eq!(mirror.snapshots(), 1);
}

#[test]
fn test_roles_are_enforced() {
    let context = host_context();
    let (_, mirror_end) = ChannelTransport::pair(PeerId(1));
    assert!(matches!(
        MirrorSession::new(context.clone(), Box::new(mirror_end)),
        Err(Error::Config(_))
    ));

    let state = common::initial_state(&context, &["Ada", "Brook"]);
    let client = ActionPipeline::new(context.as_role(Role::Client), state);
    assert!(matches!(HostSession::new(client), Err(Error::Config(_))));
}

#[test]
fn test_mirror_sees_its_choice() {
    let mut t = table();
    for (name, mirror) in [("Brook", &t.brook), ("Cyd", &t.cyd)] {
        let state = mirror.state().unwrap();
        let seat = state.player_by_name(name).unwrap();
        let corp = state.player(seat).offered_corporations[0].clone();
        mirror.propose(Move::choose_corporation(name, &corp)).unwrap();
    }
    let corp = t.host.state().player(common::ADA).offered_corporations[0].clone();
    t.host.poll();
    t.host.submit_local(Move::choose_corporation("Ada", &corp)).unwrap();
    t.brook.poll().unwrap();

    assert_eq!(t.brook.state().unwrap().phase(), Phase::Research);
    assert!(t.brook.choice().is_some());
    assert!(t.host.local_choice().is_some());
}
