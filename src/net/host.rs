//! The authoritative host.
//!
//! ## Loop
//!
//! [`HostSession::poll`] drains every peer's queued frames and handles them
//! strictly one at a time on the calling thread. Each accepted move is
//! followed by a full snapshot to every connected peer before the next
//! frame is looked at, so all mirrors see the same sequence of states.
//!
//! A peer whose channel fails is marked disconnected and skipped from then
//! on; the host keeps serving the others. Nothing is retried.

use tracing::{debug, warn};

use super::message::WireMessage;
use super::transport::{PeerId, Transport};
use crate::core::{GameState, Move};
use crate::error::{Error, NetError, Rejection, Result};
use crate::history::MoveLog;
use crate::rules::{ActionPipeline, ChoiceRequest, Outcome};

/// Connection slot for one mirror.
struct Peer {
    id: PeerId,
    link: Box<dyn Transport>,
    /// Player this peer acts for, once joined.
    player: Option<String>,
    connected: bool,
}

/// Host side of a networked session.
pub struct HostSession {
    pipeline: ActionPipeline,
    peers: Vec<Peer>,
    next_peer: u32,
}

impl HostSession {
    /// Wrap an authoritative pipeline.
    pub fn new(pipeline: ActionPipeline) -> Result<Self> {
        if !pipeline.context().role.is_authoritative() {
            return Err(Error::Config("host session needs an authoritative role".to_string()));
        }
        Ok(Self {
            pipeline,
            peers: Vec::new(),
            next_peer: 1,
        })
    }

    #[must_use]
    pub fn pipeline(&self) -> &ActionPipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        self.pipeline.state()
    }

    #[must_use]
    pub fn log(&self) -> &MoveLog {
        self.pipeline.log()
    }

    /// Give up the pipeline, dropping every peer link.
    #[must_use]
    pub fn into_pipeline(self) -> ActionPipeline {
        self.pipeline
    }

    /// Register a peer link. It may send `Join` from now on.
    pub fn connect(&mut self, link: Box<dyn Transport>) -> PeerId {
        let id = PeerId(self.next_peer);
        self.next_peer += 1;
        self.peers.push(Peer {
            id,
            link,
            player: None,
            connected: true,
        });
        debug!(peer = %id, "peer connected");
        id
    }

    /// Ids of peers still connected.
    pub fn connected_peers(&self) -> impl Iterator<Item = PeerId> + '_ {
        self.peers.iter().filter(|p| p.connected).map(|p| p.id)
    }

    /// Player bound to `peer`, if it has joined.
    #[must_use]
    pub fn bound_player(&self, peer: PeerId) -> Option<&str> {
        self.peers
            .iter()
            .find(|p| p.id == peer)
            .and_then(|p| p.player.as_deref())
    }

    // === Local moves ===

    /// Deal the opening hands and broadcast.
    pub fn start(&mut self) -> std::result::Result<(), Rejection> {
        self.pipeline.start()?;
        self.broadcast();
        Ok(())
    }

    /// Submit a move for the host's own player and broadcast on success.
    pub fn submit_local(&mut self, mv: Move) -> std::result::Result<Outcome, Rejection> {
        let outcome = self.pipeline.submit(mv)?;
        self.broadcast();
        Ok(outcome)
    }

    /// Decision owed by the host's own player.
    #[must_use]
    pub fn local_choice(&self) -> Option<ChoiceRequest> {
        let player = self.pipeline.context().local_player.as_deref()?;
        self.pipeline.choice_for(player)
    }

    // === Remote frames ===

    /// Handle every queued frame from every peer. Returns frames handled.
    pub fn poll(&mut self) -> usize {
        let mut handled = 0;
        for index in 0..self.peers.len() {
            while self.peers[index].connected {
                let frame = match self.peers[index].link.try_recv() {
                    Ok(Some(frame)) => frame,
                    Ok(None) => break,
                    Err(err) => {
                        self.drop_peer(index, &err);
                        break;
                    }
                };
                handled += 1;
                match WireMessage::decode(&frame) {
                    Ok(msg) => self.handle(index, msg),
                    Err(err) => warn!(peer = %self.peers[index].id, %err, "discarding frame"),
                }
            }
        }
        handled
    }

    fn handle(&mut self, index: usize, msg: WireMessage) {
        match msg {
            WireMessage::Join { player } => self.join(index, player),
            WireMessage::Propose(mv) => self.propose(index, mv),
            other => {
                warn!(peer = %self.peers[index].id, ?other, "unexpected frame from mirror");
            }
        }
    }

    fn join(&mut self, index: usize, player: String) {
        // Bindings outlive disconnects: a lost player cannot rejoin mid-session.
        let taken = self
            .peers
            .iter()
            .enumerate()
            .any(|(i, p)| i != index && p.player.as_deref() == Some(player.as_str()));
        let local = self.pipeline.context().local_player.as_deref() == Some(player.as_str());
        let reason = if self.state().player_by_name(&player).is_none() {
            Some("no such player")
        } else if taken || local {
            Some("player already bound")
        } else {
            None
        };

        if let Some(reason) = reason {
            self.send(
                index,
                &WireMessage::JoinRefused {
                    player,
                    reason: reason.to_string(),
                },
            );
            return;
        }

        debug!(peer = %self.peers[index].id, %player, "peer joined");
        self.peers[index].player = Some(player);
        match WireMessage::snapshot(self.state()) {
            Ok(snapshot) => self.send(index, &snapshot),
            Err(err) => warn!(%err, "snapshot encoding failed"),
        }
    }

    fn propose(&mut self, index: usize, mv: Move) {
        let check = match &self.peers[index].player {
            None => Err(Rejection::NotJoined),
            Some(bound) if *bound != mv.actor => Err(Rejection::ActorMismatch {
                actor: mv.actor.clone(),
                bound: bound.clone(),
            }),
            Some(_) => Ok(()),
        };

        let actor = mv.actor.clone();
        match check.and_then(|()| self.pipeline.submit(mv)) {
            Ok(_) => self.broadcast(),
            Err(reason) => self.send(index, &WireMessage::Rejected { actor, reason }),
        }
    }

    // === Sending ===

    /// Push the current state to every connected peer.
    pub fn broadcast(&mut self) {
        let frame = match WireMessage::snapshot(self.state()).and_then(|m| m.encode().map_err(Error::from)) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(%err, "snapshot encoding failed");
                return;
            }
        };
        for index in 0..self.peers.len() {
            if self.peers[index].connected {
                if let Err(err) = self.peers[index].link.send(frame.clone()) {
                    self.drop_peer(index, &err);
                }
            }
        }
    }

    fn send(&mut self, index: usize, msg: &WireMessage) {
        let result = msg.encode().and_then(|frame| self.peers[index].link.send(frame));
        if let Err(err) = result {
            self.drop_peer(index, &err);
        }
    }

    fn drop_peer(&mut self, index: usize, err: &NetError) {
        let peer = &mut self.peers[index];
        warn!(peer = %peer.id, player = ?peer.player, %err, "peer lost");
        peer.connected = false;
    }
}
