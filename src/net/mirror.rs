//! A non-authoritative participant.
//!
//! A mirror never runs the pipeline. It proposes moves to the host and
//! replaces its local state with every snapshot it receives; the latest
//! snapshot always wins.

use std::time::Duration;

use tracing::{debug, warn};

use super::message::WireMessage;
use super::role::SessionContext;
use super::transport::Transport;
use crate::core::{GameState, Move};
use crate::error::{Error, NetError, Rejection, Result};
use crate::rules::ChoiceRequest;

/// Something the host told this mirror.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MirrorEvent {
    /// Local state was replaced by a newer snapshot.
    Updated,
    /// A move this mirror proposed was refused.
    Rejected(Rejection),
    /// The host refused the join.
    JoinRefused(String),
}

/// Mirror side of a networked session.
pub struct MirrorSession {
    context: SessionContext,
    link: Box<dyn Transport>,
    state: Option<GameState>,
    snapshots: u64,
}

impl MirrorSession {
    /// Mirror for `context.local_player`.
    pub fn new(context: SessionContext, link: Box<dyn Transport>) -> Result<Self> {
        if context.role.is_authoritative() {
            return Err(Error::Config("mirror session needs the client role".to_string()));
        }
        if context.local_player.is_none() {
            return Err(Error::Config("mirror session needs a local player".to_string()));
        }
        Ok(Self {
            context,
            link,
            state: None,
            snapshots: 0,
        })
    }

    fn player(&self) -> &str {
        self.context.local_player.as_deref().unwrap_or_default()
    }

    /// Latest state from the host; `None` before the first snapshot.
    #[must_use]
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Snapshots applied so far.
    #[must_use]
    pub fn snapshots(&self) -> u64 {
        self.snapshots
    }

    /// Decision owed by the local player in the latest state.
    #[must_use]
    pub fn choice(&self) -> Option<ChoiceRequest> {
        let state = self.state.as_ref()?;
        ChoiceRequest::outstanding(state, &self.context.config, self.player())
    }

    /// Ask the host to bind this mirror to the local player.
    pub fn join(&self) -> Result<()> {
        self.send(&WireMessage::Join {
            player: self.player().to_string(),
        })
    }

    /// Send a move to the host. The answer arrives as a snapshot or a
    /// [`MirrorEvent::Rejected`].
    pub fn propose(&self, mv: Move) -> Result<()> {
        self.send(&WireMessage::Propose(mv))
    }

    /// Apply every frame already received.
    ///
    /// A link failure after some frames were applied still returns their
    /// events; the failure surfaces on the next call, since a lost link
    /// stays lost.
    pub fn poll(&mut self) -> Result<Vec<MirrorEvent>> {
        let mut events = Vec::new();
        loop {
            match self.link.try_recv() {
                Ok(Some(frame)) => {
                    if let Some(event) = self.handle(&frame) {
                        events.push(event);
                    }
                }
                Ok(None) => break,
                Err(err) if events.is_empty() => return Err(err.into()),
                Err(err) => {
                    warn!(%err, pending = events.len(), "host link lost after frames arrived");
                    break;
                }
            }
        }
        Ok(events)
    }

    /// Wait up to `timeout` for one frame and apply it.
    pub fn wait(&mut self, timeout: Duration) -> Result<Option<MirrorEvent>> {
        match self.link.recv_timeout(timeout)? {
            Some(frame) => Ok(self.handle(&frame)),
            None => Ok(None),
        }
    }

    fn handle(&mut self, frame: &[u8]) -> Option<MirrorEvent> {
        let msg = match WireMessage::decode(frame) {
            Ok(msg) => msg,
            Err(err) => {
                warn!(%err, "discarding frame from host");
                return None;
            }
        };
        match msg {
            WireMessage::Snapshot(blob) => match GameState::from_blob(&blob) {
                Ok(state) => {
                    self.state = Some(state);
                    self.snapshots += 1;
                    debug!(player = %self.player(), snapshots = self.snapshots, "snapshot applied");
                    Some(MirrorEvent::Updated)
                }
                Err(err) => {
                    warn!(%err, "corrupt snapshot, keeping previous state");
                    None
                }
            },
            WireMessage::Rejected { reason, .. } => Some(MirrorEvent::Rejected(reason)),
            WireMessage::JoinRefused { reason, .. } => Some(MirrorEvent::JoinRefused(reason)),
            other => {
                warn!(?other, "unexpected frame from host");
                None
            }
        }
    }

    fn send(&self, msg: &WireMessage) -> Result<()> {
        let frame = msg.encode()?;
        self.link.send(frame).map_err(|err: NetError| {
            warn!(%err, "send to host failed");
            Error::Network(err)
        })
    }
}
