//! Frame transport.
//!
//! [`Transport`] is a reliable, ordered, bidirectional frame pipe to one
//! peer. Socket I/O lives outside the crate; [`ChannelTransport`] is the
//! in-process implementation over `crossbeam-channel`, used for local
//! sessions and tests.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use crate::error::NetError;

/// Peer identifier assigned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u32);

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

/// Reliable, ordered frame pipe to one peer.
pub trait Transport: Send {
    /// Queue one whole frame.
    fn send(&self, frame: Vec<u8>) -> Result<(), NetError>;

    /// Next frame if one is waiting. `Ok(None)` means nothing yet.
    fn try_recv(&self) -> Result<Option<Vec<u8>>, NetError>;

    /// Wait up to `timeout` for the next frame.
    fn recv_timeout(&self, timeout: Duration) -> Result<Option<Vec<u8>>, NetError>;
}

/// One end of an in-process duplex channel.
#[derive(Debug)]
pub struct ChannelTransport {
    /// Id reported in errors: the remote peer.
    remote: u32,
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
}

impl ChannelTransport {
    /// Connected pair: `(host end, mirror end)` for peer `id`.
    #[must_use]
    pub fn pair(id: PeerId) -> (Self, Self) {
        let (to_mirror, from_host) = unbounded();
        let (to_host, from_mirror) = unbounded();
        let host_end = Self {
            remote: id.0,
            tx: to_mirror,
            rx: from_mirror,
        };
        let mirror_end = Self {
            remote: u32::MAX,
            tx: to_host,
            rx: from_host,
        };
        (host_end, mirror_end)
    }

    fn closed(&self) -> NetError {
        if self.remote == u32::MAX {
            NetError::HostUnreachable
        } else {
            NetError::Disconnected(self.remote)
        }
    }
}

impl Transport for ChannelTransport {
    fn send(&self, frame: Vec<u8>) -> Result<(), NetError> {
        self.tx.send(frame).map_err(|_| self.closed())
    }

    fn try_recv(&self) -> Result<Option<Vec<u8>>, NetError> {
        match self.rx.try_recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(self.closed()),
        }
    }

    fn recv_timeout(&self, timeout: Duration) -> Result<Option<Vec<u8>>, NetError> {
        match self.rx.recv_timeout(timeout) {
            Ok(frame) => Ok(Some(frame)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(self.closed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_ordered_duplex() {
        let (host, mirror) = ChannelTransport::pair(PeerId(1));
        mirror.send(vec![1]).unwrap();
        mirror.send(vec![2]).unwrap();
        host.send(vec![9]).unwrap();

        assert_eq!(host.try_recv().unwrap(), Some(vec![1]));
        assert_eq!(host.try_recv().unwrap(), Some(vec![2]));
        assert_eq!(host.try_recv().unwrap(), None);
        assert_eq!(mirror.try_recv().unwrap(), Some(vec![9]));
    }

    #[test]
    fn test_dropped_end_reports_peer() {
        let (host, mirror) = ChannelTransport::pair(PeerId(4));
        drop(mirror);

        assert_eq!(host.send(vec![0]), Err(NetError::Disconnected(4)));
        assert_eq!(host.try_recv(), Err(NetError::Disconnected(4)));
    }

    #[test]
    fn test_dropped_host_is_unreachable() {
        let (host, mirror) = ChannelTransport::pair(PeerId(4));
        drop(host);
        assert_eq!(
            mirror.recv_timeout(Duration::from_millis(5)),
            Err(NetError::HostUnreachable)
        );
    }
}
