//! Host-authoritative replication.
//!
//! ## Architecture
//!
//! ```text
//!  MirrorSession --Propose--> HostSession --submit--> ActionPipeline
//!        ^                         |
//!        +------ Snapshot ---------+  (every peer, after each accepted move)
//! ```
//!
//! Exactly one side is authoritative ([`Role::Solo`] or [`Role::Host`]).
//! Mirrors never mutate state; they swap in whatever the host sends.

pub mod host;
pub mod message;
pub mod mirror;
pub mod role;
pub mod transport;

pub use host::HostSession;
pub use message::WireMessage;
pub use mirror::{MirrorEvent, MirrorSession};
pub use role::{Role, SessionContext};
pub use transport::{ChannelTransport, PeerId, Transport};
