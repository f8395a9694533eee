//! The networking collaborator the node driver talks to.
//!
//! The driver never touches a concrete peer-to-peer stack; it only needs a
//! host that can produce an identity, listen, resolve a peer address, dial
//! it and report whether the connection is still up.

use std::fmt;

/// Failures reported by a [`PeerHost`]
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("identity generation failed: {0}")]
    Identity(String),
    #[error("listen failed: {0}")]
    Listen(String),
    #[error("invalid peer address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("dial failed: {0}")]
    Connect(String),
    #[error("connection attempt timed out")]
    Timeout,
    #[error("not connected to {0}")]
    NotConnected(String),
}

/// Capability contract of the peer-to-peer library under test
#[allow(async_fn_in_trait)]
pub trait PeerHost {
    /// Routable descriptor of a remote peer; displays as its peer id
    type Peer: fmt::Display;

    /// Textual peer id of the local identity
    fn local_id(&self) -> String;

    /// Bind `/ip4/0.0.0.0/tcp/<port>` and return the bound addresses
    async fn listen(&mut self, port: u16) -> Result<Vec<String>, HostError>;

    /// Every address currently bound
    fn local_addresses(&self) -> Vec<String>;

    /// Resolve the peer-addressable string form into a descriptor
    fn parse_peer(&self, address: &str) -> Result<Self::Peer, HostError>;

    async fn connect(&mut self, peer: &Self::Peer) -> Result<(), HostError>;

    /// Liveness status of an established connection, not a protocol round trip
    fn check_liveness(&mut self, peer: &Self::Peer) -> Result<(), HostError>;

    /// Service the network while the caller is suspended; never completes
    async fn drive(&mut self);
}
