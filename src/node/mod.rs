//! The interop node: a libp2p host driven through a small capability trait.

pub mod host;
pub mod driver;
pub mod libp2p_host;

pub use host::{HostError, PeerHost};
pub use driver::{NodeDriver, NodeError, NodeOutcome};
pub use libp2p_host::{Libp2pHost, Libp2pPeer};
