//! [`PeerHost`] backed by a libp2p swarm (TCP + Noise + Yamux, ping).

use std::fmt;
use std::time::Duration;

use futures::StreamExt;
use libp2p::multiaddr::{self, Multiaddr, Protocol};
use libp2p::swarm::SwarmEvent;
use libp2p::{identity, noise, ping, tcp, yamux, PeerId, Swarm, SwarmBuilder};

use super::host::{HostError, PeerHost};
use crate::config::NodeConfig;

/// How long to keep collecting interface addresses after the first one
const LISTEN_SETTLE: Duration = Duration::from_millis(200);

/// A dialable remote peer
#[derive(Debug, Clone)]
pub struct Libp2pPeer {
    pub peer_id: PeerId,
    pub address: Multiaddr,
}

impl fmt::Display for Libp2pPeer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.peer_id)
    }
}

pub struct Libp2pHost {
    swarm: Swarm<ping::Behaviour>,
    connect_timeout: Duration,
}

impl Libp2pHost {
    /// Create a host with a fresh ed25519 identity
    pub fn generate(config: &NodeConfig) -> Result<Self, HostError> {
        let keypair = identity::Keypair::generate_ed25519();
        let idle_timeout = config.idle_connection_timeout;

        let swarm = SwarmBuilder::with_existing_identity(keypair)
            .with_tokio()
            .with_tcp(
                tcp::Config::default(),
                noise::Config::new,
                yamux::Config::default,
            )
            .map_err(|e| HostError::Identity(e.to_string()))?
            .with_behaviour(|_| ping::Behaviour::new(ping::Config::new()))
            .map_err(|e| HostError::Identity(e.to_string()))?
            .with_swarm_config(|cfg| cfg.with_idle_connection_timeout(idle_timeout))
            .build();

        log::debug!("Generated identity {}", swarm.local_peer_id());

        Ok(Self {
            swarm,
            connect_timeout: config.connect_timeout,
        })
    }

    async fn next_listen_addr(&mut self) -> Result<Multiaddr, HostError> {
        loop {
            match self.swarm.select_next_some().await {
                SwarmEvent::NewListenAddr { address, .. } => return Ok(address),
                SwarmEvent::ListenerError { error, .. } => {
                    return Err(HostError::Listen(error.to_string()))
                }
                SwarmEvent::ListenerClosed {
                    reason: Err(error), ..
                } => return Err(HostError::Listen(error.to_string())),
                event => log_event(event),
            }
        }
    }
}

fn log_event(event: SwarmEvent<ping::Event>) {
    match event {
        SwarmEvent::ConnectionEstablished {
            peer_id, endpoint, ..
        } => {
            log::info!(
                "Connection established with {} at {}",
                peer_id,
                endpoint.get_remote_address()
            );
        }
        SwarmEvent::ConnectionClosed { peer_id, cause, .. } => {
            log::info!("Connection with {} closed: {:?}", peer_id, cause);
        }
        SwarmEvent::IncomingConnectionError {
            send_back_addr,
            error,
            ..
        } => {
            log::warn!("Incoming connection from {} failed: {}", send_back_addr, error);
        }
        SwarmEvent::Behaviour(ping::Event {
            peer, result: Ok(rtt), ..
        }) => {
            log::info!("Ping {} RTT: {:.2}ms", peer, rtt.as_secs_f64() * 1000.0);
        }
        SwarmEvent::Behaviour(ping::Event {
            peer,
            result: Err(failure),
            ..
        }) => {
            log::warn!("Ping {} failed: {}", peer, failure);
        }
        other => log::debug!("Swarm event: {:?}", other),
    }
}

impl PeerHost for Libp2pHost {
    type Peer = Libp2pPeer;

    fn local_id(&self) -> String {
        self.swarm.local_peer_id().to_string()
    }

    async fn listen(&mut self, port: u16) -> Result<Vec<String>, HostError> {
        let addr: Multiaddr = format!("/ip4/0.0.0.0/tcp/{}", port)
            .parse()
            .map_err(|e: multiaddr::Error| HostError::Listen(e.to_string()))?;
        self.swarm
            .listen_on(addr)
            .map_err(|e| HostError::Listen(e.to_string()))?;

        // One address per interface, reported back to back once bound
        let mut bound = vec![self.next_listen_addr().await?];
        while let Ok(next) = tokio::time::timeout(LISTEN_SETTLE, self.next_listen_addr()).await {
            bound.push(next?);
        }

        Ok(bound.iter().map(|a| a.to_string()).collect())
    }

    fn local_addresses(&self) -> Vec<String> {
        self.swarm.listeners().map(|a| a.to_string()).collect()
    }

    fn parse_peer(&self, address: &str) -> Result<Libp2pPeer, HostError> {
        let invalid = |reason: String| HostError::InvalidAddress {
            address: address.to_string(),
            reason,
        };

        let addr: Multiaddr = address
            .parse()
            .map_err(|e: multiaddr::Error| invalid(e.to_string()))?;

        let peer_id = match addr.iter().last() {
            Some(Protocol::P2p(peer_id)) => peer_id,
            _ => return Err(invalid("missing /p2p/<peer id> component".to_string())),
        };

        Ok(Libp2pPeer {
            peer_id,
            address: addr,
        })
    }

    async fn connect(&mut self, peer: &Libp2pPeer) -> Result<(), HostError> {
        self.swarm
            .dial(peer.address.clone())
            .map_err(|e| HostError::Connect(e.to_string()))?;

        let target = peer.peer_id;
        let timeout = self.connect_timeout;
        let swarm = &mut self.swarm;

        let outcome = tokio::time::timeout(timeout, async move {
            loop {
                match swarm.select_next_some().await {
                    SwarmEvent::ConnectionEstablished { peer_id, .. } if peer_id == target => {
                        return Ok(());
                    }
                    SwarmEvent::OutgoingConnectionError {
                        peer_id: Some(peer_id),
                        error,
                        ..
                    } if peer_id == target => {
                        return Err(HostError::Connect(error.to_string()));
                    }
                    event => log_event(event),
                }
            }
        })
        .await;

        outcome.map_err(|_| HostError::Timeout)?
    }

    fn check_liveness(&mut self, peer: &Libp2pPeer) -> Result<(), HostError> {
        if self.swarm.is_connected(&peer.peer_id) {
            Ok(())
        } else {
            Err(HostError::NotConnected(peer.peer_id.to_string()))
        }
    }

    async fn drive(&mut self) {
        loop {
            let event = self.swarm.select_next_some().await;
            log_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_parse_peer_requires_p2p_component() {
        let host = Libp2pHost::generate(&NodeConfig::default()).unwrap();
        let remote = identity::Keypair::generate_ed25519().public().to_peer_id();

        let peer = host
            .parse_peer(&format!("/ip4/127.0.0.1/tcp/4001/p2p/{}", remote))
            .unwrap();
        assert_eq!(peer.peer_id, remote);
        assert_eq!(peer.to_string(), remote.to_string());

        assert!(matches!(
            host.parse_peer("/ip4/127.0.0.1/tcp/4001"),
            Err(HostError::InvalidAddress { .. })
        ));
        assert!(host.parse_peer("not a multiaddr").is_err());
    }

    #[tokio::test]
    async fn test_listen_reports_bound_addresses() {
        let mut host = Libp2pHost::generate(&NodeConfig::default()).unwrap();
        let bound = host.listen(0).await.unwrap();
        assert!(!bound.is_empty());
        assert!(bound.iter().all(|a| a.starts_with("/ip4/")));
        assert_eq!(host.local_addresses().len(), bound.len());
    }
}
