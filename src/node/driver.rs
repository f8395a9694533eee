//! Node lifecycle: identity, listening, then responder or initiator mode.
//!
//! Everything the driver learns is written as plain lines to its output
//! sink. Those lines are the only interface to the log analyzer, so their
//! wording (`Peer ID:`, `Listening on:`, `Connected to`, `Message <n> ...`)
//! must stay stable.

use std::fmt;
use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;

use super::host::{HostError, PeerHost};
use crate::analysis::types::EXPECTED_PING_ATTEMPTS;
use crate::config::NodeConfig;

/// Liveness iterations after a successful connect; the analyzer scores
/// against the same count
pub const PROBE_COUNT: u32 = EXPECTED_PING_ATTEMPTS;

/// Pause between liveness iterations
pub const PROBE_INTERVAL: Duration = Duration::from_secs(1);

/// How a node run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOutcome {
    /// Responder mode stopped by the shutdown signal
    ShutdownRequested,
    /// Initiator could not reach the target; the process stays healthy
    ConnectFailed,
    ProbesCompleted { active: u32, failed: u32 },
}

/// Fatal node failures
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("failed to start node: {0}")]
    Startup(#[source] HostError),
    #[error("failed to write node output: {0}")]
    Output(#[from] io::Error),
}

pub struct NodeDriver<W> {
    out: W,
    config: NodeConfig,
}

impl<W: Write> NodeDriver<W> {
    pub fn new(out: W, config: NodeConfig) -> Self {
        Self { out, config }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: fmt::Arguments<'_>) -> io::Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }

    /// Start a node and run it in the mode selected by `target`.
    ///
    /// `create_host` generates the identity. Without a target the node
    /// responds until `shutdown` resolves; with one it dials the target and
    /// runs the liveness loop, then returns.
    pub async fn run<H, F>(
        &mut self,
        create_host: impl FnOnce() -> Result<H, HostError>,
        target: Option<&str>,
        shutdown: F,
    ) -> Result<NodeOutcome, NodeError>
    where
        H: PeerHost,
        F: Future<Output = ()>,
    {
        let mut host = self.start(create_host).await?;

        match target {
            Some(target) => self.connect_and_ping(&mut host, target).await,
            None => {
                self.emit(format_args!("Waiting for connections..."))?;
                self.wait_for_shutdown(&mut host, shutdown).await
            }
        }
    }

    async fn start<H: PeerHost>(
        &mut self,
        create_host: impl FnOnce() -> Result<H, HostError>,
    ) -> Result<H, NodeError> {
        let port = self.config.listen_port;
        let started = async move {
            let mut host = create_host()?;
            let bound = host.listen(port).await?;
            log::debug!("Bound {} listen addresses", bound.len());
            Ok::<H, HostError>(host)
        }
        .await;

        let host = match started {
            Ok(host) => host,
            Err(e) => {
                log::error!("Node startup failed: {}", e);
                self.emit(format_args!("Failed to start node: {}", e))?;
                return Err(NodeError::Startup(e));
            }
        };

        let peer_id = host.local_id();
        self.emit(format_args!("interop node started"))?;
        self.emit(format_args!("Peer ID: {}", peer_id))?;
        for addr in host.local_addresses() {
            self.emit(format_args!("Listening on: {}/p2p/{}", addr, peer_id))?;
        }
        log::info!("Node {} listening", peer_id);

        Ok(host)
    }

    async fn wait_for_shutdown<H, F>(
        &mut self,
        host: &mut H,
        shutdown: F,
    ) -> Result<NodeOutcome, NodeError>
    where
        H: PeerHost,
        F: Future<Output = ()>,
    {
        // No timeout: only the shutdown signal ends responder mode
        tokio::select! {
            _ = shutdown => {}
            _ = host.drive() => {}
        }

        self.emit(format_args!("Received shutdown signal"))?;
        Ok(NodeOutcome::ShutdownRequested)
    }

    async fn connect_and_ping<H: PeerHost>(
        &mut self,
        host: &mut H,
        target: &str,
    ) -> Result<NodeOutcome, NodeError> {
        self.emit(format_args!("Attempting to connect to: {}", target))?;

        let peer = match host.parse_peer(target) {
            Ok(peer) => peer,
            Err(e) => return self.connect_failed(e),
        };

        self.emit(format_args!("Connecting to peer: {}", peer))?;
        if let Err(e) = host.connect(&peer).await {
            return self.connect_failed(e);
        }
        self.emit(format_args!("Connected to {}", peer))?;

        self.emit(format_args!("Sending {} messages to {}", PROBE_COUNT, peer))?;

        let mut active = 0;
        let mut failed = 0;
        for n in 1..=PROBE_COUNT {
            match host.check_liveness(&peer) {
                Ok(()) => {
                    self.emit(format_args!("Message {} - Connection active", n))?;
                    active += 1;
                }
                Err(e) => {
                    log::warn!("Liveness check {} against {} failed: {}", n, peer, e);
                    self.emit(format_args!("Message {} failed: {}", n, e))?;
                    failed += 1;
                }
            }
            self.pause(host).await;
        }

        log::info!("Liveness loop finished: {} active, {} failed", active, failed);
        Ok(NodeOutcome::ProbesCompleted { active, failed })
    }

    fn connect_failed(&mut self, error: HostError) -> Result<NodeOutcome, NodeError> {
        log::warn!("Could not connect to peer: {}", error);
        self.emit(format_args!("Connection failed: {}", error))?;
        Ok(NodeOutcome::ConnectFailed)
    }

    /// Sleep one probe interval while the host keeps servicing the network
    async fn pause<H: PeerHost>(&self, host: &mut H) {
        tokio::select! {
            _ = tokio::time::sleep(PROBE_INTERVAL) => {}
            _ = host.drive() => {}
        }
    }
}
