//! Log parsing for interop node output.
//!
//! Builds one per-role result record from a node's captured stdout. A log
//! that does not exist (peer crashed or never started) parses to the default
//! record instead of failing the analysis.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use super::patterns::{self, FactKind};
use super::types::*;

/// Parse the initiating node's output
pub fn parse_client_content(content: &str) -> ClientRunResult {
    let mut results = ClientRunResult::default();

    // First matching rule wins
    results.connection_status = if patterns::contains(FactKind::ConnectionSuccess, content) {
        ConnectionStatus::Connected
    } else if patterns::contains(FactKind::ConnectionFailure, content) {
        ConnectionStatus::Failed
    } else {
        ConnectionStatus::Unknown
    };

    results.rtts = patterns::extract(FactKind::Rtt, content)
        .into_iter()
        .filter_map(|fact| match fact.value.parse::<f64>() {
            Ok(rtt) => Some(rtt),
            Err(_) => {
                log::debug!("Skipping unparsable RTT value {:?}", fact.value);
                None
            }
        })
        .collect();
    results.successful_pings = results.rtts.len() as u32;

    // Success lines estimate the same quantity; the larger estimate wins
    let success_lines = patterns::count_matching_lines(FactKind::PingSuccess, content) as u32;
    if success_lines > results.successful_pings {
        results.successful_pings = success_lines;
    }

    results.errors = patterns::extract(FactKind::Error, content)
        .into_iter()
        .map(|fact| fact.value.to_string())
        .collect();
    results.failed_pings = results.errors.len() as u32;

    results
}

/// Parse the responding node's output
pub fn parse_server_content(content: &str) -> ServerRunResult {
    let mut info = ServerRunResult::default();

    if let Some(peer) = patterns::extract(FactKind::PeerId, content).first() {
        info.peer_id = Some(peer.value.to_string());
        info.startup_successful = true;
    }

    info.listening_addresses = patterns::extract(FactKind::ListenAddress, content)
        .into_iter()
        .map(|fact| fact.value.to_string())
        .collect();

    info.incoming_connections =
        patterns::count_matching_lines(FactKind::ConnectMention, content) as u32;

    info
}

/// Read a log file, returning `None` when it does not exist
fn read_log(path: &Path) -> Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::warn!("Log file {} not found", path.display());
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read log file: {}", path.display())),
    }
}

/// Parse a client log file; a missing file yields the default record
pub fn parse_client_log(path: &Path) -> Result<ClientRunResult> {
    let results = match read_log(path)? {
        Some(content) => parse_client_content(&content),
        None => ClientRunResult::default(),
    };
    log::debug!(
        "Parsed client log {}: status {}, {} RTTs, {} errors",
        path.display(),
        results.connection_status,
        results.rtts.len(),
        results.errors.len()
    );
    Ok(results)
}

/// Parse a server log file; a missing file yields the default record
pub fn parse_server_log(path: &Path) -> Result<ServerRunResult> {
    let info = match read_log(path)? {
        Some(content) => parse_server_content(&content),
        None => ServerRunResult::default(),
    };
    log::debug!(
        "Parsed server log {}: peer id {:?}, {} listening addresses",
        path.display(),
        info.peer_id,
        info.listening_addresses.len()
    );
    Ok(info)
}
