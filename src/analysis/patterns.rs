//! Fact extraction from raw node output.
//!
//! Every fact type has an ordered list of alternative phrasings. All of them
//! are searched case-insensitively across the whole text (no line anchors)
//! and their matches are concatenated in pattern order.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Kinds of facts the node log contract carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactKind {
    /// "Connected to <peer>"
    ConnectionSuccess,
    /// "Connection failed" / "Failed to connect"
    ConnectionFailure,
    /// Round-trip time in milliseconds
    Rtt,
    /// A line reporting a successful ping
    PingSuccess,
    /// Error or failure text
    Error,
    /// "Peer ID: <id>"
    PeerId,
    /// "Listening on: <addr>"
    ListenAddress,
    /// Any mention of connect/connection
    ConnectMention,
}

/// One extracted fact: the captured value and where it sits in the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fact<'t> {
    pub value: &'t str,
    pub start: usize,
    pub end: usize,
}

/// Compiled regex patterns for the node log contract
pub struct LogPatterns {
    pub connection_success: Vec<Regex>,
    pub connection_failure: Vec<Regex>,
    /// Match: "RTT: 12.5ms", "successful - RTT: 12.5", "ping ... 12.5ms"
    pub rtt: Vec<Regex>,
    /// Match: "Ping 3 successful", "successful - RTT:", "ping ... successful"
    pub ping_success: Vec<Regex>,
    /// Match: "failed: <x>", "Error: <x>", "Connection failed: <x>", "timed out"
    pub error: Vec<Regex>,
    pub peer_id: Vec<Regex>,
    pub listen_address: Vec<Regex>,
    pub connect_mention: Vec<Regex>,
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .unwrap_or_else(|e| panic!("Invalid log pattern {:?}: {}", p, e))
        })
        .collect()
}

impl LogPatterns {
    pub fn new() -> Self {
        Self {
            connection_success: compile(&[r"Connected to"]),
            connection_failure: compile(&[r"Connection failed", r"Failed to connect"]),
            rtt: compile(&[
                r"RTT: ([\d.]+)(?:ms)?",
                r"successful - RTT: ([\d.]+)",
                r"ping.*?(\d+\.?\d*)ms",
            ]),
            ping_success: compile(&[
                r"Ping \d+ successful",
                r"successful - RTT:",
                r"ping.*successful",
            ]),
            error: compile(&[
                r"failed: (.+)",
                r"Error: (.+)",
                r"Connection failed: (.+)",
                r"timed out",
            ]),
            peer_id: compile(&[r"Peer ID: (\w+)"]),
            listen_address: compile(&[r"Listening on: (.+)"]),
            connect_mention: compile(&[r"connect"]),
        }
    }

    /// Alternative phrasings for one fact type, in precedence order
    pub fn for_kind(&self, kind: FactKind) -> &[Regex] {
        match kind {
            FactKind::ConnectionSuccess => &self.connection_success,
            FactKind::ConnectionFailure => &self.connection_failure,
            FactKind::Rtt => &self.rtt,
            FactKind::PingSuccess => &self.ping_success,
            FactKind::Error => &self.error,
            FactKind::PeerId => &self.peer_id,
            FactKind::ListenAddress => &self.listen_address,
            FactKind::ConnectMention => &self.connect_mention,
        }
    }
}

impl Default for LogPatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Global patterns instance
pub static PATTERNS: LazyLock<LogPatterns> = LazyLock::new(LogPatterns::new);

/// Extract every match of `kind` from `text`.
///
/// Matches from each alternative pattern are appended in pattern order, not
/// log order. The value is the first capture group, or the whole match for
/// patterns without one. Every match is kept, with one exception for RTTs:
/// a capture at the exact span an earlier RTT pattern already produced is
/// the same measurement seen through another phrasing and is skipped.
pub fn extract(kind: FactKind, text: &str) -> Vec<Fact<'_>> {
    let mut facts: Vec<Fact<'_>> = Vec::new();
    let mut seen_spans: HashSet<(usize, usize)> = HashSet::new();

    for pattern in PATTERNS.for_kind(kind) {
        for caps in pattern.captures_iter(text) {
            let Some(m) = caps.get(1).or_else(|| caps.get(0)) else {
                continue;
            };
            if kind == FactKind::Rtt && !seen_spans.insert((m.start(), m.end())) {
                continue;
            }
            facts.push(Fact {
                value: m.as_str().trim_end_matches('\r'),
                start: m.start(),
                end: m.end(),
            });
        }
    }

    facts
}

/// Whether any phrasing of `kind` appears anywhere in `text`
pub fn contains(kind: FactKind, text: &str) -> bool {
    PATTERNS.for_kind(kind).iter().any(|p| p.is_match(text))
}

/// Number of lines matching at least one phrasing of `kind`
pub fn count_matching_lines(kind: FactKind, text: &str) -> usize {
    let patterns = PATTERNS.for_kind(kind);
    text.lines()
        .filter(|line| patterns.iter().any(|p| p.is_match(line)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(kind: FactKind, text: &str) -> Vec<&str> {
        extract(kind, text).into_iter().map(|f| f.value).collect()
    }

    #[test]
    fn test_rtt_same_occurrence_counted_once() {
        let text = "successful - RTT: 12.5\nsuccessful - RTT: 15.0";
        assert_eq!(values(FactKind::Rtt, text), vec!["12.5", "15.0"]);
    }

    #[test]
    fn test_rtt_equal_values_at_different_positions_kept() {
        let text = "Ping 1 successful - RTT: 7.0ms\nPing 2 successful - RTT: 7.0ms";
        assert_eq!(values(FactKind::Rtt, text), vec!["7.0", "7.0"]);
    }

    #[test]
    fn test_rtt_phrasings_joined_in_pattern_order() {
        // The "RTT:" phrasing is searched before the "ping ... ms" one
        let text = "ping reply 3ms\nRTT: 5";
        assert_eq!(values(FactKind::Rtt, text), vec!["5", "3"]);
    }

    #[test]
    fn test_rtt_alternative_phrasing() {
        let text = "PING reply from peer in 3.25ms";
        assert_eq!(values(FactKind::Rtt, text), vec!["3.25"]);
    }

    #[test]
    fn test_errors_in_pattern_order() {
        let text = "request timed out\nMessage 2 failed: stream reset\nError: boom";
        // "failed:" phrasing first, then "Error:", then the bare marker
        assert_eq!(
            values(FactKind::Error, text),
            vec!["stream reset", "boom", "timed out"]
        );
    }

    #[test]
    fn test_overlapping_error_phrasings_all_kept() {
        let text = "Connection failed: refused";
        assert_eq!(values(FactKind::Error, text), vec!["refused", "refused"]);

        let text = "Message 5 failed: timed out";
        assert_eq!(values(FactKind::Error, text), vec!["timed out", "timed out"]);
    }

    #[test]
    fn test_case_insensitive() {
        assert!(contains(FactKind::ConnectionSuccess, "connected TO QmPeer"));
        assert!(contains(FactKind::ConnectionFailure, "FAILED TO CONNECT"));
        assert!(!contains(FactKind::ConnectionSuccess, "Connecting to peer: Qm"));
    }

    #[test]
    fn test_count_matching_lines_counts_each_line_once() {
        let text = "Ping 1 successful - RTT: 4ms\nnothing here\nping 2 was successful";
        assert_eq!(count_matching_lines(FactKind::PingSuccess, text), 2);
    }

    #[test]
    fn test_listen_address_captures_rest_of_line() {
        let text = "Listening on: /ip4/127.0.0.1/tcp/4001/p2p/12D3KooW\r\nother";
        assert_eq!(
            values(FactKind::ListenAddress, text),
            vec!["/ip4/127.0.0.1/tcp/4001/p2p/12D3KooW"]
        );
    }
}
