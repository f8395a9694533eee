//! Core data types for ping interoperability analysis.

use serde::{Deserialize, Serialize};

/// Number of liveness probes the protocol under test is contracted to send.
pub const EXPECTED_PING_ATTEMPTS: u32 = 5;

/// Minimum success rate (inclusive, percent) for a PASS verdict.
pub const PASS_THRESHOLD_PERCENT: f64 = 60.0;

/// Client-side connection outcome as inferred from its log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Connected,
    Failed,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Unknown => write!(f, "unknown"),
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Ping statistics parsed from the initiating node's log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRunResult {
    pub successful_pings: u32,
    pub failed_pings: u32,
    pub rtts: Vec<f64>,
    pub errors: Vec<String>,
    pub connection_status: ConnectionStatus,
}

/// Startup facts parsed from the responding node's log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerRunResult {
    pub peer_id: Option<String>,
    pub listening_addresses: Vec<String>,
    pub startup_successful: bool,
    /// Lines mentioning "connect"; a coarse proxy, not a true connection count
    pub incoming_connections: u32,
}

/// Fixed descriptor of what was tested against what
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestConfiguration {
    pub server: String,
    pub client: String,
    pub protocol: String,
    pub test_type: String,
}

impl Default for TestConfiguration {
    fn default() -> Self {
        Self {
            server: "go-libp2p".to_string(),
            client: "py-libp2p".to_string(),
            protocol: "/ipfs/ping/1.0.0".to_string(),
            test_type: "unidirectional".to_string(),
        }
    }
}

/// Aggregate statistics over one client/server run
///
/// The RTT fields are `None` when no sample was observed; they are omitted
/// from the JSON document rather than written as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_ping_attempts: u32,
    pub successful_pings: u32,
    pub failed_pings: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rtt_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rtt_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rtt_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev_rtt_ms: Option<f64>,
    pub connection_established: bool,
}

/// Overall verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteropStatus {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
}

impl std::fmt::Display for InteropStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteropStatus::Pass => write!(f, "PASS"),
            InteropStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Latency bucket for the mean RTT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PerformanceCategory {
    NoData,
    /// < 10ms
    Excellent,
    /// 10ms up to 50ms
    Good,
    /// 50ms up to 100ms
    Fair,
    /// >= 100ms
    Poor,
}

impl std::fmt::Display for PerformanceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PerformanceCategory::NoData => "NO_DATA",
            PerformanceCategory::Excellent => "EXCELLENT",
            PerformanceCategory::Good => "GOOD",
            PerformanceCategory::Fair => "FAIR",
            PerformanceCategory::Poor => "POOR",
        };
        write!(f, "{}", s)
    }
}

/// Threshold-based verdict and sub-assessments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteropAssessment {
    pub success_rate_percentage: f64,
    pub interoperability_status: InteropStatus,
    pub connection_compatibility: bool,
    pub protocol_compliance: bool,
    pub performance_category: PerformanceCategory,
}

/// The persisted report, written once per analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub test_timestamp: String,
    pub test_configuration: TestConfiguration,
    pub server_info: ServerRunResult,
    pub client_results: ClientRunResult,
    pub overall_stats: OverallStats,
    pub interoperability_assessment: InteropAssessment,
}
