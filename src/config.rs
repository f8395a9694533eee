use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Harness configuration; every field has a default so an empty file is valid
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub node: NodeConfig,
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.node.connect_timeout.is_zero() {
            return Err(ValidationError::InvalidNode(
                "connect_timeout must be greater than zero".to_string(),
            ));
        }
        for (name, value) in [
            ("client_log", &self.analysis.client_log),
            ("server_log", &self.analysis.server_log),
            ("report_file", &self.analysis.report_file),
            ("summary_file", &self.analysis.summary_file),
        ] {
            if value.is_empty() {
                return Err(ValidationError::InvalidAnalysis(format!(
                    "{} cannot be empty",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Settings for the node process.
///
/// The probe count and interval are part of the log contract and not
/// configurable.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    /// TCP port to listen on; 0 picks an ephemeral port
    pub listen_port: u16,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub idle_connection_timeout: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            listen_port: 0,
            connect_timeout: Duration::from_secs(10),
            idle_connection_timeout: Duration::from_secs(60),
        }
    }
}

/// Settings for the log analyzer
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub results_dir: PathBuf,
    pub client_log: String,
    pub server_log: String,
    pub report_file: String,
    pub summary_file: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            client_log: "py-client-test1.log".to_string(),
            server_log: "go-server.log".to_string(),
            report_file: "metrics_report.json".to_string(),
            summary_file: "metrics_summary.txt".to_string(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid node configuration: {0}")]
    InvalidNode(String),
    #[error("Invalid analysis configuration: {0}")]
    InvalidAnalysis(String),
}
