//! Report generation for ping interoperability analysis.
//!
//! Writes the JSON report and renders the human-readable summary used for
//! both the console and the text file.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use super::types::*;

/// Most error strings shown in the summary
const MAX_LISTED_ERRORS: usize = 5;

/// Generate JSON report, replacing any previous one
pub fn generate_json_report(report: &MetricsReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Render the summary lines for a report
pub fn render_summary(report: &MetricsReport, report_path: &Path) -> String {
    let mut lines: Vec<String> = Vec::new();
    let server = &report.server_info;
    let client = &report.client_results;
    let stats = &report.overall_stats;
    let assessment = &report.interoperability_assessment;

    lines.push("=== Test Results Summary ===".to_string());
    lines.push(String::new());

    lines.push(format!("{} Server:", report.test_configuration.server));
    lines.push(format!(
        "  Startup: {}",
        if server.startup_successful { "Success" } else { "Failed" }
    ));
    if let Some(ref peer_id) = server.peer_id {
        lines.push(format!("  Peer ID: {}", peer_id));
    }
    lines.push(format!("  Listening Addresses: {}", server.listening_addresses.len()));
    lines.push(String::new());

    lines.push(format!("{} Client:", report.test_configuration.client));
    lines.push(format!(
        "  Connection: {}",
        if client.connection_status == ConnectionStatus::Connected {
            "Connected"
        } else {
            "Failed"
        }
    ));
    lines.push(format!(
        "  Successful Pings: {}/{}",
        stats.successful_pings, stats.total_ping_attempts
    ));
    lines.push(format!("  Success Rate: {:.1}%", assessment.success_rate_percentage));

    if let (Some(avg), Some(min), Some(max)) =
        (stats.average_rtt_ms, stats.min_rtt_ms, stats.max_rtt_ms)
    {
        if avg > 0.0 {
            lines.push(format!("  Average RTT: {}ms", avg));
            lines.push(format!("  RTT Range: {}ms - {}ms", min, max));
            lines.push(format!("  Performance: {}", assessment.performance_category));
        }
    }
    lines.push(String::new());

    lines.push("=== Interoperability Assessment ===".to_string());
    lines.push(format!("Overall Status: {}", assessment.interoperability_status));
    lines.push(format!("Protocol Compliance: {}", yes_no(assessment.protocol_compliance)));
    lines.push(format!(
        "Connection Compatibility: {}",
        yes_no(assessment.connection_compatibility)
    ));

    if !client.errors.is_empty() {
        lines.push(String::new());
        lines.push("=== Errors Encountered ===".to_string());
        for error in client.errors.iter().take(MAX_LISTED_ERRORS) {
            lines.push(format!("  - {}", error));
        }
    }

    lines.push(String::new());
    lines.push(format!("Detailed report saved to: {}", report_path.display()));
    lines.push(format!("Test completed at: {}", report.test_timestamp));

    lines.join("\n")
}

/// Write the rendered summary to a text file
pub fn generate_text_report(
    report: &MetricsReport,
    report_path: &Path,
    output_path: &Path,
) -> Result<()> {
    let content = render_summary(report, report_path);
    fs::write(output_path, content)
        .with_context(|| format!("Failed to write text report to {}", output_path.display()))?;

    log::info!("Text report written to {}", output_path.display());
    Ok(())
}

/// Print a summary to stdout
pub fn print_summary(report: &MetricsReport, report_path: &Path) {
    println!("\n{}", render_summary(report, report_path));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::metrics::build_report;

    fn sample_report(errors: usize) -> MetricsReport {
        let client = ClientRunResult {
            successful_pings: 2,
            failed_pings: errors as u32,
            rtts: vec![12.5, 15.0],
            errors: (1..=errors).map(|i| format!("error {}", i)).collect(),
            connection_status: ConnectionStatus::Connected,
        };
        let server = ServerRunResult {
            peer_id: Some("abc123".to_string()),
            listening_addresses: vec!["/ip4/0.0.0.0/tcp/4001".to_string()],
            startup_successful: true,
            incoming_connections: 1,
        };
        build_report(
            "2026-01-01T00:00:00+00:00".to_string(),
            server,
            client,
        )
        .unwrap()
    }

    #[test]
    fn test_summary_contents() {
        let summary = render_summary(&sample_report(0), Path::new("results/metrics_report.json"));
        assert!(summary.contains("go-libp2p Server:"));
        assert!(summary.contains("  Peer ID: abc123"));
        assert!(summary.contains("  Successful Pings: 2/5"));
        assert!(summary.contains("  Success Rate: 40.0%"));
        assert!(summary.contains("  Average RTT: 13.75ms"));
        assert!(summary.contains("  Performance: GOOD"));
        assert!(summary.contains("Overall Status: FAIL"));
        assert!(summary.contains("Protocol Compliance: Yes"));
        assert!(!summary.contains("Errors Encountered"));
    }

    #[test]
    fn test_summary_lists_at_most_five_errors() {
        let summary = render_summary(&sample_report(7), Path::new("report.json"));
        assert!(summary.contains("  - error 5"));
        assert!(!summary.contains("  - error 6"));
    }

    #[test]
    fn test_json_schema_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics_report.json");
        generate_json_report(&sample_report(0), &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        for key in [
            "test_timestamp",
            "test_configuration",
            "server_info",
            "client_results",
            "overall_stats",
            "interoperability_assessment",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(json["client_results"]["connection_status"], "connected");
        assert_eq!(json["interoperability_assessment"]["interoperability_status"], "FAIL");
        assert_eq!(json["interoperability_assessment"]["performance_category"], "GOOD");
    }
}
