//! Interoperability analysis CLI for interop node logs.
//!
//! Parses the client and server logs from a results directory, writes the
//! metrics report and prints the summary.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Context, Result};

use interop_harness::analysis::{self, types::MetricsReport};
use interop_harness::config::AnalysisConfig;
use interop_harness::config_loader;

#[derive(Parser)]
#[command(name = "interop-analyzer")]
#[command(about = "Ping interoperability analysis for interop node logs")]
#[command(version)]
struct Cli {
    /// Path to the harness configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the node logs and receiving the reports
    #[arg(short, long)]
    results_dir: Option<PathBuf>,

    /// Client (initiator) log file name inside the results directory
    #[arg(long)]
    client_log: Option<String>,

    /// Server (responder) log file name inside the results directory
    #[arg(long)]
    server_log: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AnalysisConfig) {
        if let Some(ref dir) = self.results_dir {
            config.results_dir = dir.clone();
        }
        if let Some(ref name) = self.client_log {
            config.client_log = name.clone();
        }
        if let Some(ref name) = self.server_log {
            config.server_log = name.clone();
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let mut config = config_loader::load_or_default(cli.config.as_deref())?.analysis;
    cli.apply_overrides(&mut config);

    println!("=== Analyzing libp2p Interoperability Test Results ===");
    let report = run_analysis(&config)?;

    log::info!(
        "Analysis complete: {}",
        report.interoperability_assessment.interoperability_status
    );
    Ok(())
}

fn run_analysis(config: &AnalysisConfig) -> Result<MetricsReport> {
    let results_dir = &config.results_dir;
    fs::create_dir_all(results_dir).with_context(|| {
        format!("Failed to create results directory: {}", results_dir.display())
    })?;

    let client_path = results_dir.join(&config.client_log);
    let server_path = results_dir.join(&config.server_log);
    log::info!("Parsing client log {}", client_path.display());
    let client = analysis::parse_client_log(&client_path)?;
    log::info!("Parsing server log {}", server_path.display());
    let server = analysis::parse_server_log(&server_path)?;

    let report = analysis::build_report(chrono::Local::now().to_rfc3339(), server, client)
        .context("Failed to assess interoperability")?;

    let report_path = results_dir.join(&config.report_file);
    analysis::generate_json_report(&report, &report_path)?;
    analysis::generate_text_report(&report, &report_path, &results_dir.join(&config.summary_file))?;
    analysis::print_summary(&report, &report_path);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "interop-analyzer",
            "--results-dir",
            "out",
            "--client-log",
            "rust-client.log",
        ]);
        let mut config = AnalysisConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.results_dir, PathBuf::from("out"));
        assert_eq!(config.client_log, "rust-client.log");
        assert_eq!(config.server_log, "go-server.log");
    }

    #[test]
    fn test_run_analysis_with_missing_logs() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            results_dir: dir.path().join("results"),
            ..Default::default()
        };

        let report = run_analysis(&config).unwrap();
        assert_eq!(report.overall_stats.successful_pings, 0);
        assert!(config.results_dir.join("metrics_report.json").exists());
        assert!(config.results_dir.join("metrics_summary.txt").exists());
    }
}
