use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use interop_harness::config_loader;
use interop_harness::node::{Libp2pHost, NodeDriver, NodeOutcome};

/// Ping interoperability node: responds when run bare, dials when given a peer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Peer address to dial, e.g. /ip4/1.2.3.4/tcp/4001/p2p/<peer id>
    target: Option<String>,

    /// TCP port to listen on (0 = ephemeral); overrides the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to the harness configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let mut config = config_loader::load_or_default(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.node.listen_port = port;
    }

    match &args.target {
        Some(target) => info!("Starting node in initiator mode, target {}", target),
        None => info!("Starting node in responder mode"),
    }

    let rt = tokio::runtime::Runtime::new().wrap_err("Failed to start async runtime")?;
    let mut driver = NodeDriver::new(std::io::stdout(), config.node.clone());
    let outcome = rt.block_on(driver.run(
        || Libp2pHost::generate(&config.node),
        args.target.as_deref(),
        shutdown_signal(),
    ))?;

    match outcome {
        NodeOutcome::ShutdownRequested => info!("Node stopped."),
        NodeOutcome::ConnectFailed => info!("Node finished without reaching its peer"),
        NodeOutcome::ProbesCompleted { active, failed } => {
            info!("Node finished: {} active, {} failed", active, failed)
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM (Unix)
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                log::warn!("Cannot listen for SIGTERM: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
