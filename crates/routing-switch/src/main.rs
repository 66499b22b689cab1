//! Routing switch daemon entry point.
//!
//! Reads controller events as JSON lines on stdin and writes switch
//! messages and topology queries as JSON lines on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use routing_switch::config::DEFAULT_CONFIG_PATH;
use routing_switch::logging::init_logging;
use routing_switch::{
    JsonLineBridge, RoutingSwitchConfig, RoutingSwitchDaemon, RoutingSwitchDaemonConfig,
    RoutingSwitchOrch, SystemClock,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// OpenFlow routing switch controller
#[derive(Parser, Debug)]
#[command(name = "routing-switch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Base idle timeout of path flows in seconds (overrides the config file)
    #[arg(short = 'i', long)]
    idle_timeout: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,

    /// Print the effective configuration and exit
    #[arg(long)]
    dump_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level).context("Failed to initialize logging")?;

    let mut config = RoutingSwitchConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    if let Some(idle_timeout) = args.idle_timeout {
        config.switching.idle_timeout_secs = idle_timeout;
    }
    config.validate().context("Invalid configuration")?;

    if args.dump_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    info!(
        idle_timeout_secs = config.switching.idle_timeout_secs,
        aging_timeout_secs = config.fdb.aging_timeout_secs,
        host_move_guard_secs = config.fdb.host_move_guard_secs,
        "Starting routing switch"
    );

    let (bridge, records) = JsonLineBridge::channel();
    let bridge = Arc::new(bridge);
    let orch = RoutingSwitchOrch::new(
        config.clone(),
        bridge.clone(),
        bridge.clone(),
        Arc::new(SystemClock),
    );
    drop(bridge);

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let reader = tokio::spawn(JsonLineBridge::read_events(
        BufReader::new(tokio::io::stdin()),
        events_tx,
    ));
    let writer = tokio::spawn(JsonLineBridge::write_records(tokio::io::stdout(), records));

    let daemon = RoutingSwitchDaemon::new(RoutingSwitchDaemonConfig::from(&config), orch, events_rx);
    let orch = daemon
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            warn!("Received SIGINT, shutting down gracefully...");
        })
        .await;

    let stats = orch.stats().clone();
    // Dropping the orchestrator closes the outbound stream
    drop(orch);
    reader.abort();
    match writer.await {
        Ok(Ok(written)) => info!(written, "Outbound stream flushed"),
        Ok(Err(e)) => warn!(error = %e, "Outbound stream failed"),
        Err(e) => warn!(error = %e, "Writer task failed"),
    }

    info!(
        packet_ins = stats.packet_ins,
        floods = stats.floods,
        paths_installed = stats.paths_installed,
        discards_installed = stats.discards_installed,
        packets_dropped = stats.packets_dropped,
        send_failures = stats.send_failures,
        "Routing switch stopped"
    );
    Ok(())
}
