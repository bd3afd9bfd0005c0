//! Headless telemetry stream: prints simulated dashboard readouts

use clap::Parser;
use pros_hand_telemetry::config::{ConfigLoader, OutputFormat};
use pros_hand_telemetry::logging::init_tracing;
use pros_hand_telemetry::{Readout, TelemetrySnapshot, TickDriver};
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "pros-hand-telemetry")]
#[command(about = "Stream simulated Pros Hand sensor telemetry")]
#[command(version = pros_hand_telemetry::VERSION)]
struct Cli {
    /// Extra configuration file, applied after the standard search paths
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tick interval in milliseconds (500, 1000 or 2000)
    #[arg(long)]
    interval: Option<u64>,

    /// Stop after this many snapshots
    #[arg(long)]
    ticks: Option<u64>,

    /// Output format
    #[arg(long, value_parser = ["text", "json"])]
    format: Option<String>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config {
        let mut paths = loader.config_paths().to_vec();
        paths.push(path);
        loader = ConfigLoader::with_paths(paths);
    }
    let mut config = loader.load_system_config()?;

    init_tracing(&config.logging);

    if let Some(seed) = cli.seed {
        config.simulator.rng_seed = Some(seed);
    }
    match cli.format.as_deref() {
        Some("json") => config.output.format = OutputFormat::Json,
        Some("text") => config.output.format = OutputFormat::Text,
        _ => {}
    }

    let start_running = config.simulator.running;
    config.simulator.running = false;
    let driver = TickDriver::spawn(config.simulator.clone());
    if let Some(ms) = cli.interval {
        driver.set_tick_interval(ms)?;
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<TelemetrySnapshot>();
    driver.on_snapshot(move |snapshot| {
        let _ = tx.send(*snapshot);
    });

    let initial = driver.snapshot();
    emit(&initial, &driver, config.output.format)?;
    match start_mode(start_running, cli.ticks) {
        StartMode::Stream => {
            tracing::info!(interval = %driver.tick_interval(), "streaming telemetry");
            driver.start();
        }
        StartMode::SnapshotOnly => {
            if !start_running {
                tracing::warn!("simulator configured as stopped; printed the initial snapshot only");
            }
            driver.shutdown().await;
            return Ok(());
        }
    }

    let mut emitted = 0u64;
    loop {
        tokio::select! {
            received = rx.recv() => {
                let Some(snapshot) = received else { break };
                emit(&snapshot, &driver, config.output.format)?;
                emitted += 1;
                if cli.ticks.is_some_and(|limit| emitted >= limit) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    driver.shutdown().await;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum StartMode {
    Stream,
    SnapshotOnly,
}

/// An explicit `--ticks` limit starts the stream even when configured stopped
fn start_mode(configured_running: bool, ticks: Option<u64>) -> StartMode {
    match ticks {
        Some(0) => StartMode::SnapshotOnly,
        Some(_) => StartMode::Stream,
        None if configured_running => StartMode::Stream,
        None => StartMode::SnapshotOnly,
    }
}

fn emit(
    snapshot: &TelemetrySnapshot,
    driver: &TickDriver,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(snapshot)?),
        OutputFormat::Text => println!("{}\n", Readout::new(snapshot, driver.connection_status())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_limit_starts_stopped_simulator() {
        assert_eq!(start_mode(false, Some(3)), StartMode::Stream);
    }

    #[test]
    fn test_stopped_without_limit_prints_snapshot_only() {
        assert_eq!(start_mode(false, None), StartMode::SnapshotOnly);
    }

    #[test]
    fn test_running_config_streams() {
        assert_eq!(start_mode(true, None), StartMode::Stream);
        assert_eq!(start_mode(true, Some(2)), StartMode::Stream);
    }

    #[test]
    fn test_zero_tick_limit_prints_snapshot_only() {
        assert_eq!(start_mode(true, Some(0)), StartMode::SnapshotOnly);
    }

    #[test]
    fn test_cli_parses_tick_limit() {
        let cli = Cli::try_parse_from(["pros-hand-telemetry", "--ticks", "5", "--format", "json"]).unwrap();
        assert_eq!(cli.ticks, Some(5));
        assert_eq!(cli.format.as_deref(), Some("json"));
    }
}
