// tests/config_integration.rs
//! Layered configuration feeding a running simulator

use pros_hand_telemetry::config::{ConfigError, ConfigLoader, OutputFormat};
use pros_hand_telemetry::simulation::{IntervalPolicy, TelemetrySimulator};
use pros_hand_telemetry::utils::time::MockTimeProvider;
use pros_hand_telemetry::{SystemConfig, TickInterval};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn loader_over(dir: &TempDir, files: &[(&str, &str)]) -> ConfigLoader {
    let paths = files
        .iter()
        .map(|(name, body)| {
            let path = dir.path().join(name);
            fs::write(&path, body).unwrap();
            path
        })
        .collect();
    ConfigLoader::with_paths(paths).with_env_prefix("PROS_CONFIG_IT_")
}

#[test]
fn later_files_override_earlier_ones() {
    let dir = TempDir::new().unwrap();
    let loader = loader_over(
        &dir,
        &[
            ("telemetry.toml", "[simulator]\ntick_interval_ms = 2000\nrng_seed = 7\n"),
            ("telemetry.local.toml", "[simulator]\ntick_interval_ms = 500\n\n[output]\nformat = \"json\"\n"),
        ],
    );

    let config = loader.load_system_config().unwrap();
    assert_eq!(config.simulator.tick_interval, TickInterval::Fast);
    assert_eq!(config.simulator.rng_seed, Some(7));
    assert_eq!(config.output.format, OutputFormat::Json);
    assert_eq!(config.logging, SystemConfig::default().logging);
}

#[test]
fn missing_files_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_paths(vec![dir.path().join("absent.toml")])
        .with_env_prefix("PROS_CONFIG_IT_");

    assert_eq!(loader.load_system_config().unwrap(), SystemConfig::default());
}

#[test]
fn strict_policy_rejects_unlisted_interval() {
    let dir = TempDir::new().unwrap();
    let loader = loader_over(&dir, &[("telemetry.toml", "[simulator]\ntick_interval_ms = 1500\n")]);

    let err = loader.load_system_config().unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn nearest_policy_snaps_interval_and_ties_go_fast() {
    let dir = TempDir::new().unwrap();
    let loader = loader_over(
        &dir,
        &[(
            "telemetry.toml",
            "[simulator]\ninterval_policy = \"nearest\"\ntick_interval_ms = 1500\n",
        )],
    );

    let config = loader.load_system_config().unwrap();
    assert_eq!(config.simulator.interval_policy, IntervalPolicy::Nearest);
    assert_eq!(config.simulator.tick_interval, TickInterval::Normal);
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let loader = loader_over(&dir, &[("telemetry.toml", "[simulator\nrunning = ")]);

    assert!(matches!(
        loader.load_system_config(),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn loaded_config_drives_the_simulator() {
    let dir = TempDir::new().unwrap();
    let loader = loader_over(
        &dir,
        &[("telemetry.toml", "[simulator]\ntick_interval_ms = 500\nrng_seed = 42\n")],
    );
    let config = loader.load_system_config().unwrap();

    let run = |config: &SystemConfig| {
        let clock = Arc::new(MockTimeProvider::new(0));
        let mut sim = TelemetrySimulator::with_parts(
            config.simulator.clone(),
            Arc::clone(&clock),
            pros_hand_telemetry::simulation::SeededSource::seeded(config.simulator.rng_seed.unwrap()),
        );
        clock.advance_by(3000);
        assert_eq!(sim.pump(), 6);
        sim.snapshot()
    };

    assert_eq!(run(&config), run(&config));
}

#[test]
fn exported_config_round_trips_through_the_loader() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("exported.toml");

    let mut config = SystemConfig::default();
    config.simulator.tick_interval = TickInterval::Slow;
    config.simulator.running = false;
    config.logging.level = "debug".to_string();

    let loader = ConfigLoader::with_paths(vec![path.clone()]).with_env_prefix("PROS_CONFIG_IT_");
    loader.export_config(&config, &path).unwrap();

    assert_eq!(loader.validate_config_file(&path).unwrap(), config);
    assert_eq!(loader.load_system_config().unwrap(), config);
}
