// src/config/loader.rs
//! Layered configuration loader
//!
//! Layers, lowest precedence first: built-in defaults, the system file, the
//! user file, `telemetry.toml`, `telemetry.local.toml`, then `PROS_*`
//! environment variables. Tables merge key by key.

use crate::config::{constants::paths, SystemConfig};
use crate::simulation::TickInterval;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration loading errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
    #[error("Configuration parse error: {0}")]
    ParseError(String),
    #[error("Configuration validation errors: {}", .0.join("; "))]
    ValidationError(Vec<String>),
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Configuration loader
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Loader over the standard search paths
    pub fn new() -> Self {
        Self::with_paths(Self::discover_config_paths())
    }

    /// Loader with custom paths, lowest precedence first
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            env_prefix: paths::ENV_PREFIX.to_string(),
        }
    }

    /// Use a different environment prefix (mostly for tests)
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = prefix.to_string();
        self
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Load, merge and validate the system configuration
    pub fn load_system_config(&self) -> Result<SystemConfig, ConfigError> {
        let mut merged = toml::Value::try_from(SystemConfig::default())?;

        for path in &self.config_paths {
            match self.load_config_file(path) {
                Ok(file_config) => {
                    debug!(path = %path.display(), "merging configuration file");
                    merge_toml_values(&mut merged, file_config);
                }
                Err(ConfigError::FileNotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        self.apply_environment_overrides(&mut merged);
        normalize_tick_interval(&mut merged);

        let config: SystemConfig = merged.try_into()?;
        config
            .validate_consistency()
            .map_err(ConfigError::ValidationError)?;

        info!(
            interval = %config.simulator.tick_interval,
            running = config.simulator.running,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parse and validate a single file on top of the defaults
    pub fn validate_config_file<P: AsRef<Path>>(&self, path: P) -> Result<SystemConfig, ConfigError> {
        let mut merged = toml::Value::try_from(SystemConfig::default())?;
        merge_toml_values(&mut merged, self.load_config_file(path)?);
        normalize_tick_interval(&mut merged);

        let config: SystemConfig = merged.try_into()?;
        config
            .validate_consistency()
            .map_err(ConfigError::ValidationError)?;
        Ok(config)
    }

    /// Write a configuration out as pretty TOML
    pub fn export_config<P: AsRef<Path>>(&self, config: &SystemConfig, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn load_config_file<P: AsRef<Path>>(&self, path: P) -> Result<toml::Value, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let value: toml::Value = toml::from_str(&content)?;
        Ok(value)
    }

    /// `PROS_SIMULATOR_TICK_INTERVAL_MS=500` sets `simulator.tick_interval_ms`
    fn apply_environment_overrides(&self, config: &mut toml::Value) {
        for (key, value) in std::env::vars() {
            let Some(rest) = key.strip_prefix(&self.env_prefix) else {
                continue;
            };
            let rest = rest.to_lowercase();
            let Some((section, field)) = rest.split_once('_') else {
                warn!(variable = %key, "ignoring environment override without a section");
                continue;
            };

            debug!(variable = %key, "applying environment override");
            set_nested_value(config, section, field, parse_env_value(&value));
        }
    }

    fn discover_config_paths() -> Vec<PathBuf> {
        let mut config_paths = vec![PathBuf::from(paths::SYSTEM_CONFIG_PATH)];

        if let Some(home) = home_dir() {
            config_paths.push(home.join(paths::USER_CONFIG_DIR).join(paths::USER_CONFIG_FILE));
        }

        config_paths.push(PathBuf::from(paths::DEFAULT_CONFIG_FILE));
        config_paths.push(PathBuf::from(paths::LOCAL_CONFIG_FILE));
        config_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(base_value) => merge_toml_values(base_value, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base_value, overlay_value) => *base_value = overlay_value,
    }
}

fn parse_env_value(value: &str) -> toml::Value {
    if let Ok(int_val) = value.parse::<i64>() {
        toml::Value::Integer(int_val)
    } else if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}

fn set_nested_value(config: &mut toml::Value, section: &str, field: &str, value: toml::Value) {
    if let toml::Value::Table(root) = config {
        let entry = root
            .entry(section.to_string())
            .or_insert_with(|| toml::Value::Table(toml::value::Table::new()));
        if let toml::Value::Table(table) = entry {
            table.insert(field.to_string(), value);
        }
    }
}

/// Under the `nearest` policy, snap a configured interval before strict parsing
fn normalize_tick_interval(config: &mut toml::Value) {
    let Some(simulator) = config.get_mut("simulator").and_then(toml::Value::as_table_mut) else {
        return;
    };

    let policy = simulator.get("interval_policy").and_then(toml::Value::as_str);
    if policy != Some("nearest") {
        return;
    }

    if let Some(ms) = simulator.get("tick_interval_ms").and_then(toml::Value::as_integer) {
        let snapped = TickInterval::nearest(ms.max(0) as u64);
        if snapped.as_millis() as i64 != ms {
            warn!(requested = ms, using = snapped.as_millis(), "tick interval normalized");
        }
        simulator.insert(
            "tick_interval_ms".to_string(),
            toml::Value::Integer(snapped.as_millis() as i64),
        );
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("USERPROFILE").map(PathBuf::from)
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("HOME").map(PathBuf::from)
    }
}
