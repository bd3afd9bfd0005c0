//! Pros Hand Telemetry: simulated sensor telemetry for the prosthetic hand dashboard
//!
//! This library produces a continuously evolving, always-plausible set of
//! readings for the Pros Hand V1.0 dashboard. It features:
//!
//! - A pure bounded random-walk model with documented ranges and seed values
//! - An owned simulator with start/stop/speed/reset controls and subscriptions
//! - A tokio tick driver with scoped cancellation
//! - Device-control state: gesture presets, calibration and recording
//! - Layered TOML configuration and `tracing` instrumentation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pros_hand_telemetry::simulation::{SimulatorConfig, TickDriver};
//!
//! #[tokio::main]
//! async fn main() {
//!     let driver = TickDriver::spawn(SimulatorConfig::default());
//!     let snapshots = driver.subscribe();
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(3)).await;
//!     for snapshot in snapshots.try_iter() {
//!         println!("EMG {:.0}%", snapshot.emg_signal);
//!     }
//!
//!     driver.shutdown().await;
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod control;
pub mod error;
pub mod logging;
pub mod readout;
pub mod simulation;
pub mod utils;

pub use config::{ConfigLoader, SystemConfig};
pub use control::{Gesture, HandController};
pub use error::{ErrorContext, TelemetryError, TelemetryResult};
pub use readout::{BatteryHealth, ConnectionStatus, LatencyGrade, Readout};
pub use simulation::{
    Finger, SimulatorConfig, TelemetrySimulator, TelemetrySnapshot, TickInterval, Uptime,
};

#[cfg(feature = "runtime")]
pub use simulation::TickDriver;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
