// src/simulation/mod.rs
//! Simulated telemetry for the prosthetic hand dashboard

pub mod model;
pub mod random;
pub mod simulator;
pub mod types;

#[cfg(feature = "runtime")]
pub mod driver;

pub use model::{initialize, reset_snapshot, tick};
pub use random::{RandomSource, ScriptedSource, SeededSource, ThreadRandom};
pub use simulator::{SimulatorConfig, SimulatorState, TelemetrySimulator};
pub use types::*;

#[cfg(feature = "runtime")]
pub use driver::TickDriver;
