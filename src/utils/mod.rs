//! Common utility functions for the telemetry crate
//!
//! - Clock abstraction with a mockable provider
//! - Range clamping and random-walk helpers

pub mod bounds;
pub mod time;

pub use bounds::{check_numeric_range, clamp_to_range, walk, within};
pub use time::{MockTimeProvider, MonotonicTimeProvider, TimeProvider};

#[cfg(feature = "runtime")]
pub use time::TokioTimeProvider;
