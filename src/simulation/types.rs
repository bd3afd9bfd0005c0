// src/simulation/types.rs
//! Core telemetry types

use crate::config::constants::{derived, hand::FINGER_COUNT, timing};
use crate::error::{TelemetryError, TelemetryResult};
use crate::error_context;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fingers in the order used by every angle array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// All fingers, thumb first
    pub const ALL: [Finger; FINGER_COUNT] =
        [Finger::Thumb, Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Position in angle arrays
    pub fn index(self) -> usize {
        self as usize
    }

    /// Finger at an angle-array position
    pub fn from_index(index: usize) -> Option<Finger> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Finger::Thumb => "Thumb",
            Finger::Index => "Index",
            Finger::Middle => "Middle",
            Finger::Ring => "Ring",
            Finger::Pinky => "Pinky",
        }
    }
}

impl fmt::Display for Finger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Joint angles in degrees, indexed by [`Finger`]
pub type FingerAngles = [f64; FINGER_COUNT];

/// Device uptime, advanced one minute per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Uptime {
    pub hours: u32,
    pub minutes: u8,
}

impl Uptime {
    pub const ZERO: Uptime = Uptime { hours: 0, minutes: 0 };

    pub fn new(hours: u32, minutes: u8) -> Self {
        Self { hours, minutes }
    }

    /// Uptime one minute later, rolling minutes into hours
    pub fn advanced(self) -> Self {
        let minutes = self.minutes.saturating_add(1);
        if minutes >= derived::MINUTES_PER_HOUR {
            Self { hours: self.hours.saturating_add(1), minutes: 0 }
        } else {
            Self { hours: self.hours, minutes }
        }
    }

    pub fn total_minutes(self) -> u64 {
        self.hours as u64 * derived::MINUTES_PER_HOUR as u64 + self.minutes as u64
    }
}

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// One immutable set of telemetry values valid at a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    pub emg_signal: f64,
    pub emg_peak: f64,
    pub emg_average: f64,
    pub battery_level: f64,
    pub voltage: f64,
    pub temperature: f64,
    pub finger_angles: FingerAngles,
    pub response_time_ms: f64,
    pub latency_ms: f64,
    pub accuracy_pct: f64,
    pub cpu_usage_pct: f64,
    pub memory_usage_pct: f64,
    pub fps: f64,
    pub uptime: Uptime,
}

impl TelemetrySnapshot {
    /// Angle of a single finger
    pub fn finger_angle(&self, finger: Finger) -> f64 {
        self.finger_angles[finger.index()]
    }
}

/// Allowed tick intervals (fast/normal/slow)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum TickInterval {
    Fast,
    #[default]
    Normal,
    Slow,
}

impl TickInterval {
    pub const ALL: [TickInterval; 3] = [TickInterval::Fast, TickInterval::Normal, TickInterval::Slow];

    pub fn as_millis(self) -> u64 {
        match self {
            TickInterval::Fast => timing::FAST_TICK_MS,
            TickInterval::Normal => timing::NORMAL_TICK_MS,
            TickInterval::Slow => timing::SLOW_TICK_MS,
        }
    }

    pub fn as_duration(self) -> std::time::Duration {
        std::time::Duration::from_millis(self.as_millis())
    }

    /// Strict conversion; anything outside `ALLOWED_TICK_MS` is rejected
    pub fn from_millis(ms: u64) -> TelemetryResult<Self> {
        Self::ALL
            .into_iter()
            .find(|interval| interval.as_millis() == ms)
            .ok_or_else(|| {
                let allowed: Vec<String> = timing::ALLOWED_TICK_MS.iter().map(u64::to_string).collect();
                TelemetryError::invalid_configuration(
                    "tick_interval_ms",
                    ms,
                    allowed.join(", "),
                    error_context!("tick_interval", "from_millis"),
                )
            })
    }

    /// Closest allowed interval; ties resolve to the faster one
    pub fn nearest(ms: u64) -> Self {
        Self::ALL
            .into_iter()
            .min_by_key(|interval| interval.as_millis().abs_diff(ms))
            .unwrap_or_default()
    }
}

impl TryFrom<u64> for TickInterval {
    type Error = TelemetryError;

    fn try_from(ms: u64) -> Result<Self, Self::Error> {
        Self::from_millis(ms)
    }
}

impl From<TickInterval> for u64 {
    fn from(interval: TickInterval) -> u64 {
        interval.as_millis()
    }
}

impl fmt::Display for TickInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TickInterval::Fast => "fast",
            TickInterval::Normal => "normal",
            TickInterval::Slow => "slow",
        };
        write!(f, "{} ({} ms)", label, self.as_millis())
    }
}

/// How out-of-set tick intervals are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalPolicy {
    /// Reject with `InvalidConfiguration`
    #[default]
    Strict,
    /// Snap to the closest allowed interval
    Nearest,
}

impl IntervalPolicy {
    pub fn resolve(self, ms: u64) -> TelemetryResult<TickInterval> {
        match self {
            IntervalPolicy::Strict => TickInterval::from_millis(ms),
            IntervalPolicy::Nearest => Ok(TickInterval::nearest(ms)),
        }
    }
}
