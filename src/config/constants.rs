// src/config/constants.rs
//! System-wide telemetry constants
//!
//! Every range, walk amplitude and seed value used by the simulator lives
//! here so the model code carries no magic numbers.

/// Closed ranges for every bounded snapshot field, as `(min, max)`
pub mod ranges {
    pub const EMG_SIGNAL: (f64, f64) = (20.0, 100.0);
    pub const EMG_PEAK: (f64, f64) = (0.0, 100.0);
    pub const EMG_AVERAGE: (f64, f64) = (0.0, 100.0);
    pub const BATTERY_LEVEL: (f64, f64) = (0.0, 100.0);
    pub const VOLTAGE: (f64, f64) = (3.0, 3.7);
    pub const TEMPERATURE: (f64, f64) = (18.0, 35.0);
    pub const FINGER_ANGLE: (f64, f64) = (0.0, 180.0);
    pub const RESPONSE_TIME_MS: (f64, f64) = (8.0, 25.0);
    pub const ACCURACY_PCT: (f64, f64) = (85.0, 99.0);
    pub const CPU_USAGE_PCT: (f64, f64) = (15.0, 40.0);
    pub const MEMORY_USAGE_PCT: (f64, f64) = (30.0, 60.0);
    pub const FPS: (f64, f64) = (15.0, 30.0);
}

/// Random-walk amplitudes; a step is `(r - 0.5) * amplitude`
pub mod walk {
    pub const EMG_AMPLITUDE: f64 = 15.0;
    pub const TEMPERATURE_AMPLITUDE: f64 = 0.8;
    pub const FINGER_AMPLITUDE: f64 = 6.0;
    pub const RESPONSE_TIME_AMPLITUDE: f64 = 3.0;
    pub const ACCURACY_AMPLITUDE: f64 = 1.5;
    pub const CPU_AMPLITUDE: f64 = 5.0;
    pub const MEMORY_AMPLITUDE: f64 = 3.0;

    /// Battery only drains: `r * MAX_BATTERY_DRAIN` per tick
    pub const MAX_BATTERY_DRAIN: f64 = 0.02;

    /// Uniform draws consumed by one tick
    pub const DRAWS_PER_TICK: usize = 12;
}

/// Coefficients for the derived fields
pub mod derived {
    pub const EMG_PEAK_DECAY: f64 = 0.95;
    pub const EMG_AVERAGE_RETAIN: f64 = 0.9;
    pub const EMG_AVERAGE_GAIN: f64 = 0.1;

    pub const NOMINAL_VOLTAGE: f64 = 3.7;
    pub const MIN_VOLTAGE: f64 = 3.0;
    pub const LOW_BATTERY_THRESHOLD: f64 = 20.0;
    pub const VOLTAGE_REFERENCE_BATTERY: f64 = 87.0;
    pub const VOLTAGE_PER_BATTERY_PCT: f64 = 0.01;

    pub const MAX_FPS: f64 = 30.0;
    pub const MIN_FPS: f64 = 15.0;
    pub const FPS_CPU_KNEE_PCT: f64 = 30.0;
    pub const FPS_PER_CPU_PCT: f64 = 0.5;

    pub const MINUTES_PER_HOUR: u8 = 60;
}

/// Seed snapshot values used on construction and reset
pub mod seed {
    pub const EMG_SIGNAL: f64 = 75.0;
    pub const EMG_PEAK: f64 = 90.0;
    pub const EMG_AVERAGE: f64 = 60.0;
    pub const BATTERY_LEVEL: f64 = 87.0;
    pub const VOLTAGE: f64 = 3.7;
    pub const TEMPERATURE: f64 = 23.5;
    pub const FINGER_ANGLES: [f64; 5] = [90.0, 45.0, 120.0, 30.0, 75.0];
    pub const RESPONSE_TIME_MS: f64 = 12.0;
    pub const LATENCY_MS: f64 = 12.0;
    pub const ACCURACY_PCT: f64 = 94.2;
    pub const CPU_USAGE_PCT: f64 = 23.0;
    pub const MEMORY_USAGE_PCT: f64 = 45.0;
    pub const FPS: f64 = 30.0;
    pub const UPTIME_HOURS: u32 = 2;
    pub const UPTIME_MINUTES: u8 = 34;
}

/// Tick scheduling constants
pub mod timing {
    pub const FAST_TICK_MS: u64 = 500;
    pub const NORMAL_TICK_MS: u64 = 1000;
    pub const SLOW_TICK_MS: u64 = 2000;
    pub const ALLOWED_TICK_MS: [u64; 3] = [FAST_TICK_MS, NORMAL_TICK_MS, SLOW_TICK_MS];

    /// Driver wait while stopped; controls wake it earlier
    pub const IDLE_POLL_MS: u64 = 60_000;

    /// Most ticks a single pump fires after a stall
    pub const MAX_CATCH_UP_TICKS: usize = 600;
}

/// Device-control panel constants
pub mod hand {
    pub const FINGER_COUNT: usize = 5;
    pub const DEFAULT_FINGER_ANGLE: f64 = 90.0;
    pub const OPEN_ANGLE: f64 = 180.0;
    pub const CLOSED_ANGLE: f64 = 0.0;
}

/// Dashboard classification thresholds
pub mod readout {
    pub const BATTERY_GOOD_ABOVE_PCT: f64 = 50.0;
    pub const BATTERY_FAIR_ABOVE_PCT: f64 = 20.0;
    pub const LATENCY_NOMINAL_BELOW_MS: f64 = 15.0;
}

/// File system paths
pub mod paths {
    pub const SYSTEM_CONFIG_PATH: &str = "/etc/pros-hand/telemetry.toml";
    pub const USER_CONFIG_DIR: &str = ".pros-hand";
    pub const USER_CONFIG_FILE: &str = "telemetry.toml";
    pub const DEFAULT_CONFIG_FILE: &str = "telemetry.toml";
    pub const LOCAL_CONFIG_FILE: &str = "telemetry.local.toml";
    pub const ENV_PREFIX: &str = "PROS_";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_within_ranges() {
        let within = |v: f64, (lo, hi): (f64, f64)| v >= lo && v <= hi;
        assert!(within(seed::EMG_SIGNAL, ranges::EMG_SIGNAL));
        assert!(within(seed::BATTERY_LEVEL, ranges::BATTERY_LEVEL));
        assert!(within(seed::TEMPERATURE, ranges::TEMPERATURE));
        assert!(within(seed::ACCURACY_PCT, ranges::ACCURACY_PCT));
        assert!(within(seed::CPU_USAGE_PCT, ranges::CPU_USAGE_PCT));
        assert!(within(seed::MEMORY_USAGE_PCT, ranges::MEMORY_USAGE_PCT));
        assert!(seed::FINGER_ANGLES.iter().all(|&a| within(a, ranges::FINGER_ANGLE)));
    }

    #[test]
    fn test_tick_intervals_sorted() {
        assert!(timing::ALLOWED_TICK_MS.windows(2).all(|w| w[0] < w[1]));
    }
}
