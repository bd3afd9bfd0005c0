// src/simulation/model.rs
//! Bounded random-walk telemetry model
//!
//! [`tick`] is a pure function of the previous snapshot and a random source.
//! Each base field takes one centred step, `(r - 0.5) * amplitude`, and is
//! clamped into its range; battery only drains. Derived fields are then
//! recomputed from the walked values.
//!
//! Draw order per tick: EMG, battery, temperature, thumb..pinky, response
//! time, accuracy, CPU, memory.

use super::random::RandomSource;
use super::types::{FingerAngles, TelemetrySnapshot, Uptime};
use crate::config::constants::{derived, ranges, seed, walk as amp};
use crate::utils::bounds::{clamp_to_range, walk};

/// The fixed seed snapshot
pub fn initialize() -> TelemetrySnapshot {
    TelemetrySnapshot {
        emg_signal: seed::EMG_SIGNAL,
        emg_peak: seed::EMG_PEAK,
        emg_average: seed::EMG_AVERAGE,
        battery_level: seed::BATTERY_LEVEL,
        voltage: seed::VOLTAGE,
        temperature: seed::TEMPERATURE,
        finger_angles: seed::FINGER_ANGLES,
        response_time_ms: seed::RESPONSE_TIME_MS,
        latency_ms: seed::LATENCY_MS,
        accuracy_pct: seed::ACCURACY_PCT,
        cpu_usage_pct: seed::CPU_USAGE_PCT,
        memory_usage_pct: seed::MEMORY_USAGE_PCT,
        fps: seed::FPS,
        uptime: Uptime::new(seed::UPTIME_HOURS, seed::UPTIME_MINUTES),
    }
}

/// Seed values with the uptime counter cleared
pub fn reset_snapshot() -> TelemetrySnapshot {
    TelemetrySnapshot {
        uptime: Uptime::ZERO,
        ..initialize()
    }
}

/// Compute the next snapshot from `previous`
pub fn tick<R: RandomSource + ?Sized>(previous: &TelemetrySnapshot, rng: &mut R) -> TelemetrySnapshot {
    let emg_signal = walk(previous.emg_signal, rng.next_unit(), amp::EMG_AMPLITUDE, ranges::EMG_SIGNAL);

    let drain = rng.next_unit() * amp::MAX_BATTERY_DRAIN;
    let battery_level = clamp_to_range(previous.battery_level - drain, ranges::BATTERY_LEVEL);

    let temperature = walk(
        previous.temperature,
        rng.next_unit(),
        amp::TEMPERATURE_AMPLITUDE,
        ranges::TEMPERATURE,
    );

    let mut finger_angles: FingerAngles = previous.finger_angles;
    for angle in finger_angles.iter_mut() {
        *angle = walk(*angle, rng.next_unit(), amp::FINGER_AMPLITUDE, ranges::FINGER_ANGLE);
    }

    let response_time_ms = walk(
        previous.response_time_ms,
        rng.next_unit(),
        amp::RESPONSE_TIME_AMPLITUDE,
        ranges::RESPONSE_TIME_MS,
    );
    let accuracy_pct = walk(
        previous.accuracy_pct,
        rng.next_unit(),
        amp::ACCURACY_AMPLITUDE,
        ranges::ACCURACY_PCT,
    );
    let cpu_usage_pct = walk(previous.cpu_usage_pct, rng.next_unit(), amp::CPU_AMPLITUDE, ranges::CPU_USAGE_PCT);
    let memory_usage_pct = walk(
        previous.memory_usage_pct,
        rng.next_unit(),
        amp::MEMORY_AMPLITUDE,
        ranges::MEMORY_USAGE_PCT,
    );

    TelemetrySnapshot {
        emg_signal,
        emg_peak: emg_peak(previous.emg_peak, emg_signal),
        emg_average: emg_average(previous.emg_average, emg_signal),
        battery_level,
        voltage: voltage_for_battery(battery_level),
        temperature,
        finger_angles,
        response_time_ms,
        latency_ms: response_time_ms,
        accuracy_pct,
        cpu_usage_pct,
        memory_usage_pct,
        fps: fps_for_cpu(cpu_usage_pct),
        uptime: previous.uptime.advanced(),
    }
}

/// Decaying maximum: previous peak shrinks by 5%, then rises to the signal
pub fn emg_peak(previous_peak: f64, emg_signal: f64) -> f64 {
    clamp_to_range(
        emg_signal.max(previous_peak * derived::EMG_PEAK_DECAY),
        ranges::EMG_PEAK,
    )
}

/// Exponentially smoothed EMG level
pub fn emg_average(previous_average: f64, emg_signal: f64) -> f64 {
    clamp_to_range(
        previous_average * derived::EMG_AVERAGE_RETAIN + emg_signal * derived::EMG_AVERAGE_GAIN,
        ranges::EMG_AVERAGE,
    )
}

/// Cell voltage: nominal above 20%, then sagging linearly to the 3.0 V floor
pub fn voltage_for_battery(battery_level: f64) -> f64 {
    let voltage = if battery_level > derived::LOW_BATTERY_THRESHOLD {
        derived::NOMINAL_VOLTAGE
    } else {
        let sag = (derived::VOLTAGE_REFERENCE_BATTERY - battery_level) * derived::VOLTAGE_PER_BATTERY_PCT;
        (derived::NOMINAL_VOLTAGE - sag).max(derived::MIN_VOLTAGE)
    };
    clamp_to_range(voltage, ranges::VOLTAGE)
}

/// Render rate: full speed below 30% CPU, half a frame lost per point above
pub fn fps_for_cpu(cpu_usage_pct: f64) -> f64 {
    let fps = if cpu_usage_pct < derived::FPS_CPU_KNEE_PCT {
        derived::MAX_FPS
    } else {
        (derived::MAX_FPS - (cpu_usage_pct - derived::FPS_CPU_KNEE_PCT) * derived::FPS_PER_CPU_PCT)
            .max(derived::MIN_FPS)
    };
    clamp_to_range(fps, ranges::FPS)
}
