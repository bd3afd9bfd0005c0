// src/simulation/simulator.rs
//! Telemetry simulator: owns the current snapshot and its tick schedule
//!
//! Scheduling is deadline based. `start` arms the next deadline one interval
//! ahead of the injected clock, and [`TelemetrySimulator::pump`] fires every
//! tick whose deadline has passed. A new tick interval only applies when the
//! following deadline is armed, so a tick already scheduled at the old
//! interval still fires once. There is only ever one pending deadline, so
//! schedules cannot overlap.

use super::model;
use super::random::{source_for_seed, RandomSource};
use super::types::{IntervalPolicy, TelemetrySnapshot, TickInterval};
use crate::config::constants::timing;
use crate::error::TelemetryResult;
use crate::readout::ConnectionStatus;
use crate::utils::time::{MonotonicTimeProvider, TimeProvider};
use crossbeam::channel::{self, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, trace, warn};

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulatorConfig {
    #[serde(rename = "tick_interval_ms", default)]
    pub tick_interval: TickInterval,

    /// Start ticking as soon as the simulator is built
    #[serde(default = "defaults::running")]
    pub running: bool,

    #[serde(default)]
    pub interval_policy: IntervalPolicy,

    /// Fixed seed for reproducible runs; thread RNG when absent
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

mod defaults {
    pub fn running() -> bool {
        true
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval: TickInterval::Normal,
            running: defaults::running(),
            interval_policy: IntervalPolicy::Strict,
            rng_seed: None,
        }
    }
}

/// Run state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorState {
    Running,
    Stopped,
}

impl fmt::Display for SimulatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulatorState::Running => write!(f, "running"),
            SimulatorState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Callback invoked with every published snapshot
pub type SnapshotCallback = Box<dyn FnMut(&TelemetrySnapshot) + Send>;

/// Owned telemetry simulator
pub struct TelemetrySimulator {
    config: SimulatorConfig,
    snapshot: TelemetrySnapshot,
    state: SimulatorState,
    connection: ConnectionStatus,
    next_due_ms: Option<u64>,

    clock: Box<dyn TimeProvider>,
    rng: Box<dyn RandomSource>,

    callbacks: Vec<SnapshotCallback>,
    subscribers: Vec<Sender<TelemetrySnapshot>>,
    ticks_published: u64,
}

impl TelemetrySimulator {
    /// Simulator on the monotonic clock with the configured random source
    pub fn new(config: SimulatorConfig) -> Self {
        let rng = source_for_seed(config.rng_seed);
        Self::with_parts(config, MonotonicTimeProvider::new(), rng)
    }

    /// Simulator with an explicit clock and random source
    pub fn with_parts<C, R>(config: SimulatorConfig, clock: C, rng: R) -> Self
    where
        C: TimeProvider + 'static,
        R: RandomSource + 'static,
    {
        let autostart = config.running;
        let mut simulator = Self {
            config,
            snapshot: model::initialize(),
            state: SimulatorState::Stopped,
            connection: ConnectionStatus::Connected,
            next_due_ms: None,
            clock: Box::new(clock),
            rng: Box::new(rng),
            callbacks: Vec::new(),
            subscribers: Vec::new(),
            ticks_published: 0,
        };

        if autostart {
            simulator.start();
        }
        simulator
    }

    /// Current snapshot; remains valid while stopped
    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.snapshot
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn state(&self) -> SimulatorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimulatorState::Running
    }

    pub fn tick_interval(&self) -> TickInterval {
        self.config.tick_interval
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.connection
    }

    /// Clock reading of the pending tick, if running
    pub fn next_deadline(&self) -> Option<u64> {
        self.next_due_ms
    }

    /// Snapshots published since construction
    pub fn ticks_published(&self) -> u64 {
        self.ticks_published
    }

    /// Begin ticking; the first tick is one interval from now
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let now = self.clock.now_millis();
        self.state = SimulatorState::Running;
        self.next_due_ms = Some(now.saturating_add(self.config.tick_interval.as_millis()));
        info!(interval = %self.config.tick_interval, "telemetry simulation started");
    }

    /// Halt future ticks; the last snapshot stays readable
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state = SimulatorState::Stopped;
        self.next_due_ms = None;
        info!(ticks = self.ticks_published, "telemetry simulation stopped");
    }

    /// Change the tick rate; the already-armed tick keeps its deadline
    pub fn set_tick_interval(&mut self, ms: u64) -> TelemetryResult<TickInterval> {
        let interval = self.config.interval_policy.resolve(ms)?;
        if interval != self.config.tick_interval {
            info!(from = %self.config.tick_interval, to = %interval, "tick interval changed");
            self.config.tick_interval = interval;
        }
        Ok(interval)
    }

    /// Restore the seed snapshot with uptime cleared; leaves the simulator stopped
    pub fn reset(&mut self) -> TelemetrySnapshot {
        self.stop();
        self.snapshot = model::reset_snapshot();
        info!("telemetry snapshot reset");
        self.snapshot
    }

    /// Connection toggle off: stop ticking
    pub fn disconnect(&mut self) {
        self.stop();
        self.connection = ConnectionStatus::Disconnected;
        info!("device disconnected");
    }

    /// Connection toggle on: fresh snapshot, then resume ticking
    pub fn connect(&mut self) -> TelemetrySnapshot {
        self.connection = ConnectionStatus::Connecting;
        let snapshot = self.reset();
        self.connection = ConnectionStatus::Connected;
        self.start();
        info!("device connected");
        snapshot
    }

    /// Fire every tick whose deadline has passed; returns how many fired
    pub fn pump(&mut self) -> usize {
        self.pump_collect().len()
    }

    /// Like [`pump`](Self::pump), returning the fired snapshots in order
    ///
    /// At most `MAX_CATCH_UP_TICKS` fire per call; older missed deadlines are
    /// skipped and the schedule is realigned to the next one after now.
    pub fn pump_collect(&mut self) -> Vec<TelemetrySnapshot> {
        let now = self.clock.now_millis();
        let mut fired = Vec::new();

        while let Some(due) = self.next_due_ms {
            if due > now || !self.is_running() {
                break;
            }
            let interval = self.config.tick_interval.as_millis();
            if fired.len() >= timing::MAX_CATCH_UP_TICKS {
                let skipped = (now - due) / interval + 1;
                self.next_due_ms = Some(due.saturating_add(skipped.saturating_mul(interval)));
                warn!(skipped, "tick catch-up limit reached; skipping missed deadlines");
                break;
            }
            fired.push(self.fire_tick());
            self.next_due_ms = Some(due.saturating_add(interval));
        }

        fired
    }

    /// Deliver snapshots to a callback
    pub fn on_snapshot<F>(&mut self, callback: F)
    where
        F: FnMut(&TelemetrySnapshot) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Deliver snapshots over a channel; dropped receivers are pruned
    pub fn subscribe(&mut self) -> Receiver<TelemetrySnapshot> {
        let (tx, rx) = channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn fire_tick(&mut self) -> TelemetrySnapshot {
        self.snapshot = model::tick(&self.snapshot, &mut self.rng);
        self.ticks_published += 1;
        trace!(
            tick = self.ticks_published,
            emg = self.snapshot.emg_signal,
            battery = self.snapshot.battery_level,
            "telemetry tick"
        );
        self.publish();
        self.snapshot
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot;
        for callback in self.callbacks.iter_mut() {
            callback(&snapshot);
        }

        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(snapshot).is_ok());
        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            debug!(dropped, "pruned closed snapshot subscribers");
        }
    }
}

impl fmt::Debug for TelemetrySimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetrySimulator")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("connection", &self.connection)
            .field("next_due_ms", &self.next_due_ms)
            .field("ticks_published", &self.ticks_published)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TelemetryError;
    use crate::simulation::random::ScriptedSource;
    use crate::simulation::types::Uptime;
    use crate::utils::time::MockTimeProvider;
    use std::sync::Arc;

    fn stopped_config() -> SimulatorConfig {
        SimulatorConfig {
            running: false,
            ..Default::default()
        }
    }

    fn build(config: SimulatorConfig) -> (TelemetrySimulator, Arc<MockTimeProvider>) {
        let clock = Arc::new(MockTimeProvider::new(0));
        let sim = TelemetrySimulator::with_parts(config, Arc::clone(&clock), ScriptedSource::constant(0.5));
        (sim, clock)
    }

    #[test]
    fn test_config_defaults() {
        let config = SimulatorConfig::default();
        assert_eq!(config.tick_interval, TickInterval::Normal);
        assert!(config.running);
        assert_eq!(config.interval_policy, IntervalPolicy::Strict);
    }

    #[test]
    fn test_autostart_arms_first_deadline() {
        let (sim, _clock) = build(SimulatorConfig::default());
        assert!(sim.is_running());
        assert_eq!(sim.next_deadline(), Some(1000));
    }

    #[test]
    fn test_stopped_simulator_never_ticks() {
        let (mut sim, clock) = build(stopped_config());
        clock.advance_by(10_000);
        assert_eq!(sim.pump(), 0);
        assert_eq!(sim.snapshot(), model::initialize());
    }

    #[test]
    fn test_pump_catches_up_missed_deadlines() {
        let (mut sim, clock) = build(SimulatorConfig::default());
        clock.advance_by(3500);
        assert_eq!(sim.pump(), 3);
        assert_eq!(sim.next_deadline(), Some(4000));
        assert_eq!(sim.snapshot().uptime, Uptime::new(2, 37));
    }

    #[test]
    fn test_pump_collect_returns_fired_snapshots() {
        let (mut sim, clock) = build(SimulatorConfig::default());
        clock.advance_by(2500);
        let fired = sim.pump_collect();
        assert_eq!(fired.len(), 2);
        assert_eq!(fired[1], sim.snapshot());
        assert!(sim.pump_collect().is_empty());
    }

    #[test]
    fn test_catch_up_is_capped_and_realigned() {
        let (mut sim, clock) = build(SimulatorConfig::default());
        clock.set_time(10_000_500);
        assert_eq!(sim.pump(), timing::MAX_CATCH_UP_TICKS);
        assert_eq!(sim.ticks_published(), timing::MAX_CATCH_UP_TICKS as u64);
        assert_eq!(sim.next_deadline(), Some(10_001_000));

        clock.set_time(10_001_000);
        assert_eq!(sim.pump(), 1);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (mut sim, clock) = build(SimulatorConfig::default());
        clock.advance_by(1000);
        sim.pump();
        let last = sim.snapshot();

        sim.stop();
        sim.stop();
        clock.advance_by(5000);
        assert_eq!(sim.pump(), 0);
        assert_eq!(sim.snapshot(), last);
        assert_eq!(sim.ticks_published(), 1);
    }

    #[test]
    fn test_interval_change_applies_after_in_flight_tick() {
        let (mut sim, clock) = build(SimulatorConfig::default());
        clock.set_time(1500);
        assert_eq!(sim.pump(), 1);

        sim.set_tick_interval(2000).unwrap();
        assert_eq!(sim.next_deadline(), Some(2000));

        clock.set_time(2000);
        assert_eq!(sim.pump(), 1);
        assert_eq!(sim.next_deadline(), Some(4000));

        clock.set_time(3999);
        assert_eq!(sim.pump(), 0);
        clock.set_time(4000);
        assert_eq!(sim.pump(), 1);
    }

    #[test]
    fn test_invalid_interval_strict() {
        let (mut sim, _clock) = build(SimulatorConfig::default());
        let result = sim.set_tick_interval(300);
        assert!(matches!(result, Err(TelemetryError::InvalidConfiguration { .. })));
        assert_eq!(sim.tick_interval(), TickInterval::Normal);
    }

    #[test]
    fn test_invalid_interval_nearest() {
        let config = SimulatorConfig {
            interval_policy: IntervalPolicy::Nearest,
            ..Default::default()
        };
        let (mut sim, _clock) = build(config);
        assert_eq!(sim.set_tick_interval(300).unwrap(), TickInterval::Fast);
        assert_eq!(sim.tick_interval(), TickInterval::Fast);
    }

    #[test]
    fn test_reset_stops_and_restores_seed() {
        let (mut sim, clock) = build(SimulatorConfig::default());
        clock.advance_by(5000);
        sim.pump();

        let snapshot = sim.reset();
        assert!(!sim.is_running());
        assert_eq!(snapshot, model::reset_snapshot());
        assert_eq!(sim.snapshot().uptime, Uptime::ZERO);
    }

    #[test]
    fn test_subscribers_and_callbacks_receive_ticks() {
        let (mut sim, clock) = build(SimulatorConfig::default());
        let rx = sim.subscribe();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        sim.on_snapshot(move |s| sink.lock().push(s.uptime));

        clock.advance_by(2000);
        sim.pump();

        assert_eq!(rx.try_iter().count(), 2);
        assert_eq!(*seen.lock(), vec![Uptime::new(2, 35), Uptime::new(2, 36)]);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let (mut sim, clock) = build(SimulatorConfig::default());
        drop(sim.subscribe());
        clock.advance_by(1000);
        sim.pump();
        assert!(sim.subscribers.is_empty());
    }

    #[test]
    fn test_connection_toggle() {
        let (mut sim, clock) = build(SimulatorConfig::default());
        sim.disconnect();
        assert_eq!(sim.connection_status(), ConnectionStatus::Disconnected);
        assert!(!sim.is_running());

        clock.advance_by(1000);
        let snapshot = sim.connect();
        assert_eq!(snapshot.uptime, Uptime::ZERO);
        assert_eq!(sim.connection_status(), ConnectionStatus::Connected);
        assert_eq!(sim.next_deadline(), Some(2000));
    }
}
