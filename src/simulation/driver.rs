// src/simulation/driver.rs
//! Tokio task that drives a shared simulator in real time
//!
//! The task sleeps until the simulator's next deadline, pumps it, and goes
//! back to sleep. Every control call wakes the task so a changed schedule is
//! re-read; the previous sleep is abandoned rather than left running. The
//! task is aborted when the driver is shut down or dropped.
//!
//! Callbacks registered with [`TickDriver::on_snapshot`] run after the
//! simulator lock is released, so they may call back into the driver.

use super::random::{source_for_seed, RandomSource};
use super::simulator::{SimulatorConfig, SnapshotCallback, TelemetrySimulator};
use super::types::{TelemetrySnapshot, TickInterval};
use crate::config::constants::timing;
use crate::error::TelemetryResult;
use crate::readout::ConnectionStatus;
use crate::utils::time::TokioTimeProvider;
use crossbeam::channel::Receiver;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::debug;

struct Shared {
    simulator: Mutex<TelemetrySimulator>,
    callbacks: Mutex<Vec<SnapshotCallback>>,
    wake: Notify,
    clock: TokioTimeProvider,
}

/// Owner of the background tick task
pub struct TickDriver {
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
}

impl TickDriver {
    /// Spawn a driver using the configured random source
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: SimulatorConfig) -> Self {
        let rng = source_for_seed(config.rng_seed);
        Self::spawn_with_random(config, rng)
    }

    /// Spawn a driver with an explicit random source
    pub fn spawn_with_random<R>(config: SimulatorConfig, rng: R) -> Self
    where
        R: RandomSource + 'static,
    {
        let clock = TokioTimeProvider::new();
        let simulator = TelemetrySimulator::with_parts(config, clock.clone(), rng);
        let shared = Arc::new(Shared {
            simulator: Mutex::new(simulator),
            callbacks: Mutex::new(Vec::new()),
            wake: Notify::new(),
            clock,
        });

        let task = tokio::spawn(run(Arc::clone(&shared)));
        debug!("tick driver spawned");

        Self {
            shared,
            task: Some(task),
        }
    }

    /// Run `f` against the simulator, then wake the tick task
    ///
    /// Callbacks added here through `TelemetrySimulator::on_snapshot` run
    /// under the simulator lock and must not call back into the driver.
    pub fn with_simulator<T>(&self, f: impl FnOnce(&mut TelemetrySimulator) -> T) -> T {
        let result = {
            let mut simulator = self.shared.simulator.lock();
            f(&mut simulator)
        };
        self.shared.wake.notify_one();
        result
    }

    pub fn start(&self) {
        self.with_simulator(|s| s.start());
    }

    pub fn stop(&self) {
        self.with_simulator(|s| s.stop());
    }

    pub fn set_tick_interval(&self, ms: u64) -> TelemetryResult<TickInterval> {
        self.with_simulator(|s| s.set_tick_interval(ms))
    }

    pub fn reset(&self) -> TelemetrySnapshot {
        self.with_simulator(|s| s.reset())
    }

    pub fn connect(&self) -> TelemetrySnapshot {
        self.with_simulator(|s| s.connect())
    }

    pub fn disconnect(&self) {
        self.with_simulator(|s| s.disconnect());
    }

    pub fn subscribe(&self) -> Receiver<TelemetrySnapshot> {
        self.shared.simulator.lock().subscribe()
    }

    /// Deliver snapshots to a callback on the tick task
    pub fn on_snapshot<F>(&self, callback: F)
    where
        F: FnMut(&TelemetrySnapshot) + Send + 'static,
    {
        self.shared.callbacks.lock().push(Box::new(callback));
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.shared.simulator.lock().snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.shared.simulator.lock().is_running()
    }

    pub fn tick_interval(&self) -> TickInterval {
        self.shared.simulator.lock().tick_interval()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.shared.simulator.lock().connection_status()
    }

    pub fn ticks_published(&self) -> u64 {
        self.shared.simulator.lock().ticks_published()
    }

    /// Stop ticking and wait for the task to finish
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        debug!("tick driver shut down");
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(shared: Arc<Shared>) {
    loop {
        let fired = shared.simulator.lock().pump_collect();
        dispatch(&shared, &fired);

        let wake = shared.wake.notified();
        let deadline = shared.simulator.lock().next_deadline();
        match deadline {
            Some(due) => {
                tokio::select! {
                    _ = tokio::time::sleep_until(shared.clock.instant_at(due)) => {}
                    _ = wake => {}
                }
            }
            None => {
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_millis(timing::IDLE_POLL_MS)) => {}
                    _ = wake => {}
                }
            }
        }
    }
}

/// Hand fired snapshots to the driver callbacks with no lock held
fn dispatch(shared: &Shared, fired: &[TelemetrySnapshot]) {
    if fired.is_empty() {
        return;
    }

    let mut callbacks = std::mem::take(&mut *shared.callbacks.lock());
    for snapshot in fired {
        for callback in callbacks.iter_mut() {
            callback(snapshot);
        }
    }

    // keep callbacks registered while dispatching, after the existing ones
    let mut registered = shared.callbacks.lock();
    callbacks.append(&mut *registered);
    *registered = callbacks;
}
