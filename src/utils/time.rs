//! Clock abstraction for tick scheduling
//!
//! The simulator never reads the wall clock directly. It asks a
//! [`TimeProvider`] for a millisecond reading so tests can drive time by
//! hand with [`MockTimeProvider`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Time provider trait for dependency injection and testing
pub trait TimeProvider: Send + Sync {
    /// Milliseconds since an arbitrary, fixed origin
    fn now_millis(&self) -> u64;
}

impl<T: TimeProvider + ?Sized> TimeProvider for Arc<T> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// Monotonic provider measuring from its own construction
#[derive(Debug, Clone)]
pub struct MonotonicTimeProvider {
    origin: Instant,
}

impl MonotonicTimeProvider {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for MonotonicTimeProvider {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Mock time provider for deterministic testing
#[derive(Debug, Default)]
pub struct MockTimeProvider {
    current_time: AtomicU64,
}

impl MockTimeProvider {
    pub fn new(initial_time_millis: u64) -> Self {
        Self {
            current_time: AtomicU64::new(initial_time_millis),
        }
    }

    pub fn advance_by(&self, millis: u64) {
        self.current_time.fetch_add(millis, Ordering::Relaxed);
    }

    pub fn set_time(&self, millis: u64) {
        self.current_time.store(millis, Ordering::Relaxed);
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_millis(&self) -> u64 {
        self.current_time.load(Ordering::Relaxed)
    }
}

/// Provider backed by `tokio::time::Instant`, so paused test time applies
#[cfg(feature = "runtime")]
#[derive(Debug, Clone)]
pub struct TokioTimeProvider {
    origin: tokio::time::Instant,
}

#[cfg(feature = "runtime")]
impl TokioTimeProvider {
    pub fn new() -> Self {
        Self { origin: tokio::time::Instant::now() }
    }

    /// Tokio instant corresponding to a millisecond reading of this provider
    pub fn instant_at(&self, millis: u64) -> tokio::time::Instant {
        self.origin + std::time::Duration::from_millis(millis)
    }
}

#[cfg(feature = "runtime")]
impl Default for TokioTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "runtime")]
impl TimeProvider for TokioTimeProvider {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}
