// src/simulation/random.rs
//! Random sources for the telemetry walk
//!
//! The model only needs uniform draws in `[0, 1)`. Production code uses the
//! thread RNG, reproducible runs use a seeded `StdRng`, and tests script the
//! exact draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform samples in `[0, 1)`
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Any `rand` generator is a random source
#[derive(Debug, Clone)]
pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Reproducible source seeded from a `u64`
pub type SeededSource = RngSource<StdRng>;

impl SeededSource {
    pub fn seeded(seed: u64) -> Self {
        RngSource::new(StdRng::seed_from_u64(seed))
    }
}

/// Fresh entropy per draw via the thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Build the source selected by configuration
pub fn source_for_seed(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SeededSource::seeded(seed)),
        None => Box::new(ThreadRandom),
    }
}

/// Replays a fixed list of draws, cycling when exhausted
///
/// Values are clamped into `[0, 1)`; an empty script yields `0.5`, which makes
/// every centred walk step zero.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    script: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            script: values.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Every draw returns `value`
    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.script.is_empty() {
            return 0.5;
        }
        let value = self.script[self.cursor % self.script.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
