//! Pluggable random sources
//!
//! Every stochastic decision of the engine (glyph jitter, paper grain, rule
//! wobble, simulated corrections) draws from a `RandomSource`, so the same
//! code path serves both unseeded "hot" rendering and reproducible tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A stream of uniform samples in `[0, 1)`
pub trait RandomSource {
    fn next(&mut self) -> f64;

    /// A sample in `[-span/2, span/2)`
    fn symmetric(&mut self, span: f32) -> f32 {
        ((self.next() - 0.5) * span as f64) as f32
    }

    /// A sample in `[0, max)`
    fn up_to(&mut self, max: f32) -> f32 {
        (self.next() * max as f64) as f32
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next(&mut self) -> f64 {
        (**self).next()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next(&mut self) -> f64 {
        (**self).next()
    }
}

/// Unseeded randomness; two renders of the same input differ
#[derive(Debug)]
pub struct EntropyRandom {
    rng: StdRng,
}

impl EntropyRandom {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for EntropyRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropyRandom {
    fn next(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Reproducible randomness from a seed
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// A fixed pool of pre-drawn samples, replayed cyclically.
///
/// After `reset()` the same sequence is produced again, so re-rendering a page
/// with a reset pool reproduces its messiness exactly.
#[derive(Debug, Clone)]
pub struct PooledRandom {
    pool: Vec<f64>,
    index: usize,
}

impl PooledRandom {
    pub const DEFAULT_POOL_SIZE: usize = 8000;

    /// Fill a pool from an existing source
    pub fn from_source(source: &mut impl RandomSource, size: usize) -> Self {
        let pool = (0..size.max(1)).map(|_| source.next()).collect();
        Self { pool, index: 0 }
    }

    /// A default-sized pool drawn from a seed
    pub fn seeded(seed: u64) -> Self {
        Self::from_source(&mut SeededRandom::new(seed), Self::DEFAULT_POOL_SIZE)
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

impl RandomSource for PooledRandom {
    fn next(&mut self) -> f64 {
        if self.index >= self.pool.len() {
            self.index = 0;
        }
        let value = self.pool[self.index];
        self.index += 1;
        value
    }
}

/// Always yields the same sample; `ConstantRandom(0.5)` centers every
/// symmetric draw on zero
#[derive(Debug, Clone, Copy)]
pub struct ConstantRandom(pub f64);

impl RandomSource for ConstantRandom {
    fn next(&mut self) -> f64 {
        self.0
    }
}
