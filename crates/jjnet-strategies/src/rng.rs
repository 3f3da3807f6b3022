//! Scalar random sources.
//!
//! The uniform sources are deterministic: each owns a ChaCha8 generator
//! seeded with [`DEFAULT_SEED`] unless reseeded, so two sources built with
//! the same parameters produce the same sequence.

use jjnet_core::RandomSource;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed used by freshly constructed uniform sources.
pub const DEFAULT_SEED: u64 = 12345;

/// Always returns the same value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstRng {
    /// The value returned by every draw.
    pub value: f64,
}

impl ConstRng {
    /// A source fixed at `value`.
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl RandomSource for ConstRng {
    fn generate(&mut self) -> f64 {
        self.value
    }

    fn seed(&mut self, _seed: u64) {}

    fn clone_box(&self) -> Box<dyn RandomSource> {
        Box::new(*self)
    }
}

/// Uniform on `[min, max)`.
#[derive(Clone, Debug)]
pub struct UniformRangeRng {
    min: f64,
    max: f64,
    rng: ChaCha8Rng,
}

impl UniformRangeRng {
    /// Uniform on `[min, max)`. A zero-width range always yields `min`.
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            rng: ChaCha8Rng::seed_from_u64(DEFAULT_SEED),
        }
    }

    /// Same source, seeded with `seed` instead of the default.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound (exclusive).
    pub fn max(&self) -> f64 {
        self.max
    }
}

impl RandomSource for UniformRangeRng {
    fn generate(&mut self) -> f64 {
        self.min + (self.max - self.min) * self.rng.random::<f64>()
    }

    fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    fn clone_box(&self) -> Box<dyn RandomSource> {
        Box::new(self.clone())
    }
}

/// Uniform on `[mean - range/2, mean + range/2)`.
#[derive(Clone, Debug)]
pub struct UniformRng {
    mean: f64,
    range: f64,
    inner: UniformRangeRng,
}

impl UniformRng {
    /// Uniform around `mean` with total width `range`.
    pub fn new(mean: f64, range: f64) -> Self {
        let half = range / 2.0;
        Self {
            mean,
            range,
            inner: UniformRangeRng::new(mean - half, mean + half),
        }
    }

    /// Same source, seeded with `seed` instead of the default.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.inner = self.inner.with_seed(seed);
        self
    }

    /// Center of the distribution.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Total width of the distribution.
    pub fn range(&self) -> f64 {
        self.range
    }
}

impl RandomSource for UniformRng {
    fn generate(&mut self) -> f64 {
        self.inner.generate()
    }

    fn seed(&mut self, seed: u64) {
        self.inner.seed(seed);
    }

    fn clone_box(&self) -> Box<dyn RandomSource> {
        Box::new(self.clone())
    }
}
