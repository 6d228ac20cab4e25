//! Fixed-width random decimal suffixes.
//!
//! The randomness is not cryptographically strong and does not need to be:
//! random suffixes make collisions unlikely, they do not make IDs secret.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest width whose bound `10^width` fits in a `u64`.
pub const MAX_RANDOM_WIDTH: u32 = 19;

/// A source of uniformly distributed integers.
pub trait RandomSource: Send + Sync {
    /// Returns a value drawn uniformly from `[0, bound)`; `0` when `bound` is `0`.
    fn below(&self, bound: u64) -> u64;
}

/// Thread-local generator seeded from the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn below(&self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        rand::rng().random_range(0..bound)
    }
}

/// A reproducible generator for tests and replay.
#[derive(Debug)]
pub struct SeededRandom(Mutex<StdRng>);

impl SeededRandom {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self(Mutex::new(StdRng::seed_from_u64(seed)))
    }
}

impl RandomSource for SeededRandom {
    fn below(&self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        let mut rng = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(0..bound)
    }
}

/// Formats random draws as `width` zero-padded decimal digits.
///
/// The width is not validated. Widths above [`MAX_RANDOM_WIDTH`] saturate
/// the bound at `u64::MAX` and are padded to `width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomSuffix {
    width: u32,
}

impl RandomSuffix {
    #[must_use]
    pub const fn new(width: u32) -> Self {
        Self { width }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Exclusive upper bound of the drawn value.
    #[must_use]
    pub fn bound(&self) -> u64 {
        10u64.saturating_pow(self.width)
    }

    /// Draws one suffix from `source`.
    pub fn generate(&self, source: &dyn RandomSource) -> String {
        let value = source.below(self.bound());
        format!("{:0width$}", value, width = self.width as usize)
    }
}
