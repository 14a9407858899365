//! Deterministic random number generation.
//!
//! Every random decision the engine makes (deck shuffles, wave sizes, slot
//! placement, template picks, elite rolls) draws from one seeded `GameRng`
//! owned by the game state. The same seed and the same command sequence
//! therefore always produce the same game.
//!
//! ```
//! use card_gauntlet::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//!
//! assert_eq!(a.gen_range_inclusive(1, 6), b.gen_range_inclusive(1, 6));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random integer in `min..=max`.
    ///
    /// Returns `min` when the range is empty or degenerate.
    pub fn gen_range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..=max)
    }

    /// Generate a random usize in `0..len`.
    pub fn gen_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Generate a random boolean with given probability of true.
    ///
    /// Probabilities outside `0.0..=1.0` are clamped; NaN is never true.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }
}
