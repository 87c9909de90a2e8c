//! Deterministic sampler RNG.
//!
//! The local planner draws its candidate velocities from a [`SampleRng`]
//! that the caller constructs and owns.  Tests seed it explicitly so the
//! sampled candidate set — and therefore the selected velocity — is fully
//! reproducible; production callers may seed from entropy.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seedable RNG handed to sampling code.
///
/// Wraps `SmallRng` so the choice of generator is a single-crate decision and
/// callers never name `rand` types directly.
pub struct SampleRng(SmallRng);

impl SampleRng {
    /// Deterministic generator from an explicit seed.  The same seed always
    /// produces the same sample sequence.
    pub fn seeded(seed: u64) -> Self {
        SampleRng(SmallRng::seed_from_u64(seed))
    }

    /// Generator seeded from OS entropy, for hosts that don't need
    /// reproducibility.
    pub fn from_entropy() -> Self {
        SampleRng(SmallRng::from_entropy())
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
