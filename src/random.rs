//! Random number generation.
//!
//! Everything random in hall (drawing samples of a variable, deciding
//! whether an event occurs) reduces to one uniform draw in `[0, 1)` from a
//! caller-supplied generator. Nothing keeps a generator of its own.
//!
//! # Reproducibility
//!
//! For reproducible experiments, use [`create_rng`] with a fixed seed.
//! The underlying algorithm (SmallRng) is deterministic for a given seed
//! on the same platform.

use rand::Rng;

/// Creates a fast, seeded random number generator.
///
/// Uses `SmallRng` (Xoshiro256++) for high performance.
/// The sequence is deterministic for a given seed on the same platform.
///
/// # Examples
/// ```
/// use hall::random::{create_rng, uniform_sample};
/// let mut rng = create_rng(42);
/// let u = uniform_sample(&mut rng);
/// assert!((0.0..1.0).contains(&u));
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// One uniform draw from `[0, 1)`.
///
/// The input to inverse transform sampling and to random event outcomes.
pub fn uniform_sample<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}
