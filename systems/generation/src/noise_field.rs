//! Continuous noise sources sampled by the generator.

use std::fmt;

use noise::{NoiseFn, OpenSimplex};

/// A continuous scalar field sampled at tile coordinates.
///
/// Samples are expected to fall roughly within `-1.0..=1.0`, the domain the
/// terrain thresholds are tuned for.
pub trait NoiseField {
    /// Returns the field value at the provided tile coordinates.
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<F> NoiseField for F
where
    F: Fn(f64, f64) -> f64,
{
    fn sample(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Largest magnitude 2D OpenSimplex reaches in practice.
const OPEN_SIMPLEX_EXTENT: f64 = 0.544;

/// Seeded OpenSimplex noise scaled to tile coordinates.
///
/// Raw samples are stretched from about `±0.544` onto `-1.0..=1.0` so every
/// terrain band, rock included, is reachable.
#[derive(Clone)]
pub struct SimplexField {
    seed: u32,
    noise: OpenSimplex,
    frequency: f64,
}

impl fmt::Debug for SimplexField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimplexField")
            .field("seed", &self.seed)
            .field("frequency", &self.frequency)
            .finish_non_exhaustive()
    }
}

impl SimplexField {
    /// Creates a field from a seed and a coordinate frequency.
    #[must_use]
    pub fn new(seed: u32, frequency: f64) -> Self {
        Self {
            seed,
            noise: OpenSimplex::new(seed),
            frequency,
        }
    }

    /// Seed the permutation table was built from.
    #[must_use]
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// Coordinate scale applied before sampling.
    #[must_use]
    pub const fn frequency(&self) -> f64 {
        self.frequency
    }
}

impl NoiseField for SimplexField {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let raw = self.noise.get([x * self.frequency, y * self.frequency]);
        (raw / OPEN_SIMPLEX_EXTENT).clamp(-1.0, 1.0)
    }
}
