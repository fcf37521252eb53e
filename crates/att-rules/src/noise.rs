//! Randomness behind the confidence score.

use std::fmt;

/// Source of uniform samples in `[0, 1)`.
pub trait NoiseSource: Send + Sync + fmt::Debug {
    fn sample(&self) -> f64;
}

/// OS randomness via `getrandom`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNoise;

impl NoiseSource for SystemNoise {
    #[allow(clippy::cast_precision_loss)]
    fn sample(&self) -> f64 {
        match getrandom::u64() {
            // Top 53 bits fill an f64 mantissa exactly.
            Ok(bits) => (bits >> 11) as f64 / (1_u64 << 53) as f64,
            Err(error) => {
                tracing::warn!(%error, "OS randomness unavailable; confidence noise set to zero");
                0.0
            }
        }
    }
}

/// Always returns the same sample. Used for deterministic evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedNoise(pub f64);

impl NoiseSource for FixedNoise {
    fn sample(&self) -> f64 {
        self.0
    }
}
