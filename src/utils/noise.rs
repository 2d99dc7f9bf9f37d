//! Seedable noise source shared by the drive and sensor models
//! Location: src/utils/noise.rs

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Gaussian/uniform noise generator backed by a seedable RNG
///
/// Every stochastic model owns one of these so a fixed seed reproduces a run
/// exactly. Without a seed the generator draws from OS entropy.
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    rng: StdRng,
}

impl NoiseGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Zero-mean Gaussian sample; a non-positive or non-finite stddev yields 0
    pub fn gaussian(&mut self, stddev: f64) -> f64 {
        self.normal(0.0, stddev)
    }

    /// Gaussian sample around `mean`
    pub fn normal(&mut self, mean: f64, stddev: f64) -> f64 {
        if !(stddev.is_finite() && stddev > 0.0) {
            return mean;
        }
        match Normal::new(mean, stddev) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => mean,
        }
    }

    /// `value` plus zero-mean Gaussian noise
    pub fn add_noise(&mut self, value: f64, stddev: f64) -> f64 {
        value + self.gaussian(stddev)
    }

    /// Uniform sample in `[low, high)`; a degenerate range returns `low`
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low.is_nan() || high.is_nan() || low >= high {
            return low;
        }
        self.rng.gen_range(low..high)
    }

    /// Derive an independent generator from this one's stream
    ///
    /// Used to hand each sub-model its own generator while the whole tree
    /// still follows from a single seed.
    pub fn fork(&mut self) -> Self {
        Self {
            rng: StdRng::seed_from_u64(self.rng.gen()),
        }
    }
}

impl Default for NoiseGenerator {
    fn default() -> Self {
        Self::new(None)
    }
}
