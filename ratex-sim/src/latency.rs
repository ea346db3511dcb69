use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};

use crate::error::SimError;

/// Synthetic response latencies start from this floor.
pub const BASE_LATENCY_MS: f64 = 1000.0;
/// Per-question latency contribution: gaussian component.
pub const LATENCY_MEAN_MS: f64 = 1500.0;
pub const LATENCY_STD_MS: f64 = 400.0;
/// Exponential rate of the right tail.
pub const LATENCY_SKEW_RATE: f64 = 1.0 / 200.0;

/// Right-skewed reaction-time distribution: a gaussian plus an exponential
/// tail, resampled until positive.
#[derive(Debug, Clone, Copy)]
pub struct ExGaussian {
    normal: Normal<f64>,
    exp: Exp<f64>,
}

impl ExGaussian {
    pub fn new(mean: f64, std: f64, rate: f64) -> Result<Self, SimError> {
        let normal =
            Normal::new(mean, std).map_err(|e| SimError::BadDistribution(e.to_string()))?;
        let exp = Exp::new(rate).map_err(|e| SimError::BadDistribution(e.to_string()))?;
        Ok(Self { normal, exp })
    }

    /// Stock parameters: mean 1500 ms, std 400 ms, rate 1/200.
    pub fn default_latency() -> Result<Self, SimError> {
        Self::new(LATENCY_MEAN_MS, LATENCY_STD_MS, LATENCY_SKEW_RATE)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        loop {
            let draw = self.normal.sample(rng) + self.exp.sample(rng);
            if draw > 0.0 {
                return draw;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn samples_are_always_positive() {
        // Force the gaussian well below zero so the resample loop matters.
        let dist = ExGaussian::new(-500.0, 400.0, 1.0 / 200.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(dist.sample(&mut rng) > 0.0);
        }
    }

    #[test]
    fn mean_lands_near_the_configured_center() {
        let dist = ExGaussian::default_latency().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let n = 20_000;
        let sum: f64 = (0..n).map(|_| dist.sample(&mut rng)).sum();
        let mean = sum / n as f64;
        // ex-gaussian mean = mu + 1/rate = 1500 + 200
        assert!((mean - 1700.0).abs() < 30.0, "mean was {mean}");
    }

    #[test]
    fn negative_std_is_rejected() {
        assert!(matches!(
            ExGaussian::new(1500.0, -1.0, 1.0 / 200.0),
            Err(SimError::BadDistribution(_))
        ));
    }
}
