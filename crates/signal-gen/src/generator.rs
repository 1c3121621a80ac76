//! Rising/Falling Signal Generator

use crate::error::GeneratorError;
use crate::vector::TestVector;
use rand::distr::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for one test vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorParams {
    /// Lower bound of the raw sample range (inclusive)
    pub low: f64,
    /// Upper bound of the raw sample range (exclusive)
    pub high: f64,
    /// Length of the rising segment
    pub n_incr: usize,
    /// Length of the falling segment
    pub n_decr: usize,
    /// Seed for the pseudo-random stream
    pub seed: u64,
    /// Normalization divisor (defaults to `high`)
    #[serde(default)]
    pub divisor: Option<f64>,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            low: 0.0,
            high: 1024.0,
            n_incr: 5000,
            n_decr: 10000,
            seed: 0,
            divisor: None,
        }
    }
}

impl GeneratorParams {
    /// Divisor applied to every raw sample
    pub fn effective_divisor(&self) -> f64 {
        self.divisor.unwrap_or(self.high)
    }

    /// Check that the params produce a vector inside `[0, 1]`
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if !self.low.is_finite() {
            return Err(invalid("low", self.low, "must be finite"));
        }
        if !self.high.is_finite() {
            return Err(invalid("high", self.high, "must be finite"));
        }
        if self.low < 0.0 {
            return Err(invalid("low", self.low, "must be non-negative"));
        }
        if self.low >= self.high {
            return Err(invalid("low", self.low, "must be strictly below high"));
        }

        let divisor = self.effective_divisor();
        if !divisor.is_finite() || divisor <= 0.0 {
            return Err(invalid("divisor", divisor, "must be finite and positive"));
        }
        if divisor < self.high {
            return Err(invalid("divisor", divisor, "must not be smaller than high"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: f64, reason: &'static str) -> GeneratorError {
    GeneratorError::InvalidParameter { name, value, reason }
}

/// Generate a test vector from a `StdRng` seeded with `params.seed`
pub fn generate(params: &GeneratorParams) -> Result<TestVector, GeneratorError> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    generate_with(params, &mut rng)
}

/// Generate a test vector drawing from a caller-supplied random source
///
/// Draws `n_incr` samples from `[low, high)` and sorts them ascending, then
/// draws `n_decr` more and sorts them descending. The concatenation is divided
/// by the normalization divisor.
pub fn generate_with<R: Rng + ?Sized>(
    params: &GeneratorParams,
    rng: &mut R,
) -> Result<TestVector, GeneratorError> {
    params.validate()?;

    let range = Uniform::new(params.low, params.high)
        .map_err(|_| invalid("high", params.high, "range is not samplable"))?;

    let mut rising: Vec<f64> = (0..params.n_incr).map(|_| rng.sample(&range)).collect();
    rising.sort_by(f64::total_cmp);

    let mut falling: Vec<f64> = (0..params.n_decr).map(|_| rng.sample(&range)).collect();
    falling.sort_by(|a, b| b.total_cmp(a));

    let divisor = params.effective_divisor();
    let mut samples = rising;
    samples.extend(falling);
    for sample in &mut samples {
        *sample /= divisor;
    }

    debug!(
        "Generated test vector: {} rising + {} falling samples (divisor {})",
        params.n_incr, params.n_decr, divisor
    );

    Ok(TestVector::from_parts(samples, params.n_incr))
}
