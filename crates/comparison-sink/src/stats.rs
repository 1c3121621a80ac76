//! Per-Series Summary Statistics

use data_validator::AlignedSample;
use serde::{Deserialize, Serialize};

/// Informational statistics for one series
///
/// `min`, `max` and `mean` cover the finite values only; NaN and infinite
/// samples are counted in `non_finite` instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    /// Minimum finite value
    pub min: f64,
    /// Maximum finite value
    pub max: f64,
    /// Mean of the finite values
    pub mean: f64,
    /// Number of NaN or infinite values
    #[serde(default)]
    pub non_finite: usize,
}

impl SeriesStats {
    /// Compute statistics from a slice of values
    pub fn compute(values: &[f64]) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let non_finite = values.len() - finite.len();
        if finite.is_empty() {
            return Self {
                non_finite,
                ..Self::default()
            };
        }

        let n = finite.len() as f64;
        let mean = finite.iter().sum::<f64>() / n;
        let min = finite.iter().cloned().fold(f64::MAX, f64::min);
        let max = finite.iter().cloned().fold(f64::MIN, f64::max);

        Self {
            min,
            max,
            mean,
            non_finite,
        }
    }

    /// Extract raw values from aligned samples
    pub fn extract_raw(aligned: &[AlignedSample]) -> Vec<f64> {
        aligned.iter().map(|s| s.raw).collect()
    }

    /// Extract filtered values from aligned samples
    pub fn extract_filtered(aligned: &[AlignedSample]) -> Vec<f64> {
        aligned.iter().map(|s| s.filtered).collect()
    }
}
