//! Aligned Sample Type

use serde::{Deserialize, Serialize};

/// One raw input sample paired with the filter output at the same index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedSample {
    /// Position in both sequences
    pub index: usize,
    /// Sample fed to the filter
    #[serde(with = "crate::non_finite")]
    pub raw: f64,
    /// Sample the filter returned, possibly NaN or infinite
    #[serde(with = "crate::non_finite")]
    pub filtered: f64,
}

impl AlignedSample {
    /// Create an aligned sample
    pub fn new(index: usize, raw: f64, filtered: f64) -> Self {
        Self {
            index,
            raw,
            filtered,
        }
    }

    /// Signed difference `filtered - raw`
    pub fn deviation(&self) -> f64 {
        self.filtered - self.raw
    }
}

impl From<(usize, f64, f64)> for AlignedSample {
    fn from((index, raw, filtered): (usize, f64, f64)) -> Self {
        Self::new(index, raw, filtered)
    }
}
