//! Length Parity Validator and Aligner

use crate::aligned::AlignedSample;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Validation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Reject NaN or infinite filtered samples
    pub require_finite: bool,
}

impl ValidationConfig {
    /// Create strict config (filtered samples must be finite)
    pub fn strict() -> Self {
        Self {
            require_finite: true,
        }
    }
}

/// Validator for filter output against its input
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Check that the filter returned one sample per input sample
    pub fn validate_length(&self, raw: &[f64], filtered: &[f64]) -> Result<(), ValidationError> {
        if raw.len() != filtered.len() {
            warn!(
                "Filter output length {} does not match input length {}",
                filtered.len(),
                raw.len()
            );
            return Err(ValidationError::LengthMismatch {
                expected: raw.len(),
                actual: filtered.len(),
            });
        }
        Ok(())
    }

    /// Check that every filtered sample is finite
    pub fn validate_finite(&self, filtered: &[f64]) -> Result<(), ValidationError> {
        match filtered.iter().position(|v| !v.is_finite()) {
            Some(index) => Err(ValidationError::NonFinite {
                index,
                value: filtered[index],
            }),
            None => Ok(()),
        }
    }

    /// Validate both sequences and pair them by index
    ///
    /// Sequences of different length are rejected outright; no partial
    /// alignment is produced.
    pub fn align(
        &self,
        raw: &[f64],
        filtered: &[f64],
    ) -> Result<Vec<AlignedSample>, ValidationError> {
        self.validate_length(raw, filtered)?;
        if self.config.require_finite {
            self.validate_finite(filtered)?;
        }

        let aligned: Vec<AlignedSample> = raw
            .iter()
            .zip(filtered)
            .enumerate()
            .map(|(index, (&raw, &filtered))| AlignedSample::new(index, raw, filtered))
            .collect();

        debug!("Aligned {} sample pairs", aligned.len());
        Ok(aligned)
    }
}

/// Pair `raw[i]` with `filtered[i]` using the default (structural) config
pub fn align(raw: &[f64], filtered: &[f64]) -> Result<Vec<AlignedSample>, ValidationError> {
    Validator::default().align(raw, filtered)
}
