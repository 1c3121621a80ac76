//! Validation Error Types

use thiserror::Error;

/// Errors during output validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Filter output length differs from input length
    #[error("Length mismatch: filter received {expected} samples but returned {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Filtered sample is NaN or infinite
    #[error("Filtered sample {index} is not finite: {value}")]
    NonFinite { index: usize, value: f64 },
}
