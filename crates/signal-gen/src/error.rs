//! Generator Error Types

use thiserror::Error;

/// Errors raised while generating a test vector
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneratorError {
    /// A generation parameter is outside its valid domain
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}
