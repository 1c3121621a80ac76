//! Signal Validation and Alignment
//!
//! Checks that a filter produced one output sample per input sample and pairs
//! them up by index for comparison.

mod aligned;
mod error;
pub mod non_finite;
mod validator;

pub use aligned::AlignedSample;
pub use error::ValidationError;
pub use validator::{align, ValidationConfig, Validator};
