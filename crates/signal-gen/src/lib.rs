//! Synthetic Signal Generation
//!
//! Produces deterministic test vectors shaped like a sensor reading that rises
//! and then falls. Each vector is a pure function of its [`GeneratorParams`]:
//! the random stream is either seeded from the params or injected by the caller.

mod error;
mod generator;
mod vector;

pub use error::GeneratorError;
pub use generator::{generate, generate_with, GeneratorParams};
pub use vector::TestVector;
