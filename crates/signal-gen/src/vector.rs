//! Test Vector Type

use serde::Serialize;
use std::ops::Deref;

/// Normalized synthetic signal: a non-decreasing run followed by a
/// non-increasing run, every sample in `[0, 1]`.
///
/// Only the generator builds these, so the monotonic layout always holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestVector {
    samples: Vec<f64>,
    n_incr: usize,
}

impl TestVector {
    pub(crate) fn from_parts(samples: Vec<f64>, n_incr: usize) -> Self {
        debug_assert!(n_incr <= samples.len());
        Self { samples, n_incr }
    }

    /// All samples in order
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// The rising (non-decreasing) segment
    pub fn rising(&self) -> &[f64] {
        &self.samples[..self.n_incr]
    }

    /// The falling (non-increasing) segment
    pub fn falling(&self) -> &[f64] {
        &self.samples[self.n_incr..]
    }
}

impl Deref for TestVector {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.samples
    }
}

impl AsRef<[f64]> for TestVector {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}
