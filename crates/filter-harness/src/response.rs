//! Filter Response Parsing

use crate::error::HarnessError;
use serde::Serialize;
use std::ops::Deref;

/// Samples printed by the filter under test, in output order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterResponse {
    samples: Vec<f64>,
}

impl FilterResponse {
    /// Parse raw stdout: whitespace-separated floating-point tokens
    ///
    /// Fails on the first token that is not valid UTF-8 or not a number.
    pub fn parse(stdout: &[u8]) -> Result<Self, HarnessError> {
        let samples = stdout
            .split(u8::is_ascii_whitespace)
            .filter(|token| !token.is_empty())
            .enumerate()
            .map(|(position, token)| parse_token(position, token))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { samples })
    }

    /// All samples in order
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }
}

fn parse_token(position: usize, token: &[u8]) -> Result<f64, HarnessError> {
    std::str::from_utf8(token)
        .ok()
        .and_then(|text| text.parse::<f64>().ok())
        .ok_or_else(|| HarnessError::OutputParse {
            position,
            token: String::from_utf8_lossy(token).into_owned(),
        })
}

impl Deref for FilterResponse {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.samples
    }
}

impl AsRef<[f64]> for FilterResponse {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}
