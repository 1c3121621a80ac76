//! Argument Marshaling

/// Build the filter argument list `[k_factor, v_0, ..., v_{n-1}]`
///
/// Values use the shortest decimal form that parses back to the same `f64`.
pub fn marshal_arguments(k_factor: f64, samples: &[f64]) -> Vec<String> {
    std::iter::once(k_factor)
        .chain(samples.iter().copied())
        .map(|value| value.to_string())
        .collect()
}
