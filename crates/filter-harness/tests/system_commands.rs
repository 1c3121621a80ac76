//! Process contract tests against stock Unix utilities
//!
//! `echo`, `false` and `sleep` stand in for filters that echo, fail and hang.

#![cfg(unix)]

use filter_harness::{FilterProcess, HarnessError};
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

#[tokio::test]
async fn echo_returns_k_factor_followed_by_samples() {
    let response = FilterProcess::new("echo")
        .invoke(0.3, &[0.1, 0.5, 0.9])
        .await
        .unwrap();
    assert_eq!(response.as_slice(), &[0.3, 0.1, 0.5, 0.9]);
}

#[tokio::test]
async fn non_zero_exit_is_execution_error() {
    let err = FilterProcess::new("false")
        .invoke(0.3, &[0.1])
        .await
        .unwrap_err();
    match err {
        HarnessError::Execution { code, .. } => assert_eq!(code, Some(1)),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn hanging_filter_times_out() {
    let started = Instant::now();
    let err = FilterProcess::new("sleep")
        .with_timeout(Some(Duration::from_millis(100)))
        .invoke(5.0, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, HarnessError::Timeout { .. }));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn fast_filter_finishes_inside_timeout() {
    let response = FilterProcess::new("echo")
        .with_timeout(Some(Duration::from_secs(10)))
        .invoke(1.0, &[])
        .await
        .unwrap();
    assert_eq!(response.as_slice(), &[1.0]);
}
