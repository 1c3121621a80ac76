//! End-to-end pipeline runs against the stub filter

use comparison_sink::{SummarySink, SvgChart};
use data_validator::ValidationError;
use filter_harness::{FilterProcess, HarnessError};
use filtercheck::{Cli, HarnessConfig, Pipeline, PipelineError, RunState, Stage};
use pretty_assertions::assert_eq;
use signal_gen::generate;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

const STUB: &str = env!("CARGO_BIN_EXE_stub-filter");

fn config(n_incr: u64, n_decr: u64) -> HarnessConfig {
    let cli = Cli {
        k_factor: 0.3,
        filter: Some(PathBuf::from(STUB)),
        n_incr: Some(n_incr),
        n_decr: Some(n_decr),
        ..Default::default()
    };
    HarnessConfig::load_with_env(&cli, Some(Default::default())).unwrap()
}

/// Display of every error in the source chain, outermost first
fn chain(err: &dyn Error) -> Vec<String> {
    let mut messages = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        messages.push(cause.to_string());
        source = cause.source();
    }
    messages
}

fn stub(mode: &str) -> FilterProcess {
    FilterProcess::new(STUB)
        .with_timeout(Some(Duration::from_secs(10)))
        .env("STUB_FILTER_MODE", mode)
}

#[tokio::test]
async fn echo_filter_run_completes_with_identical_series() {
    let config = config(3, 2);
    let expected = generate(&config.generator_params()).unwrap();
    let mut pipeline = Pipeline::new(config).with_process(stub("echo"));
    let mut sink = SummarySink::new(Vec::new());

    let report = pipeline.run(&mut sink).await.unwrap();

    assert_eq!(pipeline.state(), RunState::Done);
    assert_eq!(report.sample_count, 5);
    let summary = sink.summary().unwrap();
    assert_eq!(summary.raw_series(), expected.as_slice());
    assert_eq!(summary.filtered_series(), expected.as_slice());
    assert_eq!(summary.max_abs_deviation, 0.0);
}

#[tokio::test]
async fn default_sized_vector_round_trips_through_arguments() {
    let config = config(5000, 10000);
    let mut pipeline = Pipeline::new(config).with_process(stub("echo"));
    let mut sink = SummarySink::new(Vec::new());

    let report = pipeline.run(&mut sink).await.unwrap();
    assert_eq!(report.sample_count, 15000);
    let summary = sink.summary().unwrap();
    assert_eq!(summary.raw_series(), summary.filtered_series());
}

#[tokio::test]
async fn failing_filter_stops_before_validation() {
    let mut pipeline = Pipeline::new(config(3, 2)).with_process(stub("fail"));
    let mut sink = SummarySink::new(Vec::new());

    let err = pipeline.run(&mut sink).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Harness(HarnessError::Execution { code: Some(1), .. })
    ));
    assert_eq!(
        pipeline.state(),
        RunState::Failed {
            stage: Stage::Invoking
        }
    );
    assert!(sink.summary().is_none());
}

#[tokio::test]
async fn truncated_output_is_length_mismatch() {
    let mut pipeline = Pipeline::new(config(3, 2)).with_process(stub("truncate"));
    let mut sink = SummarySink::new(Vec::new());

    let err = pipeline.run(&mut sink).await.unwrap_err();

    match err {
        PipelineError::Validation(e) => assert_eq!(
            e,
            ValidationError::LengthMismatch {
                expected: 5,
                actual: 4
            }
        ),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        pipeline.state(),
        RunState::Failed {
            stage: Stage::Validating
        }
    );
}

#[tokio::test]
async fn garbage_output_is_parse_error() {
    let mut pipeline = Pipeline::new(config(3, 2)).with_process(stub("garbage"));
    let mut sink = SummarySink::new(Vec::new());

    let err = pipeline.run(&mut sink).await.unwrap_err();

    match err {
        PipelineError::Harness(HarnessError::OutputParse { position, token }) => {
            assert_eq!(position, 5);
            assert_eq!(token, "not-a-number");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn hanging_filter_is_killed_at_timeout() {
    let process = FilterProcess::new(STUB)
        .with_timeout(Some(Duration::from_millis(200)))
        .env("STUB_FILTER_MODE", "hang");
    let mut pipeline = Pipeline::new(config(3, 2)).with_process(process);
    let mut sink = SummarySink::new(Vec::new());

    let err = pipeline.run(&mut sink).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Harness(HarnessError::Timeout { .. })
    ));
    assert_eq!(
        pipeline.state(),
        RunState::Failed {
            stage: Stage::Invoking
        }
    );
}

#[tokio::test]
async fn invalid_bounds_fail_during_generation() {
    let mut config = config(3, 2);
    config.low = 10.0;
    config.high = 1.0;
    let mut pipeline = Pipeline::new(config).with_process(stub("echo"));
    let mut sink = SummarySink::new(Vec::new());

    let err = pipeline.run(&mut sink).await.unwrap_err();

    assert!(matches!(err, PipelineError::Generator(_)));
    assert_eq!(
        pipeline.state(),
        RunState::Failed {
            stage: Stage::Generating
        }
    );
}

#[tokio::test]
async fn missing_filter_is_launch_error() {
    let mut pipeline = Pipeline::new(config(3, 2))
        .with_process(FilterProcess::new("/nonexistent/filter-under-test"));
    let mut sink = SummarySink::new(Vec::new());

    let err = pipeline.run(&mut sink).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Harness(HarnessError::Launch { .. })
    ));

    let messages = chain(&err);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], "Failed to launch filter /nonexistent/filter-under-test");
    assert!(!messages[0].contains(&messages[1]));
}

#[tokio::test]
async fn pipeline_runs_only_once() {
    let mut pipeline = Pipeline::new(config(3, 2)).with_process(stub("echo"));
    let mut sink = SummarySink::new(Vec::new());
    pipeline.run(&mut sink).await.unwrap();

    let err = pipeline.run(&mut sink).await.unwrap_err();
    assert!(matches!(err, PipelineError::AlreadyRun { .. }));
    assert_eq!(pipeline.state(), RunState::Done);
}

#[tokio::test]
async fn chart_sink_writes_svg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comparison.svg");
    let mut pipeline = Pipeline::new(config(3, 2)).with_process(stub("echo"));
    let mut chart = SvgChart::new(&path);

    pipeline.run(&mut chart).await.unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert_eq!(svg.matches("<circle").count(), 10);
    assert!(svg.contains("raw -&gt; filter"));
}
