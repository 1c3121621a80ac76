//! Generate -> invoke -> validate -> render pipeline

use crate::config::HarnessConfig;
use crate::state::{RunState, Stage};
use comparison_sink::{ComparisonSink, SinkError};
use data_validator::{ValidationError, Validator};
use filter_harness::{FilterProcess, HarnessError};
use signal_gen::GeneratorError;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that abort a run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    Harness(#[from] HarnessError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("Pipeline already ran (state: {state})")]
    AlreadyRun { state: RunState },
}

impl PipelineError {
    /// Stage the error came from
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Generator(_) => Some(Stage::Generating),
            PipelineError::Harness(_) => Some(Stage::Invoking),
            PipelineError::Validation(_) => Some(Stage::Validating),
            PipelineError::Sink(_) => Some(Stage::Rendering),
            PipelineError::AlreadyRun { .. } => None,
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Number of aligned samples handed to the sink
    pub sample_count: usize,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// Single-use validation run over one filter executable
pub struct Pipeline {
    config: HarnessConfig,
    process: FilterProcess,
    state: RunState,
}

impl Pipeline {
    /// Create a pipeline invoking the filter named in `config`
    pub fn new(config: HarnessConfig) -> Self {
        let process = config.filter_process();
        Self {
            config,
            process,
            state: RunState::Idle,
        }
    }

    /// Replace the filter process handle
    pub fn with_process(mut self, process: FilterProcess) -> Self {
        self.process = process;
        self
    }

    /// Current run state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Configuration the pipeline runs with
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run every stage in order, stopping at the first failure
    pub async fn run(
        &mut self,
        sink: &mut dyn ComparisonSink,
    ) -> Result<RunReport, PipelineError> {
        if self.state != RunState::Idle {
            return Err(PipelineError::AlreadyRun { state: self.state });
        }

        let started = Instant::now();
        match self.execute(sink).await {
            Ok(sample_count) => {
                self.transition(RunState::Done);
                let report = RunReport {
                    sample_count,
                    elapsed: started.elapsed(),
                };
                info!(
                    "Run complete: {} samples validated in {:?}",
                    report.sample_count, report.elapsed
                );
                Ok(report)
            }
            Err(err) => {
                if let Some(stage) = err.stage() {
                    self.transition(RunState::Failed { stage });
                    error!("Run failed while {}: {}", stage, err);
                }
                Err(err)
            }
        }
    }

    async fn execute(&mut self, sink: &mut dyn ComparisonSink) -> Result<usize, PipelineError> {
        self.transition(RunState::Active(Stage::Generating));
        let vector = signal_gen::generate(&self.config.generator_params())?;

        self.transition(RunState::Active(Stage::Invoking));
        let response = self.process.invoke(self.config.k_factor, &vector).await?;

        self.transition(RunState::Active(Stage::Validating));
        let validator = Validator::new(self.config.validation_config());
        let aligned = validator.align(&vector, &response)?;

        self.transition(RunState::Active(Stage::Rendering));
        sink.render(&aligned, &self.config.labels())?;

        Ok(aligned.len())
    }

    fn transition(&mut self, next: RunState) {
        debug!("Run state {} -> {}", self.state, next);
        self.state = next;
    }
}
