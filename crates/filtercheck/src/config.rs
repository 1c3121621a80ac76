//! Harness configuration
//!
//! Settings are layered: built-in defaults, then `FILTERCHECK_*` environment
//! variables, then command-line flags.

use clap::Parser;
use comparison_sink::SeriesLabels;
use config::{Config, Environment, Map};
use data_validator::ValidationConfig;
use filter_harness::FilterProcess;
use serde::{Deserialize, Serialize};
use signal_gen::GeneratorParams;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

/// Prefix for environment overrides (`FILTERCHECK_N_INCR=100`)
pub const ENV_PREFIX: &str = "FILTERCHECK";

/// Filter executable looked up in the working directory by default
pub const DEFAULT_FILTER: &str = "a.out";

/// Default chart output path
pub const DEFAULT_OUTPUT: &str = "filter-comparison.svg";

/// Default invocation time limit
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration")]
    Load(#[from] config::ConfigError),
    #[error("Unknown log level {0:?}")]
    InvalidLogLevel(String),
    #[error("Cannot resolve filter path against the working directory")]
    WorkingDir(#[source] std::io::Error),
}

/// Command-line arguments
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "filtercheck",
    version,
    about = "Feed a synthetic rising/falling signal through a filter executable and compare the result"
)]
pub struct Cli {
    /// Smoothing parameter passed to the filter unmodified
    #[arg(allow_negative_numbers = true)]
    pub k_factor: f64,

    /// Filter executable (relative paths resolve against the working directory)
    #[arg(long)]
    pub filter: Option<PathBuf>,

    /// Lower bound of generated samples
    #[arg(long)]
    pub low: Option<f64>,

    /// Upper bound of generated samples
    #[arg(long)]
    pub high: Option<f64>,

    /// Length of the rising segment
    #[arg(long)]
    pub n_incr: Option<u64>,

    /// Length of the falling segment
    #[arg(long)]
    pub n_decr: Option<u64>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Normalization divisor (defaults to --high)
    #[arg(long)]
    pub divisor: Option<f64>,

    /// Filter time limit in milliseconds, 0 waits forever
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// SVG chart output path
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print a JSON summary to stdout instead of writing a chart
    #[arg(long)]
    pub headless: bool,

    /// Reject NaN or infinite filter output
    #[arg(long)]
    pub require_finite: bool,

    /// Legend label for the input series
    #[arg(long)]
    pub raw_label: Option<String>,

    /// Legend label for the filter output series
    #[arg(long)]
    pub filtered_label: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

/// Fully resolved settings for one harness run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Smoothing parameter handed to the filter
    pub k_factor: f64,
    /// Lower bound of generated samples before normalization
    pub low: f64,
    /// Upper bound of generated samples before normalization
    pub high: f64,
    /// Length of the rising segment
    pub n_incr: usize,
    /// Length of the falling segment
    pub n_decr: usize,
    /// Random seed
    pub seed: u64,
    /// Normalization divisor, `high` when unset
    #[serde(default)]
    pub divisor: Option<f64>,
    /// Filter executable path
    pub filter: PathBuf,
    /// Time limit in milliseconds (0 = none)
    pub timeout_ms: u64,
    /// SVG chart path, unused when headless
    pub output: PathBuf,
    /// Write a JSON summary to stdout instead of a chart
    pub headless: bool,
    /// Reject NaN or infinite filter output
    pub require_finite: bool,
    /// Legend label of the input series
    pub raw_label: String,
    /// Legend label of the output series
    pub filtered_label: String,
    /// Log level name (`error` through `trace`)
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl HarnessConfig {
    /// Load configuration from defaults, the process environment and `cli`
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        Self::load_with_env(cli, None)
    }

    /// Load configuration reading environment overrides from `env` instead of
    /// the process environment when given
    pub fn load_with_env(cli: &Cli, env: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let defaults = GeneratorParams::default();

        let settings = Config::builder()
            .set_default("low", defaults.low)?
            .set_default("high", defaults.high)?
            .set_default("n_incr", defaults.n_incr as u64)?
            .set_default("n_decr", defaults.n_decr as u64)?
            .set_default("seed", defaults.seed)?
            .set_default("filter", DEFAULT_FILTER)?
            .set_default("timeout_ms", DEFAULT_TIMEOUT_MS)?
            .set_default("output", DEFAULT_OUTPUT)?
            .set_default("headless", false)?
            .set_default("require_finite", false)?
            .set_default("raw_label", "raw")?
            .set_default("filtered_label", "filtered")?
            .set_default("log_level", "info")?
            .set_default("log_json", false)?
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .set_override("k_factor", cli.k_factor)?
            .set_override_option("filter", cli.filter.as_deref().map(path_value))?
            .set_override_option("low", cli.low)?
            .set_override_option("high", cli.high)?
            .set_override_option("n_incr", cli.n_incr)?
            .set_override_option("n_decr", cli.n_decr)?
            .set_override_option("seed", cli.seed)?
            .set_override_option("divisor", cli.divisor)?
            .set_override_option("timeout_ms", cli.timeout_ms)?
            .set_override_option("output", cli.output.as_deref().map(path_value))?
            .set_override_option("headless", cli.headless.then_some(true))?
            .set_override_option("require_finite", cli.require_finite.then_some(true))?
            .set_override_option("raw_label", cli.raw_label.clone())?
            .set_override_option("filtered_label", cli.filtered_label.clone())?
            .set_override_option("log_level", cli.log_level.clone())?
            .set_override_option("log_json", cli.log_json.then_some(true))?
            .build()?;

        let mut config: HarnessConfig = settings.try_deserialize()?;
        config.tracing_level()?;
        if config.filter.is_relative() {
            let cwd = std::env::current_dir().map_err(ConfigError::WorkingDir)?;
            config.filter = cwd.join(&config.filter);
        }
        Ok(config)
    }

    /// Parameters for the vector generator
    pub fn generator_params(&self) -> GeneratorParams {
        GeneratorParams {
            low: self.low,
            high: self.high,
            n_incr: self.n_incr,
            n_decr: self.n_decr,
            seed: self.seed,
            divisor: self.divisor,
        }
    }

    /// Invocation time limit, `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    /// Process handle for the configured filter
    pub fn filter_process(&self) -> FilterProcess {
        FilterProcess::new(&self.filter).with_timeout(self.timeout())
    }

    /// Output validation settings
    pub fn validation_config(&self) -> ValidationConfig {
        ValidationConfig {
            require_finite: self.require_finite,
        }
    }

    /// Legend labels for the comparison
    pub fn labels(&self) -> SeriesLabels {
        SeriesLabels {
            raw: self.raw_label.clone(),
            filtered: self.filtered_label.clone(),
        }
    }

    /// Parsed log level
    pub fn tracing_level(&self) -> Result<Level, ConfigError> {
        Level::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}

fn path_value(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
