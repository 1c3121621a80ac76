//! Filter Validation Harness
//!
//! Generates a rising/falling test signal, runs it through a filter executable
//! and checks the filter answered with one sample per input before handing
//! both series to a comparison sink.

pub mod config;
pub mod pipeline;
pub mod state;

pub use config::{Cli, ConfigError, HarnessConfig};
pub use pipeline::{Pipeline, PipelineError, RunReport};
pub use state::{RunState, Stage};

use tracing::Level;

/// Initialize logging on stderr, keeping stdout free for headless output
pub fn init_logging(level: Level, json: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}
