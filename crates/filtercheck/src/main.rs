//! filtercheck - Main Entry Point

use anyhow::{anyhow, Context};
use clap::Parser;
use comparison_sink::{ComparisonSink, SummarySink, SvgChart};
use filtercheck::{init_logging, Cli, HarnessConfig, Pipeline};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = HarnessConfig::load(&cli).context("Failed to load configuration")?;
    init_logging(config.tracing_level()?, config.log_json).map_err(|e| anyhow!(e))?;

    info!("=== filtercheck v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Filter {} with k_factor {}",
        config.filter.display(),
        config.k_factor
    );

    let mut sink: Box<dyn ComparisonSink> = if config.headless {
        Box::new(SummarySink::new(std::io::stdout()))
    } else {
        Box::new(SvgChart::new(&config.output))
    };

    let mut pipeline = Pipeline::new(config);
    let report = pipeline
        .run(sink.as_mut())
        .await
        .with_context(|| format!("Validation run {}", pipeline.state()))?;

    info!(
        "Filter conforms: {} samples aligned in {:?}",
        report.sample_count, report.elapsed
    );
    Ok(())
}
