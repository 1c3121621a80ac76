//! Comparison Sinks
//!
//! Consumers of an aligned raw/filtered run. A sink only reproduces the two
//! series it is given; it never transforms the data.

mod stats;
mod summary;
mod svg;

pub use stats::SeriesStats;
pub use summary::{ComparisonSummary, SummarySink};
pub use svg::SvgChart;

use data_validator::AlignedSample;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title shown on every comparison
pub const COMPARISON_TITLE: &str = "raw -> filter";

/// Sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write comparison output")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize comparison summary")]
    Serialize(#[from] serde_json::Error),
}

/// Legend labels for the two series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesLabels {
    /// Label of the filter input series
    pub raw: String,
    /// Label of the filter output series
    pub filtered: String,
}

impl Default for SeriesLabels {
    fn default() -> Self {
        Self {
            raw: "raw".to_string(),
            filtered: "filtered".to_string(),
        }
    }
}

/// Destination for an aligned comparison
pub trait ComparisonSink {
    /// Render or report both series of `aligned` under the given labels
    fn render(&mut self, aligned: &[AlignedSample], labels: &SeriesLabels)
        -> Result<(), SinkError>;
}
