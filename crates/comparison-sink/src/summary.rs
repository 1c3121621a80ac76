//! Headless JSON Summary Sink

use crate::stats::SeriesStats;
use crate::{ComparisonSink, SeriesLabels, SinkError, COMPARISON_TITLE};
use data_validator::AlignedSample;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{info, warn};

/// Serializable record of one comparison
///
/// Non-finite samples are kept in `samples` as `"NaN"`, `"inf"` or `"-inf"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Chart title, always `raw -> filter`
    pub title: String,
    /// Legend labels of both series
    pub labels: SeriesLabels,
    /// Number of aligned pairs
    pub sample_count: usize,
    /// Statistics of the filter input
    pub raw: SeriesStats,
    /// Statistics of the filter output
    pub filtered: SeriesStats,
    /// Largest finite `|filtered - raw|` over all indices
    pub max_abs_deviation: f64,
    /// Every aligned pair in index order
    pub samples: Vec<AlignedSample>,
}

impl ComparisonSummary {
    /// Summarize an aligned run
    pub fn build(aligned: &[AlignedSample], labels: &SeriesLabels) -> Self {
        let raw = SeriesStats::extract_raw(aligned);
        let filtered = SeriesStats::extract_filtered(aligned);
        let max_abs_deviation = aligned
            .iter()
            .map(|s| s.deviation().abs())
            .filter(|d| d.is_finite())
            .fold(0.0, f64::max);

        Self {
            title: COMPARISON_TITLE.to_string(),
            labels: labels.clone(),
            sample_count: aligned.len(),
            raw: SeriesStats::compute(&raw),
            filtered: SeriesStats::compute(&filtered),
            max_abs_deviation,
            samples: aligned.to_vec(),
        }
    }

    /// Raw series in index order
    pub fn raw_series(&self) -> Vec<f64> {
        SeriesStats::extract_raw(&self.samples)
    }

    /// Filtered series in index order
    pub fn filtered_series(&self) -> Vec<f64> {
        SeriesStats::extract_filtered(&self.samples)
    }
}

/// Sink that writes a pretty-printed JSON summary instead of drawing
pub struct SummarySink<W: Write> {
    writer: W,
    last: Option<ComparisonSummary>,
}

impl<W: Write> SummarySink<W> {
    /// Create a summary sink writing to `writer`
    pub fn new(writer: W) -> Self {
        Self { writer, last: None }
    }

    /// Most recently rendered summary
    pub fn summary(&self) -> Option<&ComparisonSummary> {
        self.last.as_ref()
    }

    /// Return the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ComparisonSink for SummarySink<W> {
    fn render(
        &mut self,
        aligned: &[AlignedSample],
        labels: &SeriesLabels,
    ) -> Result<(), SinkError> {
        let summary = ComparisonSummary::build(aligned, labels);
        serde_json::to_writer_pretty(&mut self.writer, &summary)?;
        writeln!(self.writer)?;
        self.writer.flush()?;

        if summary.filtered.non_finite > 0 {
            warn!(
                "Filter output contains {} non-finite samples",
                summary.filtered.non_finite
            );
        }
        info!(
            "Summarized {} samples (max deviation {})",
            summary.sample_count, summary.max_abs_deviation
        );
        self.last = Some(summary);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn aligned() -> Vec<AlignedSample> {
        vec![
            AlignedSample::new(0, 0.1, 0.1),
            AlignedSample::new(1, 0.5, 0.4),
            AlignedSample::new(2, 0.9, 0.8),
        ]
    }

    #[test]
    fn test_summary_reproduces_series() {
        let summary = ComparisonSummary::build(&aligned(), &SeriesLabels::default());
        assert_eq!(summary.title, "raw -> filter");
        assert_eq!(summary.sample_count, 3);
        assert_eq!(summary.raw_series(), vec![0.1, 0.5, 0.9]);
        assert_eq!(summary.filtered_series(), vec![0.1, 0.4, 0.8]);
        assert!((summary.max_abs_deviation - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_sink_writes_parseable_json() {
        let mut sink = SummarySink::new(Vec::new());
        sink.render(&aligned(), &SeriesLabels::default()).unwrap();

        let written = sink.summary().cloned().unwrap();
        let parsed: ComparisonSummary = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert_eq!(parsed, written);
    }

    #[test]
    fn test_non_finite_output_survives_json() {
        let aligned = vec![
            AlignedSample::new(0, 0.1, f64::NAN),
            AlignedSample::new(1, 0.5, 0.4),
            AlignedSample::new(2, 0.9, f64::INFINITY),
        ];
        let mut sink = SummarySink::new(Vec::new());
        sink.render(&aligned, &SeriesLabels::default()).unwrap();

        let json = String::from_utf8(sink.into_inner()).unwrap();
        assert!(!json.contains("null"));
        let parsed: ComparisonSummary = serde_json::from_str(&json).unwrap();

        let filtered = parsed.filtered_series();
        assert!(filtered[0].is_nan());
        assert_eq!(filtered[1], 0.4);
        assert_eq!(filtered[2], f64::INFINITY);
        assert_eq!(parsed.raw_series(), vec![0.1, 0.5, 0.9]);
        assert_eq!(parsed.filtered.non_finite, 2);
        assert_eq!(parsed.filtered.mean, 0.4);
        assert!((parsed.max_abs_deviation - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_empty_run() {
        let mut sink = SummarySink::new(Vec::new());
        sink.render(&[], &SeriesLabels::default()).unwrap();
        assert_eq!(sink.summary().unwrap().sample_count, 0);
    }
}
