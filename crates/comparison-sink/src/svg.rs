//! SVG Chart Renderer
//!
//! Draws raw and filtered series against a shared index axis with a marker
//! at every aligned sample, axis labels, a legend and a title. Non-finite
//! samples cannot be placed on the canvas: the series line breaks at them and
//! the chart states how many were skipped.

use crate::{ComparisonSink, SeriesLabels, SinkError, COMPARISON_TITLE};
use data_validator::AlignedSample;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const RAW_COLOR: &str = "#1f3fbf";
const FILTERED_COLOR: &str = "#d62728";
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const MARKER_RADIUS: f64 = 1.5;

/// Chart renderer writing a standalone SVG file
#[derive(Debug, Clone)]
pub struct SvgChart {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl SvgChart {
    /// Create a chart that will be written to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            width: 1200,
            height: 600,
        }
    }

    /// Override the canvas size in pixels
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(200);
        self.height = height.max(150);
        self
    }

    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build the SVG document for an aligned run
    pub fn document(&self, aligned: &[AlignedSample], labels: &SeriesLabels) -> String {
        let width = f64::from(self.width);
        let height = f64::from(self.height);
        let plot = Viewport::fit(aligned, width, height);

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.width,
            h = self.height
        ));
        svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
        svg.push_str(&format!(
            "<text class=\"title\" x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"18\">{}</text>\n",
            width / 2.0,
            MARGIN_TOP / 2.0 + 6.0,
            escape(COMPARISON_TITLE)
        ));

        plot.push_axes(&mut svg, aligned.len());
        plot.push_series(&mut svg, "raw", RAW_COLOR, aligned.iter().map(|s| (s.index, s.raw)));
        plot.push_series(
            &mut svg,
            "filtered",
            FILTERED_COLOR,
            aligned.iter().map(|s| (s.index, s.filtered)),
        );
        push_legend(&mut svg, width, labels);

        let skipped = skipped_samples(aligned);
        if skipped > 0 {
            svg.push_str(&format!(
                "<text class=\"skipped\" x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"#666\">{} non-finite samples not drawn</text>\n",
                MARGIN_LEFT,
                height - 10.0,
                skipped
            ));
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl ComparisonSink for SvgChart {
    fn render(
        &mut self,
        aligned: &[AlignedSample],
        labels: &SeriesLabels,
    ) -> Result<(), SinkError> {
        let document = self.document(aligned, labels);
        std::fs::write(&self.path, document)?;

        let skipped = skipped_samples(aligned);
        if skipped > 0 {
            warn!("{} non-finite samples could not be drawn", skipped);
        }
        info!(
            "Wrote comparison chart with {} samples to {}",
            aligned.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Mapping from (index, value) to canvas coordinates
struct Viewport {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    max_index: f64,
    y_min: f64,
    y_max: f64,
}

impl Viewport {
    fn fit(aligned: &[AlignedSample], width: f64, height: f64) -> Self {
        let (mut y_min, mut y_max) = aligned
            .iter()
            .flat_map(|s| [s.raw, s.filtered])
            .filter(|v| v.is_finite())
            .fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if y_min > y_max {
            y_min = 0.0;
            y_max = 1.0;
        } else if y_min == y_max {
            y_min -= 0.5;
            y_max += 0.5;
        }

        Self {
            left: MARGIN_LEFT,
            right: width - MARGIN_RIGHT,
            top: MARGIN_TOP,
            bottom: height - MARGIN_BOTTOM,
            max_index: aligned.len().saturating_sub(1).max(1) as f64,
            y_min,
            y_max,
        }
    }

    fn x(&self, index: usize) -> f64 {
        self.left + (index as f64 / self.max_index) * (self.right - self.left)
    }

    fn y(&self, value: f64) -> f64 {
        let t = (value - self.y_min) / (self.y_max - self.y_min);
        self.bottom - t * (self.bottom - self.top)
    }

    fn push_axes(&self, svg: &mut String, len: usize) {
        svg.push_str(&format!(
            "<g class=\"axes\" stroke=\"black\" stroke-width=\"1\">\
             <line x1=\"{l}\" y1=\"{b}\" x2=\"{r}\" y2=\"{b}\"/>\
             <line x1=\"{l}\" y1=\"{t}\" x2=\"{l}\" y2=\"{b}\"/></g>\n",
            l = self.left,
            r = self.right,
            t = self.top,
            b = self.bottom
        ));

        // tick labels at the axis ends
        let last_index = len.saturating_sub(1);
        svg.push_str(&format!(
            "<g class=\"ticks\" font-size=\"11\">\
             <text x=\"{l}\" y=\"{xb}\" text-anchor=\"middle\">0</text>\
             <text x=\"{r}\" y=\"{xb}\" text-anchor=\"middle\">{last_index}</text>\
             <text x=\"{yl}\" y=\"{b}\" text-anchor=\"end\">{y_min:.3}</text>\
             <text x=\"{yl}\" y=\"{t}\" text-anchor=\"end\">{y_max:.3}</text></g>\n",
            l = self.left,
            r = self.right,
            t = self.top,
            b = self.bottom,
            xb = self.bottom + 16.0,
            yl = self.left - 6.0,
            y_min = self.y_min,
            y_max = self.y_max,
        ));

        svg.push_str(&format!(
            "<text class=\"x-label\" x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"14\">x</text>\n",
            (self.left + self.right) / 2.0,
            self.bottom + 40.0
        ));
        svg.push_str(&format!(
            "<text class=\"y-label\" x=\"{x}\" y=\"{y}\" text-anchor=\"middle\" font-size=\"14\" \
             transform=\"rotate(-90 {x} {y})\">y</text>\n",
            x = self.left - 50.0,
            y = (self.top + self.bottom) / 2.0
        ));
    }

    fn push_series(
        &self,
        svg: &mut String,
        class: &str,
        color: &str,
        points: impl Iterator<Item = (usize, f64)>,
    ) {
        // one segment per run of finite samples
        let mut segments: Vec<Vec<(f64, f64)>> = vec![Vec::new()];
        for (i, v) in points {
            if v.is_finite() {
                if let Some(segment) = segments.last_mut() {
                    segment.push((self.x(i), self.y(v)));
                }
            } else if segments.last().is_some_and(|s| !s.is_empty()) {
                segments.push(Vec::new());
            }
        }
        if segments.len() > 1 && segments.last().is_some_and(|s| s.is_empty()) {
            segments.pop();
        }

        for segment in &segments {
            let path = segment
                .iter()
                .map(|(x, y)| format!("{x:.2},{y:.2}"))
                .collect::<Vec<_>>()
                .join(" ");
            svg.push_str(&format!(
                "<polyline class=\"{class}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"1\" points=\"{path}\"/>\n"
            ));
        }

        svg.push_str(&format!("<g class=\"{class}-markers\" fill=\"{color}\">\n"));
        for (x, y) in segments.iter().flatten() {
            svg.push_str(&format!(
                "<circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{MARKER_RADIUS}\"/>\n"
            ));
        }
        svg.push_str("</g>\n");
    }
}

fn push_legend(svg: &mut String, width: f64, labels: &SeriesLabels) {
    let x = width - MARGIN_RIGHT - 150.0;
    let y = MARGIN_TOP + 10.0;
    svg.push_str(&format!(
        "<g class=\"legend\" font-size=\"12\">\
         <rect x=\"{bx}\" y=\"{by}\" width=\"150\" height=\"44\" fill=\"white\" stroke=\"#999\"/>\
         <line x1=\"{lx}\" y1=\"{y1}\" x2=\"{lx2}\" y2=\"{y1}\" stroke=\"{RAW_COLOR}\" stroke-width=\"2\"/>\
         <text x=\"{tx}\" y=\"{t1}\">{raw}</text>\
         <line x1=\"{lx}\" y1=\"{y2}\" x2=\"{lx2}\" y2=\"{y2}\" stroke=\"{FILTERED_COLOR}\" stroke-width=\"2\"/>\
         <text x=\"{tx}\" y=\"{t2}\">{filtered}</text></g>\n",
        bx = x,
        by = y,
        lx = x + 8.0,
        lx2 = x + 32.0,
        tx = x + 40.0,
        y1 = y + 14.0,
        t1 = y + 18.0,
        y2 = y + 32.0,
        t2 = y + 36.0,
        raw = escape(&labels.raw),
        filtered = escape(&labels.filtered),
    ));
}

fn skipped_samples(aligned: &[AlignedSample]) -> usize {
    aligned
        .iter()
        .flat_map(|s| [s.raw, s.filtered])
        .filter(|v| !v.is_finite())
        .count()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aligned() -> Vec<AlignedSample> {
        vec![
            AlignedSample::new(0, 0.1, 0.1),
            AlignedSample::new(1, 0.5, 0.4),
            AlignedSample::new(2, 0.9, 0.8),
        ]
    }

    #[test]
    fn test_document_has_title_labels_and_legend() {
        let chart = SvgChart::new("unused.svg");
        let svg = chart.document(&aligned(), &SeriesLabels::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("raw -&gt; filter"));
        assert!(svg.contains(">x</text>"));
        assert!(svg.contains(">y</text>"));
        assert!(svg.contains(">raw</text>"));
        assert!(svg.contains(">filtered</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_one_marker_per_sample_per_series() {
        let chart = SvgChart::new("unused.svg");
        let svg = chart.document(&aligned(), &SeriesLabels::default());
        assert_eq!(svg.matches("<circle").count(), 6);
        assert_eq!(svg.matches("<polyline").count(), 2);
    }

    #[test]
    fn test_labels_are_escaped() {
        let labels = SeriesLabels {
            raw: "in <raw>".to_string(),
            filtered: "a & b".to_string(),
        };
        let svg = SvgChart::new("unused.svg").document(&aligned(), &labels);
        assert!(svg.contains("in &lt;raw&gt;"));
        assert!(svg.contains("a &amp; b"));
    }

    #[test]
    fn test_viewport_maps_extremes_to_plot_edges() {
        let viewport = Viewport::fit(&aligned(), 1200.0, 600.0);
        assert_eq!(viewport.x(0), MARGIN_LEFT);
        assert_eq!(viewport.x(2), 1200.0 - MARGIN_RIGHT);
        assert_eq!(viewport.y(0.1), 600.0 - MARGIN_BOTTOM);
        assert_eq!(viewport.y(0.9), MARGIN_TOP);
    }

    #[test]
    fn test_empty_and_flat_series_render() {
        let chart = SvgChart::new("unused.svg");
        let svg = chart.document(&[], &SeriesLabels::default());
        assert_eq!(svg.matches("<circle").count(), 0);

        let flat = vec![AlignedSample::new(0, 0.5, 0.5)];
        let svg = chart.document(&flat, &SeriesLabels::default());
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn test_non_finite_sample_breaks_line() {
        let aligned = vec![
            AlignedSample::new(0, 0.1, 0.1),
            AlignedSample::new(1, 0.5, f64::NAN),
            AlignedSample::new(2, 0.9, 0.8),
        ];
        let svg = SvgChart::new("unused.svg").document(&aligned, &SeriesLabels::default());
        assert_eq!(svg.matches("<polyline class=\"raw\"").count(), 1);
        assert_eq!(svg.matches("<polyline class=\"filtered\"").count(), 2);
        assert_eq!(svg.matches("<circle").count(), 5);
        assert!(svg.contains(">1 non-finite samples not drawn</text>"));
    }

    #[test]
    fn test_finite_run_has_no_skip_note() {
        let svg = SvgChart::new("unused.svg").document(&aligned(), &SeriesLabels::default());
        assert!(!svg.contains("not drawn"));
    }

    #[test]
    fn test_render_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        let mut chart = SvgChart::new(&path);
        chart.render(&aligned(), &SeriesLabels::default()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<polyline"));
    }
}
