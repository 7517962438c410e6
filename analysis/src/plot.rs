//! SVG line charts, one per benchmark.
//!
//! Every known policy gets a line in canonical order so colours and legend positions are the
//! same on every chart. Non-finite values (log of zero) are not drawn.

use crate::curve::{Curve, Scale};
use llbench_dataset::{Benchmark, Dataset, DatasetError, Policy};
use std::{
    ffi::OsString,
    fmt::{self, Write},
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

pub const EXTENSION: &str = "svg";

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
// room for the axis label and the legend row
const MARGIN_BOTTOM: f64 = 110.0;
const TICKS: usize = 5;

// matplotlib's default colour cycle
const COLORS: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to load dataset: {0}")]
    Dataset(#[from] DatasetError),
    #[error("Failed to write chart {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
struct Series {
    label: String,
    color: &'static str,
    points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone)]
pub struct Chart {
    title: String,
    scale: Scale,
    series: Vec<Series>,
}

/// closed interval, widened if it would be a single value
#[derive(Debug, Clone, Copy, PartialEq)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |range, value| match range {
            None => Some(Self {
                min: value,
                max: value,
            }),
            Some(Self { min, max }) => Some(Self {
                min: min.min(value),
                max: max.max(value),
            }),
        })
    }

    fn widened(self) -> Self {
        if self.max > self.min {
            self
        } else {
            let pad = if self.min == 0.0 { 1.0 } else { self.min.abs() * 0.1 };

            Self {
                min: self.min - pad,
                max: self.max + pad,
            }
        }
    }

    fn padded(self, fraction: f64) -> Self {
        let pad = (self.max - self.min) * fraction;

        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// position of `value` in [0, 1]
    fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    fn ticks(&self) -> impl Iterator<Item = f64> + '_ {
        (0..TICKS).map(move |tick| self.min + (self.max - self.min) * tick as f64 / (TICKS - 1) as f64)
    }
}

impl Chart {
    pub fn new(title: impl Into<String>, scale: Scale) -> Self {
        Self {
            title: title.into(),
            scale,
            series: Vec::new(),
        }
    }

    /// Add one line. Colours are assigned in insertion order, an empty curve still takes its
    /// colour and legend slot.
    pub fn add_series(&mut self, label: impl Into<String>, curve: &Curve) {
        let color = COLORS[self.series.len() % COLORS.len()];
        let points = curve
            .points()
            .iter()
            .map(|&(threads, value)| (f64::from(threads), value))
            .filter(|&(_, value)| value.is_finite())
            .collect::<Vec<_>>();

        if points.len() < curve.len() {
            warn!(
                chart = %self.title,
                "Skipped {} non-finite point(s)",
                curve.len() - points.len()
            );
        }

        self.series.push(Series {
            label: label.into(),
            color,
            points,
        });
    }

    fn all_points(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.series.iter().flat_map(|series| series.points.iter())
    }

    pub fn render(&self) -> String {
        let mut svg = String::new();
        // formatting into a String never fails
        let _ = self.write_svg(&mut svg);

        svg
    }

    fn write_svg(&self, svg: &mut String) -> fmt::Result {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let bottom = MARGIN_TOP + plot_height;

        let x_range = Range::of(self.all_points().map(|&(x, _)| x))
            .unwrap_or(Range { min: 0.0, max: 1.0 })
            .widened();
        let y_range = Range::of(self.all_points().map(|&(_, y)| y))
            .unwrap_or(Range { min: 0.0, max: 1.0 })
            .widened()
            .padded(0.05);

        let to_x = |x: f64| MARGIN_LEFT + x_range.fraction(x) * plot_width;
        let to_y = |y: f64| bottom - y_range.fraction(y) * plot_height;

        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\">"
        )?;
        svg.push_str("  <style>\n");
        svg.push_str("    text { font-family: sans-serif; font-size: 12px; }\n");
        svg.push_str("    .title { font-size: 16px; }\n");
        svg.push_str("    .grid { stroke: #ddd; stroke-width: 1; }\n");
        svg.push_str("    .frame { fill: none; stroke: #333; stroke-width: 1; }\n");
        svg.push_str("  </style>\n");
        svg.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");

        writeln!(
            svg,
            "  <text class=\"title\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>",
            MARGIN_LEFT + plot_width / 2.0,
            MARGIN_TOP - 18.0,
            escape(&self.title)
        )?;

        // grid and tick labels
        for tick in x_range.ticks() {
            let x = to_x(tick);
            writeln!(
                svg,
                "  <line class=\"grid\" x1=\"{x:.1}\" y1=\"{MARGIN_TOP:.1}\" x2=\"{x:.1}\" y2=\"{bottom:.1}\"/>"
            )?;
            writeln!(
                svg,
                "  <text x=\"{x:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>",
                bottom + 16.0,
                format_tick(tick)
            )?;
        }
        for tick in y_range.ticks() {
            let y = to_y(tick);
            writeln!(
                svg,
                "  <line class=\"grid\" x1=\"{MARGIN_LEFT:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\"/>",
                MARGIN_LEFT + plot_width
            )?;
            writeln!(
                svg,
                "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{}</text>",
                MARGIN_LEFT - 6.0,
                y + 4.0,
                format_tick(tick)
            )?;
        }
        writeln!(
            svg,
            "  <rect class=\"frame\" x=\"{MARGIN_LEFT:.1}\" y=\"{MARGIN_TOP:.1}\" width=\"{plot_width:.1}\" height=\"{plot_height:.1}\"/>"
        )?;

        // axis labels
        writeln!(
            svg,
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">num cores</text>",
            MARGIN_LEFT + plot_width / 2.0,
            bottom + 36.0
        )?;
        writeln!(
            svg,
            "  <text x=\"{0:.1}\" y=\"{1:.1}\" text-anchor=\"middle\" transform=\"rotate(-90 {0:.1} {1:.1})\">{2}</text>",
            24.0,
            MARGIN_TOP + plot_height / 2.0,
            self.scale.axis_label()
        )?;

        // one line per series, markers so single points stay visible
        for series in self.series.iter().filter(|series| !series.points.is_empty()) {
            let points = series
                .points
                .iter()
                .map(|&(x, y)| format!("{:.2},{:.2}", to_x(x), to_y(y)))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(
                svg,
                "  <polyline data-series=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" points=\"{points}\"/>",
                escape(&series.label),
                series.color
            )?;
            for &(x, y) in series.points.iter() {
                writeln!(
                    svg,
                    "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"2.5\" fill=\"{}\"/>",
                    to_x(x),
                    to_y(y),
                    series.color
                )?;
            }
        }

        // legend, a single row below the plot
        if !self.series.is_empty() {
            let slot = plot_width / self.series.len() as f64;
            let y = bottom + 70.0;

            writeln!(
                svg,
                "  <rect class=\"frame\" x=\"{MARGIN_LEFT:.1}\" y=\"{:.1}\" width=\"{plot_width:.1}\" height=\"26\" rx=\"4\"/>",
                y - 13.0
            )?;
            for (index, series) in self.series.iter().enumerate() {
                let x = MARGIN_LEFT + slot * index as f64 + 10.0;
                writeln!(
                    svg,
                    "  <line x1=\"{x:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"{}\" stroke-width=\"2\"/>",
                    x + 20.0,
                    series.color
                )?;
                writeln!(
                    svg,
                    "  <text x=\"{:.1}\" y=\"{:.1}\">{}</text>",
                    x + 26.0,
                    y + 4.0,
                    escape(&series.label)
                )?;
            }
        }

        svg.push_str("</svg>\n");

        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn format_tick(value: f64) -> String {
    let magnitude = value.abs();

    if value == 0.0 {
        "0".to_owned()
    } else if magnitude >= 1e5 || magnitude < 1e-2 {
        format!("{value:.2e}")
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// `<prefix>-<bench>.svg`
pub fn chart_path(prefix: &Path, bench: Benchmark) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push("-");
    name.push(bench.as_str());
    name.push(".");
    name.push(EXTENSION);

    PathBuf::from(name)
}

/// Chart for a single benchmark with a line for every known policy
pub fn benchmark_chart(dataset: &Dataset, bench: Benchmark, scale: Scale) -> Chart {
    let mut chart = Chart::new(bench.as_str(), scale);

    for policy in Policy::ALL {
        let curve = Curve::build(dataset, bench.as_str(), policy.as_str(), scale);
        debug!(%bench, %policy, points = curve.len(), "Built curve");

        chart.add_series(policy.label(), &curve);
    }

    chart
}

/// Render one chart per known benchmark, returns the written paths
#[instrument(skip(dataset), level = "info")]
pub fn render_all(
    dataset: &Dataset,
    prefix: &Path,
    scale: Scale,
) -> Result<Vec<PathBuf>, PlotError> {
    let mut written = Vec::new();

    for bench in Benchmark::ALL {
        let path = chart_path(prefix, bench);

        fs::write(&path, benchmark_chart(dataset, bench, scale).render()).map_err(|source| {
            PlotError::Write {
                path: path.clone(),
                source,
            }
        })?;
        info!(path = ?path, "Wrote chart for {bench}");

        written.push(path);
    }

    Ok(written)
}
