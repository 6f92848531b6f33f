use std::ops::Range;
use std::path::Path;

use anyhow::{bail, Context, Result};
use plotters::coord::combinators::IntoLogRange;
use plotters::coord::ranged1d::ValueFormatter;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::{OutputFormat, RenderSettings};
use crate::color::generate_palette;

/// Fraction of the data span added on each side of an axis.
const MARGIN: f64 = 0.05;

// ---------------------------------------------------------------------------
// Chart description
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesKind {
    Line,
    LineMarkers,
    Scatter,
    /// Bars centred on each x, `width` in x units.
    Bar { width: f64 },
    /// Filled area between the curve and the bottom of the y axis.
    Area,
}

#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub kind: SeriesKind,
    pub points: Vec<(f64, f64)>,
    /// Falls back to the chart palette when `None`.
    pub color: Option<RGBColor>,
}

impl Series {
    pub fn new(label: impl Into<String>, kind: SeriesKind, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            kind,
            points,
            color: None,
        }
    }

    pub fn from_xy(label: impl Into<String>, kind: SeriesKind, xs: &[f64], ys: &[f64]) -> Self {
        Self::new(label, kind, xs.iter().copied().zip(ys.iter().copied()).collect())
    }

    pub fn with_color(mut self, color: RGBColor) -> Self {
        self.color = Some(color);
        self
    }
}

/// Text placed at a data coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub at: (f64, f64),
}

#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Explicit axis limits; derived from the data when `None`.
    pub x_range: Option<Range<f64>>,
    pub y_range: Option<Range<f64>>,
    pub log_y: bool,
    pub series: Vec<Series>,
    pub annotations: Vec<Annotation>,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            x_range: None,
            y_range: None,
            log_y: false,
            series: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn annotate(mut self, text: impl Into<String>, at: (f64, f64)) -> Self {
        self.annotations.push(Annotation {
            text: text.into(),
            at,
        });
        self
    }

    fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().copied())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }

    /// Axis limits actually used for drawing.
    pub fn resolved_ranges(&self) -> Result<(Range<f64>, Range<f64>)> {
        let mut points = self.finite_points().peekable();
        if points.peek().is_none() && (self.x_range.is_none() || self.y_range.is_none()) {
            bail!("chart '{}' has no data points", self.title);
        }

        let (mut x_lo, mut x_hi, mut y_lo, mut y_hi) =
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
        for (x, y) in points {
            x_lo = x_lo.min(x);
            x_hi = x_hi.max(x);
            y_lo = y_lo.min(y);
            y_hi = y_hi.max(y);
        }

        let bar_half_width = self
            .series
            .iter()
            .filter_map(|s| match s.kind {
                SeriesKind::Bar { width } => Some(width / 2.0),
                _ => None,
            })
            .fold(0.0, f64::max);
        let has_filled = self
            .series
            .iter()
            .any(|s| matches!(s.kind, SeriesKind::Bar { .. } | SeriesKind::Area));

        let x_range = match &self.x_range {
            Some(r) => r.clone(),
            None => padded(x_lo - bar_half_width, x_hi + bar_half_width),
        };
        let y_range = match &self.y_range {
            Some(r) => r.clone(),
            None if self.log_y => {
                let lo = self
                    .finite_points()
                    .map(|(_, y)| y)
                    .filter(|y| *y > 0.0)
                    .fold(f64::INFINITY, f64::min);
                if !lo.is_finite() {
                    bail!("chart '{}' has no positive values for a log axis", self.title);
                }
                (lo / 2.0)..(y_hi * 2.0)
            }
            // Bars and areas are anchored at zero.
            None if has_filled => {
                let r = padded(y_lo.min(0.0), y_hi.max(0.0));
                r.start.max(y_lo.min(0.0))..r.end
            }
            None => padded(y_lo, y_hi),
        };

        if self.log_y && y_range.start <= 0.0 {
            bail!("log axis of chart '{}' must start above zero", self.title);
        }
        Ok((x_range, y_range))
    }
}

fn padded(lo: f64, hi: f64) -> Range<f64> {
    let span = hi - lo;
    let pad = if span.abs() < 1e-12 { 0.5_f64.max(lo.abs() * 0.1) } else { span * MARGIN };
    (lo - pad)..(hi + pad)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Draw `spec` to `path` with the backend selected by `settings.format`.
pub fn render_chart(spec: &ChartSpec, path: &Path, settings: &RenderSettings) -> Result<()> {
    let size = (settings.width, settings.height);
    let drawn = match settings.format {
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw(root, spec, settings)
        }
        OutputFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw(root, spec, settings)
        }
    };
    drawn.with_context(|| format!("rendering '{}' to {}", spec.title, path.display()))
}

fn draw<DB>(root: DrawingArea<DB, Shift>, spec: &ChartSpec, settings: &RenderSettings) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x_range, y_range) = spec.resolved_ranges()?;
    let h = settings.height;
    let family = settings.font_family.as_str();

    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .caption(&spec.title, (family, (h / 20).max(12)).into_font())
        .margin((h / 40).max(5))
        .x_label_area_size((h / 10).max(30))
        .y_label_area_size((h / 7).max(50));

    if spec.log_y {
        let chart = builder.build_cartesian_2d(x_range, y_range.log_scale())?;
        draw_contents(chart, spec, settings)?;
    } else {
        let chart = builder.build_cartesian_2d(x_range, y_range)?;
        draw_contents(chart, spec, settings)?;
    }

    root.present()?;
    Ok(())
}

fn draw_contents<'a, DB, Y>(
    mut chart: ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
    spec: &ChartSpec,
    settings: &RenderSettings,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let h = settings.height;
    let family = settings.font_family.as_str();
    let baseline = chart.y_range().start;

    chart
        .configure_mesh()
        .x_desc(&spec.x_label)
        .y_desc(&spec.y_label)
        .label_style((family, (h / 40).max(10)).into_font())
        .axis_desc_style((family, (h / 30).max(11)).into_font())
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .draw()?;

    let palette = generate_palette(spec.series.len());
    let stroke = (h / 250).max(1);

    for (idx, series) in spec.series.iter().enumerate() {
        let color = series.color.unwrap_or(palette[idx]);
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();

        let anno = match series.kind {
            SeriesKind::Line => chart.draw_series(LineSeries::new(
                points,
                color.stroke_width(stroke),
            ))?,
            SeriesKind::LineMarkers => {
                chart.draw_series(
                    points
                        .iter()
                        .map(|&p| Circle::new(p, stroke + 3, color.filled())),
                )?;
                chart.draw_series(LineSeries::new(points, color.stroke_width(stroke)))?
            }
            SeriesKind::Scatter => chart.draw_series(
                points
                    .into_iter()
                    .map(|p| Circle::new(p, stroke + 3, color.filled())),
            )?,
            SeriesKind::Bar { width } => chart.draw_series(points.into_iter().map(|(x, y)| {
                Rectangle::new(
                    [(x - width / 2.0, baseline), (x + width / 2.0, y)],
                    color.mix(0.85).filled(),
                )
            }))?,
            SeriesKind::Area => chart.draw_series(
                AreaSeries::new(points, baseline, color.mix(0.35).filled())
                    .border_style(color.stroke_width(stroke)),
            )?,
        };

        if !series.label.is_empty() {
            anno.label(series.label.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(stroke + 1))
            });
        }
    }

    for note in &spec.annotations {
        chart.draw_series(std::iter::once(Text::new(
            note.text.clone(),
            note.at,
            (family, (h / 40).max(10)).into_font(),
        )))?;
    }

    if spec.series.iter().any(|s| !s.label.is_empty()) {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font((family, (h / 40).max(10)).into_font())
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_pad_the_data() {
        let spec = ChartSpec::new("t", "x", "y").with_series(Series::new(
            "s",
            SeriesKind::Line,
            vec![(0.0, 10.0), (100.0, 20.0)],
        ));
        let (x, y) = spec.resolved_ranges().unwrap();
        assert!(x.start < 0.0 && x.end > 100.0);
        assert!(y.start < 10.0 && y.end > 20.0);
    }

    #[test]
    fn bars_start_at_zero_and_widen_x() {
        let spec = ChartSpec::new("t", "x", "y").with_series(Series::new(
            "s",
            SeriesKind::Bar { width: 0.8 },
            vec![(0.0, 10.0), (4.0, 20.0)],
        ));
        let (x, y) = spec.resolved_ranges().unwrap();
        assert!(x.start <= -0.4 && x.end >= 4.4);
        assert_eq!(y.start, 0.0);
    }

    #[test]
    fn log_axis_skips_non_positive_values() {
        let mut spec = ChartSpec::new("t", "n", "paths").with_series(Series::new(
            "s",
            SeriesKind::Line,
            vec![(1.0, 0.0), (2.0, 10.0), (3.0, 1e6)],
        ));
        spec.log_y = true;
        let (_, y) = spec.resolved_ranges().unwrap();
        assert_eq!(y.start, 5.0);
        assert_eq!(y.end, 2e6);
    }

    #[test]
    fn explicit_ranges_win() {
        let mut spec = ChartSpec::new("t", "x", "y")
            .with_series(Series::new("", SeriesKind::Scatter, vec![(1.0, 1.0)]));
        spec.x_range = Some(500.0..12_500.0);
        spec.y_range = Some(0.0..150.0);
        let (x, y) = spec.resolved_ranges().unwrap();
        assert_eq!(x, 500.0..12_500.0);
        assert_eq!(y, 0.0..150.0);
    }

    #[test]
    fn empty_chart_is_an_error() {
        assert!(ChartSpec::new("empty", "x", "y").resolved_ranges().is_err());
    }

    #[test]
    fn single_point_gets_a_span() {
        let spec = ChartSpec::new("t", "x", "y")
            .with_series(Series::new("", SeriesKind::Scatter, vec![(3.0, 3.0)]));
        let (x, y) = spec.resolved_ranges().unwrap();
        assert!(x.end > x.start && y.end > y.start);
    }
}
