use plotters::style::BLACK;

use crate::error::{FigureError, Result};
use crate::paths;
use crate::render::{ChartSpec, Series, SeriesKind};

/// Path counts for `2..=n_max` sectors at a fixed order, on a log axis.
/// Values that overflow are left out of their series.
pub fn paths_in_graph(n_max: u32, order: u32) -> Result<ChartSpec> {
    if n_max < 2 {
        return Err(FigureError::InvalidInput(format!(
            "at least 2 sectors required, got {n_max}"
        )));
    }

    let rows = paths::table(2..=n_max, order);
    let points = |pick: fn(&paths::PathCount) -> Option<u128>| -> Vec<(f64, f64)> {
        rows.iter()
            .filter_map(|row| pick(row).map(|count| (f64::from(row.sectors), count as f64)))
            .filter(|&(_, count)| count > 0.0)
            .collect()
    };
    let power_series = points(|row| row.power_series);
    let graph_theory = points(|row| row.graph_theory);

    if power_series.is_empty() && graph_theory.is_empty() {
        return Err(FigureError::Overflow(format!(
            "no path count of order {order} fits for up to {n_max} sectors"
        )));
    }
    log::debug!(
        "paths in graph: {} power-series and {} graph-theory points",
        power_series.len(),
        graph_theory.len()
    );

    let mut spec = ChartSpec::new(
        format!("Paths of order {order} in an input/output table"),
        "Number of Sectors [1]",
        "Number of Paths [1]",
    )
    .with_series(Series::new("Power Series", SeriesKind::LineMarkers, power_series).with_color(BLACK))
    .with_series(Series::new("Graph Theory", SeriesKind::Line, graph_theory));
    spec.log_y = true;
    spec.x_range = Some(0.0..f64::from(n_max) + 1.0);
    Ok(spec)
}
