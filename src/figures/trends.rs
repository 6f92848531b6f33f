use std::collections::BTreeMap;

use log::{debug, warn};
use plotters::style::BLACK;

use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, init_filter_state, range_indices, select_values};
use crate::data::model::{CellValue, Table};
use crate::data::transform::{bin_sum, extrapolate_linear, linspace, normalize_to};
use crate::error::{FigureError, Result};
use crate::render::{ChartSpec, Series, SeriesKind};

// ---------------------------------------------------------------------------
// Learning curves
// ---------------------------------------------------------------------------

/// Upper end of the production-quantity axis.
const QUANTITY_MAX: f64 = 150.0;
const RESAMPLE_POINTS: usize = 100;

/// One line per table, each an `x`,`y` curve resampled piecewise-linearly
/// onto 100 points from its smallest `x` to 150.
pub fn learning_curves(tables: &BTreeMap<String, Table>) -> Result<ChartSpec> {
    if tables.is_empty() {
        return Err(FigureError::InvalidInput("no learning-curve tables".into()));
    }

    let mut spec = ChartSpec::new(
        "Learning curves",
        "Quantity (Number of Aircraft Produced)",
        "[%]",
    );
    for (stem, table) in tables {
        let (xs, ys) = table.xy("x", "y")?;
        let x_min = xs.iter().copied().fold(f64::INFINITY, f64::min);
        if x_min.is_nan() || x_min >= QUANTITY_MAX {
            return Err(FigureError::InvalidInput(format!(
                "'{stem}': x must start below {QUANTITY_MAX}"
            )));
        }
        let x_new = linspace(x_min, QUANTITY_MAX, RESAMPLE_POINTS);
        let y_new = extrapolate_linear(&xs, &ys, &x_new)?;
        debug!("{stem}: {} knots resampled to {}", xs.len(), x_new.len());
        spec = spec.with_series(Series::from_xy(
            stem.replace('_', " "),
            SeriesKind::Line,
            &x_new,
            &y_new,
        ));
    }
    spec.x_range = Some(0.0..QUANTITY_MAX);
    spec.y_range = Some(0.0..100.0);
    Ok(spec)
}

// ---------------------------------------------------------------------------
// CO2 emissions by flight distance
// ---------------------------------------------------------------------------

pub const DISTANCE_COLUMN: &str = "Distance Bin, Upper Limit [km]";
pub const SHARE_COLUMN: &str = "Share of Emissions [%]";
pub const REGION_COLUMN: &str = "region";

/// Eurocontrol distance bins, right-closed.
pub const EUROCONTROL_EDGES: [f64; 6] = [0.0, 500.0, 1500.0, 2000.0, 3000.0, 13_000.0];
const EUROCONTROL_LABELS: [&str; 5] = ["<500", "501-1500", "1501-2000", "2001-3000", ">3001"];
const BAR_GROUP_WIDTH: f64 = 0.75;

/// Emission shares regrouped into the Eurocontrol distance bins, one bar
/// group per bin and one bar per region.
pub fn emissions_by_distance(table: &Table) -> Result<ChartSpec> {
    let groups: Vec<(String, Table, Option<CellValue>)> = if table.has_column(REGION_COLUMN) {
        let regions = table.unique_values.get(REGION_COLUMN).cloned().unwrap_or_default();
        regions
            .into_iter()
            .filter(|r| *r != CellValue::Null)
            .map(|region| {
                let mut filters = init_filter_state(table);
                select_values(&mut filters, REGION_COLUMN, [region.clone()]);
                let rows = table.select(&filtered_indices(table, &filters));
                (region.to_string(), rows, Some(region))
            })
            .collect()
    } else {
        vec![(String::new(), table.clone(), None)]
    };
    if groups.is_empty() {
        return Err(FigureError::InvalidInput("no region has any rows".into()));
    }

    let color_map = table
        .unique_values
        .get(REGION_COLUMN)
        .map(|values| ColorMap::new(REGION_COLUMN, values));
    let bar_width = BAR_GROUP_WIDTH / groups.len() as f64;

    let mut spec = ChartSpec::new(
        "Share of CO2 emissions by flight distance",
        "Flight Distance [km]",
        SHARE_COLUMN,
    );
    for (j, (label, rows, region)) in groups.iter().enumerate() {
        let (distances, shares) = rows.xy(DISTANCE_COLUMN, SHARE_COLUMN)?;
        let outside = distances
            .iter()
            .filter(|&&d| d <= EUROCONTROL_EDGES[0] || d > EUROCONTROL_EDGES[5])
            .count();
        if outside > 0 {
            warn!("{outside} distance bin(s) outside the Eurocontrol bins ignored");
        }
        let sums = bin_sum(&distances, &shares, &EUROCONTROL_EDGES)?;

        let offset = (j as f64 - (groups.len() as f64 - 1.0) / 2.0) * bar_width;
        let points = sums
            .iter()
            .enumerate()
            .map(|(i, &share)| (i as f64 + offset, share))
            .collect();
        let mut series = Series::new(label.as_str(), SeriesKind::Bar { width: bar_width }, points);
        if let (Some(map), Some(region)) = (&color_map, region) {
            series = series.with_color(map.color_for(region));
        }
        spec = spec.with_series(series);
    }

    for (i, label) in EUROCONTROL_LABELS.iter().enumerate() {
        spec = spec.annotate(*label, (i as f64 - 0.3, 67.0));
    }
    spec.x_range = Some(-0.5..EUROCONTROL_LABELS.len() as f64 - 0.5);
    spec.y_range = Some(0.0..70.0);
    Ok(spec)
}

// ---------------------------------------------------------------------------
// Change relative to a base year
// ---------------------------------------------------------------------------

pub const YEAR_COLUMN: &str = "year";

/// Every numeric column of a wide `year, a, b, ...` table divided by its
/// value in `base_year`, from `base_year` onwards.
pub fn relative_change(table: &Table, base_year: i32) -> Result<ChartSpec> {
    let base = f64::from(base_year);
    let years = table.numeric_column(YEAR_COLUMN)?;
    let last_year = years.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if last_year < base {
        return Err(FigureError::InvalidInput(format!(
            "no data in or after {base_year}"
        )));
    }
    let window = table.select(&range_indices(table, YEAR_COLUMN, base, last_year));

    let mut spec = ChartSpec::new(
        format!("Change relative to {base_year}"),
        "Year",
        format!("Change Relative to {base_year} [1]"),
    );
    for column in table.column_names.iter().filter(|c| *c != YEAR_COLUMN) {
        let (xs, ys): (Vec<f64>, Vec<f64>) = window
            .rows
            .iter()
            .filter_map(|row| {
                let year = row.get(YEAR_COLUMN).and_then(CellValue::as_f64)?;
                let value = row.get(column.as_str()).and_then(CellValue::as_f64)?;
                Some((year, value))
            })
            .unzip();
        if xs.len() < window.len() {
            warn!("'{column}': {} rows without a value skipped", window.len() - xs.len());
        }
        if xs.is_empty() {
            continue;
        }
        let normalized = normalize_to(&xs, &ys, base)
            .map_err(|e| FigureError::InvalidInput(format!("'{column}': {e}")))?;
        spec = spec.with_series(Series::from_xy(column.as_str(), SeriesKind::Line, &xs, &normalized));
    }
    if spec.series.is_empty() {
        return Err(FigureError::InvalidInput(
            "no numeric series besides the year column".into(),
        ));
    }

    spec.series[0].color = Some(BLACK);
    spec.x_range = (last_year > base).then(|| base..last_year);
    Ok(spec)
}
