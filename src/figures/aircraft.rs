use plotters::style::{RGBColor, BLACK, RED};

use crate::color::TAB10;
use crate::data::transform::Unit;
use crate::error::Result;
use crate::fuel::FuelEstimate;
use crate::render::{ChartSpec, Series, SeriesKind};

const TAB_BLUE: RGBColor = TAB10[0];
const TAB_ORANGE: RGBColor = TAB10[1];
const TAB_RED: RGBColor = TAB10[3];

/// Fuel mass after each iteration of the estimator; the title reports the
/// volume per 100 passenger-km at `density` [kg/l].
pub fn fuel_convergence(estimate: &FuelEstimate, density: f64) -> ChartSpec {
    let points = estimate
        .trajectory
        .iter()
        .enumerate()
        .map(|(i, &fuel)| ((i + 1) as f64, fuel))
        .collect();

    let m = &estimate.mission;
    let title = format!(
        "Fuel mass estimate, {} pax over {} km ({:.2} l/100 pkm)",
        m.passengers,
        m.distance,
        estimate.fuel_per_100_pax_km_at(density)
    );

    let mut spec = ChartSpec::new(title, "Iterations [1]", "Fuel Mass [kg]")
        .with_series(Series::new("", SeriesKind::LineMarkers, points).with_color(BLACK));
    spec.x_range = Some(0.0..(estimate.iterations as f64 + 1.0));
    spec
}

// ---------------------------------------------------------------------------
// A350-900 payload/range
// ---------------------------------------------------------------------------

/// Corner points of the A350-900 payload/range envelope [NM, t].
const POINT_A: (f64, f64) = (500.0, 54.0);
const POINT_B: (f64, f64) = (5830.0, 54.0);
const POINT_C: (f64, f64) = (8575.0, 25.0);
const POINT_D: (f64, f64) = (9620.0, 0.0);
/// Typical 325-passenger cabin payload [NM, t].
const CABIN_325_PAX: [(f64, f64); 2] = [(500.0, 30.5), (8050.0, 30.5)];
/// Ultra-long-range reference mission: 15 550 km at 143.81 t take-off mass.
const REFERENCE_RANGE_KM: f64 = 15_550.0;
const REFERENCE_MASS_T: f64 = 143.81;

pub fn payload_range() -> Result<ChartSpec> {
    let reference_nm = Unit::Kilometre.convert(&[REFERENCE_RANGE_KM], Unit::NauticalMile)?[0];
    let reference = (reference_nm, REFERENCE_MASS_T);

    let mut spec = ChartSpec::new("Airbus A350-900", "Range [NM]", "Payload [t]")
        .with_series(Series::new("", SeriesKind::Area, vec![POINT_A, POINT_B]).with_color(TAB_BLUE))
        .with_series(
            Series::new("Fuel/Payload Tradeoff", SeriesKind::Area, vec![POINT_B, POINT_C])
                .with_color(TAB_ORANGE),
        )
        .with_series(
            Series::new("Payload/Range Tradeoff", SeriesKind::Area, vec![POINT_C, POINT_D])
                .with_color(TAB_RED),
        )
        .with_series(
            Series::new(
                "",
                SeriesKind::LineMarkers,
                vec![POINT_A, POINT_B, POINT_C, POINT_D],
            )
            .with_color(BLACK),
        )
        .with_series(
            Series::new("325 pax", SeriesKind::LineMarkers, CABIN_325_PAX.to_vec()).with_color(BLACK),
        )
        .with_series(Series::new("", SeriesKind::Scatter, vec![reference]).with_color(RED));

    for (label, (x, y)) in [("A", POINT_A), ("B", POINT_B), ("C", POINT_C), ("D", POINT_D)] {
        spec = spec.annotate(label, (x + 100.0, y + 2.0));
    }
    spec = spec.annotate(
        format!("Su-ungkavatin et al. (2023): ~{:.0} NM at {REFERENCE_MASS_T} t", reference_nm.round()),
        (reference.0 - 6000.0, reference.1 - 30.0),
    );
    spec.x_range = Some(0.0..10_000.0_f64.max(reference_nm + 500.0));
    spec.y_range = Some(0.0..160.0);
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuel::{EstimatorSettings, FuelEstimator, Mission, FUEL_DENSITY_KG_PER_L};

    #[test]
    fn convergence_chart_has_one_point_per_iteration() {
        let mission = Mission::new(55_912.87, 177, 110.0, 6654.0).unwrap();
        let est = FuelEstimator::with_settings(EstimatorSettings::fixed(10))
            .estimate(&mission)
            .unwrap();
        let spec = fuel_convergence(&est, FUEL_DENSITY_KG_PER_L);
        assert_eq!(spec.series.len(), 1);
        assert_eq!(spec.series[0].points.len(), 10);
        assert_eq!(spec.series[0].points[0].0, 1.0);
        assert_eq!(spec.y_label, "Fuel Mass [kg]");
    }

    #[test]
    fn convergence_title_uses_given_density() {
        let mission = Mission::new(55_912.87, 177, 110.0, 6654.0).unwrap();
        let est = FuelEstimator::default().estimate(&mission).unwrap();

        let light = fuel_convergence(&est, 0.5);
        let expected = format!("({:.2} l/100 pkm)", est.fuel_per_100_pax_km_at(0.5));
        assert!(light.title.contains(&expected), "{}", light.title);
        assert_ne!(light.title, fuel_convergence(&est, FUEL_DENSITY_KG_PER_L).title);
    }

    #[test]
    fn payload_range_reference_point_in_nautical_miles() {
        let spec = payload_range().unwrap();
        let reference = spec.series.last().unwrap().points[0];
        assert!((reference.0 - 8396.3).abs() < 0.5, "{}", reference.0);
        assert_eq!(reference.1, 143.81);
        assert_eq!(spec.annotations.len(), 5);
        assert!(spec.resolved_ranges().is_ok());
    }
}
