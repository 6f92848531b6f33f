//! Property-based tests for the fuel kernel and the numeric helpers.

use aviation_figures::color::generate_palette;
use aviation_figures::data::transform::{bin_sum, interp_linear, linspace};
use aviation_figures::fuel::{FuelEstimator, Mission};
use aviation_figures::paths::{graph_theory, power_series};
use proptest::prelude::*;

// ── Fuel estimator ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A longer mission never needs less fuel.
    #[test]
    fn fuel_monotone_in_distance(
        oew in 20_000.0f64..150_000.0,
        pax in 1u32..400,
        d in 100.0f64..12_000.0,
        extra in 50.0f64..3_000.0,
    ) {
        let estimator = FuelEstimator::default();
        let short = estimator.estimate(&Mission::new(oew, pax, 100.0, d).unwrap()).unwrap();
        let long = estimator.estimate(&Mission::new(oew, pax, 100.0, d + extra).unwrap()).unwrap();
        prop_assert!(long.fuel_mass > short.fuel_mass);
    }

    /// The iteration starts from an empty tank, so every iterate grows.
    #[test]
    fn trajectory_non_decreasing(
        oew in 20_000.0f64..150_000.0,
        pax in 1u32..400,
        d in 100.0f64..12_000.0,
    ) {
        let est = FuelEstimator::default().estimate(&Mission::new(oew, pax, 95.0, d).unwrap()).unwrap();
        prop_assert!(est.converged);
        prop_assert!(est.trajectory.windows(2).all(|w| w[1] >= w[0]));
    }
}

// ── Interpolation and binning ────────────────────────────────────────

proptest! {
    /// Interpolated values stay within the neighbouring knot values.
    #[test]
    fn interp_within_knots(
        ys in prop::collection::vec(-1_000.0f64..1_000.0, 2..20),
        t in 0.0f64..1.0,
    ) {
        let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64 * 2.0).collect();
        let x = t * xs[xs.len() - 1];
        let y = interp_linear(&xs, &ys, &[x]).unwrap()[0];

        let hi = xs.partition_point(|&k| k < x).clamp(1, xs.len() - 1);
        let (a, b) = (ys[hi - 1], ys[hi]);
        prop_assert!(y >= a.min(b) - 1e-9 && y <= a.max(b) + 1e-9);
    }

    /// Knots are reproduced exactly.
    #[test]
    fn interp_hits_knots(ys in prop::collection::vec(-1_000.0f64..1_000.0, 2..20)) {
        let xs = linspace(0.0, 10.0, ys.len());
        let at_knots = interp_linear(&xs, &ys, &xs).unwrap();
        prop_assert_eq!(at_knots, ys);
    }

    /// Binning keeps the total of every point inside the outer edges.
    #[test]
    fn bin_sum_preserves_total(
        points in prop::collection::vec((0.5f64..12_999.0, 0.0f64..100.0), 0..50),
    ) {
        let (xs, ys): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
        let edges = [0.0, 500.0, 1500.0, 2000.0, 3000.0, 13_000.0];
        let sums = bin_sum(&xs, &ys, &edges).unwrap();
        let total: f64 = ys.iter().sum();
        prop_assert!((sums.iter().sum::<f64>() - total).abs() < 1e-6);
    }

    #[test]
    fn palette_has_requested_size(n in 0usize..64) {
        prop_assert_eq!(generate_palette(n).len(), n);
    }
}

// ── Path counts ──────────────────────────────────────────────────────

proptest! {
    /// `l = n - 1` sums every falling factorial `(n-2)!/k!` for `k` in `0..=n-2`.
    #[test]
    fn power_series_full_length(n in 2u32..25) {
        let expected: u128 = (0..=n - 2)
            .map(|k| ((k + 1)..=(n - 2)).map(u128::from).product::<u128>())
            .sum();
        prop_assert_eq!(power_series(n, n - 1).unwrap(), expected);
    }

    #[test]
    fn graph_theory_first_order_is_one(n in 1u32..10_000) {
        prop_assert_eq!(graph_theory(n, 1).unwrap(), 1);
    }
}
