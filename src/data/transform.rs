//! Reshaping helpers: unit conversion, normalisation, resampling, fitting
//! and binning of numeric series.

use crate::error::{FigureError, Result};

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// Units that show up in the source tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Kilometre,
    NauticalMile,
    Kilogram,
    Tonne,
    Litre,
    Gigalitre,
    UsGallon,
}

/// Physical dimension of a unit; conversion only within one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Length,
    Mass,
    Volume,
}

impl Unit {
    /// (dimension, size in the dimension's base unit: km, kg, l)
    fn base(self) -> (Dimension, f64) {
        match self {
            Unit::Kilometre => (Dimension::Length, 1.0),
            Unit::NauticalMile => (Dimension::Length, 1.852),
            Unit::Kilogram => (Dimension::Mass, 1.0),
            Unit::Tonne => (Dimension::Mass, 1_000.0),
            Unit::Litre => (Dimension::Volume, 1.0),
            Unit::Gigalitre => (Dimension::Volume, 1e9),
            Unit::UsGallon => (Dimension::Volume, 3.785_411_784),
        }
    }

    /// Factor that converts a value in `self` to `to`.
    pub fn factor(self, to: Unit) -> Result<f64> {
        let (dim_from, from_size) = self.base();
        let (dim_to, to_size) = to.base();
        if dim_from != dim_to {
            return Err(FigureError::InvalidInput(format!(
                "cannot convert {self:?} to {to:?}"
            )));
        }
        Ok(from_size / to_size)
    }

    pub fn convert(self, values: &[f64], to: Unit) -> Result<Vec<f64>> {
        Ok(scale(values, self.factor(to)?))
    }
}

pub fn scale(values: &[f64], factor: f64) -> Vec<f64> {
    values.iter().map(|v| v * factor).collect()
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Divide `ys` by its value at `base_x` (e.g. 1950 = 1).
pub fn normalize_to(xs: &[f64], ys: &[f64], base_x: f64) -> Result<Vec<f64>> {
    check_same_len(xs, ys)?;
    let base = xs
        .iter()
        .position(|&x| x == base_x)
        .map(|i| ys[i])
        .ok_or_else(|| FigureError::InvalidInput(format!("no data point at x = {base_x}")))?;
    if base == 0.0 {
        return Err(FigureError::InvalidInput(format!(
            "value at x = {base_x} is zero"
        )));
    }
    Ok(ys.iter().map(|y| y / base).collect())
}

/// Each value as a percentage of the reference value at the same index.
pub fn normalize_each(values: &[f64], reference: &[f64]) -> Result<Vec<f64>> {
    check_same_len(values, reference)?;
    Ok(values
        .iter()
        .zip(reference)
        .map(|(v, r)| v / r * 100.0)
        .collect())
}

// ---------------------------------------------------------------------------
// Resampling
// ---------------------------------------------------------------------------

/// `n` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Piecewise-linear interpolation of (`xs`, `ys`) at `x_new`.
/// `xs` must be strictly increasing; values outside the knots are clamped
/// to the first/last `y`.
pub fn interp_linear(xs: &[f64], ys: &[f64], x_new: &[f64]) -> Result<Vec<f64>> {
    check_same_len(xs, ys)?;
    check_finite("interpolation knots", xs)?;
    check_finite("interpolation values", ys)?;
    check_finite("interpolation points", x_new)?;
    if xs.is_empty() {
        return Err(FigureError::InvalidInput("no knots to interpolate".into()));
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(FigureError::InvalidInput(
            "interpolation knots must be strictly increasing".into(),
        ));
    }

    let last = xs.len() - 1;
    Ok(x_new
        .iter()
        .map(|&x| {
            if x <= xs[0] {
                return ys[0];
            }
            if x >= xs[last] {
                return ys[last];
            }
            // first knot strictly greater than x; 1..=last here
            let hi = xs.partition_point(|&k| k <= x);
            let lo = hi - 1;
            let t = (x - xs[lo]) / (xs[hi] - xs[lo]);
            ys[lo] + t * (ys[hi] - ys[lo])
        })
        .collect())
}

/// Like [`interp_linear`] but extends the end segments instead of clamping,
/// as a linear spline does when evaluated past its last knot.
pub fn extrapolate_linear(xs: &[f64], ys: &[f64], x_new: &[f64]) -> Result<Vec<f64>> {
    let inner = interp_linear(xs, ys, x_new)?;
    if xs.len() < 2 {
        return Ok(inner);
    }
    let n = xs.len();
    let slope_lo = (ys[1] - ys[0]) / (xs[1] - xs[0]);
    let slope_hi = (ys[n - 1] - ys[n - 2]) / (xs[n - 1] - xs[n - 2]);
    Ok(x_new
        .iter()
        .zip(inner)
        .map(|(&x, y)| {
            if x < xs[0] {
                ys[0] + slope_lo * (x - xs[0])
            } else if x > xs[n - 1] {
                ys[n - 1] + slope_hi * (x - xs[n - 1])
            } else {
                y
            }
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Polynomial least squares
// ---------------------------------------------------------------------------

/// Polynomial with coefficients in increasing order of power.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    pub coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }
}

/// Least-squares fit of a polynomial of `degree` through (`xs`, `ys`).
///
/// `x` is mapped onto [-1, 1] before building the normal equations to keep
/// them well conditioned for years and distances; the returned coefficients
/// are in the original `x`.
pub fn polyfit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Polynomial> {
    check_same_len(xs, ys)?;
    if xs.len() <= degree {
        return Err(FigureError::InvalidInput(format!(
            "degree {degree} fit needs more than {degree} points, got {}",
            xs.len()
        )));
    }

    let (lo, hi) = xs
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    let mid = (hi + lo) / 2.0;
    let half = if hi > lo { (hi - lo) / 2.0 } else { 1.0 };
    let us: Vec<f64> = xs.iter().map(|x| (x - mid) / half).collect();

    let m = degree + 1;
    // Normal equations A·c = b with A[i][j] = Σ u^(i+j), b[i] = Σ y·u^i
    let mut power_sums = vec![0.0; 2 * degree + 1];
    let mut b = vec![0.0; m];
    for (&u, &y) in us.iter().zip(ys) {
        let mut p = 1.0;
        for (k, s) in power_sums.iter_mut().enumerate() {
            *s += p;
            if k < m {
                b[k] += y * p;
            }
            p *= u;
        }
    }
    let a: Vec<Vec<f64>> = (0..m)
        .map(|i| (0..m).map(|j| power_sums[i + j]).collect())
        .collect();
    let scaled = solve_linear(a, b)?;

    // Expand c_k·((x - mid)/half)^k back into powers of x.
    let mut coefficients = vec![0.0; m];
    for (k, &c) in scaled.iter().enumerate() {
        let factor = c / half.powi(k as i32);
        for j in 0..=k {
            coefficients[j] += factor * binomial(k, j) * (-mid).powi((k - j) as i32);
        }
    }
    Ok(Polynomial { coefficients })
}

fn binomial(n: usize, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Gaussian elimination with partial pivoting.
fn solve_linear(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            return Err(FigureError::InvalidInput(
                "polynomial fit is singular (repeated x values?)".into(),
            ));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let f = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= f * a[col][k];
            }
            b[row] -= f * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let s: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - s) / a[row][row];
    }
    Ok(x)
}

// ---------------------------------------------------------------------------
// Binning and smoothing
// ---------------------------------------------------------------------------

/// Sum `ys` into right-closed bins `(edges[i], edges[i+1]]`.
/// Points outside every bin are ignored.
pub fn bin_sum(xs: &[f64], ys: &[f64], edges: &[f64]) -> Result<Vec<f64>> {
    check_same_len(xs, ys)?;
    check_finite("binned positions", xs)?;
    check_finite("binned values", ys)?;
    check_finite("bin edges", edges)?;
    if edges.len() < 2 || edges.windows(2).any(|w| w[1] <= w[0]) {
        return Err(FigureError::InvalidInput(
            "bin edges must be at least two strictly increasing values".into(),
        ));
    }
    let mut sums = vec![0.0; edges.len() - 1];
    for (&x, &y) in xs.iter().zip(ys) {
        if x <= edges[0] || x > edges[edges.len() - 1] {
            continue;
        }
        let bin = edges.partition_point(|&e| e < x) - 1;
        sums[bin] += y;
    }
    Ok(sums)
}

/// Trailing rolling mean; the first `window - 1` entries average what is
/// available so far.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(FigureError::InvalidInput("rolling window must be at least 1".into()));
    }
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        out.push(sum / (i + 1).min(window) as f64);
    }
    Ok(out)
}

fn check_same_len(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(FigureError::InvalidInput(format!(
            "series lengths differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

fn check_finite(what: &str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(FigureError::InvalidInput(format!(
            "{what}: entry {i} is {}",
            values[i]
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * (1.0 + b.abs())
    }

    #[test]
    fn unit_conversion() {
        let nm = Unit::Kilometre.convert(&[15_550.0], Unit::NauticalMile).unwrap();
        assert!((nm[0] - 8396.33).abs() < 0.01);
        assert_eq!(Unit::Tonne.factor(Unit::Kilogram).unwrap(), 1000.0);
        assert!(Unit::Tonne.factor(Unit::Litre).is_err());
    }

    #[test]
    fn normalise_to_base_year() {
        let years = [1949.0, 1950.0, 1951.0];
        let rpk = [1.0, 2.0, 3.0];
        assert_eq!(normalize_to(&years, &rpk, 1950.0).unwrap(), vec![0.5, 1.0, 1.5]);
        assert!(normalize_to(&years, &rpk, 1900.0).is_err());
    }

    #[test]
    fn percentages_of_reference() {
        assert_eq!(normalize_each(&[5.0, 30.0], &[10.0, 60.0]).unwrap(), vec![50.0, 50.0]);
    }

    #[test]
    fn linspace_endpoints() {
        let v = linspace(50.0, 1000.0, 100);
        assert_eq!(v.len(), 100);
        assert_eq!(v[0], 50.0);
        assert_eq!(v[99], 1000.0);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn interpolation_hits_knots_and_midpoints() {
        let xs = [50.0, 150.0, 250.0, 400.0];
        let ys = [3.2, 10.1, 16.3, 43.7];
        let out = interp_linear(&xs, &ys, &[50.0, 100.0, 400.0, 10.0, 500.0]).unwrap();
        assert!(close(out[0], 3.2));
        assert!(close(out[1], 6.65));
        assert!(close(out[2], 43.7));
        assert!(close(out[3], 3.2));
        assert!(close(out[4], 43.7));
    }

    #[test]
    fn extrapolation_extends_end_segments() {
        let out = extrapolate_linear(&[0.0, 10.0], &[0.0, 5.0], &[20.0, -10.0]).unwrap();
        assert!(close(out[0], 10.0));
        assert!(close(out[1], -5.0));
    }

    #[test]
    fn interpolation_rejects_unsorted_knots() {
        assert!(interp_linear(&[1.0, 1.0], &[0.0, 1.0], &[1.0]).is_err());
    }

    #[test]
    fn polyfit_recovers_exact_polynomial() {
        let xs: Vec<f64> = (0..8).map(|i| 2000.0 + 5.0 * i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 0.5 * (x - 2000.0).powi(2) - 3.0 * (x - 2000.0) + 7.0).collect();
        let p = polyfit(&xs, &ys, 2).unwrap();
        for (&x, &y) in xs.iter().zip(&ys) {
            assert!((p.eval(x) - y).abs() < 1e-4, "{} vs {y}", p.eval(x));
        }
        assert_eq!(p.degree(), 2);
    }

    #[test]
    fn polyfit_needs_enough_points() {
        assert!(polyfit(&[1.0, 2.0], &[1.0, 2.0], 2).is_err());
    }

    #[test]
    fn binning_is_right_closed_and_preserves_total() {
        let upper = [500.0, 1000.0, 1500.0, 2000.0, 3000.0, 13000.0];
        let share = [10.0, 15.0, 20.0, 5.0, 25.0, 25.0];
        let edges = [0.0, 500.0, 1500.0, 2000.0, 3000.0, 13000.0];
        let bins = bin_sum(&upper, &share, &edges).unwrap();
        assert_eq!(bins, vec![10.0, 35.0, 5.0, 25.0, 25.0]);
        assert_eq!(bins.iter().sum::<f64>(), 100.0);
    }

    #[test]
    fn rolling_mean_window() {
        assert_eq!(rolling_mean(&[1.0, 2.0, 3.0, 4.0], 1).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(rolling_mean(&[2.0, 4.0, 6.0, 8.0], 2).unwrap(), vec![2.0, 3.0, 5.0, 7.0]);
        assert!(rolling_mean(&[1.0], 0).is_err());
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let edges = [0.0, 500.0, 1500.0];
        assert!(matches!(
            bin_sum(&[f64::NAN], &[1.0], &edges),
            Err(FigureError::InvalidInput(_))
        ));
        assert!(bin_sum(&[100.0], &[f64::INFINITY], &edges).is_err());
        assert!(interp_linear(&[0.0, f64::NAN], &[1.0, 2.0], &[0.5]).is_err());
        assert!(extrapolate_linear(&[0.0, 1.0], &[1.0, 2.0], &[f64::NAN]).is_err());
    }
}
