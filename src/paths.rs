//! Counting supply-chain paths through an input/output table.
//!
//! An input/output table with `n` sectors is a complete directed graph;
//! tiered (hybrid) LCA enumerates paths up to some length, and the number of
//! paths explodes with `n`. Two counts are compared here:
//!
//! * [`power_series`]: simple paths between a fixed source/sink pair with
//!   at most `l` edges, `Σ_{k=n-l-1}^{n-2} (n-2)!/k!`. The term for `k`
//!   counts the paths with `n-1-k` edges, so the sum is cumulative in `l`.
//! * [`graph_theory`]: walks of order `ω`, `n^(ω-1)`.

use crate::error::{FigureError, Result};

/// Number of source-to-sink paths of length 1 up to `l` in an input/output
/// table with `n` sectors.
pub fn power_series(n: u32, l: u32) -> Result<u128> {
    if n < 2 {
        return Err(FigureError::InvalidInput(format!(
            "at least 2 sectors required, got {n}"
        )));
    }
    if l == 0 || l > n - 1 {
        return Err(FigureError::InvalidInput(format!(
            "path length must lie in 1..={}, got {l}",
            n - 1
        )));
    }

    let top = n - 2;
    let mut total: u128 = 0;
    for k in (n - l - 1)..=top {
        // (n-2)!/k! = (k+1)·(k+2)···(n-2)
        let term = falling_product(k + 1, top)
            .ok_or_else(|| FigureError::Overflow(format!("paths of length {l} for n = {n}")))?;
        total = total
            .checked_add(term)
            .ok_or_else(|| FigureError::Overflow(format!("paths of length {l} for n = {n}")))?;
    }
    Ok(total)
}

/// Number of omega-order paths, `n^(omega-1)`.
pub fn graph_theory(n: u32, omega: u32) -> Result<u128> {
    if omega == 0 {
        return Err(FigureError::InvalidInput("path order must be at least 1".into()));
    }
    u128::from(n)
        .checked_pow(omega - 1)
        .ok_or_else(|| FigureError::Overflow(format!("{n}^{}", omega - 1)))
}

/// Product of the integers `from..=to`; an empty range yields 1.
fn falling_product(from: u32, to: u32) -> Option<u128> {
    (from..=to).try_fold(1u128, |acc, i| acc.checked_mul(u128::from(i)))
}

/// One row of the path-count comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathCount {
    pub sectors: u32,
    pub power_series: Option<u128>,
    pub graph_theory: Option<u128>,
}

/// Both counts for every sector count in `sectors`, at a fixed path order.
/// Counts that overflow or are undefined for small `n` are `None`.
pub fn table(sectors: impl IntoIterator<Item = u32>, order: u32) -> Vec<PathCount> {
    sectors
        .into_iter()
        .map(|n| PathCount {
            sectors: n,
            power_series: power_series(n, order).ok(),
            graph_theory: graph_theory(n, order).ok(),
        })
        .collect()
}
