use serde::Serialize;

use crate::error::{DashboardError, Result};

/// Multiplier applied to the interquartile range to obtain the upper fence.
pub const IQR_FENCE_MULTIPLIER: f64 = 1.5;

// ── Percentile helpers ────────────────────────────────────────────────────────

/// Compute the `q`-quantile (`0.0..=1.0`) of a **sorted** slice using linear
/// interpolation between closest ranks (NumPy's default `"linear"` method).
///
/// Returns `None` for an empty slice. A single-element slice yields that
/// element for every `q`.
pub fn quantile_sorted(sorted_data: &[f64], q: f64) -> Option<f64> {
    let len = sorted_data.len();
    if len == 0 {
        return None;
    }
    if len == 1 {
        return Some(sorted_data[0]);
    }
    let rank = q.clamp(0.0, 1.0) * (len as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted_data[lo]);
    }
    let frac = rank - lo as f64;
    Some(sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo]))
}

/// Sort a copy of `values` ascending (total order, NaN last).
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// `q`-quantile of unsorted `values`.
///
/// Fails with [`DashboardError::EmptyInput`] when `values` is empty.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    quantile_sorted(&sorted_copy(values), q).ok_or(DashboardError::EmptyInput {
        operation: "quantile",
    })
}

// ── IqrBounds ─────────────────────────────────────────────────────────────────

/// Quartiles and the upper Tukey fence of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IqrBounds {
    /// 25th percentile.
    pub q1: f64,
    /// 75th percentile.
    pub q3: f64,
    /// `q3 - q1`.
    pub iqr: f64,
    /// `q3 + 1.5 * iqr`; values strictly above are outliers.
    pub upper_bound: f64,
}

impl IqrBounds {
    /// Compute the quartiles and upper fence of `values`.
    ///
    /// Degenerate samples follow the same percentile rule as any other: one
    /// value gives `q1 == q3 == upper_bound == value`.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        let sorted = sorted_copy(values);
        let (Some(q1), Some(q3)) = (quantile_sorted(&sorted, 0.25), quantile_sorted(&sorted, 0.75))
        else {
            return Err(DashboardError::EmptyInput {
                operation: "iqr_bounds",
            });
        };
        let iqr = q3 - q1;
        Ok(Self {
            q1,
            q3,
            iqr,
            upper_bound: q3 + IQR_FENCE_MULTIPLIER * iqr,
        })
    }

    /// `true` when `value` is at or below the upper fence.
    pub fn admits(&self, value: f64) -> bool {
        value <= self.upper_bound
    }
}

// ── Tolerant comparison ───────────────────────────────────────────────────────

/// Relative tolerance used when comparing reported aggregates.
pub const RELATIVE_TOLERANCE: f64 = 1e-6;

/// `true` when `a` and `b` agree within [`RELATIVE_TOLERANCE`] (absolute for
/// values near zero).
pub fn approx_eq(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= RELATIVE_TOLERANCE * scale
}

// ── Tests ──────────────────────────────────────────────────────────────────────
