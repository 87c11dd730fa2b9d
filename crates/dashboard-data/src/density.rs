//! 2D histogram of `(discount, sales)` pairs for the density heatmap.

use serde::Serialize;

/// Axis ranges and bin counts for [`bin_density`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DensityConfig {
    /// Bins along the discount axis, which always spans `[0, 1]`.
    pub discount_bins: usize,
    pub sales_bins: usize,
    pub sales_min: f64,
    pub sales_max: f64,
}

impl DensityConfig {
    pub const DEFAULT_BINS: usize = 10;
    pub const DEFAULT_SALES_MAX: f64 = 5000.0;

    pub fn new(discount_bins: usize, sales_bins: usize, sales_min: f64, sales_max: f64) -> Self {
        Self {
            discount_bins: discount_bins.max(1),
            sales_bins: sales_bins.max(1),
            sales_min,
            sales_max,
        }
    }

    /// Square grid of `bins × bins` over `[0, sales_max]`.
    pub fn square(bins: usize, sales_max: f64) -> Self {
        Self::new(bins, bins, 0.0, sales_max)
    }
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self::square(Self::DEFAULT_BINS, Self::DEFAULT_SALES_MAX)
    }
}

/// Point counts per `(sales bin, discount bin)` cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityGrid {
    pub config: DensityConfig,
    /// `counts[sales_bin][discount_bin]`; row 0 is the lowest sales bin.
    pub counts: Vec<Vec<u32>>,
    /// Points outside either axis range.
    pub clipped: usize,
}

impl DensityGrid {
    /// Largest cell count, used to scale colours.
    pub fn max_count(&self) -> u32 {
        self.counts
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Points placed in a bin.
    pub fn binned(&self) -> usize {
        self.counts
            .iter()
            .flat_map(|row| row.iter())
            .map(|&c| c as usize)
            .sum()
    }

    /// `[lower, upper)` edges of a sales bin.
    pub fn sales_bin_edges(&self, bin: usize) -> (f64, f64) {
        let width = (self.config.sales_max - self.config.sales_min) / self.config.sales_bins as f64;
        let lower = self.config.sales_min + width * bin as f64;
        (lower, lower + width)
    }

    /// `[lower, upper)` edges of a discount bin.
    pub fn discount_bin_edges(&self, bin: usize) -> (f64, f64) {
        let width = 1.0 / self.config.discount_bins as f64;
        (width * bin as f64, width * (bin + 1) as f64)
    }
}

/// Bin `pairs` of `(discount, sales)` into a grid.
///
/// The upper edge of each axis belongs to its last bin. Points outside
/// either range, or non-finite ones, are counted in `clipped`.
pub fn bin_density(pairs: &[(f64, f64)], config: DensityConfig) -> DensityGrid {
    let mut counts = vec![vec![0u32; config.discount_bins]; config.sales_bins];
    let mut clipped = 0;

    for &(discount, sales) in pairs {
        let x = bin_index(discount, 0.0, 1.0, config.discount_bins);
        let y = bin_index(sales, config.sales_min, config.sales_max, config.sales_bins);
        match (x, y) {
            (Some(x), Some(y)) => counts[y][x] += 1,
            _ => clipped += 1,
        }
    }

    DensityGrid {
        config,
        counts,
        clipped,
    }
}

fn bin_index(value: f64, min: f64, max: f64, bins: usize) -> Option<usize> {
    if !value.is_finite() || value < min || value > max || max <= min {
        return None;
    }
    let scaled = (value - min) / (max - min) * bins as f64;
    Some((scaled as usize).min(bins - 1))
}
