//! The full set of derived views for one filtered record set.
//!
//! [`compute_views`] runs every aggregation in one pass over the pipeline.
//! Views that cannot be computed for an empty selection carry their own
//! `Result`, so a failure there never hides the views that did succeed.

use std::collections::BTreeMap;

use chrono::Local;
use dashboard_core::error::Result;
use dashboard_core::models::{Dimension, Record};
use serde::Serialize;

use crate::aggregator::{
    build_category_tree, compute_categorical_counts, compute_cumulative_series,
    compute_discount_sales_pairs, compute_hierarchical_sales, compute_max_profit, CategoryCount,
    CategoryNode, CumulativePoint, GroupedSales, ProfitGauge,
};
use crate::density::{bin_density, DensityConfig, DensityGrid};
use crate::outliers::remove_outliers;

// ── Public types ──────────────────────────────────────────────────────────────

/// Tunables for [`compute_views`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewConfig {
    pub density: DensityConfig,
}

/// Summary figures for the filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewsMetadata {
    /// RFC 3339 timestamp of the computation.
    pub generated_at: String,
    pub records: usize,
    pub total_sales: f64,
    pub total_profit: f64,
    pub compute_time_seconds: f64,
}

/// Every derived view of the dashboard.
#[derive(Debug)]
pub struct DashboardViews {
    pub segment_counts: Vec<CategoryCount>,
    pub ship_mode_counts: Vec<CategoryCount>,
    pub cumulative: Vec<CumulativePoint>,
    pub discount_sales: Vec<(f64, f64)>,
    pub density: DensityGrid,
    /// Sales per (category, sub-category).
    pub category_sales: Vec<GroupedSales>,
    pub category_tree: Vec<CategoryNode>,
    /// Sales per (category, product) with upper outliers removed.
    pub product_sales_trimmed: Result<Vec<GroupedSales>>,
    /// Sales per (state, category).
    pub state_category_sales: Vec<GroupedSales>,
    pub max_profit: Result<ProfitGauge>,
    pub metadata: ViewsMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Compute every view over `filtered`.
pub fn compute_views(filtered: &[Record], config: &ViewConfig) -> DashboardViews {
    let start = std::time::Instant::now();

    // ── Step 1: Distributions ─────────────────────────────────────────────────
    let segment_counts = compute_categorical_counts(filtered, Dimension::Segment);
    let ship_mode_counts = compute_categorical_counts(filtered, Dimension::ShipMode);

    // ── Step 2: Time series and density ───────────────────────────────────────
    let cumulative = compute_cumulative_series(filtered);
    let discount_sales = compute_discount_sales_pairs(filtered);
    let density = bin_density(&discount_sales, config.density);

    // ── Step 3: Grouped sales ─────────────────────────────────────────────────
    let category_sales =
        compute_hierarchical_sales(filtered, &[Dimension::Category, Dimension::SubCategory]);
    let category_tree = build_category_tree(&category_sales);
    let product_sales = compute_hierarchical_sales(
        filtered,
        &[Dimension::Category, Dimension::ProductName],
    );
    let product_sales_trimmed = remove_outliers(&product_sales);
    let state_category_sales =
        compute_hierarchical_sales(filtered, &[Dimension::State, Dimension::Category]);

    // ── Step 4: Profit ────────────────────────────────────────────────────────
    let max_profit = compute_max_profit(filtered).map(ProfitGauge::from_max_profit);

    let metadata = ViewsMetadata {
        generated_at: Local::now().to_rfc3339(),
        records: filtered.len(),
        total_sales: filtered.iter().map(|r| r.sales).sum(),
        total_profit: filtered.iter().map(|r| r.profit).sum(),
        compute_time_seconds: start.elapsed().as_secs_f64(),
    };

    tracing::debug!(
        "Computed views for {} records in {:.3}s",
        metadata.records,
        metadata.compute_time_seconds
    );

    DashboardViews {
        segment_counts,
        ship_mode_counts,
        cumulative,
        discount_sales,
        density,
        category_sales,
        category_tree,
        product_sales_trimmed,
        state_category_sales,
        max_profit,
        metadata,
    }
}

// ── Serialisable report ───────────────────────────────────────────────────────

/// JSON-friendly snapshot of [`DashboardViews`].
///
/// Failed views become `null` and their messages are collected in `errors`,
/// keyed by view name.
#[derive(Debug, Clone, Serialize)]
pub struct ViewsReport<'a> {
    pub metadata: &'a ViewsMetadata,
    pub segment_counts: &'a [CategoryCount],
    pub ship_mode_counts: &'a [CategoryCount],
    pub cumulative: &'a [CumulativePoint],
    pub discount_sales: &'a [(f64, f64)],
    pub density: &'a DensityGrid,
    pub category_sales: &'a [GroupedSales],
    pub category_tree: &'a [CategoryNode],
    pub product_sales_trimmed: Option<&'a [GroupedSales]>,
    pub state_category_sales: &'a [GroupedSales],
    pub max_profit: Option<ProfitGauge>,
    pub errors: BTreeMap<&'static str, String>,
}

impl DashboardViews {
    pub fn report(&self) -> ViewsReport<'_> {
        let mut errors = BTreeMap::new();
        let product_sales_trimmed = match &self.product_sales_trimmed {
            Ok(groups) => Some(groups.as_slice()),
            Err(e) => {
                errors.insert("product_sales_trimmed", e.to_string());
                None
            }
        };
        let max_profit = match &self.max_profit {
            Ok(gauge) => Some(*gauge),
            Err(e) => {
                errors.insert("max_profit", e.to_string());
                None
            }
        };

        ViewsReport {
            metadata: &self.metadata,
            segment_counts: &self.segment_counts,
            ship_mode_counts: &self.ship_mode_counts,
            cumulative: &self.cumulative,
            discount_sales: &self.discount_sales,
            density: &self.density,
            category_sales: &self.category_sales,
            category_tree: &self.category_tree,
            product_sales_trimmed,
            state_category_sales: &self.state_category_sales,
            max_profit,
            errors,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
