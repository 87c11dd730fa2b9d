//! Aggregations over a filtered set of order lines.
//!
//! Every function takes the already-filtered records and returns plain,
//! serialisable data; nothing here mutates its input.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{Dimension, Record};
use serde::Serialize;
use tracing::debug;

// ── Categorical counts ────────────────────────────────────────────────────────

/// Number of records carrying one value of a categorical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Count records per distinct value of `field`, in first-seen order.
pub fn compute_categorical_counts(records: &[Record], field: Dimension) -> Vec<CategoryCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for record in records {
        let value = field.value_of(record);
        match index.get(value) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(value, counts.len());
                counts.push(CategoryCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    debug!("{} distinct {} values", counts.len(), field);
    counts
}

// ── Cumulative series ─────────────────────────────────────────────────────────

/// One record's position in the running totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativePoint {
    pub order_date: NaiveDate,
    pub sales: f64,
    pub profit: f64,
    /// Sum of `sales` over this point and every earlier one.
    pub cumulative_sales: f64,
    /// Sum of `profit` over this point and every earlier one.
    pub cumulative_profit: f64,
}

/// Sort by order date and accumulate sales and profit.
///
/// Records sharing a date keep their relative input order.
pub fn compute_cumulative_series(records: &[Record]) -> Vec<CumulativePoint> {
    let mut ordered: Vec<&Record> = records.iter().collect();
    ordered.sort_by_key(|r| r.order_date);

    let mut cumulative_sales = 0.0;
    let mut cumulative_profit = 0.0;
    ordered
        .into_iter()
        .map(|r| {
            cumulative_sales += r.sales;
            cumulative_profit += r.profit;
            CumulativePoint {
                order_date: r.order_date,
                sales: r.sales,
                profit: r.profit,
                cumulative_sales,
                cumulative_profit,
            }
        })
        .collect()
}

// ── Discount vs. sales ────────────────────────────────────────────────────────

/// `(discount, sales)` for every record, in input order.
pub fn compute_discount_sales_pairs(records: &[Record]) -> Vec<(f64, f64)> {
    records.iter().map(|r| (r.discount, r.sales)).collect()
}

// ── Grouped sales ─────────────────────────────────────────────────────────────

/// Total sales for one combination of grouping-key values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedSales {
    /// Key values in the order the grouping fields were given.
    pub keys: Vec<String>,
    pub sales: f64,
}

impl GroupedSales {
    pub fn new(keys: Vec<String>, sales: f64) -> Self {
        Self { keys, sales }
    }

    /// Key at `level`, or `""` when the grouping was shallower.
    pub fn key(&self, level: usize) -> &str {
        self.keys.get(level).map(String::as_str).unwrap_or("")
    }
}

/// Sum sales per distinct combination of `group_keys`.
///
/// Groups come back ordered by their key tuple. An empty `group_keys`
/// yields a single group holding the grand total (or nothing for no rows).
pub fn compute_hierarchical_sales(records: &[Record], group_keys: &[Dimension]) -> Vec<GroupedSales> {
    let mut totals: BTreeMap<Vec<String>, f64> = BTreeMap::new();
    for record in records {
        let keys = group_keys
            .iter()
            .map(|d| d.value_of(record).to_string())
            .collect();
        *totals.entry(keys).or_insert(0.0) += record.sales;
    }

    debug!(
        "Grouped {} records into {} groups by {:?}",
        records.len(),
        totals.len(),
        group_keys
    );

    totals
        .into_iter()
        .map(|(keys, sales)| GroupedSales { keys, sales })
        .collect()
}

// ── Category tree ─────────────────────────────────────────────────────────────

/// A top-level group with its second-level children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryNode {
    pub name: String,
    /// Sum of the children's sales.
    pub total: f64,
    pub children: Vec<GroupedSales>,
}

/// Nest a two-level grouping (e.g. category, sub-category) into a tree.
///
/// Parents appear in first-seen order of `grouped`, which for the output of
/// [`compute_hierarchical_sales`] is sorted. Children keep only their
/// second-level key.
pub fn build_category_tree(grouped: &[GroupedSales]) -> Vec<CategoryNode> {
    let mut nodes: Vec<CategoryNode> = Vec::new();
    for group in grouped {
        let parent = group.key(0);
        let child = GroupedSales::new(vec![group.key(1).to_string()], group.sales);
        match nodes.iter_mut().find(|n| n.name == parent) {
            Some(node) => {
                node.total += group.sales;
                node.children.push(child);
            }
            None => nodes.push(CategoryNode {
                name: parent.to_string(),
                total: group.sales,
                children: vec![child],
            }),
        }
    }
    nodes
}

// ── Maximum profit ────────────────────────────────────────────────────────────

/// Largest single-line profit.
///
/// Fails with [`DashboardError::EmptyInput`] when `records` is empty.
pub fn compute_max_profit(records: &[Record]) -> Result<f64> {
    records
        .iter()
        .map(|r| r.profit)
        .reduce(f64::max)
        .ok_or(DashboardError::EmptyInput {
            operation: "max_profit",
        })
}

/// Maximum profit with the gauge axis it is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfitGauge {
    pub value: f64,
    /// Upper end of the gauge axis, twice the value.
    pub axis_max: f64,
}

impl ProfitGauge {
    pub fn from_max_profit(value: f64) -> Self {
        Self {
            value,
            axis_max: 2.0 * value,
        }
    }

    /// Filled fraction of the gauge in `[0, 1]`; zero for a non-positive axis.
    pub fn ratio(&self) -> f64 {
        if self.axis_max <= 0.0 {
            0.0
        } else {
            (self.value / self.axis_max).clamp(0.0, 1.0)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::stats::approx_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[allow(clippy::too_many_arguments)]
    fn rec(
        on: NaiveDate,
        state: &str,
        segment: &str,
        ship_mode: &str,
        category: &str,
        sub_category: &str,
        sales: f64,
        profit: f64,
    ) -> Record {
        Record::new(
            on,
            state,
            "Springfield",
            segment,
            ship_mode,
            category,
            sub_category,
            format!("{sub_category} item"),
            sales,
            profit,
            0.1,
        )
    }

    fn sample() -> Vec<Record> {
        vec![
            rec(date(2023, 3, 1), "Texas", "Consumer", "Standard Class", "Technology", "Phones", 300.0, 30.0),
            rec(date(2023, 1, 1), "Ohio", "Corporate", "First Class", "Furniture", "Chairs", 100.0, -5.0),
            rec(date(2023, 2, 1), "Texas", "Consumer", "Standard Class", "Furniture", "Tables", 200.0, 10.0),
            rec(date(2023, 1, 1), "Ohio", "Home Office", "Standard Class", "Furniture", "Chairs", 50.0, 3.0),
        ]
    }

    #[test]
    fn test_categorical_counts_first_seen_order() {
        let counts = compute_categorical_counts(&sample(), Dimension::Segment);
        assert_eq!(
            counts,
            vec![
                CategoryCount { value: "Consumer".into(), count: 2 },
                CategoryCount { value: "Corporate".into(), count: 1 },
                CategoryCount { value: "Home Office".into(), count: 1 },
            ]
        );

        let ship = compute_categorical_counts(&sample(), Dimension::ShipMode);
        assert_eq!(ship[0].value, "Standard Class");
        assert_eq!(ship[0].count, 3);
        let total: usize = ship.iter().map(|c| c.count).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_categorical_counts_empty() {
        assert!(compute_categorical_counts(&[], Dimension::Segment).is_empty());
    }

    #[test]
    fn test_cumulative_series_reference_example() {
        let records = vec![
            rec(date(2023, 1, 1), "A", "S", "M", "C", "X", 100.0, 10.0),
            rec(date(2023, 1, 2), "A", "S", "M", "C", "X", 50.0, -5.0),
        ];
        let series = compute_cumulative_series(&records);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].cumulative_sales, 100.0);
        assert_eq!(series[0].cumulative_profit, 10.0);
        assert_eq!(series[1].cumulative_sales, 150.0);
        assert_eq!(series[1].cumulative_profit, 5.0);
    }

    #[test]
    fn test_cumulative_series_sorted_and_stable() {
        let series = compute_cumulative_series(&sample());
        assert_eq!(series.len(), 4);
        assert!(series.windows(2).all(|w| w[0].order_date <= w[1].order_date));
        // Both 2023-01-01 rows keep input order: 100 before 50.
        assert_eq!(series[0].sales, 100.0);
        assert_eq!(series[1].sales, 50.0);

        let last = series.last().unwrap();
        assert!(approx_eq(last.cumulative_sales, 650.0));
        assert!(approx_eq(last.cumulative_profit, 38.0));
    }

    #[test]
    fn test_cumulative_series_empty() {
        assert!(compute_cumulative_series(&[]).is_empty());
    }

    #[test]
    fn test_discount_sales_pairs() {
        let pairs = compute_discount_sales_pairs(&sample());
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0], (0.1, 300.0));
    }

    #[test]
    fn test_hierarchical_sales_sorted_by_key_tuple() {
        let grouped = compute_hierarchical_sales(
            &sample(),
            &[Dimension::Category, Dimension::SubCategory],
        );
        let keys: Vec<Vec<String>> = grouped.iter().map(|g| g.keys.clone()).collect();
        assert_eq!(
            keys,
            vec![
                vec!["Furniture".to_string(), "Chairs".to_string()],
                vec!["Furniture".to_string(), "Tables".to_string()],
                vec!["Technology".to_string(), "Phones".to_string()],
            ]
        );
        assert_eq!(grouped[0].sales, 150.0);
    }

    #[test]
    fn test_hierarchical_sales_conserves_total() {
        let records = sample();
        let input_total: f64 = records.iter().map(|r| r.sales).sum();
        for keys in [
            vec![Dimension::State, Dimension::Category],
            vec![Dimension::Category, Dimension::ProductName],
            vec![Dimension::Segment],
        ] {
            let grouped = compute_hierarchical_sales(&records, &keys);
            let group_total: f64 = grouped.iter().map(|g| g.sales).sum();
            assert!(approx_eq(group_total, input_total), "keys {keys:?}");
        }
    }

    #[test]
    fn test_hierarchical_sales_no_keys_is_grand_total() {
        let grouped = compute_hierarchical_sales(&sample(), &[]);
        assert_eq!(grouped.len(), 1);
        assert!(grouped[0].keys.is_empty());
        assert!(approx_eq(grouped[0].sales, 650.0));
        assert!(compute_hierarchical_sales(&[], &[]).is_empty());
    }

    #[test]
    fn test_build_category_tree() {
        let grouped = compute_hierarchical_sales(
            &sample(),
            &[Dimension::Category, Dimension::SubCategory],
        );
        let tree = build_category_tree(&grouped);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "Furniture");
        assert_eq!(tree[0].total, 350.0);
        assert_eq!(tree[0].children.len(), 2);
        assert_eq!(tree[0].children[1].key(0), "Tables");
        assert_eq!(tree[1].name, "Technology");
        assert_eq!(tree[1].total, 300.0);
    }

    #[test]
    fn test_max_profit() {
        let records: Vec<Record> = [-5.0, 10.0, 3.0]
            .iter()
            .map(|&p| rec(date(2023, 1, 1), "A", "S", "M", "C", "X", 1.0, p))
            .collect();
        assert_eq!(compute_max_profit(&records).unwrap(), 10.0);
    }

    #[test]
    fn test_max_profit_empty_is_error() {
        let err = compute_max_profit(&[]).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::EmptyInput {
                operation: "max_profit"
            }
        ));
    }

    #[test]
    fn test_profit_gauge() {
        let gauge = ProfitGauge::from_max_profit(250.0);
        assert_eq!(gauge.axis_max, 500.0);
        assert!((gauge.ratio() - 0.5).abs() < 1e-12);

        let loss = ProfitGauge::from_max_profit(-4.0);
        assert_eq!(loss.ratio(), 0.0);
    }
}
