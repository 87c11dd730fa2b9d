//! Upper-fence outlier trimming for grouped sales.

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::stats::IqrBounds;
use tracing::debug;

use crate::aggregator::GroupedSales;

/// Quartiles and upper fence of the group totals in `grouped`.
pub fn iqr_bounds(grouped: &[GroupedSales]) -> Result<IqrBounds> {
    let values: Vec<f64> = grouped.iter().map(|g| g.sales).collect();
    IqrBounds::from_values(&values)
}

/// Drop groups whose sales exceed `Q3 + 1.5 × IQR`.
///
/// There is no lower fence. Survivors keep their input order, and a single
/// group always survives. Fails with [`DashboardError::EmptyInput`] when
/// `grouped` is empty.
pub fn remove_outliers(grouped: &[GroupedSales]) -> Result<Vec<GroupedSales>> {
    let bounds = iqr_bounds(grouped).map_err(|_| DashboardError::EmptyInput {
        operation: "remove_outliers",
    })?;

    let kept: Vec<GroupedSales> = grouped
        .iter()
        .filter(|g| bounds.admits(g.sales))
        .cloned()
        .collect();

    debug!(
        "Outlier trim kept {} of {} groups (upper bound {:.2})",
        kept.len(),
        grouped.len(),
        bounds.upper_bound
    );
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(values: &[f64]) -> Vec<GroupedSales> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| GroupedSales::new(vec!["Office Supplies".into(), format!("p{i}")], v))
            .collect()
    }

    fn sales(groups: &[GroupedSales]) -> Vec<f64> {
        groups.iter().map(|g| g.sales).collect()
    }

    #[test]
    fn test_remove_outliers_reference_example() {
        let input = groups(&[10.0, 20.0, 30.0, 40.0, 1000.0]);
        let bounds = iqr_bounds(&input).unwrap();
        assert!((bounds.upper_bound - 70.0).abs() < 1e-9);

        let kept = remove_outliers(&input).unwrap();
        assert_eq!(sales(&kept), vec![10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_remove_outliers_preserves_input_order() {
        let input = groups(&[40.0, 1000.0, 10.0, 30.0, 20.0]);
        let kept = remove_outliers(&input).unwrap();
        assert_eq!(sales(&kept), vec![40.0, 10.0, 30.0, 20.0]);
        assert_eq!(kept[0].keys[1], "p0");
    }

    #[test]
    fn test_remove_outliers_never_grows() {
        for values in [
            vec![1.0, 2.0],
            vec![5.0, 5.0, 5.0],
            vec![1.0, 1.0, 1.0, 500.0, 2.0, 3.0],
        ] {
            let input = groups(&values);
            let kept = remove_outliers(&input).unwrap();
            assert!(kept.len() <= input.len());
            assert!(!kept.is_empty());
        }
    }

    #[test]
    fn test_remove_outliers_single_group_survives() {
        let input = groups(&[123.45]);
        let kept = remove_outliers(&input).unwrap();
        assert_eq!(kept, input);
    }

    #[test]
    fn test_remove_outliers_empty_is_error() {
        let err = remove_outliers(&[]).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::EmptyInput {
                operation: "remove_outliers"
            }
        ));
    }

    #[test]
    fn test_remove_outliers_keeps_low_values() {
        // No lower fence: the tiny value stays.
        let kept = remove_outliers(&groups(&[0.01, 100.0, 101.0, 102.0, 103.0])).unwrap();
        assert_eq!(kept.len(), 5);
    }
}
