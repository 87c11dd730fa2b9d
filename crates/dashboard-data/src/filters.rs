//! Record filtering and the option lists offered by the filter controls.

use std::collections::HashSet;

use chrono::NaiveDate;
use dashboard_core::models::{DateRange, FilterCriteria, Record};
use tracing::debug;

/// Keep the records matching every predicate in `criteria`.
///
/// The result is a stable subsequence of `records`; an inverted date range
/// simply yields nothing.
pub fn apply_filters(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    let filtered: Vec<Record> = records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect();

    debug!(
        "Filtered {} of {} records (range {}, state {}, city {})",
        filtered.len(),
        records.len(),
        criteria.date_range,
        FilterCriteria::selection_label(criteria.state.as_deref()),
        FilterCriteria::selection_label(criteria.city.as_deref()),
    );
    filtered
}

/// Distinct states in first-seen order.
pub fn state_options(records: &[Record]) -> Vec<String> {
    distinct(records.iter().map(|r| r.state.as_str()))
}

/// Distinct cities in first-seen order, restricted to `state` when given.
pub fn city_options(records: &[Record], state: Option<&str>) -> Vec<String> {
    distinct(
        records
            .iter()
            .filter(|r| state.map_or(true, |s| r.state == s))
            .map(|r| r.city.as_str()),
    )
}

/// Earliest and latest order date, or `None` for an empty slice.
pub fn date_bounds(records: &[Record]) -> Option<DateRange> {
    let mut dates = records.iter().map(|r| r.order_date);
    let first = dates.next()?;
    let (min, max) = dates.fold((first, first), |(lo, hi): (NaiveDate, NaiveDate), d| {
        (lo.min(d), hi.max(d))
    });
    Some(DateRange::new(min, max))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(on: NaiveDate, state: &str, city: &str, sales: f64) -> Record {
        Record::new(
            on, state, city, "Consumer", "First Class", "Technology", "Phones", "Handset", sales,
            1.0, 0.0,
        )
    }

    fn sample() -> Vec<Record> {
        vec![
            rec(date(2023, 1, 5), "Texas", "Houston", 10.0),
            rec(date(2023, 2, 5), "Ohio", "Akron", 20.0),
            rec(date(2023, 3, 5), "Texas", "Dallas", 30.0),
            rec(date(2023, 4, 5), "Texas", "Houston", 40.0),
            rec(date(2024, 1, 5), "Ohio", "Columbus", 50.0),
        ]
    }

    #[test]
    fn test_apply_filters_state_and_range() {
        let records = sample();
        let criteria = FilterCriteria::new(DateRange::new(date(2023, 1, 1), date(2023, 12, 31)))
            .with_state(Some("Texas".to_string()));

        let filtered = apply_filters(&records, &criteria);
        let sales: Vec<f64> = filtered.iter().map(|r| r.sales).collect();
        assert_eq!(sales, vec![10.0, 30.0, 40.0]);
        assert!(filtered.iter().all(|r| criteria.matches(r)));
    }

    #[test]
    fn test_apply_filters_is_subset_and_idempotent() {
        let records = sample();
        let criteria = FilterCriteria::new(DateRange::new(date(2023, 2, 1), date(2024, 1, 5)))
            .with_city(Some("Columbus".to_string()));

        let once = apply_filters(&records, &criteria);
        let twice = apply_filters(&once, &criteria);
        assert_eq!(once, twice);
        assert!(once.len() <= records.len());
        assert!(once.iter().all(|r| records.contains(r)));
        assert_eq!(once.len(), 1);
    }

    // ── Properties over arbitrary records and criteria ──────────────────────

    const STATES: [&str; 3] = ["Texas", "Ohio", "Utah"];
    const CITIES: [&str; 4] = ["Houston", "Akron", "Provo", "Dallas"];

    fn day(offset: i64) -> NaiveDate {
        date(2015, 1, 1) + chrono::Duration::days(offset)
    }

    fn arb_record() -> impl Strategy<Value = Record> {
        (0i64..730, 0usize..STATES.len(), 0usize..CITIES.len(), 0.0f64..1000.0)
            .prop_map(|(offset, s, c, sales)| rec(day(offset), STATES[s], CITIES[c], sales))
    }

    fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
        (
            0i64..730,
            0i64..730,
            proptest::option::of(0usize..STATES.len()),
            proptest::option::of(0usize..CITIES.len()),
        )
            .prop_map(|(start, end, s, c)| {
                FilterCriteria::new(DateRange::new(day(start), day(end)))
                    .with_state(s.map(|i| STATES[i].to_string()))
                    .with_city(c.map(|i| CITIES[i].to_string()))
            })
    }

    proptest! {
        #[test]
        fn prop_apply_filters_is_stable_matching_subset(
            records in proptest::collection::vec(arb_record(), 0..40),
            criteria in arb_criteria(),
        ) {
            let filtered = apply_filters(&records, &criteria);

            prop_assert!(filtered.iter().all(|r| criteria.matches(r)));
            prop_assert_eq!(
                filtered.len(),
                records.iter().filter(|r| criteria.matches(r)).count()
            );
            // Every kept record appears in the input, in input order.
            let mut remaining = records.iter();
            prop_assert!(filtered.iter().all(|f| remaining.any(|r| r == f)));
        }

        #[test]
        fn prop_apply_filters_is_idempotent(
            records in proptest::collection::vec(arb_record(), 0..40),
            criteria in arb_criteria(),
        ) {
            let once = apply_filters(&records, &criteria);
            let twice = apply_filters(&once, &criteria);
            prop_assert_eq!(twice, once);
        }
    }

    #[test]
    fn test_apply_filters_inverted_range_is_empty() {
        let criteria = FilterCriteria::new(DateRange::new(date(2024, 1, 1), date(2023, 1, 1)));
        assert!(apply_filters(&sample(), &criteria).is_empty());
    }

    #[test]
    fn test_apply_filters_no_match_is_empty_not_error() {
        let criteria = FilterCriteria::new(DateRange::unbounded())
            .with_state(Some("Texas".to_string()))
            .with_city(Some("Akron".to_string()));
        assert!(apply_filters(&sample(), &criteria).is_empty());
    }

    #[test]
    fn test_state_options_first_seen_order() {
        assert_eq!(state_options(&sample()), vec!["Texas", "Ohio"]);
    }

    #[test]
    fn test_city_options_restricted_to_state() {
        let records = sample();
        assert_eq!(
            city_options(&records, None),
            vec!["Houston", "Akron", "Dallas", "Columbus"]
        );
        assert_eq!(city_options(&records, Some("Ohio")), vec!["Akron", "Columbus"]);
        assert!(city_options(&records, Some("Utah")).is_empty());
    }

    #[test]
    fn test_date_bounds() {
        let bounds = date_bounds(&sample()).unwrap();
        assert_eq!(bounds.start, date(2023, 1, 5));
        assert_eq!(bounds.end, date(2024, 1, 5));
        assert_eq!(date_bounds(&[]), None);
    }
}
