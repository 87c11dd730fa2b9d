//! Per-session filter state and the views computed from it.
//!
//! A [`DashboardSession`] owns its [`FilterCriteria`] and recomputes every
//! view from scratch whenever a filter changes. Views that can fail keep
//! their last good value in a [`ViewSlot`] alongside the current error.

use std::sync::Arc;

use dashboard_core::dates::shift_months;
use dashboard_core::error::Result;
use dashboard_core::models::{DateRange, FilterCriteria, Record};
use dashboard_data::aggregator::{GroupedSales, ProfitGauge};
use dashboard_data::filters::apply_filters;
use dashboard_data::views::{compute_views, DashboardViews, ViewConfig};

use crate::dataset::Dataset;

// ── ViewSlot ──────────────────────────────────────────────────────────────────

/// Last valid value of a fallible view plus the error from the latest
/// computation, if it failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSlot<T> {
    value: Option<T>,
    error: Option<String>,
}

impl<T> Default for ViewSlot<T> {
    fn default() -> Self {
        Self {
            value: None,
            error: None,
        }
    }
}

impl<T: Clone> ViewSlot<T> {
    /// Record the outcome of a recomputation. An error leaves the previous
    /// value in place.
    pub fn update(&mut self, outcome: &Result<T>) {
        match outcome {
            Ok(value) => {
                self.value = Some(value.clone());
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}

impl<T> ViewSlot<T> {
    /// Latest valid value, possibly from an earlier filter selection.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Value only when the latest computation succeeded.
    pub fn current(&self) -> Option<&T> {
        if self.error.is_some() {
            None
        } else {
            self.value.as_ref()
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `true` when the held value predates a failed recomputation.
    pub fn is_stale(&self) -> bool {
        self.error.is_some() && self.value.is_some()
    }
}

// ── DashboardSession ──────────────────────────────────────────────────────────

/// One user's view of a shared [`Dataset`].
pub struct DashboardSession {
    dataset: Arc<Dataset>,
    criteria: FilterCriteria,
    config: ViewConfig,
    filtered: Vec<Record>,
    views: DashboardViews,
    product_sales: ViewSlot<Vec<GroupedSales>>,
    max_profit: ViewSlot<ProfitGauge>,
    refreshes: u64,
}

impl DashboardSession {
    /// Start a session with `criteria` and compute the initial views.
    pub fn new(dataset: Arc<Dataset>, criteria: FilterCriteria) -> Self {
        Self::with_config(dataset, criteria, ViewConfig::default())
    }

    /// Start a session with explicit view settings. A city outside the
    /// selected state is reset to all before the first computation.
    pub fn with_config(
        dataset: Arc<Dataset>,
        mut criteria: FilterCriteria,
        config: ViewConfig,
    ) -> Self {
        drop_foreign_city(&dataset, &mut criteria);
        let filtered = apply_filters(dataset.records(), &criteria);
        let views = compute_views(&filtered, &config);
        let mut session = Self {
            dataset,
            criteria,
            config,
            filtered,
            views,
            product_sales: ViewSlot::default(),
            max_profit: ViewSlot::default(),
            refreshes: 1,
        };
        session.update_slots();
        session
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Records matching the current criteria.
    pub fn filtered(&self) -> &[Record] {
        &self.filtered
    }

    /// Views from the latest computation.
    pub fn views(&self) -> &DashboardViews {
        &self.views
    }

    pub fn product_sales(&self) -> &ViewSlot<Vec<GroupedSales>> {
        &self.product_sales
    }

    pub fn max_profit(&self) -> &ViewSlot<ProfitGauge> {
        &self.max_profit
    }

    /// Number of full recomputations so far, including the initial one.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    /// Cities selectable under the current state.
    pub fn city_options(&self) -> Vec<String> {
        self.dataset.cities(self.criteria.state.as_deref())
    }

    // ── Filter mutators ───────────────────────────────────────────────────

    /// Select a state (`None` for all). A city outside the new state is
    /// reset to all.
    pub fn select_state(&mut self, state: Option<String>) {
        self.criteria.state = state;
        drop_foreign_city(&self.dataset, &mut self.criteria);
        self.refresh();
    }

    pub fn select_city(&mut self, city: Option<String>) {
        self.criteria.city = city;
        self.refresh();
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.criteria.date_range = range;
        self.refresh();
    }

    /// Step to the next (or previous) state, wrapping through "All".
    pub fn cycle_state(&mut self, forward: bool) {
        let next = cycle(self.dataset.states(), self.criteria.state.as_deref(), forward);
        self.select_state(next);
    }

    /// Step to the next (or previous) city of the current state, wrapping
    /// through "All".
    pub fn cycle_city(&mut self, forward: bool) {
        let cities = self.city_options();
        let next = cycle(&cities, self.criteria.city.as_deref(), forward);
        self.select_city(next);
    }

    /// Move the start date by `months`.
    pub fn shift_start(&mut self, months: i32) {
        let mut range = self.criteria.date_range;
        range.start = shift_months(range.start, months);
        self.set_date_range(range);
    }

    /// Move the end date by `months`.
    pub fn shift_end(&mut self, months: i32) {
        let mut range = self.criteria.date_range;
        range.end = shift_months(range.end, months);
        self.set_date_range(range);
    }

    /// Back to the full date span with all states and cities.
    pub fn reset_filters(&mut self) {
        self.criteria = self.dataset.default_criteria();
        self.refresh();
    }

    /// Re-filter the dataset and recompute every view.
    pub fn refresh(&mut self) {
        self.filtered = apply_filters(self.dataset.records(), &self.criteria);
        self.views = compute_views(&self.filtered, &self.config);
        self.update_slots();
        self.refreshes += 1;
        tracing::info!(
            records = self.filtered.len(),
            "views refreshed for {} / {} / {}",
            self.criteria.date_range,
            FilterCriteria::selection_label(self.criteria.state.as_deref()),
            FilterCriteria::selection_label(self.criteria.city.as_deref()),
        );
    }

    fn update_slots(&mut self) {
        self.product_sales.update(&self.views.product_sales_trimmed);
        self.max_profit.update(&self.views.max_profit);
    }
}

/// Reset a selected city that does not belong to the selected state.
fn drop_foreign_city(dataset: &Dataset, criteria: &mut FilterCriteria) {
    if let Some(city) = criteria.city.as_deref() {
        if !dataset.cities(criteria.state.as_deref()).iter().any(|c| c == city) {
            tracing::debug!("city {} not in selected state; resetting", city);
            criteria.city = None;
        }
    }
}

/// Option after (or before) `current` in `[All] + options`, wrapping.
fn cycle(options: &[String], current: Option<&str>, forward: bool) -> Option<String> {
    let len = options.len() + 1;
    let position = current
        .and_then(|c| options.iter().position(|o| o == c))
        .map_or(0, |i| i + 1);
    let next = if forward {
        (position + 1) % len
    } else {
        (position + len - 1) % len
    };
    if next == 0 {
        None
    } else {
        Some(options[next - 1].clone())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dashboard_core::error::DashboardError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(on: NaiveDate, state: &str, city: &str, product: &str, sales: f64, profit: f64) -> Record {
        Record::new(
            on, state, city, "Consumer", "Standard Class", "Furniture", "Chairs", product, sales,
            profit, 0.1,
        )
    }

    fn dataset() -> Arc<Dataset> {
        Arc::new(Dataset::from_records(vec![
            rec(date(2016, 1, 10), "Texas", "Houston", "Chair A", 100.0, 10.0),
            rec(date(2016, 2, 10), "Texas", "Dallas", "Chair B", 200.0, 25.0),
            rec(date(2016, 3, 10), "Ohio", "Akron", "Chair C", 50.0, -2.0),
            rec(date(2016, 4, 10), "Ohio", "Columbus", "Chair D", 75.0, 7.0),
        ]))
    }

    fn session() -> DashboardSession {
        let ds = dataset();
        let criteria = ds.default_criteria();
        DashboardSession::new(ds, criteria)
    }

    #[test]
    fn test_new_session_computes_views() {
        let s = session();
        assert_eq!(s.filtered().len(), 4);
        assert_eq!(s.views().metadata.records, 4);
        assert_eq!(s.max_profit().current().unwrap().value, 25.0);
        assert!(s.product_sales().current().is_some());
        assert_eq!(s.refresh_count(), 1);
    }

    #[test]
    fn test_select_state_filters_and_recomputes() {
        let mut s = session();
        s.select_state(Some("Ohio".to_string()));
        assert_eq!(s.filtered().len(), 2);
        assert_eq!(s.max_profit().current().unwrap().value, 7.0);
        assert_eq!(s.city_options(), vec!["Akron", "Columbus"]);
        assert_eq!(s.refresh_count(), 2);
    }

    #[test]
    fn test_state_change_resets_foreign_city() {
        let mut s = session();
        s.select_state(Some("Texas".to_string()));
        s.select_city(Some("Dallas".to_string()));
        assert_eq!(s.filtered().len(), 1);

        s.select_state(Some("Ohio".to_string()));
        assert_eq!(s.criteria().city, None);
        assert_eq!(s.filtered().len(), 2);
    }

    #[test]
    fn test_state_change_keeps_city_of_new_state() {
        let mut s = session();
        s.select_city(Some("Akron".to_string()));
        s.select_state(Some("Ohio".to_string()));
        assert_eq!(s.criteria().city.as_deref(), Some("Akron"));
    }

    #[test]
    fn test_initial_foreign_city_is_reset() {
        let ds = dataset();
        let criteria =
            ds.initial_criteria(None, None, Some("Ohio".to_string()), Some("Houston".to_string()));
        let s = DashboardSession::new(ds, criteria);
        assert_eq!(s.criteria().state.as_deref(), Some("Ohio"));
        assert_eq!(s.criteria().city, None);
        assert_eq!(s.filtered().len(), 2);
        assert!(s.max_profit().error().is_none());
        assert_eq!(s.refresh_count(), 1);
    }

    #[test]
    fn test_initial_city_of_selected_state_is_kept() {
        let ds = dataset();
        let criteria =
            ds.initial_criteria(None, None, Some("Ohio".to_string()), Some("Akron".to_string()));
        let s = DashboardSession::new(ds, criteria);
        assert_eq!(s.criteria().city.as_deref(), Some("Akron"));
        assert_eq!(s.filtered().len(), 1);
    }

    #[test]
    fn test_empty_selection_keeps_stale_values() {
        let mut s = session();
        s.set_date_range(DateRange::new(date(2020, 1, 1), date(2020, 12, 31)));

        assert!(s.filtered().is_empty());
        let slot = s.max_profit();
        assert!(slot.is_stale());
        assert_eq!(slot.value().unwrap().value, 25.0);
        assert!(slot.current().is_none());
        assert!(slot.error().unwrap().contains("max_profit"));
        assert!(s.product_sales().is_stale());

        s.reset_filters();
        assert!(!s.max_profit().is_stale());
        assert_eq!(s.max_profit().error(), None);
    }

    #[test]
    fn test_first_computation_failure_has_no_value() {
        let ds = dataset();
        let criteria = FilterCriteria::new(DateRange::new(date(2030, 1, 1), date(2030, 2, 1)));
        let s = DashboardSession::new(ds, criteria);
        assert!(s.max_profit().value().is_none());
        assert!(s.max_profit().error().is_some());
        assert!(!s.max_profit().is_stale());
    }

    #[test]
    fn test_cycle_state_wraps_through_all() {
        let mut s = session();
        s.cycle_state(true);
        assert_eq!(s.criteria().state.as_deref(), Some("Texas"));
        s.cycle_state(true);
        assert_eq!(s.criteria().state.as_deref(), Some("Ohio"));
        s.cycle_state(true);
        assert_eq!(s.criteria().state, None);
        s.cycle_state(false);
        assert_eq!(s.criteria().state.as_deref(), Some("Ohio"));
    }

    #[test]
    fn test_cycle_city_within_state() {
        let mut s = session();
        s.select_state(Some("Texas".to_string()));
        s.cycle_city(true);
        assert_eq!(s.criteria().city.as_deref(), Some("Houston"));
        s.cycle_city(false);
        assert_eq!(s.criteria().city, None);
        s.cycle_city(false);
        assert_eq!(s.criteria().city.as_deref(), Some("Dallas"));
    }

    #[test]
    fn test_shift_dates() {
        let mut s = session();
        s.shift_start(1);
        assert_eq!(s.criteria().date_range.start, date(2016, 2, 10));
        assert_eq!(s.filtered().len(), 3);
        s.shift_end(-1);
        assert_eq!(s.criteria().date_range.end, date(2016, 3, 10));
        assert_eq!(s.filtered().len(), 2);
    }

    #[test]
    fn test_reset_filters() {
        let mut s = session();
        s.select_state(Some("Ohio".to_string()));
        s.shift_start(2);
        s.reset_filters();
        assert_eq!(s.criteria(), &s.dataset().default_criteria());
        assert_eq!(s.filtered().len(), 4);
    }

    #[test]
    fn test_sessions_are_independent() {
        let ds = dataset();
        let mut a = DashboardSession::new(Arc::clone(&ds), ds.default_criteria());
        let b = DashboardSession::new(Arc::clone(&ds), ds.default_criteria());
        a.select_state(Some("Texas".to_string()));
        assert_eq!(a.filtered().len(), 2);
        assert_eq!(b.filtered().len(), 4);
    }

    #[test]
    fn test_view_slot_update() {
        let mut slot: ViewSlot<u32> = ViewSlot::default();
        slot.update(&Ok(3));
        assert_eq!(slot.current(), Some(&3));
        slot.update(&Err(DashboardError::EmptyInput { operation: "max_profit" }));
        assert_eq!(slot.value(), Some(&3));
        assert!(slot.is_stale());
        slot.update(&Ok(4));
        assert_eq!(slot.current(), Some(&4));
        assert!(!slot.is_stale());
    }
}
