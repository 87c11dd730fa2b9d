use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Label used by selection widgets and the CLI for "no restriction".
pub const ALL_LABEL: &str = "All";

/// A single order line read from the sales dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Calendar date the order was placed.
    pub order_date: NaiveDate,
    /// Year component of `order_date`, derived once at load time.
    pub year: i32,
    pub state: String,
    pub city: String,
    /// Customer segment, e.g. `"Consumer"` or `"Corporate"`.
    pub segment: String,
    /// Shipping class, e.g. `"Standard Class"`.
    pub ship_mode: String,
    pub category: String,
    pub sub_category: String,
    pub product_name: String,
    /// Revenue for the line (never negative).
    pub sales: f64,
    /// Profit for the line; negative for loss-making orders.
    pub profit: f64,
    /// Fractional discount in `[0, 1]`.
    pub discount: f64,
}

impl Record {
    /// Build a record, deriving [`Record::year`] from the order date.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order_date: NaiveDate,
        state: impl Into<String>,
        city: impl Into<String>,
        segment: impl Into<String>,
        ship_mode: impl Into<String>,
        category: impl Into<String>,
        sub_category: impl Into<String>,
        product_name: impl Into<String>,
        sales: f64,
        profit: f64,
        discount: f64,
    ) -> Self {
        Self {
            order_date,
            year: order_date.year(),
            state: state.into(),
            city: city.into(),
            segment: segment.into(),
            ship_mode: ship_mode.into(),
            category: category.into(),
            sub_category: sub_category.into(),
            product_name: product_name.into(),
            sales,
            profit,
            discount,
        }
    }
}

// ── Dimension ─────────────────────────────────────────────────────────────────

/// A categorical column that records can be grouped or counted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    State,
    City,
    Segment,
    ShipMode,
    Category,
    SubCategory,
    ProductName,
}

impl Dimension {
    /// Borrow the value of this dimension from `record`.
    pub fn value_of<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            Dimension::State => &record.state,
            Dimension::City => &record.city,
            Dimension::Segment => &record.segment,
            Dimension::ShipMode => &record.ship_mode,
            Dimension::Category => &record.category,
            Dimension::SubCategory => &record.sub_category,
            Dimension::ProductName => &record.product_name,
        }
    }

    /// Column header used for this dimension in the source CSV.
    pub fn column_name(&self) -> &'static str {
        match self {
            Dimension::State => "State",
            Dimension::City => "City",
            Dimension::Segment => "Segment",
            Dimension::ShipMode => "Ship Mode",
            Dimension::Category => "Category",
            Dimension::SubCategory => "Sub-Category",
            Dimension::ProductName => "Product Name",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_name())
    }
}

// ── DateRange ─────────────────────────────────────────────────────────────────

/// Inclusive calendar-date range.
///
/// A range whose `start` is after its `end` is valid and contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A range admitting every representable date.
    pub fn unbounded() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }

    /// `true` when `date` lies within `[start, end]`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// `true` when `start > end`, i.e. the range can never match.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

// ── FilterCriteria ────────────────────────────────────────────────────────────

/// User-selected filters applied to the dataset before aggregation.
///
/// `None` for `state` or `city` means "All" (no restriction). The city is
/// only meaningful relative to the selected state; the session keeps the two
/// consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub date_range: DateRange,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl FilterCriteria {
    /// Criteria restricted only by `date_range`.
    pub fn new(date_range: DateRange) -> Self {
        Self {
            date_range,
            state: None,
            city: None,
        }
    }

    pub fn with_state(mut self, state: Option<String>) -> Self {
        self.state = state;
        self
    }

    pub fn with_city(mut self, city: Option<String>) -> Self {
        self.city = city;
        self
    }

    /// `true` when `record` satisfies the date, state, and city predicates.
    pub fn matches(&self, record: &Record) -> bool {
        self.date_range.contains(record.order_date)
            && self.state.as_deref().map_or(true, |s| record.state == s)
            && self.city.as_deref().map_or(true, |c| record.city == c)
    }

    /// Convert a selection label into an optional filter value.
    ///
    /// `"All"` and blank labels map to `None`.
    pub fn selection_from_label(label: &str) -> Option<String> {
        let trimmed = label.trim();
        if trimmed.is_empty() || trimmed == ALL_LABEL {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Display label for an optional filter value (`"All"` when unset).
    pub fn selection_label(selection: Option<&str>) -> &str {
        selection.unwrap_or(ALL_LABEL)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(state: &str, city: &str, on: NaiveDate) -> Record {
        Record::new(
            on,
            state,
            city,
            "Consumer",
            "Second Class",
            "Furniture",
            "Chairs",
            "Task Chair",
            120.0,
            14.5,
            0.2,
        )
    }

    #[test]
    fn test_record_new_derives_year() {
        let r = record("Texas", "Houston", date(2017, 11, 8));
        assert_eq!(r.year, 2017);
    }

    #[test]
    fn test_dimension_value_of() {
        let r = record("Texas", "Houston", date(2017, 11, 8));
        assert_eq!(Dimension::State.value_of(&r), "Texas");
        assert_eq!(Dimension::City.value_of(&r), "Houston");
        assert_eq!(Dimension::ShipMode.value_of(&r), "Second Class");
        assert_eq!(Dimension::SubCategory.value_of(&r), "Chairs");
        assert_eq!(Dimension::ProductName.value_of(&r), "Task Chair");
    }

    #[test]
    fn test_dimension_column_names() {
        assert_eq!(Dimension::ShipMode.column_name(), "Ship Mode");
        assert_eq!(Dimension::SubCategory.to_string(), "Sub-Category");
    }

    #[test]
    fn test_date_range_inclusive_bounds() {
        let range = DateRange::new(date(2023, 1, 1), date(2023, 1, 31));
        assert!(range.contains(date(2023, 1, 1)));
        assert!(range.contains(date(2023, 1, 31)));
        assert!(!range.contains(date(2022, 12, 31)));
        assert!(!range.contains(date(2023, 2, 1)));
    }

    #[test]
    fn test_date_range_inverted_contains_nothing() {
        let range = DateRange::new(date(2023, 2, 1), date(2023, 1, 1));
        assert!(range.is_inverted());
        assert!(!range.contains(date(2023, 1, 15)));
    }

    #[test]
    fn test_criteria_matches_all_predicates() {
        let criteria = FilterCriteria::new(DateRange::new(date(2023, 1, 1), date(2023, 12, 31)))
            .with_state(Some("Texas".to_string()))
            .with_city(Some("Houston".to_string()));

        assert!(criteria.matches(&record("Texas", "Houston", date(2023, 6, 1))));
        assert!(!criteria.matches(&record("Texas", "Dallas", date(2023, 6, 1))));
        assert!(!criteria.matches(&record("Ohio", "Houston", date(2023, 6, 1))));
        assert!(!criteria.matches(&record("Texas", "Houston", date(2024, 1, 1))));
    }

    #[test]
    fn test_criteria_unset_state_and_city_match_everything_in_range() {
        let criteria = FilterCriteria::new(DateRange::unbounded());
        assert!(criteria.matches(&record("Ohio", "Akron", date(2015, 3, 3))));
    }

    #[test]
    fn test_selection_from_label() {
        assert_eq!(FilterCriteria::selection_from_label("All"), None);
        assert_eq!(FilterCriteria::selection_from_label("  "), None);
        assert_eq!(
            FilterCriteria::selection_from_label(" Texas "),
            Some("Texas".to_string())
        );
    }

    #[test]
    fn test_selection_label() {
        assert_eq!(FilterCriteria::selection_label(None), "All");
        assert_eq!(FilterCriteria::selection_label(Some("Utah")), "Utah");
    }
}
