use dashboard_core::formatting::{format_currency, format_number};
use dashboard_core::models::FilterCriteria;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Key bindings listed at the bottom of the sidebar.
pub const KEY_HELP: &[(&str, &str)] = &[
    ("s / S", "next / prev state"),
    ("c / C", "next / prev city"),
    ("[ / ]", "start -/+ 1 month"),
    ("{ / }", "end -/+ 1 month"),
    ("r", "reset filters"),
    ("Tab 1-3", "switch page"),
    ("q", "quit"),
];

/// Current filter selection and selection totals.
pub struct FilterSidebar<'a> {
    pub criteria: &'a FilterCriteria,
    pub records: usize,
    pub total_sales: f64,
    pub total_profit: f64,
    pub theme: &'a Theme,
}

impl<'a> FilterSidebar<'a> {
    pub fn new(
        criteria: &'a FilterCriteria,
        records: usize,
        total_sales: f64,
        total_profit: f64,
        theme: &'a Theme,
    ) -> Self {
        Self {
            criteria,
            records,
            total_sales,
            total_profit,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let t = self.theme;
        let range = &self.criteria.date_range;
        let mut lines = vec![
            Line::from(Span::styled("Filters", t.title)),
            Line::from(""),
            Line::from(Span::styled("Start date", t.label)),
            Line::from(Span::styled(format!("  {}", range.start), t.value)),
            Line::from(Span::styled("End date", t.label)),
            Line::from(Span::styled(format!("  {}", range.end), t.value)),
        ];
        if range.is_inverted() {
            lines.push(Line::from(Span::styled("  start is after end", t.warning)));
        }
        lines.extend([
            Line::from(Span::styled("State", t.label)),
            Line::from(Span::styled(
                format!(
                    "  {}",
                    FilterCriteria::selection_label(self.criteria.state.as_deref())
                ),
                t.value,
            )),
            Line::from(Span::styled("City", t.label)),
            Line::from(Span::styled(
                format!(
                    "  {}",
                    FilterCriteria::selection_label(self.criteria.city.as_deref())
                ),
                t.value,
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Orders  ", t.label),
                Span::styled(format_number(self.records as f64, 0), t.value),
            ]),
            Line::from(vec![
                Span::styled("Sales   ", t.label),
                Span::styled(format_currency(self.total_sales), t.value),
            ]),
            Line::from(vec![
                Span::styled("Profit  ", t.label),
                Span::styled(
                    format_currency(self.total_profit),
                    if self.total_profit < 0.0 { t.error } else { t.value },
                ),
            ]),
            Line::from(""),
        ]);
        lines.extend(KEY_HELP.iter().map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{:<8}", key), t.key_hint),
                Span::styled(*action, t.dim),
            ])
        }));
        lines
    }
}
