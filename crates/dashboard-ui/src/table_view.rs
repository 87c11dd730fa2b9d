//! Sales by state and category as a table with a totals row.
//!
//! Stands in for a stacked bar chart: one row per state, one column per
//! category, plus a per-state total and a grand-total row at the bottom.

use std::collections::BTreeMap;

use dashboard_core::formatting::format_currency;
use dashboard_data::aggregator::GroupedSales;
use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::charts::render_no_data;
use crate::themes::Theme;

/// Pivot of `(state, category) → sales`.
#[derive(Debug, Clone, PartialEq)]
pub struct StateCategoryTable {
    /// Column headings in sorted order.
    pub categories: Vec<String>,
    /// `(state, sales per category column)` in sorted state order.
    pub rows: Vec<(String, Vec<f64>)>,
}

impl StateCategoryTable {
    /// Build the pivot from `(state, category)` groups.
    pub fn from_groups(groups: &[GroupedSales]) -> Self {
        let mut categories: Vec<String> = groups.iter().map(|g| g.key(1).to_string()).collect();
        categories.sort();
        categories.dedup();

        let mut by_state: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for g in groups {
            let row = by_state
                .entry(g.key(0))
                .or_insert_with(|| vec![0.0; categories.len()]);
            if let Ok(col) = categories.binary_search_by(|c| c.as_str().cmp(g.key(1))) {
                row[col] += g.sales;
            }
        }

        Self {
            categories,
            rows: by_state
                .into_iter()
                .map(|(state, values)| (state.to_string(), values))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of each category column.
    pub fn column_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.categories.len()];
        for (_, values) in &self.rows {
            for (total, v) in totals.iter_mut().zip(values) {
                *total += v;
            }
        }
        totals
    }

    pub fn grand_total(&self) -> f64 {
        self.column_totals().iter().sum()
    }
}

/// Render the state/category table into `area`.
pub fn render_state_category_table(
    frame: &mut Frame,
    area: Rect,
    table: &StateCategoryTable,
    theme: &Theme,
) {
    let title = "Sales by State and Category";
    if table.is_empty() {
        render_no_data(frame, area, title, None, theme);
        return;
    }

    let header_cells = std::iter::once("State".to_string())
        .chain(table.categories.iter().cloned())
        .chain(std::iter::once("Total".to_string()))
        .map(|h| Cell::from(h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let data_rows: Vec<Row> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, (state, values))| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let total: f64 = values.iter().sum();
            let cells = std::iter::once(Cell::from(state.clone()))
                .chain(values.iter().map(|v| Cell::from(format_currency(*v))))
                .chain(std::iter::once(Cell::from(format_currency(total))));
            Row::new(cells).style(style)
        })
        .collect();

    let total_cells = std::iter::once(Cell::from("TOTAL"))
        .chain(
            table
                .column_totals()
                .into_iter()
                .map(|v| Cell::from(format_currency(v))),
        )
        .chain(std::iter::once(Cell::from(format_currency(table.grand_total()))));
    let total_row = Row::new(total_cells).style(theme.table_total);

    let mut all_rows = data_rows;
    all_rows.push(total_row);

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(16))
        .chain(table.categories.iter().map(|_| Constraint::Length(16)))
        .chain(std::iter::once(Constraint::Length(16)))
        .collect();

    let widget = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(Span::styled(format!(" {} ", title), theme.title)),
        )
        .style(theme.text);

    frame.render_widget(widget, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
