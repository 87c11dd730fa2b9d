//! Chart panels built on ratatui's chart widgets.
//!
//! Each `render_*` function draws one bordered panel into `area`. Panels
//! whose data is missing draw [`render_no_data`] instead.

use std::collections::HashMap;

use chrono::NaiveDate;
use dashboard_core::formatting::{format_compact, format_currency, format_percent, percentage};
use dashboard_data::aggregator::{CategoryNode, CumulativePoint, GroupedSales, ProfitGauge};
use dashboard_runtime::ViewSlot;
use ratatui::{
    layout::{Direction, Rect},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset as ChartSeries, Gauge,
        GraphType, Paragraph, Wrap,
    },
    Frame,
};

use crate::components::fit_width;
use crate::themes::Theme;

/// Message shown in place of a chart with nothing to plot.
pub const NO_DATA_MESSAGE: &str = "No data for the current filters";

/// Marker on a panel still showing values from an earlier selection.
pub const STALE_MARKER: &str = "stale";

fn panel<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled(format!(" {} ", title), theme.title))
}

/// Title flagging a panel that draws the last valid values.
fn stale_notice<'a>(theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!(" {} ({}) ", NO_DATA_MESSAGE, STALE_MARKER),
        theme.warning,
    ))
    .right_aligned()
}

/// Panel block, with the stale notice when `stale`.
fn slot_panel<'a>(title: &str, stale: bool, theme: &Theme) -> Block<'a> {
    let block = panel(title, theme);
    if stale {
        block.title_top(stale_notice(theme))
    } else {
        block
    }
}

// ── No data ───────────────────────────────────────────────────────────────────

/// Placeholder panel, optionally naming why the view is empty.
pub fn render_no_data(frame: &mut Frame, area: Rect, title: &str, detail: Option<&str>, theme: &Theme) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(NO_DATA_MESSAGE, theme.warning)),
    ];
    if let Some(detail) = detail {
        lines.push(Line::from(Span::styled(detail.to_string(), theme.dim)));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel(title, theme)),
        area,
    );
}

// ── Cumulative sales / profit ─────────────────────────────────────────────────

/// Running sales and profit against order date.
pub fn render_cumulative_chart(
    frame: &mut Frame,
    area: Rect,
    series: &[CumulativePoint],
    theme: &Theme,
) {
    let title = "Cumulative Sales and Profit";
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        render_no_data(frame, area, title, None, theme);
        return;
    };

    let origin = first.order_date;
    let x = |d: NaiveDate| (d - origin).num_days() as f64;
    let sales: Vec<(f64, f64)> = series
        .iter()
        .map(|p| (x(p.order_date), p.cumulative_sales))
        .collect();
    let profit: Vec<(f64, f64)> = series
        .iter()
        .map(|p| (x(p.order_date), p.cumulative_profit))
        .collect();

    let span = x(last.order_date).max(1.0);
    let (y_min, y_max) = sales
        .iter()
        .chain(profit.iter())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    let y_max = if y_max > y_min { y_max } else { y_min + 1.0 };

    let mid = origin + chrono::Duration::days((span / 2.0) as i64);
    let x_labels = vec![
        Span::styled(origin.to_string(), theme.label),
        Span::styled(mid.to_string(), theme.label),
        Span::styled(last.order_date.to_string(), theme.label),
    ];
    let y_labels = vec![
        Span::styled(format_compact(y_min), theme.label),
        Span::styled(format_compact((y_min + y_max) / 2.0), theme.label),
        Span::styled(format_compact(y_max), theme.label),
    ];

    let datasets = vec![
        ChartSeries::default()
            .name("Sales")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.series_sales)
            .data(&sales),
        ChartSeries::default()
            .name("Profit")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.series_profit)
            .data(&profit),
    ];

    let chart = Chart::new(datasets)
        .block(panel(title, theme))
        .x_axis(
            Axis::default()
                .style(theme.dim)
                .bounds([0.0, span])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(theme.dim)
                .bounds([y_min, y_max])
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

// ── Maximum profit gauge ──────────────────────────────────────────────────────

/// Maximum profit on a `0..2×max` axis.
///
/// A slot whose latest computation failed keeps drawing its last valid
/// gauge, flagged as stale; with no valid value at all the panel shows the
/// no-data message.
pub fn render_profit_gauge(
    frame: &mut Frame,
    area: Rect,
    slot: &ViewSlot<ProfitGauge>,
    theme: &Theme,
) {
    let title = "Maximum Profit";
    let Some(gauge) = slot.value() else {
        render_no_data(frame, area, title, slot.error(), theme);
        return;
    };

    let widget = Gauge::default()
        .block(slot_panel(title, slot.is_stale(), theme))
        .gauge_style(if slot.is_stale() { theme.dim } else { theme.gauge })
        .ratio(gauge.ratio())
        .label(format!(
            "{} of {}",
            format_currency(gauge.value),
            format_currency(gauge.axis_max)
        ));
    frame.render_widget(widget, area);
}

// ── Product sales ─────────────────────────────────────────────────────────────

/// Products to draw: the `limit` best sellers, largest first.
pub fn top_products(groups: &[GroupedSales], limit: usize) -> Vec<&GroupedSales> {
    let mut ranked: Vec<&GroupedSales> = groups.iter().collect();
    ranked.sort_by(|a, b| b.sales.total_cmp(&a.sales));
    ranked.truncate(limit);
    ranked
}

/// Horizontal bars of trimmed product sales coloured by category. Stale
/// values are drawn with the stale notice, as for the profit gauge.
pub fn render_product_bars(
    frame: &mut Frame,
    area: Rect,
    slot: &ViewSlot<Vec<GroupedSales>>,
    limit: usize,
    theme: &Theme,
) {
    let title = "Product Sales (outliers removed)";
    let groups = match slot.value() {
        Some(g) if !g.is_empty() => g,
        _ => {
            render_no_data(frame, area, title, slot.error(), theme);
            return;
        }
    };

    // Category colours follow first appearance in the full grouping.
    let mut category_index: HashMap<&str, usize> = HashMap::new();
    for g in groups {
        let next = category_index.len();
        category_index.entry(g.key(0)).or_insert(next);
    }

    let label_width = (area.width as usize / 3).clamp(8, 32);
    let bars: Vec<Bar> = top_products(groups, limit)
        .into_iter()
        .map(|g| {
            let style = theme.palette_style(category_index.get(g.key(0)).copied().unwrap_or(0));
            Bar::default()
                .value(g.sales.max(0.0).round() as u64)
                .label(Line::from(fit_width(g.key(1), label_width)))
                .text_value(format_compact(g.sales))
                .style(style)
                .value_style(theme.value)
        })
        .collect();

    let legend: Vec<Span> = {
        let mut entries: Vec<(&str, usize)> = category_index.into_iter().collect();
        entries.sort_by_key(|&(_, i)| i);
        entries
            .into_iter()
            .flat_map(|(name, i)| {
                [
                    Span::styled("■ ", theme.palette_style(i)),
                    Span::styled(format!("{}  ", name), theme.label),
                ]
            })
            .collect()
    };

    let chart = BarChart::default()
        .block(slot_panel(title, slot.is_stale(), theme).title_bottom(Line::from(legend)))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

// ── Category breakdown ────────────────────────────────────────────────────────

/// Category totals with their sub-categories, each with its share of sales.
pub fn category_breakdown_lines<'a>(tree: &[CategoryNode], theme: &Theme) -> Vec<Line<'a>> {
    let grand_total: f64 = tree.iter().map(|n| n.total).sum();
    let mut lines = Vec::new();
    for (i, node) in tree.iter().enumerate() {
        let style = theme.palette_style(i);
        lines.push(Line::from(vec![
            Span::styled("■ ", style),
            Span::styled(fit_width(&node.name, 20), theme.value),
            Span::styled(format!("{:>14}", format_currency(node.total)), theme.value),
            Span::styled(
                format!(" {:>7}", format_percent(percentage(node.total, grand_total))),
                theme.label,
            ),
        ]));
        for child in &node.children {
            lines.push(Line::from(vec![
                Span::styled("    ", style),
                Span::styled(fit_width(child.key(0), 18), theme.text),
                Span::styled(format!("{:>14}", format_currency(child.sales)), theme.text),
                Span::styled(
                    format!(" {:>7}", format_percent(percentage(child.sales, node.total))),
                    theme.dim,
                ),
            ]));
        }
    }
    lines
}

/// Category and sub-category sales panel.
pub fn render_category_breakdown(frame: &mut Frame, area: Rect, tree: &[CategoryNode], theme: &Theme) {
    let title = "Sales by Category and Sub-Category";
    if tree.is_empty() {
        render_no_data(frame, area, title, None, theme);
        return;
    }
    frame.render_widget(
        Paragraph::new(category_breakdown_lines(tree, theme)).block(panel(title, theme)),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
