//! Non-interactive outputs: the JSON report and the plain-text summary.

use std::fmt::{self, Write};
use std::path::Path;

use dashboard_core::formatting::{format_currency, format_number, format_percent, percentage};
use dashboard_core::models::FilterCriteria;
use dashboard_data::aggregator::CategoryCount;
use dashboard_data::views::{DashboardViews, ViewsReport};
use dashboard_runtime::DashboardSession;
use dashboard_ui::charts::top_products;
use dashboard_ui::table_view::StateCategoryTable;
use serde::Serialize;

// ── JSON ──────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct JsonReport<'a> {
    source: Option<&'a Path>,
    criteria: &'a FilterCriteria,
    #[serde(flatten)]
    views: ViewsReport<'a>,
}

/// Pretty-printed JSON of every view for the session's current filters.
pub fn render_json(session: &DashboardSession) -> serde_json::Result<String> {
    let report = JsonReport {
        source: session.dataset().source(),
        criteria: session.criteria(),
        views: session.views().report(),
    };
    serde_json::to_string_pretty(&report)
}

// ── Plain text ────────────────────────────────────────────────────────────────

fn section(out: &mut impl Write, title: &str) -> fmt::Result {
    writeln!(out, "\n{}\n{}", title, "-".repeat(title.len()))
}

fn write_counts(out: &mut impl Write, counts: &[CategoryCount]) -> fmt::Result {
    let total: usize = counts.iter().map(|c| c.count).sum();
    for c in counts {
        writeln!(
            out,
            "  {:<24} {:>8} {:>7}",
            c.value,
            format_number(c.count as f64, 0),
            format_percent(percentage(c.count as f64, total as f64))
        )?;
    }
    Ok(())
}

fn write_header(out: &mut impl Write, session: &DashboardSession) -> fmt::Result {
    let criteria = session.criteria();
    let meta = &session.views().metadata;
    writeln!(out, "Sales Dashboard Summary")?;
    writeln!(out, "=======================")?;
    writeln!(out, "Date range : {}", criteria.date_range)?;
    writeln!(
        out,
        "State      : {}",
        FilterCriteria::selection_label(criteria.state.as_deref())
    )?;
    writeln!(
        out,
        "City       : {}",
        FilterCriteria::selection_label(criteria.city.as_deref())
    )?;
    writeln!(out, "Orders     : {}", format_number(meta.records as f64, 0))?;
    writeln!(out, "Sales      : {}", format_currency(meta.total_sales))?;
    writeln!(out, "Profit     : {}", format_currency(meta.total_profit))
}

fn write_categories(out: &mut impl Write, views: &DashboardViews) -> fmt::Result {
    section(out, "Sales by Category and Sub-Category")?;
    for node in &views.category_tree {
        writeln!(out, "  {:<28} {:>14}", node.name, format_currency(node.total))?;
        for child in &node.children {
            writeln!(
                out,
                "    {:<26} {:>14}",
                child.key(0),
                format_currency(child.sales)
            )?;
        }
    }
    Ok(())
}

fn write_products(out: &mut impl Write, views: &DashboardViews, top: usize) -> fmt::Result {
    section(out, "Top Products (outliers removed)")?;
    match views.product_sales_trimmed.as_ref() {
        Ok(groups) => {
            for g in top_products(groups, top) {
                writeln!(
                    out,
                    "  {:<40} {:<16} {:>14}",
                    g.key(1),
                    g.key(0),
                    format_currency(g.sales)
                )?;
            }
            Ok(())
        }
        Err(e) => writeln!(out, "  {}", e),
    }
}

fn write_state_table(out: &mut impl Write, views: &DashboardViews) -> fmt::Result {
    section(out, "Sales by State and Category")?;
    let table = StateCategoryTable::from_groups(&views.state_category_sales);
    write!(out, "  {:<20}", "State")?;
    for category in &table.categories {
        write!(out, " {:>16}", category)?;
    }
    writeln!(out, " {:>16}", "Total")?;
    for (state, values) in &table.rows {
        write!(out, "  {:<20}", state)?;
        for v in values {
            write!(out, " {:>16}", format_currency(*v))?;
        }
        writeln!(out, " {:>16}", format_currency(values.iter().sum()))?;
    }
    write!(out, "  {:<20}", "TOTAL")?;
    for v in table.column_totals() {
        write!(out, " {:>16}", format_currency(v))?;
    }
    writeln!(out, " {:>16}", format_currency(table.grand_total()))
}

fn write_profit_and_density(out: &mut impl Write, views: &DashboardViews) -> fmt::Result {
    section(out, "Maximum Profit")?;
    match views.max_profit.as_ref() {
        Ok(gauge) => writeln!(
            out,
            "  {} (gauge axis 0 to {})",
            format_currency(gauge.value),
            format_currency(gauge.axis_max)
        )?,
        Err(e) => writeln!(out, "  {}", e)?,
    }

    section(out, "Discount vs Sales Density")?;
    writeln!(
        out,
        "  {} points binned, {} outside the sales axis, densest cell {}",
        format_number(views.density.binned() as f64, 0),
        format_number(views.density.clipped as f64, 0),
        format_number(views.density.max_count() as f64, 0)
    )
}

/// Write text tables of every view to `out`.
fn write_summary(out: &mut impl Write, session: &DashboardSession, top: usize) -> fmt::Result {
    write_header(out, session)?;

    let views = session.views();
    if views.metadata.records == 0 {
        return writeln!(out, "\nNo data for the current filters.");
    }

    section(out, "Orders by Segment")?;
    write_counts(out, &views.segment_counts)?;
    section(out, "Orders by Ship Mode")?;
    write_counts(out, &views.ship_mode_counts)?;
    write_categories(out, views)?;
    write_products(out, views, top)?;
    write_state_table(out, views)?;
    write_profit_and_density(out, views)
}

/// Text tables of every view, suitable for piping or logging.
pub fn render_summary(session: &DashboardSession, top: usize) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_summary(&mut out, session, top)?;
    Ok(out)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
