use dashboard_core::formatting::{format_compact, format_number};
use dashboard_data::density::DensityGrid;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

const CELL: &str = "██";
const EMPTY_CELL: &str = "··";
const AXIS_WIDTH: usize = 7;

/// Discount-vs-sales density drawn as coloured cells.
///
/// Highest sales bin on top, discount increasing to the right, followed by
/// an axis line and a note on points outside the plotted range.
pub struct DensityHeatmap<'a> {
    pub grid: &'a DensityGrid,
    pub theme: &'a Theme,
}

impl<'a> DensityHeatmap<'a> {
    pub fn new(grid: &'a DensityGrid, theme: &'a Theme) -> Self {
        Self { grid, theme }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let t = self.theme;
        let max = self.grid.max_count();
        let mut lines: Vec<Line<'a>> = self
            .grid
            .counts
            .iter()
            .enumerate()
            .rev()
            .map(|(bin, row)| {
                let (lower, _) = self.grid.sales_bin_edges(bin);
                let mut spans = vec![Span::styled(
                    format!("{:>width$} ", format_compact(lower), width = AXIS_WIDTH - 1),
                    t.label,
                )];
                spans.extend(row.iter().map(|&count| {
                    if count == 0 {
                        Span::styled(EMPTY_CELL, t.dim)
                    } else {
                        Span::styled(CELL, t.heat_style(count, max))
                    }
                }));
                Line::from(spans)
            })
            .collect();

        let columns = self.grid.config.discount_bins * CELL.chars().count();
        let mut axis = format!("{:width$}0", "", width = AXIS_WIDTH);
        axis.push_str(&" ".repeat(columns.saturating_sub(2)));
        axis.push_str("1 discount");
        lines.push(Line::from(Span::styled(axis, t.label)));

        lines.push(Line::from(vec![
            Span::styled("sales ↑  max cell ", t.dim),
            Span::styled(format_number(max as f64, 0), t.value),
        ]));
        if self.grid.clipped > 0 {
            lines.push(Line::from(Span::styled(
                format!(
                    "{} points outside {}–{}",
                    format_number(self.grid.clipped as f64, 0),
                    format_compact(self.grid.config.sales_min),
                    format_compact(self.grid.config.sales_max),
                ),
                t.warning,
            )));
        }
        lines
    }
}
