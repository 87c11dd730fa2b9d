use dashboard_core::formatting::{format_number, format_percent, percentage};
use dashboard_data::aggregator::CategoryCount;
use ratatui::text::{Line, Span};

use super::fit_width;
use crate::themes::Theme;

const FILLED: &str = "█";
const EMPTY: &str = "░";

/// Share-of-total bars for a categorical count, one line per value.
///
/// Each line reads `label ████░░░░ 42.5% (1,234)`.
pub struct DistributionBars<'a> {
    pub counts: &'a [CategoryCount],
    pub theme: &'a Theme,
    /// Columns reserved for the value label.
    pub label_width: usize,
    /// Columns of the bar itself.
    pub bar_width: usize,
}

impl<'a> DistributionBars<'a> {
    pub fn new(counts: &'a [CategoryCount], theme: &'a Theme) -> Self {
        Self {
            counts,
            theme,
            label_width: 16,
            bar_width: 24,
        }
    }

    /// Size the label and bar to fit `width` columns.
    pub fn fit(mut self, width: u16) -> Self {
        // label + space + bar + " 100.0% (999,999)"
        let available = (width as usize).saturating_sub(18);
        self.label_width = (available / 3).clamp(6, 24);
        self.bar_width = available.saturating_sub(self.label_width + 1).max(4);
        self
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let total = self.total() as f64;
        self.counts
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let pct = percentage(c.count as f64, total);
                let filled = ((pct / 100.0) * self.bar_width as f64).round() as usize;
                let filled = filled.min(self.bar_width);
                Line::from(vec![
                    Span::styled(fit_width(&c.value, self.label_width), self.theme.label),
                    Span::raw(" "),
                    Span::styled(FILLED.repeat(filled), self.theme.palette_style(i)),
                    Span::styled(EMPTY.repeat(self.bar_width - filled), self.theme.bar_empty),
                    Span::styled(format!(" {:>6}", format_percent(pct)), self.theme.value),
                    Span::styled(
                        format!(" ({})", format_number(c.count as f64, 0)),
                        self.theme.dim,
                    ),
                ])
            })
            .collect()
    }
}
