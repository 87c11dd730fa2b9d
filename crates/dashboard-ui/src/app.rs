//! Application state and the TUI event loop.
//!
//! [`App`] owns a [`DashboardSession`], the theme and the selected page. Key
//! presses mutate the session's filters, which recomputes every view before
//! the next frame is drawn.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dashboard_runtime::DashboardSession;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};

use crate::charts;
use crate::components::distribution::DistributionBars;
use crate::components::heatmap::DensityHeatmap;
use crate::components::sidebar::FilterSidebar;
use crate::table_view::{render_state_category_table, StateCategoryTable};
use crate::themes::Theme;

const SIDEBAR_WIDTH: u16 = 30;

// ── Page ──────────────────────────────────────────────────────────────────────

/// Which group of charts is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Segment and ship-mode shares, cumulative series, profit gauge.
    Overview,
    /// Discount/sales density and the category breakdown.
    Sales,
    /// Trimmed product sales and the state/category table.
    Products,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Overview, Page::Sales, Page::Products];

    pub fn title(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Sales => "Sales",
            Page::Products => "Products",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Page::Overview => 0,
            Page::Sales => 1,
            Page::Products => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root state of the terminal dashboard.
pub struct App {
    pub theme: Theme,
    pub page: Page,
    pub session: DashboardSession,
    /// Number of product bars drawn on the products page.
    pub top_products: usize,
    /// Set to `true` to leave the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(session: DashboardSession, theme_name: &str, top_products: usize) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            page: Page::Overview,
            session,
            top_products: top_products.max(1),
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Take over the terminal and run until the user quits.
    ///
    /// Polls for key events with a 250 ms timeout; the terminal is restored
    /// even when drawing fails.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        tracing::info!(page = self.page.title(), "dashboard started");
        let tick_rate = Duration::from_millis(250);
        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }
            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }
            if self.should_quit {
                break Ok(());
            }
        };

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        tracing::info!(refreshes = self.session.refresh_count(), "dashboard closed");
        result
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('s') => self.session.cycle_state(true),
            KeyCode::Char('S') => self.session.cycle_state(false),
            KeyCode::Char('c') => self.session.cycle_city(true),
            KeyCode::Char('C') => self.session.cycle_city(false),
            KeyCode::Char('[') => self.session.shift_start(-1),
            KeyCode::Char(']') => self.session.shift_start(1),
            KeyCode::Char('{') => self.session.shift_end(-1),
            KeyCode::Char('}') => self.session.shift_end(1),
            KeyCode::Char('r') | KeyCode::Char('R') => self.session.reset_filters(),
            KeyCode::Tab | KeyCode::Right => self.page = self.page.next(),
            KeyCode::BackTab | KeyCode::Left => self.page = self.page.previous(),
            KeyCode::Char('1') => self.page = Page::Overview,
            KeyCode::Char('2') => self.page = Page::Sales,
            KeyCode::Char('3') => self.page = Page::Products,
            _ => return,
        }
        tracing::debug!(key = ?key.code, page = self.page.title(), "key handled");
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Draw the whole dashboard into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let [sidebar, main] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
                .areas(frame.area());
        self.render_sidebar(frame, sidebar);

        let [tabs, body] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(5)]).areas(main);
        self.render_tabs(frame, tabs);

        match self.page {
            Page::Overview => self.render_overview(frame, body),
            Page::Sales => self.render_sales(frame, body),
            Page::Products => self.render_products(frame, body),
        }
    }

    fn block<'a>(&self, title: &str) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .title(Span::styled(format!(" {} ", title), self.theme.title))
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let meta = &self.session.views().metadata;
        let lines = FilterSidebar::new(
            self.session.criteria(),
            meta.records,
            meta.total_sales,
            meta.total_profit,
            &self.theme,
        )
        .to_lines();
        frame.render_widget(
            Paragraph::new(lines).block(self.block("Sales Dashboard")),
            area,
        );
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Page::ALL
            .iter()
            .map(|p| Line::from(format!("{} {}", p.index() + 1, p.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.page.index())
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active)
            .block(self.block("Pages"));
        frame.render_widget(tabs, area);
    }

    fn render_overview(&self, frame: &mut Frame, area: Rect) {
        let views = self.session.views();
        let [distributions, cumulative, gauge] = Layout::vertical([
            Constraint::Percentage(35),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .areas(area);
        let [segments, ship_modes] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(distributions);

        for (area, title, counts) in [
            (segments, "Orders by Segment", &views.segment_counts),
            (ship_modes, "Orders by Ship Mode", &views.ship_mode_counts),
        ] {
            if counts.is_empty() {
                charts::render_no_data(frame, area, title, None, &self.theme);
            } else {
                let lines = DistributionBars::new(counts, &self.theme)
                    .fit(area.width.saturating_sub(2))
                    .to_lines();
                frame.render_widget(Paragraph::new(lines).block(self.block(title)), area);
            }
        }

        charts::render_cumulative_chart(frame, cumulative, &views.cumulative, &self.theme);

        charts::render_profit_gauge(frame, gauge, self.session.max_profit(), &self.theme);
    }

    fn render_sales(&self, frame: &mut Frame, area: Rect) {
        let views = self.session.views();
        let [density, breakdown] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(area);

        let title = "Discount vs Sales Density";
        if views.discount_sales.is_empty() {
            charts::render_no_data(frame, density, title, None, &self.theme);
        } else {
            let lines = DensityHeatmap::new(&views.density, &self.theme).to_lines();
            frame.render_widget(Paragraph::new(lines).block(self.block(title)), density);
        }

        charts::render_category_breakdown(frame, breakdown, &views.category_tree, &self.theme);
    }

    fn render_products(&self, frame: &mut Frame, area: Rect) {
        let views = self.session.views();
        let [products, states] =
            Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);

        charts::render_product_bars(
            frame,
            products,
            self.session.product_sales(),
            self.top_products,
            &self.theme,
        );

        let table = StateCategoryTable::from_groups(&views.state_category_sales);
        render_state_category_table(frame, states, &table, &self.theme);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
