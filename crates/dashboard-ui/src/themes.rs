use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect the terminal background from `COLORFGBG` (`"fg;bg"`).
///
/// Background values 0–6 are dark and 7–15 light. Anything else is
/// [`BackgroundType::Unknown`].
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .map_or(BackgroundType::Unknown, background_from_colorfgbg)
}

/// Classify a `COLORFGBG` value.
pub fn background_from_colorfgbg(value: &str) -> BackgroundType {
    match value.split(';').next_back().map(str::parse::<u8>) {
        Some(Ok(bg)) if bg <= 6 => BackgroundType::Dark,
        Some(Ok(bg)) if bg <= 15 => BackgroundType::Light,
        _ => BackgroundType::Unknown,
    }
}

/// Every style the dashboard draws with.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Chrome ───────────────────────────────────────────────────────────────
    pub title: Style,
    pub border: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,
    pub key_hint: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub warning: Style,
    pub error: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub series_sales: Style,
    pub series_profit: Style,
    pub gauge: Style,
    pub bar_empty: Style,
    /// Colours assigned to categories and segments, cycled by index.
    pub palette: Vec<Color>,
    /// Heatmap colours from sparse to dense.
    pub heat_ramp: Vec<Color>,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    /// Dark-background theme (default).
    pub fn dark() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::DarkGray),
            tab_active: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            key_hint: Style::default().fg(Color::Cyan),

            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            series_sales: Style::default().fg(Color::Cyan),
            series_profit: Style::default().fg(Color::Green),
            gauge: Style::default().fg(Color::Green).bg(Color::Black),
            bar_empty: Style::default().fg(Color::DarkGray),
            palette: vec![
                Color::Cyan,
                Color::Magenta,
                Color::Yellow,
                Color::Green,
                Color::Blue,
                Color::Red,
            ],
            heat_ramp: vec![
                Color::Rgb(49, 54, 149),
                Color::Rgb(69, 117, 180),
                Color::Rgb(116, 173, 209),
                Color::Rgb(253, 174, 97),
                Color::Rgb(244, 109, 67),
                Color::Rgb(215, 48, 39),
            ],

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background theme with dark text.
    pub fn light() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::Gray),
            tab_active: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            key_hint: Style::default().fg(Color::Blue),

            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            series_sales: Style::default().fg(Color::Blue),
            series_profit: Style::default().fg(Color::Green),
            gauge: Style::default().fg(Color::Green).bg(Color::White),
            bar_empty: Style::default().fg(Color::Gray),
            palette: vec![
                Color::Blue,
                Color::Magenta,
                Color::Red,
                Color::Green,
                Color::Cyan,
                Color::Yellow,
            ],
            heat_ramp: vec![
                Color::Rgb(224, 243, 248),
                Color::Rgb(171, 217, 233),
                Color::Rgb(116, 173, 209),
                Color::Rgb(253, 174, 97),
                Color::Rgb(244, 109, 67),
                Color::Rgb(165, 0, 38),
            ],

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Pick light or dark from the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Theme by name; unknown names (including `"auto"`) detect.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Palette colour for the `index`-th series or category.
    pub fn palette_style(&self, index: usize) -> Style {
        match self.palette.get(index % self.palette.len().max(1)) {
            Some(&color) => Style::default().fg(color),
            None => self.text,
        }
    }

    /// Heatmap colour for a cell holding `count` of at most `max` points.
    ///
    /// Empty cells use the dim style.
    pub fn heat_style(&self, count: u32, max: u32) -> Style {
        if count == 0 || max == 0 || self.heat_ramp.is_empty() {
            return self.dim;
        }
        let steps = self.heat_ramp.len();
        let level = ((count as f64 / max as f64) * steps as f64).ceil() as usize;
        let color = self.heat_ramp[level.clamp(1, steps) - 1];
        Style::default().fg(color)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
