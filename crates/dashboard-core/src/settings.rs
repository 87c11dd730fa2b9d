use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::FilterCriteria;

/// Name of the per-user directory holding persisted settings and logs.
pub const APP_DIR_NAME: &str = ".sales-dashboard";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Interactive sales & profit dashboard over a CSV order export
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sales-dashboard",
    about = "Interactive sales & profit dashboard over a CSV order export",
    version
)]
pub struct Settings {
    /// Path to the sales CSV file
    #[arg(long, default_value = "superstore_uptd.csv")]
    pub data: PathBuf,

    /// Output mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "summary", "json"])]
    pub view: String,

    /// First order date to include (YYYY-MM-DD, defaults to the earliest in the data)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last order date to include (YYYY-MM-DD, defaults to the latest in the data)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// State to restrict to ("All" for every state)
    #[arg(long)]
    pub state: Option<String>,

    /// City to restrict to ("All" for every city of the selected state)
    #[arg(long)]
    pub city: Option<String>,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "auto"])]
    pub theme: String,

    /// Number of bins per axis for the discount/sales heatmap (2-50)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u16).range(2..=50))]
    pub heatmap_bins: u16,

    /// Upper end of the sales axis of the discount/sales heatmap
    #[arg(long, default_value = "5000")]
    pub sales_axis_max: f64,

    /// Number of products shown in the product sales chart
    #[arg(long, default_value = "15", value_parser = clap::value_parser!(u16).range(1..=200))]
    pub top_products: u16,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.sales-dashboard/last_used.json`.
///
/// Date ranges are deliberately absent: they default to the data's extent.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl LastUsedParams {
    /// Default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&content) {
            Ok(params) => params,
            Err(e) => {
                tracing::warn!("Ignoring unreadable settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Atomically write params to `path`, creating parent directories if
    /// needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] with explicit arguments and
    /// config path, so tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("Failed to clear {}: {}", config_path.display(), e);
            }
            return Self::resolve_flags(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "data") {
            if let Some(v) = last.data {
                settings.data = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        // The persisted state and city are restored as a pair, and only when
        // neither is given on the command line.
        if !is_arg_explicitly_set(&matches, "state") && !is_arg_explicitly_set(&matches, "city") {
            settings.state = last.state;
            settings.city = last.city;
        }

        settings = Self::resolve_flags(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::warn!("Failed to persist settings to {}: {}", config_path.display(), e);
        }

        settings
    }

    /// Apply the `--debug` flag.
    fn resolve_flags(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// State filter with the "All" sentinel mapped to `None`.
    pub fn state_filter(&self) -> Option<String> {
        self.state
            .as_deref()
            .and_then(FilterCriteria::selection_from_label)
    }

    /// City filter with the "All" sentinel mapped to `None`.
    pub fn city_filter(&self) -> Option<String> {
        self.city
            .as_deref()
            .and_then(FilterCriteria::selection_from_label)
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            data: Some(s.data.clone()),
            view: Some(s.view.clone()),
            theme: Some(s.theme.clone()),
            state: s.state.clone(),
            city: s.city.clone(),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
