use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sales dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The dataset file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset has no header row at all.
    #[error("Dataset {0} is empty (no header row)")]
    EmptyFile(PathBuf),

    /// One or more required columns are absent from the header row.
    #[error("Missing required columns in {path}: {}", columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    /// A data row could not be decoded into a record.
    #[error("Malformed row {row}: {reason}")]
    MalformedRow { row: u64, reason: String },

    /// An order date did not match any recognised format.
    #[error("Invalid date {value:?} at row {row}")]
    DateParse { row: u64, value: String },

    /// A numeric field is outside its allowed domain.
    #[error("Invalid value for {column} at row {row}: {value}")]
    InvalidValue {
        row: u64,
        column: &'static str,
        value: String,
    },

    /// An aggregate that needs at least one row received none.
    #[error("No data: {operation} requires at least one row")]
    EmptyInput { operation: &'static str },

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashboardError {
    /// `true` for errors raised while loading and validating the dataset.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DashboardError::FileRead { .. }
                | DashboardError::EmptyFile(_)
                | DashboardError::MissingColumns { .. }
                | DashboardError::MalformedRow { .. }
                | DashboardError::DateParse { .. }
                | DashboardError::InvalidValue { .. }
        )
    }

    /// `true` when an aggregate was asked to summarise zero rows.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, DashboardError::EmptyInput { .. })
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
