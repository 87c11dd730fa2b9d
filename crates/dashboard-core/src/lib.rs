//! Shared building blocks for the sales dashboard.
//!
//! Holds the order-line data model and filter criteria, the error type,
//! date parsing, percentile/IQR statistics, number formatting and the CLI
//! settings used by every other crate in the workspace.

pub mod dates;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod stats;

pub use error::{DashboardError, Result};
