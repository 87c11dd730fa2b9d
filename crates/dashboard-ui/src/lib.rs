//! Terminal UI for the sales dashboard.
//!
//! Provides themes, line components (filter sidebar, share bars, density
//! heatmap), chart panels, the state/category table and the [`app::App`]
//! event loop, all built on [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod table_view;
pub mod themes;

pub use app::{App, Page};
