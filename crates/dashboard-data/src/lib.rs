//! Loading and aggregation for the sales dashboard.
//!
//! [`reader`] turns a CSV export into records, [`filters`] narrows them to the
//! user's selection and [`views`] computes every chart's data from the result.

pub mod aggregator;
pub mod density;
pub mod filters;
pub mod outliers;
pub mod reader;
pub mod views;

pub use filters::apply_filters;
pub use reader::load_dataset;
pub use views::{compute_views, DashboardViews, ViewConfig};
