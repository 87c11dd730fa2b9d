//! Runtime layer for the sales dashboard.
//!
//! Owns the shared, load-once [`Dataset`] and the per-user
//! [`DashboardSession`] that recomputes views whenever a filter changes.

pub mod dataset;
pub mod session;

pub use dataset::Dataset;
pub use session::{DashboardSession, ViewSlot};
