//! Dashboard module
//!
//! Provides an overview page showing balance totals and the recorded
//! months, with an exact-match month filter.

mod aggregation;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
