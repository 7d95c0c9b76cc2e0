//! The API endpoints URIs.

/// The landing page.
pub const ROOT: &str = "/";
/// The page with the monthly budget submission form. A POST to the same
/// route runs the prediction flow and stores the result.
pub const PREDICT: &str = "/predict";
/// The page showing aggregate and per-month budget data.
pub const DASHBOARD_VIEW: &str = "/dashboard";
