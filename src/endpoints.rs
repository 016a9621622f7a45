//! The API endpoints URIs.
//!
//! Report routes are relative to [API_PREFIX].

/// The prefix that all product report routes are nested under.
pub const API_PREFIX: &str = "/api/products";
/// The route that loads the seed data into the database.
pub const INITIALIZE: &str = "/initialize";
/// The route for listing a month's transactions, with search and pagination.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for a month's sales totals.
pub const STATISTICS: &str = "/statistics";
/// The route for a month's price range histogram.
pub const BAR_CHART: &str = "/bar-chart";
/// The route for a month's category breakdown.
pub const PIE_CHART: &str = "/pie-chart";
/// The route for all of a month's reports in one response.
pub const COMBINED: &str = "/combined";

/// Join [API_PREFIX] and `route` into the full path of an endpoint.
pub fn api_path(route: &str) -> String {
    format!("{API_PREFIX}{route}")
}
