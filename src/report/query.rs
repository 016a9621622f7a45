//! Query string parameters accepted by the report routes.

use serde::Deserialize;

/// Selects the month that a report covers.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    /// The month number, 1-12.
    pub month: u8,
}

/// Selects which page of a month's transactions to list.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    /// The month number, 1-12.
    pub month: u8,
    /// Text to look for in the title, description or price.
    #[serde(default)]
    pub search: String,
    /// The 1-indexed page number.
    pub page: Option<u64>,
    /// The maximum number of transactions per page.
    #[serde(rename = "perPage")]
    pub per_page: Option<u64>,
}
