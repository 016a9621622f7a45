//! The category breakdown for a month.

use axum::{
    extract::{Query, State},
    response::Response,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    app_state::ReportState,
    month_range::MonthRange,
    report::{MonthQuery, into_json_response, run_report},
};

/// The number of transactions in a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category name.
    #[serde(rename = "_id")]
    pub category: String,
    /// How many transactions in the month belong to the category.
    pub count: usize,
}

/// Count the transactions in `range` per category.
///
/// Only categories with at least one transaction in `range` are included,
/// sorted by category name.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_category_breakdown(
    range: &MonthRange,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    connection
        .prepare(
            "SELECT category, COUNT(*) FROM \"transaction\"
             WHERE date_of_sale >= ?1 AND date_of_sale < ?2
             GROUP BY category
             ORDER BY category ASC",
        )?
        .query_map(
            (range.start.unix_timestamp(), range.end.unix_timestamp()),
            |row| {
                Ok(CategoryCount {
                    category: row.get(0)?,
                    count: row.get(1)?,
                })
            },
        )?
        .collect::<Result<Vec<CategoryCount>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// A route handler for a month's category breakdown.
pub async fn get_pie_chart_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let result = run_report(&state, query.month, get_category_breakdown);

    into_json_response(result, "Error fetching pie chart data")
}
