//! Sales totals for a month.

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

/// The total value of a month's transactions and how many were sold.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStatistics {
    /// The sum of the prices of all transactions in the month.
    pub total_amount: f64,
    /// The number of transactions that were sold.
    pub sold_items: usize,
    /// The number of transactions that were not sold.
    pub not_sold_items: usize,
}

/// Calculate the statistics for the transactions in `range`.
///
/// Returns `None` if there are no transactions in `range`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn query_statistics(
    range: &MonthRange,
    connection: &Connection,
) -> Result<Option<SalesStatistics>, Error> {
    let (count, total_amount, sold_items): (usize, f64, usize) = connection.query_row(
        "SELECT COUNT(*), COALESCE(SUM(price), 0.0), COALESCE(SUM(sold), 0)
         FROM \"transaction\"
         WHERE date_of_sale >= ?1 AND date_of_sale < ?2",
        (range.start.unix_timestamp(), range.end.unix_timestamp()),
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

    if count == 0 {
        return Ok(None);
    }

    Ok(Some(SalesStatistics {
        total_amount,
        sold_items,
        not_sold_items: count - sold_items,
    }))
}

/// Calculate the statistics for the transactions in `range`, with zeroes
/// for a month without transactions.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_statistics(range: &MonthRange, connection: &Connection) -> Result<SalesStatistics, Error> {
    query_statistics(range, connection).map(Option::unwrap_or_default)
}

/// A route handler for a month's sales statistics.
pub async fn get_statistics_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let result = run_report(&state, query.month, get_statistics);

    into_json_response(result, "Error fetching statistics")
}
