//! Every report for a month in one response.

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
    report::{
        BarChartEntry, CategoryCount, MonthQuery, SalesStatistics, get_category_breakdown,
        get_price_histogram, get_statistics, into_json_response, run_report,
    },
    transaction::{Transaction, TransactionQuery, query_transactions},
};

/// All of a month's transactions along with its statistics and charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    /// Every transaction in the month, without search or pagination.
    pub transactions: Vec<Transaction>,
    /// The month's sales statistics.
    pub total_sales: SalesStatistics,
    /// The month's price range histogram.
    pub bar_chart: Vec<BarChartEntry>,
    /// The month's category breakdown.
    pub pie_chart: Vec<CategoryCount>,
}

/// Build every report for `range`.
///
/// # Errors
/// Returns [Error::SqlError] if any of the reports fail.
pub fn get_combined_report(
    range: &MonthRange,
    connection: &Connection,
) -> Result<CombinedReport, Error> {
    let transactions = query_transactions(
        TransactionQuery {
            date_range: Some(*range),
            ..Default::default()
        },
        connection,
    )?;

    Ok(CombinedReport {
        transactions,
        total_sales: get_statistics(range, connection)?,
        bar_chart: get_price_histogram(range, connection)?,
        pie_chart: get_category_breakdown(range, connection)?,
    })
}

/// A route handler for all of a month's reports.
pub async fn get_combined_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let result = run_report(&state, query.month, get_combined_report);

    into_json_response(result, "Error fetching combined data")
}
