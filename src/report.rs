//! Month-windowed reports over the transaction table.
//!
//! Every report resolves the requested month of the configured report year
//! with [resolve_month] and only reads transactions sold inside that range:
//! - a searchable, paginated listing
//! - sales statistics
//! - a price range histogram (bar chart)
//! - a category breakdown (pie chart)
//! - all of the above combined

mod bar_chart;
mod combined;
mod listing;
mod pie_chart;
mod query;
mod statistics;

pub use bar_chart::{BarChartEntry, get_bar_chart_endpoint, get_price_histogram};
pub use combined::get_combined_endpoint;
pub use listing::get_transactions_endpoint;
pub use pie_chart::{CategoryCount, get_category_breakdown, get_pie_chart_endpoint};
pub use query::{ListingQuery, MonthQuery};
pub use statistics::{SalesStatistics, get_statistics, get_statistics_endpoint};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    app_state::ReportState,
    month_range::{MonthRange, resolve_month},
};

/// Resolve `month` and run `report` for that month while holding the
/// database lock.
fn run_report<T>(
    state: &ReportState,
    month: u8,
    report: impl FnOnce(&MonthRange, &Connection) -> Result<T, Error>,
) -> Result<T, Error> {
    let range = resolve_month(month, state.report_year)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    report(&range, &connection)
}

/// Serialize a successful report as JSON, or render the error as plain text
/// with `error_context` as the message for server errors.
fn into_json_response<T: Serialize>(result: Result<T, Error>, error_context: &str) -> Response {
    match result {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error.into_plain_response(error_context),
    }
}
