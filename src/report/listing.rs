//! The searchable, paginated list of a month's transactions.

use axum::{
    extract::{Query, State},
    response::Response,
};
use rusqlite::Connection;

use crate::{
    Error,
    app_state::ReportState,
    month_range::MonthRange,
    pagination::Page,
    report::{ListingQuery, into_json_response, run_report},
    transaction::{Transaction, TransactionQuery, query_transactions},
};

/// Get one page of the transactions in `range` that match `search`.
///
/// `search` is matched case-insensitively against the title, the description
/// and the price written as text (e.g. "150" matches a price of 150.0). An
/// empty `search` matches every transaction. Transactions are listed in the
/// order they were imported.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn list_transactions(
    range: &MonthRange,
    search: &str,
    page: Page,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    query_transactions(
        TransactionQuery {
            date_range: Some(*range),
            search: Some(search.to_owned()),
            limit: Some(page.size),
            offset: page.offset(),
        },
        connection,
    )
}

/// A route handler for listing a month's transactions.
pub async fn get_transactions_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<ListingQuery>,
) -> Response {
    let result = Page::new(query.page, query.per_page, &state.pagination_config).and_then(|page| {
        run_report(&state, query.month, |range, connection| {
            list_transactions(range, &query.search, page, connection)
        })
    });

    into_json_response(result, "Error fetching transactions")
}
