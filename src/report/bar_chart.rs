//! The price range histogram for a month.

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

/// A price range in the histogram.
///
/// A bucket holds prices from `min` up to, but not including, `max`. The
/// last bucket has no upper limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBucket {
    /// The name of the range, e.g. "101-200".
    pub label: &'static str,
    /// The lowest price in the bucket.
    pub min: f64,
    /// The first price above the bucket.
    pub max: Option<f64>,
}

impl PriceBucket {
    const fn bounded(label: &'static str, min: f64, max: f64) -> Self {
        Self {
            label,
            min,
            max: Some(max),
        }
    }

    const fn unbounded(label: &'static str, min: f64) -> Self {
        Self {
            label,
            min,
            max: None,
        }
    }

    /// Whether `price` falls inside the bucket.
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.is_none_or(|max| price < max)
    }
}

/// The histogram's price ranges, in display order.
///
/// Each bucket ends where the next one starts, so a price of 100 (or 100.5)
/// counts towards "0-100" and 101 is the first price in "101-200".
pub const PRICE_BUCKETS: [PriceBucket; 10] = [
    PriceBucket::bounded("0-100", 0.0, 101.0),
    PriceBucket::bounded("101-200", 101.0, 201.0),
    PriceBucket::bounded("201-300", 201.0, 301.0),
    PriceBucket::bounded("301-400", 301.0, 401.0),
    PriceBucket::bounded("401-500", 401.0, 501.0),
    PriceBucket::bounded("501-600", 501.0, 601.0),
    PriceBucket::bounded("601-700", 601.0, 701.0),
    PriceBucket::bounded("701-800", 701.0, 801.0),
    PriceBucket::bounded("801-900", 801.0, 901.0),
    PriceBucket::unbounded("901-above", 901.0),
];

/// The number of transactions in a price range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartEntry {
    /// The bucket's label, e.g. "101-200".
    pub range: String,
    /// How many transactions in the month have a price in the range.
    pub count: usize,
}

/// Count the transactions in `range` for each of the [PRICE_BUCKETS].
///
/// Always returns one entry per bucket in the order of [PRICE_BUCKETS],
/// including empty buckets. Prices below zero are not counted.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_price_histogram(
    range: &MonthRange,
    connection: &Connection,
) -> Result<Vec<BarChartEntry>, Error> {
    let prices = connection
        .prepare(
            "SELECT price FROM \"transaction\"
             WHERE date_of_sale >= ?1 AND date_of_sale < ?2",
        )?
        .query_map(
            (range.start.unix_timestamp(), range.end.unix_timestamp()),
            |row| row.get::<_, f64>(0),
        )?
        .collect::<Result<Vec<f64>, rusqlite::Error>>()?;

    let histogram = PRICE_BUCKETS
        .iter()
        .map(|bucket| BarChartEntry {
            range: bucket.label.to_owned(),
            count: prices.iter().filter(|&&price| bucket.contains(price)).count(),
        })
        .collect();

    Ok(histogram)
}

/// A route handler for a month's price range histogram.
pub async fn get_bar_chart_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let result = run_report(&state, query.month, get_price_histogram);

    into_json_response(result, "Error fetching bar chart data")
}
