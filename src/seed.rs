//! Loads the product transaction dataset into the database.
//!
//! The dataset is a JSON array of products fetched over HTTP(S). Each product
//! is given an import ID derived from its content, so loading the same dataset
//! more than once does not create duplicate transactions.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    app_state::SeedState,
    transaction::{Transaction, TransactionBuilder, import_transactions},
};

/// A product as it appears in the seed dataset.
///
/// Fields in the dataset that are not listed here (e.g. `id`, `image`) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRecord {
    /// The name of the product.
    pub title: String,
    /// A text description of the product.
    #[serde(default)]
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// When the product was sold, as an RFC 3339 timestamp with any offset.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// The product category.
    pub category: String,
    /// Whether the product has been sold.
    pub sold: bool,
}

impl SeedRecord {
    /// Convert the record into a transaction builder tagged with its import ID.
    pub fn into_builder(self) -> TransactionBuilder {
        let import_id = create_import_id(&self);

        Transaction::build(&self.title, self.price, self.date_of_sale)
            .description(&self.description)
            .category(&self.category)
            .sold(self.sold)
            .import_id(Some(import_id))
    }
}

/// Creates a hash for a seed record based on all of its fields.
///
/// The date is hashed as a UTC timestamp so the same moment written with a
/// different offset gets the same ID.
pub fn create_import_id(record: &SeedRecord) -> i64 {
    let line = format!(
        "{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}",
        record.title,
        record.description,
        record.price,
        record.date_of_sale.to_offset(UtcOffset::UTC).unix_timestamp(),
        record.category,
        record.sold,
    );

    let hash_128 = md5::compute(line);
    let mut hash_64 = [0; 8];
    hash_64.copy_from_slice(&hash_128[0..8]);
    i64::from_le_bytes(hash_64)
}

/// Fetch the seed dataset from `url`.
///
/// # Errors
/// Returns [Error::ImportFailure] if the request fails, the server responds
/// with an error status, or the body is not a JSON array of products.
pub async fn fetch_seed_data(url: &str) -> Result<Vec<SeedRecord>, Error> {
    tracing::debug!("Fetching seed data from {url}");

    let response = reqwest::get(url)
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|error| Error::ImportFailure(error.to_string()))?;

    response
        .json::<Vec<SeedRecord>>()
        .await
        .map_err(|error| Error::ImportFailure(error.to_string()))
}

/// Store the seed `records` in the database.
///
/// Either every new record is stored or none are. Records that were already
/// imported are skipped.
///
/// Returns the number of records that were inserted.
///
/// # Errors
/// Returns [Error::SqlError] if the records could not be stored.
pub fn import_seed_records(
    records: Vec<SeedRecord>,
    connection: &Connection,
) -> Result<usize, Error> {
    let builders = records.into_iter().map(SeedRecord::into_builder).collect();

    import_transactions(builders, connection)
}

/// A route handler that loads the seed dataset into the database.
pub async fn initialize_endpoint(State(state): State<SeedState>) -> Response {
    const ERROR_CONTEXT: &str = "Error initializing database";

    let records = match fetch_seed_data(&state.seed_url).await {
        Ok(records) => records,
        Err(error) => return error.into_plain_response(ERROR_CONTEXT),
    };
    let record_count = records.len();

    let result = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| import_seed_records(records, &connection));

    match result {
        Ok(inserted_count) => {
            tracing::info!(
                "Imported {inserted_count} of {record_count} seed records from {}",
                state.seed_url
            );
            (StatusCode::OK, "Database initialized with seed data").into_response()
        }
        Err(error) => error.into_plain_response(ERROR_CONTEXT),
    }
}
