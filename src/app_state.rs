//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{Error, db::initialize, pagination::PaginationConfig};

/// The URL of the product transaction dataset loaded by the initialize route.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// The year that month numbers in requests refer to.
pub const DEFAULT_REPORT_YEAR: i32 = 2023;

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The year that month numbers in report requests refer to.
    pub report_year: i32,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,

    /// Where the initialize route fetches the seed data from.
    pub seed_url: String,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        report_year: i32,
        pagination_config: PaginationConfig,
        seed_url: &str,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            report_year,
            pagination_config,
            seed_url: seed_url.to_owned(),
        })
    }
}

/// The state needed to answer report queries.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
    /// The year that month numbers in report requests refer to.
    pub report_year: i32,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            report_year: state.report_year,
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The state needed to seed the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where to fetch the seed data from.
    pub seed_url: String,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            seed_url: state.seed_url.clone(),
        }
    }
}
