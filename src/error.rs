//! Defines the app level error type and its conversion to plain text responses.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The month in the request is not a calendar month (1-12).
    #[error("{0} is not a valid month, expected a number from 1 to 12")]
    InvalidMonth(u8),

    /// The configured report year cannot be represented as a calendar date.
    #[error("{0} is not a valid report year")]
    InvalidYear(i32),

    /// The page number or page size in the request was zero or too large.
    ///
    /// Pages are 1-indexed and must hold at least one item. The page size and
    /// the number of items before the page must fit in a 64-bit signed integer.
    #[error(
        "page and perPage must be at least 1, and neither perPage nor the number of items before the page may exceed 9223372036854775807"
    )]
    InvalidPagination,

    /// The seed data could not be fetched or decoded.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not fetch seed data: {0}")]
    ImportFailure(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl Error {
    /// Whether the error was caused by a bad request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidMonth(_) | Error::InvalidPagination)
    }

    /// Render the error as a plain text response.
    ///
    /// Client errors are returned as 400 with the error message so the caller
    /// can fix their request. Everything else is logged and replaced with
    /// `context`, e.g. "Error fetching statistics", under a 500 status.
    pub fn into_plain_response(self, context: &str) -> Response {
        if self.is_client_error() {
            return (StatusCode::BAD_REQUEST, self.to_string()).into_response();
        }

        tracing::error!("{context}: {self}");
        (StatusCode::INTERNAL_SERVER_ERROR, context.to_owned()).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.into_plain_response("Something went wrong")
    }
}
