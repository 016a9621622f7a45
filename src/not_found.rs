//! The response for routes that do not exist.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// The fallback route handler for unknown paths.
pub async fn get_404_not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
