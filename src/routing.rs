//! Application router configuration for the product report API.

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    endpoints::{self, api_path},
    not_found::get_404_not_found,
    report::{
        get_bar_chart_endpoint, get_combined_endpoint, get_pie_chart_endpoint,
        get_statistics_endpoint, get_transactions_endpoint,
    },
    seed::initialize_endpoint,
};

/// Return a router with all the app's routes.
///
/// The product routes are served under `/api/products` and accept requests
/// from any origin.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(&api_path(endpoints::INITIALIZE), get(initialize_endpoint))
        .route(&api_path(endpoints::TRANSACTIONS), get(get_transactions_endpoint))
        .route(&api_path(endpoints::STATISTICS), get(get_statistics_endpoint))
        .route(&api_path(endpoints::BAR_CHART), get(get_bar_chart_endpoint))
        .route(&api_path(endpoints::PIE_CHART), get(get_pie_chart_endpoint))
        .route(&api_path(endpoints::COMBINED), get(get_combined_endpoint))
        .fallback(get_404_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
