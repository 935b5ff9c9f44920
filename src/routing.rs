//! Application router configuration.

use axum::{Router, middleware, routing::post};

use crate::{
    AppState, endpoints, logging::logging_middleware, not_found::get_404_not_found,
    transaction::insert_transaction_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::INSERT_TRANSACTION,
            post(insert_transaction_endpoint),
        )
        .route(
            endpoints::LEGACY_INSERT_TRANSACTION,
            post(insert_transaction_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
