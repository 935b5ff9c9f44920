//! The JSON response for routes that do not exist.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::InsertTransactionResponse;

/// A route handler for any route that is not defined by the router.
pub async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(InsertTransactionResponse::error("Not found".to_owned())),
    )
        .into_response()
}
