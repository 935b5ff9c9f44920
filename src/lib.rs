//! Bangketicket API records vendor payment collections.
//!
//! This library provides a small HTTP API that accepts a transaction from a
//! collector, assigns it a date-scoped sequential ID (e.g. `20241006-001`) and
//! stores it in a SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
mod logging;
mod not_found;
mod routing;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use endpoints::{INSERT_TRANSACTION, LEGACY_INSERT_TRANSACTION};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use transaction::{
    InsertTransactionForm, InsertTransactionResponse, NewVendorTransaction, ResponseStatus,
    TransactionId, VendorTransaction, count_vendor_transactions, get_vendor_transaction,
    insert_vendor_transaction,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more of the required form fields were missing, or the request
    /// body could not be read as a form.
    #[error("Invalid input data")]
    InvalidInput,

    /// An unhandled/unexpected SQL error.
    ///
    /// This covers both looking up the previous transaction ID and inserting
    /// the new row. The database's error text is passed on to the client.
    #[error("Error inserting transaction: {0}")]
    SqlError(rusqlite::Error),

    /// The configured timezone is not a valid, canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

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

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = match &self {
            // Clients only look at the `status` field, so request and database
            // errors keep the 200 status code.
            Error::InvalidInput | Error::SqlError(_) => StatusCode::OK,
            Error::InvalidTimezone(timezone) => {
                tracing::error!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status_code,
            Json(InsertTransactionResponse::error(self.to_string())),
        )
            .into_response()
    }
}
