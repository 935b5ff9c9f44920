//! Defines the endpoint for recording a new vendor transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    timezone::get_local_date,
    transaction::{TransactionId, form::InsertTransactionForm, insert_vendor_transaction},
};

/// The state needed to record a vendor transaction.
#[derive(Debug, Clone)]
pub struct InsertTransactionState {
    /// The database connection for storing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for InsertTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Whether a request succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The transaction was recorded.
    Success,
    /// The transaction was not recorded, see the message for why.
    Error,
}

/// The JSON body returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertTransactionResponse {
    /// Whether the transaction was recorded.
    pub status: ResponseStatus,
    /// A human readable description of the outcome.
    pub message: String,
    /// Only set on success.
    #[serde(
        rename = "transactionID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub transaction_id: Option<TransactionId>,
}

impl InsertTransactionResponse {
    /// The response for a transaction that was recorded as `transaction_id`.
    pub fn success(transaction_id: TransactionId) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: "Transaction inserted successfully".to_owned(),
            transaction_id: Some(transaction_id),
        }
    }

    /// The response for a request that failed with `message`.
    pub fn error(message: String) -> Self {
        Self {
            status: ResponseStatus::Error,
            message,
            transaction_id: None,
        }
    }
}

/// A route handler for recording a vendor transaction.
///
/// Responds with the new transaction ID on success. Missing fields and
/// database errors are reported in the JSON body.
pub async fn insert_transaction_endpoint(
    State(state): State<InsertTransactionState>,
    form: InsertTransactionForm,
) -> Response {
    let new_transaction = match form.validate() {
        Ok(new_transaction) => new_transaction,
        Err(error) => {
            tracing::debug!("Rejected transaction form: {error}");
            return error.into_response();
        }
    };

    let Some(today) = get_local_date(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezone(state.local_timezone).into_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match insert_vendor_transaction(new_transaction, today, &connection) {
        Ok(transaction) => {
            Json(InsertTransactionResponse::success(transaction.transaction_id)).into_response()
        }
        Err(error) => {
            tracing::error!("could not insert transaction: {error}");
            error.into_response()
        }
    }
}
