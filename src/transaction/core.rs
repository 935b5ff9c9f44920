//! Defines the core data models and database queries for vendor transactions.

use rusqlite::{Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use time::Date;

use crate::{
    Error,
    transaction::id::{TransactionId, date_prefix, next_transaction_id},
};

// ============================================================================
// MODELS
// ============================================================================

/// A payment collected from a vendor.
///
/// To record a new `VendorTransaction`, use [insert_vendor_transaction].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorTransaction {
    /// The date-scoped sequential ID, e.g. `20241006-001`.
    pub transaction_id: TransactionId,
    /// The vendor that paid.
    pub vendor_id: String,
    /// The date as sent by the collector.
    ///
    /// This is stored as-is and is not checked to be a real calendar date.
    pub date: String,
    /// The amount collected.
    pub amount: i64,
    /// The collector that recorded the payment.
    pub collector_id: String,
}

/// A vendor transaction that has not been assigned an ID yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVendorTransaction {
    /// The vendor that paid.
    pub vendor_id: String,
    /// The date as sent by the collector.
    pub date: String,
    /// The amount collected.
    pub amount: i64,
    /// The collector that recorded the payment.
    pub collector_id: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Assign the next transaction ID for `today` to `new_transaction` and store it.
///
/// The lookup of the previous ID and the insert run in one `IMMEDIATE`
/// transaction, so concurrent writers to the same database get distinct IDs.
///
/// IDs are only distinct for the first 999 transactions of a day. The lookup
/// compares IDs as text, so once `-1000` is stored `-999` still sorts highest
/// and every later insert that day is also given `-1000`.
///
/// # Errors
/// This function will return an [Error::SqlError] if the previous ID cannot be
/// read or the new row cannot be inserted. Nothing is written on error.
pub fn insert_vendor_transaction(
    new_transaction: NewVendorTransaction,
    today: Date,
    connection: &Connection,
) -> Result<VendorTransaction, Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let prefix = date_prefix(today);
    let last_id = get_last_transaction_id(&prefix, &transaction)?;
    let transaction_id = next_transaction_id(&prefix, last_id.as_deref());

    let vendor_transaction = transaction
        .prepare(
            "INSERT INTO vendor_transaction (transactionID, vendorID, date, amount, collector_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING transactionID, vendorID, date, amount, collector_id",
        )?
        .query_row(
            (
                transaction_id,
                new_transaction.vendor_id,
                new_transaction.date,
                new_transaction.amount,
                new_transaction.collector_id,
            ),
            map_vendor_transaction_row,
        )?;

    transaction.commit()?;

    tracing::info!(
        "Recorded transaction {} for vendor {} by collector {}",
        vendor_transaction.transaction_id,
        vendor_transaction.vendor_id,
        vendor_transaction.collector_id
    );

    Ok(vendor_transaction)
}

/// Get the greatest transaction ID that starts with `prefix` followed by a dash.
///
/// Returns `Ok(None)` if there are no transactions with that prefix.
///
/// # Errors
/// This function will return an [Error::SqlError] if the query fails.
pub fn get_last_transaction_id(
    prefix: &str,
    connection: &Connection,
) -> Result<Option<TransactionId>, Error> {
    // Range scan over IDs starting with "{prefix}-", '.' sorts right after '-'.
    connection
        .prepare(
            "SELECT transactionID FROM vendor_transaction
             WHERE transactionID >= ?1 || '-' AND transactionID < ?1 || '.'
             ORDER BY transactionID DESC
             LIMIT 1",
        )?
        .query_row((prefix,), |row| row.get(0))
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve a vendor transaction from the database by its `transaction_id`.
///
/// If more than one row has the ID, the first one stored is returned.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is no such
/// transaction or there is some other SQL error.
pub fn get_vendor_transaction(
    transaction_id: &str,
    connection: &Connection,
) -> Result<VendorTransaction, Error> {
    let vendor_transaction = connection
        .prepare(
            "SELECT transactionID, vendorID, date, amount, collector_id
             FROM vendor_transaction
             WHERE transactionID = ?1
             ORDER BY rowid
             LIMIT 1",
        )?
        .query_row((transaction_id,), map_vendor_transaction_row)?;

    Ok(vendor_transaction)
}

/// Get the total number of vendor transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_vendor_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(*) FROM vendor_transaction;", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the vendor transaction table in the database.
///
/// `transactionID` is not declared unique, IDs are unique by the way
/// [insert_vendor_transaction] assigns them.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_vendor_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS vendor_transaction (
                transactionID TEXT NOT NULL,
                vendorID TEXT NOT NULL,
                date TEXT NOT NULL,
                amount INTEGER NOT NULL,
                collector_id TEXT NOT NULL
                )",
        (),
    )?;

    // Used to find the last transaction ID of the day.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_vendor_transaction_id ON vendor_transaction(transactionID);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [VendorTransaction].
fn map_vendor_transaction_row(row: &Row) -> Result<VendorTransaction, rusqlite::Error> {
    let transaction_id = row.get(0)?;
    let vendor_id = row.get(1)?;
    let date = row.get(2)?;
    let amount = row.get(3)?;
    let collector_id = row.get(4)?;

    Ok(VendorTransaction {
        transaction_id,
        vendor_id,
        date,
        amount,
        collector_id,
    })
}

// ============================================================================
// TESTS
// ============================================================================
