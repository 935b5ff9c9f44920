//! Vendor transactions.
//!
//! This module contains everything related to recording a vendor transaction:
//! - The `VendorTransaction` model and its date-scoped sequential ID
//! - Database functions for storing and querying transactions
//! - The endpoint that collectors submit transactions to

mod core;
mod form;
mod id;
mod insert_endpoint;

pub use core::{
    NewVendorTransaction, VendorTransaction, count_vendor_transactions,
    create_vendor_transaction_table, get_vendor_transaction, insert_vendor_transaction,
};
pub use form::InsertTransactionForm;
pub use id::TransactionId;
pub use insert_endpoint::{InsertTransactionResponse, ResponseStatus, insert_transaction_endpoint};

#[cfg(test)]
pub use core::get_last_transaction_id;
#[cfg(test)]
pub use id::date_prefix;
