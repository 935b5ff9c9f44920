//! The API endpoints URIs.

/// The route for recording a new vendor transaction.
pub const INSERT_TRANSACTION: &str = "/insert_transaction";
/// The route existing mobile clients post transactions to.
pub const LEGACY_INSERT_TRANSACTION: &str = "/insert_transaction.php";
