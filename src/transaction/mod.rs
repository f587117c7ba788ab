//! Transaction management for the expense tracker.
//!
//! This module contains everything related to individual transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing and deleting transactions
//! - The endpoints for creating and deleting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;

pub use core::{
    Transaction, TransactionBuilder, create_transaction, create_transaction_table,
    delete_transaction, insert_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;

#[cfg(test)]
pub use core::{count_transactions, get_transaction};
