//! Defines the endpoint for deleting a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, Error, database_id::TransactionId, db::lock_connection,
    transaction::delete_transaction,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction.
///
/// Responds with `{"success": true}` whether or not the transaction existed,
/// so clients can safely retry a delete that timed out.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Value>, Error> {
    let Ok(transaction_id) = transaction_id.parse::<TransactionId>() else {
        tracing::debug!("ignoring delete of non-numeric transaction ID {transaction_id:?}");
        return Ok(Json(json!({ "success": true })));
    };

    let connection = lock_connection(&state.db_connection)?;

    match delete_transaction(transaction_id, &connection)? {
        0 => tracing::debug!("transaction {transaction_id} was already deleted"),
        _ => tracing::info!("deleted transaction {transaction_id}"),
    }

    Ok(Json(json!({ "success": true })))
}
