//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error, amount::AmountInput, db::lock_connection, timezone::local_today,
    transaction::insert_transaction,
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Rome".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The JSON body for creating a transaction.
///
/// Every field is optional at this level so that validation errors are
/// reported in a fixed order by [insert_transaction].
#[derive(Debug, Default, Deserialize)]
pub struct TransactionPayload {
    /// The exact name of the category.
    #[serde(default)]
    pub categoria: String,
    /// The date as `YYYY-MM-DD`, defaults to today.
    #[serde(default)]
    pub data: Option<String>,
    /// The non-negative amount, as a string or a number.
    #[serde(default)]
    pub importo: Option<AmountInput>,
    /// An optional note.
    #[serde(default)]
    pub nota: Option<String>,
}

/// A route handler for creating a new transaction.
///
/// Responds with `{"success": true, "id": <new ID>}`.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    WithRejection(Json(payload), _): WithRejection<Json<TransactionPayload>, Error>,
) -> Result<Json<Value>, Error> {
    let today = local_today(&state.local_timezone)?;
    let amount = payload.importo.as_ref().map(AmountInput::as_text);

    let connection = lock_connection(&state.db_connection)?;

    let transaction = insert_transaction(
        &payload.categoria,
        payload.data.as_deref(),
        amount.as_deref(),
        payload.nota,
        today,
        &connection,
    )
    .inspect_err(|error| tracing::warn!("could not create transaction: {error}"))?;

    tracing::info!(
        "created transaction {} in category \"{}\"",
        transaction.id,
        payload.categoria
    );

    Ok(Json(json!({ "success": true, "id": transaction.id })))
}

#[cfg(test)]
mod tests {
    use std::{
        marker::PhantomData,
        sync::{Arc, Mutex},
    };

    use axum::{Json, extract::State};
    use axum_extra::extract::WithRejection;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Amount, Error,
        amount::AmountInput,
        category::{CategoryKind, create_category},
        db::initialize,
        transaction::{
            count_transactions,
            create_endpoint::{CreateTransactionState, TransactionPayload},
            create_transaction_endpoint, get_transaction,
        },
    };

    fn get_test_state() -> CreateTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_category("Utenze", CategoryKind::Expense, &conn).unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();
        let payload = TransactionPayload {
            categoria: "Utenze".to_owned(),
            data: Some("2026-02-15".to_owned()),
            importo: Some(AmountInput::Text("42.50".to_owned())),
            nota: Some("bolletta".to_owned()),
        };

        let response =
            create_transaction_endpoint(State(state.clone()), WithRejection(Json(payload), PhantomData))
                .await
                .unwrap();

        assert_eq!(response.0["success"], true);
        let id = response.0["id"].as_i64().unwrap();
        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(id, &connection).unwrap();
        assert_eq!(transaction.amount, Amount::from_cents(4250));
        assert_eq!(transaction.date, date!(2026 - 02 - 15));
        assert_eq!(transaction.note.as_deref(), Some("bolletta"));
    }

    #[tokio::test]
    async fn rejects_unknown_category() {
        let state = get_test_state();
        let payload = TransactionPayload {
            categoria: "Vacanze".to_owned(),
            importo: Some(AmountInput::Text("10".to_owned())),
            ..Default::default()
        };

        let result =
            create_transaction_endpoint(State(state.clone()), WithRejection(Json(payload), PhantomData))
                .await;

        assert_eq!(
            result.unwrap_err(),
            Error::CategoryNotFound("Vacanze".to_owned())
        );
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection), Ok(0));
    }
}
