//! The monthly balance of income against expense.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::{Query, WithRejection};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Amount, AppState, Error,
    db::lock_connection,
    month::{YearMonth, require_month},
};

/// The totals of a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyBalance {
    /// The month the totals cover.
    #[serde(rename = "MESE_ANNO")]
    pub month: YearMonth,
    /// The sum of transactions in income categories.
    #[serde(rename = "TOTALE_ENTRATE")]
    pub income: Amount,
    /// The sum of transactions in expense categories.
    #[serde(rename = "TOTALE_USCITE")]
    pub expense: Amount,
    /// Income minus expense, may be negative.
    #[serde(rename = "SALDO")]
    pub balance: Amount,
}

/// Sum the income and expense of `month`.
///
/// A month without transactions has zero totals.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn compute_monthly_balance(
    month: YearMonth,
    connection: &Connection,
) -> Result<MonthlyBalance, Error> {
    let (income, expense): (i64, i64) = connection
        .prepare(
            "SELECT
                COALESCE(SUM(CASE WHEN c.kind = 'E' THEN t.amount_cents ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN c.kind = 'U' THEN t.amount_cents ELSE 0 END), 0)
            FROM \"transaction\" t
            INNER JOIN category c ON c.id = t.category_id
            WHERE t.date BETWEEN ?1 AND ?2",
        )?
        .query_row((month.first_day(), month.last_day()), |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;

    let income = Amount::from_cents(income);
    let expense = Amount::from_cents(expense);

    Ok(MonthlyBalance {
        month,
        income,
        expense,
        balance: income - expense,
    })
}

/// The state needed for the balance endpoint.
#[derive(Debug, Clone)]
pub struct BalanceState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BalanceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string of the balance endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct BalanceQuery {
    /// The month as `YYYY-MM`.
    pub mese: Option<String>,
}

/// A route handler returning the balance of the month in `?mese=YYYY-MM`.
pub async fn get_balance_endpoint(
    State(state): State<BalanceState>,
    WithRejection(Query(query), _): WithRejection<Query<BalanceQuery>, Error>,
) -> Result<Json<MonthlyBalance>, Error> {
    let month = require_month(query.mese.as_deref())?;
    let connection = lock_connection(&state.db_connection)?;

    compute_monthly_balance(month, &connection).map(Json)
}
