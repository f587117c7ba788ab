//! The filtered movement lists shown by the income and category tabs.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::{Query, WithRejection};
use rusqlite::{Connection, ToSql};
use serde::{Deserialize, Serialize};

use crate::{
    Amount, AppState, CategoryKind, Error,
    db::lock_connection,
    field_map::{MovementRow, select_list},
    month::{YearMonth, require_month},
};

/// Which movements of a month to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovementFilter {
    /// Every transaction in an income category.
    Income,
    /// Every transaction in the category with exactly this name.
    Category(String),
}

impl MovementFilter {
    /// Build a filter from the `tipo` and `categoria` request parameters.
    ///
    /// # Errors
    /// Returns [Error::InvalidViewKind] if `kind` is neither `ENTRATE` nor
    /// `CATEGORIA`, or [Error::MissingCategoryName] if `CATEGORIA` is given
    /// without a category name.
    pub fn from_params(kind: Option<&str>, category: Option<&str>) -> Result<Self, Error> {
        match kind.unwrap_or_default() {
            "ENTRATE" => Ok(MovementFilter::Income),
            "CATEGORIA" => match category {
                Some(name) if !name.is_empty() => Ok(MovementFilter::Category(name.to_owned())),
                _ => Err(Error::MissingCategoryName),
            },
            other => Err(Error::InvalidViewKind(other.to_owned())),
        }
    }
}

/// The movements of a month with their total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementList {
    /// Newest first, same-day movements by descending ID.
    #[serde(rename = "movimenti")]
    pub movements: Vec<MovementRow>,
    /// The sum of the listed amounts.
    #[serde(rename = "totale")]
    pub total: Amount,
}

/// List the movements of `month` matching `filter`.
///
/// An unknown category name gives an empty list.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn list_filtered(
    month: YearMonth,
    filter: &MovementFilter,
    connection: &Connection,
) -> Result<MovementList, Error> {
    let (condition, filter_param) = match filter {
        MovementFilter::Income => ("c.kind = ?3", &CategoryKind::Income as &dyn ToSql),
        MovementFilter::Category(name) => ("c.name = ?3", name as &dyn ToSql),
    };

    let query = format!(
        "SELECT {}
        FROM \"transaction\" t
        INNER JOIN category c ON c.id = t.category_id
        WHERE t.date BETWEEN ?1 AND ?2 AND {condition}
        ORDER BY t.date DESC, t.id DESC",
        select_list()
    );

    let first_day = month.first_day();
    let last_day = month.last_day();

    let movements = connection
        .prepare(&query)?
        .query_map(
            &[&first_day as &dyn ToSql, &last_day, filter_param],
            MovementRow::from_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;

    let total = movements.iter().map(|movement| movement.amount).sum();

    Ok(MovementList { movements, total })
}

/// The state needed for the movement list endpoint.
#[derive(Debug, Clone)]
pub struct MovementsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for MovementsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string of the movement list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct MovementsQuery {
    /// The month as `YYYY-MM`.
    pub mese: Option<String>,
    /// Either `ENTRATE` or `CATEGORIA`.
    pub tipo: Option<String>,
    /// The category name when `tipo` is `CATEGORIA`.
    pub categoria: Option<String>,
}

/// A route handler listing the movements of a month for one tab.
pub async fn get_movements_endpoint(
    State(state): State<MovementsState>,
    WithRejection(Query(query), _): WithRejection<Query<MovementsQuery>, Error>,
) -> Result<Json<MovementList>, Error> {
    let month = require_month(query.mese.as_deref())?;
    let filter = MovementFilter::from_params(query.tipo.as_deref(), query.categoria.as_deref())?;

    let connection = lock_connection(&state.db_connection)?;

    list_filtered(month, &filter, &connection).map(Json)
}
