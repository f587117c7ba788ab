//! Defines the endpoint that lists category names.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{AppState, Error, category::get_category_names, db::lock_connection};

/// The state needed to list categories.
#[derive(Debug, Clone)]
pub struct CategoriesState {
    /// The database connection for reading categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the names of all categories, sorted alphabetically.
pub async fn get_categories_endpoint(
    State(state): State<CategoriesState>,
) -> Result<Json<Vec<String>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_category_names(&connection)
        .inspect_err(|error| tracing::error!("could not get categories: {error}"))
        .map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;

    use crate::{
        category::{
            CategoryKind, create_category, get_categories_endpoint,
            list_endpoint::CategoriesState,
        },
        db::initialize,
    };

    #[tokio::test]
    async fn lists_category_names() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_category("Utenze", CategoryKind::Expense, &conn).unwrap();
        create_category("Stipendio", CategoryKind::Income, &conn).unwrap();
        let state = CategoriesState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let names = get_categories_endpoint(State(state)).await.unwrap();

        assert_eq!(names.0, vec!["Stipendio", "Utenze"]);
    }
}
