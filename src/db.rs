//! Sets up the application's SQLite database and hands out the shared connection.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, category::create_category_table, transaction::create_transaction_table};

/// Create the tables for the domain models if they do not exist yet.
///
/// Foreign key enforcement is switched on for `connection`, so every
/// transaction must reference an existing category.
///
/// # Errors
/// Returns an error if the tables cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the shared database connection for the duration of a request.
///
/// The guard must be dropped before awaiting anything else, e.g. calls to the
/// report services.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub(crate) fn lock_connection(
    db_connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Amount,
        category::{CategoryKind, create_category},
        db::initialize,
        transaction::{Transaction, create_transaction},
    };

    #[test]
    fn initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();
        initialize(&conn).unwrap();
    }

    #[test]
    fn transactions_require_existing_category() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO \"transaction\" (category_id, date, amount_cents) VALUES (42, '2026-02-01', 100)",
            (),
        );

        assert!(result.is_err());
    }

    #[test]
    fn category_kind_is_immutable_once_referenced() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let category = create_category("Utenze", CategoryKind::Expense, &conn).unwrap();
        create_transaction(
            Transaction::build(category.id, date!(2026 - 02 - 15), Amount::from_cents(100)),
            &conn,
        )
        .unwrap();

        let result = conn.execute(
            "UPDATE category SET kind = 'E' WHERE id = ?1",
            (category.id,),
        );

        assert!(result.is_err());
    }

    #[test]
    fn unreferenced_category_kind_can_change() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let category = create_category("Utenze", CategoryKind::Expense, &conn).unwrap();

        let rows = conn
            .execute(
                "UPDATE category SET kind = 'E' WHERE id = ?1",
                (category.id,),
            )
            .unwrap();

        assert_eq!(rows, 1);
    }
}
