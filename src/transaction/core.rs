//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Amount, Error,
    category::get_category_by_name,
    database_id::{CategoryId, TransactionId},
    month::parse_date,
};

// ============================================================================
// MODELS
// ============================================================================

/// A dated movement of money in a category, i.e. an income or an expense.
///
/// The amount is always a non-negative magnitude: whether money came in or
/// went out follows from the kind of the category.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// When the transaction happened.
    pub date: Date,
    /// The amount of money earned or spent.
    pub amount: Amount,
    /// Optional free text, e.g. "bolletta luce".
    pub note: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(category_id: CategoryId, date: Date, amount: Amount) -> TransactionBuilder {
        TransactionBuilder {
            category_id,
            date,
            amount,
            note: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// let transaction = Transaction::build(utenze.id, date!(2026 - 02 - 15), Amount::from_cents(4250))
///     .note(Some("bolletta".to_owned()));
/// let transaction = create_transaction(transaction, &connection)?;
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The category of the transaction, e.g. "Utenze".
    pub category_id: CategoryId,
    /// The date when the transaction occurred.
    pub date: Date,
    /// The non-negative amount of the transaction.
    pub amount: Amount,
    /// Optional free text describing the transaction.
    ///
    /// Blank notes are stored as no note.
    pub note: Option<String>,
}

impl TransactionBuilder {
    /// Set the note for the transaction.
    pub fn note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return an [Error::SqlError] if the category does not
/// exist, the amount is negative, or there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let note = builder
        .note
        .map(|note| note.trim().to_owned())
        .filter(|note| !note.is_empty());

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (category_id, date, amount_cents, note)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, category_id, date, amount_cents, note",
        )?
        .query_row(
            (
                builder.category_id,
                builder.date,
                builder.amount.cents(),
                note,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Validate a transaction submitted by the client and store it.
///
/// The inputs are checked in order:
/// 1. `category_name` must name an existing category,
/// 2. `amount` must be a non-negative decimal number,
/// 3. `date` must be a `YYYY-MM-DD` date, or empty to use `today`.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryNotFound] if no category is called `category_name`,
/// - [Error::InvalidAmount] if `amount` is missing or invalid,
/// - [Error::InvalidDate] if `date` is invalid,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_transaction(
    category_name: &str,
    date: Option<&str>,
    amount: Option<&str>,
    note: Option<String>,
    today: Date,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let category = get_category_by_name(category_name, connection)?;

    let amount = Amount::parse_non_negative(amount.unwrap_or_default())?;

    let date = match date.map(str::trim) {
        None | Some("") => today,
        Some(text) => parse_date(text)?,
    };

    create_transaction(
        Transaction::build(category.id, date, amount).note(note),
        connection,
    )
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
#[cfg(test)]
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    use rusqlite::OptionalExtension;

    connection
        .prepare(
            "SELECT id, category_id, date, amount_cents, note FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)
        .optional()?
        .ok_or(Error::NotFound)
}

/// The number of rows removed by a delete.
pub type RowsAffected = usize;

/// Delete the transaction with the ID `id`.
///
/// Deleting a transaction that does not exist is not an error, it simply
/// affects zero rows, so retried deletes are safe.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])
        .map_err(|error| error.into())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// A trigger rejects changes to the kind of a category once transactions
/// reference it.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                amount_cents INTEGER NOT NULL CHECK (amount_cents >= 0),
                note TEXT,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
                )",
        (),
    )?;

    // Index used by the monthly queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_category ON \"transaction\"(date, category_id);",
        (),
    )?;

    connection.execute(
        "CREATE TRIGGER IF NOT EXISTS category_kind_immutable
            BEFORE UPDATE OF kind ON category
            WHEN NEW.kind <> OLD.kind
                AND EXISTS (SELECT 1 FROM \"transaction\" WHERE category_id = OLD.id)
            BEGIN
                SELECT RAISE(ABORT, 'the kind of a category with transactions cannot change');
            END;",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        category_id: row.get(1)?,
        date: row.get(2)?,
        amount: Amount::from_cents(row.get(3)?),
        note: row.get(4)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Amount, Error,
        category::{CategoryKind, create_category},
        db::initialize,
        transaction::{
            Transaction, count_transactions, create_transaction, delete_transaction,
            get_transaction, insert_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_category("Utenze", CategoryKind::Expense, &conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let amount = Amount::from_cents(1230);

        let result = create_transaction(Transaction::build(1, date!(2026 - 02 - 05), amount), &conn);

        match result {
            Ok(transaction) => assert_eq!(transaction.amount, amount),
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_stores_blank_note_as_none() {
        let conn = get_test_connection();

        let transaction = create_transaction(
            Transaction::build(1, date!(2026 - 02 - 05), Amount::from_cents(1))
                .note(Some("   ".to_owned())),
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.note, None);
    }

    #[test]
    fn create_fails_on_invalid_category_id() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(42, date!(2026 - 02 - 05), Amount::from_cents(1)),
            &conn,
        );

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let conn = get_test_connection();
        let today = date!(2026 - 02 - 20);

        let first = insert_transaction("Utenze", None, Some("1"), None, today, &conn).unwrap();
        let second = insert_transaction("Utenze", None, Some("2"), None, today, &conn).unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn insert_defaults_date_to_today() {
        let conn = get_test_connection();
        let today = date!(2026 - 02 - 20);

        let transaction =
            insert_transaction("Utenze", Some(""), Some("42.50"), None, today, &conn).unwrap();

        assert_eq!(transaction.date, today);
        assert_eq!(transaction.amount, Amount::from_cents(4250));
    }

    #[test]
    fn insert_checks_category_before_amount_and_date() {
        let conn = get_test_connection();
        let today = date!(2026 - 02 - 20);

        let result = insert_transaction("Nope", Some("bad"), Some("bad"), None, today, &conn);

        assert_eq!(result, Err(Error::CategoryNotFound("Nope".to_owned())));
    }

    #[test]
    fn insert_checks_amount_before_date() {
        let conn = get_test_connection();
        let today = date!(2026 - 02 - 20);

        let result = insert_transaction("Utenze", Some("bad"), Some("-3"), None, today, &conn);

        assert_eq!(result, Err(Error::InvalidAmount("-3".to_owned())));
    }

    #[test]
    fn insert_rejects_missing_amount() {
        let conn = get_test_connection();
        let today = date!(2026 - 02 - 20);

        let result = insert_transaction("Utenze", None, None, None, today, &conn);

        assert_eq!(result, Err(Error::InvalidAmount(String::new())));
    }

    #[test]
    fn insert_rejects_invalid_date() {
        let conn = get_test_connection();
        let today = date!(2026 - 02 - 20);

        let result =
            insert_transaction("Utenze", Some("2026-02-30"), Some("1"), None, today, &conn);

        assert_eq!(result, Err(Error::InvalidDate("2026-02-30".to_owned())));
        assert_eq!(count_transactions(&conn), Ok(0));
    }

    #[test]
    fn delete_is_idempotent() {
        let conn = get_test_connection();
        let transaction = insert_transaction(
            "Utenze",
            None,
            Some("10"),
            None,
            date!(2026 - 02 - 20),
            &conn,
        )
        .unwrap();

        assert_eq!(delete_transaction(transaction.id, &conn), Ok(1));
        let count_after_first = count_transactions(&conn).unwrap();
        assert_eq!(delete_transaction(transaction.id, &conn), Ok(0));

        assert_eq!(count_transactions(&conn), Ok(count_after_first));
        assert_eq!(get_transaction(transaction.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let today = date!(2026 - 02 - 05);
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction(Transaction::build(1, today, Amount::from_cents(i)), &conn)
                .expect("Could not create transaction");
        }

        let got_count = count_transactions(&conn).expect("Could not get count");

        assert_eq!(want_count as u32, got_count);
    }
}
