use rusqlite::Connection;

use crate::{
    DEFAULT_CATEGORIES, category::create_category, db::initialize, month::parse_date,
    transaction::insert_transaction,
};

/// An in-memory database with the default categories.
pub(crate) fn seeded_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database");
    initialize(&connection).expect("Could not initialize database");

    for (name, kind) in DEFAULT_CATEGORIES {
        create_category(name, kind, &connection).expect("Could not create category");
    }

    connection
}

/// Insert a transaction and return its ID.
#[track_caller]
pub(crate) fn add_transaction(
    connection: &Connection,
    category: &str,
    date: &str,
    amount: &str,
    note: Option<&str>,
) -> i64 {
    let today = parse_date(date).expect("Invalid test date");

    insert_transaction(
        category,
        Some(date),
        Some(amount),
        note.map(str::to_owned),
        today,
        connection,
    )
    .expect("Could not insert transaction")
    .id
}
