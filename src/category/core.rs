//! Defines the category model and its database queries.

use rusqlite::{
    Connection, OptionalExtension, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::Serialize;

use crate::{Error, database_id::CategoryId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money in a category comes in or goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CategoryKind {
    /// Money earned, e.g. salary.
    Income,
    /// Money spent, e.g. bills.
    Expense,
}

impl CategoryKind {
    /// The single-letter code stored in the database.
    pub fn code(self) -> &'static str {
        match self {
            CategoryKind::Income => "E",
            CategoryKind::Expense => "U",
        }
    }

    /// The label shown in reports.
    pub fn label(self) -> &'static str {
        match self {
            CategoryKind::Income => "Entrata",
            CategoryKind::Expense => "Uscita",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "E" => Some(CategoryKind::Income),
            "U" => Some(CategoryKind::Expense),
            _ => None,
        }
    }
}

impl ToSql for CategoryKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for CategoryKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_str()?;

        CategoryKind::from_code(code).ok_or_else(|| {
            FromSqlError::Other(format!("unknown category kind code \"{code}\"").into())
        })
    }
}

/// A named bucket of transactions with a fixed kind, e.g. "Utenze" (expense).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The unique, case-sensitive name of the category.
    pub name: String,
    /// Whether the category holds income or expenses.
    pub kind: CategoryKind,
}

/// The categories a fresh household ledger is seeded with.
pub const DEFAULT_CATEGORIES: [(&str, CategoryKind); 10] = [
    ("Stipendio", CategoryKind::Income),
    ("Altre Entrate", CategoryKind::Income),
    ("Negozi Vari", CategoryKind::Expense),
    ("Ricariche CCR", CategoryKind::Expense),
    ("Divertimento", CategoryKind::Expense),
    ("Macchina", CategoryKind::Expense),
    ("Fisse", CategoryKind::Expense),
    ("Extra", CategoryKind::Expense),
    ("Utenze", CategoryKind::Expense),
    ("Visite/Esami medici", CategoryKind::Expense),
];

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                kind TEXT NOT NULL CHECK (kind IN ('E', 'U'))
                )",
        (),
    )?;

    Ok(())
}

/// Create a category.
///
/// The application never calls this itself: categories are administered
/// outside of it. It exists for seeding databases in tools and tests.
///
/// # Errors
/// Returns an [Error::SqlError] if the name is already taken or there is some other SQL error.
pub fn create_category(
    name: &str,
    kind: CategoryKind,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare("INSERT INTO category (name, kind) VALUES (?1, ?2) RETURNING id, name, kind")?
        .query_row((name, kind), map_category_row)
        .map_err(|error| error.into())
}

/// Find a category by its exact name.
///
/// # Errors
/// Returns an [Error::CategoryNotFound] if no category has the name `name`,
/// or an [Error::SqlError] if there is some other SQL error.
pub fn get_category_by_name(name: &str, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, kind FROM category WHERE name = :name")?
        .query_row(&[(":name", &name)], map_category_row)
        .optional()?
        .ok_or_else(|| Error::CategoryNotFound(name.to_owned()))
}

/// The names of all categories in alphabetical order.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_category_names(connection: &Connection) -> Result<Vec<String>, Error> {
    connection
        .prepare("SELECT name FROM category ORDER BY name ASC")?
        .query_map([], |row| row.get(0))?
        .map(|maybe_name| maybe_name.map_err(|error| error.into()))
        .collect()
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
    })
}
