//! The mapping between ledger storage columns and the field names of movement rows in the API.
//!
//! Queries select columns in the order of [MOVEMENT_FIELDS] and serialization
//! walks the same table, so a column can only be renamed in one place.

use serde::{Serialize, Serializer, ser::SerializeMap};
use time::Date;

use crate::{
    Amount,
    database_id::TransactionId,
    month::DATE_FORMAT,
};

/// A column of a movement row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementColumn {
    /// The transaction ID.
    Id,
    /// The amount of the transaction.
    Amount,
    /// The optional note.
    Note,
    /// The date of the transaction.
    Date,
    /// The name of the transaction's category.
    CategoryName,
}

#[cfg(test)]
impl MovementColumn {
    /// Every column, in select order.
    pub const ALL: [MovementColumn; 5] = [
        MovementColumn::Id,
        MovementColumn::Amount,
        MovementColumn::Note,
        MovementColumn::Date,
        MovementColumn::CategoryName,
    ];
}

/// Storage column and API field name for each movement column, in select order.
///
/// The storage columns assume the transaction table is aliased `t` and the
/// category table `c`.
pub const MOVEMENT_FIELDS: [(MovementColumn, &str, &str); 5] = [
    (MovementColumn::Id, "t.id", "ID_MOVIMENTO"),
    (MovementColumn::Amount, "t.amount_cents", "IMPORTO"),
    (MovementColumn::Note, "t.note", "NOTA"),
    (MovementColumn::Date, "t.date", "DATA_MOVIMENTO"),
    (MovementColumn::CategoryName, "c.name", "DESCRIZIONE"),
];

/// The comma separated storage columns for a `SELECT` clause.
pub fn select_list() -> String {
    MOVEMENT_FIELDS
        .iter()
        .map(|(_, sql_column, _)| *sql_column)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The position of `column` in the rows produced by [select_list].
pub fn index_of(column: MovementColumn) -> usize {
    MOVEMENT_FIELDS
        .iter()
        .position(|(candidate, _, _)| *candidate == column)
        .unwrap_or(MOVEMENT_FIELDS.len())
}

/// A transaction joined with its category name, as listed by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementRow {
    /// The transaction ID.
    pub id: TransactionId,
    /// The amount of the transaction.
    pub amount: Amount,
    /// The optional note.
    pub note: Option<String>,
    /// The date of the transaction.
    pub date: Date,
    /// The name of the transaction's category.
    pub category_name: String,
}

impl MovementRow {
    /// Map a row selected with [select_list].
    pub fn from_row(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(index_of(MovementColumn::Id))?,
            amount: Amount::from_cents(row.get(index_of(MovementColumn::Amount))?),
            note: row.get(index_of(MovementColumn::Note))?,
            date: row.get(index_of(MovementColumn::Date))?,
            category_name: row.get(index_of(MovementColumn::CategoryName))?,
        })
    }
}

impl Serialize for MovementRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MOVEMENT_FIELDS.len()))?;

        for (column, _, api_name) in MOVEMENT_FIELDS {
            match column {
                MovementColumn::Id => map.serialize_entry(api_name, &self.id)?,
                MovementColumn::Amount => map.serialize_entry(api_name, &self.amount)?,
                MovementColumn::Note => map.serialize_entry(api_name, &self.note)?,
                MovementColumn::Date => {
                    let date = self
                        .date
                        .format(DATE_FORMAT)
                        .map_err(serde::ser::Error::custom)?;
                    map.serialize_entry(api_name, &date)?
                }
                MovementColumn::CategoryName => {
                    map.serialize_entry(api_name, &self.category_name)?
                }
            }
        }

        map.end()
    }
}
