//! Expense totals per category.
use rusqlite::Connection;

use crate::{Amount, Error, month::YearMonth};

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    /// The name of the expense category.
    pub category_name: String,
    /// The sum of the category's transactions.
    pub total: Amount,
}

/// The expense categories with a non-zero total in `month`.
///
/// Ordered by total, largest first, with ties broken by category name.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn category_breakdown(
    month: YearMonth,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT c.name, SUM(t.amount_cents) AS total
            FROM \"transaction\" t
            INNER JOIN category c ON c.id = t.category_id
            WHERE c.kind = 'U' AND t.date BETWEEN ?1 AND ?2
            GROUP BY c.id, c.name
            HAVING total > 0
            ORDER BY total DESC, c.name ASC",
        )?
        .query_map((month.first_day(), month.last_day()), |row| {
            Ok(CategoryTotal {
                category_name: row.get(0)?,
                total: Amount::from_cents(row.get(1)?),
            })
        })?
        .map(|maybe_total| maybe_total.map_err(Error::from))
        .collect()
}
