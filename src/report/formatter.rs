//! Shapes the ledger of a month into tables for the document service.
use rusqlite::Connection;
use serde::Serialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Amount, CategoryKind, Error, month::YearMonth};

/// How dates are written in the detail report, e.g. "15/02/2026".
const REPORT_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day]/[month]/[year]");

/// A table to be written as a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    /// The name of the document to create.
    pub filename: String,
    /// The column headers.
    pub headers: Vec<String>,
    /// The cells of each row, in header order.
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    fn new(filename: String, headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            filename,
            headers: headers.iter().map(|header| (*header).to_owned()).collect(),
            rows,
        }
    }
}

/// The totals of each category with transactions in `month`.
///
/// Income categories come first, then expenses, each sorted by name.
///
/// # Errors
/// Returns [Error::NoDataForPeriod] if the month has no transactions, or an
/// [Error::SqlError] if the query fails.
pub fn synthesize_summary(month: YearMonth, connection: &Connection) -> Result<ReportTable, Error> {
    let rows = connection
        .prepare(
            "SELECT c.name, c.kind, SUM(t.amount_cents)
            FROM \"transaction\" t
            INNER JOIN category c ON c.id = t.category_id
            WHERE t.date BETWEEN ?1 AND ?2
            GROUP BY c.id, c.name, c.kind
            ORDER BY c.kind ASC, c.name ASC",
        )?
        .query_map((month.first_day(), month.last_day()), |row| {
            let name: String = row.get(0)?;
            let kind: CategoryKind = row.get(1)?;
            let total = Amount::from_cents(row.get(2)?);

            Ok(vec![name, kind.label().to_owned(), total.to_string()])
        })?
        .collect::<Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        return Err(Error::NoDataForPeriod(month.to_string()));
    }

    Ok(ReportTable::new(
        format!("Report Sintetico {month}"),
        &["Categoria", "Tipo Movimento", "Totale"],
        rows,
    ))
}

/// Every transaction in `month`, oldest first.
///
/// # Errors
/// Returns [Error::NoDataForPeriod] if the month has no transactions, or an
/// [Error::SqlError] if the query fails.
pub fn synthesize_detail(month: YearMonth, connection: &Connection) -> Result<ReportTable, Error> {
    let rows = connection
        .prepare(
            "SELECT t.date, t.amount_cents, COALESCE(t.note, ''), c.name, c.kind
            FROM \"transaction\" t
            INNER JOIN category c ON c.id = t.category_id
            WHERE t.date BETWEEN ?1 AND ?2
            ORDER BY t.date ASC, t.id ASC",
        )?
        .query_map((month.first_day(), month.last_day()), |row| {
            let date: Date = row.get(0)?;
            let amount = Amount::from_cents(row.get(1)?);
            let kind: CategoryKind = row.get(4)?;

            Ok(vec![
                format_report_date(date),
                amount.to_string(),
                row.get(2)?,
                row.get(3)?,
                kind.label().to_owned(),
            ])
        })?
        .collect::<Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        return Err(Error::NoDataForPeriod(month.to_string()));
    }

    Ok(ReportTable::new(
        format!("Report Dettaglio {month}"),
        &["Data Movimento", "Importo", "Nota", "Descrizione", "Tipo Movimento"],
        rows,
    ))
}

fn format_report_date(date: Date) -> String {
    date.format(REPORT_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}
