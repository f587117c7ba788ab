//! The year-month key used to select a period of the ledger.

use std::{fmt::Display, str::FromStr};

use serde::{Serialize, Serializer};
use time::{Date, Month, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// The format of dates exchanged with the client, e.g. "2026-02-15".
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// A calendar month, written as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    /// The month containing `date`.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The year of the month.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The first day of the month.
    pub fn first_day(&self) -> Date {
        // Day 1 exists for every month of every year that parsed successfully.
        Date::from_calendar_date(self.year, self.month, 1).unwrap_or(Date::MIN)
    }

    /// The last day of the month.
    pub fn last_day(&self) -> Date {
        self.first_day()
            .replace_day(self.month.length(self.year))
            .unwrap_or(Date::MAX)
    }

    /// Whether `date` falls within the month.
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The Italian name of the month, e.g. "febbraio".
    pub fn italian_name(&self) -> &'static str {
        match self.month {
            Month::January => "gennaio",
            Month::February => "febbraio",
            Month::March => "marzo",
            Month::April => "aprile",
            Month::May => "maggio",
            Month::June => "giugno",
            Month::July => "luglio",
            Month::August => "agosto",
            Month::September => "settembre",
            Month::October => "ottobre",
            Month::November => "novembre",
            Month::December => "dicembre",
        }
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parse a `YYYY-MM` key such as "2026-02".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(s.to_owned());

        if s.len() != 7 {
            return Err(invalid());
        }

        let first_day = Date::parse(&format!("{s}-01"), DATE_FORMAT).map_err(|_| invalid())?;

        Ok(Self::from_date(first_day))
    }
}

/// Parse the `mese` parameter of a request, which must be present.
///
/// # Errors
/// Returns [Error::InvalidMonth] if `param` is missing or malformed.
pub fn require_month(param: Option<&str>) -> Result<YearMonth, Error> {
    param.unwrap_or_default().parse()
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a `YYYY-MM-DD` date sent by the client.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid calendar date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        month::{YearMonth, parse_date, require_month},
    };

    #[test]
    fn parses_month_key() {
        let month: YearMonth = "2026-02".parse().unwrap();

        assert_eq!(month.first_day(), date!(2026 - 02 - 01));
        assert_eq!(month.last_day(), date!(2026 - 02 - 28));
        assert_eq!(month.to_string(), "2026-02");
    }

    #[test]
    fn knows_leap_years() {
        let month: YearMonth = "2024-02".parse().unwrap();
        let december: YearMonth = "2026-12".parse().unwrap();

        assert_eq!(month.last_day(), date!(2024 - 02 - 29));
        assert_eq!(december.last_day(), date!(2026 - 12 - 31));
    }

    #[test]
    fn rejects_invalid_month_keys() {
        for key in ["2026-13", "2026-00", "2026-2", "202602", "", "2026-02-01", "abcd-ef"] {
            assert_eq!(
                key.parse::<YearMonth>(),
                Err(Error::InvalidMonth(key.to_owned())),
                "key {key:?} should be rejected"
            );
        }
    }

    #[test]
    fn contains_only_dates_in_month() {
        let month: YearMonth = "2026-02".parse().unwrap();

        assert!(month.contains(date!(2026 - 02 - 01)));
        assert!(month.contains(date!(2026 - 02 - 28)));
        assert!(!month.contains(date!(2026 - 03 - 01)));
        assert!(!month.contains(date!(2025 - 02 - 15)));
    }

    #[test]
    fn italian_month_names() {
        let month: YearMonth = "2026-02".parse().unwrap();
        let december: YearMonth = "2025-12".parse().unwrap();

        assert_eq!(month.italian_name(), "febbraio");
        assert_eq!(december.italian_name(), "dicembre");
    }

    #[test]
    fn month_parameter_is_required() {
        assert_eq!(require_month(None), Err(Error::InvalidMonth(String::new())));
        assert_eq!(
            require_month(Some("2026-02")),
            Ok("2026-02".parse().unwrap())
        );
    }

    #[test]
    fn parses_dates() {
        assert_eq!(parse_date("2026-02-15"), Ok(date!(2026 - 02 - 15)));
        assert_eq!(
            parse_date("2026-02-30"),
            Err(Error::InvalidDate("2026-02-30".to_owned()))
        );
        assert_eq!(
            parse_date("15/02/2026"),
            Err(Error::InvalidDate("15/02/2026".to_owned()))
        );
    }
}
