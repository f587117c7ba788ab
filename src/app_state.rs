//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error, auth::AppSecret, db::initialize, report::ReportClient, timezone::get_local_offset,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The app password that grants access to the API.
    pub app_secret: AppSecret,

    /// The local timezone as a canonical timezone name, e.g. "Europe/Rome".
    pub local_timezone: String,

    /// The client for the external report services.
    pub report_client: ReportClient,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Europe/Rome".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the timezone is not known.
    pub fn new(
        db_connection: Connection,
        app_secret: AppSecret,
        local_timezone: &str,
        report_client: ReportClient,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        initialize(&db_connection)?;

        Ok(Self {
            app_secret,
            local_timezone: local_timezone.to_owned(),
            report_client,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{AppSecret, AppState, Error, ReportClient, ReportConfig};

    #[test]
    fn rejects_unknown_timezone() {
        let result = AppState::new(
            Connection::open_in_memory().unwrap(),
            AppSecret::new("casa2026"),
            "Mars/Olympus_Mons",
            ReportClient::new(ReportConfig::default()).unwrap(),
        );

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned())
        );
    }
}
