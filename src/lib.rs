//! Spese is a web app for tracking household income and expenses.
//!
//! This library provides a JSON API over a SQLite ledger, a single HTML page
//! that drives it, and the plumbing that exports monthly reports to external
//! spreadsheet and chart services.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::QueryRejection;
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod amount;
mod app_page;
mod app_state;
mod auth;
mod category;
mod database_id;
mod db;
mod endpoints;
mod field_map;
mod html;
mod ledger;
mod logging;
mod month;
mod report;
mod routing;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;

pub use amount::Amount;
pub use app_state::AppState;
pub use auth::{APP_PASSWORD_HEADER, AppSecret};
pub use category::{Category, CategoryKind, DEFAULT_CATEGORIES, create_category};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::YearMonth;
pub use report::{ReportClient, ReportConfig};
pub use routing::build_router;
pub use transaction::{Transaction, TransactionBuilder, create_transaction};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The shared secret was missing from the request or did not match.
    #[error("missing or invalid app password")]
    Unauthorized,

    /// A transaction referenced a category name that does not exist.
    ///
    /// Names are matched exactly, so "utenze" does not match "Utenze".
    #[error("the category \"{0}\" does not exist")]
    CategoryNotFound(String),

    /// The amount could not be parsed as a non-negative decimal number.
    #[error("\"{0}\" is not a valid non-negative amount")]
    InvalidAmount(String),

    /// The date could not be parsed as a `YYYY-MM-DD` calendar date.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The month could not be parsed as a `YYYY-MM` key.
    #[error("\"{0}\" is not a valid month, expected YYYY-MM")]
    InvalidMonth(String),

    /// The JSON body or the query string could not be read into the expected shape.
    #[error("the request could not be read: {0}")]
    InvalidRequest(String),

    /// The list view kind was not one of the supported values.
    #[error("\"{0}\" is not a valid list type, expected ENTRATE or CATEGORIA")]
    InvalidViewKind(String),

    /// A single-category list was requested without naming the category.
    #[error("a category name is required for a single-category list")]
    MissingCategoryName,

    /// A report was requested for a month with nothing to export.
    #[error("there is no data to export for {0}")]
    NoDataForPeriod(String),

    /// The external document or chart service failed or was unreachable.
    ///
    /// The message comes from the upstream service and is shown to the client.
    #[error("the report service failed: {0}")]
    UpstreamFailure(String),

    /// The requested route does not exist.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.to_string())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::CategoryNotFound(_)
            | Error::InvalidAmount(_)
            | Error::InvalidDate(_)
            | Error::InvalidMonth(_)
            | Error::InvalidRequest(_)
            | Error::InvalidViewKind(_)
            | Error::MissingCategoryName => StatusCode::BAD_REQUEST,
            Error::NoDataForPeriod(_) | Error::NotFound => StatusCode::NOT_FOUND,
            Error::UpstreamFailure(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the user of the web page.
    fn user_message(&self) -> String {
        match self {
            Error::Unauthorized => "Password errata o mancante.".to_owned(),
            Error::CategoryNotFound(_) => "Categoria non trovata".to_owned(),
            Error::InvalidAmount(amount) => format!("Importo non valido: \"{amount}\""),
            Error::InvalidDate(date) => format!("Data non valida: \"{date}\""),
            Error::InvalidMonth(month) => format!("Mese non valido: \"{month}\""),
            Error::InvalidRequest(_) => "Richiesta non valida.".to_owned(),
            Error::InvalidViewKind(kind) => format!("Tipo di elenco non valido: \"{kind}\""),
            Error::MissingCategoryName => "Specificare la categoria da visualizzare.".to_owned(),
            Error::NoDataForPeriod(month) => format!("Nessun dato da esportare per {month}."),
            Error::UpstreamFailure(message) => message.clone(),
            Error::NotFound => "Risorsa non trovata.".to_owned(),
            Error::SqlError(_) | Error::DatabaseLockError | Error::InvalidTimezoneError(_) => {
                "Si è verificato un errore imprevisto, controllare i log del server.".to_owned()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        } else if let Error::InvalidRequest(_) = &self {
            tracing::warn!("{}", self);
        }

        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{Error, test_utils::json_body};

    async fn error_body(error: Error) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();

        (status, json_body(response).await)
    }

    #[tokio::test]
    async fn category_not_found_is_bad_request() {
        let (status, body) = error_body(Error::CategoryNotFound("Foo".to_owned())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Categoria non trovata");
    }

    #[tokio::test]
    async fn no_data_is_not_found() {
        let (status, _) = error_body(Error::NoDataForPeriod("2026-02".to_owned())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn upstream_failure_surfaces_message() {
        let (status, body) =
            error_body(Error::UpstreamFailure("quota exceeded".to_owned())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "quota exceeded");
    }

    #[tokio::test]
    async fn storage_failure_hides_details() {
        let (status, body) = error_body(Error::SqlError(
            rusqlite::Error::InvalidColumnName("secret_column".to_owned()),
        ))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["error"].as_str().unwrap().contains("secret_column"));
    }

    #[tokio::test]
    async fn unreadable_request_is_bad_request() {
        let (status, body) =
            error_body(Error::InvalidRequest("missing field `mese`".to_owned())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Richiesta non valida.");
    }

    #[tokio::test]
    async fn unauthorized_is_401() {
        let (status, body) = error_body(Error::Unauthorized).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
    }
}
