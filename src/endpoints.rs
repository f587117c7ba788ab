//! The URIs of the page and the JSON API.
//!
//! Tests build the path of a single transaction with `movement_endpoint`.

/// The single HTML page, served without the app password.
pub const ROOT: &str = "/";

/// The route for checking the app password.
pub const LOG_IN: &str = "/api/login";
/// The route for the monthly balance.
pub const BALANCE: &str = "/api/bilancio";
/// The route to list and create transactions.
pub const MOVEMENTS: &str = "/api/movimenti";
/// The route to delete a single transaction.
pub const MOVEMENT: &str = "/api/movimenti/{transaction_id}";
/// The route listing the category names.
pub const CATEGORIES: &str = "/api/categorie";
/// The route exporting the per-category summary of a month.
pub const REPORT: &str = "/api/report";
/// The route exporting every transaction of a month.
pub const REPORT_DETAIL: &str = "/api/report/detail";
/// The route rendering the expense chart of a month.
pub const REPORT_CHART: &str = "/api/report/chart";

/// The path deleting the transaction `id`.
#[cfg(test)]
pub fn movement_endpoint(id: i64) -> String {
    MOVEMENT.replace("{transaction_id}", &id.to_string())
}

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints::{self, movement_endpoint};

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::BALANCE);
        assert_endpoint_is_valid_uri(endpoints::MOVEMENTS);
        assert_endpoint_is_valid_uri(endpoints::MOVEMENT);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES);
        assert_endpoint_is_valid_uri(endpoints::REPORT);
        assert_endpoint_is_valid_uri(endpoints::REPORT_DETAIL);
        assert_endpoint_is_valid_uri(endpoints::REPORT_CHART);
    }

    #[test]
    fn movement_endpoint_fills_in_id() {
        let path = movement_endpoint(42);

        assert_eq!(path, "/api/movimenti/42");
        assert!(path.parse::<Uri>().is_ok());
    }
}
