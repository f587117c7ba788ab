//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::{
    AppState, Error,
    app_page::get_app_page,
    auth::{auth_guard, post_log_in},
    category::get_categories_endpoint,
    endpoints,
    ledger::{get_balance_endpoint, get_movements_endpoint},
    report::{chart_report_endpoint, detail_report_endpoint, summary_report_endpoint},
    transaction::{create_transaction_endpoint, delete_transaction_endpoint},
};

/// Return a router with all the app's routes.
///
/// Everything except the page itself and the log-in check requires the app
/// password, including paths that do not exist.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_app_page))
        .route(endpoints::LOG_IN, post(post_log_in));

    let protected_routes = Router::new()
        .route(endpoints::BALANCE, get(get_balance_endpoint))
        .route(
            endpoints::MOVEMENTS,
            get(get_movements_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::MOVEMENT, delete(delete_transaction_endpoint))
        .route(endpoints::CATEGORIES, get(get_categories_endpoint))
        .route(endpoints::REPORT, post(summary_report_endpoint))
        .route(endpoints::REPORT_DETAIL, post(detail_report_endpoint))
        .route(endpoints::REPORT_CHART, post(chart_report_endpoint))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .with_state(state)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}
