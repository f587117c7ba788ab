//! Route handlers that build a report and hand it to the external services.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    db::lock_connection,
    month::require_month,
    report::{ReportClient, synthesize_chart, synthesize_detail, synthesize_summary},
};

/// The state needed to generate reports.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The client for the document and chart services.
    pub report_client: ReportClient,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            report_client: state.report_client.clone(),
        }
    }
}

/// The body of a report request.
#[derive(Debug, Default, Deserialize)]
pub struct ReportRequest {
    /// The month as `YYYY-MM`.
    #[serde(default)]
    pub mese: Option<String>,
}

fn report_created(url: String) -> Json<Value> {
    Json(json!({ "success": true, "url": url }))
}

/// A route handler that exports the per-category totals of a month.
pub async fn summary_report_endpoint(
    State(state): State<ReportState>,
    WithRejection(Json(request), _): WithRejection<Json<ReportRequest>, Error>,
) -> Result<Json<Value>, Error> {
    let month = require_month(request.mese.as_deref())?;

    let table = {
        let connection = lock_connection(&state.db_connection)?;
        synthesize_summary(month, &connection)?
    };

    state.report_client.upload_table(&table).await.map(report_created)
}

/// A route handler that exports every transaction of a month.
pub async fn detail_report_endpoint(
    State(state): State<ReportState>,
    WithRejection(Json(request), _): WithRejection<Json<ReportRequest>, Error>,
) -> Result<Json<Value>, Error> {
    let month = require_month(request.mese.as_deref())?;

    let table = {
        let connection = lock_connection(&state.db_connection)?;
        synthesize_detail(month, &connection)?
    };

    state.report_client.upload_table(&table).await.map(report_created)
}

/// A route handler that renders the expense chart of a month.
pub async fn chart_report_endpoint(
    State(state): State<ReportState>,
    WithRejection(Json(request), _): WithRejection<Json<ReportRequest>, Error>,
) -> Result<Json<Value>, Error> {
    let month = require_month(request.mese.as_deref())?;

    let chart = {
        let connection = lock_connection(&state.db_connection)?;
        synthesize_chart(month, &connection)?
    };

    state.report_client.render_chart(&chart).await.map(report_created)
}
