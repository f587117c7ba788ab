//! The endpoint the page uses to check a password before storing it.

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppState, Error, auth::AppSecret};

/// The state needed to check a log-in attempt.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The app password attempts are checked against.
    pub app_secret: AppSecret,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            app_secret: state.app_secret.clone(),
        }
    }
}

/// The password entered on the log-in form.
#[derive(Clone, Deserialize)]
pub struct LogInData {
    /// Password entered during log-in.
    #[serde(default)]
    pub password: String,
}

/// Handler for log-in requests.
///
/// Responds with `{"success": true}` if the password is correct.
///
/// # Errors
/// Returns [Error::Unauthorized] if the password is wrong.
pub async fn post_log_in(
    State(state): State<LoginState>,
    WithRejection(Json(log_in_data), _): WithRejection<Json<LogInData>, Error>,
) -> Result<Json<Value>, Error> {
    if state.app_secret.verify(&log_in_data.password) {
        tracing::info!("successful log-in");
        Ok(Json(json!({ "success": true })))
    } else {
        tracing::warn!("failed log-in attempt");
        Err(Error::Unauthorized)
    }
}
