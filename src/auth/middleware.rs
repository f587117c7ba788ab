//! Middleware that rejects requests without the app password.

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    auth::{APP_PASSWORD_HEADER, AppSecret},
};

/// The state needed for the auth middleware
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The app password requests are checked against.
    pub app_secret: AppSecret,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            app_secret: state.app_secret.clone(),
        }
    }
}

/// Middleware function that checks the app password header.
///
/// The request is executed normally if the header matches the app password,
/// otherwise a 401 response is returned before the request body is read.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let is_password_valid = request
        .headers()
        .get(APP_PASSWORD_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|password| state.app_secret.verify(password));

    match is_password_valid {
        Some(true) => next.run(request).await,
        Some(false) => {
            tracing::warn!(
                "rejected request to {} with wrong app password",
                request.uri().path()
            );
            Error::Unauthorized.into_response()
        }
        None => {
            tracing::debug!(
                "rejected request to {} without app password",
                request.uri().path()
            );
            Error::Unauthorized.into_response()
        }
    }
}
