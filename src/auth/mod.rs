//! The shared-password gate in front of the JSON API.
//!
//! There are no users or sessions: every request carries the app password in
//! the [APP_PASSWORD_HEADER] header and is checked against one [AppSecret].

mod log_in;
mod middleware;
mod secret;

pub use log_in::post_log_in;
pub use middleware::auth_guard;
pub use secret::AppSecret;

/// The request header carrying the app password.
pub const APP_PASSWORD_HEADER: &str = "x-app-password";
