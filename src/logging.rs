//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, HeaderValue, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::auth::APP_PASSWORD_HEADER;

/// Bodies longer than this many bytes are truncated in `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full text is logged at the `debug` level.
/// The app password is never logged, whether it is sent as a header or as the
/// `password` field of a JSON body.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return axum::http::StatusCode::BAD_REQUEST.into_response();
        }
    };

    let body_text = if is_json(&parts.headers) {
        redact_json_password(&body)
    } else {
        String::from_utf8_lossy(&body).to_string()
    };
    tracing::info!(
        "Received request: {} {}\nheaders: {:#?}",
        parts.method,
        parts.uri,
        redact_headers(&parts.headers)
    );
    log_body("request", &body_text);

    let request = Request::from_parts(parts, Body::from(body));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            Bytes::new()
        }
    };

    tracing::info!(
        "Sending response: {}\nheaders: {:#?}",
        parts.status,
        parts.headers
    );
    log_body("response", &String::from_utf8_lossy(&body));

    Response::from_parts(parts, Body::from(body))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"))
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if headers.contains_key(APP_PASSWORD_HEADER) {
        headers.insert(APP_PASSWORD_HEADER, HeaderValue::from_static(REDACTED));
    }

    headers
}

fn redact_json_password(body: &[u8]) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(mut json) => {
            if let Some(password) = json.get_mut("password") {
                *password = Value::String(REDACTED.to_owned());
            }
            json.to_string()
        }
        Err(_) => {
            let text = String::from_utf8_lossy(body);
            if text.contains("password") {
                REDACTED.to_owned()
            } else {
                text.to_string()
            }
        }
    }
}

fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}

fn log_body(kind: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("{kind} body: {}...", truncate(body, LOG_BODY_LENGTH_LIMIT));
        tracing::debug!("Full {kind} body: {body:?}");
    } else {
        tracing::info!("{kind} body: {body:?}");
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};

    use crate::{
        APP_PASSWORD_HEADER,
        logging::{redact_headers, redact_json_password, truncate},
    };

    #[test]
    fn redacts_password_field() {
        let text = redact_json_password(br#"{"password":"casa2026"}"#);

        assert!(!text.contains("casa2026"));
        assert!(text.contains("********"));
    }

    #[test]
    fn redacts_malformed_body_mentioning_password() {
        let text = redact_json_password(br#"{"password":"casa2026""#);

        assert_eq!(text, "********");
    }

    #[test]
    fn keeps_other_fields() {
        let text = redact_json_password(br#"{"categoria":"Utenze","importo":"42.50"}"#);

        assert!(text.contains("Utenze"));
        assert!(text.contains("42.50"));
    }

    #[test]
    fn redacts_password_header() {
        let mut headers = HeaderMap::new();
        headers.insert(APP_PASSWORD_HEADER, HeaderValue::from_static("casa2026"));
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let headers = redact_headers(&headers);

        assert_eq!(headers[APP_PASSWORD_HEADER], "********");
        assert_eq!(headers["accept"], "application/json");
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate("abc", 64), "abc");
        assert_eq!(truncate("ab€", 3), "ab");
    }
}
