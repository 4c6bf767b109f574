use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, header};
use http_body_util::BodyExt;
use serde_json::Value;

use crate::config::APP_CONFIG;
use crate::services::error::ServiceError;

const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "access_token",
    "refresh_token",
    "authorization",
    "secret",
    "credentials",
];

fn should_ignore_path(path: &str) -> bool {
    matches!(path, "/health" | "/health/") || path.starts_with("/swagger-ui")
}

fn redact_json(mut value: Value) -> Value {
    match &mut value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if SENSITIVE_FIELDS.contains(&key.to_ascii_lowercase().as_str()) {
                    *field = Value::String("[REDACTED]".to_string());
                } else {
                    *field = redact_json(field.take());
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                *item = redact_json(item.take());
            }
        }
        _ => {}
    }
    value
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = headers.clone();
    for name in [header::AUTHORIZATION, header::COOKIE, header::SET_COOKIE] {
        if filtered.contains_key(&name) {
            filtered.insert(name, HeaderValue::from_static("[REDACTED]"));
        }
    }
    filtered
}

fn content_type_starts_with(headers: &HeaderMap, prefix: &str) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .is_some_and(|ct| ct.starts_with(prefix))
}

/// Only JSON bodies are logged; anything else is summarized as `{}`.
fn json_body(headers: &HeaderMap, bytes: &Bytes) -> Value {
    if !content_type_starts_with(headers, "application/json") {
        return Value::Object(serde_json::Map::new());
    }
    serde_json::from_slice::<Value>(bytes)
        .map(redact_json)
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

/// One structured event per request. Multipart uploads and file downloads
/// are passed through without buffering.
pub async fn http_logger(req: Request, next: Next) -> Result<impl IntoResponse, ServiceError> {
    let start_time = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = uri.path().to_string();

    if should_ignore_path(&path) || method == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let req_headers = req.headers().clone();
    let x_request_id = req_headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let (req, req_body) = if content_type_starts_with(&req_headers, "multipart/form-data") {
        (req, Value::Object(serde_json::Map::new()))
    } else {
        let (parts, body) = req.into_parts();
        let bytes = buffer_body("request", body).await?;
        let logged = json_body(&req_headers, &bytes);
        (Request::from_parts(parts, Body::from(bytes)), logged)
    };

    let mut response = next.run(req).await;
    let latency = start_time.elapsed();
    let status = response.status();
    let res_headers = response.headers().clone();

    let should_log_body = matches!(method, Method::POST | Method::PUT | Method::PATCH)
        && content_type_starts_with(&res_headers, "application/json");
    let res_body = if should_log_body {
        let (parts, body) = response.into_parts();
        let bytes = buffer_body("response", body).await?;
        let logged = json_body(&res_headers, &bytes);
        response = Response::from_parts(parts, Body::from(bytes));
        logged
    } else {
        Value::Object(serde_json::Map::new())
    };

    tracing::info!(
        method = %method,
        uri = %uri,
        path = %path,
        x_request_id = %x_request_id,
        req_headers = ?redact_headers(&req_headers),
        req_body = %req_body,
        status = status.as_u16(),
        latency_ms = latency.as_millis(),
        res_body = %res_body,
        app_env = %APP_CONFIG.app_env,
        "HTTP request completed"
    );

    Ok(response)
}

async fn buffer_body<B>(direction: &str, body: B) -> Result<Bytes, ServiceError>
where
    B: BodyExt,
    B::Error: std::fmt::Display,
{
    body.collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|err| ServiceError::validation(format!("Failed to read {direction} body: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn passwords_and_tokens_are_redacted() {
        let logged = redact_json(json!({
            "email": "admin1@example.com",
            "password": "password123",
            "nested": [{"access_token": "abc"}]
        }));
        assert_eq!(logged["email"], "admin1@example.com");
        assert_eq!(logged["password"], "[REDACTED]");
        assert_eq!(logged["nested"], json!([{"access_token": "[REDACTED]"}]));
    }

    #[test]
    fn authorization_header_is_redacted() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let filtered = redact_headers(&headers);
        assert_eq!(filtered[header::AUTHORIZATION], "[REDACTED]");
        assert_eq!(filtered[header::ACCEPT], "application/json");
    }

    #[test]
    fn non_json_bodies_are_not_logged() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
        assert_eq!(json_body(&headers, &Bytes::from_static(b"{\"a\":1}")), json!({}));
    }
}
