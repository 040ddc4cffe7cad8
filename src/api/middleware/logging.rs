//! Request logging with credential headers redacted

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::info;

/// Headers worth recording for each request
const LOGGED_HEADERS: [&str; 6] = [
    "content-type",
    "user-agent",
    "x-request-id",
    "x-forwarded-for",
    "authorization",
    "apikey",
];

/// Logs each request and its outcome. Span creation is left to `TraceLayer`.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    info!(
        method = %method,
        path = %path,
        headers = %describe_headers(request.headers()),
        "Incoming request"
    );

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    response
}

fn is_credential_header(name: &str) -> bool {
    matches!(
        name,
        "authorization" | "apikey" | "cookie" | "proxy-authorization"
    )
}

/// `name=value` pairs for the logged headers, credentials replaced
fn describe_headers(headers: &HeaderMap) -> String {
    LOGGED_HEADERS
        .iter()
        .filter_map(|name| {
            let value = headers.get(*name)?;
            let shown = if is_credential_header(name) {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("[invalid]")
            };
            Some(format!("{}={}", name, shown))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_are_redacted() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer secret.token.value".parse().unwrap());
        headers.insert("apikey", "anon-key".parse().unwrap());
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("etag", "abc".parse().unwrap());

        let described = describe_headers(&headers);

        assert!(described.contains("content-type=application/json"));
        assert!(described.contains("authorization=[REDACTED]"));
        assert!(described.contains("apikey=[REDACTED]"));
        assert!(!described.contains("secret.token.value"));
        assert!(!described.contains("anon-key"));
        assert!(!described.contains("etag"));
    }

    #[test]
    fn test_is_credential_header() {
        assert!(is_credential_header("authorization"));
        assert!(is_credential_header("cookie"));
        assert!(!is_credential_header("user-agent"));
    }
}
