//! Middleware applied to every route.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const ALLOWED_HEADERS: &str = "Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, Authorization, accept, origin, Cache-Control, X-Requested-With";
pub const ALLOWED_METHODS: &str = "POST, OPTIONS, GET, PUT, DELETE";

const SLOW_REQUEST: Duration = Duration::from_secs(1);

/// Permissive CORS policy.
///
/// Preflight (`OPTIONS`) requests are answered here with 204 and never reach a
/// handler. Every other response gets the same headers added.
pub async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
}

/// Logs every request on completion; requests slower than a second at `warn`.
pub async fn request_timing(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let duration_ms = duration.as_millis() as u64;
    let status = response.status().as_u16();

    if duration > SLOW_REQUEST {
        warn!(%method, %path, status, duration_ms, "slow request");
    } else {
        info!(%method, %path, status, duration_ms, "request completed");
    }

    response
}
