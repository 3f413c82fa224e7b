//! Middleware for request processing
//!
//! - request-id assignment and propagation (`x-request-id`)
//! - request logging with status and duration
//! - Content-Length checks against the configured body limit

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Ensure every request carries an `x-request-id` and echo it on the response
///
/// A caller-supplied id is kept as long as it is a valid header value.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = match request.headers().get(REQUEST_ID_HEADER) {
        Some(existing) => existing.clone(),
        None => {
            let generated = HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
            request
                .headers_mut()
                .insert(REQUEST_ID_HEADER, generated.clone());
            generated
        }
    };

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .entry(REQUEST_ID_HEADER)
        .or_insert(request_id);
    response
}

/// Request logging middleware
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let start = Instant::now();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Request started"
    );

    let response = next.run(request).await;
    let duration = start.elapsed();

    if response.status().is_server_error() {
        tracing::warn!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = %response.status(),
            duration_ms = %duration.as_millis(),
            "Request failed"
        );
    } else {
        tracing::info!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = %response.status(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}

/// Check the declared Content-Length against `max_size`
///
/// Requests without a parseable Content-Length pass; the body limit on the
/// extractor catches those.
pub fn validate_request_size(
    headers: &HeaderMap,
    max_size: usize,
) -> Result<(), SizeValidationError> {
    if let Some(content_length) = headers
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
    {
        if content_length > max_size {
            return Err(SizeValidationError {
                actual: content_length,
                limit: max_size,
            });
        }
    }
    Ok(())
}

/// Error for request size validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeValidationError {
    pub actual: usize,
    pub limit: usize,
}

impl std::fmt::Display for SizeValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Request body too large: {} bytes exceeds limit of {} bytes",
            self.actual, self.limit
        )
    }
}

impl std::error::Error for SizeValidationError {}
