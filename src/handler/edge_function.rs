//! One-shot entry point for serverless deployments
//!
//! `handle_request` runs a single request through the gate router with the
//! body-size and timeout limits applied, and formats every transport failure
//! as the standard error envelope with an `X-Request-ID` header.

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;
use tower::ServiceExt;
use uuid::Uuid;

use super::middleware::validate_request_size;
use super::{create_router, ApiResponse, ErrorInfo, HandlerState};
use crate::config::ServerConfig;

/// Configuration for the edge function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeFunctionConfig {
    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_true")]
    pub telemetry_enabled: bool,
}

fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}

fn default_timeout_ms() -> u64 {
    30000
}

fn default_true() -> bool {
    true
}

impl Default for EdgeFunctionConfig {
    fn default() -> Self {
        Self {
            max_body_size: default_max_body_size(),
            timeout_ms: default_timeout_ms(),
            telemetry_enabled: true,
        }
    }
}

impl From<&ServerConfig> for EdgeFunctionConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            max_body_size: server.max_body_size,
            timeout_ms: server.timeout_ms,
            telemetry_enabled: server.telemetry_enabled,
        }
    }
}

/// Errors that can occur around a single invocation
#[derive(Debug, Error)]
pub enum EdgeFunctionError {
    #[error("Request body too large: {size} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { size: usize, limit: usize },

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl EdgeFunctionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EdgeFunctionError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            EdgeFunctionError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            EdgeFunctionError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EdgeFunctionError::BodyTooLarge { .. } => "BODY_TOO_LARGE",
            EdgeFunctionError::Timeout(_) => "TIMEOUT",
            EdgeFunctionError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Error envelope body; internal details are not exposed
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            EdgeFunctionError::InternalError(_) => {
                ErrorInfo::new(self.error_code(), "Internal server error")
            }
            _ => ErrorInfo::new(self.error_code(), self.to_string()),
        }
    }
}

/// Handle one request with the configured limits
///
/// The router is built per call from `state`, so the state (scorer and
/// metrics registry) can be shared across invocations of a warm instance.
pub async fn handle_request(
    request: Request<Body>,
    config: &EdgeFunctionConfig,
    state: HandlerState,
) -> Response<Body> {
    let start_time = Instant::now();
    let request_id = generate_request_id();

    tracing::info!(
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        "Processing edge function request"
    );

    if let Err(size_error) = validate_request_size(request.headers(), config.max_body_size) {
        return build_error_response(
            EdgeFunctionError::BodyTooLarge {
                size: size_error.actual,
                limit: size_error.limit,
            },
            &request_id,
            start_time.elapsed().as_millis() as u64,
        );
    }

    let state = if config.telemetry_enabled {
        state
    } else {
        HandlerState { metrics: None, ..state }
    };
    let router = create_router(state)
        .layer(axum::extract::DefaultBodyLimit::max(config.max_body_size));

    match execute_with_timeout(router, request, config.timeout_ms).await {
        Ok(response) => {
            let duration_ms = start_time.elapsed().as_millis() as u64;
            tracing::info!(
                request_id = %request_id,
                status = %response.status(),
                duration_ms = duration_ms,
                "Edge function request completed"
            );
            response
        }
        Err(err) => {
            let duration_ms = start_time.elapsed().as_millis() as u64;
            tracing::error!(
                request_id = %request_id,
                error = %err,
                duration_ms = duration_ms,
                "Edge function request failed"
            );
            build_error_response(err, &request_id, duration_ms)
        }
    }
}

async fn execute_with_timeout(
    router: Router,
    request: Request<Body>,
    timeout_ms: u64,
) -> Result<Response<Body>, EdgeFunctionError> {
    let timeout = std::time::Duration::from_millis(timeout_ms);

    match tokio::time::timeout(timeout, router.oneshot(request)).await {
        Ok(result) => result.map_err(|e| EdgeFunctionError::InternalError(e.to_string())),
        Err(_) => Err(EdgeFunctionError::Timeout(timeout_ms)),
    }
}

fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

fn build_error_response(
    error: EdgeFunctionError,
    request_id: &str,
    duration_ms: u64,
) -> Response<Body> {
    let status = error.status_code();
    let mut envelope = ApiResponse::<()>::error(error.to_error_info(), request_id.to_string());
    envelope.metadata.duration_ms = Some(duration_ms);

    let body = serde_json::to_string(&envelope).unwrap_or_else(|_| {
        r#"{"success":false,"error":{"code":"SERIALIZATION_ERROR","message":"Failed to serialize error response"}}"#.to_string()
    });

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        axum::http::header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("application/json"),
    );
    if let Ok(value) = axum::http::HeaderValue::from_str(request_id) {
        response.headers_mut().insert("X-Request-ID", value);
    }
    response
}
