//! Route definitions
//!
//! - POST /validate - score metadata and/or validate structured data
//! - GET /health - liveness
//! - GET /metrics - Prometheus text exposition
//!
//! Any other method on `/validate` gets a JSON 405; unknown paths a JSON 404.
//! A panic inside a handler is converted to a generic 500.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::middleware::{request_id_middleware, request_logging_middleware};
use super::{
    ApiResponse, ErrorInfo, HealthResponse, HealthStatus, LengthReport, MetaReport, SchemaReport,
    ValidateRequest, ValidateResponse, EMPTY_REQUEST_MESSAGE,
};
use crate::config::GateConfig;
use crate::error::{GateError, Result};
use crate::quality::QualityScorer;
use crate::schema::{validate_schema, validate_schemas};
use crate::telemetry::GateMetricsRegistry;

/// State shared by all routes
#[derive(Clone)]
pub struct HandlerState {
    pub scorer: Arc<QualityScorer>,
    /// Present when telemetry is enabled
    pub metrics: Option<Arc<GateMetricsRegistry>>,
    pub start_time: Instant,
}

impl HandlerState {
    pub fn new(scorer: QualityScorer, metrics: Option<Arc<GateMetricsRegistry>>) -> Self {
        Self {
            scorer: Arc::new(scorer),
            metrics,
            start_time: Instant::now(),
        }
    }

    /// State for a configured gate, with a fresh metrics registry if enabled
    pub fn from_config(config: &GateConfig) -> Result<Self> {
        let metrics = if config.server.telemetry_enabled {
            let registry = GateMetricsRegistry::new()
                .map_err(|e| GateError::InternalError(e.to_string()))?;
            Some(Arc::new(registry))
        } else {
            None
        };
        Ok(Self::new(config.scorer(), metrics))
    }
}

impl Default for HandlerState {
    fn default() -> Self {
        Self::new(QualityScorer::default(), None)
    }
}

/// API error types
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    NotFound(String),
    MethodNotAllowed(Method),
    /// Logged in full; the caller only sees a generic message
    InternalError(String),
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label used for the `outcome` metric
    pub fn outcome(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) | ApiError::PayloadTooLarge(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::MethodNotAllowed(_) => "method_not_allowed",
            ApiError::InternalError(_) => "internal_error",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::BadRequest(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::NotFound(msg) => msg.clone(),
            ApiError::MethodNotAllowed(method) => {
                format!("Method {} not allowed; use POST", method)
            }
            ApiError::InternalError(detail) => {
                tracing::error!(error = %detail, "Internal error while handling request");
                "Internal server error".to_string()
            }
        };

        let body = ApiResponse::<()>::error(
            ErrorInfo::new(self.error_code(), message),
            uuid::Uuid::new_v4().to_string(),
        );

        match self {
            ApiError::MethodNotAllowed(_) => {
                (status, [(header::ALLOW, "POST")], Json(body)).into_response()
            }
            _ => (status, Json(body)).into_response(),
        }
    }
}

/// Create the router with all routes and layers
pub fn create_router(state: HandlerState) -> Router {
    let routes = Router::new()
        .route("/validate", post(validate_content).fallback(method_not_allowed))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .fallback(not_found)
        .with_state(state);

    with_gate_layers(routes)
}

/// Wrap a router in the logging, tracing, panic-catching and request-id layers
pub fn with_gate_layers(router: Router) -> Router {
    router
        .layer(axum::middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(axum::middleware::from_fn(request_id_middleware))
}

/// POST /validate
pub async fn validate_content(
    State(state): State<HandlerState>,
    payload: std::result::Result<Json<ValidateRequest>, JsonRejection>,
) -> std::result::Result<Json<ValidateResponse>, ApiError> {
    let _timer = state
        .metrics
        .as_deref()
        .map(|registry| registry.gate().start_timer("validate"));

    let result = payload
        .map_err(ApiError::from)
        .and_then(|Json(request)| evaluate(&state, request));

    if let Some(registry) = state.metrics.as_deref() {
        let outcome = match &result {
            Ok(_) => "ok",
            Err(err) => err.outcome(),
        };
        registry.gate().record_request("validate", outcome);
    }

    result.map(Json)
}

fn evaluate(
    state: &HandlerState,
    request: ValidateRequest,
) -> std::result::Result<ValidateResponse, ApiError> {
    if !request.has_anything() {
        return Err(ApiError::BadRequest(EMPTY_REQUEST_MESSAGE.to_string()));
    }

    tracing::info!(
        url = request.url.as_deref().unwrap_or("-"),
        has_title = request.title.is_some(),
        has_description = request.description.is_some(),
        has_schema = request.schema.is_some(),
        "Validating content"
    );

    let meta = request.has_meta().then(|| {
        let input = request.meta_input();
        let title = input.title.as_deref().unwrap_or_default();
        let description = input.description.as_deref().unwrap_or_default();
        let score = state.scorer.score_content(title, description, input.keyword());

        if let Some(registry) = state.metrics.as_deref() {
            registry.gate().observe_score(score.score);
        }

        MetaReport {
            is_valid: score.is_valid,
            score: score.score,
            suggestions: score.suggestions,
            title: input.title.as_deref().map(LengthReport::title),
            description: input.description.as_deref().map(LengthReport::description),
        }
    });

    let schema = request.schema.as_ref().map(|doc| {
        let result = match doc {
            Value::Array(docs) => validate_schemas(docs),
            single => validate_schema(single),
        };
        if let Some(registry) = state.metrics.as_deref() {
            registry.gate().record_schema_result(&result);
        }
        SchemaReport::from(&result)
    });

    Ok(ValidateResponse {
        success: true,
        meta,
        schema,
    })
}

async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// GET /health
pub async fn health_check(State(state): State<HandlerState>) -> Json<ApiResponse<HealthResponse>> {
    let health = HealthResponse {
        status: HealthStatus::Healthy,
        uptime_seconds: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Json(ApiResponse::success(health, uuid::Uuid::new_v4().to_string()))
}

/// GET /metrics
pub async fn metrics_endpoint(
    State(state): State<HandlerState>,
) -> std::result::Result<Response, ApiError> {
    let registry = state
        .metrics
        .as_deref()
        .ok_or_else(|| ApiError::NotFound("Metrics are disabled".to_string()))?;
    let text = registry
        .encode_text()
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        text,
    )
        .into_response())
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::InternalError(format!("handler panicked: {}", detail)).into_response()
}

/// Bind and serve the gate until the process is stopped
pub async fn serve(config: &GateConfig) -> Result<()> {
    let state = HandlerState::from_config(config)?;
    let router = create_router(state)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_millis(config.server.timeout_ms)));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .map_err(|e| {
            GateError::ConfigError(format!("Failed to bind {}: {}", config.server.bind_address, e))
        })?;
    tracing::info!(
        address = %config.server.bind_address,
        version = env!("CARGO_PKG_VERSION"),
        "Starting SEO content gate"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GateError::InternalError(format!("Server error: {}", e)))?;

    tracing::info!("SEO content gate stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(ApiError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::MethodNotAllowed(Method::GET).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::InternalError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::NotFound("x".into()).error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_evaluate_requires_content() {
        let state = HandlerState::default();
        let err = evaluate(&state, ValidateRequest::default()).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref msg) if msg == EMPTY_REQUEST_MESSAGE));
    }

    #[test]
    fn test_evaluate_meta_only() {
        let state = HandlerState::default();
        let request = ValidateRequest {
            title: Some("Cat Litter Odor Control - Natural Activated Carbon".to_string()),
            ..Default::default()
        };
        let response = evaluate(&state, request).unwrap();
        let meta = response.meta.unwrap();
        assert_eq!(meta.title, Some(LengthReport { length: 50, is_optimal: true }));
        assert!(meta.description.is_none());
        assert!(response.schema.is_none());
    }

    #[test]
    fn test_evaluate_schema_array_uses_batch_labels() {
        let state = HandlerState::default();
        let request = ValidateRequest {
            schema: Some(serde_json::json!([{"@type": "Recipe"}])),
            ..Default::default()
        };
        let schema = evaluate(&state, request).unwrap().schema.unwrap();
        assert!(!schema.is_valid);
        assert!(schema.errors[0].message.starts_with("Schema 1: "));
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let response = ApiError::InternalError("db password leaked".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
