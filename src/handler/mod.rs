//! HTTP handler for the content gate
//!
//! A thin axum layer over the engine:
//! - `routes`: `POST /validate`, `GET /health`, `GET /metrics`
//! - `middleware`: request logging and request-id propagation
//! - `edge_function`: one-shot entry point with body-size and timeout limits
//!
//! The engine itself never does I/O; limits and timeouts live here.

pub mod edge_function;
pub mod middleware;
pub mod routes;

pub use edge_function::{handle_request, EdgeFunctionConfig, EdgeFunctionError};
pub use middleware::{request_id_middleware, request_logging_middleware};
pub use routes::{
    create_router, health_check, metrics_endpoint, serve, validate_content, with_gate_layers,
    ApiError, HandlerState,
};

use serde::{Deserialize, Serialize};

use crate::contracts::{MetaContentInput, ValidationError, ValidationResult};
use crate::meta::{char_len, is_optimal_description_length, is_optimal_title_length};

/// Message returned when a request carries nothing to validate
pub const EMPTY_REQUEST_MESSAGE: &str =
    "Please provide title and/or description, or a schema object to validate";

/// Envelope for error responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    pub metadata: ResponseMetadata,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, request_id: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: ResponseMetadata::new(request_id),
        }
    }

    pub fn error(error: ErrorInfo, request_id: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error),
            metadata: ResponseMetadata::new(request_id),
        }
    }
}

/// Error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Response metadata for tracing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub request_id: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ResponseMetadata {
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            duration_ms: None,
        }
    }
}

/// Body of `POST /validate`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_keyword: Option<String>,
    /// A JSON-LD document, or an array of them
    #[serde(default)]
    pub schema: Option<serde_json::Value>,
    /// Page the content belongs to; only logged
    #[serde(default)]
    pub url: Option<String>,
}

impl ValidateRequest {
    pub fn has_meta(&self) -> bool {
        self.title.is_some() || self.description.is_some()
    }

    pub fn has_anything(&self) -> bool {
        self.has_meta() || self.schema.is_some()
    }

    /// The metadata part of the request
    pub fn meta_input(&self) -> MetaContentInput {
        MetaContentInput {
            title: self.title.clone(),
            description: self.description.clone(),
            target_keyword: self.target_keyword.clone(),
        }
    }
}

/// Success body of `POST /validate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaReport>,
}

/// Quality score plus raw-length checks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaReport {
    pub is_valid: bool,
    pub score: u32,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<LengthReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<LengthReport>,
}

/// Length of a raw supplied string and whether it sits in its display window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthReport {
    pub length: usize,
    pub is_optimal: bool,
}

impl LengthReport {
    pub fn title(raw: &str) -> Self {
        let length = char_len(raw);
        Self {
            length,
            is_optimal: is_optimal_title_length(length),
        }
    }

    pub fn description(raw: &str) -> Self {
        let length = char_len(raw);
        Self {
            length,
            is_optimal: is_optimal_description_length(length),
        }
    }
}

/// Structured-data outcome in the response shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaReport {
    pub is_valid: bool,
    pub errors: Vec<SchemaIssue>,
    pub warnings: Vec<SchemaWarning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaIssue {
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaWarning {
    pub field: String,
    pub message: String,
}

impl From<&ValidationResult> for SchemaReport {
    fn from(result: &ValidationResult) -> Self {
        Self {
            is_valid: result.is_valid,
            errors: result.errors.iter().map(SchemaIssue::from).collect(),
            warnings: result
                .warnings
                .iter()
                .map(|w| SchemaWarning {
                    field: w.field.clone(),
                    message: w.message.clone(),
                })
                .collect(),
        }
    }
}

impl From<&ValidationError> for SchemaIssue {
    fn from(error: &ValidationError) -> Self {
        Self {
            field: error.field.clone(),
            message: error.message.clone(),
            fix: error.fix.clone(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub uptime_seconds: u64,
    pub timestamp: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_error() {
        let response =
            ApiResponse::<()>::error(ErrorInfo::new("BAD_REQUEST", "nope"), "req-1".to_string());
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error.unwrap().code, "BAD_REQUEST");
    }

    #[test]
    fn test_request_presence() {
        let empty: ValidateRequest =
            serde_json::from_str(r#"{"targetKeyword": "litter", "url": "/"}"#).unwrap();
        assert!(!empty.has_anything());

        let with_schema: ValidateRequest =
            serde_json::from_str(r#"{"schema": {"@type": "Product"}}"#).unwrap();
        assert!(with_schema.has_anything());
        assert!(!with_schema.has_meta());
    }

    #[test]
    fn test_length_report_uses_raw_windows() {
        assert_eq!(
            LengthReport::description(&"A".repeat(150)),
            LengthReport { length: 150, is_optimal: true }
        );
        assert!(!LengthReport::title("Short").is_optimal);
    }

    #[test]
    fn test_schema_report_shape() {
        let result = ValidationResult::from_issues(vec![
            ValidationError::error("name", "Missing required property: name")
                .with_fix("Add required property: name"),
            ValidationError::warning("dateModified", "dateModified is earlier than datePublished"),
        ]);
        let json = serde_json::to_value(SchemaReport::from(&result)).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["errors"][0]["fix"], "Add required property: name");
        assert!(json["warnings"][0].get("fix").is_none());
    }
}
