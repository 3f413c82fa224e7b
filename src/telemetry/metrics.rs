//! Prometheus metrics for the content gate
//!
//! - `seo_gate_requests_total` (counter) - requests by endpoint and outcome
//! - `seo_gate_request_duration_seconds` (histogram) - handling time by endpoint
//! - `seo_gate_content_score` (histogram) - distribution of quality scores
//! - `seo_gate_schema_findings_total` (counter) - structured-data findings by severity
//! - `seo_gate_schemas_validated_total` (counter) - schema validations by `result`;
//!   a batch request counts once
//! - `seo_gate_active_requests` (gauge) - requests in flight
//!
//! ```rust,no_run
//! use seo_content_gate::telemetry::GateMetricsRegistry;
//!
//! let registry = GateMetricsRegistry::new().unwrap();
//! registry.gate().record_request("validate", "ok");
//! registry.gate().observe_score(85);
//! ```

use prometheus::{Gauge, Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use std::sync::Arc;
use std::time::Instant;

use super::{Result, TelemetryError};
use crate::contracts::{Severity, ValidationResult};

const NAMESPACE: &str = "seo_gate";

/// Gate metrics
pub struct GateMetrics {
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    content_score: Histogram,
    schema_findings_total: IntCounterVec,
    schemas_validated_total: IntCounterVec,
    active_requests: Gauge,
}

impl GateMetrics {
    /// Create the metrics and register them with `registry`
    pub fn new(registry: &Registry) -> Result<Self> {
        let requests_total = IntCounterVec::new(
            Opts::new("requests_total", "Total number of gate requests").namespace(NAMESPACE),
            &["endpoint", "outcome"],
        )?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("request_duration_seconds", "Request handling time in seconds")
                .namespace(NAMESPACE)
                .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            &["endpoint"],
        )?;

        let content_score = Histogram::with_opts(
            HistogramOpts::new("content_score", "Content quality scores (0-100)")
                .namespace(NAMESPACE)
                .buckets(vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]),
        )?;

        let schema_findings_total = IntCounterVec::new(
            Opts::new("schema_findings_total", "Structured-data findings by severity")
                .namespace(NAMESPACE),
            &["severity"],
        )?;

        let schemas_validated_total = IntCounterVec::new(
            Opts::new("schemas_validated_total", "Structured-data documents validated")
                .namespace(NAMESPACE),
            &["result"],
        )?;

        let active_requests = Gauge::with_opts(
            Opts::new("active_requests", "Requests currently being handled").namespace(NAMESPACE),
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration_seconds.clone()))?;
        registry.register(Box::new(content_score.clone()))?;
        registry.register(Box::new(schema_findings_total.clone()))?;
        registry.register(Box::new(schemas_validated_total.clone()))?;
        registry.register(Box::new(active_requests.clone()))?;

        Ok(Self {
            requests_total,
            request_duration_seconds,
            content_score,
            schema_findings_total,
            schemas_validated_total,
            active_requests,
        })
    }

    /// Record a finished request
    pub fn record_request(&self, endpoint: &str, outcome: &str) {
        self.requests_total.with_label_values(&[endpoint, outcome]).inc();
    }

    pub fn observe_duration(&self, endpoint: &str, duration_secs: f64) {
        self.request_duration_seconds
            .with_label_values(&[endpoint])
            .observe(duration_secs);
    }

    /// Record a content quality score
    pub fn observe_score(&self, score: u32) {
        self.content_score.observe(f64::from(score));
    }

    /// Record every finding of a schema validation result
    pub fn record_schema_result(&self, result: &ValidationResult) {
        let label = if result.is_valid { "valid" } else { "invalid" };
        self.schemas_validated_total.with_label_values(&[label]).inc();
        for issue in result.errors.iter().chain(&result.warnings) {
            self.record_finding(issue.severity);
        }
    }

    pub fn record_finding(&self, severity: Severity) {
        let severity = severity.to_string();
        self.schema_findings_total
            .with_label_values(&[severity.as_str()])
            .inc();
    }

    /// Start a request timer (records duration and in-flight count)
    pub fn start_timer(&self, endpoint: &str) -> RequestTimer<'_> {
        self.active_requests.inc();
        RequestTimer {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            metrics: self,
        }
    }
}

/// RAII guard for timing requests
pub struct RequestTimer<'a> {
    start: Instant,
    endpoint: String,
    metrics: &'a GateMetrics,
}

impl RequestTimer<'_> {
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Drop for RequestTimer<'_> {
    fn drop(&mut self) {
        self.metrics
            .observe_duration(&self.endpoint, self.start.elapsed().as_secs_f64());
        self.metrics.active_requests.dec();
    }
}

/// Registry owning the gate metrics
pub struct GateMetricsRegistry {
    registry: Arc<Registry>,
    gate: GateMetrics,
}

impl GateMetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let gate = GateMetrics::new(&registry)?;
        Ok(Self { registry, gate })
    }

    pub fn gate(&self) -> &GateMetrics {
        &self.gate
    }

    /// Encode metrics as text for scraping
    pub fn encode_text(&self) -> Result<String> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(TelemetryError::MetricsError)?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Encoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::ValidationError;

    #[test]
    fn test_record_request_and_encode() {
        let registry = GateMetricsRegistry::new().unwrap();
        registry.gate().record_request("validate", "ok");
        registry.gate().record_request("validate", "bad_request");

        let text = registry.encode_text().unwrap();
        assert!(text.contains("seo_gate_requests_total"));
        assert!(text.contains("outcome=\"bad_request\""));
    }

    #[test]
    fn test_schema_findings_by_severity() {
        let registry = GateMetricsRegistry::new().unwrap();
        let result = ValidationResult::from_issues(vec![
            ValidationError::error("name", "Missing required property: name"),
            ValidationError::warning("dateModified", "dateModified is earlier than datePublished"),
        ]);
        registry.gate().record_schema_result(&result);

        let text = registry.encode_text().unwrap();
        assert!(text.contains("seo_gate_schema_findings_total{severity=\"error\"} 1"));
        assert!(text.contains("seo_gate_schema_findings_total{severity=\"warning\"} 1"));
        assert!(text.contains("seo_gate_schemas_validated_total{result=\"invalid\"} 1"));
    }

    #[test]
    fn test_request_timer() {
        let registry = GateMetricsRegistry::new().unwrap();
        {
            let timer = registry.gate().start_timer("validate");
            assert!(timer.elapsed_secs() >= 0.0);
        }
        registry.gate().observe_score(85);
        let text = registry.encode_text().unwrap();
        assert!(text.contains("seo_gate_request_duration_seconds_count{endpoint=\"validate\"} 1"));
        assert!(text.contains("seo_gate_content_score_count 1"));
    }

    #[test]
    fn test_two_registries_do_not_collide() {
        assert!(GateMetricsRegistry::new().is_ok());
        assert!(GateMetricsRegistry::new().is_ok());
    }
}
