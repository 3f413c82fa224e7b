//! Telemetry for the content gate
//!
//! Prometheus counters and histograms for requests, scores and
//! structured-data findings. Logging goes through `tracing`; the subscriber
//! is installed by the binary, never by the library.

pub mod metrics;

pub use metrics::{GateMetrics, GateMetricsRegistry, RequestTimer};

use thiserror::Error;

/// Telemetry errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
