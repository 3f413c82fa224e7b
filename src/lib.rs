//! SEO content gate
//!
//! Checks page metadata and JSON-LD structured data before a page ships.
//!
//! ## Features
//!
//! - **Title and description optimization**: keyword front-loading, brand
//!   suffixing, sentence-aware truncation and call-to-action insertion
//! - **Content quality scoring**: nine weighted checks on a 0-100 scale
//! - **Structured-data validation**: Product, Article (and its BlogPosting and
//!   NewsArticle variants), FAQPage and Organization documents
//! - **Scanner**: finds JSON-LD blocks across a source tree at build time
//! - **HTTP gate**: `POST /validate` with Prometheus metrics
//!
//! ## Architecture
//!
//! 1. **Meta** (`meta/`): title and description optimizers, lexicon tables
//!    and the site normalizer applied to their output.
//! 2. **Quality** (`quality`): the content scorer with an injected clock.
//! 3. **Schema** (`schema/`): per-type validators that accumulate findings
//!    into a [`ValidationResult`] instead of failing fast.
//! 4. **Handler** (`handler/`): axum router, middleware and the one-shot
//!    edge function entry point.
//! 5. **CLI** (`cli/`): `title`, `description`, `score`, `schema`, `scan`
//!    and `serve` commands.
//!
//! ## CLI Usage
//!
//! ```bash
//! seo-gate title "Natural Cat Litter Odor Control Tips" --keyword "cat litter"
//! seo-gate score --title "..." --description "..." --format json
//! seo-gate schema product.json
//! seo-gate scan ./app
//! seo-gate serve --bind 127.0.0.1:8080
//! ```
//!
//! ## Example
//!
//! ```rust
//! use seo_content_gate::{optimize_title, score_content, validate_schema};
//! use serde_json::json;
//!
//! let title = optimize_title("How to Stop Cat Litter Smell", Some("cat litter"));
//! assert!(title.length <= 60);
//!
//! let score = score_content(&title.text, "", Some("cat litter"));
//! assert!(score.score <= 100);
//!
//! let result = validate_schema(&json!({"@type": "Recipe"}));
//! assert!(!result.is_valid);
//! ```

pub mod cli;
pub mod config;
pub mod contracts;
pub mod error;
pub mod handler;
pub mod meta;
pub mod quality;
pub mod scanner;
pub mod schema;
pub mod telemetry;

pub use contracts::{
    BatchValidationResult, ContentQualityScore, MetaContentInput, OptimizedDescription,
    OptimizedTitle, Severity, ValidationError, ValidationResult,
};
pub use error::{GateError, Result};

pub use config::GateConfig;
pub use meta::{
    optimize_description, optimize_title, Lexicon, MetaNormalizer, MetaOptimizer, SiteNormalizer,
};
pub use quality::{score_content, Clock, FixedClock, QualityScorer, SystemClock};
pub use scanner::{scan_path, FileReport, ScanReport};
pub use schema::{validate_schema, validate_schemas, SchemaKind};
pub use telemetry::{GateMetrics, GateMetricsRegistry, TelemetryError};

pub use handler::{
    create_router, handle_request, ApiError, ApiResponse, EdgeFunctionConfig, EdgeFunctionError,
    ErrorInfo, HandlerState, HealthResponse, HealthStatus, ValidateRequest, ValidateResponse,
};

pub use cli::{ExitCode, GateCli, GateCommands, OutputFormat};

/// Gate version (from Cargo.toml)
pub const GATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the CLI application and map any failure to an exit code
///
/// ```rust,no_run
/// use clap::Parser;
/// use seo_content_gate::{run_cli, GateCli};
///
/// let cli = GateCli::parse();
/// std::process::exit(run_cli(cli).into());
/// ```
pub fn run_cli(cli: GateCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if !e.is_user_error() {
                tracing::error!(error = %e, "Command failed");
            }
            ExitCode::from_error(&e)
        }
    }
}
