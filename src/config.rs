//! Gate configuration
//!
//! Layered in this order, later layers winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config gate.toml`)
//! 3. `SEO_GATE_*` environment variables
//!
//! ```toml
//! [server]
//! bind_address = "0.0.0.0:8080"
//! timeout_ms = 10000
//!
//! [site]
//! brand = "Purrify"
//!
//! [lexicon]
//! power = ["best", "ultimate"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::{GateError, Result};
use crate::meta::normalize::DEFAULT_DESCRIPTION_PADDING;
use crate::meta::{Lexicon, MetaOptimizer, SiteNormalizer, DEFAULT_BRAND};
use crate::quality::{QualityScorer, SystemClock};

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "SEO_GATE_";

/// Complete gate configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub lexicon: Lexicon,
}

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Whether to collect Prometheus metrics
    #[serde(default = "default_true")]
    pub telemetry_enabled: bool,
}

/// Site branding used by the optimizers and the normalizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_brand")]
    pub brand: String,
    /// Title used for blank input; the brand when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_fallback: Option<String>,
    #[serde(default = "default_description_padding")]
    pub description_padding: String,
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
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

fn default_brand() -> String {
    DEFAULT_BRAND.to_string()
}

fn default_description_padding() -> String {
    DEFAULT_DESCRIPTION_PADDING.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            max_body_size: default_max_body_size(),
            timeout_ms: default_timeout_ms(),
            telemetry_enabled: true,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            brand: default_brand(),
            title_fallback: None,
            description_padding: default_description_padding(),
        }
    }
}

impl GateConfig {
    /// Load defaults, then `path` if given, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GateError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `SEO_GATE_*` overrides read through `lookup`
    ///
    /// Values that fail to parse leave the current setting in place.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(v) = var("BIND_ADDRESS") {
            self.server.bind_address = v;
        }
        if let Some(v) = var("MAX_BODY_SIZE") {
            self.server.max_body_size = v.parse().unwrap_or(self.server.max_body_size);
        }
        if let Some(v) = var("TIMEOUT_MS") {
            self.server.timeout_ms = v.parse().unwrap_or(self.server.timeout_ms);
        }
        if let Some(v) = var("TELEMETRY_ENABLED") {
            self.server.telemetry_enabled = v.parse().unwrap_or(self.server.telemetry_enabled);
        }
        if let Some(v) = var("BRAND") {
            self.site.brand = v;
        }
        if let Some(v) = var("TITLE_FALLBACK") {
            self.site.title_fallback = Some(v);
        }
        if let Some(v) = var("DESCRIPTION_PADDING") {
            self.site.description_padding = v;
        }
    }

    /// Reject settings the gate cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.site.brand.trim().is_empty() {
            return Err(GateError::ConfigError("site.brand must not be empty".to_string()));
        }
        if self.server.max_body_size == 0 {
            return Err(GateError::ConfigError(
                "server.max_body_size must be greater than 0".to_string(),
            ));
        }
        if self.server.timeout_ms == 0 {
            return Err(GateError::ConfigError(
                "server.timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Site normalizer for the configured branding
    pub fn normalizer(&self) -> SiteNormalizer {
        let mut normalizer = SiteNormalizer::for_brand(&self.site.brand)
            .with_description_padding(self.site.description_padding.clone());
        if let Some(fallback) = &self.site.title_fallback {
            normalizer.title_fallback = fallback.clone();
        }
        normalizer
    }

    /// Title and description optimizer for the configured branding
    pub fn optimizer(&self) -> MetaOptimizer {
        MetaOptimizer::new(&self.site.brand)
            .with_lexicon(self.lexicon.clone())
            .with_normalizer(Arc::new(self.normalizer()))
    }

    /// Quality scorer using the configured lexicon and the system clock
    pub fn scorer(&self) -> QualityScorer {
        QualityScorer::new(self.lexicon.clone(), Arc::new(SystemClock))
    }
}
