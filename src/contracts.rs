//! Shared contracts for the content gate
//!
//! Value objects exchanged between the optimizers, the scorer, the schema
//! validators and their callers. All of them are built fresh per call and
//! serialize with camelCase keys so the HTTP surface and the CLI JSON output
//! share one wire shape.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw metadata supplied by a caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaContentInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_keyword: Option<String>,
}

impl MetaContentInput {
    /// The target keyword, if one was supplied and is not blank
    pub fn keyword(&self) -> Option<&str> {
        self.target_keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Result of title optimization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedTitle {
    /// Optimized title text
    #[serde(rename = "title")]
    pub text: String,
    /// Whether the final text is shorter than the pre-truncation text
    pub is_truncated: bool,
    /// Length of `text` in characters
    pub length: usize,
    /// Ordered list of changes made and advice given
    pub warnings: Vec<String>,
}

/// Result of description optimization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedDescription {
    /// Optimized description text
    #[serde(rename = "description")]
    pub text: String,
    /// Whether the final text is shorter than the pre-truncation text
    pub is_truncated: bool,
    /// Length of `text` in characters
    pub length: usize,
    /// Ordered list of changes made and advice given
    pub warnings: Vec<String>,
}

/// Rule-based quality score for a (title, description, keyword) triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentQualityScore {
    /// `score >= 70`
    pub is_valid: bool,
    /// Score in `0..=100`
    pub score: u32,
    /// One suggestion per failed check, in check order
    pub suggestions: Vec<String>,
}

/// Severity of a structured-data finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory, does not affect validity
    Warning,
    /// Field-level contract violation
    Error,
    /// The document could not be validated at all
    Critical,
}

impl Severity {
    /// Check if this severity makes a document invalid
    pub fn is_blocking(&self) -> bool {
        matches!(self, Severity::Error | Severity::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// A single structured-data finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Offending field (`root` for the document itself)
    pub field: String,
    /// Human-readable message, always naming the field
    pub message: String,
    /// Suggested fix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
    pub severity: Severity,
    /// Batch label such as `Schema 2`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

impl ValidationError {
    pub fn new(severity: Severity, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            fix: None,
            severity,
            page: None,
        }
    }

    /// Create a critical finding
    pub fn critical(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Critical, field, message)
    }

    /// Create an error finding
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, field, message)
    }

    /// Create a warning finding
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, field, message)
    }

    /// Add a suggested fix
    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    /// Attach a batch label and prefix the message with it
    pub fn labeled(mut self, label: &str) -> Self {
        self.message = format!("{}: {}", label, self.message);
        self.page = Some(label.to_string());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.field, self.message)
    }
}

/// Outcome of validating one (or, for a batch, many) structured-data documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// `true` iff `errors` is empty
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

/// Batch results share the single-document shape; issues carry a `page` label
pub type BatchValidationResult = ValidationResult;

impl ValidationResult {
    /// Create a new valid result
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Create a result holding exactly one blocking finding
    pub fn single(issue: ValidationError) -> Self {
        let mut result = Self::valid();
        result.push(issue);
        result
    }

    /// Create a result from an unsorted list of findings
    pub fn from_issues(issues: impl IntoIterator<Item = ValidationError>) -> Self {
        let mut result = Self::valid();
        for issue in issues {
            result.push(issue);
        }
        result
    }

    /// Route a finding into `errors` or `warnings` by severity
    pub fn push(&mut self, issue: ValidationError) {
        if issue.severity.is_blocking() {
            self.is_valid = false;
            self.errors.push(issue);
        } else {
            self.warnings.push(issue);
        }
    }

    /// Total number of findings
    pub fn issue_count(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}
