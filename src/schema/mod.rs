//! Structured-data (JSON-LD) validation
//!
//! Documents are untyped [`serde_json::Value`]s discriminated at runtime by
//! `@type`. [`validate_schema`] short-circuits on documents it cannot route
//! (not an object, no `@type`, unsupported type) with a single critical
//! finding; otherwise the per-type validator reports every field problem it
//! finds. [`validate_schemas`] runs the dispatcher over a batch and labels
//! every finding with the 1-based position of its document.

mod checks;

pub mod article;
pub mod faq;
pub mod organization;
pub mod product;

pub use article::validate_article;
pub use faq::validate_faq;
pub use organization::validate_organization;
pub use product::validate_product;

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::contracts::{BatchValidationResult, ValidationError, ValidationResult};

/// Closed set of supported `@type` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Product,
    Article,
    BlogPosting,
    NewsArticle,
    FaqPage,
    Organization,
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 6] = [
        SchemaKind::Product,
        SchemaKind::Article,
        SchemaKind::BlogPosting,
        SchemaKind::NewsArticle,
        SchemaKind::FaqPage,
        SchemaKind::Organization,
    ];

    /// Types sharing the article contract
    pub const ARTICLE_FAMILY: [SchemaKind; 3] = [
        SchemaKind::Article,
        SchemaKind::BlogPosting,
        SchemaKind::NewsArticle,
    ];

    /// The `@type` string
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Product => "Product",
            SchemaKind::Article => "Article",
            SchemaKind::BlogPosting => "BlogPosting",
            SchemaKind::NewsArticle => "NewsArticle",
            SchemaKind::FaqPage => "FAQPage",
            SchemaKind::Organization => "Organization",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unsupported schema type: {}", s))
    }
}

/// Validate one document, routing on `@type`
pub fn validate_schema(doc: &Value) -> ValidationResult {
    let Some(obj) = doc.as_object() else {
        return ValidationResult::single(
            ValidationError::critical("root", "Schema data must be an object")
                .with_fix("Provide a valid schema.org object"),
        );
    };

    let type_name = match obj.get("@type") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };
    let Some(type_name) = type_name else {
        return ValidationResult::single(
            ValidationError::critical("@type", "Missing required @type property")
                .with_fix("Add @type property to specify schema type"),
        );
    };

    let kind = match type_name.parse::<SchemaKind>() {
        Ok(kind) => kind,
        Err(message) => {
            return ValidationResult::single(
                ValidationError::critical("@type", message).with_fix(
                    "Use Product, Article, BlogPosting, NewsArticle, FAQPage, or Organization",
                ),
            );
        }
    };

    let result = match kind {
        SchemaKind::Product => validate_product(obj),
        SchemaKind::Article | SchemaKind::BlogPosting | SchemaKind::NewsArticle => {
            validate_article(obj)
        }
        SchemaKind::FaqPage => validate_faq(obj),
        SchemaKind::Organization => validate_organization(obj),
    };

    debug!(
        schema_type = %kind,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "Validated schema"
    );
    result
}

/// Validate a batch of documents; each finding carries a `Schema N` label
pub fn validate_schemas(docs: &[Value]) -> BatchValidationResult {
    let mut batch = BatchValidationResult::valid();

    for (i, doc) in docs.iter().enumerate() {
        let label = format!("Schema {}", i + 1);
        let result = validate_schema(doc);
        for issue in result.errors.into_iter().chain(result.warnings) {
            batch.push(issue.labeled(&label));
        }
    }

    batch
}
