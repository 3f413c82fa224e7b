//! Field-level checks shared by the per-type validators
//!
//! A [`FieldChecker`] walks one JSON-LD document and accumulates one
//! [`ValidationError`] per missing or malformed field. Field paths are dotted
//! (`offers.priceCurrency`) with bracketed indices for arrays
//! (`mainEntity[1].acceptedAnswer.text`), and every message names its path.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::contracts::{ValidationError, ValidationResult};

static CONTEXT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https://schema\.org/?$").expect("valid @context pattern"));

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));

pub(crate) type Object = Map<String, Value>;

/// Join an object key onto a field path
pub(crate) fn child(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// Join an array index onto a field path
pub(crate) fn index(path: &str, i: usize) -> String {
    format!("{}[{}]", path, i)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A parsed `date-time` value
///
/// Offsets are optional in schema.org dates. Two values are compared as
/// instants when both carry an offset, otherwise on their wall-clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SchemaDateTime {
    Zoned(DateTime<FixedOffset>),
    Local(NaiveDateTime),
}

impl SchemaDateTime {
    pub fn parse(text: &str) -> Option<Self> {
        if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
            return Some(Self::Zoned(zoned));
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(Self::Local)
    }

    fn wall_clock(&self) -> NaiveDateTime {
        match self {
            Self::Zoned(zoned) => zoned.naive_local(),
            Self::Local(local) => *local,
        }
    }

    pub fn is_before(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Zoned(a), Self::Zoned(b)) => a < b,
            _ => self.wall_clock() < other.wall_clock(),
        }
    }
}

impl std::fmt::Display for SchemaDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zoned(zoned) => write!(f, "{}", zoned.to_rfc3339()),
            Self::Local(local) => write!(f, "{}", local.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

/// Accumulator for field-level findings on one document
#[derive(Debug, Default)]
pub(crate) struct FieldChecker {
    issues: Vec<ValidationError>,
}

impl FieldChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> ValidationResult {
        ValidationResult::from_issues(self.issues)
    }

    pub fn error(&mut self, path: &str, message: impl Into<String>, fix: impl Into<String>) {
        self.issues.push(ValidationError::error(path, message).with_fix(fix));
    }

    pub fn warning(&mut self, path: &str, message: impl Into<String>, fix: impl Into<String>) {
        self.issues.push(ValidationError::warning(path, message).with_fix(fix));
    }

    fn missing(&mut self, path: &str) {
        self.error(
            path,
            format!("Missing required property: {}", path),
            format!("Add required property: {}", path),
        );
    }

    fn wrong_kind(&mut self, path: &str, expected: &str, found: &Value) {
        self.error(
            path,
            format!("{} must be {} (found {})", path, expected, json_kind(found)),
            format!("Change {} to type: {}", path, expected),
        );
    }

    /// Look up a required key, recording a finding when absent or null
    pub fn required<'a>(&mut self, obj: &'a Object, key: &str, path: &str) -> Option<&'a Value> {
        match obj.get(key) {
            Some(Value::Null) | None => {
                self.missing(&child(path, key));
                None
            }
            Some(value) => Some(value),
        }
    }

    /// Look up an optional key; `null` counts as absent
    pub fn optional<'a>(obj: &'a Object, key: &str) -> Option<&'a Value> {
        obj.get(key).filter(|v| !v.is_null())
    }

    pub fn object<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Object> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.wrong_kind(path, "an object", other);
                None
            }
        }
    }

    pub fn string<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a str> {
        match value {
            Value::String(s) => Some(s),
            other => {
                self.wrong_kind(path, "a string", other);
                None
            }
        }
    }

    pub fn non_empty_string<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a str> {
        let text = self.string(value, path)?;
        if text.trim().is_empty() {
            self.error(
                path,
                format!("{} must not be empty", path),
                format!("Increase {} length to at least 1 characters", path),
            );
            return None;
        }
        Some(text)
    }

    pub fn max_chars(&mut self, text: &str, limit: usize, path: &str) {
        let length = text.chars().count();
        if length > limit {
            self.error(
                path,
                format!("{} must be at most {} characters (found {})", path, limit, length),
                format!("Reduce {} length to at most {} characters", path, limit),
            );
        }
    }

    /// Require a number or a numeric-looking string such as `"24.99"`
    pub fn number_or_string(&mut self, value: &Value, path: &str) {
        if !matches!(value, Value::Number(_) | Value::String(_)) {
            self.wrong_kind(path, "a number or string", value);
        }
    }

    pub fn url(&mut self, value: &Value, path: &str) {
        if let Some(text) = self.string(value, path) {
            if url::Url::parse(text).is_err() {
                self.error(
                    path,
                    format!("{} must be a valid absolute URL", path),
                    format!("Fix {} to match format: uri", path),
                );
            }
        }
    }

    /// A URL string or a non-empty array of URL strings
    pub fn url_or_urls(&mut self, value: &Value, path: &str) {
        match value {
            Value::String(_) => self.url(value, path),
            Value::Array(items) if items.is_empty() => self.error(
                path,
                format!("{} must contain at least one URL", path),
                format!("Add at least one URL to {}", path),
            ),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.url(item, &index(path, i));
                }
            }
            other => self.wrong_kind(path, "a URL string or an array of URLs", other),
        }
    }

    pub fn email(&mut self, value: &Value, path: &str) {
        if let Some(text) = self.string(value, path) {
            if !EMAIL_PATTERN.is_match(text) {
                self.error(
                    path,
                    format!("{} must be a valid email address", path),
                    format!("Fix {} to match format: email", path),
                );
            }
        }
    }

    /// ISO 8601 date-time with or without an offset; a bare date is rejected
    pub fn date_time(&mut self, value: &Value, path: &str) -> Option<SchemaDateTime> {
        let text = self.string(value, path)?;
        match SchemaDateTime::parse(text) {
            Some(parsed) => Some(parsed),
            None => {
                self.error(
                    path,
                    format!("{} must be an ISO 8601 date-time such as 2026-01-15T10:00:00Z", path),
                    format!("Fix {} to match format: date-time", path),
                );
                None
            }
        }
    }

    /// Calendar date `YYYY-MM-DD`
    pub fn date(&mut self, value: &Value, path: &str) {
        if let Some(text) = self.string(value, path) {
            if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err() {
                self.error(
                    path,
                    format!("{} must be a date such as 2026-12-31", path),
                    format!("Fix {} to match format: date", path),
                );
            }
        }
    }

    /// Require a string matching `pattern`
    pub fn pattern(&mut self, value: &Value, pattern: &Regex, path: &str, fix: &str) {
        if let Some(text) = self.string(value, path) {
            if !pattern.is_match(text) {
                self.error(
                    path,
                    format!("{} has an invalid value: \"{}\"", path, text),
                    fix,
                );
            }
        }
    }

    /// `@context` must be the schema.org vocabulary URL
    pub fn context(&mut self, doc: &Object) {
        if let Some(value) = self.required(doc, "@context", "") {
            self.pattern(
                value,
                &CONTEXT_PATTERN,
                "@context",
                "Set @context to https://schema.org",
            );
        }
    }

    /// Require `@type` to be one of `allowed`
    pub fn type_in(&mut self, obj: &Object, allowed: &[&str], path: &str) {
        let field = child(path, "@type");
        let Some(value) = self.required(obj, "@type", path) else {
            return;
        };
        let Some(found) = self.string(value, &field) else {
            return;
        };
        if !allowed.contains(&found) {
            self.error(
                &field,
                format!("{} must be one of: {} (found {})", field, allowed.join(", "), found),
                format!("Use one of the allowed values: {}", allowed.join(", ")),
            );
        }
    }

    /// A single object or a non-empty array of objects, each passed to `each`
    pub fn one_or_many<F>(&mut self, value: &Value, path: &str, mut each: F)
    where
        F: FnMut(&mut Self, &Object, &str),
    {
        match value {
            Value::Object(obj) => each(self, obj, path),
            Value::Array(items) if items.is_empty() => self.error(
                path,
                format!("{} must not be an empty array", path),
                format!("Add at least one entry to {}", path),
            ),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = index(path, i);
                    if let Some(obj) = self.object(item, &item_path) {
                        each(self, obj, &item_path);
                    }
                }
            }
            other => self.wrong_kind(path, "an object or an array of objects", other),
        }
    }

    /// A non-empty array, each element passed to `each`
    pub fn non_empty_array<F>(&mut self, value: &Value, path: &str, mut each: F)
    where
        F: FnMut(&mut Self, &Value, &str),
    {
        match value {
            Value::Array(items) if items.is_empty() => self.error(
                path,
                format!("{} must contain at least one entry", path),
                format!("Add at least one entry to {}", path),
            ),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    each(self, item, &index(path, i));
                }
            }
            other => self.wrong_kind(path, "an array", other),
        }
    }

    /// Any array (possibly empty), each element passed to `each`
    pub fn array<F>(&mut self, value: &Value, path: &str, mut each: F)
    where
        F: FnMut(&mut Self, &Value, &str),
    {
        match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    each(self, item, &index(path, i));
                }
            }
            other => self.wrong_kind(path, "an array", other),
        }
    }

    /// Required non-empty string property
    pub fn required_text<'a>(&mut self, obj: &'a Object, key: &str, path: &str) -> Option<&'a str> {
        let value = self.required(obj, key, path)?;
        self.non_empty_string(value, &child(path, key))
    }

    /// A logo: URL string or `ImageObject` with a `url`
    pub fn logo(&mut self, value: &Value, path: &str) {
        match value {
            Value::String(_) => self.url(value, path),
            Value::Object(obj) => {
                self.type_in(obj, &["ImageObject"], path);
                if let Some(url) = self.required(obj, "url", path) {
                    self.url(url, &child(path, "url"));
                }
                for key in ["width", "height"] {
                    if let Some(dim) = Self::optional(obj, key) {
                        self.number_or_string(dim, &child(path, key));
                    }
                }
            }
            other => self.wrong_kind(path, "a URL string or an ImageObject", other),
        }
    }
}
