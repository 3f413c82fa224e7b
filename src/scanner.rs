//! Build-time structured-data scanner
//!
//! Walks a source tree, pulls every `<script type="application/ld+json">`
//! block out of page and component files, and runs the batch validator over
//! each file's documents. Standalone `.json` files count as one block when
//! their root carries `@context`.
//!
//! Blocks whose body is produced at runtime (JSX `dangerouslySetInnerHTML`,
//! `{JSON.stringify(...)}` children, template literals) cannot be checked
//! statically and are counted as skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::contracts::{ValidationError, ValidationResult};
use crate::error::{GateError, Result};
use crate::schema::validate_schemas;

/// File extensions to scan
pub const SCANNABLE_EXTENSIONS: &[&str] = &["html", "htm", "tsx", "jsx", "ts", "js", "mdx", "json"];

/// Directories to skip
pub const SKIP_DIRS: &[&str] = &[
    "node_modules", ".git", ".next", "target", "dist", "build", "out", "coverage", ".vercel",
    ".turbo",
];

static SCRIPT_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<script\b").expect("script tag regex"));

static LD_JSON_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\btype\s*=\s*(?:\{\s*)?["']application/ld\+json["']"#)
        .expect("ld+json type regex")
});

static SCRIPT_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</script\s*>").expect("script close regex"));

static CDATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("cdata regex"));

/// Body of one JSON-LD script element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptBlock {
    /// Literal text between the tags
    Literal(String),
    /// Produced at runtime; not checked
    Dynamic,
}

/// Scan outcome for one file that contained JSON-LD
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: PathBuf,
    /// Literal blocks found, parseable or not
    pub blocks: usize,
    /// Documents validated after flattening arrays and `@graph`
    pub documents: usize,
    pub skipped_blocks: usize,
    pub result: ValidationResult,
}

impl FileReport {
    pub fn passed(&self) -> bool {
        self.result.is_valid
    }
}

/// Scan outcome for a whole tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub root: PathBuf,
    pub files_scanned: usize,
    /// Only files that contained at least one JSON-LD block
    pub files: Vec<FileReport>,
}

impl ScanReport {
    pub fn passed(&self) -> bool {
        self.files.iter().all(FileReport::passed)
    }

    pub fn failed_files(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.passed())
    }

    pub fn total_errors(&self) -> usize {
        self.files.iter().map(|f| f.result.errors.len()).sum()
    }

    pub fn total_warnings(&self) -> usize {
        self.files.iter().map(|f| f.result.warnings.len()).sum()
    }

    pub fn total_documents(&self) -> usize {
        self.files.iter().map(|f| f.documents).sum()
    }
}

/// Scan a directory (or a single file) for structured data
pub fn scan_path(root: &Path) -> Result<ScanReport> {
    if !root.exists() {
        return Err(GateError::file_error(format!(
            "Path does not exist: {}",
            root.display()
        )));
    }

    let mut report = ScanReport {
        root: root.to_path_buf(),
        files_scanned: 0,
        files: Vec::new(),
    };

    info!("Scanning for structured data: {}", root.display());

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_str().unwrap_or("");
            !SKIP_DIRS.contains(&name) && !name.starts_with('.')
        })
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_scannable(entry.path()) {
            continue;
        }

        let content = match std::fs::read_to_string(entry.path()) {
            Ok(c) => c,
            Err(e) => {
                info!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        report.files_scanned += 1;
        if let Some(file_report) = analyze_content(entry.path(), &content) {
            report.files.push(file_report);
        }
    }

    info!(
        files_scanned = report.files_scanned,
        files_with_json_ld = report.files.len(),
        errors = report.total_errors(),
        "Scan complete"
    );

    Ok(report)
}

fn is_scannable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| SCANNABLE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Validate the JSON-LD in one file's content
///
/// Returns `None` when the file holds no JSON-LD at all.
pub fn analyze_content(path: &Path, content: &str) -> Option<FileReport> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let blocks = if is_json {
        match serde_json::from_str::<Value>(content) {
            Ok(root) if has_context(&root) => vec![ScriptBlock::Literal(content.to_string())],
            _ => return None,
        }
    } else {
        extract_script_blocks(content)
    };

    if blocks.is_empty() {
        return None;
    }

    let mut documents = Vec::new();
    let mut parse_failures = Vec::new();
    let mut literal = 0;
    let mut skipped = 0;

    for (i, block) in blocks.iter().enumerate() {
        match block {
            ScriptBlock::Dynamic => skipped += 1,
            ScriptBlock::Literal(body) => {
                literal += 1;
                match parse_block(body) {
                    Ok(docs) => documents.extend(docs),
                    Err(e) => parse_failures.push(
                        ValidationError::error("root", format!("Invalid JSON-LD: {}", e))
                            .with_fix("Make the script body valid JSON")
                            .labeled(&format!("Block {}", i + 1)),
                    ),
                }
            }
        }
    }

    let mut result = validate_schemas(&documents);
    for failure in parse_failures {
        result.push(failure);
    }

    debug!(
        path = %path.display(),
        blocks = literal,
        skipped = skipped,
        valid = result.is_valid,
        "Checked file"
    );

    Some(FileReport {
        path: path.to_path_buf(),
        blocks: literal,
        documents: documents.len(),
        skipped_blocks: skipped,
        result,
    })
}

/// Find every `application/ld+json` script element in markup or JSX
pub fn extract_script_blocks(content: &str) -> Vec<ScriptBlock> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    while let Some(open) = SCRIPT_OPEN.find_at(content, cursor) {
        let Some(tag_end) = find_tag_end(content, open.end()) else {
            break;
        };
        let attrs = &content[open.end()..tag_end];
        cursor = tag_end + 1;

        if !LD_JSON_TYPE.is_match(attrs) {
            continue;
        }

        let attrs = attrs.trim_end();
        let self_closing = attrs.ends_with('/');
        if self_closing || attrs.contains("dangerouslySetInnerHTML") {
            blocks.push(ScriptBlock::Dynamic);
            if !self_closing {
                if let Some(close) = SCRIPT_CLOSE.find_at(content, cursor) {
                    cursor = close.end();
                }
            }
            continue;
        }

        let Some(close) = SCRIPT_CLOSE.find_at(content, cursor) else {
            break;
        };
        let body = &content[cursor..close.start()];
        cursor = close.end();

        if is_dynamic_body(body) {
            blocks.push(ScriptBlock::Dynamic);
        } else {
            blocks.push(ScriptBlock::Literal(body.to_string()));
        }
    }

    blocks
}

/// Byte offset of the `>` closing an opening tag
///
/// A `>` inside a JSX `{...}` expression or a quoted attribute value does not
/// end the tag.
fn find_tag_end(content: &str, from: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (offset, c) in content[from..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') | (None, '`') => quote = Some(c),
            (None, '{') => depth += 1,
            (None, '}') => depth = depth.saturating_sub(1),
            (None, '>') if depth == 0 => return Some(from + offset),
            _ => {}
        }
    }
    None
}

/// Empty bodies and JSX expression children are runtime-generated
fn is_dynamic_body(body: &str) -> bool {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return true;
    }
    match trimmed.strip_prefix('{') {
        Some(rest) => !matches!(rest.trim_start().chars().next(), Some('"') | Some('}')),
        None => false,
    }
}

/// Parse one block body and flatten it into documents
///
/// Top-level arrays yield one document per element; `@graph` members are
/// validated individually and inherit the container's `@context`.
pub fn parse_block(body: &str) -> std::result::Result<Vec<Value>, serde_json::Error> {
    let text = strip_cdata(body);
    let value: Value = serde_json::from_str(text)?;
    let mut documents = Vec::new();
    flatten(value, &mut documents);
    Ok(documents)
}

fn flatten(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten(item, out);
            }
        }
        Value::Object(mut map) => match map.remove("@graph") {
            Some(Value::Array(nodes)) => {
                let context = map.get("@context").cloned();
                for node in nodes {
                    out.push(with_context(node, context.as_ref()));
                }
            }
            Some(other) => {
                map.insert("@graph".to_string(), other);
                out.push(Value::Object(map));
            }
            None => out.push(Value::Object(map)),
        },
        other => out.push(other),
    }
}

fn with_context(node: Value, context: Option<&Value>) -> Value {
    match (node, context) {
        (Value::Object(mut map), Some(context)) => {
            map.entry("@context").or_insert_with(|| context.clone());
            Value::Object(map)
        }
        (node, _) => node,
    }
}

fn strip_cdata(body: &str) -> &str {
    let inner = CDATA
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(body);
    inner
        .trim()
        .trim_end_matches("//")
        .trim_end_matches("/*")
        .trim()
}

fn has_context(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.contains_key("@context"),
        _ => false,
    }
}
