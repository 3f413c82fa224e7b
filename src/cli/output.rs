//! Output formatting for the CLI
//!
//! JSON, YAML, or a human-readable table with severity-based coloring.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::contracts::{
    ContentQualityScore, OptimizedDescription, OptimizedTitle, Severity, ValidationError,
    ValidationResult,
};
use crate::error::{GateError, Result};
use crate::scanner::ScanReport;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    Yaml,
}

/// Types that know how to print themselves as a table
pub trait TableRender {
    fn render_table(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Render `value` to stdout in `format`
pub fn render<T>(value: &T, format: OutputFormat) -> Result<()>
where
    T: Serialize + TableRender,
{
    let mut stdout = io::stdout();
    render_to(value, format, &mut stdout)?;
    stdout.flush().ok();
    Ok(())
}

/// Render `value` to any writer in `format`
pub fn render_to<T>(value: &T, format: OutputFormat, out: &mut dyn Write) -> Result<()>
where
    T: Serialize + TableRender,
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| GateError::SerializationError(e.to_string()))?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(value)?;
            write!(out, "{}", yaml)?;
        }
        OutputFormat::Table => value.render_table(out)?,
    }
    Ok(())
}

/// Schema validation result tagged with where the document came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaOutput {
    pub source: String,
    #[serde(flatten)]
    pub result: ValidationResult,
}

fn header(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title.cyan().bold())?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out)
}

fn status_line(out: &mut dyn Write, passed: bool, summary: &str) -> io::Result<()> {
    let icon = if passed { "+".green() } else { "x".red() };
    writeln!(out, "{} {}", icon, summary)
}

fn advice_list(out: &mut dyn Write, label: &str, items: &[String]) -> io::Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{}", label.cyan().bold())?;
    for item in items {
        writeln!(out, "  {} {}", "!".yellow(), item)?;
    }
    Ok(())
}

fn finding_row(out: &mut dyn Write, finding: &ValidationError) -> io::Result<()> {
    let (icon, label) = match finding.severity {
        Severity::Critical => ("x".red(), "CRITICAL".red().bold()),
        Severity::Error => ("x".red(), "ERROR".red().bold()),
        Severity::Warning => ("!".yellow(), "WARNING".yellow().bold()),
    };

    writeln!(out, "{} {} {}", icon, label, finding.message)?;
    writeln!(out, "  {} {}", "Field:".dimmed(), finding.field.cyan())?;
    if let Some(fix) = &finding.fix {
        writeln!(out, "  {} {}", "Fix:".dimmed(), fix.green())?;
    }
    Ok(())
}

fn findings(out: &mut dyn Write, result: &ValidationResult) -> io::Result<()> {
    if result.issue_count() == 0 {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{}", "Findings:".cyan().bold())?;
    writeln!(out, "{}", "-".repeat(60))?;
    for finding in result.errors.iter().chain(&result.warnings) {
        finding_row(out, finding)?;
    }
    Ok(())
}

fn length_summary(text: &str, length: usize, truncated: bool) -> String {
    let note = if truncated { ", truncated" } else { "" };
    format!("{} ({} chars{})", text, length, note)
}

impl TableRender for OptimizedTitle {
    fn render_table(&self, out: &mut dyn Write) -> io::Result<()> {
        header(out, "Optimized Title")?;
        status_line(
            out,
            self.warnings.is_empty(),
            &length_summary(&self.text, self.length, self.is_truncated),
        )?;
        advice_list(out, "Changes:", &self.warnings)
    }
}

impl TableRender for OptimizedDescription {
    fn render_table(&self, out: &mut dyn Write) -> io::Result<()> {
        header(out, "Optimized Description")?;
        status_line(
            out,
            self.warnings.is_empty(),
            &length_summary(&self.text, self.length, self.is_truncated),
        )?;
        advice_list(out, "Changes:", &self.warnings)
    }
}

impl TableRender for ContentQualityScore {
    fn render_table(&self, out: &mut dyn Write) -> io::Result<()> {
        header(out, "Content Quality")?;
        let score = format!("{}/100", self.score);
        let score = if self.is_valid { score.green() } else { score.red() };
        let verdict = if self.is_valid { "passes" } else { "below passing score" };
        status_line(out, self.is_valid, &format!("Score {} ({})", score, verdict))?;
        advice_list(out, "Suggestions:", &self.suggestions)
    }
}

impl TableRender for SchemaOutput {
    fn render_table(&self, out: &mut dyn Write) -> io::Result<()> {
        header(out, "Structured Data")?;
        let summary = if self.result.is_valid && self.result.warnings.is_empty() {
            format!("{} is valid", self.source)
        } else if self.result.is_valid {
            format!("{} is valid with {} warning(s)", self.source, self.result.warnings.len())
        } else {
            format!(
                "{} has {} error(s) and {} warning(s)",
                self.source,
                self.result.errors.len(),
                self.result.warnings.len()
            )
        };
        status_line(out, self.result.is_valid, &summary)?;
        findings(out, &self.result)
    }
}

impl TableRender for ScanReport {
    fn render_table(&self, out: &mut dyn Write) -> io::Result<()> {
        header(out, "Structured Data Scan")?;

        for file in &self.files {
            let icon = if file.passed() { "PASS".green().bold() } else { "FAIL".red().bold() };
            let skipped = if file.skipped_blocks > 0 {
                format!(", {} skipped", file.skipped_blocks)
            } else {
                String::new()
            };
            writeln!(
                out,
                "{} {} ({} document(s){})",
                icon,
                file.path.display(),
                file.documents,
                skipped
            )?;
            for finding in file.result.errors.iter().chain(&file.result.warnings) {
                write!(out, "    ")?;
                finding_row(out, finding)?;
            }
        }

        writeln!(out)?;
        let summary = format!(
            "{} file(s) scanned, {} with JSON-LD, {} failing; {} error(s), {} warning(s)",
            self.files_scanned,
            self.files.len(),
            self.failed_files().count(),
            self.total_errors(),
            self.total_warnings()
        );
        status_line(out, self.passed(), &summary)
    }
}
