//! CLI command definitions

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::output::{render, OutputFormat, SchemaOutput};
use super::ExitCode;
use crate::config::GateConfig;
use crate::error::{GateError, Result};
use crate::scanner::scan_path;
use crate::schema::{validate_schema, validate_schemas};

/// SEO content gate
///
/// Optimize and score page titles and descriptions, and validate JSON-LD
/// structured data before it ships.
#[derive(Parser, Debug)]
#[command(name = "seo-gate")]
#[command(
    about = "SEO content gate - metadata optimization and structured-data validation",
    long_about = None
)]
#[command(version)]
pub struct GateCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(long, global = true, env = "SEO_GATE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: GateCommands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum GateCommands {
    /// Optimize a page title for search display
    Title {
        /// The title to optimize
        title: String,

        /// Keyword the title should lead with
        #[arg(short, long)]
        keyword: Option<String>,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Optimize a meta description for search display
    Description {
        /// The description to optimize
        description: String,

        /// Keyword the description should mention
        #[arg(short, long)]
        keyword: Option<String>,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Score a title and description pair
    ///
    /// Exits 1 when the score is below the passing threshold and 2 when it
    /// passes with suggestions.
    Score {
        #[arg(short, long, default_value = "")]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(short, long)]
        keyword: Option<String>,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Validate a JSON-LD document (or an array of them)
    Schema {
        /// JSON file to validate, or `-` for stdin
        file: PathBuf,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Scan a source tree for JSON-LD blocks and validate them
    Scan {
        /// Directory or file to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Run the HTTP gate
    Serve {
        /// Address to bind, overriding the configuration
        #[arg(short, long)]
        bind: Option<String>,
    },
}

/// Execute the title command
pub fn execute_title(
    config: &GateConfig,
    title: &str,
    keyword: Option<&str>,
    format: OutputFormat,
) -> Result<ExitCode> {
    let result = config.optimizer().optimize_title(title, keyword);
    render(&result, format)?;
    Ok(ExitCode::from_validation_result(false, !result.warnings.is_empty()))
}

/// Execute the description command
pub fn execute_description(
    config: &GateConfig,
    description: &str,
    keyword: Option<&str>,
    format: OutputFormat,
) -> Result<ExitCode> {
    let result = config.optimizer().optimize_description(description, keyword);
    render(&result, format)?;
    Ok(ExitCode::from_validation_result(false, !result.warnings.is_empty()))
}

/// Execute the score command
pub fn execute_score(
    config: &GateConfig,
    title: &str,
    description: &str,
    keyword: Option<&str>,
    format: OutputFormat,
) -> Result<ExitCode> {
    if title.is_empty() && description.is_empty() {
        return Err(GateError::invalid_input(
            "Provide --title and/or --description to score",
        ));
    }

    let score = config.scorer().score_content(title, description, keyword);
    render(&score, format)?;
    Ok(ExitCode::from_validation_result(
        !score.is_valid,
        !score.suggestions.is_empty(),
    ))
}

/// Execute the schema command
pub fn execute_schema(file: &Path, format: OutputFormat) -> Result<ExitCode> {
    let content = read_source(file)?;
    let doc: Value = serde_json::from_str(&content)?;

    let result = match &doc {
        Value::Array(docs) => validate_schemas(docs),
        single => validate_schema(single),
    };

    let output = SchemaOutput {
        source: file.display().to_string(),
        result,
    };
    render(&output, format)?;

    Ok(ExitCode::from_validation_result(
        !output.result.is_valid,
        !output.result.warnings.is_empty(),
    ))
}

/// Execute the scan command
pub fn execute_scan(path: &Path, format: OutputFormat) -> Result<ExitCode> {
    let report = scan_path(path)?;
    render(&report, format)?;
    Ok(ExitCode::from_validation_result(
        report.total_errors() > 0,
        report.total_warnings() > 0,
    ))
}

/// Execute the serve command; blocks until shutdown
pub fn execute_serve(mut config: GateConfig, bind: Option<String>) -> Result<ExitCode> {
    if let Some(bind) = bind {
        config.server.bind_address = bind;
    }

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| GateError::InternalError(format!("Failed to start runtime: {}", e)))?;
    runtime.block_on(crate::handler::serve(&config))?;
    Ok(ExitCode::Success)
}

fn read_source(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }

    std::fs::read_to_string(file).map_err(|e| {
        GateError::file_error(format!("Failed to read '{}': {}", file.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_parses_title_command() {
        let cli =
            GateCli::parse_from(["seo-gate", "title", "Cat Litter Tips", "--keyword", "litter"]);
        match cli.command {
            GateCommands::Title { title, keyword, format } => {
                assert_eq!(title, "Cat Litter Tips");
                assert_eq!(keyword.as_deref(), Some("litter"));
                assert_eq!(format, OutputFormat::Table);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_scan_defaults_to_cwd() {
        let cli = GateCli::parse_from(["seo-gate", "scan", "--format", "json"]);
        assert!(matches!(
            cli.command,
            GateCommands::Scan { ref path, format: OutputFormat::Json } if path == Path::new(".")
        ));
    }

    #[test]
    fn test_score_requires_content() {
        let err =
            execute_score(&GateConfig::default(), "", "", None, OutputFormat::Json).unwrap_err();
        assert!(matches!(err, GateError::InvalidInput(_)));
    }

    #[test]
    fn test_schema_missing_file() {
        let err =
            execute_schema(Path::new("/no/such/schema.json"), OutputFormat::Json).unwrap_err();
        assert_eq!(ExitCode::from_error(&err), ExitCode::FileError);
    }

    #[test]
    fn test_schema_exit_codes() {
        let mut invalid = tempfile::NamedTempFile::new().unwrap();
        write!(invalid, r#"{{"@context": "https://schema.org", "@type": "Recipe"}}"#).unwrap();
        assert_eq!(
            execute_schema(invalid.path(), OutputFormat::Json).unwrap(),
            ExitCode::ValidationError
        );

        let mut malformed = tempfile::NamedTempFile::new().unwrap();
        write!(malformed, "{{not json").unwrap();
        let err = execute_schema(malformed.path(), OutputFormat::Json).unwrap_err();
        assert_eq!(ExitCode::from_error(&err), ExitCode::InvalidInput);
    }
}
