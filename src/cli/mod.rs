//! CLI for the content gate
//!
//! Optimize and score page metadata, validate JSON-LD documents, scan a
//! source tree for structured data, or run the HTTP gate.

pub mod commands;
pub mod output;

pub use commands::{GateCli, GateCommands};
pub use output::{OutputFormat, TableRender};

use crate::config::GateConfig;
use crate::error::{GateError, Result};

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Everything passed
    Success = 0,
    /// Blocking findings
    ValidationError = 1,
    /// Passed with warnings or suggestions
    ValidationWarning = 2,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine exit code from a validation outcome
    pub fn from_validation_result(has_errors: bool, has_warnings: bool) -> Self {
        if has_errors {
            ExitCode::ValidationError
        } else if has_warnings {
            ExitCode::ValidationWarning
        } else {
            ExitCode::Success
        }
    }

    /// Exit code for a failed command
    pub fn from_error(error: &GateError) -> Self {
        match error {
            GateError::FileError(_) => ExitCode::FileError,
            e if e.is_user_error() => ExitCode::InvalidInput,
            _ => ExitCode::InternalError,
        }
    }
}

/// Run a parsed command line and return the exit code
pub fn run(cli: GateCli) -> Result<ExitCode> {
    let config = GateConfig::load(cli.config.as_deref())?;

    match cli.command {
        GateCommands::Title { title, keyword, format } => {
            commands::execute_title(&config, &title, keyword.as_deref(), format)
        }
        GateCommands::Description {
            description,
            keyword,
            format,
        } => commands::execute_description(&config, &description, keyword.as_deref(), format),
        GateCommands::Score {
            title,
            description,
            keyword,
            format,
        } => commands::execute_score(&config, &title, &description, keyword.as_deref(), format),
        GateCommands::Schema { file, format } => commands::execute_schema(&file, format),
        GateCommands::Scan { path, format } => commands::execute_scan(&path, format),
        GateCommands::Serve { bind } => commands::execute_serve(config, bind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_conversion() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::ValidationError), 1);
        assert_eq!(i32::from(ExitCode::ValidationWarning), 2);
        assert_eq!(i32::from(ExitCode::InternalError), 10);
    }

    #[test]
    fn test_exit_code_from_validation_result() {
        assert_eq!(ExitCode::from_validation_result(false, false), ExitCode::Success);
        assert_eq!(ExitCode::from_validation_result(true, false), ExitCode::ValidationError);
        assert_eq!(ExitCode::from_validation_result(false, true), ExitCode::ValidationWarning);
        assert_eq!(ExitCode::from_validation_result(true, true), ExitCode::ValidationError);
    }

    #[test]
    fn test_exit_code_from_error() {
        assert_eq!(ExitCode::from_error(&GateError::file_error("gone")), ExitCode::FileError);
        assert_eq!(ExitCode::from_error(&GateError::parse_error("bad")), ExitCode::InvalidInput);
        assert_eq!(
            ExitCode::from_error(&GateError::InternalError("boom".into())),
            ExitCode::InternalError
        );
    }
}
