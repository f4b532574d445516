//! CLI module for the Spec Validation Agent
//!
//! Command-line entry points for validating building spec documents and
//! geometry metrics.

pub mod commands;
pub mod output;

pub use commands::{GeometryValidateCli, SpecValidateCli};
pub use output::OutputFormat;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::ValidationError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Validation completed (spec verdict is in the report)
    Success = 0,
    /// Geometry validation found errors
    ValidationFailed = 1,
    /// Input document could not be parsed
    ParseError = 2,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Map a run-stopping error to its exit code
    pub fn from_error(error: &ValidationError) -> Self {
        match error {
            ValidationError::ParseError(_) => ExitCode::ParseError,
            ValidationError::FileError(_) => ExitCode::FileError,
            ValidationError::InvalidInput(_) => ExitCode::InvalidInput,
            ValidationError::SerializationError(_) | ValidationError::InternalError(_) => {
                ExitCode::InternalError
            }
        }
    }
}

/// Build the log filter.
///
/// Non-empty `RUST_LOG` directives win; otherwise `-v` raises the level
/// from WARN.
pub fn log_filter(directives: Option<&str>, verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(level.into()))
}

/// Initialize the tracing subscriber. Logs go to stderr so stdout carries
/// only the transcript or report.
pub fn init_tracing(verbose: u8) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref(), verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn finish(result: Result<ExitCode, ValidationError>) -> ExitCode {
    match result {
        Ok(code) => code,
        Err(e) => {
            if !e.is_user_error() {
                tracing::error!(error = %e, "validation run aborted");
            }
            eprintln!("✗ {}", e);
            ExitCode::from_error(&e)
        }
    }
}

/// Run `spec-validate` and return the exit code
pub fn run(cli: SpecValidateCli) -> ExitCode {
    finish(commands::execute_validate(cli))
}

/// Run `geometry-validate` and return the exit code
pub fn run_geometry(cli: GeometryValidateCli) -> ExitCode {
    finish(commands::execute_geometry(cli))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_conversion() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::ValidationFailed), 1);
        assert_eq!(i32::from(ExitCode::ParseError), 2);
        assert_eq!(i32::from(ExitCode::InternalError), 10);
    }

    #[test]
    fn test_exit_code_from_error() {
        assert_eq!(
            ExitCode::from_error(&ValidationError::parse_error("bad yaml")),
            ExitCode::ParseError
        );
        assert_eq!(
            ExitCode::from_error(&ValidationError::file_error("missing")),
            ExitCode::FileError
        );
        assert_eq!(
            ExitCode::from_error(&ValidationError::invalid_input("same path")),
            ExitCode::InvalidInput
        );
        assert_eq!(
            ExitCode::from_error(&ValidationError::internal("stdout closed")),
            ExitCode::InternalError
        );
        assert_eq!(
            ExitCode::from_error(&ValidationError::SerializationError("x".to_string())),
            ExitCode::InternalError
        );
    }

    #[test]
    fn test_rust_log_overrides_verbosity() {
        assert_eq!(log_filter(Some("debug"), 0).to_string(), "debug");
        assert_eq!(
            log_filter(Some("spec_validation=trace"), 1).to_string(),
            "spec_validation=trace"
        );
    }

    #[test]
    fn test_verbosity_sets_default_level() {
        assert_eq!(log_filter(None, 0).to_string(), "warn");
        assert_eq!(log_filter(None, 2).to_string(), "debug");
        assert_eq!(log_filter(Some("  "), 1).to_string(), "info");
        assert_eq!(log_filter(None, 9).to_string(), "trace");
    }
}
