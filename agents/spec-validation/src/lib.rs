//! Spec Validation Agent
//!
//! Validates building spec documents (YAML) before a model is built from
//! them, and validates the geometry metrics the build produces.
//!
//! ## Architecture
//!
//! 1. **Document** (`document`): the parsed spec tree and the YAML adapter.
//!
//! 2. **Schema** (`schema`): static required-field tables and thresholds.
//!
//! 3. **Checks** (`checks/`): pure checks over a document. Field checks
//!    cover presence and coarse types; consistency checks cover relations
//!    between fields (height identity, roof alignment, positive
//!    dimensions, traceability).
//!
//! 4. **Report** (`report`): classifies issues into critical issues,
//!    warnings and recommendations and derives the verdict.
//!
//! 5. **Validator** (`validator`): runs the checks in order and derives
//!    the default report location.
//!
//! 6. **Geometry** (`geometry`): metrics-file quality gate.
//!
//! 7. **CLI** (`cli/`): `spec-validate` and `geometry-validate`.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Validate a spec; the report lands in work/validation/spec_v002_validation.json
//! spec-validate work/spec/building_v002.yaml
//!
//! # Explicit report path and a fixed timestamp
//! spec-validate plan.yaml --output reports/plan.json --timestamp 2024-05-01T12:00:00Z
//!
//! # Geometry metrics from a build
//! geometry-validate --metrics work/metrics/metrics_001.json
//! ```
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use spec_validation::{parse_document, ValidationStatus, Validator};
//!
//! let document = parse_document("version: v2\n").unwrap();
//! let run = Validator::new().validate("inline.yaml", &document, Utc::now());
//!
//! assert_eq!(run.report.validation_status, ValidationStatus::Fail);
//! assert!(run
//!     .report
//!     .critical_issues
//!     .contains(&"Missing required field: units".to_string()));
//! ```

pub mod checks;
pub mod cli;
pub mod document;
pub mod error;
pub mod geometry;
pub mod report;
pub mod schema;
pub mod validator;

// Re-export commonly used types
pub use checks::{Check, Issue, Observation, SectionOutcome, Severity};
pub use cli::{ExitCode, GeometryValidateCli, OutputFormat, SpecValidateCli};
pub use document::{load_document, parse_document, Kind, SpecMap, SpecValue};
pub use error::{Result, ValidationError};
pub use geometry::{validate_metrics, GeometryMetrics, GeometryReport};
pub use report::{Approval, ReportBuilder, ValidationReport, ValidationStatus, Verdict};
pub use validator::{report_path_for, ValidationRun, Validator};

/// Agent version (from Cargo.toml)
pub const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Agent identifier
pub const AGENT_ID: &str = "spec-validation-agent";

/// Run the `spec-validate` CLI
///
/// This is the main entry point for the binary.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use spec_validation::{run_cli, SpecValidateCli};
///
/// fn main() {
///     let cli = SpecValidateCli::parse();
///     let exit_code = run_cli(cli);
///     std::process::exit(exit_code.into());
/// }
/// ```
pub fn run_cli(cli: SpecValidateCli) -> ExitCode {
    cli::init_tracing(cli.verbose);
    tracing::debug!(agent = AGENT_ID, version = AGENT_VERSION, spec = %cli.spec.display(), "starting");
    cli::run(cli)
}

/// Run the `geometry-validate` CLI
pub fn run_geometry_cli(cli: GeometryValidateCli) -> ExitCode {
    cli::init_tracing(cli.verbose);
    tracing::debug!(agent = AGENT_ID, version = AGENT_VERSION, metrics = %cli.metrics.display(), "starting");
    cli::run_geometry(cli)
}
