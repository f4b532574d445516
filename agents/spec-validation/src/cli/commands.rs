//! CLI command definitions for the Spec Validation Agent
//!
//! Clap-based definitions for `spec-validate` (building spec documents)
//! and `geometry-validate` (build metrics).

use chrono::{DateTime, Utc};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};

use super::output::{self, OutputFormat};
use super::ExitCode;
use crate::document::parse_document;
use crate::error::ValidationError;
use crate::geometry::{validate_metrics, GeometryMetrics};
use crate::validator::{report_path_for, Validator};

/// Building spec validator
///
/// Checks a building spec YAML file against the spec schema and its
/// internal consistency rules, then writes a JSON validation report.
#[derive(Parser, Debug)]
#[command(name = "spec-validate")]
#[command(about = "Validate a building spec document and write a JSON report", long_about = None)]
#[command(version)]
pub struct SpecValidateCli {
    /// Path to the building spec YAML file
    pub spec: PathBuf,

    /// Where to write the report
    ///
    /// Defaults to a path derived from the spec file name, e.g.
    /// work/spec/building_v002.yaml -> work/validation/spec_v002_validation.json
    #[arg(short, long, env = "SPEC_VALIDATE_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Fixed report timestamp (RFC 3339) instead of the current time
    #[arg(long, env = "SPEC_VALIDATE_TIMESTAMP", value_parser = parse_timestamp)]
    pub timestamp: Option<DateTime<Utc>>,

    /// Console output format
    #[arg(long, value_enum, default_value = "table", env = "SPEC_VALIDATE_FORMAT")]
    pub format: OutputFormat,

    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the transcript; only errors are printed
    #[arg(short, long)]
    pub quiet: bool,
}

/// Geometry metrics validator
///
/// Checks the metrics JSON produced by the model build for non-manifold
/// edges, intersecting faces, dimension errors and face-count sanity.
#[derive(Parser, Debug)]
#[command(name = "geometry-validate")]
#[command(about = "Validate geometry metrics from a model build", long_about = None)]
#[command(version)]
pub struct GeometryValidateCli {
    /// Path to the metrics JSON file
    #[arg(short, long)]
    pub metrics: PathBuf,

    /// Console output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the report; only the exit code signals the result
    #[arg(short, long)]
    pub quiet: bool,
}

/// Parse an RFC 3339 timestamp into UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{}': {}", value, e))
}

/// Whether two paths name the same file on disk
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Execute spec validation
pub fn execute_validate(cli: SpecValidateCli) -> Result<ExitCode, ValidationError> {
    let table = cli.format == OutputFormat::Table && !cli.quiet;

    let report_path = cli
        .output
        .clone()
        .unwrap_or_else(|| report_path_for(&cli.spec));
    if same_file(&report_path, &cli.spec) {
        return Err(ValidationError::invalid_input(format!(
            "Report path '{}' would overwrite the spec file",
            report_path.display()
        )));
    }

    let content = std::fs::read_to_string(&cli.spec).map_err(|e| {
        ValidationError::file_error(format!(
            "Failed to read spec file '{}': {}",
            cli.spec.display(),
            e
        ))
    })?;

    let document = parse_document(&content).map_err(|e| {
        tracing::error!(spec = %cli.spec.display(), error = %e, "spec parse failed");
        e
    })?;
    if table {
        println!("{} YAML syntax is valid", "✓".green());
    }

    let timestamp = cli.timestamp.unwrap_or_else(Utc::now);
    let run = Validator::new().validate(&cli.spec.to_string_lossy(), &document, timestamp);

    if !cli.quiet {
        output::render_run(&run, cli.format)?;
    }

    run.report.write_to(&report_path)?;

    if table {
        println!();
        println!(
            "{} Validation report written to: {}",
            "✓".green(),
            report_path.display()
        );
    }

    // The verdict lives in the report, not the exit code
    Ok(ExitCode::Success)
}

/// Execute geometry metrics validation
pub fn execute_geometry(cli: GeometryValidateCli) -> Result<ExitCode, ValidationError> {
    if cli.format == OutputFormat::Table && !cli.quiet {
        println!("Loading metrics from: {}", cli.metrics.display());
    }

    let metrics = GeometryMetrics::load(&cli.metrics)?;
    let report = validate_metrics(metrics);

    if !cli.quiet {
        output::render_geometry(&report, cli.format)?;
    }

    if report.passed {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::ValidationFailed)
    }
}
