//! Console output for the validation CLIs
//!
//! `table` prints the sectioned check transcript with status glyphs;
//! `json` and `yaml` print the report document itself for machine use.

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use std::io::{self, Write};

use crate::checks::{Observation, SectionOutcome, Severity};
use crate::error::{Result, ValidationError};
use crate::geometry::GeometryReport;
use crate::report::{ValidationReport, ValidationStatus};
use crate::validator::ValidationRun;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable transcript with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// Glyph for a transcript line
fn marker(observation: &Observation) -> ColoredString {
    match observation {
        Observation::Passed(_) => "✓".green(),
        Observation::Issue(issue) => match issue.severity {
            Severity::Critical => "✗".red(),
            Severity::Warning => "⚠".yellow(),
            Severity::Recommendation => "⚠".blue(),
        },
        Observation::Note(_) => "⚠".dimmed(),
    }
}

fn text(observation: &Observation) -> &str {
    match observation {
        Observation::Passed(text) | Observation::Note(text) => text,
        Observation::Issue(issue) => &issue.message,
    }
}

fn write_header<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", format!("=== {} ===", title).cyan().bold())
}

/// Write the per-check transcript
pub fn write_sections<W: Write>(out: &mut W, sections: &[SectionOutcome]) -> io::Result<()> {
    for section in sections {
        write_header(out, section.title)?;
        for observation in &section.observations {
            writeln!(out, "{} {}", marker(observation), text(observation))?;
        }
    }
    Ok(())
}

/// Write the verdict block that closes the transcript
pub fn write_summary<W: Write>(out: &mut W, report: &ValidationReport) -> io::Result<()> {
    write_header(out, "VALIDATION SUMMARY")?;

    match report.validation_status {
        ValidationStatus::Fail => writeln!(
            out,
            "{} {}: {} critical issue(s)",
            "✗".red(),
            "FAIL".red().bold(),
            report.critical_issues.len()
        )?,
        ValidationStatus::PassWithWarnings => writeln!(
            out,
            "{} {}: {} warning(s)",
            "⚠".yellow(),
            "PASS WITH WARNINGS".yellow().bold(),
            report.warnings.len()
        )?,
        ValidationStatus::Pass => {
            writeln!(out, "{} {}: All checks passed", "✓".green(), "PASS".green().bold())?
        }
    }

    writeln!(out)?;
    writeln!(out, "Approval: {}", report.approval)?;
    writeln!(out, "Warnings: {}", report.warnings.len())?;
    writeln!(out, "Recommendations: {}", report.recommendations.len())
}

/// A failed console write is not a problem with any input file
pub fn console_error(error: io::Error) -> ValidationError {
    ValidationError::internal(format!("Failed to write console output: {}", error))
}

/// Render a validation run to stdout
pub fn render_run(run: &ValidationRun, format: OutputFormat) -> Result<()> {
    let mut stdout = io::stdout();

    let written = match format {
        OutputFormat::Table => write_sections(&mut stdout, &run.sections)
            .and_then(|_| write_summary(&mut stdout, &run.report)),
        OutputFormat::Json => writeln!(stdout, "{}", run.report.to_json_pretty()?),
        OutputFormat::Yaml => write!(stdout, "{}", run.report.to_yaml()?),
    };

    written.and_then(|_| stdout.flush()).map_err(console_error)
}

/// Write the geometry report in the human-readable layout
pub fn write_geometry_report<W: Write>(out: &mut W, report: &GeometryReport) -> io::Result<()> {
    let rule = "=".repeat(60);
    let count = |value: Option<u64>| value.map_or_else(|| "N/A".to_string(), |v| v.to_string());

    writeln!(out)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "{}", "GEOMETRY VALIDATION REPORT".cyan().bold())?;
    writeln!(out, "{}", rule)?;

    writeln!(out)?;
    writeln!(out, "Metrics Summary:")?;
    writeln!(out, "  Vertices: {}", count(report.metrics.vertex_count))?;
    writeln!(out, "  Faces: {}", count(report.metrics.face_count))?;
    writeln!(out, "  Edges: {}", count(report.metrics.edge_count))?;

    writeln!(out)?;
    if report.errors.is_empty() {
        writeln!(out, "{} No errors found", "✓".green())?;
    } else {
        writeln!(out, "{} ERRORS ({}):", "✗".red(), report.errors.len())?;
        for error in &report.errors {
            writeln!(out, "  - {}", error)?;
        }
    }

    writeln!(out)?;
    if report.warnings.is_empty() {
        writeln!(out, "{} No warnings", "✓".green())?;
    } else {
        writeln!(out, "{} WARNINGS ({}):", "⚠".yellow(), report.warnings.len())?;
        for warning in &report.warnings {
            writeln!(out, "  - {}", warning)?;
        }
    }

    if !report.metrics_warnings().is_empty() {
        writeln!(out)?;
        writeln!(out, "{} METRICS WARNINGS:", "⚠".yellow())?;
        for warning in report.metrics_warnings() {
            writeln!(out, "  - {}", warning)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", rule)?;
    if report.passed {
        writeln!(out, "{}", "VALIDATION PASSED".green().bold())?;
    } else {
        writeln!(out, "{}", "VALIDATION FAILED".red().bold())?;
    }
    writeln!(out, "{}", rule)
}

/// Render a geometry report to stdout
pub fn render_geometry(report: &GeometryReport, format: OutputFormat) -> Result<()> {
    let mut stdout = io::stdout();

    let written = match format {
        OutputFormat::Table => write_geometry_report(&mut stdout, report),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report)
                .map_err(|e| ValidationError::SerializationError(e.to_string()))?;
            writeln!(stdout, "{}", json)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(report)
                .map_err(|e| ValidationError::SerializationError(e.to_string()))?;
            write!(stdout, "{}", yaml)
        }
    };

    written.and_then(|_| stdout.flush()).map_err(console_error)
}
