//! Validator: runs the check sequence and derives the report location

use chrono::{DateTime, Utc};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::checks::{default_checks, Check, SectionOutcome};
use crate::document::{load_document, SpecValue};
use crate::error::Result;
use crate::report::{ReportBuilder, ValidationReport};

/// Outcome of one validation run: the transcript and the report
#[derive(Debug, Clone)]
pub struct ValidationRun {
    pub sections: Vec<SectionOutcome>,
    pub report: ValidationReport,
}

/// Main validator for building spec documents
pub struct Validator {
    checks: Vec<Box<dyn Check>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a validator with the standard check sequence
    pub fn new() -> Self {
        Self {
            checks: default_checks(),
        }
    }

    /// Create a validator with an explicit check sequence
    pub fn with_checks(checks: Vec<Box<dyn Check>>) -> Self {
        Self { checks }
    }

    pub fn checks(&self) -> &[Box<dyn Check>] {
        &self.checks
    }

    /// Run every check against a parsed document.
    ///
    /// Deterministic: the same document always yields the same sections.
    pub fn run(&self, document: &SpecValue) -> Vec<SectionOutcome> {
        self.checks.iter().map(|check| check.run(document)).collect()
    }

    /// Run every check and build the report
    pub fn validate(
        &self,
        spec_file: &str,
        document: &SpecValue,
        timestamp: DateTime<Utc>,
    ) -> ValidationRun {
        let sections = self.run(document);

        let mut builder = ReportBuilder::new(spec_file, timestamp);
        for section in &sections {
            builder.add_section(section);
        }
        let report = builder.build();

        tracing::debug!(
            spec_file,
            status = %report.validation_status,
            critical = report.critical_issues.len(),
            warnings = report.warnings.len(),
            recommendations = report.recommendations.len(),
            "validation finished"
        );

        ValidationRun { sections, report }
    }

    /// Load, parse and validate a spec file
    pub fn validate_file(&self, path: &Path, timestamp: DateTime<Utc>) -> Result<ValidationRun> {
        let document = load_document(path)?;
        Ok(self.validate(&path.to_string_lossy(), &document, timestamp))
    }
}

fn build_file_regex() -> &'static Regex {
    static BUILD_FILE_RE: OnceLock<Regex> = OnceLock::new();
    BUILD_FILE_RE
        .get_or_init(|| Regex::new(r"^building_v([0-9]+)\.ya?ml$").expect("static file pattern"))
}

/// Default report location for a spec file.
///
/// `building_v<N>.yaml` becomes `spec_v<N>_validation.json`; when the spec
/// lives in a directory named `spec` the report goes to the sibling
/// `validation` directory. Any other file name becomes
/// `<stem>_validation.json` next to the input.
pub fn report_path_for(spec_path: &Path) -> PathBuf {
    let parent = spec_path.parent().unwrap_or_else(|| Path::new(""));
    let file_name = spec_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Some(caps) = build_file_regex().captures(&file_name) {
        let report_name = format!("spec_v{}_validation.json", &caps[1]);
        let dir = match parent.file_name() {
            Some(name) if name == "spec" => parent.with_file_name("validation"),
            _ => parent.to_path_buf(),
        };
        return dir.join(report_name);
    }

    let stem = spec_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "spec".to_string());
    parent.join(format!("{}_validation.json", stem))
}
