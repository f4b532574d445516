//! Report builder and the persisted validation report
//!
//! The verdict is derived in strict order: any critical issue fails the
//! spec, otherwise any warning approves it with conditions, otherwise it
//! passes. Recommendations are carried for visibility only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::checks::{Issue, SectionOutcome, Severity};
use crate::error::{Result, ValidationError};

/// Overall validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Pass,
    PassWithWarnings,
    Fail,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Pass => write!(f, "PASS"),
            ValidationStatus::PassWithWarnings => write!(f, "PASS_WITH_WARNINGS"),
            ValidationStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Approval decision attached to the status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Approval {
    Approved,
    ApprovedWithConditions,
    Rejected,
}

impl fmt::Display for Approval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Approval::Approved => write!(f, "APPROVED"),
            Approval::ApprovedWithConditions => write!(f, "APPROVED_WITH_CONDITIONS"),
            Approval::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Final verdict for a set of issue counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: ValidationStatus,
    pub approval: Approval,
    pub summary: String,
}

impl Verdict {
    pub fn from_counts(critical: usize, warnings: usize) -> Self {
        if critical > 0 {
            Self {
                status: ValidationStatus::Fail,
                approval: Approval::Rejected,
                summary: format!("Validation failed with {} critical issue(s)", critical),
            }
        } else if warnings > 0 {
            Self {
                status: ValidationStatus::PassWithWarnings,
                approval: Approval::ApprovedWithConditions,
                summary: format!("Validation passed with {} warning(s)", warnings),
            }
        } else {
            Self {
                status: ValidationStatus::Pass,
                approval: Approval::Approved,
                summary: "All validation checks passed".to_string(),
            }
        }
    }
}

/// The terminal artifact of a validation run.
///
/// Field order here is the key order of the written JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub spec_file: String,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub validation_status: ValidationStatus,
    pub approval: Approval,
    pub summary: String,
    pub critical_issues: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ValidationReport {
    pub fn is_rejected(&self) -> bool {
        self.approval == Approval::Rejected
    }

    /// Pretty-printed JSON with two-space indentation
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ValidationError::SerializationError(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ValidationError::SerializationError(e.to_string()))
    }

    /// Write the report, creating parent directories as needed
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ValidationError::file_error(format!(
                    "Failed to create report directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|e| {
            ValidationError::file_error(format!(
                "Failed to write report '{}': {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(path = %path.display(), status = %self.validation_status, "report written");
        Ok(())
    }
}

/// Accumulates issues from check outcomes into a report
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    spec_file: String,
    timestamp: DateTime<Utc>,
    critical_issues: Vec<String>,
    warnings: Vec<String>,
    recommendations: Vec<String>,
}

impl ReportBuilder {
    pub fn new(spec_file: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            spec_file: spec_file.into(),
            timestamp,
            critical_issues: Vec::new(),
            warnings: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    pub fn add_issue(&mut self, issue: &Issue) {
        let bucket = match issue.severity {
            Severity::Critical => &mut self.critical_issues,
            Severity::Warning => &mut self.warnings,
            Severity::Recommendation => &mut self.recommendations,
        };
        bucket.push(issue.message.clone());
    }

    pub fn add_section(&mut self, outcome: &SectionOutcome) {
        for issue in outcome.issues() {
            self.add_issue(issue);
        }
    }

    pub fn build(self) -> ValidationReport {
        let verdict = Verdict::from_counts(self.critical_issues.len(), self.warnings.len());

        ValidationReport {
            spec_file: self.spec_file,
            timestamp: self.timestamp,
            validation_status: verdict.status,
            approval: verdict.approval,
            summary: verdict.summary,
            critical_issues: self.critical_issues,
            warnings: self.warnings,
            recommendations: self.recommendations,
        }
    }
}

/// ISO-8601 UTC timestamps with millisecond precision (`2024-05-01T12:00:00.000Z`)
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_verdict_order() {
        let fail = Verdict::from_counts(2, 5);
        assert_eq!(fail.status, ValidationStatus::Fail);
        assert_eq!(fail.approval, Approval::Rejected);
        assert_eq!(fail.summary, "Validation failed with 2 critical issue(s)");

        let conditional = Verdict::from_counts(0, 1);
        assert_eq!(conditional.status, ValidationStatus::PassWithWarnings);
        assert_eq!(conditional.approval, Approval::ApprovedWithConditions);
        assert_eq!(conditional.summary, "Validation passed with 1 warning(s)");

        let pass = Verdict::from_counts(0, 0);
        assert_eq!(pass.status, ValidationStatus::Pass);
        assert_eq!(pass.approval, Approval::Approved);
        assert_eq!(pass.summary, "All validation checks passed");
    }

    #[test]
    fn test_recommendations_do_not_affect_verdict() {
        let mut builder = ReportBuilder::new("spec.yaml", fixed_time());
        builder.add_issue(&Issue::recommendation("cite the analysis"));
        let report = builder.build();
        assert_eq!(report.validation_status, ValidationStatus::Pass);
        assert_eq!(report.recommendations, vec!["cite the analysis".to_string()]);
    }

    #[test]
    fn test_issues_are_bucketed_in_order() {
        let mut builder = ReportBuilder::new("spec.yaml", fixed_time());
        builder.add_issue(&Issue::warning("w1"));
        builder.add_issue(&Issue::critical("c1"));
        builder.add_issue(&Issue::warning("w2"));
        let report = builder.build();
        assert_eq!(report.critical_issues, vec!["c1"]);
        assert_eq!(report.warnings, vec!["w1", "w2"]);
        assert!(report.is_rejected());
    }

    #[test]
    fn test_json_key_order_and_format() {
        let report = ReportBuilder::new("work/spec/building_v002.yaml", fixed_time()).build();
        let json = report.to_json_pretty().unwrap();

        let keys = [
            "\"spec_file\"",
            "\"timestamp\"",
            "\"validation_status\"",
            "\"approval\"",
            "\"summary\"",
            "\"critical_issues\"",
            "\"warnings\"",
            "\"recommendations\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(json.contains("\n  \"timestamp\": \"2024-05-01T12:00:00.000Z\""));
        assert!(json.contains("\"validation_status\": \"PASS\""));
        assert!(json.contains("\"approval\": \"APPROVED\""));
    }

    #[test]
    fn test_report_reads_back() {
        let mut builder = ReportBuilder::new("a.yaml", fixed_time());
        builder.add_issue(&Issue::warning("zero"));
        let report = builder.build();
        let parsed: ValidationReport =
            serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, report);
        assert_eq!(parsed.approval, Approval::ApprovedWithConditions);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("validation").join("report.json");
        ReportBuilder::new("a.yaml", fixed_time())
            .build()
            .write_to(&path)
            .unwrap();
        assert!(path.exists());
    }
}
