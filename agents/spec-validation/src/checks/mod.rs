//! Check framework for spec documents
//!
//! Every check is a pure function of the parsed document: it returns the
//! observations for its section of the transcript and never mutates shared
//! state. The [`crate::validator::Validator`] runs checks in order and the
//! report builder turns their issues into a verdict.

pub mod consistency;
pub mod fields;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::document::SpecValue;

/// Severity of a spec issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory only, never affects the verdict
    Recommendation,
    /// Degrades approval to conditional
    Warning,
    /// Blocks approval
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Recommendation => write!(f, "recommendation"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// A classified problem found in a spec document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Critical,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn recommendation(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Recommendation,
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// One line of a check's transcript
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// Something was checked and is fine
    Passed(String),
    /// Something is wrong and goes on the report
    Issue(Issue),
    /// Informational, never goes on the report
    Note(String),
}

impl Observation {
    pub fn passed(text: impl Into<String>) -> Self {
        Observation::Passed(text.into())
    }

    pub fn note(text: impl Into<String>) -> Self {
        Observation::Note(text.into())
    }

    pub fn issue(&self) -> Option<&Issue> {
        match self {
            Observation::Issue(issue) => Some(issue),
            _ => None,
        }
    }
}

impl From<Issue> for Observation {
    fn from(issue: Issue) -> Self {
        Observation::Issue(issue)
    }
}

/// The transcript of one check
#[derive(Debug, Clone, PartialEq)]
pub struct SectionOutcome {
    pub check: &'static str,
    pub title: &'static str,
    pub observations: Vec<Observation>,
}

impl SectionOutcome {
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.observations.iter().filter_map(Observation::issue)
    }
}

/// A deterministic check over a spec document
pub trait Check: Send + Sync {
    /// Check identifier
    fn id(&self) -> &'static str;

    /// Section header for the console transcript
    fn title(&self) -> &'static str;

    /// Evaluate the document
    fn evaluate(&self, document: &SpecValue) -> Vec<Observation>;

    /// Evaluate and wrap the result as a section
    fn run(&self, document: &SpecValue) -> SectionOutcome {
        let observations = self.evaluate(document);
        tracing::debug!(
            check = self.id(),
            observations = observations.len(),
            issues = observations.iter().filter(|o| o.issue().is_some()).count(),
            "check evaluated"
        );
        SectionOutcome {
            check: self.id(),
            title: self.title(),
            observations,
        }
    }
}

/// The standard check sequence: field checks, then consistency checks
pub fn default_checks() -> Vec<Box<dyn Check>> {
    let mut checks = fields::field_checks();
    checks.extend(consistency::consistency_checks());
    checks
}

/// Collect just the issues a check raised
pub fn issues_of(observations: &[Observation]) -> Vec<Issue> {
    observations.iter().filter_map(Observation::issue).cloned().collect()
}
