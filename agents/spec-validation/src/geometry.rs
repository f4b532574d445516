//! Geometry metrics validation
//!
//! Checks the metrics JSON emitted by the model build step. Unlike spec
//! validation this is a gate: any error fails the run.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, ValidationError};

/// Faces below this count suggest an over-simplified model
pub const MIN_FACE_COUNT: u64 = 10;

/// Faces above this count will hurt viewer performance
pub const MAX_FACE_COUNT: u64 = 100_000;

/// Metrics produced by the build step.
///
/// Absent error counts read as zero. Absent vertex, face and edge counts
/// stay unknown and print as `N/A`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryMetrics {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "count::option")]
    pub vertex_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "count::option")]
    pub face_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "count::option")]
    pub edge_count: Option<u64>,
    #[serde(deserialize_with = "count::required")]
    pub non_manifold_edges: u64,
    #[serde(deserialize_with = "count::required")]
    pub intersecting_faces: u64,
    pub dimension_errors: Vec<serde_json::Value>,
    pub warnings: Vec<String>,
}

/// Counts may arrive as `180` or `180.0`
mod count {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    fn whole<E: Error>(value: serde_json::Number) -> Result<u64, E> {
        if let Some(n) = value.as_u64() {
            return Ok(n);
        }
        match value.as_f64() {
            Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
            _ => Err(E::custom(format!(
                "expected a non-negative whole count, got {}",
                value
            ))),
        }
    }

    pub fn required<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        whole(serde_json::Number::deserialize(deserializer)?)
    }

    pub fn option<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        Option::<serde_json::Number>::deserialize(deserializer)?
            .map(whole)
            .transpose()
    }
}

impl GeometryMetrics {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| ValidationError::parse_error(format!("Invalid metrics JSON: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::file_error(format!(
                "Metrics file not found or unreadable '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&text)
    }
}

/// Result of checking one metrics file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryReport {
    pub passed: bool,
    pub metrics: GeometryMetrics,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl GeometryReport {
    /// Warnings recorded by the build step itself
    pub fn metrics_warnings(&self) -> &[String] {
        &self.metrics.warnings
    }
}

/// Validate geometry metrics against the quality thresholds
pub fn validate_metrics(metrics: GeometryMetrics) -> GeometryReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if metrics.non_manifold_edges > 0 {
        errors.push(format!(
            "Found {} non-manifold edges",
            metrics.non_manifold_edges
        ));
    }

    if metrics.intersecting_faces > 0 {
        errors.push(format!(
            "Found {} intersecting faces",
            metrics.intersecting_faces
        ));
    }

    for error in &metrics.dimension_errors {
        let text = match error {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        errors.push(format!("Dimension error: {}", text));
    }

    let face_count = metrics.face_count.unwrap_or(0);
    if face_count < MIN_FACE_COUNT {
        warnings.push(format!("Very low face count: {}", face_count));
    } else if face_count > MAX_FACE_COUNT {
        warnings.push(format!(
            "High face count: {} (may impact performance)",
            face_count
        ));
    }

    tracing::debug!(
        errors = errors.len(),
        warnings = warnings.len(),
        "geometry metrics checked"
    );

    GeometryReport {
        passed: errors.is_empty(),
        metrics,
        errors,
        warnings,
    }
}
