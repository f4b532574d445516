//! Consistency checks: relations between fields rather than single fields
//!
//! - height identity (`total = wall + parapet`, within [`HEIGHT_TOLERANCE`])
//! - roof elevation sits exactly on the wall height
//! - dimension-like numbers are positive
//! - assumptions trace back to an analysis or reference document

use super::{Check, Issue, Observation};
use crate::document::{format_number, SpecMap, SpecValue};
use crate::schema::{
    DIMENSION_KEYWORDS, HEIGHT_TOLERANCE, TRACEABILITY_KEYWORDS, ZERO_EXEMPT_KEYWORDS,
};

/// Consistency checks in transcript order
pub fn consistency_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(InternalConsistencyCheck),
        Box::new(PositiveDimensionsCheck),
        Box::new(TraceabilityCheck),
    ]
}

/// Height identity and roof/wall alignment
pub struct InternalConsistencyCheck;

impl InternalConsistencyCheck {
    fn height_identity(document: &SpecValue) -> Option<Observation> {
        let wall = document.lookup("overall.height.wall_height")?;
        let parapet = document.lookup("overall.height.parapet_height")?;
        let total = document.lookup("overall.height.total_height")?;

        let (Some(wh), Some(ph), Some(th)) = (wall.as_f64(), parapet.as_f64(), total.as_f64())
        else {
            return Some(Observation::note(
                "Height identity skipped: overall.height values are not all numbers",
            ));
        };

        let calculated = wh + ph;
        if (calculated - th).abs() > HEIGHT_TOLERANCE {
            Some(
                Issue::warning(format!(
                    "total_height ({}) should equal wall_height ({}) + parapet_height ({}) = {}",
                    format_number(th),
                    format_number(wh),
                    format_number(ph),
                    format_number(calculated)
                ))
                .into(),
            )
        } else {
            Some(Observation::passed("total_height = wall_height + parapet_height"))
        }
    }

    fn roof_alignment(document: &SpecValue) -> Option<Observation> {
        let wall_height = document.lookup("walls.height")?;
        let elevation = document.lookup("roof.elevation")?;

        let aligned = match (wall_height.as_f64(), elevation.as_f64()) {
            (Some(h), Some(e)) => h == e,
            _ => wall_height == elevation,
        };

        if aligned {
            Some(Observation::passed("roof.elevation matches walls.height"))
        } else {
            Some(
                Issue::warning(format!(
                    "roof.elevation ({}) should match walls.height ({})",
                    elevation, wall_height
                ))
                .into(),
            )
        }
    }
}

impl Check for InternalConsistencyCheck {
    fn id(&self) -> &'static str {
        "internal_consistency"
    }

    fn title(&self) -> &'static str {
        "INTERNAL CONSISTENCY VALIDATION"
    }

    fn evaluate(&self, document: &SpecValue) -> Vec<Observation> {
        [Self::height_identity(document), Self::roof_alignment(document)]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Recursive scan of every dimension-like numeric leaf.
///
/// Keys are matched by substring, so `window_sill_height` is a dimension
/// (contains `height`) and is also exempt from the zero warning (contains
/// `sill_height`). Sequences are not walked.
pub struct PositiveDimensionsCheck;

pub fn is_dimension_key(key: &str) -> bool {
    DIMENSION_KEYWORDS.iter().any(|k| key.contains(k))
}

pub fn is_zero_exempt_key(key: &str) -> bool {
    ZERO_EXEMPT_KEYWORDS.iter().any(|k| key.contains(k))
}

impl PositiveDimensionsCheck {
    fn scan(map: &SpecMap, prefix: &str, out: &mut Vec<Observation>) {
        for (key, value) in map.iter() {
            let path = if prefix.is_empty() {
                key.to_string()
            } else {
                format!("{}.{}", prefix, key)
            };

            match value {
                SpecValue::Number(n) if is_dimension_key(key) => {
                    let n = *n;
                    if n < 0.0 {
                        out.push(
                            Issue::critical(format!(
                                "{} must be positive, got {}",
                                path,
                                format_number(n)
                            ))
                            .into(),
                        );
                    } else if n == 0.0 && !is_zero_exempt_key(key) {
                        out.push(
                            Issue::warning(format!(
                                "{} is zero, which may be unintentional",
                                path
                            ))
                            .into(),
                        );
                    } else {
                        out.push(Observation::passed(format!("{}: {}", path, format_number(n))));
                    }
                }
                SpecValue::Object(nested) => Self::scan(nested, &path, out),
                _ => {}
            }
        }
    }
}

impl Check for PositiveDimensionsCheck {
    fn id(&self) -> &'static str {
        "positive_dimensions"
    }

    fn title(&self) -> &'static str {
        "DIMENSION VALIDATION"
    }

    fn evaluate(&self, document: &SpecValue) -> Vec<Observation> {
        let mut observations = Vec::new();
        if let Some(root) = document.as_object() {
            Self::scan(root, "", &mut observations);
        }
        observations
    }
}

/// Assumptions should cite the analysis they came from
pub struct TraceabilityCheck;

impl Check for TraceabilityCheck {
    fn id(&self) -> &'static str {
        "traceability"
    }

    fn title(&self) -> &'static str {
        "TRACEABILITY VALIDATION"
    }

    fn evaluate(&self, document: &SpecValue) -> Vec<Observation> {
        let Some(assumptions) = document.get("assumptions").and_then(SpecValue::as_array) else {
            return vec![Observation::note("No assumptions list found")];
        };

        let traced = assumptions
            .iter()
            .filter_map(SpecValue::as_str)
            .any(|text| TRACEABILITY_KEYWORDS.iter().any(|k| text.contains(k)));

        if traced {
            vec![Observation::passed("Assumptions reference analysis")]
        } else {
            vec![Issue::recommendation(
                "Consider adding reference to source analysis in assumptions",
            )
            .into()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{issues_of, Severity};
    use crate::document::parse_document;
    use proptest::prelude::*;

    fn issues(check: &dyn Check, yaml: &str) -> Vec<(Severity, String)> {
        let doc = parse_document(yaml).unwrap();
        issues_of(&check.evaluate(&doc))
            .into_iter()
            .map(|i| (i.severity, i.message))
            .collect()
    }

    #[test]
    fn test_height_identity_holds() {
        let yaml = "overall:\n  height:\n    wall_height: 3.0\n    parapet_height: 0.5\n    total_height: 3.5\n";
        assert!(issues(&InternalConsistencyCheck, yaml).is_empty());
    }

    #[test]
    fn test_height_identity_within_tolerance() {
        let yaml = "overall:\n  height:\n    wall_height: 3.0\n    parapet_height: 0.5\n    total_height: 3.505\n";
        assert!(issues(&InternalConsistencyCheck, yaml).is_empty());
    }

    #[test]
    fn test_height_identity_mismatch_warns() {
        let yaml = "overall:\n  height:\n    wall_height: 3.0\n    parapet_height: 0.5\n    total_height: 3.6\n";
        assert_eq!(
            issues(&InternalConsistencyCheck, yaml),
            vec![(
                Severity::Warning,
                "total_height (3.6) should equal wall_height (3) + parapet_height (0.5) = 3.5"
                    .to_string()
            )]
        );
    }

    #[test]
    fn test_height_identity_skipped_when_incomplete() {
        let yaml = "overall:\n  height:\n    wall_height: 3.0\n    parapet_height: 0.5\n";
        assert!(InternalConsistencyCheck
            .evaluate(&parse_document(yaml).unwrap())
            .is_empty());
    }

    #[test]
    fn test_roof_alignment_is_exact() {
        let aligned = "walls:\n  height: 3\nroof:\n  elevation: 3.0\n";
        assert!(issues(&InternalConsistencyCheck, aligned).is_empty());

        let off = "walls:\n  height: 3.0\nroof:\n  elevation: 3.001\n";
        assert_eq!(
            issues(&InternalConsistencyCheck, off),
            vec![(
                Severity::Warning,
                "roof.elevation (3.001) should match walls.height (3)".to_string()
            )]
        );
    }

    #[test]
    fn test_zero_dimension_exemption_is_asymmetric() {
        let yaml = "window_sill_height: 0\nwall_thickness: 0\ndoor_position_height: 0\n";
        assert_eq!(
            issues(&PositiveDimensionsCheck, yaml),
            vec![(
                Severity::Warning,
                "wall_thickness is zero, which may be unintentional".to_string()
            )]
        );
    }

    #[test]
    fn test_negative_exempt_key_is_still_critical() {
        let yaml = "openings_meta:\n  sill_height: -0.2\n";
        assert_eq!(
            issues(&PositiveDimensionsCheck, yaml),
            vec![(
                Severity::Critical,
                "openings_meta.sill_height must be positive, got -0.2".to_string()
            )]
        );
    }

    #[test]
    fn test_dimension_scan_ignores_sequences_and_non_candidates() {
        let yaml = "openings:\n  doors:\n    - {width: -1, height: 0}\nangle: -5\nlabel_height: tall\n";
        assert!(issues(&PositiveDimensionsCheck, yaml).is_empty());
    }

    #[test]
    fn test_dimension_paths_are_dotted() {
        let yaml = "roof:\n  parapet:\n    depth: -0.1\n";
        assert_eq!(
            issues(&PositiveDimensionsCheck, yaml),
            vec![(
                Severity::Critical,
                "roof.parapet.depth must be positive, got -0.1".to_string()
            )]
        );
    }

    #[test]
    fn test_traceability() {
        assert!(issues(&TraceabilityCheck, "assumptions: ['per site analysis']\n").is_empty());
        assert!(issues(&TraceabilityCheck, "assumptions: ['see reference plan', 3]\n").is_empty());
        assert_eq!(
            issues(&TraceabilityCheck, "assumptions: ['Analysis pending']\n"),
            vec![(
                Severity::Recommendation,
                "Consider adding reference to source analysis in assumptions".to_string()
            )]
        );
    }

    #[test]
    fn test_missing_assumptions_is_only_a_note() {
        let doc = parse_document("units: m\n").unwrap();
        let observations = TraceabilityCheck.evaluate(&doc);
        assert_eq!(observations, vec![Observation::note("No assumptions list found")]);
    }

    fn nest(path: &[String], leaf: &str, value: f64) -> SpecValue {
        let mut current = SpecValue::Object([(leaf.to_string(), SpecValue::Number(value))]
            .into_iter()
            .collect());
        for segment in path.iter().rev() {
            current = SpecValue::Object([(segment.clone(), current)].into_iter().collect());
        }
        current
    }

    proptest! {
        #[test]
        fn prop_negative_dimension_is_critical_at_any_depth(
            path in proptest::collection::vec("[a-z]{1,8}", 0..6),
            prefix in "[a-z_]{0,6}",
            keyword in proptest::sample::select(DIMENSION_KEYWORDS.to_vec()),
            value in -1.0e6f64..-1.0e-6,
        ) {
            let leaf = format!("{}{}", prefix, keyword);
            let doc = nest(&path, &leaf, value);
            let found = issues_of(&PositiveDimensionsCheck.evaluate(&doc));
            prop_assert_eq!(found.len(), 1);
            prop_assert_eq!(found[0].severity, Severity::Critical);
            let expected = format!("{} must be positive, got {}", leaf, format_number(value));
            prop_assert!(found[0].message.ends_with(&expected));
        }

        #[test]
        fn prop_positive_dimension_never_raises(
            path in proptest::collection::vec("[a-z]{1,8}", 0..6),
            keyword in proptest::sample::select(DIMENSION_KEYWORDS.to_vec()),
            value in 1.0e-6f64..1.0e6,
        ) {
            let doc = nest(&path, keyword, value);
            prop_assert!(issues_of(&PositiveDimensionsCheck.evaluate(&doc)).is_empty());
        }
    }
}
