//! Field checks: presence and coarse type of every declared field
//!
//! Nested groups are only evaluated when their parent is an object. A
//! missing or mistyped parent has already been reported one level up, so
//! its children are skipped rather than reported again.

use regex::Regex;
use std::sync::OnceLock;

use super::{Check, Issue, Observation};
use crate::document::{SpecMap, SpecValue};
use crate::schema::{
    FieldKind, FieldRule, SectionRule, COORDINATE_SYSTEM_SECTION, DOOR_FIELDS,
    MATERIALS_SECTION, OVERALL_SECTION, ROOF_SECTION, TOLERANCES_SECTION, TOP_LEVEL_FIELDS,
    VERSION_PATTERN, WALLS_SECTION, WALL_REFERENCES, WINDOW_FIELDS,
};

/// Field checks in transcript order
pub fn field_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(RequiredFieldsCheck),
        Box::new(VersionFormatCheck),
        Box::new(SectionCheck::new("overall_structure", OVERALL_SECTION)),
        Box::new(SectionCheck::new("walls_structure", WALLS_SECTION)),
        Box::new(SectionCheck::new("roof_structure", ROOF_SECTION)),
        Box::new(OpeningsCheck),
        Box::new(SectionCheck::new("materials_structure", MATERIALS_SECTION)),
        Box::new(SectionCheck::new("tolerances_structure", TOLERANCES_SECTION)),
        Box::new(SectionCheck::new("coordinate_system", COORDINATE_SYSTEM_SECTION)),
    ]
}

/// Required top-level fields and their kinds
pub struct RequiredFieldsCheck;

impl Check for RequiredFieldsCheck {
    fn id(&self) -> &'static str {
        "required_fields"
    }

    fn title(&self) -> &'static str {
        "REQUIRED FIELD VALIDATION"
    }

    fn evaluate(&self, document: &SpecValue) -> Vec<Observation> {
        TOP_LEVEL_FIELDS
            .iter()
            .map(|rule| match document.get(rule.name) {
                None => Issue::critical(format!("Missing required field: {}", rule.name)).into(),
                Some(value) if !rule.kind.accepts(value.kind()) => Issue::critical(format!(
                    "Field '{}' has wrong type: expected {}, got {}",
                    rule.name,
                    rule.kind,
                    value.kind()
                ))
                .into(),
                Some(_) => Observation::passed(format!("{}: {}", rule.name, rule.kind)),
            })
            .collect()
    }
}

/// `version` must look like `v###`
pub struct VersionFormatCheck;

fn version_regex() -> &'static Regex {
    static VERSION_RE: OnceLock<Regex> = OnceLock::new();
    VERSION_RE.get_or_init(|| Regex::new(VERSION_PATTERN).expect("static version pattern"))
}

impl Check for VersionFormatCheck {
    fn id(&self) -> &'static str {
        "version_format"
    }

    fn title(&self) -> &'static str {
        "VERSION FORMAT VALIDATION"
    }

    fn evaluate(&self, document: &SpecValue) -> Vec<Observation> {
        let version = match document.get("version") {
            Some(value) if !value.is_blank() => value.to_string(),
            _ => return vec![Observation::note("No version declared")],
        };

        if version_regex().is_match(&version) {
            vec![Observation::passed(format!("Version format: {}", version))]
        } else {
            vec![Issue::warning(format!(
                "Version format '{}' should be v### (3 digits)",
                version
            ))
            .into()]
        }
    }
}

/// Required fields of one nested section (e.g. `walls`, `overall.height`)
pub struct SectionCheck {
    id: &'static str,
    rule: SectionRule,
}

impl SectionCheck {
    pub fn new(id: &'static str, rule: SectionRule) -> Self {
        Self { id, rule }
    }

    fn check_field(parent: &str, map: &SpecMap, rule: &FieldRule) -> Observation {
        let path = format!("{}.{}", parent, rule.name);
        let value = match map.get(rule.name) {
            Some(value) => value,
            None => return Issue::critical(format!("Missing {}", path)).into(),
        };

        if !rule.kind.accepts(value.kind()) {
            let message = match rule.kind {
                FieldKind::Number | FieldKind::String => {
                    format!("{} must be a {}", path, rule.kind)
                }
                _ => format!(
                    "Field '{}' has wrong type: expected {}, got {}",
                    path,
                    rule.kind,
                    value.kind()
                ),
            };
            return Issue::critical(message).into();
        }

        match rule.kind {
            FieldKind::Number | FieldKind::String => {
                Observation::passed(format!("{}: {}", path, value))
            }
            _ => Observation::passed(path),
        }
    }
}

impl Check for SectionCheck {
    fn id(&self) -> &'static str {
        self.id
    }

    fn title(&self) -> &'static str {
        self.rule.title
    }

    fn evaluate(&self, document: &SpecValue) -> Vec<Observation> {
        let mut observations = Vec::new();

        for (index, group) in self.rule.groups.iter().enumerate() {
            let Some(map) = document.lookup(group.parent).and_then(SpecValue::as_object) else {
                if index == 0 {
                    observations.push(Observation::note(format!(
                        "{} not available, nested checks skipped",
                        group.parent
                    )));
                }
                continue;
            };

            for rule in group.fields {
                observations.push(Self::check_field(group.parent, map, rule));
            }
        }

        observations
    }
}

/// Doors and windows under `openings`
pub struct OpeningsCheck;

/// How an opening is named in messages
struct OpeningKind {
    label: &'static str,
    key: &'static str,
    required: &'static [&'static str],
}

const DOORS: OpeningKind = OpeningKind {
    label: "Door",
    key: "doors",
    required: DOOR_FIELDS,
};

const WINDOWS: OpeningKind = OpeningKind {
    label: "Window",
    key: "windows",
    required: WINDOW_FIELDS,
};

impl OpeningsCheck {
    fn check_entries(kind: &OpeningKind, value: Option<&SpecValue>, out: &mut Vec<Observation>) {
        let items = match value {
            None | Some(SpecValue::Null) => return,
            Some(SpecValue::Array(items)) => items,
            Some(_) => {
                out.push(Issue::critical(format!("openings.{} must be an array", kind.key)).into());
                return;
            }
        };

        for (index, item) in items.iter().enumerate() {
            let Some(entry) = item.as_object() else {
                out.push(Issue::critical(format!("{} {} must be a mapping", kind.label, index)).into());
                continue;
            };

            let before = out.len();
            for field in kind.required {
                if !entry.contains_key(field) {
                    out.push(
                        Issue::critical(format!(
                            "{} {} missing field: {}",
                            kind.label, index, field
                        ))
                        .into(),
                    );
                }
            }

            let reference = match entry.get("id") {
                Some(id) if !id.is_blank() => id.to_string(),
                _ => index.to_string(),
            };

            if let Some(wall) = entry.get("wall").filter(|w| !w.is_blank()) {
                let known = wall
                    .as_str()
                    .map_or(false, |name| WALL_REFERENCES.contains(&name));
                if !known {
                    out.push(
                        Issue::critical(format!(
                            "{} {} has invalid wall reference: {}",
                            kind.label, reference, wall
                        ))
                        .into(),
                    );
                }
            }

            if out.len() == before {
                out.push(Observation::passed(format!("{} {}", kind.label, reference)));
            }
        }
    }
}

fn entry_count(value: Option<&SpecValue>) -> usize {
    value.and_then(SpecValue::as_array).map_or(0, <[SpecValue]>::len)
}

impl Check for OpeningsCheck {
    fn id(&self) -> &'static str {
        "openings_structure"
    }

    fn title(&self) -> &'static str {
        "OPENINGS STRUCTURE VALIDATION"
    }

    fn evaluate(&self, document: &SpecValue) -> Vec<Observation> {
        let Some(openings) = document.get("openings").and_then(SpecValue::as_object) else {
            return vec![Observation::note("openings not available, nested checks skipped")];
        };

        let doors = openings.get(DOORS.key);
        let windows = openings.get(WINDOWS.key);
        let mut observations = Vec::new();

        if doors.is_none() && windows.is_none() {
            observations.push(Issue::warning("openings section has no doors or windows").into());
        } else {
            observations.push(Observation::passed(format!(
                "openings.doors: {} doors",
                entry_count(doors)
            )));
            observations.push(Observation::passed(format!(
                "openings.windows: {} windows",
                entry_count(windows)
            )));
        }

        Self::check_entries(&DOORS, doors, &mut observations);
        Self::check_entries(&WINDOWS, windows, &mut observations);
        observations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{issues_of, Severity};
    use crate::document::parse_document;

    fn messages(check: &dyn Check, yaml: &str) -> Vec<(Severity, String)> {
        let doc = parse_document(yaml).unwrap();
        issues_of(&check.evaluate(&doc))
            .into_iter()
            .map(|i| (i.severity, i.message))
            .collect()
    }

    #[test]
    fn test_missing_top_level_fields_are_critical() {
        let issues = messages(&RequiredFieldsCheck, "version: v001\n");
        assert_eq!(issues.len(), TOP_LEVEL_FIELDS.len() - 1);
        assert!(issues.iter().all(|(s, _)| *s == Severity::Critical));
        assert!(issues.contains(&(
            Severity::Critical,
            "Missing required field: coordinate_system".to_string()
        )));
    }

    #[test]
    fn test_wrong_top_level_type() {
        let issues = messages(
            &RequiredFieldsCheck,
            "version: v001\nunits: m\nassumptions: {a: 1}\noverall: []\nwalls: {}\nroof: {}\n\
             openings: {}\nmaterials: {}\ntolerances: {}\ncoordinate_system: {}\n",
        );
        assert_eq!(
            issues,
            vec![
                (
                    Severity::Critical,
                    "Field 'assumptions' has wrong type: expected array, got object".to_string()
                ),
                (
                    Severity::Critical,
                    "Field 'overall' has wrong type: expected object, got array".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_version_format() {
        assert!(messages(&VersionFormatCheck, "version: v002\n").is_empty());
        assert_eq!(
            messages(&VersionFormatCheck, "version: v2\n"),
            vec![(
                Severity::Warning,
                "Version format 'v2' should be v### (3 digits)".to_string()
            )]
        );
        assert_eq!(messages(&VersionFormatCheck, "version: v0002\n").len(), 1);
        assert!(messages(&VersionFormatCheck, "units: m\n").is_empty());
    }

    #[test]
    fn test_blank_version_is_unset() {
        assert!(messages(&VersionFormatCheck, "version: \"\"\n").is_empty());
        assert!(messages(&VersionFormatCheck, "version: ~\n").is_empty());
    }

    #[test]
    fn test_blank_wall_is_not_a_reference() {
        let issues = messages(
            &OpeningsCheck,
            "openings:\n  doors:\n    - {id: D1, type: swing, width: 1, height: 2, wall: '', position: 0}\n",
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_version_digits_are_ascii_only() {
        assert_eq!(messages(&VersionFormatCheck, "version: \"v١٢٣\"\n").len(), 1);
    }

    #[test]
    fn test_height_fields_must_be_numbers() {
        let check = SectionCheck::new("overall_structure", OVERALL_SECTION);
        let issues = messages(
            &check,
            "overall:\n  footprint: {width: 6}\n  height:\n    wall_height: tall\n    parapet_height: 0.5\n",
        );
        assert_eq!(
            issues,
            vec![
                (
                    Severity::Critical,
                    "overall.height.wall_height must be a number".to_string()
                ),
                (
                    Severity::Critical,
                    "Missing overall.height.total_height".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_missing_parent_does_not_cascade() {
        let check = SectionCheck::new("overall_structure", OVERALL_SECTION);
        assert!(messages(&check, "units: m\n").is_empty());

        let issues = messages(&check, "overall:\n  footprint: {}\n");
        assert_eq!(
            issues,
            vec![(Severity::Critical, "Missing overall.height".to_string())]
        );
    }

    #[test]
    fn test_mistyped_nested_object_is_reported_once() {
        let check = SectionCheck::new("coordinate_system", COORDINATE_SYSTEM_SECTION);
        let issues = messages(&check, "coordinate_system:\n  origin: [0, 0, 0]\n  axes: xyz\n");
        assert_eq!(
            issues,
            vec![(
                Severity::Critical,
                "Field 'coordinate_system.axes' has wrong type: expected object, got string"
                    .to_string()
            )]
        );
    }

    #[test]
    fn test_materials_must_be_strings() {
        let check = SectionCheck::new("materials_structure", MATERIALS_SECTION);
        let issues = messages(
            &check,
            "materials:\n  walls: brick\n  roof: 3\n  door: oak\n  windows: glass\n",
        );
        assert_eq!(
            issues,
            vec![(Severity::Critical, "materials.roof must be a string".to_string())]
        );
    }

    #[test]
    fn test_openings_without_doors_or_windows_warns() {
        let issues = messages(&OpeningsCheck, "openings: {}\n");
        assert_eq!(
            issues,
            vec![(
                Severity::Warning,
                "openings section has no doors or windows".to_string()
            )]
        );
    }

    #[test]
    fn test_door_missing_fields_indexed() {
        let issues = messages(
            &OpeningsCheck,
            "openings:\n  doors:\n    - {id: D1, type: swing, width: 0.9, height: 2.1, wall: front, position: 1}\n    - {id: D2, width: 0.9}\n",
        );
        assert_eq!(
            issues,
            vec![
                (Severity::Critical, "Door 1 missing field: type".to_string()),
                (Severity::Critical, "Door 1 missing field: height".to_string()),
                (Severity::Critical, "Door 1 missing field: wall".to_string()),
                (Severity::Critical, "Door 1 missing field: position".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_wall_reference_uses_id() {
        let issues = messages(
            &OpeningsCheck,
            "openings:\n  windows:\n    - {id: W7, width: 1, height: 1, wall: side, position: 2}\n",
        );
        assert_eq!(
            issues,
            vec![(
                Severity::Critical,
                "Window W7 has invalid wall reference: side".to_string()
            )]
        );
    }

    #[test]
    fn test_invalid_wall_reference_falls_back_to_index() {
        let issues = messages(
            &OpeningsCheck,
            "openings:\n  doors:\n    - {type: swing, width: 1, height: 2, wall: side, position: 0}\n",
        );
        assert!(issues.contains(&(Severity::Critical, "Door 0 missing field: id".to_string())));
        assert!(issues.contains(&(
            Severity::Critical,
            "Door 0 has invalid wall reference: side".to_string()
        )));
    }

    #[test]
    fn test_non_array_doors() {
        let issues = messages(&OpeningsCheck, "openings:\n  doors: front\n");
        assert_eq!(
            issues,
            vec![(Severity::Critical, "openings.doors must be an array".to_string())]
        );
    }
}
