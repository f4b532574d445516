//! Schema rules for building spec documents
//!
//! Static, declarative description of the required fields and coarse
//! types of every section. The field checker walks a document against
//! these tables; nothing here inspects a document itself.

use std::fmt;

use crate::document::Kind;

/// Expected kind of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Presence only
    Any,
    Number,
    String,
    Array,
    Object,
}

impl FieldKind {
    /// Whether a value of `kind` satisfies this expectation
    pub fn accepts(self, kind: Kind) -> bool {
        match self {
            FieldKind::Any => true,
            FieldKind::Number => kind == Kind::Number,
            FieldKind::String => kind == Kind::String,
            FieldKind::Array => kind == Kind::Array,
            FieldKind::Object => kind == Kind::Object,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Any => write!(f, "any"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::String => write!(f, "string"),
            FieldKind::Array => write!(f, "array"),
            FieldKind::Object => write!(f, "object"),
        }
    }
}

/// A single required field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldRule {
    FieldRule { name, kind }
}

/// Required fields under one parent object, addressed by dotted path
#[derive(Debug, Clone, Copy)]
pub struct FieldGroup {
    pub parent: &'static str,
    pub fields: &'static [FieldRule],
}

/// A titled block of field groups, checked in order
#[derive(Debug, Clone, Copy)]
pub struct SectionRule {
    pub title: &'static str,
    pub groups: &'static [FieldGroup],
}

/// Required top-level fields
pub const TOP_LEVEL_FIELDS: &[FieldRule] = &[
    field("version", FieldKind::String),
    field("units", FieldKind::String),
    field("assumptions", FieldKind::Array),
    field("overall", FieldKind::Object),
    field("walls", FieldKind::Object),
    field("roof", FieldKind::Object),
    field("openings", FieldKind::Object),
    field("materials", FieldKind::Object),
    field("tolerances", FieldKind::Object),
    field("coordinate_system", FieldKind::Object),
];

pub const OVERALL_SECTION: SectionRule = SectionRule {
    title: "OVERALL STRUCTURE VALIDATION",
    groups: &[
        FieldGroup {
            parent: "overall",
            fields: &[
                field("footprint", FieldKind::Any),
                field("height", FieldKind::Object),
            ],
        },
        FieldGroup {
            parent: "overall.height",
            fields: &[
                field("wall_height", FieldKind::Number),
                field("parapet_height", FieldKind::Number),
                field("total_height", FieldKind::Number),
            ],
        },
    ],
};

pub const WALLS_SECTION: SectionRule = SectionRule {
    title: "WALLS STRUCTURE VALIDATION",
    groups: &[FieldGroup {
        parent: "walls",
        fields: &[
            field("thickness", FieldKind::Any),
            field("material", FieldKind::Any),
            field("height", FieldKind::Any),
        ],
    }],
};

pub const ROOF_SECTION: SectionRule = SectionRule {
    title: "ROOF STRUCTURE VALIDATION",
    groups: &[FieldGroup {
        parent: "roof",
        fields: &[
            field("type", FieldKind::Any),
            field("thickness", FieldKind::Any),
            field("elevation", FieldKind::Any),
        ],
    }],
};

pub const MATERIALS_SECTION: SectionRule = SectionRule {
    title: "MATERIALS STRUCTURE VALIDATION",
    groups: &[FieldGroup {
        parent: "materials",
        fields: &[
            field("walls", FieldKind::String),
            field("roof", FieldKind::String),
            field("door", FieldKind::String),
            field("windows", FieldKind::String),
        ],
    }],
};

pub const TOLERANCES_SECTION: SectionRule = SectionRule {
    title: "TOLERANCES STRUCTURE VALIDATION",
    groups: &[FieldGroup {
        parent: "tolerances",
        fields: &[
            field("dimension_tolerance", FieldKind::Any),
            field("angle_tolerance_degrees", FieldKind::Any),
            field("allow_non_manifold", FieldKind::Any),
        ],
    }],
};

pub const COORDINATE_SYSTEM_SECTION: SectionRule = SectionRule {
    title: "COORDINATE SYSTEM VALIDATION",
    groups: &[
        FieldGroup {
            parent: "coordinate_system",
            fields: &[
                field("origin", FieldKind::Any),
                field("axes", FieldKind::Object),
            ],
        },
        FieldGroup {
            parent: "coordinate_system.axes",
            fields: &[
                field("x", FieldKind::Any),
                field("y", FieldKind::Any),
                field("z", FieldKind::Any),
            ],
        },
    ],
};

/// Required keys of each `openings.doors` entry
pub const DOOR_FIELDS: &[&str] = &["id", "type", "width", "height", "wall", "position"];

/// Required keys of each `openings.windows` entry
pub const WINDOW_FIELDS: &[&str] = &["id", "width", "height", "wall", "position"];

/// Walls an opening may reference
pub const WALL_REFERENCES: &[&str] = &["front", "left", "right", "rear"];

/// Spec version format: `v` followed by exactly three ASCII digits
pub const VERSION_PATTERN: &str = r"^v[0-9]{3}$";

/// Absolute tolerance for `total_height == wall_height + parapet_height`
pub const HEIGHT_TOLERANCE: f64 = 0.01;

/// Key substrings that mark a numeric leaf as a dimension
pub const DIMENSION_KEYWORDS: &[&str] = &[
    "height",
    "width",
    "depth",
    "thickness",
    "diameter",
    "elevation",
];

/// Key substrings allowed to be exactly zero
pub const ZERO_EXEMPT_KEYWORDS: &[&str] = &["sill_height", "position"];

/// Words an assumption must contain to count as traceable
pub const TRACEABILITY_KEYWORDS: &[&str] = &["analysis", "reference"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_accepts() {
        assert!(FieldKind::Any.accepts(Kind::Null));
        assert!(FieldKind::Number.accepts(Kind::Number));
        assert!(!FieldKind::Number.accepts(Kind::String));
        assert!(!FieldKind::Object.accepts(Kind::Array));
        assert!(!FieldKind::Array.accepts(Kind::Object));
    }

    #[test]
    fn test_top_level_fields_are_unique() {
        let mut names: Vec<&str> = TOP_LEVEL_FIELDS.iter().map(|f| f.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TOP_LEVEL_FIELDS.len());
    }

    #[test]
    fn test_nested_groups_hang_off_declared_objects() {
        for section in [
            OVERALL_SECTION,
            WALLS_SECTION,
            ROOF_SECTION,
            MATERIALS_SECTION,
            TOLERANCES_SECTION,
            COORDINATE_SYSTEM_SECTION,
        ] {
            let root = section.groups[0].parent;
            assert!(
                TOP_LEVEL_FIELDS
                    .iter()
                    .any(|f| f.name == root && f.kind == FieldKind::Object),
                "{} is not a top-level object",
                root
            );
        }
    }

    #[test]
    fn test_sill_height_is_also_a_dimension() {
        assert!(DIMENSION_KEYWORDS.iter().any(|k| "sill_height".contains(k)));
    }
}
