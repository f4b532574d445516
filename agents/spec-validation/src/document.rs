//! Spec document tree and the YAML parser adapter
//!
//! A spec document is parsed once per run into a [`SpecValue`] tree and
//! discarded after validation. Mappings keep the key order of the source
//! document so issue lists follow the order a reader sees in the file.

use std::fmt;
use std::path::Path;

use crate::error::{Result, ValidationError};

/// Coarse, JSON-like kind of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Null => write!(f, "null"),
            Kind::Boolean => write!(f, "boolean"),
            Kind::Number => write!(f, "number"),
            Kind::String => write!(f, "string"),
            Kind::Array => write!(f, "array"),
            Kind::Object => write!(f, "object"),
        }
    }
}

/// A node of a parsed spec document
#[derive(Debug, Clone, PartialEq)]
pub enum SpecValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<SpecValue>),
    Object(SpecMap),
}

/// Insertion-ordered string-keyed mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecMap {
    entries: Vec<(String, SpecValue)>,
}

impl SpecMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing an existing entry with the same key in place
    pub fn insert(&mut self, key: impl Into<String>, value: SpecValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&SpecValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpecValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, SpecValue)> for SpecMap {
    fn from_iter<I: IntoIterator<Item = (K, SpecValue)>>(iter: I) -> Self {
        let mut map = SpecMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl SpecValue {
    /// Kind of this value, with arrays distinguished from objects
    pub fn kind(&self) -> Kind {
        match self {
            SpecValue::Null => Kind::Null,
            SpecValue::Bool(_) => Kind::Boolean,
            SpecValue::Number(_) => Kind::Number,
            SpecValue::String(_) => Kind::String,
            SpecValue::Array(_) => Kind::Array,
            SpecValue::Object(_) => Kind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SpecValue::Null)
    }

    /// Null or the empty string; optional fields holding either count as unset
    pub fn is_blank(&self) -> bool {
        match self {
            SpecValue::Null => true,
            SpecValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SpecValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SpecValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[SpecValue]> {
        match self {
            SpecValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&SpecMap> {
        match self {
            SpecValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a direct child of an object
    pub fn get(&self, key: &str) -> Option<&SpecValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Look up a nested value by dotted path (e.g. `overall.height.wall_height`)
    pub fn lookup(&self, path: &str) -> Option<&SpecValue> {
        path.split('.')
            .try_fold(self, |current, part| current.get(part))
    }

    /// Convert to a `serde_json::Value` for rendering and report output
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SpecValue::Null => serde_json::Value::Null,
            SpecValue::Bool(b) => serde_json::Value::Bool(*b),
            SpecValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
                    serde_json::Value::from(*n as i64)
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                }
            }
            SpecValue::String(s) => serde_json::Value::String(s.clone()),
            SpecValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(SpecValue::to_json).collect())
            }
            SpecValue::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.to_string(), v.to_json())).collect(),
            ),
        }
    }
}

/// Messages show scalars bare (`side`, `3.5`) and containers as compact JSON.
impl fmt::Display for SpecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecValue::Null => write!(f, "null"),
            SpecValue::Bool(b) => write!(f, "{}", b),
            SpecValue::Number(n) => write!(f, "{}", format_number(*n)),
            SpecValue::String(s) => write!(f, "{}", s),
            SpecValue::Array(_) | SpecValue::Object(_) => write!(f, "{}", self.to_json()),
        }
    }
}

/// Format a number the way a JSON runtime prints it: `3` for 3.0, `3.5` for 3.5
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

impl From<serde_yaml::Value> for SpecValue {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => SpecValue::Null,
            serde_yaml::Value::Bool(b) => SpecValue::Bool(b),
            serde_yaml::Value::Number(n) => n.as_f64().map_or(SpecValue::Null, SpecValue::Number),
            serde_yaml::Value::String(s) => SpecValue::String(s),
            serde_yaml::Value::Sequence(items) => {
                SpecValue::Array(items.into_iter().map(SpecValue::from).collect())
            }
            serde_yaml::Value::Mapping(mapping) => SpecValue::Object(
                mapping
                    .into_iter()
                    .map(|(k, v)| (mapping_key(k), SpecValue::from(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => SpecValue::from(tagged.value),
        }
    }
}

fn mapping_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => SpecValue::from(other).to_string(),
    }
}

/// Parse spec text into a document tree.
///
/// The root must be a mapping; an empty document, a bare scalar or a
/// top-level sequence is rejected as a parse failure.
pub fn parse_document(text: &str) -> Result<SpecValue> {
    let raw: serde_yaml::Value = serde_yaml::from_str(text)
        .map_err(|e| ValidationError::parse_error(e.to_string()))?;

    let document = SpecValue::from(raw);
    match document.kind() {
        Kind::Object => Ok(document),
        other => Err(ValidationError::parse_error(format!(
            "document root must be a mapping, got {}",
            other
        ))),
    }
}

/// Read and parse a spec document from disk
pub fn load_document(path: &Path) -> Result<SpecValue> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ValidationError::file_error(format!(
            "Failed to read spec file '{}': {}",
            path.display(),
            e
        ))
    })?;
    parse_document(&text)
}
