//! Shape values
//!
//! A shape is built bottom-up by the classifier and never shared. Its
//! textual encoding is order-preserving, so once canonicalized two shapes
//! are equal exactly when their encodings are byte-identical.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Value-independent fingerprint of a query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A single restrictiveness verdict, already rendered through the label table
    Label(String),
    /// Field key (or `$and`/`$or`/`$nor`/`$query`/`$orderby`) to sub-shape
    Fields(Vec<(String, Shape)>),
    /// Sub-query shapes of a logical operator
    Sequence(Vec<Shape>),
}

impl Shape {
    pub fn label(label: impl Into<String>) -> Self {
        Shape::Label(label.into())
    }

    /// Builds a mapping shape, keeping the given entry order
    pub fn fields<K: Into<String>>(entries: impl IntoIterator<Item = (K, Shape)>) -> Self {
        Shape::Fields(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            Shape::Label(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Shape]> {
        match self {
            Shape::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a key of a mapping shape
    pub fn get(&self, key: &str) -> Option<&Shape> {
        match self {
            Shape::Fields(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Top-level keys of a mapping shape, in stored order; empty otherwise
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Shape::Fields(entries) => entries.iter().map(|(k, _)| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Encodes the shape as compact JSON without reordering anything
    pub fn to_canonical_string(&self) -> String {
        // string keys and string leaves only, so serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Lowercase hex SHA-256 of the canonical encoding, for use as a cache key
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_canonical_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Reads a shape back from JSON
    ///
    /// Strings become labels, objects mappings and arrays sequences. Any
    /// other JSON value has no shape reading and yields `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Shape::Label(s.clone())),
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| Shape::from_json(v).map(|s| (k.clone(), s)))
                .collect::<Option<Vec<_>>>()
                .map(Shape::Fields),
            Value::Array(items) => items
                .iter()
                .map(Shape::from_json)
                .collect::<Option<Vec<_>>>()
                .map(Shape::Sequence),
            _ => None,
        }
    }
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Shape::Label(label) => serializer.serialize_str(label),
            Shape::Fields(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Shape::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}
