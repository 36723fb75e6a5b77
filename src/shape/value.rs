//! Query value model
//!
//! A query arrives as a tree of dynamically-typed values. The classifier
//! inspects the runtime variant of each node, so the tree is modelled as an
//! explicit tagged enum rather than as typed structs.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use super::errors::{ValueError, ValueResult};

/// Extended-JSON wrapper keys recognised by `QueryValue::from_json`
const DATE_WRAPPER: &str = "$date";
const SYMBOL_WRAPPER: &str = "$symbol";
const REGEX_WRAPPER: &str = "$regularExpression";
const NUMBER_LONG_WRAPPER: &str = "$numberLong";

/// Atomic query values
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(DateTime<Utc>),
    Symbol(String),
}

/// A regular-expression literal appearing in a query
///
/// Pattern and options are kept verbatim. The document engine owns regex
/// semantics (PCRE look-around, backreferences, its own flag set); the
/// classifier only needs to know a literal is a regex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexPattern {
    pattern: String,
    options: String,
}

impl RegexPattern {
    pub fn new(pattern: impl Into<String>, options: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            options: options.into(),
        }
    }

    /// Returns the pattern source
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the option flags
    pub fn options(&self) -> &str {
        &self.options
    }
}

/// A string-keyed mapping that keeps insertion order
///
/// Inserting an existing key replaces its value in place, matching the
/// "last wins" behaviour of JSON objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: Vec<(String, QueryValue)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entry
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns true if any key is an ordinary field name (no `$` prefix)
    pub fn has_field_keys(&self) -> bool {
        self.keys().any(|k| !is_operator_key(k))
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

/// A node of a query tree
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Scalar(Scalar),
    Regex(RegexPattern),
    Array(Vec<QueryValue>),
    Object(Document),
}

impl QueryValue {
    /// Converts parsed JSON into a query value
    ///
    /// Objects whose only key is `$date`, `$symbol` or `$regularExpression`
    /// are decoded as the corresponding atomic value. Any other object,
    /// including ones with `$`-prefixed operator keys, stays an object.
    pub fn from_json(value: &Value) -> ValueResult<Self> {
        match value {
            Value::Null => Ok(QueryValue::Null),
            Value::Bool(b) => Ok(Scalar::Bool(*b).into()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Scalar::Int(i).into()),
                None => Ok(Scalar::Float(n.as_f64().unwrap_or_default()).into()),
            },
            Value::String(s) => Ok(Scalar::String(s.clone()).into()),
            Value::Array(items) => items
                .iter()
                .map(QueryValue::from_json)
                .collect::<ValueResult<Vec<_>>>()
                .map(QueryValue::Array),
            Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(inner) = map.get(DATE_WRAPPER) {
                        return parse_date(inner).map(|d| Scalar::Date(d).into());
                    }
                    if let Some(inner) = map.get(SYMBOL_WRAPPER) {
                        return match inner {
                            Value::String(s) => Ok(Scalar::Symbol(s.clone()).into()),
                            _ => Err(ValueError::malformed(SYMBOL_WRAPPER, "expected a string")),
                        };
                    }
                    if let Some(inner) = map.get(REGEX_WRAPPER) {
                        return parse_regex(inner).map(QueryValue::Regex);
                    }
                }

                let mut doc = Document::new();
                for (key, item) in map {
                    doc.insert(key.as_str(), QueryValue::from_json(item)?);
                }
                Ok(QueryValue::Object(doc))
            }
        }
    }

    pub fn as_object(&self) -> Option<&Document> {
        match self {
            QueryValue::Object(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[QueryValue]> {
        match self {
            QueryValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// Returns true for operator / meta keys
pub fn is_operator_key(key: &str) -> bool {
    key.starts_with('$')
}

fn parse_date(inner: &Value) -> ValueResult<DateTime<Utc>> {
    match inner {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| ValueError::InvalidDate(format!("'{}': {}", s, e))),
        Value::Number(n) => {
            let millis = n
                .as_i64()
                .ok_or_else(|| ValueError::InvalidDate(format!("{} is not integral", n)))?;
            millis_to_date(millis)
        }
        Value::Object(map) if map.len() == 1 => {
            let millis = map
                .get(NUMBER_LONG_WRAPPER)
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| ValueError::malformed(DATE_WRAPPER, "expected $numberLong string"))?;
            millis_to_date(millis)
        }
        _ => Err(ValueError::malformed(
            DATE_WRAPPER,
            "expected RFC 3339 string or epoch milliseconds",
        )),
    }
}

fn millis_to_date(millis: i64) -> ValueResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| ValueError::InvalidDate(format!("{} ms is out of range", millis)))
}

fn parse_regex(inner: &Value) -> ValueResult<RegexPattern> {
    let map = inner
        .as_object()
        .ok_or_else(|| ValueError::malformed(REGEX_WRAPPER, "expected an object"))?;
    let pattern = map
        .get("pattern")
        .and_then(Value::as_str)
        .ok_or_else(|| ValueError::malformed(REGEX_WRAPPER, "missing string 'pattern'"))?;
    let options = match map.get("options") {
        None => "",
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(ValueError::malformed(REGEX_WRAPPER, "'options' must be a string")),
    };
    Ok(RegexPattern::new(pattern, options))
}

impl From<Scalar> for QueryValue {
    fn from(s: Scalar) -> Self {
        QueryValue::Scalar(s)
    }
}

impl From<RegexPattern> for QueryValue {
    fn from(r: RegexPattern) -> Self {
        QueryValue::Regex(r)
    }
}

impl From<Document> for QueryValue {
    fn from(d: Document) -> Self {
        QueryValue::Object(d)
    }
}

impl From<Vec<QueryValue>> for QueryValue {
    fn from(items: Vec<QueryValue>) -> Self {
        QueryValue::Array(items)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        Scalar::Bool(b).into()
    }
}

impl From<i64> for QueryValue {
    fn from(i: i64) -> Self {
        Scalar::Int(i).into()
    }
}

impl From<i32> for QueryValue {
    fn from(i: i32) -> Self {
        Scalar::Int(i64::from(i)).into()
    }
}

impl From<f64> for QueryValue {
    fn from(f: f64) -> Self {
        Scalar::Float(f).into()
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string()).into()
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        Scalar::String(s).into()
    }
}

impl From<DateTime<Utc>> for QueryValue {
    fn from(d: DateTime<Utc>) -> Self {
        Scalar::Date(d).into()
    }
}
