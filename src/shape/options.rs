//! Per-call classification options
//!
//! The label table only changes the strings embedded in a shape. The
//! classification logic and class ordering are fixed.

use serde::{Deserialize, Serialize};

use super::class::Restrictiveness;

/// Default recursion guard for nested query objects
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Output label for each restrictiveness class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeLabels {
    #[serde(rename = "EXACT", default = "default_exact")]
    pub exact: String,
    #[serde(rename = "RANGE", default = "default_range")]
    pub range: String,
    #[serde(rename = "TEST", default = "default_test")]
    pub test: String,
}

fn default_exact() -> String {
    Restrictiveness::Exact.as_str().to_string()
}
fn default_range() -> String {
    Restrictiveness::Range.as_str().to_string()
}
fn default_test() -> String {
    Restrictiveness::Test.as_str().to_string()
}

impl ShapeLabels {
    pub fn new(
        exact: impl Into<String>,
        range: impl Into<String>,
        test: impl Into<String>,
    ) -> Self {
        Self {
            exact: exact.into(),
            range: range.into(),
            test: test.into(),
        }
    }

    /// Returns the label for a class
    pub fn label(&self, class: Restrictiveness) -> &str {
        match class {
            Restrictiveness::Exact => &self.exact,
            Restrictiveness::Range => &self.range,
            Restrictiveness::Test => &self.test,
        }
    }
}

impl Default for ShapeLabels {
    fn default() -> Self {
        Self {
            exact: default_exact(),
            range: default_range(),
            test: default_test(),
        }
    }
}

/// Options resolved once per `classify` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeOptions {
    #[serde(default)]
    pub labels: ShapeLabels,

    /// Nested objects below this depth are not descended into
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl ShapeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(mut self, labels: ShapeLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            labels: ShapeLabels::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
