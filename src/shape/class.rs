//! Restrictiveness classes
//!
//! Ordered from most to least index-friendly. When several conditions govern
//! the same field they must all hold, so the combined class is the maximum.

use std::fmt;

/// How much work evaluating a condition requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Restrictiveness {
    /// Admits an exact indexed point lookup
    Exact = 0,
    /// Admits an indexed range or existence scan
    Range = 1,
    /// Every candidate must be scanned and evaluated
    Test = 2,
}

impl Restrictiveness {
    /// Returns the verbatim class name
    pub fn as_str(&self) -> &'static str {
        match self {
            Restrictiveness::Exact => "EXACT",
            Restrictiveness::Range => "RANGE",
            Restrictiveness::Test => "TEST",
        }
    }

    /// Class of a single query operator
    ///
    /// `$not` is not resolvable from the key alone; it is handled by the
    /// clause evaluator, and reports `Test` here.
    pub fn for_operator(op: &str) -> Self {
        match op {
            "$eq" | "$in" => Restrictiveness::Exact,
            "$lt" | "$lte" | "$gt" | "$gte" | "$exists" | "$nin" => Restrictiveness::Range,
            _ => Restrictiveness::Test,
        }
    }

    /// Returns true if `op` has an entry in the operator table
    pub fn is_known_operator(op: &str) -> bool {
        matches!(
            op,
            "$eq"
                | "$in"
                | "$lt"
                | "$lte"
                | "$gt"
                | "$gte"
                | "$exists"
                | "$nin"
                | "$ne"
                | "$regex"
                | "$all"
                | "$size"
                | "$mod"
                | "$where"
                | "$not"
        )
    }

    /// Class of the negation of a condition of this class
    ///
    /// Not an involution: negating twice turns `Exact` into `Test`.
    pub fn complement(self) -> Self {
        match self {
            Restrictiveness::Exact => Restrictiveness::Test,
            Restrictiveness::Range => Restrictiveness::Range,
            Restrictiveness::Test => Restrictiveness::Test,
        }
    }
}

impl fmt::Display for Restrictiveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
