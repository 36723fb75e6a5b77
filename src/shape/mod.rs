//! Query shapes
//!
//! A shape is a value-independent fingerprint of a query: which fields it
//! tests and how restrictively. Queries that differ only in literal values
//! (or in key / clause order) share a shape, so a shape can key a plan
//! cache.
//!
//! # Restrictiveness
//!
//! - EXACT: admits an indexed point lookup (`a: 1`, `$eq`, `$in`)
//! - RANGE: admits an indexed range or existence scan (`$gt`, `$exists`, `$nin`, ...)
//! - TEST: every candidate must be evaluated (`$ne`, `$regex`, regex literals, ...)
//!
//! Conditions on one field combine by maximum under EXACT < RANGE < TEST.
//!
//! # Pipeline
//!
//! value model → clause evaluator → classifier → canonicalizer → equality

mod canonical;
mod class;
mod classifier;
mod clause;
mod equality;
mod errors;
mod options;
mod tree;
mod value;

pub use canonical::{canonicalize, sequence_sort_key, LOGICAL_KEYS, NESTED_QUERY_KEYS};
pub use class::Restrictiveness;
pub use classifier::{classify, Classifier};
pub use clause::{evaluate_clause, ClauseShape};
pub use equality::same_shape;
pub use errors::{ValueError, ValueResult};
pub use options::{ShapeLabels, ShapeOptions, DEFAULT_MAX_DEPTH};
pub use tree::Shape;
pub use value::{is_operator_key, Document, QueryValue, RegexPattern, Scalar};
