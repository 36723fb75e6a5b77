//! queryshape - value-independent shapes for document-database queries
//!
//! ```ignore
//! use queryshape::shape::{classify, same_shape, QueryValue, ShapeOptions};
//!
//! let q1 = QueryValue::from_json(&serde_json::json!({"a": 1, "b": {"$gt": 2}}))?;
//! let q2 = QueryValue::from_json(&serde_json::json!({"b": {"$lt": 9}, "a": 7}))?;
//! let options = ShapeOptions::default();
//! assert!(same_shape(&classify(&q1, &options), &classify(&q2, &options)));
//! ```

pub mod cli;
pub mod config;
pub mod observability;
pub mod shape;
