//! Observability for queryshape
//!
//! Structured one-line JSON logging to stderr. Logging is read-only: it
//! never changes what the classifier returns.
//!
//! ```ignore
//! use queryshape::observability::{Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::trace("SHAPE_KEY_DROPPED", &[("key", "$where")]);
//! ```

mod logger;

pub use logger::{Logger, Severity};
