//! Shape equality
//!
//! Both sides are expected to come out of the classifier, which already
//! fixed all ordering, so comparing the order-preserving encodings is the
//! same as comparing the trees.

use super::tree::Shape;

/// Returns true if two canonical shapes are identical
pub fn same_shape(a: &Shape, b: &Shape) -> bool {
    a.to_canonical_string() == b.to_canonical_string()
}
