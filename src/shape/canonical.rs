//! Canonical ordering of shapes
//!
//! Mapping keys are sorted lexicographically. Sub-query sequences under
//! `$and`/`$or`/`$nor` are sorted by the colon-joined list of each element's
//! sorted top-level keys. That ordering is deliberately shallow: elements
//! with the same top-level keys tie and keep their input order.

use super::tree::Shape;

/// Keys whose value is a sequence of sub-query shapes
pub const LOGICAL_KEYS: [&str; 3] = ["$and", "$or", "$nor"];

/// Keys whose value is a nested query shape
pub const NESTED_QUERY_KEYS: [&str; 2] = ["$query", "$orderby"];

pub fn is_logical_key(key: &str) -> bool {
    LOGICAL_KEYS.contains(&key)
}

pub fn is_nested_query_key(key: &str) -> bool {
    NESTED_QUERY_KEYS.contains(&key)
}

/// Puts a shape into canonical order. Idempotent.
///
/// Values under ordinary keys are left untouched; the classifier
/// canonicalizes them when it builds them.
pub fn canonicalize(shape: Shape) -> Shape {
    match shape {
        Shape::Fields(mut entries) => {
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let entries = entries
                .into_iter()
                .map(|(key, value)| {
                    let value = if is_logical_key(&key) {
                        canonicalize_sequence(value)
                    } else if is_nested_query_key(&key) {
                        canonicalize(value)
                    } else {
                        value
                    };
                    (key, value)
                })
                .collect();
            Shape::Fields(entries)
        }
        other => other,
    }
}

fn canonicalize_sequence(shape: Shape) -> Shape {
    match shape {
        Shape::Sequence(items) => {
            let mut items: Vec<Shape> = items.into_iter().map(canonicalize).collect();
            // stable
            items.sort_by_cached_key(sequence_sort_key);
            Shape::Sequence(items)
        }
        other => canonicalize(other),
    }
}

/// Sort key of a sub-query shape inside a logical sequence
///
/// Keys compare in UTF-8 byte order, which is Unicode code-point order.
/// This differs from UTF-16 code-unit order only for keys mixing
/// supplementary-plane characters with U+E000..U+FFFF.
pub fn sequence_sort_key(shape: &Shape) -> String {
    let mut keys = shape.keys();
    keys.sort_unstable();
    keys.join(":")
}
