//! Query shape classifier
//!
//! Walks a query object key by key and records, for each field, how
//! restrictively it is tested. Logical operators (`$and`, `$or`, `$nor`)
//! keep their sub-query shapes as sequences; `$query` and `$orderby` nest a
//! whole shape. The result is canonical at every level.
//!
//! Classification never fails. Malformed fragments degrade to a
//! conservative class instead of being rejected.

use crate::observability::Logger;

use super::canonical::{canonicalize, is_logical_key, is_nested_query_key};
use super::class::Restrictiveness;
use super::clause::ClauseShape;
use super::options::ShapeOptions;
use super::tree::Shape;
use super::value::{is_operator_key, QueryValue};

/// Server-side javascript predicates carry no shape information
const WHERE_KEY: &str = "$where";

/// Computes the shape of a query
pub fn classify(query: &QueryValue, options: &ShapeOptions) -> Shape {
    Classifier::new(options).classify(query)
}

/// Classifier bound to one set of options
///
/// Holds no state besides the borrowed options, so one instance can be
/// reused across queries and threads.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    options: &'a ShapeOptions,
}

impl<'a> Classifier<'a> {
    pub fn new(options: &'a ShapeOptions) -> Self {
        Self { options }
    }

    /// Computes the shape of a query
    ///
    /// A query that is not an object (scalar, array, regex, null) has no
    /// fields to decompose and is reported as a single exact label.
    pub fn classify(&self, query: &QueryValue) -> Shape {
        self.classify_at(query, 0)
    }

    pub(super) fn classify_at(&self, query: &QueryValue, depth: usize) -> Shape {
        let query = match query {
            QueryValue::Object(doc) => doc,
            _ => return self.render(Restrictiveness::Exact),
        };

        if self.depth_exceeded(depth) {
            return self.render(Restrictiveness::Test);
        }

        let mut entries = Vec::with_capacity(query.len());
        for (key, value) in query.iter() {
            let shape = if is_logical_key(key) {
                match value {
                    QueryValue::Array(queries) => Shape::Sequence(
                        queries
                            .iter()
                            .map(|q| self.classify_at(q, depth + 1))
                            .collect(),
                    ),
                    _ => self.render(Restrictiveness::Test),
                }
            } else if is_nested_query_key(key) {
                self.classify_at(value, depth + 1)
            } else if key == WHERE_KEY {
                Logger::trace("SHAPE_KEY_DROPPED", &[("key", key)]);
                continue;
            } else if is_operator_key(key) {
                let clause = self.evaluate_operator(key, value, depth);
                self.resolve(clause)
            } else {
                let clause = self.evaluate_field(value, depth);
                self.resolve(clause)
            };
            entries.push((key.to_string(), shape));
        }

        canonicalize(Shape::Fields(entries))
    }

    /// Renders a class through the label table
    pub(super) fn render(&self, class: Restrictiveness) -> Shape {
        Shape::Label(self.options.labels.label(class).to_string())
    }

    fn resolve(&self, clause: ClauseShape) -> Shape {
        match clause {
            ClauseShape::Class(class) => self.render(class),
            ClauseShape::Tree(shape) => shape,
        }
    }

    pub(super) fn depth_exceeded(&self, depth: usize) -> bool {
        if depth < self.options.max_depth {
            return false;
        }
        let depth = depth.to_string();
        let max_depth = self.options.max_depth.to_string();
        Logger::warn(
            "SHAPE_DEPTH_LIMIT",
            &[("depth", depth.as_str()), ("max_depth", max_depth.as_str())],
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::options::ShapeLabels;
    use serde_json::json;

    fn shape_of(query: serde_json::Value) -> Shape {
        classify(&QueryValue::from_json(&query).unwrap(), &ShapeOptions::default())
    }

    fn expect(shape: serde_json::Value) -> Shape {
        Shape::from_json(&shape).unwrap()
    }

    #[test]
    fn test_non_object_queries_are_exact() {
        assert_eq!(shape_of(json!(1)), Shape::label("EXACT"));
        assert_eq!(shape_of(json!(null)), Shape::label("EXACT"));
        assert_eq!(shape_of(json!([1, 2])), Shape::label("EXACT"));
        assert_eq!(
            shape_of(json!({"$regularExpression": {"pattern": "^a"}})),
            Shape::label("EXACT")
        );
    }

    #[test]
    fn test_field_value_variants() {
        let shape = shape_of(json!({
            "n": null,
            "b": true,
            "i": 2,
            "f": 2.5,
            "s": "x",
            "d": {"$date": "2017-09-15T00:00:00Z"},
            "y": {"$symbol": "sym"},
            "arr": [{"x": 1}],
            "re": {"$regularExpression": {"pattern": "^"}}
        }));
        assert_eq!(
            shape,
            expect(json!({
                "arr": "EXACT",
                "b": "EXACT",
                "d": "EXACT",
                "f": "EXACT",
                "i": "EXACT",
                "n": "EXACT",
                "re": "TEST",
                "s": "EXACT",
                "y": "EXACT"
            }))
        );
    }

    #[test]
    fn test_distinguishes_match_types() {
        assert_eq!(
            shape_of(json!({"a": 1, "b": {"$gt": 2}, "c": {"$not": {"$eq": 3}}})),
            expect(json!({"a": "EXACT", "b": "RANGE", "c": "TEST"}))
        );
    }

    #[test]
    fn test_where_is_dropped() {
        assert_eq!(shape_of(json!({"$where": "this.a > 1"})), expect(json!({})));
        assert_eq!(
            shape_of(json!({"$where": "", "a": 1})),
            expect(json!({"a": "EXACT"}))
        );
    }

    #[test]
    fn test_top_level_operator_keys() {
        assert_eq!(
            shape_of(json!({"$other": {"a": 1}, "$eq": 1, "$gt": 3})),
            expect(json!({"$eq": "EXACT", "$gt": "RANGE", "$other": "TEST"}))
        );
        assert_eq!(
            shape_of(json!({"$not": {"$eq": 1}})),
            expect(json!({"$not": "TEST"}))
        );
    }

    #[test]
    fn test_logical_operators() {
        assert_eq!(
            shape_of(json!({"a": 1, "$and": [{"d": 4}, {"c": 3, "b": 2}]})),
            expect(json!({"$and": [{"b": "EXACT", "c": "EXACT"}, {"d": "EXACT"}], "a": "EXACT"}))
        );
        assert_eq!(
            shape_of(json!({"$nor": [{"x": {"$ne": 1}}]})),
            expect(json!({"$nor": [{"x": "TEST"}]}))
        );
        assert_eq!(
            shape_of(json!({"$or": [{"$or": [{"c": 1}, {"c": 2}]}]})),
            expect(json!({"$or": [{"$or": [{"c": "EXACT"}, {"c": "EXACT"}]}]}))
        );
    }

    #[test]
    fn test_logical_operator_without_array_is_test() {
        assert_eq!(
            shape_of(json!({"$and": {"a": 1}})),
            expect(json!({"$and": "TEST"}))
        );
    }

    #[test]
    fn test_query_and_orderby_wrappers() {
        assert_eq!(
            shape_of(json!({"$query": {"b": 2, "a": 1}, "$orderby": {"z": 1}, "c": 1})),
            expect(json!({
                "$orderby": {"z": "EXACT"},
                "$query": {"a": "EXACT", "b": "EXACT"},
                "c": "EXACT"
            }))
        );
    }

    #[test]
    fn test_custom_labels() {
        let options = ShapeOptions::default().with_labels(ShapeLabels::new("e", "r", "t"));
        let query = QueryValue::from_json(&json!({"a": 1, "b": {"$gt": 2}, "c": {"$ne": 3}})).unwrap();
        assert_eq!(
            classify(&query, &options),
            expect(json!({"a": "e", "b": "r", "c": "t"}))
        );
    }

    #[test]
    fn test_depth_guard_degrades_to_test() {
        let options = ShapeOptions::default().with_max_depth(2);
        let query = QueryValue::from_json(&json!({"a": {"b": {"c": {"d": 1}}}})).unwrap();
        assert_eq!(
            classify(&query, &options),
            expect(json!({"a": {"b": "TEST"}}))
        );
    }

    #[test]
    fn test_classifier_is_reusable() {
        let options = ShapeOptions::default();
        let classifier = Classifier::new(&options);
        let q1 = QueryValue::from_json(&json!({"b": 1, "a": 2})).unwrap();
        let q2 = QueryValue::from_json(&json!({"a": 5, "b": 6})).unwrap();
        assert_eq!(classifier.classify(&q1), classifier.classify(&q2));
    }
}
