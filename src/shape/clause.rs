//! Clause evaluation
//!
//! A clause is the object on the right-hand side of a field condition,
//! e.g. `{ $gt: 10 }` or `{ sub: 1 }`. A purely operator-keyed clause
//! collapses to one class (the maximum over its operators). A clause with
//! any ordinary key is read as a nested field tree instead.

use crate::observability::Logger;

use super::canonical::canonicalize;
use super::class::Restrictiveness;
use super::classifier::Classifier;
use super::options::ShapeOptions;
use super::tree::Shape;
use super::value::{Document, QueryValue};

const NOT_OPERATOR: &str = "$not";

/// Result of evaluating a clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseShape {
    /// Operator mode: a single verdict
    Class(Restrictiveness),
    /// Field-tree mode: a nested, canonical shape
    Tree(Shape),
}

/// Evaluates a single field condition object
pub fn evaluate_clause(clause: &Document, options: &ShapeOptions) -> ClauseShape {
    Classifier::new(options).evaluate_clause(clause, 0)
}

impl<'a> Classifier<'a> {
    /// Classifies the value of an ordinary field key
    pub(super) fn evaluate_field(&self, value: &QueryValue, depth: usize) -> ClauseShape {
        match value {
            QueryValue::Regex(_) => ClauseShape::Class(Restrictiveness::Test),
            QueryValue::Null | QueryValue::Scalar(_) | QueryValue::Array(_) => {
                ClauseShape::Class(Restrictiveness::Exact)
            }
            QueryValue::Object(clause) => self.evaluate_clause(clause, depth + 1),
        }
    }

    pub(super) fn evaluate_clause(&self, clause: &Document, depth: usize) -> ClauseShape {
        if self.depth_exceeded(depth) {
            return ClauseShape::Class(Restrictiveness::Test);
        }

        if clause.has_field_keys() {
            return ClauseShape::Tree(self.field_tree(clause, depth));
        }

        // Every operator must hold, so the clause is as slow as its slowest
        // operator. No operators at all gives no evidence of indexability.
        let mut class: Option<Restrictiveness> = None;
        for (op, operand) in clause.iter() {
            match self.evaluate_operator(op, operand, depth) {
                ClauseShape::Class(c) => class = Some(class.map_or(c, |prev| prev.max(c))),
                tree @ ClauseShape::Tree(_) => return tree,
            }
        }
        ClauseShape::Class(class.unwrap_or(Restrictiveness::Test))
    }

    /// Evaluates one `$`-keyed operator with its operand
    pub(super) fn evaluate_operator(
        &self,
        op: &str,
        operand: &QueryValue,
        depth: usize,
    ) -> ClauseShape {
        if op == NOT_OPERATOR {
            return match operand {
                QueryValue::Object(negated) => match self.evaluate_clause(negated, depth + 1) {
                    ClauseShape::Class(c) => ClauseShape::Class(c.complement()),
                    // a negated field tree has no single class to complement
                    tree @ ClauseShape::Tree(_) => tree,
                },
                _ => ClauseShape::Class(Restrictiveness::Test),
            };
        }

        if !Restrictiveness::is_known_operator(op) {
            Logger::trace("SHAPE_OPERATOR_UNRECOGNIZED", &[("operator", op)]);
        }
        ClauseShape::Class(Restrictiveness::for_operator(op))
    }

    fn field_tree(&self, clause: &Document, depth: usize) -> Shape {
        let entries = clause
            .iter()
            .map(|(key, value)| {
                let shape = match value {
                    QueryValue::Object(_) => self.classify_at(value, depth + 1),
                    _ => self.render(Restrictiveness::Exact),
                };
                (key.to_string(), shape)
            })
            .collect();
        canonicalize(Shape::Fields(entries))
    }
}
