//! Interpretation tables for the vocabulary against `bigraph_value`.
//!
//! Each table is an explicit match over the closed set of value shapes. A
//! shape that matches no arm returns `None`, which leaves the subterm
//! symbolic rather than failing.

use bigraph_term::{Interpretation, Var};
use bigraph_value::{Place, Value};

use crate::vocabulary::{Op, Signature};
use crate::EdgeBindingMap;

/// `merge`, `parallel` and both shapes of `link`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalLocal;

impl Interpretation<Op, Value> for HorizontalLocal {
    fn apply(&self, op: &Op, args: &[Value]) -> Option<Value> {
        match (op, args) {
            (Op::Merge, [Value::Place(l), Value::Place(r)]) => {
                Place::merge(vec![l.clone(), r.clone()]).ok().map(Value::Place)
            }
            (Op::Parallel, [Value::Place(l), Value::Place(r)]) => {
                Place::parallel(vec![l.clone(), r.clone()])
                    .ok()
                    .map(Value::Place)
            }
            (Op::Link, [Value::Place(Place::Node(node)), Value::Edge(edge)]) => {
                Some(node.clone().link(edge).into())
            }
            (Op::Link, [Value::Edge(edge), Value::Place(Place::Node(node))]) => {
                Some(edge.clone().link(node).into())
            }
            _ => None,
        }
    }
}

/// `nest`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalLocal;

impl Interpretation<Op, Value> for VerticalLocal {
    fn apply(&self, op: &Op, args: &[Value]) -> Option<Value> {
        match (op, args) {
            (Op::Nest, [Value::Place(Place::Node(node)), Value::Place(inner)]) => {
                Some(node.clone().nest(inner.clone()).into())
            }
            _ => None,
        }
    }
}

/// The whole vocabulary, routed by sub-signature.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigraphLocal;

impl Interpretation<Op, Value> for BigraphLocal {
    fn apply(&self, op: &Op, args: &[Value]) -> Option<Value> {
        match op.signature() {
            Signature::Horizontal => HorizontalLocal.apply(op, args),
            Signature::Vertical => VerticalLocal.apply(op, args),
        }
    }
}

/// Resolves references tied to concrete edges by a fragment's `bound_edges`.
#[derive(Clone, Copy)]
pub struct EdgeBindings<'a> {
    edges: &'a EdgeBindingMap,
}

impl<'a> EdgeBindings<'a> {
    pub fn new(edges: &'a EdgeBindingMap) -> Self {
        Self { edges }
    }
}

impl Interpretation<Op, Value> for EdgeBindings<'_> {
    fn apply(&self, _op: &Op, _args: &[Value]) -> Option<Value> {
        None
    }

    fn lookup(&self, var: &Var) -> Option<Value> {
        self.edges.get(var).map(|produce| Value::Edge(produce()))
    }
}
