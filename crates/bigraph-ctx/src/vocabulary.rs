//! The local combinator vocabulary.
//!
//! Four operations build expression trees over places and edges:
//!
//! - horizontal: `merge`, `parallel`, `link`,
//! - vertical: `nest`.
//!
//! The constructors below never evaluate anything; they only record the
//! operation. Interpretation happens in `runner`.

use std::collections::BTreeSet;
use std::fmt;

use bigraph_term::{Term, Var};
use bigraph_value::{Edge, Node, Place, Value};

use crate::BTerm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Op {
    Merge,
    Parallel,
    Link,
    Nest,
}

impl Op {
    pub const ALL: [Op; 4] = [Op::Merge, Op::Parallel, Op::Link, Op::Nest];

    pub fn name(self) -> &'static str {
        match self {
            Op::Merge => "merge",
            Op::Parallel => "parallel",
            Op::Link => "link",
            Op::Nest => "nest",
        }
    }

    pub fn signature(self) -> Signature {
        match self {
            Op::Merge | Op::Parallel | Op::Link => Signature::Horizontal,
            Op::Nest => Signature::Vertical,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sub-signatures of the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signature {
    /// Place/link algebra within one level.
    Horizontal,
    /// Place algebra across levels.
    Vertical,
}

impl Signature {
    pub fn ops(self) -> BTreeSet<Op> {
        Op::ALL
            .into_iter()
            .filter(|op| op.signature() == self)
            .collect()
    }
}

/// The full vocabulary: the union of all sub-signatures.
pub fn spacelike() -> BTreeSet<Op> {
    let mut ops = Signature::Horizontal.ops();
    ops.extend(Signature::Vertical.ops());
    ops
}

/// Anything usable as an argument of a vocabulary constructor.
pub trait IntoTerm {
    fn into_term(self) -> BTerm;
}

impl IntoTerm for BTerm {
    fn into_term(self) -> BTerm {
        self
    }
}

impl IntoTerm for &Var {
    fn into_term(self) -> BTerm {
        self.call()
    }
}

impl IntoTerm for Value {
    fn into_term(self) -> BTerm {
        Term::Lit(self)
    }
}

impl IntoTerm for Node {
    fn into_term(self) -> BTerm {
        Term::Lit(self.into())
    }
}

impl IntoTerm for Place {
    fn into_term(self) -> BTerm {
        Term::Lit(self.into())
    }
}

impl IntoTerm for Edge {
    fn into_term(self) -> BTerm {
        Term::Lit(self.into())
    }
}

/// Siblings under one region.
pub fn merge(left: impl IntoTerm, right: impl IntoTerm) -> BTerm {
    Term::app(Op::Merge, vec![left.into_term(), right.into_term()])
}

/// Juxtaposed regions.
pub fn parallel(left: impl IntoTerm, right: impl IntoTerm) -> BTerm {
    Term::app(Op::Parallel, vec![left.into_term(), right.into_term()])
}

/// Couple a node and an edge, in either order.
pub fn link(from: impl IntoTerm, to: impl IntoTerm) -> BTerm {
    Term::app(Op::Link, vec![from.into_term(), to.into_term()])
}

/// Place `inner` inside `outer`.
pub fn nest(outer: impl IntoTerm, inner: impl IntoTerm) -> BTerm {
    Term::app(Op::Nest, vec![outer.into_term(), inner.into_term()])
}
