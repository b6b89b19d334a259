//! Concrete bigraph values
//!
//! The ground-level carrier that contextual bigraphs evaluate into:
//!
//! - `Node`: a control, a set of linked edges, optional nested content,
//! - `Edge`: a named link,
//! - `Place`: nodes combined by *merge* (siblings in one region) and
//!   *parallel* (juxtaposed regions),
//! - `Value`: the closed sum of places and edges that interpretations
//!   dispatch on.
//!
//! Structural equality is defined on the canonical unfolded form (`unfold`),
//! not on the construction history.

pub mod place;
pub mod unfold;

pub use place::{Edge, Node, Place};
pub use unfold::{bare_equal, Unfolded, UnfoldedNode};

use std::fmt;

use bigraph_term::Sort;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("{combinator} needs at least 2 parts, got {got}")]
    TooFewParts { combinator: &'static str, got: usize },
}

/// A fully evaluated value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Place(Place),
    Edge(Edge),
}

impl Value {
    pub fn sort(&self) -> Sort {
        match self {
            Value::Place(_) => Sort::Place,
            Value::Edge(_) => Sort::Edge,
        }
    }

    pub fn as_place(&self) -> Option<&Place> {
        match self {
            Value::Place(p) => Some(p),
            Value::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            Value::Edge(e) => Some(e),
            Value::Place(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        self.as_place().and_then(Place::as_node)
    }
}

impl From<Place> for Value {
    fn from(place: Place) -> Self {
        Value::Place(place)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Place(Place::Node(node))
    }
}

impl From<Edge> for Value {
    fn from(edge: Edge) -> Self {
        Value::Edge(edge)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Place(p) => write!(f, "{p}"),
            Value::Edge(e) => write!(f, "{e}"),
        }
    }
}
