//! Canonical unfolding and structural equality.
//!
//! Two values are structurally equal iff their unfolded forms are equal:
//!
//! - regions keep their order (parallel composition is not commutative),
//! - siblings within a region are sorted (merge is commutative and associative),
//! - nesting a multi-region place into a node merges its regions,
//! - link sets are sorted and deduplicated.

use serde::Serialize;

use crate::{Edge, Node, Place, Value};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct UnfoldedNode {
    pub control: String,
    pub links: Vec<String>,
    pub children: Vec<UnfoldedNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Unfolded {
    Place { regions: Vec<Vec<UnfoldedNode>> },
    Edge { name: String, linked: Vec<String> },
}

impl Node {
    pub fn unfold(&self) -> UnfoldedNode {
        let children = match self.inner() {
            None => Vec::new(),
            Some(p) => {
                let mut all: Vec<UnfoldedNode> = p.regions().into_iter().flatten().collect();
                all.sort();
                all
            }
        };
        UnfoldedNode {
            control: self.control().to_string(),
            links: self.links().map(str::to_string).collect(),
            children,
        }
    }
}

impl Place {
    /// Regions of this place in canonical form.
    pub fn regions(&self) -> Vec<Vec<UnfoldedNode>> {
        match self {
            Place::Node(n) => vec![vec![n.unfold()]],
            Place::Merge(parts) => {
                let mut region: Vec<UnfoldedNode> = parts
                    .iter()
                    .flat_map(|p| p.regions().into_iter().flatten())
                    .collect();
                region.sort();
                vec![region]
            }
            Place::Parallel(parts) => parts.iter().flat_map(Place::regions).collect(),
        }
    }

    pub fn unfold(&self) -> Unfolded {
        Unfolded::Place {
            regions: self.regions(),
        }
    }
}

impl Edge {
    pub fn unfold(&self) -> Unfolded {
        Unfolded::Edge {
            name: self.name().to_string(),
            linked: self.linked().map(str::to_string).collect(),
        }
    }
}

impl Value {
    pub fn unfold(&self) -> Unfolded {
        match self {
            Value::Place(p) => p.unfold(),
            Value::Edge(e) => e.unfold(),
        }
    }
}

/// Structural equality of two fully evaluated values.
pub fn bare_equal(a: &Value, b: &Value) -> bool {
    a.unfold() == b.unfold()
}
