//! Nodes, edges and places.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::ValueError;

/// An edge, identified by its name.
///
/// Values are not shared-mutable, so edge-first linking (`Edge::link`)
/// records the attached node's control on the edge itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    name: Arc<str>,
    linked: BTreeSet<Arc<str>>,
}

impl Edge {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            linked: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Controls of nodes attached through `Edge::link`.
    pub fn linked(&self) -> impl Iterator<Item = &str> {
        self.linked.iter().map(|c| c.as_ref())
    }

    /// Attach `node` to this edge; returns the edge.
    pub fn link(mut self, node: &Node) -> Self {
        self.linked.insert(node.control.clone());
        self
    }
}

/// A node with a control, a set of linked edge names and optional content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    control: Arc<str>,
    links: BTreeSet<Arc<str>>,
    inner: Option<Box<Place>>,
}

impl Node {
    pub fn new(control: impl Into<Arc<str>>) -> Self {
        Self {
            control: control.into(),
            links: BTreeSet::new(),
            inner: None,
        }
    }

    pub fn control(&self) -> &str {
        &self.control
    }

    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(|e| e.as_ref())
    }

    pub fn inner(&self) -> Option<&Place> {
        self.inner.as_deref()
    }

    /// Link this node to `edge` (set semantics: linking twice is a no-op).
    pub fn link(mut self, edge: &Edge) -> Self {
        self.links.insert(edge.name.clone());
        self
    }

    /// Place `inner` inside this node.
    ///
    /// Nesting into a node that already has content merges the two.
    pub fn nest(mut self, inner: Place) -> Self {
        self.inner = Some(Box::new(match self.inner.take() {
            None => inner,
            Some(existing) => Place::Merge(vec![*existing, inner]),
        }));
        self
    }
}

/// A place value: a node, or a merge/parallel combination of places.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Place {
    Node(Node),
    /// Siblings sharing one region.
    Merge(Vec<Place>),
    /// Independent regions, in order.
    Parallel(Vec<Place>),
}

impl Place {
    pub fn merge(parts: Vec<Place>) -> Result<Self, ValueError> {
        if parts.len() < 2 {
            return Err(ValueError::TooFewParts {
                combinator: "merge",
                got: parts.len(),
            });
        }
        Ok(Place::Merge(parts))
    }

    pub fn parallel(parts: Vec<Place>) -> Result<Self, ValueError> {
        if parts.len() < 2 {
            return Err(ValueError::TooFewParts {
                combinator: "parallel",
                got: parts.len(),
            });
        }
        Ok(Place::Parallel(parts))
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Place::Node(n) => Some(n),
            _ => None,
        }
    }
}

impl From<Node> for Place {
    fn from(node: Node) -> Self {
        Place::Node(node)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.linked.is_empty() {
            write!(f, "<{}>", join(self.linked.iter()))?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.control)?;
        if !self.links.is_empty() {
            write!(f, "{{{}}}", join(self.links.iter()))?;
        }
        match self.inner.as_deref() {
            None => Ok(()),
            Some(Place::Node(n)) => write!(f, ".{n}"),
            Some(p) => write!(f, ".({p})"),
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Node(n) => write!(f, "{n}"),
            Place::Merge(parts) => {
                for (i, p) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    match p {
                        Place::Parallel(_) => write!(f, "({p})")?,
                        _ => write!(f, "{p}")?,
                    }
                }
                Ok(())
            }
            Place::Parallel(parts) => {
                for (i, p) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" || ")?;
                    }
                    write!(f, "{p}")?;
                }
                Ok(())
            }
        }
    }
}

fn join<'a>(items: impl Iterator<Item = &'a Arc<str>>) -> String {
    items.map(|s| s.as_ref()).collect::<Vec<_>>().join(",")
}
