//! Identity-keyed references.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};
use std::sync::Arc;

/// Reference ID (4 bytes; allocated once, never reused within a process)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VarId(u32);

impl VarId {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

static NEXT_VAR_ID: AtomicU32 = AtomicU32::new(0);

/// Declared result type of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sort {
    /// A place value (node, merge or parallel composition).
    Place,
    /// An edge value.
    Edge,
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Place => f.write_str("place"),
            Sort::Edge => f.write_str("edge"),
        }
    }
}

/// A named, typed free-variable placeholder.
///
/// Two references created with the same name are still distinct: equality,
/// hashing and ordering only look at the `VarId`. Ordering by id means maps
/// keyed by `Var` iterate in allocation order, which keeps diagnostics stable.
#[derive(Clone)]
pub struct Var {
    id: VarId,
    name: Arc<str>,
    sort: Sort,
}

impl Var {
    /// Allocate a fresh reference.
    pub fn fresh(name: impl Into<Arc<str>>, sort: Sort) -> Self {
        let id = VarId(NEXT_VAR_ID.fetch_add(1, AtomicOrdering::Relaxed));
        Self {
            id,
            name: name.into(),
            sort,
        }
    }

    pub fn place(name: impl Into<Arc<str>>) -> Self {
        Self::fresh(name, Sort::Place)
    }

    pub fn edge(name: impl Into<Arc<str>>) -> Self {
        Self::fresh(name, Sort::Edge)
    }

    pub fn id(&self) -> VarId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    /// Zero-argument invocation: the leaf term that reads this binding.
    pub fn call<O, V>(&self) -> crate::Term<O, V> {
        crate::Term::Var(self.clone())
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Var {}

impl Hash for Var {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Var {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Var {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}: {}", self.name, self.id.0, self.sort)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
