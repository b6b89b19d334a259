//! Interpretations: explicit, locally scoped implementation tables.

use crate::Var;

/// Maps abstract operations (and optionally references) to concrete values.
///
/// Returning `None` is the "no matching signature" arm: the evaluator keeps
/// the subterm symbolic instead of failing.
pub trait Interpretation<O, V> {
    /// Apply `op` to fully concrete arguments.
    fn apply(&self, op: &O, args: &[V]) -> Option<V>;

    /// Resolve a reference to a concrete value, if this table binds it.
    fn lookup(&self, _var: &Var) -> Option<V> {
        None
    }
}

impl<O, V, I: Interpretation<O, V> + ?Sized> Interpretation<O, V> for &I {
    fn apply(&self, op: &O, args: &[V]) -> Option<V> {
        (**self).apply(op, args)
    }

    fn lookup(&self, var: &Var) -> Option<V> {
        (**self).lookup(var)
    }
}

/// Two interpretations side by side; the left table is consulted first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coproduct<A, B> {
    pub left: A,
    pub right: B,
}

impl<A, B> Coproduct<A, B> {
    pub fn new(left: A, right: B) -> Self {
        Self { left, right }
    }
}

impl<O, V, A, B> Interpretation<O, V> for Coproduct<A, B>
where
    A: Interpretation<O, V>,
    B: Interpretation<O, V>,
{
    fn apply(&self, op: &O, args: &[V]) -> Option<V> {
        self.left
            .apply(op, args)
            .or_else(|| self.right.apply(op, args))
    }

    fn lookup(&self, var: &Var) -> Option<V> {
        self.left.lookup(var).or_else(|| self.right.lookup(var))
    }
}
