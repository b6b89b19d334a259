//! Term trees, free variables, substitution and evaluation.

use std::collections::BTreeSet;
use std::fmt;

use ahash::AHashMap;

use crate::{Interpretation, Var};

/// An immutable expression tree.
///
/// Nothing is evaluated at construction time; `App` nodes only record the
/// operation tag and its argument terms.
#[derive(Debug, Clone, PartialEq)]
pub enum Term<O, V> {
    /// A deferred read of a reference.
    Var(Var),
    /// An embedded concrete value.
    Lit(V),
    /// An operation applied to argument terms.
    App { op: O, args: Vec<Term<O, V>> },
}

impl<O, V> Term<O, V> {
    pub fn lit(value: impl Into<V>) -> Self {
        Term::Lit(value.into())
    }

    pub fn app(op: O, args: Vec<Term<O, V>>) -> Self {
        Term::App { op, args }
    }

    /// The concrete value, if this term is fully evaluated.
    pub fn as_value(&self) -> Option<&V> {
        match self {
            Term::Lit(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Result<V, Self> {
        match self {
            Term::Lit(v) => Ok(v),
            other => Err(other),
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Term::Lit(_))
    }

    /// References occurring in this term.
    ///
    /// Terms have no binders, so every occurring reference is free.
    pub fn free_vars(&self) -> BTreeSet<Var> {
        let mut out = BTreeSet::new();
        self.collect_free_vars(&mut out);
        out
    }

    fn collect_free_vars(&self, out: &mut BTreeSet<Var>) {
        match self {
            Term::Var(v) => {
                out.insert(v.clone());
            }
            Term::Lit(_) => {}
            Term::App { args, .. } => {
                for arg in args {
                    arg.collect_free_vars(out);
                }
            }
        }
    }

    /// Number of `App` nodes (operations still to be applied).
    pub fn pending_ops(&self) -> usize {
        match self {
            Term::App { args, .. } => 1 + args.iter().map(Term::pending_ops).sum::<usize>(),
            _ => 0,
        }
    }
}

impl<O: Clone, V: Clone> Term<O, V> {
    /// Replace mapped references; unmapped references are left untouched.
    pub fn substitute(&self, subst: &Substitution<O, V>) -> Self {
        if subst.is_empty() {
            return self.clone();
        }
        match self {
            Term::Var(v) => match subst.get(v) {
                Some(replacement) => replacement.clone(),
                None => self.clone(),
            },
            Term::Lit(_) => self.clone(),
            Term::App { op, args } => Term::App {
                op: op.clone(),
                args: args.iter().map(|a| a.substitute(subst)).collect(),
            },
        }
    }

    /// Evaluate bottom-up under `intp`.
    ///
    /// A subterm collapses to `Lit` only when all of its arguments are
    /// concrete and `intp` accepts their shapes; otherwise it is rebuilt with
    /// its (partially evaluated) arguments.
    pub fn evaluate<I>(&self, intp: &I) -> Self
    where
        I: Interpretation<O, V> + ?Sized,
    {
        match self {
            Term::Var(v) => match intp.lookup(v) {
                Some(value) => Term::Lit(value),
                None => self.clone(),
            },
            Term::Lit(_) => self.clone(),
            Term::App { op, args } => {
                let args: Vec<Term<O, V>> = args.iter().map(|a| a.evaluate(intp)).collect();
                let values: Option<Vec<V>> = args.iter().map(|a| a.as_value().cloned()).collect();
                match values.and_then(|vs| intp.apply(op, &vs)) {
                    Some(value) => Term::Lit(value),
                    None => Term::App {
                        op: op.clone(),
                        args,
                    },
                }
            }
        }
    }
}

/// Free variables of a collection of terms.
pub fn free_vars_of<'a, O: 'a, V: 'a>(
    terms: impl IntoIterator<Item = &'a Term<O, V>>,
) -> BTreeSet<Var> {
    let mut out = BTreeSet::new();
    for term in terms {
        term.collect_free_vars(&mut out);
    }
    out
}

impl<O: fmt::Display, V: fmt::Display> fmt::Display for Term<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(v) => write!(f, "{v}()"),
            Term::Lit(v) => write!(f, "{v}"),
            Term::App { op, args } => {
                write!(f, "{op}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Identity-keyed replacement map for `Term::substitute`.
#[derive(Debug, Clone)]
pub struct Substitution<O, V> {
    map: AHashMap<Var, Term<O, V>>,
}

impl<O, V> Default for Substitution<O, V> {
    fn default() -> Self {
        Self {
            map: AHashMap::new(),
        }
    }
}

impl<O, V> Substitution<O, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, var: Var, term: Term<O, V>) -> Self {
        self.map.insert(var, term);
        self
    }

    pub fn insert(&mut self, var: Var, term: Term<O, V>) {
        self.map.insert(var, term);
    }

    /// Bind interface names to replacements.
    ///
    /// `ports` maps port names to the references declared for them; `lookup`
    /// supplies the replacement for a port name. Ports without a replacement
    /// are skipped.
    pub fn bind_ports<'a, P, F>(mut self, ports: P, mut lookup: F) -> Self
    where
        P: IntoIterator<Item = (&'a String, &'a Var)>,
        F: FnMut(&str) -> Option<Term<O, V>>,
    {
        for (port, var) in ports {
            if let Some(term) = lookup(port) {
                self.map.insert(var.clone(), term);
            }
        }
        self
    }

    /// Add a secondary environment of reference bindings.
    ///
    /// Entries already present (e.g. from `bind_ports`) are kept.
    pub fn with_env<'a, E>(mut self, env: E) -> Self
    where
        E: IntoIterator<Item = (&'a Var, &'a Term<O, V>)>,
        O: Clone + 'a,
        V: Clone + 'a,
    {
        for (var, term) in env {
            self.map
                .entry(var.clone())
                .or_insert_with(|| term.clone());
        }
        self
    }

    pub fn get(&self, var: &Var) -> Option<&Term<O, V>> {
        self.map.get(var)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sort;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Arith {
        Add,
        Neg,
    }

    impl fmt::Display for Arith {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(match self {
                Arith::Add => "add",
                Arith::Neg => "neg",
            })
        }
    }

    /// Only adds non-negative numbers; everything else stays symbolic.
    struct Naturals;

    impl Interpretation<Arith, i64> for Naturals {
        fn apply(&self, op: &Arith, args: &[i64]) -> Option<i64> {
            match (op, args) {
                (Arith::Add, [a, b]) if *a >= 0 && *b >= 0 => Some(a + b),
                (Arith::Neg, [a]) => Some(-a),
                _ => None,
            }
        }
    }

    type T = Term<Arith, i64>;

    fn add(a: T, b: T) -> T {
        Term::app(Arith::Add, vec![a, b])
    }

    #[test]
    fn construction_does_not_evaluate() {
        let t = add(Term::lit(1), Term::lit(2));
        assert!(!t.is_value());
        assert_eq!(t.pending_ops(), 1);
        assert_eq!(t.to_string(), "add(1, 2)");
    }

    #[test]
    fn evaluate_collapses_matching_subterms() {
        let t = add(add(Term::lit(1), Term::lit(2)), Term::lit(3));
        assert_eq!(t.evaluate(&Naturals), Term::Lit(6));
    }

    #[test]
    fn shape_mismatch_leaves_a_residual() {
        let x = Var::fresh("x", Sort::Place);
        let t = add(add(Term::lit(1), Term::lit(2)), Term::app(Arith::Neg, vec![Term::lit(4)]));
        // neg(4) evaluates to -4, which `add` rejects.
        let r = t.evaluate(&Naturals);
        assert_eq!(r, add(Term::lit(3), Term::lit(-4)));

        let open = add(x.call(), Term::lit(1));
        assert_eq!(open.evaluate(&Naturals), open);
    }

    #[test]
    fn substitution_replaces_only_mapped_references() {
        let x = Var::fresh("x", Sort::Place);
        let y = Var::fresh("y", Sort::Place);
        let t = add(x.call(), y.call());

        let subst = Substitution::new().bind(x.clone(), Term::lit(5));
        let s = t.substitute(&subst);
        assert_eq!(s, add(Term::lit(5), y.call()));
        assert_eq!(s.free_vars().into_iter().collect::<Vec<_>>(), vec![y]);
    }

    #[test]
    fn ports_take_precedence_over_environment() {
        let x = Var::fresh("x", Sort::Place);
        let y = Var::fresh("y", Sort::Place);
        let ports: BTreeMap<String, Var> = [("x".to_string(), x.clone())].into_iter().collect();
        let env: BTreeMap<Var, T> = [(x.clone(), Term::lit(0)), (y.clone(), Term::lit(2))]
            .into_iter()
            .collect();

        let subst = Substitution::new()
            .bind_ports(&ports, |name| (name == "x").then(|| Term::lit(1)))
            .with_env(&env);
        assert_eq!(subst.len(), 2);
        assert_eq!(
            add(x.call(), y.call()).substitute(&subst).evaluate(&Naturals),
            Term::Lit(3)
        );
    }

    #[test]
    fn free_vars_of_collects_across_terms() {
        let x = Var::fresh("x", Sort::Edge);
        let y = Var::fresh("y", Sort::Edge);
        let terms = [x.call::<Arith, i64>(), add(y.call(), x.call()), Term::lit(1)];
        let fvs = free_vars_of(terms.iter());
        assert_eq!(fvs.len(), 2);
        assert!(fvs.contains(&x) && fvs.contains(&y));
    }

    #[test]
    fn lookup_resolves_references_during_evaluation() {
        struct Bound(Var);
        impl Interpretation<Arith, i64> for Bound {
            fn apply(&self, _op: &Arith, _args: &[i64]) -> Option<i64> {
                None
            }
            fn lookup(&self, var: &Var) -> Option<i64> {
                (var == &self.0).then_some(10)
            }
        }

        let x = Var::fresh("x", Sort::Place);
        let t = add(x.call(), Term::lit(1));
        let both = crate::Coproduct::new(Bound(x.clone()), Naturals);
        assert_eq!(t.evaluate(&both), Term::Lit(11));
        // Without the arithmetic table the reference is still resolved.
        assert_eq!(t.evaluate(&Bound(x)), add(Term::lit(10), Term::lit(1)));
    }

    fn natural_sums() -> impl Strategy<Value = (T, i64)> {
        (0i64..100)
            .prop_map(|n| (T::lit(n), n))
            .prop_recursive(4, 32, 2, |inner| {
                (inner.clone(), inner).prop_map(|((a, x), (b, y))| (add(a, b), x + y))
            })
    }

    proptest! {
        #[test]
        fn sums_of_naturals_always_collapse((t, sum) in natural_sums()) {
            prop_assert_eq!(t.evaluate(&Naturals), Term::Lit(sum));
        }

        #[test]
        fn empty_substitution_is_identity((t, _) in natural_sums()) {
            prop_assert_eq!(t.substitute(&Substitution::new()), t);
        }
    }
}
