//! Grounding: staged evaluation of a closed fragment.
//!
//! The binding chain is evaluated like single-assignment code. Each layer is
//! substituted with the caller's port values and everything bound so far,
//! evaluated under `BigraphLocal`, and added to the environment; the root is
//! evaluated last against the complete environment.

use std::collections::BTreeMap;

use ahash::AHashMap;
use bigraph_term::{Substitution, Term, Var};
use bigraph_value::Value;

use crate::runner::BigraphLocal;
use crate::{BTerm, CtxBigraph, CtxError, Result};

/// Concrete values for a fragment's remaining inner ports, by port name.
pub type Values = BTreeMap<String, Value>;

/// Ground `ctx`, returning whatever is left after evaluation.
///
/// Shape mismatches are not errors: the result is a residual term in that
/// case. Extra entries in `values` are ignored.
pub fn ground_term(ctx: &CtxBigraph, values: &Values) -> Result<BTerm> {
    if !ctx.closed() {
        return Err(CtxError::NotClosed {
            fragment: ctx.name().to_string(),
            links: ctx.outer_links().keys().cloned().collect(),
        });
    }

    for (port, var) in ctx.inner_ports() {
        let value = values.get(port).ok_or_else(|| CtxError::MissingArgument {
            fragment: ctx.name().to_string(),
            port: port.clone(),
        })?;
        if value.sort() != var.sort() {
            return Err(CtxError::SortMismatch {
                fragment: ctx.name().to_string(),
                port: port.clone(),
                expected: var.sort(),
                found: value.sort(),
            });
        }
    }

    let mut env: AHashMap<Var, BTerm> = ctx
        .bound_edges()
        .iter()
        .map(|(var, produce)| (var.clone(), Term::Lit(Value::Edge(produce()))))
        .collect();

    let args = |port: &str| -> Option<BTerm> { values.get(port).cloned().map(Term::Lit) };
    for (index, layer) in ctx.layers().enumerate() {
        let subst = Substitution::new()
            .bind_ports(ctx.inner_ports(), args)
            .with_env(env.iter());
        let evaluated: Vec<(Var, BTerm)> = layer
            .iter()
            .map(|(var, term)| (var.clone(), term.substitute(&subst).evaluate(&BigraphLocal)))
            .collect();
        tracing::trace!(
            fragment = %ctx.name(),
            layer = index,
            bindings = evaluated.len(),
            residual = evaluated.iter().filter(|(_, t)| !t.is_value()).count(),
            "evaluated binding layer"
        );
        for (var, term) in evaluated {
            env.insert(var, term);
        }
    }

    let subst = Substitution::new()
        .bind_ports(ctx.inner_ports(), args)
        .with_env(env.iter());
    let result = ctx.root().substitute(&subst).evaluate(&BigraphLocal);
    tracing::debug!(
        fragment = %ctx.name(),
        arguments = ctx.inner_ports().count(),
        layers = ctx.layers().count(),
        concrete = result.is_value(),
        "grounded contextual bigraph"
    );
    Ok(result)
}

/// Ground `ctx` to a concrete value.
pub fn ground(ctx: &CtxBigraph, values: &Values) -> Result<Value> {
    ground_term(ctx, values)?
        .into_value()
        .map_err(|residual| CtxError::Unresolved {
            fragment: ctx.name().to_string(),
            residual: residual.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::{link, merge, nest, parallel};
    use bigraph_value::{bare_equal, Edge, Node, Place};

    fn values(entries: impl IntoIterator<Item = (&'static str, Value)>) -> Values {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    /// `K`: inner site `p`, inner link `x`; root `q` holding `v{x}.p`.
    fn open_fragment() -> CtxBigraph {
        let (p, x, q) = (Var::place("p"), Var::edge("x"), Var::place("q"));
        CtxBigraph::builder("K")
            .inner_site(&p)
            .inner_link(&x)
            .outer_site(&q)
            .bind_site(&q, nest(link(Node::new("v"), &x), &p))
            .root(q.call())
            .build()
            .unwrap()
    }

    #[test]
    fn grounds_against_supplied_values() {
        let k = open_fragment();
        let g = ground(
            &k,
            &values([
                ("p", Node::new("w").into()),
                ("x", Edge::new("e").into()),
                ("unused", Node::new("z").into()),
            ]),
        )
        .unwrap();
        let expected: Value = Node::new("v")
            .link(&Edge::new("e"))
            .nest(Node::new("w").into())
            .into();
        assert!(bare_equal(&g, &expected), "got {g}");
    }

    #[test]
    fn missing_arguments_are_reported_by_port() {
        let k = open_fragment();
        let err = ground(&k, &values([("p", Node::new("w").into())])).unwrap_err();
        assert!(matches!(err, CtxError::MissingArgument { ref port, .. } if port == "x"));
    }

    #[test]
    fn values_must_match_the_declared_sort() {
        let k = open_fragment();
        let err = ground(
            &k,
            &values([("p", Edge::new("e").into()), ("x", Edge::new("e").into())]),
        )
        .unwrap_err();
        assert!(err
            .to_string()
            .contains("`p` expects a place value, got edge"));
    }

    #[test]
    fn open_fragments_cannot_be_grounded() {
        let (q, y) = (Var::place("q"), Var::edge("y"));
        let f = CtxBigraph::builder("F")
            .outer_site(&q)
            .outer_link(&y)
            .bind_site(&q, link(Node::new("v"), &y))
            .root(q.call())
            .build()
            .unwrap();
        let err = ground(&f, &values([("y", Edge::new("e").into())])).unwrap_err();
        assert!(matches!(err, CtxError::NotClosed { ref links, .. } if links == &["y"]));
    }

    #[test]
    fn later_layers_see_earlier_bindings() {
        let (p, q) = (Var::place("p"), Var::place("q"));
        let (t0, t1) = (Var::place("t0"), Var::place("t1"));
        let k = CtxBigraph::builder("K")
            .inner_site(&p)
            .outer_site(&q)
            .layer([(t0.clone(), merge(&p, Node::new("a")))].into_iter().collect())
            .layer([(t1.clone(), nest(Node::new("b"), &t0))].into_iter().collect())
            .bind_site(&q, parallel(&t1, &t0))
            .root(q.call())
            .build()
            .unwrap();
        let g = ground(&k, &values([("p", Node::new("c").into())])).unwrap();

        let t0v = Place::merge(vec![Node::new("c").into(), Node::new("a").into()]).unwrap();
        let expected = Place::parallel(vec![Node::new("b").nest(t0v.clone()).into(), t0v]).unwrap();
        assert!(bare_equal(&g, &expected.into()), "got {g}");
    }

    #[test]
    fn edge_bound_references_resolve_without_arguments() {
        let (q, x) = (Var::place("q"), Var::edge("x"));
        let k = CtxBigraph::builder("K")
            .outer_site(&q)
            .bind_site(&q, link(Node::new("v"), &x))
            .bind_edge_value(&x, Edge::new("e"))
            .root(q.call())
            .build()
            .unwrap();
        let g = ground(&k, &Values::new()).unwrap();
        assert_eq!(g.as_node().unwrap().links().collect::<Vec<_>>(), vec!["e"]);
    }

    #[test]
    fn residuals_are_kept_by_ground_term_and_rejected_by_ground() {
        let q = Var::place("q");
        // nest needs a single node on the outside
        let bad = Place::merge(vec![Node::new("a").into(), Node::new("b").into()]).unwrap();
        let k = CtxBigraph::builder("K")
            .outer_site(&q)
            .bind_site(&q, nest(bad, Node::new("c")))
            .root(q.call())
            .build()
            .unwrap();

        let residual = ground_term(&k, &Values::new()).unwrap();
        assert!(!residual.is_value());
        assert_eq!(residual.pending_ops(), 1);

        let err = ground(&k, &Values::new()).unwrap_err();
        assert!(err.to_string().contains("left a symbolic residual: nest("));
    }

    #[test]
    fn grounding_is_deterministic_and_leaves_the_fragment_untouched() {
        let k = open_fragment();
        let vals = values([("p", Node::new("w").into()), ("x", Edge::new("e").into())]);
        let a = ground(&k, &vals).unwrap();
        let b = ground(&k, &vals).unwrap();
        assert!(bare_equal(&a, &b));
        assert!(!k.bound_sites().values().any(|t| t.is_value()));
    }
}
