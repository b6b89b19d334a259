//! Categorical composition of contextual bigraphs along an interface.
//!
//! `compose(outer, interface, inner)` fills the inner sites of `outer` with
//! the outer sites of `inner`:
//!
//! 1. *link coupling* (outside-in): every outer link of `inner` is renamed to
//!    the inner link of `outer` the interface assigns to it,
//! 2. *site coupling* (inside-out): every inner site of `outer` is bound to the
//!    content `inner` gives the outer site the interface assigns to it,
//! 3. *edge merge*: both `bound_edges` maps are unioned and edge references in
//!    `inner`'s layers and the new coupling layer are resolved against them;
//!    the combinators themselves stay deferred until grounding,
//! 4. the composite keeps `outer`'s root and bound sites and chains the layers
//!    as `inner`'s, coupling, `outer`'s.
//!
//! The layer order keeps the forward-reference invariant: `inner`'s layers
//! only see `inner`'s names, the coupling layer sees `inner`'s names and
//! `outer`'s declared links, and `outer`'s layers only see `outer`'s names.
//!
//! Operands that share references (a fragment composed with itself, say) are
//! kept apart by composing against a freshened copy of `inner`.

use std::sync::Arc;

use bigraph_term::{Substitution, Var};
use bigraph_value::{Edge, Value};

use crate::runner::EdgeBindings;
use crate::{
    BTerm, BigraphInterface, Binding, CtxBigraph, CtxError, EdgeBindingMap, NamingConfig, Op,
    Result,
};

/// Composes fragments using a fixed naming configuration.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    config: NamingConfig,
}

impl Composer {
    pub fn new(config: NamingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    pub fn compose(
        &self,
        outer: &CtxBigraph,
        interface: &BigraphInterface,
        inner: &CtxBigraph,
    ) -> Result<CtxBigraph> {
        let freshened;
        let outer_refs = outer.declared_vars();
        let inner = if inner.declared_vars().iter().any(|v| outer_refs.contains(v)) {
            tracing::debug!(
                outer = %outer.name(),
                inner = %inner.name(),
                "operands share references; composing against a fresh copy"
            );
            freshened = inner.freshen();
            &freshened
        } else {
            inner
        };

        // Couple names of interfacing links (outside-in).
        let mut link_coupling: Substitution<Op, Value> = Substitution::new();
        let mut coupled_links: Vec<(&str, &Var)> = Vec::new();
        for (port, y) in inner.outer_links() {
            let target = interface
                .links()
                .get(port)
                .ok_or_else(|| CtxError::UncoupledPort {
                    mapping: "links",
                    fragment: inner.name().to_string(),
                    port: port.clone(),
                })?;
            let (outer_port, x) = outer.inner_links().get_key_value(target).ok_or_else(|| {
                CtxError::UnresolvedPort {
                    fragment: outer.name().to_string(),
                    role: "inner link",
                    port: target.clone(),
                }
            })?;
            link_coupling.insert(y.clone(), x.call());
            coupled_links.push((outer_port.as_str(), x));
        }

        // Couple names of interfacing sites (inside-out).
        let mut coupling_layer = Binding::new();
        for (port, p) in outer.inner_sites() {
            let target = interface
                .sites()
                .get(port)
                .ok_or_else(|| CtxError::UncoupledPort {
                    mapping: "sites",
                    fragment: outer.name().to_string(),
                    port: port.clone(),
                })?;
            let q = inner
                .outer_sites()
                .get(target)
                .ok_or_else(|| CtxError::UnresolvedPort {
                    fragment: inner.name().to_string(),
                    role: "outer site",
                    port: target.clone(),
                })?;
            let content = inner
                .bound_sites()
                .get(q)
                .ok_or_else(|| CtxError::UnboundOuterSite {
                    fragment: inner.name().to_string(),
                    port: target.clone(),
                })?;
            coupling_layer.insert(p.clone(), content.substitute(&link_coupling));
        }

        // Union edge bindings; on a shared key `outer` wins.
        let mut bound_edges: EdgeBindingMap = inner.bound_edges().clone();
        bound_edges.extend(
            outer
                .bound_edges()
                .iter()
                .map(|(v, produce)| (v.clone(), Arc::clone(produce))),
        );

        // Coupled links nobody ties to an edge become internal edges.
        for (port, x) in coupled_links {
            if !bound_edges.contains_key(x) {
                let name = self.config.qualify(outer.name(), port);
                tracing::warn!(
                    outer = %outer.name(),
                    inner = %inner.name(),
                    link = %port,
                    edge = %name,
                    "closing coupled link with a fresh internal edge"
                );
                let edge = Edge::new(name);
                bound_edges.insert(x.clone(), Arc::new(move || edge.clone()));
            }
        }

        // Freeze edge identity in `inner`'s layers and the coupling layer.
        let intp = EdgeBindings::new(&bound_edges);
        let freeze = |layer: &Binding| -> Binding {
            layer
                .iter()
                .map(|(v, t)| (v.clone(), t.substitute(&link_coupling).evaluate(&intp)))
                .collect()
        };
        let mut layers: Vec<Binding> = inner.bound_terms().iter().map(&freeze).collect();
        layers.push(freeze(&coupling_layer));
        layers.extend(outer.bound_terms().iter().cloned());

        let name = self.config.composite_name(outer.name(), inner.name());
        tracing::debug!(
            composite = %name,
            coupled_sites = coupling_layer.len(),
            coupled_links = link_coupling.len(),
            layers = layers.len() + 1,
            residual_ops = layers.iter().flat_map(|l| l.values()).map(BTerm::pending_ops).sum::<usize>(),
            "composed contextual bigraphs"
        );

        let mut builder = CtxBigraph::builder(name);
        for (port, v) in inner.inner_sites() {
            builder = builder.inner_site_as(self.config.qualify(inner.name(), port), v.clone());
        }
        for (port, v) in inner.inner_links() {
            builder = builder.inner_link_as(self.config.qualify(inner.name(), port), v.clone());
        }
        for (port, v) in outer.outer_sites() {
            builder = builder.outer_site_as(self.config.qualify(outer.name(), port), v.clone());
        }
        for (port, v) in outer.outer_links() {
            builder = builder.outer_link_as(self.config.qualify(outer.name(), port), v.clone());
        }
        builder
            .root(outer.root().clone())
            .bind_sites(outer.bound_sites().clone())
            .bind_edges(bound_edges)
            .layers(layers)
            .build()
    }
}

/// Compose with the default naming configuration.
pub fn compose(
    outer: &CtxBigraph,
    interface: &BigraphInterface,
    inner: &CtxBigraph,
) -> Result<CtxBigraph> {
    Composer::default().compose(outer, interface, inner)
}
