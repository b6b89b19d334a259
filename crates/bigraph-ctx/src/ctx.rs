//! Contextual bigraphs: validated open fragments.
//!
//! A `CtxBigraph` is a morphism between bigraph interfaces, kept entirely
//! symbolic until it is grounded:
//!
//! - the four `{inner,outer}_{sites,links}` maps name the fragment's ports and
//!   declare one reference per port,
//! - `root` is the top-level term, over `bound_sites` and `bound_edges` keys,
//! - `bound_sites` gives the content of each outer site, over the interface,
//! - `bound_edges` ties references to concrete edges directly,
//! - `bound_terms` are binding layers accumulated by earlier compositions.
//!
//! `bound_terms` followed by `bound_sites` is the *binding chain* (`layers`).
//! Construction is checked (fail-closed): the chain must be in strict
//! forward-reference order, so it can be evaluated like straight-line code.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use bigraph_term::{free_vars_of, Substitution, Var};
use bigraph_value::{Edge, Value};

use crate::{BTerm, Binding, CtxError, EdgeBindingMap, EdgeProducer, Op, Ports, Result};

#[derive(Clone)]
pub struct CtxBigraph {
    name: String,
    inner_sites: Ports,
    inner_links: Ports,
    outer_sites: Ports,
    outer_links: Ports,
    root: BTerm,
    bound_sites: Binding,
    bound_edges: EdgeBindingMap,
    bound_terms: Vec<Binding>,
}

impl CtxBigraph {
    pub fn builder(name: impl Into<String>) -> CtxBigraphBuilder {
        CtxBigraphBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inner_sites(&self) -> &Ports {
        &self.inner_sites
    }

    pub fn inner_links(&self) -> &Ports {
        &self.inner_links
    }

    pub fn outer_sites(&self) -> &Ports {
        &self.outer_sites
    }

    pub fn outer_links(&self) -> &Ports {
        &self.outer_links
    }

    pub fn root(&self) -> &BTerm {
        &self.root
    }

    pub fn bound_sites(&self) -> &Binding {
        &self.bound_sites
    }

    pub fn bound_edges(&self) -> &EdgeBindingMap {
        &self.bound_edges
    }

    pub fn bound_terms(&self) -> &[Binding] {
        &self.bound_terms
    }

    /// The binding chain: `bound_terms`, then `bound_sites`.
    pub fn layers(&self) -> impl Iterator<Item = &Binding> + '_ {
        self.bound_terms
            .iter()
            .chain(std::iter::once(&self.bound_sites))
    }

    /// No dangling outward edges.
    pub fn closed(&self) -> bool {
        self.outer_links.is_empty()
    }

    /// Ports that still need concrete values when grounding.
    pub fn inner_ports(&self) -> impl Iterator<Item = (&String, &Var)> + '_ {
        self.inner_sites.iter().chain(self.inner_links.iter())
    }

    /// All references declared by the four interface maps.
    pub fn interface_vars(&self) -> BTreeSet<Var> {
        [
            &self.inner_sites,
            &self.inner_links,
            &self.outer_sites,
            &self.outer_links,
        ]
        .into_iter()
        .flat_map(|ports| ports.values().cloned())
        .collect()
    }

    /// Interface references plus every reference bound by a layer.
    pub fn declared_vars(&self) -> BTreeSet<Var> {
        let mut vars = self.interface_vars();
        for layer in self.layers() {
            vars.extend(layer.keys().cloned());
        }
        vars
    }

    /// A copy with every reference (including edge-bound ones) replaced by a
    /// fresh one of the same name and sort. Port names are unchanged.
    pub fn freshen(&self) -> CtxBigraph {
        let renaming: BTreeMap<Var, Var> = self
            .declared_vars()
            .into_iter()
            .chain(self.bound_edges.keys().cloned())
            .map(|v| {
                let fresh = Var::fresh(v.name(), v.sort());
                (v, fresh)
            })
            .collect();
        let subst: Substitution<Op, Value> = renaming
            .iter()
            .fold(Substitution::new(), |s, (old, new)| s.bind(old.clone(), new.call()));
        let rename = |v: &Var| renaming.get(v).cloned().unwrap_or_else(|| v.clone());
        let ports = |ports: &Ports| -> Ports {
            ports.iter().map(|(k, v)| (k.clone(), rename(v))).collect()
        };
        let layer = |layer: &Binding| -> Binding {
            layer
                .iter()
                .map(|(v, t)| (rename(v), t.substitute(&subst)))
                .collect()
        };

        CtxBigraph {
            name: self.name.clone(),
            inner_sites: ports(&self.inner_sites),
            inner_links: ports(&self.inner_links),
            outer_sites: ports(&self.outer_sites),
            outer_links: ports(&self.outer_links),
            root: self.root.substitute(&subst),
            bound_sites: layer(&self.bound_sites),
            bound_edges: self
                .bound_edges
                .iter()
                .map(|(v, produce)| (rename(v), Arc::clone(produce)))
                .collect(),
            bound_terms: self.bound_terms.iter().map(&layer).collect(),
        }
    }
}

impl fmt::Debug for CtxBigraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CtxBigraph")
            .field("name", &self.name)
            .field("inner_sites", &self.inner_sites)
            .field("inner_links", &self.inner_links)
            .field("outer_sites", &self.outer_sites)
            .field("outer_links", &self.outer_links)
            .field("root", &self.root)
            .field("bound_sites", &self.bound_sites)
            .field("bound_edges", &self.bound_edges.keys().collect::<Vec<_>>())
            .field("bound_terms", &self.bound_terms)
            .finish()
    }
}

/// Collects the parts of a `CtxBigraph`; `build` validates them.
///
/// Ports are kept as lists until `build` so that a port declared twice is
/// reported instead of silently overwritten.
#[derive(Clone)]
pub struct CtxBigraphBuilder {
    name: String,
    inner_sites: Vec<(String, Var)>,
    inner_links: Vec<(String, Var)>,
    outer_sites: Vec<(String, Var)>,
    outer_links: Vec<(String, Var)>,
    root: Option<BTerm>,
    bound_sites: Binding,
    bound_edges: EdgeBindingMap,
    bound_terms: Vec<Binding>,
}

impl CtxBigraphBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner_sites: Vec::new(),
            inner_links: Vec::new(),
            outer_sites: Vec::new(),
            outer_links: Vec::new(),
            root: None,
            bound_sites: BTreeMap::new(),
            bound_edges: BTreeMap::new(),
            bound_terms: Vec::new(),
        }
    }

    /// Declare an inner site whose port name is the reference's name.
    pub fn inner_site(self, var: &Var) -> Self {
        let port = var.name().to_string();
        self.inner_site_as(port, var.clone())
    }

    pub fn inner_site_as(mut self, port: impl Into<String>, var: Var) -> Self {
        self.inner_sites.push((port.into(), var));
        self
    }

    pub fn inner_link(self, var: &Var) -> Self {
        let port = var.name().to_string();
        self.inner_link_as(port, var.clone())
    }

    pub fn inner_link_as(mut self, port: impl Into<String>, var: Var) -> Self {
        self.inner_links.push((port.into(), var));
        self
    }

    pub fn outer_site(self, var: &Var) -> Self {
        let port = var.name().to_string();
        self.outer_site_as(port, var.clone())
    }

    pub fn outer_site_as(mut self, port: impl Into<String>, var: Var) -> Self {
        self.outer_sites.push((port.into(), var));
        self
    }

    pub fn outer_link(self, var: &Var) -> Self {
        let port = var.name().to_string();
        self.outer_link_as(port, var.clone())
    }

    pub fn outer_link_as(mut self, port: impl Into<String>, var: Var) -> Self {
        self.outer_links.push((port.into(), var));
        self
    }

    pub fn root(mut self, root: BTerm) -> Self {
        self.root = Some(root);
        self
    }

    /// Content of an outer site.
    pub fn bind_site(mut self, var: &Var, content: BTerm) -> Self {
        self.bound_sites.insert(var.clone(), content);
        self
    }

    pub fn bind_sites(mut self, bindings: Binding) -> Self {
        self.bound_sites.extend(bindings);
        self
    }

    /// Tie a reference to a concrete edge produced on demand.
    pub fn bind_edge<F>(mut self, var: &Var, produce: F) -> Self
    where
        F: Fn() -> Edge + Send + Sync + 'static,
    {
        self.bound_edges.insert(var.clone(), Arc::new(produce));
        self
    }

    /// Tie a reference to a fixed edge.
    pub fn bind_edge_value(self, var: &Var, edge: Edge) -> Self {
        self.bind_edge(var, move || edge.clone())
    }

    pub fn bind_edges(mut self, edges: EdgeBindingMap) -> Self {
        self.bound_edges.extend(edges);
        self
    }

    pub fn bind_edge_producer(mut self, var: &Var, produce: EdgeProducer) -> Self {
        self.bound_edges.insert(var.clone(), produce);
        self
    }

    /// Append one binding layer to `bound_terms`.
    pub fn layer(mut self, layer: Binding) -> Self {
        self.bound_terms.push(layer);
        self
    }

    pub fn layers(mut self, layers: impl IntoIterator<Item = Binding>) -> Self {
        self.bound_terms.extend(layers);
        self
    }

    pub fn build(self) -> Result<CtxBigraph> {
        let Self {
            name,
            inner_sites,
            inner_links,
            outer_sites,
            outer_links,
            root,
            bound_sites,
            bound_edges,
            bound_terms,
        } = self;

        let root = root.ok_or_else(|| CtxError::MissingRoot {
            fragment: name.clone(),
        })?;

        // Port names are unique across all four interface maps.
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for (port, _) in inner_sites
            .iter()
            .chain(&inner_links)
            .chain(&outer_sites)
            .chain(&outer_links)
        {
            if !seen.insert(port.as_str()) {
                return Err(CtxError::DuplicatePort {
                    fragment: name,
                    port: port.clone(),
                });
            }
        }

        let fragment = CtxBigraph {
            inner_sites: inner_sites.into_iter().collect(),
            inner_links: inner_links.into_iter().collect(),
            outer_sites: outer_sites.into_iter().collect(),
            outer_links: outer_links.into_iter().collect(),
            name,
            root,
            bound_sites,
            bound_edges,
            bound_terms,
        };
        fragment.check_scopes()?;

        tracing::debug!(
            fragment = %fragment.name,
            inner_sites = fragment.inner_sites.len(),
            inner_links = fragment.inner_links.len(),
            outer_sites = fragment.outer_sites.len(),
            outer_links = fragment.outer_links.len(),
            layers = fragment.bound_terms.len() + 1,
            "validated contextual bigraph"
        );
        Ok(fragment)
    }
}

impl CtxBigraph {
    fn check_scopes(&self) -> Result<()> {
        for (port, var) in &self.outer_sites {
            if !self.bound_sites.contains_key(var) {
                return Err(CtxError::UnboundOuterSite {
                    fragment: self.name.clone(),
                    port: port.clone(),
                });
            }
        }

        if let Some(var) = self
            .root
            .free_vars()
            .into_iter()
            .find(|v| !(self.bound_sites.contains_key(v) || self.bound_edges.contains_key(v)))
        {
            return Err(CtxError::RootOutOfScope {
                fragment: self.name.clone(),
                reference: var.name().to_string(),
            });
        }

        // Interface references and edge-bound references are available to
        // every layer; a layer's own keys only become available after it.
        let mut scope = self.interface_vars();
        scope.extend(self.bound_edges.keys().cloned());
        for (index, layer) in self.layers().enumerate() {
            if let Some(var) = free_vars_of(layer.values())
                .into_iter()
                .find(|v| !scope.contains(v))
            {
                return Err(CtxError::LayerOutOfScope {
                    fragment: self.name.clone(),
                    layer: index,
                    reference: var.name().to_string(),
                });
            }
            scope.extend(layer.keys().cloned());
        }
        Ok(())
    }
}
