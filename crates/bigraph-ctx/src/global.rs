//! Deferred composition trees.
//!
//! `compose` and `ground` act on whole fragments. `CtxTerm` records a tree of
//! compositions without performing them, so the same tree can be evaluated
//! (and grounded) later under any `Composer`.

use std::sync::Arc;

use bigraph_value::Value;

use crate::ground::{ground, Values};
use crate::{BigraphInterface, Composer, CtxBigraph, Result};

#[derive(Debug, Clone)]
pub enum CtxTerm {
    Fragment(Arc<CtxBigraph>),
    Compose {
        outer: Box<CtxTerm>,
        interface: BigraphInterface,
        inner: Box<CtxTerm>,
    },
}

impl CtxTerm {
    pub fn fragment(ctx: impl Into<Arc<CtxBigraph>>) -> Self {
        CtxTerm::Fragment(ctx.into())
    }

    /// `self ∘ inner` along `interface`, deferred.
    pub fn compose(self, interface: BigraphInterface, inner: impl Into<CtxTerm>) -> Self {
        CtxTerm::Compose {
            outer: Box::new(self),
            interface,
            inner: Box::new(inner.into()),
        }
    }

    /// Number of pending compositions.
    pub fn depth(&self) -> usize {
        match self {
            CtxTerm::Fragment(_) => 0,
            CtxTerm::Compose { outer, inner, .. } => 1 + outer.depth() + inner.depth(),
        }
    }

    /// Fold the tree bottom-up into one fragment.
    ///
    /// A bare fragment is returned as-is (shared, not copied).
    pub fn evaluate(&self, composer: &Composer) -> Result<Arc<CtxBigraph>> {
        match self {
            CtxTerm::Fragment(ctx) => Ok(Arc::clone(ctx)),
            CtxTerm::Compose {
                outer,
                interface,
                inner,
            } => {
                let outer = outer.evaluate(composer)?;
                let inner = inner.evaluate(composer)?;
                Ok(Arc::new(composer.compose(&outer, interface, &inner)?))
            }
        }
    }

    pub fn ground(&self, composer: &Composer, values: &Values) -> Result<Value> {
        ground(&*self.evaluate(composer)?, values)
    }
}

impl From<CtxBigraph> for CtxTerm {
    fn from(ctx: CtxBigraph) -> Self {
        CtxTerm::Fragment(Arc::new(ctx))
    }
}

impl From<Arc<CtxBigraph>> for CtxTerm {
    fn from(ctx: Arc<CtxBigraph>) -> Self {
        CtxTerm::Fragment(ctx)
    }
}
