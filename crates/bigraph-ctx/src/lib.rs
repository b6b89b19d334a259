//! Contextual bigraphs
//!
//! Open, composable fragments of a bigraph, represented as deferred terms over
//! a small combinator vocabulary and evaluated ("grounded") only at the end:
//!
//! ```text
//!   CtxBigraph (H) ──┐
//!                    ├── compose(H, I, F) ──► CtxBigraph (H*F) ── ground ──► Value
//!   CtxBigraph (F) ──┘        ▲
//!                             │
//!                  BigraphInterface (I): site and link name coupling
//! ```
//!
//! ## Module Organization
//!
//! - `vocabulary`: `merge`, `parallel`, `link`, `nest` as term constructors
//! - `runner`: interpretation tables against `bigraph_value`
//! - `ctx`: the validated fragment (`CtxBigraph`) and its builder
//! - `interface`: name coupling between two fragments
//! - `compose`: categorical composition along an interface
//! - `ground`: staged evaluation of a closed fragment
//! - `global`: deferred composition trees

pub mod compose;
pub mod config;
pub mod ctx;
mod error;
pub mod global;
pub mod ground;
pub mod interface;
pub mod runner;
pub mod vocabulary;

use std::collections::BTreeMap;
use std::sync::Arc;

use bigraph_term::{Term, Var};
use bigraph_value::{Edge, Value};

pub use compose::{compose, Composer};
pub use config::NamingConfig;
pub use ctx::{CtxBigraph, CtxBigraphBuilder};
pub use error::{CtxError, Result};
pub use global::CtxTerm;
pub use ground::{ground, ground_term, Values};
pub use interface::BigraphInterface;
pub use runner::{BigraphLocal, EdgeBindings, HorizontalLocal, VerticalLocal};
pub use vocabulary::{link, merge, nest, parallel, IntoTerm, Op, Signature};

/// A term over the bigraph vocabulary.
pub type BTerm = Term<Op, Value>;

/// One binding layer: reference → defining term.
pub type Binding = BTreeMap<Var, BTerm>;

/// Interface map: port name → declared reference.
pub type Ports = BTreeMap<String, Var>;

/// Zero-argument producer of a concrete edge.
pub type EdgeProducer = Arc<dyn Fn() -> Edge + Send + Sync>;

/// References tied directly to concrete edges.
pub type EdgeBindingMap = BTreeMap<Var, EdgeProducer>;
