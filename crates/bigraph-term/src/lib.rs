//! Symbolic terms for deferred evaluation
//!
//! This crate is the small effect/term substrate the contextual-bigraph core is
//! built on. It knows nothing about bigraphs:
//!
//! - **references** (`Var`) are typed placeholders keyed by identity, never by
//!   name; names only exist for interfaces and diagnostics,
//! - **terms** (`Term<O, V>`) are immutable trees over an operation tag `O`,
//!   references, and embedded concrete values `V`,
//! - **interpretations** (`Interpretation<O, V>`) map operations (and,
//!   optionally, references) to concrete implementations.
//!
//! Evaluating a term under an interpretation never fails: any subterm whose
//! arguments do not match an implementation stays symbolic (a *residual*), so
//! symbolic and concrete pieces can be mixed freely and resolved later.

pub mod interp;
pub mod term;
pub mod var;

pub use interp::{Coproduct, Interpretation};
pub use term::{free_vars_of, Substitution, Term};
pub use var::{Sort, Var, VarId};
