//! Type system module for frond.
//!
//! Provides the core type definitions, the substitution algebra, and
//! pretty-printing.

mod pretty;
mod subst;
mod ty;

pub use pretty::PrettyContext;
pub use subst::{Subst, Substitutable};
pub use ty::{Label, RowType, Scheme, TVar, TVarId, Type};
