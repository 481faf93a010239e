//! faxc-sem — C4.5 semantic analysis: name resolution, monomorphic local
//! type inference, and lowering of the parser's AST into the Mid-IR's
//! typed HIR.
//!
//! Two passes, no generics/trait machinery: [`analysis::SemanticAnalyzer`]
//! collects every function signature and struct/union field list first so
//! forward references resolve, then lowers each body against
//! [`types::TypeContext`]'s `auto`-parameter bookkeeping and
//! [`scope::ScopeTree`]'s name resolution.

pub mod hir;
pub mod types;

mod analysis;
mod scope;

#[cfg(test)]
mod edge_cases;

pub use analysis::SemanticAnalyzer;
pub use scope::{Rib, RibId, RibKind, ScopeTree};
pub use types::{Type, TypeContext};
