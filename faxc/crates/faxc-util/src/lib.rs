//! faxc-util - Core Utilities and Foundation Types
//!
//! Foundation types shared by every stage of the pipeline: the token/AST/MIR
//! arenas (`IndexVec`), interned identifiers (`Symbol`), source locations
//! (`Span`, `SourceMap`), and the diagnostic reporter (`diagnostic::Handler`).
//! Nothing here depends on any other `faxc-*` crate.
//!
//! # Typed indices
//!
//! Every arena in the pipeline (the AST, a Mid-IR module's blocks and
//! instructions, a LIR function's virtual registers) is a plain `Vec<T>`
//! wrapped in [`IndexVec`] and addressed only through a newtype index that
//! implements [`Idx`]. Mixing up a `NodeId` and a `BlockId` is then a type
//! error instead of a silently-wrong array access.

pub mod def_id;
pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use def_id::{DefId, DefIdGenerator};
pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level};
pub use index_vec::{Idx, IndexVec};
pub use span::{SourceMap, Span};
pub use symbol::Symbol;

pub use rustc_hash::{FxHashMap, FxHashSet};
