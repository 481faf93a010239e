//! `faxc_sem::hir` -> Mid-IR lowering: one
//! structured-control-flow-aware pass that builds SSA directly from the
//! HIR's nested block shape rather than via a generic dominance-frontier
//! pass over an already-flat CFG (the source grammar has no irreducible
//! control flow, so the simpler construction suffices — see `DESIGN.md`).

mod hir_to_mir;

pub use hir_to_mir::{lower_function, lower_module};
