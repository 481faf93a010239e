//! Tier 1 optimization passes: a fixed-point local/peephole suite that
//! runs per-function.

mod optimize;

pub use optimize::optimize_function;
