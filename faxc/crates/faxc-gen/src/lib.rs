//! Code generator: register allocation, x86-64 instruction encoding, and
//! executable container emission for the typed mid-IR.

pub mod emit;
pub mod encode;
pub mod error;
pub mod linker;
pub mod regalloc;
pub mod strtab;

pub use error::{CodeGenError, EmitError, Result};
