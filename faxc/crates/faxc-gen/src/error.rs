//! Error types for native code generation and binary emission
//!.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeGenError {
 #[error("target block '{0}' not found")]
 BlockNotFound(String),

 #[error("no comparison before conditional jump")]
 MissingComparison,

 #[error("function '{0}' not found")]
 FunctionNotFound(String),

 #[error("invalid operand type: {0}")]
 InvalidOperandType(String),

 /// Raised by the instruction selector for any LIR instruction or
 /// operand kind its table has no encoding rule for.
 #[error("unsupported construct: {0}")]
 UnsupportedConstruct(String),

 #[error("register allocation failed: {0}")]
 RegisterAllocationFailed(String),

 #[error("stack frame error: {0}")]
 StackFrameError(String),

 #[error("ABI error: {0}")]
 AbiError(String),

 #[error("internal error: {0}")]
 Internal(String),
}

#[derive(Debug, Error)]
pub enum EmitError {
 #[error(transparent)]
 Io(#[from] std::io::Error),

 #[error("codegen error: {0}")]
 CodeGen(#[from] CodeGenError),

 #[error("unsupported target format: {0}")]
 UnsupportedTarget(String),
}

pub type Result<T> = std::result::Result<T, CodeGenError>;
