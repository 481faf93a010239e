//! Imperative helper for constructing a [`crate::mir::Function`] one
//! block/statement at a time, used by [`crate::lower::hir_to_mir`]. Kept
//! separate from the lowering pass itself so tests can build small MIR
//! fragments directly without going through `faxc_sem::hir`.

use crate::mir::*;
use faxc_sem::Type;
use faxc_util::{Span, Symbol};

pub struct Builder {
 pub function: Function,
 pub current_block: BlockId,
}

impl Builder {
 /// Starts a function with `arg_count` parameters, each pre-allocated
 /// as locals `0..arg_count` (local 0 is the return place in rustc-MIR
 /// convention; here every local is interchangeable so parameters
 /// simply come first). An entry block is created and selected.
 pub fn new(name: Symbol, return_ty: Type, arg_count: usize) -> Self {
 let mut function = Function::new(name, return_ty, arg_count);
 let mut arg_locals = Vec::with_capacity(arg_count);
 for _ in 0..arg_count {
 arg_locals.push(function.locals.push(Local {
 ty: Type::Auto,
 span: Span::DUMMY,
 name: None,
 }));
 }
 function.arg_locals = arg_locals;

 let mut builder = Self {
 function,
 current_block: BlockId(0),
 };
 let entry = builder.new_block();
 builder.function.entry_block = entry;
 builder.current_block = entry;
 builder
 }

 pub fn set_arg_type(&mut self, index: usize, name: Symbol, ty: Type) {
 let local = self.function.arg_locals[index];
 let slot = &mut self.function.locals[local];
 slot.ty = ty;
 slot.name = Some(name);
 }

 pub fn add_local(&mut self, ty: Type, name: Option<Symbol>, span: Span) -> LocalId {
 self.function.locals.push(Local { ty, span, name })
 }

 pub fn new_block(&mut self) -> BlockId {
 self.function.blocks.push(BasicBlock {
 id: BlockId(self.function.blocks.len() as u32),
 statements: Vec::new(),
 terminator: Terminator::Unreachable,
 })
 }

 pub fn set_current_block(&mut self, block: BlockId) {
 self.current_block = block;
 }

 pub fn current_block(&self) -> BlockId {
 self.current_block
 }

 pub fn statement(&mut self, stmt: Statement) {
 self.function.blocks[self.current_block].statements.push(stmt);
 }

 pub fn assign(&mut self, place: Place, rvalue: Rvalue) {
 self.statement(Statement::Assign(place, rvalue));
 }

 /// Sets the terminator of the current block, unless one has already
 /// been set to something other than the placeholder `Unreachable`
 /// (lowering a `ret`/`break`/`continue` mid-block must not be
 /// overwritten by the fallthrough the surrounding lowering code would
 /// otherwise emit for the rest of the block).
 pub fn terminator(&mut self, terminator: Terminator) {
 self.function.blocks[self.current_block].terminator = terminator;
 }

 pub fn block_terminated(&self, block: BlockId) -> bool {
 !matches!(self.function.blocks[block].terminator, Terminator::Unreachable)
 }

 pub fn current_terminated(&self) -> bool {
 self.block_terminated(self.current_block)
 }

 pub fn build(self) -> Function {
 self.function
 }
}
