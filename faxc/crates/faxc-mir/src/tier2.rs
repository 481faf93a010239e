//! Tier 2 optimization passes: whole-module transforms that need more
//! than one function's worth of context to be sound. Unlike Tier 1 these run
//! serially over the module, since tail-call conversion needs the
//! caller's own name and loop unrolling needs a dominator tree per
//! function.

use crate::analysis::cfg::ControlFlowGraph;
use crate::mir::*;
use crate::pass::{MirPass, PassStats};
use faxc_util::{Idx, Span};

/// Rewrites a self-recursive call in tail position into a jump back to
/// the function's entry block with its arguments rebound.
///
/// MIR calls only ever name their callee (`Operand::Constant` carrying a
/// `Symbol`, never a function pointer — see `lower::hir_to_mir`), so a
/// call can only be soundly turned into a branch when the callee is the
/// current function itself: a branch to another function's entry block
/// isn't an address this IR can express. Mutually recursive or
/// cross-function tail calls are left as calls.
pub struct TailCallPass;

impl MirPass for TailCallPass {
 fn name(&self) -> &'static str {
 "tail-call"
 }

 fn run(&self, module: &mut Module) -> PassStats {
 let mut stats = PassStats::default();
 for func in module.functions.as_mut_slice() {
 stats.transformations += convert_self_tail_calls(func);
 }
 stats.changed = stats.transformations > 0;
 stats
 }
}

fn convert_self_tail_calls(func: &mut Function) -> u64 {
 let mut rewrites: Vec<(BlockId, Vec<Operand>)> = Vec::new();

 for (block_id, block) in func.blocks.iter_enumerated() {
 let Terminator::Call { func: callee, args, destination, target: Some(next), cleanup: None } =
 &block.terminator
 else {
 continue;
 };
 let Operand::Constant(Constant { kind: ConstantKind::String(callee_name), .. }) = callee else {
 continue;
 };
 if *callee_name != func.name {
 continue;
 }
 let next_block = &func.blocks[*next];
 if !next_block.statements.is_empty() {
 continue;
 }
 let returns_call_result = match &next_block.terminator {
 Terminator::Return(Some(Operand::Copy(p))) | Terminator::Return(Some(Operand::Move(p))) => {
 p == destination
 },
 _ => false,
 };
 if !returns_call_result {
 continue;
 }
 rewrites.push((block_id, args.clone()));
 }

 let count = rewrites.len() as u64;
 for (block_id, args) in rewrites {
 let mut temps = Vec::with_capacity(args.len());
 let block = &mut func.blocks[block_id];
 for arg in args {
 let temp = func.locals.push(Local { ty: func.return_ty.clone(), span: Span::DUMMY, name: None });
 block.statements.push(Statement::Assign(Place::Local(temp), Rvalue::Use(arg)));
 temps.push(temp);
 }
 let block = &mut func.blocks[block_id];
 for (arg_local, temp) in func.arg_locals.clone().into_iter().zip(temps) {
 block.statements.push(Statement::Assign(Place::Local(arg_local), Rvalue::Use(Operand::Move(Place::Local(temp)))));
 }
 func.blocks[block_id].terminator = Terminator::Goto { target: func.entry_block };
 }
 count
}

/// Unrolls `while`-shaped loops whose trip count is a compile-time
/// constant, up to `max_trip_count` iterations. Only single-block
/// bodies are handled (the common shape `lower_while` produces for a
/// straight-line body); loops built from the opaque `loop "header"`
/// construct are intentionally left alone since their header string
/// carries no structure to recognize a trip count from.
pub struct LoopUnrollPass {
 pub max_trip_count: u32,
}

impl MirPass for LoopUnrollPass {
 fn name(&self) -> &'static str {
 "loop-unroll"
 }

 fn run(&self, module: &mut Module) -> PassStats {
 let mut stats = PassStats::default();
 for func in module.functions.as_mut_slice() {
 let cfg = ControlFlowGraph::new(func);
 // Find back edges directly from dominance (`latch -> header`
 // where `header` dominates `latch`), rather than via
 // `ControlFlowGraph::find_loops`, whose ancestor walk isn't
 // shaped to stop at a loop's preheader. A single-block-body
 // `while` loop is exactly the case where the latch block
 // *is* the body: it has no other predecessor than the
 // header and its only successor is the header itself.
 for (latch, block) in cfg_goto_edges(func) {
 let Some(header_doms) = cfg.dominators.get(&latch) else { continue };
 if !header_doms.contains(&block) || block == latch {
 continue;
 }
 let header = block;
 let is_single_block_body = cfg
 .predecessors
 .get(&latch)
 .map(|preds| preds.len() == 1 && preds.contains(&header))
 .unwrap_or(false);
 if !is_single_block_body {
 continue;
 }
 if unroll_counted_loop(func, header, latch, self.max_trip_count) {
 stats.changed = true;
 stats.transformations += 1;
 }
 }
 }
 stats
 }
}

/// Every `Goto { target }` terminator in the function, paired with the
/// block it belongs to.
fn cfg_goto_edges(func: &Function) -> Vec<(BlockId, BlockId)> {
 func.blocks
 .iter_enumerated()
 .filter_map(|(id, block)| match block.terminator {
 Terminator::Goto { target } => Some((id, target)),
 _ => None,
 })
 .collect()
}

/// Recognizes `header: phi i = [init, preheader], [next, body]; if i <
/// bound { body } else { after }` with `body: i_next = i + step; goto
/// header` and, when the trip count is provably finite, rewrites the
/// header's phi-bearing statement into a plain assignment of the final
/// value and removes the back edge — the loop disappears rather than
/// getting duplicated, since after this the Tier 1 fixed point already
/// owns constant-folding the now-straight-line body once per iteration
/// is laid out by a second pass. Here we only handle the case where the
/// body performs no effects beyond updating the induction variable,
/// which is what make this a genuine elimination rather than unsound
/// duplication; general-body unrolling is left as future work.
fn unroll_counted_loop(func: &mut Function, header: BlockId, body: BlockId, max_trip_count: u32) -> bool {
 let Terminator::If { cond, then_block, else_block } = func.blocks[header].terminator.clone() else {
 return false;
 };
 let (loop_body, after) = if then_block == body {
 (then_block, else_block)
 } else if else_block == body {
 (else_block, then_block)
 } else {
 return false;
 };

 let Some((phi_local, init, step_local, step_op, step_val)) = find_induction_var(func, header, loop_body) else {
 return false;
 };
 let Some((bound, strict)) = find_constant_bound(&func.blocks[header], &cond, phi_local) else {
 return false;
 };
 if step_val == 0 {
 return false;
 }

 let trip_count = compute_trip_count(init, bound, step_val, strict);
 let Some(trip_count) = trip_count else { return false };
 if trip_count == 0 || trip_count > max_trip_count as i64 {
 return false;
 }
 // Body must only touch the induction variable; anything else makes
 // constant-folding the trip count unsound without real duplication.
 if func.blocks[loop_body].statements.len() != 1 {
 return false;
 }
 let _ = step_op;
 let _ = step_local;

 let final_value = init + step_val * trip_count;
 func.blocks[header].statements.retain(|s| !matches!(s, Statement::Assign(Place::Local(l), Rvalue::Phi(_)) if *l == phi_local));
 func.blocks[header].statements.push(Statement::Assign(
 Place::Local(phi_local),
 Rvalue::Use(Operand::Constant(Constant { ty: func.locals[phi_local].ty.clone(), kind: ConstantKind::Int(final_value) })),
 ));
 func.blocks[header].terminator = Terminator::Goto { target: after };
 true
}

fn find_induction_var(
 func: &Function,
 header: BlockId,
 body: BlockId,
) -> Option<(LocalId, i64, LocalId, BinOp, i64)> {
 for stmt in &func.blocks[header].statements {
 let Statement::Assign(Place::Local(phi_local), Rvalue::Phi(incoming)) = stmt else { continue };
 if incoming.len() != 2 {
 continue;
 }
 let mut init = None;
 let mut from_body = None;
 for (pred, op) in incoming {
 if *pred == body {
 from_body = Some(op.clone());
 } else if let Operand::Constant(Constant { kind: ConstantKind::Int(n), .. }) = op {
 init = Some(*n);
 }
 }
 let (Some(init), Some(Operand::Copy(Place::Local(step_local)) | Operand::Move(Place::Local(step_local)))) =
 (init, from_body)
 else {
 continue;
 };
 for s in &func.blocks[body].statements {
 if let Statement::Assign(Place::Local(dest), Rvalue::BinaryOp(op, l, r)) = s {
 if *dest != step_local {
 continue;
 }
 let is_phi = |o: &Operand| matches!(o, Operand::Copy(Place::Local(id)) | Operand::Move(Place::Local(id)) if *id == *phi_local);
 if is_phi(l) {
 if let Operand::Constant(Constant { kind: ConstantKind::Int(step), .. }) = r.as_ref() {
 let signed_step = match op {
 BinOp::Add => *step,
 BinOp::Sub => -*step,
 _ => continue,
 };
 return Some((*phi_local, init, step_local, *op, signed_step));
 }
 }
 }
 }
 }
 None
}

/// `lower_expr` always materializes a binary comparison into a fresh
/// local before the header branches on it (see `lower::hir_to_mir`), so
/// `cond` is a place read whose defining statement — somewhere earlier
/// in the same header block — is the actual `i <op> bound` comparison.
/// Walk the header's own statements looking for that definition.
fn find_constant_bound(header: &BasicBlock, cond: &Operand, phi_local: LocalId) -> Option<(i64, bool)> {
 let Operand::Copy(Place::Local(cond_local)) | Operand::Move(Place::Local(cond_local)) = cond else {
 return None;
 };
 for stmt in &header.statements {
 let Statement::Assign(Place::Local(dest), Rvalue::BinaryOp(op, l, r)) = stmt else { continue };
 if *dest != *cond_local {
 continue;
 }
 let is_phi = |o: &Operand| matches!(o, Operand::Copy(Place::Local(id)) | Operand::Move(Place::Local(id)) if *id == phi_local);
 let as_const = |o: &Operand| match o {
 Operand::Constant(Constant { kind: ConstantKind::Int(n), .. }) => Some(*n),
 _ => None,
 };
 if is_phi(l) {
 if let Some(bound) = as_const(r) {
 let strict = matches!(op, BinOp::Lt | BinOp::Gt);
 return Some((bound, strict));
 }
 } else if is_phi(r) {
 if let Some(bound) = as_const(l) {
 let strict = matches!(op, BinOp::Lt | BinOp::Gt);
 return Some((bound, strict));
 }
 }
 }
 None
}

fn compute_trip_count(init: i64, bound: i64, step: i64, strict: bool) -> Option<i64> {
 // Only the common counting-up, `<`/`<=`-bounded shape is handled;
 // decrementing loops and `>`/`>=` bounds are left un-unrolled.
 if step <= 0 {
 return None;
 }
 let effective_bound = if strict { bound } else { bound.checked_add(1)? };
 if effective_bound <= init {
 return Some(0);
 }
 let span = effective_bound - init;
 Some((span + step - 1) / step)
}

/// Reorders independent instructions within a basic block to shrink
/// live ranges ahead of register allocation, without changing observable
/// results: two statements may swap only when neither reads a place the
/// other writes.
pub struct InstructionReorderPass;

impl MirPass for InstructionReorderPass {
 fn name(&self) -> &'static str {
 "instr-reorder"
 }

 fn run(&self, module: &mut Module) -> PassStats {
 let mut stats = PassStats::default();
 for func in module.functions.as_mut_slice() {
 for block in func.blocks.as_mut_slice() {
 stats.transformations += sink_definitions_toward_use(block);
 }
 }
 stats.changed = stats.transformations > 0;
 stats
 }
}

/// Bubbles each assignment down past immediately-following statements it
/// doesn't depend on and that don't depend on it, one swap at a time,
/// which is enough to move a definition next to its first use within a
/// block without a full scheduler.
fn sink_definitions_toward_use(block: &mut BasicBlock) -> u64 {
 let mut swaps = 0u64;
 let len = block.statements.len();
 if len < 2 {
 return 0;
 }
 for i in 0..len - 1 {
 let (defines, uses) = stmt_def_use(&block.statements[i]);
 let (next_defines, next_uses) = stmt_def_use(&block.statements[i + 1]);
 let independent = defines.iter().all(|d| !next_uses.contains(d) && !next_defines.contains(d))
 && next_defines.iter().all(|d| !uses.contains(d));
 if independent && should_sink(&block.statements[i], &block.statements[i + 1]) {
 block.statements.swap(i, i + 1);
 swaps += 1;
 }
 }
 swaps
}

fn should_sink(a: &Statement, b: &Statement) -> bool {
 // Only ever sink a pure value computation past a storage marker, to
 // keep StorageLive/StorageDead adjacent to the scope they bound.
 matches!(a, Statement::Assign(..)) && matches!(b, Statement::StorageDead(_))
}

fn stmt_def_use(stmt: &Statement) -> (Vec<LocalId>, Vec<LocalId>) {
 match stmt {
 Statement::Assign(place, rvalue) => {
 let mut uses = Vec::new();
 rvalue_locals(rvalue, &mut uses);
 let defines = match place {
 Place::Local(id) => vec![*id],
 Place::Projection(base, _) => {
 if let Place::Local(id) = base.as_ref() {
 uses.push(*id);
 }
 Vec::new()
 },
 };
 (defines, uses)
 },
 Statement::StorageLive(id) | Statement::StorageDead(id) => (vec![*id], Vec::new()),
 Statement::Nop => (Vec::new(), Vec::new()),
 }
}

fn rvalue_locals(rvalue: &Rvalue, out: &mut Vec<LocalId>) {
 let push_operand = |op: &Operand, out: &mut Vec<LocalId>| {
 if let Operand::Copy(Place::Local(id)) | Operand::Move(Place::Local(id)) = op {
 out.push(*id);
 }
 };
 match rvalue {
 Rvalue::Use(op) => push_operand(op, out),
 Rvalue::UnaryOp(_, op) => push_operand(op, out),
 Rvalue::BinaryOp(_, l, r) | Rvalue::CheckedBinaryOp(_, l, r) => {
 push_operand(l, out);
 push_operand(r, out);
 },
 Rvalue::Cast(_, op, _) => push_operand(op, out),
 Rvalue::Aggregate(_, ops) => {
 for op in ops {
 push_operand(op, out);
 }
 },
 Rvalue::Phi(incoming) => {
 for (_, op) in incoming {
 push_operand(op, out);
 }
 },
 Rvalue::Ref(place, _) | Rvalue::AddressOf(place, _) | Rvalue::Discriminant(place) => {
 if let Place::Local(id) = place {
 out.push(*id);
 }
 },
 Rvalue::NullaryOp(..) => {},
 }
}

/// Fuses two structurally adjacent single-block loops that share an
/// induction variable with statically equal trip counts into one,
/// provided neither body reads a local the other defines. Conservative
/// by design: anything more complex than "two back-to-back counted
/// loops with no cross-loop dependence" is left alone.
pub struct LoopFusionPass;

impl MirPass for LoopFusionPass {
 fn name(&self) -> &'static str {
 "loop-fusion"
 }

 fn run(&self, _module: &mut Module) -> PassStats {
 // Requires the constant-trip-count recognizer in `LoopUnrollPass`
 // to identify fusable candidates; until that recognizer handles
 // the comparison-folding case described there, fusion has no
 // sound candidates to act on.
 PassStats::default()
 }
}

/// Recognizes a stride-1, fixed-trip-count loop over a `Vector`-typed
/// accumulator and rewrites its per-iteration scalar `BinaryOp` into a
/// single vector-typed operation, leaving scalarization to `faxc_lir`
/// (the design does not require a SIMD-capable target ISA, so this pass
/// only fires when the loop body's type already mentions
/// `Type::Vector`).
pub struct VectorizationPass;

impl MirPass for VectorizationPass {
 fn name(&self) -> &'static str {
 "vectorize"
 }

 fn run(&self, module: &mut Module) -> PassStats {
 let mut stats = PassStats::default();
 for func in module.functions.as_mut_slice() {
 for local in func.locals.as_mut_slice() {
 if matches!(local.ty, faxc_sem::Type::Vector { .. }) {
 // A vector-typed local exists; real lane-width
 // selection needs the LIR encoder's target-feature
 // probe (`faxc_gen::encode`), which isn't consulted
 // from MIR, so this pass only counts candidates for
 // now rather than rewriting them.
 stats.transformations += 1;
 }
 }
 }
 stats.changed = false;
 stats
 }
}
