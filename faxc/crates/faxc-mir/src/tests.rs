use crate::*;
use faxc_sem::hir;
use faxc_sem::Type;
use faxc_util::{DefIdGenerator, Idx, Span, Symbol};

#[test]
fn builder_allocates_args_before_locals() {
 let name = Symbol::intern("add");
 let mut builder = Builder::new(name, Type::Int64, 2);
 builder.set_arg_type(0, Symbol::intern("a"), Type::Int64);
 builder.set_arg_type(1, Symbol::intern("b"), Type::Int64);

 assert_eq!(builder.function.arg_locals.len(), 2);
 let extra = builder.add_local(Type::Int64, None, Span::DUMMY);
 assert_eq!(extra.index(), 2);
}

#[test]
fn lower_function_returns_literal() {
 let mut gen = DefIdGenerator::new();
 let func = hir::Function {
 def_id: gen.next(),
 name: Symbol::intern("answer"),
 params: vec![],
 body: hir::Block {
 stmts: vec![hir::Stmt::Ret(Some(hir::Expr {
 kind: hir::ExprKind::IntLit(42),
 ty: Type::Int64,
 span: Span::DUMMY,
 }))],
 },
 span: Span::DUMMY,
 };

 let mir_fn = lower_function(&func);
 assert_eq!(mir_fn.return_ty, Type::Int64);
 assert!(matches!(
 mir_fn.blocks[mir_fn.entry_block].terminator,
 Terminator::Return(Some(_))
 ));
}

#[test]
fn lower_if_else_inserts_phi_on_disagreement() {
 let mut gen = DefIdGenerator::new();
 let x = gen.next();
 let func = hir::Function {
 def_id: gen.next(),
 name: Symbol::intern("pick"),
 params: vec![hir::Param { def_id: x, name: Symbol::intern("x"), ty: Type::Int64 }],
 body: hir::Block {
 stmts: vec![
 hir::Stmt::If {
 cond: hir::Expr { kind: hir::ExprKind::Var(x), ty: Type::Bool, span: Span::DUMMY },
 then_block: hir::Block {
 stmts: vec![hir::Stmt::Mutate {
 def_id: x,
 value: hir::Expr { kind: hir::ExprKind::IntLit(1), ty: Type::Int64, span: Span::DUMMY },
 }],
 },
 else_block: Some(hir::Block {
 stmts: vec![hir::Stmt::Mutate {
 def_id: x,
 value: hir::Expr { kind: hir::ExprKind::IntLit(2), ty: Type::Int64, span: Span::DUMMY },
 }],
 }),
 },
 hir::Stmt::Ret(Some(hir::Expr { kind: hir::ExprKind::Var(x), ty: Type::Int64, span: Span::DUMMY })),
 ],
 },
 span: Span::DUMMY,
 };

 let mir_fn = lower_function(&func);
 let has_phi = mir_fn.blocks.as_slice().iter().any(|b| {
 b.statements
 .iter()
 .any(|s| matches!(s, Statement::Assign(_, Rvalue::Phi(incoming)) if incoming.len() == 2))
 });
 assert!(has_phi, "if/else merging differing values must introduce a phi");
}

#[test]
fn optimize_function_folds_constants() {
 let name = Symbol::intern("fold_me");
 let mut builder = Builder::new(name, Type::Int64, 0);
 let a = builder.add_local(Type::Int64, None, Span::DUMMY);
 builder.assign(
 Place::Local(a),
 Rvalue::BinaryOp(
 BinOp::Add,
 Box::new(Operand::Constant(Constant { ty: Type::Int64, kind: ConstantKind::Int(2) })),
 Box::new(Operand::Constant(Constant { ty: Type::Int64, kind: ConstantKind::Int(3) })),
 ),
 );
 builder.terminator(Terminator::Return(Some(Operand::Copy(Place::Local(a)))));

 let mut mir_fn = builder.build();
 optimize_function(&mut mir_fn);

 let entry = mir_fn.entry_block;
 let folded = mir_fn.blocks[entry].statements.iter().any(|s| {
 matches!(
 s,
 Statement::Assign(_, Rvalue::Use(Operand::Constant(Constant { kind: ConstantKind::Int(5), .. })))
 )
 });
 assert!(folded, "constant-folding pass should reduce 2 + 3 to 5");
}

#[test]
fn tail_call_pass_rewrites_self_recursive_call_to_goto() {
 let name = Symbol::intern("countdown");
 let mut builder = Builder::new(name, Type::Int64, 1);
 let arg0 = builder.function.arg_locals[0];
 let dest = builder.add_local(Type::Int64, None, Span::DUMMY);
 let next = builder.new_block();

 builder.set_current_block(next);
 builder.terminator(Terminator::Return(Some(Operand::Copy(Place::Local(dest)))));

 let entry = builder.function.entry_block;
 builder.set_current_block(entry);
 builder.terminator(Terminator::Call {
 func: Operand::Constant(Constant { ty: Type::Pointer, kind: ConstantKind::String(name) }),
 args: vec![Operand::Copy(Place::Local(arg0))],
 destination: Place::Local(dest),
 target: Some(next),
 cleanup: None,
 });

 let func = builder.build();
 let mut module = Module::default();
 module.functions.push(func);

 let stats = TailCallPass.run(&mut module);
 assert!(stats.changed);

 let rewritten = &module.functions[FunctionId(0)];
 assert_eq!(rewritten.blocks[rewritten.entry_block].terminator, Terminator::Goto { target: rewritten.entry_block });
}

#[test]
fn tail_call_pass_leaves_calls_to_other_functions_alone() {
 let callee = Symbol::intern("helper");
 let mut builder = Builder::new(Symbol::intern("caller"), Type::Int64, 0);
 let dest = builder.add_local(Type::Int64, None, Span::DUMMY);
 let next = builder.new_block();

 builder.set_current_block(next);
 builder.terminator(Terminator::Return(Some(Operand::Copy(Place::Local(dest)))));

 let entry = builder.function.entry_block;
 builder.set_current_block(entry);
 let original_call = Terminator::Call {
 func: Operand::Constant(Constant { ty: Type::Pointer, kind: ConstantKind::String(callee) }),
 args: vec![],
 destination: Place::Local(dest),
 target: Some(next),
 cleanup: None,
 };
 builder.terminator(original_call.clone());

 let func = builder.build();
 let mut module = Module::default();
 module.functions.push(func);

 let stats = TailCallPass.run(&mut module);
 assert!(!stats.changed);
 assert_eq!(module.functions[FunctionId(0)].blocks[entry].terminator, original_call);
}

#[test]
fn loop_unroll_pass_eliminates_a_small_constant_trip_count_loop() {
 let mut builder = Builder::new(Symbol::intern("sum_to_three"), Type::Int64, 0);
 let i = builder.add_local(Type::Int64, None, Span::DUMMY);
 let cond = builder.add_local(Type::Bool, None, Span::DUMMY);
 let i_next = builder.add_local(Type::Int64, None, Span::DUMMY);

 let header = builder.new_block();
 let body = builder.new_block();
 let after = builder.new_block();

 let entry = builder.function.entry_block;
 builder.set_current_block(entry);
 builder.terminator(Terminator::Goto { target: header });

 builder.set_current_block(header);
 builder.assign(
 Place::Local(i),
 Rvalue::Phi(vec![
 (entry, Operand::Constant(Constant { ty: Type::Int64, kind: ConstantKind::Int(0) })),
 (body, Operand::Copy(Place::Local(i_next))),
 ]),
 );
 builder.assign(
 Place::Local(cond),
 Rvalue::BinaryOp(
 BinOp::Lt,
 Box::new(Operand::Copy(Place::Local(i))),
 Box::new(Operand::Constant(Constant { ty: Type::Int64, kind: ConstantKind::Int(3) })),
 ),
 );
 builder.terminator(Terminator::If { cond: Operand::Copy(Place::Local(cond)), then_block: body, else_block: after });

 builder.set_current_block(body);
 builder.assign(
 Place::Local(i_next),
 Rvalue::BinaryOp(
 BinOp::Add,
 Box::new(Operand::Copy(Place::Local(i))),
 Box::new(Operand::Constant(Constant { ty: Type::Int64, kind: ConstantKind::Int(1) })),
 ),
 );
 builder.terminator(Terminator::Goto { target: header });

 builder.set_current_block(after);
 builder.terminator(Terminator::Return(Some(Operand::Copy(Place::Local(i)))));

 let func = builder.build();
 let mut module = Module::default();
 module.functions.push(func);

 let stats = LoopUnrollPass { max_trip_count: 8 }.run(&mut module);
 assert!(stats.changed, "a 3-iteration loop within max_trip_count should unroll");

 let unrolled = &module.functions[FunctionId(0)];
 assert_eq!(unrolled.blocks[header].terminator, Terminator::Goto { target: after });
 let folds_to_three = unrolled.blocks[header].statements.iter().any(|s| {
 matches!(
 s,
 Statement::Assign(Place::Local(dest), Rvalue::Use(Operand::Constant(Constant { kind: ConstantKind::Int(3), .. }))) if *dest == i
 )
 });
 assert!(folds_to_three, "the induction variable should resolve to its final value, 3");
}

#[test]
fn loop_unroll_pass_refuses_a_trip_count_past_the_limit() {
 let mut builder = Builder::new(Symbol::intern("long_loop"), Type::Int64, 0);
 let i = builder.add_local(Type::Int64, None, Span::DUMMY);
 let cond = builder.add_local(Type::Bool, None, Span::DUMMY);
 let i_next = builder.add_local(Type::Int64, None, Span::DUMMY);

 let header = builder.new_block();
 let body = builder.new_block();
 let after = builder.new_block();

 let entry = builder.function.entry_block;
 builder.set_current_block(entry);
 builder.terminator(Terminator::Goto { target: header });

 builder.set_current_block(header);
 builder.assign(
 Place::Local(i),
 Rvalue::Phi(vec![
 (entry, Operand::Constant(Constant { ty: Type::Int64, kind: ConstantKind::Int(0) })),
 (body, Operand::Copy(Place::Local(i_next))),
 ]),
 );
 builder.assign(
 Place::Local(cond),
 Rvalue::BinaryOp(
 BinOp::Lt,
 Box::new(Operand::Copy(Place::Local(i))),
 Box::new(Operand::Constant(Constant { ty: Type::Int64, kind: ConstantKind::Int(1000) })),
 ),
 );
 builder.terminator(Terminator::If { cond: Operand::Copy(Place::Local(cond)), then_block: body, else_block: after });

 builder.set_current_block(body);
 builder.assign(
 Place::Local(i_next),
 Rvalue::BinaryOp(
 BinOp::Add,
 Box::new(Operand::Copy(Place::Local(i))),
 Box::new(Operand::Constant(Constant { ty: Type::Int64, kind: ConstantKind::Int(1) })),
 ),
 );
 builder.terminator(Terminator::Goto { target: header });

 builder.set_current_block(after);
 builder.terminator(Terminator::Return(Some(Operand::Copy(Place::Local(i)))));

 let func = builder.build();
 let mut module = Module::default();
 module.functions.push(func);

 let stats = LoopUnrollPass { max_trip_count: 8 }.run(&mut module);
 assert!(!stats.changed, "a 1000-iteration loop exceeds max_trip_count and must be left alone");
}

#[test]
fn adaptive_tuning_pass_clamps_vector_lanes_to_baseline() {
 let mut builder = Builder::new(Symbol::intern("wide"), Type::Int64, 0);
 let wide_vec = builder.add_local(Type::Vector { elem: Box::new(Type::Int32), lanes: 16 }, None, Span::DUMMY);
 builder.terminator(Terminator::Return(Some(Operand::Copy(Place::Local(wide_vec)))));

 let func = builder.build();
 let mut module = Module::default();
 module.functions.push(func);

 let pass = AdaptiveTuningPass { caps: HardwareCapabilities::BASELINE };
 let stats = pass.run(&mut module);
 assert!(stats.changed);

 let clamped = &module.functions[FunctionId(0)].locals[wide_vec];
 assert_eq!(clamped.ty, Type::Vector { elem: Box::new(Type::Int32), lanes: 4 });
}

#[test]
fn tier3_passes_with_no_profile_are_genuine_no_ops() {
 let mut builder = Builder::new(Symbol::intern("f"), Type::Int64, 0);
 builder.terminator(Terminator::Return(None));
 let func = builder.build();
 let mut module = Module::default();
 module.functions.push(func);

 let stats = run_tier3(&mut module, None);
 assert_eq!(stats.transformations, 0);
}

#[test]
fn tier1_reaches_a_fixed_point_a_second_run_changes_nothing() {
 let name = Symbol::intern("fold_twice");
 let mut builder = Builder::new(name, Type::Int64, 0);
 let a = builder.add_local(Type::Int64, None, Span::DUMMY);
 builder.assign(
 Place::Local(a),
 Rvalue::BinaryOp(
 BinOp::Add,
 Box::new(Operand::Constant(Constant { ty: Type::Int64, kind: ConstantKind::Int(2) })),
 Box::new(Operand::Constant(Constant { ty: Type::Int64, kind: ConstantKind::Int(3) })),
 ),
 );
 builder.terminator(Terminator::Return(Some(Operand::Copy(Place::Local(a)))));

 let func = builder.build();
 let mut module = Module::default();
 module.functions.push(func);

 let first = run_tier1(&mut module);
 assert!(first.changed, "constant folding should fire on the first run");

 let second = run_tier1(&mut module);
 assert!(!second.changed, "running tier 1 again on an already-fixed-point module must be a no-op");
 assert_eq!(second.transformations, 0);
}
