//! Name resolution and type inference: lowers a [`faxc_par::ast::Ast`]
//! into a [`crate::hir::Module`].
//!
//! Two passes over the top level: the first records every function's
//! signature and every struct/union's field list so that forward calls
//! and forward type references resolve; the second lowers each function
//! body (and a synthetic `__entry` gathering top-level statements)
//! against those signatures.

use crate::hir;
use crate::scope::{RibKind, ScopeTree};
use crate::types::{Type, TypeContext};
use faxc_par::ast::{Ast, BinOp, Node, NodeId, NodeKind, UnOp, Value};
use faxc_util::diagnostic::DiagnosticCode;
use faxc_util::{DefId, DefIdGenerator, FxHashMap, Handler, Span, Symbol};

/// A function's signature as recorded from its declaration, before any
/// `auto` parameter has been resolved by a call site.
#[derive(Clone)]
struct FnSig {
 param_types: Vec<Type>,
 param_names: Vec<Symbol>,
}

pub struct SemanticAnalyzer<'a> {
 handler: &'a Handler,
 scope: ScopeTree,
 def_gen: DefIdGenerator,
 type_ctx: TypeContext,
 fn_sigs: FxHashMap<Symbol, FnSig>,
 struct_fields: FxHashMap<Symbol, Vec<(Symbol, Type)>>,
}

impl<'a> SemanticAnalyzer<'a> {
 pub fn new(handler: &'a Handler) -> Self {
 Self {
 handler,
 scope: ScopeTree::new(),
 def_gen: DefIdGenerator::new(),
 type_ctx: TypeContext::new(),
 fn_sigs: FxHashMap::default(),
 struct_fields: FxHashMap::default(),
 }
 }

 pub fn analyze(&mut self, ast: &Ast) -> hir::Module {
 let program = ast.get(ast.root);
 debug_assert_eq!(program.kind, NodeKind::Program);

 // Pass 1: collect signatures so forward references resolve.
 for &item in &program.children {
 let node = ast.get(item);
 match node.kind {
 NodeKind::FnDecl => self.collect_fn_sig(ast, item),
 NodeKind::StructDecl | NodeKind::UnionDecl => self.collect_fields(ast, item),
 _ => {}
 }
 }

 // Pass 2: lower every declaration; gather top-level statements.
 let mut functions = Vec::new();
 let mut entry_stmts = Vec::new();
 self.scope.enter_scope(RibKind::Function);
 for &item in &program.children {
 let node = ast.get(item);
 match node.kind {
 NodeKind::FnDecl => functions.push(self.lower_fn_decl(ast, item)),
 NodeKind::StructDecl | NodeKind::UnionDecl | NodeKind::EnumDecl | NodeKind::Typedef => {
 // recorded in pass 1 / a Module-level type_decl, no code.
 }
 _ => entry_stmts.push(self.lower_stmt(ast, item)),
 }
 }
 self.scope.exit_scope();

 functions.push(hir::Function {
 def_id: self.def_gen.next(),
 name: Symbol::intern("__entry"),
 params: Vec::new(),
 body: hir::Block { stmts: entry_stmts },
 span: program.span,
 });

 let type_decls = self
 .struct_fields
 .iter()
 .map(|(name, fields)| hir::TypeDecl { name: *name, fields: fields.clone() })
 .collect();

 hir::Module { functions, type_decls }
 }

 // -----------------------------------------------------------------
 // Pass 1 helpers
 // -----------------------------------------------------------------

 fn collect_fn_sig(&mut self, ast: &Ast, fn_decl: NodeId) {
 let node = ast.get(fn_decl);
 let name = node.value.as_symbol().expect("FnDecl carries its name");
 let param_list = ast.get(node.children[0]);
 let mut param_types = Vec::new();
 let mut param_names = Vec::new();
 for &p in &param_list.children {
 let param = ast.get(p);
 let pname = param.value.as_symbol().expect("Param carries its name");
 let ty = if let Some(&ty_ident) = param.children.first() {
 let ty_name = ast.get(ty_ident).value.as_symbol().unwrap();
 parse_type_name(ty_name)
 } else {
 Type::Auto
 };
 param_names.push(pname);
 param_types.push(ty);
 }
 self.fn_sigs.insert(name, FnSig { param_types, param_names });
 }

 fn collect_fields(&mut self, ast: &Ast, decl: NodeId) {
 let node = ast.get(decl);
 let name = node.value.as_symbol().expect("StructDecl/UnionDecl carries its name");
 let mut fields = Vec::new();
 for &f in &node.children {
 let field = ast.get(f);
 let fname = field.value.as_symbol().expect("Field carries its name");
 let ty_name = ast.get(field.children[0]).value.as_symbol().unwrap();
 fields.push((fname, parse_type_name(ty_name)));
 }
 self.struct_fields.insert(name, fields);
 }

 // -----------------------------------------------------------------
 // Pass 2: functions
 // -----------------------------------------------------------------

 fn lower_fn_decl(&mut self, ast: &Ast, fn_decl: NodeId) -> hir::Function {
 let node = ast.get(fn_decl);
 let name = node.value.as_symbol().unwrap();
 let def_id = self.def_gen.next();
 let sig = self.fn_sigs.get(&name).cloned().unwrap_or(FnSig {
 param_types: Vec::new(),
 param_names: Vec::new(),
 });

 self.scope.enter_scope(RibKind::Function);
 let mut params = Vec::new();
 for (pname, ty) in sig.param_names.iter().zip(sig.param_types.iter()) {
 let pdef = self.def_gen.next();
 self.scope.add_binding(*pname, pdef);
 params.push(hir::Param { def_id: pdef, name: *pname, ty: ty.clone() });
 }

 let body_block = node.children[2];
 let body = self.lower_block(ast, body_block);
 self.scope.exit_scope();

 // : an `auto` parameter is resolved by the first
 // call site seen anywhere in the translation unit; patch it in
 // once every function has had a chance to contribute a call.
 for (idx, p) in params.iter_mut().enumerate() {
 if p.ty == Type::Auto {
 if let Some(resolved) = self.type_ctx.auto_param_type(name, idx) {
 p.ty = resolved.clone();
 }
 }
 }

 hir::Function { def_id, name, params, body, span: node.span }
 }

 fn lower_block(&mut self, ast: &Ast, block: NodeId) -> hir::Block {
 self.scope.enter_scope(RibKind::Block);
 let node = ast.get(block);
 let stmts = node.children.iter().map(|&s| self.lower_stmt(ast, s)).collect();
 self.scope.exit_scope();
 hir::Block { stmts }
 }

 // -----------------------------------------------------------------
 // Statements
 // -----------------------------------------------------------------

 fn lower_stmt(&mut self, ast: &Ast, id: NodeId) -> hir::Stmt {
 let node = ast.get(id);
 match node.kind {
 NodeKind::Print => hir::Stmt::Print(self.lower_expr(ast, node.children[0])),
 NodeKind::Let => self.lower_let(ast, node),
 NodeKind::Mutate => self.lower_mutate(ast, node),
 NodeKind::CallStmt => {
 let callee = node.value.as_symbol().unwrap();
 let args: Vec<hir::Expr> = node.children.iter().map(|&a| self.lower_expr(ast, a)).collect();
 self.check_call_args(node.span, callee, &args);
 hir::Stmt::CallStmt { callee, args }
 }
 NodeKind::Ret => {
 let expr = node.children.first().map(|&e| self.lower_expr(ast, e));
 hir::Stmt::Ret(expr)
 }
 NodeKind::If => {
 let cond = self.lower_expr(ast, node.children[0]);
 let then_block = self.lower_block(ast, node.children[1]);
 let else_block = node.children.get(2).map(|&e| self.lower_block(ast, e));
 hir::Stmt::If { cond, then_block, else_block }
 }
 NodeKind::While => {
 let cond = self.lower_expr(ast, node.children[0]);
 self.scope.enter_scope(RibKind::Loop);
 let body = self.lower_block(ast, node.children[1]);
 self.scope.exit_scope();
 hir::Stmt::While { cond, body }
 }
 NodeKind::Break => {
 if !self.scope.in_loop() {
 self.handler
 .build_error(node.span, "`break` outside of a loop")
 .code(DiagnosticCode::E_SEMANTIC_LOOP_CONTROL_OUTSIDE_LOOP)
 .emit(self.handler);
 }
 hir::Stmt::Break
 }
 NodeKind::Continue => {
 if !self.scope.in_loop() {
 self.handler
 .build_error(node.span, "`continue` outside of a loop")
 .code(DiagnosticCode::E_SEMANTIC_LOOP_CONTROL_OUTSIDE_LOOP)
 .emit(self.handler);
 }
 hir::Stmt::Continue
 }
 NodeKind::Switch => self.lower_switch(ast, node),
 NodeKind::Loop => {
 let header = node.value.as_symbol().unwrap_or_else(|| Symbol::intern(""));
 self.scope.enter_scope(RibKind::Loop);
 let body = self.lower_block(ast, node.children[0]);
 self.scope.exit_scope();
 hir::Stmt::Loop { header, body }
 }
 NodeKind::ExprStmt => hir::Stmt::ExprStmt(self.lower_expr(ast, node.children[0])),

 NodeKind::Open => {
 let handle = node.value.as_symbol().unwrap();
 let path = self.lower_expr(ast, node.children[0]);
 let mode = node.children.get(1).map(|&m| self.lower_expr(ast, m));
 hir::Stmt::Open { handle, path, mode }
 }
 NodeKind::Write => hir::Stmt::Write {
 handle: node.value.as_symbol().unwrap(),
 value: self.lower_expr(ast, node.children[0]),
 },
 NodeKind::WriteLn => hir::Stmt::WriteLn {
 handle: node.value.as_symbol().unwrap(),
 value: self.lower_expr(ast, node.children[0]),
 },
 NodeKind::Read => {
 let handle = node.value.as_symbol().unwrap();
 let dest_def_id = self.resolve_or_declare_dest(ast, node.children[0]);
 hir::Stmt::Read { handle, dest_def_id }
 }
 NodeKind::Close => hir::Stmt::Close { handle: node.value.as_symbol().unwrap() },
 NodeKind::Input => {
 let prompt = node.value.as_symbol().unwrap();
 let dest_def_id = self.resolve_or_declare_dest(ast, node.children[0]);
 hir::Stmt::Input { prompt, dest_def_id }
 }

 NodeKind::Thread => hir::Stmt::Thread { body: self.lower_block(ast, node.children[0]) },
 NodeKind::Async => hir::Stmt::Async { expr: self.lower_expr(ast, node.children[0]) },
 NodeKind::Channel => {
 let (name, elem_type_name) = match node.value {
 Value::Channel(n, t) => (n, t),
 _ => unreachable!("Channel node always carries Value::Channel"),
 };
 let def_id = self.def_gen.next();
 self.scope.add_binding(name, def_id);
 hir::Stmt::Channel { name, elem_type_name }
 }
 NodeKind::Send => hir::Stmt::Send {
 channel: node.value.as_symbol().unwrap(),
 value: self.lower_expr(ast, node.children[0]),
 },
 NodeKind::Recv => {
 let channel = node.value.as_symbol().unwrap();
 let dest_def_id = self.resolve_or_declare_dest(ast, node.children[0]);
 hir::Stmt::Recv { channel, dest_def_id }
 }
 NodeKind::Sync => {
 let (guard_nodes, block_node) = node.children.split_at(node.children.len() - 1);
 let guarded = guard_nodes
 .iter()
 .map(|&g| ast.get(g).value.as_symbol().unwrap())
 .collect();
 let body = self.lower_block(ast, block_node[0]);
 hir::Stmt::Sync { guarded, body }
 }
 NodeKind::Parallel => {
 let branches = node.children.iter().map(|&b| self.lower_block(ast, b)).collect();
 hir::Stmt::Parallel { branches }
 }
 NodeKind::Schedule => hir::Stmt::Schedule {
 n: node.value.as_int().unwrap_or(1),
 body: self.lower_block(ast, node.children[0]),
 },
 NodeKind::Batch => {
 let (source, n) = match node.value {
 Value::Batch(s, n) => (s, n),
 _ => unreachable!("Batch node always carries Value::Batch"),
 };
 hir::Stmt::Batch { source, n, body: self.lower_block(ast, node.children[0]) }
 }

 NodeKind::Scale => {
 let var = node.value.as_symbol().unwrap();
 let factors: Vec<Box<hir::Expr>> = node
 .children
 .iter()
 .map(|&c| Box::new(self.lower_expr(ast, c)))
 .collect();
 let factors: [Box<hir::Expr>; 4] = factors
 .try_into()
 .unwrap_or_else(|_| panic!("Scale always has 4 children"));
 hir::Stmt::Scale { var, factors }
 }
 NodeKind::Bounds => hir::Stmt::Bounds {
 var: node.value.as_symbol().unwrap(),
 min: self.lower_expr(ast, node.children[0]),
 max: self.lower_expr(ast, node.children[1]),
 },
 NodeKind::Checkpoint => hir::Stmt::Checkpoint { label: node.value.as_symbol().unwrap() },
 NodeKind::Vbreak => hir::Stmt::Vbreak { label: node.value.as_symbol().unwrap() },
 NodeKind::Matrix => {
 let (name, rows, cols) = match node.value {
 Value::Matrix(n, r, c) => (n, r, c),
 _ => unreachable!("Matrix node always carries Value::Matrix"),
 };
 hir::Stmt::Matrix { name, rows, cols }
 }
 NodeKind::SanitizeMem => hir::Stmt::SanitizeMem { var: node.value.as_symbol().unwrap() },
 NodeKind::SanitizeCode => hir::Stmt::SanitizeCode { var: node.value.as_symbol().unwrap() },
 NodeKind::Ping => hir::Stmt::Ping,
 NodeKind::Audit => hir::Stmt::Audit,
 NodeKind::Temperature => hir::Stmt::Temperature,
 NodeKind::Pressure => hir::Stmt::Pressure,
 NodeKind::Gauge => hir::Stmt::Gauge,

 other => {
 self.handler
 .build_error(node.span, format!("unsupported statement form {other:?}"))
 .code(DiagnosticCode::E_SEMANTIC_UNSUPPORTED_CONSTRUCT)
 .emit(self.handler);
 hir::Stmt::ExprStmt(hir::Expr {
 kind: hir::ExprKind::Error,
 ty: Type::Error,
 span: node.span,
 })
 }
 }
 }

 fn lower_let(&mut self, ast: &Ast, node: &Node) -> hir::Stmt {
 let name = node.value.as_symbol().unwrap();
 let init = self.lower_expr(ast, node.children[0]);
 // a repeated `let` of a name already bound in *this* scope is
 // treated as mutation of the existing binding, not shadowing.
 if self.scope_declared_locally(name) {
 let existing = self.scope.resolve(name).unwrap();
 return hir::Stmt::Mutate { def_id: existing, value: init };
 }
 let def_id = self.def_gen.next();
 let ty = init.ty.clone();
 self.scope.add_binding(name, def_id);
 hir::Stmt::Let { def_id, name, ty, init }
 }

 fn lower_mutate(&mut self, ast: &Ast, node: &Node) -> hir::Stmt {
 let name = node.value.as_symbol().unwrap();
 let value = self.lower_expr(ast, node.children[0]);
 let def_id = self.scope.resolve(name).unwrap_or_else(|| {
 self.handler
 .build_error(node.span, format!("undefined variable `{}`", name.as_str()))
 .code(DiagnosticCode::E_SEMANTIC_UNDEFINED_VAR)
 .emit(self.handler);
 self.def_gen.next()
 });
 hir::Stmt::Mutate { def_id, value }
 }

 /// Whether `name` is bound in the *current* rib specifically (not an
 /// enclosing one) — used to decide `let` vs. implicit mutation.
 fn scope_declared_locally(&self, name: Symbol) -> bool {
 self.scope.ribs[self.scope.current_rib].bindings.contains_key(&name)
 }

 fn resolve_or_declare_dest(&mut self, ast: &Ast, dest: NodeId) -> DefId {
 let name = ast.get(dest).value.as_symbol().unwrap();
 self.scope.resolve(name).unwrap_or_else(|| {
 let def_id = self.def_gen.next();
 self.scope.add_binding(name, def_id);
 def_id
 })
 }

 fn lower_switch(&mut self, ast: &Ast, node: &Node) -> hir::Stmt {
 let scrutinee = self.lower_expr(ast, node.children[0]);
 let mut cases = Vec::new();
 let mut default = None;
 for &c in &node.children[1..] {
 let case_node = ast.get(c);
 match case_node.kind {
 NodeKind::Case => {
 let value = ast.get(case_node.children[0]).value.as_int().unwrap_or(0);
 let block = self.lower_block(ast, case_node.children[1]);
 cases.push((value, block));
 }
 NodeKind::Default => {
 default = Some(self.lower_block(ast, case_node.children[0]));
 }
 _ => unreachable!("Switch children are always Case/Default"),
 }
 }
 hir::Stmt::Switch { scrutinee, cases, default }
 }

 // -----------------------------------------------------------------
 // Expressions
 // -----------------------------------------------------------------

 fn lower_expr(&mut self, ast: &Ast, id: NodeId) -> hir::Expr {
 let node = ast.get(id);
 let span = node.span;
 match node.kind {
 NodeKind::IntLit => hir::Expr {
 kind: hir::ExprKind::IntLit(node.value.as_int().unwrap()),
 ty: Type::INT,
 span,
 },
 NodeKind::FloatLit => {
 let v = match node.value {
 Value::Float(f) => f,
 _ => 0.0,
 };
 hir::Expr { kind: hir::ExprKind::FloatLit(v), ty: Type::Float64, span }
 }
 NodeKind::StrLit => {
 let s = node.value.as_symbol().unwrap();
 hir::Expr { kind: hir::ExprKind::StrLit(s), ty: Type::Pointer, span }
 }
 NodeKind::Ident => {
 let name = node.value.as_symbol().unwrap();
 match self.scope.resolve(name) {
 Some(def_id) => hir::Expr { kind: hir::ExprKind::Var(def_id), ty: Type::INT, span },
 None => {
 self.handler
 .build_error(span, format!("undefined variable `{}`", name.as_str()))
 .code(DiagnosticCode::E_SEMANTIC_UNDEFINED_VAR)
 .emit(self.handler);
 hir::Expr { kind: hir::ExprKind::Error, ty: Type::Error, span }
 }
 }
 }
 NodeKind::Binary => {
 let op = match node.value {
 Value::BinOp(op) => op,
 _ => unreachable!("Binary node always carries Value::BinOp"),
 };
 let lhs = self.lower_expr(ast, node.children[0]);
 let rhs = self.lower_expr(ast, node.children[1]);
 let ty = binary_result_type(op, &lhs.ty, &rhs.ty);
 hir::Expr {
 kind: hir::ExprKind::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
 ty,
 span,
 }
 }
 NodeKind::Unary => {
 let op = match node.value {
 Value::UnOp(op) => op,
 _ => unreachable!("Unary node always carries Value::UnOp"),
 };
 let operand = self.lower_expr(ast, node.children[0]);
 let ty = match op {
 UnOp::Not => Type::Bool,
 UnOp::Neg => operand.ty.clone(),
 };
 hir::Expr { kind: hir::ExprKind::Unary { op, operand: Box::new(operand) }, ty, span }
 }
 NodeKind::Ternary => {
 let cond = self.lower_expr(ast, node.children[0]);
 let then = self.lower_expr(ast, node.children[1]);
 let else_ = self.lower_expr(ast, node.children[2]);
 let ty = then.ty.usual_arithmetic_conversion(&else_.ty);
 hir::Expr {
 kind: hir::ExprKind::Ternary {
 cond: Box::new(cond),
 then: Box::new(then),
 else_: Box::new(else_),
 },
 ty,
 span,
 }
 }
 NodeKind::Call => {
 let callee = node.value.as_symbol().unwrap_or_else(|| Symbol::intern(""));
 let args: Vec<hir::Expr> = node.children.iter().map(|&a| self.lower_expr(ast, a)).collect();
 self.check_call_args(span, callee, &args);
 hir::Expr { kind: hir::ExprKind::Call { callee, args }, ty: Type::INT, span }
 }
 NodeKind::Index => {
 let base = self.lower_expr(ast, node.children[0]);
 let index = self.lower_expr(ast, node.children[1]);
 hir::Expr {
 kind: hir::ExprKind::Index { base: Box::new(base), index: Box::new(index) },
 ty: Type::INT,
 span,
 }
 }
 NodeKind::Member => {
 let field = node.value.as_symbol().unwrap();
 let base = self.lower_expr(ast, node.children[0]);
 hir::Expr {
 kind: hir::ExprKind::Member { base: Box::new(base), field },
 ty: Type::INT,
 span,
 }
 }
 other => {
 self.handler
 .build_error(span, format!("unsupported expression form {other:?}"))
 .code(DiagnosticCode::E_SEMANTIC_UNSUPPORTED_CONSTRUCT)
 .emit(self.handler);
 hir::Expr { kind: hir::ExprKind::Error, ty: Type::Error, span }
 }
 }
 }

 /// : resolves each `auto` parameter of `callee` against
 /// this call site's argument types; a disagreeing later call is a
 /// `TypeMismatch`.
 fn check_call_args(&mut self, span: Span, callee: Symbol, args: &[hir::Expr]) {
 let Some(sig) = self.fn_sigs.get(&callee).cloned() else {
 return;
 };
 for (idx, (param_ty, arg)) in sig.param_types.iter().zip(args.iter()).enumerate() {
 if *param_ty == Type::Auto {
 if let Err(previous) = self.type_ctx.resolve_auto_param(callee, idx, &arg.ty) {
 self.handler
 .build_error(
 span,
 format!(
 "conflicting `auto` parameter resolution for `{}`: previously {:?}, now {:?}",
 callee.as_str(),
 previous,
 arg.ty
 ),
 )
 .code(DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH)
 .emit(self.handler);
 }
 }
 }
 }
}

fn binary_result_type(op: BinOp, lhs: &Type, rhs: &Type) -> Type {
 match op {
 BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge | BinOp::And | BinOp::Or => {
 Type::Bool
 }
 _ => lhs.usual_arithmetic_conversion(rhs),
 }
}

/// Maps a declared-type identifier's spelling to a lattice [`Type`]
///` parameter-list grammar). Unknown
/// spellings are treated as a reference to a user-declared aggregate.
fn parse_type_name(name: Symbol) -> Type {
 match name.as_str() {
 "auto" => Type::Auto,
 "void" => Type::Void,
 "bool" => Type::Bool,
 "int8" => Type::Int8,
 "uint8" | "byte" => Type::UInt8,
 "int16" => Type::Int16,
 "uint16" => Type::UInt16,
 "int32" => Type::Int32,
 "uint32" => Type::UInt32,
 "int" | "int64" => Type::Int64,
 "uint" | "uint64" => Type::UInt64,
 "float" | "float32" => Type::Float32,
 "double" | "float64" => Type::Float64,
 "string" | "str" => Type::Pointer,
 _ => Type::Named(name),
 }
}
