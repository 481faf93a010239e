//! High-level IR: the AST after name resolution and type inference,
//! still statement-shaped —
//! every [`faxc_par::ast::NodeKind`] has a matching `Stmt`/`Expr` variant
//! here, just carrying a resolved [`DefId`] in place of a bare [`Symbol`]
//! and a [`Type`] on every expression instead of none.
//!
//! This is deliberately NOT a generic-language HIR (no traits, no
//! generics, no pattern matching, no `async`/`await` as value-producing
//! expressions): the source grammar doesn't have those, so neither does
//! this tree.

use crate::types::Type;
use faxc_util::{DefId, Span, Symbol};

/// A fully resolved function, the unit [`crate::SemanticAnalyzer::analyze`]
/// produces one of per `FnDecl` plus one synthetic `__entry` gathering the
/// translation unit's top-level statements.
#[derive(Debug, Clone)]
pub struct Function {
 pub def_id: DefId,
 pub name: Symbol,
 pub params: Vec<Param>,
 pub body: Block,
 pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Param {
 pub def_id: DefId,
 pub name: Symbol,
 pub ty: Type,
}

#[derive(Debug, Clone, Default)]
pub struct Block {
 pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
 Print(Expr),
 Let { def_id: DefId, name: Symbol, ty: Type, init: Expr },
 /// Assignment to an already-bound name (`mutate`, or `let` reuse of a
 /// name already seen — a repeated `let` is treated as mutation of the
 /// existing binding rather than shadowing).
 Mutate { def_id: DefId, value: Expr },
 CallStmt { callee: Symbol, args: Vec<Expr> },
 Ret(Option<Expr>),
 If { cond: Expr, then_block: Block, else_block: Option<Block> },
 While { cond: Expr, body: Block },
 Break,
 Continue,
 Switch { scrutinee: Expr, cases: Vec<(i64, Block)>, default: Option<Block> },
 Loop { header: Symbol, body: Block },
 ExprStmt(Expr),

 // -- file I/O, lowered to runtime intrinsic calls by faxc-mir -------
 Open { handle: Symbol, path: Expr, mode: Option<Expr> },
 Write { handle: Symbol, value: Expr },
 WriteLn { handle: Symbol, value: Expr },
 Read { handle: Symbol, dest_def_id: DefId },
 Close { handle: Symbol },
 Input { prompt: Symbol, dest_def_id: DefId },

 // -- concurrency surface, lowered to runtime-call intrinsics ----------
 Thread { body: Block },
 Async { expr: Expr },
 Channel { name: Symbol, elem_type_name: Symbol },
 Send { channel: Symbol, value: Expr },
 Recv { channel: Symbol, dest_def_id: DefId },
 Sync { guarded: Vec<Symbol>, body: Block },
 Parallel { branches: Vec<Block> },
 Schedule { n: i64, body: Block },
 Batch { source: Symbol, n: i64, body: Block },

 // -- data / monitoring surface, intrinsic calls -----------------------
 Scale { var: Symbol, factors: [Box<Expr>; 4] },
 Bounds { var: Symbol, min: Expr, max: Expr },
 Checkpoint { label: Symbol },
 Vbreak { label: Symbol },
 Matrix { name: Symbol, rows: i64, cols: i64 },
 SanitizeMem { var: Symbol },
 SanitizeCode { var: Symbol },
 Ping,
 Audit,
 Temperature,
 Pressure,
 Gauge,
}

#[derive(Debug, Clone)]
pub struct Expr {
 pub kind: ExprKind,
 pub ty: Type,
 pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
 IntLit(i64),
 FloatLit(f64),
 StrLit(Symbol),
 /// Resolved reference to a local/parameter binding.
 Var(DefId),
 Binary { op: faxc_par::ast::BinOp, lhs: Box<Expr>, rhs: Box<Expr> },
 Unary { op: faxc_par::ast::UnOp, operand: Box<Expr> },
 Ternary { cond: Box<Expr>, then: Box<Expr>, else_: Box<Expr> },
 Call { callee: Symbol, args: Vec<Expr> },
 Index { base: Box<Expr>, index: Box<Expr> },
 Member { base: Box<Expr>, field: Symbol },
 /// Recovery node for an expression semantic analysis could not make
 /// sense of; its `ty` is always [`Type::Error`].
 Error,
}

/// A whole translation unit after analysis: every declared function,
/// keyed by name for `faxc-mir`'s lowering pass, plus the struct/enum/
/// union/typedef declarations semantic analysis recorded for later
/// `Member`/`Field` projection checks.
#[derive(Debug, Clone, Default)]
pub struct Module {
 pub functions: Vec<Function>,
 pub type_decls: Vec<TypeDecl>,
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
 pub name: Symbol,
 pub fields: Vec<(Symbol, Type)>,
}
