//! Arena-based AST node definitions for the DSL grammar.
//!
//! A translation unit owns a single [`Ast`]: a [`faxc_util::IndexVec`] of
//! [`Node`]s plus a root [`NodeId`]. Every node's children are `NodeId`s
//! into that same arena, never pointers — nodes own their children
//! exclusively and no reference cycles can arise by construction, which
//! replaces a shared-pointer AST with a virtual print method with a
//! tagged variant over an arena and a single free print function
//! instead of `dyn` dispatch.

use faxc_util::index_vec::{Idx, IndexVec};
use faxc_util::{Span, Symbol};

/// Index into an [`Ast`]'s arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl Idx for NodeId {
 fn from_usize(idx: usize) -> Self {
 NodeId(idx as u32)
 }
 fn index(self) -> usize {
 self.0 as usize
 }
}

impl NodeId {
 /// Sentinel used for an absent optional child (e.g. an `if` with no
 /// `else`, a `ret` with no expression). Never a valid arena index on
 /// its own; callers must check [`Ast::is_none`] before indexing.
 pub const NONE: NodeId = NodeId(u32::MAX);
}

/// The discriminator tag of an AST node. Unit-only by design: all lexical
/// payload (names, literal values, operators) lives in [`Node::value`],
/// not in the tag, so that `print_node` and every other consumer can
/// dispatch on `kind` alone without downcasting a payload per variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
 /// Translation unit root. Children: every top-level `FnDecl` and
 /// top-level statement, in source order.
 Program,

 // -- functions & overlays ---------------------------------------
 /// Function declaration. Children: `[ParamList, OverlayList, Block]`
 /// — a fixed three-child contract. `value` holds the function name.
 FnDecl,
 /// Synthetic list node grouping a function's parameters in order.
 ParamList,
 /// A single parameter. `value` holds the parameter name; the single
 /// child (if present) is an `Ident` node holding the declared type,
 /// omitted (zero children) when the type was `auto`.
 Param,
 /// Synthetic list node grouping the overlay annotations that preceded
 /// this function declaration, in attachment order.
 OverlayList,
 /// One `overlay Name(args...)` annotation. `value` holds the overlay
 /// name; children are the annotation's literal/number/identifier
 /// argument nodes.
 Overlay,

 /// A `{ ... }` statement block. Children are its statements in order.
 Block,

 // -- statements ---------------------------------------------------
 /// `Print <expr>`. One child: the expression to print.
 Print,
 /// `let <ident> = <expr>`. `value` holds the name; one child: init
 /// expression.
 Let,
 /// `call <name> <arg>*` statement-form invocation. `value` holds the
 /// callee name; children are argument expressions.
 CallStmt,
 /// `ret [<expr>]`. Zero or one child.
 Ret,
 /// `if <expr> { .. } [else { .. }]`. Children: `[cond, then_block]`
 /// or `[cond, then_block, else_block]`.
 If,
 /// `while <expr> { .. }`. Children: `[cond, body_block]`.
 While,
 /// `break`. No children.
 Break,
 /// `continue`. No children.
 Continue,
 /// `switch <expr> { case V { .. } ... [default { .. }] }`. First
 /// child is the scrutinee expression, remaining children are `Case`
 /// nodes followed by an optional trailing `Default` node.
 Switch,
 /// One `case <value> { .. }` arm. Children: `[value_expr, block]`.
 Case,
 /// The `default { .. }` arm. One child: the block.
 Default,
 /// `loop "<header>" { .. }`. `value` holds the opaque header string;
 /// one child: the body block.
 Loop,

 // -- file I/O -------------------------------------------------------
 /// `open <name> "<path>" ["<mode>"]`. `value` holds the handle name;
 /// children: `[path_expr]` or `[path_expr, mode_expr]`.
 Open,
 /// `write <handle> <expr>`. `value` holds the handle name; one
 /// child: the expression written.
 Write,
 /// `writeln <handle> <expr>`, identical shape to [`NodeKind::Write`].
 WriteLn,
 /// `read <handle> <var>`. `value` holds the handle name; one child:
 /// an `Ident` node naming the destination variable.
 Read,
 /// `close <handle>`. `value` holds the handle name.
 Close,
 /// `input "<prompt>" <var>`. `value` holds the prompt text; one
 /// child: an `Ident` node naming the destination variable.
 Input,

 // -- concurrency surface (lowered to tagged MIR) --------------------
 /// `thread { .. }`. One child: the block run on the new thread.
 Thread,
 /// `async <expr>`. One child: the expression to evaluate async.
 Async,
 /// `channel <name> "<type>"`. `value` packs the channel name and its
 /// declared element-type name (see [`Value::Channel`]).
 Channel,
 /// `send <chan> <expr>`. `value` holds the channel name; one child:
 /// the expression sent.
 Send,
 /// `recv <chan> <var>`. `value` holds the channel name; one child:
 /// an `Ident` node naming the destination variable.
 Recv,
 /// `sync <vars> { .. }`. Children: one `Ident` per guarded variable
 /// followed by exactly one `Block`.
 Sync,
 /// `parallel { { .. } { .. } ... }`. Children are the parallel
 /// branch blocks.
 Parallel,
 /// `schedule <n> { .. }`. `value` holds `n`; one child: the block.
 Schedule,
 /// `batch <src> <n> { .. }`. `value` holds the source name and `n`
 /// packed via [`Value::Batch`]; one child: the block.
 Batch,

 // -- type declarations ----------------------------------------------
 /// `struct N { field type ... }`. `value` holds `N`; children are
 /// `Field` nodes.
 StructDecl,
 /// `enum N { V, ... }`. `value` holds `N`; children are `Variant`
 /// nodes (each a bare `Ident`-valued leaf).
 EnumDecl,
 /// `union N { field type ... }`, same shape as [`NodeKind::StructDecl`].
 UnionDecl,
 /// One `field type` member of a struct/union. `value` holds the
 /// field name; one child: an `Ident` node naming its type.
 Field,
 /// One enum variant name, a leaf. `value` holds the variant name.
 Variant,
 /// `typedef New = Existing`. `value` holds `(New, Existing)` via
 /// [`Value::Typedef`].
 Typedef,

 // -- data / monitoring surface ---------------------------------------
 /// `mutate <var> <expr>`. `value` holds the variable name; one
 /// child: the new-value expression.
 Mutate,
 /// `scale <var> <e1> <e2> <e3> <e4>`. `value` holds the variable
 /// name; four children, the scale factor expressions.
 Scale,
 /// `bounds <var> <min> <max>`. `value` holds the variable name;
 /// children: `[min_expr, max_expr]`.
 Bounds,
 /// `checkpoint <label>`. `value` holds the label.
 Checkpoint,
 /// `vbreak <label>`. `value` holds the label.
 Vbreak,
 /// `matrix <name> rows cols`. `value` holds the matrix name packed
 /// with `rows`/`cols` via [`Value::Matrix`].
 Matrix,
 /// `sanitize_mem <var>`. `value` holds the variable name.
 SanitizeMem,
 /// `sanitize_code <var>`. `value` holds the variable name.
 SanitizeCode,
 /// `ping`. No children.
 Ping,
 /// `audit`. No children (distinct from the preprocessor's `CIAM
 /// audit [ ]` directive, which is rewritten to a `Print` before the
 /// parser ever sees it).
 Audit,
 /// `temperature`. No children.
 Temperature,
 /// `pressure`. No children.
 Pressure,
 /// `gauge`. No children.
 Gauge,

 /// An expression used as a statement, e.g. the expression-form
 /// invocation `name(args)` or a bare stdlib-intrinsic call. One
 /// child: the expression.
 ExprStmt,

 // -- expressions ------------------------------------------------
 /// Binary operator application. `value` holds the [`BinOp`].
 /// Children: `[left, right]`.
 Binary,
 /// Unary operator application. `value` holds the [`UnOp`]. One
 /// child: the operand.
 Unary,
 /// `cond ? then : else`. Children: `[cond, then, else]`.
 Ternary,
 /// Expression-form call `callee(args...)`. `value` holds the callee
 /// name when the callee is a bare identifier (the common case);
 /// children: `[arg0, arg1, ...]`.
 Call,
 /// `base[index]`. Children: `[base, index]`.
 Index,
 /// `base.field`. `value` holds the field name. One child: `base`.
 Member,
 /// A bare identifier reference. `value` holds the name.
 Ident,
 /// An integer literal. `value` holds the decimal value.
 IntLit,
 /// A float literal. `value` holds the value.
 FloatLit,
 /// A string literal. `value` holds the interned, already-unescaped
 /// text.
 StrLit,
}

/// Binary operators, ordered by precedence tier (not load-bearing for
/// the enum's representation, only for readability).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
 Or,
 And,
 Eq,
 Ne,
 Lt,
 Gt,
 Le,
 Ge,
 Add,
 Sub,
 Mul,
 Div,
 Rem,
}

/// Unary operators (`!`, `-`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
 Not,
 Neg,
}

/// The optional lexical payload a node carries, "tagged
/// value carrying ... optional lexical value ...". Kept as one enum
/// (rather than `Option<String>` alone) so structured payloads (an
/// operator, a packed pair of names) don't need ad-hoc string encoding.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
 None,
 Symbol(Symbol),
 Int(i64),
 Float(f64),
 Str(Symbol),
 BinOp(BinOp),
 UnOp(UnOp),
 /// `(channel_name, element_type_name)`.
 Channel(Symbol, Symbol),
 /// `(source_name, batch_size)`.
 Batch(Symbol, i64),
 /// `(matrix_name, rows, cols)`.
 Matrix(Symbol, i64, i64),
 /// `(new_name, existing_name)`.
 Typedef(Symbol, Symbol),
}

impl Value {
 pub fn as_symbol(&self) -> Option<Symbol> {
 match self {
 Value::Symbol(s) | Value::Str(s) => Some(*s),
 Value::Channel(s, _) | Value::Batch(s, _) | Value::Matrix(s, _, _) => Some(*s),
 _ => None,
 }
 }

 pub fn as_int(&self) -> Option<i64> {
 match self {
 Value::Int(n) => Some(*n),
 _ => None,
 }
 }
}

/// One arena-resident AST node: a discriminator, optional lexical value,
/// an ordered child list, and the source line it started on.
#[derive(Clone, Debug)]
pub struct Node {
 pub kind: NodeKind,
 pub value: Value,
 pub children: Vec<NodeId>,
 pub line: u32,
 pub span: Span,
}

impl Node {
 pub fn new(kind: NodeKind, value: Value, children: Vec<NodeId>, span: Span) -> Self {
 Self {
 kind,
 value,
 children,
 line: span.line,
 span,
 }
 }
}

/// A translation unit's complete AST: the arena plus its root.
#[derive(Clone, Debug)]
pub struct Ast {
 pub arena: IndexVec<NodeId, Node>,
 pub root: NodeId,
}

impl Ast {
 pub fn get(&self, id: NodeId) -> &Node {
 &self.arena[id]
 }

 pub fn is_none(&self, id: NodeId) -> bool {
 id == NodeId::NONE
 }

 pub fn children(&self, id: NodeId) -> &[NodeId] {
 &self.arena[id].children
 }
}

/// A non-member dispatch-on-kind pretty printer, replacing a virtual print method
/// ("a single non-member function dispatches on kind for printing" — no
/// virtual/`dyn` print method on `Node` itself).
pub fn print_node(ast: &Ast, id: NodeId, depth: usize) -> String {
 if ast.is_none(id) {
 return String::new();
 }
 let node = ast.get(id);
 let indent = " ".repeat(depth);
 let mut out = format!("{indent}{:?}", node.kind);
 match &node.value {
 Value::None => {}
 v => out.push_str(&format!(" {v:?}")),
 }
 out.push('\n');
 for &child in &node.children {
 out.push_str(&print_node(ast, child, depth + 1));
 }
 out
}
