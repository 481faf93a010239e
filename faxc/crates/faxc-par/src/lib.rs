//! faxc-par — C3 (AST) and C4 (Parser).
//!
//! Recursive-descent over the token stream, Pratt-style precedence
//! climbing for expressions. `Parser` is a value: its
//! input token view, cursor, pending-overlay buffer, and diagnostic
//! handler are all fields — no ambient/global state, replacing the original's module-level
//! flag ("process-wide mutable parser state" → parser-as-value).
//!
//! Every parsing operation returns `Result<NodeId, ParseError>` (the
//! "exception-based error signaling" flag): the first `ParseError`
//! returned from a top-level item parse is fatal for the translation
//! unit and the driver does not attempt statement-level
//! resync.

pub mod ast;
mod expr;
mod items;
mod stmt;

#[cfg(test)]
mod edge_cases;

pub use ast::{print_node, Ast, BinOp, Node, NodeId, NodeKind, UnOp, Value};

use faxc_lex::Token;
use faxc_util::index_vec::IndexVec;
use faxc_util::{Handler, Span, Symbol};
use thiserror::Error;

/// "the parser raises `ParseError { expected, found,
/// line }` on any unrecoverable mismatch."
#[derive(Debug, Clone, Error, PartialEq)]
#[error("parse error at line {line}: expected {expected}, found {found}")]
pub struct ParseError {
 pub expected: String,
 pub found: String,
 pub line: u32,
}

pub type PResult<T> = Result<T, ParseError>;

/// A parsed overlay annotation pending attachment to the *next* `Fn`
/// declaration.
#[derive(Clone, Debug)]
struct PendingOverlay {
 node: NodeId,
}

/// Recursive-descent parser over a token view. Holds no state outside its
/// own fields.
pub struct Parser<'a> {
 tokens: Vec<(Token, Span)>,
 pos: usize,
 pub(crate) arena: IndexVec<NodeId, Node>,
 pending_overlays: Vec<PendingOverlay>,
 handler: &'a Handler,
}

impl<'a> Parser<'a> {
 /// Builds a parser from a pre-lexed `(Token, Span)` stream (the
 /// preprocessor's output already carries spans for every surviving
 /// token; re-lexing here would lose the rewrites it made).
 pub fn new(tokens: Vec<(Token, Span)>, handler: &'a Handler) -> Self {
 Self {
 tokens,
 pos: 0,
 arena: IndexVec::new(),
 pending_overlays: Vec::new(),
 handler,
 }
 }

 /// Convenience constructor that lexes `source` itself with no
 /// preprocessing — used by tests and by any caller that already knows
 /// the CIAM preprocessor is disabled for this input.
 pub fn from_source(source: &str, handler: &'a Handler) -> Self {
 let mut lexer = faxc_lex::Lexer::new(source, handler);
 let mut tokens = Vec::new();
 loop {
 let (tok, span) = lexer.next_spanned();
 let is_eof = tok.is_eof();
 tokens.push((tok, span));
 if is_eof {
 break;
 }
 }
 Self::new(tokens, handler)
 }

 /// Parses the whole translation unit into a `Program` node.
 pub fn parse(&mut self) -> PResult<Ast> {
 let start = self.current_span();
 let mut items = Vec::new();
 while !self.at_eof() {
 items.push(self.parse_top_level()?);
 }
 if !self.pending_overlays.is_empty() {
 for overlay in self.pending_overlays.drain(..) {
 let span = self.arena[overlay.node].span;
 self.handler
 .build_warning(span, "unattached overlay annotation at end of input")
 .emit(self.handler);
 }
 }
 let root = self.push_node(NodeKind::Program, Value::None, items, start);
 Ok(Ast {
 arena: std::mem::take(&mut self.arena),
 root,
 })
 }

 fn parse_top_level(&mut self) -> PResult<NodeId> {
 while self.check(&Token::Overlay) {
 self.parse_overlay_annotation()?;
 }
 if self.check(&Token::Fn) {
 self.parse_fn_decl()
 } else {
 self.parse_stmt()
 }
 }

 // ---------------------------------------------------------------
 // Arena helpers
 // ---------------------------------------------------------------

 pub(crate) fn push_node(
 &mut self,
 kind: NodeKind,
 value: Value,
 children: Vec<NodeId>,
 span: Span,
 ) -> NodeId {
 self.arena.push(Node::new(kind, value, children, span))
 }

 pub(crate) fn push_overlay(&mut self, node: NodeId) {
 self.pending_overlays.push(PendingOverlay { node });
 }

 /// Drains the pending-overlay buffer into an `OverlayList` node,
 /// called once a `Fn` header has been parsed far enough to own them.
 pub(crate) fn take_overlays(&mut self, span: Span) -> NodeId {
 let nodes: Vec<NodeId> = self.pending_overlays.drain(..).map(|o| o.node).collect();
 self.push_node(NodeKind::OverlayList, Value::None, nodes, span)
 }

 // ---------------------------------------------------------------
 // Cursor primitives
 // ---------------------------------------------------------------

 pub(crate) fn current(&self) -> &Token {
 &self.tokens[self.pos.min(self.tokens.len() - 1)].0
 }

 pub(crate) fn current_span(&self) -> Span {
 self.tokens[self.pos.min(self.tokens.len() - 1)].1
 }

 pub(crate) fn current_line(&self) -> u32 {
 self.current_span().line
 }

 pub(crate) fn at_eof(&self) -> bool {
 matches!(self.current(), Token::Eof)
 }

 pub(crate) fn advance(&mut self) -> Token {
 let tok = self.current().clone();
 if self.pos + 1 < self.tokens.len() {
 self.pos += 1;
 }
 tok
 }

 pub(crate) fn check(&self, tok: &Token) -> bool {
 self.current() == tok
 }

 pub(crate) fn match_tok(&mut self, tok: &Token) -> bool {
 if self.check(tok) {
 self.advance();
 true
 } else {
 false
 }
 }

 pub(crate) fn expect(&mut self, tok: Token) -> PResult<()> {
 if self.check(&tok) {
 self.advance();
 Ok(())
 } else {
 Err(ParseError {
 expected: tok.to_string(),
 found: self.current().to_string(),
 line: self.current_line(),
 })
 }
 }

 /// Consumes an identifier token and returns its interned name.
 pub(crate) fn expect_ident(&mut self) -> PResult<Symbol> {
 match self.current().clone() {
 Token::Ident(s) => {
 self.advance();
 Ok(s)
 }
 other => Err(ParseError {
 expected: "identifier".into(),
 found: other.to_string(),
 line: self.current_line(),
 }),
 }
 }

 pub(crate) fn expect_str(&mut self) -> PResult<Symbol> {
 match self.current().clone() {
 Token::Str(s) => {
 self.advance();
 Ok(s)
 }
 other => Err(ParseError {
 expected: "string literal".into(),
 found: other.to_string(),
 line: self.current_line(),
 }),
 }
 }

 pub(crate) fn expect_int(&mut self) -> PResult<i64> {
 match self.current().clone() {
 Token::Number(n) => {
 self.advance();
 Ok(n)
 }
 other => Err(ParseError {
 expected: "integer literal".into(),
 found: other.to_string(),
 line: self.current_line(),
 }),
 }
 }

 /// : every statement tolerates a trailing `[ ... ]`
 /// sentinel of balanced brackets, content intentionally opaque to the
 /// grammar. Also accepts (and discards) a trailing `;`.
 pub(crate) fn skip_trailing_sentinel(&mut self) {
 if self.match_tok(&Token::Semi) {
 return;
 }
 if self.check(&Token::LBracket) {
 let mut depth = 0i32;
 loop {
 match self.current() {
 Token::LBracket => {
 depth += 1;
 self.advance();
 }
 Token::RBracket => {
 depth -= 1;
 self.advance();
 if depth == 0 {
 break;
 }
 }
 Token::Eof => break,
 _ => {
 self.advance();
 }
 }
 }
 self.match_tok(&Token::Semi);
 }
 }

 /// Parses a `{ ... }` block of statements.
 pub(crate) fn parse_block(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.expect(Token::LBrace)?;
 let mut stmts = Vec::new();
 while !self.check(&Token::RBrace) && !self.at_eof() {
 stmts.push(self.parse_stmt()?);
 }
 self.expect(Token::RBrace)?;
 Ok(self.push_node(NodeKind::Block, Value::None, stmts, start))
 }
}
