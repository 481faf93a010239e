//! Statement parsing: keyword-dispatched statements
//! plus the long tail of statement keywords the lexer leaves as plain
//! `Token::Ident` (see `faxc-lex`'s token module docs) and this parser
//! dispatches on lexeme text.

use crate::ast::{NodeKind, Value};
use crate::{NodeId, PResult, Parser};
use faxc_lex::Token;

impl<'a> Parser<'a> {
 pub(crate) fn parse_stmt(&mut self) -> PResult<NodeId> {
 match self.current().clone() {
 Token::Print => self.parse_print(),
 Token::Let => self.parse_let(),
 Token::Ret => self.parse_ret(),
 Token::If => self.parse_if(),
 Token::While => self.parse_while(),
 Token::Break => self.parse_break(),
 Token::Continue => self.parse_continue(),
 Token::Switch => self.parse_switch(),
 Token::Loop => self.parse_loop(),
 Token::Call => self.parse_call_stmt(),
 Token::Ident(s) => self.parse_ident_stmt(s.as_str()),
 _ => self.parse_expr_stmt(),
 }
 }

 /// Dispatches on the text of a lexeme the lexer left as a plain
 /// `Ident` because recognizing it would require grammatical context
 /// the lexer doesn't have. Anything that doesn't match one of these
 /// statement keywords falls through to an expression statement (a
 /// bare call, a stdlib intrinsic invocation, ...).
 fn parse_ident_stmt(&mut self, text: &str) -> PResult<NodeId> {
 match text {
 "open" => self.parse_open(),
 "write" => self.parse_write(),
 "writeln" => self.parse_writeln(),
 "read" => self.parse_read(),
 "close" => self.parse_close(),
 "input" => self.parse_input(),
 "thread" => self.parse_thread(),
 "async" => self.parse_async_stmt(),
 "channel" => self.parse_channel(),
 "send" => self.parse_send(),
 "recv" => self.parse_recv(),
 "sync" => self.parse_sync(),
 "parallel" => self.parse_parallel(),
 "schedule" => self.parse_schedule(),
 "batch" => self.parse_batch(),
 "struct" => self.parse_struct_decl(),
 "enum" => self.parse_enum_decl(),
 "union" => self.parse_union_decl(),
 "typedef" => self.parse_typedef(),
 "mutate" => self.parse_mutate(),
 "scale" => self.parse_scale(),
 "bounds" => self.parse_bounds(),
 "checkpoint" => self.parse_checkpoint(),
 "vbreak" => self.parse_vbreak(),
 "matrix" => self.parse_matrix(),
 "sanitize_mem" => self.parse_sanitize_mem(),
 "sanitize_code" => self.parse_sanitize_code(),
 "ping" => self.parse_ping(),
 "audit" => self.parse_audit(),
 "temperature" => self.parse_temperature(),
 "pressure" => self.parse_pressure(),
 "gauge" => self.parse_gauge(),
 _ => self.parse_expr_stmt(),
 }
 }

 // -----------------------------------------------------------------
 // Core control flow
 // -----------------------------------------------------------------

 fn parse_print(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.expect(Token::Print)?;
 let expr = self.parse_expr()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Print, Value::None, vec![expr], start))
 }

 fn parse_let(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.expect(Token::Let)?;
 let name = self.expect_ident()?;
 self.expect(Token::Eq)?;
 let init = self.parse_expr()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Let, Value::Symbol(name), vec![init], start))
 }

 fn parse_ret(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.expect(Token::Ret)?;
 let children = if self.at_statement_boundary() {
 Vec::new()
 } else {
 vec![self.parse_expr()?]
 };
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Ret, Value::None, children, start))
 }

 fn parse_if(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.expect(Token::If)?;
 let cond = self.parse_expr()?;
 let then_block = self.parse_block()?;
 let mut children = vec![cond, then_block];
 if self.match_tok(&Token::Else) {
 children.push(self.parse_block()?);
 }
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::If, Value::None, children, start))
 }

 fn parse_while(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.expect(Token::While)?;
 let cond = self.parse_expr()?;
 let body = self.parse_block()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::While, Value::None, vec![cond, body], start))
 }

 fn parse_break(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.expect(Token::Break)?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Break, Value::None, Vec::new(), start))
 }

 fn parse_continue(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.expect(Token::Continue)?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Continue, Value::None, Vec::new(), start))
 }

 fn parse_switch(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.expect(Token::Switch)?;
 let scrutinee = self.parse_expr()?;
 self.expect(Token::LBrace)?;
 let mut children = vec![scrutinee];
 while self.check(&Token::Case) {
 let cspan = self.current_span();
 self.advance();
 let value = self.parse_expr()?;
 let block = self.parse_block()?;
 children.push(self.push_node(NodeKind::Case, Value::None, vec![value, block], cspan));
 }
 if self.check(&Token::Default) {
 let dspan = self.current_span();
 self.advance();
 let block = self.parse_block()?;
 children.push(self.push_node(NodeKind::Default, Value::None, vec![block], dspan));
 }
 self.expect(Token::RBrace)?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Switch, Value::None, children, start))
 }

 fn parse_loop(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.expect(Token::Loop)?;
 let header = self.expect_str()?;
 let body = self.parse_block()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Loop, Value::Str(header), vec![body], start))
 }

 fn parse_call_stmt(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.expect(Token::Call)?;
 let name = self.expect_ident()?;
 let mut args = Vec::new();
 if self.match_tok(&Token::LParen) {
 if !self.check(&Token::RParen) {
 loop {
 args.push(self.parse_expr()?);
 if !self.match_tok(&Token::Comma) {
 break;
 }
 }
 }
 self.expect(Token::RParen)?;
 } else {
 while !self.at_statement_boundary() {
 args.push(self.parse_additive()?);
 }
 }
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::CallStmt, Value::Symbol(name), args, start))
 }

 // -----------------------------------------------------------------
 // File I/O
 // -----------------------------------------------------------------

 fn parse_open(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let name = self.expect_ident()?;
 let path = self.parse_expr()?;
 let mut children = vec![path];
 if matches!(self.current(), Token::Str(_)) {
 children.push(self.parse_expr()?);
 }
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Open, Value::Symbol(name), children, start))
 }

 fn parse_write(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let handle = self.expect_ident()?;
 let expr = self.parse_expr()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Write, Value::Symbol(handle), vec![expr], start))
 }

 fn parse_writeln(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let handle = self.expect_ident()?;
 let expr = self.parse_expr()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::WriteLn, Value::Symbol(handle), vec![expr], start))
 }

 fn parse_read(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let handle = self.expect_ident()?;
 let vspan = self.current_span();
 let varname = self.expect_ident()?;
 let var = self.push_node(NodeKind::Ident, Value::Symbol(varname), Vec::new(), vspan);
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Read, Value::Symbol(handle), vec![var], start))
 }

 fn parse_close(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let handle = self.expect_ident()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Close, Value::Symbol(handle), Vec::new(), start))
 }

 fn parse_input(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let prompt = self.expect_str()?;
 let vspan = self.current_span();
 let varname = self.expect_ident()?;
 let var = self.push_node(NodeKind::Ident, Value::Symbol(varname), Vec::new(), vspan);
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Input, Value::Str(prompt), vec![var], start))
 }

 // -----------------------------------------------------------------
 // Concurrency surface
 // -----------------------------------------------------------------

 fn parse_thread(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let block = self.parse_block()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Thread, Value::None, vec![block], start))
 }

 fn parse_async_stmt(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let expr = self.parse_expr()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Async, Value::None, vec![expr], start))
 }

 fn parse_channel(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let name = self.expect_ident()?;
 let ty = self.expect_str()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Channel, Value::Channel(name, ty), Vec::new(), start))
 }

 fn parse_send(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let chan = self.expect_ident()?;
 let expr = self.parse_expr()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Send, Value::Symbol(chan), vec![expr], start))
 }

 fn parse_recv(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let chan = self.expect_ident()?;
 let vspan = self.current_span();
 let varname = self.expect_ident()?;
 let var = self.push_node(NodeKind::Ident, Value::Symbol(varname), Vec::new(), vspan);
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Recv, Value::Symbol(chan), vec![var], start))
 }

 fn parse_sync(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let mut children = Vec::new();
 while let Token::Ident(s) = self.current().clone() {
 let vspan = self.current_span();
 self.advance();
 children.push(self.push_node(NodeKind::Ident, Value::Symbol(s), Vec::new(), vspan));
 }
 children.push(self.parse_block()?);
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Sync, Value::None, children, start))
 }

 fn parse_parallel(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 self.expect(Token::LBrace)?;
 let mut children = Vec::new();
 while self.check(&Token::LBrace) {
 children.push(self.parse_block()?);
 }
 self.expect(Token::RBrace)?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Parallel, Value::None, children, start))
 }

 fn parse_schedule(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let n = self.expect_int()?;
 let block = self.parse_block()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Schedule, Value::Int(n), vec![block], start))
 }

 fn parse_batch(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let src = self.expect_ident()?;
 let n = self.expect_int()?;
 let block = self.parse_block()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Batch, Value::Batch(src, n), vec![block], start))
 }

 // -----------------------------------------------------------------
 // Data / monitoring surface
 // -----------------------------------------------------------------

 fn parse_mutate(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let var = self.expect_ident()?;
 let expr = self.parse_expr()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Mutate, Value::Symbol(var), vec![expr], start))
 }

 fn parse_scale(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let var = self.expect_ident()?;
 let mut children = Vec::with_capacity(4);
 for _ in 0..4 {
 children.push(self.parse_additive()?);
 }
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Scale, Value::Symbol(var), children, start))
 }

 fn parse_bounds(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let var = self.expect_ident()?;
 let min = self.parse_additive()?;
 let max = self.parse_additive()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Bounds, Value::Symbol(var), vec![min, max], start))
 }

 fn parse_checkpoint(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let label = self.expect_ident()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Checkpoint, Value::Symbol(label), Vec::new(), start))
 }

 fn parse_vbreak(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let label = self.expect_ident()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Vbreak, Value::Symbol(label), Vec::new(), start))
 }

 fn parse_matrix(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let name = self.expect_ident()?;
 let rows = self.expect_int()?;
 let cols = self.expect_int()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Matrix, Value::Matrix(name, rows, cols), Vec::new(), start))
 }

 fn parse_sanitize_mem(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let var = self.expect_ident()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::SanitizeMem, Value::Symbol(var), Vec::new(), start))
 }

 fn parse_sanitize_code(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 let var = self.expect_ident()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::SanitizeCode, Value::Symbol(var), Vec::new(), start))
 }

 fn parse_ping(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Ping, Value::None, Vec::new(), start))
 }

 fn parse_audit(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Audit, Value::None, Vec::new(), start))
 }

 fn parse_temperature(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Temperature, Value::None, Vec::new(), start))
 }

 fn parse_pressure(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Pressure, Value::None, Vec::new(), start))
 }

 fn parse_gauge(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance();
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Gauge, Value::None, Vec::new(), start))
 }

 /// A bare expression used as a statement: an expression-form call
 /// `name(args)`, a stdlib intrinsic invocation, or any other
 /// expression whose value is discarded.
 fn parse_expr_stmt(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 let expr = self.parse_expr()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::ExprStmt, Value::None, vec![expr], start))
 }
}
