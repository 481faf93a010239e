//! Expression parsing: precedence climbing 
//!
//! Precedence, low to high: `||`, `&&`, `==`/`!=`, `< > <= >=`, `+ -`,
//! `* / %`, unary `! -` (right-assoc), then the ternary `?:` which —
//! unusually — sits at the *lowest* precedence of all, so it is parsed
//! as the outermost production, wrapping the `||` chain.
//!
//! Postfix chains on a primary (`call(...)`, `index[...]`, `.member`)
//! combine left-to-right in `parse_postfix`.

use crate::ast::{BinOp, NodeKind, UnOp, Value};
use crate::{NodeId, PResult, ParseError, Parser};
use faxc_lex::Token;

impl<'a> Parser<'a> {
 pub(crate) fn parse_expr(&mut self) -> PResult<NodeId> {
 self.parse_ternary()
 }

 fn parse_ternary(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 let cond = self.parse_or()?;
 if self.match_tok(&Token::Question) {
 let then_branch = self.parse_expr()?;
 self.expect(Token::Colon)?;
 let else_branch = self.parse_expr()?;
 Ok(self.push_node(NodeKind::Ternary, Value::None, vec![cond, then_branch, else_branch], start))
 } else {
 Ok(cond)
 }
 }

 fn parse_or(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 let mut left = self.parse_and()?;
 while self.match_tok(&Token::OrOr) {
 let right = self.parse_and()?;
 left = self.push_node(NodeKind::Binary, Value::BinOp(BinOp::Or), vec![left, right], start);
 }
 Ok(left)
 }

 fn parse_and(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 let mut left = self.parse_equality()?;
 while self.match_tok(&Token::AndAnd) {
 let right = self.parse_equality()?;
 left = self.push_node(NodeKind::Binary, Value::BinOp(BinOp::And), vec![left, right], start);
 }
 Ok(left)
 }

 fn parse_equality(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 let mut left = self.parse_relational()?;
 loop {
 let op = match self.current() {
 Token::EqEq => BinOp::Eq,
 Token::Ne => BinOp::Ne,
 _ => break,
 };
 self.advance();
 let right = self.parse_relational()?;
 left = self.push_node(NodeKind::Binary, Value::BinOp(op), vec![left, right], start);
 }
 Ok(left)
 }

 fn parse_relational(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 let mut left = self.parse_additive()?;
 loop {
 let op = match self.current() {
 Token::Lt => BinOp::Lt,
 Token::Gt => BinOp::Gt,
 Token::Le => BinOp::Le,
 Token::Ge => BinOp::Ge,
 _ => break,
 };
 self.advance();
 let right = self.parse_additive()?;
 left = self.push_node(NodeKind::Binary, Value::BinOp(op), vec![left, right], start);
 }
 Ok(left)
 }

 pub(crate) fn parse_additive(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 let mut left = self.parse_multiplicative()?;
 loop {
 let op = match self.current() {
 Token::Plus => BinOp::Add,
 Token::Minus => BinOp::Sub,
 _ => break,
 };
 self.advance();
 let right = self.parse_multiplicative()?;
 left = self.push_node(NodeKind::Binary, Value::BinOp(op), vec![left, right], start);
 }
 Ok(left)
 }

 fn parse_multiplicative(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 let mut left = self.parse_unary()?;
 loop {
 let op = match self.current() {
 Token::Star => BinOp::Mul,
 Token::Slash => BinOp::Div,
 Token::Percent => BinOp::Rem,
 _ => break,
 };
 self.advance();
 let right = self.parse_unary()?;
 left = self.push_node(NodeKind::Binary, Value::BinOp(op), vec![left, right], start);
 }
 Ok(left)
 }

 fn parse_unary(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 let op = match self.current() {
 Token::Bang => Some(UnOp::Not),
 Token::Minus => Some(UnOp::Neg),
 _ => None,
 };
 if let Some(op) = op {
 self.advance();
 let operand = self.parse_unary()?;
 Ok(self.push_node(NodeKind::Unary, Value::UnOp(op), vec![operand], start))
 } else {
 self.parse_postfix()
 }
 }

 /// Postfix chains: call `( args )`, index `[ expr ]`, member
 /// `. identifier`, combined left-to-right.
 fn parse_postfix(&mut self) -> PResult<NodeId> {
 let mut node = self.parse_primary()?;
 loop {
 let start = self.current_span();
 if self.match_tok(&Token::LParen) {
 let mut args = Vec::new();
 if !self.check(&Token::RParen) {
 loop {
 args.push(self.parse_expr()?);
 if !self.match_tok(&Token::Comma) {
 break;
 }
 }
 }
 self.expect(Token::RParen)?;
 let callee_name = self.callee_symbol(node);
 node = self.push_node(NodeKind::Call, callee_name, {
 let mut c = vec![node];
 c.extend(args);
 c
 }, start);
 } else if self.match_tok(&Token::LBracket) {
 let index = self.parse_expr()?;
 self.expect(Token::RBracket)?;
 node = self.push_node(NodeKind::Index, Value::None, vec![node, index], start);
 } else if self.match_tok(&Token::Dot) {
 let field = self.expect_ident()?;
 node = self.push_node(NodeKind::Member, Value::Symbol(field), vec![node], start);
 } else {
 break;
 }
 }
 Ok(node)
 }

 /// When the callee of a `Call` node is a bare identifier, carry its
 /// name in `Value` too so lowering doesn't have to re-inspect the
 /// first child; otherwise (a computed callee) leave it unnamed.
 fn callee_symbol(&self, callee: NodeId) -> Value {
 let node = &self.arena[callee];
 if node.kind == NodeKind::Ident {
 node.value.clone()
 } else {
 Value::None
 }
 }

 fn parse_primary(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 match self.current().clone() {
 Token::Number(n) => {
 self.advance();
 Ok(self.push_node(NodeKind::IntLit, Value::Int(n), Vec::new(), start))
 }
 Token::Float(f) => {
 self.advance();
 Ok(self.push_node(NodeKind::FloatLit, Value::Float(f), Vec::new(), start))
 }
 Token::Str(s) => {
 self.advance();
 Ok(self.push_node(NodeKind::StrLit, Value::Str(s), Vec::new(), start))
 }
 Token::Ident(s) => {
 self.advance();
 Ok(self.push_node(NodeKind::Ident, Value::Symbol(s), Vec::new(), start))
 }
 Token::LParen => {
 self.advance();
 let inner = self.parse_expr()?;
 self.expect(Token::RParen)?;
 Ok(inner)
 }
 Token::Call => {
 // `call name(args)` used in expression position (e.g. as
 // a `Print` argument); treat identically to an
 // expression-form call with the statement keyword
 // consumed first.
 self.advance();
 let name = self.expect_ident()?;
 let callee = self.push_node(NodeKind::Ident, Value::Symbol(name), Vec::new(), start);
 self.parse_call_tail(callee, start)
 }
 other => Err(ParseError {
 expected: "expression".into(),
 found: other.to_string(),
 line: self.current_line(),
 }),
 }
 }

 fn parse_call_tail(&mut self, callee: NodeId, start: faxc_util::Span) -> PResult<NodeId> {
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
 // bare `call name arg1 arg2` form: arguments are primaries
 // up to the next statement boundary.
 while !self.at_statement_boundary() {
 args.push(self.parse_additive()?);
 }
 }
 let callee_name = self.callee_symbol(callee);
 let mut children = vec![callee];
 children.extend(args);
 Ok(self.push_node(NodeKind::Call, callee_name, children, start))
 }

 pub(crate) fn at_statement_boundary(&self) -> bool {
 matches!(
 self.current(),
 Token::Eof
 | Token::RBrace
 | Token::Semi
 | Token::LBracket
 | Token::Print
 | Token::Let
 | Token::Fn
 | Token::Ret
 | Token::If
 | Token::Else
 | Token::While
 | Token::Break
 | Token::Continue
 | Token::Switch
 | Token::Case
 | Token::Default
 | Token::Loop
 | Token::Call
 | Token::Overlay
 )
 }
}
