//! Overlay annotations and function/type declarations.

use crate::ast::{NodeKind, Value};
use crate::{NodeId, PResult, ParseError, Parser};
use faxc_lex::Token;
use faxc_util::Symbol;

impl<'a> Parser<'a> {
 /// `overlay <name>(args...) [, <name>(args...)]*`, attached to the
 /// `Fn` declaration that follows. Annotation arguments are bare
 /// literal/number/identifier primaries, not full expressions.
 pub(crate) fn parse_overlay_annotation(&mut self) -> PResult<()> {
 self.expect(Token::Overlay)?;
 loop {
 let span = self.current_span();
 let name = self.expect_ident()?;
 let mut args = Vec::new();
 if self.match_tok(&Token::LParen) {
 if !self.check(&Token::RParen) {
 loop {
 args.push(self.parse_overlay_arg()?);
 if !self.match_tok(&Token::Comma) {
 break;
 }
 }
 }
 self.expect(Token::RParen)?;
 }
 let node = self.push_node(NodeKind::Overlay, Value::Symbol(name), args, span);
 self.push_overlay(node);
 if !self.match_tok(&Token::Comma) {
 break;
 }
 }
 Ok(())
 }

 fn parse_overlay_arg(&mut self) -> PResult<NodeId> {
 let span = self.current_span();
 match self.current().clone() {
 Token::Str(s) => {
 self.advance();
 Ok(self.push_node(NodeKind::StrLit, Value::Str(s), Vec::new(), span))
 }
 Token::Number(n) => {
 self.advance();
 Ok(self.push_node(NodeKind::IntLit, Value::Int(n), Vec::new(), span))
 }
 Token::Float(f) => {
 self.advance();
 Ok(self.push_node(NodeKind::FloatLit, Value::Float(f), Vec::new(), span))
 }
 Token::Ident(s) => {
 self.advance();
 Ok(self.push_node(NodeKind::Ident, Value::Symbol(s), Vec::new(), span))
 }
 other => Err(ParseError {
 expected: "overlay argument (literal, number, or identifier)".into(),
 found: other.to_string(),
 line: self.current_line(),
 }),
 }
 }

 /// `Fn <name> [ "<params>" | (…) ] { body }`, with any overlays
 /// collected by prior `parse_overlay_annotation` calls drained into
 /// this node's `OverlayList` child.
 pub(crate) fn parse_fn_decl(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.expect(Token::Fn)?;
 let name = self.expect_ident()?;

 let params = self.parse_param_spec()?;
 let overlays = self.take_overlays(start);
 let body = self.parse_block()?;

 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::FnDecl, Value::Symbol(name), vec![params, overlays, body], start))
 }

 /// Parameters are either a parenthesized block whose
 /// interior is scanned (tokenized) but never recursively re-parsed as
 /// expressions, or one-or-more string literals whose concatenated
 /// text is split on comma then whitespace into `(type, name)` pairs.
 /// An omitted type is recorded as `auto`.
 fn parse_param_spec(&mut self) -> PResult<NodeId> {
 let span = self.current_span();
 let pairs: Vec<(Option<Symbol>, Symbol)> = if self.check(&Token::LParen) {
 self.scan_paren_params()?
 } else if matches!(self.current(), Token::Str(_)) {
 self.scan_string_params()
 } else {
 Vec::new()
 };

 let mut children = Vec::new();
 for (ty, name) in pairs {
 let ty_children = match ty {
 Some(t) => vec![self.push_node(NodeKind::Ident, Value::Symbol(t), Vec::new(), span)],
 None => Vec::new(),
 };
 children.push(self.push_node(NodeKind::Param, Value::Symbol(name), ty_children, span));
 }
 Ok(self.push_node(NodeKind::ParamList, Value::None, children, span))
 }

 /// Scans `( ... )` without recursively parsing its interior as
 /// expressions: groups tokens between commas, reading each group as
 /// either `name` (type `auto`) or `type name`.
 fn scan_paren_params(&mut self) -> PResult<Vec<(Option<Symbol>, Symbol)>> {
 self.expect(Token::LParen)?;
 let mut groups: Vec<Vec<Token>> = vec![Vec::new()];
 let mut depth = 0i32;
 loop {
 match self.current().clone() {
 Token::RParen if depth == 0 => {
 self.advance();
 break;
 }
 Token::LParen | Token::LBrace | Token::LBracket => {
 depth += 1;
 groups.last_mut().unwrap().push(self.advance());
 }
 Token::RBrace | Token::RBracket => {
 depth -= 1;
 groups.last_mut().unwrap().push(self.advance());
 }
 Token::Comma if depth == 0 => {
 self.advance();
 groups.push(Vec::new());
 }
 Token::Eof => {
 return Err(ParseError {
 expected: ")".into(),
 found: "end of input".into(),
 line: self.current_line(),
 })
 }
 _ => {
 groups.last_mut().unwrap().push(self.advance());
 }
 }
 }

 let mut out = Vec::new();
 for group in groups {
 let idents: Vec<Symbol> = group
 .iter()
 .filter_map(|t| match t {
 Token::Ident(s) => Some(*s),
 _ => None,
 })
 .collect();
 match idents.len() {
 0 => {}
 1 => out.push((None, idents[0])),
 _ => out.push((Some(idents[0]), *idents.last().unwrap())),
 }
 }
 Ok(out)
 }

 /// Concatenates one-or-more consecutive string-literal tokens, then
 /// splits on `,` and whitespace 
 fn scan_string_params(&mut self) -> Vec<(Option<Symbol>, Symbol)> {
 let mut text = String::new();
 while let Token::Str(s) = self.current().clone() {
 text.push_str(s.as_str());
 self.advance();
 }
 text.split(',')
 .map(str::trim)
 .filter(|piece| !piece.is_empty())
 .map(|piece| {
 let words: Vec<&str> = piece.split_whitespace().collect();
 match words.len() {
 0 => (None, Symbol::intern("_")),
 1 => (None, Symbol::intern(words[0])),
 _ => (Some(Symbol::intern(words[0])), Symbol::intern(words[words.len() - 1])),
 }
 })
 .collect()
 }

 /// `struct N { field type ... }`.
 pub(crate) fn parse_struct_decl(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance(); // `struct` (kept as Ident by the lexer)
 let name = self.expect_ident()?;
 self.expect(Token::LBrace)?;
 let mut fields = Vec::new();
 while !self.check(&Token::RBrace) && !self.at_eof() {
 let fspan = self.current_span();
 let fname = self.expect_ident()?;
 let fty = self.expect_ident()?;
 let ty_node = self.push_node(NodeKind::Ident, Value::Symbol(fty), Vec::new(), fspan);
 fields.push(self.push_node(NodeKind::Field, Value::Symbol(fname), vec![ty_node], fspan));
 }
 self.expect(Token::RBrace)?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::StructDecl, Value::Symbol(name), fields, start))
 }

 /// `union N { field type ... }`, identical shape to a struct.
 pub(crate) fn parse_union_decl(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance(); // `union`
 let name = self.expect_ident()?;
 self.expect(Token::LBrace)?;
 let mut fields = Vec::new();
 while !self.check(&Token::RBrace) && !self.at_eof() {
 let fspan = self.current_span();
 let fname = self.expect_ident()?;
 let fty = self.expect_ident()?;
 let ty_node = self.push_node(NodeKind::Ident, Value::Symbol(fty), Vec::new(), fspan);
 fields.push(self.push_node(NodeKind::Field, Value::Symbol(fname), vec![ty_node], fspan));
 }
 self.expect(Token::RBrace)?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::UnionDecl, Value::Symbol(name), fields, start))
 }

 /// `enum N { V, ... }`.
 pub(crate) fn parse_enum_decl(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance(); // `enum`
 let name = self.expect_ident()?;
 self.expect(Token::LBrace)?;
 let mut variants = Vec::new();
 while !self.check(&Token::RBrace) && !self.at_eof() {
 let vspan = self.current_span();
 let vname = self.expect_ident()?;
 variants.push(self.push_node(NodeKind::Variant, Value::Symbol(vname), Vec::new(), vspan));
 self.match_tok(&Token::Comma);
 }
 self.expect(Token::RBrace)?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::EnumDecl, Value::Symbol(name), variants, start))
 }

 /// `typedef New = Existing`.
 pub(crate) fn parse_typedef(&mut self) -> PResult<NodeId> {
 let start = self.current_span();
 self.advance(); // `typedef`
 let new_name = self.expect_ident()?;
 self.expect(Token::Eq)?;
 let existing = self.expect_ident()?;
 self.skip_trailing_sentinel();
 Ok(self.push_node(NodeKind::Typedef, Value::Typedef(new_name, existing), Vec::new(), start))
 }
}
