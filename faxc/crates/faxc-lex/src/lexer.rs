//! Main lexer implementation for the Fax-to-native DSL.
//!
//! Transforms source text into a stream of [`Token`]s on demand. Whitespace
//! and both comment syntaxes (`//…\n` and `#…\n`) are skipped; newlines
//! advance the line counter and reset the column to 1.

use faxc_util::diagnostic::DiagnosticCode;
use faxc_util::{Handler, Span, Symbol};

use crate::cursor::Cursor;
use crate::token::Token;
use crate::unicode::{is_ascii_ident_continue, is_ascii_ident_start, is_digit_in_base};

/// The lexer for DSL source code.
///
/// Holds a [`Cursor`] over the source text and a handler to report
/// `UnexpectedCharacter`/`UnterminatedString` diagnostics to; it never
/// panics on malformed input.
///
/// # Example
///
/// ```
/// use faxc_util::Handler;
/// use faxc_lex::lexer::Lexer;
/// use faxc_lex::token::Token;
///
/// let handler = Handler::new();
/// let mut lexer = Lexer::new("let x = 42;", &handler);
///
/// assert_eq!(lexer.next_token(), Token::Let);
/// assert!(matches!(lexer.next_token(), Token::Ident(_)));
/// ```
pub struct Lexer<'a> {
 cursor: Cursor<'a>,
 handler: &'a Handler,
 token_start: usize,
 token_start_line: u32,
 token_start_column: u32,
}

impl<'a> Lexer<'a> {
 /// Creates a new lexer over `source`, reporting lexical diagnostics to
 /// `handler`.
 pub fn new(source: &'a str, handler: &'a Handler) -> Self {
 Self {
 cursor: Cursor::new(source),
 handler,
 token_start: 0,
 token_start_line: 1,
 token_start_column: 1,
 }
 }

 fn span(&self) -> Span {
 Span::new(
 self.token_start as u32,
 self.cursor.position() as u32,
 self.token_start_line,
 self.token_start_column,
 )
 }

 fn mark_start(&mut self) {
 self.token_start = self.cursor.position();
 self.token_start_line = self.cursor.line();
 self.token_start_column = self.cursor.column();
 }

 /// Skips whitespace and both comment forms (`//…` and `#…`), stopping
 /// at the first character that starts a real token.
 fn skip_trivia(&mut self) {
 loop {
 while !self.cursor.is_at_end() && self.cursor.current_char().is_whitespace() {
 self.cursor.advance();
 }
 if self.cursor.current_char() == '/' && self.cursor.peek_char(1) == '/' {
 while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
 self.cursor.advance();
 }
 continue;
 }
 if self.cursor.current_char() == '#' {
 while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
 self.cursor.advance();
 }
 continue;
 }
 break;
 }
 }

 /// Returns the next token together with the [`Span`] of its lexeme,
 /// for callers (the preprocessor, the parser's diagnostics) that need
 /// the full `(kind, lexeme, line, column)` tuple rather than the bare
 /// `Token`.
 pub fn next_spanned(&mut self) -> (Token, Span) {
 let tok = self.next_token();
 (tok, self.span())
 }

 /// Returns the next token, or [`Token::Eof`] once the source is
 /// exhausted.
 pub fn next_token(&mut self) -> Token {
 self.skip_trivia();
 self.mark_start();

 if self.cursor.is_at_end() {
 return Token::Eof;
 }

 let c = self.cursor.current_char();

 if is_ascii_ident_start(c) {
 return self.lex_ident_or_number_literal();
 }
 if c.is_ascii_digit() {
 return self.lex_number();
 }
 if c == '"' {
 return self.lex_string();
 }

 self.lex_operator_or_symbol()
 }

 fn lex_ident_or_number_literal(&mut self) -> Token {
 let start = self.cursor.position();
 while !self.cursor.is_at_end() && is_ascii_ident_continue(self.cursor.current_char()) {
 self.cursor.advance();
 }
 let text = self.cursor.slice_from(start);

 if let Some(tok) = Token::keyword_from_ident(text) {
 return tok;
 }
 Token::Ident(Symbol::intern(text))
 }

 fn lex_number(&mut self) -> Token {
 let start = self.cursor.position();

 if self.cursor.current_char() == '0'
 && matches!(self.cursor.peek_char(1), 'x' | 'X' | 'b' | 'B' | 'o' | 'O')
 {
 let base = match self.cursor.peek_char(1) {
 'x' | 'X' => 16,
 'b' | 'B' => 2,
 _ => 8,
 };
 self.cursor.advance();
 self.cursor.advance();
 let digits_start = self.cursor.position();
 while !self.cursor.is_at_end() && is_digit_in_base(self.cursor.current_char(), base) {
 self.cursor.advance();
 }
 let digits = self.cursor.slice_from(digits_start);
 return match i64::from_str_radix(digits, base) {
 Ok(v) => Token::Number(v),
 Err(_) => {
 self.report_invalid_number(start);
 Token::Number(0)
 }
 };
 }

 while !self.cursor.is_at_end() && self.cursor.current_char().is_ascii_digit() {
 self.cursor.advance();
 }

 let mut is_float = false;
 if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
 is_float = true;
 self.cursor.advance();
 while !self.cursor.is_at_end() && self.cursor.current_char().is_ascii_digit() {
 self.cursor.advance();
 }
 }

 if matches!(self.cursor.current_char(), 'e' | 'E') {
 let snapshot = self.cursor.snapshot();
 self.cursor.advance();
 if matches!(self.cursor.current_char(), '+' | '-') {
 self.cursor.advance();
 }
 if self.cursor.current_char().is_ascii_digit() {
 is_float = true;
 while !self.cursor.is_at_end() && self.cursor.current_char().is_ascii_digit() {
 self.cursor.advance();
 }
 } else {
 self.cursor.restore(snapshot);
 }
 }

 let text = self.cursor.slice_from(start);
 if is_float {
 match text.parse::<f64>() {
 Ok(v) => Token::Float(v),
 Err(_) => {
 self.report_invalid_number(start);
 Token::Float(0.0)
 }
 }
 } else {
 match text.parse::<i64>() {
 Ok(v) => Token::Number(v),
 Err(_) => {
 self.report_invalid_number(start);
 Token::Number(0)
 }
 }
 }
 }

 fn report_invalid_number(&mut self, start: usize) {
 let span = Span::new(
 start as u32,
 self.cursor.position() as u32,
 self.token_start_line,
 self.token_start_column,
 );
 self.handler
 .build_error(span, format!("invalid numeric literal `{}`", self.cursor.slice_from(start)))
 .code(DiagnosticCode::E_LEXER_INVALID_NUMBER)
 .emit(self.handler);
 }

 /// Double-quoted string literal with C-style escapes. An unterminated
 /// string is reported at the opening quote and yields a best-effort
 /// literal of everything up to end-of-input.
 fn lex_string(&mut self) -> Token {
 self.cursor.advance(); // opening quote
 let mut value = String::new();
 let mut terminated = false;

 while !self.cursor.is_at_end() {
 let c = self.cursor.current_char();
 if c == '"' {
 self.cursor.advance();
 terminated = true;
 break;
 }
 if c == '\\' {
 self.cursor.advance();
 let escaped = self.cursor.current_char();
 match escaped {
 'n' => value.push('\n'),
 't' => value.push('\t'),
 'r' => value.push('\r'),
 '\\' => value.push('\\'),
 '"' => value.push('"'),
 other => {
 self.handler
 .build_error(self.span(), format!("invalid escape sequence `\\{}`", other))
 .code(DiagnosticCode::E_LEXER_INVALID_ESCAPE)
 .emit(self.handler);
 value.push(other);
 }
 }
 if !self.cursor.is_at_end() {
 self.cursor.advance();
 }
 continue;
 }
 value.push(c);
 self.cursor.advance();
 }

 if !terminated {
 self.handler
 .build_error(self.span(), "unterminated string literal")
 .code(DiagnosticCode::E_LEXER_UNTERMINATED_STRING)
 .emit(self.handler);
 }

 Token::Str(Symbol::intern(&value))
 }

 fn lex_operator_or_symbol(&mut self) -> Token {
 let c = self.cursor.current_char();
 self.cursor.advance();
 let next = self.cursor.current_char();

 macro_rules! two_char {
 ($second:expr, $tok:expr) => {
 if next == $second {
 self.cursor.advance();
 return $tok;
 }
 };
 }

 match c {
 '<' => {
 two_char!('=', Token::Le);
 two_char!('<', Token::Shl);
 Token::Lt
 }
 '>' => {
 two_char!('=', Token::Ge);
 two_char!('>', Token::Shr);
 Token::Gt
 }
 '=' => {
 two_char!('=', Token::EqEq);
 Token::Eq
 }
 '!' => {
 two_char!('=', Token::Ne);
 Token::Bang
 }
 '&' => {
 two_char!('&', Token::AndAnd);
 Token::Amp
 }
 '|' => {
 two_char!('|', Token::OrOr);
 Token::Pipe
 }
 '+' => {
 two_char!('=', Token::PlusEq);
 two_char!('+', Token::PlusPlus);
 Token::Plus
 }
 '-' => {
 two_char!('=', Token::MinusEq);
 two_char!('-', Token::MinusMinus);
 two_char!('>', Token::Arrow);
 Token::Minus
 }
 '*' => {
 two_char!('=', Token::StarEq);
 Token::Star
 }
 '/' => {
 two_char!('=', Token::SlashEq);
 Token::Slash
 }
 '%' => {
 two_char!('=', Token::PercentEq);
 Token::Percent
 }
 ':' => {
 two_char!(':', Token::ColonColon);
 Token::Colon
 }
 '(' => Token::LParen,
 ')' => Token::RParen,
 '{' => Token::LBrace,
 '}' => Token::RBrace,
 '[' => Token::LBracket,
 ']' => Token::RBracket,
 ';' => Token::Semi,
 ',' => Token::Comma,
 '.' => Token::Dot,
 '?' => Token::Question,
 other => {
 self.handler
 .build_error(self.span(), format!("unexpected character `{}`", other))
 .code(DiagnosticCode::E_LEXER_UNEXPECTED_CHAR)
 .emit(self.handler);
 Token::Invalid(other)
 }
 }
 }

 /// Current line (1-based).
 pub fn line(&self) -> u32 {
 self.cursor.line()
 }

 /// Current column (1-based).
 pub fn column(&self) -> u32 {
 self.cursor.column()
 }

 /// Current byte offset into the source.
 pub fn position(&self) -> usize {
 self.cursor.position()
 }
}

impl<'a> Iterator for Lexer<'a> {
 type Item = Token;

 fn next(&mut self) -> Option<Token> {
 match self.next_token() {
 Token::Eof => None,
 tok => Some(tok),
 }
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 fn lex_all(source: &str) -> Vec<Token> {
 let handler = Handler::new();
 let mut lexer = Lexer::new(source, &handler);
 let mut tokens = Vec::new();
 loop {
 let tok = lexer.next_token();
 if tok == Token::Eof {
 break;
 }
 tokens.push(tok);
 }
 tokens
 }

 #[test]
 fn test_keywords() {
 let toks = lex_all("Print let Fn ret if else while break continue switch case default loop call overlay");
 assert_eq!(
 toks,
 vec![
 Token::Print,
 Token::Let,
 Token::Fn,
 Token::Ret,
 Token::If,
 Token::Else,
 Token::While,
 Token::Break,
 Token::Continue,
 Token::Switch,
 Token::Case,
 Token::Default,
 Token::Loop,
 Token::Call,
 Token::Overlay,
 ]
 );
 }

 #[test]
 fn test_non_core_keyword_is_ident() {
 let toks = lex_all("open thread sin");
 assert_eq!(toks[0], Token::Ident(Symbol::intern("open")));
 assert_eq!(toks[1], Token::Ident(Symbol::intern("thread")));
 assert_eq!(toks[2], Token::Ident(Symbol::intern("sin")));
 }

 #[test]
 fn test_identifiers() {
 let toks = lex_all("foo _bar baz123");
 assert_eq!(toks[0], Token::Ident(Symbol::intern("foo")));
 assert_eq!(toks[1], Token::Ident(Symbol::intern("_bar")));
 assert_eq!(toks[2], Token::Ident(Symbol::intern("baz123")));
 }

 #[test]
 fn test_integer_literal() {
 assert_eq!(lex_all("42")[0], Token::Number(42));
 assert_eq!(lex_all("0")[0], Token::Number(0));
 }

 #[test]
 fn test_hex_binary_octal_literals() {
 assert_eq!(lex_all("0xFF")[0], Token::Number(255));
 assert_eq!(lex_all("0b1010")[0], Token::Number(10));
 assert_eq!(lex_all("0o17")[0], Token::Number(15));
 }

 #[test]
 fn test_float_literal() {
 assert_eq!(lex_all("3.14")[0], Token::Float(3.14));
 assert_eq!(lex_all("2.5e-3")[0], Token::Float(2.5e-3));
 assert_eq!(lex_all("1e10")[0], Token::Float(1e10));
 }

 #[test]
 fn test_int_then_dot_field_access_not_float() {
 let toks = lex_all("x.y");
 assert_eq!(toks, vec![Token::Ident(Symbol::intern("x")), Token::Dot, Token::Ident(Symbol::intern("y"))]);
 }

 #[test]
 fn test_string_literal() {
 assert_eq!(lex_all(r#""hello""#)[0], Token::Str(Symbol::intern("hello")));
 }

 #[test]
 fn test_string_escapes() {
 let toks = lex_all(r#""a\nb\t\"c\\d""#);
 assert_eq!(toks[0], Token::Str(Symbol::intern("a\nb\t\"c\\d")));
 }

 #[test]
 fn test_unterminated_string_reports_error_and_recovers() {
 let handler = Handler::new();
 let mut lexer = Lexer::new(r#""unterminated"#, &handler);
 let tok = lexer.next_token();
 assert_eq!(tok, Token::Str(Symbol::intern("unterminated")));
 assert!(handler.has_errors());
 }

 #[test]
 fn test_unexpected_character_reports_and_recovers() {
 let handler = Handler::new();
 let mut lexer = Lexer::new("@ let x", &handler);
 assert_eq!(lexer.next_token(), Token::Invalid('@'));
 assert!(handler.has_errors());
 assert_eq!(lexer.next_token(), Token::Let);
 }

 #[test]
 fn test_operators_longest_match() {
 let toks = lex_all("<= >= == != && || += -= *= /= %= ++ -- -> :: << >>");
 assert_eq!(
 toks,
 vec![
 Token::Le,
 Token::Ge,
 Token::EqEq,
 Token::Ne,
 Token::AndAnd,
 Token::OrOr,
 Token::PlusEq,
 Token::MinusEq,
 Token::StarEq,
 Token::SlashEq,
 Token::PercentEq,
 Token::PlusPlus,
 Token::MinusMinus,
 Token::Arrow,
 Token::ColonColon,
 Token::Shl,
 Token::Shr,
 ]
 );
 }

 #[test]
 fn test_single_char_operators_not_shadowed() {
 let toks = lex_all("< > = ! & | + - * / %");
 assert_eq!(
 toks,
 vec![
 Token::Lt,
 Token::Gt,
 Token::Eq,
 Token::Bang,
 Token::Amp,
 Token::Pipe,
 Token::Plus,
 Token::Minus,
 Token::Star,
 Token::Slash,
 Token::Percent,
 ]
 );
 }

 #[test]
 fn test_symbols() {
 let toks = lex_all("(){}[]=;,.:");
 assert_eq!(
 toks,
 vec![
 Token::LParen,
 Token::RParen,
 Token::LBrace,
 Token::RBrace,
 Token::LBracket,
 Token::RBracket,
 Token::Eq,
 Token::Semi,
 Token::Comma,
 Token::Colon,
 ]
 );
 }

 #[test]
 fn test_line_comment_slash_and_hash_skipped() {
 let toks = lex_all("let x // comment\n# another comment\nlet y");
 assert_eq!(toks, vec![Token::Let, Token::Ident(Symbol::intern("x")), Token::Let, Token::Ident(Symbol::intern("y"))]);
 }

 #[test]
 fn test_line_column_tracking_across_newlines() {
 let handler = Handler::new();
 let mut lexer = Lexer::new("let\nx", &handler);
 lexer.next_token();
 assert_eq!(lexer.line(), 1);
 let tok = lexer.next_token();
 assert_eq!(tok, Token::Ident(Symbol::intern("x")));
 assert_eq!(lexer.line(), 2);
 }

 #[test]
 fn test_empty_source_yields_eof() {
 let handler = Handler::new();
 let mut lexer = Lexer::new("", &handler);
 assert_eq!(lexer.next_token(), Token::Eof);
 }

 #[test]
 fn test_iterator_impl_stops_at_eof() {
 let handler = Handler::new();
 let lexer = Lexer::new("let x = 1;", &handler);
 let toks: Vec<Token> = lexer.collect();
 assert_eq!(toks.len(), 5);
 }

 #[test]
 fn test_bracket_sentinel_is_plain_symbols() {
 // `[end]` is not a distinct token kind; the parser recognizes the
 // bracket/ident/bracket sequence grammatically.
 let toks = lex_all("[ end ]");
 assert_eq!(toks, vec![Token::LBracket, Token::Ident(Symbol::intern("end")), Token::RBracket]);
 }
}
