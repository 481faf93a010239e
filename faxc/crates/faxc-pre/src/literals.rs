//! Inferred `Print` arguments, base-12 numeric conversion, and
//! repeated-literal macro extraction.

use crate::Preprocessor;
use faxc_lex::Token;
use faxc_util::{DiagnosticCode, FxHashMap, Handler, Span, Symbol};

impl Preprocessor {
 /// `Print` with no following expression or string is given the most
 /// recent string literal seen earlier in the stream, or a synthetic
 /// placeholder if none has appeared yet.
 pub(crate) fn infer_print_args(&mut self, tokens: Vec<(Token, Span)>) -> Vec<(Token, Span)> {
 let mut out = Vec::with_capacity(tokens.len());
 let mut last_str: Option<Symbol> = None;
 let mut i = 0;
 while i < tokens.len() {
 out.push(tokens[i].clone());
 if let Token::Str(s) = tokens[i].0 {
 last_str = Some(s);
 }
 if matches!(tokens[i].0, Token::Print) && !starts_an_argument(tokens.get(i + 1)) {
 let span = tokens[i].1;
 let inferred = last_str.unwrap_or_else(|| Symbol::intern("<no literal>"));
 out.push((Token::Str(inferred), span));
 }
 i += 1;
 }
 out
 }

 /// Merges an adjacent `Number` immediately followed by an `Ident`
 /// whose combined decimal-digit text contains at least one `a`/`b`
 /// into a single base-12-decoded `Number`. The lexer tokenizes a
 /// digit-leading lexeme like `12a3` as `Number(12)` then
 /// `Ident("a3")` (identifiers can't start with a digit), so the
 /// "identifier-shaped token" item 4 describes is
 /// this adjacent pair at the token-stream level the preprocessor
 /// actually sees.
 pub(crate) fn convert_base12(&self, tokens: Vec<(Token, Span)>) -> Vec<(Token, Span)> {
 let mut out = Vec::with_capacity(tokens.len());
 let mut i = 0;
 while i < tokens.len() {
 if let Token::Number(n) = tokens[i].0 {
 if n >= 0 {
 if let Some((Token::Ident(s), _)) = tokens.get(i + 1) {
 let combined = format!("{n}{}", s.as_str());
 if is_base12_shaped(&combined) {
 if let Ok(value) = i64::from_str_radix(&combined, 12) {
 out.push((Token::Number(value), tokens[i].1));
 i += 2;
 continue;
 }
 // Overflow: saturating-detect leaves the token unchanged.
 }
 }
 }
 }
 out.push(tokens[i].clone());
 i += 1;
 }
 out
 }

 /// For each distinct string literal directly following `Print` that
 /// appears ≥ 2 times, synthesizes `_CIAM_Print_K { Print "<lit>" }`
 /// hoisted to the top of the stream, and replaces every occurrence
 /// with `call _CIAM_Print_K[]`.
 pub(crate) fn extract_repeated_literals(&mut self, tokens: Vec<(Token, Span)>, handler: &Handler) -> Vec<(Token, Span)> {
 self.literal_counts.clear();
 for w in tokens.windows(2) {
 if let (Token::Print, (Token::Str(s), _)) = (&w[0].0, &w[1]) {
 *self.literal_counts.entry(*s).or_insert(0) += 1;
 }
 }

 let mut repeated: Vec<Symbol> = self
 .literal_counts
 .iter()
 .filter(|(_, &count)| count >= 2)
 .map(|(s, _)| *s)
 .collect();
 repeated.sort_unstable_by_key(|s| s.as_str());
 if repeated.is_empty() {
 return tokens;
 }

 let mut macro_names: FxHashMap<Symbol, Symbol> = FxHashMap::default();
 let mut out = Vec::new();
 for lit in repeated {
 let name = Symbol::intern(&format!("_CIAM_Print_{}", self.print_literal_counter));
 self.print_literal_counter += 1;
 self.known_fns.insert(name);
 macro_names.insert(lit, name);
 let span = Span::DUMMY;
 out.push((Token::Fn, span));
 out.push((Token::Ident(name), span));
 out.push((Token::LBrace, span));
 out.push((Token::Print, span));
 out.push((Token::Str(lit), span));
 out.push((Token::RBrace, span));
 handler
 .build_warning(span, format!("extracted repeated literal into `{}`", name.as_str()))
 .code(DiagnosticCode::W_PREPROCESSOR_LITERAL_EXTRACTED)
 .emit(handler);
 }

 out.reserve(tokens.len());
 let mut i = 0;
 while i < tokens.len() {
 if matches!(tokens[i].0, Token::Print) {
 if let Some((Token::Str(s), span)) = tokens.get(i + 1).cloned() {
 if let Some(&name) = macro_names.get(&s) {
 out.push((Token::Call, span));
 out.push((Token::Ident(name), span));
 out.push((Token::LBracket, span));
 out.push((Token::RBracket, span));
 i += 2;
 continue;
 }
 }
 }
 out.push(tokens[i].clone());
 i += 1;
 }
 out
 }
}

fn starts_an_argument(next: Option<&(Token, Span)>) -> bool {
 matches!(
 next.map(|(t, _)| t),
 Some(Token::Str(_))
 | Some(Token::Number(_))
 | Some(Token::Float(_))
 | Some(Token::Ident(_))
 | Some(Token::LParen)
 | Some(Token::Minus)
 | Some(Token::Bang)
 | Some(Token::Call)
 )
}

fn is_base12_shaped(s: &str) -> bool {
 let mut has_letter = false;
 for c in s.chars() {
 match c {
 '0'..='9' => {}
 'a' | 'b' | 'A' | 'B' => has_letter = true,
 _ => return false,
 }
 }
 has_letter
}
