//! Directive gating, the function-name inventory, and built-in `CIAM`
//! directive expansion.

use crate::Preprocessor;
use faxc_lex::Token;
use faxc_util::{DiagnosticCode, Handler, Span, Symbol};

impl Preprocessor {
 /// Scans for `call CIAM on`/`call CIAM off` triples. If at least one
 /// `on` occurs anywhere in the stream, preprocessing is enabled and
 /// every matched triple (on or off) is excised; otherwise the input
 /// is returned completely untouched, matching "preprocessor output
 /// equals the input byte-for-byte" when disabled.
 pub(crate) fn gate_directives(&self, tokens: Vec<(Token, Span)>) -> (bool, Vec<(Token, Span)>) {
 let enabled = tokens.windows(3).any(|w| is_ciam_onoff(w, "on"));
 if !enabled {
 return (false, tokens);
 }

 let mut out = Vec::with_capacity(tokens.len());
 let mut i = 0;
 while i < tokens.len() {
 if i + 2 < tokens.len() && (is_ciam_onoff(&tokens[i..i + 3], "on") || is_ciam_onoff(&tokens[i..i + 3], "off")) {
 i += 3;
 continue;
 }
 out.push(tokens[i].clone());
 i += 1;
 }
 (true, out)
 }

 /// Collects every `Fn <identifier>` pair into the known-function set
 /// used by base-12-adjacent typo correction later in the chain.
 pub(crate) fn collect_known_fns(&mut self, tokens: &[(Token, Span)]) {
 for w in tokens.windows(2) {
 if let (Token::Fn, (Token::Ident(name), _)) = (&w[0].0, &w[1]) {
 self.known_fns.insert(*name);
 }
 }
 }

 /// Rewrites `CIAM <cmd> [ ... ]` / `CIAM <cmd> { ... }` directives.
 /// A recognized `cmd` with malformed (missing) delimiters, or an
 /// unrecognized `cmd`, is left untouched — unrecognized constructs
 /// always pass through rather than aborting preprocessing.
 pub(crate) fn expand_builtin_directives(&mut self, tokens: Vec<(Token, Span)>, handler: &Handler) -> Vec<(Token, Span)> {
 let mut out = Vec::with_capacity(tokens.len());
 let mut i = 0;
 while i < tokens.len() {
 let is_ciam = matches!(&tokens[i].0, Token::Ident(s) if s.as_str() == "CIAM");
 if is_ciam {
 if let Some((Token::Ident(cmd), _)) = tokens.get(i + 1).cloned() {
 let span = tokens[i].1;
 let delim = tokens.get(i + 2).map(|(t, _)| t.clone());
 match (cmd.as_str(), &delim) {
 ("write_stdout", Some(Token::LBrace)) => {
 let (start, end) = scan_balanced(&tokens, i + 2);
 let text = render_body_text(&tokens[start..end]);
 out.push((Token::Print, span));
 out.push((Token::Str(Symbol::intern(&text)), span));
 i = end + 1;
 continue;
 }
 ("overlay", Some(Token::LBracket)) => {
 let (start, end) = scan_balanced(&tokens, i + 2);
 if let Some((Token::Ident(name), _)) = tokens.get(start) {
 self.overlay_names.push(*name);
 }
 i = end + 1;
 continue;
 }
 ("inspect", Some(Token::LBracket)) => {
 let (start, end) = scan_balanced(&tokens, i + 2);
 let target = tokens.get(start).and_then(|(t, _)| match t {
 Token::Ident(s) => Some(s.as_str()),
 _ => None,
 });
 let report = self.render_inspect_report(target.unwrap_or("symbols"));
 out.push((Token::Print, span));
 out.push((Token::Str(Symbol::intern(&report)), span));
 i = end + 1;
 continue;
 }
 ("sandbox", Some(Token::LBrace)) => {
 let (start, end) = scan_balanced(&tokens, i + 2);
 let name = Symbol::intern(&format!("_CIAM_sandbox_{}", self.sandbox_counter));
 self.sandbox_counter += 1;
 self.known_fns.insert(name);
 out.push((Token::Fn, span));
 out.push((Token::Ident(name), span));
 out.push((Token::LBrace, span));
 out.extend(tokens[start..end].iter().cloned());
 out.push((Token::RBrace, span));
 out.push((Token::Call, span));
 out.push((Token::Ident(name), span));
 out.push((Token::LBracket, span));
 out.push((Token::RBracket, span));
 i = end + 1;
 continue;
 }
 ("audit", Some(Token::LBracket)) => {
 let (_, end) = scan_balanced(&tokens, i + 2);
 let report = self.render_audit_report();
 out.push((Token::Print, span));
 out.push((Token::Str(Symbol::intern(&report)), span));
 i = end + 1;
 continue;
 }
 _ => {
 handler
 .build_warning(span, format!("unrecognized CIAM directive `{}`", cmd.as_str()))
 .code(DiagnosticCode::E_PREPROCESSOR_UNKNOWN_DIRECTIVE)
 .emit(handler);
 }
 }
 }
 }
 out.push(tokens[i].clone());
 i += 1;
 }
 out
 }

 fn render_inspect_report(&self, target: &str) -> String {
 match target {
 "overlays" => {
 let names: Vec<&str> = self.overlay_names.iter().map(|s| s.as_str()).collect();
 format!("overlays: {}", names.join(", "))
 }
 _ => {
 let mut names: Vec<&str> = self.known_fns.iter().map(|s| s.as_str()).collect();
 names.sort_unstable();
 format!("{target}: {}", names.join(", "))
 }
 }
 }

 fn render_audit_report(&self) -> String {
 let mut fns: Vec<&str> = self.known_fns.iter().map(|s| s.as_str()).collect();
 fns.sort_unstable();
 let overlays: Vec<&str> = self.overlay_names.iter().map(|s| s.as_str()).collect();
 format!("functions: {} | overlays: {}", fns.join(", "), overlays.join(", "))
 }
}

fn is_ciam_onoff(window: &[(Token, Span)], onoff: &str) -> bool {
 matches!(
 (&window[0].0, &window[1].0, &window[2].0),
 (Token::Call, Token::Ident(a), Token::Ident(b))
 if a.as_str() == "CIAM" && b.as_str() == onoff
 )
}

/// Scans a `{ ... }` or `[ ... ]` region starting at `tokens[open_idx]`
/// (assumed to be the opening delimiter) and returns `(content_start,
/// content_end)`, where `tokens[content_end]` is the matching closing
/// delimiter.
pub(crate) fn scan_balanced(tokens: &[(Token, Span)], open_idx: usize) -> (usize, usize) {
 let open = tokens[open_idx].0.clone();
 let close = match open {
 Token::LBrace => Token::RBrace,
 Token::LBracket => Token::RBracket,
 _ => return (open_idx + 1, open_idx + 1),
 };
 let mut depth = 0i32;
 let mut i = open_idx;
 while i < tokens.len() {
 if tokens[i].0 == open {
 depth += 1;
 } else if tokens[i].0 == close {
 depth -= 1;
 if depth == 0 {
 return (open_idx + 1, i);
 }
 } else if matches!(tokens[i].0, Token::Eof) {
 return (open_idx + 1, i);
 }
 i += 1;
 }
 (open_idx + 1, tokens.len())
}

fn render_body_text(tokens: &[(Token, Span)]) -> String {
 tokens.iter().map(|(t, _)| t.to_string()).collect::<Vec<_>>().join(" ")
}
