//! Edge case tests for faxc-lex, kept separate from the ordinary cases in
//! `lexer.rs` so the exhaustive boundary-condition table doesn't crowd out
//! the representative per-token-form tests.

#[cfg(test)]
mod tests {
 use crate::{Lexer, Token};
 use faxc_util::Handler;

 fn lex_all(source: &str) -> Vec<Token> {
 let handler = Handler::new();
 let mut lexer = Lexer::new(source, &handler);
 let mut tokens = Vec::new();
 loop {
 let token = lexer.next_token();
 if token == Token::Eof { break; }
 tokens.push(token);
 }
 tokens
 }

 // ==================== EDGE CASES ====================

 #[test]
 fn test_edge_empty_source() {
 assert!(lex_all("").is_empty());
 }

 #[test]
 fn test_edge_single_char_ident() {
 let t = lex_all("x");
 assert_eq!(t[0], Token::Ident(faxc_util::Symbol::intern("x")));
 }

 #[test]
 fn test_edge_long_identifier() {
 let name = "a".repeat(10000);
 let t = lex_all(&format!("let {} = 1;", name));
 assert!(t.contains(&Token::Ident(faxc_util::Symbol::intern(&name))));
 }

 #[test]
 fn test_edge_core_keywords_not_idents() {
 let t = lex_all("Fn let if");
 assert_eq!(t[0], Token::Fn);
 assert_eq!(t[1], Token::Let);
 assert_eq!(t[2], Token::If);
 }

 #[test]
 fn test_edge_long_tail_keywords_stay_idents() {
 // `open`, `thread`, `struct` etc. are statement-keywords the
 // parser recognizes by text, not lexer-level keyword tokens.
 let t = lex_all("open thread struct sin");
 assert!(t.iter().all(|tok| matches!(tok, Token::Ident(_))));
 }

 #[test]
 fn test_edge_hex_bounds() {
 let t = lex_all("0x0 0xFF");
 assert_eq!(t[0], Token::Number(0));
 assert_eq!(t[1], Token::Number(255));
 }

 #[test]
 fn test_edge_binary() {
 let t = lex_all("0b0 0b1010");
 assert_eq!(t[1], Token::Number(10));
 }

 #[test]
 fn test_edge_octal() {
 let t = lex_all("0o0 0o77");
 assert_eq!(t[1], Token::Number(63));
 }

 #[test]
 fn test_edge_empty_string() {
 let t = lex_all("\"\"");
 if let Token::Str(s) = &t[0] {
 assert_eq!(s.as_str(), "");
 } else {
 panic!("expected Token::Str");
 }
 }

 #[test]
 fn test_edge_all_operators() {
 let t = lex_all("+ - * / % == != < > <= >= && || !");
 assert!(t.contains(&Token::Plus));
 assert!(t.contains(&Token::EqEq));
 }

 #[test]
 fn test_edge_all_delimiters() {
 let t = lex_all("( ) { } [ ] , ; : . ->");
 assert!(t.contains(&Token::LParen));
 assert!(t.contains(&Token::Arrow));
 }

 #[test]
 fn test_edge_nested_delimiters() {
 let t = lex_all("((()))");
 assert_eq!(t.iter().filter(|x| **x == Token::LParen).count(), 3);
 }

 #[test]
 fn test_edge_case_sensitivity() {
 // Core keywords are case-sensitive: "fn" (lowercase) is a plain
 // identifier, only "Fn" is the declaration keyword.
 let t = lex_all("Fn fn");
 assert_eq!(t[0], Token::Fn);
 assert_eq!(t[1], Token::Ident(faxc_util::Symbol::intern("fn")));
 }

 #[test]
 fn test_edge_scientific_notation() {
 let t = lex_all("1e10 1.5e-3");
 assert!(t.iter().all(|x| matches!(x, Token::Float(_))));
 }

 #[test]
 fn test_edge_large_integer_saturates_to_error() {
 let h = Handler::new();
 let t = Lexer::new("99999999999999999999999999", &h).next_token();
 assert_eq!(t, Token::Number(0));
 assert!(h.has_errors());
 }

 #[test]
 fn test_edge_all_core_keywords() {
 let t = lex_all("Print let Fn ret if else while break continue switch case default loop call overlay");
 assert_eq!(t.len(), 15);
 assert!(t.iter().all(|tok| tok.is_core_keyword()));
 }

 // ==================== ERROR CASES ====================

 #[test]
 fn test_err_invalid_hex_reports_diagnostic() {
 let h = Handler::new();
 let t = Lexer::new("0xZZ", &h).next_token();
 // `Z` is not a hex digit, so the digit run is empty; the token
 // still comes back as a (zero) number and lexing continues.
 assert!(matches!(t, Token::Number(_)));
 }

 #[test]
 fn test_err_unterminated_string() {
 let h = Handler::new();
 let _ = Lexer::new("\"unterminated", &h).next_token();
 assert!(h.has_errors());
 }

 #[test]
 fn test_err_invalid_chars_continue_lexing() {
 let h = Handler::new();
 let mut lex = Lexer::new("@ ` ~", &h);
 let mut count = 0;
 while lex.next_token() != Token::Eof {
 count += 1;
 }
 assert_eq!(count, 3);
 assert!(h.has_errors());
 }

 #[test]
 fn test_err_mixed_valid_invalid() {
 let h = Handler::new();
 let mut lex = Lexer::new("let x = 1; @ let y = 2;", &h);
 while lex.next_token() != Token::Eof {}
 assert!(h.has_errors());
 }

 #[test]
 fn test_edge_consecutive_operators_split_longest_match_first() {
 // `+++` lexes as `++` then `+`, not `+` `+` `+`.
 let t = lex_all("+++");
 assert_eq!(t, vec![Token::PlusPlus, Token::Plus]);
 }

 #[test]
 fn test_edge_whitespace_variations() {
 let t = lex_all("let\tx\n=\n1");
 assert!(t.contains(&Token::Let));
 assert!(t.contains(&Token::Number(1)));
 }

 #[test]
 fn test_edge_leading_zeros() {
 let t = lex_all("007");
 assert_eq!(t[0], Token::Number(7));
 }

 #[test]
 fn test_edge_bracket_sentinel_tolerated_as_plain_tokens() {
 // spec: `[end]` is not a distinct token kind, just balanced
 // brackets around an identifier, recognized grammatically later.
 let t = lex_all("ret 1 [ end ]");
 assert_eq!(
 t,
 vec![
 Token::Ret,
 Token::Number(1),
 Token::LBracket,
 Token::Ident(faxc_util::Symbol::intern("end")),
 Token::RBracket,
 ]
 );
 }

 #[test]
 fn test_edge_hash_and_slash_slash_comments_both_skipped() {
 let t = lex_all("let x // c++ style\n# shell style\nlet y");
 assert_eq!(
 t,
 vec![
 Token::Let,
 Token::Ident(faxc_util::Symbol::intern("x")),
 Token::Let,
 Token::Ident(faxc_util::Symbol::intern("y")),
 ]
 );
 }
}
