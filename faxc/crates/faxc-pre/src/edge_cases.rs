//! Edge case tests for faxc-pre.

use crate::Preprocessor;
use faxc_lex::{Lexer, Token};
use faxc_util::{Handler, Span};

fn lex(source: &str) -> Vec<(Token, Span)> {
 let handler = Handler::new();
 let mut lexer = Lexer::new(source, &handler);
 let mut tokens = Vec::new();
 loop {
 let (tok, span) = lexer.next_spanned();
 let is_eof = tok.is_eof();
 tokens.push((tok, span));
 if is_eof {
 break;
 }
 }
 tokens
}

fn kinds(tokens: &[(Token, Span)]) -> Vec<Token> {
 tokens.iter().map(|(t, _)| t.clone()).collect()
}

#[test]
fn disabled_preprocessing_returns_input_unchanged() {
 let handler = Handler::new();
 let tokens = lex(r#"Fn main() { Print "hi" }"#);
 let mut pre = Preprocessor::new();
 let out = pre.process(tokens.clone(), &handler);
 assert_eq!(kinds(&out), kinds(&tokens));
}

#[test]
fn on_directive_enables_and_is_excised() {
 let handler = Handler::new();
 let tokens = lex(r#"call CIAM on Fn main() { Print "hi" }"#);
 let mut pre = Preprocessor::new();
 let out = pre.process(tokens, &handler);
 assert!(!out.iter().any(|(t, _)| matches!(t, Token::Call)));
}

#[test]
fn preprocessing_is_idempotent() {
 let handler = Handler::new();
 let tokens = lex(r#"call CIAM on Fn main() { Print "hi" Print "hi" }"#);
 let mut pre = Preprocessor::new();
 let once = pre.process(tokens, &handler);
 let mut pre2 = Preprocessor::new();
 let twice = pre2.process(once.clone(), &handler);
 assert_eq!(kinds(&once), kinds(&twice));
}

#[test]
fn repeated_print_literal_is_extracted_into_a_macro() {
 let handler = Handler::new();
 let tokens = lex(r#"call CIAM on Fn main() { Print "hi" Print "hi" Print "hi" }"#);
 let mut pre = Preprocessor::new();
 let out = pre.process(tokens, &handler);
 let fn_count = out.iter().filter(|(t, _)| matches!(t, Token::Fn)).count();
 assert_eq!(fn_count, 2, "expected the extracted macro plus `main`");
 let call_count = out.iter().filter(|(t, _)| matches!(t, Token::Call)).count();
 assert_eq!(call_count, 3);
}

#[test]
fn base12_pair_is_folded_into_a_single_number() {
 let handler = Handler::new();
 // `12a3` lexes as Number(12) then Ident("a3"); base-12 `12a3` = digits
 // 1,2,10,3 => 1*12^3 + 2*12^2 + 10*12 + 3 = 1728 + 288 + 120 + 3 = 2139.
 let tokens = lex(r#"call CIAM on Fn f() { let x = 12a3 }"#);
 let mut pre = Preprocessor::new();
 let out = pre.process(tokens, &handler);
 let numbers: Vec<i64> = out
 .iter()
 .filter_map(|(t, _)| match t {
 Token::Number(n) => Some(*n),
 _ => None,
 })
 .collect();
 assert!(numbers.contains(&2139));
}

#[test]
fn call_typo_within_distance_two_is_corrected() {
 let handler = Handler::new();
 let tokens = lex(r#"call CIAM on Fn compute() { ret 1 } Fn main() { call compuet }"#);
 let mut pre = Preprocessor::new();
 let out = pre.process(tokens, &handler);
 assert!(out.iter().any(|(t, _)| matches!(t, Token::Ident(s) if s.as_str() == "compute")));
 assert!(!handler.has_errors());
}

#[test]
fn sandbox_directive_hoists_a_function_and_calls_it() {
 let handler = Handler::new();
 let tokens = lex(r#"call CIAM on CIAM sandbox { Print "inside" }"#);
 let mut pre = Preprocessor::new();
 let out = pre.process(tokens, &handler);
 assert!(out.iter().any(|(t, _)| matches!(t, Token::Fn)));
 assert!(out.iter().any(|(t, _)| matches!(t, Token::Call)));
}

#[test]
fn write_stdout_directive_becomes_a_print_statement() {
 let handler = Handler::new();
 let tokens = lex(r#"call CIAM on CIAM write_stdout { hello world }"#);
 let mut pre = Preprocessor::new();
 let out = pre.process(tokens, &handler);
 assert!(matches!(out[0].0, Token::Print));
 assert!(matches!(&out[1].0, Token::Str(s) if s.as_str().contains("hello")));
}

#[test]
fn print_with_no_argument_infers_the_last_string_literal() {
 let handler = Handler::new();
 let tokens = lex(r#"call CIAM on Fn main() { Print "first" Print }"#);
 let mut pre = Preprocessor::new();
 let out = pre.process(tokens, &handler);
 let strs: Vec<&str> = out
 .iter()
 .filter_map(|(t, _)| match t {
 Token::Str(s) => Some(s.as_str()),
 _ => None,
 })
 .collect();
 assert_eq!(strs, vec!["first", "first"]);
}
