//! Property-based tests over the lexer: generated ASCII identifiers and
//! integer literals should always round-trip to the token the grammar
//! expects, and lexing is deterministic across repeated runs of the same
//! source.

use faxc_util::Handler;
use faxc_lex::{Lexer, Token};
use proptest::prelude::*;

fn lex_all(source: &str) -> Vec<Token> {
 let handler = Handler::new();
 let mut lexer = Lexer::new(source, &handler);
 let mut tokens = Vec::new();
 loop {
 let token = lexer.next_token();
 if token == Token::Eof {
 break;
 }
 tokens.push(token);
 }
 tokens
}

proptest! {
 #[test]
 fn lexing_is_deterministic(source in "[a-zA-Z0-9_ +\\-*/=<>!&|]{0,64}") {
 prop_assert_eq!(lex_all(&source), lex_all(&source));
 }

 #[test]
 fn an_identifier_not_shadowed_by_a_core_keyword_lexes_to_a_single_ident_token(
 name in "[a-zA-Z_][a-zA-Z0-9_]{0,31}"
 ) {
 prop_assume!(Token::keyword_from_ident(&name).is_none());
 let tokens = lex_all(&name);
 prop_assert_eq!(tokens, vec![Token::Ident(faxc_util::Symbol::intern(&name))]);
 }

 #[test]
 fn a_nonnegative_integer_literal_round_trips_its_value(n in 0i64..1_000_000_000) {
 let tokens = lex_all(&n.to_string());
 prop_assert_eq!(tokens, vec![Token::Number(n)]);
 }

 #[test]
 fn whitespace_runs_never_produce_a_token(spaces in "[ \t]{0,16}") {
 prop_assert!(lex_all(&spaces).is_empty());
 }
}
