//! faxc-lex - Lexical Analyzer (Lexer/Tokenizer)
//!
//! ============================================================================
//! LEXICAL ANALYSIS THEORY
//! ============================================================================
//!
//! Lexical analysis is the first phase of compilation. It transforms a stream
//! of characters into a stream of tokens ("tokenization" or "scanning").
//!
//! FORMAL DEFINITION:
//! ------------------
//! Let Σ be the alphabet (set of all valid characters).
//! Let Σ* be the set of all strings over Σ.
//!
//! The lexer is a function:
//! L: Σ* → T*
//! where T is the set of tokens.
//!
//! PROPERTIES:
//! -----------
//! - Linear time complexity: O(n) where n = input length
//! - Single-pass processing
//! - Context-free (doesn't consider surrounding tokens)
//!
//! LEXEME vs TOKEN:
//! ----------------
//! - Lexeme: the actual string of characters (e.g., "let", "123", "+")
//! - Token: the abstract category + metadata (e.g., Token::Let, Token::Number(123))
//!
//! ```text
//! Source: "let x = 42;"
//!
//! Lexemes: "let", " ", "x", " ", "=", " ", "42", ";"
//! Tokens: [Let] [Ident("x")] [Eq] [Number(42)] [Semi] [Eof]
//! ↑ skipping whitespace
//! ```
//!
//! Only the 15 control-flow/declaration words the grammar dispatches on at
//! the token level (`Print let Fn ret if else while break continue switch
//! case default loop call overlay`) are keyword token variants. The long
//! tail of statement keywords (`open write struct thread sin cos ...`)
//! stays `Token::Ident` and is dispatched by lexeme text in the parser,
//! since the lexer alone has no grammatical context to disambiguate
//! `open` the statement head from `open` used as an ordinary identifier.
//!
//! LINE TABLE:
//! -----------
//! `Cursor` tracks line/column incrementally as it advances, rather than
//! building a separate offset table; `faxc_util::span::SourceMap` owns the
//! binary-searchable line table used for rendering diagnostics after the
//! fact.

pub mod cursor;
pub mod lexer;
pub mod token;
pub mod unicode;

#[cfg(test)]
mod edge_cases;

pub use lexer::Lexer;
pub use token::Token;
