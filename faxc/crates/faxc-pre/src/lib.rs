//! faxc-pre — C2 Preprocessor.
//!
//! Rewrites the lexed token stream before it ever reaches `faxc-par`,
//! [`Preprocessor`] is a value: every piece of
//! cross-transformation bookkeeping (the known-function inventory, the
//! recorded overlay names, literal occurrence counts, the sandbox and
//! repeated-literal counters) is a field on it, not ambient module
//! state — the same "no process-wide mutable state" redesign flag
//! `faxc-par`'s `Parser` follows.
//!
//! The six transformations run in a fixed order, each its
//! own method returning the rewritten token vector, so that running the
//! whole chain twice on its own output is idempotent (Testable
//! Property 2): directive gating, function-name inventory, built-in
//! directive expansion, base-12 numeric conversion, repeated-literal
//! macro extraction, and call-site typo correction. Inferred `Print`
//! arguments run as an
//! extra pass between built-in expansion and base-12 conversion, since
//! the literal-extraction pass needs every `Print` to already carry an
//! explicit string argument.

mod directives;
mod literals;
mod typo;

use faxc_lex::Token;
use faxc_util::{FxHashMap, FxHashSet, Handler, Span, Symbol};

/// Preprocessor state threaded through one translation unit's
/// transformation chain.
#[derive(Default)]
pub struct Preprocessor {
 known_fns: FxHashSet<Symbol>,
 overlay_names: Vec<Symbol>,
 literal_counts: FxHashMap<Symbol, u32>,
 sandbox_counter: u32,
 print_literal_counter: u32,
}

impl Preprocessor {
 pub fn new() -> Self {
 Self::default()
 }

 /// Runs the full transformation chain over `tokens`. If no `call
 /// CIAM on` directive is present anywhere in the stream,
 /// preprocessing is a no-op and `tokens` is returned unchanged
 /// (Testable Property 3).
 pub fn process(&mut self, tokens: Vec<(Token, Span)>, handler: &Handler) -> Vec<(Token, Span)> {
 let (enabled, tokens) = self.gate_directives(tokens);
 if !enabled {
 return tokens;
 }
 self.collect_known_fns(&tokens);
 let tokens = self.expand_builtin_directives(tokens, handler);
 let tokens = self.infer_print_args(tokens);
 let tokens = self.convert_base12(tokens);
 let tokens = self.extract_repeated_literals(tokens, handler);
 self.correct_typos(tokens, handler)
 }
}

#[cfg(test)]
mod edge_cases;
