//! Diagnostic codes for categorizing compiler errors and warnings.
//!
//! This module provides the [`DiagnosticCode`] type for uniquely identifying
//! diagnostic messages, enabling users to look up documentation and suppress
//! specific warnings.
//!
//! # Examples
//!
//! ```
//! use faxc_util::diagnostic::DiagnosticCode;
//!
//! let code = DiagnosticCode::E_LEXER_UNEXPECTED_CHAR;
//! assert_eq!(code.prefix(), "E");
//! assert_eq!(code.as_str(), "E1001");
//! ```

/// A unique code identifying a diagnostic message.
///
/// Codes follow the format `{prefix}{number}` where `prefix` is `"E"` for
/// errors or `"W"` for warnings and `number` is a 4-digit identifier. Codes
/// are grouped by pipeline stage: 1xxx lexer, 15xx preprocessor, 2xxx
/// parser, 3xxx semantic analysis, 4xxx mid-IR/optimization, 5xxx codegen
/// and binary emission.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
 /// The prefix (`"E"` for error, `"W"` for warning).
 pub prefix: &'static str,
 /// The numeric identifier.
 pub number: u32,
}

impl DiagnosticCode {
 /// Create a new diagnostic code.
 #[inline]
 pub const fn new(prefix: &'static str, number: u32) -> Self {
 Self { prefix, number }
 }

 /// Get the prefix.
 #[inline]
 pub const fn prefix(&self) -> &'static str {
 self.prefix
 }

 /// Get the numeric identifier.
 #[inline]
 pub const fn number(&self) -> u32 {
 self.number
 }

 /// Get the full code string (e.g. `"E1001"`).
 pub fn as_str(&self) -> String {
 format!("{}{:04}", self.prefix, self.number)
 }

 // ------------------------------------------------------------------
 // Lexer (C1), 1001-1099
 // ------------------------------------------------------------------
 /// E1001: Unexpected character in input.
 pub const E_LEXER_UNEXPECTED_CHAR: Self = Self::new("E", 1001);
 /// E1002: Unterminated string literal.
 pub const E_LEXER_UNTERMINATED_STRING: Self = Self::new("E", 1002);
 /// E1003: Invalid numeric literal.
 pub const E_LEXER_INVALID_NUMBER: Self = Self::new("E", 1003);
 /// E1004: Invalid escape sequence in a string literal.
 pub const E_LEXER_INVALID_ESCAPE: Self = Self::new("E", 1004);

 // ------------------------------------------------------------------
 // Preprocessor (C2), 1501-1599
 // ------------------------------------------------------------------
 /// E1501: Unknown built-in directive.
 pub const E_PREPROCESSOR_UNKNOWN_DIRECTIVE: Self = Self::new("E", 1501);
 /// W1502: Directive name corrected via typo suggestion.
 pub const W_PREPROCESSOR_TYPO_CORRECTED: Self = Self::new("W", 1502);
 /// W1503: Literal extracted into a preprocessor-synthesized binding.
 pub const W_PREPROCESSOR_LITERAL_EXTRACTED: Self = Self::new("W", 1503);

 // ------------------------------------------------------------------
 // Parser (C4), 2001-2099
 // ------------------------------------------------------------------
 /// E2001: Unexpected token.
 pub const E_PARSER_UNEXPECTED_TOKEN: Self = Self::new("E", 2001);
 /// E2002: Expected a specific token but found another.
 pub const E_PARSER_EXPECTED_TOKEN: Self = Self::new("E", 2002);
 /// E2003: Unexpected end of file.
 pub const E_PARSER_UNEXPECTED_EOF: Self = Self::new("E", 2003);
 /// E2004: Duplicate function definition.
 pub const E_PARSER_DUPLICATE_DEF: Self = Self::new("E", 2004);
 /// E2005: Malformed parameter list.
 pub const E_PARSER_MALFORMED_PARAMS: Self = Self::new("E", 2005);
 /// W2006: Unbalanced `[end]` sentinel tolerated.
 pub const W_PARSER_UNBALANCED_END: Self = Self::new("W", 2006);

 // ------------------------------------------------------------------
 // Semantic analysis (C5/C6), 3001-3099
 // ------------------------------------------------------------------
 /// E3001: Type mismatch.
 pub const E_SEMANTIC_TYPE_MISMATCH: Self = Self::new("E", 3001);
 /// E3002: Reference to an undefined variable.
 pub const E_SEMANTIC_UNDEFINED_VAR: Self = Self::new("E", 3002);
 /// E3003: Call to an undefined function.
 pub const E_SEMANTIC_UNDEFINED_FN: Self = Self::new("E", 3003);
 /// E3004: Wrong argument count at a call site.
 pub const E_SEMANTIC_ARITY_MISMATCH: Self = Self::new("E", 3004);
 /// W3005: Unused `let` binding.
 pub const W_SEMANTIC_UNUSED_VARIABLE: Self = Self::new("W", 3005);
 /// W3006: Unused function.
 pub const W_SEMANTIC_UNUSED_FUNCTION: Self = Self::new("W", 3006);
 /// W3007: Statement unreachable after `ret`/`break`/`continue`.
 pub const W_SEMANTIC_DEAD_CODE: Self = Self::new("W", 3007);
 /// E3008: `break`/`continue` outside of a loop.
 pub const E_SEMANTIC_LOOP_CONTROL_OUTSIDE_LOOP: Self = Self::new("E", 3008);
 /// E3009: A syntactically valid construct with no defined semantics
 /// in this translation unit's context.
 pub const E_SEMANTIC_UNSUPPORTED_CONSTRUCT: Self = Self::new("E", 3009);

 // ------------------------------------------------------------------
 // Mid-IR / optimization pipeline (C6-C8), 4001-4099
 // ------------------------------------------------------------------
 /// E4001: Optimization pass produced an ill-formed module (internal).
 pub const E_MIR_INVARIANT_VIOLATION: Self = Self::new("E", 4001);
 /// W4002: Static out-of-bounds array access detected and eliminated.
 pub const W_MIR_BOUNDS_ELIMINATED: Self = Self::new("W", 4002);

 // ------------------------------------------------------------------
 // Codegen / binary emission (C9/C10), 5001-5099
 // ------------------------------------------------------------------
 /// E5001: Register allocation failed to find a feasible coloring.
 pub const E_CODEGEN_ALLOCATION_FAILED: Self = Self::new("E", 5001);
 /// E5002: Requested output format/target combination is unsupported.
 pub const E_CODEGEN_UNSUPPORTED_TARGET: Self = Self::new("E", 5002);
 /// Fatal 5003: Binary emission failed partway through (partial output discarded).
 pub const F_CODEGEN_EMIT_FAILED: Self = Self::new("E", 5003);
}

impl std::fmt::Debug for DiagnosticCode {
 fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
 write!(f, "DiagnosticCode({})", self.as_str())
 }
}

impl std::fmt::Display for DiagnosticCode {
 fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
 write!(f, "{}", self.as_str())
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn test_new_code() {
 let code = DiagnosticCode::new("E", 1001);
 assert_eq!(code.prefix(), "E");
 assert_eq!(code.number(), 1001);
 }

 #[test]
 fn test_as_str() {
 assert_eq!(DiagnosticCode::new("E", 1).as_str(), "E0001");
 assert_eq!(DiagnosticCode::new("W", 1).as_str(), "W0001");
 assert_eq!(DiagnosticCode::E_LEXER_UNEXPECTED_CHAR.as_str(), "E1001");
 }

 #[test]
 fn test_display_and_debug() {
 let code = DiagnosticCode::E_PARSER_UNEXPECTED_TOKEN;
 assert_eq!(format!("{}", code), "E2001");
 assert_eq!(format!("{:?}", code), "DiagnosticCode(E2001)");
 }

 #[test]
 fn test_pipeline_stage_codes() {
 assert_eq!(DiagnosticCode::E_LEXER_UNEXPECTED_CHAR.prefix(), "E");
 assert_eq!(DiagnosticCode::E_PREPROCESSOR_UNKNOWN_DIRECTIVE.number(), 1501);
 assert_eq!(DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH.number(), 3001);
 assert_eq!(DiagnosticCode::E_CODEGEN_ALLOCATION_FAILED.prefix(), "E");
 }

 #[test]
 fn test_code_equality() {
 let a = DiagnosticCode::new("E", 1001);
 let b = DiagnosticCode::new("E", 1001);
 let c = DiagnosticCode::new("E", 1002);
 assert_eq!(a, b);
 assert_ne!(a, c);
 }
}
