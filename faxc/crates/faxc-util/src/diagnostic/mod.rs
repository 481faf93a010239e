//! Diagnostic module - error and warning reporting infrastructure.
//!
//! This module provides types for creating, formatting, and reporting
//! compiler diagnostics (errors, warnings, and informational messages)
//! across every stage of the pipeline.
//!
//! # Examples
//!
//! ```
//! use faxc_util::diagnostic::{DiagnosticBuilder, Handler, Span, DiagnosticCode};
//!
//! let handler = Handler::new();
//! DiagnosticBuilder::error("unexpected token")
//! .code(DiagnosticCode::E_PARSER_UNEXPECTED_TOKEN)
//! .span(Span::DUMMY)
//! .help("check the statement syntax")
//! .emit(&handler);
//!
//! assert!(handler.has_errors());
//! ```

mod builder;
mod codes;
mod level;

pub use builder::{DiagnosticBuilder, SourceSnippet};
pub use codes::DiagnosticCode;
pub use level::{ColorConfig, LabelStyle, Level};

use crate::Span;
use std::cell::RefCell;

/// A diagnostic message with severity and location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
 /// Diagnostic severity level.
 pub level: Level,
 /// Main diagnostic message.
 pub message: String,
 /// Source location.
 pub span: Span,
 /// Optional diagnostic code.
 pub code: Option<DiagnosticCode>,
 /// Additional notes for context.
 pub notes: Vec<String>,
 /// Help suggestions for fixing the issue.
 pub helps: Vec<String>,
 /// Source code snippets for display.
 pub snippets: Vec<SourceSnippet>,
}

impl Diagnostic {
 /// Create a new diagnostic.
 pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
 Self {
 level,
 message: message.into(),
 span,
 code: None,
 notes: Vec::new(),
 helps: Vec::new(),
 snippets: Vec::new(),
 }
 }

 /// Create an informational diagnostic.
 pub fn info(message: impl Into<String>, span: Span) -> Self {
 Self::new(Level::Info, message, span)
 }

 /// Create a warning diagnostic.
 pub fn warning(message: impl Into<String>, span: Span) -> Self {
 Self::new(Level::Warning, message, span)
 }

 /// Create an error diagnostic.
 pub fn error(message: impl Into<String>, span: Span) -> Self {
 Self::new(Level::Error, message, span)
 }

 /// Create a fatal diagnostic.
 pub fn fatal(message: impl Into<String>, span: Span) -> Self {
 Self::new(Level::Fatal, message, span)
 }

 /// Set the diagnostic code.
 pub fn with_code(mut self, code: DiagnosticCode) -> Self {
 self.code = Some(code);
 self
 }

 /// Add a note to the diagnostic.
 pub fn with_note(mut self, note: impl Into<String>) -> Self {
 self.notes.push(note.into());
 self
 }

 /// Add a help suggestion.
 pub fn with_help(mut self, help: impl Into<String>) -> Self {
 self.helps.push(help.into());
 self
 }

 /// Add a source snippet.
 pub fn with_snippet(mut self, snippet: SourceSnippet) -> Self {
 self.snippets.push(snippet);
 self
 }
}

/// Aggregate error/warning counts produced by a single `Handler` run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
 /// Number of `Error` and `Fatal` diagnostics.
 pub errors: usize,
 /// Number of `Warning` diagnostics.
 pub warnings: usize,
}

impl Summary {
 /// Whether this summary should fail the compilation.
 pub fn is_failure(&self) -> bool {
 self.errors > 0
 }
}

/// Handler for collecting and reporting diagnostics.
///
/// A `Handler` is shared (by reference) across a single `compile()` call
/// and aggregates every diagnostic raised by every pipeline stage, so a
/// caller sees all available errors in one place rather than failing fast
/// at the first stage that finds a problem (except `Fatal`, which halts
/// the stage that raised it immediately).
pub struct Handler {
 diagnostics: RefCell<Vec<Diagnostic>>,
 panic_on_error: RefCell<bool>,
}

impl Handler {
 /// Create a new handler.
 pub fn new() -> Self {
 Self {
 diagnostics: RefCell::new(Vec::new()),
 panic_on_error: RefCell::new(false),
 }
 }

 /// Create a handler that panics when an error-or-worse diagnostic is
 /// emitted. Useful in unit tests that assert a code path never fails.
 pub fn new_panicking() -> Self {
 Self {
 diagnostics: RefCell::new(Vec::new()),
 panic_on_error: RefCell::new(true),
 }
 }

 fn emit(&self, diagnostic: Diagnostic) {
 if *self.panic_on_error.borrow() && diagnostic.level.is_error() {
 panic!("diagnostic error: {}", diagnostic.message);
 }
 self.diagnostics.borrow_mut().push(diagnostic);
 }

 /// Emit a pre-built diagnostic.
 pub fn emit_diagnostic(&self, diagnostic: Diagnostic) {
 self.emit(diagnostic);
 }

 /// Create a diagnostic builder for an error, pre-populated with a span.
 pub fn build_error(&self, span: Span, message: impl Into<String>) -> DiagnosticBuilder {
 DiagnosticBuilder::error(message).span(span)
 }

 /// Create a diagnostic builder for a warning, pre-populated with a span.
 pub fn build_warning(&self, span: Span, message: impl Into<String>) -> DiagnosticBuilder {
 DiagnosticBuilder::warning(message).span(span)
 }

 /// Create a diagnostic builder for an informational message.
 pub fn build_info(&self, span: Span, message: impl Into<String>) -> DiagnosticBuilder {
 DiagnosticBuilder::new(Level::Info, message).span(span)
 }

 /// Whether any `Error` or `Fatal` diagnostic has been reported.
 pub fn has_errors(&self) -> bool {
 self.diagnostics.borrow().iter().any(|d| d.level.is_error())
 }

 /// Number of `Error` and `Fatal` diagnostics reported so far.
 pub fn error_count(&self) -> usize {
 self.diagnostics.borrow().iter().filter(|d| d.level.is_error()).count()
 }

 /// Number of `Warning` diagnostics reported so far.
 pub fn warning_count(&self) -> usize {
 self.diagnostics.borrow().iter().filter(|d| d.level.is_warning()).count()
 }

 /// Snapshot of every diagnostic reported so far, in emission order.
 pub fn diagnostics(&self) -> Vec<Diagnostic> {
 self.diagnostics.borrow().clone()
 }

 /// Aggregate error/warning counts for this run.
 pub fn summary(&self) -> Summary {
 Summary {
 errors: self.error_count(),
 warnings: self.warning_count(),
 }
 }

 /// Clear all diagnostics.
 pub fn clear(&self) {
 self.diagnostics.borrow_mut().clear();
 }
}

impl Default for Handler {
 fn default() -> Self {
 Self::new()
 }
}
