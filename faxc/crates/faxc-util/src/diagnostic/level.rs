//! Diagnostic severity levels and label styles.
//!
//! This module provides types for categorizing diagnostic severity and
//! the visual style of span labels in multi-span diagnostics.
//!
//! # Examples
//!
//! ```
//! use faxc_util::diagnostic::{Level, LabelStyle};
//!
//! assert!(Level::Error.is_error());
//! assert!(!Level::Warning.is_error());
//!
//! assert_eq!(LabelStyle::Primary.as_str(), "^");
//! assert_eq!(LabelStyle::Secondary.as_str(), "-");
//! ```

use std::fmt;

/// Diagnostic severity level.
///
/// Four levels, matching what a single translation unit can report:
/// informational pipeline statistics, warnings that leave compilation
/// running, errors that fail the run but let other diagnostics surface
/// first, and fatal errors that halt the pipeline at the stage that
/// raised them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
 /// Informational message (e.g. pass statistics, verbose pipeline trace).
 Info,
 /// A warning that doesn't prevent compilation.
 Warning,
 /// An error that fails the compilation but does not stop other stages
 /// from reporting further diagnostics in the same run.
 Error,
 /// A fatal error that halts the pipeline at the stage that raised it.
 Fatal,
}

impl Level {
 /// Returns true if this level represents an error (`Error` or `Fatal`).
 #[inline]
 pub const fn is_error(&self) -> bool {
 matches!(self, Level::Error | Level::Fatal)
 }

 /// Returns true if this level represents a warning.
 #[inline]
 pub const fn is_warning(&self) -> bool {
 matches!(self, Level::Warning)
 }

 /// Returns true if this level is purely informational.
 #[inline]
 pub const fn is_info(&self) -> bool {
 matches!(self, Level::Info)
 }

 /// Returns true if this level should halt the pipeline immediately.
 #[inline]
 pub const fn is_fatal(&self) -> bool {
 matches!(self, Level::Fatal)
 }

 /// Returns the canonical name for this level.
 #[inline]
 pub const fn name(&self) -> &'static str {
 match self {
 Level::Info => "info",
 Level::Warning => "warning",
 Level::Error => "error",
 Level::Fatal => "fatal error",
 }
 }

 /// Returns the ANSI color code for this level.
 #[inline]
 pub const fn color_code(&self) -> Option<&'static str> {
 match self {
 Level::Info => Some("36"), // Cyan
 Level::Warning => Some("33"), // Yellow
 Level::Error => Some("31"), // Red
 Level::Fatal => Some("35"), // Magenta
 }
 }

 /// Returns the intensity modifier for terminal output.
 #[inline]
 pub const fn intensity(&self) -> &'static str {
 match self {
 Level::Error | Level::Fatal => "1", // Bold
 _ => "0",
 }
 }

 /// Returns a short single-character indicator for this level.
 #[inline]
 pub const fn indicator(&self) -> &'static str {
 match self {
 Level::Info => "I",
 Level::Warning => "W",
 Level::Error => "E",
 Level::Fatal => "!",
 }
 }
}

impl fmt::Display for Level {
 fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
 write!(f, "{}", self.name())
 }
}

/// Style for span labels in multi-span diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelStyle {
 /// Primary span, the main location of the issue. Drawn with `^`.
 Primary,
 /// Secondary span, additional related context. Drawn with `-`.
 Secondary,
}

impl LabelStyle {
 /// Returns the underline character for this style.
 #[inline]
 pub const fn underline_char(&self) -> char {
 match self {
 LabelStyle::Primary => '^',
 LabelStyle::Secondary => '-',
 }
 }

 /// Returns the string representation for formatting.
 #[inline]
 pub const fn as_str(&self) -> &'static str {
 match self {
 LabelStyle::Primary => "^",
 LabelStyle::Secondary => "-",
 }
 }

 /// Returns true if this is a primary label.
 #[inline]
 pub const fn is_primary(&self) -> bool {
 matches!(self, LabelStyle::Primary)
 }

 /// Returns true if this is a secondary label.
 #[inline]
 pub const fn is_secondary(&self) -> bool {
 matches!(self, LabelStyle::Secondary)
 }
}

impl fmt::Display for LabelStyle {
 fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
 write!(f, "{}", self.as_str())
 }
}

/// Color configuration for diagnostic rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ColorConfig {
 /// Automatically detect terminal color support.
 #[default]
 Auto,
 /// Always use colors, even in pipes.
 Always,
 /// Never use colors.
 Never,
}

impl ColorConfig {
 /// Returns true if colors should be used for the given environment.
 pub fn use_color(&self, is_tty: bool) -> bool {
 match self {
 ColorConfig::Auto => is_tty,
 ColorConfig::Always => true,
 ColorConfig::Never => false,
 }
 }

 /// Returns true if this configuration unconditionally enables colors.
 pub const fn is_enabled(&self) -> bool {
 matches!(self, ColorConfig::Always)
 }
}
