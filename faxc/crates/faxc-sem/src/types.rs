//! The type lattice used by semantic analysis and Mid-IR.
//!
//! Kept intentionally small: the source language has no generics, traits,
//! or user-polymorphism, so there is no inference-variable substitution
//! machinery here beyond the single-slot `auto`-parameter resolution
//! (tracked in [`TypeContext`], not in `Type` itself).

use faxc_util::Symbol;
use std::collections::HashMap;

/// A concrete Mid-IR type, or `Auto`/`Error` for not-yet-resolved or
/// poisoned spots in source-level type checking.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
 /// Recovery type for an expression whose real type could not be
 /// determined; poisons propagate through folding.
 Error,
 /// `auto`-typed parameter, not yet resolved by a call site.
 Auto,
 /// No value (statement position, `ret` with no expression).
 Void,
 Bool,
 Int8,
 UInt8,
 Int16,
 UInt16,
 Int32,
 UInt32,
 Int64,
 UInt64,
 Float32,
 Float64,
 /// Interned string / byte-buffer handle; lowers to pointer type.
 Pointer,
 /// A named aggregate (`struct`/`enum`/`union`) or a `typedef` alias,
 /// referenced by the name it was declared with.
 Named(Symbol),
 /// A SIMD vector of `lanes` (power-of-two) elements of `elem`.
 Vector { elem: Box<Type>, lanes: u32 },
}

impl Type {
 /// The default integer type for untyped integer literals and
 /// `Auto`-less locals.
 pub const INT: Type = Type::Int64;

 pub fn is_integer(&self) -> bool {
 matches!(
 self,
 Type::Int8
 | Type::UInt8
 | Type::Int16
 | Type::UInt16
 | Type::Int32
 | Type::UInt32
 | Type::Int64
 | Type::UInt64
 )
 }

 pub fn is_float(&self) -> bool {
 matches!(self, Type::Float32 | Type::Float64)
 }

 pub fn is_numeric(&self) -> bool {
 self.is_integer() || self.is_float()
 }

 pub fn is_unsigned(&self) -> bool {
 matches!(self, Type::UInt8 | Type::UInt16 | Type::UInt32 | Type::UInt64)
 }

 /// Bit width of an integer/float type, used by constant folding's
 /// saturating/wrapping semantics and by the code generator's
 /// instruction-width selection.
 pub fn bit_width(&self) -> u32 {
 match self {
 Type::Bool | Type::Int8 | Type::UInt8 => 8,
 Type::Int16 | Type::UInt16 => 16,
 Type::Int32 | Type::UInt32 | Type::Float32 => 32,
 Type::Int64 | Type::UInt64 | Type::Float64 | Type::Pointer => 64,
 _ => 64,
 }
 }

 /// The usual-arithmetic-conversion result of combining two operand
 /// types in a binary expression. Widens to the
 /// larger of the two; a float operand makes the whole expression
 /// float; `Error`/`Auto` are absorbing.
 pub fn usual_arithmetic_conversion(&self, other: &Type) -> Type {
 if *self == Type::Error || *other == Type::Error {
 return Type::Error;
 }
 if *self == Type::Auto || *other == Type::Auto {
 return Type::Auto;
 }
 if self.is_float() || other.is_float() {
 return if self.bit_width().max(other.bit_width()) > 32 {
 Type::Float64
 } else {
 Type::Float32
 };
 }
 if self.bit_width() >= other.bit_width() {
 self.clone()
 } else {
 other.clone()
 }
 }
}

/// Per-function bookkeeping for `auto`-typed parameters: the first call site fixes the type, a later call site with a
/// disagreeing argument type is a `TypeMismatch`.
#[derive(Default)]
pub struct TypeContext {
 /// `(function name, parameter index) -> resolved type`, once a call
 /// site has fixed an `auto` parameter.
 auto_params: HashMap<(Symbol, usize), Type>,
}

impl TypeContext {
 pub fn new() -> Self {
 Self::default()
 }

 /// Resolve (or fix) the type of an `auto` parameter from a call-site
 /// argument type. Returns `Ok(())` on first resolution or on a
 /// matching subsequent call, `Err(previous)` when this call
 /// disagrees with an earlier resolution.
 pub fn resolve_auto_param(
 &mut self,
 func: Symbol,
 index: usize,
 arg_ty: &Type,
 ) -> Result<Type, Type> {
 match self.auto_params.get(&(func, index)) {
 Some(prev) if prev == arg_ty => Ok(prev.clone()),
 Some(prev) => Err(prev.clone()),
 None => {
 self.auto_params.insert((func, index), arg_ty.clone());
 Ok(arg_ty.clone())
 }
 }
 }

 pub fn auto_param_type(&self, func: Symbol, index: usize) -> Option<&Type> {
 self.auto_params.get(&(func, index))
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn widens_to_larger_integer() {
 assert_eq!(Type::Int8.usual_arithmetic_conversion(&Type::Int64), Type::Int64);
 }

 #[test]
 fn float_operand_makes_expression_float() {
 assert_eq!(Type::Int32.usual_arithmetic_conversion(&Type::Float64), Type::Float64);
 }

 #[test]
 fn error_is_absorbing() {
 assert_eq!(Type::Error.usual_arithmetic_conversion(&Type::Int64), Type::Error);
 }

 #[test]
 fn auto_param_first_call_resolves() {
 let mut ctx = TypeContext::new();
 let f = Symbol::intern("add");
 assert_eq!(ctx.resolve_auto_param(f, 0, &Type::Int64), Ok(Type::Int64));
 assert_eq!(ctx.resolve_auto_param(f, 0, &Type::Int64), Ok(Type::Int64));
 }

 #[test]
 fn auto_param_conflicting_call_errors() {
 let mut ctx = TypeContext::new();
 let f = Symbol::intern("add2");
 ctx.resolve_auto_param(f, 0, &Type::Int64).unwrap();
 assert_eq!(ctx.resolve_auto_param(f, 0, &Type::Float64), Err(Type::Int64));
 }
}
