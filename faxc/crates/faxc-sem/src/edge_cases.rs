//! Edge case tests for faxc-sem

#[cfg(test)]
mod tests {
 use crate::{RibKind, ScopeTree, SemanticAnalyzer, Type, TypeContext};
 use faxc_util::{DefIdGenerator, Handler, Symbol};

 // ==================== SCOPE TREE TESTS ====================

 /// EDGE CASE: New scope tree
 #[test]
 fn test_edge_new_scope_tree() {
 let tree = ScopeTree::new();
 assert!(tree.resolve(Symbol::intern("nonexistent")).is_none());
 }

 /// EDGE CASE: Enter and exit scope
 #[test]
 fn test_edge_enter_exit_scope() {
 let mut tree = ScopeTree::new();
 tree.enter_scope(RibKind::Block);
 tree.exit_scope();
 }

 /// EDGE CASE: Nested scopes
 #[test]
 fn test_edge_nested_scopes() {
 let mut tree = ScopeTree::new();
 tree.enter_scope(RibKind::Block);
 tree.enter_scope(RibKind::Block);
 tree.enter_scope(RibKind::Block);

 let def_id = DefIdGenerator::new().next();
 tree.add_binding(Symbol::intern("x"), def_id);
 assert!(tree.resolve(Symbol::intern("x")).is_some());

 tree.exit_scope();
 tree.exit_scope();
 tree.exit_scope();

 // Back at root, which never saw the binding.
 assert!(tree.resolve(Symbol::intern("x")).is_none());
 }

 /// EDGE CASE: Shadowing in nested scope
 #[test]
 fn test_edge_shadowing() {
 let mut tree = ScopeTree::new();
 let gen = &mut DefIdGenerator::new();

 let outer_id = gen.next();
 tree.add_binding(Symbol::intern("x"), outer_id);

 tree.enter_scope(RibKind::Block);
 let inner_id = gen.next();
 tree.add_binding(Symbol::intern("x"), inner_id);

 assert_eq!(tree.resolve(Symbol::intern("x")).unwrap(), inner_id);

 tree.exit_scope();
 assert_eq!(tree.resolve(Symbol::intern("x")).unwrap(), outer_id);
 }

 /// EDGE CASE: Multiple bindings in same scope
 #[test]
 fn test_edge_multiple_bindings() {
 let mut tree = ScopeTree::new();
 let gen = &mut DefIdGenerator::new();

 tree.add_binding(Symbol::intern("a"), gen.next());
 tree.add_binding(Symbol::intern("b"), gen.next());
 tree.add_binding(Symbol::intern("c"), gen.next());

 assert!(tree.resolve(Symbol::intern("a")).is_some());
 assert!(tree.resolve(Symbol::intern("b")).is_some());
 assert!(tree.resolve(Symbol::intern("c")).is_some());
 }

 /// EDGE CASE: Function scope
 #[test]
 fn test_edge_function_scope() {
 let mut tree = ScopeTree::new();
 tree.enter_scope(RibKind::Function);

 let def_id = DefIdGenerator::new().next();
 tree.add_binding(Symbol::intern("param"), def_id);

 assert!(tree.resolve(Symbol::intern("param")).is_some());
 tree.exit_scope();
 }

 /// EDGE CASE: Loop scope and `in_loop` detection through nested blocks
 #[test]
 fn test_edge_loop_scope() {
 let mut tree = ScopeTree::new();
 tree.enter_scope(RibKind::Loop);
 assert!(tree.in_loop());

 let def_id = DefIdGenerator::new().next();
 tree.add_binding(Symbol::intern("i"), def_id);
 assert!(tree.resolve(Symbol::intern("i")).is_some());

 tree.enter_scope(RibKind::Block);
 assert!(tree.in_loop(), "a block nested in a loop is still in_loop");
 tree.exit_scope();

 tree.exit_scope();
 assert!(!tree.in_loop());
 }

 // ==================== TYPE LATTICE TESTS ====================

 /// EDGE CASE: bit widths across the lattice
 #[test]
 fn test_edge_bit_widths() {
 assert_eq!(Type::Bool.bit_width(), 8);
 assert_eq!(Type::Int32.bit_width(), 32);
 assert_eq!(Type::Float64.bit_width(), 64);
 assert_eq!(Type::Pointer.bit_width(), 64);
 }

 /// EDGE CASE: signedness predicates
 #[test]
 fn test_edge_signedness() {
 assert!(Type::UInt32.is_unsigned());
 assert!(!Type::Int32.is_unsigned());
 assert!(Type::Int64.is_integer());
 assert!(Type::Float32.is_float());
 assert!(Type::Int8.is_numeric());
 }

 /// EDGE CASE: vector lane type is neither integer nor float itself
 #[test]
 fn test_edge_vector_type() {
 let v = Type::Vector { elem: Box::new(Type::Int32), lanes: 4 };
 assert!(!v.is_numeric());
 assert_ne!(v, Type::Int32);
 }

 /// EDGE CASE: named aggregate types compare by name
 #[test]
 fn test_edge_named_type_equality() {
 let a = Type::Named(Symbol::intern("Point"));
 let b = Type::Named(Symbol::intern("Point"));
 let c = Type::Named(Symbol::intern("Other"));
 assert_eq!(a, b);
 assert_ne!(a, c);
 }

 // ==================== USUAL ARITHMETIC CONVERSION TESTS ====================

 #[test]
 fn test_edge_widens_to_larger_integer() {
 assert_eq!(Type::Int8.usual_arithmetic_conversion(&Type::Int64), Type::Int64);
 }

 #[test]
 fn test_edge_float_operand_makes_expression_float() {
 assert_eq!(Type::Int32.usual_arithmetic_conversion(&Type::Float64), Type::Float64);
 }

 #[test]
 fn test_edge_error_is_absorbing() {
 assert_eq!(Type::Error.usual_arithmetic_conversion(&Type::Int64), Type::Error);
 assert_eq!(Type::Int64.usual_arithmetic_conversion(&Type::Error), Type::Error);
 }

 #[test]
 fn test_edge_auto_is_absorbing() {
 assert_eq!(Type::Auto.usual_arithmetic_conversion(&Type::Int64), Type::Auto);
 }

 #[test]
 fn test_edge_small_floats_stay_32_bit() {
 assert_eq!(Type::Int16.usual_arithmetic_conversion(&Type::Float32), Type::Float32);
 }

 // ==================== TYPE CONTEXT (AUTO PARAMS) TESTS ====================

 #[test]
 fn test_edge_new_type_context() {
 let ctx = TypeContext::default();
 assert_eq!(ctx.auto_param_type(Symbol::intern("f"), 0), None);
 }

 #[test]
 fn test_edge_auto_param_first_call_resolves() {
 let mut ctx = TypeContext::new();
 let f = Symbol::intern("add");
 assert_eq!(ctx.resolve_auto_param(f, 0, &Type::Int64), Ok(Type::Int64));
 assert_eq!(ctx.auto_param_type(f, 0), Some(&Type::Int64));
 }

 #[test]
 fn test_edge_auto_param_repeated_matching_call_ok() {
 let mut ctx = TypeContext::new();
 let f = Symbol::intern("add");
 ctx.resolve_auto_param(f, 0, &Type::Int64).unwrap();
 assert_eq!(ctx.resolve_auto_param(f, 0, &Type::Int64), Ok(Type::Int64));
 }

 #[test]
 fn test_edge_auto_param_conflicting_call_errors() {
 let mut ctx = TypeContext::new();
 let f = Symbol::intern("add2");
 ctx.resolve_auto_param(f, 0, &Type::Int64).unwrap();
 assert_eq!(ctx.resolve_auto_param(f, 0, &Type::Float64), Err(Type::Int64));
 }

 #[test]
 fn test_edge_auto_params_independent_per_index() {
 let mut ctx = TypeContext::new();
 let f = Symbol::intern("pair");
 ctx.resolve_auto_param(f, 0, &Type::Int64).unwrap();
 ctx.resolve_auto_param(f, 1, &Type::Float64).unwrap();
 assert_eq!(ctx.auto_param_type(f, 0), Some(&Type::Int64));
 assert_eq!(ctx.auto_param_type(f, 1), Some(&Type::Float64));
 }

 // ==================== SEMANTIC ANALYZER TESTS ====================

 /// EDGE CASE: analyzing an empty translation unit yields only the
 /// synthetic `__entry` function.
 #[test]
 fn test_edge_analyze_empty_program() {
 let handler = Handler::new();
 let ast = faxc_par::Parser::from_source("", &handler).parse().unwrap();
 let mut analyzer = SemanticAnalyzer::new(&handler);
 let module = analyzer.analyze(&ast);

 assert_eq!(module.functions.len(), 1);
 assert_eq!(module.functions[0].name.as_str(), "__entry");
 assert!(module.functions[0].body.stmts.is_empty());
 assert!(!handler.has_errors());
 }

 /// EDGE CASE: an undefined variable reference is a semantic error,
 /// not a panic, and lowers to a poisoned expression.
 #[test]
 fn test_edge_undefined_variable_is_poisoned_not_panicking() {
 let handler = Handler::new();
 let ast = faxc_par::Parser::from_source("Print undefined_name", &handler).parse().unwrap();
 let mut analyzer = SemanticAnalyzer::new(&handler);
 let _ = analyzer.analyze(&ast);
 assert!(handler.has_errors());
 }

 /// EDGE CASE: a function call site resolves an `auto` parameter.
 #[test]
 fn test_edge_function_auto_param_resolution() {
 let handler = Handler::new();
 let src = r#"Fn add "a,b" ( ret a + b ) let s = call add 40 2"#;
 let ast = faxc_par::Parser::from_source(src, &handler).parse().unwrap();
 let mut analyzer = SemanticAnalyzer::new(&handler);
 let module = analyzer.analyze(&ast);

 let add = module.functions.iter().find(|f| f.name.as_str() == "add").unwrap();
 assert!(add.params.iter().all(|p| p.ty != Type::Auto));
 assert!(!handler.has_errors());
 }
}
