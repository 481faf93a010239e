//! Edge case tests for faxc-par.

use crate::ast::{BinOp, NodeKind, Value};
use crate::Parser;
use faxc_util::Handler;

fn parse_ok(source: &str) -> crate::Ast {
 let handler = Handler::new();
 let mut parser = Parser::from_source(source, &handler);
 let ast = parser.parse().expect("expected source to parse");
 assert!(!handler.has_errors(), "unexpected diagnostics: {:?}", handler.summary());
 ast
}

#[test]
fn empty_program_parses_to_empty_root() {
 let ast = parse_ok("");
 assert_eq!(ast.get(ast.root).kind, NodeKind::Program);
 assert!(ast.children(ast.root).is_empty());
}

#[test]
fn fn_decl_with_paren_params_and_empty_body() {
 let ast = parse_ok("Fn main(argc, argv) { }");
 let top = ast.children(ast.root)[0];
 let node = ast.get(top);
 assert_eq!(node.kind, NodeKind::FnDecl);
 assert_eq!(node.value.as_symbol().unwrap().as_str(), "main");
 let params = ast.get(node.children[0]);
 assert_eq!(params.kind, NodeKind::ParamList);
 assert_eq!(params.children.len(), 2);
}

#[test]
fn fn_decl_with_string_params_splits_on_comma_and_whitespace() {
 let ast = parse_ok(r#"Fn add("int a, int b") { ret a }"#);
 let top = ast.children(ast.root)[0];
 let params = ast.get(ast.get(top).children[0]);
 assert_eq!(params.children.len(), 2);
 let p0 = ast.get(params.children[0]);
 assert_eq!(p0.value.as_symbol().unwrap().as_str(), "a");
 assert_eq!(p0.children.len(), 1);
}

#[test]
fn param_with_no_type_has_no_type_child() {
 let ast = parse_ok(r#"Fn f("x") { ret x }"#);
 let top = ast.children(ast.root)[0];
 let params = ast.get(ast.get(top).children[0]);
 let p0 = ast.get(params.children[0]);
 assert_eq!(p0.value.as_symbol().unwrap().as_str(), "x");
 assert!(p0.children.is_empty());
}

#[test]
fn overlay_annotation_attaches_to_following_fn() {
 let ast = parse_ok(r#"overlay Inline(3) Fn f() { ret 0 }"#);
 let top = ast.children(ast.root)[0];
 let node = ast.get(top);
 let overlays = ast.get(node.children[1]);
 assert_eq!(overlays.kind, NodeKind::OverlayList);
 assert_eq!(overlays.children.len(), 1);
 let overlay = ast.get(overlays.children[0]);
 assert_eq!(overlay.value.as_symbol().unwrap().as_str(), "Inline");
 assert_eq!(overlay.children.len(), 1);
}

#[test]
fn ternary_has_lowest_precedence_and_wraps_or_chain() {
 let ast = parse_ok("Fn f() { ret a || b ? 1 : 2 }");
 let top = ast.children(ast.root)[0];
 let body = ast.get(ast.get(top).children[2]);
 let ret = ast.get(body.children[0]);
 let ternary = ast.get(ret.children[0]);
 assert_eq!(ternary.kind, NodeKind::Ternary);
 let cond = ast.get(ternary.children[0]);
 assert_eq!(cond.kind, NodeKind::Binary);
 assert_eq!(cond.value, Value::BinOp(BinOp::Or));
}

#[test]
fn precedence_climbs_multiplicative_over_additive() {
 let ast = parse_ok("Fn f() { ret 1 + 2 * 3 }");
 let top = ast.children(ast.root)[0];
 let body = ast.get(ast.get(top).children[2]);
 let ret = ast.get(body.children[0]);
 let add = ast.get(ret.children[0]);
 assert_eq!(add.value, Value::BinOp(BinOp::Add));
 let rhs = ast.get(add.children[1]);
 assert_eq!(rhs.value, Value::BinOp(BinOp::Mul));
}

#[test]
fn postfix_chain_combines_call_index_and_member() {
 let ast = parse_ok("Fn f() { ret a(1).b[2] }");
 let top = ast.children(ast.root)[0];
 let body = ast.get(ast.get(top).children[2]);
 let ret = ast.get(body.children[0]);
 let index = ast.get(ret.children[0]);
 assert_eq!(index.kind, NodeKind::Index);
 let member = ast.get(index.children[0]);
 assert_eq!(member.kind, NodeKind::Member);
 let call = ast.get(member.children[0]);
 assert_eq!(call.kind, NodeKind::Call);
 assert_eq!(call.value.as_symbol().unwrap().as_str(), "a");
}

#[test]
fn if_without_else_has_two_children() {
 let ast = parse_ok("Fn f() { if x { ret 1 } }");
 let top = ast.children(ast.root)[0];
 let body = ast.get(ast.get(top).children[2]);
 let if_node = ast.get(body.children[0]);
 assert_eq!(if_node.kind, NodeKind::If);
 assert_eq!(if_node.children.len(), 2);
}

#[test]
fn if_with_else_has_three_children() {
 let ast = parse_ok("Fn f() { if x { ret 1 } else { ret 2 } }");
 let top = ast.children(ast.root)[0];
 let body = ast.get(ast.get(top).children[2]);
 let if_node = ast.get(body.children[0]);
 assert_eq!(if_node.children.len(), 3);
}

#[test]
fn switch_collects_cases_then_optional_default() {
 let ast = parse_ok("Fn f() { switch x { case 1 { ret 1 } case 2 { ret 2 } default { ret 0 } } }");
 let top = ast.children(ast.root)[0];
 let body = ast.get(ast.get(top).children[2]);
 let switch = ast.get(body.children[0]);
 assert_eq!(switch.kind, NodeKind::Switch);
 // scrutinee + 2 cases + default
 assert_eq!(switch.children.len(), 4);
 assert_eq!(ast.get(switch.children[1]).kind, NodeKind::Case);
 assert_eq!(ast.get(switch.children[3]).kind, NodeKind::Default);
}

#[test]
fn loop_carries_opaque_header_string() {
 let ast = parse_ok(r#"Fn f() { loop "until done" { ping } }"#);
 let top = ast.children(ast.root)[0];
 let body = ast.get(ast.get(top).children[2]);
 let loop_node = ast.get(body.children[0]);
 assert_eq!(loop_node.kind, NodeKind::Loop);
 assert_eq!(loop_node.value.as_symbol().unwrap().as_str(), "until done");
}

#[test]
fn trailing_bracket_sentinel_is_tolerated_and_discarded() {
 let ast = parse_ok("Fn f() { let x = 1 [ some opaque content ] ret x }");
 let top = ast.children(ast.root)[0];
 let body = ast.get(ast.get(top).children[2]);
 assert_eq!(body.children.len(), 2);
 assert_eq!(ast.get(body.children[0]).kind, NodeKind::Let);
 assert_eq!(ast.get(body.children[1]).kind, NodeKind::Ret);
}

#[test]
fn call_stmt_bare_form_collects_additive_args_until_boundary() {
 let ast = parse_ok("Fn f() { call log 1 + 2 3 }");
 let top = ast.children(ast.root)[0];
 let body = ast.get(ast.get(top).children[2]);
 let call = ast.get(body.children[0]);
 assert_eq!(call.kind, NodeKind::CallStmt);
 assert_eq!(call.value.as_symbol().unwrap().as_str(), "log");
 assert_eq!(call.children.len(), 2);
}

#[test]
fn file_io_statements_round_trip_through_ast() {
 let ast = parse_ok(
 r#"Fn f() {
 open h "out.txt" "w"
 write h 1
 writeln h 2
 close h
 }"#,
 );
 let top = ast.children(ast.root)[0];
 let body = ast.get(ast.get(top).children[2]);
 assert_eq!(ast.get(body.children[0]).kind, NodeKind::Open);
 assert_eq!(ast.get(body.children[1]).kind, NodeKind::Write);
 assert_eq!(ast.get(body.children[2]).kind, NodeKind::WriteLn);
 assert_eq!(ast.get(body.children[3]).kind, NodeKind::Close);
}

#[test]
fn concurrency_surface_parses_channel_send_recv() {
 let ast = parse_ok(
 r#"Fn f() {
 channel c "int"
 send c 1
 recv c x
 }"#,
 );
 let top = ast.children(ast.root)[0];
 let body = ast.get(ast.get(top).children[2]);
 let chan = ast.get(body.children[0]);
 assert_eq!(chan.kind, NodeKind::Channel);
 match &chan.value {
 Value::Channel(name, ty) => {
 assert_eq!(name.as_str(), "c");
 assert_eq!(ty.as_str(), "int");
 }
 other => panic!("expected Value::Channel, got {other:?}"),
 }
}

#[test]
fn struct_decl_collects_typed_fields() {
 let ast = parse_ok("struct Point { x int y int }");
 let top = ast.children(ast.root)[0];
 let node = ast.get(top);
 assert_eq!(node.kind, NodeKind::StructDecl);
 assert_eq!(node.children.len(), 2);
 let field = ast.get(node.children[0]);
 assert_eq!(field.kind, NodeKind::Field);
 assert_eq!(field.value.as_symbol().unwrap().as_str(), "x");
}

#[test]
fn enum_decl_collects_bare_variants() {
 let ast = parse_ok("enum Color { Red, Green, Blue }");
 let top = ast.children(ast.root)[0];
 let node = ast.get(top);
 assert_eq!(node.kind, NodeKind::EnumDecl);
 assert_eq!(node.children.len(), 3);
}

#[test]
fn typedef_packs_new_and_existing_names() {
 let ast = parse_ok("typedef Handle = int");
 let top = ast.children(ast.root)[0];
 let node = ast.get(top);
 assert_eq!(node.kind, NodeKind::Typedef);
 match &node.value {
 Value::Typedef(new_name, existing) => {
 assert_eq!(new_name.as_str(), "Handle");
 assert_eq!(existing.as_str(), "int");
 }
 other => panic!("expected Value::Typedef, got {other:?}"),
 }
}

#[test]
fn matrix_packs_name_rows_and_cols() {
 let ast = parse_ok("Fn f() { matrix m 3 4 }");
 let top = ast.children(ast.root)[0];
 let body = ast.get(ast.get(top).children[2]);
 let matrix = ast.get(body.children[0]);
 match &matrix.value {
 Value::Matrix(name, rows, cols) => {
 assert_eq!(name.as_str(), "m");
 assert_eq!(*rows, 3);
 assert_eq!(*cols, 4);
 }
 other => panic!("expected Value::Matrix, got {other:?}"),
 }
}

#[test]
fn monitoring_statements_parse_with_no_children() {
 let ast = parse_ok("Fn f() { ping audit temperature pressure gauge }");
 let top = ast.children(ast.root)[0];
 let body = ast.get(ast.get(top).children[2]);
 let kinds: Vec<NodeKind> = body.children.iter().map(|&c| ast.get(c).kind).collect();
 assert_eq!(
 kinds,
 vec![
 NodeKind::Ping,
 NodeKind::Audit,
 NodeKind::Temperature,
 NodeKind::Pressure,
 NodeKind::Gauge,
 ]
 );
}

#[test]
fn parallel_collects_branch_blocks() {
 let ast = parse_ok("Fn f() { parallel { { ping } { gauge } } }");
 let top = ast.children(ast.root)[0];
 let body = ast.get(ast.get(top).children[2]);
 let parallel = ast.get(body.children[0]);
 assert_eq!(parallel.kind, NodeKind::Parallel);
 assert_eq!(parallel.children.len(), 2);
}

#[test]
fn unattached_trailing_overlay_emits_warning_not_error() {
 let handler = Handler::new();
 let mut parser = Parser::from_source("overlay Inline(1)", &handler);
 let result = parser.parse();
 assert!(result.is_ok());
 assert!(!handler.has_errors());
 assert!(handler.summary().warnings >= 1);
}

#[test]
fn missing_closing_brace_is_a_parse_error() {
 let handler = Handler::new();
 let mut parser = Parser::from_source("Fn f() { ret 1", &handler);
 assert!(parser.parse().is_err());
}
