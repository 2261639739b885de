//! Call introspection on parsed nodes.

mod common;

use common::parse_source;
use elixir_syntax::Node;
use rstest::rstest;

fn first(source: &str) -> Node {
    let (document, errors) = parse_source(source);
    assert!(errors.is_empty(), "{errors:?}");
    document
        .expressions
        .into_iter()
        .next()
        .expect("one expression")
}

#[rstest]
#[case("foo(1)", Some("foo"))]
#[case("foo", Some("foo"))]
#[case("Enum.map(list, fun)", Some("map"))]
#[case("a + b", Some("+"))]
#[case("not a", Some("not"))]
#[case("f.(1)", None)]
#[case("[1]", None)]
fn function_names(#[case] source: &str, #[case] expected: Option<&str>) {
    assert_eq!(first(source).function_name(), expected);
}

#[rstest]
#[case("Enum.map(list, fun)", Some("Enum"))]
#[case("Foo.Bar.baz()", Some("Foo.Bar"))]
#[case(":erlang.now()", Some("erlang"))]
#[case("foo(1)", None)]
#[case("x.y", None)]
fn module_names(#[case] source: &str, #[case] expected: Option<&str>) {
    assert_eq!(first(source).module_name().as_deref(), expected);
}

#[test]
fn do_block_adds_one_to_the_arity() {
    let node = first("if a do\n  b\nend");
    assert_eq!(node.primary_arity(), Some(1));
    assert_eq!(node.resolved_arity(), Some(2));
    assert!(node.has_do_block_or_keyword());
}

#[test]
fn do_keyword_is_an_ordinary_argument() {
    let node = first("if a, do: b");
    assert_eq!(node.primary_arity(), Some(2));
    assert_eq!(node.resolved_arity(), Some(2));
    assert!(node.has_do_block_or_keyword());
    assert!(!first("foo(a: 1)").has_do_block_or_keyword());
}

#[test]
fn operators_are_kernel_calls() {
    assert!(first("1 + 2").is_calling("Kernel", "+", 2));
    assert!(first("-x").is_calling("Kernel", "-", 1));
    assert!(!first("1 + 2").is_calling("Kernel", "+", 1));
    assert!(!first("1 + 2").is_calling("Enum", "+", 2));
}

#[test]
fn remote_calls_match_their_module() {
    let node = first("Enum.map(list, fun)");
    assert!(node.is_calling("Enum", "map", 2));
    assert!(!node.is_calling("Kernel", "map", 2));
    assert!(!node.is_calling("Enum", "map", 3));
}

#[test]
fn local_calls_resolve_to_kernel() {
    assert!(first("defmodule Foo do\nend").is_calling("Kernel", "defmodule", 2));
    assert!(!first("f.(1)").is_calling("Kernel", "f", 1));
}

#[test]
fn errors_are_visible_from_the_root() {
    let (document, errors) = parse_source("foo(1 + )");
    assert_eq!(errors.len(), 1);
    assert!(document.expressions[0].contains_error());
    assert!(!first("foo([1, 2, 3])").contains_error());
}

#[test]
fn children_cover_call_arguments() {
    let node = first("foo(a, b)");
    assert_eq!(node.children().len(), 2);
}
