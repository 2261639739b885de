//! Rendering quoted terms back to source, and term utilities.

mod common;

use common::quoted;
use elixir_syntax::{Metadata, QuoteOptions, Term, macros, quote_str};
use rstest::rstest;

fn quote_term(source: &str, metadata: Metadata) -> Term {
    let (term, errors) = quote_str(source, &QuoteOptions { metadata });
    assert!(errors.is_empty(), "unexpected errors for {source:?}: {errors:?}");
    term
}

#[rstest]
#[case("1 + 2 * 3", "1 + 2 * 3")]
#[case("(1 + 2) * 3", "(1 + 2) * 3")]
#[case("a = b = c", "a = b = c")]
#[case("(a or b) and c", "(a or b) and c")]
#[case("-(1 + 2)", "-(1 + 2)")]
#[case("1..10", "1..10")]
#[case("1..10//2", "1..10//2")]
#[case("x = ..", "x = ..")]
#[case("-(-1)", "-(-1)")]
#[case("-(-a)", "-(-a)")]
#[case("Foo.{A, B}", "Foo.{A, B}")]
#[case("alias Foo.{A, B}", "alias(Foo.{A, B})")]
#[case("<<x::binary-size(4), y::8>>", "<<x::binary-size(4), y::8>>")]
#[case("<<x :: binary - size(4), y :: 8>>", "<<x::binary-size(4), y::8>>")]
#[case("a not in b", "a not in b")]
#[case("&foo/1", "&foo/1")]
#[case("x |> Enum.map(&(&1 * 2))", "x |> Enum.map(&(&1 * 2))")]
#[case("@doc \"hi\"", "@doc \"hi\"")]
#[case("foo(1, a: 2)", "foo(1, a: 2)")]
#[case("foo.bar", "foo.bar")]
#[case("Enum.map(list, fun)", "Enum.map(list, fun)")]
#[case("a[b]", "a[b]")]
#[case("[1, 2 | rest]", "[1, 2 | rest]")]
#[case("x = [a: 1, b: 2]", "x = [a: 1, b: 2]")]
#[case("{1, 2}", "{1, 2}")]
#[case("{1, 2, 3}", "{1, 2, 3}")]
#[case("%{a: 1}", "%{a: 1}")]
#[case("%{m | a: 1}", "%{m | a: 1}")]
#[case("%User{name: \"x\"}", "%User{name: \"x\"}")]
#[case("\"a#{b}c\"", "\"a#{b}c\"")]
#[case("fn x -> x end", "fn x -> x end")]
#[case("fn x when x > 0 -> x end", "fn x when x > 0 -> x end")]
#[case("if a, do: b", "if a do\n  b\nend")]
fn renders_source(#[case] source: &str, #[case] expected: &str) {
    let term = quote_term(source, Metadata::None);
    let printed = macros::to_string(&term);
    assert_eq!(printed, expected, "{source:?}");
    assert_eq!(quoted(&printed), quoted(source), "{printed:?}");
}

#[test]
fn do_blocks_are_indented() {
    let source = "defmodule Foo do\n  def bar(x) do\n    x + 1\n  end\nend";
    assert_eq!(macros::to_string(&quote_term(source, Metadata::Line)), source);

    let source = "if a do\n  b\nelse\n  c\nend";
    assert_eq!(macros::to_string(&quote_term(source, Metadata::None)), source);
}

#[test]
fn case_clauses_one_per_line() {
    let source = "case x do\n  1 -> :a\n  _ -> :b\nend";
    assert_eq!(macros::to_string(&quote_term(source, Metadata::None)), source);
}

#[test]
fn statements_one_per_line() {
    let term = quote_term("a = 1\nb = a", Metadata::None);
    assert_eq!(macros::to_string(&term), "a = 1\nb = a");
}

#[test]
fn prewalk_sees_every_variable() {
    let term = quote_term("a + b * a", Metadata::None);
    let mut seen = Vec::new();
    let renamed = macros::prewalk(term, &mut |node| {
        if macros::is_variable(&node) {
            seen.push(macros::to_string(&node));
            Term::call(Term::atom("z"), Term::List(Vec::new()), Term::nil())
        } else {
            node
        }
    });
    assert_eq!(seen, ["a", "b", "a"]);
    assert_eq!(macros::to_string(&renamed), "z + z * z");
}

#[test]
fn metadata_of_quoted_calls() {
    let term = quote_term("\n\nfoo(1)", Metadata::LineColumn);
    assert_eq!(macros::metadata(&term, "line"), Some(&Term::integer(3)));
    assert_eq!(macros::metadata(&term, "column"), Some(&Term::integer(1)));
    assert_eq!(macros::metadata(&Term::integer(1), "line"), None);
}

#[test]
fn quoted_code_is_an_expression() {
    for source in ["foo(1)", "Enum.map(a, b)", "%{a: 1}", "fn x -> x end"] {
        let term = quote_term(source, Metadata::Line);
        assert!(macros::is_expression(&term), "{source:?}");
    }
    assert!(macros::is_aliases(&quote_term("Foo.Bar", Metadata::None)));
    assert!(macros::is_local_call(&quote_term("foo(1)", Metadata::None)));
    assert!(!macros::is_local_call(&quote_term("foo", Metadata::None)));
}
