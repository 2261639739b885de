//! Parser structure and error tests.

mod common;

use common::parse_source;
use elixir_syntax::ast::{Body, CallTarget};
use elixir_syntax::{NodeKind, ParseErrorKind};

// -----------------------------------------------------------
// Structure.
// -----------------------------------------------------------

#[test]
fn empty_source_has_no_expressions() {
    let (document, errors) = parse_source("");
    assert!(document.expressions.is_empty());
    assert!(errors.is_empty());
}

#[test]
fn comments_and_blank_lines_are_skipped() {
    let (document, errors) = parse_source("# a\n\n  x # b\n\n");
    assert!(errors.is_empty());
    assert_eq!(document.expressions.len(), 1);
}

#[test]
fn call_without_parentheses_takes_every_argument() {
    let (document, errors) = parse_source("foo a, b, c: 1");
    assert!(errors.is_empty());
    let NodeKind::Call(call) = &document.expressions[0].kind else {
        panic!("not a call");
    };
    assert!(!call.parentheses);
    assert_eq!(call.arguments.len(), 3);
    assert!(matches!(call.arguments[2].kind, NodeKind::Keywords(_)));
}

#[test]
fn nested_call_without_parentheses_takes_one_argument() {
    let (document, errors) = parse_source("[foo a, b]");
    assert!(errors.is_empty());
    let NodeKind::List(items) = &document.expressions[0].kind else {
        panic!("not a list");
    };
    assert_eq!(items.len(), 2);
}

#[test]
fn remote_call_on_alias() {
    let (document, _) = parse_source("Enum.map(list, fun)");
    let NodeKind::Call(call) = &document.expressions[0].kind else {
        panic!("not a call");
    };
    let CallTarget::Remote { name, .. } = &call.target else {
        panic!("not remote");
    };
    assert_eq!(name, "map");
    assert!(call.parentheses);
}

#[test]
fn do_block_attaches_to_outer_call() {
    let (document, errors) = parse_source("defmodule Foo do\n  def bar do\n    1\n  end\nend");
    assert!(errors.is_empty());
    let NodeKind::Call(call) = &document.expressions[0].kind else {
        panic!("not a call");
    };
    let block = call.do_block.as_ref().expect("do block");
    let Body::Expressions(body) = &block.sections[0].body else {
        panic!("unexpected clauses");
    };
    assert_eq!(body.len(), 1);
    assert!(body[0].has_do_block_or_keyword());
}

#[test]
fn spans_cover_the_whole_expression() {
    let (document, _) = parse_source("  foo(1, 2)");
    let span = document.expressions[0].span;
    assert_eq!((span.start, span.end), (2, 11));
    assert_eq!((span.line, span.column), (1, 3));
}

// -----------------------------------------------------------
// Errors.
// -----------------------------------------------------------

#[test]
fn missing_closing_bracket() {
    let (document, errors) = parse_source("[1, 2");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        ParseErrorKind::MissingTerminator {
            terminator: "]",
            line: 1
        }
    );
    assert_eq!(document.expressions.len(), 1);
}

#[test]
fn unexpected_end_of_input_after_operator() {
    let (_, errors) = parse_source("1 +");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::UnexpectedEnd);
}

#[test]
fn fn_without_arrow() {
    let (document, errors) = parse_source("fn x end");
    assert_eq!(errors.len(), 1);
    assert!(document.expressions[0].contains_error());
}

#[test]
fn error_inside_multiline_list_is_reported_once() {
    let (document, errors) = parse_source("[\n  1,\n  2 3,\n  4\n]\nok");
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(
        document.expressions.last().map(|node| &node.kind),
        Some(&NodeKind::Identifier("ok".to_string()))
    );
}

#[test]
fn missing_do_block_end_reports_opening_line() {
    let (_, errors) = parse_source("x = 1\ncase x do\n  1 -> :one\n");
    assert_eq!(
        errors.last().map(|error| error.to_string()),
        Some("missing terminator: end (for opening on line 2) at line 2, column 8".to_string())
    );
}
