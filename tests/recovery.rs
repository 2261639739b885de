//! Error recovery: malformed input still yields a tree.

mod common;

use common::{parse_source, quoted_expressions};
use elixir_syntax::{CancellationToken, Cancelled, Options, analyze, macros};
use rstest::rstest;

#[test]
fn one_bad_statement_among_ten_good_ones() {
    let mut source = String::from("foo(1 2 3)\n");
    for n in 0..10 {
        source.push_str(&format!("x{n} = {n} + 1\n"));
    }
    let (document, errors) = parse_source(&source);
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(document.expressions.len(), 11);

    let quoted = quoted_expressions(&source);
    assert!(quoted[0].contains(":__error__"), "{}", quoted[0]);
    for (n, term) in quoted.iter().skip(1).enumerate() {
        assert_eq!(
            term,
            &format!("{{:=, [], [{{:x{n}, [], nil}}, {{:+, [], [{n}, 1]}}]}}")
        );
    }
}

#[rstest]
#[case::missing_comma("foo(1 2)")]
#[case::unclosed_list("[1,")]
#[case::unclosed_call("foo(")]
#[case::unclosed_access("a[1")]
#[case::unclosed_map("%{a: 1")]
#[case::unclosed_do_block("if a do\n  b")]
#[case::unclosed_fn("fn x -> x")]
#[case::arrow_outside_block("a ->")]
#[case::head_without_arrow("case x do\n  a, b\nend")]
fn failed_expectations_leave_error_nodes(#[case] source: &str) {
    let (document, errors) = parse_source(source);
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(document.expressions[0].contains_error(), "{source:?}");
    assert!(quoted_expressions(source)[0].contains(":__error__"));
}

#[test]
fn missing_closer_keeps_the_parsed_elements() {
    assert_eq!(
        quoted_expressions("foo(1 2)")[0],
        "{:foo, [], [1, {:__error__, [], [\"expected ')', got '2'\"]}]}"
    );
}

#[test]
fn unterminated_heredoc_keeps_a_partial_tree() {
    let analysis = analyze("x = 1\ny = \"\"\"\n  text\n", &Options::default()).unwrap();
    assert_eq!(analysis.errors.len(), 1, "{:?}", analysis.errors);
    assert_eq!(analysis.document.expressions.len(), 2);
    let text = analysis.term.to_string();
    assert!(text.starts_with("{:__block__, [], [{:=, [line: 1], [{:x, [line: 1], nil}, 1]}"));
    assert!(text.contains("text"), "{text}");
}

#[test]
fn stray_end_does_not_hide_later_statements() {
    let (document, errors) = parse_source("a\nend\nb\nc");
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(document.expressions.len(), 4);
}

#[test]
fn bad_character_is_reported_by_the_lexer_only() {
    let analysis = analyze("a = $\nb = 2", &Options::default()).unwrap();
    assert_eq!(analysis.errors.len(), 1, "{:?}", analysis.errors);
    assert!(matches!(analysis.errors[0], elixir_syntax::Error::Lex(_)));
    assert_eq!(analysis.document.expressions.len(), 2);
    assert!(analysis.document.expressions[0].contains_error());
}

#[test]
fn invalid_digits_do_not_produce_parse_errors() {
    let analysis = analyze("x = 12ab\ny = 0xZZ", &Options::default()).unwrap();
    assert_eq!(analysis.errors.len(), 2, "{:?}", analysis.errors);
    assert!(
        analysis
            .errors
            .iter()
            .all(|error| matches!(error, elixir_syntax::Error::Lex(_)))
    );
}

#[test]
fn unclosed_interpolation_is_contained() {
    let (document, _) = parse_source("\"a#{b\"\nc");
    assert!(!document.expressions.is_empty());
}

#[test]
fn cancellation_from_another_thread() {
    let token = CancellationToken::new();
    let worker = token.clone();
    token.cancel();
    let handle = std::thread::spawn(move || {
        let options = Options {
            cancellation: Some(worker),
            ..Options::default()
        };
        analyze(&"x + 1\n".repeat(1000), &options).map(|analysis| analysis.errors.len())
    });
    assert_eq!(handle.join().unwrap(), Err(Cancelled));
}

#[rstest]
#[case::operator_chain(format!("a{}", " + 1".repeat(10_000)))]
#[case::access_chain(format!("a{}", "[0]".repeat(1_000)))]
#[case::dot_chain(format!("a{}", ".b".repeat(5_000)))]
#[case::minus_run(format!("{}1", "-".repeat(100_000)))]
fn long_chains_are_cut_off(#[case] source: String) {
    let analysis = analyze(&format!("{source}\nok"), &Options::default()).unwrap();
    assert_eq!(analysis.errors.len(), 1, "{:?}", analysis.errors);
    assert_eq!(analysis.document.expressions.len(), 2);
    let text = analysis.term.to_string();
    assert!(text.contains(":__error__"));
    assert!(macros::to_string(&analysis.term).ends_with("ok"));
}
