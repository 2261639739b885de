//! Lexer state tables and edge cases.

mod common;

use common::{final_state, kinds};
use elixir_syntax::{LexErrorKind, Lexer, State, TokenKind, tokenize};
use rstest::rstest;

// -----------------------------------------------------------
// State after a single construct.
// -----------------------------------------------------------

#[rstest]
#[case("&&", State::KeywordPairOrMultilineWhiteSpaceMaybe)]
#[case("Enum", State::AdditionOrSubtractionOrWhiteSpaceMaybe)]
#[case("foo", State::AfterUnqualifiedIdentifier)]
#[case("foo ", State::CallOrAdditionOrSubtractionMaybe)]
#[case("1", State::DecimalWholeNumber)]
#[case("1.5", State::DecimalFraction)]
#[case("1.5e3", State::DecimalExponent)]
#[case("0b", State::BinaryWholeNumber)]
#[case("0o", State::OctalWholeNumber)]
#[case("0x", State::HexadecimalWholeNumber)]
#[case("0z", State::UnknownBaseWholeNumber)]
#[case("(", State::MultilineWhiteSpaceMaybe)]
#[case("[", State::MultilineWhiteSpaceMaybe)]
#[case(")", State::AdditionOrSubtractionMaybe)]
#[case(":ok", State::AdditionOrSubtractionMaybe)]
#[case(":", State::AtomStart)]
#[case("true", State::AdditionOrKeywordPairOrSubtractionOrWhiteSpaceMaybe)]
#[case("end", State::KeywordPairMaybe)]
#[case("do", State::KeywordPairOrMultilineWhiteSpaceMaybe)]
#[case("a.", State::DotOperation)]
#[case("?", State::CharTokenization)]
#[case("?a", State::AdditionOrSubtractionMaybe)]
#[case("~", State::Sigil)]
#[case("~r/a/", State::SigilModifiers)]
#[case("\"", State::Group)]
#[case("\"a\"", State::AdditionOrKeywordPairOrSubtractionOrWhiteSpaceMaybe)]
#[case("\"\"\"", State::GroupHeredocStart)]
#[case("\"\"\"\n", State::GroupHeredocLineStart)]
#[case("a\n", State::Initial)]
#[case("a +\n", State::MultilineWhiteSpaceMaybe)]
#[case("a,", State::Initial)]
#[case("do: ", State::Initial)]
fn state_after(#[case] source: &str, #[case] expected: State) {
    assert_eq!(final_state(source), expected, "{source:?}");
}

// -----------------------------------------------------------
// Token kinds.
// -----------------------------------------------------------

#[rstest]
#[case("&&", &[TokenKind::AndSymbolOperator])]
#[case("Enum", &[TokenKind::AliasToken])]
#[case("1234", &[TokenKind::ValidDecimalDigits])]
#[case("1_000", &[
    TokenKind::ValidDecimalDigits,
    TokenKind::NumberSeparator,
    TokenKind::ValidDecimalDigits,
])]
#[case("0xFF", &[
    TokenKind::BaseWholeNumberPrefix,
    TokenKind::HexadecimalWholeNumberBase,
    TokenKind::ValidHexadecimalDigits,
])]
#[case("0xG", &[
    TokenKind::BaseWholeNumberPrefix,
    TokenKind::HexadecimalWholeNumberBase,
    TokenKind::InvalidHexadecimalDigits,
])]
#[case("0z1", &[
    TokenKind::BaseWholeNumberPrefix,
    TokenKind::UnknownWholeNumberBase,
    TokenKind::InvalidUnknownBaseDigits,
])]
#[case("0z_", &[
    TokenKind::BaseWholeNumberPrefix,
    TokenKind::UnknownWholeNumberBase,
    TokenKind::IdentifierToken,
])]
#[case("a.b", &[
    TokenKind::IdentifierToken,
    TokenKind::DotOperator,
    TokenKind::IdentifierToken,
])]
#[case("Foo.Bar", &[
    TokenKind::AliasToken,
    TokenKind::DotOperator,
    TokenKind::AliasToken,
])]
#[case("a not in b", &[
    TokenKind::IdentifierToken,
    TokenKind::WhiteSpace,
    TokenKind::NotOperator,
    TokenKind::WhiteSpace,
    TokenKind::InOperator,
    TokenKind::WhiteSpace,
    TokenKind::IdentifierToken,
])]
#[case("x |> f", &[
    TokenKind::IdentifierToken,
    TokenKind::WhiteSpace,
    TokenKind::ArrowOperator,
    TokenKind::WhiteSpace,
    TokenKind::IdentifierToken,
])]
#[case("1..2", &[
    TokenKind::ValidDecimalDigits,
    TokenKind::RangeOperator,
    TokenKind::ValidDecimalDigits,
])]
#[case("?a", &[TokenKind::CharTokenizer, TokenKind::CharacterToken])]
#[case("# note", &[TokenKind::Comment])]
fn token_kinds(#[case] source: &str, #[case] expected: &[TokenKind]) {
    assert_eq!(kinds(source), expected, "{source:?}");
}

#[test]
fn unknown_base_underscore_leaves_the_number() {
    assert_eq!(final_state("0z_"), State::AfterUnqualifiedIdentifier);
}

#[test]
fn invalid_decimal_letters_stay_in_decimal_state() {
    let mut lexer = Lexer::new("1abc");
    assert_eq!(
        lexer.next().map(|token| token.kind),
        Some(TokenKind::ValidDecimalDigits)
    );
    assert_eq!(
        lexer.next().map(|token| token.kind),
        Some(TokenKind::InvalidDecimalDigits)
    );
    assert_eq!(lexer.state(), State::DecimalWholeNumber);
}

// -----------------------------------------------------------
// Groups.
// -----------------------------------------------------------

#[test]
fn string_with_interpolation_and_escape() {
    use TokenKind::*;
    assert_eq!(
        kinds(r#""a\n#{b}""#),
        vec![
            StringPromoter,
            StringFragment,
            EscapeSequence,
            InterpolationStart,
            IdentifierToken,
            InterpolationEnd,
            StringTerminator
        ]
    );
}

#[test]
fn heredoc_lines() {
    use TokenKind::*;
    assert_eq!(
        kinds("\"\"\"\n  a\n  \"\"\""),
        vec![
            StringHeredocPromoter,
            Eol,
            HeredocLinePrefix,
            StringFragment,
            HeredocLinePrefix,
            StringHeredocTerminator
        ]
    );
}

#[test]
fn text_after_heredoc_promoter_is_an_error() {
    let (_, errors) = tokenize("\"\"\" x\n\"\"\"");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, LexErrorKind::InvalidHeredocStart);
}

#[test]
fn unterminated_heredoc_is_reported_at_its_promoter() {
    let (_, errors) = tokenize("x = \"\"\"\n  text\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        LexErrorKind::UnterminatedGroup {
            terminator: "\"\"\"".to_string()
        }
    );
    assert_eq!(errors[0].span.column, 5);
}

#[rstest]
#[case(r#""\u{110000}""#, r"\u{110000}")]
#[case(r#""\u{D800}""#, r"\u{D800}")]
#[case(r#""\x{FFFFFFFFFFFFFFFFFFFF}""#, r"\x{FFFFFFFFFFFFFFFFFFFF}")]
#[case(r#"'\xZ'"#, r"\x")]
fn escapes_outside_unicode_are_errors(#[case] source: &str, #[case] escape: &str) {
    let (tokens, errors) = tokenize(source);
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors[0].kind, LexErrorKind::InvalidEscape(escape.to_string()));
    let token = tokens
        .iter()
        .find(|token| token.kind == TokenKind::EscapeSequence)
        .unwrap();
    assert_eq!(errors[0].span, token.span);
    assert_eq!(errors[0].span.column, 2);
}

#[test]
fn valid_and_sigil_escapes_are_not_errors() {
    for source in [r#""\u{10FFFF}\x41\u00e9""#, r"~r/\x{110000}/", r#""\q""#] {
        let (_, errors) = tokenize(source);
        assert!(errors.is_empty(), "{source:?}: {errors:?}");
    }
}

#[test]
fn literal_sigil_keeps_backslashes() {
    use TokenKind::*;
    assert_eq!(
        kinds(r"~S(a\d)"),
        vec![
            Tilde,
            LiteralSigilName,
            SigilPromoter,
            SigilFragment,
            SigilTerminator
        ]
    );
}

#[test]
fn starting_in_a_group_state() {
    let lexer = Lexer::starting_in("abc\" + 1", State::Group);
    let kinds: Vec<_> = lexer.map(|token| token.kind).take(2).collect();
    assert_eq!(kinds, [TokenKind::StringFragment, TokenKind::StringTerminator]);
}

// -----------------------------------------------------------
// Whole inputs.
// -----------------------------------------------------------

#[test]
fn spans_track_lines_and_columns() {
    let (tokens, _) = tokenize("a\n  bb");
    let last = tokens.last().expect("tokens");
    assert_eq!(last.text, "bb");
    assert_eq!((last.span.line, last.span.column), (2, 3));
    assert_eq!((last.span.start, last.span.end), (4, 6));
}

#[test]
fn texts_concatenate_to_input() {
    let source = "defmodule Foo do\n  @moduledoc \"\"\"\n  Docs #{1}\n  \"\"\"\n  def a(x) when x > 0, do: ~w(a b)a\nend\n";
    let (tokens, errors) = tokenize(source);
    assert!(errors.is_empty(), "{errors:?}");
    let joined: String = tokens.iter().map(|token| token.text.as_str()).collect();
    assert_eq!(joined, source);
}

#[test]
fn error_display_includes_location() {
    let (_, errors) = tokenize("x = 1\ny $ 2");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().ends_with("at line 2, column 3"));
}
