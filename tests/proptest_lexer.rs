//! Property-based tests with proptest.
//!
//! Number literals land in the right token kinds and states whatever
//! their digits, and arbitrary input never stops the lexer, parser, or
//! quoter from producing a result.

mod common;

use common::{final_state, kinds};
use elixir_syntax::{Metadata, QuoteOptions, State, TokenKind, parse, quote_str, tokenize};
use proptest::prelude::*;

/// Fragments of Elixir-looking text, stitched together at random.
fn source() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        "[a-z_][a-z0-9_]{0,6}[?!]?",
        "[A-Z][a-zA-Z0-9]{0,6}",
        "[0-9][0-9_]{0,4}",
        "0[xbo][0-9a-fA-Z]{0,4}",
        Just("0z".to_string()),
        "[ \t\n]{1,3}",
        "[-+*/=<>|&!^~@%.:,;?]{1,3}",
        "[()\\[\\]{}]",
        Just("\"".to_string()),
        Just("'".to_string()),
        Just("\"\"\"".to_string()),
        Just("#{".to_string()),
        Just("\\".to_string()),
        Just("# note\n".to_string()),
        prop::sample::select(vec!["do", "end", "fn", "->", "else", "when", "not in", "é"])
            .prop_map(str::to_string),
    ];
    prop::collection::vec(fragment, 0..24).prop_map(|parts| parts.concat())
}

proptest! {
    /// Decimal digits are one valid token.
    #[test]
    fn decimal_digits(digits in "1[0-9]{0,20}") {
        prop_assert_eq!(kinds(&digits), vec![TokenKind::ValidDecimalDigits]);
        prop_assert_eq!(final_state(&digits), State::DecimalWholeNumber);
    }

    /// Letters after decimal digits are invalid digits, not a new token.
    #[test]
    fn letters_in_decimal(letters in "[a-zA-Z]{1,10}") {
        let source = format!("1{letters}");
        prop_assert_eq!(
            kinds(&source),
            vec![TokenKind::ValidDecimalDigits, TokenKind::InvalidDecimalDigits]
        );
        prop_assert_eq!(final_state(&source), State::DecimalWholeNumber);
        prop_assert_eq!(tokenize(&source).1.len(), 1);
    }

    #[test]
    fn hexadecimal_digits(digits in "[0-9a-fA-F]{1,16}") {
        let source = format!("0x{digits}");
        prop_assert_eq!(
            kinds(&source),
            vec![
                TokenKind::BaseWholeNumberPrefix,
                TokenKind::HexadecimalWholeNumberBase,
                TokenKind::ValidHexadecimalDigits,
            ]
        );
        prop_assert_eq!(final_state(&source), State::HexadecimalWholeNumber);
    }

    #[test]
    fn letters_in_hexadecimal(letters in "[g-zG-Z]{1,8}") {
        let source = format!("0x{letters}");
        prop_assert_eq!(
            kinds(&source),
            vec![
                TokenKind::BaseWholeNumberPrefix,
                TokenKind::HexadecimalWholeNumberBase,
                TokenKind::InvalidHexadecimalDigits,
            ]
        );
    }

    /// An unknown base accepts no digit at all.
    #[test]
    fn unknown_base(digits in "[a-zA-Z0-9]{1,8}") {
        let source = format!("0z{digits}");
        prop_assert_eq!(
            kinds(&source),
            vec![
                TokenKind::BaseWholeNumberPrefix,
                TokenKind::UnknownWholeNumberBase,
                TokenKind::InvalidUnknownBaseDigits,
            ]
        );
        prop_assert_eq!(final_state(&source), State::UnknownBaseWholeNumber);
    }

    /// Tokens tile the input: each starts where the previous ended.
    #[test]
    fn tokens_cover_the_input(source in source()) {
        let (tokens, _) = tokenize(&source);
        let joined: String = tokens.iter().map(|token| token.text.as_str()).collect();
        prop_assert_eq!(&joined, &source);
        for pair in tokens.windows(2) {
            prop_assert_eq!(pair[0].span.end, pair[1].span.start);
        }
    }

    /// Lexing is a function of the text alone.
    #[test]
    fn relexing_is_stable(source in source()) {
        let (first, first_errors) = tokenize(&source);
        let joined: String = first.iter().map(|token| token.text.as_str()).collect();
        let (second, second_errors) = tokenize(&joined);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first_errors, second_errors);
    }

    /// Every stage finishes on any input.
    #[test]
    fn every_stage_is_total(source in source()) {
        let (tokens, _) = tokenize(&source);
        let (document, errors) = parse(&tokens);
        for error in &errors {
            prop_assert!(error.span.end <= source.len());
        }
        let (term, _) = quote_str(
            &source,
            &QuoteOptions { metadata: Metadata::LineColumn },
        );
        if document.expressions.len() > 1 {
            let text = term.to_string();
            prop_assert!(text.starts_with("{:__block__"), "{}", text);
        }
    }
}
