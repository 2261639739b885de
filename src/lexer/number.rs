//! Number literals.
//!
//! A literal is split into several tokens: the `0` prefix and base
//! letter of based integers, runs of valid and invalid digits, `_`
//! separators, the decimal mark, and the exponent mark. Invalid digits
//! keep the lexer in the number state so the rest of the literal is
//! still recognised.

use super::{Lexer, State};
use crate::token::TokenKind;

impl Lexer<'_> {
    pub(super) fn lex_number_start(&mut self) -> TokenKind {
        if self.peek() == Some('0') && self.peek_at(1).is_some_and(|c| c.is_ascii_alphabetic()) {
            self.advance();
            return self.to(State::BaseWholeNumberBase, TokenKind::BaseWholeNumberPrefix);
        }
        self.advance_while(|c| c.is_ascii_digit());
        self.to(State::DecimalWholeNumber, TokenKind::ValidDecimalDigits)
    }

    /// The letter after `0`.
    pub(super) fn lex_base(&mut self) -> TokenKind {
        let (kind, next) = match self.peek() {
            Some('b' | 'B') => (TokenKind::BinaryWholeNumberBase, State::BinaryWholeNumber),
            Some('o' | 'O') => (TokenKind::OctalWholeNumberBase, State::OctalWholeNumber),
            Some('x' | 'X') => (
                TokenKind::HexadecimalWholeNumberBase,
                State::HexadecimalWholeNumber,
            ),
            Some(c) if c.is_ascii_alphabetic() => (
                TokenKind::UnknownWholeNumberBase,
                State::UnknownBaseWholeNumber,
            ),
            _ => {
                self.state = State::Initial;
                return self.lex_expression();
            }
        };
        self.advance();
        self.to(next, kind)
    }

    /// Digits, separators, and marks while in a number state. Anything
    /// else ends the literal and is lexed as if after an operand.
    pub(super) fn lex_digits(&mut self) -> TokenKind {
        let state = self.state;
        let Some(ch) = self.peek() else {
            return self.lex_expression();
        };

        if ch == '_' {
            if state == State::UnknownBaseWholeNumber {
                // `0z_` breaks out of the number into an identifier
                return self.lex_name();
            }
            self.advance();
            return TokenKind::NumberSeparator;
        }

        if state == State::DecimalWholeNumber
            && ch == '.'
            && self.peek_at(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.advance();
            return self.to(State::DecimalFraction, TokenKind::DecimalMark);
        }

        if state == State::DecimalFraction && matches!(ch, 'e' | 'E') {
            let signed = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.advance_bytes(digit_at);
                return self.to(State::DecimalExponent, TokenKind::ExponentMark);
            }
        }

        let (is_valid, valid, invalid): (fn(char) -> bool, TokenKind, TokenKind) = match state {
            State::BinaryWholeNumber => (
                |c: char| matches!(c, '0' | '1'),
                TokenKind::ValidBinaryDigits,
                TokenKind::InvalidBinaryDigits,
            ),
            State::OctalWholeNumber => (
                |c: char| matches!(c, '0'..='7'),
                TokenKind::ValidOctalDigits,
                TokenKind::InvalidOctalDigits,
            ),
            State::HexadecimalWholeNumber => (
                |c: char| c.is_ascii_hexdigit(),
                TokenKind::ValidHexadecimalDigits,
                TokenKind::InvalidHexadecimalDigits,
            ),
            State::UnknownBaseWholeNumber => (
                |_: char| false,
                TokenKind::InvalidUnknownBaseDigits,
                TokenKind::InvalidUnknownBaseDigits,
            ),
            _ => (
                |c: char| c.is_ascii_digit(),
                TokenKind::ValidDecimalDigits,
                TokenKind::InvalidDecimalDigits,
            ),
        };

        if is_valid(ch) {
            self.advance_while(is_valid);
            return valid;
        }
        if ch.is_ascii_alphanumeric() {
            self.advance_while(|c| c.is_ascii_alphanumeric() && !is_valid(c));
            return invalid;
        }
        self.lex_expression()
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{Lexer, State, tokenize};
    use crate::token::TokenKind::{self, *};

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn float_with_exponent() {
        assert_eq!(
            kinds("1.5e-3"),
            vec![
                ValidDecimalDigits,
                DecimalMark,
                ValidDecimalDigits,
                ExponentMark,
                ValidDecimalDigits
            ]
        );
    }

    #[test]
    fn dot_without_digit_is_not_a_decimal_mark() {
        assert_eq!(kinds("1.a"), vec![ValidDecimalDigits, DotOperator, IdentifierToken]);
        assert_eq!(kinds("1..2"), vec![ValidDecimalDigits, RangeOperator, ValidDecimalDigits]);
    }

    #[test]
    fn based_integers() {
        assert_eq!(
            kinds("0b1012"),
            vec![
                BaseWholeNumberPrefix,
                BinaryWholeNumberBase,
                ValidBinaryDigits,
                InvalidBinaryDigits
            ]
        );
        assert_eq!(
            kinds("0o7_7"),
            vec![
                BaseWholeNumberPrefix,
                OctalWholeNumberBase,
                ValidOctalDigits,
                NumberSeparator,
                ValidOctalDigits
            ]
        );
    }

    #[test]
    fn invalid_decimal_digits_stay_in_number() {
        let mut lexer = Lexer::new("1A2");
        assert_eq!(lexer.next().map(|t| t.kind), Some(ValidDecimalDigits));
        assert_eq!(lexer.next().map(|t| t.kind), Some(InvalidDecimalDigits));
        assert_eq!(lexer.state(), State::DecimalWholeNumber);
        assert_eq!(lexer.next().map(|t| t.kind), Some(ValidDecimalDigits));
        assert_eq!(lexer.errors().len(), 1);
    }

    #[test]
    fn unknown_base_underscore_starts_identifier() {
        let (tokens, _) = tokenize("0z_ab");
        assert_eq!(tokens[2].kind, IdentifierToken);
        assert_eq!(tokens[2].text, "_ab");
    }
}
