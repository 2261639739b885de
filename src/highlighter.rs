//! Token classification for syntax coloring.
//!
//! Each [`TokenKind`] maps to zero or more [`Category`] values. A
//! category has a stable external key, as used by color schemes, and
//! the generic color it falls back to when a scheme does not set it.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::token::TokenKind;

/// Display category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Alias,
    Atom,
    BadCharacter,
    Bit,
    Braces,
    Brackets,
    CharList,
    CharToken,
    Comma,
    Comment,
    Decimal,
    Dot,
    ExpressionSubstitutionMark,
    Identifier,
    InvalidDigit,
    Keyword,
    Map,
    ModuleAttribute,
    ObsoleteWholeNumberBase,
    OperationSign,
    Parentheses,
    Semicolon,
    Sigil,
    String,
    ValidDigit,
    ValidEscapeSequence,
    WholeNumberBase,
}

impl Category {
    /// Scheme key, e.g. `ELIXIR_ALIAS`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Alias => "ELIXIR_ALIAS",
            Self::Atom => "ELIXIR_ATOM",
            Self::BadCharacter => "ELIXIR_BAD_CHARACTER",
            Self::Bit => "ELIXIR_BIT",
            Self::Braces => "ELIXIR_BRACES",
            Self::Brackets => "ELIXIR_BRACKETS",
            Self::CharList => "ELIXIR_CHAR_LIST",
            Self::CharToken => "ELIXIR_CHAR_TOKEN",
            Self::Comma => "ELIXIR_COMMA",
            Self::Comment => "ELIXIR_COMMENT",
            Self::Decimal => "ELIXIR_DECIMAL",
            Self::Dot => "ELIXIR_DOT",
            Self::ExpressionSubstitutionMark => "ELIXIR_EXPRESSION_SUBSTITUTION_MARK",
            Self::Identifier => "ELIXIR_IDENTIFIER",
            Self::InvalidDigit => "ELIXIR_INVALID_DIGIT",
            Self::Keyword => "ELIXIR_KEYWORD",
            Self::Map => "ELIXIR_MAP",
            Self::ModuleAttribute => "ELIXIR_MODULE_ATTRIBUTE",
            Self::ObsoleteWholeNumberBase => "ELIXIR_OBSOLETE_WHOLE_NUMBER_BASE",
            Self::OperationSign => "ELIXIR_OPERATION_SIGN",
            Self::Parentheses => "ELIXIR_PARENTHESES",
            Self::Semicolon => "ELIXIR_SEMICOLON",
            Self::Sigil => "ELIXIR_SIGIL",
            Self::String => "ELIXIR_STRING",
            Self::ValidDigit => "ELIXIR_VALID_DIGIT",
            Self::ValidEscapeSequence => "ELIXIR_VALID_ESCAPE_SEQUENCE",
            Self::WholeNumberBase => "ELIXIR_WHOLE_NUMBER_BASE",
        }
    }

    /// Generic color used when a scheme has no entry for [`key`](Self::key).
    #[must_use]
    pub const fn fallback(self) -> &'static str {
        match self {
            Self::Alias => "CLASS_NAME",
            Self::Atom => "INSTANCE_FIELD",
            Self::BadCharacter | Self::InvalidDigit | Self::ObsoleteWholeNumberBase => {
                "BAD_CHARACTER"
            }
            Self::Bit | Self::Braces | Self::ExpressionSubstitutionMark | Self::Map => "BRACES",
            Self::Brackets => "BRACKETS",
            Self::CharList | Self::String => "STRING",
            Self::CharToken => "MARKUP_ENTITY",
            Self::Comma => "COMMA",
            Self::Comment => "LINE_COMMENT",
            Self::Decimal | Self::ValidDigit | Self::WholeNumberBase => "NUMBER",
            Self::Dot => "DOT",
            Self::Identifier => "IDENTIFIER",
            Self::Keyword => "KEYWORD",
            Self::ModuleAttribute => "CONSTANT",
            Self::OperationSign => "OPERATION_SIGN",
            Self::Parentheses => "PARENTHESES",
            Self::Semicolon => "SEMICOLON",
            Self::Sigil => "TEMPLATE_LANGUAGE_COLOR",
            Self::ValidEscapeSequence => "VALID_STRING_ESCAPE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

const OPERATION_SIGNS: &[TokenKind] = &[
    TokenKind::AdditionOperator,
    TokenKind::SubtractionOperator,
    TokenKind::NegateOperator,
    TokenKind::NumberOrBadarithOperator,
    TokenKind::UnaryOperator,
    TokenKind::AndSymbolOperator,
    TokenKind::OrSymbolOperator,
    TokenKind::ArrowOperator,
    TokenKind::AssociationOperator,
    TokenKind::CaptureOperator,
    TokenKind::ComparisonOperator,
    TokenKind::DivisionOperator,
    TokenKind::InMatchOperator,
    TokenKind::MatchOperator,
    TokenKind::MultiplicationOperator,
    TokenKind::PipeOperator,
    TokenKind::PowerOperator,
    TokenKind::RangeOperator,
    TokenKind::RelationalOperator,
    TokenKind::StabOperator,
    TokenKind::TwoOperator,
    TokenKind::TypeOperator,
    TokenKind::XorOperator,
];

const KEYWORDS: &[TokenKind] = &[
    TokenKind::After,
    TokenKind::Catch,
    TokenKind::Do,
    TokenKind::Else,
    TokenKind::End,
    TokenKind::Fn,
    TokenKind::Rescue,
    TokenKind::AndWordOperator,
    TokenKind::OrWordOperator,
    TokenKind::NotOperator,
    TokenKind::InOperator,
    TokenKind::WhenOperator,
];

const VALID_DIGITS: &[TokenKind] = &[
    TokenKind::ValidDecimalDigits,
    TokenKind::ValidBinaryDigits,
    TokenKind::ValidOctalDigits,
    TokenKind::ValidHexadecimalDigits,
];

const INVALID_DIGITS: &[TokenKind] = &[
    TokenKind::InvalidDecimalDigits,
    TokenKind::InvalidBinaryDigits,
    TokenKind::InvalidOctalDigits,
    TokenKind::InvalidHexadecimalDigits,
    TokenKind::InvalidUnknownBaseDigits,
];

const BASES: &[TokenKind] = &[
    TokenKind::BaseWholeNumberPrefix,
    TokenKind::BinaryWholeNumberBase,
    TokenKind::OctalWholeNumberBase,
    TokenKind::HexadecimalWholeNumberBase,
    TokenKind::UnknownWholeNumberBase,
];

const STRINGS: &[TokenKind] = &[
    TokenKind::StringPromoter,
    TokenKind::StringFragment,
    TokenKind::StringTerminator,
    TokenKind::StringHeredocPromoter,
    TokenKind::StringHeredocTerminator,
];

const CHAR_LISTS: &[TokenKind] = &[
    TokenKind::CharListPromoter,
    TokenKind::CharListFragment,
    TokenKind::CharListTerminator,
    TokenKind::CharListHeredocPromoter,
    TokenKind::CharListHeredocTerminator,
];

const SIGILS: &[TokenKind] = &[
    TokenKind::Tilde,
    TokenKind::InterpolatingSigilName,
    TokenKind::LiteralSigilName,
    TokenKind::SigilPromoter,
    TokenKind::SigilFragment,
    TokenKind::SigilTerminator,
    TokenKind::SigilHeredocPromoter,
    TokenKind::SigilHeredocTerminator,
    TokenKind::SigilModifiers,
];

static TABLE: LazyLock<HashMap<TokenKind, &'static [Category]>> = LazyLock::new(|| {
    let groups: &[(&[TokenKind], &'static [Category])] = &[
        (&[TokenKind::AliasToken], &[Category::Alias]),
        (
            &[TokenKind::AtomFragment, TokenKind::Colon],
            &[Category::Atom],
        ),
        (
            &[TokenKind::True, TokenKind::False, TokenKind::Nil],
            &[Category::Atom, Category::Keyword],
        ),
        (&[TokenKind::BadCharacter], &[Category::BadCharacter]),
        (
            &[TokenKind::OpeningBit, TokenKind::ClosingBit],
            &[Category::Bit],
        ),
        (
            &[TokenKind::OpeningCurly, TokenKind::ClosingCurly],
            &[Category::Braces],
        ),
        (
            &[TokenKind::OpeningBracket, TokenKind::ClosingBracket],
            &[Category::Brackets],
        ),
        (
            &[TokenKind::OpeningParenthesis, TokenKind::ClosingParenthesis],
            &[Category::Parentheses],
        ),
        (CHAR_LISTS, &[Category::CharList]),
        (
            &[TokenKind::CharTokenizer, TokenKind::CharacterToken],
            &[Category::CharToken],
        ),
        (&[TokenKind::Comma], &[Category::Comma]),
        (&[TokenKind::Comment], &[Category::Comment]),
        (
            &[
                TokenKind::DecimalMark,
                TokenKind::ExponentMark,
                TokenKind::NumberSeparator,
            ],
            &[Category::Decimal],
        ),
        (&[TokenKind::DotOperator], &[Category::Dot]),
        (
            &[TokenKind::InterpolationStart, TokenKind::InterpolationEnd],
            &[Category::ExpressionSubstitutionMark],
        ),
        (&[TokenKind::IdentifierToken], &[Category::Identifier]),
        (INVALID_DIGITS, &[Category::InvalidDigit]),
        (KEYWORDS, &[Category::Keyword]),
        (&[TokenKind::StructOperator], &[Category::Map]),
        (&[TokenKind::AtOperator], &[Category::ModuleAttribute]),
        (OPERATION_SIGNS, &[Category::OperationSign]),
        (&[TokenKind::Semicolon], &[Category::Semicolon]),
        (SIGILS, &[Category::Sigil]),
        (STRINGS, &[Category::String]),
        (VALID_DIGITS, &[Category::ValidDigit]),
        (&[TokenKind::EscapeSequence], &[Category::ValidEscapeSequence]),
        (BASES, &[Category::WholeNumberBase]),
    ];

    let mut table = HashMap::new();
    for (kinds, categories) in groups {
        for &kind in *kinds {
            table.insert(kind, *categories);
        }
    }
    table
});

/// Categories for a token tag. Whitespace, newlines, and heredoc
/// prefixes have none.
#[must_use]
pub fn categories(kind: TokenKind) -> &'static [Category] {
    TABLE.get(&kind).copied().unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_keywords_are_atoms_too() {
        assert_eq!(
            categories(TokenKind::Nil),
            &[Category::Atom, Category::Keyword]
        );
    }

    #[test]
    fn trivia_is_unmapped() {
        assert!(categories(TokenKind::WhiteSpace).is_empty());
        assert!(categories(TokenKind::Eol).is_empty());
        assert!(categories(TokenKind::HeredocLinePrefix).is_empty());
    }

    #[test]
    fn keys_and_fallbacks() {
        let alias = categories(TokenKind::AliasToken)[0];
        assert_eq!(alias.key(), "ELIXIR_ALIAS");
        assert_eq!(alias.fallback(), "CLASS_NAME");
        assert_eq!(
            categories(TokenKind::InvalidHexadecimalDigits)[0].fallback(),
            "BAD_CHARACTER"
        );
        assert_eq!(Category::Sigil.to_string(), "ELIXIR_SIGIL");
    }
}
