use std::fmt;
use std::ops::Range;

/// Source location of a token or node.
///
/// `start` and `end` are byte offsets into the source; `line` and
/// `column` are 1-based and describe `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`. Position is
    /// taken from whichever starts first.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let (first, end) = if self.start <= other.start {
            (self, if other.end > self.end { other.end } else { self.end })
        } else {
            (other, if self.end > other.end { self.end } else { other.end })
        };
        Self {
            start: first.start,
            end,
            line: first.line,
            column: first.column,
        }
    }

    #[must_use]
    pub const fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Token tags produced by the lexer.
///
/// The tags are deliberately fine grained: number tokens are split into
/// prefix, base, digit runs and separators, and string-like literals are
/// split into promoter, fragments, escapes, interpolation markers, and
/// terminator. Concatenating the text of every token reproduces the
/// source exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // -- trivia --
    /// Spaces, tabs, form feeds, escaped newlines, and newlines that do
    /// not end an expression.
    WhiteSpace,
    /// Newline that may end an expression.
    Eol,
    /// `# ...` up to the end of the line.
    Comment,
    /// Character with no transition in the current state.
    BadCharacter,

    // -- punctuation --
    OpeningParenthesis,
    ClosingParenthesis,
    OpeningBracket,
    ClosingBracket,
    OpeningCurly,
    ClosingCurly,
    /// `<<`
    OpeningBit,
    /// `>>`
    ClosingBit,
    Comma,
    Semicolon,
    /// `.`
    DotOperator,
    /// `:` either starting an atom or ending a keyword key.
    Colon,
    /// `::`
    TypeOperator,

    // -- names --
    IdentifierToken,
    AliasToken,
    /// Atom name after `:`, or a keyword-pair key before `:`.
    AtomFragment,

    // -- reserved words --
    After,
    Catch,
    Do,
    Else,
    End,
    Fn,
    Rescue,
    True,
    False,
    Nil,

    // -- operators --
    /// Binary `+`.
    AdditionOperator,
    /// Binary `-`.
    SubtractionOperator,
    /// Unary `-`.
    NegateOperator,
    /// Unary `+`.
    NumberOrBadarithOperator,
    /// `!`, `^`, `~~~`
    UnaryOperator,
    /// `not`
    NotOperator,
    /// `&&`, `&&&`
    AndSymbolOperator,
    /// `and`
    AndWordOperator,
    /// `||`, `|||`
    OrSymbolOperator,
    /// `or`
    OrWordOperator,
    /// `|>`, `<<<`, `>>>`, `<<~`, `~>>`, `<~`, `~>`, `<~>`, `<|>`
    ArrowOperator,
    /// `=>`
    AssociationOperator,
    /// `@`
    AtOperator,
    /// `&`
    CaptureOperator,
    /// `==`, `!=`, `=~`, `===`, `!==`
    ComparisonOperator,
    /// `/`
    DivisionOperator,
    /// `in`
    InOperator,
    /// `<-`, `\\`
    InMatchOperator,
    /// `=`
    MatchOperator,
    /// `*`
    MultiplicationOperator,
    /// `|`
    PipeOperator,
    /// `**`
    PowerOperator,
    /// `..`
    RangeOperator,
    /// `<`, `>`, `<=`, `>=`
    RelationalOperator,
    /// `->`
    StabOperator,
    /// `%`
    StructOperator,
    /// `++`, `--`, `<>`
    TwoOperator,
    /// `when`
    WhenOperator,
    /// `^^^`
    XorOperator,

    // -- numbers --
    ValidDecimalDigits,
    InvalidDecimalDigits,
    /// `.` between whole and fractional digits.
    DecimalMark,
    /// `e`, `e+`, or `e-` in a float.
    ExponentMark,
    /// `_` between digits.
    NumberSeparator,
    /// The `0` in front of a base letter.
    BaseWholeNumberPrefix,
    BinaryWholeNumberBase,
    OctalWholeNumberBase,
    HexadecimalWholeNumberBase,
    UnknownWholeNumberBase,
    ValidBinaryDigits,
    InvalidBinaryDigits,
    ValidOctalDigits,
    InvalidOctalDigits,
    ValidHexadecimalDigits,
    InvalidHexadecimalDigits,
    InvalidUnknownBaseDigits,

    // -- character literals --
    /// `?`
    CharTokenizer,
    /// The character (or escape) after `?`.
    CharacterToken,

    // -- groups --
    StringPromoter,
    StringFragment,
    StringTerminator,
    StringHeredocPromoter,
    StringHeredocTerminator,
    CharListPromoter,
    CharListFragment,
    CharListTerminator,
    CharListHeredocPromoter,
    CharListHeredocTerminator,
    /// `~`
    Tilde,
    /// Lowercase sigil name; the sigil interpolates and escapes.
    InterpolatingSigilName,
    /// Uppercase sigil name; contents are taken verbatim.
    LiteralSigilName,
    SigilPromoter,
    SigilFragment,
    SigilTerminator,
    SigilHeredocPromoter,
    SigilHeredocTerminator,
    SigilModifiers,
    /// Backslash escape inside a group.
    EscapeSequence,
    /// `#{`
    InterpolationStart,
    /// `}` closing an interpolation.
    InterpolationEnd,
    /// Leading whitespace of a heredoc line.
    HeredocLinePrefix,
}

impl TokenKind {
    /// Whitespace and comments, which carry no syntax.
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::WhiteSpace | Self::Comment)
    }

    /// Tags that mark a lexical error.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(
            self,
            Self::BadCharacter
                | Self::InvalidDecimalDigits
                | Self::InvalidBinaryDigits
                | Self::InvalidOctalDigits
                | Self::InvalidHexadecimalDigits
                | Self::InvalidUnknownBaseDigits
        )
    }

    /// Tokens that continue a number literal.
    #[must_use]
    pub const fn is_number_part(self) -> bool {
        matches!(
            self,
            Self::ValidDecimalDigits
                | Self::InvalidDecimalDigits
                | Self::DecimalMark
                | Self::ExponentMark
                | Self::NumberSeparator
                | Self::BaseWholeNumberPrefix
                | Self::BinaryWholeNumberBase
                | Self::OctalWholeNumberBase
                | Self::HexadecimalWholeNumberBase
                | Self::UnknownWholeNumberBase
                | Self::ValidBinaryDigits
                | Self::InvalidBinaryDigits
                | Self::ValidOctalDigits
                | Self::InvalidOctalDigits
                | Self::ValidHexadecimalDigits
                | Self::InvalidHexadecimalDigits
                | Self::InvalidUnknownBaseDigits
        )
    }

    /// Upper snake case tag name, e.g. `AND_SYMBOL_OPERATOR`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WhiteSpace => "WHITE_SPACE",
            Self::Eol => "EOL",
            Self::Comment => "COMMENT",
            Self::BadCharacter => "BAD_CHARACTER",
            Self::OpeningParenthesis => "OPENING_PARENTHESIS",
            Self::ClosingParenthesis => "CLOSING_PARENTHESIS",
            Self::OpeningBracket => "OPENING_BRACKET",
            Self::ClosingBracket => "CLOSING_BRACKET",
            Self::OpeningCurly => "OPENING_CURLY",
            Self::ClosingCurly => "CLOSING_CURLY",
            Self::OpeningBit => "OPENING_BIT",
            Self::ClosingBit => "CLOSING_BIT",
            Self::Comma => "COMMA",
            Self::Semicolon => "SEMICOLON",
            Self::DotOperator => "DOT_OPERATOR",
            Self::Colon => "COLON",
            Self::TypeOperator => "TYPE_OPERATOR",
            Self::IdentifierToken => "IDENTIFIER_TOKEN",
            Self::AliasToken => "ALIAS_TOKEN",
            Self::AtomFragment => "ATOM_FRAGMENT",
            Self::After => "AFTER",
            Self::Catch => "CATCH",
            Self::Do => "DO",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::Fn => "FN",
            Self::Rescue => "RESCUE",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Nil => "NIL",
            Self::AdditionOperator => "ADDITION_OPERATOR",
            Self::SubtractionOperator => "SUBTRACTION_OPERATOR",
            Self::NegateOperator => "NEGATE_OPERATOR",
            Self::NumberOrBadarithOperator => "NUMBER_OR_BADARITH_OPERATOR",
            Self::UnaryOperator => "UNARY_OPERATOR",
            Self::NotOperator => "NOT_OPERATOR",
            Self::AndSymbolOperator => "AND_SYMBOL_OPERATOR",
            Self::AndWordOperator => "AND_WORD_OPERATOR",
            Self::OrSymbolOperator => "OR_SYMBOL_OPERATOR",
            Self::OrWordOperator => "OR_WORD_OPERATOR",
            Self::ArrowOperator => "ARROW_OPERATOR",
            Self::AssociationOperator => "ASSOCIATION_OPERATOR",
            Self::AtOperator => "AT_OPERATOR",
            Self::CaptureOperator => "CAPTURE_OPERATOR",
            Self::ComparisonOperator => "COMPARISON_OPERATOR",
            Self::DivisionOperator => "DIVISION_OPERATOR",
            Self::InOperator => "IN_OPERATOR",
            Self::InMatchOperator => "IN_MATCH_OPERATOR",
            Self::MatchOperator => "MATCH_OPERATOR",
            Self::MultiplicationOperator => "MULTIPLICATION_OPERATOR",
            Self::PipeOperator => "PIPE_OPERATOR",
            Self::PowerOperator => "POWER_OPERATOR",
            Self::RangeOperator => "RANGE_OPERATOR",
            Self::RelationalOperator => "RELATIONAL_OPERATOR",
            Self::StabOperator => "STAB_OPERATOR",
            Self::StructOperator => "STRUCT_OPERATOR",
            Self::TwoOperator => "TWO_OPERATOR",
            Self::WhenOperator => "WHEN_OPERATOR",
            Self::XorOperator => "XOR_OPERATOR",
            Self::ValidDecimalDigits => "VALID_DECIMAL_DIGITS",
            Self::InvalidDecimalDigits => "INVALID_DECIMAL_DIGITS",
            Self::DecimalMark => "DECIMAL_MARK",
            Self::ExponentMark => "EXPONENT_MARK",
            Self::NumberSeparator => "NUMBER_SEPARATOR",
            Self::BaseWholeNumberPrefix => "BASE_WHOLE_NUMBER_PREFIX",
            Self::BinaryWholeNumberBase => "BINARY_WHOLE_NUMBER_BASE",
            Self::OctalWholeNumberBase => "OCTAL_WHOLE_NUMBER_BASE",
            Self::HexadecimalWholeNumberBase => "HEXADECIMAL_WHOLE_NUMBER_BASE",
            Self::UnknownWholeNumberBase => "UNKNOWN_WHOLE_NUMBER_BASE",
            Self::ValidBinaryDigits => "VALID_BINARY_DIGITS",
            Self::InvalidBinaryDigits => "INVALID_BINARY_DIGITS",
            Self::ValidOctalDigits => "VALID_OCTAL_DIGITS",
            Self::InvalidOctalDigits => "INVALID_OCTAL_DIGITS",
            Self::ValidHexadecimalDigits => "VALID_HEXADECIMAL_DIGITS",
            Self::InvalidHexadecimalDigits => "INVALID_HEXADECIMAL_DIGITS",
            Self::InvalidUnknownBaseDigits => "INVALID_UNKNOWN_BASE_DIGITS",
            Self::CharTokenizer => "CHAR_TOKENIZER",
            Self::CharacterToken => "CHARACTER_TOKEN",
            Self::StringPromoter => "STRING_PROMOTER",
            Self::StringFragment => "STRING_FRAGMENT",
            Self::StringTerminator => "STRING_TERMINATOR",
            Self::StringHeredocPromoter => "STRING_HEREDOC_PROMOTER",
            Self::StringHeredocTerminator => "STRING_HEREDOC_TERMINATOR",
            Self::CharListPromoter => "CHAR_LIST_PROMOTER",
            Self::CharListFragment => "CHAR_LIST_FRAGMENT",
            Self::CharListTerminator => "CHAR_LIST_TERMINATOR",
            Self::CharListHeredocPromoter => "CHAR_LIST_HEREDOC_PROMOTER",
            Self::CharListHeredocTerminator => "CHAR_LIST_HEREDOC_TERMINATOR",
            Self::Tilde => "TILDE",
            Self::InterpolatingSigilName => "INTERPOLATING_SIGIL_NAME",
            Self::LiteralSigilName => "LITERAL_SIGIL_NAME",
            Self::SigilPromoter => "SIGIL_PROMOTER",
            Self::SigilFragment => "SIGIL_FRAGMENT",
            Self::SigilTerminator => "SIGIL_TERMINATOR",
            Self::SigilHeredocPromoter => "SIGIL_HEREDOC_PROMOTER",
            Self::SigilHeredocTerminator => "SIGIL_HEREDOC_TERMINATOR",
            Self::SigilModifiers => "SIGIL_MODIFIERS",
            Self::EscapeSequence => "ESCAPE_SEQUENCE",
            Self::InterpolationStart => "INTERPOLATION_START",
            Self::InterpolationEnd => "INTERPOLATION_END",
            Self::HeredocLinePrefix => "HEREDOC_LINE_PREFIX",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token with its kind, source text, and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_takes_earliest_position() {
        let a = Span::new(4, 6, 1, 5);
        let b = Span::new(0, 2, 1, 1);
        let merged = a.merge(b);
        assert_eq!(merged, Span::new(0, 6, 1, 1));
        assert_eq!(merged.len(), 6);
        assert_eq!(b.merge(a), merged);
    }

    #[test]
    fn tag_names_are_upper_snake_case() {
        assert_eq!(TokenKind::AndSymbolOperator.name(), "AND_SYMBOL_OPERATOR");
        assert_eq!(
            TokenKind::InvalidUnknownBaseDigits.to_string(),
            "INVALID_UNKNOWN_BASE_DIGITS"
        );
    }

    #[test]
    fn number_parts_and_errors() {
        assert!(TokenKind::NumberSeparator.is_number_part());
        assert!(!TokenKind::DotOperator.is_number_part());
        assert!(TokenKind::InvalidHexadecimalDigits.is_error());
        assert!(!TokenKind::ValidHexadecimalDigits.is_error());
    }
}
