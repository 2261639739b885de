use std::fmt;

/// Lexical states of the tokenizer.
///
/// The state after a token decides how the next characters are read:
/// whether `-` negates or subtracts, whether a newline ends the
/// expression, whether `foo:` is a keyword key, and so on. Group states
/// (`Group*`) are only meaningful with a group frame on the lexer's
/// stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    /// Top level: the start of an expression.
    #[default]
    Initial,
    /// After a closing bracket, atom, char token, or whitespace following
    /// an operand. `+`/`-` are binary.
    AdditionOrSubtractionMaybe,
    /// After an alias.
    AdditionOrSubtractionOrWhiteSpaceMaybe,
    /// After `true`, `false`, `nil`, or a string terminator, where a
    /// `:` may still turn the literal into a keyword key.
    AdditionOrKeywordPairOrSubtractionOrWhiteSpaceMaybe,
    /// Directly after an identifier.
    AfterUnqualifiedIdentifier,
    /// After an identifier and whitespace: `foo -1` is a call while
    /// `foo - 1` subtracts.
    CallOrAdditionOrSubtractionMaybe,
    /// After a `:` that is not followed by whitespace.
    AtomStart,
    /// After the `0` of a based integer.
    BaseWholeNumberBase,
    BinaryWholeNumber,
    OctalWholeNumber,
    HexadecimalWholeNumber,
    UnknownBaseWholeNumber,
    DecimalWholeNumber,
    DecimalFraction,
    DecimalExponent,
    /// After `.`: the next name is a call or alias segment.
    DotOperation,
    /// After `end`, `!`, `^`, `%`, or a keyword key.
    KeywordPairMaybe,
    /// After a binary operator or block keyword; newlines continue the
    /// expression.
    KeywordPairOrMultilineWhiteSpaceMaybe,
    /// After an opening bracket, `;`, or `::`; newlines are whitespace.
    MultilineWhiteSpaceMaybe,
    /// After `?`.
    CharTokenization,
    /// After `~`, reading the sigil name and promoter.
    Sigil,
    /// After a sigil terminator.
    SigilModifiers,
    /// Inside a single-line (or multi-line, non-heredoc) group.
    Group,
    /// Rest of the line after a heredoc promoter.
    GroupHeredocStart,
    /// Indentation at the start of a heredoc line.
    GroupHeredocLineStart,
    /// Body of a heredoc line.
    GroupHeredocLineBody,
}

impl State {
    /// Every state, in declaration order.
    pub const ALL: [Self; 26] = [
        Self::Initial,
        Self::AdditionOrSubtractionMaybe,
        Self::AdditionOrSubtractionOrWhiteSpaceMaybe,
        Self::AdditionOrKeywordPairOrSubtractionOrWhiteSpaceMaybe,
        Self::AfterUnqualifiedIdentifier,
        Self::CallOrAdditionOrSubtractionMaybe,
        Self::AtomStart,
        Self::BaseWholeNumberBase,
        Self::BinaryWholeNumber,
        Self::OctalWholeNumber,
        Self::HexadecimalWholeNumber,
        Self::UnknownBaseWholeNumber,
        Self::DecimalWholeNumber,
        Self::DecimalFraction,
        Self::DecimalExponent,
        Self::DotOperation,
        Self::KeywordPairMaybe,
        Self::KeywordPairOrMultilineWhiteSpaceMaybe,
        Self::MultilineWhiteSpaceMaybe,
        Self::CharTokenization,
        Self::Sigil,
        Self::SigilModifiers,
        Self::Group,
        Self::GroupHeredocStart,
        Self::GroupHeredocLineStart,
        Self::GroupHeredocLineBody,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Initial => "YYINITIAL",
            Self::AdditionOrSubtractionMaybe => "ADDITION_OR_SUBTRACTION_MAYBE",
            Self::AdditionOrSubtractionOrWhiteSpaceMaybe => {
                "ADDITION_OR_SUBTRACTION_OR_WHITE_SPACE_MAYBE"
            }
            Self::AdditionOrKeywordPairOrSubtractionOrWhiteSpaceMaybe => {
                "ADDITION_OR_KEYWORD_PAIR_OR_SUBTRACTION_OR_WHITE_SPACE_MAYBE"
            }
            Self::AfterUnqualifiedIdentifier => "AFTER_UNQUALIFIED_IDENTIFIER",
            Self::CallOrAdditionOrSubtractionMaybe => "CALL_OR_ADDITION_OR_SUBTRACTION_MAYBE",
            Self::AtomStart => "ATOM_START",
            Self::BaseWholeNumberBase => "BASE_WHOLE_NUMBER_BASE",
            Self::BinaryWholeNumber => "BINARY_WHOLE_NUMBER",
            Self::OctalWholeNumber => "OCTAL_WHOLE_NUMBER",
            Self::HexadecimalWholeNumber => "HEXADECIMAL_WHOLE_NUMBER",
            Self::UnknownBaseWholeNumber => "UNKNOWN_BASE_WHOLE_NUMBER",
            Self::DecimalWholeNumber => "DECIMAL_WHOLE_NUMBER",
            Self::DecimalFraction => "DECIMAL_FRACTION",
            Self::DecimalExponent => "DECIMAL_EXPONENT",
            Self::DotOperation => "DOT_OPERATION",
            Self::KeywordPairMaybe => "KEYWORD_PAIR_MAYBE",
            Self::KeywordPairOrMultilineWhiteSpaceMaybe => {
                "KEYWORD_PAIR_OR_MULTILINE_WHITE_SPACE_MAYBE"
            }
            Self::MultilineWhiteSpaceMaybe => "MULTILINE_WHITE_SPACE_MAYBE",
            Self::CharTokenization => "CHAR_TOKENIZATION",
            Self::Sigil => "SIGIL",
            Self::SigilModifiers => "SIGIL_MODIFIERS",
            Self::Group => "GROUP",
            Self::GroupHeredocStart => "GROUP_HEREDOC_START",
            Self::GroupHeredocLineStart => "GROUP_HEREDOC_LINE_START",
            Self::GroupHeredocLineBody => "GROUP_HEREDOC_LINE_BODY",
        }
    }

    /// Look a state up by its upper snake case name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.name() == name)
    }

    /// States reached right after a complete operand, where `+`/`-`
    /// are binary.
    #[must_use]
    pub const fn follows_operand(self) -> bool {
        matches!(
            self,
            Self::AdditionOrSubtractionMaybe
                | Self::AdditionOrSubtractionOrWhiteSpaceMaybe
                | Self::AdditionOrKeywordPairOrSubtractionOrWhiteSpaceMaybe
                | Self::AfterUnqualifiedIdentifier
                | Self::BinaryWholeNumber
                | Self::OctalWholeNumber
                | Self::HexadecimalWholeNumber
                | Self::UnknownBaseWholeNumber
                | Self::DecimalWholeNumber
                | Self::DecimalFraction
                | Self::DecimalExponent
        )
    }

    /// States that read digits of a number literal.
    #[must_use]
    pub const fn is_number(self) -> bool {
        matches!(
            self,
            Self::BinaryWholeNumber
                | Self::OctalWholeNumber
                | Self::HexadecimalWholeNumber
                | Self::UnknownBaseWholeNumber
                | Self::DecimalWholeNumber
                | Self::DecimalFraction
                | Self::DecimalExponent
        )
    }

    /// States that only exist inside a group frame.
    #[must_use]
    pub const fn is_group(self) -> bool {
        matches!(
            self,
            Self::Group
                | Self::GroupHeredocStart
                | Self::GroupHeredocLineStart
                | Self::GroupHeredocLineBody
        )
    }

    /// Whether a newline in this state is plain whitespace rather than
    /// an expression-ending EOL.
    #[must_use]
    pub const fn newline_is_white_space(self) -> bool {
        matches!(
            self,
            Self::MultilineWhiteSpaceMaybe
                | Self::KeywordPairOrMultilineWhiteSpaceMaybe
                | Self::DotOperation
        )
    }

    /// State after a run of whitespace.
    #[must_use]
    pub const fn after_white_space(self) -> Self {
        match self {
            Self::MultilineWhiteSpaceMaybe | Self::KeywordPairOrMultilineWhiteSpaceMaybe => {
                Self::MultilineWhiteSpaceMaybe
            }
            Self::AfterUnqualifiedIdentifier | Self::CallOrAdditionOrSubtractionMaybe => {
                Self::CallOrAdditionOrSubtractionMaybe
            }
            Self::DotOperation => Self::DotOperation,
            state if state.follows_operand() => Self::AdditionOrSubtractionMaybe,
            _ => Self::Initial,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for state in State::ALL {
            assert_eq!(State::from_name(state.name()), Some(state));
        }
        assert_eq!(State::from_name("NOT_A_STATE"), None);
    }

    #[test]
    fn whitespace_after_identifier_allows_calls() {
        assert_eq!(
            State::AfterUnqualifiedIdentifier.after_white_space(),
            State::CallOrAdditionOrSubtractionMaybe
        );
        assert_eq!(
            State::DecimalWholeNumber.after_white_space(),
            State::AdditionOrSubtractionMaybe
        );
        assert_eq!(State::KeywordPairMaybe.after_white_space(), State::Initial);
    }
}
