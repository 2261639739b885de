//! Tokenizer for Elixir source.
//!
//! The lexer is a hand-written state machine. Besides the current
//! [`State`] it keeps a stack of frames for nested constructs: every
//! string, charlist, sigil, or heredoc pushes a group frame, and every
//! `#{` inside one pushes an interpolation frame that counts braces so
//! the matching `}` can hand control back to the group.
//!
//! Lexing never fails. Characters without a transition become
//! [`TokenKind::BadCharacter`] tokens, misplaced digits become
//! `Invalid*Digits` tokens, and each such token is also recorded as a
//! [`LexError`].

mod group;
mod number;
mod state;

use std::fmt;

use tracing::debug;

use crate::cancel::CancellationToken;
use crate::token::{Span, Token, TokenKind};

use group::Frame;
pub use state::State;

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Character that cannot start any token.
    BadCharacter(char),
    /// Digits that do not belong to the number's base.
    InvalidDigits { base: &'static str, digits: String },
    /// End of input inside a string, charlist, sigil, or heredoc.
    UnterminatedGroup { terminator: String },
    /// Something other than whitespace after a heredoc promoter.
    InvalidHeredocStart,
    /// `\x` or `\u` escape that is not a Unicode scalar value.
    InvalidEscape(String),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadCharacter(ch) => {
                write!(f, "unexpected character: {ch:?}")
            }
            Self::InvalidDigits { base, digits } => {
                write!(f, "invalid {base} digits: {digits}")
            }
            Self::UnterminatedGroup { terminator } => {
                write!(f, "missing terminator: {terminator}")
            }
            Self::InvalidHeredocStart => {
                write!(
                    f,
                    "heredoc allows only whitespace characters \
                     followed by a new line after the opening delimiter"
                )
            }
            Self::InvalidEscape(escape) => {
                write!(f, "invalid escape sequence: {escape}")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Tokenize a complete source string.
///
/// Returns every token together with the lexical errors found along
/// the way. The token texts concatenate back to the input (minus a
/// leading byte order mark).
#[must_use]
pub fn tokenize(input: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut lexer = Lexer::new(input);
    let tokens = lexer.by_ref().collect();
    (tokens, lexer.into_errors())
}

/// Operators matched longest first. `+`, `-`, `.`, `:`, and `~` are
/// handled separately because their meaning depends on the state.
const OPERATORS: &[(&str, TokenKind, State)] = &[
    ("!==", TokenKind::ComparisonOperator, MULTILINE_KEYWORD),
    ("===", TokenKind::ComparisonOperator, MULTILINE_KEYWORD),
    ("&&&", TokenKind::AndSymbolOperator, MULTILINE_KEYWORD),
    ("|||", TokenKind::OrSymbolOperator, MULTILINE_KEYWORD),
    ("<<<", TokenKind::ArrowOperator, MULTILINE_KEYWORD),
    (">>>", TokenKind::ArrowOperator, MULTILINE_KEYWORD),
    ("<<~", TokenKind::ArrowOperator, MULTILINE_KEYWORD),
    ("<|>", TokenKind::ArrowOperator, MULTILINE_KEYWORD),
    ("<~>", TokenKind::ArrowOperator, MULTILINE_KEYWORD),
    ("^^^", TokenKind::XorOperator, MULTILINE_KEYWORD),
    ("!=", TokenKind::ComparisonOperator, MULTILINE_KEYWORD),
    ("==", TokenKind::ComparisonOperator, MULTILINE_KEYWORD),
    ("=~", TokenKind::ComparisonOperator, MULTILINE_KEYWORD),
    ("=>", TokenKind::AssociationOperator, MULTILINE_KEYWORD),
    ("&&", TokenKind::AndSymbolOperator, MULTILINE_KEYWORD),
    ("||", TokenKind::OrSymbolOperator, MULTILINE_KEYWORD),
    ("|>", TokenKind::ArrowOperator, MULTILINE_KEYWORD),
    ("++", TokenKind::TwoOperator, MULTILINE_KEYWORD),
    ("--", TokenKind::TwoOperator, MULTILINE_KEYWORD),
    ("<>", TokenKind::TwoOperator, MULTILINE_KEYWORD),
    ("->", TokenKind::StabOperator, MULTILINE_KEYWORD),
    ("**", TokenKind::PowerOperator, MULTILINE_KEYWORD),
    ("<-", TokenKind::InMatchOperator, MULTILINE_KEYWORD),
    ("\\\\", TokenKind::InMatchOperator, MULTILINE_KEYWORD),
    ("<=", TokenKind::RelationalOperator, MULTILINE_KEYWORD),
    (">=", TokenKind::RelationalOperator, MULTILINE_KEYWORD),
    ("<~", TokenKind::ArrowOperator, MULTILINE_KEYWORD),
    ("<<", TokenKind::OpeningBit, State::MultilineWhiteSpaceMaybe),
    (">>", TokenKind::ClosingBit, State::AdditionOrSubtractionMaybe),
    ("!", TokenKind::UnaryOperator, State::KeywordPairMaybe),
    ("^", TokenKind::UnaryOperator, State::KeywordPairMaybe),
    ("%", TokenKind::StructOperator, State::KeywordPairMaybe),
    ("&", TokenKind::CaptureOperator, MULTILINE_KEYWORD),
    ("*", TokenKind::MultiplicationOperator, MULTILINE_KEYWORD),
    ("/", TokenKind::DivisionOperator, MULTILINE_KEYWORD),
    ("<", TokenKind::RelationalOperator, MULTILINE_KEYWORD),
    (">", TokenKind::RelationalOperator, MULTILINE_KEYWORD),
    ("=", TokenKind::MatchOperator, MULTILINE_KEYWORD),
    ("|", TokenKind::PipeOperator, MULTILINE_KEYWORD),
    ("@", TokenKind::AtOperator, MULTILINE_KEYWORD),
];

const MULTILINE_KEYWORD: State = State::KeywordPairOrMultilineWhiteSpaceMaybe;

/// Operator names that may follow `:` to form an atom, longest first.
const ATOM_OPERATORS: &[&str] = &[
    "<<>>", "%{}", "...", "!==", "===", "<<<", ">>>", "<<~", "~>>", "<~>", "<|>", "&&&", "|||",
    "^^^", "~~~", "\\\\", "{}", "..", "!=", "==", "=~", "<=", ">=", "&&", "||", "|>", "++", "--",
    "**", "->", "<-", "<>", "<~", "~>", "::", ".", "%", "&", "|", "=", "!", "<", ">", "+", "-", "*",
    "/", "^", "@",
];

/// Operator names usable as remote function names, as in `Kernel.+(1, 2)`.
const DOT_CALL_OPERATORS: &[&str] = &[
    "!==", "===", "<<<", ">>>", "<<~", "~>>", "<~>", "<|>", "&&&", "|||", "^^^", "~~~", "!=", "==",
    "=~", "<=", ">=", "&&", "||", "|>", "++", "--", "**", "->", "<-", "<>", "<~", "~>", "&", "|",
    "=", "!", "<", ">", "+", "-", "*", "/", "^", "@",
];

#[derive(Debug, Clone, Copy)]
struct Mark {
    pos: usize,
    line: usize,
    column: usize,
}

/// Lazy tokenizer over a source string.
///
/// Iterating yields tokens one at a time; [`Lexer::state`] reports the
/// state reached after the last token. A lexer only moves forward: to
/// re-lex, build a new one.
#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    token_start: Mark,
    state: State,
    stack: Vec<Frame>,
    /// Sigil name seen, promoter not yet: `Some(interpolating)`.
    pending_sigil: Option<bool>,
    pending_error: Option<LexErrorKind>,
    errors: Vec<LexError>,
    cancellation: Option<CancellationToken>,
    cancelled: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::starting_in(input, State::Initial)
    }

    /// Start lexing `input` in `state` instead of [`State::Initial`].
    ///
    /// Starting in a group state behaves as if a double-quoted string
    /// (or string heredoc) had just been opened.
    #[must_use]
    pub fn starting_in(input: &'a str, state: State) -> Self {
        let pos = if input.starts_with('\u{feff}') {
            '\u{feff}'.len_utf8()
        } else {
            0
        };
        let start = Mark {
            pos,
            line: 1,
            column: 1,
        };
        let mut lexer = Self {
            input,
            pos,
            line: 1,
            column: 1,
            token_start: start,
            state,
            stack: Vec::new(),
            pending_sigil: None,
            pending_error: None,
            errors: Vec::new(),
            cancellation: None,
            cancelled: false,
            finished: false,
        };
        if state.is_group() {
            lexer.push_group(group::Family::String, '"', state != State::Group, true);
        }
        lexer
    }

    /// Poll `token` between tokens and stop early once it is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// State after the most recently produced token.
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Errors recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<LexError> {
        self.errors
    }

    /// Whether iteration stopped because of cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    // -- cursor --

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Advance over `len` bytes, which must end on a char boundary.
    fn advance_bytes(&mut self, len: usize) {
        let target = self.pos + len;
        while self.pos < target && self.advance().is_some() {}
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    /// Consume `\n`, `\r\n`, or a lone `\r`.
    fn consume_newline(&mut self) {
        if self.advance() == Some('\r') && self.peek() == Some('\n') {
            self.advance();
        }
    }

    const fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    /// Span from the start of the current token to the cursor.
    const fn token_span(&self) -> Span {
        Span::new(
            self.token_start.pos,
            self.pos,
            self.token_start.line,
            self.token_start.column,
        )
    }

    const fn to(&mut self, state: State, kind: TokenKind) -> TokenKind {
        self.state = state;
        kind
    }

    // -- dispatch --

    fn lex_token(&mut self) -> TokenKind {
        match self.state {
            State::Group => self.lex_group(),
            State::GroupHeredocStart => self.lex_heredoc_start(),
            State::GroupHeredocLineStart => self.lex_heredoc_line_start(),
            State::GroupHeredocLineBody => self.lex_heredoc_line_body(),
            State::Sigil => self.lex_sigil(),
            State::SigilModifiers => self.lex_sigil_modifiers(),
            State::CharTokenization => self.lex_character(),
            State::AtomStart => self.lex_atom_start(),
            State::DotOperation => self.lex_dot_operation(),
            State::BaseWholeNumberBase => self.lex_base(),
            state if state.is_number() => self.lex_digits(),
            _ => self.lex_expression(),
        }
    }

    /// Characters at expression level. Every branch consumes at least
    /// one character.
    fn lex_expression(&mut self) -> TokenKind {
        let Some(ch) = self.peek() else {
            return self.to(State::Initial, TokenKind::BadCharacter);
        };
        match ch {
            ' ' | '\t' | '\x0C' => {
                self.advance_while(|c| matches!(c, ' ' | '\t' | '\x0C'));
                self.to(self.state.after_white_space(), TokenKind::WhiteSpace)
            }
            '\n' | '\r' => {
                self.consume_newline();
                if self.state.newline_is_white_space() {
                    TokenKind::WhiteSpace
                } else {
                    self.to(State::Initial, TokenKind::Eol)
                }
            }
            '\\' => self.lex_backslash(),
            '#' => {
                self.lex_comment();
                self.to(State::Initial, TokenKind::Comment)
            }
            '0'..='9' => self.lex_number_start(),
            '"' | '\'' => self.lex_promoter(ch),
            '?' => {
                self.advance();
                self.to(State::CharTokenization, TokenKind::CharTokenizer)
            }
            '~' => self.lex_tilde(),
            ':' => self.lex_colon(),
            '.' => self.lex_dot(),
            '{' => self.lex_opening_curly(),
            '}' => self.lex_closing_curly(),
            '(' => {
                self.advance();
                self.to(State::MultilineWhiteSpaceMaybe, TokenKind::OpeningParenthesis)
            }
            '[' => {
                self.advance();
                self.to(State::MultilineWhiteSpaceMaybe, TokenKind::OpeningBracket)
            }
            ')' => {
                self.advance();
                self.to(
                    State::AdditionOrSubtractionMaybe,
                    TokenKind::ClosingParenthesis,
                )
            }
            ']' => {
                self.advance();
                self.to(State::AdditionOrSubtractionMaybe, TokenKind::ClosingBracket)
            }
            ',' => {
                self.advance();
                self.to(State::Initial, TokenKind::Comma)
            }
            ';' => {
                self.advance();
                self.to(State::MultilineWhiteSpaceMaybe, TokenKind::Semicolon)
            }
            c if is_identifier_start(c) || c.is_ascii_uppercase() => self.lex_name(),
            _ => self.lex_operator(),
        }
    }

    fn lex_backslash(&mut self) -> TokenKind {
        match self.peek_at(1) {
            Some('\n' | '\r') => {
                // escaped EOL
                self.advance();
                self.consume_newline();
                self.to(self.state.after_white_space(), TokenKind::WhiteSpace)
            }
            Some('\\') => {
                self.advance_bytes(2);
                self.to(MULTILINE_KEYWORD, TokenKind::InMatchOperator)
            }
            _ => {
                self.advance();
                self.to(State::Initial, TokenKind::BadCharacter)
            }
        }
    }

    fn lex_comment(&mut self) {
        self.advance_while(|c| c != '\n' && c != '\r');
    }

    fn lex_operator(&mut self) -> TokenKind {
        let rest = self.rest();
        if let Some(&(text, kind, next)) = OPERATORS.iter().find(|(op, ..)| rest.starts_with(op)) {
            self.advance_bytes(text.len());
            return self.to(next, kind);
        }
        match self.peek() {
            Some(sign @ ('+' | '-')) => self.lex_sign(sign),
            _ => {
                self.advance();
                self.to(State::Initial, TokenKind::BadCharacter)
            }
        }
    }

    /// `+` or `-` on its own: binary after an operand, unary otherwise.
    fn lex_sign(&mut self, sign: char) -> TokenKind {
        self.advance();
        let binary = match self.state {
            State::CallOrAdditionOrSubtractionMaybe => {
                matches!(self.peek(), None | Some(' ' | '\t' | '\x0C' | '\n' | '\r'))
            }
            state => state.follows_operand(),
        };
        match (sign, binary) {
            ('+', true) => self.to(State::MultilineWhiteSpaceMaybe, TokenKind::AdditionOperator),
            (_, true) => self.to(
                State::MultilineWhiteSpaceMaybe,
                TokenKind::SubtractionOperator,
            ),
            ('+', false) => self.to(State::Initial, TokenKind::NumberOrBadarithOperator),
            (_, false) => self.to(State::Initial, TokenKind::NegateOperator),
        }
    }

    fn lex_tilde(&mut self) -> TokenKind {
        for (text, kind, next) in [
            ("~~~", TokenKind::UnaryOperator, State::KeywordPairMaybe),
            ("~>>", TokenKind::ArrowOperator, MULTILINE_KEYWORD),
            ("~>", TokenKind::ArrowOperator, MULTILINE_KEYWORD),
        ] {
            if self.starts_with(text) {
                self.advance_bytes(text.len());
                return self.to(next, kind);
            }
        }
        self.advance();
        self.pending_sigil = None;
        self.to(State::Sigil, TokenKind::Tilde)
    }

    fn lex_colon(&mut self) -> TokenKind {
        if self.starts_with("::") {
            self.advance_bytes(2);
            return self.to(State::MultilineWhiteSpaceMaybe, TokenKind::TypeOperator);
        }
        self.advance();
        if matches!(self.peek(), Some(' ' | '\t' | '\x0C' | '\n' | '\r')) {
            self.to(State::Initial, TokenKind::Colon)
        } else {
            self.to(State::AtomStart, TokenKind::Colon)
        }
    }

    fn lex_dot(&mut self) -> TokenKind {
        if self.starts_with("...") {
            self.advance_bytes(3);
            self.to(
                State::AfterUnqualifiedIdentifier,
                TokenKind::IdentifierToken,
            )
        } else if self.starts_with("..") {
            self.advance_bytes(2);
            self.to(MULTILINE_KEYWORD, TokenKind::RangeOperator)
        } else {
            self.advance();
            self.to(State::DotOperation, TokenKind::DotOperator)
        }
    }

    fn lex_opening_curly(&mut self) -> TokenKind {
        if let Some(Frame::Interpolation { braces, .. }) = self.stack.last_mut() {
            *braces += 1;
        }
        self.advance();
        self.to(State::MultilineWhiteSpaceMaybe, TokenKind::OpeningCurly)
    }

    fn lex_closing_curly(&mut self) -> TokenKind {
        self.advance();
        match self.stack.last_mut() {
            Some(Frame::Interpolation { braces: 0, resume }) => {
                let resume = *resume;
                self.pop_frame();
                self.to(resume, TokenKind::InterpolationEnd)
            }
            Some(Frame::Interpolation { braces, .. }) => {
                *braces -= 1;
                self.to(State::AdditionOrSubtractionMaybe, TokenKind::ClosingCurly)
            }
            _ => self.to(State::AdditionOrSubtractionMaybe, TokenKind::ClosingCurly),
        }
    }

    // -- names --

    fn lex_name(&mut self) -> TokenKind {
        if let Some(len) = self.keyword_key_len() {
            self.advance_bytes(len);
            return self.to(State::KeywordPairMaybe, TokenKind::AtomFragment);
        }
        let rest = self.rest();
        if rest.starts_with(|c: char| c.is_ascii_uppercase()) {
            let len = alias_len(rest);
            self.advance_bytes(len);
            return self.to(
                State::AdditionOrSubtractionOrWhiteSpaceMaybe,
                TokenKind::AliasToken,
            );
        }
        let len = identifier_len(rest, false);
        let text = &rest[..len];
        self.advance_bytes(len);
        match reserved_word(text) {
            Some((kind, next)) => self.to(next, kind),
            None => self.to(
                State::AfterUnqualifiedIdentifier,
                TokenKind::IdentifierToken,
            ),
        }
    }

    /// Length of `name` in `name: ` when the cursor is on a keyword key.
    fn keyword_key_len(&self) -> Option<usize> {
        let rest = self.rest();
        let len = identifier_len(rest, true);
        if len == 0 {
            return None;
        }
        let mut after = rest[len..].chars();
        let is_key = after.next() == Some(':')
            && matches!(after.next(), Some(' ' | '\t' | '\x0C' | '\n' | '\r'));
        is_key.then_some(len)
    }

    fn lex_atom_start(&mut self) -> TokenKind {
        let rest = self.rest();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => self.lex_promoter(quote),
            Some(c) if is_identifier_start(c) || c.is_ascii_uppercase() => {
                self.advance_bytes(identifier_len(rest, true));
                self.to(State::AdditionOrSubtractionMaybe, TokenKind::AtomFragment)
            }
            _ => {
                if let Some(op) = ATOM_OPERATORS.iter().find(|op| rest.starts_with(*op)) {
                    self.advance_bytes(op.len());
                    return self.to(State::AdditionOrSubtractionMaybe, TokenKind::AtomFragment);
                }
                self.state = State::Initial;
                self.lex_expression()
            }
        }
    }

    fn lex_dot_operation(&mut self) -> TokenKind {
        let rest = self.rest();
        match self.peek() {
            Some(' ' | '\t' | '\x0C') => {
                self.advance_while(|c| matches!(c, ' ' | '\t' | '\x0C'));
                TokenKind::WhiteSpace
            }
            Some('\n' | '\r') => {
                self.consume_newline();
                TokenKind::WhiteSpace
            }
            Some('#') => {
                self.lex_comment();
                TokenKind::Comment
            }
            Some(c) if c.is_ascii_uppercase() => {
                self.advance_bytes(alias_len(rest));
                self.to(
                    State::AdditionOrSubtractionOrWhiteSpaceMaybe,
                    TokenKind::AliasToken,
                )
            }
            Some(c) if is_identifier_start(c) => {
                self.advance_bytes(identifier_len(rest, false));
                self.to(
                    State::AfterUnqualifiedIdentifier,
                    TokenKind::IdentifierToken,
                )
            }
            _ => {
                if let Some(op) = DOT_CALL_OPERATORS.iter().find(|op| rest.starts_with(*op)) {
                    self.advance_bytes(op.len());
                    return self.to(
                        State::AfterUnqualifiedIdentifier,
                        TokenKind::IdentifierToken,
                    );
                }
                self.state = State::Initial;
                self.lex_expression()
            }
        }
    }

    /// The character after `?`, possibly an escape.
    fn lex_character(&mut self) -> TokenKind {
        if self.advance() == Some('\\') {
            if let Some(escaped) = self.advance() {
                self.lex_escape_tail(escaped);
            }
        }
        self.to(State::AdditionOrSubtractionMaybe, TokenKind::CharacterToken)
    }

    /// Consume the rest of an escape whose first character after the
    /// backslash was `escaped`.
    fn lex_escape_tail(&mut self, escaped: char) {
        let max_digits = match escaped {
            'x' => 2,
            'u' => 4,
            '\r' => {
                if self.peek() == Some('\n') {
                    self.advance();
                }
                return;
            }
            _ => return,
        };
        if self.peek() == Some('{') {
            self.advance();
            self.advance_while(|c| c.is_ascii_hexdigit());
            if self.peek() == Some('}') {
                self.advance();
            }
        } else {
            for _ in 0..max_digits {
                if !self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    break;
                }
                self.advance();
            }
        }
    }

    fn record_error(&mut self, kind: TokenKind, text: &str, span: Span) {
        let error = match self.pending_error.take() {
            Some(error) => error,
            None if kind == TokenKind::BadCharacter => {
                LexErrorKind::BadCharacter(text.chars().next().unwrap_or('\u{fffd}'))
            }
            None if kind.is_error() => LexErrorKind::InvalidDigits {
                base: base_name(kind),
                digits: text.to_string(),
            },
            None => return,
        };
        self.errors.push(LexError { kind: error, span });
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        let unterminated = self.stack.iter().find_map(|frame| match frame {
            Frame::Group(group) => Some(*group),
            Frame::Interpolation { .. } => None,
        });
        if let Some(group) = unterminated {
            debug!(
                line = group.opened.line,
                "end of input inside an unterminated group"
            );
            self.errors.push(LexError {
                kind: LexErrorKind::UnterminatedGroup {
                    terminator: group.terminator_text(),
                },
                span: group.opened,
            });
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.cancelled {
            return None;
        }
        if self
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            debug!(offset = self.pos, "lexing cancelled");
            self.cancelled = true;
            return None;
        }
        if self.pos >= self.input.len() {
            self.finish();
            return None;
        }
        self.token_start = self.mark();
        let kind = self.lex_token();
        let span = self.token_span();
        let text = self.input[span.start..span.end].to_string();
        self.record_error(kind, &text, span);
        Some(Token { kind, text, span })
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || (c.is_alphabetic() && !c.is_ascii_uppercase())
}

fn is_identifier_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Length of the identifier at the start of `text`, including a
/// trailing `?` or `!`. With `atom` set, `@` may appear inside the name
/// and an uppercase start is accepted, as in `:name@host` or `Foo: 1`.
fn identifier_len(text: &str, atom: bool) -> usize {
    let mut chars = text.char_indices();
    let Some((_, first)) = chars.next() else {
        return 0;
    };
    if !(is_identifier_start(first) || (atom && first.is_ascii_uppercase())) {
        return 0;
    }
    let mut len = first.len_utf8();
    for (index, c) in chars {
        if is_identifier_continue(c) || (atom && c == '@') {
            len = index + c.len_utf8();
        } else {
            break;
        }
    }
    if text[len..].starts_with(['?', '!']) {
        len += 1;
    }
    len
}

fn alias_len(text: &str) -> usize {
    text.char_indices()
        .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '_'))
        .map_or(text.len(), |(index, _)| index)
}

fn reserved_word(text: &str) -> Option<(TokenKind, State)> {
    let entry = match text {
        "after" => (TokenKind::After, MULTILINE_KEYWORD),
        "catch" => (TokenKind::Catch, MULTILINE_KEYWORD),
        "do" => (TokenKind::Do, MULTILINE_KEYWORD),
        "else" => (TokenKind::Else, MULTILINE_KEYWORD),
        "fn" => (TokenKind::Fn, MULTILINE_KEYWORD),
        "rescue" => (TokenKind::Rescue, MULTILINE_KEYWORD),
        "end" => (TokenKind::End, State::KeywordPairMaybe),
        "true" => (TokenKind::True, KEYWORD_LITERAL),
        "false" => (TokenKind::False, KEYWORD_LITERAL),
        "nil" => (TokenKind::Nil, KEYWORD_LITERAL),
        "and" => (TokenKind::AndWordOperator, MULTILINE_KEYWORD),
        "or" => (TokenKind::OrWordOperator, MULTILINE_KEYWORD),
        "not" => (TokenKind::NotOperator, MULTILINE_KEYWORD),
        "in" => (TokenKind::InOperator, MULTILINE_KEYWORD),
        "when" => (TokenKind::WhenOperator, MULTILINE_KEYWORD),
        _ => return None,
    };
    Some(entry)
}

const KEYWORD_LITERAL: State = State::AdditionOrKeywordPairOrSubtractionOrWhiteSpaceMaybe;

const fn base_name(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::InvalidBinaryDigits => "binary",
        TokenKind::InvalidOctalDigits => "octal",
        TokenKind::InvalidHexadecimalDigits => "hexadecimal",
        TokenKind::InvalidUnknownBaseDigits => "unknown base",
        _ => "decimal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input() {
        let (tokens, errors) = tokenize("");
        assert!(tokens.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn texts_concatenate_to_input() {
        let input = "defmodule Foo do\n  def bar(x), do: x + 1 # ok\nend\n";
        let (tokens, _) = tokenize(input);
        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, input);
    }

    #[test]
    fn byte_order_mark_is_skipped() {
        let (tokens, _) = tokenize("\u{feff}x");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].span.start, 3);
        assert_eq!(tokens[0].span.column, 1);
    }

    #[test]
    fn sign_after_spaced_identifier() {
        use TokenKind::*;
        assert_eq!(
            kinds("foo -1"),
            vec![IdentifierToken, WhiteSpace, NegateOperator, ValidDecimalDigits]
        );
        assert_eq!(
            kinds("foo - 1"),
            vec![
                IdentifierToken,
                WhiteSpace,
                SubtractionOperator,
                WhiteSpace,
                ValidDecimalDigits
            ]
        );
        assert_eq!(
            kinds("foo-1"),
            vec![IdentifierToken, SubtractionOperator, ValidDecimalDigits]
        );
    }

    #[test]
    fn keyword_key_before_colon() {
        use TokenKind::*;
        assert_eq!(
            kinds("do: 1"),
            vec![AtomFragment, Colon, WhiteSpace, ValidDecimalDigits]
        );
        assert_eq!(kinds("a::b"), vec![IdentifierToken, TypeOperator, IdentifierToken]);
    }

    #[test]
    fn atoms() {
        use TokenKind::*;
        assert_eq!(kinds(":ok"), vec![Colon, AtomFragment]);
        assert_eq!(kinds(":<<>>"), vec![Colon, AtomFragment]);
        assert_eq!(
            kinds(":\"a b\""),
            vec![Colon, StringPromoter, StringFragment, StringTerminator]
        );
    }

    #[test]
    fn interpolation_counts_braces() {
        use TokenKind::*;
        assert_eq!(
            kinds("\"a#{%{}}b\""),
            vec![
                StringPromoter,
                StringFragment,
                InterpolationStart,
                StructOperator,
                OpeningCurly,
                ClosingCurly,
                InterpolationEnd,
                StringFragment,
                StringTerminator
            ]
        );
    }

    #[test]
    fn bad_characters_are_recorded() {
        let (tokens, errors) = tokenize("a $ b");
        assert_eq!(tokens[2].kind, TokenKind::BadCharacter);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::BadCharacter('$'));
        assert_eq!(errors[0].span.column, 3);
    }

    #[test]
    fn unterminated_string_is_recorded() {
        let (_, errors) = tokenize("\"abc");
        assert_eq!(
            errors[0].kind,
            LexErrorKind::UnterminatedGroup {
                terminator: "\"".to_string()
            }
        );
    }

    #[test]
    fn cancelled_lexer_stops() {
        let token = CancellationToken::new();
        token.cancel();
        let mut lexer = Lexer::new("a b c").with_cancellation(token);
        assert!(lexer.next().is_none());
        assert!(lexer.is_cancelled());
    }
}
