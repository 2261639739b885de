//! Token stream to syntax tree.
//!
//! Precedence climbing over Elixir's operator table, with a context
//! threaded through that says whether a call without
//! parentheses may take several arguments here and whether a trailing
//! `do` block may attach.
//!
//! Parsing never stops at the first error. A syntax error records one
//! [`ParseError`], leaves a [`NodeKind::Error`](crate::ast::NodeKind::Error)
//! node in the tree, and skips to the next statement boundary. Further
//! errors in the same statement are not reported.

mod containers;
mod expressions;

use std::fmt;

use tracing::debug;

use crate::ast::{Document, Node, NodeKind};
use crate::cancel::{CancellationToken, Cancelled};
use crate::token::{Span, Token, TokenKind};

use expressions::Context;

/// Maximum nesting depth for expressions before the parser bails out.
const MAX_NESTING_DEPTH: usize = 64;

/// Maximum height of one statement's tree. Operator chains and suffix
/// chains grow the tree without nesting, so they are counted here.
const MAX_TREE_HEIGHT: usize = 128;

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Token that cannot appear here.
    UnexpectedToken(String),
    UnexpectedEnd,
    /// Something specific was required, found something else or EOF.
    Expected {
        expected: &'static str,
        found: Option<String>,
    },
    /// End of input before the closing delimiter of a construct
    /// opened on `line`.
    MissingTerminator { terminator: &'static str, line: usize },
    /// Number literal without digits, such as `0x`.
    InvalidNumber(String),
    TooDeeplyNested,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken(token) => {
                write!(f, "unexpected token: '{token}'")
            }
            Self::UnexpectedEnd => {
                write!(f, "unexpected end of input")
            }
            Self::Expected {
                expected,
                found: None,
            } => {
                write!(f, "expected {expected}")
            }
            Self::Expected {
                expected,
                found: Some(token),
            } => {
                write!(f, "expected {expected}, got '{token}'")
            }
            Self::MissingTerminator { terminator, line } => {
                write!(
                    f,
                    "missing terminator: {terminator} (for opening on line {line})"
                )
            }
            Self::InvalidNumber(text) => {
                write!(f, "invalid number: {text}")
            }
            Self::TooDeeplyNested => {
                write!(f, "expression is nested too deeply")
            }
        }
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

/// Parse a token stream into a [`Document`].
///
/// Always returns a tree; syntax errors are reported alongside it and
/// appear in the tree as error nodes.
#[must_use]
pub fn parse(tokens: &[Token]) -> (Document, Vec<ParseError>) {
    let mut parser = Parser::new(tokens, None);
    let document = parser.parse_document();
    (document, parser.errors)
}

/// Like [`parse`], polling `cancellation` between nodes.
///
/// # Errors
///
/// Returns [`Cancelled`] once the token is cancelled; the partial tree
/// is dropped.
pub fn parse_with_cancellation(
    tokens: &[Token],
    cancellation: &CancellationToken,
) -> Result<(Document, Vec<ParseError>), Cancelled> {
    let mut parser = Parser::new(tokens, Some(cancellation));
    let document = parser.parse_document();
    if parser.cancelled {
        return Err(Cancelled);
    }
    Ok((document, parser.errors))
}

/// A significant token: whitespace and comments are folded into the
/// `spaced` flag of the token after them.
#[derive(Debug, Clone, Copy)]
struct Lexeme<'a> {
    kind: TokenKind,
    text: &'a str,
    span: Span,
    spaced: bool,
}

impl Lexeme<'_> {
    fn describe(self) -> String {
        match self.kind {
            TokenKind::Eol => "end of line".to_string(),
            _ => self.text.to_string(),
        }
    }
}

struct Parser<'a> {
    tokens: Vec<Lexeme<'a>>,
    pos: usize,
    errors: Vec<ParseError>,
    /// An error was reported in the current statement.
    poisoned: bool,
    depth: usize,
    /// Tree height of the nodes under construction.
    height: usize,
    cancellation: Option<&'a CancellationToken>,
    cancelled: bool,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], cancellation: Option<&'a CancellationToken>) -> Self {
        let mut lexemes = Vec::with_capacity(tokens.len());
        let mut spaced = false;
        for token in tokens {
            if token.kind.is_trivia() {
                spaced = true;
                continue;
            }
            lexemes.push(Lexeme {
                kind: token.kind,
                text: &token.text,
                span: token.span,
                spaced,
            });
            spaced = false;
        }
        Self {
            tokens: lexemes,
            pos: 0,
            errors: Vec::new(),
            poisoned: false,
            depth: 0,
            height: 0,
            cancellation,
            cancelled: false,
        }
    }

    fn parse_document(&mut self) -> Document {
        let expressions = self.parse_statements(|_| false);
        let span = match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::default(),
        };
        Document { expressions, span }
    }

    // -- cursor --

    /// Token at `index`; nothing once cancelled, so every loop unwinds.
    fn lexeme_at(&self, index: usize) -> Option<Lexeme<'a>> {
        if self.cancelled {
            return None;
        }
        self.tokens.get(index).copied()
    }

    fn kind_at(&self, index: usize) -> Option<TokenKind> {
        self.lexeme_at(index).map(|lexeme| lexeme.kind)
    }

    fn peek(&self) -> Option<Lexeme<'a>> {
        self.lexeme_at(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.kind_at(self.pos)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn advance(&mut self) -> Option<Lexeme<'a>> {
        let lexeme = self.peek()?;
        self.pos += 1;
        Some(lexeme)
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Lexeme<'a>> {
        if self.at(kind) {
            self.advance()
        } else {
            None
        }
    }

    fn skip_eols(&mut self) {
        while self.eat(TokenKind::Eol).is_some() {}
    }

    fn skip_separators(&mut self) {
        while matches!(
            self.peek_kind(),
            Some(TokenKind::Eol | TokenKind::Semicolon)
        ) {
            self.pos += 1;
        }
    }

    /// Span of the current token, or of the last one at end of input.
    fn current_span(&self) -> Span {
        self.peek()
            .or_else(|| self.tokens.last().copied())
            .map_or_else(Span::default, |lexeme| lexeme.span)
    }

    /// Span of the most recently consumed token.
    fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map_or_else(|| self.current_span(), |lexeme| lexeme.span)
    }

    fn poll_cancellation(&mut self) {
        if !self.cancelled
            && self
                .cancellation
                .is_some_and(CancellationToken::is_cancelled)
        {
            debug!(position = self.pos, "parsing cancelled");
            self.cancelled = true;
        }
    }

    // -- errors --

    /// Record an error unless the current statement already has one.
    fn error(&mut self, kind: ParseErrorKind, span: Span) {
        if self.poisoned {
            return;
        }
        debug!(%kind, line = span.line, column = span.column, "syntax error");
        self.poisoned = true;
        self.errors.push(ParseError { kind, span });
    }

    /// Record `kind` at the current token and return an error node for
    /// it.
    fn error_node(&mut self, kind: ParseErrorKind) -> Node {
        let span = self.current_span();
        let message = kind.to_string();
        self.error(kind, span);
        Node::error(message, span)
    }

    /// Error node for a token the lexer already reported.
    fn lexical_error_node(&mut self, lexeme: Lexeme<'_>) -> Node {
        self.poisoned = true;
        Node::error(
            ParseErrorKind::UnexpectedToken(lexeme.describe()).to_string(),
            lexeme.span,
        )
    }

    fn unexpected(&self) -> ParseErrorKind {
        self.peek().map_or(ParseErrorKind::UnexpectedEnd, |lexeme| {
            ParseErrorKind::UnexpectedToken(lexeme.describe())
        })
    }

    /// Consume a `kind` token, or return the error node for its
    /// absence. The caller places that node in the tree.
    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Lexeme<'a>, Node> {
        if let Some(lexeme) = self.eat(kind) {
            return Ok(lexeme);
        }
        let found = self.peek().map(Lexeme::describe);
        Err(self.error_node(ParseErrorKind::Expected { expected, found }))
    }

    /// Expect the closing delimiter of a construct opened at `open`.
    fn expect_closing(&mut self, kind: TokenKind, open: Span) -> Result<Lexeme<'a>, Node> {
        self.skip_eols();
        let (terminator, expected) = delimiter_names(kind);
        if self.peek().is_none() {
            let kind = ParseErrorKind::MissingTerminator {
                terminator,
                line: open.line,
            };
            let message = kind.to_string();
            self.error(kind, open);
            return Err(Node::error(message, open));
        }
        self.expect(kind, expected)
    }

    /// Increments the nesting depth, or returns an error node once it
    /// exceeds [`MAX_NESTING_DEPTH`] or [`MAX_TREE_HEIGHT`]. Pair every
    /// `Ok` with [`leave_nesting`](Self::leave_nesting).
    fn enter_nesting(&mut self) -> Result<(), Node> {
        self.poll_cancellation();
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error_node(ParseErrorKind::TooDeeplyNested));
        }
        self.grow()?;
        self.depth += 1;
        Ok(())
    }

    const fn leave_nesting(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.shrink(1);
    }

    /// Account for one more level of tree height without recursion, as
    /// an operator fold or a `.name` suffix adds. Pair every `Ok` with
    /// [`shrink`](Self::shrink).
    fn grow(&mut self) -> Result<(), Node> {
        if self.height >= MAX_TREE_HEIGHT {
            return Err(self.error_node(ParseErrorKind::TooDeeplyNested));
        }
        self.height += 1;
        Ok(())
    }

    const fn shrink(&mut self, levels: usize) {
        self.height = self.height.saturating_sub(levels);
    }

    // -- statements --

    /// Statements separated by newlines or `;` until `stop` matches
    /// (not consumed) or input ends.
    fn parse_statements(&mut self, stop: fn(TokenKind) -> bool) -> Vec<Node> {
        let outer = std::mem::take(&mut self.poisoned);
        let mut statements = Vec::new();
        loop {
            self.poll_cancellation();
            self.skip_separators();
            match self.peek_kind() {
                None => break,
                Some(kind) if stop(kind) => break,
                Some(_) => {}
            }
            let start = self.pos;
            let statement = self.parse_expression(0, Context::STATEMENT);
            statements.push(match self.finish_statement(stop, start) {
                Some(error) => with_error(statement, error),
                None => statement,
            });
        }
        self.poisoned = outer;
        statements
    }

    /// Require a statement boundary, then recover if the statement had
    /// an error. Returns the error node for a missing boundary when the
    /// statement itself parsed cleanly.
    fn finish_statement(&mut self, stop: fn(TokenKind) -> bool, start: usize) -> Option<Node> {
        let mut trailing = None;
        if let Some(lexeme) = self.peek() {
            let boundary = matches!(lexeme.kind, TokenKind::Eol | TokenKind::Semicolon);
            if !boundary && !stop(lexeme.kind) && !self.poisoned {
                let kind = ParseErrorKind::UnexpectedToken(lexeme.describe());
                trailing = Some(Node::error(kind.to_string(), lexeme.span));
                self.error(kind, lexeme.span);
            }
        }
        if self.poisoned {
            self.synchronize(stop, start);
            self.poisoned = false;
        }
        if self.pos == start && self.peek_kind().is_some_and(|kind| !stop(kind)) {
            self.pos += 1;
        }
        trailing
    }

    /// Skip to the next statement boundary: a newline or `;`, a token
    /// matching `stop`, or end of input, outside any delimiter the
    /// statement starting at `start` left open. Stray closing
    /// delimiters are skipped as well.
    fn synchronize(&mut self, stop: fn(TokenKind) -> bool, start: usize) {
        let from = self.pos;
        let mut depth = self
            .tokens
            .get(start..from)
            .unwrap_or_default()
            .iter()
            .fold(0usize, |depth, lexeme| {
                if opens(lexeme.kind) {
                    depth + 1
                } else if closes(lexeme.kind) {
                    depth.saturating_sub(1)
                } else {
                    depth
                }
            });
        while let Some(kind) = self.peek_kind() {
            if depth == 0
                && (matches!(kind, TokenKind::Eol | TokenKind::Semicolon) || stop(kind))
            {
                break;
            }
            if opens(kind) {
                depth += 1;
            } else if closes(kind) {
                depth = depth.saturating_sub(1);
            }
            self.pos += 1;
        }
        debug!(skipped = self.pos - from, "synchronized after syntax error");
    }
}

/// `statement` followed by the error that ended it early, as one block.
fn with_error(statement: Node, error: Node) -> Node {
    let span = statement.span.merge(error.span);
    Node::new(NodeKind::Block(vec![statement, error]), span)
}

fn opens(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::OpeningParenthesis
            | TokenKind::OpeningBracket
            | TokenKind::OpeningCurly
            | TokenKind::OpeningBit
            | TokenKind::Do
            | TokenKind::Fn
            | TokenKind::InterpolationStart
            | TokenKind::StringPromoter
            | TokenKind::StringHeredocPromoter
            | TokenKind::CharListPromoter
            | TokenKind::CharListHeredocPromoter
            | TokenKind::SigilPromoter
            | TokenKind::SigilHeredocPromoter
    )
}

fn closes(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::ClosingParenthesis
            | TokenKind::ClosingBracket
            | TokenKind::ClosingCurly
            | TokenKind::ClosingBit
            | TokenKind::End
            | TokenKind::InterpolationEnd
            | TokenKind::StringTerminator
            | TokenKind::StringHeredocTerminator
            | TokenKind::CharListTerminator
            | TokenKind::CharListHeredocTerminator
            | TokenKind::SigilTerminator
            | TokenKind::SigilHeredocTerminator
    )
}

/// Bare and quoted spelling of a closing delimiter.
const fn delimiter_names(kind: TokenKind) -> (&'static str, &'static str) {
    match kind {
        TokenKind::ClosingParenthesis => (")", "')'"),
        TokenKind::ClosingBracket => ("]", "']'"),
        TokenKind::ClosingCurly | TokenKind::InterpolationEnd => ("}", "'}'"),
        TokenKind::ClosingBit => (">>", "'>>'"),
        _ => ("end", "'end'"),
    }
}

/// Ends the body of a `do` block section.
const fn ends_block(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::End | TokenKind::Else | TokenKind::After | TokenKind::Rescue | TokenKind::Catch
    )
}
