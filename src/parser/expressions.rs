//! Operators, calls, and the primary forms they combine.

use num_bigint::BigInt;

use super::{Lexeme, ParseErrorKind, Parser};
use crate::ast::{Call, CallTarget, DoBlock, Node, NodeKind};
use crate::escape;
use crate::token::{Span, TokenKind};

pub(super) const WHEN_PRECEDENCE: u8 = 50;
pub(super) const PIPE_PRECEDENCE: u8 = 70;
const CAPTURE_PRECEDENCE: u8 = 90;
const IN_PRECEDENCE: u8 = 170;
/// `//` after a range, looser than `..` itself.
const STEP_PRECEDENCE: u8 = 190;
const ADDITION_PRECEDENCE: u8 = 210;
const UNARY_PRECEDENCE: u8 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Associativity {
    Left,
    Right,
}

/// Binding power and associativity of an infix operator token.
const fn binding(kind: TokenKind) -> Option<(u8, Associativity)> {
    use Associativity::{Left, Right};
    let binding = match kind {
        TokenKind::InMatchOperator => (40, Left),
        TokenKind::WhenOperator => (WHEN_PRECEDENCE, Right),
        TokenKind::TypeOperator => (60, Right),
        TokenKind::PipeOperator => (PIPE_PRECEDENCE, Right),
        TokenKind::AssociationOperator => (80, Right),
        TokenKind::MatchOperator => (100, Right),
        TokenKind::OrSymbolOperator | TokenKind::OrWordOperator => (120, Left),
        TokenKind::AndSymbolOperator | TokenKind::AndWordOperator => (130, Left),
        TokenKind::ComparisonOperator => (140, Left),
        TokenKind::RelationalOperator => (150, Left),
        TokenKind::ArrowOperator => (160, Left),
        TokenKind::InOperator => (IN_PRECEDENCE, Left),
        TokenKind::XorOperator => (180, Left),
        TokenKind::TwoOperator | TokenKind::RangeOperator => (200, Right),
        TokenKind::AdditionOperator | TokenKind::SubtractionOperator => {
            (ADDITION_PRECEDENCE, Left)
        }
        TokenKind::MultiplicationOperator | TokenKind::DivisionOperator => (220, Left),
        TokenKind::PowerOperator => (230, Left),
        _ => return None,
    };
    Some(binding)
}

/// What the surrounding construct allows.
#[derive(Debug, Clone, Copy)]
pub(super) struct Context {
    /// A call without parentheses may take several comma separated
    /// arguments.
    pub(super) many_arguments: bool,
    /// A trailing `do` block may attach to a call.
    pub(super) do_blocks: bool,
}

impl Context {
    pub(super) const STATEMENT: Self = Self {
        many_arguments: true,
        do_blocks: true,
    };
    /// Elements of lists, tuples, maps, and parenthesized arguments.
    pub(super) const CONTAINER: Self = Self {
        many_arguments: false,
        do_blocks: true,
    };
    /// Argument of a call without parentheses.
    pub(super) const ARGUMENT: Self = Self {
        many_arguments: false,
        do_blocks: false,
    };
}

struct Infix {
    /// Index of the operator's first token.
    index: usize,
    /// Tokens the operator spans; two for `not in`.
    width: usize,
    precedence: u8,
    associativity: Associativity,
    operator: String,
    span: Span,
}

/// Arguments and do block following a call target.
struct Suffix {
    arguments: Vec<Node>,
    parentheses: bool,
    do_block: Option<DoBlock>,
    end: Span,
}

impl Suffix {
    /// No arguments at all, as in `receiver.name`.
    const fn bare(end: Span) -> Self {
        Self {
            arguments: Vec::new(),
            parentheses: false,
            do_block: None,
            end,
        }
    }
}

/// Tokens a primary expression never consumes on error.
const fn is_boundary(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Eol
            | TokenKind::Semicolon
            | TokenKind::Comma
            | TokenKind::ClosingParenthesis
            | TokenKind::ClosingBracket
            | TokenKind::ClosingCurly
            | TokenKind::ClosingBit
            | TokenKind::InterpolationEnd
            | TokenKind::StabOperator
            | TokenKind::Do
            | TokenKind::End
            | TokenKind::Else
            | TokenKind::After
            | TokenKind::Rescue
            | TokenKind::Catch
    )
}

/// Tokens that can begin the first argument of a call without
/// parentheses.
fn starts_argument(kind: TokenKind) -> bool {
    kind.is_number_part()
        || matches!(
            kind,
            TokenKind::IdentifierToken
                | TokenKind::AliasToken
                | TokenKind::AtomFragment
                | TokenKind::Colon
                | TokenKind::CharTokenizer
                | TokenKind::StringPromoter
                | TokenKind::StringHeredocPromoter
                | TokenKind::CharListPromoter
                | TokenKind::CharListHeredocPromoter
                | TokenKind::Tilde
                | TokenKind::OpeningParenthesis
                | TokenKind::OpeningBracket
                | TokenKind::OpeningCurly
                | TokenKind::OpeningBit
                | TokenKind::StructOperator
                | TokenKind::CaptureOperator
                | TokenKind::AtOperator
                | TokenKind::UnaryOperator
                | TokenKind::NotOperator
                | TokenKind::NegateOperator
                | TokenKind::NumberOrBadarithOperator
                | TokenKind::Fn
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
                | TokenKind::BadCharacter
        )
}

impl Parser<'_> {
    /// Parse an expression whose infix operators all bind at least as
    /// tightly as `min_precedence`.
    pub(super) fn parse_expression(&mut self, min_precedence: u8, context: Context) -> Node {
        if let Err(error) = self.enter_nesting() {
            return error;
        }
        let mut left = self.parse_prefix(context);
        let mut folds = 0;
        while let Some(infix) = self.infix_ahead() {
            if infix.precedence < min_precedence {
                break;
            }
            self.pos = infix.index + infix.width;
            self.skip_eols();
            let next = match infix.associativity {
                Associativity::Left => infix.precedence + 1,
                Associativity::Right => infix.precedence,
            };
            let (mut right, overflowed) = match self.grow() {
                Ok(()) => {
                    folds += 1;
                    (self.parse_expression(next, context), false)
                }
                Err(error) => (error, true),
            };
            if infix.operator == "//" && !is_range(&left) {
                let kind = ParseErrorKind::Expected {
                    expected: "range before '//'",
                    found: None,
                };
                right = Node::error(kind.to_string(), infix.span);
                self.error(kind, infix.span);
            }
            let span = left.span.merge(right.span);
            left = Node::new(
                NodeKind::Binary {
                    operator: infix.operator,
                    left: Box::new(left),
                    right: Box::new(right),
                    operator_span: infix.span,
                },
                span,
            );
            if overflowed {
                break;
            }
        }
        self.shrink(folds);
        self.leave_nesting();
        left
    }

    /// The infix operator after the current expression, if any. An
    /// operator at the start of the next line continues the
    /// expression.
    fn infix_ahead(&self) -> Option<Infix> {
        let mut index = self.pos;
        while self.kind_at(index) == Some(TokenKind::Eol) {
            index += 1;
        }
        let newline = index > self.pos;
        let lexeme = self.lexeme_at(index)?;
        let infix = |width, precedence, associativity, operator: &str, span| Infix {
            index,
            width,
            precedence,
            associativity,
            operator: operator.to_string(),
            span,
        };
        match lexeme.kind {
            TokenKind::NotOperator => {
                let next = self
                    .lexeme_at(index + 1)
                    .filter(|next| next.kind == TokenKind::InOperator)?;
                Some(infix(
                    2,
                    IN_PRECEDENCE,
                    Associativity::Left,
                    "not in",
                    lexeme.span.merge(next.span),
                ))
            }
            TokenKind::DivisionOperator => {
                match self
                    .lexeme_at(index + 1)
                    .filter(|next| next.kind == TokenKind::DivisionOperator && !next.spaced)
                {
                    Some(next) => Some(infix(
                        2,
                        STEP_PRECEDENCE,
                        Associativity::Right,
                        "//",
                        lexeme.span.merge(next.span),
                    )),
                    None => binding(lexeme.kind).map(|(precedence, associativity)| {
                        infix(1, precedence, associativity, lexeme.text, lexeme.span)
                    }),
                }
            }
            TokenKind::NegateOperator | TokenKind::NumberOrBadarithOperator if !newline => {
                Some(infix(
                    1,
                    ADDITION_PRECEDENCE,
                    Associativity::Left,
                    lexeme.text,
                    lexeme.span,
                ))
            }
            kind => {
                let (precedence, associativity) = binding(kind)?;
                Some(infix(1, precedence, associativity, lexeme.text, lexeme.span))
            }
        }
    }

    fn parse_prefix(&mut self, context: Context) -> Node {
        let Some(lexeme) = self.peek() else {
            return self.error_node(ParseErrorKind::UnexpectedEnd);
        };
        match lexeme.kind {
            TokenKind::NegateOperator
            | TokenKind::NumberOrBadarithOperator
            | TokenKind::UnaryOperator
            | TokenKind::NotOperator => self.parse_unary(lexeme, UNARY_PRECEDENCE, context),
            TokenKind::CaptureOperator if self.capture_argument_ahead() => {
                // `&1` binds only its index
                self.pos += 1;
                let index = self.parse_number();
                let span = lexeme.span.merge(index.span);
                Node::new(
                    NodeKind::Unary {
                        operator: lexeme.text.to_string(),
                        operand: Box::new(index),
                    },
                    span,
                )
            }
            TokenKind::CaptureOperator => {
                self.parse_unary(lexeme, CAPTURE_PRECEDENCE + 1, context)
            }
            TokenKind::RangeOperator => {
                // `..` on its own is the full range
                self.pos += 1;
                let target = CallTarget::Local {
                    name: lexeme.text.to_string(),
                };
                call(target, lexeme.span, Suffix::bare(lexeme.span))
            }
            TokenKind::AtOperator => {
                self.pos += 1;
                let operand = self.parse_primary(context);
                let span = lexeme.span.merge(operand.span);
                let attribute = Node::new(
                    NodeKind::Unary {
                        operator: lexeme.text.to_string(),
                        operand: Box::new(operand),
                    },
                    span,
                );
                self.parse_postfix(attribute, context)
            }
            _ => {
                let primary = self.parse_primary(context);
                self.parse_postfix(primary, context)
            }
        }
    }

    fn capture_argument_ahead(&self) -> bool {
        self.lexeme_at(self.pos + 1)
            .is_some_and(|next| next.kind == TokenKind::ValidDecimalDigits && !next.spaced)
    }

    fn parse_unary(&mut self, operator: Lexeme<'_>, precedence: u8, context: Context) -> Node {
        self.pos += 1;
        self.skip_eols();
        let operand = self.parse_expression(precedence, context);
        let span = operator.span.merge(operand.span);
        Node::new(
            NodeKind::Unary {
                operator: operator.text.to_string(),
                operand: Box::new(operand),
            },
            span,
        )
    }

    fn parse_primary(&mut self, context: Context) -> Node {
        let Some(lexeme) = self.peek() else {
            return self.error_node(ParseErrorKind::UnexpectedEnd);
        };
        let literal = |kind| Node::new(kind, lexeme.span);
        match lexeme.kind {
            kind if kind.is_number_part() => self.parse_number(),
            TokenKind::BadCharacter => {
                self.pos += 1;
                self.lexical_error_node(lexeme)
            }
            TokenKind::True => {
                self.pos += 1;
                literal(NodeKind::Boolean(true))
            }
            TokenKind::False => {
                self.pos += 1;
                literal(NodeKind::Boolean(false))
            }
            TokenKind::Nil => {
                self.pos += 1;
                literal(NodeKind::Nil)
            }
            TokenKind::AliasToken => {
                self.pos += 1;
                literal(NodeKind::Alias {
                    base: None,
                    segments: vec![lexeme.text.to_string()],
                })
            }
            TokenKind::IdentifierToken => {
                self.pos += 1;
                self.parse_identifier(lexeme, context)
            }
            TokenKind::CharTokenizer => self.parse_char(),
            TokenKind::Colon => self.parse_atom(),
            TokenKind::AtomFragment => self.parse_keywords(context),
            TokenKind::StringPromoter | TokenKind::CharListPromoter
                if self.keyword_ahead(self.pos) =>
            {
                self.parse_keywords(context)
            }
            TokenKind::StringPromoter
            | TokenKind::StringHeredocPromoter
            | TokenKind::CharListPromoter
            | TokenKind::CharListHeredocPromoter => self.parse_text_node(),
            TokenKind::Tilde => self.parse_sigil(),
            TokenKind::OpeningParenthesis => self.parse_parenthesized(),
            TokenKind::OpeningBracket => self.parse_list(),
            TokenKind::OpeningCurly => self.parse_tuple(),
            TokenKind::OpeningBit => self.parse_bitstring(),
            TokenKind::StructOperator => self.parse_struct_or_map(),
            TokenKind::Fn => self.parse_fn(),
            kind if is_boundary(kind) => self.error_node(self.unexpected()),
            _ => {
                let node = self.error_node(self.unexpected());
                self.pos += 1;
                node
            }
        }
    }

    /// `.name`, `.Alias`, `.(...)` and unspaced `[key]` suffixes.
    pub(super) fn parse_postfix(&mut self, mut node: Node, context: Context) -> Node {
        let mut suffixes = 0;
        loop {
            let dot = match self.peek() {
                Some(next) if next.kind == TokenKind::DotOperator => true,
                Some(next) if next.kind == TokenKind::OpeningBracket && !next.spaced => false,
                _ => break,
            };
            if let Err(error) = self.grow() {
                node = error;
                break;
            }
            suffixes += 1;
            node = if dot {
                self.parse_dot(node, context)
            } else {
                self.parse_access(node)
            };
        }
        self.shrink(suffixes);
        node
    }

    // -- calls --

    fn parse_identifier(&mut self, name: Lexeme<'_>, context: Context) -> Node {
        match self.parse_call_suffix(context) {
            Some(suffix) => {
                let target = CallTarget::Local {
                    name: name.text.to_string(),
                };
                call(target, name.span, suffix)
            }
            None => Node::new(NodeKind::Identifier(name.text.to_string()), name.span),
        }
    }

    /// Parenthesized arguments, arguments without parentheses, or a
    /// lone `do` block, each optionally followed by a `do` block.
    fn parse_call_suffix(&mut self, context: Context) -> Option<Suffix> {
        let (arguments, parentheses, mut end) = match self.peek() {
            Some(next) if next.kind == TokenKind::OpeningParenthesis && !next.spaced => {
                let (arguments, span) = self.parse_call_arguments();
                (arguments, true, span)
            }
            _ if self.argument_ahead() => {
                let arguments = self.parse_arguments_without_parentheses(context);
                let end = arguments
                    .last()
                    .map_or_else(|| self.previous_span(), |last| last.span);
                (arguments, false, end)
            }
            Some(next) if next.kind == TokenKind::Do && context.do_blocks => {
                (Vec::new(), false, next.span)
            }
            _ => return None,
        };
        let do_block = if context.do_blocks && self.at(TokenKind::Do) {
            let block = self.parse_do_block();
            end = block.span;
            Some(block)
        } else {
            None
        };
        Some(Suffix {
            arguments,
            parentheses,
            do_block,
            end,
        })
    }

    /// Whether the next token starts an argument of a call without
    /// parentheses. Such an argument must be separated from the name by
    /// whitespace.
    fn argument_ahead(&self) -> bool {
        let Some(next) = self.peek() else {
            return false;
        };
        if !next.spaced {
            return false;
        }
        if next.kind == TokenKind::NotOperator {
            return self.kind_at(self.pos + 1) != Some(TokenKind::InOperator);
        }
        starts_argument(next.kind)
    }

    /// `(arguments)`; returns the arguments and the span of the
    /// parentheses.
    pub(super) fn parse_call_arguments(&mut self) -> (Vec<Node>, Span) {
        let open = self.current_span();
        self.pos += 1;
        let mut arguments = self.parse_items(TokenKind::ClosingParenthesis);
        let span = self.close(TokenKind::ClosingParenthesis, open, &mut arguments);
        (arguments, span)
    }

    fn parse_arguments_without_parentheses(&mut self, context: Context) -> Vec<Node> {
        let mut arguments = Vec::new();
        loop {
            if self.keyword_ahead(self.pos) {
                arguments.push(self.parse_keywords(Context::ARGUMENT));
                break;
            }
            arguments.push(self.parse_expression(0, Context::ARGUMENT));
            if !context.many_arguments || !self.at(TokenKind::Comma) {
                break;
            }
            self.pos += 1;
            self.skip_eols();
        }
        arguments
    }

    fn parse_dot(&mut self, receiver: Node, context: Context) -> Node {
        let dot = self.current_span();
        self.pos += 1;
        let Some(name) = self.peek() else {
            return self.error_node(ParseErrorKind::UnexpectedEnd);
        };
        let start = receiver.span;
        match name.kind {
            TokenKind::IdentifierToken => {
                self.pos += 1;
                let target = CallTarget::Remote {
                    receiver: Box::new(receiver),
                    name: name.text.to_string(),
                    dot,
                    name_span: name.span,
                };
                let suffix = self
                    .parse_call_suffix(context)
                    .unwrap_or_else(|| Suffix::bare(name.span));
                call(target, start, suffix)
            }
            TokenKind::AliasToken => {
                self.pos += 1;
                extend_alias(receiver, name)
            }
            TokenKind::StringPromoter | TokenKind::CharListPromoter => {
                let (text, name_span) = self.parse_text();
                let Some(function) = escape::literal(&text) else {
                    let kind = ParseErrorKind::Expected {
                        expected: "function name without interpolation",
                        found: None,
                    };
                    let message = kind.to_string();
                    self.error(kind, name_span);
                    return Node::error(message, start.merge(name_span));
                };
                let target = CallTarget::Remote {
                    receiver: Box::new(receiver),
                    name: function,
                    dot,
                    name_span,
                };
                let suffix = self
                    .parse_call_suffix(context)
                    .unwrap_or_else(|| Suffix::bare(name_span));
                call(target, start, suffix)
            }
            TokenKind::OpeningParenthesis => {
                let (arguments, end) = self.parse_call_arguments();
                let target = CallTarget::Anonymous {
                    function: Box::new(receiver),
                    dot,
                };
                let suffix = Suffix {
                    arguments,
                    parentheses: true,
                    do_block: None,
                    end,
                };
                call(target, start, suffix)
            }
            TokenKind::OpeningCurly => {
                let open = name.span;
                self.pos += 1;
                let mut arguments = self.parse_items(TokenKind::ClosingCurly);
                let end = self.close(TokenKind::ClosingCurly, open, &mut arguments);
                let target = CallTarget::Remote {
                    receiver: Box::new(receiver),
                    name: "{}".to_string(),
                    dot,
                    name_span: open,
                };
                let suffix = Suffix {
                    arguments,
                    parentheses: true,
                    do_block: None,
                    end,
                };
                call(target, start, suffix)
            }
            _ => self.error_node(ParseErrorKind::Expected {
                expected: "name after '.'",
                found: Some(name.describe()),
            }),
        }
    }

    fn parse_access(&mut self, subject: Node) -> Node {
        let open = self.current_span();
        self.pos += 1;
        self.skip_eols();
        let key = if self.keyword_ahead(self.pos) {
            self.parse_keywords(Context::CONTAINER)
        } else {
            self.parse_expression(0, Context::CONTAINER)
        };
        // a missing `]` replaces the key with its error
        let (key, end) = match self.expect_closing(TokenKind::ClosingBracket, open) {
            Ok(close) => (key, open.merge(close.span)),
            Err(error) => (error, open.merge(self.previous_span())),
        };
        let span = subject.span.merge(end);
        Node::new(
            NodeKind::Access {
                subject: Box::new(subject),
                key: Box::new(key),
            },
            span,
        )
    }

    // -- literals --

    fn parse_number(&mut self) -> Node {
        let start = self.pos;
        let mut end = start;
        while let Some(lexeme) = self.lexeme_at(end) {
            if !lexeme.kind.is_number_part() || (end > start && lexeme.spaced) {
                break;
            }
            end += 1;
        }
        self.pos = end;
        let parts = self.tokens.get(start..end).unwrap_or_default();
        let (Some(first), Some(last)) = (parts.first(), parts.last()) else {
            return self.error_node(ParseErrorKind::UnexpectedEnd);
        };
        let span = first.span.merge(last.span);
        let text: String = parts.iter().map(|part| part.text).collect();
        if parts.iter().any(|part| part.kind.is_error()) {
            self.poisoned = true;
            return Node::error(ParseErrorKind::InvalidNumber(text).to_string(), span);
        }
        if let Some(value) = number_value(parts) {
            return Node::new(value, span);
        }
        let kind = ParseErrorKind::InvalidNumber(text);
        let message = kind.to_string();
        self.error(kind, span);
        Node::error(message, span)
    }

    fn parse_char(&mut self) -> Node {
        let question = self.current_span();
        self.pos += 1;
        match self.peek() {
            Some(character) if character.kind == TokenKind::CharacterToken && !character.spaced => {
                self.pos += 1;
                let span = question.merge(character.span);
                match escape::char_codepoint(character.text) {
                    Some(codepoint) => Node::new(NodeKind::Char(codepoint), span),
                    None => {
                        let kind = ParseErrorKind::Expected {
                            expected: "character",
                            found: Some(character.text.to_string()),
                        };
                        let message = kind.to_string();
                        self.error(kind, span);
                        Node::error(message, span)
                    }
                }
            }
            found => self.error_node(ParseErrorKind::Expected {
                expected: "character after '?'",
                found: found.map(Lexeme::describe),
            }),
        }
    }

    fn parse_atom(&mut self) -> Node {
        let colon = self.current_span();
        self.pos += 1;
        match self.peek() {
            Some(name) if name.kind == TokenKind::AtomFragment && !name.spaced => {
                self.pos += 1;
                Node::new(
                    NodeKind::Atom(name.text.to_string()),
                    colon.merge(name.span),
                )
            }
            Some(quote)
                if matches!(
                    quote.kind,
                    TokenKind::StringPromoter | TokenKind::CharListPromoter
                ) && !quote.spaced =>
            {
                let (text, span) = self.parse_text();
                Node::new(NodeKind::QuotedAtom(text), colon.merge(span))
            }
            found => self.error_node(ParseErrorKind::Expected {
                expected: "atom name after ':'",
                found: found.map(Lexeme::describe),
            }),
        }
    }

    // -- keywords --

    /// Whether a `key: value` pair starts at `index`, with the key
    /// written bare or quoted.
    pub(super) fn keyword_ahead(&self, index: usize) -> bool {
        match self.kind_at(index) {
            Some(TokenKind::AtomFragment) => true,
            Some(TokenKind::StringPromoter | TokenKind::CharListPromoter) => {
                let mut depth = 0usize;
                let mut end = index + 1;
                loop {
                    match self.kind_at(end) {
                        None => return false,
                        Some(TokenKind::InterpolationStart) => depth += 1,
                        Some(TokenKind::InterpolationEnd) => depth = depth.saturating_sub(1),
                        Some(TokenKind::StringTerminator | TokenKind::CharListTerminator)
                            if depth == 0 =>
                        {
                            break;
                        }
                        Some(_) => {}
                    }
                    end += 1;
                }
                match self.lexeme_at(end + 1) {
                    Some(colon) if colon.kind == TokenKind::Colon && !colon.spaced => self
                        .lexeme_at(end + 2)
                        .is_none_or(|next| next.spaced || next.kind == TokenKind::Eol),
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// A run of `key: value` pairs separated by commas.
    pub(super) fn parse_keywords(&mut self, context: Context) -> Node {
        let start = self.current_span();
        let mut span = start;
        let mut pairs = Vec::new();
        loop {
            let Some(key) = self.parse_keyword_key() else {
                break;
            };
            self.skip_eols();
            let value = self.parse_expression(0, context);
            span = span.merge(value.span);
            pairs.push((key, value));
            if !self.at(TokenKind::Comma) {
                break;
            }
            let mut next = self.pos + 1;
            while self.kind_at(next) == Some(TokenKind::Eol) {
                next += 1;
            }
            if !self.keyword_ahead(next) {
                break;
            }
            self.pos = next;
        }
        Node::new(NodeKind::Keywords(pairs), span)
    }

    fn parse_keyword_key(&mut self) -> Option<Node> {
        let lexeme = self.peek()?;
        if lexeme.kind == TokenKind::AtomFragment {
            self.pos += 1;
            let span = self
                .eat(TokenKind::Colon)
                .map_or(lexeme.span, |colon| lexeme.span.merge(colon.span));
            return Some(Node::new(NodeKind::Atom(lexeme.text.to_string()), span));
        }
        if self.keyword_ahead(self.pos) {
            let (text, span) = self.parse_text();
            let colon = self.expect(TokenKind::Colon, "':'").ok()?;
            return Some(Node::new(NodeKind::QuotedAtom(text), span.merge(colon.span)));
        }
        let found = Some(lexeme.describe());
        self.error(
            ParseErrorKind::Expected {
                expected: "keyword key",
                found,
            },
            lexeme.span,
        );
        None
    }
}

fn is_range(node: &Node) -> bool {
    matches!(&node.kind, NodeKind::Binary { operator, .. } if operator == "..")
}

fn call(target: CallTarget, start: Span, suffix: Suffix) -> Node {
    Node::new(
        NodeKind::Call(Call {
            target,
            arguments: suffix.arguments,
            parentheses: suffix.parentheses,
            do_block: suffix.do_block,
        }),
        start.merge(suffix.end),
    )
}

/// `receiver.Segment`: another segment for an alias, or an alias based
/// on an arbitrary expression.
pub(super) fn extend_alias(receiver: Node, segment: Lexeme<'_>) -> Node {
    let span = receiver.span.merge(segment.span);
    match receiver.kind {
        NodeKind::Alias { base, mut segments } => {
            segments.push(segment.text.to_string());
            Node::new(NodeKind::Alias { base, segments }, span)
        }
        kind => Node::new(
            NodeKind::Alias {
                base: Some(Box::new(Node::new(kind, receiver.span))),
                segments: vec![segment.text.to_string()],
            },
            span,
        ),
    }
}

/// Value of a number literal assembled from its tokens, or `None` when
/// it has no digits.
fn number_value(parts: &[Lexeme<'_>]) -> Option<NodeKind> {
    if parts.first()?.kind == TokenKind::BaseWholeNumberPrefix {
        let radix = match parts.get(1)?.kind {
            TokenKind::BinaryWholeNumberBase => 2,
            TokenKind::OctalWholeNumberBase => 8,
            TokenKind::HexadecimalWholeNumberBase => 16,
            _ => return None,
        };
        let digits: String = parts
            .iter()
            .skip(2)
            .filter(|part| {
                matches!(
                    part.kind,
                    TokenKind::ValidBinaryDigits
                        | TokenKind::ValidOctalDigits
                        | TokenKind::ValidHexadecimalDigits
                )
            })
            .map(|part| part.text)
            .collect();
        if digits.is_empty() {
            return None;
        }
        return BigInt::parse_bytes(digits.as_bytes(), radix).map(NodeKind::Integer);
    }
    let text: String = parts
        .iter()
        .filter(|part| part.kind != TokenKind::NumberSeparator)
        .map(|part| part.text)
        .collect();
    if parts.iter().any(|part| part.kind == TokenKind::DecimalMark) {
        text.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(NodeKind::Float)
    } else {
        BigInt::parse_bytes(text.as_bytes(), 10).map(NodeKind::Integer)
    }
}
