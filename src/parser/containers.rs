//! Delimited forms: collections, text literals, and blocks.

use super::expressions::{Context, PIPE_PRECEDENCE, WHEN_PRECEDENCE, extend_alias};
use super::{Lexeme, ParseErrorKind, Parser, ends_block};
use crate::ast::{
    Body, Clause, DoBlock, Map, Node, NodeKind, Section, Segment, Sigil, Text, TextKind,
};
use crate::token::{Span, TokenKind};

/// A clause head or an ordinary statement, as found in a block body.
enum Item {
    Clause(Clause),
    Expression(Node),
}

const fn ends_text(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::StringTerminator
            | TokenKind::StringHeredocTerminator
            | TokenKind::CharListTerminator
            | TokenKind::CharListHeredocTerminator
            | TokenKind::SigilTerminator
            | TokenKind::SigilHeredocTerminator
    )
}

impl Parser<'_> {
    /// Consume the closing delimiter of a construct opened at `open`
    /// and return the span of the whole construct. When the delimiter
    /// is missing, its error node ends `items`.
    pub(super) fn close(&mut self, kind: TokenKind, open: Span, items: &mut Vec<Node>) -> Span {
        match self.expect_closing(kind, open) {
            Ok(close) => open.merge(close.span),
            Err(error) => {
                items.push(error);
                open.merge(self.previous_span())
            }
        }
    }

    /// Comma separated elements up to `closer`, which is left for the
    /// caller. A keyword run ends the elements; a trailing comma is
    /// allowed.
    pub(super) fn parse_items(&mut self, closer: TokenKind) -> Vec<Node> {
        let mut items = Vec::new();
        loop {
            self.skip_eols();
            match self.peek_kind() {
                None => break,
                Some(kind) if kind == closer => break,
                Some(_) => {}
            }
            if self.keyword_ahead(self.pos) {
                items.push(self.parse_keywords(Context::CONTAINER));
                self.skip_eols();
                self.eat(TokenKind::Comma);
                break;
            }
            items.push(self.parse_expression(0, Context::CONTAINER));
            self.skip_eols();
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        items
    }

    pub(super) fn parse_list(&mut self) -> Node {
        let open = self.current_span();
        self.pos += 1;
        let mut items = self.parse_items(TokenKind::ClosingBracket);
        let span = self.close(TokenKind::ClosingBracket, open, &mut items);
        Node::new(NodeKind::List(items), span)
    }

    pub(super) fn parse_tuple(&mut self) -> Node {
        let open = self.current_span();
        self.pos += 1;
        let mut items = self.parse_items(TokenKind::ClosingCurly);
        let span = self.close(TokenKind::ClosingCurly, open, &mut items);
        Node::new(NodeKind::Tuple(items), span)
    }

    pub(super) fn parse_bitstring(&mut self) -> Node {
        let open = self.current_span();
        self.pos += 1;
        let mut items = self.parse_items(TokenKind::ClosingBit);
        let span = self.close(TokenKind::ClosingBit, open, &mut items);
        Node::new(NodeKind::Bitstring(items), span)
    }

    /// `()`, `(expression)`, or `(a; b)`.
    pub(super) fn parse_parenthesized(&mut self) -> Node {
        let open = self.current_span();
        self.pos += 1;
        let mut body = self.parse_statements(|kind| kind == TokenKind::ClosingParenthesis);
        let span = self.close(TokenKind::ClosingParenthesis, open, &mut body);
        if body.len() == 1 {
            return body.remove(0);
        }
        Node::new(NodeKind::Block(body), span)
    }

    /// `%{...}` or `%Name{...}`.
    pub(super) fn parse_struct_or_map(&mut self) -> Node {
        let percent = self.current_span();
        self.pos += 1;
        if self.at(TokenKind::OpeningCurly) {
            let (map, span) = self.parse_map_body();
            return Node::new(NodeKind::Map(map), percent.merge(span));
        }
        let name = self.parse_struct_name();
        if !self.at(TokenKind::OpeningCurly) {
            let found = self.peek().map(Lexeme::describe);
            return self.error_node(ParseErrorKind::Expected {
                expected: "'{' after struct name",
                found,
            });
        }
        let (map, span) = self.parse_map_body();
        Node::new(
            NodeKind::Struct {
                name: Box::new(name),
                map,
            },
            percent.merge(span),
        )
    }

    fn parse_struct_name(&mut self) -> Node {
        let Some(lexeme) = self.peek() else {
            return self.error_node(ParseErrorKind::UnexpectedEnd);
        };
        let mut name = match lexeme.kind {
            TokenKind::AliasToken => {
                self.pos += 1;
                Node::new(
                    NodeKind::Alias {
                        base: None,
                        segments: vec![lexeme.text.to_string()],
                    },
                    lexeme.span,
                )
            }
            TokenKind::IdentifierToken => {
                self.pos += 1;
                Node::new(NodeKind::Identifier(lexeme.text.to_string()), lexeme.span)
            }
            TokenKind::AtOperator => {
                self.pos += 1;
                let attribute = match self.expect(TokenKind::IdentifierToken, "attribute name") {
                    Ok(attribute) => attribute,
                    Err(error) => return error,
                };
                let operand = Node::new(
                    NodeKind::Identifier(attribute.text.to_string()),
                    attribute.span,
                );
                Node::new(
                    NodeKind::Unary {
                        operator: lexeme.text.to_string(),
                        operand: Box::new(operand),
                    },
                    lexeme.span.merge(attribute.span),
                )
            }
            _ => {
                return self.error_node(ParseErrorKind::Expected {
                    expected: "struct name",
                    found: Some(lexeme.describe()),
                });
            }
        };
        while self.at(TokenKind::DotOperator) {
            let Some(segment) = self
                .lexeme_at(self.pos + 1)
                .filter(|segment| segment.kind == TokenKind::AliasToken)
            else {
                break;
            };
            self.pos += 2;
            name = extend_alias(name, segment);
        }
        name
    }

    /// `{...}` of a map or struct, with an optional `base |` update.
    fn parse_map_body(&mut self) -> (Map, Span) {
        let open = self.current_span();
        self.pos += 1;
        self.skip_eols();
        let mut update = None;
        let mut entries = Vec::new();
        let starts_with_entry = self
            .peek_kind()
            .is_some_and(|kind| kind != TokenKind::ClosingCurly)
            && !self.keyword_ahead(self.pos);
        let mut more = true;
        if starts_with_entry {
            let first = self.parse_expression(PIPE_PRECEDENCE + 1, Context::CONTAINER);
            self.skip_eols();
            if self.eat(TokenKind::PipeOperator).is_some() {
                update = Some(Box::new(first));
            } else {
                entries.push(first);
                more = self.eat(TokenKind::Comma).is_some();
            }
        }
        if more {
            entries.extend(self.parse_items(TokenKind::ClosingCurly));
        }
        let span = self.close(TokenKind::ClosingCurly, open, &mut entries);
        (Map { update, entries }, span)
    }

    // -- text --

    pub(super) fn parse_text_node(&mut self) -> Node {
        let (text, span) = self.parse_text();
        Node::new(NodeKind::Text(text), span)
    }

    /// A string, charlist, or sigil body from its promoter through its
    /// terminator. An unterminated body runs to end of input; the lexer
    /// has already reported it.
    pub(super) fn parse_text(&mut self) -> (Text, Span) {
        let mut span = self.current_span();
        let (kind, heredoc) = match self.advance().map(|promoter| promoter.kind) {
            Some(TokenKind::CharListPromoter) => (TextKind::CharList, false),
            Some(TokenKind::CharListHeredocPromoter) => (TextKind::CharList, true),
            Some(TokenKind::StringHeredocPromoter | TokenKind::SigilHeredocPromoter) => {
                (TextKind::String, true)
            }
            _ => (TextKind::String, false),
        };
        if heredoc {
            while let Some(lexeme) = self.peek() {
                self.pos += 1;
                match lexeme.kind {
                    TokenKind::Eol => break,
                    _ => self.poisoned = true,
                }
            }
        }
        let mut segments = Vec::new();
        let mut closed = false;
        while let Some(lexeme) = self.peek() {
            let segment = match lexeme.kind {
                TokenKind::StringFragment
                | TokenKind::CharListFragment
                | TokenKind::SigilFragment => Segment::Fragment(lexeme.text.to_string()),
                TokenKind::EscapeSequence => Segment::Escape(lexeme.text.to_string()),
                TokenKind::HeredocLinePrefix => Segment::LinePrefix(lexeme.text.to_string()),
                TokenKind::InterpolationStart => {
                    self.pos += 1;
                    let body = self.parse_statements(|kind| kind == TokenKind::InterpolationEnd);
                    let end = match self.eat(TokenKind::InterpolationEnd) {
                        Some(end) => lexeme.span.merge(end.span),
                        None => {
                            self.poisoned = true;
                            lexeme.span.merge(self.previous_span())
                        }
                    };
                    span = span.merge(end);
                    segments.push(Segment::Interpolation(Node::new(NodeKind::Block(body), end)));
                    continue;
                }
                kind if ends_text(kind) => {
                    self.pos += 1;
                    span = span.merge(lexeme.span);
                    closed = true;
                    break;
                }
                _ => break,
            };
            self.pos += 1;
            span = span.merge(lexeme.span);
            segments.push(segment);
        }
        if !closed {
            self.poisoned = true;
        }
        let indent = match segments.last() {
            Some(Segment::LinePrefix(prefix)) if heredoc && closed => {
                let indent = prefix.chars().count();
                segments.pop();
                indent
            }
            _ => 0,
        };
        let text = Text {
            kind,
            heredoc,
            indent,
            segments,
        };
        (text, span)
    }

    /// `~name` followed by a delimited body and optional modifiers.
    pub(super) fn parse_sigil(&mut self) -> Node {
        let tilde = self.current_span();
        self.pos += 1;
        let name = match self.peek() {
            Some(name)
                if matches!(
                    name.kind,
                    TokenKind::InterpolatingSigilName | TokenKind::LiteralSigilName
                ) =>
            {
                self.pos += 1;
                name
            }
            found => {
                return self.error_node(ParseErrorKind::Expected {
                    expected: "sigil name",
                    found: found.map(Lexeme::describe),
                });
            }
        };
        if !matches!(
            self.peek_kind(),
            Some(TokenKind::SigilPromoter | TokenKind::SigilHeredocPromoter)
        ) {
            let found = self.peek().map(Lexeme::describe);
            return self.error_node(ParseErrorKind::Expected {
                expected: "sigil delimiter",
                found,
            });
        }
        let (text, body) = self.parse_text();
        let mut span = tilde.merge(body);
        let modifiers = match self.peek() {
            Some(modifiers) if modifiers.kind == TokenKind::SigilModifiers && !modifiers.spaced => {
                self.pos += 1;
                span = span.merge(modifiers.span);
                modifiers.text.to_string()
            }
            _ => String::new(),
        };
        Node::new(
            NodeKind::Sigil(Sigil {
                name: name.text.to_string(),
                text,
                modifiers,
            }),
            span,
        )
    }

    // -- blocks --

    /// `do ... end` with its `else`, `after`, `rescue`, and `catch`
    /// sections.
    pub(super) fn parse_do_block(&mut self) -> DoBlock {
        let open = self.current_span();
        self.pos += 1;
        let mut sections = Vec::new();
        let mut name = "do".to_string();
        let span = loop {
            let body = self.parse_body(ends_block);
            sections.push(Section { name, body });
            match self.peek() {
                Some(end) if end.kind == TokenKind::End => {
                    self.pos += 1;
                    break open.merge(end.span);
                }
                Some(section) if ends_block(section.kind) => {
                    self.pos += 1;
                    name = section.text.to_string();
                }
                _ => {
                    let kind = ParseErrorKind::MissingTerminator {
                        terminator: "end",
                        line: open.line,
                    };
                    let error = Node::error(kind.to_string(), open);
                    self.error(kind, open);
                    if let Some(section) = sections.last_mut() {
                        section.body.push(error);
                    }
                    break open.merge(self.previous_span());
                }
            }
        };
        DoBlock { sections, span }
    }

    /// `fn clauses end`
    pub(super) fn parse_fn(&mut self) -> Node {
        let open = self.current_span();
        self.pos += 1;
        let mut body = self.parse_body(|kind| kind == TokenKind::End);
        let mut trailing = Vec::new();
        let span = self.close(TokenKind::End, open, &mut trailing);
        if let Some(error) = trailing.pop() {
            body.push(error);
        }
        match body {
            Body::Clauses(clauses) => Node::new(NodeKind::Fn(clauses), span),
            Body::Expressions(_) => {
                let kind = ParseErrorKind::Expected {
                    expected: "'->' in fn",
                    found: None,
                };
                let message = kind.to_string();
                self.error(kind, open);
                Node::error(message, span)
            }
        }
    }

    /// Statements of a block body, grouped into clauses when the body
    /// contains `->`.
    pub(super) fn parse_body(&mut self, stop: fn(TokenKind) -> bool) -> Body {
        let outer = std::mem::take(&mut self.poisoned);
        let mut expressions = Vec::new();
        let mut clauses: Vec<Clause> = Vec::new();
        loop {
            self.poll_cancellation();
            self.skip_separators();
            match self.peek_kind() {
                None => break,
                Some(kind) if stop(kind) => break,
                Some(_) => {}
            }
            let start = self.pos;
            match self.parse_clause_or_statement() {
                Item::Clause(mut clause) => {
                    if clauses.is_empty() && !expressions.is_empty() {
                        let kind = ParseErrorKind::UnexpectedToken("->".to_string());
                        clause.body.push(Node::error(kind.to_string(), clause.arrow));
                        self.error(kind, clause.arrow);
                    }
                    clauses.push(clause);
                    if self.poisoned {
                        self.synchronize(stop, start);
                        self.poisoned = false;
                    }
                }
                Item::Expression(node) => {
                    let node = match self.finish_statement(stop, start) {
                        Some(error) => super::with_error(node, error),
                        None => node,
                    };
                    match clauses.last_mut() {
                        Some(clause) => clause.body.push(node),
                        None => expressions.push(node),
                    }
                }
            }
        }
        self.poisoned = outer;
        if clauses.is_empty() {
            Body::Expressions(expressions)
        } else {
            Body::Clauses(clauses)
        }
    }

    fn parse_clause_or_statement(&mut self) -> Item {
        if let Some(arrow) = self.eat(TokenKind::StabOperator) {
            return Item::Clause(Clause {
                head: Vec::new(),
                guard: None,
                body: Vec::new(),
                arrow: arrow.span,
            });
        }
        if self.at(TokenKind::OpeningParenthesis) && self.parenthesized_head_ahead() {
            return Item::Clause(self.parse_parenthesized_head());
        }
        let first = self.parse_expression(0, Context::STATEMENT);
        if !self.at(TokenKind::Comma) && !self.at(TokenKind::StabOperator) {
            return Item::Expression(first);
        }
        let mut head = vec![first];
        while self.eat(TokenKind::Comma).is_some() {
            self.skip_eols();
            if self.keyword_ahead(self.pos) {
                head.push(self.parse_keywords(Context::CONTAINER));
                break;
            }
            head.push(self.parse_expression(0, Context::CONTAINER));
        }
        Item::Clause(self.finish_head(head, None))
    }

    /// Whether the parenthesized group at the cursor is followed by
    /// `->` or `when`.
    fn parenthesized_head_ahead(&self) -> bool {
        let mut depth = 0usize;
        let mut index = self.pos;
        while let Some(kind) = self.kind_at(index) {
            if super::opens(kind) {
                depth += 1;
            } else if super::closes(kind) {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return matches!(
                        self.kind_at(index + 1),
                        Some(TokenKind::StabOperator | TokenKind::WhenOperator)
                    );
                }
            }
            index += 1;
        }
        false
    }

    fn parse_parenthesized_head(&mut self) -> Clause {
        let open = self.current_span();
        self.pos += 1;
        let mut head = self.parse_items(TokenKind::ClosingParenthesis);
        self.close(TokenKind::ClosingParenthesis, open, &mut head);
        let guard = if self.eat(TokenKind::WhenOperator).is_some() {
            self.skip_eols();
            Some(self.parse_expression(WHEN_PRECEDENCE, Context::STATEMENT))
        } else {
            None
        };
        self.finish_head(head, guard)
    }

    fn finish_head(&mut self, mut head: Vec<Node>, guard: Option<Node>) -> Clause {
        let guard = guard.or_else(|| split_guard(&mut head));
        let arrow = match self.expect(TokenKind::StabOperator, "'->'") {
            Ok(arrow) => arrow.span,
            Err(error) => {
                let span = error.span;
                head.push(error);
                span
            }
        };
        Clause {
            head,
            guard: guard.map(Box::new),
            body: Vec::new(),
            arrow,
        }
    }
}

/// Pull the guard out of a trailing `pattern when guard`.
fn split_guard(head: &mut Vec<Node>) -> Option<Node> {
    let last = head.pop()?;
    match last.kind {
        NodeKind::Binary {
            operator,
            left,
            right,
            ..
        } if operator == "when" => {
            head.push(*left);
            Some(*right)
        }
        kind => {
            head.push(Node::new(kind, last.span));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Body, Document, Node, NodeKind, Segment};
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn only(source: &str) -> Node {
        let (tokens, _) = tokenize(source);
        let (Document { mut expressions, .. }, errors) = parse(&tokens);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(expressions.len(), 1);
        expressions.remove(0)
    }

    #[test]
    fn map_update() {
        let NodeKind::Map(map) = only("%{m | a: 1}").kind else {
            panic!("not a map");
        };
        assert!(map.update.is_some());
        assert_eq!(map.entries.len(), 1);
    }

    #[test]
    fn struct_with_dotted_name() {
        let NodeKind::Struct { name, .. } = only("%Foo.Bar{}").kind else {
            panic!("not a struct");
        };
        assert_eq!(
            name.kind,
            NodeKind::Alias {
                base: None,
                segments: vec!["Foo".into(), "Bar".into()],
            }
        );
    }

    #[test]
    fn heredoc_indent_comes_from_terminator() {
        let NodeKind::Text(text) = only("\"\"\"\n    a\n  \"\"\"").kind else {
            panic!("not text");
        };
        assert!(text.heredoc);
        assert_eq!(text.indent, 2);
        assert_eq!(
            text.segments.first(),
            Some(&Segment::LinePrefix("    ".to_string()))
        );
    }

    #[test]
    fn case_clauses_with_guard() {
        let NodeKind::Call(call) = only("case x do\n  y when y > 0 -> y\n  _ -> 0\nend").kind else {
            panic!("not a call");
        };
        let Some(block) = call.do_block else {
            panic!("no do block");
        };
        let Body::Clauses(clauses) = &block.sections[0].body else {
            panic!("no clauses");
        };
        assert_eq!(clauses.len(), 2);
        assert!(clauses[0].guard.is_some());
        assert_eq!(clauses[1].body.len(), 1);
    }

    #[test]
    fn fn_with_parenthesized_head() {
        let NodeKind::Fn(clauses) = only("fn (a, b) -> a end").kind else {
            panic!("not fn");
        };
        assert_eq!(clauses[0].head.len(), 2);
    }

    #[test]
    fn else_section() {
        let NodeKind::Call(call) = only("if a do\n  b\nelse\n  c\nend").kind else {
            panic!("not a call");
        };
        let names: Vec<_> = call
            .do_block
            .iter()
            .flat_map(|block| &block.sections)
            .map(|section| section.name.as_str())
            .collect();
        assert_eq!(names, ["do", "else"]);
    }

    #[test]
    fn parentheses_unwrap_single_expression() {
        assert_eq!(only("(a)").kind, NodeKind::Identifier("a".to_string()));
        assert_eq!(only("()").kind, NodeKind::Block(Vec::new()));
    }
}
