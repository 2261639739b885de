//! Syntax tree to quoted terms, in the shape `quote/1` produces.
//!
//! Quoting is total: every node, including error nodes, has a term.

use crate::ast::{
    Body, Call, CallTarget, Clause, DoBlock, Document, Map, Node, NodeKind, Sigil, Text, TextKind,
};
use crate::escape::{self, Part};
use crate::term::Term;
use crate::token::Span;

/// Position metadata attached to quoted calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metadata {
    /// `[]`
    None,
    /// `[line: 1]`
    #[default]
    Line,
    /// `[line: 1, column: 5]`
    LineColumn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuoteOptions {
    pub metadata: Metadata,
}

/// Quote a single expression.
#[must_use]
pub fn quote(node: &Node, options: &QuoteOptions) -> Term {
    Quoter { options }.node(node)
}

/// Quote a whole document the way a file body is quoted: nothing is
/// an empty block, one expression is itself, more are a block.
#[must_use]
pub fn quote_document(document: &Document, options: &QuoteOptions) -> Term {
    let quoter = Quoter { options };
    quoter.block(&document.expressions, empty_block)
}

struct Quoter<'a> {
    options: &'a QuoteOptions,
}

fn empty_block() -> Term {
    Term::call(
        Term::atom("__block__"),
        Term::List(Vec::new()),
        Term::List(Vec::new()),
    )
}

impl Quoter<'_> {
    fn meta(&self, span: Span) -> Term {
        match self.options.metadata {
            Metadata::None => Term::List(Vec::new()),
            Metadata::Line => Term::keywords([("line", Term::integer(span.line))]),
            Metadata::LineColumn => Term::keywords([
                ("line", Term::integer(span.line)),
                ("column", Term::integer(span.column)),
            ]),
        }
    }

    fn nodes(&self, nodes: &[Node]) -> Vec<Term> {
        nodes.iter().map(|node| self.node(node)).collect()
    }

    /// Block rules; `empty` decides what zero expressions become.
    fn block(&self, nodes: &[Node], empty: fn() -> Term) -> Term {
        match nodes {
            [] => empty(),
            [single] => self.node(single),
            _ => Term::call(
                Term::atom("__block__"),
                Term::List(Vec::new()),
                Term::List(self.nodes(nodes)),
            ),
        }
    }

    fn node(&self, node: &Node) -> Term {
        let meta = || self.meta(node.span);
        match &node.kind {
            NodeKind::Integer(value) => Term::Integer(value.clone()),
            NodeKind::Float(value) => Term::Float(*value),
            NodeKind::Char(codepoint) => Term::integer(*codepoint),
            NodeKind::Boolean(value) => Term::boolean(*value),
            NodeKind::Nil => Term::nil(),
            NodeKind::Atom(name) => Term::atom(name),
            NodeKind::QuotedAtom(text) => self.quoted_atom(text, node.span),
            NodeKind::Text(text) => match text.kind {
                TextKind::String => self.string(text, node.span),
                TextKind::CharList => self.charlist(text, node.span),
            },
            NodeKind::Sigil(sigil) => self.sigil(sigil, node.span),
            NodeKind::Identifier(name) => Term::call(Term::atom(name), meta(), Term::nil()),
            NodeKind::Alias { base, segments } => {
                let mut parts: Vec<Term> = base.iter().map(|base| self.node(base)).collect();
                parts.extend(segments.iter().map(|segment| Term::atom(segment)));
                Term::call(Term::atom("__aliases__"), meta(), Term::List(parts))
            }
            NodeKind::Call(call) => self.call(call, node.span),
            NodeKind::Unary { operator, operand } => Term::call(
                Term::atom(operator),
                meta(),
                Term::List(vec![self.node(operand)]),
            ),
            NodeKind::Binary {
                operator,
                left,
                right,
                operator_span,
            } => {
                if let Some(stepped) = self.stepped_range(operator, left, right) {
                    return stepped;
                }
                let meta = self.meta(*operator_span);
                let operands = Term::List(vec![self.node(left), self.node(right)]);
                if operator == "not in" {
                    let inner = Term::call(Term::atom("in"), meta.clone(), operands);
                    Term::call(Term::atom("not"), meta, Term::List(vec![inner]))
                } else {
                    Term::call(Term::atom(operator), meta, operands)
                }
            }
            NodeKind::Access { subject, key } => Term::call(
                self.dot(
                    node.span,
                    vec![Term::alias("Access"), Term::atom("get")],
                ),
                meta(),
                Term::List(vec![self.node(subject), self.node(key)]),
            ),
            NodeKind::List(items) => Term::List(self.flattened(items)),
            NodeKind::Keywords(pairs) => Term::List(self.pairs(pairs)),
            NodeKind::Tuple(items) => {
                let elements = self.nodes(items);
                if elements.len() == 2 {
                    Term::Tuple(elements)
                } else {
                    Term::call(Term::atom("{}"), meta(), Term::List(elements))
                }
            }
            NodeKind::Map(map) => self.map(map, node.span),
            NodeKind::Struct { name, map } => Term::call(
                Term::atom("%"),
                meta(),
                Term::List(vec![self.node(name), self.map(map, node.span)]),
            ),
            NodeKind::Bitstring(items) => {
                Term::call(Term::atom("<<>>"), meta(), Term::List(self.nodes(items)))
            }
            NodeKind::Block(nodes) => self.block(nodes, empty_block),
            NodeKind::Fn(clauses) => Term::call(
                Term::atom("fn"),
                meta(),
                Term::List(clauses.iter().map(|clause| self.clause(clause)).collect()),
            ),
            NodeKind::Error(message) => Term::call(
                Term::atom("__error__"),
                meta(),
                Term::List(vec![Term::binary(message)]),
            ),
        }
    }

    /// `{:., meta, parts}`
    fn dot(&self, span: Span, parts: Vec<Term>) -> Term {
        Term::call(Term::atom("."), self.meta(span), Term::List(parts))
    }

    /// `{{:., meta, [module, function]}, meta, args}`
    fn remote(&self, span: Span, module: Term, function: &str, args: Vec<Term>) -> Term {
        Term::call(
            self.dot(span, vec![module, Term::atom(function)]),
            self.meta(span),
            Term::List(args),
        )
    }

    fn pairs(&self, pairs: &[(Node, Node)]) -> Vec<Term> {
        pairs
            .iter()
            .map(|(key, value)| Term::pair(self.node(key), self.node(value)))
            .collect()
    }

    /// List elements with a trailing keyword run spliced in.
    fn flattened(&self, items: &[Node]) -> Vec<Term> {
        let mut terms = Vec::with_capacity(items.len());
        for item in items {
            match &item.kind {
                NodeKind::Keywords(pairs) => terms.extend(self.pairs(pairs)),
                _ => terms.push(self.node(item)),
            }
        }
        terms
    }

    fn map_entries(&self, entries: &[Node]) -> Vec<Term> {
        let mut terms = Vec::with_capacity(entries.len());
        for entry in entries {
            match &entry.kind {
                NodeKind::Keywords(pairs) => terms.extend(self.pairs(pairs)),
                NodeKind::Binary {
                    operator,
                    left,
                    right,
                    ..
                } if operator == "=>" => terms.push(Term::pair(self.node(left), self.node(right))),
                _ => terms.push(self.node(entry)),
            }
        }
        terms
    }

    /// `first..last//step` as the three-argument `..//`, with the
    /// metadata of its `..`.
    fn stepped_range(&self, operator: &str, range: &Node, step: &Node) -> Option<Term> {
        if operator != "//" {
            return None;
        }
        let NodeKind::Binary {
            operator: range_operator,
            left: first,
            right: last,
            operator_span,
        } = &range.kind
        else {
            return None;
        };
        (range_operator == "..").then(|| {
            Term::call(
                Term::atom("..//"),
                self.meta(*operator_span),
                Term::List(vec![self.node(first), self.node(last), self.node(step)]),
            )
        })
    }

    fn map(&self, map: &Map, span: Span) -> Term {
        let entries = self.map_entries(&map.entries);
        let body = match &map.update {
            Some(base) => vec![Term::call(
                Term::atom("|"),
                self.meta(base.span),
                Term::List(vec![self.node(base), Term::List(entries)]),
            )],
            None => entries,
        };
        Term::call(Term::atom("%{}"), self.meta(span), Term::List(body))
    }

    fn call(&self, call: &Call, span: Span) -> Term {
        let mut args = self.nodes(&call.arguments);
        if let Some(do_block) = &call.do_block {
            args.push(self.do_block(do_block));
        }
        match &call.target {
            CallTarget::Local { name } => Term::call(Term::atom(name), self.meta(span), Term::List(args)),
            CallTarget::Remote {
                receiver,
                name,
                dot,
                name_span,
            } => {
                let mut meta = self.meta(*name_span);
                if !call.parentheses && args.is_empty() {
                    if let Term::List(items) = &mut meta {
                        items.insert(0, Term::pair(Term::atom("no_parens"), Term::boolean(true)));
                    }
                }
                Term::call(
                    self.dot(*dot, vec![self.node(receiver), Term::atom(name)]),
                    meta,
                    Term::List(args),
                )
            }
            CallTarget::Anonymous { function, dot } => Term::call(
                self.dot(*dot, vec![self.node(function)]),
                self.meta(*dot),
                Term::List(args),
            ),
        }
    }

    fn do_block(&self, do_block: &DoBlock) -> Term {
        Term::List(
            do_block
                .sections
                .iter()
                .map(|section| {
                    let body = match &section.body {
                        Body::Expressions(nodes) => self.block(nodes, empty_block),
                        Body::Clauses(clauses) => {
                            Term::List(clauses.iter().map(|clause| self.clause(clause)).collect())
                        }
                    };
                    Term::pair(Term::atom(&section.name), body)
                })
                .collect(),
        )
    }

    fn clause(&self, clause: &Clause) -> Term {
        let meta = self.meta(clause.arrow);
        let mut head = self.nodes(&clause.head);
        if let Some(guard) = &clause.guard {
            head.push(self.node(guard));
            head = vec![Term::call(Term::atom("when"), meta.clone(), Term::List(head))];
        }
        let body = self.block(&clause.body, Term::nil);
        Term::call(
            Term::atom("->"),
            meta,
            Term::List(vec![Term::List(head), body]),
        )
    }

    /// Interpolation as it appears inside `<<>>`:
    /// `Kernel.to_string(expr) :: binary`.
    fn binary_parts(&self, parts: Vec<Part<'_>>) -> Vec<Term> {
        parts
            .into_iter()
            .map(|part| match part {
                Part::Literal(literal) => Term::Binary(literal),
                Part::Interpolation(node) => {
                    let meta = self.meta(node.span);
                    let to_string = self.to_string_call(node);
                    Term::call(
                        Term::atom("::"),
                        meta.clone(),
                        Term::List(vec![
                            to_string,
                            Term::call(Term::atom("binary"), meta, Term::nil()),
                        ]),
                    )
                }
            })
            .collect()
    }

    fn to_string_call(&self, node: &Node) -> Term {
        self.remote(
            node.span,
            Term::alias("Kernel"),
            "to_string",
            vec![self.node(node)],
        )
    }

    fn interpolated_binary(&self, text: &Text, span: Span, decode: bool) -> Term {
        let parts = escape::parts(text, decode);
        Term::call(
            Term::atom("<<>>"),
            self.meta(span),
            Term::List(self.binary_parts(parts)),
        )
    }

    fn string(&self, text: &Text, span: Span) -> Term {
        match escape::literal(text) {
            Some(value) => Term::Binary(value),
            None => self.interpolated_binary(text, span, true),
        }
    }

    fn charlist(&self, text: &Text, span: Span) -> Term {
        if let Some(value) = escape::literal(text) {
            return codepoints(&value);
        }
        let parts = escape::parts(text, true)
            .into_iter()
            .map(|part| match part {
                Part::Literal(literal) => Term::Binary(literal),
                Part::Interpolation(node) => self.to_string_call(node),
            })
            .collect();
        self.remote(
            span,
            Term::alias("List"),
            "to_charlist",
            vec![Term::List(parts)],
        )
    }

    fn quoted_atom(&self, text: &Text, span: Span) -> Term {
        match escape::literal(text) {
            Some(value) => Term::Atom(value),
            None => self.remote(
                span,
                Term::atom("erlang"),
                "binary_to_atom",
                vec![self.interpolated_binary(text, span, true), Term::atom("utf8")],
            ),
        }
    }

    fn sigil(&self, sigil: &Sigil, span: Span) -> Term {
        Term::call(
            Term::Atom(format!("sigil_{}", sigil.name)),
            self.meta(span),
            Term::List(vec![
                self.interpolated_binary(&sigil.text, span, false),
                codepoints(&sigil.modifiers),
            ]),
        )
    }
}

fn codepoints(value: &str) -> Term {
    Term::List(value.chars().map(|ch| Term::integer(u32::from(ch))).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn quoted(source: &str, metadata: Metadata) -> String {
        let (tokens, _) = tokenize(source);
        let (document, errors) = parse(&tokens);
        assert!(errors.is_empty(), "{errors:?}");
        quote_document(&document, &QuoteOptions { metadata }).to_string()
    }

    #[test]
    fn metadata_modes() {
        assert_eq!(quoted("a + b", Metadata::None), "{:+, [], [{:a, [], nil}, {:b, [], nil}]}");
        assert_eq!(
            quoted("a + b", Metadata::LineColumn),
            "{:+, [line: 1, column: 3], [{:a, [line: 1, column: 1], nil}, {:b, [line: 1, column: 5], nil}]}"
        );
    }

    #[test]
    fn empty_document_is_an_empty_block() {
        assert_eq!(quoted("", Metadata::Line), "{:__block__, [], []}");
    }

    #[test]
    fn sigils_keep_raw_contents() {
        assert_eq!(
            quoted(r"~r/a\d+/i", Metadata::None),
            r#"{:sigil_r, [], [{:<<>>, [], ["a\\d+"]}, [105]]}"#
        );
    }
}
