#![allow(dead_code)]

use elixir_syntax::{
    Document, Lexer, Metadata, ParseError, QuoteOptions, State, TokenKind, parse, quote_document,
    quote_str, tokenize,
};

/// Token kinds of `source`.
pub fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).0.into_iter().map(|token| token.kind).collect()
}

/// Lexer state after the last token of `source`.
pub fn final_state(source: &str) -> State {
    let mut lexer = Lexer::new(source);
    lexer.by_ref().for_each(drop);
    lexer.state()
}

/// Parse `source`, ignoring lexical errors.
pub fn parse_source(source: &str) -> (Document, Vec<ParseError>) {
    let (tokens, _) = tokenize(source);
    parse(&tokens)
}

/// Quote `source` without metadata, asserting that it is well formed.
pub fn quoted(source: &str) -> String {
    quoted_with(source, Metadata::None)
}

pub fn quoted_with(source: &str, metadata: Metadata) -> String {
    let (term, errors) = quote_str(source, &QuoteOptions { metadata });
    assert!(
        errors.is_empty(),
        "unexpected errors for {source:?}: {errors:?}"
    );
    term.to_string()
}

/// Quoted terms of each top-level expression.
pub fn quoted_expressions(source: &str) -> Vec<String> {
    let (document, _) = parse_source(source);
    let options = QuoteOptions {
        metadata: Metadata::None,
    };
    document
        .expressions
        .iter()
        .map(|node| elixir_syntax::quote(node, &options).to_string())
        .collect()
}

/// Quote a document directly, errors allowed.
pub fn quoted_document(source: &str) -> String {
    let (document, _) = parse_source(source);
    quote_document(
        &document,
        &QuoteOptions {
            metadata: Metadata::None,
        },
    )
    .to_string()
}
