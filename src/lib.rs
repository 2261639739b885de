//! Error-tolerant Elixir lexer, parser, and quoter.
//!
//! Source text is split into tokens by a state machine, the tokens are
//! parsed into a typed syntax tree, and the tree is quoted into the
//! same terms Elixir's `quote/1` produces. Every stage keeps going
//! past malformed input and reports what it found alongside a partial
//! result.
//!
//! # Quick start
//!
//! ## Quote a source string
//!
//! ```
//! use elixir_syntax::{Metadata, QuoteOptions, quote_str};
//!
//! let options = QuoteOptions { metadata: Metadata::None };
//! let (term, errors) = quote_str("1 + 2", &options);
//! assert!(errors.is_empty());
//! assert_eq!(term.to_string(), "{:+, [], [1, 2]}");
//! ```
//!
//! ## Inspect tokens
//!
//! ```
//! use elixir_syntax::{TokenKind, tokenize};
//!
//! let (tokens, errors) = tokenize("Enum");
//! assert!(errors.is_empty());
//! assert_eq!(tokens[0].kind, TokenKind::AliasToken);
//! ```
//!
//! ## Render a term back to source
//!
//! ```
//! use elixir_syntax::{QuoteOptions, macros, quote_str};
//!
//! let (term, _) = quote_str("if a, do: b", &QuoteOptions::default());
//! assert_eq!(macros::to_string(&term), "if a do\n  b\nend");
//! ```

#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod cancel;
pub mod escape;
pub mod highlighter;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod quote;
pub mod term;
pub mod token;

use tracing::{debug, debug_span};

pub use ast::{Document, Node, NodeKind};
pub use cancel::{CancellationToken, Cancelled};
pub use highlighter::{Category, categories};
pub use lexer::{LexError, LexErrorKind, Lexer, State, tokenize};
pub use parser::{ParseError, ParseErrorKind, parse, parse_with_cancellation};
pub use quote::{Metadata, QuoteOptions, quote, quote_document};
pub use term::Term;
pub use token::{Span, Token, TokenKind};

/// Unified error type covering both lexing and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

impl Error {
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Lex(error) => error.span,
            Self::Parse(error) => error.span,
        }
    }
}

/// Settings for [`analyze`].
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub quote: QuoteOptions,
    /// Polled while lexing and parsing.
    pub cancellation: Option<CancellationToken>,
}

/// Everything one pass over a source string produced.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    pub document: Document,
    /// Lexical errors first, then parse errors, each in source order.
    pub errors: Vec<Error>,
    pub term: Term,
}

/// Lex, parse, and quote `source`.
///
/// Malformed input still yields an [`Analysis`]; only cancellation
/// fails.
pub fn analyze(source: &str, options: &Options) -> Result<Analysis, Cancelled> {
    let span = debug_span!("analyze", bytes = source.len());
    let _guard = span.enter();

    let cancellation = options.cancellation.clone().unwrap_or_default();
    let mut lexer = Lexer::new(source).with_cancellation(cancellation.clone());
    let tokens: Vec<Token> = lexer.by_ref().collect();
    if lexer.is_cancelled() {
        debug!("cancelled while lexing");
        return Err(Cancelled);
    }
    let lex_errors = lexer.into_errors();

    let (document, parse_errors) = parse_with_cancellation(&tokens, &cancellation)?;
    let term = quote_document(&document, &options.quote);

    let errors: Vec<Error> = lex_errors
        .into_iter()
        .map(Error::from)
        .chain(parse_errors.into_iter().map(Error::from))
        .collect();
    debug!(
        tokens = tokens.len(),
        errors = errors.len(),
        "analysis finished"
    );
    Ok(Analysis {
        tokens,
        document,
        errors,
        term,
    })
}

/// Quote `source` in one step, returning the term and every error.
#[must_use]
pub fn quote_str(source: &str, options: &QuoteOptions) -> (Term, Vec<Error>) {
    let (tokens, lex_errors) = tokenize(source);
    let (document, parse_errors) = parse(&tokens);
    let errors = lex_errors
        .into_iter()
        .map(Error::from)
        .chain(parse_errors.into_iter().map(Error::from))
        .collect();
    (quote_document(&document, options), errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_collects_every_stage() {
        let analysis = analyze("x = 1", &Options::default()).unwrap();
        assert_eq!(analysis.document.expressions.len(), 1);
        assert!(analysis.errors.is_empty());
        assert!(!analysis.tokens.is_empty());
        assert_eq!(
            analysis.term.to_string(),
            "{:=, [line: 1], [{:x, [line: 1], nil}, 1]}"
        );
    }

    #[test]
    fn analyze_reports_cancellation() {
        let cancellation = CancellationToken::new();
        cancellation.cancel();
        let options = Options {
            cancellation: Some(cancellation),
            ..Options::default()
        };
        assert_eq!(analyze("x = 1", &options).unwrap_err(), Cancelled);
    }

    #[test]
    fn errors_keep_their_span() {
        let (_, errors) = quote_str("foo(1 2)", &QuoteOptions::default());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span().line, 1);
    }
}
