//! Strings, charlists, sigils, heredocs, and interpolation.
//!
//! All of them follow the same promoter, fragments, terminator shape.
//! A promoter pushes a [`Group`] frame; `#{` pushes an interpolation
//! frame and drops back to expression lexing until its `}`.

use tracing::trace;

use super::{Lexer, State};
use crate::escape;
use crate::lexer::LexErrorKind;
use crate::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Family {
    String,
    CharList,
    Sigil,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Group {
    family: Family,
    terminator: char,
    heredoc: bool,
    /// Interpolation and escapes are both on, or both off (uppercase
    /// sigils).
    interpolating: bool,
    pub(super) opened: crate::token::Span,
}

impl Group {
    const fn fragment(self) -> TokenKind {
        match self.family {
            Family::String => TokenKind::StringFragment,
            Family::CharList => TokenKind::CharListFragment,
            Family::Sigil => TokenKind::SigilFragment,
        }
    }

    const fn terminator_kind(self) -> TokenKind {
        match (self.family, self.heredoc) {
            (Family::String, false) => TokenKind::StringTerminator,
            (Family::String, true) => TokenKind::StringHeredocTerminator,
            (Family::CharList, false) => TokenKind::CharListTerminator,
            (Family::CharList, true) => TokenKind::CharListHeredocTerminator,
            (Family::Sigil, false) => TokenKind::SigilTerminator,
            (Family::Sigil, true) => TokenKind::SigilHeredocTerminator,
        }
    }

    pub(super) fn terminator_text(self) -> String {
        let count = if self.heredoc { 3 } else { 1 };
        std::iter::repeat_n(self.terminator, count).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) enum Frame {
    Group(Group),
    /// Inside `#{`; `braces` counts unclosed `{` so the right `}` ends it.
    Interpolation { braces: usize, resume: State },
}

/// Closing delimiter for a sigil opened with `open`.
const fn sigil_terminator(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '<' => Some('>'),
        '/' | '|' | '"' | '\'' => Some(open),
        _ => None,
    }
}

impl Lexer<'_> {
    pub(super) fn push_group(
        &mut self,
        family: Family,
        terminator: char,
        heredoc: bool,
        interpolating: bool,
    ) -> Group {
        trace!(?family, heredoc, depth = self.stack.len(), "push group");
        let group = Group {
            family,
            terminator,
            heredoc,
            interpolating,
            opened: self.token_span(),
        };
        self.stack.push(Frame::Group(group));
        group
    }

    pub(super) fn pop_frame(&mut self) {
        let frame = self.stack.pop();
        trace!(?frame, depth = self.stack.len(), "pop frame");
    }

    fn starts_with_triple(&self, quote: char) -> bool {
        self.rest().chars().take(3).filter(|&c| c == quote).count() == 3
    }

    /// `"`, `'`, `"""`, or `'''` outside a sigil.
    pub(super) fn lex_promoter(&mut self, quote: char) -> TokenKind {
        let family = if quote == '"' {
            Family::String
        } else {
            Family::CharList
        };
        let heredoc = self.starts_with_triple(quote);
        self.advance_bytes(if heredoc { 3 } else { 1 });
        self.push_group(family, quote, heredoc, true);
        let kind = match (family, heredoc) {
            (Family::String, false) => TokenKind::StringPromoter,
            (Family::String, true) => TokenKind::StringHeredocPromoter,
            (_, false) => TokenKind::CharListPromoter,
            (_, true) => TokenKind::CharListHeredocPromoter,
        };
        let next = if heredoc {
            State::GroupHeredocStart
        } else {
            State::Group
        };
        self.to(next, kind)
    }

    /// After `~`: first the name, then the promoter.
    pub(super) fn lex_sigil(&mut self) -> TokenKind {
        let Some(ch) = self.peek() else {
            return self.lex_expression();
        };
        match self.pending_sigil {
            None if ch.is_ascii_lowercase() => {
                self.advance();
                self.pending_sigil = Some(true);
                TokenKind::InterpolatingSigilName
            }
            None if ch.is_ascii_uppercase() => {
                self.advance_while(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
                self.pending_sigil = Some(false);
                TokenKind::LiteralSigilName
            }
            Some(interpolating) => {
                self.pending_sigil = None;
                if matches!(ch, '"' | '\'') && self.starts_with_triple(ch) {
                    self.advance_bytes(3);
                    self.push_group(Family::Sigil, ch, true, interpolating);
                    return self.to(State::GroupHeredocStart, TokenKind::SigilHeredocPromoter);
                }
                if let Some(terminator) = sigil_terminator(ch) {
                    self.advance();
                    self.push_group(Family::Sigil, terminator, false, interpolating);
                    return self.to(State::Group, TokenKind::SigilPromoter);
                }
                self.state = State::Initial;
                self.lex_expression()
            }
            None => {
                self.state = State::Initial;
                self.lex_expression()
            }
        }
    }

    pub(super) fn lex_sigil_modifiers(&mut self) -> TokenKind {
        self.state = State::AdditionOrSubtractionMaybe;
        if self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.advance_while(|c| c.is_ascii_alphanumeric());
            return TokenKind::SigilModifiers;
        }
        self.lex_expression()
    }

    fn current_group(&mut self) -> Group {
        if let Some(Frame::Group(group)) = self.stack.last() {
            return *group;
        }
        // a group state without its frame only happens through
        // `Lexer::starting_in`; behave as inside a string
        let heredoc = self.state != State::Group;
        self.push_group(Family::String, '"', heredoc, true)
    }

    fn close_group(&mut self, group: Group) -> TokenKind {
        self.pop_frame();
        let next = match (group.family, group.heredoc) {
            (Family::Sigil, _) => State::SigilModifiers,
            (_, true) => State::AdditionOrSubtractionMaybe,
            (_, false) => State::AdditionOrKeywordPairOrSubtractionOrWhiteSpaceMaybe,
        };
        self.to(next, group.terminator_kind())
    }

    pub(super) fn lex_group(&mut self) -> TokenKind {
        let group = self.current_group();
        let Some(ch) = self.peek() else {
            return group.fragment();
        };
        if ch == group.terminator {
            self.advance();
            return self.close_group(group);
        }
        if group.interpolating {
            if ch == '\\' {
                return self.lex_escape(group);
            }
            if self.starts_with("#{") {
                return self.start_interpolation(State::Group);
            }
        }
        self.lex_fragment(group, false)
    }

    pub(super) fn lex_heredoc_start(&mut self) -> TokenKind {
        self.current_group();
        match self.peek() {
            Some(' ' | '\t') => {
                self.advance_while(|c| c == ' ' || c == '\t');
                TokenKind::WhiteSpace
            }
            Some('\n' | '\r') => {
                self.consume_newline();
                self.to(State::GroupHeredocLineStart, TokenKind::Eol)
            }
            _ => {
                self.advance_while(|c| c != '\n' && c != '\r');
                self.pending_error = Some(LexErrorKind::InvalidHeredocStart);
                TokenKind::BadCharacter
            }
        }
    }

    pub(super) fn lex_heredoc_line_start(&mut self) -> TokenKind {
        let group = self.current_group();
        if self.peek().is_some_and(|c| c == ' ' || c == '\t') {
            self.advance_while(|c| c == ' ' || c == '\t');
            return TokenKind::HeredocLinePrefix;
        }
        if self.starts_with_triple(group.terminator) {
            self.advance_bytes(3);
            return self.close_group(group);
        }
        self.state = State::GroupHeredocLineBody;
        self.lex_heredoc_line_body()
    }

    pub(super) fn lex_heredoc_line_body(&mut self) -> TokenKind {
        let group = self.current_group();
        if group.interpolating {
            if self.peek() == Some('\\') {
                return self.lex_escape(group);
            }
            if self.starts_with("#{") {
                return self.start_interpolation(State::GroupHeredocLineBody);
            }
        }
        self.lex_fragment(group, true)
    }

    /// Literal text up to the next terminator, escape, interpolation,
    /// or (in a heredoc) newline, which is included.
    fn lex_fragment(&mut self, group: Group, heredoc_line: bool) -> TokenKind {
        while let Some(ch) = self.peek() {
            if !heredoc_line && ch == group.terminator {
                break;
            }
            if ch == '\\' {
                if group.interpolating {
                    break;
                }
                // verbatim groups still let the terminator be escaped
                self.advance();
                if self.peek() == Some(group.terminator) {
                    self.advance();
                }
                continue;
            }
            if group.interpolating && self.starts_with("#{") {
                break;
            }
            self.advance();
            if heredoc_line && ch == '\n' {
                self.state = State::GroupHeredocLineStart;
                break;
            }
        }
        group.fragment()
    }

    fn lex_escape(&mut self, group: Group) -> TokenKind {
        self.advance();
        if let Some(escaped) = self.advance() {
            self.lex_escape_tail(escaped);
            if matches!(escaped, '\n' | '\r') && self.state == State::GroupHeredocLineBody {
                self.state = State::GroupHeredocLineStart;
            }
            // sigils hand escapes to their macro undecoded
            let escape = &self.input[self.token_start.pos..self.pos];
            if matches!(escaped, 'x' | 'u')
                && group.family != Family::Sigil
                && escape::decode_escape(escape).is_none()
            {
                self.pending_error = Some(LexErrorKind::InvalidEscape(escape.to_string()));
            }
        }
        TokenKind::EscapeSequence
    }

    fn start_interpolation(&mut self, resume: State) -> TokenKind {
        self.advance_bytes(2);
        trace!(depth = self.stack.len(), "push interpolation");
        self.stack.push(Frame::Interpolation { braces: 0, resume });
        self.to(State::Initial, TokenKind::InterpolationStart)
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::tokenize;
    use crate::token::TokenKind::{self, *};

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn string_with_escape() {
        assert_eq!(
            kinds(r#""a\nb""#),
            vec![
                StringPromoter,
                StringFragment,
                EscapeSequence,
                StringFragment,
                StringTerminator
            ]
        );
    }

    #[test]
    fn heredoc_lines() {
        assert_eq!(
            kinds("\"\"\"\n  a\n  \"\"\""),
            vec![
                StringHeredocPromoter,
                Eol,
                HeredocLinePrefix,
                StringFragment,
                HeredocLinePrefix,
                StringHeredocTerminator
            ]
        );
    }

    #[test]
    fn sigil_with_modifiers() {
        assert_eq!(
            kinds("~r/a+/iu"),
            vec![
                Tilde,
                InterpolatingSigilName,
                SigilPromoter,
                SigilFragment,
                SigilTerminator,
                SigilModifiers
            ]
        );
    }

    #[test]
    fn literal_sigil_keeps_escaped_terminator() {
        let (tokens, _) = tokenize(r"~S(a\)b)");
        assert_eq!(tokens[3].kind, SigilFragment);
        assert_eq!(tokens[3].text, r"a\)b");
        assert_eq!(tokens[4].kind, SigilTerminator);
    }

    #[test]
    fn nested_interpolation() {
        assert_eq!(
            kinds(r##""#{"#{1}"}""##),
            vec![
                StringPromoter,
                InterpolationStart,
                StringPromoter,
                InterpolationStart,
                ValidDecimalDigits,
                InterpolationEnd,
                StringTerminator,
                InterpolationEnd,
                StringTerminator
            ]
        );
    }

    #[test]
    fn text_after_heredoc_promoter_is_an_error() {
        let (tokens, errors) = tokenize("\"\"\" x\n\"\"\"");
        assert_eq!(tokens[2].kind, BadCharacter);
        assert_eq!(errors.len(), 1);
    }
}
