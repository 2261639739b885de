//! Escape decoding and heredoc indentation stripping.

use crate::ast::{Node, Segment, Text};

/// Piece of a text literal after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Part<'a> {
    Literal(String),
    Interpolation(&'a Node),
}

/// Decode one escape sequence, backslash included.
///
/// An escaped newline decodes to nothing. Returns `None` for `\x` or
/// `\u` without valid hex digits, or for a codepoint that is not a
/// Unicode scalar value.
#[must_use]
pub fn decode_escape(text: &str) -> Option<String> {
    let mut chars = text.strip_prefix('\\')?.chars();
    let escaped = chars.next()?;
    let rest = chars.as_str();
    let decoded = match escaped {
        'a' => '\u{7}',
        'b' => '\u{8}',
        'd' => '\u{7f}',
        'e' => '\u{1b}',
        'f' => '\u{c}',
        'n' => '\n',
        'r' => '\r',
        's' => ' ',
        't' => '\t',
        'v' => '\u{b}',
        '0' => '\0',
        '\n' | '\r' => return Some(String::new()),
        'x' => hex_codepoint(rest, 2)?,
        'u' => hex_codepoint(rest, 4)?,
        other => other,
    };
    Some(decoded.to_string())
}

/// `H`/`HH` (up to `max` digits, at least one) or `{H+}`.
fn hex_codepoint(digits: &str, max: usize) -> Option<char> {
    let hex = match digits.strip_prefix('{') {
        Some(braced) => braced.strip_suffix('}')?,
        None if digits.len() <= max && (max == 2 || digits.len() == max) => digits,
        None => return None,
    };
    if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// Codepoint of a character literal, given the text after `?`.
#[must_use]
pub fn char_codepoint(text: &str) -> Option<u32> {
    if text.starts_with('\\') {
        let decoded = decode_escape(text)?;
        let mut chars = decoded.chars();
        return match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(u32::from(ch)),
            _ => None,
        };
    }
    text.chars().next().map(u32::from)
}

/// Split a text literal into literal runs and interpolations.
///
/// With `decode` set, escapes are decoded; otherwise they are kept as
/// written, which is what sigils receive. Heredoc lines lose up to
/// [`Text::indent`] characters of leading whitespace either way.
/// Empty literal runs are dropped.
#[must_use]
pub fn parts(text: &Text, decode: bool) -> Vec<Part<'_>> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    for segment in &text.segments {
        match segment {
            Segment::Fragment(fragment) => literal.push_str(fragment),
            Segment::Escape(escape) if decode => {
                // the lexer reports undecodable escapes; keep their text
                literal.push_str(&decode_escape(escape).unwrap_or_else(|| escape.clone()));
            }
            Segment::Escape(escape) => literal.push_str(escape),
            Segment::LinePrefix(prefix) => {
                literal.extend(prefix.chars().skip(text.indent));
            }
            Segment::Interpolation(node) => {
                if !literal.is_empty() {
                    parts.push(Part::Literal(std::mem::take(&mut literal)));
                }
                parts.push(Part::Interpolation(node));
            }
        }
    }
    if !literal.is_empty() {
        parts.push(Part::Literal(literal));
    }
    parts
}

/// Decoded value of a text without interpolation.
#[must_use]
pub fn literal(text: &Text) -> Option<String> {
    let mut value = String::new();
    for part in parts(text, true) {
        match part {
            Part::Literal(literal) => value.push_str(&literal),
            Part::Interpolation(_) => return None,
        }
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TextKind;

    #[test]
    fn simple_escapes() {
        assert_eq!(decode_escape(r"\n").as_deref(), Some("\n"));
        assert_eq!(decode_escape(r"\s").as_deref(), Some(" "));
        assert_eq!(decode_escape(r"\d").as_deref(), Some("\u{7f}"));
        assert_eq!(decode_escape(r#"\""#).as_deref(), Some("\""));
        assert_eq!(decode_escape("\\\n").as_deref(), Some(""));
        assert_eq!(decode_escape("\\\r\n").as_deref(), Some(""));
    }

    #[test]
    fn hex_and_unicode_escapes() {
        assert_eq!(decode_escape(r"\x41").as_deref(), Some("A"));
        assert_eq!(decode_escape(r"\xA").as_deref(), Some("\n"));
        assert_eq!(decode_escape(r"\x{1F600}").as_deref(), Some("\u{1F600}"));
        assert_eq!(decode_escape(r"\é").as_deref(), Some("é"));
        assert_eq!(decode_escape(r"\u{e9}").as_deref(), Some("é"));
        assert_eq!(decode_escape(r"\u12"), None);
        assert_eq!(decode_escape(r"\x"), None);
        assert_eq!(decode_escape(r"\x{D800}"), None);
    }

    #[test]
    fn character_literals() {
        assert_eq!(char_codepoint("a"), Some(97));
        assert_eq!(char_codepoint(r"\n"), Some(10));
        assert_eq!(char_codepoint("é"), Some(233));
    }

    #[test]
    fn heredoc_indent_is_stripped() {
        let text = Text {
            kind: TextKind::String,
            heredoc: true,
            indent: 2,
            segments: vec![
                Segment::LinePrefix("    ".to_string()),
                Segment::Fragment("a\n".to_string()),
                Segment::LinePrefix(" ".to_string()),
                Segment::Fragment("b\n".to_string()),
            ],
        };
        assert_eq!(literal(&text).as_deref(), Some("  a\nb\n"));
    }

    #[test]
    fn raw_parts_keep_escapes() {
        let text = Text {
            kind: TextKind::String,
            heredoc: false,
            indent: 0,
            segments: vec![
                Segment::Fragment("a".to_string()),
                Segment::Escape(r"\n".to_string()),
            ],
        };
        assert_eq!(parts(&text, false), vec![Part::Literal(r"a\n".to_string())]);
    }
}
