//! Quoted terms and their `inspect` rendering.

use std::fmt::{self, Write as _};

use num_bigint::BigInt;

/// Data produced by quoting: the subset of Erlang terms that quoted
/// Elixir code is made of.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Atom by its full name, so `Kernel` is `Elixir.Kernel`.
    Atom(String),
    Integer(BigInt),
    Float(f64),
    /// UTF-8 binary.
    Binary(String),
    List(Vec<Term>),
    Tuple(Vec<Term>),
}

impl Term {
    #[must_use]
    pub fn atom(name: &str) -> Self {
        Self::Atom(name.to_string())
    }

    /// Module alias atom: `alias("Kernel")` is `:"Elixir.Kernel"`.
    #[must_use]
    pub fn alias(name: &str) -> Self {
        Self::Atom(format!("Elixir.{name}"))
    }

    #[must_use]
    pub fn nil() -> Self {
        Self::atom("nil")
    }

    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::atom(if value { "true" } else { "false" })
    }

    #[must_use]
    pub fn integer(value: impl Into<BigInt>) -> Self {
        Self::Integer(value.into())
    }

    #[must_use]
    pub fn binary(value: &str) -> Self {
        Self::Binary(value.to_string())
    }

    #[must_use]
    pub fn pair(first: Self, second: Self) -> Self {
        Self::Tuple(vec![first, second])
    }

    /// `{name, meta, args}`
    #[must_use]
    pub fn call(name: Self, meta: Self, args: Self) -> Self {
        Self::Tuple(vec![name, meta, args])
    }

    /// Keyword list from `(key, value)` pairs.
    #[must_use]
    pub fn keywords<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Self)>,
    {
        Self::List(
            pairs
                .into_iter()
                .map(|(key, value)| Self::pair(Self::atom(key), value))
                .collect(),
        )
    }

    #[must_use]
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(name) => Some(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_tuple(&self) -> Option<&[Self]> {
        match self {
            Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_atom(&self, name: &str) -> bool {
        self.as_atom() == Some(name)
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.is_atom("nil")
    }

    /// Non-empty list of `{atom, value}` pairs.
    #[must_use]
    pub fn is_keyword(&self) -> bool {
        match self {
            Self::List(items) => {
                !items.is_empty()
                    && items.iter().all(|item| {
                        matches!(item, Self::Tuple(pair) if pair.len() == 2 && pair[0].as_atom().is_some())
                    })
            }
            _ => false,
        }
    }

    /// Value stored under `key` in a keyword list.
    #[must_use]
    pub fn keyword_get(&self, key: &str) -> Option<&Self> {
        self.as_list()?.iter().find_map(|item| match item {
            Self::Tuple(pair) if pair.len() == 2 && pair[0].is_atom(key) => Some(&pair[1]),
            _ => None,
        })
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Self::binary(value)
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl From<Vec<Self>> for Term {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(name) => f.write_str(&inspect_atom(name)),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => f.write_str(&format_float(*value)),
            Self::Binary(value) => f.write_str(&inspect_binary(value)),
            Self::List(items) if self.is_keyword() => {
                f.write_char('[')?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    if let Self::Tuple(pair) = item {
                        let key = pair[0].as_atom().unwrap_or_default();
                        write!(f, "{} {}", inspect_key(key), pair[1])?;
                    }
                }
                f.write_char(']')
            }
            Self::List(items) => write_sequence(f, '[', items, ']'),
            Self::Tuple(items) => write_sequence(f, '{', items, '}'),
        }
    }
}

fn write_sequence(f: &mut fmt::Formatter<'_>, open: char, items: &[Term], close: char) -> fmt::Result {
    f.write_char(open)?;
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_char(close)
}

/// Atoms that print without quotes after `:` although they are not
/// identifiers.
const BARE_OPERATOR_ATOMS: &[&str] = &[
    "%", "%{}", "{}", "<<>>", "...", "..", ".", "->", "@", "&", "^", "!", "+", "-", "*", "/", "**",
    "++", "--", "<>", "=", "==", "!=", "===", "!==", "=~", "<", ">", "<=", ">=", "&&", "&&&", "||",
    "|||", "|>", "<<<", ">>>", "<<~", "~>>", "<~", "~>", "<~>", "<|>", "^^^", "~~~", "\\\\", "<-",
    "|", "::",
];

/// `[a-z_][a-zA-Z0-9_@]*[?!]?`
pub(crate) fn is_identifier_atom(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first == '_' || first.is_lowercase()) {
        return false;
    }
    let body = name.trim_end_matches(['?', '!']);
    let suffix_len = name.len() - body.len();
    suffix_len <= 1 && body.chars().all(|c| c == '_' || c == '@' || c.is_alphanumeric())
}

/// `[A-Z][a-zA-Z0-9_]*`
fn is_alias_segment(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
        && name.chars().all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Atom text written after `:` without quotes: an identifier or a
/// single alias segment such as `:Foo`. `:"Foo.Bar"` stays quoted.
fn is_plain_atom(name: &str) -> bool {
    is_identifier_atom(name) || is_alias_segment(name)
}

/// `Elixir.Foo.Bar` printed as `Foo.Bar`.
fn alias_name(name: &str) -> Option<&str> {
    let rest = name.strip_prefix("Elixir.")?;
    rest.split('.').all(is_alias_segment).then_some(rest)
}

pub(crate) fn inspect_atom(name: &str) -> String {
    if matches!(name, "nil" | "true" | "false") {
        return name.to_string();
    }
    if name == "Elixir" {
        return "Elixir".to_string();
    }
    if let Some(alias) = alias_name(name) {
        return alias.to_string();
    }
    if is_plain_atom(name) || BARE_OPERATOR_ATOMS.contains(&name) {
        return format!(":{name}");
    }
    format!(":{}", inspect_binary(name))
}

pub(crate) fn inspect_key(name: &str) -> String {
    if is_identifier_atom(name) || is_alias_segment(name) {
        format!("{name}:")
    } else {
        format!("{}:", inspect_binary(name))
    }
}

/// Characters `inspect` accepts in a printable binary, with their
/// escaped form where they need one.
fn escaped(ch: char) -> Option<&'static str> {
    Some(match ch {
        '"' => "\\\"",
        '\\' => "\\\\",
        '\n' => "\\n",
        '\r' => "\\r",
        '\t' => "\\t",
        '\u{b}' => "\\v",
        '\u{8}' => "\\b",
        '\u{c}' => "\\f",
        '\u{1b}' => "\\e",
        '\u{7}' => "\\a",
        '\u{7f}' => "\\d",
        _ => return None,
    })
}

pub(crate) fn inspect_binary(value: &str) -> String {
    let printable = value
        .chars()
        .all(|ch| escaped(ch).is_some() || !ch.is_control());
    if !printable {
        let bytes: Vec<String> = value.bytes().map(|b| b.to_string()).collect();
        return format!("<<{}>>", bytes.join(", "));
    }
    format!("\"{}\"", escape_text(value))
}

/// Body of a double-quoted literal for `value`, without the quotes.
pub(crate) fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match escaped(ch) {
            Some(escape) => out.push_str(escape),
            None if ch == '#' && chars.peek() == Some(&'{') => out.push_str("\\#"),
            None => out.push(ch),
        }
    }
    out
}

/// Shortest round-trip digits in Erlang's `float_to_list(F, [short])`
/// layout: plain decimal where that is no longer than the exponent
/// form, `d.ddde±N` otherwise.
#[must_use]
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let exponent: i64 = exponent.parse().unwrap_or(0);
    format!("{sign}{}", insert_decimal(exponent + 1, &digits))
}

/// `place` is the position of the decimal point relative to the start
/// of `digits`, so the value is `0.digits * 10^place`.
fn insert_decimal(place: i64, digits: &str) -> String {
    let len = i64::try_from(digits.len()).unwrap_or(i64::MAX);
    if place == 0 {
        return format!("0.{digits}");
    }
    if 0 < place && place < len {
        let (whole, fraction) = digits.split_at(usize::try_from(place).unwrap_or(0));
        return format!("{whole}.{fraction}");
    }
    let exponent = (place - 1).to_string();
    let dot_cost = if len == 1 { 2 } else { 1 };
    let exponent_cost = i64::try_from(exponent.len()).unwrap_or(i64::MAX) + 1 + dot_cost;
    if place < 0 {
        if 2 - place < exponent_cost {
            let zeros = "0".repeat(usize::try_from(-place).unwrap_or(0));
            return format!("0.{zeros}{digits}");
        }
    } else if place - len + 2 <= exponent_cost {
        let zeros = "0".repeat(usize::try_from(place - len).unwrap_or(0));
        return format!("{digits}{zeros}.0");
    }
    let (first, rest) = digits.split_at(1);
    if rest.is_empty() {
        format!("{first}.0e{exponent}")
    } else {
        format!("{first}.{rest}e{exponent}")
    }
}
