use num_bigint::BigInt;

use crate::token::Span;

/// A parsed source file: its top-level expressions in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub expressions: Vec<Node>,
    pub span: Span,
}

/// Syntax node with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// Every syntactic form the parser produces.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Integer in any base.
    Integer(BigInt),
    Float(f64),
    /// `?a`, resolved to its codepoint.
    Char(u32),
    Boolean(bool),
    Nil,
    /// `:name`, `:+`, or the key of a `name: value` pair.
    Atom(String),
    /// `:"..."`, or the key of a `"...": value` pair.
    QuotedAtom(Text),
    /// String or charlist literal.
    Text(Text),
    Sigil(Sigil),
    /// Bare name without arguments, i.e. a variable.
    Identifier(String),
    /// `Foo.Bar`, or `base.Foo` when the first part is not an alias.
    Alias {
        base: Option<Box<Node>>,
        segments: Vec<String>,
    },
    Call(Call),
    /// Prefix operator: `-`, `+`, `!`, `^`, `not`, `~~~`, `&`, `@`.
    Unary {
        operator: String,
        operand: Box<Node>,
    },
    Binary {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
        operator_span: Span,
    },
    /// `subject[key]`
    Access {
        subject: Box<Node>,
        key: Box<Node>,
    },
    List(Vec<Node>),
    /// Run of `key: value` pairs, trailing a list, tuple, map, or
    /// argument list.
    Keywords(Vec<(Node, Node)>),
    Tuple(Vec<Node>),
    Map(Map),
    /// `%Name{...}`
    Struct {
        name: Box<Node>,
        map: Map,
    },
    /// `<<...>>`
    Bitstring(Vec<Node>),
    /// Parenthesized expressions: `()`, or `(a; b)`.
    Block(Vec<Node>),
    /// `fn ... end`
    Fn(Vec<Clause>),
    /// Placeholder for input that could not be parsed.
    Error(String),
}

/// Body of a map or struct literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    /// `base` in `%{base | key: value}`.
    pub update: Option<Box<Node>>,
    /// `=>` pairs and a trailing keyword run.
    pub entries: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    String,
    CharList,
}

/// Contents of a string, charlist, quoted atom, or sigil, exactly as
/// written. Escapes are decoded and heredoc indentation is stripped
/// only when the text is quoted.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub kind: TextKind,
    pub heredoc: bool,
    /// Width of the indentation before a heredoc terminator.
    pub indent: usize,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Fragment(String),
    /// Backslash escape, including the backslash.
    Escape(String),
    /// Leading whitespace of a heredoc line.
    LinePrefix(String),
    /// `#{...}`; the node is a [`NodeKind::Block`].
    Interpolation(Node),
}

impl Text {
    #[must_use]
    pub fn is_interpolated(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Interpolation(_)))
    }
}

/// `~name<delimiter>...<delimiter>modifiers`
#[derive(Debug, Clone, PartialEq)]
pub struct Sigil {
    pub name: String,
    pub text: Text,
    pub modifiers: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub target: CallTarget,
    pub arguments: Vec<Node>,
    /// Whether the arguments were written in parentheses.
    pub parentheses: bool,
    pub do_block: Option<DoBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallTarget {
    /// `name(...)` or `name arg`
    Local { name: String },
    /// `receiver.name(...)`
    Remote {
        receiver: Box<Node>,
        name: String,
        dot: Span,
        name_span: Span,
    },
    /// `function.(...)`
    Anonymous { function: Box<Node>, dot: Span },
}

/// `do ... end` with its `else`/`after`/`rescue`/`catch` sections.
#[derive(Debug, Clone, PartialEq)]
pub struct DoBlock {
    pub sections: Vec<Section>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// `do`, `else`, `after`, `rescue`, or `catch`.
    pub name: String,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Expressions(Vec<Node>),
    Clauses(Vec<Clause>),
}

impl Body {
    /// Append `node` to the last clause, or after the expressions.
    pub fn push(&mut self, node: Node) {
        match self {
            Self::Expressions(expressions) => expressions.push(node),
            Self::Clauses(clauses) => {
                if let Some(clause) = clauses.last_mut() {
                    clause.body.push(node);
                }
            }
        }
    }
}

/// `head when guard -> body`
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub head: Vec<Node>,
    pub guard: Option<Box<Node>>,
    pub body: Vec<Node>,
    /// Position of the `->`.
    pub arrow: Span,
}

impl Node {
    #[must_use]
    pub const fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    #[must_use]
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(NodeKind::Error(message.into()), span)
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, NodeKind::Error(_))
    }

    /// Whether this node or any node below it is an error node.
    #[must_use]
    pub fn contains_error(&self) -> bool {
        self.is_error() || self.children().into_iter().any(Self::contains_error)
    }

    /// Direct sub-nodes in source order.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        let mut children = Vec::new();
        match &self.kind {
            NodeKind::QuotedAtom(text) | NodeKind::Text(text) => text_children(text, &mut children),
            NodeKind::Sigil(sigil) => text_children(&sigil.text, &mut children),
            NodeKind::Alias {
                base: Some(base), ..
            } => children.push(base.as_ref()),
            NodeKind::Call(call) => {
                match &call.target {
                    CallTarget::Remote { receiver, .. } => children.push(receiver.as_ref()),
                    CallTarget::Anonymous { function, .. } => children.push(function.as_ref()),
                    CallTarget::Local { .. } => {}
                }
                children.extend(&call.arguments);
                for section in call.do_block.iter().flat_map(|block| &block.sections) {
                    body_children(&section.body, &mut children);
                }
            }
            NodeKind::Unary { operand, .. } => children.push(operand.as_ref()),
            NodeKind::Binary { left, right, .. } => {
                children.push(left.as_ref());
                children.push(right.as_ref());
            }
            NodeKind::Access { subject, key } => {
                children.push(subject.as_ref());
                children.push(key.as_ref());
            }
            NodeKind::List(items)
            | NodeKind::Tuple(items)
            | NodeKind::Bitstring(items)
            | NodeKind::Block(items) => children.extend(items),
            NodeKind::Keywords(pairs) => {
                for (key, value) in pairs {
                    children.push(key);
                    children.push(value);
                }
            }
            NodeKind::Map(map) => map_children(map, &mut children),
            NodeKind::Struct { name, map } => {
                children.push(name.as_ref());
                map_children(map, &mut children);
            }
            NodeKind::Fn(clauses) => {
                for clause in clauses {
                    clause_children(clause, &mut children);
                }
            }
            NodeKind::Integer(_)
            | NodeKind::Float(_)
            | NodeKind::Char(_)
            | NodeKind::Boolean(_)
            | NodeKind::Nil
            | NodeKind::Atom(_)
            | NodeKind::Identifier(_)
            | NodeKind::Alias { base: None, .. }
            | NodeKind::Error(_) => {}
        }
        children
    }

    /// Name of the function or operator this node calls.
    ///
    /// A bare identifier counts as a zero-arity call since it may be
    /// one. Anonymous calls have no name.
    #[must_use]
    pub fn function_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Call(call) => match &call.target {
                CallTarget::Local { name } | CallTarget::Remote { name, .. } => Some(name),
                CallTarget::Anonymous { .. } => None,
            },
            NodeKind::Identifier(name) => Some(name),
            NodeKind::Unary { operator, .. } | NodeKind::Binary { operator, .. } => {
                Some(operator)
            }
            _ => None,
        }
    }

    /// Module written in front of a remote call, as in `Enum` for
    /// `Enum.map(...)` or `erlang` for `:erlang.now()`.
    #[must_use]
    pub fn module_name(&self) -> Option<String> {
        let NodeKind::Call(Call {
            target: CallTarget::Remote { receiver, .. },
            ..
        }) = &self.kind
        else {
            return None;
        };
        match &receiver.kind {
            NodeKind::Alias {
                base: None,
                segments,
            } => Some(segments.join(".")),
            NodeKind::Atom(name) => Some(name.clone()),
            _ => None,
        }
    }

    /// Number of arguments as written, not counting a do block.
    #[must_use]
    pub fn primary_arity(&self) -> Option<usize> {
        match &self.kind {
            NodeKind::Call(call) => Some(call.arguments.len()),
            NodeKind::Identifier(_) => Some(0),
            NodeKind::Unary { .. } => Some(1),
            NodeKind::Binary { .. } => Some(2),
            _ => None,
        }
    }

    /// Arity the call resolves to: a do block adds a trailing keyword
    /// list argument.
    #[must_use]
    pub fn resolved_arity(&self) -> Option<usize> {
        let primary = self.primary_arity()?;
        match &self.kind {
            NodeKind::Call(Call {
                do_block: Some(_), ..
            }) => Some(primary + 1),
            _ => Some(primary),
        }
    }

    /// Whether the call has a `do` block or a trailing `do:` keyword.
    #[must_use]
    pub fn has_do_block_or_keyword(&self) -> bool {
        let NodeKind::Call(call) = &self.kind else {
            return false;
        };
        if call.do_block.is_some() {
            return true;
        }
        match call.arguments.last() {
            Some(Node {
                kind: NodeKind::Keywords(pairs),
                ..
            }) => pairs
                .iter()
                .any(|(key, _)| matches!(&key.kind, NodeKind::Atom(name) if name == "do")),
            _ => false,
        }
    }

    /// Whether this node calls `module.function/arity`.
    ///
    /// Local calls and operators are treated as calls into `Kernel`,
    /// which every module imports.
    #[must_use]
    pub fn is_calling(&self, module: &str, function: &str, arity: usize) -> bool {
        if self.function_name() != Some(function) || self.resolved_arity() != Some(arity) {
            return false;
        }
        match &self.kind {
            NodeKind::Call(Call {
                target: CallTarget::Remote { .. },
                ..
            }) => self.module_name().is_some_and(|name| name == module),
            NodeKind::Call(Call {
                target: CallTarget::Anonymous { .. },
                ..
            }) => false,
            _ => module == "Kernel",
        }
    }
}

fn text_children<'a>(text: &'a Text, children: &mut Vec<&'a Node>) {
    for segment in &text.segments {
        if let Segment::Interpolation(node) = segment {
            children.push(node);
        }
    }
}

fn map_children<'a>(map: &'a Map, children: &mut Vec<&'a Node>) {
    if let Some(update) = &map.update {
        children.push(update);
    }
    children.extend(&map.entries);
}

fn clause_children<'a>(clause: &'a Clause, children: &mut Vec<&'a Node>) {
    children.extend(&clause.head);
    if let Some(guard) = &clause.guard {
        children.push(guard);
    }
    children.extend(&clause.body);
}

fn body_children<'a>(body: &'a Body, children: &mut Vec<&'a Node>) {
    match body {
        Body::Expressions(nodes) => children.extend(nodes),
        Body::Clauses(clauses) => {
            for clause in clauses {
                clause_children(clause, children);
            }
        }
    }
}
