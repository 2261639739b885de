//! Utilities over quoted terms, after Elixir's `Macro` module, and a
//! printer that renders a quoted term back into source text.

use std::fmt::Write as _;

use crate::term::{
    Term, escape_text, format_float, inspect_atom, inspect_binary, inspect_key,
    is_identifier_atom,
};

const INDENT: &str = "  ";

/// Wrap expressions the way a body is quoted: one expression stands for
/// itself, anything else becomes a `__block__`.
#[must_use]
pub fn block(mut terms: Vec<Term>) -> Term {
    if terms.len() == 1 {
        return terms.remove(0);
    }
    Term::call(
        Term::atom("__block__"),
        Term::List(Vec::new()),
        Term::List(terms),
    )
}

/// `(name, meta, args)` of a call tuple.
fn as_call(term: &Term) -> Option<(&Term, &[Term], &Term)> {
    match term.as_tuple()? {
        [name, Term::List(meta), args] => Some((name, meta, args)),
        _ => None,
    }
}

/// `{:__aliases__, meta, segments}`
#[must_use]
pub fn is_aliases(term: &Term) -> bool {
    as_call(term)
        .is_some_and(|(name, _, args)| name.is_atom("__aliases__") && args.as_list().is_some())
}

/// `{name, meta, context}` with an atom context.
#[must_use]
pub fn is_variable(term: &Term) -> bool {
    matches!(as_call(term), Some((Term::Atom(_), _, Term::Atom(_))))
}

/// `{name, meta, args}` with an atom name and an argument list.
#[must_use]
pub fn is_local_call(term: &Term) -> bool {
    matches!(as_call(term), Some((Term::Atom(_), _, Term::List(_))))
}

/// Whether `term` is well-formed quoted code: literals, lists and pairs
/// of expressions, and calls whose arguments are expressions.
#[must_use]
pub fn is_expression(term: &Term) -> bool {
    match term {
        Term::Atom(_) | Term::Integer(_) | Term::Float(_) | Term::Binary(_) => true,
        Term::List(items) => items.iter().all(is_expression),
        Term::Tuple(items) => match items.as_slice() {
            [first, second] => is_expression(first) && is_expression(second),
            [name, Term::List(_), args] => {
                let name_ok = matches!(name, Term::Atom(_)) || is_expression(name);
                let args_ok = match args {
                    Term::Atom(_) => true,
                    Term::List(args) => args.iter().all(is_expression),
                    _ => false,
                };
                name_ok && args_ok
            }
            _ => false,
        },
    }
}

/// Value under `key` in the metadata of a call tuple.
#[must_use]
pub fn metadata<'a>(term: &'a Term, key: &str) -> Option<&'a Term> {
    let (_, meta, _) = as_call(term)?;
    meta.iter().find_map(|item| match item.as_tuple()? {
        [name, value] if name.is_atom(key) => Some(value),
        _ => None,
    })
}

/// Apply `f` to every node of `term`, parents before children.
///
/// Metadata is not visited, and neither are atom call names.
pub fn prewalk<F>(term: Term, f: &mut F) -> Term
where
    F: FnMut(Term) -> Term,
{
    match f(term) {
        Term::List(items) => Term::List(items.into_iter().map(|item| prewalk(item, f)).collect()),
        Term::Tuple(items) => match <[Term; 3]>::try_from(items) {
            Ok([name, meta @ Term::List(_), args]) => {
                let name = match name {
                    Term::Atom(_) => name,
                    other => prewalk(other, f),
                };
                Term::Tuple(vec![name, meta, prewalk(args, f)])
            }
            Ok(items) => Term::Tuple(items.into_iter().map(|item| prewalk(item, f)).collect()),
            Err(items) => Term::Tuple(items.into_iter().map(|item| prewalk(item, f)).collect()),
        },
        other => other,
    }
}

/// Render a quoted term as Elixir source.
#[must_use]
pub fn to_string(term: &Term) -> String {
    let mut out = String::new();
    format_term(&mut out, term);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Associativity {
    Left,
    Right,
}

fn binary_operator(name: &str) -> Option<(u8, Associativity)> {
    use Associativity::{Left, Right};
    Some(match name {
        "<-" | "\\\\" => (40, Left),
        "when" => (50, Right),
        "::" => (60, Right),
        "|" => (70, Right),
        "=>" => (80, Right),
        "=" => (100, Right),
        "||" | "|||" | "or" => (120, Left),
        "&&" | "&&&" | "and" => (130, Left),
        "==" | "!=" | "=~" | "===" | "!==" => (140, Left),
        "<" | ">" | "<=" | ">=" => (150, Left),
        "|>" | "<<<" | ">>>" | "<<~" | "~>>" | "<~" | "~>" | "<~>" | "<|>" => (160, Left),
        "in" => (170, Left),
        "^^^" => (180, Left),
        "++" | "--" | ".." | "<>" => (200, Right),
        "+" | "-" => (210, Left),
        "*" | "/" => (220, Left),
        "**" => (230, Left),
        _ => return None,
    })
}

fn is_unary_operator(name: &str) -> bool {
    matches!(name, "-" | "+" | "!" | "^" | "not" | "~~~")
}

/// Precedence of the operator `term` applies, if it is an operator
/// call.
fn operator_precedence(term: &Term) -> Option<u8> {
    let (Term::Atom(name), _, Term::List(args)) = as_call(term)? else {
        return None;
    };
    match args.as_slice() {
        [_, _] => binary_operator(name).map(|(precedence, _)| precedence),
        [_, _, _] if name == "..//" => Some(190),
        [inner] if name == "not" && not_in_operands(inner).is_some() => Some(170),
        _ => None,
    }
}

/// Operands of the `{:in, _, [l, r]}` inside `not (l in r)`.
fn not_in_operands(inner: &Term) -> Option<(&Term, &Term)> {
    match as_call(inner)? {
        (name, _, Term::List(args)) if name.is_atom("in") => match args.as_slice() {
            [left, right] => Some((left, right)),
            _ => None,
        },
        _ => None,
    }
}

fn format_term(out: &mut String, term: &Term) {
    match term {
        Term::Atom(name) => out.push_str(&inspect_atom(name)),
        Term::Integer(value) => {
            let _ = write!(out, "{value}");
        }
        Term::Float(value) => out.push_str(&format_float(*value)),
        Term::Binary(value) => out.push_str(&inspect_binary(value)),
        Term::List(items) => format_list(out, items),
        Term::Tuple(items) => match as_call(term) {
            Some((name, meta, args)) => format_call(out, name, meta, args),
            None => {
                out.push('{');
                format_sequence(out, items, &[]);
                out.push('}');
            }
        },
    }
}

/// Call arguments; a trailing keyword list loses its brackets.
fn format_arguments(out: &mut String, items: &[Term]) {
    let (positional, keywords) = match items.split_last() {
        Some((last, rest)) if last.is_keyword() => (rest, last.as_list().unwrap_or_default()),
        _ => (items, &[][..]),
    };
    format_sequence(out, positional, keywords);
}

/// List elements; a trailing run of atom-keyed pairs is written as
/// keywords.
fn format_list(out: &mut String, items: &[Term]) {
    let run = items
        .iter()
        .rev()
        .take_while(|item| matches!(item.as_tuple(), Some([Term::Atom(_), _])))
        .count();
    let (positional, keywords) = items.split_at(items.len() - run);
    out.push('[');
    format_sequence(out, positional, keywords);
    out.push(']');
}

fn format_sequence(out: &mut String, positional: &[Term], keywords: &[Term]) {
    for (index, item) in positional.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        format_term(out, item);
    }
    if !keywords.is_empty() {
        if !positional.is_empty() {
            out.push_str(", ");
        }
        format_keywords(out, keywords);
    }
}

fn format_keywords(out: &mut String, pairs: &[Term]) {
    for (index, pair) in pairs.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        if let Some([Term::Atom(key), value]) = pair.as_tuple() {
            out.push_str(&inspect_key(key));
            out.push(' ');
            format_term(out, value);
        }
    }
}

fn format_call(out: &mut String, name: &Term, meta: &[Term], args: &Term) {
    match (name, args) {
        (Term::Atom(name), Term::Atom(_)) => out.push_str(name),
        (Term::Atom(name), Term::List(args)) => format_named_call(out, name, args),
        (Term::Tuple(_), Term::List(args)) => format_dot_call(out, name, meta, args),
        _ => {
            out.push('{');
            format_term(out, name);
            out.push_str(", ");
            format_term(out, &Term::List(meta.to_vec()));
            out.push_str(", ");
            format_term(out, args);
            out.push('}');
        }
    }
}

fn format_named_call(out: &mut String, name: &str, args: &[Term]) {
    match (name, args) {
        ("__block__", expressions) => format_lines(out, expressions),
        ("__aliases__", segments) => {
            for (index, segment) in segments.iter().enumerate() {
                if index > 0 {
                    out.push('.');
                }
                match segment {
                    Term::Atom(name) => out.push_str(name),
                    other => format_term(out, other),
                }
            }
        }
        ("{}", elements) => {
            out.push('{');
            format_sequence(out, elements, &[]);
            out.push('}');
        }
        ("%{}", entries) => {
            out.push('%');
            format_map_body(out, entries);
        }
        ("%", [struct_name, map]) => {
            out.push('%');
            format_term(out, struct_name);
            match as_call(map) {
                Some((_, _, Term::List(entries))) => format_map_body(out, entries),
                _ => format_term(out, map),
            }
        }
        ("<<>>", parts) => format_bitstring(out, parts),
        ("..", []) => out.push_str(".."),
        ("..//", [first, last, step]) => {
            format_binary(out, "..", (200, Associativity::Right), first, last);
            out.push_str("//");
            format_operand(out, step, 190, true);
        }
        ("fn", clauses) => format_fn(out, clauses),
        ("->", [Term::List(head), body]) => format_arrow(out, head, body),
        ("@", [attribute]) => {
            out.push('@');
            match as_call(attribute) {
                Some((Term::Atom(name), _, Term::List(arguments))) if !arguments.is_empty() => {
                    out.push_str(name);
                    out.push(' ');
                    format_arguments(out, arguments);
                }
                _ => format_term(out, attribute),
            }
        }
        ("&", [Term::Integer(index)]) => {
            let _ = write!(out, "&{index}");
        }
        ("&", [captured]) => format_capture(out, captured),
        ("not", [inner]) if not_in_operands(inner).is_some() => {
            if let Some((left, right)) = not_in_operands(inner) {
                format_binary(out, "not in", (170, Associativity::Left), left, right);
            }
        }
        (operator, [operand]) if is_unary_operator(operator) => {
            out.push_str(operator);
            if operator == "not" {
                out.push(' ');
            }
            let mut text = String::new();
            format_operand(&mut text, operand, u8::MAX, true);
            // `-(-1)`, not `--1`
            if operator != "!" && operator != "not" && text.starts_with(operator) {
                out.push('(');
                out.push_str(&text);
                out.push(')');
            } else {
                out.push_str(&text);
            }
        }
        (operator, [left, right]) if binary_operator(operator).is_some() => {
            if let Some(binding) = binary_operator(operator) {
                format_binary(out, operator, binding, left, right);
            }
        }
        (sigil, [Term::Tuple(_), Term::List(modifiers)]) if sigil.starts_with("sigil_") => {
            format_sigil(out, sigil, &args[0], modifiers);
        }
        (function, arguments) => {
            let callee = if is_identifier_atom(function) {
                function.to_string()
            } else {
                inspect_binary(function)
            };
            format_invocation(out, &callee, arguments, false);
        }
    }
}

/// `callee(args)`, or `callee args do ... end` when the last argument
/// is a do-block keyword list.
fn format_invocation(out: &mut String, callee: &str, args: &[Term], no_parens: bool) {
    out.push_str(callee);
    if let Some((last, rest)) = args.split_last() {
        if let Some(sections) = do_sections(last) {
            if !rest.is_empty() {
                out.push(' ');
                format_arguments(out, rest);
            }
            format_do_block(out, &sections);
            return;
        }
    }
    if no_parens && args.is_empty() {
        return;
    }
    out.push('(');
    format_arguments(out, args);
    out.push(')');
}

/// Sections of a `[do: ..., else: ...]` argument.
fn do_sections(term: &Term) -> Option<Vec<(&str, &Term)>> {
    let pairs = term.as_list()?;
    let sections: Vec<(&str, &Term)> = pairs
        .iter()
        .map(|pair| match pair.as_tuple()? {
            [Term::Atom(key), value] => Some((key.as_str(), value)),
            _ => None,
        })
        .collect::<Option<_>>()?;
    matches!(sections.first(), Some(("do", _))).then_some(sections)
}

fn format_do_block(out: &mut String, sections: &[(&str, &Term)]) {
    for (index, (name, body)) in sections.iter().enumerate() {
        if index == 0 {
            out.push_str(" do");
        } else {
            out.push('\n');
            out.push_str(name);
        }
        let body = body_text(body);
        if !body.is_empty() {
            out.push('\n');
            out.push_str(&indent(&body));
        }
    }
    out.push_str("\nend");
}

/// Body of a do-block section or clause: clauses, or expressions one
/// per line.
fn body_text(body: &Term) -> String {
    let mut out = String::new();
    match body.as_list() {
        Some(clauses) if !clauses.is_empty() && clauses.iter().all(is_clause) => {
            for (index, clause) in clauses.iter().enumerate() {
                if index > 0 {
                    out.push('\n');
                }
                format_clause(&mut out, clause);
            }
        }
        _ => format_term(&mut out, body),
    }
    out
}

fn is_clause(term: &Term) -> bool {
    as_call(term).is_some_and(|(name, _, _)| name.is_atom("->"))
}

fn format_lines(out: &mut String, expressions: &[Term]) {
    for (index, expression) in expressions.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        format_term(out, expression);
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{INDENT}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_fn(out: &mut String, clauses: &[Term]) {
    if let [clause] = clauses {
        let mut text = String::new();
        format_clause(&mut text, clause);
        if !text.contains('\n') {
            let _ = write!(out, "fn {text} end");
            return;
        }
    }
    out.push_str("fn\n");
    let mut body = String::new();
    format_lines(&mut body, clauses);
    out.push_str(&indent(&body));
    out.push_str("\nend");
}

fn format_clause(out: &mut String, clause: &Term) {
    match as_call(clause) {
        Some((_, _, Term::List(parts))) => match parts.as_slice() {
            [Term::List(head), body] => format_arrow(out, head, body),
            _ => format_term(out, clause),
        },
        _ => format_term(out, clause),
    }
}

/// `head -> body`, with a guard written as `head when guard`.
fn format_arrow(out: &mut String, head: &[Term], body: &Term) {
    format_head(out, head);
    out.push_str(if head.is_empty() { "->" } else { " ->" });
    let body = body_text(body);
    if body.contains('\n') {
        out.push('\n');
        out.push_str(&indent(&body));
    } else {
        out.push(' ');
        out.push_str(&body);
    }
}

fn format_head(out: &mut String, head: &[Term]) {
    if let [guarded] = head {
        if let Some((name, _, Term::List(parts))) = as_call(guarded) {
            if name.is_atom("when") && parts.len() >= 2 {
                if let Some((guard, patterns)) = parts.split_last() {
                    format_arguments(out, patterns);
                    out.push_str(" when ");
                    format_term(out, guard);
                    return;
                }
            }
        }
    }
    format_arguments(out, head);
}

/// `{...}` of a map or struct, including the `base | ...` update form.
fn format_map_body(out: &mut String, entries: &[Term]) {
    out.push('{');
    if let [update] = entries {
        if let Some((name, _, Term::List(parts))) = as_call(update) {
            if let (true, [base, Term::List(pairs)]) = (name.is_atom("|"), parts.as_slice()) {
                format_term(out, base);
                out.push_str(" | ");
                format_pairs(out, pairs);
                out.push('}');
                return;
            }
        }
    }
    format_pairs(out, entries);
    out.push('}');
}

fn format_pairs(out: &mut String, pairs: &[Term]) {
    if Term::List(pairs.to_vec()).is_keyword() {
        format_keywords(out, pairs);
        return;
    }
    for (index, pair) in pairs.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        match pair.as_tuple() {
            Some([key, value]) => {
                format_term(out, key);
                out.push_str(" => ");
                format_term(out, value);
            }
            _ => format_term(out, pair),
        }
    }
}

/// Expression inside `#{...}` when `part` is the
/// `Kernel.to_string(expr) :: binary` form interpolation quotes to.
fn interpolated(part: &Term) -> Option<&Term> {
    let (name, _, Term::List(args)) = as_call(part)? else {
        return None;
    };
    if !name.is_atom("::") {
        return None;
    }
    let [conversion, kind] = args.as_slice() else {
        return None;
    };
    if !as_call(kind).is_some_and(|(name, _, _)| name.is_atom("binary")) {
        return None;
    }
    let (dot, _, Term::List(converted)) = as_call(conversion)? else {
        return None;
    };
    let (_, _, Term::List(target)) = as_call(dot)? else {
        return None;
    };
    match (target.as_slice(), converted.as_slice()) {
        ([module, function], [expression])
            if module.is_atom("Elixir.Kernel") && function.is_atom("to_string") =>
        {
            Some(expression)
        }
        _ => None,
    }
}

fn format_bitstring(out: &mut String, parts: &[Term]) {
    let is_string = parts
        .iter()
        .all(|part| matches!(part, Term::Binary(_)) || interpolated(part).is_some());
    if is_string && !parts.is_empty() {
        out.push('"');
        for part in parts {
            match part {
                Term::Binary(text) => out.push_str(&escape_text(text)),
                other => {
                    if let Some(expression) = interpolated(other) {
                        out.push_str("#{");
                        format_term(out, expression);
                        out.push('}');
                    }
                }
            }
        }
        out.push('"');
        return;
    }
    out.push_str("<<");
    for (index, part) in parts.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        format_segment(out, part);
    }
    out.push_str(">>");
}

/// `value::type-size(n)`: bitstring segments take their modifiers
/// without spaces.
fn format_segment(out: &mut String, part: &Term) {
    if let Some((name, _, Term::List(args))) = as_call(part) {
        if let (true, [value, modifiers]) = (name.is_atom("::"), args.as_slice()) {
            format_operand(out, value, 60, true);
            out.push_str("::");
            format_modifiers(out, modifiers);
            return;
        }
    }
    format_term(out, part);
}

fn format_modifiers(out: &mut String, modifiers: &Term) {
    if let Some((name, _, Term::List(args))) = as_call(modifiers) {
        if let (true, [left, right]) = (name.is_atom("-"), args.as_slice()) {
            format_modifiers(out, left);
            out.push('-');
            format_modifiers(out, right);
            return;
        }
    }
    format_term(out, modifiers);
}

fn format_sigil(out: &mut String, name: &str, contents: &Term, modifiers: &[Term]) {
    out.push('~');
    out.push_str(name.trim_start_matches("sigil_"));
    out.push('"');
    if let Some((_, _, Term::List(parts))) = as_call(contents) {
        for part in parts {
            match part {
                Term::Binary(text) => out.push_str(&text.replace('"', "\\\"")),
                other => {
                    out.push_str("#{");
                    format_term(out, interpolated(other).unwrap_or(other));
                    out.push('}');
                }
            }
        }
    }
    out.push('"');
    for modifier in modifiers {
        if let Term::Integer(codepoint) = modifier {
            if let Some(ch) = u32::try_from(codepoint).ok().and_then(char::from_u32) {
                out.push(ch);
            }
        }
    }
}

/// `&name/arity`, `&Mod.name/arity`, or `&(expression)`.
fn format_capture(out: &mut String, captured: &Term) {
    out.push('&');
    if let Some((name, _, Term::List(args))) = as_call(captured) {
        if let (true, [function, Term::Integer(arity)]) = (name.is_atom("/"), args.as_slice()) {
            format_term(out, function);
            let _ = write!(out, "/{arity}");
            return;
        }
    }
    out.push('(');
    format_term(out, captured);
    out.push(')');
}

fn format_binary(
    out: &mut String,
    operator: &str,
    (precedence, associativity): (u8, Associativity),
    left: &Term,
    right: &Term,
) {
    format_operand(
        out,
        left,
        precedence,
        associativity == Associativity::Right,
    );
    if operator == ".." {
        out.push_str(operator);
    } else {
        out.push(' ');
        out.push_str(operator);
        out.push(' ');
    }
    format_operand(
        out,
        right,
        precedence,
        associativity == Associativity::Left,
    );
}

/// Write `operand`, parenthesized when it binds looser than `parent`,
/// or equally loose and `strict` is set.
fn format_operand(out: &mut String, operand: &Term, parent: u8, strict: bool) {
    let wrap = operator_precedence(operand)
        .is_some_and(|precedence| precedence < parent || (precedence == parent && strict));
    if wrap {
        out.push('(');
    }
    format_term(out, operand);
    if wrap {
        out.push(')');
    }
}

fn format_dot_call(out: &mut String, dot: &Term, meta: &[Term], args: &[Term]) {
    let Some((name, _, Term::List(target))) = as_call(dot) else {
        format_term(out, dot);
        return;
    };
    if !name.is_atom(".") {
        out.push('(');
        format_term(out, dot);
        out.push(')');
        out.push('(');
        format_arguments(out, args);
        out.push(')');
        return;
    }
    match target.as_slice() {
        [receiver, function] if function.is_atom("{}") => {
            format_operand(out, receiver, u8::MAX, true);
            out.push_str(".{");
            format_sequence(out, args, &[]);
            out.push('}');
        }
        [module, function]
            if module.is_atom("Elixir.Access") && function.is_atom("get") && args.len() == 2 =>
        {
            format_operand(out, &args[0], u8::MAX, true);
            out.push('[');
            format_term(out, &args[1]);
            out.push(']');
        }
        [receiver, Term::Atom(function)] => {
            let mut callee = String::new();
            format_operand(&mut callee, receiver, u8::MAX, true);
            callee.push('.');
            if is_identifier_atom(function) || binary_operator(function).is_some() {
                callee.push_str(function);
            } else {
                callee.push_str(&inspect_binary(function));
            }
            let no_parens = meta.iter().any(|item| {
                matches!(item.as_tuple(), Some([key, value]) if key.is_atom("no_parens") && value.is_atom("true"))
            });
            format_invocation(out, &callee, args, no_parens);
        }
        [function] => {
            let mut callee = String::new();
            format_operand(&mut callee, function, u8::MAX, true);
            callee.push('.');
            format_invocation(out, &callee, args, false);
        }
        _ => {
            format_term(out, dot);
            out.push('(');
            format_arguments(out, args);
            out.push(')');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(name: &str) -> Term {
        Term::call(Term::atom(name), Term::List(Vec::new()), Term::nil())
    }

    fn op(name: &str, args: Vec<Term>) -> Term {
        Term::call(Term::atom(name), Term::List(Vec::new()), Term::List(args))
    }

    #[test]
    fn predicates() {
        let alias = op("__aliases__", vec![Term::atom("Foo")]);
        assert!(is_aliases(&alias));
        assert!(is_variable(&variable("x")));
        assert!(!is_variable(&alias));
        assert!(is_local_call(&op("foo", Vec::new())));
        assert!(is_expression(&op("foo", vec![variable("x"), Term::integer(1)])));
        assert!(!is_expression(&Term::Tuple(vec![Term::integer(1); 4])));
    }

    #[test]
    fn metadata_lookup() {
        let term = Term::call(
            Term::atom("foo"),
            Term::keywords([("line", Term::integer(3))]),
            Term::List(Vec::new()),
        );
        assert_eq!(metadata(&term, "line"), Some(&Term::integer(3)));
        assert_eq!(metadata(&term, "column"), None);
    }

    #[test]
    fn prewalk_rewrites_variables() {
        let term = op("+", vec![variable("a"), variable("b")]);
        let renamed = prewalk(term, &mut |node| {
            if is_variable(&node) {
                variable("z")
            } else {
                node
            }
        });
        assert_eq!(to_string(&renamed), "z + z");
    }

    #[test]
    fn block_of_one_is_the_expression() {
        assert_eq!(block(vec![Term::integer(1)]), Term::integer(1));
        assert_eq!(to_string(&block(vec![variable("a"), variable("b")])), "a\nb");
    }

    #[test]
    fn operator_parentheses() {
        let sum = op("+", vec![Term::integer(1), Term::integer(2)]);
        let product = op("*", vec![sum.clone(), Term::integer(3)]);
        assert_eq!(to_string(&product), "(1 + 2) * 3");
        let nested = op("-", vec![variable("a"), op("-", vec![variable("b"), variable("c")])]);
        assert_eq!(to_string(&nested), "a - (b - c)");
        assert_eq!(to_string(&op("-", vec![sum])), "-(1 + 2)");
    }

    #[test]
    fn nested_signs_stay_apart() {
        assert_eq!(to_string(&op("-", vec![Term::integer(-1)])), "-(-1)");
        let negated = op("-", vec![variable("a")]);
        assert_eq!(to_string(&op("-", vec![negated.clone()])), "-(-a)");
        assert_eq!(to_string(&op("+", vec![negated])), "+-a");
        assert_eq!(to_string(&op("!", vec![op("!", vec![variable("a")])])), "!!a");
    }
}
