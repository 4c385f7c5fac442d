//! Small helpers over tree-sitter nodes shared by the extractor.

use tree_sitter::Node;

pub fn node_text<'s>(node: Node, src: &'s str) -> &'s str {
    node.utf8_text(src.as_bytes()).unwrap_or_default()
}

pub fn field_text<'s>(node: Node, field: &str, src: &'s str) -> Option<&'s str> {
    node.child_by_field_name(field).map(|n| node_text(n, src))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn trim_quotes(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

/// Whether `node` has a direct anonymous child token `token` (e.g. `readonly`, `?`).
pub fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token);
    found
}

/// Text of a `: T` annotation without the colon.
pub fn annotation_text(node: Node, src: &str) -> String {
    match node.named_child(0) {
        Some(inner) if node.kind().ends_with("annotation") => {
            collapse_whitespace(node_text(inner, src))
        }
        _ => collapse_whitespace(node_text(node, src).trim_start_matches(':')),
    }
}

/// `Base<T>` and `Base <T>` both reduce to `Base`.
pub fn strip_type_arguments(name: &str) -> &str {
    name.split('<').next().unwrap_or(name).trim()
}

/// JSDoc block (`/** ... */`) directly above `node`, with the comment markers removed.
pub fn leading_docs(node: Node, src: &str) -> Option<String> {
    let comment = node.prev_named_sibling()?;
    if comment.kind() != "comment" {
        return None;
    }
    if comment.end_position().row + 1 < node.start_position().row {
        return None;
    }
    clean_doc_comment(node_text(comment, src))
}

pub fn clean_doc_comment(raw: &str) -> Option<String> {
    let body = raw.strip_prefix("/**")?.strip_suffix("*/")?;

    let lines: Vec<&str> = body
        .lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end()
        })
        .collect();

    let start = lines.iter().position(|l| !l.is_empty())?;
    let end = lines.iter().rposition(|l| !l.is_empty())?;
    Some(lines[start..=end].join("\n"))
}

/// First error or missing node below `node` in document order, for diagnostics.
pub fn first_error(node: Node) -> Option<Node> {
    let mut pending = vec![node];
    while let Some(node) = pending.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node
            .children(&mut cursor)
            .filter(|child| child.has_error() || child.is_missing())
            .collect();
        pending.extend(children.into_iter().rev());
    }
    None
}

/// Look through `as const`, `satisfies T` and parentheses.
fn unwrap_expression(mut node: Node) -> Node {
    while matches!(
        node.kind(),
        "as_expression" | "satisfies_expression" | "parenthesized_expression"
    ) {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Whether the expression is a statically simple literal: strings, numbers,
/// booleans, `null`/`undefined`, and objects or arrays built only from those.
///
/// Nested objects and arrays are walked with an explicit stack, so arbitrarily
/// deep initializers cannot exhaust the thread's stack.
pub fn is_literal(node: Node) -> bool {
    let mut pending = vec![node];
    while let Some(node) = pending.pop() {
        let node = unwrap_expression(node);
        let literal = match node.kind() {
            "string" | "number" | "true" | "false" | "null" | "undefined" => true,
            "template_string" => {
                let mut cursor = node.walk();
                let has_substitution = node
                    .named_children(&mut cursor)
                    .any(|c| c.kind() == "template_substitution");
                !has_substitution
            }
            "unary_expression" => {
                node.child_by_field_name("argument")
                    .is_some_and(|arg| arg.kind() == "number")
                    && node
                        .child_by_field_name("operator")
                        .is_some_and(|op| matches!(op.kind(), "-" | "+"))
            }
            "object" => {
                let mut cursor = node.walk();
                let mut all_pairs = true;
                for child in node.named_children(&mut cursor) {
                    match (child.kind(), child.child_by_field_name("value")) {
                        ("comment", _) => {}
                        ("pair", Some(value)) => pending.push(value),
                        _ => {
                            all_pairs = false;
                            break;
                        }
                    }
                }
                all_pairs
            }
            "array" => {
                let mut cursor = node.walk();
                pending.extend(
                    node.named_children(&mut cursor)
                        .filter(|child| child.kind() != "comment"),
                );
                true
            }
            _ => false,
        };
        if !literal {
            return false;
        }
    }
    true
}

/// Textual value of a literal initializer, `None` for anything computed.
pub fn literal_value(node: Node, src: &str) -> Option<String> {
    if !is_literal(node) {
        return None;
    }
    Some(collapse_whitespace(node_text(unwrap_expression(node), src)))
}

/// Primitive type of a scalar literal initializer.
pub fn infer_literal_type(node: Node, src: &str) -> Option<&'static str> {
    let node = unwrap_expression(node);
    match node.kind() {
        "string" | "template_string" if is_literal(node) => Some("string"),
        "number" if node_text(node, src).ends_with('n') => Some("bigint"),
        "number" => Some("number"),
        "unary_expression" if is_literal(node) => Some("number"),
        "true" | "false" => Some("boolean"),
        "null" => Some("null"),
        _ => None,
    }
}
