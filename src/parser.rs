use tree_sitter::{Language, Node, Parser, Tree};

use crate::diagnostics::Position;
use crate::error::{LintError, LintResult};

fn go_language() -> Language {
    tree_sitter_go::LANGUAGE.into()
}

pub fn parse_source(source: &str) -> LintResult<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&go_language())
        .map_err(|e| LintError::Grammar(e.to_string()))?;

    parser.parse(source, None).ok_or(LintError::Parse)
}

/// Fail with the position of the first ERROR or MISSING node, if any.
///
/// Files that do not parse cleanly are not analyzed.
pub fn ensure_well_formed(tree: &Tree) -> LintResult<()> {
    let root = tree.root_node();
    if !root.has_error() {
        return Ok(());
    }

    let node = first_error(root).unwrap_or(root);
    let point = node.start_position();
    Err(LintError::Syntax {
        position: Position::new(point.row + 1, point.column + 1),
    })
}

fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }

        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node
            .children(&mut cursor)
            .filter(|c| c.has_error() || c.is_missing())
            .collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

/// Deepest nesting of syntax nodes accepted for analysis.
pub const MAX_NESTING_DEPTH: usize = 500;

/// Fail with the position of the first node nested deeper than `limit`.
///
/// Lowering recurses once per level, so overly deep files are refused up front.
pub fn ensure_nesting_within(tree: &Tree, limit: usize) -> LintResult<()> {
    let mut cursor = tree.walk();
    let mut depth = 0usize;

    loop {
        if depth > limit {
            let point = cursor.node().start_position();
            return Err(LintError::NestingTooDeep {
                position: Position::new(point.row + 1, point.column + 1),
                limit,
            });
        }

        if cursor.goto_first_child() {
            depth += 1;
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return Ok(());
            }
            depth -= 1;
        }
    }
}

pub(crate) fn slice<'a>(source: &'a str, node: Node) -> &'a str {
    // tree-sitter offsets are UTF-8 byte indices; fall back to an empty string
    // rather than panicking if they ever miss a char boundary.
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

/// Named children of `node`, without comments.
pub(crate) fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

pub(crate) fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

/// Whether `node` has a direct (possibly anonymous) child token of kind `token`.
pub(crate) fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|c| c.kind() == token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_go() {
        let src = "package main\n\nfunc main() {}\n";
        let tree = parse_source(src).expect("parse");
        assert!(ensure_well_formed(&tree).is_ok());
    }

    #[test]
    fn reports_position_of_first_syntax_error() {
        let src = "package main\n\nfunc main() {\n    x := \n}\n";
        let tree = parse_source(src).expect("parse");
        let err = ensure_well_formed(&tree).expect_err("syntax error expected");
        match err {
            LintError::Syntax { position } => assert!(position.row >= 3, "got {position}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reports_syntax_error_inside_deep_nesting() {
        let expr = vec!["(1"; 2000].join(" + ");
        let src = format!("package main\n\nvar x = {expr}\n");
        let tree = parse_source(&src).expect("parse");
        let err = ensure_well_formed(&tree).expect_err("unclosed parentheses");
        assert!(matches!(err, LintError::Syntax { .. }), "got {err:?}");
    }

    #[test]
    fn measures_nesting_depth() {
        let expr = vec!["1"; 50].join(" + ");
        let src = format!("package main\n\nvar x = {expr}\n");
        let tree = parse_source(&src).expect("parse");

        assert!(ensure_nesting_within(&tree, MAX_NESTING_DEPTH).is_ok());
        match ensure_nesting_within(&tree, 20) {
            Err(LintError::NestingTooDeep { position, limit }) => {
                assert_eq!(limit, 20);
                assert_eq!(position.row, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn named_children_skip_comments() {
        let src = "package main\n\nfunc f() {\n    g(a, /* note */ b)\n}\n";
        let tree = parse_source(src).expect("parse");

        let mut args = None;
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            if node.kind() == "argument_list" {
                args = Some(node);
                break;
            }
            stack.extend(named_children(node));
        }

        let args = args.expect("argument list");
        let names: Vec<&str> = named_children(args)
            .into_iter()
            .map(|n| slice(src, n))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
