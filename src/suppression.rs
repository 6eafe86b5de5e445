//! Helpers for honoring golangci-lint style `//nolint` directives in Go source.
//!
//! Directives are read from comment nodes of the parsed file, never from string
//! literals. A trailing `//nolint` silences the statement that starts on its line; a
//! `//nolint` comment on a line by itself silences the statement below. In both
//! cases every row of that statement is covered. `//nolint:a,b` limits a directive
//! to the named lints, `//nolint` and `//nolint:all` cover every lint.

use regex::Regex;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::OnceLock;
use tree_sitter::{Node, Tree};

use crate::parser::slice;

fn nolint_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^//nolint(?::([\w-]+(?:,[\w-]+)*))?(?:\s|$)").expect("nolint pattern is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Coverage {
    All,
    Lints(Vec<String>),
}

impl Coverage {
    fn parse(comment: &str) -> Option<Self> {
        let caps = nolint_regex().captures(comment)?;
        Some(match caps.get(1) {
            Some(list) => {
                let lints: Vec<String> = list.as_str().split(',').map(str::to_string).collect();
                if lints.iter().any(|l| l == "all") {
                    Coverage::All
                } else {
                    Coverage::Lints(lints)
                }
            }
            None => Coverage::All,
        })
    }

    fn covers(&self, lint_name: &str) -> bool {
        match self {
            Coverage::All => true,
            Coverage::Lints(lints) => lints.iter().any(|l| l == lint_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Directive {
    /// 1-based rows silenced by the directive.
    rows: RangeInclusive<usize>,
    coverage: Coverage,
}

/// `//nolint` directives of one file.
#[derive(Debug, Clone, Default)]
pub struct NolintDirectives {
    directives: Vec<Directive>,
}

impl NolintDirectives {
    pub fn from_tree(tree: &Tree, source: &str) -> Self {
        // Last row reached by any node starting on a given row (both 0-based).
        let mut extent: HashMap<usize, usize> = HashMap::new();
        let mut comments: Vec<Node<'_>> = Vec::new();

        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            if node.kind() == "comment" {
                comments.push(node);
                continue;
            }
            if node.is_named() && node.kind() != "source_file" {
                let end = extent.entry(node.start_position().row).or_default();
                *end = (*end).max(node.end_position().row);
            }

            let mut cursor = node.walk();
            stack.extend(node.children(&mut cursor));
        }

        let mut directives: Vec<Directive> = comments
            .into_iter()
            .filter_map(|comment| {
                let coverage = Coverage::parse(slice(source, comment))?;
                let row = comment.start_position().row;
                let target = if starts_line(source, comment) { row + 1 } else { row };
                let last = extent.get(&target).copied().unwrap_or(target).max(target);
                Some(Directive {
                    rows: target + 1..=last + 1,
                    coverage,
                })
            })
            .collect();
        directives.sort_by_key(|d| *d.rows.start());

        Self { directives }
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Whether reports of `lint_name` on the 1-based `row` are silenced.
    pub fn is_suppressed(&self, row: usize, lint_name: &str) -> bool {
        self.directives
            .iter()
            .any(|d| d.rows.contains(&row) && d.coverage.covers(lint_name))
    }
}

/// Whether only whitespace precedes `node` on its line.
fn starts_line(source: &str, node: Node<'_>) -> bool {
    let start = node.start_byte();
    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    source[line_start..start].trim().is_empty()
}
