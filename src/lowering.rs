//! Lowering of tree-sitter-go trees into the [`syntax`](crate::syntax) model.
//!
//! Besides converting node shapes, lowering plays the part of Go's object
//! resolution: each identifier is linked to the statement that declared it, and
//! `pkg.Name` selectors on imported packages are recorded as symbols.

use std::collections::HashMap;

use tree_sitter::{Node, Tree};

use crate::diagnostics::Span;
use crate::error::LintResult;
use crate::parser::{
    MAX_NESTING_DEPTH, ensure_nesting_within, ensure_well_formed, field_children, has_token,
    named_children, parse_source, slice,
};
use crate::suppression::NolintDirectives;
use crate::syntax::{
    NodeId, NodeKind, Symbol, SymbolTable, SyntaxTree, SyntaxTreeBuilder, UnaryOp, package_name,
};

/// One lowered Go source file.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    package: Option<String>,
    tree: SyntaxTree,
    symbols: SymbolTable,
    nolint: NolintDirectives,
}

impl CompilationUnit {
    /// Parse, reject files with syntax errors or excessive nesting, and lower.
    pub fn from_source(source: &str) -> LintResult<Self> {
        let tree = parse_source(source)?;
        ensure_well_formed(&tree)?;
        ensure_nesting_within(&tree, MAX_NESTING_DEPTH)?;
        Ok(lower(&tree, source))
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn nolint(&self) -> &NolintDirectives {
        &self.nolint
    }

    /// Name from the `package` clause.
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }
}

pub fn lower(tree: &Tree, source: &str) -> CompilationUnit {
    let root = tree.root_node();
    let mut lowerer = Lowerer::new(source);

    // Universe is implicit; package scope, then the file scope holding imports.
    lowerer.push_scope();
    lowerer.declare_package_level(root);
    lowerer.push_scope();
    lowerer.declare_imports(root);

    let root_id = lowerer.lower(root);
    let package = named_children(root)
        .into_iter()
        .find(|n| n.kind() == "package_clause")
        .and_then(|clause| named_children(clause).into_iter().next())
        .map(|name| slice(source, name).to_string());

    CompilationUnit {
        package,
        tree: lowerer.builder.finish(root_id),
        symbols: lowerer.symbols,
        nolint: NolintDirectives::from_tree(tree, source),
    }
}

#[derive(Debug, Clone)]
enum Binding {
    Decl(NodeId),
    Import(String),
}

#[derive(Debug, Default)]
struct Scope {
    bindings: HashMap<String, Binding>,
}

struct Lowerer<'src> {
    source: &'src str,
    builder: SyntaxTreeBuilder,
    symbols: SymbolTable,
    scopes: Vec<Scope>,
    /// Package-level declarations, reserved before lowering so that they are
    /// visible throughout the file. Keyed by tree-sitter node id.
    reserved: HashMap<usize, NodeId>,
}

impl<'src> Lowerer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            builder: SyntaxTreeBuilder::new(),
            symbols: SymbolTable::new(),
            scopes: Vec::new(),
            reserved: HashMap::new(),
        }
    }

    fn text(&self, node: Node<'_>) -> &'src str {
        slice(self.source, node)
    }

    fn ident(&mut self, node: Node<'_>, decl: Option<NodeId>) -> NodeId {
        let name = self.text(node);
        self.builder.ident(name, decl, span(node))
    }

    fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &str, binding: Binding) {
        if name == "_" {
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name.to_string(), binding);
        }
    }

    fn lookup(&self, name: &str) -> Option<&Binding> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(name))
    }

    fn declared_in_current_scope(&self, name: &str) -> Option<NodeId> {
        match self.scopes.last()?.bindings.get(name)? {
            Binding::Decl(id) => Some(*id),
            Binding::Import(_) => None,
        }
    }

    /// Model node for a declaration: the reserved one for package-level
    /// declarations, a fresh placeholder otherwise.
    fn slot(&mut self, node: Node<'_>) -> (NodeId, bool) {
        match self.reserved.remove(&node.id()) {
            Some(id) => (id, true),
            None => (self.builder.reserve(span(node)), false),
        }
    }

    fn reserve_package_level(&mut self, node: Node<'_>) -> NodeId {
        let id = self.builder.reserve(span(node));
        self.reserved.insert(node.id(), id);
        id
    }

    fn declare_package_level(&mut self, root: Node<'_>) {
        for decl in named_children(root) {
            match decl.kind() {
                "function_declaration" => {
                    let id = self.reserve_package_level(decl);
                    if let Some(name) = decl.child_by_field_name("name") {
                        let name = self.text(name);
                        self.declare(name, Binding::Decl(id));
                    }
                }
                "var_declaration" | "const_declaration" | "type_declaration" => {
                    for spec in specs(decl) {
                        let id = self.reserve_package_level(spec);
                        for name in field_children(spec, "name") {
                            let name = self.text(name);
                            self.declare(name, Binding::Decl(id));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn declare_imports(&mut self, root: Node<'_>) {
        for decl in named_children(root) {
            if decl.kind() != "import_declaration" {
                continue;
            }
            for spec in specs(decl) {
                let Some(path) = spec.child_by_field_name("path") else {
                    continue;
                };
                let path = self
                    .text(path)
                    .trim_matches(|c| c == '"' || c == '`')
                    .to_string();

                let name = match spec.child_by_field_name("name") {
                    // Dot and blank imports bind no name.
                    Some(alias) if matches!(self.text(alias), "." | "_") => continue,
                    Some(alias) => self.text(alias),
                    None => package_name(&path),
                };
                let name = name.to_string();
                self.declare(&name, Binding::Import(path));
            }
        }
    }

    fn lower(&mut self, node: Node<'_>) -> NodeId {
        match node.kind() {
            "identifier" => self.lower_reference(node),
            "field_identifier" | "package_identifier" | "type_identifier" | "label_name"
            | "blank_identifier" => self.ident(node, None),
            "call_expression" => self.lower_call(node),
            "selector_expression" => self.lower_selector(node),
            "unary_expression" => self.lower_unary(node),
            "short_var_declaration" => self.lower_assignment(node, true),
            "assignment_statement" => self.lower_assignment(node, false),
            "range_clause" => self.lower_range(node),
            "receive_statement" => self.lower_receive(node),
            "var_spec" | "const_spec" => self.lower_value_spec(node),
            "type_spec" | "type_alias" => self.lower_type_spec(node),
            "function_declaration" | "method_declaration" | "func_literal" => {
                self.lower_function(node)
            }
            "type_switch_statement" => self.lower_type_switch(node),
            "block" | "if_statement" | "for_statement" | "expression_switch_statement"
            | "select_statement" | "expression_case" | "type_case" | "default_case"
            | "communication_case" => {
                self.push_scope();
                let id = self.lower_other(node);
                self.pop_scope();
                id
            }
            _ => self.lower_other(node),
        }
    }

    fn lower_other(&mut self, node: Node<'_>) -> NodeId {
        let children = named_children(node)
            .into_iter()
            .map(|child| self.lower(child))
            .collect();
        self.builder.other(children, span(node))
    }

    fn lower_reference(&mut self, node: Node<'_>) -> NodeId {
        let name = self.text(node);
        let decl = match self.lookup(name) {
            Some(Binding::Decl(id)) => Some(*id),
            Some(Binding::Import(_)) | None => None,
        };
        self.builder.ident(name, decl, span(node))
    }

    fn lower_call(&mut self, node: Node<'_>) -> NodeId {
        let Some(function) = node.child_by_field_name("function") else {
            return self.lower_other(node);
        };
        let callee = self.lower(function);
        let args = node
            .child_by_field_name("arguments")
            .map(|list| {
                named_children(list)
                    .into_iter()
                    .map(|arg| self.lower(arg))
                    .collect()
            })
            .unwrap_or_default();

        self.builder
            .push(NodeKind::CallExpression { callee, args }, span(node))
    }

    fn lower_selector(&mut self, node: Node<'_>) -> NodeId {
        let (Some(operand), Some(field)) = (
            node.child_by_field_name("operand"),
            node.child_by_field_name("field"),
        ) else {
            return self.lower_other(node);
        };

        let package_path = match self.lookup(self.text(operand)) {
            Some(Binding::Import(path)) if operand.kind() == "identifier" => Some(path.clone()),
            _ => None,
        };

        let object = self.lower(operand);
        let selected = self.text(field);
        let name = self.builder.ident(selected, None, span(field));
        if let Some(package_path) = package_path {
            self.symbols.insert(
                name,
                Symbol {
                    package_path,
                    name: selected.to_string(),
                },
            );
        }

        self.builder
            .push(NodeKind::SelectorExpression { object, name }, span(node))
    }

    fn lower_unary(&mut self, node: Node<'_>) -> NodeId {
        let op = node
            .child_by_field_name("operator")
            .and_then(|op| UnaryOp::from_operator(self.text(op)));
        let (Some(op), Some(operand)) = (op, node.child_by_field_name("operand")) else {
            return self.lower_other(node);
        };

        let operand = self.lower(operand);
        self.builder
            .push(NodeKind::UnaryExpression { op, operand }, span(node))
    }

    fn lower_assignment(&mut self, node: Node<'_>, define: bool) -> NodeId {
        let id = self.builder.reserve(span(node));
        // Right-hand sides are resolved before `:=` brings new names into scope.
        let rhs = node
            .child_by_field_name("right")
            .map(|right| self.lower_expressions(right))
            .unwrap_or_default();
        let lhs = node
            .child_by_field_name("left")
            .map(|left| self.lower_targets(left, define.then_some(id)))
            .unwrap_or_default();

        self.builder
            .fill(id, NodeKind::AssignmentStatement { lhs, rhs, define });
        id
    }

    /// `for k, v := range x` becomes `k, v := range x`, with `range x` a unary expression.
    fn lower_range(&mut self, node: Node<'_>) -> NodeId {
        let id = self.builder.reserve(span(node));
        let define = has_token(node, ":=");

        let rhs = match node.child_by_field_name("right") {
            Some(right) => {
                let operand = self.lower(right);
                vec![self.builder.push(
                    NodeKind::UnaryExpression {
                        op: UnaryOp::Range,
                        operand,
                    },
                    span(node),
                )]
            }
            None => Vec::new(),
        };
        let lhs = node
            .child_by_field_name("left")
            .map(|left| self.lower_targets(left, define.then_some(id)))
            .unwrap_or_default();

        self.builder
            .fill(id, NodeKind::AssignmentStatement { lhs, rhs, define });
        id
    }

    /// `case v, ok := <-ch:`
    fn lower_receive(&mut self, node: Node<'_>) -> NodeId {
        let (Some(left), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) else {
            return self.lower_other(node);
        };

        let id = self.builder.reserve(span(node));
        let define = has_token(node, ":=");
        let rhs = vec![self.lower(right)];
        let lhs = self.lower_targets(left, define.then_some(id));

        self.builder
            .fill(id, NodeKind::AssignmentStatement { lhs, rhs, define });
        id
    }

    fn lower_expressions(&mut self, node: Node<'_>) -> Vec<NodeId> {
        if node.kind() == "expression_list" {
            named_children(node)
                .into_iter()
                .map(|expr| self.lower(expr))
                .collect()
        } else {
            vec![self.lower(node)]
        }
    }

    /// Left-hand side of an assignment. With `declaring`, plain identifiers not yet
    /// declared in the current scope are declared by that statement; the others
    /// keep their earlier declaration.
    fn lower_targets(&mut self, node: Node<'_>, declaring: Option<NodeId>) -> Vec<NodeId> {
        let Some(stmt) = declaring else {
            return self.lower_expressions(node);
        };

        let targets = if node.kind() == "expression_list" {
            named_children(node)
        } else {
            vec![node]
        };

        targets
            .into_iter()
            .map(|target| {
                if target.kind() != "identifier" {
                    return self.lower(target);
                }
                let name = self.text(target);
                if name == "_" {
                    return self.builder.ident(name, None, span(target));
                }
                let decl = match self.declared_in_current_scope(name) {
                    Some(existing) => existing,
                    None => {
                        self.declare(name, Binding::Decl(stmt));
                        stmt
                    }
                };
                self.builder.ident(name, Some(decl), span(target))
            })
            .collect()
    }

    fn lower_value_spec(&mut self, node: Node<'_>) -> NodeId {
        let (id, package_level) = self.slot(node);
        let names = field_children(node, "name");

        let mut children: Vec<NodeId> = names
            .iter()
            .map(|name| self.ident(*name, Some(id)))
            .collect();
        for child in named_children(node) {
            if !names.contains(&child) {
                children.push(self.lower(child));
            }
        }

        if !package_level {
            for name in &names {
                let name = self.text(*name);
                self.declare(name, Binding::Decl(id));
            }
        }

        self.builder.fill(id, NodeKind::Other { children });
        id
    }

    fn lower_type_spec(&mut self, node: Node<'_>) -> NodeId {
        let (id, package_level) = self.slot(node);
        let name = node.child_by_field_name("name");
        if !package_level && let Some(name) = name {
            let name = self.text(name);
            self.declare(name, Binding::Decl(id));
        }

        let children = named_children(node)
            .into_iter()
            .map(|child| {
                if Some(child) == name {
                    self.ident(child, Some(id))
                } else {
                    self.lower(child)
                }
            })
            .collect();

        self.builder.fill(id, NodeKind::Other { children });
        id
    }

    /// Functions, methods and literals. Receiver, parameters, results and the body's
    /// top-level statements share one scope.
    fn lower_function(&mut self, node: Node<'_>) -> NodeId {
        let (id, _) = self.slot(node);
        let name = node.child_by_field_name("name");
        let body = node.child_by_field_name("body");

        self.push_scope();
        let children = named_children(node)
            .into_iter()
            .map(|child| {
                if Some(child) == name {
                    let decl = (node.kind() == "function_declaration").then_some(id);
                    self.ident(child, decl)
                } else if Some(child) == body {
                    self.lower_other(child)
                } else if child.kind() == "parameter_list" {
                    self.lower_parameters(child)
                } else {
                    self.lower(child)
                }
            })
            .collect();
        self.pop_scope();

        self.builder.fill(id, NodeKind::Other { children });
        id
    }

    fn lower_parameters(&mut self, node: Node<'_>) -> NodeId {
        let children = named_children(node)
            .into_iter()
            .map(|param| match param.kind() {
                "parameter_declaration" | "variadic_parameter_declaration" => {
                    self.lower_parameter(param)
                }
                _ => self.lower(param),
            })
            .collect();
        self.builder.other(children, span(node))
    }

    fn lower_parameter(&mut self, node: Node<'_>) -> NodeId {
        let id = self.builder.reserve(span(node));
        let names = field_children(node, "name");

        let mut children: Vec<NodeId> = Vec::new();
        for child in named_children(node) {
            if names.contains(&child) {
                children.push(self.ident(child, Some(id)));
            } else {
                children.push(self.lower(child));
            }
        }
        for name in &names {
            let name = self.text(*name);
            self.declare(name, Binding::Decl(id));
        }

        self.builder.fill(id, NodeKind::Other { children });
        id
    }

    /// `switch t := x.(type)`: `t` is declared by the switch itself, after `x` is
    /// resolved, and is visible in every clause.
    fn lower_type_switch(&mut self, node: Node<'_>) -> NodeId {
        let id = self.builder.reserve(span(node));
        let alias = node.child_by_field_name("alias");
        let value = node.child_by_field_name("value");
        let mut pending: Vec<&'src str> = Vec::new();

        self.push_scope();
        let mut children = Vec::new();
        for child in named_children(node) {
            if Some(child) == alias {
                let names = if child.kind() == "expression_list" {
                    named_children(child)
                } else {
                    vec![child]
                };
                for name in names {
                    let text = self.text(name);
                    pending.push(text);
                    children.push(self.builder.ident(text, Some(id), span(name)));
                }
                continue;
            }

            children.push(self.lower(child));
            if Some(child) == value {
                for name in pending.drain(..) {
                    self.declare(name, Binding::Decl(id));
                }
            }
        }
        self.pop_scope();

        self.builder.fill(id, NodeKind::Other { children });
        id
    }
}

fn span(node: Node<'_>) -> Span {
    Span::from_range(node.range())
}

/// Spec nodes of a `var`/`const`/`type`/`import` declaration, looking through the
/// parenthesized list forms.
fn specs(decl: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    for child in named_children(decl) {
        if child.kind().ends_with("_spec") || child.kind() == "type_alias" {
            out.push(child);
        } else if child.kind().ends_with("_spec_list") {
            out.extend(specs(child));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SymbolResolver;
    use crate::visitor::inspect;

    fn unit(src: &str) -> CompilationUnit {
        CompilationUnit::from_source(src).expect("valid Go source")
    }

    /// Second argument of every call whose callee is a selector named `As`.
    fn as_targets(unit: &CompilationUnit) -> Vec<NodeId> {
        let tree = unit.tree();
        let mut out = Vec::new();
        inspect(tree, |_, node| {
            if let NodeKind::CallExpression { callee, args } = &node.kind
                && let NodeKind::SelectorExpression { name, .. } = &tree.node(*callee).kind
                && tree.identifier(*name).map(|(n, _)| n) == Some("As")
                && let Some(target) = args.get(1)
            {
                out.push(*target);
            }
            true
        });
        out
    }

    fn as_symbols(unit: &CompilationUnit) -> Vec<Option<Symbol>> {
        let tree = unit.tree();
        let mut out = Vec::new();
        inspect(tree, |_, node| {
            if let NodeKind::SelectorExpression { name, .. } = &node.kind
                && tree.identifier(*name).map(|(n, _)| n) == Some("As")
            {
                out.push(unit.symbols().symbol_of(*name).cloned());
            }
            true
        });
        out
    }

    fn decl_kind(unit: &CompilationUnit, target: NodeId) -> Option<&NodeKind> {
        let (_, decl) = unit.tree().identifier(target)?;
        decl.map(|d| &unit.tree().node(d).kind)
    }

    #[test]
    fn records_package_name() {
        let u = unit("package handlers\n");
        assert_eq!(u.package(), Some("handlers"));
    }

    #[test]
    fn short_var_declaration_declares_target() {
        let u = unit(
            r#"package main

import "errors"

func f(err error) {
    target := &MyErr{}
    errors.As(err, target)
}
"#,
        );
        let targets = as_targets(&u);
        assert_eq!(targets.len(), 1);
        match decl_kind(&u, targets[0]) {
            Some(NodeKind::AssignmentStatement { rhs, define, .. }) => {
                assert!(*define);
                assert!(matches!(
                    u.tree().node(rhs[0]).kind,
                    NodeKind::UnaryExpression {
                        op: UnaryOp::AddressOf,
                        ..
                    }
                ));
            }
            other => panic!("unexpected declaration: {other:?}"),
        }
    }

    #[test]
    fn var_declaration_is_not_an_assignment() {
        let u = unit(
            r#"package main

import "errors"

func f(err error) {
    var target MyErr
    errors.As(err, target)
}
"#,
        );
        let targets = as_targets(&u);
        assert!(matches!(
            decl_kind(&u, targets[0]),
            Some(NodeKind::Other { .. })
        ));
    }

    #[test]
    fn later_assignment_does_not_replace_declaration() {
        let u = unit(
            r#"package main

import "errors"

func f(err error) {
    var target *MyErr
    target = &MyErr{}
    errors.As(err, target)
}
"#,
        );
        let targets = as_targets(&u);
        assert!(matches!(
            decl_kind(&u, targets[0]),
            Some(NodeKind::Other { .. })
        ));
    }

    #[test]
    fn redeclaration_in_same_scope_keeps_first_declaration() {
        let u = unit(
            r#"package main

import "errors"

func f() {
    target, a := &MyErr{}, 1
    target, b := load(), 2
    errors.As(a+b, target)
}
"#,
        );
        let targets = as_targets(&u);
        match decl_kind(&u, targets[0]) {
            Some(NodeKind::AssignmentStatement { rhs, .. }) => assert!(matches!(
                u.tree().node(rhs[0]).kind,
                NodeKind::UnaryExpression {
                    op: UnaryOp::AddressOf,
                    ..
                }
            )),
            other => panic!("unexpected declaration: {other:?}"),
        }
    }

    #[test]
    fn inner_scope_shadows_outer_declaration() {
        let u = unit(
            r#"package main

import "errors"

func f(err error) {
    target := &MyErr{}
    if err != nil {
        target := MyErr{}
        errors.As(err, target)
    }
}
"#,
        );
        let targets = as_targets(&u);
        match decl_kind(&u, targets[0]) {
            Some(NodeKind::AssignmentStatement { rhs, .. }) => assert!(matches!(
                u.tree().node(rhs[0]).kind,
                NodeKind::Other { .. }
            )),
            other => panic!("unexpected declaration: {other:?}"),
        }
    }

    #[test]
    fn range_clause_lowers_to_assignment_from_range() {
        let u = unit(
            r#"package main

import "errors"

func f(err error, targets []any) {
    for _, target := range targets {
        errors.As(err, target)
    }
}
"#,
        );
        let targets = as_targets(&u);
        match decl_kind(&u, targets[0]) {
            Some(NodeKind::AssignmentStatement { rhs, define, .. }) => {
                assert!(*define);
                assert!(matches!(
                    u.tree().node(rhs[0]).kind,
                    NodeKind::UnaryExpression {
                        op: UnaryOp::Range,
                        ..
                    }
                ));
            }
            other => panic!("unexpected declaration: {other:?}"),
        }
    }

    #[test]
    fn parameters_are_declared_for_the_body() {
        let u = unit(
            r#"package main

import "errors"

func f(err error, target any) bool {
    return errors.As(err, target)
}
"#,
        );
        let targets = as_targets(&u);
        assert!(matches!(
            decl_kind(&u, targets[0]),
            Some(NodeKind::Other { .. })
        ));
    }

    #[test]
    fn package_level_variables_resolve_regardless_of_order() {
        let u = unit(
            r#"package main

import "errors"

func f(err error) bool {
    return errors.As(err, target)
}

var target = &MyErr{}
"#,
        );
        let targets = as_targets(&u);
        assert!(matches!(
            decl_kind(&u, targets[0]),
            Some(NodeKind::Other { .. })
        ));
    }

    #[test]
    fn unknown_identifiers_have_no_declaration() {
        let u = unit(
            r#"package main

import "errors"

func f(err error) bool {
    return errors.As(err, elsewhere)
}
"#,
        );
        let targets = as_targets(&u);
        assert_eq!(u.tree().identifier(targets[0]), Some(("elsewhere", None)));
    }

    #[test]
    fn imports_resolve_selectors_to_symbols() {
        let u = unit(
            r#"package main

import (
    "errors"
    xe "golang.org/x/xerrors"
)

func f(err error, t any) {
    errors.As(err, t)
    xe.As(err, t)
}
"#,
        );
        let symbols = as_symbols(&u);
        assert_eq!(
            symbols,
            vec![
                Some(Symbol {
                    package_path: "errors".to_string(),
                    name: "As".to_string(),
                }),
                Some(Symbol {
                    package_path: "golang.org/x/xerrors".to_string(),
                    name: "As".to_string(),
                }),
            ]
        );
    }

    #[test]
    fn local_values_shadow_imports() {
        let u = unit(
            r#"package main

import "errors"

func f(err error, t any) {
    errors := newMatcher()
    errors.As(err, t)
}
"#,
        );
        assert_eq!(as_symbols(&u), vec![None]);
    }

    #[test]
    fn blank_and_dot_imports_bind_nothing() {
        let u = unit(
            r#"package main

import (
    _ "errors"
    . "fmt"
)

func f(err error, t any) {
    errors.As(err, t)
}
"#,
        );
        assert_eq!(as_symbols(&u), vec![None]);
    }

    #[test]
    fn type_switch_alias_is_declared_by_the_switch() {
        let u = unit(
            r#"package main

import "errors"

func f(err error) {
    switch target := err.(type) {
    case *MyErr:
        errors.As(err, target)
    }
}
"#,
        );
        let targets = as_targets(&u);
        assert!(matches!(
            decl_kind(&u, targets[0]),
            Some(NodeKind::Other { .. })
        ));
    }

    #[test]
    fn closures_see_enclosing_declarations() {
        let u = unit(
            r#"package main

import "errors"

func f(err error) {
    target := &MyErr{}
    defer func() {
        errors.As(err, target)
    }()
}
"#,
        );
        let targets = as_targets(&u);
        assert!(matches!(
            decl_kind(&u, targets[0]),
            Some(NodeKind::AssignmentStatement { .. })
        ));
    }
}
