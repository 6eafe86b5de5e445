//! Detects `errors.As(err, target)` calls whose `target` is not a pointer.
//!
//! `errors.As` panics unless its second argument is a non-nil pointer. The pass only
//! looks at the simplest, most common mistake: a bare variable passed without `&`.
//! A variable is trusted when the statement that declared it assigned an address-of
//! expression (`target := &MyErr{}`); anything else is reported.

use serde::{Deserialize, Serialize};

use crate::diagnostics::Span;
use crate::lint::{LintCategory, LintContext, LintDescriptor, LintRule};
use crate::lowering::CompilationUnit;
use crate::syntax::{NodeId, NodeKind, SymbolResolver, SyntaxTree, UnaryOp, package_name};
use crate::visitor::inspect;

pub struct FaultyErrorsAsLint;

pub static FAULTY_ERRORS_AS: LintDescriptor = LintDescriptor {
    name: "faulty_errorsas",
    category: LintCategory::Suspicious,
    description: "This linter detects potential panics when using errors.As.",
    explanation: r#"errors.As(err, target) writes the matching error into *target and panics
when target is not a non-nil pointer. Passing a plain variable compiles, because
target has type any, but panics the first time the call runs.

    var pathErr *fs.PathError
    if errors.As(err, pathErr) { ... }   // flagged: prefix pathErr with &
    if errors.As(err, &pathErr) { ... }  // ok

A variable declared as `target := &MyErr{}` already holds a pointer and is not
reported. Only the declaring statement is inspected; later reassignments,
parameters and values flowing in from other functions are reported conservatively.

Suppress a single report with a `//nolint:faulty_errorsas` comment."#,
};

impl LintRule for FaultyErrorsAsLint {
    fn descriptor(&self) -> &'static LintDescriptor {
        &FAULTY_ERRORS_AS
    }

    fn check(&self, unit: &CompilationUnit, ctx: &mut LintContext<'_>) {
        let mut findings = Vec::new();
        find_unsafe_targets(
            unit.tree(),
            unit.symbols(),
            ctx.settings().helpers(),
            &mut findings,
        );

        for finding in findings {
            ctx.report(&FAULTY_ERRORS_AS, finding.span, finding.message);
        }
    }
}

/// Package-level function whose second argument must be a pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HelperTarget {
    /// Import path of the declaring package, e.g. `golang.org/x/xerrors`.
    pub package: String,
    pub name: String,
}

impl HelperTarget {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn errors_as() -> Self {
        Self::new("errors", "As")
    }

    /// Helpers checked when nothing else is configured.
    pub fn defaults() -> Vec<Self> {
        vec![Self::errors_as()]
    }

    /// Name as written at a call site with the default import name, e.g. `errors.As`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", package_name(&self.package), self.name)
    }
}

/// A call site the pass considers unsafe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub span: Span,
    pub message: String,
}

pub trait FindingSink {
    fn report(&mut self, span: Span, message: String);
}

impl FindingSink for Vec<Finding> {
    fn report(&mut self, span: Span, message: String) {
        self.push(Finding { span, message });
    }
}

/// Run the pass over one compilation unit, reporting findings in traversal order.
pub fn find_unsafe_targets<R>(
    tree: &SyntaxTree,
    symbols: &R,
    helpers: &[HelperTarget],
    sink: &mut impl FindingSink,
) where
    R: SymbolResolver + ?Sized,
{
    inspect(tree, |_, node| {
        let NodeKind::CallExpression { callee, args } = &node.kind else {
            return true;
        };
        let Some(helper) = matching_helper(tree, symbols, helpers, *callee) else {
            return true;
        };
        let Some(&target) = args.get(1) else {
            return true;
        };

        if let TargetShape::Unsafe(ident) = classify_target(tree, target) {
            sink.report(
                tree.node(target).span,
                format!(
                    "this call to {} will panic. Consider prefixing {} with &",
                    helper.qualified_name(),
                    ident
                ),
            );
        }

        true
    });
}

/// The helper `callee` resolves to, if any. Only `pkg.Name` selectors whose name
/// resolves to a package-level symbol qualify; method calls on local values resolve
/// to nothing and are skipped.
fn matching_helper<'h, R>(
    tree: &SyntaxTree,
    symbols: &R,
    helpers: &'h [HelperTarget],
    callee: NodeId,
) -> Option<&'h HelperTarget>
where
    R: SymbolResolver + ?Sized,
{
    let NodeKind::SelectorExpression { name, .. } = &tree.node(callee).kind else {
        return None;
    };
    let symbol = symbols.symbol_of(*name)?;
    let (selected, _) = tree.identifier(*name)?;

    helpers
        .iter()
        .find(|h| h.package == symbol.package_path && h.name == selected)
}

#[derive(Debug, PartialEq, Eq)]
enum TargetShape<'t> {
    /// `&x`, `new(T)`, `x.field`, ...: outside the heuristic.
    NotIdentifier,
    /// Declared as `x := &T{...}`.
    PointerDeclaration,
    Unsafe(&'t str),
}

fn classify_target(tree: &SyntaxTree, target: NodeId) -> TargetShape<'_> {
    let Some((name, decl)) = tree.identifier(target) else {
        return TargetShape::NotIdentifier;
    };

    if decl.is_some_and(|decl| declared_by_address_of(tree, decl)) {
        TargetShape::PointerDeclaration
    } else {
        TargetShape::Unsafe(name)
    }
}

/// Only the first right-hand value of the declaring assignment is consulted.
fn declared_by_address_of(tree: &SyntaxTree, decl: NodeId) -> bool {
    let Some(NodeKind::AssignmentStatement { rhs, .. }) = tree.get(decl).map(|n| &n.kind) else {
        return false;
    };

    rhs.first().is_some_and(|first| {
        matches!(
            tree.get(*first).map(|n| &n.kind),
            Some(NodeKind::UnaryExpression {
                op: UnaryOp::AddressOf,
                ..
            })
        )
    })
}
