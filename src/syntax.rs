//! Closed syntax model consumed by the analysis passes.
//!
//! The front end lowers a Go concrete syntax tree into this arena. Only the node
//! shapes the passes pattern-match on get their own variant; everything else is
//! `Other` and only contributes children to the traversal.

use std::collections::HashMap;

use crate::diagnostics::Span;

/// Index of a node inside a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Unary operators. `range x` is modelled as a unary expression, as Go's own AST does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    AddressOf,
    Deref,
    Negate,
    Plus,
    Not,
    Complement,
    Receive,
    Range,
}

impl UnaryOp {
    pub fn from_operator(op: &str) -> Option<Self> {
        Some(match op {
            "&" => UnaryOp::AddressOf,
            "*" => UnaryOp::Deref,
            "-" => UnaryOp::Negate,
            "+" => UnaryOp::Plus,
            "!" => UnaryOp::Not,
            "^" => UnaryOp::Complement,
            "<-" => UnaryOp::Receive,
            "range" => UnaryOp::Range,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::AddressOf => "&",
            UnaryOp::Deref => "*",
            UnaryOp::Negate => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::Complement => "^",
            UnaryOp::Receive => "<-",
            UnaryOp::Range => "range",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    CallExpression {
        callee: NodeId,
        args: Vec<NodeId>,
    },
    /// `object.name`; `name` always points at an `Identifier`.
    SelectorExpression {
        object: NodeId,
        name: NodeId,
    },
    /// `decl` is the statement or spec that declared this name, when known.
    Identifier {
        name: String,
        decl: Option<NodeId>,
    },
    /// `lhs = rhs`, `lhs := rhs` (`define`), and lowered range/receive clauses.
    AssignmentStatement {
        lhs: Vec<NodeId>,
        rhs: Vec<NodeId>,
        define: bool,
    },
    UnaryExpression {
        op: UnaryOp,
        operand: NodeId,
    },
    Other {
        children: Vec<NodeId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Span,
}

impl SyntaxNode {
    /// Child ids in source order.
    pub fn children(&self) -> Vec<NodeId> {
        match &self.kind {
            NodeKind::CallExpression { callee, args } => {
                std::iter::once(*callee).chain(args.iter().copied()).collect()
            }
            NodeKind::SelectorExpression { object, name } => vec![*object, *name],
            NodeKind::Identifier { .. } => Vec::new(),
            NodeKind::AssignmentStatement { lhs, rhs, .. } => {
                lhs.iter().chain(rhs.iter()).copied().collect()
            }
            NodeKind::UnaryExpression { operand, .. } => vec![*operand],
            NodeKind::Other { children } => children.clone(),
        }
    }
}

/// Immutable arena of lowered nodes for one compilation unit.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: NodeId,
}

impl SyntaxTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Name and declaration of `id` if it is an identifier.
    pub fn identifier(&self, id: NodeId) -> Option<(&str, Option<NodeId>)> {
        match &self.get(id)?.kind {
            NodeKind::Identifier { name, decl } => Some((name.as_str(), *decl)),
            _ => None,
        }
    }
}

/// Builds a [`SyntaxTree`]. Nodes may be reserved first and filled later so that
/// declarations can be referenced before their subtree is lowered.
#[derive(Debug, Default)]
pub struct SyntaxTreeBuilder {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SyntaxNode { kind, span });
        id
    }

    /// Reserve a slot holding an empty `Other` node until [`fill`](Self::fill) is called.
    pub fn reserve(&mut self, span: Span) -> NodeId {
        self.push(
            NodeKind::Other {
                children: Vec::new(),
            },
            span,
        )
    }

    pub fn fill(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.index()].kind = kind;
    }

    pub fn ident(&mut self, name: impl Into<String>, decl: Option<NodeId>, span: Span) -> NodeId {
        self.push(
            NodeKind::Identifier {
                name: name.into(),
                decl,
            },
            span,
        )
    }

    pub fn other(&mut self, children: Vec<NodeId>, span: Span) -> NodeId {
        self.push(NodeKind::Other { children }, span)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn finish(self, root: NodeId) -> SyntaxTree {
        SyntaxTree {
            nodes: self.nodes,
            root,
        }
    }
}

/// Resolved meaning of a package-level identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub package_path: String,
    pub name: String,
}

/// Go package name implied by an import path: its last element, skipping a trailing
/// major-version element (`.../v2`) and a gopkg.in style `.vN` suffix.
pub fn package_name(import_path: &str) -> &str {
    let mut elements = import_path.rsplit('/');
    let last = elements.next().unwrap_or(import_path);
    let last = if is_major_version(last) {
        elements.next().unwrap_or(last)
    } else {
        last
    };

    match last.rsplit_once(".v") {
        Some((base, version)) if !base.is_empty() && is_digits(version) => base,
        _ => last,
    }
}

fn is_major_version(element: &str) -> bool {
    element.strip_prefix('v').is_some_and(is_digits)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Type-info oracle: maps identifier nodes to package-level symbols.
///
/// Returns `None` for locals, fields, method values and anything unresolvable.
pub trait SymbolResolver {
    fn symbol_of(&self, ident: NodeId) -> Option<&Symbol>;
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<NodeId, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ident: NodeId, symbol: Symbol) {
        self.symbols.insert(ident, symbol);
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl SymbolResolver for SymbolTable {
    fn symbol_of(&self, ident: NodeId) -> Option<&Symbol> {
        self.symbols.get(&ident)
    }
}
