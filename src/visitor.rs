use crate::syntax::{NodeId, SyntaxNode, SyntaxTree};

/// Visit every node of `tree` in pre-order (parent before children).
///
/// Children of a node are skipped when `visit` returns `false` for it. The walk keeps
/// its own stack, so arbitrarily deep trees are fine.
pub fn inspect(tree: &SyntaxTree, mut visit: impl FnMut(NodeId, &SyntaxNode) -> bool) {
    if tree.is_empty() {
        return;
    }

    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        if visit(id, node) {
            stack.extend(node.children().into_iter().rev());
        }
    }
}
