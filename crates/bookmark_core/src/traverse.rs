use crate::BookmarkNode;

/// Depth-first iterator over the leaves below one node, in document order.
///
/// Uses an explicit stack so callers can interleave `await` points between
/// leaves without recursion. A leaf root yields itself once.
pub struct Leaves<'a> {
    stack: Vec<&'a BookmarkNode>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a BookmarkNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match &node.children {
                None => return Some(node),
                // Reverse push keeps the first child on top of the stack.
                Some(children) => self.stack.extend(children.iter().rev()),
            }
        }
        None
    }
}

pub fn leaves(node: &BookmarkNode) -> Leaves<'_> {
    Leaves { stack: vec![node] }
}

/// Invokes `visit` on every leaf reachable from `node`, exactly once, in the
/// order children appear.
pub fn traverse<'a, F>(node: &'a BookmarkNode, mut visit: F)
where
    F: FnMut(&'a BookmarkNode),
{
    for leaf in leaves(node) {
        visit(leaf);
    }
}

/// Counts leaves under all `roots`. Leaves without a URL still count.
pub fn count_leaves(roots: &[BookmarkNode]) -> usize {
    roots.iter().map(|root| leaves(root).count()).sum()
}
