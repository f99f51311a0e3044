//! Depth-first traversal over a [`SyntaxTree`].

use std::iter::FusedIterator;

use crate::tree::{NodeId, SyntaxTree, SyntaxTreeNode};

/// Pre-order, depth-first iterator over a subtree.
///
/// Parents are yielded before their children and children left to right,
/// which is the order of the underlying linear token stream. Cloning a walk
/// forks it at its current position.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(tree: &'a SyntaxTree, start: NodeId, include_self: bool) -> Self {
        let stack = if include_self {
            vec![start]
        } else {
            tree.children_of(start).iter().rev().copied().collect()
        };
        Self { tree, stack }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = SyntaxTreeNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children_of(id).iter().rev().copied());
        self.tree.node(id)
    }
}

impl FusedIterator for Walk<'_> {}

#[cfg(test)]
mod tests {
    use crate::{SyntaxTree, Token};

    fn sample() -> SyntaxTree {
        SyntaxTree::build(vec![
            Token::open("blockquote", "blockquote"),
            Token::open("paragraph", "p"),
            Token::leaf("inline", "").with_children(vec![
                Token::open("em", "em"),
                Token::text("a"),
                Token::close("em", "em"),
                Token::text("b"),
            ]),
            Token::close("paragraph", "p"),
            Token::close("blockquote", "blockquote"),
            Token::leaf("hr", "hr"),
        ])
        .unwrap()
    }

    #[test]
    fn test_walk_order() {
        let tree = sample();
        let types: Vec<_> = tree.walk().map(|n| n.node_type()).collect();
        assert_eq!(
            types,
            ["root", "blockquote", "paragraph", "inline", "em", "text", "text", "hr"]
        );
    }

    #[test]
    fn test_walk_excluding_self() {
        let tree = sample();
        let quote = tree.root().child(0).unwrap();
        let types: Vec<_> = quote.walk(false).map(|n| n.node_type()).collect();
        assert_eq!(types, ["paragraph", "inline", "em", "text", "text"]);
    }

    #[test]
    fn test_walk_is_restartable() {
        let tree = sample();
        let root = tree.root();
        let first: Vec<_> = root.walk(true).map(|n| n.id()).collect();
        let second: Vec<_> = root.walk(true).map(|n| n.id()).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), tree.len());
    }

    #[test]
    fn test_walk_matches_arena_order() {
        let tree = sample();
        let ids: Vec<_> = tree.walk().map(|n| n.id().index()).collect();
        let expected: Vec<_> = (0..tree.len()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_walk_leaf() {
        let tree = sample();
        let hr = tree.root().child(1).unwrap();
        assert_eq!(hr.walk(true).count(), 1);
        assert_eq!(hr.walk(false).count(), 0);
    }

    #[test]
    fn test_concurrent_walks() {
        let tree = sample();
        let counts: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| tree.walk().count()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(counts.iter().all(|&c| c == tree.len()));
    }
}
