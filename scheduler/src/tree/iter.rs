use super::node::{NodeId, NIL};
use super::TaskTree;
use crate::common_types::Color;
use crate::schedulers::FairTask;

/// Which link of its parent a node hangs from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Root,
    Left,
    Right,
}

/// Read-only view of one node, as yielded by the traversals.
#[derive(Clone, Copy, Debug)]
pub struct NodeView<'a> {
    pub node: NodeId,
    pub task: &'a FairTask,
    pub color: Color,
    pub depth: usize,
    pub side: Side,
}

impl NodeView<'_> {
    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

#[derive(Clone, Copy)]
struct Frame {
    index: usize,
    depth: usize,
    side: Side,
}

fn view<'a>(tree: &'a TaskTree, frame: Frame) -> Option<NodeView<'a>> {
    let node = &tree.nodes[frame.index];

    node.task.as_ref().map(|task| NodeView {
        node: NodeId::new(frame.index, node.generation),
        task,
        color: node.color,
        depth: frame.depth,
        side: frame.side,
    })
}

/// In-order traversal with an explicit stack.
#[derive(Clone)]
pub struct Iter<'a> {
    tree: &'a TaskTree,
    stack: Vec<Frame>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(super) fn new(tree: &'a TaskTree) -> Iter<'a> {
        let mut iter = Iter {
            tree,
            stack: Vec::new(),
            remaining: tree.len,
        };
        iter.push_left_spine(tree.root, 0, Side::Root);
        iter
    }

    fn push_left_spine(&mut self, mut index: usize, mut depth: usize, mut side: Side) {
        while index != NIL {
            self.stack.push(Frame { index, depth, side });
            index = self.tree.nodes[index].left;
            depth += 1;
            side = Side::Left;
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = NodeView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.stack.pop()?;
        let right = self.tree.nodes[frame.index].right;
        self.push_left_spine(right, frame.depth + 1, Side::Right);
        self.remaining = self.remaining.saturating_sub(1);

        view(self.tree, frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// Pre-order traversal with an explicit stack: node, left subtree, right
/// subtree.
#[derive(Clone)]
pub struct Preorder<'a> {
    tree: &'a TaskTree,
    stack: Vec<Frame>,
}

impl<'a> Preorder<'a> {
    pub(super) fn new(tree: &'a TaskTree) -> Preorder<'a> {
        let mut stack = Vec::new();
        if tree.root != NIL {
            stack.push(Frame {
                index: tree.root,
                depth: 0,
                side: Side::Root,
            });
        }

        Preorder { tree, stack }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.stack.pop()?;
        let node = &self.tree.nodes[frame.index];

        if node.right != NIL {
            self.stack.push(Frame {
                index: node.right,
                depth: frame.depth + 1,
                side: Side::Right,
            });
        }
        if node.left != NIL {
            self.stack.push(Frame {
                index: node.left,
                depth: frame.depth + 1,
                side: Side::Left,
            });
        }

        view(self.tree, frame)
    }
}
