//! Red-black tree of runnable tasks ordered by vruntime.
//!
//! Nodes live in an arena owned by the tree. Slot 0 is the shared black
//! sentinel standing in for every absent child; parent links are plain
//! arena indices. Insertion descends right on equal keys, so tasks with
//! the same vruntime leave the tree in the order they entered it.

mod iter;
mod node;
mod validate;

pub use iter::{Iter, NodeView, Preorder, Side};
pub use node::NodeId;

use tracing::trace;

use crate::common_types::{Color, TaskId};
use crate::error::{Result, SchedError};
use crate::schedulers::FairTask;
use node::{Node, NIL};

#[derive(Debug)]
pub struct TaskTree {
    nodes: Vec<Node>,
    free: Vec<usize>,
    root: usize,
    len: usize,
}

impl Default for TaskTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskTree {
    pub fn new() -> TaskTree {
        TaskTree {
            nodes: vec![Node::sentinel()],
            free: Vec::new(),
            root: NIL,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root == NIL
    }

    /// Inserts `task` keyed by its current vruntime and returns the handle
    /// of its node
    pub fn insert(&mut self, task: FairTask) -> NodeId {
        let z = self.alloc(task);
        let key = self.nodes[z].key;

        let mut y = NIL;
        let mut x = self.root;
        while x != NIL {
            y = x;
            x = if key < self.nodes[x].key {
                self.nodes[x].left
            } else {
                self.nodes[x].right
            };
        }

        self.nodes[z].parent = y;
        if y == NIL {
            self.root = z;
        } else if key < self.nodes[y].key {
            self.nodes[y].left = z;
        } else {
            self.nodes[y].right = z;
        }

        self.len += 1;
        self.fix_insert(z);
        self.check_invariants();

        self.handle(z)
    }

    /// Removes and returns the task with the smallest vruntime
    pub fn extract_minimum(&mut self) -> Result<FairTask> {
        if self.is_empty() {
            return Err(SchedError::EmptyStore);
        }

        let min = self.minimum(self.root);
        self.delete(self.handle(min)).ok_or(SchedError::EmptyStore)
    }

    /// Removes the node behind `id` and returns its task, or `None` when
    /// the handle does not name a live node
    ///
    /// A node with two children takes over its in-order successor's task
    /// and the successor's node is unlinked instead, so the successor's
    /// handle goes stale while `id` keeps naming a live node. A stale
    /// handle stays stale after its slot is reused by a later insert.
    pub fn delete(&mut self, id: NodeId) -> Option<FairTask> {
        let z = self.resolve(id)?;

        let mut target = z;
        if self.nodes[z].left != NIL && self.nodes[z].right != NIL {
            let successor = self.minimum(self.nodes[z].right);
            self.swap_contents(z, successor);
            target = successor;
        }

        let child = if self.nodes[target].left != NIL {
            self.nodes[target].left
        } else {
            self.nodes[target].right
        };
        let removed_color = self.nodes[target].color;

        self.transplant(target, child);
        if removed_color == Color::Black {
            self.fix_delete(child);
        }
        self.nodes[NIL].parent = NIL;

        self.len -= 1;
        let task = self.release(target);
        self.check_invariants();

        task
    }

    /// The task that [`TaskTree::extract_minimum`] would return
    pub fn peek_minimum(&self) -> Option<&FairTask> {
        if self.is_empty() {
            return None;
        }

        self.nodes[self.minimum(self.root)].task.as_ref()
    }

    pub fn get(&self, id: NodeId) -> Option<&FairTask> {
        let i = self.resolve(id)?;
        self.nodes[i].task.as_ref()
    }

    pub fn color(&self, id: NodeId) -> Option<Color> {
        let i = self.resolve(id)?;
        Some(self.nodes[i].color)
    }

    pub fn root(&self) -> Option<NodeId> {
        (self.root != NIL).then(|| self.handle(self.root))
    }

    /// Handle of the node holding task `task`. Linear, the tree is not
    /// keyed by id.
    pub fn find(&self, task: TaskId) -> Option<NodeId> {
        self.iter().find(|view| view.task.id() == task).map(|view| view.node)
    }

    pub fn contains(&self, task: TaskId) -> bool {
        self.find(task).is_some()
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn height(&self) -> usize {
        self.preorder().map(|view| view.depth + 1).max().unwrap_or(0)
    }

    /// In-order traversal, smallest vruntime first
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Pre-order traversal, root first, left before right
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder::new(self)
    }

    fn handle(&self, i: usize) -> NodeId {
        NodeId::new(i, self.nodes[i].generation)
    }

    /// Arena slot behind `id` if it still names a live node
    fn resolve(&self, id: NodeId) -> Option<usize> {
        let node = self.nodes.get(id.index)?;
        let live = id.index != NIL && node.is_live() && node.generation == id.generation;
        live.then_some(id.index)
    }

    fn alloc(&mut self, task: FairTask) -> usize {
        let mut node = Node::leaf(task);

        match self.free.pop() {
            Some(slot) => {
                node.generation = self.nodes[slot].generation;
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, i: usize) -> Option<FairTask> {
        let node = &mut self.nodes[i];
        node.left = NIL;
        node.right = NIL;
        node.parent = NIL;
        node.generation = node.generation.wrapping_add(1);
        self.free.push(i);

        node.task.take()
    }

    fn swap_contents(&mut self, a: usize, b: usize) {
        let task_b = self.nodes[b].task.take();
        let task_a = std::mem::replace(&mut self.nodes[a].task, task_b);
        self.nodes[b].task = task_a;

        let key_a = self.nodes[a].key;
        self.nodes[a].key = self.nodes[b].key;
        self.nodes[b].key = key_a;
    }

    fn minimum(&self, mut x: usize) -> usize {
        while self.nodes[x].left != NIL {
            x = self.nodes[x].left;
        }
        x
    }

    /// Upper bound on the height of a valid red-black tree of `len` nodes
    fn height_bound(&self) -> usize {
        let log = usize::BITS - self.len.leading_zeros();
        2 * (log as usize + 1)
    }

    fn color_of(&self, i: usize) -> Color {
        self.nodes[i].color
    }

    fn set_color(&mut self, i: usize, color: Color) {
        if i != NIL {
            self.nodes[i].color = color;
        }
    }

    fn parent(&self, i: usize) -> usize {
        self.nodes[i].parent
    }

    fn left(&self, i: usize) -> usize {
        self.nodes[i].left
    }

    fn right(&self, i: usize) -> usize {
        self.nodes[i].right
    }

    fn left_rotate(&mut self, x: usize) {
        let y = self.right(x);
        trace!(pivot = x, child = y, "left rotate");

        self.nodes[x].right = self.left(y);
        if self.left(y) != NIL {
            let yl = self.left(y);
            self.nodes[yl].parent = x;
        }

        let xp = self.parent(x);
        self.nodes[y].parent = xp;
        if xp == NIL {
            self.root = y;
        } else if x == self.left(xp) {
            self.nodes[xp].left = y;
        } else {
            self.nodes[xp].right = y;
        }

        self.nodes[y].left = x;
        self.nodes[x].parent = y;
    }

    fn right_rotate(&mut self, x: usize) {
        let y = self.left(x);
        trace!(pivot = x, child = y, "right rotate");

        self.nodes[x].left = self.right(y);
        if self.right(y) != NIL {
            let yr = self.right(y);
            self.nodes[yr].parent = x;
        }

        let xp = self.parent(x);
        self.nodes[y].parent = xp;
        if xp == NIL {
            self.root = y;
        } else if x == self.right(xp) {
            self.nodes[xp].right = y;
        } else {
            self.nodes[xp].left = y;
        }

        self.nodes[y].right = x;
        self.nodes[x].parent = y;
    }

    /// Restores the color invariants after `z` was linked in as a red leaf
    fn fix_insert(&mut self, mut z: usize) {
        let bound = self.height_bound();
        let mut steps = 0;

        while self.color_of(self.parent(z)) == Color::Red {
            steps += 1;
            debug_assert!(steps <= bound, "fix_insert exceeded the height bound");

            let p = self.parent(z);
            let g = self.parent(p);

            if p == self.left(g) {
                let uncle = self.right(g);
                if self.color_of(uncle) == Color::Red {
                    trace!(node = z, "fix insert: red uncle, recolor");
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.right(p) {
                        z = p;
                        self.left_rotate(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    trace!(node = z, "fix insert: black uncle, rotate");
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.right_rotate(g);
                }
            } else {
                let uncle = self.left(g);
                if self.color_of(uncle) == Color::Red {
                    trace!(node = z, "fix insert: red uncle, recolor");
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.left(p) {
                        z = p;
                        self.right_rotate(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    trace!(node = z, "fix insert: black uncle, rotate");
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.left_rotate(g);
                }
            }
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// Replaces the subtree rooted at `u` with the one rooted at `v`.
    /// `v` may be the sentinel, whose parent link is then borrowed by
    /// [`TaskTree::fix_delete`].
    fn transplant(&mut self, u: usize, v: usize) {
        let up = self.parent(u);
        if up == NIL {
            self.root = v;
        } else if u == self.left(up) {
            self.nodes[up].left = v;
        } else {
            self.nodes[up].right = v;
        }
        self.nodes[v].parent = up;
    }

    /// Pays back the black deficit carried by `x` after a black node was
    /// unlinked above it
    fn fix_delete(&mut self, mut x: usize) {
        let bound = self.height_bound();
        let mut steps = 0;

        while x != self.root && self.color_of(x) == Color::Black {
            steps += 1;
            debug_assert!(steps <= bound, "fix_delete exceeded the height bound");

            let p = self.parent(x);

            if x == self.left(p) {
                let mut w = self.right(p);
                if self.color_of(w) == Color::Red {
                    trace!(node = x, "fix delete: red sibling");
                    self.set_color(w, Color::Black);
                    self.set_color(p, Color::Red);
                    self.left_rotate(p);
                    w = self.right(self.parent(x));
                }

                if self.color_of(self.left(w)) == Color::Black
                    && self.color_of(self.right(w)) == Color::Black
                {
                    trace!(node = x, "fix delete: black nephews, push deficit up");
                    self.set_color(w, Color::Red);
                    x = self.parent(x);
                } else {
                    if self.color_of(self.right(w)) == Color::Black {
                        trace!(node = x, "fix delete: near red nephew");
                        let wl = self.left(w);
                        self.set_color(wl, Color::Black);
                        self.set_color(w, Color::Red);
                        self.right_rotate(w);
                        w = self.right(self.parent(x));
                    }

                    trace!(node = x, "fix delete: far red nephew");
                    let p = self.parent(x);
                    let wr = self.right(w);
                    self.set_color(w, self.color_of(p));
                    self.set_color(p, Color::Black);
                    self.set_color(wr, Color::Black);
                    self.left_rotate(p);
                    x = self.root;
                }
            } else {
                let mut w = self.left(p);
                if self.color_of(w) == Color::Red {
                    trace!(node = x, "fix delete: red sibling");
                    self.set_color(w, Color::Black);
                    self.set_color(p, Color::Red);
                    self.right_rotate(p);
                    w = self.left(self.parent(x));
                }

                if self.color_of(self.right(w)) == Color::Black
                    && self.color_of(self.left(w)) == Color::Black
                {
                    trace!(node = x, "fix delete: black nephews, push deficit up");
                    self.set_color(w, Color::Red);
                    x = self.parent(x);
                } else {
                    if self.color_of(self.left(w)) == Color::Black {
                        trace!(node = x, "fix delete: near red nephew");
                        let wr = self.right(w);
                        self.set_color(wr, Color::Black);
                        self.set_color(w, Color::Red);
                        self.left_rotate(w);
                        w = self.left(self.parent(x));
                    }

                    trace!(node = x, "fix delete: far red nephew");
                    let p = self.parent(x);
                    let wl = self.left(w);
                    self.set_color(w, self.color_of(p));
                    self.set_color(p, Color::Black);
                    self.set_color(wl, Color::Black);
                    self.right_rotate(p);
                    x = self.root;
                }
            }
        }

        self.set_color(x, Color::Black);
    }

    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        if let Err(err) = self.validate() {
            panic!("{err}");
        }
    }

    #[cfg(not(debug_assertions))]
    fn check_invariants(&self) {}
}
