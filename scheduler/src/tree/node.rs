use std::fmt;

use crate::common_types::{Color, Vruntime};
use crate::schedulers::FairTask;

/// Arena slot of the shared sentinel. Every absent child and the root's
/// parent point here.
pub(crate) const NIL: usize = 0;

/// Handle to a live node of a [`TaskTree`](super::TaskTree).
///
/// Carries the generation of its slot, so a handle outlives neither the
/// node it was issued for nor a later reuse of the same slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl NodeId {
    pub(crate) fn new(index: usize, generation: u32) -> NodeId {
        NodeId { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// One arena slot. The sentinel and freed slots carry no task.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) task: Option<FairTask>,
    pub(crate) key: Vruntime,
    pub(crate) color: Color,
    pub(crate) left: usize,
    pub(crate) right: usize,
    pub(crate) parent: usize,
    /// Bumped every time the slot is freed
    pub(crate) generation: u32,
}

impl Node {
    pub(crate) fn sentinel() -> Node {
        Node {
            task: None,
            key: Vruntime::default(),
            color: Color::Black,
            left: NIL,
            right: NIL,
            parent: NIL,
            generation: 0,
        }
    }

    /// A fresh red leaf holding `task`, keyed by its current vruntime
    pub(crate) fn leaf(task: FairTask) -> Node {
        Node {
            key: task.vruntime(),
            task: Some(task),
            color: Color::Red,
            left: NIL,
            right: NIL,
            parent: NIL,
            generation: 0,
        }
    }

    pub(crate) fn is_live(&self) -> bool {
        self.task.is_some()
    }
}
