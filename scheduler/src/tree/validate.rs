use super::node::NIL;
use super::TaskTree;
use crate::common_types::Color;
use crate::error::{Result, SchedError};

fn violation(msg: String) -> SchedError {
    SchedError::InvariantViolation(msg)
}

impl TaskTree {
    /// Checks every red-black and search-tree invariant and returns the
    /// black-height of the root (sentinel excluded)
    ///
    /// Walks the whole tree, so it is meant for tests and debug builds.
    pub fn validate(&self) -> Result<usize> {
        if self.nodes[NIL].color != Color::Black {
            return Err(violation("sentinel is not black".to_string()));
        }

        if self.root == NIL {
            if self.len != 0 {
                return Err(violation(format!("empty root but len is {}", self.len)));
            }
            return Ok(0);
        }

        if self.nodes[self.root].color != Color::Black {
            return Err(violation(format!("root #{} is red", self.root)));
        }

        if self.nodes[self.root].parent != NIL {
            return Err(violation(format!("root #{} has a parent", self.root)));
        }

        let mut black_height: Option<usize> = None;
        let mut visited = 0;
        let mut stack = vec![(self.root, 0usize)];

        while let Some((i, blacks_above)) = stack.pop() {
            let node = &self.nodes[i];
            visited += 1;

            if !node.is_live() {
                return Err(violation(format!("node #{i} is reachable but holds no task")));
            }

            let blacks = blacks_above + usize::from(node.color == Color::Black);

            for (child, is_left) in [(node.left, true), (node.right, false)] {
                if child == NIL {
                    match black_height {
                        None => black_height = Some(blacks),
                        Some(expected) if expected != blacks => {
                            return Err(violation(format!(
                                "black-height below #{i} is {blacks}, expected {expected}"
                            )));
                        }
                        Some(_) => {}
                    }
                    continue;
                }

                let child_node = &self.nodes[child];

                if child_node.parent != i {
                    return Err(violation(format!(
                        "#{child} points to parent #{}, expected #{i}",
                        child_node.parent
                    )));
                }

                if node.color == Color::Red && child_node.color == Color::Red {
                    return Err(violation(format!("red #{i} has red child #{child}")));
                }

                let ordered = if is_left {
                    child_node.key <= node.key
                } else {
                    child_node.key >= node.key
                };
                if !ordered {
                    return Err(violation(format!(
                        "#{child} with key {} is misplaced under #{i} with key {}",
                        child_node.key, node.key
                    )));
                }

                stack.push((child, blacks));
            }
        }

        if visited != self.len {
            return Err(violation(format!(
                "reached {visited} nodes but len is {}",
                self.len
            )));
        }

        let mut previous = None;
        for view in self.iter() {
            let key = view.task.vruntime();
            if previous.is_some_and(|prev| key < prev) {
                return Err(violation(format!("in-order keys decrease at {}", view.node)));
            }
            previous = Some(key);
        }

        Ok(black_height.unwrap_or(0))
    }
}
