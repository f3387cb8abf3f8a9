use scheduler::{Color, Side, TaskTree};

/// Renders the tree top-down, one node per line:
///
/// ```text
/// `-- P2 v=0.00 w=512 B
///     |-- P1 v=0.00 w=1024 R
///     `-- P3 v=0.00 w=93 R
/// ```
pub fn render(tree: &TaskTree) -> String {
    let mut out = String::new();
    let mut ancestors_last: Vec<bool> = Vec::new();

    for view in tree.preorder() {
        ancestors_last.truncate(view.depth);

        for last in &ancestors_last {
            out.push_str(if *last { "    " } else { "|   " });
        }

        let last = view.side != Side::Left;
        out.push_str(if last { "`-- " } else { "|-- " });
        out.push_str(&format!(
            "{} v={} w={} {}\n",
            view.task.id(),
            view.task.vruntime(),
            view.task.weight(),
            match view.color {
                Color::Red => "R",
                Color::Black => "B",
            }
        ));

        ancestors_last.push(last);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scheduler::{FairTask, TaskId};

    fn make_tree(keys: &[f64]) -> TaskTree {
        let mut tree = TaskTree::new();
        for (i, key) in keys.iter().enumerate() {
            tree.insert(FairTask::new(TaskId::new(i + 1), 0, *key, 1.0).unwrap());
        }
        tree
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&TaskTree::new()), "");
    }

    #[test]
    fn test_render_three_nodes() {
        let tree = make_tree(&[1.0, 2.0, 3.0]);
        let expected = "\
`-- P2 v=2.00 w=1024 B
    |-- P1 v=1.00 w=1024 R
    `-- P3 v=3.00 w=1024 R
";
        assert_eq!(render(&tree), expected);
    }

    #[test]
    fn test_render_nested_indent() {
        let tree = make_tree(&[1.0, 2.0, 3.0, 4.0]);
        let rendered = render(&tree);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "        `-- P4 v=4.00 w=1024 R");
    }
}
