//! Shortest walks between two nodes of the history tree.

use slab_tree::{NodeId, Tree};

/// One move of the present along a walk.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(super) enum Step {
    /// Undo this node's command, moving to its parent.
    Undo(NodeId),
    /// Redo this node's command, moving onto it from its parent.
    Redo(NodeId),
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraverseError {
    #[error("can't traverse disconnected subtrees")]
    Disconnected,
    #[error("node not present in history")]
    NotFound,
}

/// Find the nearest node that is `a`, `b`, or an ancestor of both.
pub(super) fn nearest_ancestor<T>(
    tree: &Tree<T>,
    a: NodeId,
    b: NodeId,
) -> Result<NodeId, TraverseError> {
    let a_node = tree.get(a).ok_or(TraverseError::NotFound)?;
    let b_node = tree.get(b).ok_or(TraverseError::NotFound)?;

    let line_of_a: Vec<_> = std::iter::once(a)
        .chain(a_node.ancestors().map(|node| node.node_id()))
        .collect();
    // Walking up from b, the first node also above a is the nearest.
    std::iter::once(b)
        .chain(b_node.ancestors().map(|node| node.node_id()))
        .find(|candidate| line_of_a.contains(candidate))
        .ok_or(TraverseError::Disconnected)
}

/// The steps that move the present from `start` to `end`: undo up to the nearest common
/// ancestor, then redo down.
pub(super) fn path<T>(
    tree: &Tree<T>,
    start: NodeId,
    end: NodeId,
) -> Result<Vec<Step>, TraverseError> {
    let ancestor = nearest_ancestor(tree, start, end)?;
    let climb = |from: NodeId| -> Result<Vec<NodeId>, TraverseError> {
        // Every node from `from` up to, but excluding, the ancestor.
        let mut line = Vec::new();
        let mut cur = tree.get(from).ok_or(TraverseError::NotFound)?;
        while cur.node_id() != ancestor {
            line.push(cur.node_id());
            let parent = cur.parent().ok_or(TraverseError::Disconnected)?.node_id();
            cur = tree.get(parent).ok_or(TraverseError::NotFound)?;
        }
        Ok(line)
    };
    let up = climb(start)?;
    let down = climb(end)?;

    Ok(up
        .into_iter()
        .map(Step::Undo)
        .chain(down.into_iter().rev().map(Step::Redo))
        .collect())
}

#[cfg(test)]
mod test {
    use super::{nearest_ancestor, path, Step, TraverseError};
    ///```ignore
    ///         0     <deleted>
    ///        / \        |
    ///       /   \       |
    ///      1     2      8
    ///     /|\    |\     |
    ///    / | \   | \    |
    ///   3  4  5  6  7   9
    fn make_test_tree() -> (
        hashbrown::HashMap<i32, slab_tree::NodeId>,
        slab_tree::Tree<i32>,
    ) {
        let mut ids = hashbrown::HashMap::with_capacity(11);
        let mut tree = slab_tree::TreeBuilder::new()
            .with_capacity(7)
            .with_root(0)
            .build();
        let mut root = tree.root_mut().unwrap();
        ids.insert(0, root.node_id());

        let mut left = root.append(1);
        ids.insert(1, left.node_id());
        ids.insert(3, left.append(3).node_id());
        ids.insert(4, left.append(4).node_id());
        ids.insert(5, left.append(5).node_id());
        let mut right = root.append(2);
        ids.insert(2, right.node_id());
        ids.insert(6, right.append(6).node_id());
        ids.insert(7, right.append(7).node_id());
        // Floating fragment, orphaned from the rest.
        let mut float = right.append(-1);
        let mut float = float.append(8);
        ids.insert(8, float.node_id());
        ids.insert(9, float.append(9).node_id());
        right.remove_last(slab_tree::RemoveBehavior::OrphanChildren);

        (ids, tree)
    }
    #[test]
    fn ancestor() {
        let (ids, tree) = make_test_tree();
        let id = |n: i32| ids[&n];

        assert_eq!(nearest_ancestor(&tree, id(2), id(1)), Ok(id(0)));
        assert_eq!(nearest_ancestor(&tree, id(1), id(2)), Ok(id(0)));
        assert_eq!(nearest_ancestor(&tree, id(8), id(9)), Ok(id(8)));
        assert_eq!(nearest_ancestor(&tree, id(3), id(5)), Ok(id(1)));
        assert_eq!(nearest_ancestor(&tree, id(1), id(1)), Ok(id(1)));
        assert_eq!(
            nearest_ancestor(&tree, id(1), id(9)),
            Err(TraverseError::Disconnected)
        );
    }
    #[test]
    fn walks() {
        let (ids, tree) = make_test_tree();
        let id = |n: i32| ids[&n];
        let undo = |n: i32| Step::Undo(id(n));
        let redo = |n: i32| Step::Redo(id(n));

        // Across the root.
        assert_eq!(
            path(&tree, id(7), id(5)),
            Ok(vec![undo(7), undo(2), redo(1), redo(5)])
        );
        assert_eq!(
            path(&tree, id(5), id(7)),
            Ok(vec![undo(5), undo(1), redo(2), redo(7)])
        );
        // Straight up, straight down.
        assert_eq!(path(&tree, id(6), id(0)), Ok(vec![undo(6), undo(2)]));
        assert_eq!(path(&tree, id(0), id(3)), Ok(vec![redo(1), redo(3)]));
        // Nowhere.
        assert_eq!(path(&tree, id(2), id(2)), Ok(vec![]));
        // Between disconnected fragments.
        assert!(path(&tree, id(6), id(9)).is_err());
    }
}
