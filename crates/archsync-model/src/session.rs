//! All-or-nothing editing through tree snapshots.

use crate::tree::ModelTree;

/// A snapshot taken before an editing operation.
///
/// [`commit`](Session::commit) keeps whatever was done to the live tree
/// and discards the snapshot; [`cancel`](Session::cancel) copies the
/// snapshot back, undoing every mutation made since
/// [`begin`](ModelTree::begin).
///
/// # Example
///
/// ```
/// use archsync_model::{ModelTree, NodeKind};
///
/// let mut tree = ModelTree::new("Model");
/// let session = tree.begin();
/// tree.create(NodeKind::Package, "Half-built", tree.root());
/// session.cancel(&mut tree);
/// assert_eq!(tree.len(), 1);
/// ```
#[derive(Debug)]
pub struct Session {
    saved: ModelTree,
}

impl ModelTree {
    /// Snapshot the tree ahead of an editing operation.
    pub fn begin(&self) -> Session {
        Session { saved: self.clone() }
    }
}

impl Session {
    /// Keep the edits made since the snapshot.
    pub fn commit(self) {}

    /// Restore the tree to the snapshot state.
    pub fn cancel(self, tree: &mut ModelTree) {
        *tree = self.saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Literal;
    use crate::node::NodeKind;

    #[test]
    fn test_commit_keeps_edits() {
        let mut tree = ModelTree::new("Model");
        let session = tree.begin();
        tree.create(NodeKind::Package, "Pump", tree.root());
        session.commit();
        assert!(tree.find_by_qualified_name("Pump").is_some());
    }

    #[test]
    fn test_cancel_restores_everything() {
        let mut tree = ModelTree::new("Model");
        let pkg = tree.create(NodeKind::Package, "Pump", tree.root());
        let vp = tree.create(NodeKind::ValueProperty, "mass", pkg);

        let before = tree.clone();
        let session = tree.begin();
        tree.set_value(vp, Literal::Int(7)).unwrap();
        tree.create(NodeKind::Package, "Extra", pkg);
        session.cancel(&mut tree);

        assert_eq!(tree, before);
    }
}
