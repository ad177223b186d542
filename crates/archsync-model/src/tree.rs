//! The ownership tree.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::literal::Literal;
use crate::node::{Node, NodeId, NodeKind};
use crate::profile::Profile;

/// An ordered ownership tree of model nodes plus an optional stereotype
/// profile.
///
/// Nodes are stored in an arena and addressed by [`NodeId`]. Children
/// keep the order they were created in, which is what lets sibling runs
/// of indexed properties be regrouped into arrays later. Nodes are never
/// removed one by one; a failed operation rolls the whole tree back
/// through a [`Session`](crate::Session) snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTree {
    nodes: Vec<Node>,
    root: NodeId,
    profile: Option<Profile>,
}

impl ModelTree {
    /// Create a tree holding a single root package named `root_name`.
    ///
    /// # Example
    ///
    /// ```
    /// use archsync_model::{ModelTree, NodeKind};
    ///
    /// let tree = ModelTree::new("Model");
    /// assert_eq!(tree.name(tree.root()), "Model");
    /// assert_eq!(tree.kind(tree.root()), NodeKind::Package);
    /// ```
    pub fn new(root_name: &str) -> ModelTree {
        ModelTree {
            nodes: vec![Node::new(NodeKind::Package, root_name.to_owned(), None)],
            root: NodeId(0),
            profile: None,
        }
    }

    /// Id of the root package.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds no nodes. A tree built through
    /// [`ModelTree::new`] always has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node record.
    ///
    /// # Panics
    ///
    /// Panics when `id` did not come from this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Name of a node.
    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    /// Kind of a node.
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    /// Owner of a node; `None` for the root.
    pub fn owner(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).owner
    }

    /// Children of a node in creation order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Default value of a value property, if one was set.
    pub fn value(&self, id: NodeId) -> Option<&Literal> {
        self.node(id).value.as_ref()
    }

    /// Requirement text, if one was set.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).text.as_deref()
    }

    /// Block a part property is typed by.
    pub fn type_block(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).type_block
    }

    /// Name of the stereotype applied to a node.
    pub fn stereotype(&self, id: NodeId) -> Option<&str> {
        self.node(id).stereotype.as_deref()
    }

    /// Create a node of `kind` named `name` as the last child of `owner`.
    ///
    /// # Panics
    ///
    /// Panics when `owner` did not come from this tree.
    pub fn create(&mut self, kind: NodeKind, name: &str, owner: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind, name.to_owned(), Some(owner)));
        self.nodes[owner.index()].children.push(id);
        id
    }

    /// Set (or replace) the default value of a value property.
    ///
    /// # Errors
    ///
    /// [`ModelError::KindMismatch`] when `id` is not a value property.
    pub fn set_value(&mut self, id: NodeId, value: Literal) -> Result<(), ModelError> {
        self.expect_kind(id, NodeKind::ValueProperty)?;
        self.nodes[id.index()].value = Some(value);
        Ok(())
    }

    /// Set (or replace) the text of a requirement.
    ///
    /// # Errors
    ///
    /// [`ModelError::KindMismatch`] when `id` is not a requirement.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), ModelError> {
        self.expect_kind(id, NodeKind::Requirement)?;
        self.nodes[id.index()].text = Some(text.to_owned());
        Ok(())
    }

    /// Type a part property by a block.
    ///
    /// # Errors
    ///
    /// [`ModelError::KindMismatch`] when `part` is not a part property
    /// or `block` is not a block.
    pub fn set_type_block(&mut self, part: NodeId, block: NodeId) -> Result<(), ModelError> {
        self.expect_kind(part, NodeKind::PartProperty)?;
        self.expect_kind(block, NodeKind::Block)?;
        self.nodes[part.index()].type_block = Some(block);
        Ok(())
    }

    /// Apply a stereotype to a block or requirement.
    ///
    /// # Errors
    ///
    /// [`ModelError::KindMismatch`] for any other node kind.
    pub fn set_stereotype(&mut self, id: NodeId, name: &str) -> Result<(), ModelError> {
        let node = self.node(id);
        if node.kind != NodeKind::Block && node.kind != NodeKind::Requirement {
            return Err(ModelError::KindMismatch {
                name: node.name.clone(),
                found: node.kind.label(),
                expected: NodeKind::Block.label(),
            });
        }
        self.nodes[id.index()].stereotype = Some(name.to_owned());
        Ok(())
    }

    /// First child of `owner` whose name equals `name`.
    pub fn find_child(&self, owner: NodeId, name: &str) -> Option<NodeId> {
        for &child in self.children(owner) {
            if self.name(child) == name {
                return Some(child);
            }
        }
        None
    }

    /// Resolve a `::`-separated qualified name starting below the root.
    ///
    /// The root package itself is not part of qualified names. Each
    /// segment picks the first child carrying that name, so the lookup
    /// mirrors how names are searched during tree construction.
    ///
    /// # Example
    ///
    /// ```
    /// use archsync_model::{ModelTree, NodeKind};
    ///
    /// let mut tree = ModelTree::new("Model");
    /// let pump = tree.create(NodeKind::Package, "Pump", tree.root());
    /// let arch = tree.create(NodeKind::Package, "Architecture", pump);
    /// assert_eq!(tree.find_by_qualified_name("Pump::Architecture"), Some(arch));
    /// assert_eq!(tree.find_by_qualified_name("Pump::Motors"), None);
    /// ```
    pub fn find_by_qualified_name(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root;
        for segment in path.split("::") {
            current = self.find_child(current, segment)?;
        }
        Some(current)
    }

    /// Qualified name of a node, `::`-joined and excluding the root.
    /// The root's own qualified name is the empty string.
    pub fn qualified_name(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = id;
        while let Some(owner) = self.owner(current) {
            names.push(self.name(current));
            current = owner;
        }
        names.reverse();
        names.join("::")
    }

    /// The stereotype profile, if one was imported.
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Install (or replace) the stereotype profile.
    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
    }

    /// Check internal consistency after deserializing from disk.
    ///
    /// # Errors
    ///
    /// [`ModelError::Corrupt`] when node references fall outside the
    /// arena or when ownership links disagree with child lists.
    pub fn validate(&self) -> Result<(), ModelError> {
        let count = self.nodes.len();
        if self.root.index() >= count {
            return Err(ModelError::Corrupt(format!("root {} out of range", self.root)));
        }
        if self.nodes[self.root.index()].owner.is_some() {
            return Err(ModelError::Corrupt("root has an owner".to_owned()));
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(owner) = node.owner {
                if owner.index() >= count {
                    return Err(ModelError::Corrupt(format!(
                        "owner {} of '{}' out of range",
                        owner, node.name
                    )));
                }
            }
            if let Some(block) = node.type_block {
                if block.index() >= count {
                    return Err(ModelError::Corrupt(format!(
                        "part type {} of '{}' out of range",
                        block, node.name
                    )));
                }
            }
            for &child in &node.children {
                if child.index() >= count {
                    return Err(ModelError::Corrupt(format!(
                        "child {} of '{}' out of range",
                        child, node.name
                    )));
                }
                if self.nodes[child.index()].owner != Some(NodeId(index as u32)) {
                    return Err(ModelError::Corrupt(format!(
                        "'{}' lists '{}' as a child but does not own it",
                        node.name,
                        self.nodes[child.index()].name
                    )));
                }
            }
        }
        Ok(())
    }

    fn expect_kind(&self, id: NodeId, expected: NodeKind) -> Result<(), ModelError> {
        let node = self.node(id);
        if node.kind != expected {
            return Err(ModelError::KindMismatch {
                name: node.name.clone(),
                found: node.kind.label(),
                expected: expected.label(),
            });
        }
        Ok(())
    }
}
