//! Node identifiers, kinds, and the stored per-node record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::literal::Literal;

/// Index of a node inside its [`ModelTree`](crate::ModelTree).
///
/// Ids are only meaningful for the tree that handed them out; they stay
/// stable for the lifetime of the tree because nodes are never removed,
/// only whole trees are rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The five element kinds the store distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Grouping container; owns packages, blocks, and requirements.
    Package,
    /// A component or plain structural class.
    Block,
    /// A leaf property with an optional default [`Literal`].
    ValueProperty,
    /// A composition slot typed by another block.
    PartProperty,
    /// A textual requirement.
    Requirement,
}

impl NodeKind {
    /// Lower-case label used in errors and log lines.
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Package => "package",
            NodeKind::Block => "block",
            NodeKind::ValueProperty => "value property",
            NodeKind::PartProperty => "part property",
            NodeKind::Requirement => "requirement",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One stored node.
///
/// Fields that only make sense for some kinds stay `None` elsewhere:
/// `value` is for value properties, `text` for requirements,
/// `type_block` for part properties, and `stereotype` for blocks and
/// requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub owner: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub value: Option<Literal>,
    pub text: Option<String>,
    pub type_block: Option<NodeId>,
    pub stereotype: Option<String>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, name: String, owner: Option<NodeId>) -> Node {
        Node {
            name,
            kind,
            owner,
            children: Vec::new(),
            value: None,
            text: None,
            type_block: None,
            stereotype: None,
        }
    }
}
