//! archsync-model — in-memory store for architecture model trees.
//!
//! The store keeps an ordered ownership tree of packages, blocks, value
//! properties, part properties, and requirements, plus an optional
//! stereotype profile. It knows nothing about JSON documents or the
//! mapping rules; it only guarantees ordered ownership, kind-checked
//! mutation, qualified-name lookup, and all-or-nothing editing through
//! [`Session`] snapshots.
//!
//! # Example
//!
//! ```
//! use archsync_model::{Literal, ModelTree, NodeKind};
//!
//! let mut tree = ModelTree::new("Model");
//! let pkg = tree.create(NodeKind::Package, "Pump", tree.root());
//! let block = tree.create(NodeKind::Block, "Pump", pkg);
//! let mass = tree.create(NodeKind::ValueProperty, "mass", block);
//! tree.set_value(mass, Literal::Real(5.2))?;
//!
//! let found = tree.find_by_qualified_name("Pump::Pump::mass").unwrap();
//! assert_eq!(tree.value(found), Some(&Literal::Real(5.2)));
//! # Ok::<(), archsync_model::ModelError>(())
//! ```

pub mod error;
pub mod literal;
pub mod node;
pub mod profile;
pub mod session;
pub mod tree;

pub use error::ModelError;
pub use literal::Literal;
pub use node::{Node, NodeId, NodeKind};
pub use profile::{Profile, Stereotype};
pub use session::Session;
pub use tree::ModelTree;
