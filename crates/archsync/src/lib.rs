//! archsync — bidirectional mapping between WBS architecture documents
//! and model trees.
//!
//! An architecture document is a nested JSON object: objects carrying a
//! `wbs_no` are components, plain objects group parameters, arrays
//! explode into positionally named `base__i` siblings, and the reserved
//! keys `components`, `requirements`, `performance`, and `behavior`
//! open their own sections. The engine builds a model tree from such a
//! document, extracts an equivalent document back out of a tree, diffs
//! a tree against an edited document while patching changed leaves in
//! place, and imports stereotype taxonomies.
//!
//! The tree itself lives in [`archsync_model`]; array naming and
//! reshaping live in [`archsync_array`].
//!
//! # Example
//!
//! ```
//! use archsync_model::ModelTree;
//! use serde_json::json;
//!
//! let document = json!({
//!     "Pump": {"wbs_no": "1", "name": "Pump", "mass": 5.2}
//! });
//!
//! let mut tree = ModelTree::new("Model");
//! archsync::ops::build_model(&mut tree, &document)?;
//!
//! let pump = archsync::ops::select_component(&tree, Some("Pump"))?;
//! let extracted = archsync::extract::extract_node(&tree, pump)?;
//! assert_eq!(extracted, document["Pump"]);
//! # Ok::<(), archsync::SyncError>(())
//! ```

pub mod build;
mod classify;
pub mod diff;
pub mod error;
pub mod extract;
pub mod ops;
pub mod profile;
pub mod requirement;

pub use diff::DiffRecord;
pub use error::SyncError;
