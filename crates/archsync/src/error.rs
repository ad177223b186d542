//! Error type shared by the import, build, update, and export operations.

use archsync_array::ShapeError;
use archsync_model::ModelError;
use thiserror::Error;

/// Errors reported by the synchronization operations.
///
/// Only malformed input documents, shape conflicts, and model-store
/// failures abort an operation. Recoverable oddities in otherwise valid
/// documents (unknown literal types, names that resolve to nothing) are
/// logged and skipped by the operations themselves rather than returned.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The document cannot be interpreted at all, for example the root
    /// key named on the command line is absent.
    #[error("cannot interpret document: {0}")]
    Parse(String),

    /// A run of indexed siblings does not fill the rectangular shape
    /// implied by its names.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// A patch value has no literal representation in the model store.
    #[error("value {0} has no patchable literal type")]
    UnknownLiteralType(String),

    /// A qualified name resolved to nothing.
    #[error("'{0}' not found in the model")]
    Lookup(String),

    /// The model tree does not have the structure an operation expects.
    #[error("unexpected model structure: {0}")]
    Structural(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
