use thiserror::Error;

/// Errors reported by the model store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A mutator was pointed at a node of the wrong kind, for example
    /// setting a default value on a package.
    #[error("'{name}' is a {found}, expected a {expected}")]
    KindMismatch {
        name: String,
        found: &'static str,
        expected: &'static str,
    },

    /// A deserialized tree references nodes that do not exist or whose
    /// ownership links disagree with the child lists.
    #[error("model tree is inconsistent: {0}")]
    Corrupt(String),
}
