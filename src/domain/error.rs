//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree's structural rules.
/// A failed operation leaves the tree unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("an item named '{name}' already exists in '{parent}'")]
    DuplicateName { parent: String, name: String },

    #[error("cannot move '{from}' into '{to}': destination is inside the source")]
    InvalidMove { from: String, to: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("invalid name: '{0}'")]
    InvalidName(String),
}
