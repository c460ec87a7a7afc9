//! DOM operation errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found in the arena
    #[error("node {0} not found")]
    NotFound(NodeId),

    /// Attribute access on something that is not an element
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    /// Hierarchy error (e.g., inserting an ancestor under its descendant)
    #[error("hierarchy request error: cannot insert {child} under {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}
