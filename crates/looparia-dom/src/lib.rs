//! Looparia DOM - Document Object Model
//!
//! Arena-allocated document tree with attribute storage, class token lists,
//! readiness tracking and mutation observers.

mod attributes;
mod classlist;
mod document;
mod node;
mod observer;
mod operations;
mod tree;

pub use attributes::{Attr, NamedNodeMap};
pub use classlist::DOMTokenList;
pub use document::{Document, ReadyState};
pub use node::{ElementData, Node, NodeData};
pub use observer::{MutationObserverInit, MutationRecord, MutationType, ObserverId};
pub use operations::{DomError, DomResult};
pub use tree::{Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID (the document node)
    pub const ROOT: NodeId = NodeId(0);

    /// Null link
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node at all
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Build an ID from a raw arena index
    #[inline]
    pub const fn from_raw(index: u32) -> Self {
        NodeId(index)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#none")
        }
    }
}
