//! DOM Node
//!
//! Nodes link to each other through `NodeId`s into the tree arena instead of
//! pointers, so the tree can be mutated in place without reference cycles.

use crate::{DOMTokenList, NamedNodeMap, NodeId};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::with_data(NodeData::Text(content))
    }

    /// Create a new comment node
    pub fn comment(content: String) -> Self {
        Self::with_data(NodeData::Comment(content))
    }

    /// Create a doctype node
    pub fn doctype(name: String, public_id: String, system_id: String) -> Self {
        Self::with_data(NodeData::Doctype {
            name,
            public_id,
            system_id,
        })
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is the document node
    #[inline]
    pub fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document)
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercase local tag name
    pub tag: String,
    /// Attributes in insertion order
    pub attrs: NamedNodeMap,
    /// Cached class list, kept in sync with the `class` attribute
    classes: DOMTokenList,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: NamedNodeMap::new(),
            classes: DOMTokenList::new(),
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get_attribute(name)
    }

    /// Check for an attribute
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.has_attribute(name)
    }

    /// Set an attribute, returning the old value
    pub(crate) fn set_attr(&mut self, name: &str, value: &str) -> Option<String> {
        if name == "class" {
            self.classes = DOMTokenList::from_string(value);
        }
        self.attrs.set_attribute(name, value)
    }

    /// Remove an attribute, returning the old value
    pub(crate) fn remove_attr(&mut self, name: &str) -> Option<String> {
        let removed = self.attrs.remove_named_item(name)?;
        if name == "class" {
            self.classes = DOMTokenList::new();
        }
        Some(removed.value)
    }

    /// Class token list
    pub fn class_list(&self) -> &DOMTokenList {
        &self.classes
    }

    /// Check class membership
    #[inline]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}
