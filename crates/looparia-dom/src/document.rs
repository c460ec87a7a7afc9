//! Document - High-level document API

use crate::{DomTree, NodeId};

/// Document readiness, as reported by `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    /// Still parsing
    Loading,
    /// Parsed, subresources still loading
    Interactive,
    /// Fully loaded
    Complete,
}

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Current readiness
    ready_state: ReadyState,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with an html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            ready_state: ReadyState::Loading,
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            ready_state: ReadyState::Loading,
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate html/head/body after the tree was built externally
    pub fn finalize(&mut self) {
        self.html_element = self.find_child_element(self.tree.root(), "html");
        self.head_element = self.find_child_element(self.html_element, "head");
        self.body_element = self.find_child_element(self.html_element, "body");
    }

    fn find_child_element(&self, parent: NodeId, tag: &str) -> NodeId {
        self.tree
            .element_children(parent)
            .find(|(_, elem)| elem.tag == tag)
            .map(|(id, _)| id)
            .unwrap_or(NodeId::NONE)
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current readiness
    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Advance readiness. Readiness never moves backwards.
    pub fn set_ready_state(&mut self, state: ReadyState) {
        if state > self.ready_state {
            tracing::debug!(url = %self.url, ?state, "document ready state changed");
            self.ready_state = state;
        }
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&node| self.tree.get_attribute(node, "id") == Some(id))
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::new("https://example.com/");
        assert!(doc.body().is_valid());
        assert_eq!(doc.tree().parent(doc.body()), Some(doc.document_element()));
        assert_eq!(doc.ready_state(), ReadyState::Loading);
    }

    #[test]
    fn test_ready_state_is_monotonic() {
        let mut doc = Document::default();
        doc.set_ready_state(ReadyState::Complete);
        doc.set_ready_state(ReadyState::Interactive);
        assert_eq!(doc.ready_state(), ReadyState::Complete);
    }

    #[test]
    fn test_finalize_finds_body() {
        let mut doc = Document::empty("about:blank");
        let html = doc.tree.create_element("html");
        let body = doc.tree.create_element("body");
        doc.tree.append_child(NodeId::ROOT, html).unwrap();
        doc.tree.append_child(html, body).unwrap();
        doc.tree.set_attribute(body, "id", "page").unwrap();
        doc.finalize();
        assert_eq!(doc.body(), body);
        assert!(!doc.head().is_valid());
        assert_eq!(doc.get_element_by_id("page"), Some(body));
    }
}
