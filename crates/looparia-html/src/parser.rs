//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it to our arena DOM. Subtrees are
//! built detached and attached last, so an observer on the destination sees
//! one `childList` record per top-level node instead of one per element.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use looparia_dom::{Document, DomTree, NodeId, ReadyState};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL. The result is still `Loading`; the host
    /// decides when parsing is considered finished.
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = self.parse_rcdom(html)?;

        let mut document = Document::empty(url);
        let tree = document.tree_mut();
        for child in dom.document.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, tree)? {
                tree.append_child(NodeId::ROOT, id)?;
            }
        }
        document.finalize();
        debug_assert_eq!(document.ready_state(), ReadyState::Loading);

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Parse a fragment and append its `<body>` content under `parent`.
    /// Returns the appended top-level nodes in document order.
    pub fn parse_into(
        &self,
        html: &str,
        tree: &mut DomTree,
        parent: NodeId,
    ) -> Result<Vec<NodeId>, ParseError> {
        let dom = self.parse_rcdom(html)?;
        let Some(body) = find_body(&dom.document) else {
            return Ok(Vec::new());
        };

        let mut inserted = Vec::new();
        for child in body.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, tree)? {
                tree.append_child(parent, id)?;
                inserted.push(id);
            }
        }
        tracing::trace!(parent = %parent, count = inserted.len(), "inserted fragment");
        Ok(inserted)
    }

    fn parse_rcdom(&self, html: &str) -> Result<RcDom, ParseError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        Ok(dom)
    }

    /// Convert an RcDom node (and its subtree) into a detached node
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree) -> Result<Option<NodeId>, ParseError> {
        let id = match &handle.data {
            RcNodeData::Document => None,
            RcNodeData::Doctype {
                name,
                public_id,
                system_id,
            } => Some(tree.create_doctype(name, public_id, system_id)),
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if text.trim().is_empty() {
                    None
                } else {
                    Some(tree.create_text(&text))
                }
            }
            RcNodeData::Comment { contents } => Some(tree.create_comment(contents)),
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    tree.set_attribute(id, &attr.name.local, &attr.value)?;
                }
                for child in handle.children.borrow().iter() {
                    if let Some(child_id) = self.convert_node(child, tree)? {
                        tree.append_child(id, child_id)?;
                    }
                }
                Some(id)
            }
            // Ignore processing instructions
            RcNodeData::ProcessingInstruction { .. } => None,
        };
        Ok(id)
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

fn find_element(parent: &Handle, tag: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| matches!(&child.data, RcNodeData::Element { name, .. } if &*name.local == tag))
        .cloned()
}

fn find_body(document: &Handle) -> Option<Handle> {
    let html = find_element(document, "html")?;
    find_element(&html, "body")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        assert!(doc.tree().len() > 1, "Expected more than 1 node, got {}", doc.tree().len());
        assert!(doc.body().is_valid());
        assert!(doc.head().is_valid());
    }

    #[test]
    fn test_parse_fragment_is_wrapped() {
        let doc = HtmlParser::new().parse("<div><span>Text</span></div>").unwrap();
        let div = doc
            .tree()
            .element_children(doc.body())
            .next()
            .map(|(id, _)| id)
            .unwrap();
        assert_eq!(doc.tree().element(div).map(|e| e.tag.as_str()), Some("div"));
    }

    #[test]
    fn test_whitespace_text_dropped() {
        let doc = HtmlParser::new().parse("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>").unwrap();
        let ul = doc.tree().children(doc.body()).next().map(|(id, _)| id).unwrap();
        assert_eq!(doc.tree().children(ul).count(), 2);
    }
}
