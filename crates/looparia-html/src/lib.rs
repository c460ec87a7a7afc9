//! Looparia HTML
//!
//! HTML5 parsing built on html5ever, producing `looparia_dom` documents and
//! fragments.

mod parser;

pub use parser::HtmlParser;

use looparia_dom::{Document, DomTree, NodeId};

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse an HTML fragment and append its body content under `parent`
pub fn parse_into(html: &str, tree: &mut DomTree, parent: NodeId) -> Result<Vec<NodeId>, ParseError> {
    HtmlParser::new().parse_into(html, tree, parent)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read markup: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot attach parsed content: {0}")]
    Attach(#[from] looparia_dom::DomError),
}
