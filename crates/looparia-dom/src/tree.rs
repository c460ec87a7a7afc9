//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: removal unlinks a subtree from its parent so it is
//! no longer connected, but its `NodeId`s stay valid for the arena's lifetime.

use crate::observer::MutationObserver;
use crate::{
    DomError, DomResult, ElementData, MutationObserverInit, MutationRecord, Node, NodeId,
    ObserverId,
};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    observers: Vec<MutationObserver>,
    next_observer_id: u32,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            observers: Vec::new(),
            next_observer_id: 1,
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.nodes.get_mut(id.index()).ok_or(DomError::NotFound(id))
    }

    /// Number of nodes in the arena (connected or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree holds nothing but the document node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::text(text.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::comment(text.to_string()))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(Node::doctype(
            name.to_string(),
            public_id.to_string(),
            system_id.to_string(),
        ))
    }

    // ----------------------------------------------------------------------
    // Structure
    // ----------------------------------------------------------------------

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Is `ancestor` equal to `id` or one of its ancestors?
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = id;
        while current.is_valid() {
            if current == ancestor {
                return true;
            }
            current = match self.get(current) {
                Some(node) => node.parent,
                None => return false,
            };
        }
        false
    }

    /// Is the node reachable from the document node?
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(NodeId::ROOT, id)
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.node(parent)?;
        if self.node(child)?.is_document() || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if self.parent(child).is_some() {
            self.remove(child)?;
        }

        let last = self.node(parent)?.last_child;
        {
            let node = self.node_mut(child)?;
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.node_mut(last)?.next_sibling = child;
        } else {
            self.node_mut(parent)?.first_child = child;
        }
        self.node_mut(parent)?.last_child = child;

        self.notify(MutationRecord::child_list(parent, vec![child], Vec::new()));
        Ok(())
    }

    /// Unlink a node (and its subtree) from its parent
    pub fn remove(&mut self, child: NodeId) -> DomResult<()> {
        let (parent, prev, next) = {
            let node = self.node(child)?;
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return Ok(());
        }

        if prev.is_valid() {
            self.node_mut(prev)?.next_sibling = next;
        } else {
            self.node_mut(parent)?.first_child = next;
        }
        if next.is_valid() {
            self.node_mut(next)?.prev_sibling = prev;
        } else {
            self.node_mut(parent)?.last_child = prev;
        }

        let node = self.node_mut(child)?;
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;

        self.notify(MutationRecord::child_list(parent, Vec::new(), vec![child]));
        Ok(())
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Node)> {
        let first = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        std::iter::successors(
            self.get(first).map(|node| (first, node)),
            move |(_, node)| self.get(node.next_sibling).map(|next| (node.next_sibling, next)),
        )
    }

    /// Iterate over direct element children
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &ElementData)> {
        self.children(id)
            .filter_map(|(child, node)| node.as_element().map(|elem| (child, elem)))
    }

    /// Pre-order walk of everything beneath `id` (not including `id`)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE),
        }
    }

    // ----------------------------------------------------------------------
    // Elements and attributes
    // ----------------------------------------------------------------------

    /// Element data for a node, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    /// Get an attribute value
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.get_attr(name))
    }

    /// Check for an attribute
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_attr(name))
    }

    /// Check class membership
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    /// Set an attribute. Always records a mutation, even when the value is
    /// unchanged.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let old = self.element_mut(id)?.set_attr(name, value);
        tracing::trace!(node = %id, name, value, "set attribute");
        self.notify(MutationRecord::attribute(id, name, old));
        Ok(())
    }

    /// Remove an attribute. Records a mutation only if it existed.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        let old = self.element_mut(id)?.remove_attr(name);
        if old.is_some() {
            tracing::trace!(node = %id, name, "removed attribute");
            self.notify(MutationRecord::attribute(id, name, old.clone()));
        }
        Ok(old)
    }

    // ----------------------------------------------------------------------
    // Mutation observers
    // ----------------------------------------------------------------------

    /// Register a mutation observer on `target`
    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> DomResult<ObserverId> {
        self.node(target)?;
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push(MutationObserver::new(id, target, options));
        Ok(id)
    }

    /// Drain an observer's pending records
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .iter_mut()
            .find(|o| o.id == observer)
            .map(|o| std::mem::take(&mut o.records))
            .unwrap_or_default()
    }

    /// Check for pending records without draining them
    pub fn has_pending_records(&self, observer: ObserverId) -> bool {
        self.observers
            .iter()
            .any(|o| o.id == observer && !o.records.is_empty())
    }

    /// Stop an observer and discard its records
    pub fn disconnect(&mut self, observer: ObserverId) {
        self.observers.retain(|o| o.id != observer);
    }

    fn notify(&mut self, record: MutationRecord) {
        if self.observers.is_empty() {
            return;
        }
        let interested: Vec<usize> = self
            .observers
            .iter()
            .enumerate()
            .filter(|(_, o)| {
                let in_scope = if o.options.subtree {
                    self.is_inclusive_ancestor(o.target, record.target)
                } else {
                    o.target == record.target
                };
                in_scope && o.accepts(&record)
            })
            .map(|(i, _)| i)
            .collect();

        for i in interested {
            self.observers[i].push(record.clone());
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over the descendants of a node
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next;
        let node = self.tree.get(current)?;

        // Descend first, then the next sibling, then climb until an ancestor
        // below the root has one.
        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let Some(n) = self.tree.get(cursor) else {
                    break NodeId::NONE;
                };
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                if n.parent == self.root || !n.parent.is_valid() {
                    break NodeId::NONE;
                }
                cursor = n.parent;
            }
        };
        Some(current)
    }
}
