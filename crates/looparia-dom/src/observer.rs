//! Mutation Observers
//!
//! Observers register on a target node and receive queued records for
//! mutations at that node, or anywhere beneath it with `subtree`.

use crate::NodeId;

/// Handle returned by `DomTree::observe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u32);

/// Mutation observer options
#[derive(Debug, Clone, Default)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub subtree: bool,
    pub attribute_old_value: bool,
    pub attribute_filter: Option<Vec<String>>,
}

/// Mutation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    ChildList,
}

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

impl MutationRecord {
    /// Attribute change on `target`
    pub fn attribute(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: Some(name.to_string()),
            old_value,
        }
    }

    /// Child list change on `target`
    pub fn child_list(target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes: added,
            removed_nodes: removed,
            attribute_name: None,
            old_value: None,
        }
    }
}

/// Registered observer with its pending record queue
#[derive(Debug)]
pub(crate) struct MutationObserver {
    pub(crate) id: ObserverId,
    pub(crate) target: NodeId,
    pub(crate) options: MutationObserverInit,
    pub(crate) records: Vec<MutationRecord>,
}

impl MutationObserver {
    pub(crate) fn new(id: ObserverId, target: NodeId, options: MutationObserverInit) -> Self {
        Self {
            id,
            target,
            options,
            records: Vec::new(),
        }
    }

    /// Does this observer's option set cover the record's kind?
    /// Target/subtree scoping is decided by the tree.
    pub(crate) fn accepts(&self, record: &MutationRecord) -> bool {
        match record.mutation_type {
            MutationType::ChildList => self.options.child_list,
            MutationType::Attributes => {
                if !self.options.attributes {
                    return false;
                }
                match (&self.options.attribute_filter, &record.attribute_name) {
                    (Some(filter), Some(name)) => filter.iter().any(|f| f == name),
                    _ => true,
                }
            }
        }
    }

    pub(crate) fn push(&mut self, mut record: MutationRecord) {
        if record.mutation_type == MutationType::Attributes && !self.options.attribute_old_value {
            record.old_value = None;
        }
        self.records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_filter() {
        let observer = MutationObserver::new(
            ObserverId(1),
            NodeId::ROOT,
            MutationObserverInit {
                attributes: true,
                attribute_filter: Some(vec!["role".to_string()]),
                ..Default::default()
            },
        );

        assert!(observer.accepts(&MutationRecord::attribute(NodeId(3), "role", None)));
        assert!(!observer.accepts(&MutationRecord::attribute(NodeId(3), "aria-label", None)));
        assert!(!observer.accepts(&MutationRecord::child_list(NodeId(3), vec![NodeId(4)], vec![])));
    }

    #[test]
    fn test_old_value_dropped_unless_requested() {
        let mut observer = MutationObserver::new(
            ObserverId(1),
            NodeId::ROOT,
            MutationObserverInit {
                attributes: true,
                ..Default::default()
            },
        );
        observer.push(MutationRecord::attribute(NodeId(2), "role", Some("list".into())));
        assert_eq!(observer.records[0].old_value, None);
    }
}
