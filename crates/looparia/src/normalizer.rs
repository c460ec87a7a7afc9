//! Normalizer
//!
//! One pass over a subtree: carousel containers (with their wrapper, slides
//! and inner live regions) first, then plain loop grids, then stray live
//! regions. Each element receives at most one plan per pass, claimed by the
//! first step that reaches it, so overlapping shapes (a loop grid nested in a
//! slide, say) cannot make two plans fight over the same attribute.

use std::collections::HashSet;

use looparia_dom::{DomResult, DomTree, NodeId};

use crate::pattern::{Signatures, StructuralPattern};
use crate::rules::{PlanContext, plan_for};

/// What a single pass touched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub carousels: usize,
    pub wrappers: usize,
    pub slides: usize,
    pub plain_grids: usize,
    pub grid_items: usize,
    pub notifications: usize,
    /// Attribute sets and removals performed
    pub writes: usize,
}

impl PassReport {
    /// True if the pass changed nothing
    pub fn is_noop(&self) -> bool {
        self.writes == 0
    }

    fn count(&mut self, pattern: StructuralPattern) {
        let slot = match pattern {
            StructuralPattern::CarouselContainer => &mut self.carousels,
            StructuralPattern::CarouselWrapper => &mut self.wrappers,
            StructuralPattern::Slide => &mut self.slides,
            StructuralPattern::PlainGridContainer => &mut self.plain_grids,
            StructuralPattern::PlainGridItem => &mut self.grid_items,
            StructuralPattern::LiveRegionNotification => &mut self.notifications,
        };
        *slot += 1;
    }
}

/// Applies the rule table to every known pattern beneath a root
#[derive(Debug, Clone)]
pub struct Normalizer {
    signatures: Signatures,
}

/// Per-pass state
struct Pass {
    claimed: HashSet<NodeId>,
    report: PassReport,
}

impl Normalizer {
    pub fn new(signatures: Signatures) -> Self {
        Self { signatures }
    }

    pub fn signatures(&self) -> &Signatures {
        &self.signatures
    }

    /// Normalize the subtree rooted at `root`, `root` included. Anything that
    /// is not an element (or the document node) falls back to the document.
    pub fn normalize(&self, tree: &mut DomTree, root: NodeId) -> DomResult<PassReport> {
        let root = Self::effective_root(tree, root);
        let mut pass = Pass {
            claimed: HashSet::new(),
            report: PassReport::default(),
        };
        let sig = &self.signatures;

        let carousels = Self::scan(tree, root, |t, id| sig.is_carousel_container(t, id));
        for container in carousels {
            self.normalize_carousel(tree, container, &mut pass)?;
        }

        let grids = Self::scan(tree, root, |t, id| sig.is_plain_grid_container(t, id));
        for grid in grids {
            self.normalize_plain_grid(tree, grid, &mut pass)?;
        }

        let notifications = Self::scan(tree, root, |t, id| sig.is_notification(t, id));
        for notification in notifications {
            Self::apply(
                tree,
                notification,
                StructuralPattern::LiveRegionNotification,
                PlanContext::default(),
                &mut pass,
            )?;
        }

        let report = pass.report;
        tracing::debug!(
            root = %root,
            carousels = report.carousels,
            slides = report.slides,
            plain_grids = report.plain_grids,
            notifications = report.notifications,
            writes = report.writes,
            "normalization pass"
        );
        Ok(report)
    }

    fn effective_root(tree: &DomTree, root: NodeId) -> NodeId {
        match tree.get(root) {
            Some(node) if node.is_element() || node.is_document() => root,
            _ => {
                tracing::debug!(requested = %root, "normalize root is not an element, using document");
                tree.root()
            }
        }
    }

    /// Matching elements in document order, including `root` itself
    fn scan(tree: &DomTree, root: NodeId, matches: impl Fn(&DomTree, NodeId) -> bool) -> Vec<NodeId> {
        std::iter::once(root)
            .chain(tree.descendants(root))
            .filter(|&id| matches(tree, id))
            .collect()
    }

    fn normalize_carousel(&self, tree: &mut DomTree, container: NodeId, pass: &mut Pass) -> DomResult<()> {
        Self::apply(
            tree,
            container,
            StructuralPattern::CarouselContainer,
            PlanContext::default(),
            pass,
        )?;

        if let Some(wrapper) = self.signatures.wrapper_of(tree, container) {
            Self::apply(
                tree,
                wrapper,
                StructuralPattern::CarouselWrapper,
                PlanContext::default(),
                pass,
            )?;

            let slides = self.signatures.slides_of(tree, wrapper);
            let total = slides.len();
            for (index, slide) in slides.into_iter().enumerate() {
                Self::apply(
                    tree,
                    slide,
                    StructuralPattern::Slide,
                    PlanContext::new(index, total),
                    pass,
                )?;
            }
        }

        // The library keeps its announcement element inside the container.
        let view: &DomTree = tree;
        let notifications: Vec<NodeId> = view
            .descendants(container)
            .filter(|&id| self.signatures.is_notification(view, id))
            .collect();
        for notification in notifications {
            Self::apply(
                tree,
                notification,
                StructuralPattern::LiveRegionNotification,
                PlanContext::default(),
                pass,
            )?;
        }
        Ok(())
    }

    fn normalize_plain_grid(&self, tree: &mut DomTree, grid: NodeId, pass: &mut Pass) -> DomResult<()> {
        Self::apply(
            tree,
            grid,
            StructuralPattern::PlainGridContainer,
            PlanContext::default(),
            pass,
        )?;

        // Live regions left in a torn-down carousel belong to the stray scan.
        let view: &DomTree = tree;
        let items: Vec<NodeId> = view
            .element_children(grid)
            .map(|(id, _)| id)
            .filter(|&id| !self.signatures.is_notification(view, id))
            .collect();
        for item in items {
            Self::apply(
                tree,
                item,
                StructuralPattern::PlainGridItem,
                PlanContext::default(),
                pass,
            )?;
        }
        Ok(())
    }

    /// Apply one pattern's plan, writing only attributes whose value changes
    fn apply(
        tree: &mut DomTree,
        id: NodeId,
        pattern: StructuralPattern,
        context: PlanContext,
        pass: &mut Pass,
    ) -> DomResult<()> {
        if !pass.claimed.insert(id) {
            tracing::trace!(node = %id, pattern = pattern.name(), "already claimed this pass");
            return Ok(());
        }
        let Some(element) = tree.element(id) else {
            return Ok(());
        };

        let writes = plan_for(pattern, context).resolve(element);
        pass.report.count(pattern);
        for write in writes {
            match write.value {
                Some(value) => tree.set_attribute(id, write.name, &value)?,
                None => {
                    tree.remove_attribute(id, write.name)?;
                }
            }
            pass.report.writes += 1;
        }
        Ok(())
    }
}
