//! Structural patterns
//!
//! Predicates over live elements identifying the markup shapes the external
//! carousel and loop-grid libraries produce. The matcher only reads tag and
//! class data; it never controls those libraries.

use looparia_dom::{DomTree, NodeId};

use crate::config::MarkerClasses;

/// A known markup shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuralPattern {
    CarouselContainer,
    CarouselWrapper,
    Slide,
    PlainGridContainer,
    PlainGridItem,
    LiveRegionNotification,
}

impl StructuralPattern {
    pub const ALL: [StructuralPattern; 6] = [
        Self::CarouselContainer,
        Self::CarouselWrapper,
        Self::Slide,
        Self::PlainGridContainer,
        Self::PlainGridItem,
        Self::LiveRegionNotification,
    ];

    /// Short label used in logs and pass reports
    pub fn name(self) -> &'static str {
        match self {
            Self::CarouselContainer => "carousel-container",
            Self::CarouselWrapper => "carousel-wrapper",
            Self::Slide => "slide",
            Self::PlainGridContainer => "plain-grid-container",
            Self::PlainGridItem => "plain-grid-item",
            Self::LiveRegionNotification => "live-region",
        }
    }
}

/// Class-signature matcher built from the configured marker classes
#[derive(Debug, Clone)]
pub struct Signatures {
    markers: MarkerClasses,
}

impl Signatures {
    pub fn new(markers: MarkerClasses) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &MarkerClasses {
        &self.markers
    }

    fn is_loop_grid(&self, tree: &DomTree, id: NodeId) -> bool {
        tree.element(id).is_some_and(|e| {
            e.has_class(&self.markers.loop_container) && e.has_class(&self.markers.grid)
        })
    }

    /// Carousel marker + loop container marker + grid marker
    pub fn is_carousel_container(&self, tree: &DomTree, id: NodeId) -> bool {
        self.is_loop_grid(tree, id) && tree.has_class(id, &self.markers.carousel)
    }

    /// Loop container + grid markers without the carousel marker
    pub fn is_plain_grid_container(&self, tree: &DomTree, id: NodeId) -> bool {
        self.is_loop_grid(tree, id) && !tree.has_class(id, &self.markers.carousel)
    }

    pub fn is_wrapper(&self, tree: &DomTree, id: NodeId) -> bool {
        tree.has_class(id, &self.markers.wrapper)
    }

    pub fn is_slide(&self, tree: &DomTree, id: NodeId) -> bool {
        tree.has_class(id, &self.markers.slide)
    }

    pub fn is_notification(&self, tree: &DomTree, id: NodeId) -> bool {
        tree.has_class(id, &self.markers.notification)
    }

    /// Top-level classification. Carousel and plain grid containers are
    /// mutually exclusive because one requires the carousel marker and the
    /// other forbids it.
    pub fn classify_container(&self, tree: &DomTree, id: NodeId) -> Option<StructuralPattern> {
        if self.is_carousel_container(tree, id) {
            Some(StructuralPattern::CarouselContainer)
        } else if self.is_plain_grid_container(tree, id) {
            Some(StructuralPattern::PlainGridContainer)
        } else {
            None
        }
    }

    /// The container's slide-holding element: its first direct child with the
    /// wrapper marker
    pub fn wrapper_of(&self, tree: &DomTree, container: NodeId) -> Option<NodeId> {
        tree.element_children(container)
            .find(|(_, elem)| elem.has_class(&self.markers.wrapper))
            .map(|(id, _)| id)
    }

    /// Direct children of the wrapper carrying the slide marker, in order
    pub fn slides_of(&self, tree: &DomTree, wrapper: NodeId) -> Vec<NodeId> {
        tree.element_children(wrapper)
            .filter(|(_, elem)| elem.has_class(&self.markers.slide))
            .map(|(id, _)| id)
            .collect()
    }
}
