//! Normalization scenarios over parsed markup
//!
//! Fixtures mirror what the loop-grid and carousel libraries render.

use looparia::rules::{DISALLOWED_ROLES, is_disallowed_role};
use looparia::{MarkerClasses, Normalizer, Signatures};
use looparia_dom::{Document, DomTree, MutationObserverInit, NodeId};
use looparia_html::parse;

const CAROUSEL: &str = r#"
    <div class="elementor-loop-container elementor-grid swiper" role="list">
        <div class="swiper-wrapper" role="list">
            <div class="swiper-slide" role="listitem">One</div>
            <div class="swiper-slide" role="listitem">Two</div>
            <div class="swiper-slide" role="listitem">Three</div>
        </div>
        <span class="swiper-notification"></span>
    </div>
"#;

const PLAIN_GRID: &str = r#"
    <div class="elementor-loop-container elementor-grid" role="list">
        <div class="e-loop-item" role="listitem">One</div>
        <div class="e-loop-item" role="listitem">Two</div>
    </div>
"#;

fn normalizer() -> Normalizer {
    Normalizer::new(Signatures::new(MarkerClasses::default()))
}

fn by_class(tree: &DomTree, class: &str) -> Vec<NodeId> {
    tree.descendants(NodeId::ROOT)
        .filter(|&id| tree.has_class(id, class))
        .collect()
}

fn first(tree: &DomTree, class: &str) -> NodeId {
    by_class(tree, class)[0]
}

/// Every element's attributes, in document order
fn snapshot(doc: &Document) -> Vec<(NodeId, Vec<(String, String)>)> {
    let tree = doc.tree();
    tree.descendants(NodeId::ROOT)
        .filter_map(|id| {
            let elem = tree.element(id)?;
            let attrs = elem
                .attrs
                .iter()
                .map(|a| (a.name.clone(), a.value.clone()))
                .collect();
            Some((id, attrs))
        })
        .collect()
}

#[test]
fn test_carousel_from_list_markup() {
    let mut doc = parse(CAROUSEL).unwrap();
    let report = normalizer().normalize(doc.tree_mut(), NodeId::ROOT).unwrap();
    let tree = doc.tree();

    assert_eq!(report.carousels, 1);
    assert_eq!(report.slides, 3);

    let container = first(tree, "swiper");
    assert_eq!(tree.get_attribute(container, "role"), Some("group"));
    assert_eq!(tree.get_attribute(container, "aria-roledescription"), Some("carousel"));

    let wrapper = first(tree, "swiper-wrapper");
    assert_eq!(tree.get_attribute(wrapper, "role"), Some("presentation"));
    assert!(!tree.has_attribute(wrapper, "aria-roledescription"));

    let slides = by_class(tree, "swiper-slide");
    assert_eq!(slides.len(), 3);
    for (i, &slide) in slides.iter().enumerate() {
        assert_eq!(tree.get_attribute(slide, "role"), Some("group"));
        assert_eq!(tree.get_attribute(slide, "aria-roledescription"), Some("slide"));
        let label = format!("Slide {} of 3", i + 1);
        assert_eq!(tree.get_attribute(slide, "aria-label"), Some(label.as_str()));
    }
}

#[test]
fn test_plain_grid_loses_list_semantics() {
    let mut doc = parse(PLAIN_GRID).unwrap();
    let report = normalizer().normalize(doc.tree_mut(), NodeId::ROOT).unwrap();
    let tree = doc.tree();

    assert_eq!(report.plain_grids, 1);
    assert_eq!(report.grid_items, 2);
    assert!(!tree.has_attribute(first(tree, "elementor-grid"), "role"));
    for item in by_class(tree, "e-loop-item") {
        assert!(!tree.has_attribute(item, "role"));
    }
}

#[test]
fn test_bare_notification_becomes_status() {
    let mut doc = parse(r#"<div class="swiper-notification"></div>"#).unwrap();
    normalizer().normalize(doc.tree_mut(), NodeId::ROOT).unwrap();
    let tree = doc.tree();

    let note = first(tree, "swiper-notification");
    assert_eq!(tree.get_attribute(note, "role"), Some("status"));
    assert_eq!(tree.get_attribute(note, "aria-live"), Some("polite"));
    assert_eq!(tree.get_attribute(note, "aria-atomic"), Some("true"));
}

#[test]
fn test_notification_left_in_plain_grid_becomes_status() {
    let html = r#"
        <div class="elementor-loop-container elementor-grid" role="list">
            <div class="e-loop-item" role="listitem">One</div>
            <span class="swiper-notification"></span>
        </div>
    "#;
    let mut doc = parse(html).unwrap();
    let n = normalizer();
    let report = n.normalize(doc.tree_mut(), NodeId::ROOT).unwrap();
    let tree = doc.tree();

    assert_eq!(report.notifications, 1);
    let note = first(tree, "swiper-notification");
    assert_eq!(tree.get_attribute(note, "role"), Some("status"));
    assert_eq!(tree.get_attribute(note, "aria-live"), Some("polite"));
    assert_eq!(tree.get_attribute(note, "aria-atomic"), Some("true"));
    assert!(!tree.has_attribute(first(tree, "e-loop-item"), "role"));

    assert!(n.normalize(doc.tree_mut(), NodeId::ROOT).unwrap().is_noop());
}

#[test]
fn test_grid_item_keeps_allowed_role() {
    let html = r#"
        <div class="elementor-loop-container elementor-grid">
            <article class="e-loop-item" role="article">One</article>
            <div class="e-loop-item" role="region menuitem">Two</div>
        </div>
    "#;
    let mut doc = parse(html).unwrap();
    normalizer().normalize(doc.tree_mut(), NodeId::ROOT).unwrap();
    let tree = doc.tree();

    let items = by_class(tree, "e-loop-item");
    assert_eq!(tree.get_attribute(items[0], "role"), Some("article"));
    assert!(!tree.has_attribute(items[1], "role"));
}

#[test]
fn test_second_pass_is_silent() {
    let html = format!("{CAROUSEL}{PLAIN_GRID}<p class=\"swiper-notification\" role=\"alert\"></p>");
    let mut doc = parse(&html).unwrap();
    let n = normalizer();

    let first_pass = n.normalize(doc.tree_mut(), NodeId::ROOT).unwrap();
    assert!(!first_pass.is_noop());
    let after_first = snapshot(&doc);

    let observer = doc
        .tree_mut()
        .observe(
            NodeId::ROOT,
            MutationObserverInit {
                attributes: true,
                subtree: true,
                ..Default::default()
            },
        )
        .unwrap();
    let second_pass = n.normalize(doc.tree_mut(), NodeId::ROOT).unwrap();

    assert!(second_pass.is_noop());
    assert_eq!(snapshot(&doc), after_first);
    assert!(doc.tree_mut().take_records(observer).is_empty());
}

#[test]
fn test_no_disallowed_role_survives() {
    let html = r#"
        <div class="swiper elementor-loop-container elementor-grid" role="menu tablist">
            <div class="swiper-wrapper" role="tree">
                <div class="swiper-slide" role="tab">A</div>
                <div class="swiper-slide" role="option">B</div>
            </div>
        </div>
        <div class="elementor-loop-container elementor-grid" role="table">
            <div role="row">A</div>
            <div role="gridcell listbox">B</div>
        </div>
    "#;
    let mut doc = parse(html).unwrap();
    normalizer().normalize(doc.tree_mut(), NodeId::ROOT).unwrap();
    let tree = doc.tree();

    let checked: Vec<NodeId> = tree
        .descendants(NodeId::ROOT)
        .filter(|&id| tree.element(id).is_some())
        .filter(|&id| !["html", "head", "body"].contains(&tree.element(id).map_or("", |e| e.tag.as_str())))
        .collect();
    assert_eq!(checked.len(), 7);
    for id in checked {
        if let Some(role) = tree.get_attribute(id, "role") {
            assert!(!is_disallowed_role(role), "{id} kept role {role:?}");
            assert!(!DISALLOWED_ROLES.contains(&role));
        }
    }
}

#[test]
fn test_carousel_and_plain_grid_never_overlap() {
    let html = format!("{CAROUSEL}{PLAIN_GRID}");
    let doc = parse(&html).unwrap();
    let tree = doc.tree();
    let sig = Signatures::new(MarkerClasses::default());

    let mut carousels = 0;
    let mut grids = 0;
    for id in tree.descendants(NodeId::ROOT) {
        let carousel = sig.is_carousel_container(tree, id);
        let grid = sig.is_plain_grid_container(tree, id);
        assert!(!(carousel && grid));
        carousels += carousel as usize;
        grids += grid as usize;
    }
    assert_eq!((carousels, grids), (1, 1));
}

#[test]
fn test_slide_labels_follow_current_count() {
    let mut doc = parse(CAROUSEL).unwrap();
    let n = normalizer();
    n.normalize(doc.tree_mut(), NodeId::ROOT).unwrap();

    let wrapper = first(doc.tree(), "swiper-wrapper");
    let added = looparia_html::parse_into(
        r#"<div class="swiper-slide">Four</div>"#,
        doc.tree_mut(),
        wrapper,
    )
    .unwrap();
    assert_eq!(added.len(), 1);

    n.normalize(doc.tree_mut(), NodeId::ROOT).unwrap();
    let tree = doc.tree();
    let labels: Vec<&str> = by_class(tree, "swiper-slide")
        .into_iter()
        .filter_map(|id| tree.get_attribute(id, "aria-label"))
        .collect();
    assert_eq!(labels, ["Slide 1 of 4", "Slide 2 of 4", "Slide 3 of 4", "Slide 4 of 4"]);
}

#[test]
fn test_scoped_pass_leaves_siblings_alone() {
    let html = format!("{CAROUSEL}{PLAIN_GRID}");
    let mut doc = parse(&html).unwrap();
    let grid = by_class(doc.tree(), "elementor-grid")
        .into_iter()
        .find(|&id| !doc.tree().has_class(id, "swiper"))
        .unwrap();

    normalizer().normalize(doc.tree_mut(), grid).unwrap();
    let tree = doc.tree();
    assert!(!tree.has_attribute(grid, "role"));
    assert_eq!(tree.get_attribute(first(tree, "swiper"), "role"), Some("list"));
}
