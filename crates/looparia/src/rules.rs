//! Rule Table
//!
//! Pure mapping from a matched structural pattern to the attribute plan that
//! normalizes it. Audit tools check exact values, so every string here is
//! part of the contract.

use std::borrow::Cow;

use looparia_dom::{DOMTokenList, ElementData};

use crate::pattern::StructuralPattern;

/// Composite widget roles that demand specific owned children. Carousel and
/// grid markup never provides those children, so these roles are stripped.
pub const DISALLOWED_ROLES: [&str; 8] = [
    "list", "listbox", "menu", "menubar", "tablist", "tree", "grid", "table",
];

/// Roles that are only valid inside one of the composite roles above. Once
/// the container role is gone they would be orphaned, so items lose them too.
pub const OWNED_ROLES: [&str; 12] = [
    "listitem",
    "option",
    "menuitem",
    "menuitemcheckbox",
    "menuitemradio",
    "tab",
    "treeitem",
    "row",
    "gridcell",
    "cell",
    "columnheader",
    "rowheader",
];

/// True if any token of a `role` value is in `DISALLOWED_ROLES` or
/// `OWNED_ROLES`. Matching is ASCII case-insensitive.
pub fn is_disallowed_role(value: &str) -> bool {
    DOMTokenList::from_string(value).any(|token| {
        DISALLOWED_ROLES
            .iter()
            .chain(OWNED_ROLES.iter())
            .any(|role| role.eq_ignore_ascii_case(token))
    })
}

/// Ordinal position of a repeated child among its siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanContext {
    /// Zero-based index
    pub index: usize,
    /// Sibling count at normalization time
    pub total: usize,
}

impl PlanContext {
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }
}

impl Default for PlanContext {
    fn default() -> Self {
        Self { index: 0, total: 1 }
    }
}

/// One attribute operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeOp {
    /// Set `name` to `value`
    Set {
        name: &'static str,
        value: Cow<'static, str>,
    },
    /// Remove `name`
    Remove { name: &'static str },
    /// Remove the whole `role` attribute if any of its tokens is disallowed
    StripDisallowedRole,
}

impl AttributeOp {
    fn set(name: &'static str, value: impl Into<Cow<'static, str>>) -> Self {
        Self::Set {
            name,
            value: value.into(),
        }
    }

    fn remove(name: &'static str) -> Self {
        Self::Remove { name }
    }
}

/// A net attribute change: `Some` sets the value, `None` removes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeWrite {
    pub name: &'static str,
    pub value: Option<String>,
}

/// Ordered attribute operations for one matched element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePlan {
    ops: Vec<AttributeOp>,
}

impl AttributePlan {
    pub fn new(ops: Vec<AttributeOp>) -> Self {
        Self { ops }
    }

    pub fn ops(&self) -> &[AttributeOp] {
        &self.ops
    }

    /// Evaluate the plan against an element's current attributes and return
    /// only the writes that change something, one per attribute, in the order
    /// the attributes are first touched. An element that already satisfies
    /// the plan yields no writes.
    pub fn resolve(&self, element: &ElementData) -> Vec<AttributeWrite> {
        let mut staged: Vec<(&'static str, Option<String>)> = Vec::new();

        fn stage(staged: &mut Vec<(&'static str, Option<String>)>, name: &'static str, value: Option<String>) {
            match staged.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = value,
                None => staged.push((name, value)),
            }
        }

        for op in &self.ops {
            match op {
                AttributeOp::Set { name, value } => stage(&mut staged, *name, Some(value.to_string())),
                AttributeOp::Remove { name } => stage(&mut staged, *name, None),
                AttributeOp::StripDisallowedRole => {
                    let current = match staged.iter().find(|(n, _)| *n == "role") {
                        Some((_, value)) => value.as_deref(),
                        None => element.get_attr("role"),
                    };
                    if current.is_some_and(is_disallowed_role) {
                        stage(&mut staged, "role", None);
                    }
                }
            }
        }

        staged
            .into_iter()
            .filter(|(name, value)| element.get_attr(name) != value.as_deref())
            .map(|(name, value)| AttributeWrite { name, value })
            .collect()
    }

    /// True if applying the plan would change nothing
    pub fn is_satisfied_by(&self, element: &ElementData) -> bool {
        self.resolve(element).is_empty()
    }
}

/// Attribute plan for a pattern. Total over every `StructuralPattern`;
/// `context` only matters for slides.
pub fn plan_for(pattern: StructuralPattern, context: PlanContext) -> AttributePlan {
    use AttributeOp as Op;

    let ops = match pattern {
        StructuralPattern::CarouselContainer => vec![
            Op::StripDisallowedRole,
            Op::set("role", "group"),
            Op::set("aria-roledescription", "carousel"),
        ],
        StructuralPattern::CarouselWrapper => vec![
            Op::StripDisallowedRole,
            Op::set("role", "presentation"),
            Op::remove("aria-roledescription"),
        ],
        StructuralPattern::Slide => vec![
            Op::StripDisallowedRole,
            Op::set("role", "group"),
            Op::set("aria-roledescription", "slide"),
            Op::set(
                "aria-label",
                format!("Slide {} of {}", context.index + 1, context.total),
            ),
        ],
        StructuralPattern::PlainGridContainer => vec![
            Op::remove("role"),
            Op::remove("aria-roledescription"),
        ],
        StructuralPattern::PlainGridItem => vec![Op::StripDisallowedRole],
        StructuralPattern::LiveRegionNotification => vec![
            Op::set("role", "status"),
            Op::set("aria-live", "polite"),
            Op::set("aria-atomic", "true"),
            Op::remove("aria-roledescription"),
        ],
    };
    AttributePlan::new(ops)
}
