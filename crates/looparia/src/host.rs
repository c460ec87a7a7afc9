//! Host page model
//!
//! A single-threaded stand-in for the page that hosts the runtime: the live
//! document, the queue of page/library events, one pending animation frame
//! flag, and the UI library's hook registry when that library is present.

use std::collections::VecDeque;

use looparia_dom::{Document, NodeId, ReadyState};

use crate::AriaError;

/// Events the page and its libraries deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Document finished parsing
    DomContentLoaded,
    /// Window finished loading subresources
    Load,
    /// Document-level custom event, e.g. the library's frontend-init signal
    Custom(String),
    /// Widget-ready action fired through the library's hook registry
    HookAction { hook: String, scope: NodeId },
}

/// The UI library's action-hook registry
#[derive(Debug, Clone, Default)]
pub struct FrontendHooks {
    actions: Vec<String>,
}

impl FrontendHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a hook. Re-registering is a no-op.
    pub fn add_action(&mut self, hook: &str) {
        if !self.has_action(hook) {
            self.actions.push(hook.to_string());
        }
    }

    pub fn has_action(&self, hook: &str) -> bool {
        self.actions.iter().any(|a| a == hook)
    }

    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(String::as_str)
    }
}

/// A page view
#[derive(Debug)]
pub struct Page {
    document: Document,
    events: VecDeque<HostEvent>,
    frame_requested: bool,
    frontend: Option<FrontendHooks>,
}

impl Page {
    /// Page without the UI library's hook API
    pub fn new(document: Document) -> Self {
        Self {
            document,
            events: VecDeque::new(),
            frame_requested: false,
            frontend: None,
        }
    }

    /// Page whose UI library exposes a hook registry
    pub fn with_frontend(mut self, hooks: FrontendHooks) -> Self {
        self.frontend = Some(hooks);
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Parsing done: readiness becomes `interactive` and DOMContentLoaded is
    /// queued
    pub fn finish_parsing(&mut self) {
        if self.document.ready_state() == ReadyState::Loading {
            self.document.set_ready_state(ReadyState::Interactive);
            self.events.push_back(HostEvent::DomContentLoaded);
        }
    }

    /// Subresources done: readiness becomes `complete` and load is queued
    pub fn finish_loading(&mut self) {
        self.finish_parsing();
        if self.document.ready_state() != ReadyState::Complete {
            self.document.set_ready_state(ReadyState::Complete);
            self.events.push_back(HostEvent::Load);
        }
    }

    /// Dispatch a document-level custom event
    pub fn dispatch_custom(&mut self, name: &str) {
        self.events.push_back(HostEvent::Custom(name.to_string()));
    }

    /// Have the library announce a ready widget. Only delivered when some
    /// subscriber registered the hook; returns whether it was queued.
    pub fn fire_element_ready(&mut self, hook: &str, scope: NodeId) -> bool {
        let subscribed = self.frontend.as_ref().is_some_and(|f| f.has_action(hook));
        if subscribed {
            self.events.push_back(HostEvent::HookAction {
                hook: hook.to_string(),
                scope,
            });
        }
        subscribed
    }

    /// Insert markup under `parent`, the way AJAX filters and lazy loaders do
    pub fn inject_html(&mut self, parent: NodeId, markup: &str) -> Result<Vec<NodeId>, AriaError> {
        let inserted = looparia_html::parse_into(markup, self.document.tree_mut(), parent)?;
        Ok(inserted)
    }

    pub fn next_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Ask for a callback before the next paint. Returns false if one was
    /// already pending.
    pub fn request_animation_frame(&mut self) -> bool {
        !std::mem::replace(&mut self.frame_requested, true)
    }

    /// Consume the pending frame callback, if any
    pub fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_requested
    }

    pub fn frontend_hooks(&self) -> Option<&FrontendHooks> {
        self.frontend.as_ref()
    }

    pub fn frontend_hooks_mut(&mut self) -> Option<&mut FrontendHooks> {
        self.frontend.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_events_fire_once() {
        let mut page = Page::new(Document::default());
        page.finish_loading();
        page.finish_parsing();
        page.finish_loading();

        assert_eq!(page.next_event(), Some(HostEvent::DomContentLoaded));
        assert_eq!(page.next_event(), Some(HostEvent::Load));
        assert_eq!(page.next_event(), None);
        assert_eq!(page.document().ready_state(), ReadyState::Complete);
    }

    #[test]
    fn test_frame_request_is_single() {
        let mut page = Page::new(Document::default());
        assert!(page.request_animation_frame());
        assert!(!page.request_animation_frame());
        assert!(page.take_frame());
        assert!(!page.take_frame());
    }

    #[test]
    fn test_element_ready_requires_subscription() {
        let mut page = Page::new(Document::default());
        assert!(!page.fire_element_ready("frontend/element_ready/global", NodeId::ROOT));

        let mut hooks = FrontendHooks::new();
        hooks.add_action("frontend/element_ready/global");
        let mut page = page.with_frontend(hooks);
        assert!(page.fire_element_ready("frontend/element_ready/global", NodeId::ROOT));
        assert!(!page.fire_element_ready("frontend/element_ready/container", NodeId::ROOT));
    }
}
