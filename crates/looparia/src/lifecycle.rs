//! Lifecycle Trigger
//!
//! Decides when page readiness and UI-library signals call for a full
//! document pass. Every hook is best-effort: without the library's hook API
//! the parse-time and load-time passes still run.

use looparia_dom::ReadyState;

use crate::config::LifecycleConfig;
use crate::host::{FrontendHooks, HostEvent};
use crate::AriaError;

/// Why a pass ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassOrigin {
    /// `initialize` on an already parsed document
    Install,
    DomContentLoaded,
    Load,
    FrontendInit,
    ElementReady,
    /// Coalesced mutation frame
    Frame,
}

impl PassOrigin {
    pub fn name(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::DomContentLoaded => "dom-content-loaded",
            Self::Load => "load",
            Self::FrontendInit => "frontend-init",
            Self::ElementReady => "element-ready",
            Self::Frame => "frame",
        }
    }
}

/// Work the runtime should do in response to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    /// Subscribe to the configured widget-ready hooks
    RegisterHooks,
    /// Normalize the whole document
    Normalize(PassOrigin),
}

#[derive(Debug)]
pub struct LifecycleTrigger {
    config: LifecycleConfig,
    parsed: bool,
    loaded: bool,
    frontend_initialized: bool,
}

impl LifecycleTrigger {
    /// Install against a document in `ready_state`. Returns the trigger and
    /// the pass to run right away, if parsing is already over.
    pub fn install(config: LifecycleConfig, ready_state: ReadyState) -> (Self, Option<PassOrigin>) {
        let parsed = ready_state != ReadyState::Loading;
        let trigger = Self {
            config,
            parsed,
            loaded: ready_state == ReadyState::Complete,
            frontend_initialized: false,
        };
        (trigger, parsed.then_some(PassOrigin::Install))
    }

    pub fn on_event(&mut self, event: &HostEvent) -> Vec<TriggerAction> {
        match event {
            HostEvent::DomContentLoaded if !self.parsed => {
                self.parsed = true;
                vec![TriggerAction::Normalize(PassOrigin::DomContentLoaded)]
            }
            HostEvent::Load if !self.loaded => {
                self.loaded = true;
                if self.config.run_on_load {
                    vec![TriggerAction::Normalize(PassOrigin::Load)]
                } else {
                    Vec::new()
                }
            }
            HostEvent::Custom(name)
                if *name == self.config.frontend_init_event && !self.frontend_initialized =>
            {
                self.frontend_initialized = true;
                vec![
                    TriggerAction::RegisterHooks,
                    TriggerAction::Normalize(PassOrigin::FrontendInit),
                ]
            }
            HostEvent::HookAction { hook, .. } if self.config.ready_hooks.contains(hook) => {
                vec![TriggerAction::Normalize(PassOrigin::ElementReady)]
            }
            _ => Vec::new(),
        }
    }

    /// Subscribe the configured widget-ready hooks on the library's registry
    pub fn register_hooks(&self, hooks: Option<&mut FrontendHooks>) -> Result<usize, AriaError> {
        let hooks = hooks.ok_or_else(|| {
            AriaError::HookUnavailable(format!(
                "no hook registry after `{}`",
                self.config.frontend_init_event
            ))
        })?;
        for hook in &self.config.ready_hooks {
            hooks.add_action(hook);
        }
        tracing::debug!(count = self.config.ready_hooks.len(), "registered widget-ready hooks");
        Ok(self.config.ready_hooks.len())
    }
}
