//! Runtime
//!
//! Wires the Normalizer, Change Scheduler and Lifecycle Trigger to a page.
//! Host callbacks never call the Normalizer directly: events become trigger
//! actions, mutation records become scheduler decisions, and the frame
//! callback runs the one pass the scheduler asked for.

use std::collections::HashMap;

use looparia_dom::{NodeId, ObserverId};

use crate::boundary::Boundary;
use crate::config::Config;
use crate::host::Page;
use crate::lifecycle::{LifecycleTrigger, PassOrigin, TriggerAction};
use crate::normalizer::{Normalizer, PassReport};
use crate::pattern::Signatures;
use crate::scheduler::{ChangeScheduler, ScheduleDecision, SchedulerState};
use crate::AriaError;

/// Runtime counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Passes run, any origin
    pub passes: u64,
    pub lifecycle_passes: u64,
    pub frame_passes: u64,
    /// Attribute writes across all passes
    pub writes: u64,
    pub swallowed_errors: u64,
    pub frames_requested: u64,
    /// Qualifying mutations absorbed by an already pending frame
    pub coalesced: u64,
    by_origin: HashMap<PassOrigin, u64>,
}

impl RuntimeStats {
    /// Passes run for `origin`
    pub fn passes_from(&self, origin: PassOrigin) -> u64 {
        self.by_origin.get(&origin).copied().unwrap_or(0)
    }
}

/// What one tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Host events delivered
    pub events: usize,
    /// Normalization passes run
    pub passes: usize,
    /// Whether the frame callback ran a pass
    pub frame_ran: bool,
}

/// The installed normalizer for one page view
#[derive(Debug)]
pub struct AriaFix {
    config: Config,
    normalizer: Normalizer,
    scheduler: ChangeScheduler,
    trigger: LifecycleTrigger,
    observer: ObserverId,
    boundary: Boundary,
    stats: RuntimeStats,
    last_report: Option<PassReport>,
}

impl AriaFix {
    /// Install on `page`. Runs the first pass right away when the document
    /// is already parsed; otherwise it waits for DOMContentLoaded.
    pub fn initialize(page: &mut Page, config: Config) -> Result<Self, AriaError> {
        config.validate()?;

        let tree = page.document_mut().tree_mut();
        let root = tree.root();
        let observer = tree.observe(root, ChangeScheduler::observer_init())?;

        let (trigger, immediate) =
            LifecycleTrigger::install(config.lifecycle.clone(), page.document().ready_state());

        let mut fix = Self {
            normalizer: Normalizer::new(Signatures::new(config.markers.clone())),
            config,
            scheduler: ChangeScheduler::new(),
            trigger,
            observer,
            boundary: Boundary::new(),
            stats: RuntimeStats::default(),
            last_report: None,
        };
        tracing::info!(
            ready_state = ?page.document().ready_state(),
            "aria normalizer installed"
        );

        if let Some(origin) = immediate {
            fix.run_pass(page, origin);
        }
        Ok(fix)
    }

    /// One turn of the host event loop
    pub fn tick(&mut self, page: &mut Page) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        while let Some(event) = page.next_event() {
            outcome.events += 1;
            for action in self.trigger.on_event(&event) {
                match action {
                    TriggerAction::RegisterHooks => {
                        let trigger = &self.trigger;
                        self.boundary
                            .run("register-hooks", || trigger.register_hooks(page.frontend_hooks_mut()));
                    }
                    TriggerAction::Normalize(origin) => {
                        self.run_pass(page, origin);
                        outcome.passes += 1;
                    }
                }
            }
        }

        self.deliver_records(page);

        if page.take_frame() {
            if self.scheduler.begin_frame() {
                self.run_pass(page, PassOrigin::Frame);
                outcome.passes += 1;
                outcome.frame_ran = true;
            }
            self.scheduler.end_frame();
            // The pass's own writes; at most one more frame comes of these.
            self.deliver_records(page);
        }

        outcome
    }

    /// Tick until nothing is pending, at most `max_settle_ticks` times.
    /// Returns the ticks spent, or `None` if the page never settled.
    pub fn run_until_idle(&mut self, page: &mut Page) -> Option<u32> {
        let limit = self.config.scheduler.max_settle_ticks;
        let mut ticks = 0;
        while !self.is_idle(page) {
            if ticks == limit {
                tracing::warn!(limit, "page did not settle");
                return None;
            }
            self.tick(page);
            ticks += 1;
        }
        Some(ticks)
    }

    /// Nothing queued: no host events, mutation records or frame callback
    pub fn is_idle(&self, page: &Page) -> bool {
        !page.has_pending_events()
            && !page.frame_pending()
            && !page.document().tree().has_pending_records(self.observer)
    }

    /// Stop watching the page
    pub fn disconnect(self, page: &mut Page) {
        page.document_mut().tree_mut().disconnect(self.observer);
        tracing::debug!(passes = self.stats.passes, "aria normalizer disconnected");
    }

    pub fn stats(&self) -> RuntimeStats {
        let scheduler = self.scheduler.stats();
        RuntimeStats {
            swallowed_errors: self.boundary.swallowed(),
            frames_requested: scheduler.frames_requested,
            coalesced: scheduler.coalesced,
            ..self.stats.clone()
        }
    }

    /// Report of the most recent pass
    pub fn last_report(&self) -> Option<&PassReport> {
        self.last_report.as_ref()
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn run_pass(&mut self, page: &mut Page, origin: PassOrigin) {
        let normalizer = &self.normalizer;
        let tree = page.document_mut().tree_mut();
        let report = self.boundary.run(origin.name(), || {
            let report = normalizer.normalize(tree, NodeId::ROOT)?;
            Ok(report)
        });

        self.stats.passes += 1;
        *self.stats.by_origin.entry(origin).or_default() += 1;
        if origin == PassOrigin::Frame {
            self.stats.frame_passes += 1;
        } else {
            self.stats.lifecycle_passes += 1;
        }

        if let Some(report) = report {
            tracing::debug!(origin = origin.name(), writes = report.writes, "pass complete");
            self.stats.writes += report.writes as u64;
            self.last_report = Some(report);
        }
    }

    fn deliver_records(&mut self, page: &mut Page) {
        let tree = page.document_mut().tree_mut();
        let records = tree.take_records(self.observer);
        if records.is_empty() {
            return;
        }
        let decision = self.scheduler.notify(&records, tree);
        if decision == ScheduleDecision::RequestFrame {
            page.request_animation_frame();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use looparia_dom::Document;

    fn page(html: &str) -> Page {
        Page::new(looparia_html::parse(html).unwrap())
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut page = page("<div></div>");
        let mut config = Config::default();
        config.scheduler.max_settle_ticks = 0;
        assert!(matches!(
            AriaFix::initialize(&mut page, config),
            Err(AriaError::Config(_))
        ));
    }

    #[test]
    fn test_loading_document_waits_for_parse() {
        let mut page = page(r#"<div class="swiper-notification"></div>"#);
        let mut fix = AriaFix::initialize(&mut page, Config::default()).unwrap();
        assert_eq!(fix.stats().passes, 0);

        page.finish_parsing();
        let outcome = fix.tick(&mut page);
        assert_eq!(outcome.events, 1);
        assert_eq!(fix.stats().passes_from(PassOrigin::DomContentLoaded), 1);
    }

    #[test]
    fn test_parsed_document_runs_immediately() {
        let mut doc = Document::new("about:blank");
        doc.set_ready_state(looparia_dom::ReadyState::Interactive);
        let mut page = Page::new(doc);
        let fix = AriaFix::initialize(&mut page, Config::default()).unwrap();
        assert_eq!(fix.stats().passes_from(PassOrigin::Install), 1);
        assert!(fix.last_report().is_some_and(PassReport::is_noop));
    }

    /// Settled carousel page whose container role was then clobbered, so
    /// settling again takes two ticks
    fn clobbered_carousel(max_settle_ticks: u32) -> (Page, AriaFix) {
        let mut page = page(
            r#"<div class="swiper elementor-loop-container elementor-grid" role="list"></div>"#,
        );
        page.finish_parsing();
        let mut config = Config::default();
        config.scheduler.max_settle_ticks = max_settle_ticks;
        let mut fix = AriaFix::initialize(&mut page, config).unwrap();
        while !fix.is_idle(&page) {
            fix.tick(&mut page);
        }

        let view = page.document().tree();
        let container = view.descendants(NodeId::ROOT).find(|&id| view.has_class(id, "swiper")).unwrap();
        page.document_mut()
            .tree_mut()
            .set_attribute(container, "role", "list")
            .unwrap();
        (page, fix)
    }

    #[test]
    fn test_settle_on_last_allowed_tick_is_reported() {
        let (mut page, mut fix) = clobbered_carousel(2);
        assert_eq!(fix.run_until_idle(&mut page), Some(2));
        assert!(fix.is_idle(&page));
    }

    #[test]
    fn test_unsettled_page_is_reported() {
        let (mut page, mut fix) = clobbered_carousel(1);
        assert_eq!(fix.run_until_idle(&mut page), None);
        assert!(!fix.is_idle(&page));
    }

    #[test]
    fn test_idle_page_takes_no_ticks() {
        let (mut page, mut fix) = clobbered_carousel(2);
        fix.run_until_idle(&mut page);
        assert_eq!(fix.run_until_idle(&mut page), Some(0));
    }

    #[test]
    fn test_disconnect_stops_observing() {
        let mut page = page("<main></main>");
        page.finish_parsing();
        let mut fix = AriaFix::initialize(&mut page, Config::default()).unwrap();
        fix.run_until_idle(&mut page);
        fix.disconnect(&mut page);

        let body = page.document().body();
        page.inject_html(body, "<div></div>").unwrap();
        assert!(!page.frame_pending());
    }
}
