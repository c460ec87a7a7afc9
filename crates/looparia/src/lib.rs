//! Looparia
//!
//! Keeps ARIA attributes on carousel and loop-grid markup in a shape that
//! accessibility auditors accept, across the whole life of a page.
//!
//! # Architecture
//!
//! ```text
//! Lifecycle Trigger --+
//!                     +--> Normalizer --> Rule Table --> attribute writes
//! Change Scheduler ---+        ^
//!        ^                     |
//!        +-- mutation records -+
//! ```
//!
//! - `rules`: pure pattern -> attribute plan table
//! - `pattern`: class-signature matchers for the six known shapes
//! - `normalizer`: idempotent pass over a subtree
//! - `scheduler`: coalesces mutations into one pass per animation frame
//! - `lifecycle`: parse, load and widget-ready passes
//! - `runtime`: binds all of the above to a `Page`

pub mod boundary;
pub mod config;
mod error;
pub mod host;
pub mod lifecycle;
pub mod normalizer;
pub mod pattern;
pub mod rules;
pub mod runtime;
pub mod scheduler;
pub mod telemetry;

pub use config::{Config, LifecycleConfig, MarkerClasses, SchedulerConfig};
pub use error::{AriaError, ConfigError};
pub use host::{FrontendHooks, HostEvent, Page};
pub use lifecycle::{LifecycleTrigger, PassOrigin, TriggerAction};
pub use normalizer::{Normalizer, PassReport};
pub use pattern::{Signatures, StructuralPattern};
pub use rules::{AttributeOp, AttributePlan, AttributeWrite, PlanContext, plan_for};
pub use runtime::{AriaFix, RuntimeStats, TickOutcome};
pub use scheduler::{ChangeScheduler, ScheduleDecision, SchedulerState, SchedulerStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the normalizer on a page view. Call once per page.
pub fn initialize(page: &mut Page, config: Config) -> Result<AriaFix, AriaError> {
    AriaFix::initialize(page, config)
}
