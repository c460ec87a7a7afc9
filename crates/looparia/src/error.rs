//! Error types

use looparia_dom::DomError;

/// Errors surfaced by the normalizer and its entry points. None of them is
/// fatal; the boundary layer logs and discards them.
#[derive(Debug, thiserror::Error)]
pub enum AriaError {
    #[error("DOM operation failed: {0}")]
    Dom(#[from] DomError),

    #[error("markup import failed: {0}")]
    Markup(#[from] looparia_html::ParseError),

    #[error("host hook API unavailable: {0}")]
    HookUnavailable(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("marker class `{field}` must be a single non-empty class name, got {value:?}")]
    InvalidMarker { field: &'static str, value: String },

    #[error("carousel marker `{0}` must differ from the loop and grid markers")]
    AmbiguousCarouselMarker(String),

    #[error("scheduler.max_settle_ticks must be at least 1")]
    ZeroSettleTicks,

    #[error("log filter {filter:?} is invalid: {reason}")]
    InvalidLogFilter { filter: String, reason: String },
}
