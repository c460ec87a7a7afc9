//! Runtime Configuration

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::ConfigError;

/// Runtime configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Class names the external carousel/grid libraries put on their markup
    pub markers: MarkerClasses,

    /// Lifecycle hooks of the host UI library
    pub lifecycle: LifecycleConfig,

    /// Change scheduler limits
    pub scheduler: SchedulerConfig,

    /// Filter handed to `telemetry::init_logging` when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            markers: MarkerClasses::default(),
            lifecycle: LifecycleConfig::default(),
            scheduler: SchedulerConfig::default(),
            log_filter: "looparia=info".to_string(),
        }
    }
}

impl Config {
    /// Check the structural invariants the normalizer depends on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.markers;
        for (field, class) in [
            ("carousel", &m.carousel),
            ("loop_container", &m.loop_container),
            ("grid", &m.grid),
            ("wrapper", &m.wrapper),
            ("slide", &m.slide),
            ("notification", &m.notification),
        ] {
            if class.is_empty() || class.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidMarker {
                    field,
                    value: class.clone(),
                });
            }
        }

        // Carousel and plain grid containers are told apart only by the
        // carousel marker.
        if m.carousel == m.loop_container || m.carousel == m.grid {
            return Err(ConfigError::AmbiguousCarouselMarker(m.carousel.clone()));
        }

        if self.scheduler.max_settle_ticks == 0 {
            return Err(ConfigError::ZeroSettleTicks);
        }

        if let Err(err) = EnvFilter::try_new(&self.log_filter) {
            return Err(ConfigError::InvalidLogFilter {
                filter: self.log_filter.clone(),
                reason: err.to_string(),
            });
        }
        Ok(())
    }
}

/// Structural signatures consumed from the carousel and loop-grid libraries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerClasses {
    pub carousel: String,
    pub loop_container: String,
    pub grid: String,
    pub wrapper: String,
    pub slide: String,
    pub notification: String,
}

impl Default for MarkerClasses {
    fn default() -> Self {
        Self {
            carousel: "swiper".to_string(),
            loop_container: "elementor-loop-container".to_string(),
            grid: "elementor-grid".to_string(),
            wrapper: "swiper-wrapper".to_string(),
            slide: "swiper-slide".to_string(),
            notification: "swiper-notification".to_string(),
        }
    }
}

/// Named lifecycle signals of the host UI library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Document-level event announcing the frontend finished initializing
    pub frontend_init_event: String,

    /// Widget-ready hook actions to register once the frontend is up
    pub ready_hooks: Vec<String>,

    /// Run a pass after the window load event
    pub run_on_load: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            frontend_init_event: "elementor/frontend/init".to_string(),
            ready_hooks: vec![
                "frontend/element_ready/global".to_string(),
                "frontend/element_ready/loop-grid.default".to_string(),
                "frontend/element_ready/posts.default".to_string(),
                "frontend/element_ready/container".to_string(),
            ],
            run_on_load: true,
        }
    }
}

/// Change scheduler limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Upper bound on ticks `run_until_idle` spends before giving up
    pub max_settle_ticks: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { max_settle_ticks: 8 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lifecycle.ready_hooks.len(), 4);
    }

    #[test]
    fn test_rejects_whitespace_marker() {
        let mut config = Config::default();
        config.markers.slide = "swiper slide".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMarker { field: "slide", .. })
        ));
    }

    #[test]
    fn test_rejects_ambiguous_carousel_marker() {
        let mut config = Config::default();
        config.markers.carousel = config.markers.grid.clone();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::AmbiguousCarouselMarker(_))
        ));
    }

    #[test]
    fn test_rejects_bad_log_filter() {
        let mut config = Config::default();
        config.log_filter = "looparia=loud".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLogFilter { .. })
        ));

        config.log_filter = "looparia=trace,html5ever=warn".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_settle_ticks() {
        let mut config = Config::default();
        config.scheduler.max_settle_ticks = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroSettleTicks)));
    }
}
