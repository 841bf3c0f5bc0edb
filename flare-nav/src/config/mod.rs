//! Unified configuration loading for flare-nav.
//!
//! Loads all engine settings from a single YAML file with sensible defaults.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flare_nav::config::NavConfig;
//!
//! // Load from default path (configs/navigation.yaml)
//! let config = NavConfig::load_default()?;
//!
//! // Or use built-in defaults (no file needed)
//! let config = NavConfig::default();
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`SignalConfig`] | tx power, path-loss exponent, smoothing |
//! | [`CalibrationConfig`] | sector layout and required coverage |
//! | [`TrackingConfig`] | step detection and stride length |
//! | [`GuidanceConfig`] | hot/cold windows and obstacle hysteresis |
//! | [`HeatMapConfig`] | cell size, classification, A* settings |
//! | [`SessionConfig`] | recording, anchors, planner interval |
//!
//! ## Example YAML
//!
//! ```yaml
//! signal:
//!   tx_power: -59.0
//!   path_loss_exponent: 2.5   # light indoor clutter
//!   ema_alpha: 0.3
//!
//! calibration:
//!   layout: octants           # or "fine" (12 x 30°)
//!   min_sectors: 6
//!
//! tracking:
//!   step_threshold: 1.15      # g
//!   step_cooldown_ms: 300
//!   step_length_cm: 65.0
//!
//! heatmap:
//!   cell_size_cm: 100.0
//!   heuristic: manhattan      # or "octile"
//! ```

mod calibration;
mod defaults;
mod error;
mod guidance;
mod heatmap;
mod navigation;
mod session;
mod signal;
mod tracking;

pub use calibration::CalibrationConfig;
pub use error::ConfigError;
pub use guidance::GuidanceConfig;
pub use heatmap::HeatMapConfig;
pub use navigation::{DEFAULT_CONFIG_PATH, NavConfig};
pub use session::SessionConfig;
pub use signal::SignalConfig;
pub use tracking::TrackingConfig;
