//! Main NavConfig, loading and validation.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::calibration::CalibrationConfig;
use super::error::ConfigError;
use super::guidance::GuidanceConfig;
use super::heatmap::HeatMapConfig;
use super::session::SessionConfig;
use super::signal::SignalConfig;
use super::tracking::TrackingConfig;

/// Default location searched by [`NavConfig::load_default`]
pub const DEFAULT_CONFIG_PATH: &str = "configs/navigation.yaml";

/// Full navigation engine configuration loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct NavConfig {
    /// Signal model settings
    #[serde(default)]
    pub signal: SignalConfig,

    /// Direction calibration settings
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Dead-reckoning settings
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Hot/cold guidance settings
    #[serde(default)]
    pub guidance: GuidanceConfig,

    /// Heat map and path planning settings
    #[serde(default)]
    pub heatmap: HeatMapConfig,

    /// Session-level settings
    #[serde(default)]
    pub session: SessionConfig,
}

impl NavConfig {
    /// Load and validate configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&contents)?;
        info!("Loaded navigation config from {}", path.display());
        Ok(config)
    }

    /// Load from the default path, or use built-in defaults if it is absent
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: NavConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let signal = &self.signal;
        if !(signal.path_loss_exponent > 0.0) {
            return invalid("signal.path_loss_exponent must be positive");
        }
        if !(signal.ema_alpha > 0.0 && signal.ema_alpha <= 1.0) {
            return invalid("signal.ema_alpha must be in (0, 1]");
        }
        if !(signal.half_life_seconds > 0.0) {
            return invalid("signal.half_life_seconds must be positive");
        }

        let sectors = self.calibration.layout.sector_count();
        if self.calibration.min_sectors == 0 || self.calibration.min_sectors as usize > sectors {
            return Err(ConfigError::Invalid(format!(
                "calibration.min_sectors must be in 1..={}",
                sectors
            )));
        }

        let tracking = &self.tracking;
        if !(tracking.step_threshold > 0.0) {
            return invalid("tracking.step_threshold must be positive");
        }
        if !(tracking.step_length_cm > 0.0) {
            return invalid("tracking.step_length_cm must be positive");
        }
        if tracking.heading_window == 0 {
            return invalid("tracking.heading_window must be at least 1");
        }

        let guidance = &self.guidance;
        if guidance.octant_window == 0 || guidance.history_len == 0 || guidance.trend_window == 0 {
            return invalid("guidance windows must be at least 1");
        }
        if guidance.confidence_full_samples == 0 {
            return invalid("guidance.confidence_full_samples must be at least 1");
        }
        if guidance.obstacle_threshold_db > guidance.obstacle_clear_threshold_db {
            return invalid("guidance.obstacle_threshold_db must not exceed the clear threshold");
        }

        let heatmap = &self.heatmap;
        if !(heatmap.cell_size_cm > 0.0) {
            return invalid("heatmap.cell_size_cm must be positive");
        }
        if heatmap.max_readings_per_cell == 0 {
            return invalid("heatmap.max_readings_per_cell must be at least 1");
        }

        if self.session.max_anchors < 3 {
            return invalid("session.max_anchors must be at least 3");
        }
        if self.session.settle_readings == 0 {
            return invalid("session.settle_readings must be at least 1");
        }

        Ok(())
    }
}

fn invalid(msg: &str) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(msg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::SectorLayout;
    use crate::heatmap::PathHeuristic;

    #[test]
    fn test_default_config() {
        let config = NavConfig::default();
        assert_eq!(config.signal.tx_power, -59.0);
        assert_eq!(config.signal.ema_alpha, 0.3);
        assert_eq!(config.tracking.step_length_cm, 65.0);
        assert_eq!(config.heatmap.max_readings_per_cell, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let shipped = include_str!("../../../configs/navigation.yaml");
        let config = NavConfig::from_yaml(shipped).unwrap();
        let defaults = NavConfig::default();
        assert_eq!(config.to_yaml().unwrap(), defaults.to_yaml().unwrap());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = NavConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed = NavConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.signal.path_loss_exponent, config.signal.path_loss_exponent);
        assert_eq!(parsed.calibration.layout, config.calibration.layout);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
signal:
  path_loss_exponent: 3.0
calibration:
  layout: fine
  min_sectors: 8
heatmap:
  heuristic: octile
"#;
        let config = NavConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.signal.path_loss_exponent, 3.0);
        assert_eq!(config.signal.tx_power, -59.0);
        assert_eq!(config.calibration.layout, SectorLayout::Fine);
        assert_eq!(config.heatmap.heuristic, PathHeuristic::Octile);
        assert_eq!(config.tracking.step_cooldown_ms, 300);
    }

    #[test]
    fn test_rejects_too_many_required_sectors() {
        let yaml = "calibration:\n  layout: octants\n  min_sectors: 9\n";
        assert!(matches!(
            NavConfig::from_yaml(yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_bad_alpha() {
        let mut config = NavConfig::default();
        config.signal.ema_alpha = 0.0;
        assert!(config.validate().is_err());
        config.signal.ema_alpha = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_settle_readings() {
        let yaml = "session:\n  settle_readings: 0\n";
        assert!(matches!(
            NavConfig::from_yaml(yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            NavConfig::from_yaml("signal: [1, 2"),
            Err(ConfigError::Parse(_))
        ));
    }
}
