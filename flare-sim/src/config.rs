//! Configuration loading for flare-sim
//!
//! One TOML file: a `[scenario]` table for the simulated world and an
//! optional `[navigation]` table holding the engine's `NavConfig`.

use crate::error::{Result, SimError};
use flare_nav::NavConfig;
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub scenario: ScenarioConfig,
    #[serde(default)]
    pub navigation: NavConfig,
}

/// Simulated world and rescuer behaviour
#[derive(Clone, Debug, Deserialize)]
pub struct ScenarioConfig {
    /// Beacon identifier handed to the engine
    #[serde(default = "default_target_id")]
    pub target_id: String,

    /// Victim east offset from the start (cm)
    #[serde(default = "default_victim_x")]
    pub victim_x_cm: f64,

    /// Victim south offset from the start (cm, north is negative)
    #[serde(default = "default_victim_y")]
    pub victim_y_cm: f64,

    /// Victim position is reported to the engine up front
    #[serde(default)]
    pub victim_known: bool,

    /// RSSI noise standard deviation (dB)
    #[serde(default = "default_rssi_noise_db")]
    pub rssi_noise_db: f64,

    /// Compass noise standard deviation (degrees)
    #[serde(default = "default_heading_noise_deg")]
    pub heading_noise_deg: f64,

    /// Stride noise standard deviation (cm)
    #[serde(default = "default_stride_noise_cm")]
    pub stride_noise_cm: f64,

    /// Extra loss when facing directly away from the beacon (dB)
    #[serde(default = "default_body_shadow_db")]
    pub body_shadow_db: f64,

    /// Accelerometer magnitude at a heel strike (g)
    #[serde(default = "default_step_peak_g")]
    pub step_peak_g: f64,

    /// Radio readings while turning through each calibration sector
    #[serde(default = "default_readings_per_sector")]
    pub readings_per_sector: usize,

    /// Radio readings between steps
    #[serde(default = "default_readings_per_step")]
    pub readings_per_step: usize,

    /// Time between radio readings (ms)
    #[serde(default = "default_reading_interval_ms")]
    pub reading_interval_ms: u64,

    /// Step budget before giving up
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Try trilateration every N steps when the victim is not known
    #[serde(default = "default_estimate_every")]
    pub estimate_every_steps: usize,

    /// RNG seed
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Rectangular attenuating obstacles
    #[serde(default)]
    pub walls: Vec<WallConfig>,
}

/// Axis-aligned obstacle in world coordinates (cm)
#[derive(Clone, Debug, Deserialize)]
pub struct WallConfig {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    /// Loss applied when the line of sight crosses the wall (dB)
    #[serde(default = "default_wall_loss_db")]
    pub loss_db: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            target_id: default_target_id(),
            victim_x_cm: default_victim_x(),
            victim_y_cm: default_victim_y(),
            victim_known: false,
            rssi_noise_db: default_rssi_noise_db(),
            heading_noise_deg: default_heading_noise_deg(),
            stride_noise_cm: default_stride_noise_cm(),
            body_shadow_db: default_body_shadow_db(),
            step_peak_g: default_step_peak_g(),
            readings_per_sector: default_readings_per_sector(),
            readings_per_step: default_readings_per_step(),
            reading_interval_ms: default_reading_interval_ms(),
            max_steps: default_max_steps(),
            estimate_every_steps: default_estimate_every(),
            seed: default_seed(),
            walls: Vec::new(),
        }
    }
}

// Default value functions
fn default_target_id() -> String {
    "beacon-1".to_string()
}

fn default_victim_x() -> f64 {
    600.0
}

fn default_victim_y() -> f64 {
    -1200.0
}

fn default_rssi_noise_db() -> f64 {
    2.0
}

fn default_heading_noise_deg() -> f64 {
    5.0
}

fn default_stride_noise_cm() -> f64 {
    4.0
}

fn default_body_shadow_db() -> f64 {
    6.0
}

fn default_step_peak_g() -> f64 {
    2.4
}

fn default_readings_per_sector() -> usize {
    6
}

fn default_readings_per_step() -> usize {
    5
}

fn default_reading_interval_ms() -> u64 {
    100
}

fn default_max_steps() -> usize {
    300
}

fn default_estimate_every() -> usize {
    5
}

fn default_seed() -> u64 {
    42
}

fn default_wall_loss_db() -> f64 {
    12.0
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.navigation.validate()?;

        let s = &self.scenario;
        for (name, value) in [
            ("rssi_noise_db", s.rssi_noise_db),
            ("heading_noise_deg", s.heading_noise_deg),
            ("stride_noise_cm", s.stride_noise_cm),
            ("body_shadow_db", s.body_shadow_db),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::Config(format!(
                    "scenario.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if !s.victim_x_cm.is_finite() || !s.victim_y_cm.is_finite() {
            return Err(SimError::Config("victim position must be finite".into()));
        }
        if s.readings_per_sector == 0 || s.readings_per_step == 0 {
            return Err(SimError::Config(
                "readings_per_sector and readings_per_step must be positive".into(),
            ));
        }
        if s.estimate_every_steps == 0 {
            return Err(SimError::Config("estimate_every_steps must be positive".into()));
        }
        for wall in &s.walls {
            if !(wall.min_x < wall.max_x && wall.min_y < wall.max_y) {
                return Err(SimError::Config(format!(
                    "wall ({}, {})..({}, {}) is empty",
                    wall.min_x, wall.min_y, wall.max_x, wall.max_y
                )));
            }
        }
        Ok(())
    }
}
