//! Signal model configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// RSSI → distance model and smoothing parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Calibrated RSSI at 1 meter (dBm)
    #[serde(default = "defaults::tx_power")]
    pub tx_power: f64,

    /// Path-loss exponent n.
    /// 2.0 free space, 2.5-3.0 light indoor, 3.0-4.0 walls, 4.0-5.0 rubble.
    #[serde(default = "defaults::path_loss_exponent")]
    pub path_loss_exponent: f64,

    /// EMA weight of the newest reading, in (0, 1]
    #[serde(default = "defaults::ema_alpha")]
    pub ema_alpha: f64,

    /// Half-life for time-weighted smoothing (seconds)
    #[serde(default = "defaults::half_life_seconds")]
    pub half_life_seconds: f64,

    /// Timed readings kept for time-weighted smoothing
    #[serde(default = "defaults::signal_history_len")]
    pub history_len: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            tx_power: defaults::tx_power(),
            path_loss_exponent: defaults::path_loss_exponent(),
            ema_alpha: defaults::ema_alpha(),
            half_life_seconds: defaults::half_life_seconds(),
            history_len: defaults::signal_history_len(),
        }
    }
}
