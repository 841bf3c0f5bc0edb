//! Log-distance path-loss model.

use log::warn;

use crate::config::SignalConfig;

/// Placeholder distance (meters) returned when the model overflows.
pub const UNKNOWN_DISTANCE: f64 = 999.0;

/// Estimated distance in meters for an RSSI reading, rounded to centimeters.
///
/// A non-negative RSSI is physically impossible for a received signal and is
/// read as "at the transmitter": the result is `0.0`. Non-finite results
/// (overflow, NaN input, zero exponent) yield [`UNKNOWN_DISTANCE`].
pub fn distance_from_rssi(rssi: f64, tx_power: f64, path_loss_exponent: f64) -> f64 {
    if rssi >= 0.0 {
        return 0.0;
    }

    let ratio = (tx_power - rssi) / (10.0 * path_loss_exponent);
    let distance = 10f64.powf(ratio);
    if !distance.is_finite() {
        warn!(
            "Distance undefined for rssi={} tx_power={} n={}",
            rssi, tx_power, path_loss_exponent
        );
        return UNKNOWN_DISTANCE;
    }

    (distance * 100.0).round() / 100.0
}

/// Calibrated path-loss model for one beacon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalModel {
    /// RSSI at 1 meter (dBm)
    pub tx_power: f64,
    /// Path-loss exponent n
    pub path_loss_exponent: f64,
}

impl Default for SignalModel {
    fn default() -> Self {
        Self::from_config(&SignalConfig::default())
    }
}

impl SignalModel {
    /// Create a model with explicit calibration
    pub fn new(tx_power: f64, path_loss_exponent: f64) -> Self {
        Self {
            tx_power,
            path_loss_exponent,
        }
    }

    /// Create from the signal config section
    pub fn from_config(config: &SignalConfig) -> Self {
        Self::new(config.tx_power, config.path_loss_exponent)
    }

    /// Distance in meters for an RSSI reading
    #[inline]
    pub fn distance(&self, rssi: f64) -> f64 {
        distance_from_rssi(rssi, self.tx_power, self.path_loss_exponent)
    }

    /// Distance in centimeters (world units)
    #[inline]
    pub fn distance_cm(&self, rssi: f64) -> f64 {
        self.distance(rssi) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_at_reference_power() {
        assert_eq!(distance_from_rssi(-59.0, -59.0, 2.5), 1.0);
        assert_eq!(distance_from_rssi(-59.0, -59.0, 2.0), 1.0);
    }

    #[test]
    fn test_distance_non_negative_rssi() {
        assert_eq!(distance_from_rssi(0.0, -59.0, 2.0), 0.0);
        assert_eq!(distance_from_rssi(12.0, -59.0, 3.0), 0.0);
    }

    #[test]
    fn test_distance_free_space() {
        // 20 dB below reference with n=2 is one decade
        assert_eq!(distance_from_rssi(-79.0, -59.0, 2.0), 10.0);
        // rounded to centimeters
        let d = distance_from_rssi(-70.0, -59.0, 2.0);
        assert!((d - 3.55).abs() < 1e-9);
    }

    #[test]
    fn test_distance_placeholder_on_overflow() {
        assert_eq!(distance_from_rssi(-1.0e6, -59.0, 2.0), UNKNOWN_DISTANCE);
        assert_eq!(distance_from_rssi(-70.0, -59.0, 0.0), UNKNOWN_DISTANCE);
        assert_eq!(distance_from_rssi(f64::NAN, -59.0, 2.0), UNKNOWN_DISTANCE);
    }

    #[test]
    fn test_model_uses_calibration() {
        let model = SignalModel::new(-65.0, 2.0);
        assert_eq!(model.distance(-65.0), 1.0);
        assert_eq!(model.distance_cm(-85.0), 1000.0);
    }
}
