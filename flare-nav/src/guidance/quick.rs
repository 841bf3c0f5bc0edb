//! Stateless guidance from two consecutive readings.

use serde::{Deserialize, Serialize};

/// Direction of change between two readings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// No previous reading yet
    Unknown,
    Stable,
    Closer,
    Farther,
}

/// Result of [`quick_guidance`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuickGuidance {
    pub trend: Trend,
    pub message: String,
    pub confidence: f64,
    /// `current - previous`, absent without a previous reading
    pub rssi_change: Option<f64>,
}

/// Compare two readings.
///
/// Changes smaller than `threshold` dB are stable (confidence 0.3); larger
/// ones scale confidence as `min(1, |Δ| / 10)`.
pub fn quick_guidance(current: f64, previous: Option<f64>, threshold: f64) -> QuickGuidance {
    let Some(previous) = previous else {
        return QuickGuidance {
            trend: Trend::Unknown,
            message: "Start moving to calibrate direction".to_string(),
            confidence: 0.0,
            rssi_change: None,
        };
    };

    let change = current - previous;
    let (trend, message, confidence) = if change.abs() < threshold {
        (
            Trend::Stable,
            "Signal stable - try moving in a different direction",
            0.3,
        )
    } else if change > 0.0 {
        (
            Trend::Closer,
            "Getting closer! Keep going this direction",
            (change.abs() / 10.0).min(1.0),
        )
    } else {
        (
            Trend::Farther,
            "Moving away - turn around",
            (change.abs() / 10.0).min(1.0),
        )
    };

    QuickGuidance {
        trend,
        message: message.to_string(),
        confidence,
        rssi_change: Some(change),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_without_previous() {
        let g = quick_guidance(-60.0, None, 3.0);
        assert_eq!(g.trend, Trend::Unknown);
        assert_eq!(g.confidence, 0.0);
        assert_eq!(g.rssi_change, None);
    }

    #[test]
    fn test_stable_below_threshold() {
        let g = quick_guidance(-60.0, Some(-62.0), 3.0);
        assert_eq!(g.trend, Trend::Stable);
        assert_eq!(g.confidence, 0.3);
    }

    #[test]
    fn test_closer_and_farther() {
        let g = quick_guidance(-55.0, Some(-61.0), 3.0);
        assert_eq!(g.trend, Trend::Closer);
        assert!((g.confidence - 0.6).abs() < 1e-12);

        let g = quick_guidance(-80.0, Some(-60.0), 3.0);
        assert_eq!(g.trend, Trend::Farther);
        assert_eq!(g.confidence, 1.0);
    }

    #[test]
    fn test_threshold_boundary_is_significant() {
        let g = quick_guidance(-57.0, Some(-60.0), 3.0);
        assert_eq!(g.trend, Trend::Closer);
    }
}
