//! RSSI smoothing: EMA and half-life weighting.

use std::collections::VecDeque;

use log::trace;
use serde::{Deserialize, Serialize};

/// Exponential moving average step.
///
/// The first sample passes through unchanged.
#[inline]
pub fn smooth(new_rssi: f64, prev_smoothed: Option<f64>, alpha: f64) -> f64 {
    match prev_smoothed {
        None => new_rssi,
        Some(prev) => alpha * new_rssi + (1.0 - alpha) * prev,
    }
}

/// A reading with its capture time, for time-weighted smoothing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedRssi {
    /// RSSI (dBm)
    pub rssi: f64,
    /// Capture time (ms)
    pub timestamp_ms: u64,
}

impl TimedRssi {
    pub fn new(rssi: f64, timestamp_ms: u64) -> Self {
        Self { rssi, timestamp_ms }
    }
}

/// Half-life weighted mean of a reading history (oldest first).
///
/// The newest reading weighs 1.0; every older reading weighs
/// `exp(-age_s / half_life_s)` where age is measured against `now_ms`.
/// Returns `None` for an empty history.
pub fn weighted_smooth(history: &[TimedRssi], now_ms: u64, half_life_s: f64) -> Option<f64> {
    let (current, prior) = history.split_last()?;

    let mut weighted_sum = current.rssi;
    let mut weight_total = 1.0;

    for reading in prior {
        let age_s = now_ms.saturating_sub(reading.timestamp_ms) as f64 / 1000.0;
        let weight = (-age_s / half_life_s).exp();
        if weight.is_finite() {
            weighted_sum += reading.rssi * weight;
            weight_total += weight;
        }
    }

    Some(weighted_sum / weight_total)
}

/// Stateful EMA for the active target.
///
/// Non-finite readings are skipped and the last value is held, so gaps and
/// garbage in the radio stream never clear the estimate.
#[derive(Clone, Debug)]
pub struct SignalSmoother {
    alpha: f64,
    value: Option<f64>,
}

impl SignalSmoother {
    /// Create an empty smoother
    pub fn new(alpha: f64) -> Self {
        Self { alpha, value: None }
    }

    /// Feed a reading and return the smoothed value
    pub fn push(&mut self, rssi: f64) -> Option<f64> {
        if !rssi.is_finite() {
            trace!("Skipping non-finite rssi {}", rssi);
            return self.value;
        }
        let next = smooth(rssi, self.value, self.alpha);
        self.value = Some(next);
        self.value
    }

    /// Current smoothed value
    #[inline]
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Forget the estimate (target changed)
    pub fn reset(&mut self) {
        self.value = None;
    }
}

/// Bounded history of timed readings (oldest evicted first).
#[derive(Clone, Debug)]
pub struct SignalHistory {
    readings: VecDeque<TimedRssi>,
    capacity: usize,
}

impl SignalHistory {
    /// Create with a fixed capacity (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a reading, evicting the oldest when full
    pub fn push(&mut self, reading: TimedRssi) {
        if !reading.rssi.is_finite() {
            return;
        }
        if self.readings.len() == self.capacity {
            self.readings.pop_front();
        }
        self.readings.push_back(reading);
    }

    /// Half-life weighted mean relative to `now_ms`
    pub fn weighted(&mut self, now_ms: u64, half_life_s: f64) -> Option<f64> {
        weighted_smooth(self.readings.make_contiguous(), now_ms, half_life_s)
    }

    /// Most recent reading
    pub fn latest(&self) -> Option<&TimedRssi> {
        self.readings.back()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_first_sample_passes_through() {
        assert_eq!(smooth(-50.0, None, 0.3), -50.0);
    }

    #[test]
    fn test_smooth_ema() {
        assert!((smooth(-50.0, Some(-60.0), 0.3) - -57.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_smooth_empty() {
        assert_eq!(weighted_smooth(&[], 0, 10.0), None);
    }

    #[test]
    fn test_weighted_smooth_single() {
        let history = [TimedRssi::new(-70.0, 5_000)];
        assert_eq!(weighted_smooth(&history, 5_000, 10.0), Some(-70.0));
    }

    #[test]
    fn test_weighted_smooth_decays_old_readings() {
        // age equal to half_life_s weighs exp(-1)
        let history = [TimedRssi::new(-80.0, 0), TimedRssi::new(-60.0, 10_000)];
        let value = weighted_smooth(&history, 10_000, 10.0).unwrap();
        let w = (-1.0f64).exp();
        let expected = (-60.0 + -80.0 * w) / (1.0 + w);
        assert!((value - expected).abs() < 1e-9);
        // fresher data dominates
        assert!(value > -70.0);
    }

    #[test]
    fn test_smoother_holds_value_across_gaps() {
        let mut smoother = SignalSmoother::new(0.3);
        assert_eq!(smoother.value(), None);
        assert_eq!(smoother.push(-60.0), Some(-60.0));
        assert_eq!(smoother.push(f64::NAN), Some(-60.0));
        let v = smoother.push(-50.0).unwrap();
        assert!((v - -57.0).abs() < 1e-9);
        smoother.reset();
        assert_eq!(smoother.value(), None);
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = SignalHistory::new(3);
        for i in 0..5 {
            history.push(TimedRssi::new(-60.0 - i as f64, i * 1000));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.latest().map(|r| r.rssi), Some(-64.0));
        history.push(TimedRssi::new(f64::NAN, 9_000));
        assert_eq!(history.len(), 3);
    }
}
