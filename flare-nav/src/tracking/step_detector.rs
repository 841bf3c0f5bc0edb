//! Threshold + cooldown step detection.

use crate::core::AccelSample;

/// Detects steps from jumps in accelerometer magnitude.
#[derive(Clone, Debug)]
pub struct StepDetector {
    threshold: f64,
    cooldown_ms: u64,
    prev_magnitude: Option<f64>,
    last_step_ms: Option<u64>,
}

impl StepDetector {
    /// Create a detector.
    ///
    /// `threshold` is the minimum magnitude change between consecutive
    /// samples (g), `cooldown_ms` the minimum time between steps.
    pub fn new(threshold: f64, cooldown_ms: u64) -> Self {
        Self {
            threshold,
            cooldown_ms,
            prev_magnitude: None,
            last_step_ms: None,
        }
    }

    /// Feed one sample. Returns true if it completes a step.
    pub fn on_sample(&mut self, sample: &AccelSample) -> bool {
        let magnitude = sample.magnitude();
        if !magnitude.is_finite() {
            return false;
        }

        let Some(prev) = self.prev_magnitude.replace(magnitude) else {
            return false;
        };

        if (magnitude - prev).abs() <= self.threshold {
            return false;
        }

        let cooled_down = match self.last_step_ms {
            None => true,
            Some(last) => sample.timestamp_ms.saturating_sub(last) > self.cooldown_ms,
        };
        if !cooled_down {
            return false;
        }

        self.last_step_ms = Some(sample.timestamp_ms);
        true
    }

    /// Time of the last detected step
    pub fn last_step_ms(&self) -> Option<u64> {
        self.last_step_ms
    }

    pub fn reset(&mut self) {
        self.prev_magnitude = None;
        self.last_step_ms = None;
    }
}
