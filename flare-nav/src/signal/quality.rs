//! Signal quality bands for display.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed-bracket RSSI bands: a boundary value belongs to the stronger band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalQuality {
    /// ≥ -50 dBm
    Excellent,
    /// ≥ -60 dBm
    Good,
    /// ≥ -70 dBm
    Fair,
    /// ≥ -80 dBm
    Weak,
    /// ≥ -90 dBm
    VeryWeak,
    /// below -90 dBm
    Minimal,
}

impl SignalQuality {
    /// Band for an RSSI reading. NaN falls into `Minimal`.
    pub fn from_rssi(rssi: f64) -> Self {
        if rssi >= -50.0 {
            SignalQuality::Excellent
        } else if rssi >= -60.0 {
            SignalQuality::Good
        } else if rssi >= -70.0 {
            SignalQuality::Fair
        } else if rssi >= -80.0 {
            SignalQuality::Weak
        } else if rssi >= -90.0 {
            SignalQuality::VeryWeak
        } else {
            SignalQuality::Minimal
        }
    }

    /// Machine-readable level name
    pub fn level(self) -> &'static str {
        match self {
            SignalQuality::Excellent => "excellent",
            SignalQuality::Good => "good",
            SignalQuality::Fair => "fair",
            SignalQuality::Weak => "weak",
            SignalQuality::VeryWeak => "very_weak",
            SignalQuality::Minimal => "minimal",
        }
    }

    /// Bar count for a 0-5 signal meter
    pub fn bars(self) -> u8 {
        match self {
            SignalQuality::Excellent => 5,
            SignalQuality::Good => 4,
            SignalQuality::Fair => 3,
            SignalQuality::Weak => 2,
            SignalQuality::VeryWeak => 1,
            SignalQuality::Minimal => 0,
        }
    }

    /// Human-readable description with a rough range hint
    pub fn description(self) -> &'static str {
        match self {
            SignalQuality::Excellent => "Excellent - Very close",
            SignalQuality::Good => "Good - Within 5m",
            SignalQuality::Fair => "Fair - Within 10m",
            SignalQuality::Weak => "Weak - Within 20m",
            SignalQuality::VeryWeak => "Very Weak - Far away",
            SignalQuality::Minimal => "Minimal - At range limit",
        }
    }
}

impl fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.level())
    }
}

/// Quality band of an RSSI reading
#[inline]
pub fn signal_quality(rssi: f64) -> SignalQuality {
    SignalQuality::from_rssi(rssi)
}
