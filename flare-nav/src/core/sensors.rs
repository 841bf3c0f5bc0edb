//! Sensor and radio sample types pushed in by the platform collaborators.
//!
//! All timestamps are milliseconds on a monotonic clock chosen by the caller.

use serde::{Deserialize, Serialize};

use super::GridCoord;

/// One radio callback: received signal strength of the tracked beacon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalSample {
    /// Received signal strength (dBm, negative)
    pub rssi: f64,
    /// Capture time (ms)
    pub timestamp_ms: u64,
    /// Grid cell the rescuer occupied, if known
    pub position: Option<GridCoord>,
}

impl SignalSample {
    /// Create an untagged sample
    pub fn new(rssi: f64, timestamp_ms: u64) -> Self {
        Self {
            rssi,
            timestamp_ms,
            position: None,
        }
    }

    /// Create from the integer dBm value radios report
    pub fn from_dbm(rssi: i32, timestamp_ms: u64) -> Self {
        Self::new(rssi as f64, timestamp_ms)
    }

    /// Attach the rescuer's grid cell
    pub fn at(mut self, position: GridCoord) -> Self {
        self.position = Some(position);
        self
    }

    /// True if the reading can be used at all
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.rssi.is_finite()
    }
}

/// Raw accelerometer reading in g units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccelSample {
    /// X axis (g)
    pub x: f64,
    /// Y axis (g)
    pub y: f64,
    /// Z axis (g)
    pub z: f64,
    /// Capture time (ms)
    pub timestamp_ms: u64,
}

impl AccelSample {
    /// Create a new accelerometer sample
    pub fn new(x: f64, y: f64, z: f64, timestamp_ms: u64) -> Self {
        Self {
            x,
            y,
            z,
            timestamp_ms,
        }
    }

    /// Vector magnitude sqrt(x² + y² + z²)
    #[inline]
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Raw magnetometer reading (any consistent unit, typically µT).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MagSample {
    /// X axis
    pub x: f64,
    /// Y axis
    pub y: f64,
    /// Z axis (unused for planar heading)
    pub z: f64,
    /// Capture time (ms)
    pub timestamp_ms: u64,
}

impl MagSample {
    /// Create a new magnetometer sample
    pub fn new(x: f64, y: f64, z: f64, timestamp_ms: u64) -> Self {
        Self {
            x,
            y,
            z,
            timestamp_ms,
        }
    }
}

/// Heading reported directly by a platform compass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeadingSample {
    /// Compass heading (degrees, 0 = north, clockwise)
    pub heading_deg: f64,
    /// Capture time (ms)
    pub timestamp_ms: u64,
}

impl HeadingSample {
    /// Create a new heading sample
    pub fn new(heading_deg: f64, timestamp_ms: u64) -> Self {
        Self {
            heading_deg,
            timestamp_ms,
        }
    }
}
