//! Signal model: RSSI to distance, smoothing and quality banding.
//!
//! Everything here is a pure function of its inputs except the two small
//! holders [`SignalSmoother`] and [`SignalHistory`], which keep the running
//! state for a single tracked beacon.
//!
//! ## Path-loss model
//!
//! ```text
//! d = 10 ^ ((tx_power - rssi) / (10 · n))
//! ```
//!
//! | n | Environment |
//! |---|-------------|
//! | 2.0 | free space |
//! | 2.5 - 3.0 | indoor, light clutter |
//! | 3.0 - 4.0 | indoor, walls |
//! | 4.0 - 5.0 | heavy obstacles / rubble |

mod format;
mod model;
mod quality;
mod smoothing;

pub use format::format_distance;
pub use model::{SignalModel, UNKNOWN_DISTANCE, distance_from_rssi};
pub use quality::{SignalQuality, signal_quality};
pub use smoothing::{SignalHistory, SignalSmoother, TimedRssi, smooth, weighted_smooth};
