//! Rotation-based direction calibration.
//!
//! The rescuer turns in place while the radio keeps reporting RSSI. Each
//! reading is filed under the compass sector the device was facing; once
//! enough distinct sectors have been seen, the sector with the strongest
//! mean signal gives the bearing to the beacon.
//!
//! ```text
//!            N (sector 0 spans 0°..45°)
//!        7   0   1
//!      6    [ ]    2      bearing = index · width + width / 2
//!        5   4   3
//! ```

mod estimator;
mod layout;

pub use estimator::{CalibrationProgress, CalibrationState, DirectionEstimator, DirectionSector};
pub use layout::SectorLayout;
