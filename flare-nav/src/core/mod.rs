//! Core types shared by every flare-nav module.
//!
//! ## Coordinates
//! - [`GridCoord`]: integer heat-map cell indices
//! - [`WorldPoint`] / [`Position`]: rescuer-centered world units (cm),
//!   screen convention (+x east, +y south)
//!
//! ## Directions
//! - [`Octant`]: eight 45° compass partitions, usable as array indices
//! - [`normalize_degrees`], [`heading_to_vector`], [`circular_mean_degrees`]
//!
//! ## Sensor samples
//! - [`SignalSample`]: one RSSI reading
//! - [`AccelSample`], [`MagSample`], [`HeadingSample`]: motion streams

mod octant;
mod point;
mod sensors;

pub use octant::{Octant, circular_mean_degrees, heading_to_vector, normalize_degrees};
pub use point::{GridCoord, Position, WorldPoint};
pub use sensors::{AccelSample, HeadingSample, MagSample, SignalSample};
